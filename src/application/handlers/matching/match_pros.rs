//! MatchProsHandler - rank directory candidates and strip them to the
//! caller-facing shape.
//!
//! Ranking is distance ascending, then rating descending, then recency
//! of last activity descending. The returned list never carries raw
//! scores, coordinates, or unverified contact channels; banding happens
//! here, at the last step before the response.

use std::cmp::Ordering;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domain::handoff::ContactInfo;
use crate::domain::matching::{normalize_trade, trades_match, DistanceBand, MatchedPro, RatingBand};
use crate::ports::{DirectoryError, DirectoryQuery, ProDirectory, ProRecord};

/// Default number of pros returned to the caller.
pub const DEFAULT_MATCH_LIMIT: usize = 5;

/// How many candidates to pull from the directory before ranking.
const CANDIDATE_FETCH_LIMIT: u32 = 50;

/// Query for matching professionals to a trade and location.
#[derive(Debug, Clone)]
pub struct MatchProsQuery {
    pub trade: String,
    pub contact: ContactInfo,
    pub limit: Option<usize>,
}

/// Errors from the matching handler.
#[derive(Debug, Clone, Error)]
pub enum MatchProsError {
    #[error("Pro directory failure: {0}")]
    Directory(String),
}

impl From<DirectoryError> for MatchProsError {
    fn from(err: DirectoryError) -> Self {
        MatchProsError::Directory(err.to_string())
    }
}

/// Handler querying and ranking the pro directory.
pub struct MatchProsHandler {
    directory: Arc<dyn ProDirectory>,
    default_limit: usize,
}

impl MatchProsHandler {
    pub fn new(directory: Arc<dyn ProDirectory>) -> Self {
        Self {
            directory,
            default_limit: DEFAULT_MATCH_LIMIT,
        }
    }

    /// Overrides the default result limit.
    pub fn with_default_limit(mut self, limit: usize) -> Self {
        self.default_limit = limit.max(1);
        self
    }

    /// Returns up to `limit` matched pros, best first. An empty result
    /// is a normal outcome.
    pub async fn handle(&self, query: MatchProsQuery) -> Result<Vec<MatchedPro>, MatchProsError> {
        let trade = normalize_trade(&query.trade);
        let limit = query.limit.unwrap_or(self.default_limit);

        let directory_query = DirectoryQuery {
            trade: trade.clone(),
            city: query.contact.city.clone(),
            state: query.contact.state.clone(),
            zip: query.contact.zip.clone(),
            limit: CANDIDATE_FETCH_LIMIT,
        };

        let mut candidates: Vec<ProRecord> = self
            .directory
            .find_pros(&directory_query)
            .await?
            .into_iter()
            .filter(|p| p.active && p.verified)
            .filter(|p| p.trades.iter().any(|t| trades_match(t, &trade)))
            .collect();

        candidates.sort_by(compare_candidates);
        candidates.truncate(limit);

        Ok(candidates
            .into_iter()
            .map(|p| MatchedPro {
                id: p.id,
                display_name: p.display_name,
                trade: trade.clone(),
                distance_band: DistanceBand::from_miles(p.distance_miles.unwrap_or(f64::MAX)),
                rating_band: RatingBand::from_rating(p.rating),
            })
            .collect())
    }
}

fn compare_candidates(a: &ProRecord, b: &ProRecord) -> Ordering {
    distance_key(a)
        .partial_cmp(&distance_key(b))
        .unwrap_or(Ordering::Equal)
        .then_with(|| {
            rating_key(b)
                .partial_cmp(&rating_key(a))
                .unwrap_or(Ordering::Equal)
        })
        .then_with(|| activity_key(b).cmp(&activity_key(a)))
}

fn distance_key(p: &ProRecord) -> f64 {
    p.distance_miles.unwrap_or(f64::MAX)
}

fn rating_key(p: &ProRecord) -> f64 {
    p.rating.unwrap_or(-1.0)
}

fn activity_key(p: &ProRecord) -> DateTime<Utc> {
    p.last_active_at.unwrap_or(DateTime::<Utc>::MIN_UTC)
}
