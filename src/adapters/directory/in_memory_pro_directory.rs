//! In-Memory Pro Directory Adapter
//!
//! Holds a fixed candidate list. Useful for testing and development; it
//! applies the trade filter the way the real directory query does but
//! leaves ranking and field-stripping to the matching handler.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use crate::domain::matching::trades_match;
use crate::ports::{DirectoryError, DirectoryQuery, ProDirectory, ProRecord};

/// In-memory implementation of [`ProDirectory`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryProDirectory {
    pros: Arc<RwLock<Vec<ProRecord>>>,
}

impl InMemoryProDirectory {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a directory seeded with candidates.
    pub fn with_pros(pros: Vec<ProRecord>) -> Self {
        Self {
            pros: Arc::new(RwLock::new(pros)),
        }
    }

    /// Adds a candidate.
    pub fn add(&self, pro: ProRecord) {
        self.pros.write().expect("directory lock").push(pro);
    }
}

#[async_trait]
impl ProDirectory for InMemoryProDirectory {
    async fn find_pros(&self, query: &DirectoryQuery) -> Result<Vec<ProRecord>, DirectoryError> {
        let pros = self.pros.read().expect("directory lock");
        let matches: Vec<ProRecord> = pros
            .iter()
            .filter(|p| p.trades.iter().any(|t| trades_match(t, &query.trade)))
            .take(query.limit as usize)
            .cloned()
            .collect();
        Ok(matches)
    }
}
