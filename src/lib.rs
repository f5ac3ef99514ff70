//! Housecall - AI Diagnostic Conversation & Pro-Handoff Engine
//!
//! This crate implements a multi-turn triage conversation for home-repair
//! problems: it elicits information turn by turn, produces a risk-scored
//! diagnosis, and on high-risk outcomes hands off to geographic pro
//! matching and idempotent lead creation.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
