//! Vote retrieval, enrichment, caching and aggregation for a single
//! governance proposal.
//!
//! The public surface consumed by a presentation layer is `VotingService`:
//! `get_voting_data` (cache-checked retrieval), `calculate_vote_stats` and
//! `get_not_voted_delegates` (derived views, recomputed on every read).

pub mod aggregate;
pub mod cache;
pub mod config;
pub mod enrich;
pub mod error;
pub mod roster;
pub mod service;
pub mod snapshot;

pub use aggregate::{compute_not_yet_voted, compute_stats};
pub use cache::{DelegateSnapshotCache, VoteResultCache};
pub use config::GovScanConfig;
pub use error::GovScanError;
pub use roster::{FileRoster, RosterProvider, StaticRoster};
pub use service::VotingService;
