//! # Sigil Jobs
//!
//! Scheduled reconciliation for the persisted entity graph:
//!
//! - **Cross-batch duplicate detection**: finds entities created by
//!   separate requests that share a type and a value of the configured
//!   shared property, elects a canonical survivor and reroutes inbound
//!   links.
//! - **Global-identifier normalization**: rewrites subjects named under
//!   foreign schemes into derived local identifiers, keeping the original
//!   value as provenance.
//!
//! Both jobs run on fixed timers, suspend while awaiting store
//! round-trips, and abort only their current cycle on store errors; the
//! next trigger re-queries from scratch. The detector is single-flight
//! guarded; concurrent triggers are dropped.

pub mod config;
pub mod detect;
pub mod error;
pub mod normalize;
pub mod scheduler;
pub mod single_flight;

// Re-exports
pub use config::JobsConfig;
pub use detect::{DetectStats, DuplicateCandidate, DuplicateDetector, RunOutcome};
pub use error::{JobError, Result};
pub use normalize::IdentifierNormalizer;
pub use scheduler::{spawn, SchedulerHandle};
pub use single_flight::SingleFlight;
