//! Timer-driven scheduling of the reconciliation jobs
//!
//! Each enabled job runs on its own fixed interval in its own task. The
//! detector and the normalizer are independent and may run concurrently;
//! the store's commit is the only serialization point between them. A
//! failed cycle is logged and the loop continues — the next trigger
//! re-queries from scratch.

use crate::config::JobsConfig;
use crate::detect::DuplicateDetector;
use crate::normalize::IdentifierNormalizer;
use sigil_core::{AuthContext, EntityStore, TransactionLog};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{error, info};

/// Handle over the spawned job loops
#[derive(Debug)]
pub struct SchedulerHandle {
    tasks: Vec<JoinHandle<()>>,
}

impl SchedulerHandle {
    /// Number of scheduled job loops
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// True if no job loop was scheduled
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Abort all job loops
    pub fn shutdown(self) {
        for task in self.tasks {
            task.abort();
        }
    }
}

/// Spawn the enabled job loops under the system identity.
pub fn spawn<S, L>(
    detector: Arc<DuplicateDetector<S>>,
    normalizer: Arc<IdentifierNormalizer<S, L>>,
    config: &JobsConfig,
) -> SchedulerHandle
where
    S: EntityStore + 'static,
    L: TransactionLog + 'static,
{
    let mut tasks = Vec::new();

    if config.detect_enabled {
        let period = Duration::from_secs(config.detect_interval_secs);
        info!(period_secs = config.detect_interval_secs, "scheduling duplicate detection");
        tasks.push(tokio::spawn(async move {
            let ctx = AuthContext::system();
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if let Err(err) = detector.run(&ctx).await {
                    // a failed cycle aborts itself only
                    error!(error = %err, "duplicate detection cycle failed");
                }
            }
        }));
    }

    if config.normalize_enabled {
        let period = Duration::from_secs(config.normalize_interval_secs);
        info!(period_secs = config.normalize_interval_secs, "scheduling identifier normalization");
        tasks.push(tokio::spawn(async move {
            let ctx = AuthContext::system();
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if let Err(err) = normalizer.run(&ctx).await {
                    error!(error = %err, "identifier normalization cycle failed");
                }
            }
        }));
    }

    SchedulerHandle { tasks }
}
