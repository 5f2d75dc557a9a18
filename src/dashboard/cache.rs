// Time-based snapshot cache of the loaded dataset.

use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{debug, info};

use wellbeing_charts::Dataset;

use crate::dashboard::DashResult;

/// Default lifetime of a dataset snapshot: one hour.
pub const DEFAULT_TTL_SECS: u64 = 3600;

struct Entry {
    loaded_at: Instant,
    dataset: Arc<Dataset>,
}

/// Caches the dataset as an immutable snapshot for a fixed duration, so
/// that repeated interactions do not reread the source file. The caller
/// passes the current instant, which makes expiry deterministic under
/// test.
pub struct DatasetCache {
    ttl: Duration,
    entry: Option<Entry>,
}

impl DatasetCache {
    pub fn new(ttl: Duration) -> DatasetCache {
        DatasetCache { ttl, entry: None }
    }

    /// Returns the cached snapshot when it is still fresh, and otherwise
    /// runs `load`. The load is all-or-nothing: on failure the error is
    /// returned and nothing is cached, so the next call retries.
    pub fn fetch<F>(&mut self, now: Instant, load: F) -> DashResult<Arc<Dataset>>
    where
        F: FnOnce() -> DashResult<Dataset>,
    {
        if let Some(entry) = &self.entry {
            if now.duration_since(entry.loaded_at) < self.ttl {
                debug!("DatasetCache: serving cached snapshot");
                return Ok(entry.dataset.clone());
            }
            info!("DatasetCache: snapshot expired, reloading");
        }
        let dataset = Arc::new(load()?);
        self.entry = Some(Entry {
            loaded_at: now,
            dataset: dataset.clone(),
        });
        Ok(dataset)
    }
}
