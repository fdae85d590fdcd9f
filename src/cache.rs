//! # Reference Cache Module
//!
//! TTL cache for the biomarker reference table.
//!
//! ## Features
//!
//! - Single cached snapshot of the full reference table with expiry checks
//! - Refresh-on-read: an expired or absent snapshot triggers a fetch from the
//!   injected [`ReferenceSource`]
//! - Graceful degradation: a failed fetch logs the error and caches an empty
//!   snapshot so validation keeps running instead of erroring per candidate
//!
//! The lock is never held across an await. Two tasks observing an expired
//! snapshot may both refresh; the second write wins and both see consistent
//! data, so the race is tolerated rather than serialized.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::errors::error_logging;
use crate::reference::{BiomarkerReference, ReferenceSource};

/// A cached snapshot of the reference table
#[derive(Debug, Clone)]
struct CacheSlot {
    rows: Arc<Vec<BiomarkerReference>>,
    fetched_at: Instant,
    /// Wall-clock refresh time, for logs
    refreshed: DateTime<Utc>,
}

impl CacheSlot {
    fn is_expired(&self, ttl: Duration) -> bool {
        self.fetched_at.elapsed() >= ttl
    }
}

/// TTL cache over a [`ReferenceSource`]
pub struct ReferenceCache<S: ReferenceSource> {
    source: S,
    ttl: Duration,
    slot: RwLock<Option<CacheSlot>>,
}

impl<S: ReferenceSource> ReferenceCache<S> {
    pub fn new(source: S, ttl: Duration) -> Self {
        Self {
            source,
            ttl,
            slot: RwLock::new(None),
        }
    }

    /// Get the cached reference rows, refreshing when absent or expired.
    ///
    /// Never fails: a fetch error degrades to an empty snapshot so callers
    /// fall back to the static tables.
    pub async fn get(&self) -> Arc<Vec<BiomarkerReference>> {
        {
            let slot = self.slot.read();
            if let Some(cached) = slot.as_ref() {
                if !cached.is_expired(self.ttl) {
                    debug!(
                        rows = cached.rows.len(),
                        refreshed = %cached.refreshed,
                        "Reference cache hit"
                    );
                    crate::observability::record_reference_cache("hit");
                    return Arc::clone(&cached.rows);
                }
                debug!(refreshed = %cached.refreshed, "Reference cache expired");
            }
        }

        crate::observability::record_reference_cache("miss");
        self.refresh().await
    }

    /// Force a refresh from the source, replacing any cached snapshot
    pub async fn refresh(&self) -> Arc<Vec<BiomarkerReference>> {
        let rows = match self.source.fetch_all().await {
            Ok(rows) => {
                info!(rows = rows.len(), "Refreshed biomarker reference cache");
                crate::observability::record_reference_refresh(true);
                Arc::new(rows)
            }
            Err(e) => {
                error_logging::log_reference_error(&e, "refresh reference cache", None);
                warn!("Reference refresh failed; caching empty snapshot until next expiry");
                crate::observability::record_reference_refresh(false);
                Arc::new(Vec::new())
            }
        };

        let mut slot = self.slot.write();
        *slot = Some(CacheSlot {
            rows: Arc::clone(&rows),
            fetched_at: Instant::now(),
            refreshed: Utc::now(),
        });
        rows
    }

    /// Drop the cached snapshot so the next read refetches
    pub fn invalidate(&self) {
        let mut slot = self.slot.write();
        *slot = None;
        debug!("Reference cache invalidated");
    }
}
