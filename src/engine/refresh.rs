use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::RwLock;

use super::api::PortalClient;
use super::config::EngineConfig;
use super::error::EngineError;
use super::snapshot::{resolve_snapshot, UsageSnapshot};

/// Caller-side refresh state: a single-writer in-flight flag plus the last
/// successful snapshot, read by display surfaces between refreshes.
///
/// The engine itself is stateless and reentrant; this context only exists so
/// a periodic scheduler and an on-demand view sharing one credential do not
/// issue duplicate portal requests.
#[derive(Default)]
pub struct RefreshContext {
    in_flight: AtomicBool,
    last: RwLock<Option<UsageSnapshot>>,
}

/// Clears the in-flight flag on drop, so a refresh future cancelled mid-await
/// (e.g. by a caller-imposed timeout) cannot wedge the context.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl RefreshContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy-on-read view of the last successful snapshot.
    pub fn last(&self) -> Option<UsageSnapshot> {
        self.last.read().clone()
    }

    /// Runs one resolution unless another is already in flight, in which case
    /// no provider traffic is issued and `RefreshInFlight` is returned. A
    /// successful snapshot replaces the stored last value. Dropping the
    /// returned future releases the in-flight flag.
    pub async fn refresh(
        &self,
        client: &PortalClient,
        cfg: &EngineConfig,
        credential: &str,
    ) -> Result<UsageSnapshot, EngineError> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(EngineError::RefreshInFlight);
        }
        let _guard = InFlightGuard(&self.in_flight);

        let result = resolve_snapshot(client, cfg, credential).await;
        if let Ok(snap) = &result {
            *self.last.write() = Some(snap.clone());
        }
        result
    }
}
