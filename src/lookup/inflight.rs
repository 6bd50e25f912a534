//! In-flight fetch table.
//!
//! One `watch` channel per identifier being fetched. The first caller for
//! an identifier becomes the leader and owns the sender; later callers
//! subscribe to the same channel. The entry is removed when the leader's
//! [`SettleGuard`] drops, before the result is published, so a caller
//! arriving afterwards reads the cache instead of a stale channel.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::watch;

use crate::types::DocResult;

type Pending = watch::Receiver<Option<DocResult>>;

/// Outcome of [`InFlight::claim`].
pub(crate) enum Claim {
    /// The identifier settled in the cache between the caller's first
    /// check and taking the table lock.
    Cached(DocResult),
    /// Another fetch is outstanding; wait on its channel.
    Join(Pending),
    /// No fetch is outstanding; the caller must run one and publish on
    /// the sender.
    Lead(watch::Sender<Option<DocResult>>, Pending),
}

#[derive(Default)]
pub(crate) struct InFlight {
    pending: Mutex<HashMap<String, Pending>>,
}

impl InFlight {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Join an outstanding fetch for `identifier`, or register a new one.
    ///
    /// `cached` is consulted under the table lock, after the outstanding
    /// check, so a fetch that settled after the caller's own cache check is
    /// not repeated.
    pub(crate) fn claim(
        &self,
        identifier: &str,
        cached: impl FnOnce() -> Option<DocResult>,
    ) -> Claim {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(rx) = pending.get(identifier) {
            return Claim::Join(rx.clone());
        }
        if let Some(result) = cached() {
            return Claim::Cached(result);
        }
        let (tx, rx) = watch::channel(None);
        pending.insert(identifier.to_string(), rx.clone());
        Claim::Lead(tx, rx)
    }

    /// Number of outstanding fetches.
    pub(crate) fn len(&self) -> usize {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn settle(&self, identifier: &str) {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(identifier);
    }
}

/// Removes an identifier from the table when dropped, including when the
/// fetch task panics.
pub(crate) struct SettleGuard {
    table: Arc<InFlight>,
    identifier: String,
}

impl SettleGuard {
    pub(crate) fn new(table: Arc<InFlight>, identifier: String) -> Self {
        Self { table, identifier }
    }
}

impl Drop for SettleGuard {
    fn drop(&mut self) {
        self.table.settle(&self.identifier);
    }
}

/// Wait for the leader to publish. A leader that vanished without
/// publishing yields `Unavailable`.
pub(crate) async fn wait(mut rx: Pending) -> DocResult {
    match rx.wait_for(Option::is_some).await {
        Ok(value) => value
            .clone()
            .unwrap_or_else(|| DocResult::unavailable("fetch finished without a result")),
        Err(_) => DocResult::unavailable("fetch task ended without a result"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_claim_leads_second_joins() {
        let table = InFlight::new();
        assert!(matches!(table.claim("Sleep", || None), Claim::Lead(..)));
        assert!(matches!(table.claim("Sleep", || None), Claim::Join(_)));
        assert!(matches!(table.claim("Beep", || None), Claim::Lead(..)));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn cached_result_short_circuits() {
        let table = InFlight::new();
        let claim = table.claim("Sleep", || Some(DocResult::Undocumented));
        assert!(matches!(claim, Claim::Cached(DocResult::Undocumented)));
        assert_eq!(table.len(), 0);
    }

    #[test]
    fn guard_drop_settles_entry() {
        let table = Arc::new(InFlight::new());
        let _claim = table.claim("Sleep", || None);
        let guard = SettleGuard::new(Arc::clone(&table), "Sleep".to_string());
        assert_eq!(table.len(), 1);
        drop(guard);
        assert_eq!(table.len(), 0);
        assert!(matches!(table.claim("Sleep", || None), Claim::Lead(..)));
    }

    #[tokio::test]
    async fn joiners_receive_published_result() {
        let table = InFlight::new();
        let Claim::Lead(tx, leader_rx) = table.claim("Sleep", || None) else {
            panic!("expected to lead");
        };
        let Claim::Join(joiner_rx) = table.claim("Sleep", || None) else {
            panic!("expected to join");
        };

        tx.send(Some(DocResult::Undocumented)).unwrap();

        assert_eq!(wait(leader_rx).await, DocResult::Undocumented);
        assert_eq!(wait(joiner_rx).await, DocResult::Undocumented);
    }

    #[tokio::test]
    async fn dropped_sender_yields_unavailable() {
        let table = InFlight::new();
        let Claim::Lead(tx, rx) = table.claim("Sleep", || None) else {
            panic!("expected to lead");
        };
        drop(tx);
        assert!(matches!(wait(rx).await, DocResult::Unavailable { .. }));
    }
}
