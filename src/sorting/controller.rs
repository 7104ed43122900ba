//! Sorting controller: active configuration, toggling and sorted views
//!
//! A controller exists per table for as long as the table is on screen. It
//! owns two background tasks, both scoped to a [`CancellationToken`]:
//!
//! - the reconciliation fetch, which reads the remote preference once (with
//!   retries) and adopts it;
//! - the remote writer, which sends toggles to the remote tier one at a time,
//!   coalescing queued toggles so the last issued toggle is the one stored.
//!
//! Dropping the controller (or calling [`SortingController::shutdown`])
//! cancels both, so late responses have no effect.
//!
//! # Example
//!
//! ```rust,ignore
//! let controller = SortingController::builder("companies", local, remote)
//!     .default_config(SortConfig::asc("name")?)
//!     .build()?;
//!
//! controller.toggle("edrpou");
//! let rows = controller.sorted_view(Some(&companies));
//! ```

use crate::core::sort::validate_table_name;
use crate::core::{
    FieldSource, KeyValueStore, PreferenceError, PreferenceResult, RemotePreferences, SortConfig,
};
use crate::sorting::preference_store::{PreferenceStore, SyncState};
use crate::sorting::sort_records;
use serde_json::Value;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;

/// Default number of retries for the reconciliation fetch
pub const DEFAULT_FETCH_RETRIES: u32 = 3;

/// Delay before the first fetch retry; doubles on each attempt
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(250);

/// Observable state of a controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortingState {
    /// The active configuration
    pub config: SortConfig,
    /// Lifecycle of the preference
    pub sync: SyncState,
    /// Number of toggles issued so far
    pub generation: u64,
    /// Whether the reconciliation fetch has finished (successfully or not)
    pub fetch_settled: bool,
}

struct Shared<K> {
    store: PreferenceStore<K>,
    state: watch::Sender<SortingState>,
    /// Generation of the last remote write that completed
    settled: watch::Sender<u64>,
    /// Serializes local-tier writes with the state update that follows them
    local_writes: Mutex<()>,
}

impl<K: KeyValueStore> Shared<K> {
    fn lock_local(&self) -> MutexGuard<'_, ()> {
        self.local_writes
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn apply_remote(&self, remote: Option<SortConfig>) {
        let _guard = self.lock_local();
        let adopted = self.store.reconcile(remote);

        self.state.send_modify(|state| {
            state.fetch_settled = true;
            if let Some(config) = adopted {
                tracing::debug!(table = %self.store.table_name(), %config, "adopted remote sort preference");
                state.config = config;
                state.sync = SyncState::RemoteReconciled;
            }
        });
    }

    fn mark_fetch_settled(&self) {
        self.state.send_modify(|state| state.fetch_settled = true);
    }
}

/// Builder for [`SortingController`]
pub struct SortingControllerBuilder<K, R> {
    table_name: String,
    local: K,
    remote: R,
    default_config: Option<SortConfig>,
    fetch_retries: u32,
    retry_delay: Duration,
}

impl<K, R> SortingControllerBuilder<K, R>
where
    K: KeyValueStore + 'static,
    R: RemotePreferences + 'static,
{
    /// Configuration used when the local tier has nothing for this table
    pub fn default_config(mut self, config: SortConfig) -> Self {
        self.default_config = Some(config);
        self
    }

    /// Like [`default_config`](Self::default_config) but optional
    pub fn maybe_default_config(mut self, config: Option<SortConfig>) -> Self {
        self.default_config = config;
        self
    }

    /// Number of times a failed reconciliation fetch is retried
    pub fn fetch_retries(mut self, retries: u32) -> Self {
        self.fetch_retries = retries;
        self
    }

    /// Delay before the first retry; doubled for each further attempt
    pub fn retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Resolve the initial configuration and start the background tasks
    ///
    /// Must be called from within a tokio runtime.
    pub fn build(self) -> PreferenceResult<SortingController<K>> {
        validate_table_name(&self.table_name)?;
        let handle = tokio::runtime::Handle::try_current()
            .map_err(|e| PreferenceError::NoRuntime(e.to_string()))?;

        let store = PreferenceStore::new(self.table_name.clone(), self.local);
        let initial = store.resolve_initial(self.default_config.as_ref());
        tracing::debug!(table = %self.table_name, config = %initial, "resolved initial sort preference");

        let (state, _) = watch::channel(SortingState {
            config: initial,
            sync: SyncState::LocalResolved,
            generation: 0,
            fetch_settled: false,
        });
        let (settled, _) = watch::channel(0);

        let shared = Arc::new(Shared {
            store,
            state,
            settled,
            local_writes: Mutex::new(()),
        });
        let remote = Arc::new(self.remote);
        let cancel = CancellationToken::new();
        let (writes, queue) = mpsc::unbounded_channel();

        handle.spawn(run_fetch(
            shared.clone(),
            remote.clone(),
            self.fetch_retries,
            self.retry_delay,
            cancel.clone(),
        ));
        handle.spawn(run_writer(shared.clone(), remote, queue, cancel.clone()));

        Ok(SortingController {
            shared,
            writes,
            cancel,
        })
    }
}

/// Per-table sort state with a local cache tier and a remote tier
pub struct SortingController<K: KeyValueStore> {
    shared: Arc<Shared<K>>,
    writes: mpsc::UnboundedSender<(u64, SortConfig)>,
    cancel: CancellationToken,
}

impl<K: KeyValueStore + 'static> SortingController<K> {
    /// Start building a controller for `table_name`
    pub fn builder<R>(
        table_name: impl Into<String>,
        local: K,
        remote: R,
    ) -> SortingControllerBuilder<K, R>
    where
        R: RemotePreferences + 'static,
    {
        SortingControllerBuilder {
            table_name: table_name.into(),
            local,
            remote,
            default_config: None,
            fetch_retries: DEFAULT_FETCH_RETRIES,
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }
}

impl<K: KeyValueStore> SortingController<K> {
    pub fn table_name(&self) -> &str {
        self.shared.store.table_name()
    }

    /// The active configuration
    pub fn current_config(&self) -> SortConfig {
        self.shared.state.borrow().config.clone()
    }

    pub fn state(&self) -> SyncState {
        self.shared.state.borrow().sync
    }

    /// Snapshot of everything observable about this controller
    pub fn snapshot(&self) -> SortingState {
        self.shared.state.borrow().clone()
    }

    /// Header click on `field`
    ///
    /// The same field flips the direction; another field starts ascending.
    /// The local tier is written before this returns; the remote write is
    /// queued. Never waits on the remote tier and never fails.
    pub fn toggle(&self, field: &str) {
        if field.trim().is_empty() {
            tracing::warn!(table = %self.table_name(), "ignoring toggle on an empty field");
            return;
        }

        let _guard = self.shared.lock_local();
        let next = self.shared.state.borrow().config.toggled(field);
        let _ = self.shared.store.write_local(&next);

        let mut generation = 0;
        self.shared.state.send_modify(|state| {
            state.generation += 1;
            state.config = next.clone();
            generation = state.generation;
        });

        tracing::debug!(table = %self.table_name(), config = %next, generation, "sort toggled");
        // sent under the guard so the writer sees generations in order
        if self.writes.send((generation, next)).is_err() {
            tracing::debug!(table = %self.table_name(), "remote writer stopped, toggle kept locally");
        }
    }

    /// Sorted copy of `collection` under the active configuration
    ///
    /// `None` yields an empty vec. The sort is stable.
    pub fn sorted_view<T>(&self, collection: Option<&[T]>) -> Vec<T>
    where
        T: FieldSource + Clone,
    {
        match collection {
            Some(items) => sort_records(items, &self.current_config()),
            None => Vec::new(),
        }
    }

    /// Sorted copy of a JSON array; any other JSON value yields an empty vec
    pub fn sorted_json(&self, collection: &Value) -> Vec<Value> {
        self.sorted_view(collection.as_array().map(Vec::as_slice))
    }

    /// Header arrow for `field` under the active configuration
    pub fn sort_indicator(&self, field: &str) -> &'static str {
        self.shared.state.borrow().config.indicator(field)
    }

    /// Whether the remote write for the latest toggle is still outstanding
    pub fn is_saving(&self) -> bool {
        let issued = self.shared.state.borrow().generation;
        *self.shared.settled.borrow() < issued
    }

    /// Watch configuration changes (toggles and remote reconciliation)
    pub fn subscribe(&self) -> watch::Receiver<SortingState> {
        self.shared.state.subscribe()
    }

    /// Wait until the reconciliation fetch has finished
    pub async fn fetch_settled(&self) -> SortingState {
        let mut rx = self.shared.state.subscribe();
        tokio::select! {
            _ = self.cancel.cancelled() => {}
            _ = rx.wait_for(|state| state.fetch_settled) => {}
        }
        self.snapshot()
    }

    /// Wait until every issued toggle has been sent to the remote tier
    pub async fn flush(&self) -> PreferenceResult<()> {
        let target = self.shared.state.borrow().generation;
        let mut rx = self.shared.settled.subscribe();
        tokio::select! {
            _ = self.cancel.cancelled() => Err(PreferenceError::Cancelled),
            settled = rx.wait_for(|settled| *settled >= target) => {
                settled.map(|_| ()).map_err(|_| PreferenceError::Cancelled)
            }
        }
    }

    /// Cancel outstanding fetch and write tasks
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    pub fn is_shut_down(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

impl<K: KeyValueStore> Drop for SortingController<K> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn fetch_with_retry<R: RemotePreferences>(
    remote: &R,
    table_name: &str,
    retries: u32,
    retry_delay: Duration,
) -> PreferenceResult<Option<SortConfig>> {
    let mut attempt = 0;
    loop {
        match remote.fetch(table_name).await {
            Ok(found) => return Ok(found),
            Err(e) if attempt < retries => {
                let delay = retry_delay.saturating_mul(2u32.saturating_pow(attempt));
                tracing::debug!(table = %table_name, attempt, ?delay, "sort preference fetch failed, retrying: {}", e);
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

async fn run_fetch<K, R>(
    shared: Arc<Shared<K>>,
    remote: Arc<R>,
    retries: u32,
    retry_delay: Duration,
    cancel: CancellationToken,
) where
    K: KeyValueStore,
    R: RemotePreferences,
{
    let table_name = shared.store.table_name().to_string();
    let fetched = tokio::select! {
        _ = cancel.cancelled() => return,
        fetched = fetch_with_retry(remote.as_ref(), &table_name, retries, retry_delay) => fetched,
    };

    match fetched {
        Ok(remote) => shared.apply_remote(remote),
        Err(e) => {
            tracing::warn!(table = %table_name, "could not load sort preference: {}", e);
            shared.mark_fetch_settled();
        }
    }
}

async fn run_writer<K, R>(
    shared: Arc<Shared<K>>,
    remote: Arc<R>,
    mut queue: mpsc::UnboundedReceiver<(u64, SortConfig)>,
    cancel: CancellationToken,
) where
    K: KeyValueStore,
    R: RemotePreferences,
{
    let table_name = shared.store.table_name().to_string();
    loop {
        let (mut generation, mut config) = tokio::select! {
            _ = cancel.cancelled() => break,
            next = queue.recv() => match next {
                Some(next) => next,
                None => break,
            },
        };
        // only the newest queued toggle needs to reach the remote tier
        while let Ok((g, c)) = queue.try_recv() {
            generation = g;
            config = c;
        }

        let saved = tokio::select! {
            _ = cancel.cancelled() => break,
            saved = remote.save(&table_name, &config) => saved,
        };
        if let Err(e) = saved {
            tracing::warn!(table = %table_name, %config, "could not save sort preference: {}", e);
        }
        shared.settled.send_replace(generation);
    }
}
