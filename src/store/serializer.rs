//! Access Serializer
//!
//! Funnels every store operation through a single worker task so that all
//! calls apply in one total order.
//!
//! [`StoreState`] holds the storage core and policies and applies operations
//! synchronously. [`Store`] is the cloneable async handle: each call sends a
//! typed request over a bounded mpsc queue and awaits its oneshot reply. The
//! worker owns the state outright, so nothing else can observe it
//! mid-mutation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot, Mutex, Notify};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::{Result, StoreError};
use crate::store::entry::current_timestamp_ms;
use crate::store::listing::{self, ListEntry};
use crate::store::{auth, telemetry, Entry, EvictionPolicy, StorageCore, StoreStats};

/// Default bound of the request queue.
pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;

// == Store Config ==
/// Configuration a store is constructed with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Maximum number of live entries, 0 = unbounded
    pub depth: usize,
    /// Lets the admin principal update/delete any entry
    pub admin_override: bool,
    /// Restricts Get to principals that can see the entry
    pub owner_only_reads: bool,
    /// Bound of the request queue (minimum 1)
    pub queue_capacity: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            depth: 0,
            admin_override: false,
            owner_only_reads: false,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

// == Store State ==
/// Everything the worker owns. Each method is one atomic store operation.
#[derive(Debug)]
pub struct StoreState {
    core: StorageCore,
    eviction: EvictionPolicy,
    admin_override: bool,
    owner_only_reads: bool,
    stats: StoreStats,
}

impl StoreState {
    pub fn new(config: &StoreConfig) -> Self {
        let core = if config.depth > 0 {
            StorageCore::with_capacity(config.depth + 1)
        } else {
            StorageCore::new()
        };

        Self {
            core,
            eviction: EvictionPolicy::new(config.depth),
            admin_override: config.admin_override,
            owner_only_reads: config.owner_only_reads,
            stats: StoreStats::new(),
        }
    }

    // == Get ==
    /// Reads a value, counting the read and moving the entry to the head.
    pub fn get(&mut self, key: &str, requester: &str, now: u64) -> Result<String> {
        let readable = self
            .core
            .lookup(key)
            .map(|entry| !self.owner_only_reads || auth::visible(requester, entry.owner()));

        if readable != Some(true) {
            self.stats.record_miss();
            debug!(key, requester, "Get missed");
            return Err(StoreError::NotFound(key.to_string()));
        }

        let entry = self.core.touch_front(key);
        telemetry::record_read(entry, now);
        let value = entry.value.clone();

        self.stats.record_hit();
        debug!(key, requester, "Get hit");
        Ok(value)
    }

    // == Put ==
    /// Creates or updates an entry, then trims the store to its depth.
    ///
    /// Updating an entry owned by someone else is rejected and leaves the
    /// entry untouched.
    pub fn put(&mut self, key: String, value: String, requester: &str, now: u64) -> Result<()> {
        let permitted = self
            .core
            .lookup(&key)
            .map(|entry| auth::authorized(requester, entry.owner(), self.admin_override));

        match permitted {
            Some(false) => return Err(self.reject(key, requester)),
            Some(true) => {
                let entry = self.core.update_value(&key, value);
                telemetry::record_write(entry, now);
                self.core.touch_front(&key);
                debug!(key = %key, requester, "Updated key");
            }
            None => {
                debug!(key = %key, requester, "Created key");
                self.core.insert_front(Entry::new(key, value, requester, now));
            }
        }

        let evicted = self.eviction.sweep(&mut self.core);
        for entry in &evicted {
            warn!(key = entry.key(), owner = entry.owner(), "Dropping key");
        }
        self.stats.record_evictions(evicted.len());
        self.stats.set_total_entries(self.core.len());
        Ok(())
    }

    // == Delete ==
    /// Removes an entry the requester is allowed to remove.
    pub fn delete(&mut self, key: &str, requester: &str) -> Result<()> {
        let permitted = self
            .core
            .lookup(key)
            .map(|entry| auth::authorized(requester, entry.owner(), self.admin_override));

        match permitted {
            None => Err(StoreError::NotFound(key.to_string())),
            Some(false) => Err(self.reject(key.to_string(), requester)),
            Some(true) => {
                self.core.remove(key);
                self.stats.set_total_entries(self.core.len());
                debug!(key, requester, "Deleted key");
                Ok(())
            }
        }
    }

    // == List ==
    /// Snapshots every entry visible to `requester`.
    pub fn list(&self, requester: &str, now: u64) -> Vec<ListEntry> {
        listing::snapshot_all(&self.core, requester, now)
    }

    /// Snapshots one entry visible to `requester`.
    pub fn list_one(&self, key: &str, requester: &str, now: u64) -> Result<ListEntry> {
        listing::snapshot_one(&self.core, key, requester, now)
    }

    // == Configure ==
    /// Replaces depth and admin override. A smaller depth is applied by the
    /// next Put's sweep.
    pub fn configure(&mut self, depth: usize, admin_override: bool) {
        self.eviction = EvictionPolicy::new(depth);
        self.admin_override = admin_override;
        info!(depth, admin_override, "Store reconfigured");
    }

    // == Stats ==
    pub fn stats(&self) -> StoreStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.core.len());
        stats
    }

    /// Returns the entry stored under `key` without touching it.
    pub fn peek(&self, key: &str) -> Option<&Entry> {
        self.core.lookup(key)
    }

    /// Keys from most to least recently used.
    pub fn recency(&self) -> Vec<String> {
        self.core.iter().map(|entry| entry.key().to_string()).collect()
    }

    pub fn len(&self) -> usize {
        self.core.len()
    }

    pub fn is_empty(&self) -> bool {
        self.core.is_empty()
    }

    fn reject(&mut self, key: String, requester: &str) -> StoreError {
        self.stats.record_rejection();
        debug!(key = %key, requester, "Rejected non-owner mutation");
        StoreError::NotAuthorized {
            requester: requester.to_string(),
            key,
        }
    }
}

// == Requests ==
enum Request {
    Get {
        key: String,
        requester: String,
        reply: oneshot::Sender<Result<String>>,
    },
    Put {
        key: String,
        value: String,
        requester: String,
        reply: oneshot::Sender<Result<()>>,
    },
    Delete {
        key: String,
        requester: String,
        reply: oneshot::Sender<Result<()>>,
    },
    List {
        requester: String,
        reply: oneshot::Sender<Vec<ListEntry>>,
    },
    ListOne {
        key: String,
        requester: String,
        reply: oneshot::Sender<Result<ListEntry>>,
    },
    Configure {
        depth: usize,
        admin_override: bool,
        reply: oneshot::Sender<()>,
    },
    Stats {
        reply: oneshot::Sender<StoreStats>,
    },
}

// == Store ==
/// Cloneable handle to a running store.
///
/// Every method waits until the worker has applied the operation. Once
/// [`Store::close`] has been called, further calls return
/// [`StoreError::Closed`].
#[derive(Debug, Clone)]
pub struct Store {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    sender: mpsc::Sender<Request>,
    closed: AtomicBool,
    shutdown: Arc<Notify>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl Store {
    // == Constructor ==
    /// Spawns the worker task and returns a handle to it.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(config: StoreConfig) -> Self {
        let (sender, receiver) = mpsc::channel(config.queue_capacity.max(1));
        let state = StoreState::new(&config);
        let shutdown = Arc::new(Notify::new());
        let worker = tokio::spawn(run_worker(state, receiver, shutdown.clone()));

        Self {
            inner: Arc::new(Inner {
                sender,
                closed: AtomicBool::new(false),
                shutdown,
                worker: Mutex::new(Some(worker)),
            }),
        }
    }

    pub async fn get(&self, key: &str, requester: &str) -> Result<String> {
        self.request(|reply| Request::Get {
            key: key.to_string(),
            requester: requester.to_string(),
            reply,
        })
        .await?
    }

    pub async fn put(&self, key: &str, value: &str, requester: &str) -> Result<()> {
        self.request(|reply| Request::Put {
            key: key.to_string(),
            value: value.to_string(),
            requester: requester.to_string(),
            reply,
        })
        .await?
    }

    pub async fn delete(&self, key: &str, requester: &str) -> Result<()> {
        self.request(|reply| Request::Delete {
            key: key.to_string(),
            requester: requester.to_string(),
            reply,
        })
        .await?
    }

    /// Lists every entry visible to `requester`. Order is not meaningful.
    pub async fn list(&self, requester: &str) -> Result<Vec<ListEntry>> {
        self.request(|reply| Request::List {
            requester: requester.to_string(),
            reply,
        })
        .await
    }

    pub async fn list_one(&self, key: &str, requester: &str) -> Result<ListEntry> {
        self.request(|reply| Request::ListOne {
            key: key.to_string(),
            requester: requester.to_string(),
            reply,
        })
        .await?
    }

    /// Replaces depth and admin override on the running store.
    pub async fn configure(&self, depth: usize, admin_override: bool) -> Result<()> {
        self.request(|reply| Request::Configure {
            depth,
            admin_override,
            reply,
        })
        .await
    }

    pub async fn stats(&self) -> Result<StoreStats> {
        self.request(|reply| Request::Stats { reply }).await
    }

    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::Acquire)
    }

    // == Close ==
    /// Stops accepting requests, lets queued ones finish and waits for the
    /// worker to exit. Safe to call more than once.
    pub async fn close(&self) {
        if !self.inner.closed.swap(true, Ordering::AcqRel) {
            self.inner.shutdown.notify_one();
        }

        let mut worker = self.inner.worker.lock().await;
        if let Some(handle) = worker.take() {
            if let Err(err) = handle.await {
                warn!(error = %err, "Store worker did not exit cleanly");
            }
        }
    }

    async fn request<T>(&self, build: impl FnOnce(oneshot::Sender<T>) -> Request) -> Result<T> {
        if self.is_closed() {
            return Err(StoreError::Closed);
        }

        let (reply, response) = oneshot::channel();
        self.inner
            .sender
            .send(build(reply))
            .await
            .map_err(|_| StoreError::Closed)?;

        // The reply sender is dropped unanswered only if the worker task died.
        response.await.map_err(|_| StoreError::Closed)
    }
}

// == Worker ==
async fn run_worker(
    mut state: StoreState,
    mut receiver: mpsc::Receiver<Request>,
    shutdown: Arc<Notify>,
) {
    info!("Store worker started");

    loop {
        tokio::select! {
            biased;
            _ = shutdown.notified() => {
                debug!("Store closing, draining queued requests");
                receiver.close();
                break;
            }
            request = receiver.recv() => match request {
                Some(request) => apply(&mut state, request),
                None => break,
            },
        }
    }

    // Requests accepted before the queue closed are still answered.
    while let Some(request) = receiver.recv().await {
        apply(&mut state, request);
    }

    info!(entries = state.len(), "Store worker stopped");
}

fn apply(state: &mut StoreState, request: Request) {
    // Reply send errors mean the caller stopped waiting; the operation has
    // still been applied.
    match request {
        Request::Get {
            key,
            requester,
            reply,
        } => {
            let _ = reply.send(state.get(&key, &requester, current_timestamp_ms()));
        }
        Request::Put {
            key,
            value,
            requester,
            reply,
        } => {
            let _ = reply.send(state.put(key, value, &requester, current_timestamp_ms()));
        }
        Request::Delete {
            key,
            requester,
            reply,
        } => {
            let _ = reply.send(state.delete(&key, &requester));
        }
        Request::List { requester, reply } => {
            let _ = reply.send(state.list(&requester, current_timestamp_ms()));
        }
        Request::ListOne {
            key,
            requester,
            reply,
        } => {
            let _ = reply.send(state.list_one(&key, &requester, current_timestamp_ms()));
        }
        Request::Configure {
            depth,
            admin_override,
            reply,
        } => {
            state.configure(depth, admin_override);
            let _ = reply.send(());
        }
        Request::Stats { reply } => {
            let _ = reply.send(state.stats());
        }
    }
}
