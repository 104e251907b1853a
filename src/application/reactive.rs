//! Reactive cells and key-tagged queries.
//!
//! A `ReactiveCell` holds a value and calls its observers whenever the value
//! changes. Every write gets a version number, handed to observers alongside
//! the value. A `ReactiveQuery` bound to a cell re-runs its fetch for every new
//! key and ignores notifications older than the last version it followed, so
//! racing writers cannot leave it on an older key than the cell holds.
//!
//! A query keeps a single result slot: the key it follows and the sequence
//! number of the latest invocation. A result is stored only if it answers that
//! invocation. Anything else is stale and dropped.

use crate::domain::ports::{ErrorInfo, RemoteResult};
use crate::sync::lock;
use futures::future::BoxFuture;
use std::sync::{Arc, Mutex, Weak};
use tokio::sync::watch;
use tracing::{debug, warn};

type Observer<V> = Arc<dyn Fn(&V, u64) + Send + Sync>;

/// A value with change observers.
pub struct ReactiveCell<V> {
    inner: Mutex<CellInner<V>>,
}

struct CellInner<V> {
    value: V,
    version: u64,
    observers: Vec<Observer<V>>,
}

impl<V: Clone + PartialEq> ReactiveCell<V> {
    pub fn new(value: V) -> Self {
        Self {
            inner: Mutex::new(CellInner {
                value,
                version: 0,
                observers: Vec::new(),
            }),
        }
    }

    pub fn get(&self) -> V {
        lock(&self.inner).value.clone()
    }

    /// Stores `value` and notifies observers if it differs from the current one.
    ///
    /// Observers run after the cell lock is released, so they may read the cell.
    /// Concurrent writers may notify out of order; observers receive the write's
    /// version to tell which notification is the latest.
    pub fn set(&self, value: V) -> bool {
        let (version, observers) = {
            let mut inner = lock(&self.inner);
            if inner.value == value {
                return false;
            }
            inner.value = value.clone();
            inner.version += 1;
            (inner.version, inner.observers.clone())
        };
        for observer in observers {
            observer(&value, version);
        }
        true
    }

    pub fn version(&self) -> u64 {
        lock(&self.inner).version
    }

    pub fn subscribe(&self, observer: impl Fn(&V, u64) + Send + Sync + 'static) {
        lock(&self.inner).observers.push(Arc::new(observer));
    }
}

/// Outcome of one query invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryResult<T> {
    Pending,
    Data(T),
    Error(ErrorInfo),
}

impl<T> QueryResult<T> {
    pub fn is_pending(&self) -> bool {
        matches!(self, QueryResult::Pending)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            QueryResult::Data(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ErrorInfo> {
        match self {
            QueryResult::Error(err) => Some(err),
            _ => None,
        }
    }
}

impl<T> From<RemoteResult<T>> for QueryResult<T> {
    fn from(result: RemoteResult<T>) -> Self {
        match result {
            Ok(data) => QueryResult::Data(data),
            Err(err) => QueryResult::Error(err),
        }
    }
}

/// The visible state of a query: the key it follows and that key's result.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot<K, T> {
    pub key: K,
    pub result: QueryResult<T>,
}

pub type Fetcher<K, T> = Arc<dyn Fn(K) -> BoxFuture<'static, RemoteResult<T>> + Send + Sync>;
type ErrorHook = Box<dyn Fn(&ErrorInfo) + Send + Sync>;

/// Builder for a query handle.
pub struct ReactiveQuery<K, T> {
    name: &'static str,
    fetcher: Fetcher<K, T>,
    on_error: Option<ErrorHook>,
}

struct QueryState<K> {
    key: K,
    /// Sequence number of the latest invocation; only its result is kept.
    issued: u64,
    /// Latest cell version this query acted on.
    followed: u64,
    invocations: u64,
}

struct QueryShared<K, T> {
    name: &'static str,
    fetcher: Fetcher<K, T>,
    on_error: Option<ErrorHook>,
    state: Mutex<QueryState<K>>,
    tx: watch::Sender<Snapshot<K, T>>,
}

/// Shared handle to a running query. Cloning shares the same query.
pub struct QueryHandle<K, T> {
    shared: Arc<QueryShared<K, T>>,
}

impl<K, T> Clone for QueryHandle<K, T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<K, T> ReactiveQuery<K, T>
where
    K: Clone + Eq + Send + Sync + std::fmt::Debug + 'static,
    T: Clone + Send + Sync + 'static,
{
    pub fn new<F>(name: &'static str, fetcher: F) -> Self
    where
        F: Fn(K) -> BoxFuture<'static, RemoteResult<T>> + Send + Sync + 'static,
    {
        Self {
            name,
            fetcher: Arc::new(fetcher),
            on_error: None,
        }
    }

    /// Called once for every error result that is not discarded as stale.
    pub fn on_error(mut self, hook: impl Fn(&ErrorInfo) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Box::new(hook));
        self
    }

    /// Starts the query for a fixed key. It only re-runs on `refresh`.
    ///
    /// Must be called within a tokio runtime.
    pub fn start(self, key: K) -> QueryHandle<K, T> {
        let (tx, _) = watch::channel(Snapshot {
            key: key.clone(),
            result: QueryResult::Pending,
        });
        let handle = QueryHandle {
            shared: Arc::new(QueryShared {
                name: self.name,
                fetcher: self.fetcher,
                on_error: self.on_error,
                state: Mutex::new(QueryState {
                    key: key.clone(),
                    issued: 0,
                    followed: 0,
                    invocations: 0,
                }),
                tx,
            }),
        };
        handle.invoke(key);
        handle
    }

    /// Starts the query keyed on `key_of(cell value)` and re-runs it whenever
    /// that key changes. Notifications older than the last one followed are
    /// ignored.
    pub fn bind<V>(
        self,
        cell: &ReactiveCell<V>,
        key_of: impl Fn(&V) -> K + Send + Sync + 'static,
    ) -> QueryHandle<K, T>
    where
        V: Clone + PartialEq,
    {
        let handle = self.start(key_of(&cell.get()));
        lock(&handle.shared.state).followed = cell.version();
        let weak: Weak<QueryShared<K, T>> = Arc::downgrade(&handle.shared);
        cell.subscribe(move |value, version| {
            let Some(shared) = weak.upgrade() else {
                return;
            };
            QueryHandle { shared }.follow(key_of(value), version);
        });
        handle
    }
}

impl<K, T> QueryHandle<K, T>
where
    K: Clone + Eq + Send + Sync + std::fmt::Debug + 'static,
    T: Clone + Send + Sync + 'static,
{
    /// Re-runs the query for its current key. The request is issued before
    /// this returns; its sequence number is returned.
    pub fn refresh(&self) -> u64 {
        let mut state = lock(&self.shared.state);
        let key = state.key.clone();
        self.issue(&mut state, key)
    }

    pub fn key(&self) -> K {
        lock(&self.shared.state).key.clone()
    }

    pub fn snapshot(&self) -> Snapshot<K, T> {
        self.shared.tx.borrow().clone()
    }

    pub fn result(&self) -> QueryResult<T> {
        self.shared.tx.borrow().result.clone()
    }

    pub fn is_pending(&self) -> bool {
        self.shared.tx.borrow().result.is_pending()
    }

    /// Total number of fetches issued, including refreshes.
    pub fn invocations(&self) -> u64 {
        lock(&self.shared.state).invocations
    }

    pub fn subscribe(&self) -> watch::Receiver<Snapshot<K, T>> {
        self.shared.tx.subscribe()
    }

    /// Waits until the current key's result is no longer pending.
    pub async fn settled(&self) -> Snapshot<K, T> {
        let mut rx = self.subscribe();
        match rx.wait_for(|snapshot| !snapshot.result.is_pending()).await {
            Ok(snapshot) => snapshot.clone(),
            // the sender lives inside `self`, so it cannot be dropped here
            Err(_) => self.snapshot(),
        }
    }

    fn invoke(&self, key: K) -> u64 {
        let mut state = lock(&self.shared.state);
        self.issue(&mut state, key)
    }

    /// Moves the query to the key of cell version `version`, unless a newer
    /// version was already followed.
    fn follow(&self, key: K, version: u64) {
        let mut state = lock(&self.shared.state);
        if version <= state.followed {
            debug!(query = self.shared.name, version, "Ignoring outdated cell notification");
            return;
        }
        state.followed = version;
        if state.key != key {
            self.issue(&mut state, key);
        }
    }

    /// Records a new invocation and spawns its fetch. The caller holds the
    /// state lock, so check-and-issue is atomic.
    fn issue(&self, state: &mut QueryState<K>, key: K) -> u64 {
        state.issued += 1;
        state.invocations += 1;
        let seq = state.issued;
        state.key = key.clone();
        self.shared.tx.send_replace(Snapshot {
            key: key.clone(),
            result: QueryResult::Pending,
        });
        debug!(query = self.shared.name, ?key, seq, "Issuing query");

        let fetch = (self.shared.fetcher)(key.clone());
        let weak = Arc::downgrade(&self.shared);
        tokio::spawn(async move {
            let result = fetch.await;
            if let Some(shared) = weak.upgrade() {
                QueryHandle { shared }.resolve(key, seq, result);
            }
        });
        seq
    }

    fn resolve(&self, key: K, seq: u64, result: RemoteResult<T>) {
        let error = {
            let state = lock(&self.shared.state);
            if state.key != key {
                debug!(query = self.shared.name, ?key, seq, "Discarding result for stale key");
                return;
            }
            if state.issued != seq {
                debug!(
                    query = self.shared.name,
                    ?key,
                    seq,
                    latest = state.issued,
                    "Discarding superseded result"
                );
                return;
            }
            let result = QueryResult::from(result);
            let error = result.error().cloned();
            self.shared.tx.send_replace(Snapshot { key, result });
            error
        };

        if let Some(err) = error {
            warn!(query = self.shared.name, error = %err, "Query failed");
            if let Some(hook) = &self.shared.on_error {
                hook(&err);
            }
        }
    }
}
