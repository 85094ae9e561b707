//! Observable async resource: `{data, loading, error}` plus `refetch`.
//!
//! # Design
//! A `Resource` wraps one producer. `observe(key)` runs it when the key is
//! new or differs by value from the last observed key; `refetch()` runs it
//! again for the last key. Both flip `loading` on and clear `error` before
//! returning, then hand back a future that applies the outcome when it
//! settles. Nothing is spawned here: the caller awaits or spawns that future.
//!
//! A failure sets `error` and leaves `data` as it was, so a view keeps
//! showing the previous snapshot.
//!
//! Calls are never coalesced or cancelled. Under `SettlePolicy::LastSettled`
//! every outcome is applied in settle order, so a slow, older call can
//! overwrite a newer one. `SettlePolicy::LatestIssued` tags each call with a
//! generation and drops outcomes from superseded calls.
//!
//! In-flight futures hold a weak handle. Once every `Resource` clone is gone,
//! a late outcome is dropped.

use std::fmt::Display;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, PoisonError, Weak};

use tokio::sync::watch;

use crate::error::{ApiError, Failure};

type Outcome<T> = Pin<Box<dyn Future<Output = Result<T, String>> + Send>>;
type Producer<K, T> = Arc<dyn Fn(&K) -> Outcome<T> + Send + Sync>;

/// Snapshot of a resource.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceState<T> {
    pub data: Option<T>,
    pub loading: bool,
    pub error: Option<String>,
}

impl<T> Default for ResourceState<T> {
    /// Nothing fetched yet, which renders as loading.
    fn default() -> Self {
        Self {
            data: None,
            loading: true,
            error: None,
        }
    }
}

/// Which settled outcomes a resource applies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SettlePolicy {
    /// Apply every outcome; the last to settle wins.
    #[default]
    LastSettled,
    /// Apply only the outcome of the most recently issued call.
    LatestIssued,
}

struct Tracking<K> {
    key: Option<K>,
    issued: u64,
}

struct Inner<K, T> {
    producer: Producer<K, T>,
    policy: SettlePolicy,
    state: watch::Sender<ResourceState<T>>,
    tracking: Mutex<Tracking<K>>,
}

impl<K, T> Inner<K, T> {
    fn settle(&self, generation: u64, outcome: Result<T, String>) {
        if self.policy == SettlePolicy::LatestIssued {
            let latest = self
                .tracking
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .issued;
            if generation != latest {
                tracing::debug!(generation, latest, "discarding superseded result");
                return;
            }
        }
        self.state.send_modify(|state| {
            match outcome {
                Ok(data) => state.data = Some(data),
                Err(message) => state.error = Some(message),
            }
            state.loading = false;
        });
    }
}

/// Handle to an observable resource. Clones share state.
pub struct Resource<K, T> {
    inner: Arc<Inner<K, T>>,
}

impl<K, T> Clone for Resource<K, T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, T> Resource<K, T>
where
    K: Clone + PartialEq + Send + Sync + 'static,
    T: Send + Sync + 'static,
{
    pub fn new<F, Fut, E>(producer: F) -> Self
    where
        F: Fn(&K) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        E: Display + 'static,
    {
        Self::with_policy(SettlePolicy::default(), producer)
    }

    pub fn with_policy<F, Fut, E>(policy: SettlePolicy, producer: F) -> Self
    where
        F: Fn(&K) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        E: Display + 'static,
    {
        let producer: Producer<K, T> = Arc::new(move |key: &K| {
            let pending = producer(key);
            Box::pin(async move { pending.await.map_err(|e| e.to_string()) }) as Outcome<T>
        });
        let (state, _) = watch::channel(ResourceState::default());
        Self {
            inner: Arc::new(Inner {
                producer,
                policy,
                state,
                tracking: Mutex::new(Tracking {
                    key: None,
                    issued: 0,
                }),
            }),
        }
    }

    /// Run the producer if `key` is the first key seen or differs from the
    /// last one. Returns the settle future, or `None` when nothing changed.
    pub fn observe(&self, key: K) -> Option<impl Future<Output = ()> + Send + 'static> {
        let generation = {
            let mut tracking = self.lock();
            if tracking.key.as_ref() == Some(&key) {
                return None;
            }
            tracking.key = Some(key.clone());
            tracking.issued += 1;
            tracking.issued
        };
        Some(self.start(generation, key))
    }

    /// Run the producer again for the last observed key. Before the first
    /// observation there is no key and the returned future does nothing.
    pub fn refetch(&self) -> impl Future<Output = ()> + Send + 'static {
        let started = {
            let mut tracking = self.lock();
            match tracking.key.clone() {
                Some(key) => {
                    tracking.issued += 1;
                    Some((tracking.issued, key))
                }
                None => None,
            }
        };
        let pending = started.map(|(generation, key)| self.start(generation, key));
        async move {
            if let Some(pending) = pending {
                pending.await;
            }
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<ResourceState<T>> {
        self.inner.state.subscribe()
    }

    pub fn state(&self) -> ResourceState<T>
    where
        T: Clone,
    {
        self.inner.state.borrow().clone()
    }

    pub fn policy(&self) -> SettlePolicy {
        self.inner.policy
    }

    fn start(&self, generation: u64, key: K) -> impl Future<Output = ()> + Send + 'static {
        self.inner.state.send_modify(|state| {
            state.loading = true;
            state.error = None;
        });
        let pending = (self.inner.producer)(&key);
        let weak: Weak<Inner<K, T>> = Arc::downgrade(&self.inner);
        async move {
            let outcome = pending.await;
            match weak.upgrade() {
                Some(inner) => inner.settle(generation, outcome),
                None => tracing::debug!(generation, "resource dropped before result settled"),
            }
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Tracking<K>> {
        self.inner
            .tracking
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T> Resource<(), T>
where
    T: Send + Sync + 'static,
{
    /// Resource with no dependency key, run by `observe(())`.
    pub fn unkeyed<F, Fut, E>(producer: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        E: Display + 'static,
    {
        Self::new(move |_: &()| producer())
    }
}

/// Run a blocking accessor call on tokio's blocking pool so it can serve as
/// a producer.
pub async fn blocking<T, F>(call: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, ApiError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(call)
        .await
        .map_err(|e| ApiError::RequestFailed(Failure::Transport(e.to_string())))?
}
