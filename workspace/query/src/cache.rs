//! Query cache with in-flight de-duplication and manual invalidation.
//!
//! One [`CacheEntry`] exists per [`QueryKey`]. A key has at most one fetch in
//! flight; it is stored as a [`Shared`] future so every caller that wants the
//! same data awaits the same transport call. Results are applied only to the
//! key and epoch that started the fetch, so a slow response for a previous
//! filter combination never overwrites the current one.
//!
//! Everything here is single-threaded. Listener callbacks always run after
//! the internal `RefCell` borrow has been released, so they may call back
//! into the client.

use std::cell::{RefCell, RefMut};
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::Duration;

use futures::future::{FutureExt, LocalBoxFuture, Shared};
use tracing::{debug, info, trace, warn};
use web_time::Instant;

use crate::fetcher::ResourceFetcher;
use crate::request::{QueryKey, ResourceKind, ResourceRequest};
use crate::result::{FetchResult, ResourceResult};

/// Runs a background future on the current thread.
pub type Spawner = Rc<dyn Fn(LocalBoxFuture<'static, ()>)>;

type SharedFetch = Shared<LocalBoxFuture<'static, FetchResult>>;
type Listener = Rc<dyn Fn(&QuerySnapshot)>;
/// Subscriptions dropped while the cache was borrowed, applied on the next access.
type Unsubscribed = Rc<RefCell<Vec<(QueryKey, u64)>>>;

/// Limits on how many settled entries the cache keeps around.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvictionPolicy {
    pub max_entries: usize,
    /// Idle entries not accessed for this long are dropped.
    pub ttl: Duration,
}

impl Default for EvictionPolicy {
    fn default() -> Self {
        Self {
            max_entries: 64,
            ttl: Duration::from_secs(300),
        }
    }
}

/// Copy of one entry's state handed to consumers.
#[derive(Debug, Clone, PartialEq)]
pub struct QuerySnapshot {
    pub key: QueryKey,
    pub result: FetchResult,
    pub is_fetching: bool,
    pub is_stale: bool,
}

impl QuerySnapshot {
    /// Snapshot of a key the cache has not seen yet.
    pub fn loading(key: QueryKey) -> Self {
        Self {
            key,
            result: ResourceResult::Loading,
            is_fetching: false,
            is_stale: false,
        }
    }

    /// Showing previous data while a refetch runs.
    pub fn is_refreshing(&self) -> bool {
        self.is_fetching && !self.result.is_loading()
    }
}

struct CacheEntry {
    request: ResourceRequest,
    result: FetchResult,
    epoch: u64,
    stale: bool,
    in_flight: Option<SharedFetch>,
    listeners: Vec<(u64, Listener)>,
    last_access: Instant,
    access_tick: u64,
}

impl CacheEntry {
    fn new(request: ResourceRequest) -> Self {
        Self {
            request,
            result: ResourceResult::Loading,
            epoch: 0,
            stale: false,
            in_flight: None,
            listeners: Vec::new(),
            last_access: Instant::now(),
            access_tick: 0,
        }
    }

    fn snapshot(&self) -> QuerySnapshot {
        QuerySnapshot {
            key: self.request.key().clone(),
            result: self.result.clone(),
            is_fetching: self.in_flight.is_some(),
            is_stale: self.stale,
        }
    }

    /// Errors are kept until the next invalidation; they are not retried.
    fn needs_fetch(&self) -> bool {
        self.in_flight.is_none() && (self.stale || self.result.is_loading())
    }

    fn is_evictable(&self) -> bool {
        self.in_flight.is_none() && self.listeners.is_empty()
    }

    fn listeners(&self) -> Vec<Listener> {
        self.listeners.iter().map(|(_, listener)| Rc::clone(listener)).collect()
    }
}

struct CacheState {
    entries: HashMap<QueryKey, CacheEntry>,
    policy: EvictionPolicy,
    next_listener: u64,
    tick: u64,
}

impl CacheState {
    fn touch(&mut self, request: &ResourceRequest) -> &mut CacheEntry {
        self.tick += 1;
        let tick = self.tick;
        let entry = self
            .entries
            .entry(request.key().clone())
            .or_insert_with(|| CacheEntry::new(request.clone()));
        entry.last_access = Instant::now();
        entry.access_tick = tick;
        entry
    }

    /// Drops idle, unsubscribed entries that expired, then the least
    /// recently used ones while over capacity. Returns how many were removed.
    fn evict(&mut self, now: Instant) -> usize {
        let before = self.entries.len();
        let ttl = self.policy.ttl;
        self.entries
            .retain(|_, entry| !(entry.is_evictable() && now.duration_since(entry.last_access) >= ttl));

        if self.entries.len() > self.policy.max_entries {
            let mut idle: Vec<(u64, QueryKey)> = self
                .entries
                .iter()
                .filter(|(_, entry)| entry.is_evictable())
                .map(|(key, entry)| (entry.access_tick, key.clone()))
                .collect();
            idle.sort();
            let excess = self.entries.len() - self.policy.max_entries;
            for (_, key) in idle.into_iter().take(excess) {
                self.entries.remove(&key);
            }
        }

        let removed = before - self.entries.len();
        if removed > 0 {
            debug!(removed, remaining = self.entries.len(), "Evicted idle cache entries");
        }
        removed
    }

    fn remove_listener(&mut self, key: &QueryKey, id: u64) {
        if let Some(entry) = self.entries.get_mut(key) {
            entry.listeners.retain(|(listener_id, _)| *listener_id != id);
            trace!(%key, id, "Unsubscribed");
        }
    }
}

fn notify(listeners: Vec<Listener>, snapshot: &QuerySnapshot) {
    trace!(key = %snapshot.key, listeners = listeners.len(), "Notifying subscribers");
    for listener in listeners {
        listener(snapshot);
    }
}

/// Stores `result` on `key` if the fetch that produced it is still the
/// current one. Safe to call more than once for the same epoch.
fn settle(state: &RefCell<CacheState>, key: &QueryKey, epoch: u64, result: FetchResult) {
    let (snapshot, listeners) = {
        let mut state = state.borrow_mut();
        let Some(entry) = state.entries.get_mut(key) else {
            return;
        };
        if entry.epoch != epoch || entry.in_flight.is_none() {
            return;
        }
        entry.in_flight = None;
        entry.result = result;
        entry.stale = false;
        (entry.snapshot(), entry.listeners())
    };
    debug!(%key, epoch, "Fetch settled");
    notify(listeners, &snapshot);
}

/// Handle to the shared query cache. Cloning is cheap; every clone sees the
/// same entries.
#[derive(Clone)]
pub struct QueryClient {
    state: Rc<RefCell<CacheState>>,
    unsubscribed: Unsubscribed,
    fetcher: Rc<ResourceFetcher>,
    spawner: Spawner,
}

impl PartialEq for QueryClient {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }
}

impl fmt::Debug for QueryClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("QueryClient")
            .field("base_url", &self.fetcher.base_url())
            .field("entries", &state.entries.len())
            .field("policy", &state.policy)
            .finish()
    }
}

impl QueryClient {
    pub fn new(fetcher: ResourceFetcher, spawner: Spawner) -> Self {
        Self {
            state: Rc::new(RefCell::new(CacheState {
                entries: HashMap::new(),
                policy: EvictionPolicy::default(),
                next_listener: 0,
                tick: 0,
            })),
            unsubscribed: Rc::default(),
            fetcher: Rc::new(fetcher),
            spawner,
        }
    }

    pub fn with_policy(self, policy: EvictionPolicy) -> Self {
        self.state_mut().policy = policy;
        self
    }

    pub fn policy(&self) -> EvictionPolicy {
        self.state.borrow().policy
    }

    pub fn len(&self) -> usize {
        self.state.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current state of `key` without side effects.
    pub fn peek(&self, key: &QueryKey) -> Option<QuerySnapshot> {
        self.state.borrow().entries.get(key).map(CacheEntry::snapshot)
    }

    /// Returns the current snapshot for `request`, starting a background
    /// fetch when the entry is new or stale and idle.
    pub fn get_or_fetch(&self, request: &ResourceRequest) -> QuerySnapshot {
        let key = request.key().clone();
        let needs_fetch = self.state_mut().touch(request).needs_fetch();

        if needs_fetch {
            self.start_fetch(&key);
            self.state_mut().evict(Instant::now());
        } else {
            trace!(%key, "Cache hit");
        }

        self.peek(&key).unwrap_or_else(|| QuerySnapshot::loading(key))
    }

    /// Resolves to a settled result for `request`: the cached one when it is
    /// fresh, otherwise the result of the in-flight or a newly started fetch.
    pub async fn fetch(&self, request: &ResourceRequest) -> FetchResult {
        let key = request.key().clone();
        let cached = {
            let mut state = self.state_mut();
            let entry = state.touch(request);
            (!entry.needs_fetch() && entry.in_flight.is_none()).then(|| entry.result.clone())
        };
        if let Some(result) = cached {
            trace!(%key, "Cache hit");
            return result;
        }

        let Some((shared, epoch)) = self.start_fetch(&key) else {
            return self.fetcher.fetch(request).await;
        };
        self.state_mut().evict(Instant::now());

        let result = shared.await;
        settle(&self.state, &key, epoch, result.clone());
        result
    }

    /// Calls `listener` with a snapshot on every transition of `request`'s
    /// key until the returned [`Subscription`] is dropped. Starts a fetch
    /// when one is needed.
    pub fn subscribe(
        &self,
        request: &ResourceRequest,
        listener: impl Fn(&QuerySnapshot) + 'static,
    ) -> Subscription {
        let id = {
            let mut state = self.state_mut();
            let id = state.next_listener;
            state.next_listener += 1;
            state.touch(request).listeners.push((id, Rc::new(listener)));
            id
        };
        debug!(key = %request.key(), id, "Subscribed");
        self.get_or_fetch(request);

        Subscription {
            state: Rc::downgrade(&self.state),
            unsubscribed: Rc::downgrade(&self.unsubscribed),
            key: request.key().clone(),
            id,
        }
    }

    /// Marks every entry stale and refetches the subscribed ones. Previous
    /// results stay visible until the refetch settles.
    pub fn invalidate_all(&self) {
        let count = self.invalidate_where(|_| true);
        info!(count, "Invalidated all queries");
    }

    /// Same as [`invalidate_all`](Self::invalidate_all), limited to one kind.
    pub fn invalidate_kind(&self, kind: ResourceKind) {
        let count = self.invalidate_where(|entry| entry.request.kind() == kind);
        info!(count, %kind, "Invalidated queries");
    }

    /// Removes expired and surplus idle entries now.
    pub fn evict_idle(&self) -> usize {
        self.state_mut().evict(Instant::now())
    }

    /// Borrows the cache state after applying queued unsubscriptions.
    fn state_mut(&self) -> RefMut<'_, CacheState> {
        let mut state = self.state.borrow_mut();
        for (key, id) in self.unsubscribed.take() {
            state.remove_listener(&key, id);
        }
        state
    }

    fn invalidate_where(&self, matches: impl Fn(&CacheEntry) -> bool) -> usize {
        let mut refetch = Vec::new();
        let mut notifications = Vec::new();
        let mut count = 0;

        {
            let mut state = self.state_mut();
            for (key, entry) in state.entries.iter_mut().filter(|(_, entry)| matches(entry)) {
                count += 1;
                entry.stale = true;
                if entry.listeners.is_empty() {
                    continue;
                }
                if entry.in_flight.is_none() {
                    refetch.push(key.clone());
                } else {
                    notifications.push((entry.snapshot(), entry.listeners()));
                }
            }
        }

        for (snapshot, listeners) in notifications {
            notify(listeners, &snapshot);
        }
        for key in refetch {
            self.start_fetch(&key);
        }
        count
    }

    /// Returns the in-flight fetch of `key` with its epoch, starting one if
    /// the entry is idle. `None` only when the entry does not exist.
    fn start_fetch(&self, key: &QueryKey) -> Option<(SharedFetch, u64)> {
        let (shared, epoch, snapshot, listeners) = {
            let mut state = self.state_mut();
            let entry = state.entries.get_mut(key)?;

            if let Some(shared) = &entry.in_flight {
                debug!(%key, "Attaching to in-flight fetch");
                return Some((shared.clone(), entry.epoch));
            }

            entry.epoch += 1;
            let fetcher = Rc::clone(&self.fetcher);
            let request = entry.request.clone();
            let shared = async move { fetcher.fetch(&request).await }
                .boxed_local()
                .shared();
            entry.in_flight = Some(shared.clone());
            (shared, entry.epoch, entry.snapshot(), entry.listeners())
        };
        debug!(%key, epoch, "Starting fetch");

        let driver = {
            let shared = shared.clone();
            let state: Weak<RefCell<CacheState>> = Rc::downgrade(&self.state);
            let key = key.clone();
            async move {
                let result = shared.await;
                if let Some(state) = state.upgrade() {
                    settle(&state, &key, epoch, result);
                }
            }
        };
        (self.spawner)(driver.boxed_local());

        notify(listeners, &snapshot);
        Some((shared, epoch))
    }
}

/// Keeps a listener registered. Dropping it unsubscribes.
pub struct Subscription {
    state: Weak<RefCell<CacheState>>,
    unsubscribed: Weak<RefCell<Vec<(QueryKey, u64)>>>,
    key: QueryKey,
    id: u64,
}

impl Subscription {
    pub fn key(&self) -> &QueryKey {
        &self.key
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("key", &self.key)
            .field("id", &self.id)
            .finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let Some(state) = self.state.upgrade() else {
            return;
        };
        match state.try_borrow_mut() {
            Ok(mut state) => state.remove_listener(&self.key, self.id),
            // dropped from inside the cache, e.g. by a listener that owned it
            Err(_) => match self.unsubscribed.upgrade() {
                Some(queue) => {
                    debug!(key = %self.key, id = self.id, "Cache busy, queueing unsubscribe");
                    queue.borrow_mut().push((self.key.clone(), self.id));
                }
                None => warn!(key = %self.key, id = self.id, "Listener left registered"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::filter::{FilterAction, FilterState};
    use crate::result::ResourceData;
    use crate::testing::{self, FakeTransport};
    use common::Target;
    use tokio::task::LocalSet;

    fn client(transport: &Rc<FakeTransport>) -> QueryClient {
        let spawner: Spawner = Rc::new(|future: LocalBoxFuture<'static, ()>| {
            tokio::task::spawn_local(future);
        });
        QueryClient::new(ResourceFetcher::new(transport.clone(), testing::BASE_URL), spawner)
    }

    fn request(kind: ResourceKind, city: &str) -> ResourceRequest {
        let state = Rc::new(FilterState::default()).reduce(FilterAction::SetCity(city.into()));
        ResourceRequest::derive(kind, &state, Target::Price)
    }

    fn forecast_value(result: &FetchResult) -> f64 {
        result.data().and_then(|d| d.as_forecast()).unwrap().data[0].value
    }

    #[tokio::test]
    async fn test_concurrent_requests_share_one_transport_call() {
        let _guard = testing::init_test_tracing();
        LocalSet::new()
            .run_until(async {
                let transport = Rc::new(FakeTransport::new());
                let forecast = request(ResourceKind::Forecast, "Calgary");
                let path = forecast.path_and_query().to_string();
                transport.respond(&path, 200, testing::forecast_json("Calgary", Target::Price, 500000.0));
                let gate = transport.pause(&path);
                let client = client(&transport);

                let first = client.get_or_fetch(&forecast);
                let second = client.get_or_fetch(&forecast);
                assert!(first.result.is_loading() && first.is_fetching);
                assert!(second.is_fetching);

                gate.release();
                let (a, b) = futures::join!(client.fetch(&forecast), client.fetch(&forecast));
                assert_eq!(a, b);
                assert_eq!(forecast_value(&a), 500000.0);
                assert_eq!(transport.call_count(&path), 1);
            })
            .await;
    }

    #[tokio::test]
    async fn test_invalidate_keeps_previous_data_until_refetch_settles() {
        let _guard = testing::init_test_tracing();
        LocalSet::new()
            .run_until(async {
                let transport = Rc::new(FakeTransport::new());
                let forecast = request(ResourceKind::Forecast, "Calgary");
                let path = forecast.path_and_query().to_string();
                transport.respond(&path, 200, testing::forecast_json("Calgary", Target::Price, 100.0));
                let client = client(&transport);
                assert_eq!(forecast_value(&client.fetch(&forecast).await), 100.0);

                let seen: Rc<RefCell<Vec<QuerySnapshot>>> = Rc::default();
                let sink = Rc::clone(&seen);
                let _subscription = client.subscribe(&forecast, move |snapshot| {
                    sink.borrow_mut().push(snapshot.clone());
                });

                let gate = transport.pause(&path);
                transport.respond(&path, 200, testing::forecast_json("Calgary", Target::Price, 200.0));
                client.invalidate_all();

                let during = client.peek(forecast.key()).unwrap();
                assert!(during.is_fetching && during.is_stale && during.is_refreshing());
                assert_eq!(forecast_value(&during.result), 100.0);

                gate.release();
                assert_eq!(forecast_value(&client.fetch(&forecast).await), 200.0);

                let after = client.peek(forecast.key()).unwrap();
                assert!(!after.is_fetching && !after.is_stale);
                let seen = seen.borrow();
                assert!(!seen.is_empty());
                assert!(seen.iter().all(|snapshot| snapshot.result.data().is_some()));
                assert_eq!(forecast_value(&seen.last().unwrap().result), 200.0);
                assert_eq!(transport.call_count(&path), 2);
            })
            .await;
    }

    #[tokio::test]
    async fn test_failure_is_isolated_per_key_and_not_retried() {
        let _guard = testing::init_test_tracing();
        LocalSet::new()
            .run_until(async {
                let transport = Rc::new(FakeTransport::new());
                let risk = request(ResourceKind::Risk, "Toronto");
                let sentiment = request(ResourceKind::Sentiment, "Toronto");
                transport.respond(risk.path_and_query(), 500, "");
                transport.respond(sentiment.path_and_query(), 200, r#"{"city":"Toronto","items":[]}"#);
                let client = client(&transport);

                let (risk_result, sentiment_result) =
                    futures::join!(client.fetch(&risk), client.fetch(&sentiment));
                assert_eq!(risk_result.error().unwrap().kind(), ErrorKind::HttpError);
                assert!(sentiment_result.data().is_some());

                // errors stay until invalidated
                client.get_or_fetch(&risk);
                assert_eq!(transport.call_count(risk.path_and_query()), 1);

                transport.respond(risk.path_and_query(), 200, testing::risk_json("Toronto", 64.0));
                client.invalidate_kind(ResourceKind::Risk);
                let refreshed = client.fetch(&risk).await;
                assert_eq!(refreshed.data().and_then(|d| d.as_risk()).unwrap().score, 64.0);
                assert_eq!(transport.call_count(sentiment.path_and_query()), 1);
                assert!(!client.peek(sentiment.key()).unwrap().is_stale);
            })
            .await;
    }

    #[tokio::test]
    async fn test_late_result_lands_on_original_key() {
        let _guard = testing::init_test_tracing();
        LocalSet::new()
            .run_until(async {
                let transport = Rc::new(FakeTransport::new());
                let calgary = request(ResourceKind::Forecast, "Calgary");
                let kelowna = request(ResourceKind::Forecast, "Kelowna");
                transport.respond(calgary.path_and_query(), 200, testing::forecast_json("Calgary", Target::Price, 1.0));
                transport.respond(kelowna.path_and_query(), 200, testing::forecast_json("Kelowna", Target::Price, 2.0));
                let gate = transport.pause(calgary.path_and_query());
                let client = client(&transport);

                client.get_or_fetch(&calgary);
                let current = client.fetch(&kelowna).await;
                assert_eq!(forecast_value(&current), 2.0);
                assert!(client.peek(calgary.key()).unwrap().result.is_loading());

                gate.release();
                let late = client.fetch(&calgary).await;
                let data = late.data().and_then(|d| d.as_forecast()).unwrap();
                assert_eq!(data.city, "Calgary");
                let kelowna_now = client.peek(kelowna.key()).unwrap();
                assert_eq!(forecast_value(&kelowna_now.result), 2.0);
            })
            .await;
    }

    #[tokio::test]
    async fn test_eviction_spares_subscribed_and_in_flight_entries() {
        let _guard = testing::init_test_tracing();
        LocalSet::new()
            .run_until(async {
                let transport = Rc::new(FakeTransport::new());
                let client = client(&transport).with_policy(EvictionPolicy {
                    max_entries: 1,
                    ttl: Duration::from_secs(3600),
                });
                let calgary = request(ResourceKind::Risk, "Calgary");
                let kelowna = request(ResourceKind::Risk, "Kelowna");
                let toronto = request(ResourceKind::Risk, "Toronto");
                for req in [&calgary, &kelowna, &toronto] {
                    transport.respond(req.path_and_query(), 200, testing::risk_json(req.city(), 50.0));
                }

                let _subscription = client.subscribe(&calgary, |_| {});
                client.fetch(&calgary).await;
                client.fetch(&kelowna).await;
                let gate = transport.pause(toronto.path_and_query());
                client.get_or_fetch(&toronto);

                assert!(client.peek(calgary.key()).is_some());
                assert!(client.peek(kelowna.key()).is_none());
                assert!(client.peek(toronto.key()).unwrap().is_fetching);

                gate.release();
                client.fetch(&toronto).await;
                assert_eq!(client.len(), 2);
            })
            .await;
    }

    #[tokio::test]
    async fn test_ttl_drops_idle_entries_and_unsubscribe_on_drop() {
        let _guard = testing::init_test_tracing();
        LocalSet::new()
            .run_until(async {
                let transport = Rc::new(FakeTransport::new());
                transport.respond("/cities", 200, testing::cities_json());
                let client = client(&transport).with_policy(EvictionPolicy {
                    max_entries: 64,
                    ttl: Duration::ZERO,
                });
                let cities = ResourceRequest::cities();

                let subscription = client.subscribe(&cities, |_| {});
                let result = client.fetch(&cities).await;
                assert!(matches!(result.data().map(|d| &**d), Some(ResourceData::Cities(_))));
                assert_eq!(client.evict_idle(), 0);

                drop(subscription);
                assert_eq!(client.evict_idle(), 1);
                assert!(client.is_empty());
            })
            .await;
    }

    #[tokio::test]
    async fn test_subscription_dropped_inside_cache_is_released_later() {
        let _guard = testing::init_test_tracing();
        LocalSet::new()
            .run_until(async {
                let transport = Rc::new(FakeTransport::new());
                transport.respond("/cities", 200, testing::cities_json());
                let risk = request(ResourceKind::Risk, "Calgary");
                transport.respond(risk.path_and_query(), 200, testing::risk_json("Calgary", 40.0));
                let client = client(&transport).with_policy(EvictionPolicy {
                    max_entries: 64,
                    ttl: Duration::ZERO,
                });
                let cities = ResourceRequest::cities();

                // the cities listener owns the risk subscription, so dropping it
                // releases the risk subscription while the cache is borrowed
                let held = client.subscribe(&risk, |_| {});
                let subscription = client.subscribe(&cities, move |_| {
                    let _key = held.key();
                });
                client.fetch(&cities).await;
                client.fetch(&risk).await;
                assert_eq!(client.evict_idle(), 0);

                drop(subscription);
                assert_eq!(client.evict_idle(), 2);
                assert!(client.is_empty());

                client.invalidate_all();
                assert_eq!(transport.call_count(risk.path_and_query()), 1);
            })
            .await;
    }

    #[tokio::test]
    async fn test_listener_may_reenter_client() {
        let _guard = testing::init_test_tracing();
        LocalSet::new()
            .run_until(async {
                let transport = Rc::new(FakeTransport::new());
                transport.respond("/cities", 200, testing::cities_json());
                let client = client(&transport);
                let cities = ResourceRequest::cities();

                let reentrant = client.clone();
                let key = cities.key().clone();
                let observed = Rc::new(RefCell::new(0));
                let counter = Rc::clone(&observed);
                let _subscription = client.subscribe(&cities, move |_| {
                    assert!(reentrant.peek(&key).is_some());
                    *counter.borrow_mut() += 1;
                });

                client.fetch(&cities).await;
                // fetching, then settled
                assert_eq!(*observed.borrow(), 2);
            })
            .await;
    }
}
