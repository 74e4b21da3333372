//! Test utils for providers.

use crate::{
    Clock, IndexerProvider, PriceProvider, ProviderError, SubmissionAggregate, SubmissionHistory,
};
use parking_lot::Mutex;
use std::{
    collections::{HashMap, HashSet},
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc,
    },
    time::{Duration, Instant},
};
use tokio::sync::Semaphore;

/// A [`Clock`] that only moves when advanced.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<Instant>>,
}

impl ManualClock {
    /// Returns a new clock standing at the current instant.
    pub fn new() -> Self {
        Self { now: Arc::new(Mutex::new(Instant::now())) }
    }

    /// Moves the clock forward.
    pub fn advance(&self, duration: Duration) {
        *self.now.lock() += duration;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock()
    }
}

#[derive(Debug, Default)]
struct MockIndexerInner {
    aggregates: Mutex<HashMap<Option<u32>, SubmissionAggregate>>,
    sizes: Mutex<HashMap<(u32, String), u128>>,
    histories: Mutex<HashMap<(u32, String), SubmissionHistory>>,
    failing: AtomicBool,
    failing_app_ids: Mutex<HashSet<u32>>,
    gate: Mutex<Option<Arc<Semaphore>>>,
    aggregate_calls: AtomicUsize,
    size_calls: AtomicUsize,
    history_requests: Mutex<Vec<(u32, u32, u64)>>,
}

/// An in-memory [`IndexerProvider`].
///
/// Unknown queries answer with empty results. Calls can be made to fail, globally or per
/// application id, and can be held until [`MockIndexer::release`] is called.
#[derive(Debug, Clone, Default)]
pub struct MockIndexer {
    inner: Arc<MockIndexerInner>,
}

impl MockIndexer {
    /// Sets the aggregate answered for the application id, or for the whole network.
    pub fn with_aggregate(self, app_id: Option<u32>, aggregate: SubmissionAggregate) -> Self {
        self.inner.aggregates.lock().insert(app_id, aggregate);
        self
    }

    /// Sets the blob size answered for the signer under the application id.
    pub fn with_size(self, app_id: u32, address: &str, bytes: u128) -> Self {
        self.inner.sizes.lock().insert((app_id, address.to_string()), bytes);
        self
    }

    /// Sets the full history of the signer under the application id. Requests are answered with
    /// the `first`/`offset` window of both lists.
    pub fn with_history(self, app_id: u32, address: &str, history: SubmissionHistory) -> Self {
        self.inner.histories.lock().insert((app_id, address.to_string()), history);
        self
    }

    /// Makes every call fail, or succeed again.
    pub fn set_failing(&self, failing: bool) {
        self.inner.failing.store(failing, Ordering::SeqCst);
    }

    /// Makes every call about the application id fail.
    pub fn fail_app_id(&self, app_id: u32) {
        self.inner.failing_app_ids.lock().insert(app_id);
    }

    /// Holds every subsequent call until [`MockIndexer::release`].
    pub fn hold(&self) {
        *self.inner.gate.lock() = Some(Arc::new(Semaphore::new(0)));
    }

    /// Lets held and subsequent calls through.
    pub fn release(&self) {
        if let Some(gate) = self.inner.gate.lock().take() {
            gate.add_permits(1024);
        }
    }

    /// Returns the number of aggregate queries.
    pub fn aggregate_calls(&self) -> usize {
        self.inner.aggregate_calls.load(Ordering::SeqCst)
    }

    /// Returns the number of signer size queries.
    pub fn size_calls(&self) -> usize {
        self.inner.size_calls.load(Ordering::SeqCst)
    }

    /// Returns the `(app_id, first, offset)` of every history query.
    pub fn history_requests(&self) -> Vec<(u32, u32, u64)> {
        self.inner.history_requests.lock().clone()
    }

    async fn checkpoint(&self, app_id: Option<u32>) -> Result<(), ProviderError> {
        let gate = self.inner.gate.lock().clone();
        if let Some(gate) = gate {
            let _permit =
                gate.acquire().await.map_err(|_| ProviderError::Other("mock indexer closed"))?;
        }
        let failing_app_id =
            app_id.is_some_and(|id| self.inner.failing_app_ids.lock().contains(&id));
        if self.inner.failing.load(Ordering::SeqCst) || failing_app_id {
            return Err(ProviderError::Other("mock indexer failure"));
        }
        Ok(())
    }
}

fn window<T: Clone>(items: &[T], first: u32, offset: u64) -> Vec<T> {
    let offset = usize::try_from(offset).unwrap_or(usize::MAX);
    items.iter().skip(offset).take(first as usize).cloned().collect()
}

#[async_trait::async_trait]
impl IndexerProvider for MockIndexer {
    async fn aggregate_stats(
        &self,
        app_id: Option<u32>,
    ) -> Result<SubmissionAggregate, ProviderError> {
        self.inner.aggregate_calls.fetch_add(1, Ordering::SeqCst);
        self.checkpoint(app_id).await?;
        Ok(self.inner.aggregates.lock().get(&app_id).cloned().unwrap_or_default())
    }

    async fn signer_byte_size(&self, app_id: u32, address: &str) -> Result<u128, ProviderError> {
        self.inner.size_calls.fetch_add(1, Ordering::SeqCst);
        self.checkpoint(Some(app_id)).await?;
        Ok(self
            .inner
            .sizes
            .lock()
            .get(&(app_id, address.to_string()))
            .copied()
            .unwrap_or_default())
    }

    async fn submission_history(
        &self,
        app_id: u32,
        address: &str,
        first: u32,
        offset: u64,
    ) -> Result<SubmissionHistory, ProviderError> {
        self.inner.history_requests.lock().push((app_id, first, offset));
        self.checkpoint(Some(app_id)).await?;
        let histories = self.inner.histories.lock();
        let Some(history) = histories.get(&(app_id, address.to_string())) else {
            return Ok(SubmissionHistory::default());
        };
        Ok(SubmissionHistory {
            submissions: window(&history.submissions, first, offset),
            submissions_total: history.submissions_total,
            extrinsics: window(&history.extrinsics, first, offset),
            extrinsics_total: history.extrinsics_total,
        })
    }
}

/// An in-memory [`PriceProvider`] quoting a settable price.
#[derive(Debug, Clone, Default)]
pub struct MockPriceProvider {
    price: Arc<Mutex<Option<f64>>>,
    calls: Arc<AtomicUsize>,
}

impl MockPriceProvider {
    /// Returns a provider quoting `price`, or failing if [`None`].
    pub fn new(price: Option<f64>) -> Self {
        Self { price: Arc::new(Mutex::new(price)), calls: Arc::default() }
    }

    /// Sets the quoted price. [`None`] makes the provider fail.
    pub fn set_price(&self, price: Option<f64>) {
        *self.price.lock() = price;
    }

    /// Returns the number of quotes requested.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl PriceProvider for MockPriceProvider {
    async fn usd_price(&self, token_id: &str) -> Result<f64, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let price = *self.price.lock();
        price.ok_or_else(|| ProviderError::MissingPrice(token_id.to_string()))
    }
}
