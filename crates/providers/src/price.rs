//! The token price client and its cached fetcher.

use crate::{Clock, ProviderError, TtlCache};
use reqwest::{header, Client, Url};
use rollups_primitives::Sourced;
use serde::Deserialize;
use serde_json::Value;
use std::{collections::HashMap, fmt::Debug, sync::Arc, time::Duration};

/// An implementation of the trait can quote the USD price of a token.
#[async_trait::async_trait]
#[auto_impl::auto_impl(&, Arc)]
pub trait PriceProvider: Debug + Send + Sync {
    /// Returns the USD price of the token. Missing, zero or non-numeric quotes are errors.
    async fn usd_price(&self, token_id: &str) -> Result<f64, ProviderError>;
}

/// A [`PriceProvider`] backed by the CoinGecko simple price API.
#[derive(Debug, Clone)]
pub struct CoinGeckoClient {
    client: Client,
    base: Url,
}

#[derive(Debug, Deserialize)]
struct Quote {
    #[serde(default)]
    usd: Option<Value>,
}

impl CoinGeckoClient {
    /// Returns a new [`CoinGeckoClient`] for the API rooted at `base`.
    pub const fn new(client: Client, base: Url) -> Self {
        Self { client, base }
    }

    fn price_url(&self, token_id: &str) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(["simple", "price"]);
        }
        url.query_pairs_mut().append_pair("ids", token_id).append_pair("vs_currencies", "usd");
        url
    }
}

#[async_trait::async_trait]
impl PriceProvider for CoinGeckoClient {
    async fn usd_price(&self, token_id: &str) -> Result<f64, ProviderError> {
        let url = self.price_url(token_id);
        tracing::debug!(target: "rollups::providers", %url, "fetching token price");
        let quotes = self
            .client
            .get(url)
            .header(header::ACCEPT, "application/json")
            .send()
            .await?
            .error_for_status()?
            .json::<HashMap<String, Quote>>()
            .await?;

        quotes
            .get(token_id)
            .and_then(|quote| quote.usd.as_ref())
            .and_then(Value::as_f64)
            .filter(|price| price.is_finite() && *price > 0.0)
            .ok_or_else(|| ProviderError::MissingPrice(token_id.to_string()))
    }
}

/// Serves the token price through a time-to-live cache, falling back to the last known price.
#[derive(Debug)]
pub struct PriceFetcher {
    provider: Arc<dyn PriceProvider>,
    token_id: String,
    cache: TtlCache<String, f64>,
}

impl PriceFetcher {
    /// Returns a new [`PriceFetcher`] for the token.
    pub fn new(
        provider: Arc<dyn PriceProvider>,
        token_id: impl Into<String>,
        ttl: Duration,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self { provider, token_id: token_id.into(), cache: TtlCache::new(ttl, clock) }
    }

    /// Returns the USD price of the token.
    ///
    /// Within the time-to-live of the last successful quote no request is made. On failure, the
    /// last known price is returned regardless of its age, or [`None`] if no quote ever succeeded.
    pub async fn price(&self) -> Sourced<Option<f64>> {
        if let Some(price) = self.cache.get(self.token_id.as_str()) {
            tracing::trace!(target: "rollups::providers", price, "price cache hit");
            return Sourced::cached(Some(price));
        }

        match self.provider.usd_price(&self.token_id).await {
            Ok(price) => {
                self.cache.insert(self.token_id.clone(), price);
                Sourced::fetched(Some(price))
            }
            Err(err) => {
                let last = self.cache.last(self.token_id.as_str());
                tracing::warn!(target: "rollups::providers", ?err, ?last, token = %self.token_id, "failed to fetch price");
                Sourced::fallback(last)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{ManualClock, MockPriceProvider};
    use rollups_primitives::Origin;

    fn fetcher(provider: &MockPriceProvider, clock: &ManualClock) -> PriceFetcher {
        PriceFetcher::new(
            Arc::new(provider.clone()),
            "avail",
            Duration::from_secs(300),
            Arc::new(clock.clone()),
        )
    }

    #[tokio::test]
    async fn test_price_is_cached_within_ttl() -> eyre::Result<()> {
        let provider = MockPriceProvider::new(Some(0.12));
        let clock = ManualClock::new();
        let fetcher = fetcher(&provider, &clock);

        assert_eq!(fetcher.price().await, Sourced::fetched(Some(0.12)));
        clock.advance(Duration::from_secs(120));
        assert_eq!(fetcher.price().await, Sourced::cached(Some(0.12)));
        assert_eq!(provider.calls(), 1);

        clock.advance(Duration::from_secs(180));
        provider.set_price(Some(0.2));
        assert_eq!(fetcher.price().await, Sourced::fetched(Some(0.2)));
        assert_eq!(provider.calls(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn test_failure_returns_last_known_price() -> eyre::Result<()> {
        let provider = MockPriceProvider::new(Some(0.12));
        let clock = ManualClock::new();
        let fetcher = fetcher(&provider, &clock);
        fetcher.price().await;

        provider.set_price(None);
        clock.advance(Duration::from_secs(3600));
        let price = fetcher.price().await;
        assert_eq!(price.value, Some(0.12));
        assert_eq!(price.origin, Origin::Fallback);

        Ok(())
    }

    #[tokio::test]
    async fn test_failure_without_prior_success_is_none() -> eyre::Result<()> {
        let provider = MockPriceProvider::new(None);
        let fetcher = fetcher(&provider, &ManualClock::new());

        assert_eq!(fetcher.price().await, Sourced::fallback(None));
        assert_eq!(fetcher.price().await, Sourced::fallback(None));
        assert_eq!(provider.calls(), 2);

        Ok(())
    }

    #[test]
    fn test_price_url() {
        let client = CoinGeckoClient::new(
            Client::new(),
            Url::parse("https://api.coingecko.com/api/v3").unwrap(),
        );
        assert_eq!(
            client.price_url("avail").as_str(),
            "https://api.coingecko.com/api/v3/simple/price?ids=avail&vs_currencies=usd"
        );

        let client =
            CoinGeckoClient::new(Client::new(), Url::parse("http://localhost:8080/").unwrap());
        assert_eq!(
            client.price_url("avail").as_str(),
            "http://localhost:8080/simple/price?ids=avail&vs_currencies=usd"
        );
    }

    #[test]
    fn test_quote_parsing() {
        let quotes: HashMap<String, Quote> =
            serde_json::from_str(r#"{"avail":{"usd":0.0891},"other":{"usd":"n/a"}}"#).unwrap();
        assert_eq!(quotes["avail"].usd.as_ref().and_then(Value::as_f64), Some(0.0891));
        assert_eq!(quotes["other"].usd.as_ref().and_then(Value::as_f64), None);
    }
}
