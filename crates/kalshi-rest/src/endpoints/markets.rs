//! Markets, orderbooks, trades and candlesticks

use std::collections::{BTreeMap, HashMap};

use serde_json::Value;
use tracing::{debug, instrument};

use kalshi_types::{
    GetMarketsParams, GetTradesParams, Market, MarketCandlesticksParams, MarketResponse,
    MarketsResponse, Orderbook, OrderbookParams, OrderbookResponse, Page, PageCap, Trade,
    TradesResponse,
};

use crate::error::RestResult;
use crate::pagination::PaginatedResource;
use crate::request::RestRequest;
use crate::transport::RestTransport;

/// Market data endpoints
pub struct MarketEndpoints<'a> {
    transport: &'a RestTransport,
}

impl<'a> MarketEndpoints<'a> {
    pub fn new(transport: &'a RestTransport) -> Self {
        Self { transport }
    }

    /// One page of markets
    #[instrument(skip(self))]
    pub async fn get_markets(&self, params: &GetMarketsParams) -> RestResult<Page<Market>> {
        let request = RestRequest::get("/markets").with_query(params)?;
        let response: MarketsResponse = self.transport.execute(request).await?;
        debug!(count = response.markets.len(), "Fetched markets");
        Ok(response.into())
    }

    pub fn paginate_markets(
        &self,
        params: GetMarketsParams,
        cap: PageCap,
    ) -> PaginatedResource<'_, Market> {
        PaginatedResource::from_params(params, move |p: GetMarketsParams| async move {
            self.get_markets(&p).await
        })
        .with_cap(cap)
    }

    #[instrument(skip(self))]
    pub async fn get_market(&self, ticker: &str) -> RestResult<Market> {
        let response: MarketResponse = self
            .transport
            .execute(RestRequest::get(format!("/markets/{ticker}")))
            .await?;
        Ok(response.market)
    }

    /// Resting bids per side, optionally limited to `depth` levels
    #[instrument(skip(self))]
    pub async fn get_orderbook(&self, ticker: &str, depth: Option<u32>) -> RestResult<Orderbook> {
        let request = RestRequest::get(format!("/markets/{ticker}/orderbook"))
            .with_query(&OrderbookParams { depth })?;
        let response: OrderbookResponse = self.transport.execute(request).await?;
        Ok(response.orderbook)
    }

    /// One page of public trades
    #[instrument(skip(self))]
    pub async fn get_trades(&self, params: &GetTradesParams) -> RestResult<Page<Trade>> {
        let request = RestRequest::get("/markets/trades").with_query(params)?;
        let response: TradesResponse = self.transport.execute(request).await?;
        Ok(response.into())
    }

    pub fn paginate_trades(&self, params: GetTradesParams, cap: PageCap) -> PaginatedResource<'_, Trade> {
        PaginatedResource::from_params(params, move |p: GetTradesParams| async move {
            self.get_trades(&p).await
        })
        .with_cap(cap)
    }

    /// OHLC candlesticks for one market
    #[instrument(skip(self))]
    pub async fn get_candlesticks(
        &self,
        series_ticker: &str,
        ticker: &str,
        params: &MarketCandlesticksParams,
    ) -> RestResult<Value> {
        let request =
            RestRequest::get(format!("/series/{series_ticker}/markets/{ticker}/candlesticks"))
                .with_query(params)?;
        self.transport.execute(request).await
    }

    /// Map each ticker to its market, over every page matching `params`
    #[instrument(skip(self))]
    pub async fn get_ticker_map(&self, params: GetMarketsParams) -> RestResult<HashMap<String, Market>> {
        let markets = self.paginate_markets(params, PageCap::unbounded()).collect().await?;
        Ok(ticker_map(markets))
    }

    /// Markets matching `params` whose `field` equals `value`
    #[instrument(skip(self, value))]
    pub async fn get_markets_by_field(
        &self,
        params: GetMarketsParams,
        field: &str,
        value: &Value,
    ) -> RestResult<Vec<Market>> {
        let markets = self.paginate_markets(params, PageCap::unbounded()).collect().await?;
        Ok(filter_by_field(markets, field, value))
    }
}

/// Ticker → market
pub fn ticker_map(markets: impl IntoIterator<Item = Market>) -> HashMap<String, Market> {
    markets.into_iter().map(|m| (m.ticker.clone(), m)).collect()
}

/// Group markets by the rendered value of `field`; markets without it go under `""`
pub fn group_by_field(
    markets: impl IntoIterator<Item = Market>,
    field: &str,
) -> BTreeMap<String, Vec<Market>> {
    let mut groups: BTreeMap<String, Vec<Market>> = BTreeMap::new();
    for market in markets {
        let key = match market.field(field) {
            Some(Value::String(s)) => s,
            Some(other) => other.to_string(),
            None => String::new(),
        };
        groups.entry(key).or_default().push(market);
    }
    groups
}

/// Keep markets whose `field` equals `value`
pub fn filter_by_field(markets: impl IntoIterator<Item = Market>, field: &str, value: &Value) -> Vec<Market> {
    markets
        .into_iter()
        .filter(|m| m.field(field).as_ref() == Some(value))
        .collect()
}
