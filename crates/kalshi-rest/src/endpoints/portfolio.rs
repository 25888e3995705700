//! Balance, positions, fills and settlements

use tracing::{debug, instrument};

use kalshi_types::{
    Balance, Fill, FillsResponse, GetFillsParams, GetPositionsParams, GetSettlementsParams,
    MarketPosition, Page, PageCap, PositionsResponse, RestingOrderValue, Settlement,
    SettlementsResponse,
};

use crate::error::RestResult;
use crate::pagination::PaginatedResource;
use crate::request::RestRequest;
use crate::transport::RestTransport;

/// Portfolio endpoints
pub struct PortfolioEndpoints<'a> {
    transport: &'a RestTransport,
}

impl<'a> PortfolioEndpoints<'a> {
    pub fn new(transport: &'a RestTransport) -> Self {
        Self { transport }
    }

    /// Available balance, in cents
    #[instrument(skip(self))]
    pub async fn get_balance(&self) -> RestResult<Balance> {
        debug!("Fetching balance");
        self.transport.execute(RestRequest::get("/portfolio/balance")).await
    }

    /// One page of positions, per market and per event
    #[instrument(skip(self))]
    pub async fn get_positions(&self, params: &GetPositionsParams) -> RestResult<PositionsResponse> {
        let request = RestRequest::get("/portfolio/positions").with_query(params)?;
        self.transport.execute(request).await
    }

    /// Walk every page of market positions
    pub fn paginate_positions(
        &self,
        params: GetPositionsParams,
        cap: PageCap,
    ) -> PaginatedResource<'_, MarketPosition> {
        PaginatedResource::from_params(params, move |p: GetPositionsParams| async move {
            self.get_positions(&p).await.map(Page::from)
        })
        .with_cap(cap)
    }

    /// Market positions with non-zero exposure
    #[instrument(skip(self))]
    pub async fn get_exposed_positions(
        &self,
        params: GetPositionsParams,
    ) -> RestResult<Vec<MarketPosition>> {
        let positions = self
            .paginate_positions(params, PageCap::unbounded())
            .collect()
            .await?;
        Ok(positions.into_iter().filter(MarketPosition::is_exposed).collect())
    }

    /// Sum of absolute market exposure across all positions, in cents
    #[instrument(skip(self))]
    pub async fn get_total_market_exposure(&self) -> RestResult<i64> {
        let positions = self
            .paginate_positions(GetPositionsParams::default(), PageCap::unbounded())
            .collect()
            .await?;
        Ok(total_exposure(&positions))
    }

    /// One page of fills
    #[instrument(skip(self))]
    pub async fn get_fills(&self, params: &GetFillsParams) -> RestResult<Page<Fill>> {
        let request = RestRequest::get("/portfolio/fills").with_query(params)?;
        let response: FillsResponse = self.transport.execute(request).await?;
        Ok(response.into())
    }

    pub fn paginate_fills(&self, params: GetFillsParams, cap: PageCap) -> PaginatedResource<'_, Fill> {
        PaginatedResource::from_params(params, move |p: GetFillsParams| async move {
            self.get_fills(&p).await
        })
        .with_cap(cap)
    }

    /// One page of settlements
    #[instrument(skip(self))]
    pub async fn get_settlements(&self, params: &GetSettlementsParams) -> RestResult<Page<Settlement>> {
        let request = RestRequest::get("/portfolio/settlements").with_query(params)?;
        let response: SettlementsResponse = self.transport.execute(request).await?;
        Ok(response.into())
    }

    pub fn paginate_settlements(
        &self,
        params: GetSettlementsParams,
        cap: PageCap,
    ) -> PaginatedResource<'_, Settlement> {
        PaginatedResource::from_params(params, move |p: GetSettlementsParams| async move {
            self.get_settlements(&p).await
        })
        .with_cap(cap)
    }

    /// Total value of resting orders, in cents
    #[instrument(skip(self))]
    pub async fn get_resting_order_value(&self) -> RestResult<RestingOrderValue> {
        self.transport
            .execute(RestRequest::get("/portfolio/summary/total_resting_order_value"))
            .await
    }
}

/// Σ |market_exposure|
pub fn total_exposure(positions: &[MarketPosition]) -> i64 {
    positions.iter().map(|p| p.market_exposure.abs()).sum()
}
