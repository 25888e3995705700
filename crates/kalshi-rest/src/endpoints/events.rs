//! Events and series

use serde_json::Value;
use tracing::instrument;

use kalshi_types::{
    Event, EventCandlesticksParams, EventResponse, EventsResponse, ForecastHistoryParams,
    GetEventsParams, GetMultivariateEventsParams, GetSeriesParams, Page, PageCap, Series,
    SeriesListResponse, SeriesResponse,
};

use crate::error::RestResult;
use crate::pagination::PaginatedResource;
use crate::request::RestRequest;
use crate::transport::RestTransport;

/// Event and series endpoints
pub struct EventEndpoints<'a> {
    transport: &'a RestTransport,
}

impl<'a> EventEndpoints<'a> {
    pub fn new(transport: &'a RestTransport) -> Self {
        Self { transport }
    }

    /// One page of events
    #[instrument(skip(self))]
    pub async fn get_events(&self, params: &GetEventsParams) -> RestResult<Page<Event>> {
        let request = RestRequest::get("/events").with_query(params)?;
        let response: EventsResponse = self.transport.execute(request).await?;
        Ok(response.into())
    }

    pub fn paginate_events(&self, params: GetEventsParams, cap: PageCap) -> PaginatedResource<'_, Event> {
        PaginatedResource::from_params(params, move |p: GetEventsParams| async move {
            self.get_events(&p).await
        })
        .with_cap(cap)
    }

    /// Event detail; the event's markets are attached to `Event::markets`
    #[instrument(skip(self))]
    pub async fn get_event(&self, event_ticker: &str) -> RestResult<Event> {
        let response: EventResponse = self
            .transport
            .execute(RestRequest::get(format!("/events/{event_ticker}")))
            .await?;

        let mut event = response.event;
        if event.markets.is_none() && !response.markets.is_empty() {
            event.markets = Some(response.markets);
        }
        Ok(event)
    }

    #[instrument(skip(self))]
    pub async fn get_event_metadata(&self, event_ticker: &str) -> RestResult<Value> {
        self.transport
            .execute(RestRequest::get(format!("/events/{event_ticker}/metadata")))
            .await
    }

    /// One page of multivariate (combo) events
    #[instrument(skip(self))]
    pub async fn get_multivariate_events(
        &self,
        params: &GetMultivariateEventsParams,
    ) -> RestResult<Page<Event>> {
        let request = RestRequest::get("/events/multivariate").with_query(params)?;
        let response: EventsResponse = self.transport.execute(request).await?;
        Ok(response.into())
    }

    #[instrument(skip(self))]
    pub async fn get_event_candlesticks(
        &self,
        series_ticker: &str,
        event_ticker: &str,
        params: &EventCandlesticksParams,
    ) -> RestResult<Value> {
        let request =
            RestRequest::get(format!("/series/{series_ticker}/events/{event_ticker}/candlesticks"))
                .with_query(params)?;
        self.transport.execute(request).await
    }

    /// How the event's forecast percentiles moved over time
    #[instrument(skip(self))]
    pub async fn get_forecast_percentile_history(
        &self,
        series_ticker: &str,
        event_ticker: &str,
        params: &ForecastHistoryParams,
    ) -> RestResult<Value> {
        let request = RestRequest::get(format!(
            "/series/{series_ticker}/events/{event_ticker}/forecast_percentile_history"
        ))
        .with_query(params)?;
        self.transport.execute(request).await
    }

    // ========================================================================
    // Series
    // ========================================================================

    /// One page of series
    #[instrument(skip(self))]
    pub async fn get_all_series(&self, params: &GetSeriesParams) -> RestResult<Page<Series>> {
        let request = RestRequest::get("/series").with_query(params)?;
        let response: SeriesListResponse = self.transport.execute(request).await?;
        Ok(response.into())
    }

    #[instrument(skip(self))]
    pub async fn get_series(&self, series_ticker: &str) -> RestResult<Series> {
        let response: SeriesResponse = self
            .transport
            .execute(RestRequest::get(format!("/series/{series_ticker}")))
            .await?;
        Ok(response.series)
    }
}
