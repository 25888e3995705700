//! Exchange status, schedule and announcements

use serde_json::Value;
use tracing::{debug, instrument};

use kalshi_types::{
    Announcement, AnnouncementsResponse, ExchangeStatus, GetAnnouncementsParams, Page, PageCap,
};

use crate::error::RestResult;
use crate::pagination::PaginatedResource;
use crate::request::RestRequest;
use crate::transport::RestTransport;

/// Exchange-level endpoints
pub struct ExchangeEndpoints<'a> {
    transport: &'a RestTransport,
}

impl<'a> ExchangeEndpoints<'a> {
    pub fn new(transport: &'a RestTransport) -> Self {
        Self { transport }
    }

    /// Whether the exchange and trading are active
    #[instrument(skip(self))]
    pub async fn get_status(&self) -> RestResult<ExchangeStatus> {
        debug!("Fetching exchange status");
        self.transport.execute(RestRequest::get("/exchange/status")).await
    }

    /// Trading hours and maintenance windows
    #[instrument(skip(self))]
    pub async fn get_schedule(&self) -> RestResult<Value> {
        debug!("Fetching exchange schedule");
        self.transport.execute(RestRequest::get("/exchange/schedule")).await
    }

    /// One page of exchange announcements
    #[instrument(skip(self))]
    pub async fn get_announcements(
        &self,
        params: &GetAnnouncementsParams,
    ) -> RestResult<Page<Announcement>> {
        let request = RestRequest::get("/exchange/announcements").with_query(params)?;
        let response: AnnouncementsResponse = self.transport.execute(request).await?;
        Ok(response.into())
    }

    /// Walk every announcement page
    pub fn paginate_announcements(
        &self,
        params: GetAnnouncementsParams,
        cap: PageCap,
    ) -> PaginatedResource<'_, Announcement> {
        PaginatedResource::from_params(params, move |p: GetAnnouncementsParams| async move {
            self.get_announcements(&p).await
        })
        .with_cap(cap)
    }
}
