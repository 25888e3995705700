//! RFQ quotes

use tracing::instrument;

use kalshi_types::{GetQuotesParams, Page, Quote, QuotesResponse};

use crate::error::RestResult;
use crate::request::RestRequest;
use crate::transport::RestTransport;

/// Communications endpoints
pub struct CommunicationsEndpoints<'a> {
    transport: &'a RestTransport,
}

impl<'a> CommunicationsEndpoints<'a> {
    pub fn new(transport: &'a RestTransport) -> Self {
        Self { transport }
    }

    /// One page of quotes
    #[instrument(skip(self))]
    pub async fn get_quotes(&self, params: &GetQuotesParams) -> RestResult<Page<Quote>> {
        let request = RestRequest::get("/communications/quotes").with_query(params)?;
        let response: QuotesResponse = self.transport.execute(request).await?;
        Ok(response.into())
    }
}
