//! Live data for ongoing events

use serde_json::Value;
use tracing::instrument;

use kalshi_types::LiveDataBatchParams;

use crate::error::RestResult;
use crate::request::RestRequest;
use crate::transport::RestTransport;

/// Live data endpoints
pub struct LiveDataEndpoints<'a> {
    transport: &'a RestTransport,
}

impl<'a> LiveDataEndpoints<'a> {
    pub fn new(transport: &'a RestTransport) -> Self {
        Self { transport }
    }

    /// Live data of one milestone, e.g. `data_type = "election"`
    #[instrument(skip(self))]
    pub async fn get_milestone(&self, data_type: &str, milestone_id: &str) -> RestResult<Value> {
        self.transport
            .execute(RestRequest::get(format!("/live_data/{data_type}/milestone/{milestone_id}")))
            .await
    }

    /// Live data of several milestones in one call
    #[instrument(skip(self))]
    pub async fn get_batch(&self, params: &LiveDataBatchParams) -> RestResult<Value> {
        let request = RestRequest::get("/live_data/batch").with_query(params)?;
        self.transport.execute(request).await
    }
}
