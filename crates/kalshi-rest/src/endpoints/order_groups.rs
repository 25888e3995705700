//! Order group lifecycle

use serde_json::Value;
use tracing::instrument;

use kalshi_types::{
    CreateOrderGroupRequest, CreateOrderGroupResponse, KalshiError, OrderGroup,
    OrderGroupsResponse,
};

use crate::error::RestResult;
use crate::request::RestRequest;
use crate::transport::RestTransport;

/// Order group endpoints
pub struct OrderGroupEndpoints<'a> {
    transport: &'a RestTransport,
}

impl<'a> OrderGroupEndpoints<'a> {
    pub fn new(transport: &'a RestTransport) -> Self {
        Self { transport }
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> RestResult<Vec<OrderGroup>> {
        let response: OrderGroupsResponse = self
            .transport
            .execute(RestRequest::get("/portfolio/order_groups"))
            .await?;
        Ok(response.order_groups)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, order_group_id: &str) -> RestResult<OrderGroup> {
        let mut group: OrderGroup = self
            .transport
            .execute(RestRequest::get(format!("/portfolio/order_groups/{order_group_id}")))
            .await?;
        group.id.get_or_insert_with(|| order_group_id.to_string());
        Ok(group)
    }

    /// Create a group capping total fills at `contracts_limit`; returns its id
    #[instrument(skip(self))]
    pub async fn create(&self, contracts_limit: u32) -> RestResult<String> {
        if contracts_limit == 0 {
            return Err(KalshiError::validation("contracts_limit must be positive"));
        }
        let request = RestRequest::post("/portfolio/order_groups/create")
            .with_json(&CreateOrderGroupRequest { contracts_limit })?;
        let response: CreateOrderGroupResponse = self.transport.execute(request).await?;
        Ok(response.order_group_id)
    }

    /// Delete a group and cancel its orders
    #[instrument(skip(self))]
    pub async fn delete(&self, order_group_id: &str) -> RestResult<Value> {
        self.transport
            .execute(RestRequest::delete(format!("/portfolio/order_groups/{order_group_id}")))
            .await
    }

    /// Reset the group's filled-contract counter
    #[instrument(skip(self))]
    pub async fn reset(&self, order_group_id: &str) -> RestResult<Value> {
        let request = RestRequest::put(format!("/portfolio/order_groups/{order_group_id}/reset"))
            .with_json(&serde_json::json!({}))?;
        self.transport.execute(request).await
    }
}
