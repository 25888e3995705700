//! Order entry and management

use tracing::{debug, info, instrument};

use kalshi_types::{
    AmendOrderRequest, AmendOrderResponse, BatchCancelOrdersRequest, BatchCreateOrdersRequest,
    BatchOrdersResponse, CancelOrderResponse, CreateOrderRequest, DecreaseOrderRequest,
    GetOrdersParams, Order, OrderResponse, OrdersResponse, Page, PageCap, QueuePosition,
    QueuePositionResponse, QueuePositionsResponse,
};

use crate::error::RestResult;
use crate::pagination::PaginatedResource;
use crate::request::RestRequest;
use crate::transport::RestTransport;

/// Order endpoints
///
/// Every payload is validated before the request is built, so invalid
/// orders never reach the network.
pub struct OrderEndpoints<'a> {
    transport: &'a RestTransport,
}

impl<'a> OrderEndpoints<'a> {
    pub fn new(transport: &'a RestTransport) -> Self {
        Self { transport }
    }

    /// One page of orders
    #[instrument(skip(self))]
    pub async fn get_orders(&self, params: &GetOrdersParams) -> RestResult<Page<Order>> {
        let request = RestRequest::get("/portfolio/orders").with_query(params)?;
        let response: OrdersResponse = self.transport.execute(request).await?;
        Ok(response.into())
    }

    pub fn paginate_orders(&self, params: GetOrdersParams, cap: PageCap) -> PaginatedResource<'_, Order> {
        PaginatedResource::from_params(params, move |p: GetOrdersParams| async move {
            self.get_orders(&p).await
        })
        .with_cap(cap)
    }

    #[instrument(skip(self))]
    pub async fn get_order(&self, order_id: &str) -> RestResult<Order> {
        let response: OrderResponse = self
            .transport
            .execute(RestRequest::get(format!("/portfolio/orders/{order_id}")))
            .await?;
        Ok(response.order)
    }

    /// Submit an order
    #[instrument(skip(self, order), fields(ticker = %order.ticker, client_order_id = %order.client_order_id))]
    pub async fn create_order(&self, order: &CreateOrderRequest) -> RestResult<Order> {
        order.validate()?;
        let request = RestRequest::post("/portfolio/orders").with_json(order)?;
        let response: OrderResponse = self.transport.execute(request).await?;
        info!(order_id = %response.order.order_id, "Order created");
        Ok(response.order)
    }

    #[instrument(skip(self))]
    pub async fn cancel_order(&self, order_id: &str) -> RestResult<CancelOrderResponse> {
        debug!("Cancelling order");
        self.transport
            .execute(RestRequest::delete(format!("/portfolio/orders/{order_id}")))
            .await
    }

    #[instrument(skip(self, amend))]
    pub async fn amend_order(
        &self,
        order_id: &str,
        amend: &AmendOrderRequest,
    ) -> RestResult<AmendOrderResponse> {
        amend.validate()?;
        let request =
            RestRequest::post(format!("/portfolio/orders/{order_id}/amend")).with_json(amend)?;
        self.transport.execute(request).await
    }

    #[instrument(skip(self))]
    pub async fn decrease_order(
        &self,
        order_id: &str,
        decrease: &DecreaseOrderRequest,
    ) -> RestResult<Order> {
        decrease.validate()?;
        let request =
            RestRequest::post(format!("/portfolio/orders/{order_id}/decrease")).with_json(decrease)?;
        let response: OrderResponse = self.transport.execute(request).await?;
        Ok(response.order)
    }

    /// Submit several orders in one call; all are validated first
    #[instrument(skip(self, orders), fields(count = orders.len()))]
    pub async fn batch_create_orders(
        &self,
        orders: Vec<CreateOrderRequest>,
    ) -> RestResult<BatchOrdersResponse> {
        let body = BatchCreateOrdersRequest::new(orders)?;
        let request = RestRequest::post("/portfolio/orders/batched").with_json(&body)?;
        self.transport.execute(request).await
    }

    /// Cancel several orders in one call (DELETE with a JSON body)
    #[instrument(skip(self, order_ids))]
    pub async fn batch_cancel_orders<I, S>(&self, order_ids: I) -> RestResult<BatchOrdersResponse>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let body = BatchCancelOrdersRequest::new(order_ids)?;
        let request = RestRequest::delete("/portfolio/orders/batched").with_json(&body)?;
        self.transport.execute(request).await
    }

    /// Queue positions of every resting order
    #[instrument(skip(self))]
    pub async fn get_queue_positions(&self) -> RestResult<Vec<QueuePosition>> {
        let response: QueuePositionsResponse = self
            .transport
            .execute(RestRequest::get("/portfolio/orders/queue_positions"))
            .await?;
        Ok(response.queue_positions)
    }

    /// Queue position of one resting order
    #[instrument(skip(self))]
    pub async fn get_queue_position(&self, order_id: &str) -> RestResult<i64> {
        let response: QueuePositionResponse = self
            .transport
            .execute(RestRequest::get(format!("/portfolio/orders/{order_id}/queue_position")))
            .await?;
        Ok(response.queue_position)
    }
}
