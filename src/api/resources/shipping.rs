//! Carrier services and shipping zones on the Open API; shipment execution
//! and tracking on the Admin API.

use super::{Resource, to_body};
use crate::api::transport::{ApiRequest, ApiTransport, Query};
use crate::error::ApiError;
use serde::Serialize;
use serde_json::Value;

pub struct CarrierServices<'a>(Resource<'a>);

impl<'a> CarrierServices<'a> {
    pub fn new(transport: &'a dyn ApiTransport) -> Self {
        Self(Resource::new(transport, "/carrier_services"))
    }

    pub async fn list(&self, page: u32, page_size: u32) -> Result<Value, ApiError> {
        self.0.list(Query::page(page, page_size)).await
    }

    pub async fn get(&self, id: &str) -> Result<Value, ApiError> {
        self.0.get(id).await
    }

    pub async fn create(&self, body: Value) -> Result<Value, ApiError> {
        self.0.create(body).await
    }

    pub async fn update(&self, id: &str, body: Value) -> Result<Value, ApiError> {
        self.0.update(id, body).await
    }

    pub async fn delete(&self, id: &str) -> Result<Value, ApiError> {
        self.0.delete(id).await
    }
}

pub struct ShippingZones<'a>(Resource<'a>);

impl<'a> ShippingZones<'a> {
    pub fn new(transport: &'a dyn ApiTransport) -> Self {
        Self(Resource::new(transport, "/shipping_zones"))
    }

    pub async fn list(&self, page: u32, page_size: u32) -> Result<Value, ApiError> {
        self.0.list(Query::page(page, page_size)).await
    }

    pub async fn get(&self, id: &str) -> Result<Value, ApiError> {
        self.0.get(id).await
    }

    pub async fn create(&self, body: Value) -> Result<Value, ApiError> {
        self.0.create(body).await
    }

    pub async fn update(&self, id: &str, body: Value) -> Result<Value, ApiError> {
        self.0.update(id, body).await
    }

    pub async fn delete(&self, id: &str) -> Result<Value, ApiError> {
        self.0.delete(id).await
    }
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteShipmentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub performer_id: Option<String>,
}

/// Admin API shipment operations for one order.
pub struct AdminShipping<'a> {
    transport: &'a dyn ApiTransport,
}

impl<'a> AdminShipping<'a> {
    pub fn new(transport: &'a dyn ApiTransport) -> Self {
        Self { transport }
    }

    fn order_path(order_id: &str, suffix: &str) -> String {
        format!("/orders/{}{}", urlencoding::encode(order_id), suffix)
    }

    pub async fn status(&self, order_id: &str) -> Result<Value, ApiError> {
        self.transport
            .call(ApiRequest::get(Self::order_path(order_id, "/shipment/status")))
            .await
    }

    pub async fn tracking(&self, order_id: &str) -> Result<Value, ApiError> {
        self.transport
            .call(ApiRequest::get(Self::order_path(order_id, "/tracking")))
            .await
    }

    pub async fn execute(
        &self,
        order_id: &str,
        request: &ExecuteShipmentRequest,
    ) -> Result<Value, ApiError> {
        self.transport
            .call(
                ApiRequest::post(Self::order_path(order_id, "/shipment/execute"))
                    .with_body(to_body(request)?),
            )
            .await
    }
}
