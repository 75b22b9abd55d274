//! Payments on the Open API, plus the admin-only payout views.

use super::{Resource, to_body};
use crate::api::transport::{ApiRequest, ApiTransport, Query};
use crate::error::ApiError;
use serde::Serialize;
use serde_json::Value;

/// Optional amount and reason for capture/refund. Omitted fields mean "full amount".
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct PaymentAdjustment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl PaymentAdjustment {
    fn into_body(self) -> Result<Option<Value>, ApiError> {
        if self.amount.is_none() && self.reason.is_none() {
            return Ok(None);
        }
        to_body(&self).map(Some)
    }
}

pub struct Payments<'a>(Resource<'a>);

impl<'a> Payments<'a> {
    pub fn new(transport: &'a dyn ApiTransport) -> Self {
        Self(Resource::new(transport, "/payments"))
    }

    pub async fn list(
        &self,
        page: u32,
        page_size: u32,
        status: Option<&str>,
        gateway: Option<&str>,
    ) -> Result<Value, ApiError> {
        self.0
            .list(
                Query::page(page, page_size)
                    .string("status", status)
                    .string("gateway", gateway),
            )
            .await
    }

    pub async fn get(&self, id: &str) -> Result<Value, ApiError> {
        self.0.get(id).await
    }

    pub async fn for_order(&self, order_id: &str) -> Result<Value, ApiError> {
        self.0
            .send(ApiRequest::get(format!(
                "/orders/{}/payments",
                urlencoding::encode(order_id)
            )))
            .await
    }

    pub async fn capture(&self, id: &str, adjustment: PaymentAdjustment) -> Result<Value, ApiError> {
        self.0.action(id, "capture", adjustment.into_body()?).await
    }

    pub async fn void(&self, id: &str) -> Result<Value, ApiError> {
        self.0.action(id, "void", None).await
    }

    pub async fn refund(&self, id: &str, adjustment: PaymentAdjustment) -> Result<Value, ApiError> {
        self.0.action(id, "refund", adjustment.into_body()?).await
    }
}

/// Admin API payout views. Needs an admin transport.
pub struct AdminPayments<'a> {
    transport: &'a dyn ApiTransport,
}

impl<'a> AdminPayments<'a> {
    pub fn new(transport: &'a dyn ApiTransport) -> Self {
        Self { transport }
    }

    pub async fn account_summary(&self) -> Result<Value, ApiError> {
        self.transport
            .call(ApiRequest::get("/payments/account-summary"))
            .await
    }

    /// Payouts since `from_millis` (Unix epoch milliseconds).
    pub async fn payouts(&self, from_millis: i64) -> Result<Value, ApiError> {
        let from = from_millis.to_string();
        self.transport
            .call(
                ApiRequest::get("/payments/payouts")
                    .with_query(Query::new().string("from", Some(&from))),
            )
            .await
    }
}
