//! Store checkout settings.

use super::to_body;
use crate::api::transport::{ApiRequest, ApiTransport};
use crate::error::ApiError;
use serde::Serialize;
use serde_json::Value;

const CHECKOUT_PATH: &str = "/settings/checkout";

/// Partial update; only fields set from flags are sent.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct CheckoutSettingsUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub require_phone: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guest_checkout: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub express_checkout: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_notes_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tipping_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub abandoned_cart_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub abandoned_cart_delay: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub terms_of_service_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub privacy_policy_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refund_policy_url: Option<String>,
}

impl CheckoutSettingsUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

pub struct CheckoutSettings<'a> {
    transport: &'a dyn ApiTransport,
}

impl<'a> CheckoutSettings<'a> {
    pub fn new(transport: &'a dyn ApiTransport) -> Self {
        Self { transport }
    }

    pub async fn get(&self) -> Result<Value, ApiError> {
        self.transport.call(ApiRequest::get(CHECKOUT_PATH)).await
    }

    pub async fn update(&self, update: &CheckoutSettingsUpdate) -> Result<Value, ApiError> {
        self.transport
            .call(ApiRequest::put(CHECKOUT_PATH).with_body(to_body(update)?))
            .await
    }
}
