//! Subscriptions and order attribution.

use super::{Resource, to_body};
use crate::api::transport::{ApiRequest, ApiTransport, Query};
use crate::error::ApiError;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubscriptionListOptions {
    pub page: u32,
    pub page_size: u32,
    pub customer_id: Option<String>,
    pub product_id: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SubscriptionCreateRequest {
    pub customer_id: String,
    pub product_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant_id: Option<String>,
    pub interval: String,
    pub interval_count: u32,
}

pub struct Subscriptions<'a>(Resource<'a>);

impl<'a> Subscriptions<'a> {
    pub fn new(transport: &'a dyn ApiTransport) -> Self {
        Self(Resource::new(transport, "/subscriptions"))
    }

    pub async fn list(&self, options: &SubscriptionListOptions) -> Result<Value, ApiError> {
        self.0
            .list(
                Query::page(options.page, options.page_size)
                    .string("customer_id", options.customer_id.as_deref())
                    .string("product_id", options.product_id.as_deref())
                    .string("status", options.status.as_deref()),
            )
            .await
    }

    pub async fn get(&self, id: &str) -> Result<Value, ApiError> {
        self.0.get(id).await
    }

    pub async fn create(&self, request: &SubscriptionCreateRequest) -> Result<Value, ApiError> {
        self.0.create(to_body(request)?).await
    }

    pub async fn cancel(&self, id: &str) -> Result<Value, ApiError> {
        self.0.action(id, "cancel", None).await
    }
}

/// Filters for attribution listing. Dates are already RFC 3339.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributionFilter {
    pub page: u32,
    pub page_size: u32,
    pub source: Option<String>,
    pub medium: Option<String>,
    pub campaign: Option<String>,
    pub created_at_min: Option<String>,
    pub created_at_max: Option<String>,
}

pub struct OrderAttributions<'a>(Resource<'a>);

impl<'a> OrderAttributions<'a> {
    pub fn new(transport: &'a dyn ApiTransport) -> Self {
        Self(Resource::new(transport, "/order_attributions"))
    }

    pub async fn list(&self, filter: &AttributionFilter) -> Result<Value, ApiError> {
        self.0
            .list(
                Query::page(filter.page, filter.page_size)
                    .string("utm_source", filter.source.as_deref())
                    .string("utm_medium", filter.medium.as_deref())
                    .string("utm_campaign", filter.campaign.as_deref())
                    .string("created_at_min", filter.created_at_min.as_deref())
                    .string("created_at_max", filter.created_at_max.as_deref()),
            )
            .await
    }

    /// Attribution of a single order.
    pub async fn for_order(&self, order_id: &str) -> Result<Value, ApiError> {
        self.0
            .send(ApiRequest::get(format!(
                "/orders/{}/attribution",
                urlencoding::encode(order_id)
            )))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::resources::testing::RecordingTransport;
    use reqwest::Method;
    use serde_json::json;

    #[tokio::test]
    async fn test_subscription_create_and_cancel() {
        let transport = RecordingTransport::new();
        let subscriptions = Subscriptions::new(&transport);
        let request = SubscriptionCreateRequest {
            customer_id: "cus_1".to_string(),
            product_id: "prod_1".to_string(),
            variant_id: None,
            interval: "month".to_string(),
            interval_count: 1,
        };
        subscriptions.create(&request).await.expect("create");
        subscriptions.cancel("sub_1").await.expect("cancel");

        let requests = transport.requests();
        assert_eq!(
            requests[0].body,
            Some(json!({
                "customer_id": "cus_1",
                "product_id": "prod_1",
                "interval": "month",
                "interval_count": 1
            }))
        );
        assert_eq!(requests[1].method, Method::POST);
        assert_eq!(requests[1].path, "/subscriptions/sub_1/cancel");
    }

    #[tokio::test]
    async fn test_subscription_list_filters() {
        let transport = RecordingTransport::new();
        let options = SubscriptionListOptions {
            page: 1,
            page_size: 20,
            status: Some("active".to_string()),
            ..Default::default()
        };
        Subscriptions::new(&transport)
            .list(&options)
            .await
            .expect("list");
        let query = transport.last().query;
        assert!(query.contains(&("status".to_string(), "active".to_string())));
        assert!(!query.iter().any(|(k, _)| k == "customer_id"));
    }

    #[tokio::test]
    async fn test_attribution_paths() {
        let transport = RecordingTransport::new();
        let attributions = OrderAttributions::new(&transport);
        let filter = AttributionFilter {
            page: 1,
            page_size: 20,
            source: Some("google".to_string()),
            created_at_min: Some("2024-01-01T00:00:00+00:00".to_string()),
            ..Default::default()
        };
        attributions.list(&filter).await.expect("list");
        attributions.for_order("o1").await.expect("order attribution");

        let requests = transport.requests();
        assert_eq!(requests[0].path, "/order_attributions");
        assert!(requests[0]
            .query
            .contains(&("utm_source".to_string(), "google".to_string())));
        assert!(requests[0].query.contains(&(
            "created_at_min".to_string(),
            "2024-01-01T00:00:00+00:00".to_string()
        )));
        assert_eq!(requests[1].path, "/orders/o1/attribution");
    }
}
