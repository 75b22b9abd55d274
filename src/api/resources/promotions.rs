//! Coupons, sales and flash-price campaigns.

use super::{Resource, to_body};
use crate::api::transport::{ApiRequest, ApiTransport, Query};
use crate::error::ApiError;
use serde::Serialize;
use serde_json::{Value, json};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum DiscountType {
    Percentage,
    FixedAmount,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CouponCreateRequest {
    pub code: String,
    pub discount_type: DiscountType,
    pub discount_value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_purchase: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage_limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage_limit_per_customer: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub starts_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ends_at: Option<String>,
}

pub struct Coupons<'a>(Resource<'a>);

impl<'a> Coupons<'a> {
    pub fn new(transport: &'a dyn ApiTransport) -> Self {
        Self(Resource::new(transport, "/coupons"))
    }

    pub async fn list(&self, page: u32, page_size: u32, status: Option<&str>) -> Result<Value, ApiError> {
        self.0
            .list(Query::page(page, page_size).string("status", status))
            .await
    }

    pub async fn get(&self, id: &str) -> Result<Value, ApiError> {
        self.0.get(id).await
    }

    /// Finds a coupon by its redeemable code.
    pub async fn lookup(&self, code: &str) -> Result<Value, ApiError> {
        self.0
            .send(ApiRequest::get(format!(
                "/coupons/code/{}",
                urlencoding::encode(code)
            )))
            .await
    }

    pub async fn create(&self, request: &CouponCreateRequest) -> Result<Value, ApiError> {
        self.0.create(to_body(request)?).await
    }

    pub async fn update(&self, id: &str, body: Value) -> Result<Value, ApiError> {
        self.0.update(id, body).await
    }

    pub async fn activate(&self, id: &str) -> Result<Value, ApiError> {
        self.0.action(id, "activate", None).await
    }

    pub async fn deactivate(&self, id: &str) -> Result<Value, ApiError> {
        self.0.action(id, "deactivate", None).await
    }

    pub async fn delete(&self, id: &str) -> Result<Value, ApiError> {
        self.0.delete(id).await
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SaleCreateRequest {
    pub title: String,
    pub discount_type: DiscountType,
    pub discount_value: f64,
    pub applies_to: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub product_ids: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub collection_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub starts_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ends_at: Option<String>,
}

pub struct Sales<'a>(Resource<'a>);

impl<'a> Sales<'a> {
    pub fn new(transport: &'a dyn ApiTransport) -> Self {
        Self(Resource::new(transport, "/sales"))
    }

    pub async fn list(&self, page: u32, page_size: u32, status: Option<&str>) -> Result<Value, ApiError> {
        self.0
            .list(Query::page(page, page_size).string("status", status))
            .await
    }

    pub async fn get(&self, id: &str) -> Result<Value, ApiError> {
        self.0.get(id).await
    }

    pub async fn create(&self, request: &SaleCreateRequest) -> Result<Value, ApiError> {
        self.0.create(to_body(request)?).await
    }

    pub async fn activate(&self, id: &str) -> Result<Value, ApiError> {
        self.0.action(id, "activate", None).await
    }

    pub async fn deactivate(&self, id: &str) -> Result<Value, ApiError> {
        self.0.action(id, "deactivate", None).await
    }

    pub async fn delete(&self, id: &str) -> Result<Value, ApiError> {
        self.0.delete(id).await
    }

    /// Removes products from a sale without deleting the sale.
    pub async fn delete_products(&self, id: &str, product_ids: &[String]) -> Result<Value, ApiError> {
        self.0
            .action(id, "delete_products", Some(json!({ "product_ids": product_ids })))
            .await
    }
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct FlashPriceInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flash_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit_per_user: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub starts_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ends_at: Option<String>,
}

pub struct FlashPriceCampaigns<'a>(Resource<'a>);

impl<'a> FlashPriceCampaigns<'a> {
    pub fn new(transport: &'a dyn ApiTransport) -> Self {
        Self(Resource::new(transport, "/flash-price-campaigns"))
    }

    pub async fn list(
        &self,
        page: u32,
        page_size: u32,
        product_id: Option<&str>,
        status: Option<&str>,
    ) -> Result<Value, ApiError> {
        self.0
            .list(
                Query::page(page, page_size)
                    .string("product_id", product_id)
                    .string("status", status),
            )
            .await
    }

    pub async fn get(&self, id: &str) -> Result<Value, ApiError> {
        self.0.get(id).await
    }

    pub async fn create(&self, input: &FlashPriceInput) -> Result<Value, ApiError> {
        self.0.create(to_body(input)?).await
    }

    pub async fn update(&self, id: &str, input: &FlashPriceInput) -> Result<Value, ApiError> {
        self.0.update(id, to_body(input)?).await
    }

    pub async fn activate(&self, id: &str) -> Result<Value, ApiError> {
        self.0.action(id, "activate", None).await
    }

    pub async fn deactivate(&self, id: &str) -> Result<Value, ApiError> {
        self.0.action(id, "deactivate", None).await
    }

    pub async fn delete(&self, id: &str) -> Result<Value, ApiError> {
        self.0.delete(id).await
    }
}
