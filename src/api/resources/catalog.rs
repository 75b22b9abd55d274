//! Products, collections, storefront products, taxonomies and metafields.

use super::Resource;
use crate::api::transport::{ApiRequest, ApiTransport, Query};
use crate::error::ApiError;
use serde::Serialize;
use serde_json::{Value, json};

#[derive(Debug, Clone, Default)]
pub struct ProductListOptions {
    pub page: u32,
    pub page_size: u32,
    pub status: Option<String>,
    pub vendor: Option<String>,
    pub product_type: Option<String>,
    pub keyword: Option<String>,
}

/// Fields settable from flags; anything else goes through `--body`.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct ProductInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_type: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

pub struct Products<'a>(Resource<'a>);

impl<'a> Products<'a> {
    pub fn new(transport: &'a dyn ApiTransport) -> Self {
        Self(Resource::new(transport, "/products"))
    }

    pub async fn list(&self, opts: &ProductListOptions) -> Result<Value, ApiError> {
        self.0
            .list(
                Query::page(opts.page, opts.page_size)
                    .string("status", opts.status.as_deref())
                    .string("vendor", opts.vendor.as_deref())
                    .string("product_type", opts.product_type.as_deref())
                    .string("keyword", opts.keyword.as_deref()),
            )
            .await
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

#[derive(Debug, Clone, Default)]
pub struct CollectionListOptions {
    pub page: u32,
    pub page_size: u32,
    pub title: Option<String>,
    pub handle: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct CollectionInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<String>,
}

pub struct Collections<'a>(Resource<'a>);

impl<'a> Collections<'a> {
    pub fn new(transport: &'a dyn ApiTransport) -> Self {
        Self(Resource::new(transport, "/collections"))
    }

    pub async fn list(&self, opts: &CollectionListOptions) -> Result<Value, ApiError> {
        self.0
            .list(
                Query::page(opts.page, opts.page_size)
                    .string("title", opts.title.as_deref())
                    .string("handle", opts.handle.as_deref()),
            )
            .await
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

    pub async fn add_products(&self, id: &str, product_ids: &[String]) -> Result<Value, ApiError> {
        self.0
            .send(
                ApiRequest::post(format!("{}/products", self.0.item_path(id)))
                    .with_body(json!({ "product_ids": product_ids })),
            )
            .await
    }

    pub async fn remove_product(&self, id: &str, product_id: &str) -> Result<Value, ApiError> {
        self.0
            .send(ApiRequest::delete(format!(
                "{}/products/{}",
                self.0.item_path(id),
                urlencoding::encode(product_id)
            )))
            .await
    }
}

#[derive(Debug, Clone, Default)]
pub struct StorefrontProductListOptions {
    pub page: u32,
    pub page_size: u32,
    pub collection: Option<String>,
    pub category: Option<String>,
    pub vendor: Option<String>,
    pub product_type: Option<String>,
    pub tag: Option<String>,
    pub keyword: Option<String>,
}

/// Read-only storefront view of the catalog.
pub struct StorefrontProducts<'a>(Resource<'a>);

impl<'a> StorefrontProducts<'a> {
    pub fn new(transport: &'a dyn ApiTransport) -> Self {
        Self(Resource::new(transport, "/storefront/products"))
    }

    pub async fn list(&self, opts: &StorefrontProductListOptions) -> Result<Value, ApiError> {
        self.0
            .list(
                Query::page(opts.page, opts.page_size)
                    .string("collection", opts.collection.as_deref())
                    .string("category", opts.category.as_deref())
                    .string("vendor", opts.vendor.as_deref())
                    .string("product_type", opts.product_type.as_deref())
                    .string("tag", opts.tag.as_deref())
                    .string("q", opts.keyword.as_deref()),
            )
            .await
    }

    pub async fn get(&self, id: &str) -> Result<Value, ApiError> {
        self.0.get(id).await
    }

    pub async fn by_handle(&self, handle: &str) -> Result<Value, ApiError> {
        self.0
            .send(ApiRequest::get(format!(
                "{}/handle/{}",
                self.0.base(),
                urlencoding::encode(handle)
            )))
            .await
    }
}

pub struct Taxonomies<'a>(Resource<'a>);

impl<'a> Taxonomies<'a> {
    pub fn new(transport: &'a dyn ApiTransport) -> Self {
        Self(Resource::new(transport, "/taxonomies"))
    }

    pub async fn list(&self, page: u32, page_size: u32, parent_id: Option<&str>) -> Result<Value, ApiError> {
        self.0
            .list(Query::page(page, page_size).string("parent_id", parent_id))
            .await
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

#[derive(Debug, Clone, Default)]
pub struct MetafieldListOptions {
    pub page: u32,
    pub page_size: u32,
    pub owner_resource: Option<String>,
    pub owner_id: Option<String>,
    pub namespace: Option<String>,
}

pub struct Metafields<'a>(Resource<'a>);

impl<'a> Metafields<'a> {
    pub fn new(transport: &'a dyn ApiTransport) -> Self {
        Self(Resource::new(transport, "/metafields"))
    }

    pub async fn list(&self, opts: &MetafieldListOptions) -> Result<Value, ApiError> {
        self.0
            .list(
                Query::page(opts.page, opts.page_size)
                    .string("owner_resource", opts.owner_resource.as_deref())
                    .string("owner_id", opts.owner_id.as_deref())
                    .string("namespace", opts.namespace.as_deref()),
            )
            .await
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::resources::testing::RecordingTransport;
    use reqwest::Method;

    #[tokio::test]
    async fn test_product_list_filters() {
        let transport = RecordingTransport::new();
        let opts = ProductListOptions {
            page: 2,
            page_size: 50,
            status: Some("active".to_string()),
            ..Default::default()
        };
        Products::new(&transport).list(&opts).await.expect("list");

        let req = transport.last();
        assert_eq!(req.path, "/products");
        assert!(req.query.contains(&("status".to_string(), "active".to_string())));
        assert!(req.query.contains(&("page_size".to_string(), "50".to_string())));
        assert!(!req.query.iter().any(|(k, _)| k == "vendor"));
    }

    #[test]
    fn test_product_input_skips_unset() {
        let input = ProductInput {
            title: Some("Mug".to_string()),
            tags: vec!["kitchen".to_string()],
            ..Default::default()
        };
        let value = serde_json::to_value(&input).expect("serialize");
        assert_eq!(value, json!({"title": "Mug", "tags": ["kitchen"]}));
    }

    #[tokio::test]
    async fn test_collection_product_membership() {
        let transport = RecordingTransport::new();
        let collections = Collections::new(&transport);
        collections
            .add_products("col1", &["p1".to_string(), "p2".to_string()])
            .await
            .expect("add");
        collections.remove_product("col1", "p1").await.expect("remove");

        let requests = transport.requests();
        assert_eq!(requests[0].method, Method::POST);
        assert_eq!(requests[0].path, "/collections/col1/products");
        assert_eq!(requests[0].body, Some(json!({"product_ids": ["p1", "p2"]})));
        assert_eq!(requests[1].method, Method::DELETE);
        assert_eq!(requests[1].path, "/collections/col1/products/p1");
    }

    #[tokio::test]
    async fn test_storefront_by_handle() {
        let transport = RecordingTransport::new();
        StorefrontProducts::new(&transport)
            .by_handle("blue-mug")
            .await
            .expect("by handle");
        assert_eq!(transport.last().path, "/storefront/products/handle/blue-mug");
    }
}
