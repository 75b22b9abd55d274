//! Resource families
//!
//! Each family is a thin typed wrapper over an [`ApiTransport`]; payloads
//! stay opaque `serde_json::Value` apart from the request bodies the CLI
//! assembles from flags.

use super::transport::{ApiRequest, ApiTransport, Query};
use crate::error::ApiError;
use serde::Serialize;
use serde_json::Value;

pub mod catalog;
pub mod customers;
pub mod orders;
pub mod payments;
pub mod promotions;
pub mod settings;
pub mod shipping;

/// CRUD over one collection endpoint such as `/coupons`.
pub struct Resource<'a> {
    transport: &'a dyn ApiTransport,
    base: String,
}

impl<'a> Resource<'a> {
    pub fn new(transport: &'a dyn ApiTransport, base: impl Into<String>) -> Self {
        Self {
            transport,
            base: base.into(),
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// `{base}/{id}` with the id escaped as one path segment.
    pub fn item_path(&self, id: &str) -> String {
        format!("{}/{}", self.base, urlencoding::encode(id))
    }

    pub async fn list(&self, query: Query) -> Result<Value, ApiError> {
        self.transport
            .call(ApiRequest::get(self.base.clone()).with_query(query))
            .await
    }

    pub async fn get(&self, id: &str) -> Result<Value, ApiError> {
        self.transport.call(ApiRequest::get(self.item_path(id))).await
    }

    pub async fn create(&self, body: Value) -> Result<Value, ApiError> {
        self.transport
            .call(ApiRequest::post(self.base.clone()).with_body(body))
            .await
    }

    pub async fn update(&self, id: &str, body: Value) -> Result<Value, ApiError> {
        self.transport
            .call(ApiRequest::put(self.item_path(id)).with_body(body))
            .await
    }

    pub async fn delete(&self, id: &str) -> Result<Value, ApiError> {
        self.transport
            .call(ApiRequest::delete(self.item_path(id)))
            .await
    }

    /// `POST {base}/{id}/{action}`.
    pub async fn action(&self, id: &str, action: &str, body: Option<Value>) -> Result<Value, ApiError> {
        let mut request = ApiRequest::post(format!("{}/{}", self.item_path(id), action));
        request.body = body;
        self.transport.call(request).await
    }

    /// Raw request against a path under this resource's transport.
    pub async fn send(&self, request: ApiRequest) -> Result<Value, ApiError> {
        self.transport.call(request).await
    }
}

/// Serializes a typed request body.
pub(crate) fn to_body<T: Serialize>(request: &T) -> Result<Value, ApiError> {
    serde_json::to_value(request).map_err(|e| ApiError::Decode {
        endpoint: "request body".to_string(),
        message: e.to_string(),
    })
}


#[cfg(test)]
mod tests {
    use super::testing::RecordingTransport;
    use super::*;
    use reqwest::Method;
    use serde_json::json;

    #[tokio::test]
    async fn test_crud_paths() {
        let transport = RecordingTransport::new();
        let resource = Resource::new(&transport, "/metafields");

        resource.list(Query::page(1, 20)).await.expect("list");
        resource.get("m/1").await.expect("get");
        resource.create(json!({"key": "k"})).await.expect("create");
        resource.update("m1", json!({"value": "v"})).await.expect("update");
        resource.delete("m1").await.expect("delete");
        resource.action("m1", "activate", None).await.expect("action");

        let sent: Vec<(Method, String)> = transport
            .requests()
            .into_iter()
            .map(|r| (r.method, r.path))
            .collect();
        assert_eq!(
            sent,
            vec![
                (Method::GET, "/metafields".to_string()),
                (Method::GET, "/metafields/m%2F1".to_string()),
                (Method::POST, "/metafields".to_string()),
                (Method::PUT, "/metafields/m1".to_string()),
                (Method::DELETE, "/metafields/m1".to_string()),
                (Method::POST, "/metafields/m1/activate".to_string()),
            ]
        );
    }

    #[test]
    fn test_item_path_escapes_one_segment() {
        let transport = RecordingTransport::new();
        let resource = Resource::new(&transport, "/coupons");
        assert_eq!(resource.item_path("SUMMER-10"), "/coupons/SUMMER-10");
        assert_eq!(resource.item_path("a/b c"), "/coupons/a%2Fb%20c");
        assert_eq!(resource.item_path("優惠"), "/coupons/%E5%84%AA%E6%83%A0");
    }

    #[tokio::test]
    async fn test_errors_pass_through() {
        let transport = RecordingTransport::new().respond(Err(ApiError::Http {
            status: 404,
            endpoint: "/metafields/x".to_string(),
            message: "Not Found".to_string(),
        }));
        let resource = Resource::new(&transport, "/metafields");
        let err = resource.get("x").await.unwrap_err();
        assert_eq!(err.status(), Some(404));
    }
}
