//! Admin API client
//!
//! A separate, higher-privilege API with its own credentials. Every path is
//! scoped to one merchant: `{base}/merchants/{merchant_id}{path}`.

use super::client::{DEFAULT_TIMEOUT_SECS, USER_AGENT};
use super::transport::{
    ApiRequest, ApiTransport, decode_body, status_error, transport_error,
};
use crate::error::{ApiError, AuthError};
use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION, RETRY_AFTER};
use serde_json::Value;
use std::fmt;
use std::time::Duration;

pub const ADMIN_BASE_URL_ENV: &str = "SHOPLINE_ADMIN_BASE_URL";
pub const ADMIN_TOKEN_ENV: &str = "SHOPLINE_ADMIN_TOKEN";
pub const ADMIN_MERCHANT_ID_ENV: &str = "SHOPLINE_ADMIN_MERCHANT_ID";

const MAX_RESPONSE_BYTES: usize = 10 << 20;

#[derive(Clone, PartialEq, Eq)]
pub struct AdminCredentials {
    pub base_url: String,
    pub token: String,
    pub merchant_id: String,
}

impl fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("base_url", &self.base_url)
            .field("merchant_id", &self.merchant_id)
            .finish_non_exhaustive()
    }
}

impl AdminCredentials {
    /// Each argument is already "flag, else env". Blank counts as missing.
    pub fn resolve(
        base_url: Option<&str>,
        token: Option<&str>,
        merchant_id: Option<&str>,
    ) -> Result<Self, AuthError> {
        let present = |v: Option<&str>| v.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string);

        let base_url = present(base_url).ok_or(AuthError::MissingAdminBaseUrl)?;
        let token = present(token).ok_or(AuthError::MissingAdminToken)?;
        let merchant_id = present(merchant_id).ok_or(AuthError::MissingAdminMerchantId)?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            merchant_id,
        })
    }
}

pub struct AdminClient {
    client: Client,
    credentials: AdminCredentials,
    timeout_secs: u64,
}

impl AdminClient {
    pub fn new(credentials: AdminCredentials, timeout_secs: u64) -> Result<Self, ApiError> {
        let timeout_secs = if timeout_secs == 0 {
            DEFAULT_TIMEOUT_SECS
        } else {
            timeout_secs
        };
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ApiError::ClientInit(e.to_string()))?;
        Ok(Self {
            client,
            credentials,
            timeout_secs,
        })
    }

    /// Full URL for a merchant-relative path.
    pub fn url_for(&self, path: &str) -> String {
        format!(
            "{}/merchants/{}{}",
            self.credentials.base_url,
            urlencoding::encode(&self.credentials.merchant_id),
            path
        )
    }
}

#[async_trait]
impl ApiTransport for AdminClient {
    async fn call(&self, request: ApiRequest) -> Result<Value, ApiError> {
        let endpoint = request.path.clone();
        tracing::debug!(method = %request.method, path = %endpoint, "admin api request");

        let mut builder = self
            .client
            .request(request.method.clone(), self.url_for(&request.path))
            .header(AUTHORIZATION, format!("Bearer {}", self.credentials.token))
            .header(ACCEPT, "application/json");
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| transport_error(e, &endpoint, self.timeout_secs))?;
        let status = response.status();
        tracing::debug!(status = status.as_u16(), path = %endpoint, "admin api response");

        if response
            .content_length()
            .is_some_and(|len| len as usize > MAX_RESPONSE_BYTES)
        {
            return Err(oversized(&endpoint));
        }
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = read_capped(response, MAX_RESPONSE_BYTES)
            .await
            .map_err(|e| transport_error(e, &endpoint, self.timeout_secs))?
            .ok_or_else(|| oversized(&endpoint))?;

        if !status.is_success() {
            return Err(status_error(
                status,
                &endpoint,
                retry_after.as_deref(),
                &String::from_utf8_lossy(&body),
            ));
        }
        decode_body(&endpoint, &body)
    }
}

/// Reads the body chunk by chunk; `None` once it grows past `limit` bytes.
async fn read_capped(
    mut response: reqwest::Response,
    limit: usize,
) -> Result<Option<Vec<u8>>, reqwest::Error> {
    let mut body = Vec::new();
    while let Some(chunk) = response.chunk().await? {
        if body.len() + chunk.len() > limit {
            return Ok(None);
        }
        body.extend_from_slice(&chunk);
    }
    Ok(Some(body))
}

fn oversized(endpoint: &str) -> ApiError {
    ApiError::Decode {
        endpoint: endpoint.to_string(),
        message: "response exceeds the 10 MB limit".to_string(),
    }
}

/// Builds the admin transport; kept apart from the store-profile factory.
pub trait AdminClientFactory: Send + Sync {
    fn create(
        &self,
        credentials: &AdminCredentials,
        timeout_secs: u64,
    ) -> Result<Box<dyn ApiTransport>, ApiError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultAdminClientFactory;

impl AdminClientFactory for DefaultAdminClientFactory {
    fn create(
        &self,
        credentials: &AdminCredentials,
        timeout_secs: u64,
    ) -> Result<Box<dyn ApiTransport>, ApiError> {
        Ok(Box::new(AdminClient::new(credentials.clone(), timeout_secs)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::transport::Query;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_resolve_requires_each_piece() {
        assert_eq!(
            AdminCredentials::resolve(None, Some("t"), Some("m")),
            Err(AuthError::MissingAdminBaseUrl)
        );
        assert_eq!(
            AdminCredentials::resolve(Some("http://admin"), Some(" "), Some("m")),
            Err(AuthError::MissingAdminToken)
        );
        assert_eq!(
            AdminCredentials::resolve(Some("http://admin"), Some("t"), None),
            Err(AuthError::MissingAdminMerchantId)
        );

        let creds = AdminCredentials::resolve(Some("http://admin/"), Some("t"), Some("m1"))
            .expect("complete");
        assert_eq!(creds.base_url, "http://admin");
    }

    #[test]
    fn test_url_for_scopes_merchant() {
        let creds = AdminCredentials::resolve(Some("http://admin"), Some("t"), Some("m 1"))
            .expect("complete");
        let client = AdminClient::new(creds, 5).expect("client");
        assert_eq!(
            client.url_for("/payments/account-summary"),
            "http://admin/merchants/m%201/payments/account-summary"
        );
    }

    #[test]
    fn test_debug_hides_token() {
        let creds = AdminCredentials::resolve(Some("http://admin"), Some("adm_secret"), Some("m"))
            .expect("complete");
        assert!(!format!("{:?}", creds).contains("adm_secret"));
    }

    #[tokio::test]
    async fn test_call_prefixes_merchant_path() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/merchants/m1/payments/payouts"))
            .and(query_param("from", "2024-01-01T00:00:00+00:00"))
            .and(header("authorization", "Bearer adm"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
            .expect(1)
            .mount(&server)
            .await;

        let creds = AdminCredentials::resolve(Some(&server.uri()), Some("adm"), Some("m1"))
            .expect("complete");
        let client = DefaultAdminClientFactory.create(&creds, 5).expect("client");
        let request = ApiRequest::get("/payments/payouts").with_query(
            Query::new().string("from", Some("2024-01-01T00:00:00+00:00")),
        );
        let value = client.call(request).await.expect("payouts");
        assert_eq!(value, json!({"items": []}));
    }

    #[tokio::test]
    async fn test_forbidden_maps_to_http_403() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/merchants/m1/orders/o1/shipment/execute"))
            .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
            .mount(&server)
            .await;

        let creds = AdminCredentials::resolve(Some(&server.uri()), Some("adm"), Some("m1"))
            .expect("complete");
        let client = AdminClient::new(creds, 5).expect("client");
        let err = client
            .call(ApiRequest::post("/orders/o1/shipment/execute"))
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(403));
    }

    #[tokio::test]
    async fn test_oversized_response_rejected() {
        let server = MockServer::start().await;
        let big = vec![b' '; MAX_RESPONSE_BYTES + 1];
        Mock::given(method("GET"))
            .and(path("/merchants/m1/payments/account-summary"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(big))
            .mount(&server)
            .await;

        let creds = AdminCredentials::resolve(Some(&server.uri()), Some("adm"), Some("m1"))
            .expect("complete");
        let client = AdminClient::new(creds, 5).expect("client");
        let err = client
            .call(ApiRequest::get("/payments/account-summary"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Decode { .. }));
    }

    #[tokio::test]
    async fn test_read_capped_stops_past_limit() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/payouts"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![b'x'; 64]))
            .mount(&server)
            .await;
        let url = format!("{}/payouts", server.uri());

        let response = reqwest::get(&url).await.expect("response");
        assert_eq!(read_capped(response, 16).await.expect("read"), None);

        let response = reqwest::get(&url).await.expect("response");
        let body = read_capped(response, 64).await.expect("read");
        assert_eq!(body.map(|b| b.len()), Some(64));
    }
}
