use super::transport::{
    ApiRequest, ApiTransport, decode_body, status_error, transport_error,
};
use crate::core::resolver::ResolvedProfile;
use crate::error::ApiError;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, RETRY_AFTER};
use reqwest::{Client, RequestBuilder};
use serde_json::Value;
use std::fmt;
use std::time::Duration;

pub const OPEN_API_BASE_URL: &str = "https://open.shopline.io/v1";
pub const API_BASE_URL_ENV: &str = "SHOPLINE_API_BASE_URL";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub(crate) const USER_AGENT: &str = concat!("shopline-cli/", env!("CARGO_PKG_VERSION"));

const ACCESS_TOKEN_HEADER: &str = "X-Shopline-Access-Token";

/// Where requests go and how long they may take.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: OPEN_API_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ClientSettings {
    /// Env override beats config; both fall back to the public endpoint.
    pub fn resolve(
        env_base_url: Option<&str>,
        config_base_url: Option<&str>,
        timeout_secs: Option<u64>,
    ) -> Self {
        let base_url = [env_base_url, config_base_url]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|v| !v.is_empty())
            .unwrap_or(OPEN_API_BASE_URL)
            .trim_end_matches('/')
            .to_string();
        Self {
            base_url,
            timeout_secs: timeout_secs
                .filter(|t| *t > 0)
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// Open API client bound to one store handle and access token.
#[derive(Clone)]
pub struct ShoplineClient {
    client: Client,
    handle: String,
    access_token: String,
    base_url: String,
    timeout_secs: u64,
}

impl fmt::Debug for ShoplineClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShoplineClient")
            .field("handle", &self.handle)
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish_non_exhaustive()
    }
}

impl ShoplineClient {
    pub fn new(
        handle: impl Into<String>,
        access_token: impl Into<String>,
        settings: &ClientSettings,
    ) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ApiError::ClientInit(e.to_string()))?;

        Ok(Self {
            client,
            handle: handle.into(),
            access_token: access_token.into(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            timeout_secs: settings.timeout_secs,
        })
    }

    pub fn handle(&self) -> &str {
        &self.handle
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs
    }

    pub fn build_request(&self, request: &ApiRequest) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, request.path);
        let mut builder = self
            .client
            .request(request.method.clone(), url)
            .header(AUTHORIZATION, format!("Bearer {}", self.access_token))
            .header(ACCESS_TOKEN_HEADER, &self.access_token)
            .header(ACCEPT, "application/json");

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.header(CONTENT_TYPE, "application/json").json(body);
        }
        builder
    }
}

#[async_trait]
impl ApiTransport for ShoplineClient {
    async fn call(&self, request: ApiRequest) -> Result<Value, ApiError> {
        let endpoint = request.path.clone();
        tracing::debug!(method = %request.method, path = %endpoint, "api request");

        let response = self
            .build_request(&request)
            .send()
            .await
            .map_err(|e| transport_error(e, &endpoint, self.timeout_secs))?;

        let status = response.status();
        tracing::debug!(status = status.as_u16(), path = %endpoint, "api response");

        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response
            .bytes()
            .await
            .map_err(|e| transport_error(e, &endpoint, self.timeout_secs))?;

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

/// Builds the transport for a resolved profile.
pub trait ClientFactory: Send + Sync {
    fn create(
        &self,
        profile: &ResolvedProfile,
        settings: &ClientSettings,
    ) -> Result<Box<dyn ApiTransport>, ApiError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultClientFactory;

impl ClientFactory for DefaultClientFactory {
    fn create(
        &self,
        profile: &ResolvedProfile,
        settings: &ClientSettings,
    ) -> Result<Box<dyn ApiTransport>, ApiError> {
        let creds = &profile.credentials;
        Ok(Box::new(ShoplineClient::new(
            creds.handle.clone(),
            creds.access_token.clone(),
            settings,
        )?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::transport::Query;
    use crate::core::resolver::ProfileSource;
    use crate::storage::credentials::StoredCredentials;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn settings_for(server: &MockServer) -> ClientSettings {
        ClientSettings {
            base_url: server.uri(),
            timeout_secs: 5,
        }
    }

    #[test]
    fn test_settings_resolution() {
        let s = ClientSettings::resolve(None, None, None);
        assert_eq!(s, ClientSettings::default());

        let s = ClientSettings::resolve(Some("http://env/"), Some("http://cfg"), Some(10));
        assert_eq!(s.base_url, "http://env");
        assert_eq!(s.timeout_secs, 10);

        let s = ClientSettings::resolve(Some(""), Some("http://cfg"), Some(0));
        assert_eq!(s.base_url, "http://cfg");
        assert_eq!(s.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_factory_builds_independent_clients() {
        let profile = ResolvedProfile {
            credentials: StoredCredentials::new("demo", "demoshop", "tok_123456789"),
            source: ProfileSource::Named,
        };
        let before = profile.clone();
        let settings = ClientSettings::default();

        let a = ShoplineClient::new("demoshop", "tok_123456789", &settings).expect("client a");
        let b = ShoplineClient::new("demoshop", "tok_123456789", &settings).expect("client b");
        assert_eq!(a.handle(), b.handle());
        assert_eq!(a.base_url(), OPEN_API_BASE_URL);
        assert_eq!(a.timeout_secs(), b.timeout_secs());

        assert!(DefaultClientFactory.create(&profile, &settings).is_ok());
        assert_eq!(profile, before);
    }

    #[test]
    fn test_debug_hides_token() {
        let client = ShoplineClient::new("demoshop", "tok_secret", &ClientSettings::default())
            .expect("client");
        assert!(!format!("{:?}", client).contains("tok_secret"));
    }

    #[tokio::test]
    async fn test_get_sends_auth_headers_and_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/coupons"))
            .and(header("authorization", "Bearer tok_1"))
            .and(header("x-shopline-access-token", "tok_1"))
            .and(query_param("page", "2"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"items": [], "total_count": 0})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = ShoplineClient::new("demo", "tok_1", &settings_for(&server)).expect("client");
        let request = ApiRequest::get("/coupons").with_query(Query::page(2, 20));
        let value = client.call(request).await.expect("request succeeds");
        assert_eq!(value["total_count"], json!(0));
    }

    #[tokio::test]
    async fn test_post_sends_json_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/coupons"))
            .and(body_json(json!({"code": "SAVE10"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "c1"})))
            .mount(&server)
            .await;

        let client = ShoplineClient::new("demo", "tok", &settings_for(&server)).expect("client");
        let value = client
            .call(ApiRequest::post("/coupons").with_body(json!({"code": "SAVE10"})))
            .await
            .expect("created");
        assert_eq!(value, json!({"id": "c1"}));
    }

    #[tokio::test]
    async fn test_not_found_maps_to_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/coupons/missing"))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(json!({"message": "Coupon not found"})),
            )
            .mount(&server)
            .await;

        let client = ShoplineClient::new("demo", "tok", &settings_for(&server)).expect("client");
        let err = client
            .call(ApiRequest::get("/coupons/missing"))
            .await
            .unwrap_err();
        match err {
            ApiError::Http {
                status,
                endpoint,
                message,
            } => {
                assert_eq!(status, 404);
                assert_eq!(endpoint, "/coupons/missing");
                assert_eq!(message, "Coupon not found");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_rate_limit_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/orders"))
            .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "4"))
            .expect(1)
            .mount(&server)
            .await;

        let client = ShoplineClient::new("demo", "tok", &settings_for(&server)).expect("client");
        let err = client.call(ApiRequest::get("/orders")).await.unwrap_err();
        assert!(matches!(
            err,
            ApiError::RateLimited {
                retry_after_secs: 4,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_no_content_is_null() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/coupons/c1"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let client = ShoplineClient::new("demo", "tok", &settings_for(&server)).expect("client");
        let value = client
            .call(ApiRequest::delete("/coupons/c1"))
            .await
            .expect("deleted");
        assert_eq!(value, Value::Null);
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        let settings = ClientSettings {
            base_url: "http://127.0.0.1:9".to_string(),
            timeout_secs: 2,
        };
        let client = ShoplineClient::new("demo", "tok", &settings).expect("client");
        let err = client.call(ApiRequest::get("/coupons")).await.unwrap_err();
        assert!(matches!(
            err,
            ApiError::Transport { .. } | ApiError::Timeout { .. }
        ));
    }
}
