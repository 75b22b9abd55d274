//! Customer groups, addresses, member points and user credits.

use super::Resource;
use crate::api::transport::{ApiRequest, ApiTransport, Query};
use crate::error::ApiError;
use serde::Serialize;
use serde_json::{Map, Value, json};

pub struct CustomerGroups<'a>(Resource<'a>);

impl<'a> CustomerGroups<'a> {
    pub fn new(transport: &'a dyn ApiTransport) -> Self {
        Self(Resource::new(transport, "/customer_groups"))
    }

    pub async fn list(&self, page: u32, page_size: u32, keyword: Option<&str>) -> Result<Value, ApiError> {
        self.0
            .list(Query::page(page, page_size).string("q", keyword))
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

    /// Ids of the customers in a group.
    pub async fn customer_ids(&self, id: &str, page: u32, page_size: u32) -> Result<Value, ApiError> {
        self.0
            .send(
                ApiRequest::get(format!("{}/customer_ids", self.0.item_path(id)))
                    .with_query(Query::page(page, page_size)),
            )
            .await
    }
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct AddressInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub default: bool,
}

/// Addresses of one customer.
pub struct CustomerAddresses<'a>(Resource<'a>);

impl<'a> CustomerAddresses<'a> {
    pub fn new(transport: &'a dyn ApiTransport, customer_id: &str) -> Self {
        Self(Resource::new(
            transport,
            format!("/customers/{}/addresses", urlencoding::encode(customer_id)),
        ))
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

    pub async fn delete(&self, id: &str) -> Result<Value, ApiError> {
        self.0.delete(id).await
    }

    pub async fn set_default(&self, id: &str) -> Result<Value, ApiError> {
        self.0
            .send(ApiRequest::put(format!("{}/default", self.0.item_path(id))))
            .await
    }
}

/// Signed balance change for points or credits.
#[derive(Debug, Clone, PartialEq)]
pub struct BalanceAdjustment {
    pub amount: i64,
    pub description: Option<String>,
}

/// Balance endpoints shared by member points and user credits:
/// `{customer}/{kind}`, `{customer}/{kind}/transactions`.
struct CustomerBalance<'a> {
    transport: &'a dyn ApiTransport,
    base: String,
    amount_key: &'static str,
}

impl<'a> CustomerBalance<'a> {
    fn new(
        transport: &'a dyn ApiTransport,
        customer_id: &str,
        kind: &str,
        amount_key: &'static str,
    ) -> Self {
        Self {
            transport,
            base: format!("/customers/{}/{}", urlencoding::encode(customer_id), kind),
            amount_key,
        }
    }

    async fn get(&self) -> Result<Value, ApiError> {
        self.transport.call(ApiRequest::get(self.base.clone())).await
    }

    async fn transactions(&self, query: Query) -> Result<Value, ApiError> {
        self.transport
            .call(ApiRequest::get(format!("{}/transactions", self.base)).with_query(query))
            .await
    }

    async fn adjust(&self, adjustment: &BalanceAdjustment) -> Result<Value, ApiError> {
        let mut body = Map::new();
        body.insert(self.amount_key.to_string(), json!(adjustment.amount));
        if let Some(description) = &adjustment.description {
            body.insert("description".to_string(), json!(description));
        }
        self.transport
            .call(ApiRequest::post(self.base.clone()).with_body(Value::Object(body)))
            .await
    }
}

pub struct MemberPoints<'a>(CustomerBalance<'a>);

impl<'a> MemberPoints<'a> {
    pub fn new(transport: &'a dyn ApiTransport, customer_id: &str) -> Self {
        Self(CustomerBalance::new(transport, customer_id, "member_points", "points"))
    }

    pub async fn get(&self) -> Result<Value, ApiError> {
        self.0.get().await
    }

    pub async fn transactions(
        &self,
        page: u32,
        page_size: u32,
        kind: Option<&str>,
    ) -> Result<Value, ApiError> {
        self.0
            .transactions(Query::page(page, page_size).string("type", kind))
            .await
    }

    pub async fn adjust(&self, adjustment: &BalanceAdjustment) -> Result<Value, ApiError> {
        self.0.adjust(adjustment).await
    }
}

/// Store-wide point earning rules; not tied to a customer.
pub async fn member_point_rules(transport: &dyn ApiTransport) -> Result<Value, ApiError> {
    transport.call(ApiRequest::get("/member_point_rules")).await
}

pub struct UserCredits<'a>(CustomerBalance<'a>);

impl<'a> UserCredits<'a> {
    pub fn new(transport: &'a dyn ApiTransport, customer_id: &str) -> Self {
        Self(CustomerBalance::new(transport, customer_id, "user_credits", "amount"))
    }

    pub async fn get(&self) -> Result<Value, ApiError> {
        self.0.get().await
    }

    pub async fn transactions(&self, page: u32, page_size: u32) -> Result<Value, ApiError> {
        self.0.transactions(Query::page(page, page_size)).await
    }

    pub async fn adjust(&self, adjustment: &BalanceAdjustment) -> Result<Value, ApiError> {
        self.0.adjust(adjustment).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::resources::testing::RecordingTransport;
    use reqwest::Method;

    #[tokio::test]
    async fn test_member_points_paths() {
        let transport = RecordingTransport::new();
        let points = MemberPoints::new(&transport, "cus_1");
        points.get().await.expect("get");
        points
            .transactions(1, 20, Some("earn"))
            .await
            .expect("transactions");
        points
            .adjust(&BalanceAdjustment {
                amount: -50,
                description: Some("goodwill".to_string()),
            })
            .await
            .expect("adjust");
        member_point_rules(&transport).await.expect("rules");

        let requests = transport.requests();
        assert_eq!(requests[0].path, "/customers/cus_1/member_points");
        assert_eq!(requests[1].path, "/customers/cus_1/member_points/transactions");
        assert!(requests[1]
            .query
            .contains(&("type".to_string(), "earn".to_string())));
        assert_eq!(requests[2].method, Method::POST);
        assert_eq!(
            requests[2].body,
            Some(json!({"points": -50, "description": "goodwill"}))
        );
        assert_eq!(requests[3].path, "/member_point_rules");
    }

    #[tokio::test]
    async fn test_user_credit_paths() {
        let transport = RecordingTransport::new();
        UserCredits::new(&transport, "cus_2")
            .transactions(2, 10)
            .await
            .expect("transactions");
        assert_eq!(
            transport.last().path,
            "/customers/cus_2/user_credits/transactions"
        );
    }

    #[tokio::test]
    async fn test_address_set_default() {
        let transport = RecordingTransport::new();
        CustomerAddresses::new(&transport, "cus_1")
            .set_default("addr_1")
            .await
            .expect("set default");
        let sent = transport.last();
        assert_eq!(sent.method, Method::PUT);
        assert_eq!(sent.path, "/customers/cus_1/addresses/addr_1/default");
    }

    #[test]
    fn test_address_input_omits_false_default() {
        let input = AddressInput {
            city: Some("Taipei".to_string()),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&input).expect("serialize"),
            json!({"city": "Taipei"})
        );
    }

    #[tokio::test]
    async fn test_customer_group_ids() {
        let transport = RecordingTransport::new();
        CustomerGroups::new(&transport)
            .customer_ids("g1", 1, 100)
            .await
            .expect("ids");
        assert_eq!(transport.last().path, "/customer_groups/g1/customer_ids");
    }
}
