//! HTTP layer: the Open API client, the separate Admin API client, the
//! transport seam both implement, and the resource families built on it.

pub mod admin;
pub mod client;
pub mod resources;
pub mod transport;

pub use admin::{AdminClient, AdminClientFactory, AdminCredentials, DefaultAdminClientFactory};
pub use client::{ClientFactory, ClientSettings, DefaultClientFactory, ShoplineClient};
pub use transport::{ApiRequest, ApiTransport, Query};
