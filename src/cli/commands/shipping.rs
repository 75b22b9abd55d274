use super::{id_arg, paging};
use crate::api::resources::shipping::{
    AdminShipping, CarrierServices, ExecuteShipmentRequest, ShippingZones,
};
use crate::cli::dispatcher::CommandContext;
use crate::cli::main_types::{BodyArgs, PageArgs};
use crate::core::guard::Guard;
use crate::display::{Column, Outcome, col};
use crate::error::ResultExt;
use clap::Subcommand;

const CARRIER_COLUMNS: &[Column] = &[
    col("ID", "id"),
    col("Name", "name"),
    col("Callback URL", "callback_url"),
    col("Active", "active"),
];

const ZONE_COLUMNS: &[Column] = &[
    col("ID", "id"),
    col("Name", "name"),
    col("Countries", "countries"),
];

#[derive(Subcommand, Debug)]
pub enum ShippingCommands {
    /// Shipment status of an order (Admin API)
    Status { order_id: String },
    /// Tracking details of an order (Admin API)
    Tracking { order_id: String },
    /// Ship an order (Admin API)
    Execute {
        order_id: String,
        #[arg(long)]
        order_number: Option<String>,
        /// Staff member recorded as shipping the order
        #[arg(long)]
        performer_id: Option<String>,
    },
}

#[derive(Default)]
pub struct ShippingHandler;

impl ShippingHandler {
    pub fn new() -> Self {
        Self
    }

    pub async fn handle(
        &self,
        command: ShippingCommands,
        ctx: &CommandContext<'_>,
    ) -> crate::Result<Outcome> {
        match command {
            ShippingCommands::Status { order_id } => {
                let order_id = id_arg("order-id", &order_id)?;
                let client = ctx.admin_client()?;
                let payload = AdminShipping::new(client.as_ref())
                    .status(&order_id)
                    .await
                    .context("failed to get shipment status")?;
                Ok(Outcome::record(&[], payload))
            }
            ShippingCommands::Tracking { order_id } => {
                let order_id = id_arg("order-id", &order_id)?;
                let client = ctx.admin_client()?;
                let payload = AdminShipping::new(client.as_ref())
                    .tracking(&order_id)
                    .await
                    .context("failed to get tracking info")?;
                Ok(Outcome::record(&[], payload))
            }
            ShippingCommands::Execute {
                order_id,
                order_number,
                performer_id,
            } => {
                let order_id = id_arg("order-id", &order_id)?;
                let request = ExecuteShipmentRequest {
                    order_number,
                    performer_id,
                };
                let guard = Guard::new(format!("ship order {}", order_id));
                if let Some(stop) = ctx.preflight(&guard)? {
                    return Ok(stop);
                }
                let client = ctx.admin_client()?;
                let payload = AdminShipping::new(client.as_ref())
                    .execute(&order_id, &request)
                    .await
                    .context("failed to execute shipment")?;
                Ok(Outcome::message_with(
                    format!("Shipment started for order {}.", order_id),
                    payload,
                ))
            }
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum CarrierServiceCommands {
    /// List carrier services
    List {
        #[command(flatten)]
        page: PageArgs,
    },
    /// Show one carrier service
    Get { id: String },
    /// Register a carrier service from a JSON body
    Create {
        #[command(flatten)]
        body: BodyArgs,
    },
    /// Update a carrier service from a JSON body
    Update {
        id: String,
        #[command(flatten)]
        body: BodyArgs,
    },
    /// Delete a carrier service
    Delete { id: String },
}

#[derive(Default)]
pub struct CarrierServiceHandler;

impl CarrierServiceHandler {
    pub fn new() -> Self {
        Self
    }

    pub async fn handle(
        &self,
        command: CarrierServiceCommands,
        ctx: &CommandContext<'_>,
    ) -> crate::Result<Outcome> {
        match command {
            CarrierServiceCommands::List { page } => {
                let (page, page_size) = paging(&page)?;
                let client = ctx.client()?;
                let payload = CarrierServices::new(client.as_ref())
                    .list(page, page_size)
                    .await
                    .context("failed to list carrier services")?;
                Ok(Outcome::list("carrier services", CARRIER_COLUMNS, payload))
            }
            CarrierServiceCommands::Get { id } => {
                let id = id_arg("id", &id)?;
                let client = ctx.client()?;
                let payload = CarrierServices::new(client.as_ref())
                    .get(&id)
                    .await
                    .context("failed to get carrier service")?;
                Ok(Outcome::record(&[], payload))
            }
            CarrierServiceCommands::Create { body } => {
                let body = body.require()?;
                if let Some(stop) = ctx.preflight(&Guard::new("create carrier service"))? {
                    return Ok(stop);
                }
                let client = ctx.client()?;
                let payload = CarrierServices::new(client.as_ref())
                    .create(body)
                    .await
                    .context("failed to create carrier service")?;
                Ok(Outcome::record(&[], payload))
            }
            CarrierServiceCommands::Update { id, body } => {
                let id = id_arg("id", &id)?;
                let body = body.require()?;
                let guard = Guard::new(format!("update carrier service {}", id));
                if let Some(stop) = ctx.preflight(&guard)? {
                    return Ok(stop);
                }
                let client = ctx.client()?;
                let payload = CarrierServices::new(client.as_ref())
                    .update(&id, body)
                    .await
                    .context("failed to update carrier service")?;
                Ok(Outcome::record(&[], payload))
            }
            CarrierServiceCommands::Delete { id } => {
                let id = id_arg("id", &id)?;
                let guard = Guard::destructive(format!("delete carrier service {}", id));
                if let Some(stop) = ctx.preflight(&guard)? {
                    return Ok(stop);
                }
                let client = ctx.client()?;
                CarrierServices::new(client.as_ref())
                    .delete(&id)
                    .await
                    .context("failed to delete carrier service")?;
                Ok(Outcome::message(format!("Deleted carrier service {}.", id)))
            }
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum ShippingZoneCommands {
    /// List shipping zones
    List {
        #[command(flatten)]
        page: PageArgs,
    },
    /// Show one shipping zone
    Get { id: String },
    /// Create a shipping zone from a JSON body
    Create {
        #[command(flatten)]
        body: BodyArgs,
    },
    /// Update a shipping zone from a JSON body
    Update {
        id: String,
        #[command(flatten)]
        body: BodyArgs,
    },
    /// Delete a shipping zone
    Delete { id: String },
}

#[derive(Default)]
pub struct ShippingZoneHandler;

impl ShippingZoneHandler {
    pub fn new() -> Self {
        Self
    }

    pub async fn handle(
        &self,
        command: ShippingZoneCommands,
        ctx: &CommandContext<'_>,
    ) -> crate::Result<Outcome> {
        match command {
            ShippingZoneCommands::List { page } => {
                let (page, page_size) = paging(&page)?;
                let client = ctx.client()?;
                let payload = ShippingZones::new(client.as_ref())
                    .list(page, page_size)
                    .await
                    .context("failed to list shipping zones")?;
                Ok(Outcome::list("shipping zones", ZONE_COLUMNS, payload))
            }
            ShippingZoneCommands::Get { id } => {
                let id = id_arg("id", &id)?;
                let client = ctx.client()?;
                let payload = ShippingZones::new(client.as_ref())
                    .get(&id)
                    .await
                    .context("failed to get shipping zone")?;
                Ok(Outcome::record(&[], payload))
            }
            ShippingZoneCommands::Create { body } => {
                let body = body.require()?;
                if let Some(stop) = ctx.preflight(&Guard::new("create shipping zone"))? {
                    return Ok(stop);
                }
                let client = ctx.client()?;
                let payload = ShippingZones::new(client.as_ref())
                    .create(body)
                    .await
                    .context("failed to create shipping zone")?;
                Ok(Outcome::record(&[], payload))
            }
            ShippingZoneCommands::Update { id, body } => {
                let id = id_arg("id", &id)?;
                let body = body.require()?;
                let guard = Guard::new(format!("update shipping zone {}", id));
                if let Some(stop) = ctx.preflight(&guard)? {
                    return Ok(stop);
                }
                let client = ctx.client()?;
                let payload = ShippingZones::new(client.as_ref())
                    .update(&id, body)
                    .await
                    .context("failed to update shipping zone")?;
                Ok(Outcome::record(&[], payload))
            }
            ShippingZoneCommands::Delete { id } => {
                let id = id_arg("id", &id)?;
                let guard = Guard::destructive(format!("delete shipping zone {}", id));
                if let Some(stop) = ctx.preflight(&guard)? {
                    return Ok(stop);
                }
                let client = ctx.client()?;
                ShippingZones::new(client.as_ref())
                    .delete(&id)
                    .await
                    .context("failed to delete shipping zone")?;
                Ok(Outcome::message(format!("Deleted shipping zone {}.", id)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::cli::dispatcher::AdminOptions;
    use crate::cli::dispatcher::testing::{harness, harness_with};
    use crate::cli::main_types::Cli;
    use crate::core::guard::GuardPolicy;
    use crate::display::Outcome;
    use clap::Parser;
    use reqwest::Method;
    use serde_json::json;

    fn parse(args: &[&str]) -> crate::cli::main_types::Commands {
        let mut argv = vec!["spl"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).expect("parse").command
    }

    #[tokio::test]
    async fn test_execute_uses_admin_client() {
        let h = harness_with(
            GuardPolicy::default(),
            true,
            AdminOptions {
                base_url: Some("https://admin.example.test".to_string()),
                token: Some("adm".to_string()),
                merchant_id: Some("m7".to_string()),
            },
        );
        h.dispatcher
            .dispatch(parse(&[
                "shipping",
                "execute",
                "o1",
                "--order-number",
                "1001",
                "--performer-id",
                "staff_2",
            ]))
            .await
            .expect("execute");

        assert_eq!(h.log.clients_built(), vec!["admin:m7"]);
        let sent = &h.log.requests()[0];
        assert_eq!(sent.method, Method::POST);
        assert_eq!(sent.path, "/orders/o1/shipment/execute");
        assert_eq!(
            sent.body,
            Some(json!({"orderNumber": "1001", "performerId": "staff_2"}))
        );
    }

    #[tokio::test]
    async fn test_zone_delete_dry_run() {
        let h = harness(
            GuardPolicy {
                dry_run: true,
                yes: false,
                ..Default::default()
            },
            false,
        );
        let outcome = h
            .dispatcher
            .dispatch(parse(&["shipping-zones", "delete", "z1"]))
            .await
            .expect("dry run");
        match outcome {
            Outcome::Message { text, .. } => {
                assert_eq!(text, "[DRY-RUN] Would delete shipping zone z1")
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert!(h.log.clients_built().is_empty());
    }

    #[tokio::test]
    async fn test_carrier_create_posts_body() {
        let h = harness(GuardPolicy::default(), true);
        h.dispatcher
            .dispatch(parse(&[
                "carrier-services",
                "create",
                "--body",
                r#"{"name":"Rates","callback_url":"https://rates.example.test"}"#,
            ]))
            .await
            .expect("create");
        let sent = &h.log.requests()[0];
        assert_eq!(sent.path, "/carrier_services");
        assert_eq!(sent.body.as_ref().expect("body")["name"], "Rates");
    }
}
