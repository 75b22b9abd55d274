use super::{id_arg, paging};
use crate::api::resources::orders::{
    AttributionFilter, OrderAttributions, SubscriptionCreateRequest, SubscriptionListOptions,
    Subscriptions,
};
use crate::cli::dispatcher::CommandContext;
use crate::cli::main_types::PageArgs;
use crate::core::guard::Guard;
use crate::display::{Column, Outcome, col};
use crate::error::{ResultExt, ValidationError};
use crate::utils::validation::{optional_date, parse_date};
use clap::{Subcommand, ValueEnum};

const SUBSCRIPTION_COLUMNS: &[Column] = &[
    col("ID", "id"),
    col("Customer", "customer_id"),
    col("Product", "product_id"),
    col("Interval", "interval"),
    col("Status", "status"),
    col("Next Billing", "next_billing_date"),
];

const ATTRIBUTION_COLUMNS: &[Column] = &[
    col("Order", "order_id"),
    col("Source", "utm_source"),
    col("Medium", "utm_medium"),
    col("Campaign", "utm_campaign"),
    col("Landing Page", "landing_page"),
    col("Created", "created_at"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BillingInterval {
    Day,
    Week,
    Month,
    Year,
}

impl BillingInterval {
    fn as_str(self) -> &'static str {
        match self {
            BillingInterval::Day => "day",
            BillingInterval::Week => "week",
            BillingInterval::Month => "month",
            BillingInterval::Year => "year",
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum SubscriptionCommands {
    /// List subscriptions
    List {
        #[command(flatten)]
        page: PageArgs,
        #[arg(long)]
        customer_id: Option<String>,
        #[arg(long)]
        product_id: Option<String>,
        /// Filter by status (active, paused, cancelled)
        #[arg(long)]
        status: Option<String>,
    },
    /// Show one subscription
    Get { id: String },
    /// Subscribe a customer to a product
    Create {
        #[arg(long)]
        customer_id: String,
        #[arg(long)]
        product_id: String,
        #[arg(long)]
        variant_id: Option<String>,
        #[arg(long, value_enum, default_value_t = BillingInterval::Month)]
        interval: BillingInterval,
        /// Billing every N intervals
        #[arg(long, default_value_t = 1)]
        interval_count: u32,
    },
    /// Cancel a subscription
    Cancel { id: String },
}

#[derive(Default)]
pub struct SubscriptionHandler;

impl SubscriptionHandler {
    pub fn new() -> Self {
        Self
    }

    pub async fn handle(
        &self,
        command: SubscriptionCommands,
        ctx: &CommandContext<'_>,
    ) -> crate::Result<Outcome> {
        match command {
            SubscriptionCommands::List {
                page,
                customer_id,
                product_id,
                status,
            } => {
                let (page, page_size) = paging(&page)?;
                let options = SubscriptionListOptions {
                    page,
                    page_size,
                    customer_id,
                    product_id,
                    status,
                };
                let client = ctx.client()?;
                let payload = Subscriptions::new(client.as_ref())
                    .list(&options)
                    .await
                    .context("failed to list subscriptions")?;
                Ok(Outcome::list("subscriptions", SUBSCRIPTION_COLUMNS, payload))
            }
            SubscriptionCommands::Get { id } => {
                let id = id_arg("id", &id)?;
                let client = ctx.client()?;
                let payload = Subscriptions::new(client.as_ref())
                    .get(&id)
                    .await
                    .context("failed to get subscription")?;
                Ok(Outcome::record(&[], payload))
            }
            SubscriptionCommands::Create {
                customer_id,
                product_id,
                variant_id,
                interval,
                interval_count,
            } => {
                if interval_count == 0 {
                    return Err(ValidationError::InvalidValue {
                        field: "interval-count".to_string(),
                        reason: "must be 1 or greater".to_string(),
                    }
                    .into());
                }
                let request = SubscriptionCreateRequest {
                    customer_id: id_arg("customer-id", &customer_id)?,
                    product_id: id_arg("product-id", &product_id)?,
                    variant_id,
                    interval: interval.as_str().to_string(),
                    interval_count,
                };
                let guard = Guard::new(format!(
                    "subscribe customer {} to product {}",
                    request.customer_id, request.product_id
                ));
                if let Some(stop) = ctx.preflight(&guard)? {
                    return Ok(stop);
                }
                let client = ctx.client()?;
                let payload = Subscriptions::new(client.as_ref())
                    .create(&request)
                    .await
                    .context("failed to create subscription")?;
                Ok(Outcome::record(&[], payload))
            }
            SubscriptionCommands::Cancel { id } => {
                let id = id_arg("id", &id)?;
                let guard = Guard::destructive(format!("cancel subscription {}", id));
                if let Some(stop) = ctx.preflight(&guard)? {
                    return Ok(stop);
                }
                let client = ctx.client()?;
                let payload = Subscriptions::new(client.as_ref())
                    .cancel(&id)
                    .await
                    .context("failed to cancel subscription")?;
                Ok(Outcome::message_with(
                    format!("Cancelled subscription {}.", id),
                    payload,
                ))
            }
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum OrderAttributionCommands {
    /// List order attributions
    List {
        #[command(flatten)]
        page: PageArgs,
        /// UTM source
        #[arg(long)]
        source: Option<String>,
        /// UTM medium
        #[arg(long)]
        medium: Option<String>,
        /// UTM campaign
        #[arg(long)]
        campaign: Option<String>,
        /// Orders created on or after (RFC3339 or YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,
        /// Orders created on or before (RFC3339 or YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
    },
    /// Attribution of one order
    Get { order_id: String },
}

#[derive(Default)]
pub struct OrderAttributionHandler;

impl OrderAttributionHandler {
    pub fn new() -> Self {
        Self
    }

    pub async fn handle(
        &self,
        command: OrderAttributionCommands,
        ctx: &CommandContext<'_>,
    ) -> crate::Result<Outcome> {
        match command {
            OrderAttributionCommands::List {
                page,
                source,
                medium,
                campaign,
                from,
                to,
            } => {
                let (page, page_size) = paging(&page)?;
                if let (Some(from), Some(to)) = (&from, &to) {
                    if parse_date("from", from)? > parse_date("to", to)? {
                        return Err(ValidationError::InvalidValue {
                            field: "from".to_string(),
                            reason: "must not be after --to".to_string(),
                        }
                        .into());
                    }
                }
                let filter = AttributionFilter {
                    page,
                    page_size,
                    source,
                    medium,
                    campaign,
                    created_at_min: optional_date("from", from.as_deref())?,
                    created_at_max: optional_date("to", to.as_deref())?,
                };
                let client = ctx.client()?;
                let payload = OrderAttributions::new(client.as_ref())
                    .list(&filter)
                    .await
                    .context("failed to list order attributions")?;
                Ok(Outcome::list("attributions", ATTRIBUTION_COLUMNS, payload))
            }
            OrderAttributionCommands::Get { order_id } => {
                let order_id = id_arg("order-id", &order_id)?;
                let client = ctx.client()?;
                let payload = OrderAttributions::new(client.as_ref())
                    .for_order(&order_id)
                    .await
                    .context("failed to get order attribution")?;
                Ok(Outcome::record(ATTRIBUTION_COLUMNS, payload))
            }
        }
    }
}
