use super::{id_arg, paging, split_ids};
use crate::api::resources::promotions::{
    CouponCreateRequest, Coupons, DiscountType, FlashPriceCampaigns, FlashPriceInput,
    SaleCreateRequest, Sales,
};
use crate::cli::dispatcher::CommandContext;
use crate::cli::main_types::{BodyArgs, PageArgs};
use crate::core::guard::Guard;
use crate::display::{Column, Outcome, col};
use crate::error::{ResultExt, ValidationError};
use crate::utils::validation::{optional_date, require_value};
use clap::{Subcommand, ValueEnum};

const COUPON_COLUMNS: &[Column] = &[
    col("ID", "id"),
    col("Code", "code"),
    col("Type", "discount_type"),
    col("Value", "discount_value"),
    col("Status", "status"),
    col("Used", "usage_count"),
    col("Ends", "ends_at"),
];

const COUPON_FIELDS: &[Column] = &[
    col("ID", "id"),
    col("Code", "code"),
    col("Title", "title"),
    col("Discount Type", "discount_type"),
    col("Discount Value", "discount_value"),
    col("Min Purchase", "min_purchase"),
    col("Usage Limit", "usage_limit"),
    col("Per Customer", "usage_limit_per_customer"),
    col("Used", "usage_count"),
    col("Status", "status"),
    col("Starts", "starts_at"),
    col("Ends", "ends_at"),
];

const SALE_COLUMNS: &[Column] = &[
    col("ID", "id"),
    col("Title", "title"),
    col("Type", "discount_type"),
    col("Value", "discount_value"),
    col("Applies To", "applies_to"),
    col("Status", "status"),
    col("Ends", "ends_at"),
];

const FLASH_PRICE_COLUMNS: &[Column] = &[
    col("ID", "id"),
    col("Product", "product_id"),
    col("Price", "flash_price"),
    col("Quantity", "quantity"),
    col("Sold", "sold_count"),
    col("Status", "status"),
    col("Ends", "ends_at"),
];

fn positive(field: &str, value: f64) -> Result<f64, ValidationError> {
    if value.is_nan() || value <= 0.0 {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }
    Ok(value)
}

fn discount(kind: DiscountType, value: f64) -> Result<f64, ValidationError> {
    let value = positive("discount-value", value)?;
    if kind == DiscountType::Percentage && value > 100.0 {
        return Err(ValidationError::InvalidValue {
            field: "discount-value".to_string(),
            reason: "a percentage discount cannot exceed 100".to_string(),
        });
    }
    Ok(value)
}

#[derive(Subcommand, Debug)]
pub enum CouponCommands {
    /// List coupons
    List {
        #[command(flatten)]
        page: PageArgs,
        /// Filter by status (active, inactive, expired)
        #[arg(long)]
        status: Option<String>,
    },
    /// Show one coupon
    Get { id: String },
    /// Find a coupon by its code
    Lookup { code: String },
    /// Create a coupon
    #[command(after_help = "Examples:
  spl coupons create --code SAVE10 --discount-type percentage --discount-value 10
  spl coupons create --code FIVEOFF --discount-type fixed-amount --discount-value 5 --usage-limit 100")]
    Create {
        /// Code customers enter at checkout
        #[arg(long)]
        code: String,
        #[arg(long, value_enum)]
        discount_type: DiscountType,
        #[arg(long)]
        discount_value: f64,
        #[arg(long)]
        title: Option<String>,
        /// Minimum order amount
        #[arg(long)]
        min_purchase: Option<f64>,
        /// Maximum number of uses
        #[arg(long)]
        usage_limit: Option<u32>,
        /// Maximum uses per customer
        #[arg(long)]
        per_customer: Option<u32>,
        /// Start date (RFC3339 or YYYY-MM-DD)
        #[arg(long)]
        starts_at: Option<String>,
        /// End date (RFC3339 or YYYY-MM-DD)
        #[arg(long)]
        ends_at: Option<String>,
    },
    /// Update a coupon from a JSON body
    Update {
        id: String,
        #[command(flatten)]
        body: BodyArgs,
    },
    /// Activate a coupon
    Activate { id: String },
    /// Deactivate a coupon
    Deactivate { id: String },
    /// Delete a coupon
    Delete { id: String },
}

#[derive(Default)]
pub struct CouponHandler;

impl CouponHandler {
    pub fn new() -> Self {
        Self
    }

    pub async fn handle(
        &self,
        command: CouponCommands,
        ctx: &CommandContext<'_>,
    ) -> crate::Result<Outcome> {
        match command {
            CouponCommands::List { page, status } => {
                let (page, page_size) = paging(&page)?;
                let client = ctx.client()?;
                let payload = Coupons::new(client.as_ref())
                    .list(page, page_size, status.as_deref())
                    .await
                    .context("failed to list coupons")?;
                Ok(Outcome::list("coupons", COUPON_COLUMNS, payload))
            }
            CouponCommands::Get { id } => {
                let id = id_arg("id", &id)?;
                let client = ctx.client()?;
                let payload = Coupons::new(client.as_ref())
                    .get(&id)
                    .await
                    .context("failed to get coupon")?;
                Ok(Outcome::record(COUPON_FIELDS, payload))
            }
            CouponCommands::Lookup { code } => {
                let code = id_arg("code", &code)?;
                let client = ctx.client()?;
                let payload = Coupons::new(client.as_ref())
                    .lookup(&code)
                    .await
                    .context("failed to look up coupon")?;
                Ok(Outcome::record(COUPON_FIELDS, payload))
            }
            CouponCommands::Create {
                code,
                discount_type,
                discount_value,
                title,
                min_purchase,
                usage_limit,
                per_customer,
                starts_at,
                ends_at,
            } => {
                let request = CouponCreateRequest {
                    code: require_value("code", &code)?.to_string(),
                    discount_type,
                    discount_value: discount(discount_type, discount_value)?,
                    title,
                    min_purchase,
                    usage_limit,
                    usage_limit_per_customer: per_customer,
                    starts_at: optional_date("starts-at", starts_at.as_deref())?,
                    ends_at: optional_date("ends-at", ends_at.as_deref())?,
                };
                let guard = Guard::new(format!("create coupon {}", request.code));
                if let Some(stop) = ctx.preflight(&guard)? {
                    return Ok(stop);
                }
                let client = ctx.client()?;
                let payload = Coupons::new(client.as_ref())
                    .create(&request)
                    .await
                    .context("failed to create coupon")?;
                Ok(Outcome::record(COUPON_FIELDS, payload))
            }
            CouponCommands::Update { id, body } => {
                let id = id_arg("id", &id)?;
                let body = body.require()?;
                if let Some(stop) = ctx.preflight(&Guard::new(format!("update coupon {}", id)))? {
                    return Ok(stop);
                }
                let client = ctx.client()?;
                let payload = Coupons::new(client.as_ref())
                    .update(&id, body)
                    .await
                    .context("failed to update coupon")?;
                Ok(Outcome::record(COUPON_FIELDS, payload))
            }
            CouponCommands::Activate { id } => {
                let id = id_arg("id", &id)?;
                if let Some(stop) = ctx.preflight(&Guard::new(format!("activate coupon {}", id)))? {
                    return Ok(stop);
                }
                let client = ctx.client()?;
                let payload = Coupons::new(client.as_ref())
                    .activate(&id)
                    .await
                    .context("failed to activate coupon")?;
                Ok(Outcome::message_with(format!("Activated coupon {}.", id), payload))
            }
            CouponCommands::Deactivate { id } => {
                let id = id_arg("id", &id)?;
                let guard = Guard::new(format!("deactivate coupon {}", id));
                if let Some(stop) = ctx.preflight(&guard)? {
                    return Ok(stop);
                }
                let client = ctx.client()?;
                let payload = Coupons::new(client.as_ref())
                    .deactivate(&id)
                    .await
                    .context("failed to deactivate coupon")?;
                Ok(Outcome::message_with(format!("Deactivated coupon {}.", id), payload))
            }
            CouponCommands::Delete { id } => {
                let id = id_arg("id", &id)?;
                let guard = Guard::destructive(format!("delete coupon {}", id));
                if let Some(stop) = ctx.preflight(&guard)? {
                    return Ok(stop);
                }
                let client = ctx.client()?;
                Coupons::new(client.as_ref())
                    .delete(&id)
                    .await
                    .context("failed to delete coupon")?;
                Ok(Outcome::message(format!("Deleted coupon {}.", id)))
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AppliesTo {
    All,
    Products,
    Collections,
}

impl AppliesTo {
    fn as_str(self) -> &'static str {
        match self {
            AppliesTo::All => "all",
            AppliesTo::Products => "products",
            AppliesTo::Collections => "collections",
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum SaleCommands {
    /// List sales
    List {
        #[command(flatten)]
        page: PageArgs,
        /// Filter by status (active, scheduled, expired, inactive)
        #[arg(long)]
        status: Option<String>,
    },
    /// Show one sale
    Get { id: String },
    /// Create a sale
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, value_enum)]
        discount_type: DiscountType,
        #[arg(long)]
        discount_value: f64,
        #[arg(long, value_enum, default_value_t = AppliesTo::All)]
        applies_to: AppliesTo,
        /// Product ids, comma separated
        #[arg(long)]
        product_ids: Vec<String>,
        /// Collection ids, comma separated
        #[arg(long)]
        collection_ids: Vec<String>,
        /// Start date (RFC3339 or YYYY-MM-DD)
        #[arg(long)]
        starts_at: Option<String>,
        /// End date (RFC3339 or YYYY-MM-DD)
        #[arg(long)]
        ends_at: Option<String>,
    },
    /// Activate a sale
    Activate { id: String },
    /// Deactivate a sale
    Deactivate { id: String },
    /// Delete a sale
    Delete { id: String },
    /// Remove products from a sale
    DeleteProducts {
        id: String,
        /// Product ids, comma separated
        #[arg(long, required = true)]
        product_ids: Vec<String>,
    },
}

#[derive(Default)]
pub struct SaleHandler;

impl SaleHandler {
    pub fn new() -> Self {
        Self
    }

    pub async fn handle(
        &self,
        command: SaleCommands,
        ctx: &CommandContext<'_>,
    ) -> crate::Result<Outcome> {
        match command {
            SaleCommands::List { page, status } => {
                let (page, page_size) = paging(&page)?;
                let client = ctx.client()?;
                let payload = Sales::new(client.as_ref())
                    .list(page, page_size, status.as_deref())
                    .await
                    .context("failed to list sales")?;
                Ok(Outcome::list("sales", SALE_COLUMNS, payload))
            }
            SaleCommands::Get { id } => {
                let id = id_arg("id", &id)?;
                let client = ctx.client()?;
                let payload = Sales::new(client.as_ref())
                    .get(&id)
                    .await
                    .context("failed to get sale")?;
                Ok(Outcome::record(&[], payload))
            }
            SaleCommands::Create {
                title,
                description,
                discount_type,
                discount_value,
                applies_to,
                product_ids,
                collection_ids,
                starts_at,
                ends_at,
            } => {
                let product_ids = split_ids(&product_ids);
                let collection_ids = split_ids(&collection_ids);
                match applies_to {
                    AppliesTo::Products if product_ids.is_empty() => {
                        return Err(ValidationError::MissingFlag {
                            flag: "product-ids".to_string(),
                        }
                        .into());
                    }
                    AppliesTo::Collections if collection_ids.is_empty() => {
                        return Err(ValidationError::MissingFlag {
                            flag: "collection-ids".to_string(),
                        }
                        .into());
                    }
                    _ => {}
                }
                let request = SaleCreateRequest {
                    title: require_value("title", &title)?.to_string(),
                    discount_type,
                    discount_value: discount(discount_type, discount_value)?,
                    applies_to: applies_to.as_str().to_string(),
                    description,
                    product_ids,
                    collection_ids,
                    starts_at: optional_date("starts-at", starts_at.as_deref())?,
                    ends_at: optional_date("ends-at", ends_at.as_deref())?,
                };
                let guard = Guard::new(format!("create sale '{}'", request.title));
                if let Some(stop) = ctx.preflight(&guard)? {
                    return Ok(stop);
                }
                let client = ctx.client()?;
                let payload = Sales::new(client.as_ref())
                    .create(&request)
                    .await
                    .context("failed to create sale")?;
                Ok(Outcome::record(&[], payload))
            }
            SaleCommands::Activate { id } => {
                let id = id_arg("id", &id)?;
                if let Some(stop) = ctx.preflight(&Guard::new(format!("activate sale {}", id)))? {
                    return Ok(stop);
                }
                let client = ctx.client()?;
                let payload = Sales::new(client.as_ref())
                    .activate(&id)
                    .await
                    .context("failed to activate sale")?;
                Ok(Outcome::message_with(format!("Activated sale {}.", id), payload))
            }
            SaleCommands::Deactivate { id } => {
                let id = id_arg("id", &id)?;
                if let Some(stop) = ctx.preflight(&Guard::new(format!("deactivate sale {}", id)))? {
                    return Ok(stop);
                }
                let client = ctx.client()?;
                let payload = Sales::new(client.as_ref())
                    .deactivate(&id)
                    .await
                    .context("failed to deactivate sale")?;
                Ok(Outcome::message_with(format!("Deactivated sale {}.", id), payload))
            }
            SaleCommands::Delete { id } => {
                let id = id_arg("id", &id)?;
                let guard = Guard::destructive(format!("delete sale {}", id));
                if let Some(stop) = ctx.preflight(&guard)? {
                    return Ok(stop);
                }
                let client = ctx.client()?;
                Sales::new(client.as_ref())
                    .delete(&id)
                    .await
                    .context("failed to delete sale")?;
                Ok(Outcome::message(format!("Deleted sale {}.", id)))
            }
            SaleCommands::DeleteProducts { id, product_ids } => {
                let id = id_arg("id", &id)?;
                let product_ids = split_ids(&product_ids);
                if product_ids.is_empty() {
                    return Err(ValidationError::MissingFlag {
                        flag: "product-ids".to_string(),
                    }
                    .into());
                }
                let guard = Guard::destructive(format!(
                    "remove {} product(s) from sale {}",
                    product_ids.len(),
                    id
                ));
                if let Some(stop) = ctx.preflight(&guard)? {
                    return Ok(stop);
                }
                let client = ctx.client()?;
                let payload = Sales::new(client.as_ref())
                    .delete_products(&id, &product_ids)
                    .await
                    .context("failed to remove products from sale")?;
                Ok(Outcome::message_with(
                    format!("Removed {} product(s) from sale {}.", product_ids.len(), id),
                    payload,
                ))
            }
        }
    }
}

/// Campaign fields shared by create and update.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct FlashPriceFields {
    /// Sale price during the campaign
    #[arg(long)]
    pub flash_price: Option<f64>,
    /// Units available at the flash price
    #[arg(long)]
    pub quantity: Option<u32>,
    #[arg(long)]
    pub limit_per_user: Option<u32>,
    /// Start date (RFC3339 or YYYY-MM-DD)
    #[arg(long)]
    pub starts_at: Option<String>,
    /// End date (RFC3339 or YYYY-MM-DD)
    #[arg(long)]
    pub ends_at: Option<String>,
}

impl FlashPriceFields {
    fn into_input(self) -> Result<FlashPriceInput, ValidationError> {
        Ok(FlashPriceInput {
            flash_price: self
                .flash_price
                .map(|p| positive("flash-price", p))
                .transpose()?,
            quantity: self.quantity,
            limit_per_user: self.limit_per_user,
            starts_at: optional_date("starts-at", self.starts_at.as_deref())?,
            ends_at: optional_date("ends-at", self.ends_at.as_deref())?,
            ..Default::default()
        })
    }
}

#[derive(Subcommand, Debug)]
pub enum FlashPriceCommands {
    /// List flash-price campaigns
    List {
        #[command(flatten)]
        page: PageArgs,
        #[arg(long)]
        product_id: Option<String>,
        /// Filter by status (active, scheduled, expired, inactive)
        #[arg(long)]
        status: Option<String>,
    },
    /// Show one campaign
    Get { id: String },
    /// Create a campaign
    Create {
        #[arg(long)]
        product_id: String,
        #[arg(long)]
        variant_id: Option<String>,
        #[command(flatten)]
        fields: FlashPriceFields,
    },
    /// Update a campaign
    Update {
        id: String,
        #[command(flatten)]
        fields: FlashPriceFields,
    },
    /// Activate a campaign
    Activate { id: String },
    /// Deactivate a campaign
    Deactivate { id: String },
    /// Delete a campaign
    Delete { id: String },
}

#[derive(Default)]
pub struct FlashPriceHandler;

impl FlashPriceHandler {
    pub fn new() -> Self {
        Self
    }

    pub async fn handle(
        &self,
        command: FlashPriceCommands,
        ctx: &CommandContext<'_>,
    ) -> crate::Result<Outcome> {
        match command {
            FlashPriceCommands::List {
                page,
                product_id,
                status,
            } => {
                let (page, page_size) = paging(&page)?;
                let client = ctx.client()?;
                let payload = FlashPriceCampaigns::new(client.as_ref())
                    .list(page, page_size, product_id.as_deref(), status.as_deref())
                    .await
                    .context("failed to list flash-price campaigns")?;
                Ok(Outcome::list(
                    "flash-price campaigns",
                    FLASH_PRICE_COLUMNS,
                    payload,
                ))
            }
            FlashPriceCommands::Get { id } => {
                let id = id_arg("id", &id)?;
                let client = ctx.client()?;
                let payload = FlashPriceCampaigns::new(client.as_ref())
                    .get(&id)
                    .await
                    .context("failed to get flash-price campaign")?;
                Ok(Outcome::record(&[], payload))
            }
            FlashPriceCommands::Create {
                product_id,
                variant_id,
                fields,
            } => {
                let product_id = id_arg("product-id", &product_id)?;
                if fields.flash_price.is_none() {
                    return Err(ValidationError::MissingFlag {
                        flag: "flash-price".to_string(),
                    }
                    .into());
                }
                let input = FlashPriceInput {
                    product_id: Some(product_id.clone()),
                    variant_id,
                    ..fields.into_input()?
                };
                let guard = Guard::new(format!(
                    "create flash-price campaign for product {}",
                    product_id
                ));
                if let Some(stop) = ctx.preflight(&guard)? {
                    return Ok(stop);
                }
                let client = ctx.client()?;
                let payload = FlashPriceCampaigns::new(client.as_ref())
                    .create(&input)
                    .await
                    .context("failed to create flash-price campaign")?;
                Ok(Outcome::record(&[], payload))
            }
            FlashPriceCommands::Update { id, fields } => {
                let id = id_arg("id", &id)?;
                let input = fields.into_input()?;
                if input == FlashPriceInput::default() {
                    return Err(ValidationError::InvalidValue {
                        field: "flags".to_string(),
                        reason: "nothing to update".to_string(),
                    }
                    .into());
                }
                let guard = Guard::new(format!("update flash-price campaign {}", id));
                if let Some(stop) = ctx.preflight(&guard)? {
                    return Ok(stop);
                }
                let client = ctx.client()?;
                let payload = FlashPriceCampaigns::new(client.as_ref())
                    .update(&id, &input)
                    .await
                    .context("failed to update flash-price campaign")?;
                Ok(Outcome::record(&[], payload))
            }
            FlashPriceCommands::Activate { id } => {
                let id = id_arg("id", &id)?;
                let guard = Guard::new(format!("activate flash-price campaign {}", id));
                if let Some(stop) = ctx.preflight(&guard)? {
                    return Ok(stop);
                }
                let client = ctx.client()?;
                let payload = FlashPriceCampaigns::new(client.as_ref())
                    .activate(&id)
                    .await
                    .context("failed to activate flash-price campaign")?;
                Ok(Outcome::message_with(
                    format!("Activated flash-price campaign {}.", id),
                    payload,
                ))
            }
            FlashPriceCommands::Deactivate { id } => {
                let id = id_arg("id", &id)?;
                let guard = Guard::new(format!("deactivate flash-price campaign {}", id));
                if let Some(stop) = ctx.preflight(&guard)? {
                    return Ok(stop);
                }
                let client = ctx.client()?;
                let payload = FlashPriceCampaigns::new(client.as_ref())
                    .deactivate(&id)
                    .await
                    .context("failed to deactivate flash-price campaign")?;
                Ok(Outcome::message_with(
                    format!("Deactivated flash-price campaign {}.", id),
                    payload,
                ))
            }
            FlashPriceCommands::Delete { id } => {
                let id = id_arg("id", &id)?;
                let guard = Guard::destructive(format!("delete flash-price campaign {}", id));
                if let Some(stop) = ctx.preflight(&guard)? {
                    return Ok(stop);
                }
                let client = ctx.client()?;
                FlashPriceCampaigns::new(client.as_ref())
                    .delete(&id)
                    .await
                    .context("failed to delete flash-price campaign")?;
                Ok(Outcome::message(format!(
                    "Deleted flash-price campaign {}.",
                    id
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::dispatcher::testing::harness;
    use crate::cli::main_types::Cli;
    use crate::core::guard::GuardPolicy;
    use crate::error::AppError;
    use clap::Parser;
    use serde_json::json;

    fn parse(args: &[&str]) -> crate::cli::main_types::Commands {
        let mut argv = vec!["spl"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).expect("parse").command
    }

    #[test]
    fn test_discount_bounds() {
        assert!(discount(DiscountType::Percentage, 100.0).is_ok());
        assert!(discount(DiscountType::Percentage, 100.5).is_err());
        assert!(discount(DiscountType::FixedAmount, 250.0).is_ok());
        assert!(discount(DiscountType::FixedAmount, 0.0).is_err());
        assert!(discount(DiscountType::FixedAmount, f64::NAN).is_err());
    }

    #[tokio::test]
    async fn test_coupon_create_normalizes_dates() {
        let h = harness(GuardPolicy::default(), true);
        h.dispatcher
            .dispatch(parse(&[
                "coupons",
                "create",
                "--code",
                "SAVE10",
                "--discount-type",
                "percentage",
                "--discount-value",
                "10",
                "--per-customer",
                "1",
                "--ends-at",
                "2024-12-31",
            ]))
            .await
            .expect("create");

        let body = h.log.requests()[0].body.clone().expect("body");
        assert_eq!(body["code"], "SAVE10");
        assert_eq!(body["discount_type"], "percentage");
        assert_eq!(body["usage_limit_per_customer"], 1);
        assert_eq!(body["ends_at"], "2024-12-31T00:00:00+00:00");
    }

    #[tokio::test]
    async fn test_coupon_create_bad_date_is_validation_error() {
        let h = harness(GuardPolicy::default(), true);
        let err = h
            .dispatcher
            .dispatch(parse(&[
                "coupons",
                "create",
                "--code",
                "X",
                "--discount-type",
                "fixed-amount",
                "--discount-value",
                "5",
                "--starts-at",
                "next tuesday",
            ]))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::Validation(ValidationError::InvalidDate { .. })
        ));
        assert!(h.log.clients_built().is_empty());
    }

    #[tokio::test]
    async fn test_sale_for_products_needs_ids() {
        let h = harness(GuardPolicy::default(), true);
        let err = h
            .dispatcher
            .dispatch(parse(&[
                "sales",
                "create",
                "--title",
                "Summer",
                "--discount-type",
                "percentage",
                "--discount-value",
                "15",
                "--applies-to",
                "products",
            ]))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::Validation(ValidationError::MissingFlag { .. })
        ));
    }

    #[tokio::test]
    async fn test_flash_price_update_sends_only_given_flags() {
        let h = harness(GuardPolicy::default(), true);
        h.dispatcher
            .dispatch(parse(&["flash-price", "update", "fp_1", "--quantity", "30"]))
            .await
            .expect("update");
        let sent = &h.log.requests()[0];
        assert_eq!(sent.path, "/flash-price-campaigns/fp_1");
        assert_eq!(sent.body, Some(json!({"quantity": 30})));
    }

    #[tokio::test]
    async fn test_activate_is_not_prompted() {
        let h = harness(GuardPolicy::default(), false);
        h.dispatcher
            .dispatch(parse(&["coupons", "activate", "cpn_1"]))
            .await
            .expect("activate");
        assert!(h.asked.lock().expect("lock").is_empty());
        assert_eq!(h.log.requests()[0].path, "/coupons/cpn_1/activate");
    }
}
