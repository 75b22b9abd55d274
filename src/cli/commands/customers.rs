use super::{compose_body, id_arg, paging};
use crate::api::resources::customers::{
    AddressInput, BalanceAdjustment, CustomerAddresses, CustomerGroups, MemberPoints, UserCredits,
    member_point_rules,
};
use crate::cli::dispatcher::CommandContext;
use crate::cli::main_types::{BodyArgs, PageArgs};
use crate::core::guard::Guard;
use crate::display::{Column, Outcome, col};
use crate::error::{ResultExt, ValidationError};
use clap::Subcommand;

const GROUP_COLUMNS: &[Column] = &[
    col("ID", "id"),
    col("Name", "name"),
    col("Customers", "customer_count"),
    col("Created", "created_at"),
];

const ADDRESS_COLUMNS: &[Column] = &[
    col("ID", "id"),
    col("Name", "first_name"),
    col("Address", "address1"),
    col("City", "city"),
    col("Country", "country"),
    col("Default", "default"),
];

const TRANSACTION_COLUMNS: &[Column] = &[
    col("ID", "id"),
    col("Type", "type"),
    col("Amount", "amount"),
    col("Balance", "balance"),
    col("Description", "description"),
    col("Created", "created_at"),
];

fn adjustment(
    field: &str,
    amount: i64,
    description: Option<String>,
) -> Result<BalanceAdjustment, ValidationError> {
    if amount == 0 {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            reason: "must not be zero".to_string(),
        });
    }
    Ok(BalanceAdjustment {
        amount,
        description: description.filter(|d| !d.trim().is_empty()),
    })
}

fn signed(amount: i64) -> String {
    if amount > 0 {
        format!("+{}", amount)
    } else {
        amount.to_string()
    }
}

#[derive(Subcommand, Debug)]
pub enum MemberPointCommands {
    /// Point balance of a customer
    Get {
        #[arg(long)]
        customer_id: String,
    },
    /// Point transaction history of a customer
    Transactions {
        #[arg(long)]
        customer_id: String,
        #[command(flatten)]
        page: PageArgs,
        /// Filter by transaction type (earn, redeem, adjust, expire)
        #[arg(long = "type")]
        kind: Option<String>,
    },
    /// Add or deduct points
    #[command(after_help = "Examples:
  spl member-points adjust --customer-id cus_1 --points 100 --description \"birthday bonus\"
  spl member-points adjust --customer-id cus_1 --points -50")]
    Adjust {
        #[arg(long)]
        customer_id: String,
        /// Points to add; negative to deduct
        #[arg(long, allow_hyphen_values = true)]
        points: i64,
        #[arg(long)]
        description: Option<String>,
    },
    /// Store-wide point earning rules
    Rules,
}

#[derive(Default)]
pub struct MemberPointHandler;

impl MemberPointHandler {
    pub fn new() -> Self {
        Self
    }

    pub async fn handle(
        &self,
        command: MemberPointCommands,
        ctx: &CommandContext<'_>,
    ) -> crate::Result<Outcome> {
        match command {
            MemberPointCommands::Get { customer_id } => {
                let customer_id = id_arg("customer-id", &customer_id)?;
                let client = ctx.client()?;
                let payload = MemberPoints::new(client.as_ref(), &customer_id)
                    .get()
                    .await
                    .context("failed to get member points")?;
                Ok(Outcome::record(&[], payload))
            }
            MemberPointCommands::Transactions {
                customer_id,
                page,
                kind,
            } => {
                let customer_id = id_arg("customer-id", &customer_id)?;
                let (page, page_size) = paging(&page)?;
                let client = ctx.client()?;
                let payload = MemberPoints::new(client.as_ref(), &customer_id)
                    .transactions(page, page_size, kind.as_deref())
                    .await
                    .context("failed to list point transactions")?;
                Ok(Outcome::list("transactions", TRANSACTION_COLUMNS, payload))
            }
            MemberPointCommands::Adjust {
                customer_id,
                points,
                description,
            } => {
                let customer_id = id_arg("customer-id", &customer_id)?;
                let adjustment = adjustment("points", points, description)?;
                let guard = Guard::new(format!(
                    "adjust points of customer {} by {}",
                    customer_id,
                    signed(points)
                ));
                if let Some(stop) = ctx.preflight(&guard)? {
                    return Ok(stop);
                }
                let client = ctx.client()?;
                let payload = MemberPoints::new(client.as_ref(), &customer_id)
                    .adjust(&adjustment)
                    .await
                    .context("failed to adjust member points")?;
                Ok(Outcome::message_with(
                    format!(
                        "Adjusted points of customer {} by {}.",
                        customer_id,
                        signed(points)
                    ),
                    payload,
                ))
            }
            MemberPointCommands::Rules => {
                let client = ctx.client()?;
                let payload = member_point_rules(client.as_ref())
                    .await
                    .context("failed to get member point rules")?;
                Ok(Outcome::record(&[], payload))
            }
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum UserCreditCommands {
    /// Credit balance of a customer
    Get {
        #[arg(long)]
        customer_id: String,
    },
    /// Credit transaction history of a customer
    Transactions {
        #[arg(long)]
        customer_id: String,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Add or deduct store credit
    Adjust {
        #[arg(long)]
        customer_id: String,
        /// Credit to add in minor units; negative to deduct
        #[arg(long, allow_hyphen_values = true)]
        amount: i64,
        #[arg(long)]
        description: Option<String>,
    },
}

#[derive(Default)]
pub struct UserCreditHandler;

impl UserCreditHandler {
    pub fn new() -> Self {
        Self
    }

    pub async fn handle(
        &self,
        command: UserCreditCommands,
        ctx: &CommandContext<'_>,
    ) -> crate::Result<Outcome> {
        match command {
            UserCreditCommands::Get { customer_id } => {
                let customer_id = id_arg("customer-id", &customer_id)?;
                let client = ctx.client()?;
                let payload = UserCredits::new(client.as_ref(), &customer_id)
                    .get()
                    .await
                    .context("failed to get user credits")?;
                Ok(Outcome::record(&[], payload))
            }
            UserCreditCommands::Transactions { customer_id, page } => {
                let customer_id = id_arg("customer-id", &customer_id)?;
                let (page, page_size) = paging(&page)?;
                let client = ctx.client()?;
                let payload = UserCredits::new(client.as_ref(), &customer_id)
                    .transactions(page, page_size)
                    .await
                    .context("failed to list credit transactions")?;
                Ok(Outcome::list("transactions", TRANSACTION_COLUMNS, payload))
            }
            UserCreditCommands::Adjust {
                customer_id,
                amount,
                description,
            } => {
                let customer_id = id_arg("customer-id", &customer_id)?;
                let adjustment = adjustment("amount", amount, description)?;
                let guard = Guard::new(format!(
                    "adjust credits of customer {} by {}",
                    customer_id,
                    signed(amount)
                ));
                if let Some(stop) = ctx.preflight(&guard)? {
                    return Ok(stop);
                }
                let client = ctx.client()?;
                let payload = UserCredits::new(client.as_ref(), &customer_id)
                    .adjust(&adjustment)
                    .await
                    .context("failed to adjust user credits")?;
                Ok(Outcome::message_with(
                    format!(
                        "Adjusted credits of customer {} by {}.",
                        customer_id,
                        signed(amount)
                    ),
                    payload,
                ))
            }
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum CustomerGroupCommands {
    /// List customer groups
    List {
        #[command(flatten)]
        page: PageArgs,
        /// Match on group name
        #[arg(long)]
        keyword: Option<String>,
    },
    /// Show one group
    Get { id: String },
    /// Create a group from a JSON body
    Create {
        #[command(flatten)]
        body: BodyArgs,
    },
    /// Update a group from a JSON body
    Update {
        id: String,
        #[command(flatten)]
        body: BodyArgs,
    },
    /// Delete a group
    Delete { id: String },
    /// Ids of the customers in a group
    CustomerIds {
        id: String,
        #[command(flatten)]
        page: PageArgs,
    },
}

#[derive(Default)]
pub struct CustomerGroupHandler;

impl CustomerGroupHandler {
    pub fn new() -> Self {
        Self
    }

    pub async fn handle(
        &self,
        command: CustomerGroupCommands,
        ctx: &CommandContext<'_>,
    ) -> crate::Result<Outcome> {
        match command {
            CustomerGroupCommands::List { page, keyword } => {
                let (page, page_size) = paging(&page)?;
                let client = ctx.client()?;
                let payload = CustomerGroups::new(client.as_ref())
                    .list(page, page_size, keyword.as_deref())
                    .await
                    .context("failed to list customer groups")?;
                Ok(Outcome::list("customer groups", GROUP_COLUMNS, payload))
            }
            CustomerGroupCommands::Get { id } => {
                let id = id_arg("id", &id)?;
                let client = ctx.client()?;
                let payload = CustomerGroups::new(client.as_ref())
                    .get(&id)
                    .await
                    .context("failed to get customer group")?;
                Ok(Outcome::record(&[], payload))
            }
            CustomerGroupCommands::Create { body } => {
                let body = body.require()?;
                if let Some(stop) = ctx.preflight(&Guard::new("create customer group"))? {
                    return Ok(stop);
                }
                let client = ctx.client()?;
                let payload = CustomerGroups::new(client.as_ref())
                    .create(body)
                    .await
                    .context("failed to create customer group")?;
                Ok(Outcome::record(&[], payload))
            }
            CustomerGroupCommands::Update { id, body } => {
                let id = id_arg("id", &id)?;
                let body = body.require()?;
                let guard = Guard::new(format!("update customer group {}", id));
                if let Some(stop) = ctx.preflight(&guard)? {
                    return Ok(stop);
                }
                let client = ctx.client()?;
                let payload = CustomerGroups::new(client.as_ref())
                    .update(&id, body)
                    .await
                    .context("failed to update customer group")?;
                Ok(Outcome::record(&[], payload))
            }
            CustomerGroupCommands::Delete { id } => {
                let id = id_arg("id", &id)?;
                let guard = Guard::destructive(format!("delete customer group {}", id));
                if let Some(stop) = ctx.preflight(&guard)? {
                    return Ok(stop);
                }
                let client = ctx.client()?;
                CustomerGroups::new(client.as_ref())
                    .delete(&id)
                    .await
                    .context("failed to delete customer group")?;
                Ok(Outcome::message(format!("Deleted customer group {}.", id)))
            }
            CustomerGroupCommands::CustomerIds { id, page } => {
                let id = id_arg("id", &id)?;
                let (page, page_size) = paging(&page)?;
                let client = ctx.client()?;
                let payload = CustomerGroups::new(client.as_ref())
                    .customer_ids(&id, page, page_size)
                    .await
                    .context("failed to list customer ids")?;
                Ok(Outcome::Raw(payload))
            }
        }
    }
}

#[derive(clap::Args, Debug, Clone, Default)]
pub struct AddressFields {
    #[arg(long)]
    pub first_name: Option<String>,
    #[arg(long)]
    pub last_name: Option<String>,
    /// Street address
    #[arg(long = "address")]
    pub address1: Option<String>,
    #[arg(long)]
    pub city: Option<String>,
    /// Country code
    #[arg(long)]
    pub country: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    /// Make this the default address
    #[arg(long)]
    pub default: bool,
}

impl From<AddressFields> for AddressInput {
    fn from(fields: AddressFields) -> Self {
        AddressInput {
            first_name: fields.first_name,
            last_name: fields.last_name,
            address1: fields.address1,
            city: fields.city,
            country: fields.country,
            phone: fields.phone,
            default: fields.default,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum CustomerAddressCommands {
    /// List a customer's addresses
    List {
        #[arg(long)]
        customer_id: String,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Show one address
    Get {
        id: String,
        #[arg(long)]
        customer_id: String,
    },
    /// Add an address from flags, a JSON body or both
    Create {
        #[arg(long)]
        customer_id: String,
        #[command(flatten)]
        fields: AddressFields,
        #[command(flatten)]
        body: BodyArgs,
    },
    /// Delete an address
    Delete {
        id: String,
        #[arg(long)]
        customer_id: String,
    },
    /// Make an address the default
    SetDefault {
        id: String,
        #[arg(long)]
        customer_id: String,
    },
}

#[derive(Default)]
pub struct CustomerAddressHandler;

impl CustomerAddressHandler {
    pub fn new() -> Self {
        Self
    }

    pub async fn handle(
        &self,
        command: CustomerAddressCommands,
        ctx: &CommandContext<'_>,
    ) -> crate::Result<Outcome> {
        match command {
            CustomerAddressCommands::List { customer_id, page } => {
                let customer_id = id_arg("customer-id", &customer_id)?;
                let (page, page_size) = paging(&page)?;
                let client = ctx.client()?;
                let payload = CustomerAddresses::new(client.as_ref(), &customer_id)
                    .list(page, page_size)
                    .await
                    .context("failed to list addresses")?;
                Ok(Outcome::list("addresses", ADDRESS_COLUMNS, payload))
            }
            CustomerAddressCommands::Get { id, customer_id } => {
                let customer_id = id_arg("customer-id", &customer_id)?;
                let id = id_arg("id", &id)?;
                let client = ctx.client()?;
                let payload = CustomerAddresses::new(client.as_ref(), &customer_id)
                    .get(&id)
                    .await
                    .context("failed to get address")?;
                Ok(Outcome::record(&[], payload))
            }
            CustomerAddressCommands::Create {
                customer_id,
                fields,
                body,
            } => {
                let customer_id = id_arg("customer-id", &customer_id)?;
                let body = compose_body(&body, &AddressInput::from(fields))?;
                let guard = Guard::new(format!("add address to customer {}", customer_id));
                if let Some(stop) = ctx.preflight(&guard)? {
                    return Ok(stop);
                }
                let client = ctx.client()?;
                let payload = CustomerAddresses::new(client.as_ref(), &customer_id)
                    .create(body)
                    .await
                    .context("failed to create address")?;
                Ok(Outcome::record(&[], payload))
            }
            CustomerAddressCommands::Delete { id, customer_id } => {
                let customer_id = id_arg("customer-id", &customer_id)?;
                let id = id_arg("id", &id)?;
                let guard = Guard::destructive(format!(
                    "delete address {} of customer {}",
                    id, customer_id
                ));
                if let Some(stop) = ctx.preflight(&guard)? {
                    return Ok(stop);
                }
                let client = ctx.client()?;
                CustomerAddresses::new(client.as_ref(), &customer_id)
                    .delete(&id)
                    .await
                    .context("failed to delete address")?;
                Ok(Outcome::message(format!("Deleted address {}.", id)))
            }
            CustomerAddressCommands::SetDefault { id, customer_id } => {
                let customer_id = id_arg("customer-id", &customer_id)?;
                let id = id_arg("id", &id)?;
                let guard = Guard::new(format!(
                    "make address {} the default for customer {}",
                    id, customer_id
                ));
                if let Some(stop) = ctx.preflight(&guard)? {
                    return Ok(stop);
                }
                let client = ctx.client()?;
                let payload = CustomerAddresses::new(client.as_ref(), &customer_id)
                    .set_default(&id)
                    .await
                    .context("failed to set default address")?;
                Ok(Outcome::message_with(
                    format!("Address {} is now the default.", id),
                    payload,
                ))
            }
        }
    }
}
