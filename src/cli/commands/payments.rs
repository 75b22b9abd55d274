use super::{id_arg, paging};
use crate::api::resources::payments::{AdminPayments, PaymentAdjustment, Payments};
use crate::cli::dispatcher::CommandContext;
use crate::cli::main_types::PageArgs;
use crate::core::guard::Guard;
use crate::display::{Column, Outcome, col};
use crate::error::{ResultExt, ValidationError};
use crate::utils::validation::parse_date;
use clap::Subcommand;

const PAYMENT_COLUMNS: &[Column] = &[
    col("ID", "id"),
    col("Order", "order_id"),
    col("Amount", "amount"),
    col("Currency", "currency"),
    col("Gateway", "gateway"),
    col("Status", "status"),
    col("Created", "created_at"),
];

const PAYOUT_COLUMNS: &[Column] = &[
    col("ID", "id"),
    col("Amount", "amount"),
    col("Currency", "currency"),
    col("Status", "status"),
    col("Arrival", "arrival_date"),
];

#[derive(Subcommand, Debug)]
pub enum PaymentCommands {
    /// List payments
    List {
        #[command(flatten)]
        page: PageArgs,
        /// Filter by status (pending, authorized, paid, refunded, voided)
        #[arg(long)]
        status: Option<String>,
        /// Filter by payment gateway
        #[arg(long)]
        gateway: Option<String>,
    },
    /// Show one payment
    Get { id: String },
    /// List the payments of an order
    Order { order_id: String },
    /// Capture an authorized payment
    Capture {
        id: String,
        /// Partial amount; the full authorization when omitted
        #[arg(long)]
        amount: Option<String>,
        #[arg(long)]
        reason: Option<String>,
    },
    /// Void an authorized payment
    Void { id: String },
    /// Refund a captured payment
    #[command(after_help = "Examples:
  spl payments refund pay_123
  spl payments refund pay_123 --amount 12.50 --reason \"damaged item\"")]
    Refund {
        id: String,
        /// Partial amount; the full payment when omitted
        #[arg(long)]
        amount: Option<String>,
        #[arg(long)]
        reason: Option<String>,
    },
    /// Balance overview from the Admin API
    AccountSummary,
    /// Payouts from the Admin API
    Payouts {
        /// Earliest payout date (RFC3339 or YYYY-MM-DD)
        #[arg(long)]
        from: String,
    },
}

/// Amount flags stay strings on the wire but must read as positive decimals.
fn adjustment(
    amount: Option<String>,
    reason: Option<String>,
) -> Result<PaymentAdjustment, ValidationError> {
    let amount = match amount {
        Some(raw) => {
            let trimmed = raw.trim();
            match trimmed.parse::<f64>() {
                Ok(value) if value > 0.0 && value.is_finite() => Some(trimmed.to_string()),
                _ => {
                    return Err(ValidationError::InvalidValue {
                        field: "amount".to_string(),
                        reason: format!("'{}' is not a positive amount", raw),
                    });
                }
            }
        }
        None => None,
    };
    Ok(PaymentAdjustment {
        amount,
        reason: reason.filter(|r| !r.trim().is_empty()),
    })
}

#[derive(Default)]
pub struct PaymentHandler;

impl PaymentHandler {
    pub fn new() -> Self {
        Self
    }

    pub async fn handle(
        &self,
        command: PaymentCommands,
        ctx: &CommandContext<'_>,
    ) -> crate::Result<Outcome> {
        match command {
            PaymentCommands::List {
                page,
                status,
                gateway,
            } => {
                let (page, page_size) = paging(&page)?;
                let client = ctx.client()?;
                let payload = Payments::new(client.as_ref())
                    .list(page, page_size, status.as_deref(), gateway.as_deref())
                    .await
                    .context("failed to list payments")?;
                Ok(Outcome::list("payments", PAYMENT_COLUMNS, payload))
            }
            PaymentCommands::Get { id } => {
                let id = id_arg("id", &id)?;
                let client = ctx.client()?;
                let payload = Payments::new(client.as_ref())
                    .get(&id)
                    .await
                    .context("failed to get payment")?;
                Ok(Outcome::record(PAYMENT_COLUMNS, payload))
            }
            PaymentCommands::Order { order_id } => {
                let order_id = id_arg("order-id", &order_id)?;
                let client = ctx.client()?;
                let payload = Payments::new(client.as_ref())
                    .for_order(&order_id)
                    .await
                    .context(format!("failed to list payments for order {}", order_id))?;
                Ok(Outcome::list("payments", PAYMENT_COLUMNS, payload))
            }
            PaymentCommands::Capture { id, amount, reason } => {
                let id = id_arg("id", &id)?;
                let adjustment = adjustment(amount, reason)?;
                let action = match &adjustment.amount {
                    Some(amount) => format!("capture {} on payment {}", amount, id),
                    None => format!("capture payment {}", id),
                };
                if let Some(stop) = ctx.preflight(&Guard::new(action))? {
                    return Ok(stop);
                }
                let client = ctx.client()?;
                let payload = Payments::new(client.as_ref())
                    .capture(&id, adjustment)
                    .await
                    .context("failed to capture payment")?;
                Ok(Outcome::message_with(format!("Captured payment {}.", id), payload))
            }
            PaymentCommands::Void { id } => {
                let id = id_arg("id", &id)?;
                let guard = Guard::destructive(format!("void payment {}", id));
                if let Some(stop) = ctx.preflight(&guard)? {
                    return Ok(stop);
                }
                let client = ctx.client()?;
                let payload = Payments::new(client.as_ref())
                    .void(&id)
                    .await
                    .context("failed to void payment")?;
                Ok(Outcome::message_with(format!("Voided payment {}.", id), payload))
            }
            PaymentCommands::Refund { id, amount, reason } => {
                let id = id_arg("id", &id)?;
                let adjustment = adjustment(amount, reason)?;
                let action = match &adjustment.amount {
                    Some(amount) => format!("refund {} of payment {}", amount, id),
                    None => format!("refund payment {}", id),
                };
                if let Some(stop) = ctx.preflight(&Guard::destructive(action))? {
                    return Ok(stop);
                }
                let client = ctx.client()?;
                let payload = Payments::new(client.as_ref())
                    .refund(&id, adjustment)
                    .await
                    .context("failed to refund payment")?;
                Ok(Outcome::message_with(format!("Refunded payment {}.", id), payload))
            }
            PaymentCommands::AccountSummary => {
                let client = ctx.admin_client()?;
                let payload = AdminPayments::new(client.as_ref())
                    .account_summary()
                    .await
                    .context("failed to get account summary")?;
                Ok(Outcome::record(&[], payload))
            }
            PaymentCommands::Payouts { from } => {
                let from_millis = parse_date("from", &from)?.timestamp_millis();
                let client = ctx.admin_client()?;
                let payload = AdminPayments::new(client.as_ref())
                    .payouts(from_millis)
                    .await
                    .context("failed to list payouts")?;
                Ok(Outcome::list("payouts", PAYOUT_COLUMNS, payload))
            }
        }
    }
}
