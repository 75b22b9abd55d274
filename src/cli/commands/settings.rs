use crate::api::resources::settings::{CheckoutSettings, CheckoutSettingsUpdate};
use crate::cli::dispatcher::CommandContext;
use crate::core::guard::Guard;
use crate::display::{Column, Outcome, col};
use crate::error::{ResultExt, ValidationError};
use crate::utils::validation::validate_url;
use clap::Subcommand;

const CHECKOUT_FIELDS: &[Column] = &[
    col("Require Phone", "require_phone"),
    col("Guest Checkout", "guest_checkout"),
    col("Express Checkout", "express_checkout"),
    col("Order Notes", "order_notes_enabled"),
    col("Tipping", "tipping_enabled"),
    col("Abandoned Cart", "abandoned_cart_enabled"),
    col("Abandoned Cart Delay", "abandoned_cart_delay"),
    col("Terms of Service", "terms_of_service_url"),
    col("Privacy Policy", "privacy_policy_url"),
    col("Refund Policy", "refund_policy_url"),
];

#[derive(Subcommand, Debug)]
pub enum CheckoutSettingsCommands {
    /// Show checkout settings
    Get,
    /// Change checkout settings; only the given flags are sent
    #[command(after_help = "Examples:
  spl checkout-settings update --guest-checkout true
  spl checkout-settings update --abandoned-cart true --abandoned-cart-delay 60")]
    Update {
        #[arg(long)]
        require_phone: Option<bool>,
        #[arg(long)]
        guest_checkout: Option<bool>,
        #[arg(long)]
        express_checkout: Option<bool>,
        #[arg(long)]
        order_notes: Option<bool>,
        #[arg(long)]
        tipping: Option<bool>,
        /// Send abandoned-cart reminders
        #[arg(long)]
        abandoned_cart: Option<bool>,
        /// Minutes before an abandoned-cart reminder
        #[arg(long)]
        abandoned_cart_delay: Option<u32>,
        #[arg(long)]
        terms_url: Option<String>,
        #[arg(long)]
        privacy_url: Option<String>,
        #[arg(long)]
        refund_url: Option<String>,
    },
}

#[derive(Default)]
pub struct CheckoutSettingsHandler;

impl CheckoutSettingsHandler {
    pub fn new() -> Self {
        Self
    }

    pub async fn handle(
        &self,
        command: CheckoutSettingsCommands,
        ctx: &CommandContext<'_>,
    ) -> crate::Result<Outcome> {
        match command {
            CheckoutSettingsCommands::Get => {
                let client = ctx.client()?;
                let payload = CheckoutSettings::new(client.as_ref())
                    .get()
                    .await
                    .context("failed to get checkout settings")?;
                Ok(Outcome::record(CHECKOUT_FIELDS, payload))
            }
            CheckoutSettingsCommands::Update {
                require_phone,
                guest_checkout,
                express_checkout,
                order_notes,
                tipping,
                abandoned_cart,
                abandoned_cart_delay,
                terms_url,
                privacy_url,
                refund_url,
            } => {
                for url in [&terms_url, &privacy_url, &refund_url].into_iter().flatten() {
                    validate_url(url)?;
                }
                let update = CheckoutSettingsUpdate {
                    require_phone,
                    guest_checkout,
                    express_checkout,
                    order_notes_enabled: order_notes,
                    tipping_enabled: tipping,
                    abandoned_cart_enabled: abandoned_cart,
                    abandoned_cart_delay,
                    terms_of_service_url: terms_url,
                    privacy_policy_url: privacy_url,
                    refund_policy_url: refund_url,
                };
                if update.is_empty() {
                    return Err(ValidationError::InvalidValue {
                        field: "flags".to_string(),
                        reason: "nothing to update, pass at least one setting".to_string(),
                    }
                    .into());
                }
                if let Some(stop) = ctx.preflight(&Guard::new("update checkout settings"))? {
                    return Ok(stop);
                }
                let client = ctx.client()?;
                let payload = CheckoutSettings::new(client.as_ref())
                    .update(&update)
                    .await
                    .context("failed to update checkout settings")?;
                Ok(Outcome::record(CHECKOUT_FIELDS, payload))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::cli::dispatcher::testing::harness;
    use crate::cli::main_types::Cli;
    use crate::core::exit_code::exit_code_for;
    use crate::core::guard::GuardPolicy;
    use clap::Parser;
    use reqwest::Method;
    use serde_json::json;

    fn parse(args: &[&str]) -> crate::cli::main_types::Commands {
        let mut argv = vec!["spl"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).expect("parse").command
    }

    #[tokio::test]
    async fn test_update_sends_only_given_settings() {
        let h = harness(GuardPolicy::default(), true);
        h.dispatcher
            .dispatch(parse(&[
                "checkout-settings",
                "update",
                "--guest-checkout",
                "false",
                "--abandoned-cart-delay",
                "45",
            ]))
            .await
            .expect("update");
        let sent = &h.log.requests()[0];
        assert_eq!(sent.method, Method::PUT);
        assert_eq!(sent.path, "/settings/checkout");
        assert_eq!(
            sent.body,
            Some(json!({"guest_checkout": false, "abandoned_cart_delay": 45}))
        );
    }

    #[tokio::test]
    async fn test_empty_update_is_usage_error() {
        let h = harness(GuardPolicy::default(), true);
        let err = h
            .dispatcher
            .dispatch(parse(&["checkout-settings", "update"]))
            .await
            .unwrap_err();
        assert_eq!(exit_code_for(&err), 3);
        assert!(h.log.clients_built().is_empty());
    }
}
