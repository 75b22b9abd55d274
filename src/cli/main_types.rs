use crate::cli::commands::catalog::{
    CollectionCommands, MetafieldCommands, ProductCommands, StorefrontProductCommands,
    TaxonomyCommands,
};
use crate::cli::commands::customers::{
    CustomerAddressCommands, CustomerGroupCommands, MemberPointCommands, UserCreditCommands,
};
use crate::cli::commands::orders::{OrderAttributionCommands, SubscriptionCommands};
use crate::cli::commands::payments::PaymentCommands;
use crate::cli::commands::promotions::{CouponCommands, FlashPriceCommands, SaleCommands};
use crate::cli::commands::settings::CheckoutSettingsCommands;
use crate::cli::commands::shipping::{
    CarrierServiceCommands, ShippingCommands, ShippingZoneCommands,
};
use crate::display::{ColorMode, OutputFormat};
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "spl")]
#[command(about = "Command line interface for the Shopline admin API")]
#[command(version)]
#[command(after_help = "Examples:
  spl auth login --name demo --handle demoshop   # Store a profile (token is prompted)
  spl products list --page-size 50               # List products
  spl coupons get cpn_123 -o json                # Output as JSON
  spl coupons list -q '.items[].code'            # Select fields from the JSON
  spl coupons delete cpn_123 --dry-run           # Show what would happen
  spl coupons list -j --items-only               # Just the coupons array
  spl --store prod payments refund pay_1 --yes   # Pick a profile, skip the prompt

Environment Variables:
  SHOPLINE_STORE              Profile to use when --store is absent
  SHOPLINE_STORE_ALIASES      alias:profile pairs, comma separated
  SHOPLINE_ACCESS_TOKEN       Token to use without a stored profile
  SHOPLINE_CREDENTIALS_FILE   Use a JSON file instead of the OS keyring
  SHOPLINE_API_BASE_URL       Override the Open API endpoint
  SHOPLINE_ADMIN_BASE_URL     Admin API endpoint
  SHOPLINE_DEBUG              Enable debug logging on stderr")]
pub struct Cli {
    /// Store profile to use (name or alias)
    #[arg(short, long, global = true)]
    pub store: Option<String>,

    /// Output format
    #[arg(short, long, global = true, value_enum, env = "SHOPLINE_OUTPUT")]
    pub output: Option<OutputFormat>,

    /// Shorthand for --output json
    #[arg(short = 'j', long, global = true)]
    pub json: bool,

    /// Print only the items array of a list response (JSON output)
    #[arg(long, global = true, visible_alias = "results-only")]
    pub items_only: bool,

    /// When to color table output
    #[arg(long, global = true, value_enum)]
    pub color: Option<ColorMode>,

    /// Path into the JSON output, e.g. '.items[0].id'
    #[arg(short, long, global = true)]
    pub query: Option<String>,

    /// Print what a mutating command would do without calling the API
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Skip confirmation prompts
    #[arg(short, long, global = true, visible_alias = "force")]
    pub yes: bool,

    /// Never prompt; destructive commands then need --yes
    #[arg(long, global = true)]
    pub no_input: bool,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Custom configuration directory path
    #[arg(long, global = true)]
    pub config_dir: Option<String>,

    /// Admin API token
    #[arg(long, global = true, env = "SHOPLINE_ADMIN_TOKEN", hide_env_values = true)]
    pub admin_token: Option<String>,

    /// Admin API merchant id
    #[arg(long, global = true, env = "SHOPLINE_ADMIN_MERCHANT_ID")]
    pub admin_merchant_id: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// `-j` wins over `--output` and `SHOPLINE_OUTPUT`.
    pub fn requested_output(&self) -> Option<OutputFormat> {
        if self.json {
            Some(OutputFormat::Json)
        } else {
            self.output
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage store profiles (login, logout, list, status)
    Auth {
        #[command(subcommand)]
        command: AuthCommands,
    },
    /// Show or change CLI preferences
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Manage products
    Products {
        #[command(subcommand)]
        command: ProductCommands,
    },
    /// Manage collections and their products
    Collections {
        #[command(subcommand)]
        command: CollectionCommands,
    },
    /// Manage coupons
    Coupons {
        #[command(subcommand)]
        command: CouponCommands,
    },
    /// Payments, captures and refunds
    Payments {
        #[command(subcommand)]
        command: PaymentCommands,
    },
    /// Shipment status, tracking and execution (Admin API)
    Shipping {
        #[command(subcommand)]
        command: ShippingCommands,
    },
    /// Manage sales
    Sales {
        #[command(subcommand)]
        command: SaleCommands,
    },
    /// Manage flash-price campaigns
    FlashPrice {
        #[command(subcommand)]
        command: FlashPriceCommands,
    },
    /// Manage subscriptions
    Subscriptions {
        #[command(subcommand)]
        command: SubscriptionCommands,
    },
    /// Customer member points
    MemberPoints {
        #[command(subcommand)]
        command: MemberPointCommands,
    },
    /// Manage customer groups
    CustomerGroups {
        #[command(subcommand)]
        command: CustomerGroupCommands,
    },
    /// Manage metafields
    Metafields {
        #[command(subcommand)]
        command: MetafieldCommands,
    },
    /// Manage taxonomies
    Taxonomies {
        #[command(subcommand)]
        command: TaxonomyCommands,
    },
    /// Order attribution (UTM source, medium, campaign)
    OrderAttribution {
        #[command(subcommand)]
        command: OrderAttributionCommands,
    },
    /// Manage carrier services
    CarrierServices {
        #[command(subcommand)]
        command: CarrierServiceCommands,
    },
    /// Browse storefront products
    StorefrontProducts {
        #[command(subcommand)]
        command: StorefrontProductCommands,
    },
    /// Manage customer addresses
    CustomerAddresses {
        #[command(subcommand)]
        command: CustomerAddressCommands,
    },
    /// Show or change checkout settings
    CheckoutSettings {
        #[command(subcommand)]
        command: CheckoutSettingsCommands,
    },
    /// Manage shipping zones
    ShippingZones {
        #[command(subcommand)]
        command: ShippingZoneCommands,
    },
    /// Customer user credits
    UserCredits {
        #[command(subcommand)]
        command: UserCreditCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum AuthCommands {
    /// Save a store profile
    #[command(after_help = "Examples:
  spl auth login --name demo --handle demoshop          # Prompts for the token
  spl auth login --name ci --handle demoshop --token T  # Non-interactive")]
    Login {
        /// Profile name
        #[arg(long)]
        name: String,
        /// Store handle
        #[arg(long)]
        handle: String,
        /// Access token (prompted when omitted)
        #[arg(long)]
        token: Option<String>,
    },
    /// Remove a store profile
    Logout {
        /// Profile name
        name: String,
    },
    /// List store profiles
    List,
    /// Show which profile this invocation would use
    Status,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the current configuration
    Show,
    /// Set a configuration value
    #[command(after_help = "Keys:
  output           text or json
  color            auto, always or never
  timeout_seconds  request timeout in seconds
  api_base_url     Open API endpoint
  alias.<name>     store alias; an empty value removes it

Examples:
  spl config set output json
  spl config set alias.prod my-production-store")]
    Set {
        /// Configuration key
        key: String,
        /// New value
        value: String,
    },
}

/// Paging flags shared by every list command.
#[derive(Args, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageArgs {
    /// Page number
    #[arg(long, default_value_t = 1)]
    pub page: u32,

    /// Results per page (1-250)
    #[arg(long, default_value_t = 20)]
    pub page_size: u32,
}

/// JSON request body flags for create/update commands.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct BodyArgs {
    /// Request body as inline JSON
    #[arg(long)]
    pub body: Option<String>,

    /// Read the request body from a file, or '-' for stdin
    #[arg(long)]
    pub body_file: Option<String>,
}

impl BodyArgs {
    /// The parsed body, if either flag was given.
    pub fn read(&self) -> crate::Result<Option<serde_json::Value>> {
        crate::utils::input::read_json_body(self.body.as_deref(), self.body_file.as_deref())
    }

    pub fn require(&self) -> crate::Result<serde_json::Value> {
        crate::utils::input::require_json_body(self.body.as_deref(), self.body_file.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "spl", "coupons", "list", "--page-size", "50", "-o", "json", "--store", "demo",
        ])
        .expect("parse");
        assert_eq!(cli.output, Some(OutputFormat::Json));
        assert_eq!(cli.store.as_deref(), Some("demo"));
        match cli.command {
            Commands::Coupons {
                command: CouponCommands::List { page, .. },
            } => {
                assert_eq!(page.page, 1);
                assert_eq!(page.page_size, 50);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_shorthand_and_alias_flags() {
        let cli = Cli::try_parse_from([
            "spl", "coupons", "delete", "cpn_1", "--force", "--no-input", "-j", "--results-only",
        ])
        .expect("parse");
        assert!(cli.yes);
        assert!(cli.no_input);
        assert!(cli.items_only);
        assert_eq!(cli.requested_output(), Some(OutputFormat::Json));

        let cli = Cli::try_parse_from(["spl", "-o", "text", "--json", "auth", "list"]).expect("parse");
        assert_eq!(cli.requested_output(), Some(OutputFormat::Json));

        let cli = Cli::try_parse_from(["spl", "auth", "list"]).expect("parse");
        assert!(!cli.yes && !cli.no_input && !cli.items_only);
    }

    #[test]
    fn test_unknown_output_format_rejected() {
        let result = Cli::try_parse_from(["spl", "-o", "yaml", "auth", "list"]);
        assert!(result.is_err());
    }
}
