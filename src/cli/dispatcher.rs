use crate::api::admin::{
    ADMIN_BASE_URL_ENV, AdminClientFactory, AdminCredentials, DefaultAdminClientFactory,
};
use crate::api::client::{ClientFactory, ClientSettings, DefaultClientFactory};
use crate::api::transport::ApiTransport;
use crate::cli::commands::{auth, catalog, config, customers, orders, payments, promotions};
use crate::cli::commands::{settings, shipping};
use crate::cli::main_types::Commands;
use crate::core::guard::{Confirmer, Guard, GuardPolicy, TerminalConfirmer, preflight};
use crate::core::resolver::{ResolveRequest, ResolvedProfile, resolve_profile};
use crate::display::Outcome;
use crate::storage::config::Config;
use crate::storage::credentials::{CredentialStore, StoreOpener, SystemStoreOpener};
use std::path::PathBuf;

/// Everything a command reaches outside the process through.
pub struct Dependencies {
    pub store_opener: Box<dyn StoreOpener>,
    pub clients: Box<dyn ClientFactory>,
    pub admin_clients: Box<dyn AdminClientFactory>,
    pub confirmer: Box<dyn Confirmer>,
}

impl Dependencies {
    /// OS keyring (or `SHOPLINE_CREDENTIALS_FILE`), real HTTP, terminal prompts.
    pub fn system() -> Self {
        Self {
            store_opener: Box::new(SystemStoreOpener::from_env()),
            clients: Box::new(DefaultClientFactory),
            admin_clients: Box::new(DefaultAdminClientFactory),
            confirmer: Box::new(TerminalConfirmer),
        }
    }
}

/// Admin API settings: each field is already "flag, else env".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminOptions {
    pub base_url: Option<String>,
    pub token: Option<String>,
    pub merchant_id: Option<String>,
}

impl AdminOptions {
    pub fn from_env(token: Option<String>, merchant_id: Option<String>) -> Self {
        Self {
            base_url: std::env::var(ADMIN_BASE_URL_ENV).ok(),
            token,
            merchant_id,
        }
    }
}

/// Per-invocation settings derived from global flags, env and config.
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    pub resolve: ResolveRequest,
    pub policy: GuardPolicy,
    pub client: ClientSettings,
    pub admin: AdminOptions,
    /// Config file `config set` writes to; `None` is the default location.
    pub config_path: Option<PathBuf>,
}

/// What a handler gets: resolution, client construction and the guard.
pub struct CommandContext<'a> {
    deps: &'a Dependencies,
    options: &'a GlobalOptions,
    config: &'a Config,
}

impl<'a> CommandContext<'a> {
    pub fn new(deps: &'a Dependencies, options: &'a GlobalOptions, config: &'a Config) -> Self {
        Self {
            deps,
            options,
            config,
        }
    }

    pub fn config(&self) -> &Config {
        self.config
    }

    pub fn options(&self) -> &GlobalOptions {
        self.options
    }

    pub fn open_store(&self) -> crate::Result<Box<dyn CredentialStore>> {
        Ok(self.deps.store_opener.open()?)
    }

    pub fn resolve_profile(&self) -> crate::Result<ResolvedProfile> {
        Ok(resolve_profile(&self.options.resolve, || {
            self.deps.store_opener.open()
        })?)
    }

    /// Resolves the profile and builds an Open API client for it.
    pub fn client(&self) -> crate::Result<Box<dyn ApiTransport>> {
        let profile = self.resolve_profile()?;
        tracing::debug!(
            profile = %profile.credentials.name,
            base_url = %self.options.client.base_url,
            "creating api client"
        );
        Ok(self.deps.clients.create(&profile, &self.options.client)?)
    }

    /// Builds an Admin API client; store profiles play no part.
    pub fn admin_client(&self) -> crate::Result<Box<dyn ApiTransport>> {
        let admin = &self.options.admin;
        let credentials = AdminCredentials::resolve(
            admin.base_url.as_deref(),
            admin.token.as_deref(),
            admin.merchant_id.as_deref(),
        )?;
        Ok(self
            .deps
            .admin_clients
            .create(&credentials, self.options.client.timeout_secs)?)
    }

    /// Applies `--dry-run` / `--yes` to a mutating action. `Some` is the
    /// outcome to return instead of running it.
    pub fn preflight(&self, guard: &Guard) -> crate::Result<Option<Outcome>> {
        preflight(self.options.policy, self.deps.confirmer.as_ref(), guard)
    }
}

pub struct Dispatcher {
    config: Config,
    options: GlobalOptions,
    deps: Dependencies,
}

impl Dispatcher {
    pub fn new(config: Config, options: GlobalOptions, deps: Dependencies) -> Self {
        Self {
            config,
            options,
            deps,
        }
    }

    pub async fn dispatch(&self, command: Commands) -> crate::Result<Outcome> {
        let ctx = CommandContext::new(&self.deps, &self.options, &self.config);
        match command {
            Commands::Auth { command } => auth::AuthHandler::new().handle(command, &ctx).await,
            Commands::Config { command } => config::ConfigHandler::new().handle(command, &ctx),
            Commands::Products { command } => {
                catalog::ProductHandler::new().handle(command, &ctx).await
            }
            Commands::Collections { command } => {
                catalog::CollectionHandler::new().handle(command, &ctx).await
            }
            Commands::Coupons { command } => {
                promotions::CouponHandler::new().handle(command, &ctx).await
            }
            Commands::Payments { command } => {
                payments::PaymentHandler::new().handle(command, &ctx).await
            }
            Commands::Shipping { command } => {
                shipping::ShippingHandler::new().handle(command, &ctx).await
            }
            Commands::Sales { command } => {
                promotions::SaleHandler::new().handle(command, &ctx).await
            }
            Commands::FlashPrice { command } => {
                promotions::FlashPriceHandler::new().handle(command, &ctx).await
            }
            Commands::Subscriptions { command } => {
                orders::SubscriptionHandler::new().handle(command, &ctx).await
            }
            Commands::MemberPoints { command } => {
                customers::MemberPointHandler::new().handle(command, &ctx).await
            }
            Commands::CustomerGroups { command } => {
                customers::CustomerGroupHandler::new().handle(command, &ctx).await
            }
            Commands::Metafields { command } => {
                catalog::MetafieldHandler::new().handle(command, &ctx).await
            }
            Commands::Taxonomies { command } => {
                catalog::TaxonomyHandler::new().handle(command, &ctx).await
            }
            Commands::OrderAttribution { command } => {
                orders::OrderAttributionHandler::new()
                    .handle(command, &ctx)
                    .await
            }
            Commands::CarrierServices { command } => {
                shipping::CarrierServiceHandler::new()
                    .handle(command, &ctx)
                    .await
            }
            Commands::StorefrontProducts { command } => {
                catalog::StorefrontProductHandler::new()
                    .handle(command, &ctx)
                    .await
            }
            Commands::CustomerAddresses { command } => {
                customers::CustomerAddressHandler::new()
                    .handle(command, &ctx)
                    .await
            }
            Commands::CheckoutSettings { command } => {
                settings::CheckoutSettingsHandler::new()
                    .handle(command, &ctx)
                    .await
            }
            Commands::ShippingZones { command } => {
                shipping::ShippingZoneHandler::new()
                    .handle(command, &ctx)
                    .await
            }
            Commands::UserCredits { command } => {
                customers::UserCreditHandler::new().handle(command, &ctx).await
            }
        }
    }
}
