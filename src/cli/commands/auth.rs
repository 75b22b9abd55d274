use crate::cli::dispatcher::CommandContext;
use crate::cli::main_types::AuthCommands;
use crate::core::guard::Guard;
use crate::core::resolver::ProfileSource;
use crate::display::{Column, Outcome, col};
use crate::error::{AuthError, CliError, ResolveError, ResultExt, ValidationError};
use crate::storage::credentials::StoredCredentials;
use crate::utils::validation::require_value;
use serde_json::{Value, json};

const PROFILE_COLUMNS: &[Column] = &[
    col("Name", "name"),
    col("Handle", "handle"),
    col("Token", "token"),
    col("Created", "created_at"),
];

const STATUS_FIELDS: &[Column] = &[
    col("Profile", "name"),
    col("Handle", "handle"),
    col("Source", "source"),
    col("Token", "token"),
    col("Created", "created_at"),
    col("Warning", "warning"),
];

fn profile_json(credentials: &StoredCredentials) -> Value {
    json!({
        "name": credentials.name,
        "handle": credentials.handle,
        "token": credentials.masked_token(),
        "created_at": credentials.created_at.map(|t| t.to_rfc3339()),
    })
}

#[derive(Default)]
pub struct AuthHandler;

impl AuthHandler {
    pub fn new() -> Self {
        Self
    }

    pub async fn handle(
        &self,
        command: AuthCommands,
        ctx: &CommandContext<'_>,
    ) -> crate::Result<Outcome> {
        match command {
            AuthCommands::Login {
                name,
                handle,
                token,
            } => {
                let name = require_value("name", &name)?.to_string();
                let handle = require_value("handle", &handle)?.to_string();
                let token = match token {
                    Some(token) => token,
                    None if ctx.options().policy.no_input => {
                        return Err(ValidationError::MissingFlag {
                            flag: "token".to_string(),
                        }
                        .into());
                    }
                    None => prompt_token()?,
                };
                if token.trim().is_empty() {
                    return Err(AuthError::EmptyToken.into());
                }

                let guard = Guard::new(format!("save profile {} for store {}", name, handle));
                if let Some(stop) = ctx.preflight(&guard)? {
                    return Ok(stop);
                }

                let credentials = StoredCredentials::new(&name, &handle, token.trim());
                let store = ctx.open_store()?;
                store
                    .save(&credentials)
                    .context(format!("failed to save profile {}", name))?;
                tracing::debug!(profile = %name, "profile saved");

                Ok(Outcome::message_with(
                    format!("Saved profile '{}' for store {}.", name, handle),
                    profile_json(&credentials),
                ))
            }
            AuthCommands::Logout { name } => {
                let name = require_value("name", &name)?.to_string();
                let guard = Guard::destructive(format!("remove profile {}", name));
                if let Some(stop) = ctx.preflight(&guard)? {
                    return Ok(stop);
                }

                let store = ctx.open_store()?;
                let removed = store
                    .delete(&name)
                    .context(format!("failed to remove profile {}", name))?;
                if !removed {
                    return Err(ResolveError::ProfileNotFound { name }.into());
                }
                Ok(Outcome::message(format!("Removed profile '{}'.", name)))
            }
            AuthCommands::List => {
                let store = ctx.open_store()?;
                let mut profiles = Vec::new();
                for name in store.list().context("failed to list profiles")? {
                    if let Some(credentials) = store
                        .get(&name)
                        .context(format!("failed to read profile {}", name))?
                    {
                        profiles.push(profile_json(&credentials));
                    }
                }
                Ok(Outcome::list("profiles", PROFILE_COLUMNS, Value::Array(profiles)))
            }
            AuthCommands::Status => {
                let profile = ctx.resolve_profile()?;
                let credentials = &profile.credentials;
                let source = match profile.source {
                    ProfileSource::Named => "--store / SHOPLINE_STORE",
                    ProfileSource::OnlyProfile => "only configured profile",
                    ProfileSource::TokenEnv => "access token environment variable",
                };
                let mut payload = profile_json(credentials);
                payload["source"] = json!(source);
                if credentials.is_old() {
                    payload["warning"] =
                        json!("token is older than 90 days, consider rotating it");
                }
                Ok(Outcome::record(STATUS_FIELDS, payload))
            }
        }
    }
}

/// Reads the token without echo. Needs an interactive terminal.
fn prompt_token() -> crate::Result<String> {
    if !atty::is(atty::Stream::Stdin) {
        return Err(ValidationError::MissingFlag {
            flag: "token".to_string(),
        }
        .into());
    }
    rpassword::prompt_password("Access token: ")
        .map_err(|e| CliError::Prompt(e.to_string()).into())
}
