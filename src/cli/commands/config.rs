use crate::cli::dispatcher::CommandContext;
use crate::cli::main_types::ConfigCommands;
use crate::display::Outcome;
use crate::error::ResultExt;
use serde_json::{Map, Value};

#[derive(Default)]
pub struct ConfigHandler;

impl ConfigHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle(&self, command: ConfigCommands, ctx: &CommandContext<'_>) -> crate::Result<Outcome> {
        match command {
            ConfigCommands::Show => {
                let entries: Map<String, Value> = ctx
                    .config()
                    .entries()
                    .into_iter()
                    .map(|(k, v)| (k, Value::String(v)))
                    .collect();
                Ok(Outcome::record(&[], Value::Object(entries)))
            }
            ConfigCommands::Set { key, value } => {
                let mut config = ctx.config().clone();
                config.set_value(&key, &value)?;
                config
                    .save(ctx.options().config_path.clone())
                    .context("failed to save configuration")?;
                tracing::debug!(key = %key, "configuration updated");
                Ok(Outcome::message(format!("Set {} = {}", key, value)))
            }
        }
    }
}
