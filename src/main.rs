use clap::Parser;
use clap::error::ErrorKind;
use shopline_cli::AppError;
use shopline_cli::api::ClientSettings;
use shopline_cli::cli::dispatcher::{AdminOptions, Dependencies, Dispatcher, GlobalOptions};
use shopline_cli::cli::main_types::Cli;
use shopline_cli::core::exit_code::{self, exit_code_for};
use shopline_cli::core::guard::GuardPolicy;
use shopline_cli::core::resolver::ResolveRequest;
use shopline_cli::display::{ColorMode, Formatter, OutputFormat, PathQuery, resolve_output_format};
use shopline_cli::storage::config::Config;
use shopline_cli::utils::logging;
use std::path::PathBuf;

const API_BASE_URL_ENV: &str = "SHOPLINE_API_BASE_URL";

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        Err(err) => {
            // Usage errors share the validation code; clap's own 2 means auth here.
            let _ = err.print();
            std::process::exit(exit_code::VALIDATION);
        }
    };
    logging::init(cli.verbose);

    match run(cli).await {
        Ok(output) => {
            if !output.is_empty() {
                println!("{}", output);
            }
        }
        Err(err) => {
            eprintln!("Error: {}", err);
            if let Some(hint) = err.troubleshooting_hint() {
                eprintln!("Hint: {}", hint);
            }
            std::process::exit(exit_code_for(&err));
        }
    }
}

async fn run(cli: Cli) -> Result<String, AppError> {
    let config_path = cli
        .config_dir
        .as_ref()
        .map(|dir| Config::file_in(&PathBuf::from(dir)));
    let config = Config::load(config_path.clone())?;
    tracing::debug!(path = ?config_path, "configuration loaded");

    // Resolved before any request so a bad --query never reaches the API.
    let format = resolve_output_format(
        cli.requested_output(),
        config.output.as_deref(),
        cli.query.as_deref(),
    )?;
    let query = cli.query.as_deref().map(PathQuery::parse).transpose()?;
    let color = cli
        .color
        .or_else(|| config.color.as_deref().and_then(ColorMode::from_config))
        .unwrap_or_default();

    let items_only = cli.items_only;
    let options = GlobalOptions {
        resolve: ResolveRequest::from_env(cli.store, &config.aliases),
        policy: GuardPolicy {
            dry_run: cli.dry_run,
            yes: cli.yes,
            no_input: cli.no_input,
        },
        client: ClientSettings::resolve(
            std::env::var(API_BASE_URL_ENV).ok().as_deref(),
            config.api_base_url.as_deref(),
            config.timeout_seconds,
        ),
        admin: AdminOptions::from_env(cli.admin_token, cli.admin_merchant_id),
        config_path,
    };

    let dispatcher = Dispatcher::new(config, options, Dependencies::system());
    let outcome = dispatcher.dispatch(cli.command).await?;

    let mut formatter = Formatter::new(format, format == OutputFormat::Text && color.enabled())
        .with_items_only(items_only);
    if let Some(query) = query {
        formatter = formatter.with_query(query);
    }
    Ok(formatter.render(&outcome)?)
}
