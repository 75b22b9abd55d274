use tracing_subscriber::EnvFilter;

pub const DEBUG_ENV: &str = "SHOPLINE_DEBUG";

/// Default filter directive. `RUST_LOG` always wins over this.
pub fn default_directive(verbose: bool, debug_env: Option<&str>) -> String {
    let debug = verbose
        || debug_env.is_some_and(|v| matches!(v.trim(), "1" | "true" | "yes" | "on"));
    let level = if debug { "debug" } else { "warn" };
    format!("shopline_cli={}", level)
}

/// Installs the stderr subscriber. Stdout stays reserved for command output.
pub fn init(verbose: bool) {
    let debug_env = std::env::var(DEBUG_ENV).ok();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose, debug_env.as_deref())));

    // A second init (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive() {
        assert_eq!(default_directive(false, None), "shopline_cli=warn");
        assert_eq!(default_directive(true, None), "shopline_cli=debug");
        assert_eq!(default_directive(false, Some("1")), "shopline_cli=debug");
        assert_eq!(default_directive(false, Some("0")), "shopline_cli=warn");
    }
}
