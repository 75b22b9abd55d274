use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Cli(#[from] CliError),
    #[error("{0}")]
    Resolve(#[from] ResolveError),
    #[error("{0}")]
    Validation(#[from] ValidationError),
    #[error("{0}")]
    Api(#[from] ApiError),
    #[error("{0}")]
    Auth(#[from] AuthError),
    #[error("{0}")]
    Storage(#[from] StorageError),
    #[error("{0}")]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Display(#[from] DisplayError),
    /// Carries an explicit process exit code chosen by the command itself.
    #[error("{message}")]
    Exit { code: i32, message: String },
    #[error("{context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<AppError>,
    },
}

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),
    #[error("Prompt failed: {0}")]
    Prompt(String),
}

/// Failures while choosing the store profile for an invocation.
#[derive(Error, Debug, PartialEq)]
pub enum ResolveError {
    #[error("credential store unavailable: {reason}")]
    StoreUnavailable { reason: String },
    #[error("no store profiles configured, run 'spl auth login'")]
    NoProfiles,
    #[error(
        "profile not found: {name}; run 'spl auth list' to list profiles or 'spl auth login' to add one"
    )]
    ProfileNotFound { name: String },
    #[error(
        "multiple profiles configured ({}), use --store or SHOPLINE_STORE to select one",
        .names.join(", ")
    )]
    AmbiguousProfiles { names: Vec<String> },
}

#[derive(Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("missing required flag: --{flag}")]
    MissingFlag { flag: String },
    #[error("invalid {label} date format '{value}', use RFC3339 or YYYY-MM-DD")]
    InvalidDate { label: String, value: String },
    #[error("invalid JSON body from {origin}: {message}")]
    InvalidJson { origin: String, message: String },
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
    #[error("confirmation required to {action}; re-run with --yes")]
    ConfirmationRequired { action: String },
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP {status} from {endpoint}: {message}")]
    Http {
        status: u16,
        endpoint: String,
        message: String,
    },
    #[error("rate limited by {endpoint}, retry after {retry_after_secs}s")]
    RateLimited {
        endpoint: String,
        retry_after_secs: u64,
    },
    #[error("Request timed out after {timeout_secs}s ({endpoint})")]
    Timeout { timeout_secs: u64, endpoint: String },
    #[error("request to {endpoint} failed: {message}")]
    Transport { endpoint: String, message: String },
    #[error("failed to decode response from {endpoint}: {message}")]
    Decode { endpoint: String, message: String },
    #[error("failed to create HTTP client: {0}")]
    ClientInit(String),
}

impl ApiError {
    /// HTTP status carried by the error, when the server produced one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            ApiError::RateLimited { .. } => Some(429),
            _ => None,
        }
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum AuthError {
    #[error("admin API base URL required: set SHOPLINE_ADMIN_BASE_URL env var")]
    MissingAdminBaseUrl,
    #[error("admin API token required: set --admin-token or SHOPLINE_ADMIN_TOKEN env var")]
    MissingAdminToken,
    #[error(
        "admin merchant ID required: set --admin-merchant-id or SHOPLINE_ADMIN_MERCHANT_ID env var"
    )]
    MissingAdminMerchantId,
    #[error("access token cannot be empty")]
    EmptyToken,
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Keyring error: {0}")]
    Keyring(String),
    #[error("File I/O error at {path}: {source}")]
    FileIo {
        path: String,
        source: std::io::Error,
    },
    #[error("Credential record '{name}' is invalid: {reason}")]
    InvalidRecord { name: String, reason: String },
    #[error("Serialization error: {0}")]
    Serialize(String),
    #[error("Configuration parse error: {message}")]
    ConfigParse { message: String },
    #[error("Configuration directory not found")]
    ConfigDirNotFound,
}

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Unknown configuration key '{key}'")]
    UnknownKey { key: String },
    #[error("Invalid configuration value for '{key}': {value} ({reason})")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
}

#[derive(Error, Debug)]
pub enum DisplayError {
    #[error("invalid query '{query}': {reason}")]
    Query { query: String, reason: String },
    #[error("Terminal output error: {0}")]
    TerminalOutput(String),
    #[error("JSON encoding failed: {0}")]
    Serialize(String),
}

impl AppError {
    /// Wrap the error with a descriptive prefix such as "failed to list coupons".
    pub fn context(self, context: impl Into<String>) -> Self {
        AppError::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error, looking through any context wrappers.
    pub fn root(&self) -> &AppError {
        let mut current = self;
        while let AppError::Context { source, .. } = current {
            current = source;
        }
        current
    }

    pub fn troubleshooting_hint(&self) -> Option<String> {
        match self.root() {
            AppError::Resolve(ResolveError::StoreUnavailable { .. }) => Some(
                "set SHOPLINE_CREDENTIALS_FILE to use a file-backed credential store".to_string(),
            ),
            AppError::Resolve(ResolveError::NoProfiles) => {
                Some("'spl auth login --name <name> --handle <handle>' to add a store".to_string())
            }
            AppError::Resolve(ResolveError::AmbiguousProfiles { .. }) => {
                Some("'spl auth list' to see configured profiles".to_string())
            }
            AppError::Api(ApiError::Http { status: 401, .. }) => {
                Some("the access token was rejected; run 'spl auth login' again".to_string())
            }
            AppError::Api(ApiError::Timeout { .. }) => {
                Some("Check your network connection and try again".to_string())
            }
            _ => None,
        }
    }
}

/// Adds a "failed to ..." style prefix to any error convertible into [`AppError`].
pub trait ResultExt<T> {
    fn context(self, context: impl Into<String>) -> Result<T, AppError>;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: Into<AppError>,
{
    fn context(self, context: impl Into<String>) -> Result<T, AppError> {
        self.map_err(|e| e.into().context(context))
    }
}
