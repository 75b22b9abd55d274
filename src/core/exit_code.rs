//! Process exit codes
//!
//! | code | meaning                              |
//! |------|--------------------------------------|
//! | 0    | success                              |
//! | 1    | general failure                      |
//! | 2    | authentication / authorization       |
//! | 3    | validation (local or HTTP 400/422)   |
//! | 4    | not found                            |
//! | 5    | rate limited                         |

use crate::error::{ApiError, AppError};

pub const SUCCESS: i32 = 0;
pub const GENERAL: i32 = 1;
pub const AUTH: i32 = 2;
pub const VALIDATION: i32 = 3;
pub const NOT_FOUND: i32 = 4;
pub const RATE_LIMITED: i32 = 5;

/// Exit code for a finished command.
pub fn exit_code<T>(result: &Result<T, AppError>) -> i32 {
    match result {
        Ok(_) => SUCCESS,
        Err(err) => exit_code_for(err),
    }
}

/// Classifies an error, looking through any context wrappers.
pub fn exit_code_for(err: &AppError) -> i32 {
    match err.root() {
        AppError::Exit { code, .. } => *code,
        AppError::Api(api) => api_exit_code(api),
        AppError::Auth(_) => AUTH,
        AppError::Validation(_) => VALIDATION,
        _ => GENERAL,
    }
}

fn api_exit_code(err: &ApiError) -> i32 {
    match err.status() {
        Some(401) | Some(403) => AUTH,
        Some(400) | Some(422) => VALIDATION,
        Some(404) => NOT_FOUND,
        Some(429) => RATE_LIMITED,
        _ => GENERAL,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AuthError, ResolveError, StorageError, ValidationError};

    fn http(status: u16) -> AppError {
        AppError::Api(ApiError::Http {
            status,
            endpoint: "/coupons".to_string(),
            message: "x".to_string(),
        })
    }

    #[test]
    fn test_success() {
        let ok: Result<(), AppError> = Ok(());
        assert_eq!(exit_code(&ok), SUCCESS);
    }

    #[test]
    fn test_http_statuses() {
        assert_eq!(exit_code_for(&http(401)), AUTH);
        assert_eq!(exit_code_for(&http(403)), AUTH);
        assert_eq!(exit_code_for(&http(404)), NOT_FOUND);
        assert_eq!(exit_code_for(&http(400)), VALIDATION);
        assert_eq!(exit_code_for(&http(422)), VALIDATION);
        assert_eq!(exit_code_for(&http(429)), RATE_LIMITED);
        assert_eq!(exit_code_for(&http(500)), GENERAL);
        assert_eq!(exit_code_for(&http(502)), GENERAL);
    }

    #[test]
    fn test_rate_limited_variant() {
        let err = AppError::Api(ApiError::RateLimited {
            endpoint: "/orders".to_string(),
            retry_after_secs: 2,
        });
        assert_eq!(exit_code_for(&err), RATE_LIMITED);
    }

    #[test]
    fn test_wrapped_errors_keep_their_code() {
        let err = http(404).context("failed to get coupon");
        assert_eq!(exit_code_for(&err), NOT_FOUND);

        let err = http(401)
            .context("failed to list orders")
            .context("orders");
        assert_eq!(exit_code_for(&err), AUTH);
    }

    #[test]
    fn test_explicit_exit() {
        let err = AppError::Exit {
            code: 7,
            message: "custom".to_string(),
        };
        assert_eq!(exit_code(&Err::<(), _>(err)), 7);
    }

    #[test]
    fn test_local_errors() {
        let err = AppError::Validation(ValidationError::MissingFlag {
            flag: "code".to_string(),
        });
        assert_eq!(exit_code_for(&err), VALIDATION);
        assert_eq!(exit_code_for(&AppError::Auth(AuthError::MissingAdminToken)), AUTH);
        assert_eq!(
            exit_code_for(&AppError::Resolve(ResolveError::NoProfiles)),
            GENERAL
        );
        assert_eq!(
            exit_code_for(&AppError::Storage(StorageError::ConfigDirNotFound)),
            GENERAL
        );
    }

    #[test]
    fn test_transport_failures_are_general() {
        let err = AppError::Api(ApiError::Timeout {
            timeout_secs: 30,
            endpoint: "/coupons".to_string(),
        });
        assert_eq!(exit_code_for(&err), GENERAL);
    }
}
