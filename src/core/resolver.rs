//! Store profile resolution
//!
//! Picks the credentials one invocation runs with. Precedence:
//! `--store`, then `SHOPLINE_STORE` (both alias-expanded), then a direct
//! token env var, then the only stored profile. Lookup is exact: a name
//! that is not stored is an error, never a guess.

use crate::error::{ResolveError, StorageError};
use crate::storage::credentials::{CredentialStore, StoredCredentials};
use std::collections::BTreeMap;

pub const STORE_ENV: &str = "SHOPLINE_STORE";
pub const STORE_ALIASES_ENV: &str = "SHOPLINE_STORE_ALIASES";
/// Checked in order; the first non-blank value wins.
pub const TOKEN_ENVS: [&str; 3] = ["SHOPLINE_ACCESS_TOKEN", "SHOPLINE_API_TOKEN", "SHOPLINE_TOKEN"];

/// Everything the resolver reads, gathered up front.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolveRequest {
    pub flag: Option<String>,
    pub env_store: Option<String>,
    pub env_token: Option<String>,
    /// Lowercased alias -> profile name.
    pub aliases: BTreeMap<String, String>,
}

impl ResolveRequest {
    /// Reads the process environment. Config aliases lose to env aliases.
    pub fn from_env(flag: Option<String>, config_aliases: &BTreeMap<String, String>) -> Self {
        let mut aliases: BTreeMap<String, String> = config_aliases
            .iter()
            .map(|(k, v)| (k.to_lowercase(), v.clone()))
            .collect();
        if let Ok(raw) = std::env::var(STORE_ALIASES_ENV) {
            aliases.extend(parse_aliases(&raw));
        }

        Self {
            flag,
            env_store: std::env::var(STORE_ENV).ok(),
            env_token: TOKEN_ENVS
                .iter()
                .filter_map(|name| std::env::var(name).ok())
                .map(|v| v.trim().to_string())
                .find(|v| !v.is_empty()),
            aliases,
        }
    }

    /// The requested profile name after alias expansion, if any.
    pub fn requested_name(&self) -> Option<String> {
        let raw = [self.flag.as_deref(), self.env_store.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|v| !v.is_empty())?;

        Some(
            self.aliases
                .get(&raw.to_lowercase())
                .cloned()
                .unwrap_or_else(|| raw.to_string()),
        )
    }
}

/// Parses `alias:profile,alias2:profile2`. Malformed pairs are skipped.
pub fn parse_aliases(raw: &str) -> BTreeMap<String, String> {
    raw.split(',')
        .filter_map(|pair| {
            let (alias, target) = pair.split_once(':')?;
            let (alias, target) = (alias.trim(), target.trim());
            if alias.is_empty() || target.is_empty() {
                return None;
            }
            Some((alias.to_lowercase(), target.to_string()))
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileSource {
    /// Named by `--store` or `SHOPLINE_STORE`.
    Named,
    /// The single stored profile.
    OnlyProfile,
    /// A token env var, no stored profile.
    TokenEnv,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedProfile {
    pub credentials: StoredCredentials,
    pub source: ProfileSource,
}

/// Resolve the profile for one invocation. `open_store` runs at most once and
/// not at all on the token-only path.
pub fn resolve_profile<F>(
    request: &ResolveRequest,
    open_store: F,
) -> Result<ResolvedProfile, ResolveError>
where
    F: FnOnce() -> Result<Box<dyn CredentialStore>, StorageError>,
{
    let requested = request.requested_name();

    if requested.is_none() {
        if let Some(token) = &request.env_token {
            tracing::debug!("using access token from environment");
            return Ok(ResolvedProfile {
                credentials: StoredCredentials {
                    name: "env".to_string(),
                    handle: String::new(),
                    access_token: token.clone(),
                    created_at: None,
                },
                source: ProfileSource::TokenEnv,
            });
        }
    }

    let store = open_store().map_err(unavailable)?;

    match requested {
        Some(name) => {
            let credentials = store
                .get(&name)
                .map_err(unavailable)?
                .ok_or(ResolveError::ProfileNotFound { name: name.clone() })?;
            tracing::debug!(profile = %name, "resolved named profile");
            Ok(ResolvedProfile {
                credentials,
                source: ProfileSource::Named,
            })
        }
        None => {
            let names = store.list().map_err(unavailable)?;
            match names.as_slice() {
                [] => Err(ResolveError::NoProfiles),
                [only] => {
                    let credentials = store
                        .get(only)
                        .map_err(unavailable)?
                        .ok_or(ResolveError::ProfileNotFound { name: only.clone() })?;
                    tracing::debug!(profile = %only, "using the only configured profile");
                    Ok(ResolvedProfile {
                        credentials,
                        source: ProfileSource::OnlyProfile,
                    })
                }
                _ => Err(ResolveError::AmbiguousProfiles { names }),
            }
        }
    }
}

fn unavailable(err: StorageError) -> ResolveError {
    ResolveError::StoreUnavailable {
        reason: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::credentials::MemoryStore;
    use std::cell::Cell;

    fn store_with(names: &[&str]) -> MemoryStore {
        MemoryStore::with_profiles(
            names
                .iter()
                .map(|n| StoredCredentials::new(*n, format!("{}-handle", n), format!("{}-token", n))),
        )
    }

    fn opener(store: MemoryStore) -> impl FnOnce() -> Result<Box<dyn CredentialStore>, StorageError> {
        move || Ok(Box::new(store) as Box<dyn CredentialStore>)
    }

    #[test]
    fn test_no_profiles() {
        let result = resolve_profile(&ResolveRequest::default(), opener(store_with(&[])));
        assert_eq!(result, Err(ResolveError::NoProfiles));
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("no store profiles configured"));
    }

    #[test]
    fn test_single_profile_is_used() {
        let resolved = resolve_profile(&ResolveRequest::default(), opener(store_with(&["only"])))
            .expect("single profile");
        assert_eq!(resolved.credentials.name, "only");
        assert_eq!(resolved.credentials.handle, "only-handle");
        assert_eq!(resolved.source, ProfileSource::OnlyProfile);
    }

    #[test]
    fn test_multiple_profiles_without_selection() {
        let result = resolve_profile(&ResolveRequest::default(), opener(store_with(&["a", "b"])));
        match result {
            Err(ResolveError::AmbiguousProfiles { names }) => assert_eq!(names, vec!["a", "b"]),
            other => panic!("expected ambiguity error, got {:?}", other),
        }
    }

    #[test]
    fn test_flag_beats_env() {
        let request = ResolveRequest {
            flag: Some("a".to_string()),
            env_store: Some("b".to_string()),
            ..Default::default()
        };
        let resolved = resolve_profile(&request, opener(store_with(&["a", "b"]))).expect("flag");
        assert_eq!(resolved.credentials.name, "a");
        assert_eq!(resolved.source, ProfileSource::Named);
    }

    #[test]
    fn test_env_store_used_without_flag() {
        let request = ResolveRequest {
            env_store: Some("b".to_string()),
            ..Default::default()
        };
        let resolved = resolve_profile(&request, opener(store_with(&["a", "b"]))).expect("env");
        assert_eq!(resolved.credentials.name, "b");
    }

    #[test]
    fn test_unknown_name_is_not_found_even_with_one_profile() {
        let request = ResolveRequest {
            flag: Some("ghost".to_string()),
            ..Default::default()
        };
        let result = resolve_profile(&request, opener(store_with(&["only"])));
        assert_eq!(
            result,
            Err(ResolveError::ProfileNotFound {
                name: "ghost".to_string()
            })
        );
    }

    #[test]
    fn test_prefix_is_not_matched() {
        let request = ResolveRequest {
            flag: Some("prod".to_string()),
            ..Default::default()
        };
        let result = resolve_profile(&request, opener(store_with(&["production"])));
        assert!(matches!(result, Err(ResolveError::ProfileNotFound { .. })));
    }

    #[test]
    fn test_alias_expansion() {
        let request = ResolveRequest {
            flag: Some("P".to_string()),
            aliases: parse_aliases("p:production, s:staging"),
            ..Default::default()
        };
        let resolved =
            resolve_profile(&request, opener(store_with(&["production", "staging"]))).expect("alias");
        assert_eq!(resolved.credentials.name, "production");
    }

    #[test]
    fn test_token_env_skips_store() {
        let opened = Cell::new(false);
        let request = ResolveRequest {
            env_token: Some("env-token".to_string()),
            ..Default::default()
        };
        let resolved = resolve_profile(&request, || {
            opened.set(true);
            Err(StorageError::Keyring("no secret service".to_string()))
        })
        .expect("token only");
        assert!(!opened.get());
        assert_eq!(resolved.credentials.access_token, "env-token");
        assert_eq!(resolved.source, ProfileSource::TokenEnv);
    }

    #[test]
    fn test_named_profile_beats_token_env() {
        let request = ResolveRequest {
            flag: Some("a".to_string()),
            env_token: Some("env-token".to_string()),
            ..Default::default()
        };
        let resolved = resolve_profile(&request, opener(store_with(&["a"]))).expect("named");
        assert_eq!(resolved.credentials.access_token, "a-token");
    }

    #[test]
    fn test_store_unavailable() {
        let result = resolve_profile(&ResolveRequest::default(), || {
            Err(StorageError::Keyring("dbus not running".to_string()))
        });
        match result {
            Err(ResolveError::StoreUnavailable { reason }) => {
                assert!(reason.contains("dbus not running"))
            }
            other => panic!("expected store error, got {:?}", other),
        }
    }

    #[test]
    fn test_blank_flag_falls_through() {
        let request = ResolveRequest {
            flag: Some("  ".to_string()),
            env_store: Some("b".to_string()),
            ..Default::default()
        };
        assert_eq!(request.requested_name().as_deref(), Some("b"));
    }

    #[test]
    fn test_parse_aliases_skips_malformed() {
        let aliases = parse_aliases("a:alpha,broken,:empty,b:");
        assert_eq!(aliases.len(), 1);
        assert_eq!(aliases.get("a").map(String::as_str), Some("alpha"));
    }
}
