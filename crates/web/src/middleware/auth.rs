use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use std::collections::HashMap;

use crate::error::WebError;
use crate::state::AppState;

/// The authenticated caller, as resolved by the external identity provider.
/// The token itself is opaque to this service; we only map it to the
/// identifier and display name the provider issued.
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: String,
    pub display_name: String,
}

/// Token-to-identity map loaded from configuration. Each entry is
/// `token:user_id:display name`.
#[derive(Clone, Default)]
pub struct IdentityTokens {
    tokens: HashMap<String, Identity>,
}

impl IdentityTokens {
    pub fn from_comma_separated(entries: &str) -> Self {
        let tokens = entries
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .filter_map(|entry| {
                let mut parts = entry.splitn(3, ':');
                let token = parts.next()?.to_string();
                let user_id = parts.next()?.to_string();
                let display_name = parts.next().unwrap_or_default().to_string();

                if token.is_empty() || user_id.is_empty() {
                    return None;
                }

                Some((
                    token,
                    Identity {
                        user_id,
                        display_name,
                    },
                ))
            })
            .collect();

        Self { tokens }
    }

    pub fn resolve(&self, token: &str) -> Option<Identity> {
        self.tokens.get(token).cloned()
    }
}

#[axum::async_trait]
impl FromRequestParts<AppState> for Identity {
    type Rejection = WebError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|header| header.strip_prefix("Bearer "));

        match token.and_then(|t| state.identities.resolve(t)) {
            Some(identity) => Ok(identity),
            None => {
                tracing::warn!("Request with missing or unknown identity token");
                Err(WebError::Unauthorized)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_token_entries() {
        let tokens =
            IdentityTokens::from_comma_separated("abc:u1:Alice Smith, def:u2:Bob , ,broken");

        let alice = tokens.resolve("abc").unwrap();
        assert_eq!(alice.user_id, "u1");
        assert_eq!(alice.display_name, "Alice Smith");

        let bob = tokens.resolve("def").unwrap();
        assert_eq!(bob.user_id, "u2");

        assert!(tokens.resolve("broken").is_none());
        assert!(tokens.resolve("missing").is_none());
    }

    #[test]
    fn display_name_may_contain_colons() {
        let tokens = IdentityTokens::from_comma_separated("t:u:Dr. Strange: PhD");
        assert_eq!(tokens.resolve("t").unwrap().display_name, "Dr. Strange: PhD");
    }
}
