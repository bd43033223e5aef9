//! Resolution of the user identifier sent to email ingestion.

use uuid::Uuid;

/// Where a [`UserIdentity`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentitySource {
    /// Supplied by the signed-in session or configuration.
    Configured,
    /// Generated because no identifier was available.
    Proxy,
}

/// The user on whose behalf onboarding runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserIdentity {
    pub user_id: String,
    pub source: IdentitySource,
}

impl UserIdentity {
    pub fn configured(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            source: IdentitySource::Configured,
        }
    }

    /// Use the configured identifier, or fall back to a random proxy id.
    ///
    /// Ingestion keyed on a proxy id cannot be tied back to the account, so
    /// the fallback is logged as an error.
    pub fn resolve(configured: Option<&str>) -> Self {
        match configured.map(str::trim).filter(|id| !id.is_empty()) {
            Some(id) => Self::configured(id),
            None => {
                let proxy = Uuid::new_v4().to_string();
                tracing::error!(
                    proxy_user_id = %proxy,
                    "Could not retrieve user ID. Using proxy ID"
                );
                Self {
                    user_id: proxy,
                    source: IdentitySource::Proxy,
                }
            }
        }
    }

    pub fn is_proxy(&self) -> bool {
        self.source == IdentitySource::Proxy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_id_wins() {
        let identity = UserIdentity::resolve(Some("108234"));
        assert_eq!(identity.user_id, "108234");
        assert!(!identity.is_proxy());
    }

    #[test]
    fn missing_id_yields_unique_proxy() {
        let a = UserIdentity::resolve(None);
        let b = UserIdentity::resolve(Some(""));
        assert!(a.is_proxy());
        assert!(b.is_proxy());
        assert_ne!(a.user_id, b.user_id);
        assert!(Uuid::parse_str(&a.user_id).is_ok());
    }
}
