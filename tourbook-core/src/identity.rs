use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::CoreResult;

/// Decoded claims of a verified bearer credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub subject: String,
    pub email: Option<String>,
    pub role: Option<String>,
}

#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    /// Verify a raw bearer token. Any failure is reported as
    /// [`crate::CoreError::Identity`].
    async fn verify(&self, token: &str) -> CoreResult<Identity>;
}

/// Who may reach admin-only endpoints: an explicit email list and/or a role
/// claim value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminPolicy {
    emails: Vec<String>,
    role: Option<String>,
}

impl AdminPolicy {
    pub fn new(emails: Vec<String>, role: Option<String>) -> Self {
        Self {
            emails,
            role: role.filter(|r| !r.is_empty()),
        }
    }

    pub fn permits(&self, identity: &Identity) -> bool {
        let by_email = identity
            .email
            .as_ref()
            .is_some_and(|email| self.emails.iter().any(|admin| admin == email));
        let by_role = match (&self.role, &identity.role) {
            (Some(required), Some(actual)) => required == actual,
            _ => false,
        };
        by_email || by_role
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(email: Option<&str>, role: Option<&str>) -> Identity {
        Identity {
            subject: "uid-1".into(),
            email: email.map(String::from),
            role: role.map(String::from),
        }
    }

    #[test]
    fn test_email_must_match_exactly() {
        let policy = AdminPolicy::new(vec!["shahin@gmail.com".into()], None);
        assert!(policy.permits(&identity(Some("shahin@gmail.com"), None)));
        assert!(!policy.permits(&identity(Some("Shahin@gmail.com"), None)));
        assert!(!policy.permits(&identity(Some("someone@gmail.com"), None)));
        assert!(!policy.permits(&identity(None, None)));
    }

    #[test]
    fn test_role_claim_grants_access() {
        let policy = AdminPolicy::new(vec![], Some("admin".into()));
        assert!(policy.permits(&identity(Some("ops@example.com"), Some("admin"))));
        assert!(!policy.permits(&identity(Some("ops@example.com"), Some("user"))));
    }

    #[test]
    fn test_empty_policy_denies_everyone() {
        let policy = AdminPolicy::new(vec![], Some(String::new()));
        assert!(!policy.permits(&identity(Some("a@b.c"), Some(""))));
    }
}
