//! Bearer-token verifiers. Only the provider's signing keys are cached;
//! every request is verified again.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tourbook_core::identity::{Identity, IdentityVerifier};
use tourbook_core::{CoreError, CoreResult};
use tracing::{debug, info};

use crate::app_config::{AuthConfig, IdentityProviderKind};

/// Claims read from a verified token. Extra claims are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    pub exp: usize,
}

impl From<TokenClaims> for Identity {
    fn from(claims: TokenClaims) -> Self {
        Identity {
            subject: claims.sub,
            email: claims.email,
            role: claims.role,
        }
    }
}

fn identity_err(err: impl std::fmt::Display) -> CoreError {
    CoreError::Identity(err.to_string())
}

pub fn verifier_from_config(config: &AuthConfig) -> Arc<dyn IdentityVerifier> {
    match config.provider {
        IdentityProviderKind::Firebase => {
            info!(project = %config.project_id, "Using Firebase identity provider");
            Arc::new(FirebaseVerifier::new(
                config.project_id.clone(),
                config.jwks_url.clone(),
                Duration::from_secs(config.jwks_cache_seconds),
            ))
        }
        IdentityProviderKind::SharedSecret => {
            info!("Using shared-secret identity provider");
            Arc::new(SharedSecretVerifier::new(&config.jwt_secret))
        }
    }
}

struct CachedKeys {
    keys: JwkSet,
    fetched_at: Instant,
}

/// RS256 ID tokens checked against the provider's published JWK set.
pub struct FirebaseVerifier {
    http: reqwest::Client,
    project_id: String,
    jwks_url: String,
    cache_ttl: Duration,
    cache: RwLock<Option<CachedKeys>>,
}

impl FirebaseVerifier {
    pub fn new(project_id: String, jwks_url: String, cache_ttl: Duration) -> Self {
        Self {
            http: reqwest::Client::new(),
            project_id,
            jwks_url,
            cache_ttl,
            cache: RwLock::new(None),
        }
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[&self.project_id]);
        validation.set_issuer(&[format!("https://securetoken.google.com/{}", self.project_id)]);
        validation
    }

    async fn signing_keys(&self) -> CoreResult<JwkSet> {
        if let Some(cached) = self.cache.read().await.as_ref() {
            if cached.fetched_at.elapsed() < self.cache_ttl {
                return Ok(cached.keys.clone());
            }
        }

        debug!(url = %self.jwks_url, "Fetching identity provider signing keys");
        let keys: JwkSet = self
            .http
            .get(&self.jwks_url)
            .send()
            .await
            .and_then(|resp| resp.error_for_status())
            .map_err(identity_err)?
            .json()
            .await
            .map_err(identity_err)?;

        *self.cache.write().await = Some(CachedKeys {
            keys: keys.clone(),
            fetched_at: Instant::now(),
        });
        Ok(keys)
    }
}

#[async_trait]
impl IdentityVerifier for FirebaseVerifier {
    async fn verify(&self, token: &str) -> CoreResult<Identity> {
        let header = decode_header(token).map_err(identity_err)?;
        let kid = header
            .kid
            .ok_or_else(|| CoreError::Identity("token has no key id".into()))?;

        let keys = self.signing_keys().await?;
        let jwk = keys
            .find(&kid)
            .ok_or_else(|| CoreError::Identity(format!("unknown key id {kid}")))?;
        let key = DecodingKey::from_jwk(jwk).map_err(identity_err)?;

        let data = decode::<TokenClaims>(token, &key, &self.validation()).map_err(identity_err)?;
        Ok(data.claims.into())
    }
}

/// HS256 tokens signed with a configured secret.
pub struct SharedSecretVerifier {
    key: DecodingKey,
}

impl SharedSecretVerifier {
    pub fn new(secret: &str) -> Self {
        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

#[async_trait]
impl IdentityVerifier for SharedSecretVerifier {
    async fn verify(&self, token: &str) -> CoreResult<Identity> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_aud = false;
        let data = decode::<TokenClaims>(token, &self.key, &validation).map_err(identity_err)?;
        Ok(data.claims.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration as ChronoDuration, Utc};
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn token(secret: &str, exp_offset: i64) -> String {
        let claims = TokenClaims {
            sub: "uid-1".into(),
            email: Some("admin@example.com".into()),
            role: Some("admin".into()),
            exp: (Utc::now() + ChronoDuration::seconds(exp_offset)).timestamp() as usize,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_shared_secret_round_trip() {
        let verifier = SharedSecretVerifier::new("s3cret");
        let identity = verifier.verify(&token("s3cret", 600)).await.unwrap();
        assert_eq!(identity.subject, "uid-1");
        assert_eq!(identity.email.as_deref(), Some("admin@example.com"));
        assert_eq!(identity.role.as_deref(), Some("admin"));
    }

    #[tokio::test]
    async fn test_wrong_secret_is_rejected() {
        let verifier = SharedSecretVerifier::new("s3cret");
        let err = verifier.verify(&token("other", 600)).await.unwrap_err();
        assert!(matches!(err, CoreError::Identity(_)));
    }

    #[tokio::test]
    async fn test_expired_token_is_rejected() {
        let verifier = SharedSecretVerifier::new("s3cret");
        assert!(verifier.verify(&token("s3cret", -3600)).await.is_err());
    }

    #[tokio::test]
    async fn test_firebase_rejects_token_without_kid() {
        let verifier = FirebaseVerifier::new(
            "tour-project".into(),
            "http://127.0.0.1:9/unused".into(),
            Duration::from_secs(60),
        );
        let err = verifier.verify(&token("s3cret", 600)).await.unwrap_err();
        assert!(err.to_string().contains("key id"));
    }
}
