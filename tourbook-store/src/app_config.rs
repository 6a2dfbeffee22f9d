use serde::Deserialize;
use std::env;

pub const ENV_PREFIX: &str = "TOURBOOK";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub payments: PaymentsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub uri: String,
    #[serde(default = "default_db_name")]
    pub name: String,
    /// Multi-document transactions need a replica set or sharded cluster.
    #[serde(default)]
    pub use_transactions: bool,
}

fn default_db_name() -> String {
    "tourDB".into()
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IdentityProviderKind {
    Firebase,
    SharedSecret,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub provider: IdentityProviderKind,
    #[serde(default)]
    pub project_id: String,
    #[serde(default)]
    pub jwt_secret: String,
    #[serde(default = "default_jwks_url")]
    pub jwks_url: String,
    #[serde(default = "default_jwks_cache_seconds")]
    pub jwks_cache_seconds: u64,
    #[serde(default)]
    pub admin_emails: Vec<String>,
    #[serde(default)]
    pub admin_role: Option<String>,
}

fn default_jwks_url() -> String {
    "https://www.googleapis.com/service_accounts/v1/jwk/securetoken@system.gserviceaccount.com"
        .into()
}

fn default_jwks_cache_seconds() -> u64 {
    3600
}

#[derive(Debug, Deserialize, Clone)]
pub struct PaymentsConfig {
    #[serde(default)]
    pub secret_key: String,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "default_api_base")]
    pub api_base: String,
}

fn default_currency() -> String {
    "usd".into()
}

fn default_api_base() -> String {
    "https://api.stripe.com".into()
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            // Optional per-environment overrides
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // e.g. `TOURBOOK__SERVER__PORT=5000`, `TOURBOOK__AUTH__ADMIN_EMAILS=a@x.io,b@x.io`
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("auth.admin_emails"),
            )
            .build()?;

        s.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_defaults() {
        let auth: AuthConfig = serde_json::from_str(r#"{"provider":"shared_secret"}"#).unwrap();
        assert_eq!(auth.provider, IdentityProviderKind::SharedSecret);
        assert_eq!(auth.jwks_cache_seconds, 3600);
        assert!(auth.jwks_url.starts_with("https://www.googleapis.com/"));
        assert!(auth.admin_emails.is_empty());
    }

    #[test]
    fn test_payment_defaults() {
        let payments: PaymentsConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(payments.currency, "usd");
        assert_eq!(payments.api_base, "https://api.stripe.com");
    }
}
