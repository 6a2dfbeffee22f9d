use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tourbook_core::payment::{PaymentGateway, PaymentIntent};
use tourbook_core::{CoreError, CoreResult};
use tracing::{debug, error};

use crate::app_config::PaymentsConfig;

/// Stripe REST client for payment intents.
pub struct StripeGateway {
    client: reqwest::Client,
    api_base: String,
    secret_key: String,
}

#[derive(Deserialize)]
struct StripeErrorBody {
    error: StripeError,
}

#[derive(Deserialize)]
struct StripeError {
    #[serde(default)]
    message: Option<String>,
}

fn gateway_err(err: reqwest::Error) -> CoreError {
    CoreError::Gateway(err.to_string())
}

impl StripeGateway {
    pub fn new(config: &PaymentsConfig) -> CoreResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(gateway_err)?;
        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            secret_key: config.secret_key.clone(),
        })
    }
}

#[async_trait]
impl PaymentGateway for StripeGateway {
    async fn create_intent(
        &self,
        amount: i64,
        currency: &str,
        method_types: &[&str],
    ) -> CoreResult<PaymentIntent> {
        let mut form: Vec<(&str, String)> = vec![
            ("amount", amount.to_string()),
            ("currency", currency.to_string()),
        ];
        form.extend(
            method_types
                .iter()
                .map(|m| ("payment_method_types[]", m.to_string())),
        );

        let url = format!("{}/v1/payment_intents", self.api_base);
        debug!(amount, currency, "Creating payment intent");
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.secret_key)
            .form(&form)
            .send()
            .await
            .map_err(gateway_err)?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<StripeErrorBody>()
                .await
                .ok()
                .and_then(|body| body.error.message)
                .unwrap_or_else(|| status.to_string());
            error!(%status, %message, "Payment intent rejected");
            return Err(CoreError::Gateway(message));
        }

        response.json::<PaymentIntent>().await.map_err(gateway_err)
    }
}
