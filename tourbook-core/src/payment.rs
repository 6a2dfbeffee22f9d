use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{CoreError, CoreResult};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    RequiresPaymentMethod,
    RequiresConfirmation,
    RequiresAction,
    Processing,
    RequiresCapture,
    Succeeded,
    Canceled,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentIntent {
    /// Provider's id, e.g. `pi_123`.
    pub id: String,
    pub amount: i64,
    pub currency: String,
    pub status: PaymentStatus,
    pub client_secret: Option<String>,
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create a payment intent for `amount` minor units.
    async fn create_intent(
        &self,
        amount: i64,
        currency: &str,
        method_types: &[&str],
    ) -> CoreResult<PaymentIntent>;
}

/// Major to minor units, rounded half away from zero (12.345 → 1235).
pub fn to_minor_units(amount: f64) -> CoreResult<i64> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(CoreError::Validation(format!("Invalid amount: {amount}")));
    }
    Ok((amount * 100.0).round() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minor_units() {
        assert_eq!(to_minor_units(250.0).unwrap(), 25000);
        assert_eq!(to_minor_units(19.99).unwrap(), 1999);
        assert_eq!(to_minor_units(0.005).unwrap(), 1);
        assert!(to_minor_units(-1.0).is_err());
        assert!(to_minor_units(f64::NAN).is_err());
    }

    #[test]
    fn test_unknown_status_is_tolerated() {
        let status: PaymentStatus = serde_json::from_str("\"requires_payment_method\"").unwrap();
        assert_eq!(status, PaymentStatus::RequiresPaymentMethod);
        let status: PaymentStatus = serde_json::from_str("\"brand_new_state\"").unwrap();
        assert_eq!(status, PaymentStatus::Unknown);
    }
}
