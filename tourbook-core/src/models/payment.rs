use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::validation::{coerce_number, missing_fields, present};
use crate::{CoreError, CoreResult};

/// Append-only record of a client-reported gateway transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub transaction_id: String,
    pub booking_id: String,
    pub amount: f64,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub transaction_id: Option<String>,
    pub booking_id: Option<String>,
    pub amount: Option<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewPayment {
    pub transaction_id: String,
    pub booking_id: String,
    pub amount: f64,
    pub date: DateTime<Utc>,
}

impl TryFrom<PaymentRequest> for NewPayment {
    type Error = CoreError;

    fn try_from(req: PaymentRequest) -> CoreResult<Self> {
        let amount = req.amount.as_ref().and_then(coerce_number);
        match (present(req.transaction_id), present(req.booking_id), amount) {
            (Some(transaction_id), Some(booking_id), Some(amount)) => Ok(Self {
                transaction_id,
                booking_id,
                amount,
                date: Utc::now(),
            }),
            _ => Err(missing_fields()),
        }
    }
}

impl NewPayment {
    pub fn into_record(self, id: String) -> PaymentRecord {
        PaymentRecord {
            id,
            transaction_id: self.transaction_id,
            booking_id: self.booking_id,
            amount: self.amount,
            date: self.date,
        }
    }
}
