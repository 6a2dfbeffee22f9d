use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::validation::{coerce_number, missing_fields, present};
use crate::CoreError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TourPackage {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub tour_type: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub info: Value,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub tour_plan: Value,
    #[serde(default)]
    pub photos: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageRequest {
    pub tour_type: Option<String>,
    pub price: Option<Value>,
    pub info: Option<Value>,
    pub email: Option<String>,
    pub tour_plan: Option<Value>,
    pub photos: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewPackage {
    pub tour_type: String,
    pub price: f64,
    pub info: Value,
    pub email: String,
    pub tour_plan: Value,
    pub photos: Vec<String>,
}

impl TryFrom<PackageRequest> for NewPackage {
    type Error = CoreError;

    fn try_from(req: PackageRequest) -> Result<Self, Self::Error> {
        let price = req.price.as_ref().and_then(coerce_number);
        match (present(req.tour_type), price, present(req.email)) {
            (Some(tour_type), Some(price), Some(email)) => Ok(Self {
                tour_type,
                price,
                info: req.info.unwrap_or(Value::Null),
                email,
                tour_plan: req.tour_plan.unwrap_or(Value::Null),
                photos: req.photos.unwrap_or_default(),
            }),
            _ => Err(missing_fields()),
        }
    }
}

impl NewPackage {
    pub fn into_package(self, id: String) -> TourPackage {
        TourPackage {
            id,
            tour_type: self.tour_type,
            price: self.price,
            info: self.info,
            email: Some(self.email),
            tour_plan: self.tour_plan,
            photos: self.photos,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_price_string_is_coerced() {
        let req: PackageRequest = serde_json::from_value(json!({
            "tourType": "Hiking",
            "price": "149.99",
            "email": "owner@example.com",
            "photos": ["https://img/1.jpg"]
        }))
        .unwrap();
        let pkg = NewPackage::try_from(req).unwrap();
        assert_eq!(pkg.price, 149.99);
        assert_eq!(pkg.photos.len(), 1);
        assert_eq!(pkg.info, Value::Null);
    }

    #[test]
    fn test_unparsable_price_is_missing() {
        let req: PackageRequest = serde_json::from_value(json!({
            "tourType": "Hiking",
            "price": "cheap",
            "email": "owner@example.com"
        }))
        .unwrap();
        assert!(matches!(NewPackage::try_from(req), Err(CoreError::Validation(_))));
    }
}
