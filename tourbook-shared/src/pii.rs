use serde::{Serialize, Serializer};
use std::fmt;

/// Wraps an email (or any identifying string) so that log macros only ever
/// print a redacted form. Serialization still emits the real value.
#[derive(Clone, PartialEq, Eq)]
pub struct Masked<T>(pub T);

impl<T: AsRef<str>> Masked<T> {
    fn redacted(&self) -> String {
        let value = self.0.as_ref();
        match value.split_once('@') {
            Some((local, domain)) => {
                let head: String = local.chars().take(1).collect();
                format!("{head}***@{domain}")
            }
            None if value.is_empty() => String::new(),
            None => "********".to_string(),
        }
    }
}

impl<T: AsRef<str>> fmt::Debug for Masked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.redacted())
    }
}

impl<T: AsRef<str>> fmt::Display for Masked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.redacted())
    }
}

impl<T: Serialize> Serialize for Masked<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_is_redacted_in_logs() {
        let email = Masked("shahin@gmail.com");
        assert_eq!(email.to_string(), "s***@gmail.com");
        assert_eq!(format!("{:?}", email), "\"s***@gmail.com\"");
    }

    #[test]
    fn test_serialization_keeps_value() {
        let email = Masked("guide@example.com".to_string());
        assert_eq!(serde_json::to_string(&email).unwrap(), "\"guide@example.com\"");
    }

    #[test]
    fn test_non_email_is_fully_masked() {
        assert_eq!(Masked("secret").to_string(), "********");
    }
}
