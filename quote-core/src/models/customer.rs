use serde::{Deserialize, Serialize};

/// Customer details captured on a quote.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerInfo {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub postcode: Option<String>,
}

impl CustomerInfo {
    /// True when an email address with some non-whitespace content is present.
    pub fn has_email(&self) -> bool {
        self.email
            .as_deref()
            .is_some_and(|email| !email.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_email_does_not_count() {
        let customer = CustomerInfo {
            email: Some("   ".to_string()),
            ..Default::default()
        };

        assert!(!customer.has_email());
    }

    #[test]
    fn present_email_counts() {
        let customer = CustomerInfo {
            email: Some("jo@example.com".to_string()),
            ..Default::default()
        };

        assert!(customer.has_email());
    }
}
