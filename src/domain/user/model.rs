//! Customer context seen by the pricing rules

use crate::domain::Currency;

/// What the pricing rules need to know about whoever is browsing.
pub trait UserContext: Send + Sync {
    fn is_preferred(&self) -> bool;
    fn currency(&self) -> Currency;
}

/// A customer identified by the fronting gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    pub id: String,
    pub preferred: bool,
    pub currency: Currency,
}

impl Customer {
    pub fn new(id: impl Into<String>, preferred: bool, currency: Currency) -> Self {
        Self {
            id: id.into(),
            preferred,
            currency,
        }
    }
}

impl UserContext for Customer {
    fn is_preferred(&self) -> bool {
        self.preferred
    }

    fn currency(&self) -> Currency {
        self.currency.clone()
    }
}

/// Visitor without an identity: never preferred, prices in USD.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnonymousUser;

impl UserContext for AnonymousUser {
    fn is_preferred(&self) -> bool {
        false
    }

    fn currency(&self) -> Currency {
        Currency::usd()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anonymous_defaults() {
        let user = AnonymousUser;
        assert!(!user.is_preferred());
        assert_eq!(user.currency(), Currency::new("USD"));
    }

    #[test]
    fn test_customer_context() {
        let customer = Customer::new("c-42", true, Currency::new("EUR"));
        assert!(customer.is_preferred());
        assert_eq!(customer.currency().code(), "EUR");
    }
}
