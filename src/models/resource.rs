use std::fmt;

use crate::error::CollectError;

/// A pool account to scrape, written as `currency/account` (the account may be
/// a user name or a wallet address).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    currency: String,
    account: String,
}

impl Resource {
    /// Splits a configured identifier into its currency and account parts.
    pub fn parse(raw: &str) -> Result<Self, CollectError> {
        match raw.trim().split('/').collect::<Vec<_>>().as_slice() {
            [currency, account] if !currency.is_empty() && !account.is_empty() => Ok(Resource {
                currency: currency.to_string(),
                account: account.to_string(),
            }),
            _ => Err(CollectError::MalformedResource(raw.to_string())),
        }
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn account(&self) -> &str {
        &self.account
    }

    /// Best-effort label values for an identifier that may not parse.
    ///
    /// Used to label the `up` gauge of a resource that failed, so that even a
    /// malformed entry shows up in the exposition.
    pub fn lossy_labels(raw: &str) -> (String, String) {
        match raw.trim().split_once('/') {
            Some((currency, account)) => (currency.to_string(), account.to_string()),
            None => (raw.trim().to_string(), String::new()),
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.currency, self.account)
    }
}
