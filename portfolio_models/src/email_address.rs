use std::{fmt, str::FromStr, sync::LazyLock};

use nutype::nutype;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Local part, `@`, and a domain containing at least one dot. Whitespace and
/// additional `@` characters are not allowed anywhere.
pub static EMAIL_ADDRESS_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

#[nutype(
    validate(regex = EMAIL_ADDRESS_REGEX),
    derive(
        Debug,
        Clone,
        PartialEq,
        Eq,
        Hash,
        Deref,
        TryFrom,
        FromStr,
        Display,
        Serialize,
        Deserialize
    )
)]
pub struct EmailAddress(String);

impl EmailAddress {
    pub fn as_str(&self) -> &str {
        self
    }
}

/// A mailbox as used in `From`/`To` headers, e.g. `Portfolio Contact <hello@example.com>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddressWithName {
    pub name: Option<String>,
    pub email: EmailAddress,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid mailbox: {0:?}")]
pub struct InvalidMailbox(String);

impl FromStr for EmailAddressWithName {
    type Err = InvalidMailbox;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidMailbox(s.into());

        let s = s.trim();
        let Some(rest) = s.strip_suffix('>') else {
            let email = s.parse().map_err(|_| invalid())?;
            return Ok(Self { name: None, email });
        };

        let (name, email) = rest.rsplit_once('<').ok_or_else(invalid)?;
        let name = name.trim().trim_matches('"').trim();
        let email = email.trim().parse().map_err(|_| invalid())?;

        Ok(Self {
            name: (!name.is_empty()).then(|| name.into()),
            email,
        })
    }
}

impl TryFrom<String> for EmailAddressWithName {
    type Error = InvalidMailbox;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<EmailAddressWithName> for String {
    fn from(value: EmailAddressWithName) -> Self {
        value.to_string()
    }
}

impl fmt::Display for EmailAddressWithName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{name} <{}>", self.email),
            None => self.email.fmt(f),
        }
    }
}
