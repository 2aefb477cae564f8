//! User identifier union for dual-key lookups.
//!
//! Users can be addressed by their surrogate UUID or by the identity
//! provider's user id stored in `cognito_user_id`. The shape of the input
//! string decides which lookup runs: a valid UUID targets the primary key,
//! anything else targets the external id column. The decision is made once,
//! at the HTTP boundary, so data-access code dispatches on an enum instead
//! of re-parsing in every function.

use core::fmt;

use crate::types::id::UserId;

/// How a caller refers to a user.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum UserIdentifier {
    /// The surrogate primary key.
    Id(UserId),
    /// The external identity provider's user id.
    Cognito(String),
}

impl UserIdentifier {
    /// Classify an identifier string.
    ///
    /// A string that parses as a UUID is treated as the surrogate id;
    /// everything else is treated as an external identity id. This never
    /// fails: the fallback arm accepts any string.
    #[must_use]
    pub fn parse(input: &str) -> Self {
        match input.parse::<UserId>() {
            Ok(id) => Self::Id(id),
            Err(_) => Self::Cognito(input.to_owned()),
        }
    }
}

impl From<UserId> for UserIdentifier {
    fn from(id: UserId) -> Self {
        Self::Id(id)
    }
}

impl fmt::Display for UserIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{id}"),
            Self::Cognito(external) => write!(f, "{external}"),
        }
    }
}
