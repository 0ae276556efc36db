//! Accounts known to the job board.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{TypeConstraintError, UserEmail, UserId, UserName};

/// Role granted to an account; mirrors the `roles` claim of the access token.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Employer,
    Candidate,
}

impl Role {
    pub const fn as_str(self) -> &'static str {
        match self {
            Role::Admin => crate::ROLE_ADMIN,
            Role::Employer => crate::ROLE_EMPLOYER,
            Role::Candidate => crate::ROLE_CANDIDATE,
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = TypeConstraintError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            crate::ROLE_ADMIN => Ok(Role::Admin),
            crate::ROLE_EMPLOYER => Ok(Role::Employer),
            crate::ROLE_CANDIDATE => Ok(Role::Candidate),
            other => Err(TypeConstraintError::InvalidValue(format!(
                "unknown role `{other}`"
            ))),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: UserId,
    pub email: UserEmail,
    pub name: UserName,
    pub role: Role,
    /// Disabled accounts keep their data but cannot post or apply.
    pub enabled: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Clone, Debug)]
pub struct NewUser {
    pub email: UserEmail,
    pub name: UserName,
    pub role: Role,
}

impl NewUser {
    #[must_use]
    pub fn new(email: UserEmail, name: UserName, role: Role) -> Self {
        Self { email, name, role }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_parse_from_claim_values() {
        assert_eq!("employer".parse::<Role>(), Ok(Role::Employer));
        assert_eq!(Role::Candidate.to_string(), "candidate");
        assert!("root".parse::<Role>().is_err());
    }
}
