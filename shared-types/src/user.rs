use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::lead::ParseStatusError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum UserType {
    BusinessOwner,
    Agency,
}

impl UserType {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::BusinessOwner => "business_owner",
            UserType::Agency => "agency",
        }
    }
}

impl FromStr for UserType {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "business_owner" => Ok(UserType::BusinessOwner),
            "agency" => Ok(UserType::Agency),
            other => Err(ParseStatusError(other.to_string())),
        }
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity record. The password hash never leaves the database layer.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub company_name: Option<String>,
    pub user_type: UserType,
    pub industry: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub name: String,
    pub company_name: String,
    pub industry: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, TS)]
#[ts(export)]
pub struct SignupResponse {
    pub user: User,
    pub org: crate::org::Org,
    pub services_count: usize,
    pub sources_count: usize,
}

/// Payload of the current-user lookup: the caller's record plus every org
/// they own.
#[derive(Debug, Serialize, TS)]
#[ts(export)]
pub struct CurrentUserResponse {
    pub user: User,
    pub orgs: Vec<crate::org::Org>,
}
