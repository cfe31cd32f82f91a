use poem_openapi::{Enum, Object};
use serde::{Deserialize, Serialize};

/// Coarse capability label on a console user. Only `Admin` is special-cased
/// by the folder access logic; the remaining roles shape the user-management
/// surface (e.g. `Readonly` users get no upload/delete permissions in the UI).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Enum)]
#[serde(rename_all = "lowercase")]
#[oai(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
    Moderator,
    Readonly,
}

impl Role {
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
            Role::Moderator => "moderator",
            Role::Readonly => "readonly",
        }
    }
}

impl std::str::FromStr for Role {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "user" => Ok(Role::User),
            "moderator" => Ok(Role::Moderator),
            "readonly" => Ok(Role::Readonly),
            _ => Err(()),
        }
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::User
    }
}

/// An authenticated console user as seen by the access-control core and the
/// admin API. Display fields have no effect on access decisions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Object)]
pub struct ConsoleUser {
    pub username: String,
    pub role: Role,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl ConsoleUser {
    pub fn new(username: impl Into<String>, role: Role) -> Self {
        Self {
            username: username.into(),
            role,
            email: None,
            first_name: None,
            last_name: None,
        }
    }
}
