use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use ts_rs::TS;

use crate::{error::AuthError, models::Principal};

/// Role
///
/// The capability tier of the current visitor. Variants are declared in
/// ascending privilege so the derived `Ord` is the privilege order:
/// `Guest < User < OrgAdmin < SystemAdmin`.
///
/// `Guest` is the role of "no principal" and is never stored on a `Principal`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS, Default,
)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Role {
    #[default]
    Guest,
    User,
    OrgAdmin,
    SystemAdmin,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Guest, Role::User, Role::OrgAdmin, Role::SystemAdmin];

    /// at_least
    ///
    /// True when `self` carries every capability of `required`.
    /// Reflexive and transitive; `Guest` only satisfies `Guest`.
    pub fn at_least(self, required: Role) -> bool {
        self >= required
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Guest => "guest",
            Role::User => "user",
            Role::OrgAdmin => "org_admin",
            Role::SystemAdmin => "system_admin",
        }
    }

    /// Human-readable label used by menus and toasts.
    pub fn label(self) -> &'static str {
        match self {
            Role::Guest => "Guest",
            Role::User => "Volunteer",
            Role::OrgAdmin => "Organization Admin",
            Role::SystemAdmin => "System Admin",
        }
    }
}

/// Free-function form of [`Role::at_least`].
pub fn at_least(actual: Role, required: Role) -> bool {
    actual.at_least(required)
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AuthError;

    /// Accepts exactly the four wire names. Anything else is rejected rather
    /// than stored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "guest" => Ok(Role::Guest),
            "user" => Ok(Role::User),
            "org_admin" => Ok(Role::OrgAdmin),
            "system_admin" => Ok(Role::SystemAdmin),
            other => Err(AuthError::UnknownRole(other.to_string())),
        }
    }
}

/// Requirement
///
/// The minimum a visitor must hold to view a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Requirement {
    /// Anyone, including anonymous visitors.
    Public,
    /// Any signed-in principal, whatever its role.
    Authenticated,
    /// A principal whose role is at least the given one.
    Role(Role),
}

impl Requirement {
    pub fn requires_authentication(self) -> bool {
        !matches!(self, Requirement::Public)
    }

    pub fn is_satisfied_by(self, principal: Option<&Principal>) -> bool {
        match principal {
            Some(p) => self.by_role(p.role),
            None => !self.requires_authentication(),
        }
    }

    /// Evaluates the requirement against a bare role. `Guest` stands for the
    /// absence of a principal.
    pub fn by_role(self, role: Role) -> bool {
        match self {
            Requirement::Public => true,
            Requirement::Authenticated => role != Role::Guest,
            Requirement::Role(required) => role != Role::Guest && role.at_least(required),
        }
    }
}
