use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use url::form_urlencoded;
use uuid::Uuid;

use crate::{error::SessionError, role::Role};

// --- Core Schemas ---

/// Principal
///
/// The signed-in actor. This is the exact shape persisted in the durable
/// session record and handed to the renderer for the user menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Principal {
    pub id: Uuid,
    // Display name shown in the sidebar header and toasts.
    pub name: String,
    pub email: String,
    // Avatar image URL.
    pub avatar: String,
    // Never `Role::Guest`; the session store rejects records that carry it.
    pub role: Role,
}

impl Principal {
    /// Builds a principal with a fresh identifier and a generated avatar.
    pub fn new(name: impl Into<String>, email: impl Into<String>, role: Role) -> Self {
        let name = name.into();
        Self {
            id: Uuid::new_v4(),
            avatar: avatar_url(&name),
            name,
            email: email.into(),
            role,
        }
    }

    /// Two-letter initials for avatar fallbacks ("Jane User" -> "JU").
    pub fn initials(&self) -> String {
        self.name
            .split_whitespace()
            .filter_map(|part| part.chars().next())
            .flat_map(char::to_uppercase)
            .take(2)
            .collect()
    }
}

/// avatar_url
///
/// Placeholder avatar service URL, with the name form-encoded ("Jane User" -> "Jane+User").
pub fn avatar_url(name: &str) -> String {
    let encoded: String = form_urlencoded::byte_serialize(name.as_bytes()).collect();
    format!("https://ui-avatars.com/api/?name={}&background=random", encoded)
}

// --- Request Payloads (Input Schemas) ---

/// LoginRequest
///
/// Input payload of the login form.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// SignupRequest
///
/// Input payload of the signup form. The password is checked for length and
/// kept in the in-memory directory only; it never reaches the session record.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

// --- Persisted Record ---

/// Current layout version written by the session store.
pub const SESSION_RECORD_VERSION: u32 = 1;

/// PersistedSession
///
/// The durable record stored under the session key. Version 0 is the legacy
/// layout (a bare principal object) and is only ever read, never written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistedSession {
    pub version: u32,
    pub principal: Principal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,
}

impl PersistedSession {
    pub fn current(principal: Principal) -> Self {
        Self {
            version: SESSION_RECORD_VERSION,
            principal,
            saved_at: Some(Utc::now()),
        }
    }
}

/// LegacyPrincipal
///
/// The bare principal object written before records were versioned. Its id is
/// a short numeric string (`"2"`) or a number rather than a UUID, and the
/// avatar may be absent.
#[derive(Debug, Clone, Deserialize)]
pub struct LegacyPrincipal {
    pub id: LegacyId,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub avatar: Option<String>,
    pub role: Role,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LegacyId {
    Number(u64),
    Text(String),
}

impl LegacyId {
    /// UUID text is kept as is; numeric ids map onto `Uuid::from_u128`, the
    /// same scheme the seeded demo accounts use.
    pub fn to_uuid(&self) -> Result<Uuid, SessionError> {
        match self {
            LegacyId::Number(n) => Ok(Uuid::from_u128(u128::from(*n))),
            LegacyId::Text(text) => {
                let text = text.trim();
                Uuid::parse_str(text)
                    .ok()
                    .or_else(|| text.parse::<u128>().ok().map(Uuid::from_u128))
                    .ok_or_else(|| SessionError::Corrupt(format!("unrecognized legacy id {:?}", text)))
            }
        }
    }
}

impl TryFrom<LegacyPrincipal> for Principal {
    type Error = SessionError;

    fn try_from(legacy: LegacyPrincipal) -> Result<Self, Self::Error> {
        let id = legacy.id.to_uuid()?;
        let avatar = match legacy.avatar {
            Some(avatar) if !avatar.is_empty() => avatar,
            _ => avatar_url(&legacy.name),
        };
        Ok(Self {
            id,
            name: legacy.name,
            email: legacy.email,
            avatar,
            role: legacy.role,
        })
    }
}
