use std::sync::{PoisonError, RwLock};

use serde_json::Value;

use crate::{
    error::{AuthError, SessionError},
    models::{LegacyPrincipal, PersistedSession, Principal, SESSION_RECORD_VERSION},
    role::Role,
    storage::StorageState,
};

/// Fixed key of the durable session record.
pub const SESSION_KEY: &str = "volunteer-user";

/// SessionStore
///
/// Holds zero or one `Principal` for the lifetime of the process and mirrors
/// it into durable storage. Build it once at startup and share it (the
/// `AccessContext` keeps it behind an `Arc`).
///
/// The in-memory principal is authoritative. Storage failures are logged and
/// swallowed, and a corrupt durable record hydrates as "no principal".
pub struct SessionStore {
    storage: StorageState,
    key: String,
    current: RwLock<Option<Principal>>,
}

impl SessionStore {
    pub fn new(storage: StorageState) -> Self {
        Self::with_key(storage, SESSION_KEY)
    }

    /// Hydrates the store from the record under `key`.
    pub fn with_key(storage: StorageState, key: impl Into<String>) -> Self {
        let key = key.into();
        let current = hydrate(&storage, &key);
        if let Some(principal) = &current {
            tracing::info!(principal_id = %principal.id, role = %principal.role, "session restored");
        }
        Self {
            storage,
            key,
            current: RwLock::new(current),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// current_principal
    ///
    /// The signed-in principal, if any. Reads memory only.
    pub fn current_principal(&self) -> Option<Principal> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The current principal's role, or `Role::Guest` when signed out.
    pub fn current_role(&self) -> Role {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map_or(Role::Guest, |p| p.role)
    }

    pub fn is_authenticated(&self) -> bool {
        self.current_role() != Role::Guest
    }

    /// set_principal
    ///
    /// Replaces the current principal and persists it. A principal carrying
    /// `Role::Guest` is not a principal at all and signs the session out.
    pub fn set_principal(&self, principal: Principal) {
        if principal.role == Role::Guest {
            tracing::warn!(principal_id = %principal.id, "refusing guest principal; clearing session");
            self.clear_principal();
            return;
        }
        // The guard spans the write so memory and the record change together.
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        tracing::info!(principal_id = %principal.id, role = %principal.role, "session started");
        self.persist(&principal);
        *current = Some(principal);
    }

    /// clear_principal
    ///
    /// Signs out: drops the in-memory principal and deletes the durable record.
    pub fn clear_principal(&self) {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);

        if let Some(principal) = current.take() {
            tracing::info!(principal_id = %principal.id, "session cleared");
        }

        if let Err(e) = self.storage.remove(&self.key) {
            tracing::warn!(key = %self.key, error = %e, "failed to remove session record");
        }
    }

    /// update_role
    ///
    /// Reassigns the current principal's role. `Guest` is not a principal
    /// role and is rejected.
    pub fn update_role(&self, role: Role) -> Result<Principal, AuthError> {
        if role == Role::Guest {
            return Err(AuthError::UnknownRole(role.to_string()));
        }

        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        let principal = guard.as_mut().ok_or(AuthError::NoActiveSession)?;
        principal.role = role;
        let updated = principal.clone();

        tracing::info!(principal_id = %updated.id, role = %role, "role updated");
        self.persist(&updated);
        Ok(updated)
    }

    fn persist(&self, principal: &Principal) {
        let record = PersistedSession::current(principal.clone());
        let json = match serde_json::to_string(&record) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(error = %e, "failed to encode session record");
                return;
            }
        };

        if let Err(e) = self.storage.write(&self.key, &json) {
            // Memory stays authoritative for the rest of the process.
            tracing::warn!(key = %self.key, error = %e, "failed to persist session record");
        }
    }
}

/// hydrate
///
/// Reads and decodes the durable record. Every failure ends as `None`.
fn hydrate(storage: &StorageState, key: &str) -> Option<Principal> {
    let raw = match storage.read(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!(key = %key, error = %e, "failed to read session record");
            return None;
        }
    };

    match decode_record(&raw) {
        Ok(principal) => Some(principal),
        Err(e) => {
            tracing::warn!(key = %key, error = %e, "ignoring corrupt session record");
            None
        }
    }
}

/// decode_record
///
/// Accepts the versioned layout and the legacy bare-principal layout
/// (treated as version 0, see [`LegacyPrincipal`]).
pub fn decode_record(raw: &str) -> Result<Principal, SessionError> {
    let value: Value =
        serde_json::from_str(raw).map_err(|e| SessionError::Corrupt(e.to_string()))?;

    let principal = match value.get("version") {
        None => serde_json::from_value::<LegacyPrincipal>(value)
            .map_err(|e| SessionError::Corrupt(e.to_string()))?
            .try_into()?,
        Some(version) => {
            let version = version
                .as_u64()
                .and_then(|v| u32::try_from(v).ok())
                .ok_or_else(|| SessionError::Corrupt(format!("bad version tag {}", version)))?;
            if version != SESSION_RECORD_VERSION {
                return Err(SessionError::UnsupportedVersion(version));
            }
            serde_json::from_value::<PersistedSession>(value)
                .map_err(|e| SessionError::Corrupt(e.to_string()))?
                .principal
        }
    };

    if principal.role == Role::Guest {
        return Err(SessionError::Corrupt("principal carries the guest role".to_string()));
    }
    Ok(principal)
}
