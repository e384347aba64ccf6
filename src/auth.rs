use std::sync::{Arc, Mutex, PoisonError};

use uuid::Uuid;

use crate::{
    access::{DEFAULT_LANDING_PATH, normalize_path},
    error::AuthError,
    models::{LoginRequest, Principal, SignupRequest, avatar_url},
    role::Role,
    session::SessionStore,
};

/// Minimum password length accepted at signup.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Where a new principal goes right after signup to pick a role.
pub const ROLE_SELECTION_PATH: &str = "/user-role-selection";

/// Where an organization admin goes right after choosing that role.
pub const CREATE_ORGANIZATION_PATH: &str = "/create-organization";

/// Account
///
/// A directory record: the public principal plus its password.
/// The password never leaves the directory.
#[derive(Clone)]
pub struct Account {
    pub principal: Principal,
    password: String,
}

impl Account {
    pub fn new(principal: Principal, password: impl Into<String>) -> Self {
        Self {
            principal,
            password: password.into(),
        }
    }

    fn password_matches(&self, candidate: &str) -> bool {
        self.password == candidate
    }
}

impl std::fmt::Debug for Account {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Account")
            .field("principal", &self.principal)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// AccountDirectory
///
/// The account lookup contract behind login and signup. `MemoryDirectory`
/// is the only implementation here; a real identity service would replace it
/// without touching `AuthService`.
pub trait AccountDirectory: Send + Sync {
    /// Looks an account up by email (case-insensitive).
    fn find_by_email(&self, email: &str) -> Option<Account>;

    /// Adds an account. Fails with `DuplicateAccount` if the email is taken.
    fn insert(&self, account: Account) -> Result<(), AuthError>;

    /// Records a role change. Returns false when no account has that email.
    fn set_role(&self, email: &str, role: Role) -> bool;
}

/// DirectoryState
///
/// The shared handle to the account directory.
pub type DirectoryState = Arc<dyn AccountDirectory>;

/// MemoryDirectory
///
/// Accounts held in process memory.
#[derive(Debug, Default)]
pub struct MemoryDirectory {
    accounts: Mutex<Vec<Account>>,
}

impl MemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// seeded
    ///
    /// The three demo accounts, one per principal role.
    pub fn seeded() -> Self {
        let seed = |n: u128, name: &str, email: &str, password: &str, role: Role| {
            Account::new(
                Principal {
                    id: Uuid::from_u128(n),
                    name: name.to_string(),
                    email: email.to_string(),
                    avatar: avatar_url(name),
                    role,
                },
                password,
            )
        };

        Self {
            accounts: Mutex::new(vec![
                seed(1, "System Admin", "admin@example.com", "admin123", Role::SystemAdmin),
                seed(2, "Jane User", "user@example.com", "user123", Role::User),
                seed(3, "Org Admin", "orgadmin@example.com", "orgadmin123", Role::OrgAdmin),
            ]),
        }
    }

    pub fn len(&self) -> usize {
        self.accounts.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AccountDirectory for MemoryDirectory {
    fn find_by_email(&self, email: &str) -> Option<Account> {
        let email = canonical_email(email);
        self.accounts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|a| canonical_email(&a.principal.email) == email)
            .cloned()
    }

    fn insert(&self, account: Account) -> Result<(), AuthError> {
        let mut accounts = self.accounts.lock().unwrap_or_else(PoisonError::into_inner);
        let email = canonical_email(&account.principal.email);
        if accounts
            .iter()
            .any(|a| canonical_email(&a.principal.email) == email)
        {
            return Err(AuthError::DuplicateAccount(account.principal.email));
        }
        accounts.push(account);
        Ok(())
    }

    fn set_role(&self, email: &str, role: Role) -> bool {
        let email = canonical_email(email);
        let mut accounts = self.accounts.lock().unwrap_or_else(PoisonError::into_inner);
        match accounts
            .iter_mut()
            .find(|a| canonical_email(&a.principal.email) == email)
        {
            Some(account) => {
                account.principal.role = role;
                true
            }
            None => false,
        }
    }
}

fn canonical_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

/// AuthService
///
/// Login, signup, role selection and logout for the forms. Every success
/// path ends in the session store; every failure is an `AuthError` for the
/// form to display. Nothing here retries.
#[derive(Clone)]
pub struct AuthService {
    directory: DirectoryState,
    session: Arc<SessionStore>,
    landing_path: String,
}

impl AuthService {
    pub fn new(directory: DirectoryState, session: Arc<SessionStore>) -> Self {
        Self {
            directory,
            session,
            landing_path: DEFAULT_LANDING_PATH.to_string(),
        }
    }

    pub fn with_landing_path(mut self, landing_path: &str) -> Self {
        self.landing_path = normalize_path(landing_path);
        self
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    /// login
    ///
    /// Checks the credentials and starts a session for the matching account.
    pub fn login(&self, email: &str, password: &str) -> Result<Principal, AuthError> {
        let account = self
            .directory
            .find_by_email(email)
            .filter(|a| a.password_matches(password))
            .ok_or_else(|| {
                tracing::info!("login rejected");
                AuthError::InvalidCredentials
            })?;

        let principal = account.principal;
        self.session.set_principal(principal.clone());
        Ok(principal)
    }

    /// signup
    ///
    /// Creates a `user` account and starts its session. The caller then sends
    /// the visitor to [`ROLE_SELECTION_PATH`].
    pub fn signup(&self, name: &str, email: &str, password: &str) -> Result<Principal, AuthError> {
        if self.directory.find_by_email(email).is_some() {
            return Err(AuthError::DuplicateAccount(email.to_string()));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::WeakPassword {
                min: MIN_PASSWORD_LEN,
            });
        }

        let principal = Principal::new(name.trim(), email.trim(), Role::User);
        self.directory
            .insert(Account::new(principal.clone(), password))?;

        tracing::info!(principal_id = %principal.id, "account created");
        self.session.set_principal(principal.clone());
        Ok(principal)
    }

    /// Form-payload variants of `login` and `signup`.
    pub fn submit_login(&self, form: &LoginRequest) -> Result<Principal, AuthError> {
        self.login(&form.email, &form.password)
    }

    pub fn submit_signup(&self, form: &SignupRequest) -> Result<Principal, AuthError> {
        self.signup(&form.name, &form.email, &form.password)
    }

    /// select_role
    ///
    /// Applies the role picked after signup and returns the next route.
    /// Only `user` and `org_admin` can be picked.
    pub fn select_role(&self, raw: &str) -> Result<String, AuthError> {
        let role: Role = raw.trim().parse()?;
        match role {
            Role::Guest => return Err(AuthError::UnknownRole(raw.to_string())),
            Role::SystemAdmin => return Err(AuthError::RoleNotSelectable(role)),
            Role::User | Role::OrgAdmin => {}
        }

        let updated = self.session.update_role(role)?;
        if !self.directory.set_role(&updated.email, role) {
            tracing::warn!(principal_id = %updated.id, "role changed for a principal missing from the directory");
        }

        Ok(match role {
            Role::OrgAdmin => CREATE_ORGANIZATION_PATH.to_string(),
            _ => self.landing_path.clone(),
        })
    }

    /// logout
    pub fn logout(&self) {
        self.session.clear_principal();
    }
}
