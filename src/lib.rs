use std::sync::Arc;

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

// --- Module Structure ---

// Core model: roles, guards, menus, session.
pub mod access;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod navigation;
pub mod role;
pub mod session;
pub mod storage;

// Guard rules grouped by audience (Public, Authenticated, Admin).
pub mod routes;

// --- Public Re-exports ---

pub use access::{Decision, GuardRule, RouteTable, resolve_access};
pub use auth::{AccountDirectory, AuthService, DirectoryState, MemoryDirectory};
pub use config::{AppConfig, Env};
pub use error::{AuthError, ConfigError, SessionError, StorageError};
pub use models::Principal;
pub use navigation::{NavigationTable, NavigationTree, resolve_navigation};
pub use role::{Requirement, Role, at_least};
pub use session::SessionStore;
pub use storage::{DurableStorage, FileStorage, MemoryStorage, StorageState};

/// AccessContext
///
/// The single per-process bundle the router and the renderer talk to: the
/// session store, the two static tables, the auth service and the loaded
/// configuration. Build it once at startup and pass it by reference or clone
/// (every field is shared).
#[derive(Clone)]
pub struct AccessContext {
    pub session: Arc<SessionStore>,
    pub routes: Arc<RouteTable>,
    pub navigation: Arc<NavigationTable>,
    pub auth: AuthService,
    pub config: AppConfig,
}

impl AccessContext {
    /// Wires the canonical tables around the given storage and directory.
    pub fn new(config: AppConfig, storage: StorageState, directory: DirectoryState) -> Self {
        let session = Arc::new(SessionStore::new(storage));
        let routes = Arc::new(RouteTable::canonical(
            &config.login_path,
            &config.landing_path,
        ));
        let auth = AuthService::new(directory, session.clone()).with_landing_path(&config.landing_path);

        Self {
            session,
            routes,
            navigation: Arc::new(NavigationTable::canonical()),
            auth,
            config,
        }
    }

    /// File-backed session in `config.session_dir`, demo accounts in memory.
    pub fn from_config(config: AppConfig) -> Self {
        let storage = Arc::new(FileStorage::new(config.session_dir.clone())) as StorageState;
        let directory = Arc::new(MemoryDirectory::seeded()) as DirectoryState;
        Self::new(config, storage, directory)
    }

    /// Access decision for `path` and the current principal.
    pub fn resolve_access(&self, path: &str) -> Decision {
        let principal = self.session.current_principal();
        access::resolve_access(path, principal.as_ref(), &self.routes)
    }

    /// Menu for the current principal with `current_path` marked active.
    pub fn resolve_navigation(&self, current_path: &str) -> NavigationTree {
        navigation::resolve_navigation(self.session.current_role(), current_path, &self.navigation)
    }
}

/// init_tracing
///
/// Installs the global subscriber. `RUST_LOG` wins over the default filter.
/// Local runs get pretty output; production gets JSON lines for log
/// aggregation. Returns false when a subscriber was already installed.
pub fn init_tracing(config: &AppConfig) -> bool {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| "volunteer_access=debug".into());

    let installed = match config.env {
        Env::Local => tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().pretty())
            .try_init(),
        Env::Production => tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .try_init(),
    }
    .is_ok();

    if installed {
        tracing::info!("access model starting in {:?} mode", config.env);
    }
    installed
}
