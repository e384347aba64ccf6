use std::sync::Arc;

use volunteer_access::{
    AccessContext, AppConfig, AuthError, AuthService, Decision, DirectoryState, MemoryDirectory,
    MemoryStorage, Role, SessionStore, StorageState,
    auth::{AccountDirectory, CREATE_ORGANIZATION_PATH, MIN_PASSWORD_LEN},
    models::{LoginRequest, SignupRequest},
};

// --- Setup ---

fn service() -> AuthService {
    let storage = Arc::new(MemoryStorage::new()) as StorageState;
    let session = Arc::new(SessionStore::new(storage));
    let directory = Arc::new(MemoryDirectory::seeded()) as DirectoryState;
    AuthService::new(directory, session)
}

fn context() -> AccessContext {
    AccessContext::new(
        AppConfig::default(),
        Arc::new(MemoryStorage::new()) as StorageState,
        Arc::new(MemoryDirectory::seeded()) as DirectoryState,
    )
}

// --- Login ---

#[test]
fn test_login_with_demo_accounts() {
    let auth = service();

    for (email, password, role) in [
        ("admin@example.com", "admin123", Role::SystemAdmin),
        ("user@example.com", "user123", Role::User),
        ("orgadmin@example.com", "orgadmin123", Role::OrgAdmin),
    ] {
        let principal = auth.login(email, password).unwrap();
        assert_eq!(principal.role, role);
        assert_eq!(auth.session().current_principal(), Some(principal));
        auth.logout();
        assert_eq!(auth.session().current_principal(), None);
    }
}

#[test]
fn test_login_email_is_case_insensitive() {
    let auth = service();
    let principal = auth.login("  User@Example.com ", "user123").unwrap();
    assert_eq!(principal.name, "Jane User");
}

#[test]
fn test_login_rejects_bad_credentials() {
    let auth = service();

    assert_eq!(
        auth.login("user@example.com", "wrong"),
        Err(AuthError::InvalidCredentials)
    );
    assert_eq!(
        auth.login("nobody@example.com", "user123"),
        Err(AuthError::InvalidCredentials)
    );
    assert_eq!(auth.session().current_principal(), None);
}

// --- Signup ---

#[test]
fn test_signup_creates_user_session() {
    let auth = service();
    let principal = auth.signup("Sam Helper", "sam@example.com", "secret1").unwrap();

    assert_eq!(principal.role, Role::User);
    assert_eq!(principal.email, "sam@example.com");
    assert_eq!(
        principal.avatar,
        "https://ui-avatars.com/api/?name=Sam+Helper&background=random"
    );
    assert_eq!(auth.session().current_principal(), Some(principal));

    // The new account can log in again later.
    auth.logout();
    assert!(auth.login("sam@example.com", "secret1").is_ok());
}

#[test]
fn test_signup_rejects_duplicate_email() {
    let auth = service();
    assert_eq!(
        auth.signup("Another Jane", "user@example.com", "password"),
        Err(AuthError::DuplicateAccount("user@example.com".to_string()))
    );
    assert_eq!(auth.session().current_principal(), None);
}

#[test]
fn test_signup_rejects_short_password() {
    let auth = service();
    assert_eq!(
        auth.signup("Sam", "sam@example.com", "12345"),
        Err(AuthError::WeakPassword {
            min: MIN_PASSWORD_LEN
        })
    );
}

#[test]
fn test_directory_insert_guards_duplicates() {
    let directory = MemoryDirectory::seeded();
    assert_eq!(directory.len(), 3);

    let existing = directory.find_by_email("admin@example.com").unwrap();
    assert!(matches!(
        directory.insert(existing),
        Err(AuthError::DuplicateAccount(_))
    ));
    assert_eq!(directory.len(), 3);
}

#[test]
fn test_form_payloads() {
    let auth = service();

    let signup: SignupRequest = serde_json::from_str(
        r#"{"name":"Pat Form","email":"pat@example.com","password":"secret1"}"#,
    )
    .unwrap();
    assert_eq!(auth.submit_signup(&signup).unwrap().name, "Pat Form");
    auth.logout();

    let login: LoginRequest =
        serde_json::from_str(r#"{"email":"pat@example.com","password":"secret1"}"#).unwrap();
    assert_eq!(auth.submit_login(&login).unwrap().role, Role::User);

    // Missing fields are rejected at the payload boundary.
    assert!(serde_json::from_str::<LoginRequest>(r#"{"email":"pat@example.com"}"#).is_err());
}

// --- Role selection ---

#[test]
fn test_select_org_admin_goes_to_create_organization() {
    let auth = service();
    auth.signup("Olive Organizer", "olive@example.com", "secret1").unwrap();

    let next = auth.select_role("org_admin").unwrap();

    assert_eq!(next, CREATE_ORGANIZATION_PATH);
    assert_eq!(auth.session().current_role(), Role::OrgAdmin);

    // The directory remembers the choice for the next login.
    auth.logout();
    assert_eq!(
        auth.login("olive@example.com", "secret1").unwrap().role,
        Role::OrgAdmin
    );
}

#[test]
fn test_select_user_goes_to_landing() {
    let auth = service().with_landing_path("/home");
    auth.signup("Val Volunteer", "val@example.com", "secret1").unwrap();
    assert_eq!(auth.select_role("user").unwrap(), "/home");
}

#[test]
fn test_select_role_validation() {
    let auth = service();

    // No session yet.
    assert_eq!(auth.select_role("user"), Err(AuthError::NoActiveSession));

    auth.signup("Val Volunteer", "val@example.com", "secret1").unwrap();
    assert_eq!(
        auth.select_role("superuser"),
        Err(AuthError::UnknownRole("superuser".to_string()))
    );
    assert!(matches!(auth.select_role("guest"), Err(AuthError::UnknownRole(_))));
    assert_eq!(
        auth.select_role("system_admin"),
        Err(AuthError::RoleNotSelectable(Role::SystemAdmin))
    );
    assert_eq!(auth.session().current_role(), Role::User);
}

// --- End to end through the context ---

#[test]
fn test_context_follows_session_changes() {
    let ctx = context();

    assert_eq!(
        ctx.resolve_access("/admin/system/users"),
        Decision::RedirectTo("/login".to_string())
    );
    assert!(ctx.resolve_navigation("/").is_empty());

    ctx.auth.login("orgadmin@example.com", "orgadmin123").unwrap();
    assert_eq!(
        ctx.resolve_access("/admin/system/users"),
        Decision::RedirectTo("/dashboard".to_string())
    );
    assert!(ctx.resolve_access("/admin/org/volunteers").is_allowed());
    assert_eq!(
        ctx.resolve_navigation("/admin").find_active(),
        Some(vec!["Organization Admin", "Org Dashboard"])
    );

    ctx.auth.logout();
    ctx.auth.login("admin@example.com", "admin123").unwrap();
    assert!(ctx.resolve_access("/admin/system/users").is_allowed());
    assert_eq!(ctx.resolve_navigation("/admin/system").len(), 5);
}
