use uuid::Uuid;
use volunteer_access::{AuthError, Principal, Role, at_least, models::avatar_url};

#[test]
fn test_principal_json_shape() {
    let principal = Principal {
        id: Uuid::from_u128(3),
        name: "Org Admin".to_string(),
        email: "orgadmin@example.com".to_string(),
        avatar: avatar_url("Org Admin"),
        role: Role::OrgAdmin,
    };

    let json = serde_json::to_value(&principal).unwrap();

    // The record layout consumed by the web client: snake_case role names.
    assert_eq!(json["role"], "org_admin");
    assert_eq!(json["id"], "00000000-0000-0000-0000-000000000003");
    assert_eq!(
        json["avatar"],
        "https://ui-avatars.com/api/?name=Org+Admin&background=random"
    );
}

#[test]
fn test_role_wire_names_round_trip() {
    for role in Role::ALL {
        assert_eq!(role.as_str().parse::<Role>(), Ok(role));
        let json = serde_json::to_string(&role).unwrap();
        assert_eq!(json, format!("\"{}\"", role.as_str()));
    }
}

#[test]
fn test_role_parse_rejects_unknown_values() {
    assert_eq!(
        "admin".parse::<Role>(),
        Err(AuthError::UnknownRole("admin".to_string()))
    );
    assert!("System_Admin".parse::<Role>().is_err());
    assert!(serde_json::from_str::<Role>("\"root\"").is_err());
}

#[test]
fn test_at_least_is_reflexive() {
    for role in Role::ALL {
        assert!(at_least(role, role));
    }
}

#[test]
fn test_at_least_is_transitive_over_the_hierarchy() {
    for a in Role::ALL {
        for b in Role::ALL {
            for c in Role::ALL {
                if at_least(a, b) && at_least(b, c) {
                    assert!(at_least(a, c), "{a} >= {b} >= {c}");
                }
            }
        }
    }
}

#[test]
fn test_strict_superset_chain() {
    assert!(at_least(Role::SystemAdmin, Role::OrgAdmin));
    assert!(at_least(Role::OrgAdmin, Role::User));
    assert!(!at_least(Role::OrgAdmin, Role::SystemAdmin));
    assert!(!at_least(Role::User, Role::OrgAdmin));
    assert!(!at_least(Role::Guest, Role::User));
}

#[test]
fn test_requirement_semantics() {
    use volunteer_access::Requirement;

    assert!(Requirement::Public.by_role(Role::Guest));
    assert!(!Requirement::Authenticated.by_role(Role::Guest));
    assert!(Requirement::Authenticated.by_role(Role::User));
    assert!(!Requirement::Role(Role::Guest).by_role(Role::Guest));
    assert!(Requirement::Role(Role::OrgAdmin).by_role(Role::SystemAdmin));
    assert!(Requirement::Public.is_satisfied_by(None));
    assert!(!Requirement::Role(Role::User).is_satisfied_by(None));
}

#[test]
fn test_principal_initials() {
    let principal = Principal::new("jane user", "j@example.com", Role::User);
    assert_eq!(principal.initials(), "JU");
    assert_eq!(principal.role.label(), "Volunteer");
}
