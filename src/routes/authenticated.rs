use crate::access::GuardRule;

/// Authenticated Route Table
///
/// The volunteer dashboard area. Any signed-in principal may enter; anonymous
/// visitors are sent to the login page.
pub fn authenticated_routes() -> Vec<GuardRule> {
    vec![
        GuardRule::authenticated("/dashboard"),
        GuardRule::authenticated("/profile"),
        GuardRule::authenticated("/my-opportunities"),
        // Reached right after choosing the organization admin role, so it only
        // needs a session, not the admin role itself.
        GuardRule::authenticated("/create-organization"),
        GuardRule::authenticated("/volunteer"),
        GuardRule::authenticated("/my-registrations"),
        GuardRule::authenticated("/activity"),
        GuardRule::authenticated("/notifications"),
        GuardRule::authenticated("/nonprofits"),
        GuardRule::authenticated("/causes"),
    ]
}
