use crate::{access::GuardRule, role::Role};

/// Admin Route Table
///
/// Two tiers:
/// - `/admin/*` (the org dashboard at `/admin` and `/admin/org/...`) needs at
///   least `org_admin`. System admins pass too, since their role is a superset.
/// - `/admin/system/*` needs `system_admin`. It is deeper than `/admin/*`, so
///   it always wins for system paths.
///
/// Unknown paths under `/admin` stay guarded by the org tier instead of
/// falling through to the public not-found page.
pub fn admin_routes() -> Vec<GuardRule> {
    vec![
        // Organization admin dashboard, opportunities, volunteers, organization.
        GuardRule::role("/admin/*", Role::OrgAdmin),
        // Platform administration: dashboard, users, organizations,
        // opportunities, settings.
        GuardRule::role("/admin/system/*", Role::SystemAdmin),
    ]
}
