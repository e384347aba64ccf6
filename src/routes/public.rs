use crate::access::GuardRule;

/// Public Route Table
///
/// Marketing pages, listings and the sign-in flow. These are reachable by
/// anonymous visitors and by every role.
///
/// The catch-all `*` is declared here: unknown paths render the public
/// not-found page, so no request ever falls through the table.
pub fn public_routes() -> Vec<GuardRule> {
    vec![
        // Landing page.
        GuardRule::public("/"),
        // Opportunity and organization listings, including detail pages.
        GuardRule::public("/opportunities/*"),
        GuardRule::public("/organizations/*"),
        GuardRule::public("/about"),
        GuardRule::public("/contact"),
        // Sign-in flow. Role selection follows signup and is reached before
        // the new principal has picked its final role.
        GuardRule::public("/login"),
        GuardRule::public("/signup"),
        GuardRule::public("/user-role-selection"),
        // Not found.
        GuardRule::public("*"),
    ]
}
