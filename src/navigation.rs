use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use ts_rs::TS;

use crate::{access::normalize_path, role::Role};

/// NavIcon
///
/// Symbolic icon keys. The presentation layer maps each to a concrete asset;
/// nothing here depends on a rendering framework.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum NavIcon {
    Home,
    Bell,
    Activity,
    Building,
    PieChart,
    Calendar,
    Hand,
    Mail,
    Users,
    Settings,
    Briefcase,
    Plus,
}

/// Audience
///
/// Visibility predicate of a navigation entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Audience {
    Everyone,
    AtLeast(Role),
    Only(Vec<Role>),
}

impl Audience {
    pub fn includes(&self, role: Role) -> bool {
        match self {
            Audience::Everyone => true,
            Audience::AtLeast(required) => role.at_least(*required),
            Audience::Only(roles) => roles.contains(&role),
        }
    }
}

/// NavEntry
///
/// A static menu item. Entries with children are group headers: they carry no
/// route of their own, and each child is route-guarded on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavEntry {
    pub label: String,
    pub route: Option<String>,
    pub icon: Option<NavIcon>,
    pub badge: Option<String>,
    pub primary: bool,
    pub audience: Audience,
    pub children: Vec<NavEntry>,
}

impl NavEntry {
    pub fn link(label: &str, route: &str) -> Self {
        Self {
            label: label.to_string(),
            route: Some(normalize_path(route)),
            icon: None,
            badge: None,
            primary: false,
            audience: Audience::Everyone,
            children: Vec::new(),
        }
    }

    pub fn group(label: &str, children: Vec<NavEntry>) -> Self {
        Self {
            label: label.to_string(),
            route: None,
            icon: None,
            badge: None,
            primary: false,
            audience: Audience::Everyone,
            children,
        }
    }

    pub fn icon(mut self, icon: NavIcon) -> Self {
        self.icon = Some(icon);
        self
    }

    pub fn badge(mut self, badge: &str) -> Self {
        self.badge = Some(badge.to_string());
        self
    }

    pub fn primary(mut self) -> Self {
        self.primary = true;
        self
    }

    pub fn visible_to(mut self, audience: Audience) -> Self {
        self.audience = audience;
        self
    }

    pub fn is_group(&self) -> bool {
        !self.children.is_empty()
    }
}

/// NavigationTable
///
/// One complete entry list per role. A role's list is used wholesale; lists
/// are never merged across roles. Roles without a list (`Guest` in the
/// canonical table) get an empty menu.
#[derive(Debug, Clone, Default)]
pub struct NavigationTable {
    variants: BTreeMap<Role, Vec<NavEntry>>,
}

impl NavigationTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_variant(mut self, role: Role, entries: Vec<NavEntry>) -> Self {
        self.variants.insert(role, entries);
        self
    }

    pub fn variant(&self, role: Role) -> &[NavEntry] {
        self.variants.get(&role).map(Vec::as_slice).unwrap_or(&[])
    }

    /// canonical
    ///
    /// The application's sidebar menus.
    pub fn canonical() -> Self {
        let mut org_admin = vec![my_organizations()];
        org_admin.extend(volunteer_entries());
        org_admin.push(organization_admin());

        Self::new()
            .with_variant(Role::User, volunteer_entries())
            .with_variant(Role::OrgAdmin, org_admin)
            .with_variant(Role::SystemAdmin, system_admin_entries())
    }
}

// --- Canonical Menus ---

/// The volunteer menu, shared by `user` and `org_admin`.
fn volunteer_entries() -> Vec<NavEntry> {
    vec![
        NavEntry::link("Home", "/dashboard").icon(NavIcon::Home),
        NavEntry::link("Notifications", "/notifications")
            .icon(NavIcon::Bell)
            .badge("3"),
        NavEntry::link("Volunteer", "/volunteer")
            .icon(NavIcon::Hand)
            .primary(),
        // Org admins manage opportunities from their admin group instead.
        NavEntry::link("My Opportunities", "/my-opportunities")
            .icon(NavIcon::Briefcase)
            .visible_to(Audience::Only(vec![Role::User])),
        NavEntry::link("My Registrations", "/my-registrations").icon(NavIcon::Calendar),
        NavEntry::link("Activity", "/activity").icon(NavIcon::Activity),
        NavEntry::link("Nonprofits", "/nonprofits").icon(NavIcon::Building),
        NavEntry::link("Causes", "/causes").icon(NavIcon::PieChart),
    ]
}

fn my_organizations() -> NavEntry {
    NavEntry::group(
        "My Organizations",
        vec![
            NavEntry::link("Community Helpers", "/organizations/community-helpers"),
            NavEntry::link("City Food Bank", "/organizations/city-food-bank"),
            NavEntry::link("Add Organization", "/create-organization").icon(NavIcon::Plus),
        ],
    )
    .icon(NavIcon::Building)
}

fn organization_admin() -> NavEntry {
    NavEntry::group(
        "Organization Admin",
        vec![
            NavEntry::link("Org Dashboard", "/admin").icon(NavIcon::Settings),
            NavEntry::link("Volunteers", "/admin/org/volunteers").icon(NavIcon::Users),
            NavEntry::link("Opportunities", "/admin/org/opportunities").icon(NavIcon::Briefcase),
            NavEntry::link("Organization", "/admin/org/organization").icon(NavIcon::Building),
        ],
    )
    .icon(NavIcon::Settings)
    .visible_to(Audience::AtLeast(Role::OrgAdmin))
}

fn system_admin_entries() -> Vec<NavEntry> {
    vec![
        NavEntry::link("Admin Dashboard", "/admin/system").icon(NavIcon::Home),
        NavEntry::link("Manage Users", "/admin/system/users").icon(NavIcon::Users),
        NavEntry::link("Manage Organizations", "/admin/system/organizations")
            .icon(NavIcon::Building),
        NavEntry::link("Manage Opportunities", "/admin/system/opportunities")
            .icon(NavIcon::Calendar),
        NavEntry::link("Settings", "/admin/system/settings").icon(NavIcon::Settings),
    ]
}

// --- Resolved Output ---

/// ResolvedEntry
///
/// A menu item ready to draw. `active` is set on the entry matching the
/// current route, and on a group when one of its children matches, so the
/// renderer can expand and highlight it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ResolvedEntry {
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<NavIcon>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
    pub primary: bool,
    pub active: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ResolvedEntry>,
}

/// NavigationTree
///
/// The ordered top-level entries for one role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NavigationTree {
    pub role: Role,
    pub entries: Vec<ResolvedEntry>,
}

impl NavigationTree {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.label.as_str()).collect()
    }

    /// Label path to the active leaf, e.g. `["Organization Admin", "Volunteers"]`.
    pub fn find_active(&self) -> Option<Vec<&str>> {
        for entry in self.entries.iter().filter(|e| e.active) {
            if entry.children.is_empty() {
                return Some(vec![entry.label.as_str()]);
            }
            if let Some(child) = entry.children.iter().find(|c| c.active) {
                return Some(vec![entry.label.as_str(), child.label.as_str()]);
            }
        }
        None
    }

    /// Every leaf target, in menu order.
    pub fn flatten(&self) -> Vec<&str> {
        self.entries
            .iter()
            .flat_map(|e| {
                e.route
                    .as_deref()
                    .into_iter()
                    .chain(e.children.iter().filter_map(|c| c.route.as_deref()))
            })
            .collect()
    }
}

/// resolve_navigation
///
/// Produces the menu for `role` with the entry for `current_path` marked
/// active. Pure; call again on every route or session change.
pub fn resolve_navigation(role: Role, current_path: &str, table: &NavigationTable) -> NavigationTree {
    let current = normalize_path(current_path);
    let entries: Vec<ResolvedEntry> = table
        .variant(role)
        .iter()
        .filter_map(|entry| resolve_entry(entry, role, &current))
        .collect();

    tracing::debug!(role = %role, path = %current, entries = entries.len(), "navigation resolved");
    NavigationTree { role, entries }
}

fn resolve_entry(entry: &NavEntry, role: Role, current: &str) -> Option<ResolvedEntry> {
    if !entry.audience.includes(role) {
        return None;
    }

    let children: Vec<ResolvedEntry> = entry
        .children
        .iter()
        .filter_map(|child| resolve_entry(child, role, current))
        .collect();

    // A group whose children were all filtered out has nothing to show.
    if entry.is_group() && children.is_empty() {
        return None;
    }

    let active = if entry.is_group() {
        children.iter().any(|c| c.active)
    } else {
        entry.route.as_deref() == Some(current)
    };

    Some(ResolvedEntry {
        label: entry.label.clone(),
        route: if entry.is_group() { None } else { entry.route.clone() },
        icon: entry.icon,
        badge: entry.badge.clone(),
        primary: entry.primary,
        active,
        children,
    })
}

// --- Breadcrumbs ---

/// Breadcrumb
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Breadcrumb {
    pub label: String,
    pub path: String,
}

/// breadcrumbs
///
/// `/admin/system/manage-users` ->
/// Home `/`, Admin `/admin`, System `/admin/system`, Manage Users `/admin/system/manage-users`.
pub fn breadcrumbs(path: &str) -> Vec<Breadcrumb> {
    let normalized = normalize_path(path);
    let mut crumbs = vec![Breadcrumb {
        label: "Home".to_string(),
        path: "/".to_string(),
    }];

    let mut current = String::new();
    for segment in normalized.split('/').filter(|s| !s.is_empty()) {
        current.push('/');
        current.push_str(segment);
        crumbs.push(Breadcrumb {
            label: title_case(segment),
            path: current.clone(),
        });
    }
    crumbs
}

/// Title of the page: the last breadcrumb's label.
pub fn page_title(crumbs: &[Breadcrumb]) -> &str {
    crumbs.last().map_or("Dashboard", |c| c.label.as_str())
}

fn title_case(segment: &str) -> String {
    segment
        .split('-')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
