use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::{
    models::Principal,
    role::{Requirement, Role},
    routes,
};

pub const DEFAULT_LOGIN_PATH: &str = "/login";
pub const DEFAULT_LANDING_PATH: &str = "/dashboard";

/// Decision
///
/// The outcome of an access check, consumed by the router: either render the
/// requested route or navigate (replacing history) to another path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "kind", content = "path", rename_all = "snake_case")]
#[ts(export)]
pub enum Decision {
    Allow,
    RedirectTo(String),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    pub fn redirect_target(&self) -> Option<&str> {
        match self {
            Decision::Allow => None,
            Decision::RedirectTo(path) => Some(path),
        }
    }
}

/// RoutePattern
///
/// `"/about"` matches one path, `"/admin/system/*"` matches `/admin/system`
/// and everything below it, `"*"` matches anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoutePattern {
    Exact(String),
    Subtree(String),
    Any,
}

impl RoutePattern {
    pub fn parse(pattern: &str) -> Self {
        let trimmed = pattern.trim();
        if trimmed == "*" {
            return RoutePattern::Any;
        }
        match trimmed.strip_suffix("/*") {
            Some(prefix) => RoutePattern::Subtree(normalize_path(prefix)),
            None => RoutePattern::Exact(normalize_path(trimmed)),
        }
    }

    /// Tests an already normalized path.
    pub fn matches(&self, path: &str) -> bool {
        match self {
            RoutePattern::Exact(p) => p == path,
            RoutePattern::Subtree(p) if p == "/" => true,
            RoutePattern::Subtree(p) => {
                path == p
                    || path
                        .strip_prefix(p.as_str())
                        .is_some_and(|rest| rest.starts_with('/'))
            }
            RoutePattern::Any => true,
        }
    }

    /// Higher is more specific: segment depth first, then exact over subtree.
    /// The catch-all ranks below everything else.
    fn specificity(&self) -> (usize, u8) {
        match self {
            RoutePattern::Exact(p) => (depth(p) + 1, 1),
            RoutePattern::Subtree(p) => (depth(p) + 1, 0),
            RoutePattern::Any => (0, 0),
        }
    }
}

impl fmt::Display for RoutePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoutePattern::Exact(p) => f.write_str(p),
            RoutePattern::Subtree(p) if p == "/" => f.write_str("/*"),
            RoutePattern::Subtree(p) => write!(f, "{}/*", p),
            RoutePattern::Any => f.write_str("*"),
        }
    }
}

/// GuardRule
///
/// Associates a route (or route subtree) with the minimum requirement to view it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardRule {
    pub pattern: RoutePattern,
    pub requirement: Requirement,
}

impl GuardRule {
    pub fn new(pattern: &str, requirement: Requirement) -> Self {
        Self {
            pattern: RoutePattern::parse(pattern),
            requirement,
        }
    }

    pub fn public(pattern: &str) -> Self {
        Self::new(pattern, Requirement::Public)
    }

    pub fn authenticated(pattern: &str) -> Self {
        Self::new(pattern, Requirement::Authenticated)
    }

    pub fn role(pattern: &str, role: Role) -> Self {
        Self::new(pattern, Requirement::Role(role))
    }
}

/// RouteTable
///
/// The ordered guard rules plus the two redirect targets.
#[derive(Debug, Clone)]
pub struct RouteTable {
    rules: Vec<GuardRule>,
    login_path: String,
    landing_path: String,
}

impl RouteTable {
    pub fn new(rules: Vec<GuardRule>) -> Self {
        Self {
            rules,
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            landing_path: DEFAULT_LANDING_PATH.to_string(),
        }
    }

    pub fn with_redirects(mut self, login_path: &str, landing_path: &str) -> Self {
        self.login_path = normalize_path(login_path);
        self.landing_path = normalize_path(landing_path);
        self
    }

    /// canonical
    ///
    /// The application's route table, assembled from the public,
    /// authenticated and admin route modules.
    pub fn canonical(login_path: &str, landing_path: &str) -> Self {
        let mut rules = routes::public::public_routes();
        rules.extend(routes::authenticated::authenticated_routes());
        rules.extend(routes::admin::admin_routes());
        Self::new(rules).with_redirects(login_path, landing_path)
    }

    pub fn rules(&self) -> &[GuardRule] {
        &self.rules
    }

    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    pub fn landing_path(&self) -> &str {
        &self.landing_path
    }

    pub fn has_catch_all(&self) -> bool {
        self.rules.iter().any(|r| r.pattern == RoutePattern::Any)
    }

    /// match_rule
    ///
    /// The most specific rule covering `path`. Among equally specific rules
    /// the first declared wins.
    pub fn match_rule(&self, path: &str) -> Option<&GuardRule> {
        let path = normalize_path(path);
        let mut best: Option<&GuardRule> = None;
        for rule in self.rules.iter().filter(|r| r.pattern.matches(&path)) {
            let better = match best {
                None => true,
                Some(current) => rule.pattern.specificity() > current.pattern.specificity(),
            };
            if better {
                best = Some(rule);
            }
        }
        best
    }
}

/// resolve_access
///
/// Decides whether `principal` (or an anonymous visitor) may enter `path`.
/// Pure and total: unmatched paths fail closed.
pub fn resolve_access(path: &str, principal: Option<&Principal>, table: &RouteTable) -> Decision {
    let role = principal.map_or(Role::Guest, |p| p.role);

    let decision = match table.match_rule(path) {
        Some(rule) if rule.requirement.is_satisfied_by(principal) => Decision::Allow,
        Some(rule) if principal.is_none() && rule.requirement.requires_authentication() => {
            Decision::RedirectTo(table.login_path.clone())
        }
        Some(_) => Decision::RedirectTo(table.landing_path.clone()),
        None => {
            tracing::warn!(path = %path, "no guard rule covers path; denying");
            match principal {
                None => Decision::RedirectTo(table.login_path.clone()),
                Some(_) => Decision::RedirectTo(table.landing_path.clone()),
            }
        }
    };

    tracing::debug!(path = %path, role = %role, decision = ?decision, "access resolved");
    decision
}

/// normalize_path
///
/// Drops query string and fragment, collapses repeated slashes and removes a
/// trailing slash. An empty path is the root.
pub fn normalize_path(path: &str) -> String {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    if segments.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", segments.join("/"))
    }
}

fn depth(path: &str) -> usize {
    path.split('/').filter(|s| !s.is_empty()).count()
}
