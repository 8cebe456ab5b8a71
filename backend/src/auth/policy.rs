//! Route classification and the admission decision
//!
//! A static partition of the path space plus a pure decision function. The
//! middleware feeds both; everything here is testable without a router.
//!
//! Per request the gate moves through
//! `classified -> {authenticated, unauthenticated} -> {admitted, rejected}`;
//! the two functions below are those transitions.

use postline_shared::types::Identity;

/// Where unauthenticated browser requests are sent
pub const LOGIN_PATH: &str = "/login";

/// Where hidden (role-rejected) requests are sent
pub const NOT_FOUND_PATH: &str = "/not-found";

/// Authentication class of a route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    /// No identity resolution attempted
    Public,
    /// Any verified identity admits
    User,
    /// Verified identity with the ADMIN role admits
    Admin,
}

/// Ordered prefix table. Longest matching prefix wins, so the specific
/// public entries under `/api` beat the catch-all `/api` row.
const ROUTE_CLASSES: &[(&str, RouteClass)] = &[
    ("/api/auth", RouteClass::Public),
    ("/api/register", RouteClass::Public),
    ("/api/get-all-post", RouteClass::Public),
    ("/api/posts/all", RouteClass::Public),
    ("/api/public", RouteClass::Public),
    ("/admin", RouteClass::Admin),
    ("/profile", RouteClass::User),
    ("/api", RouteClass::User),
];

/// Classify a request path
///
/// Every path maps to exactly one class; anything outside the table (pages,
/// health probes, static assets) is public.
pub fn classify(path: &str) -> RouteClass {
    ROUTE_CLASSES
        .iter()
        .filter(|(prefix, _)| path.starts_with(prefix))
        .max_by_key(|(prefix, _)| prefix.len())
        .map(|(_, class)| *class)
        .unwrap_or(RouteClass::Public)
}

/// API prefixes reject with a parseable 401; everything else is a page and
/// rejects by redirect.
pub fn is_api_path(path: &str) -> bool {
    path.starts_with("/api")
}

/// Outcome of the gate for one request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// Let the request through to the router
    Admit,
    /// 401 with the `{success:false, message:"Unauthorized"}` body
    Unauthorized,
    /// Redirect to the sign-in page
    RedirectToLogin,
    /// Reject exactly like a nonexistent route; admin resources must not
    /// reveal themselves to non-admins
    HideBehindNotFound,
}

/// The admission decision
///
/// Pure in the request: no lookups, no clock, no mutation. `identity` is
/// whatever the verifier resolved (never consulted for public routes).
pub fn decide(class: RouteClass, api: bool, identity: Option<&Identity>) -> GateDecision {
    match (class, identity) {
        (RouteClass::Public, _) => GateDecision::Admit,
        (_, None) => {
            if api {
                GateDecision::Unauthorized
            } else {
                GateDecision::RedirectToLogin
            }
        }
        (RouteClass::Admin, Some(identity)) if !identity.is_admin() => {
            GateDecision::HideBehindNotFound
        }
        (_, Some(_)) => GateDecision::Admit,
    }
}
