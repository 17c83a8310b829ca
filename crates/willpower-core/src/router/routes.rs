use std::collections::BTreeMap;
use std::fmt;

/// Named destinations of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RouteName {
    Login,
    Register,
    Dashboard,
    GoalDetail,
}

impl RouteName {
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteName::Login => "login",
            RouteName::Register => "register",
            RouteName::Dashboard => "dashboard",
            RouteName::GoalDetail => "goal-detail",
        }
    }

    /// Login and register screens, which a logged-in user is sent away from.
    pub fn is_entry(&self) -> bool {
        matches!(self, RouteName::Login | RouteName::Register)
    }

    pub fn route(&self) -> &'static Route {
        // ROUTES lists every variant exactly once, in declaration order
        &ROUTES[*self as usize]
    }
}

impl fmt::Display for RouteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of the route table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub name: RouteName,
    /// Path pattern; segments starting with `:` capture a parameter
    pub pattern: &'static str,
    pub requires_auth: bool,
}

pub static ROUTES: [Route; 4] = [
    Route {
        name: RouteName::Login,
        pattern: "/login",
        requires_auth: false,
    },
    Route {
        name: RouteName::Register,
        pattern: "/register",
        requires_auth: false,
    },
    Route {
        name: RouteName::Dashboard,
        pattern: "/",
        requires_auth: true,
    },
    Route {
        name: RouteName::GoalDetail,
        pattern: "/goals/:id",
        requires_auth: true,
    },
];

/// The landing page for authenticated users.
pub const DEFAULT_ROUTE: RouteName = RouteName::Dashboard;

/// Where unauthenticated users are sent.
pub const LOGIN_ROUTE: RouteName = RouteName::Login;

/// A resolved navigation target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    pub name: RouteName,
    pub path: String,
    pub params: BTreeMap<String, String>,
    pub requires_auth: bool,
}

impl Destination {
    /// Destination for a parameterless route.
    ///
    /// Routes with `:param` segments have their own constructors
    /// ([`Destination::goal`]).
    pub fn named(name: RouteName) -> Self {
        let route = name.route();
        debug_assert!(
            !route.pattern.contains(':'),
            "route {} needs parameters",
            name.as_str()
        );
        Self {
            name,
            path: route.pattern.to_string(),
            params: BTreeMap::new(),
            requires_auth: route.requires_auth,
        }
    }

    pub fn goal(goal_id: u64) -> Self {
        let mut params = BTreeMap::new();
        params.insert("id".to_string(), goal_id.to_string());
        Self {
            name: RouteName::GoalDetail,
            path: format!("/goals/{}", goal_id),
            params,
            requires_auth: RouteName::GoalDetail.route().requires_auth,
        }
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.path)
    }
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

fn match_route(route: &Route, path: &str) -> Option<BTreeMap<String, String>> {
    let mut params = BTreeMap::new();
    let mut pattern = segments(route.pattern);
    let mut actual = segments(path);

    loop {
        match (pattern.next(), actual.next()) {
            (None, None) => return Some(params),
            (Some(p), Some(a)) => {
                if let Some(key) = p.strip_prefix(':') {
                    params.insert(key.to_string(), a.to_string());
                } else if p != a {
                    return None;
                }
            }
            _ => return None,
        }
    }
}

/// Resolve a path such as `/goals/42?tab=history` to a destination.
/// Query strings, fragments and trailing slashes are ignored.
pub fn resolve(path: &str) -> Option<Destination> {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    if !path.starts_with('/') {
        return None;
    }

    ROUTES.iter().find_map(|route| {
        match_route(route, path).map(|params| {
            let normalized = if segments(path).next().is_none() {
                "/".to_string()
            } else {
                segments(path).fold(String::new(), |acc, s| acc + "/" + s)
            };
            Destination {
                name: route.name,
                path: normalized,
                params,
                requires_auth: route.requires_auth,
            }
        })
    })
}
