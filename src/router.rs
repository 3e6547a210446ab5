//! Route table and the navigation guard.
//!
//! Routes form a tree. A navigation target is resolved to the chain of records
//! from the root down to the matched leaf; if any record in that chain requires
//! authentication and the session holds no token, the guard sends the caller to
//! the login route instead.

use crate::session::SessionStore;

pub const LOGIN_PATH: &str = "/login";
const MAX_REDIRECTS: usize = 8;

#[derive(Debug, Clone)]
pub struct RouteRecord {
    pub path: String,
    pub name: Option<String>,
    pub requires_auth: bool,
    pub redirect: Option<String>,
    pub children: Vec<RouteRecord>,
}

impl RouteRecord {
    pub fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
            name: None,
            requires_auth: false,
            redirect: None,
            children: vec![],
        }
    }

    pub fn named(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn protected(mut self) -> Self {
        self.requires_auth = true;
        self
    }

    pub fn redirect_to(mut self, target: &str) -> Self {
        self.redirect = Some(target.to_string());
        self
    }

    pub fn with_children(mut self, children: Vec<RouteRecord>) -> Self {
        self.children = children;
        self
    }

    fn segments(&self) -> Vec<&str> {
        segments(&self.path)
    }
}

/// A resolved navigation target.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteMatch {
    pub path: String,
    pub name: Option<String>,
    pub requires_auth: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Navigation {
    Proceed(RouteMatch),
    Redirect { from: String, to: String },
    NotFound { path: String },
}

pub struct Router {
    routes: Vec<RouteRecord>,
    login_path: String,
}

impl Router {
    pub fn new(routes: Vec<RouteRecord>, login_path: &str) -> Self {
        Self {
            routes,
            login_path: login_path.to_string(),
        }
    }

    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    /// Resolve `path`, following route-level redirects.
    pub fn resolve(&self, path: &str) -> Option<RouteMatch> {
        let mut current = normalize(path);

        for _ in 0..=MAX_REDIRECTS {
            let chain = match_records(&self.routes, &segments(&current))?;
            let leaf = chain.last()?;
            if let Some(target) = &leaf.redirect {
                current = normalize(target);
                continue;
            }
            return Some(RouteMatch {
                path: current,
                name: leaf.name.clone(),
                requires_auth: chain.iter().any(|r| r.requires_auth),
            });
        }

        tracing::warn!(path, "redirect limit reached");
        None
    }

    /// Guard consulted before every view transition. Reads only in-memory
    /// session state.
    pub fn navigate(&self, path: &str, session: &SessionStore) -> Navigation {
        let Some(target) = self.resolve(path) else {
            return Navigation::NotFound {
                path: normalize(path),
            };
        };

        if target.requires_auth && !session.is_authenticated() {
            tracing::debug!(path = %target.path, "unauthenticated, redirecting to login");
            return Navigation::Redirect {
                from: target.path,
                to: self.login_path.clone(),
            };
        }

        Navigation::Proceed(target)
    }
}

impl Default for Router {
    /// The application's view tree: a public login page and a protected
    /// layout holding the dashboard and task list.
    fn default() -> Self {
        let routes = vec![
            RouteRecord::new(LOGIN_PATH).named("login"),
            RouteRecord::new("/").protected().with_children(vec![
                RouteRecord::new("").redirect_to("/dashboard"),
                RouteRecord::new("dashboard").named("dashboard"),
                RouteRecord::new("tasks").named("tasks"),
            ]),
        ];
        Self::new(routes, LOGIN_PATH)
    }
}

fn match_records<'a>(records: &'a [RouteRecord], path: &[&str]) -> Option<Vec<&'a RouteRecord>> {
    for record in records {
        let own = record.segments();
        if !path.starts_with(&own) {
            continue;
        }
        let rest = &path[own.len()..];

        if let Some(mut chain) = match_records(&record.children, rest) {
            chain.insert(0, record);
            return Some(chain);
        }
        if rest.is_empty() {
            return Some(vec![record]);
        }
    }
    None
}

fn segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

fn normalize(path: &str) -> String {
    format!("/{}", segments(path).join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_follows_index_redirect() {
        let router = Router::default();
        let resolved = router.resolve("/").unwrap();
        assert_eq!(resolved.path, "/dashboard");
        assert_eq!(resolved.name.as_deref(), Some("dashboard"));
        assert!(resolved.requires_auth);
    }

    #[test]
    fn test_child_inherits_parent_protection() {
        let router = Router::default();
        assert!(router.resolve("/tasks").unwrap().requires_auth);
        assert!(!router.resolve("/login").unwrap().requires_auth);
    }

    #[test]
    fn test_unknown_path() {
        let router = Router::default();
        assert!(router.resolve("/nowhere").is_none());
        assert!(router.resolve("/tasks/extra").is_none());
    }

    #[test]
    fn test_redirect_loop_is_bounded() {
        let router = Router::new(
            vec![
                RouteRecord::new("/a").redirect_to("/b"),
                RouteRecord::new("/b").redirect_to("/a"),
            ],
            LOGIN_PATH,
        );
        assert!(router.resolve("/a").is_none());
    }
}
