//! Routes, the navigation seam, and the guard every protected view consults.

use std::sync::Mutex;

use crate::auth::SessionState;
use crate::models::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Register,
    Dashboard,
    Schedule,
    Resources,
    Community,
}

impl Route {
    /// Where a fresh login lands
    pub const LANDING: Route = Route::Dashboard;

    /// Where signed-out users are sent
    pub const ENTRY: Route = Route::Login;

    pub fn is_protected(&self) -> bool {
        !matches!(self, Route::Login | Route::Register)
    }

    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Register => "/register",
            Route::Dashboard => "/dashboard",
            Route::Schedule => "/schedule",
            Route::Resources => "/resources",
            Route::Community => "/community",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::Login => "Sign in",
            Route::Register => "Register",
            Route::Dashboard => "Dashboard",
            Route::Schedule => "Schedule",
            Route::Resources => "Resources",
            Route::Community => "Community",
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

/// Receives the navigation signals emitted by the session controller.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

/// Records every route it is sent to.
#[derive(Default)]
pub struct HistoryNavigator {
    history: Mutex<Vec<Route>>,
}

impl HistoryNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> Vec<Route> {
        self.history.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn current(&self) -> Option<Route> {
        self.history.lock().unwrap_or_else(|e| e.into_inner()).last().copied()
    }
}

impl Navigator for HistoryNavigator {
    fn navigate(&self, route: Route) {
        self.history.lock().unwrap_or_else(|e| e.into_inner()).push(route);
    }
}

/// What a view should do for the current session state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    /// Show the real content
    Render,
    /// Verification is still in flight; show a neutral placeholder
    Placeholder,
    /// Do not touch protected endpoints; go here instead
    Redirect(Route),
}

pub fn guard(state: &SessionState, route: Route) -> Gate {
    if !route.is_protected() {
        return Gate::Render;
    }
    match state {
        SessionState::Loading => Gate::Placeholder,
        SessionState::Unauthenticated => Gate::Redirect(Route::ENTRY),
        SessionState::Authenticated { .. } => Gate::Render,
    }
}

/// Navigation links shown to a signed-in user
pub fn nav_links(role: Role) -> Vec<Route> {
    let mut links = vec![Route::Dashboard];
    if role == Role::Mentor {
        links.push(Route::Schedule);
    }
    links.push(Route::Resources);
    links.push(Route::Community);
    links
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::User;

    fn authenticated() -> SessionState {
        SessionState::Authenticated {
            user: User {
                user_id: 1,
                name: "Ana".to_string(),
                email: "ana@example.com".to_string(),
                role: Role::Parent,
            },
        }
    }

    #[test]
    fn test_guard_protected_routes() {
        for route in [Route::Dashboard, Route::Schedule, Route::Resources, Route::Community] {
            assert_eq!(guard(&SessionState::Loading, route), Gate::Placeholder);
            assert_eq!(
                guard(&SessionState::Unauthenticated, route),
                Gate::Redirect(Route::Login)
            );
            assert_eq!(guard(&authenticated(), route), Gate::Render);
        }
    }

    #[test]
    fn test_guard_public_routes_always_render() {
        for route in [Route::Login, Route::Register] {
            assert_eq!(guard(&SessionState::Loading, route), Gate::Render);
            assert_eq!(guard(&SessionState::Unauthenticated, route), Gate::Render);
            assert_eq!(guard(&authenticated(), route), Gate::Render);
        }
    }

    #[test]
    fn test_nav_links_by_role() {
        assert_eq!(
            nav_links(Role::Parent),
            vec![Route::Dashboard, Route::Resources, Route::Community]
        );
        assert_eq!(
            nav_links(Role::Mentor),
            vec![Route::Dashboard, Route::Schedule, Route::Resources, Route::Community]
        );
    }

    #[test]
    fn test_history_navigator() {
        let nav = HistoryNavigator::new();
        assert_eq!(nav.current(), None);
        nav.navigate(Route::Dashboard);
        nav.navigate(Route::Login);
        assert_eq!(nav.history(), vec![Route::Dashboard, Route::Login]);
        assert_eq!(nav.current(), Some(Route::Login));
    }
}
