// =============================================================================
// CreUp API - Auth Interceptors
// =============================================================================
// Table of Contents:
// 1. Bearer Auth (request)
// 2. Session Guard (response)
// =============================================================================

use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, warn};

use super::store::Session;
use crate::config::ClientConfig;
use crate::error::{ApiError, Result};
use crate::http::{HttpRequest, HttpResponse, AUTHORIZATION};
use crate::middleware::{RequestMiddleware, ResponseMiddleware};
use crate::navigation::Navigator;

// -----------------------------------------------------------------------------
// 1. Bearer Auth (request)
// -----------------------------------------------------------------------------

/// Attaches `Authorization: Bearer <token>` to requests issued from the back
/// office. Requests from public pages are left untouched even when a token is
/// stored.
pub struct BearerAuth {
    session: Session,
    navigator: Arc<dyn Navigator>,
    protected_prefix: String,
}

impl BearerAuth {
    pub fn new(session: Session, navigator: Arc<dyn Navigator>, config: &ClientConfig) -> Self {
        Self {
            session,
            navigator,
            protected_prefix: config.protected_prefix.clone(),
        }
    }
}

impl RequestMiddleware for BearerAuth {
    fn on_request(&self, mut request: HttpRequest) -> HttpRequest {
        if let Some(token) = self.session.token() {
            if self.navigator.pathname().starts_with(&self.protected_prefix) {
                request.set_header(AUTHORIZATION, format!("Bearer {}", token));
            }
        }
        request
    }
}

// -----------------------------------------------------------------------------
// 2. Session Guard (response)
// -----------------------------------------------------------------------------

/// Ends the session when the server rejects it from a back-office page.
///
/// A 401 received while on a page under the protected prefix (other than the
/// login route) clears the stored token and flag, navigates to the login
/// route and surfaces [`ApiError::Unauthorized`]. Every other outcome passes
/// through unchanged.
///
/// Once a logout has been issued, further 401s fail without clearing or
/// navigating again until a new session is established. The browser may
/// still report the old location while the redirect is under way.
pub struct SessionGuard {
    session: Session,
    navigator: Arc<dyn Navigator>,
    protected_prefix: String,
    login_route: String,
    redirect_pending: Mutex<bool>,
}

impl SessionGuard {
    pub fn new(session: Session, navigator: Arc<dyn Navigator>, config: &ClientConfig) -> Self {
        Self {
            session,
            navigator,
            protected_prefix: config.protected_prefix.clone(),
            login_route: config.login_route.clone(),
            redirect_pending: Mutex::new(false),
        }
    }

    fn should_logout(&self, pathname: &str) -> bool {
        pathname != self.login_route && pathname.starts_with(&self.protected_prefix)
    }
}

impl ResponseMiddleware for SessionGuard {
    fn on_response(&self, outcome: Result<HttpResponse>) -> Result<HttpResponse> {
        if let Err(ApiError::Http { status: 401, .. }) = &outcome {
            let pathname = self.navigator.pathname();
            if !self.should_logout(&pathname) {
                debug!(path = %pathname, "401 outside the back office, passing through");
                return outcome;
            }

            let mut redirect_pending = self.redirect_pending.lock();
            if *redirect_pending && !self.session.is_authenticated() {
                debug!(path = %pathname, "Logout already under way");
                return Err(ApiError::Unauthorized);
            }
            *redirect_pending = true;

            warn!(path = %pathname, "Session rejected by the server, logging out");
            if let Err(e) = self.session.clear() {
                warn!(error = %e, "Failed to clear stored credentials");
            }
            self.navigator.redirect(&self.login_route);
            return Err(ApiError::Unauthorized);
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::Method;
    use crate::navigation::MemoryNavigator;

    fn setup(pathname: &str, token: Option<&str>) -> (Session, Arc<MemoryNavigator>) {
        let session = Session::in_memory();
        if let Some(token) = token {
            session.establish(token).unwrap();
        }
        (session, Arc::new(MemoryNavigator::new(pathname)))
    }

    fn authorize(session: &Session, navigator: &Arc<MemoryNavigator>) -> HttpRequest {
        let bearer = BearerAuth::new(session.clone(), navigator.clone(), &ClientConfig::default());
        bearer.on_request(HttpRequest::new(Method::Get, "/api/appointments"))
    }

    #[test]
    fn token_attached_under_protected_prefix() {
        let (session, navigator) = setup("/dashboard/appointments", Some("abc123"));
        let request = authorize(&session, &navigator);
        assert_eq!(request.header(AUTHORIZATION), Some("Bearer abc123"));
    }

    #[test]
    fn no_token_no_header() {
        let (session, navigator) = setup("/dashboard", None);
        let request = authorize(&session, &navigator);
        assert_eq!(request.header(AUTHORIZATION), None);
    }

    #[test]
    fn public_pages_never_send_the_token() {
        for page in ["/", "/services", "/portfolio/12", "/login", "/contact"] {
            let (session, navigator) = setup(page, Some("stale"));
            let request = authorize(&session, &navigator);
            assert_eq!(request.header(AUTHORIZATION), None, "page {page}");
        }
    }

    fn guard(session: &Session, navigator: &Arc<MemoryNavigator>) -> SessionGuard {
        SessionGuard::new(session.clone(), navigator.clone(), &ClientConfig::default())
    }

    #[test]
    fn unauthorized_on_dashboard_logs_out_once() {
        let (session, navigator) = setup("/dashboard/projects", Some("abc123"));
        let guard = guard(&session, &navigator);

        let outcome = guard.on_response(Err(ApiError::http(401, "expired")));

        assert_eq!(outcome.unwrap_err(), ApiError::Unauthorized);
        assert!(session.token().is_none());
        assert!(!session.is_authenticated());
        assert_eq!(navigator.redirects(), vec!["/login".to_string()]);
    }

    #[test]
    fn second_unauthorized_before_navigation_does_not_redirect_again() {
        let (session, navigator) = setup("/dashboard/projects", Some("abc123"));
        let guard = guard(&session, &navigator);

        assert_eq!(
            guard.on_response(Err(ApiError::http(401, ""))).unwrap_err(),
            ApiError::Unauthorized
        );
        // location not updated yet
        navigator.visit("/dashboard/projects");
        assert_eq!(
            guard.on_response(Err(ApiError::http(401, ""))).unwrap_err(),
            ApiError::Unauthorized
        );
        assert_eq!(navigator.redirects(), vec!["/login".to_string()]);

        session.establish("fresh").unwrap();
        let outcome = guard.on_response(Err(ApiError::http(401, "")));
        assert_eq!(outcome.unwrap_err(), ApiError::Unauthorized);
        assert!(session.token().is_none());
        assert_eq!(navigator.redirects().len(), 2);
    }

    #[test]
    fn unauthorized_on_public_page_propagates() {
        let (session, navigator) = setup("/services", Some("abc123"));
        let guard = guard(&session, &navigator);

        let outcome = guard.on_response(Err(ApiError::http(401, "")));

        assert_eq!(outcome.unwrap_err().status(), Some(401));
        assert_eq!(session.token().as_deref(), Some("abc123"));
        assert!(navigator.redirects().is_empty());
    }

    #[test]
    fn unauthorized_on_login_page_propagates() {
        let config = ClientConfig {
            login_route: "/dashboard/login".into(),
            ..ClientConfig::default()
        };
        let (session, navigator) = setup("/dashboard/login", Some("abc123"));
        let guard = SessionGuard::new(session.clone(), navigator.clone(), &config);

        let outcome = guard.on_response(Err(ApiError::http(401, "")));

        assert!(matches!(outcome, Err(ApiError::Http { status: 401, .. })));
        assert!(session.is_authenticated());
        assert!(navigator.redirects().is_empty());
    }

    #[test]
    fn other_errors_and_successes_pass_through() {
        let (session, navigator) = setup("/dashboard", Some("abc123"));
        let guard = guard(&session, &navigator);

        let forbidden = guard.on_response(Err(ApiError::http(403, "")));
        assert_eq!(forbidden.unwrap_err().status(), Some(403));

        let offline = guard.on_response(Err(ApiError::Network("reset".into())));
        assert!(offline.unwrap_err().is_network());

        let ok = guard.on_response(Ok(HttpResponse::new(200, "{}")));
        assert_eq!(ok.unwrap().status, 200);

        assert!(session.is_authenticated());
        assert!(navigator.redirects().is_empty());
    }
}
