// =============================================================================
// CreUp API - Navigation
// =============================================================================
// Table of Contents:
// 1. Navigator Trait
// 2. Memory Navigator
// 3. Browser Navigator (wasm32)
// =============================================================================

use parking_lot::Mutex;

// -----------------------------------------------------------------------------
// 1. Navigator Trait
// -----------------------------------------------------------------------------

/// Access to the current page path and hard navigation.
pub trait Navigator: Send + Sync {
    /// Path of the page issuing requests, e.g. `/dashboard/projects`.
    fn pathname(&self) -> String;

    /// Leave the current page for `path` (full reload in a browser).
    fn redirect(&self, path: &str);
}

// -----------------------------------------------------------------------------
// 2. Memory Navigator
// -----------------------------------------------------------------------------

/// Navigator that keeps its location in memory and records redirects.
#[derive(Debug, Default)]
pub struct MemoryNavigator {
    state: Mutex<NavigatorState>,
}

#[derive(Debug, Default)]
struct NavigatorState {
    pathname: String,
    redirects: Vec<String>,
}

impl MemoryNavigator {
    pub fn new(pathname: impl Into<String>) -> Self {
        Self {
            state: Mutex::new(NavigatorState {
                pathname: pathname.into(),
                redirects: Vec::new(),
            }),
        }
    }

    /// Move to another page without recording a redirect.
    pub fn visit(&self, pathname: impl Into<String>) {
        self.state.lock().pathname = pathname.into();
    }

    /// Redirects performed so far, oldest first.
    pub fn redirects(&self) -> Vec<String> {
        self.state.lock().redirects.clone()
    }
}

impl Navigator for MemoryNavigator {
    fn pathname(&self) -> String {
        let state = self.state.lock();
        if state.pathname.is_empty() {
            "/".to_string()
        } else {
            state.pathname.clone()
        }
    }

    fn redirect(&self, path: &str) {
        let mut state = self.state.lock();
        state.pathname = path.to_string();
        state.redirects.push(path.to_string());
    }
}

// -----------------------------------------------------------------------------
// 3. Browser Navigator (wasm32)
// -----------------------------------------------------------------------------

/// Navigator over `window.location`.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserNavigator;

#[cfg(target_arch = "wasm32")]
impl Navigator for BrowserNavigator {
    fn pathname(&self) -> String {
        web_sys::window()
            .and_then(|window| window.location().pathname().ok())
            .unwrap_or_else(|| "/".to_string())
    }

    fn redirect(&self, path: &str) {
        if let Some(window) = web_sys::window() {
            if let Err(e) = window.location().set_href(path) {
                tracing::warn!(path = %path, error = ?e, "Navigation failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_location_reads_as_root() {
        let navigator = MemoryNavigator::default();
        assert_eq!(navigator.pathname(), "/");
    }

    #[test]
    fn redirect_moves_and_records() {
        let navigator = MemoryNavigator::new("/dashboard/team");
        navigator.redirect("/login");

        assert_eq!(navigator.pathname(), "/login");
        assert_eq!(navigator.redirects(), vec!["/login".to_string()]);
    }

    #[test]
    fn visit_does_not_count_as_redirect() {
        let navigator = MemoryNavigator::new("/");
        navigator.visit("/dashboard");

        assert_eq!(navigator.pathname(), "/dashboard");
        assert!(navigator.redirects().is_empty());
    }
}
