//! Access decision for privileged paths.

use crate::token::SessionClaims;

/// Paths the guard knows about.
#[derive(Debug, Clone)]
pub struct GuardPaths {
    /// Everything at or below this prefix requires an admin session.
    pub privileged_prefix: String,
    /// Sign-in page for the privileged area. Always reachable.
    pub login_path: String,
    /// Where authenticated non-admins are sent.
    pub forbidden_path: String,
    /// Where admins hitting the login page are sent.
    pub privileged_home: String,
}

impl Default for GuardPaths {
    fn default() -> Self {
        Self {
            privileged_prefix: "/admin".to_owned(),
            login_path: "/admin/login".to_owned(),
            forbidden_path: "/auth/error".to_owned(),
            privileged_home: "/admin".to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    /// `callback` is the original path (and query) to return to after sign-in.
    RedirectToLogin { callback: String },
    RedirectToForbidden,
    RedirectToPrivilegedHome,
}

impl GuardPaths {
    /// Segment-aware prefix match: `/admin` and `/admin/x` match, `/administrator` does not.
    pub fn is_privileged(&self, path: &str) -> bool {
        match path.strip_prefix(self.privileged_prefix.as_str()) {
            Some(rest) => rest.is_empty() || rest.starts_with('/'),
            None => false,
        }
    }

    /// Redirect target for a decision, `None` for [`GuardDecision::Allow`].
    pub fn location(&self, decision: &GuardDecision) -> Option<String> {
        match decision {
            GuardDecision::Allow => None,
            GuardDecision::RedirectToLogin { callback } => {
                let encoded: String = url::form_urlencoded::byte_serialize(callback.as_bytes())
                    .collect();
                Some(format!("{}?callbackUrl={encoded}", self.login_path))
            }
            GuardDecision::RedirectToForbidden => Some(self.forbidden_path.clone()),
            GuardDecision::RedirectToPrivilegedHome => Some(self.privileged_home.clone()),
        }
    }
}

/// Decide whether `path` may be served to the holder of `session`.
pub fn guard(
    paths: &GuardPaths,
    path: &str,
    query: Option<&str>,
    session: Option<&SessionClaims>,
) -> GuardDecision {
    let is_admin = session.is_some_and(|s| s.is_admin);

    if path == paths.login_path {
        return if is_admin {
            GuardDecision::RedirectToPrivilegedHome
        } else {
            GuardDecision::Allow
        };
    }

    if !paths.is_privileged(path) {
        return GuardDecision::Allow;
    }

    match session {
        None => GuardDecision::RedirectToLogin {
            callback: match query {
                Some(q) if !q.is_empty() => format!("{path}?{q}"),
                _ => path.to_owned(),
            },
        },
        Some(_) if !is_admin => GuardDecision::RedirectToForbidden,
        Some(_) => GuardDecision::Allow,
    }
}
