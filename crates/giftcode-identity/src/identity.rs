//! Gateway-injected identity headers extractor.

use axum::extract::FromRequestParts;
use http::StatusCode;
use http::request::Parts;
use uuid::Uuid;

/// Group whose members may call administrative routes.
pub const ADMIN_GROUP: &str = "administrators";

/// Caller identity injected by the gateway via `x-gift-subject-id` and
/// `x-gift-groups` headers after it has validated the identity
/// provider's signed claims.
///
/// Returns 401 if `x-gift-subject-id` is absent or not a UUID.
/// `x-gift-groups` is optional (comma-separated group names); absence
/// means no group memberships. Group enforcement is done by handlers
/// after extraction — admin routes deliberately answer 404, not 403.
#[derive(Debug, Clone)]
pub struct Identity {
    pub subject_id: Uuid,
    pub groups: Vec<String>,
}

impl Identity {
    /// Membership in the administrator group.
    pub fn is_admin(&self) -> bool {
        self.groups.iter().any(|g| g == ADMIN_GROUP)
    }
}

impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    // axum-core 0.5 defines this as `fn -> impl Future + Send` (not `async fn`).
    // In Rust 1.82+ precise capturing, `async fn` captures lifetimes differently,
    // causing E0195. Fix: extract values synchronously, return a 'static async move block.
    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let subject_id = parts
            .headers
            .get("x-gift-subject-id")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<Uuid>().ok());

        let groups: Vec<String> = parts
            .headers
            .get("x-gift-groups")
            .and_then(|v| v.to_str().ok())
            .map(|s| {
                s.split(',')
                    .map(str::trim)
                    .filter(|g| !g.is_empty())
                    .map(str::to_owned)
                    .collect()
            })
            .unwrap_or_default();

        async move {
            let subject_id = subject_id.ok_or(StatusCode::UNAUTHORIZED)?;
            Ok(Self { subject_id, groups })
        }
    }
}
