//! Role guards for admin routes.

use adminhub_core::error::AppError;

use crate::extractors::AuthUser;

/// Role allowed to see and end other users' sessions.
pub const ADMIN_ROLE: &str = "admin";

/// Checks that the authenticated user holds the admin role.
pub fn require_admin(auth: &AuthUser) -> Result<(), AppError> {
    if !auth.principal.has_role(ADMIN_ROLE) {
        return Err(AppError::authorization("Admin access required"));
    }
    Ok(())
}
