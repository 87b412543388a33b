// src/middleware/rbac.rs

use crate::{common::error::AppError, models::auth::Role};

// Allowed-role sets, one per operation class. Call sites pick the set; the
// gate itself knows nothing about a role hierarchy.
pub const ITEM_READ: &[Role] = &[Role::Admin, Role::Leader, Role::Scout, Role::Viewer];
pub const ITEM_WRITE: &[Role] = &[Role::Admin, Role::Leader];
pub const ITEM_DELETE: &[Role] = &[Role::Admin];
pub const CIRCULATION: &[Role] = &[Role::Admin, Role::Leader, Role::Scout];
pub const USER_LIST: &[Role] = &[Role::Admin, Role::Leader];
pub const USER_ADMIN: &[Role] = &[Role::Admin];

/// The authorization gate. Pure: claims in, pass or `Forbidden` out, and the
/// rejection carries both the role sets so the caller can see what would
/// have been enough.
pub fn authorize(actual: Role, required: &'static [Role]) -> Result<(), AppError> {
    if required.contains(&actual) {
        Ok(())
    } else {
        Err(AppError::Forbidden { required, actual })
    }
}
