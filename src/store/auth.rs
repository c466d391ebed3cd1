//! Authorization Policy
//!
//! Decides who may mutate, delete or see an entry owned by someone else.

/// Principal with elevated rights.
pub const ADMIN: &str = "admin";

/// Returns true if `requester` may update or delete an entry created by `owner`.
///
/// The admin principal bypasses ownership only when `admin_override` is set.
pub fn authorized(requester: &str, owner: &str, admin_override: bool) -> bool {
    if admin_override && requester == ADMIN {
        return true;
    }
    requester == owner
}

/// Returns true if `requester` may see an entry created by `owner` in listings.
///
/// Admin always sees every entry.
pub fn visible(requester: &str, owner: &str) -> bool {
    requester == ADMIN || requester == owner
}
