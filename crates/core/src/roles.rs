//! Well-known user type ids and names.
//!
//! These must match the seed data in `20260301000001_create_lookup_tables.sql`.

use crate::types::DbId;

/// User type id of administrators.
pub const USER_TYPE_ADMIN: DbId = 1;

/// User type id of customers.
pub const USER_TYPE_CLIENT: DbId = 2;

/// Seeded name of the administrator user type.
pub const ROLE_ADMIN: &str = "Administrador";

/// Seeded name of the default customer type. Communications without
/// audience segments go to every user of this type.
pub const DEFAULT_CUSTOMER_TYPE: &str = "Cliente";

/// Whether the given user type grants administrator access.
pub fn is_admin(user_type_id: DbId) -> bool {
    user_type_id == USER_TYPE_ADMIN
}
