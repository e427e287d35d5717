//! Shared query parameter types for API handlers.

use ingetech_core::communication::StatusFilter;
use ingetech_core::types::DbId;
use serde::Deserialize;

/// Query parameters for list endpoints that support an `include_inactive` flag.
#[derive(Debug, Deserialize)]
pub struct IncludeInactiveParams {
    #[serde(default)]
    pub include_inactive: bool,
}

/// `?status=` filter for the communication listing.
#[derive(Debug, Default, Deserialize)]
pub struct CommunicationListParams {
    #[serde(default)]
    pub status: StatusFilter,
}

/// `?warehouse_id=` filter for stock rows.
#[derive(Debug, Deserialize)]
pub struct InventoryListParams {
    pub warehouse_id: Option<DbId>,
}

/// `?product_id=` filter for movements.
#[derive(Debug, Deserialize)]
pub struct MovementListParams {
    pub product_id: Option<DbId>,
}

/// `?only_open=` filter for stock alerts (default: only open alerts).
#[derive(Debug, Deserialize)]
pub struct AlertListParams {
    #[serde(default = "default_true")]
    pub only_open: bool,
}

fn default_true() -> bool {
    true
}
