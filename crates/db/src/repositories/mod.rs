//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod brand_repo;
pub mod communication_repo;
pub mod dispatch_repo;
pub mod inventory_repo;
pub mod lookup_repo;
pub mod password_reset_repo;
pub mod product_repo;
pub mod segment_repo;
pub mod stock_alert_repo;
pub mod user_repo;
pub mod warehouse_repo;

pub use brand_repo::BrandRepo;
pub use communication_repo::CommunicationRepo;
pub use dispatch_repo::DispatchRepo;
pub use inventory_repo::{InventoryRepo, MovementError, RecordedMovement};
pub use lookup_repo::{ProvinceRepo, UserTypeRepo};
pub use password_reset_repo::PasswordResetRepo;
pub use product_repo::ProductRepo;
pub use segment_repo::SegmentRepo;
pub use stock_alert_repo::StockAlertRepo;
pub use user_repo::UserRepo;
pub use warehouse_repo::WarehouseRepo;
