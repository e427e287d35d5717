pub mod auth;
pub mod brands;
pub mod catalog;
pub mod communications;
pub mod inventory;
pub mod products;
pub mod users;
pub mod warehouses;
