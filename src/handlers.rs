pub mod auth;
pub mod circulation;
pub mod inventory;
pub mod qr;
pub mod tenancy;
pub mod users;
