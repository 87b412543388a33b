pub mod auth;
pub mod circulation_service;
pub mod inventory_service;
pub mod qr_service;
pub mod tenancy_service;
pub mod user_service;
