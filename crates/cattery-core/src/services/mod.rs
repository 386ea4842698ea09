//! Domain services (business logic)

pub mod cat_service;

pub use cat_service::CatService;
