// Menu catalog module
// Lookup of sellable items by type and availability date, plus admin maintenance

pub mod handlers;
pub mod models;
pub mod repository;

pub use models::{Menu, MenuType, NO_MENU_PLACEHOLDER};
pub use repository::MenuRepository;
