// Employee directory module
// Profile lookups and the meal-program eligibility rule

pub mod handlers;
pub mod models;
pub mod repository;

pub use models::{CustomerType, Employee};
pub use repository::EmployeeRepository;
