// Authentication module
// JWT validation for staff endpoints. Tokens are minted by the company
// identity provider with the shared JWT_SECRET; this service only verifies.

pub mod error;
pub mod middleware;
pub mod models;
pub mod token;

// Re-export commonly used types
pub use error::AuthError;
pub use middleware::{AuthenticatedEmployee, RequireRole};
pub use models::Role;
pub use token::{Claims, TokenService};
