// Authentication data models

use serde::{Deserialize, Serialize};
use std::fmt;

/// Role carried in JWT claims. Admins can run catalog maintenance,
/// bulk completion, and reporting; employees manage their own orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Employee,
    Admin,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Employee => write!(f, "Employee"),
            Role::Admin => write!(f, "Admin"),
        }
    }
}
