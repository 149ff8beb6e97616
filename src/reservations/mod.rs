// Reservation lifecycle module
//
// Same-day orders and advance orders are two storage variants of one
// conceptual reservation. They share reference-number format, status
// lifecycle, and reporting; they differ in input channel and validation
// window. The combined read model unifies them wherever logic must not
// care which table a reference lives in.

pub mod conflict;
pub mod error;
pub mod handlers;
pub mod models;
pub mod reference;
pub mod repository;
pub mod service;
pub mod status_machine;

pub use error::ReservationError;
pub use models::{
    AdvanceOrder, CombinedOrder, Order, ReservationStatus, Source,
};
pub use service::{AdvanceOrderService, ReservationService};
pub use status_machine::StatusMachine;
