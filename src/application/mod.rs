// Application layer - the booking ledger and its error type.
// Every frontend (the terminal session today) talks to the ledger through
// `BookingLedger` only.

pub mod error;
pub mod service;

pub use error::*;
pub use service::*;
