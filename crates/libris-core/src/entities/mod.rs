//! Entity structs for Libris domain objects.
//!
//! Each entity maps to a table in the libSQL database. All structs derive
//! `Serialize` and `Deserialize` for JSON roundtrip, ledger payloads, and
//! CLI output.

mod audit;
mod borrow;
mod donation;

pub use audit::AuditEntry;
pub use borrow::BorrowRequest;
pub use donation::DonationRequest;
