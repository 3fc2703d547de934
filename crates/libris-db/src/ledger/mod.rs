//! Append-only event ledger.
//!
//! Every create and transition is journaled to day-partitioned JSONL files
//! at write time, so member timelines can be replayed from the log instead
//! of being re-derived from sparse row timestamps.

pub mod writer;

pub use writer::LedgerWriter;
