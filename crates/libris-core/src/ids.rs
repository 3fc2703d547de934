//! ID prefix constants and formatting conventions.
//!
//! Every row id has the form `{prefix}-{8 hex chars}`, e.g. `brw-a3f8b2c1`.
//! The random part is generated in SQL by the store (`randomblob(4)`).

pub const PREFIX_BORROW: &str = "brw";
pub const PREFIX_DONATION: &str = "don";
pub const PREFIX_AUDIT: &str = "aud";

/// All prefixes in use, for tests and tooling.
pub const ALL_PREFIXES: &[&str] = &[PREFIX_BORROW, PREFIX_DONATION, PREFIX_AUDIT];
