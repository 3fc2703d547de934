//! # libris-core
//!
//! Core types, request lifecycles, and timeline reconstruction for Libris.
//!
//! This crate provides the foundational types shared across all Libris crates:
//! - Entity structs for borrow and donation requests
//! - Status enums with state machine transitions
//! - The lifecycle engine applying staff actions to requests
//! - Activity timeline reconstruction from sparse record timestamps
//! - ID prefix constants
//! - Ledger record envelope for JSONL persistence
//! - Audit detail sub-types and read-model types

pub mod audit_detail;
pub mod entities;
pub mod enums;
pub mod errors;
pub mod ids;
pub mod ledger;
pub mod lifecycle;
pub mod responses;
pub mod timeline;
