//! CSV bulk-import pipeline for the ERP financial ledger API.
//!
//! This crate parses transaction CSV files, validates every row against a
//! fixed schema and the ledger's account categories, and submits the
//! clean rows to the backend in a single bulk request.
//!
//! Parsing, validation and session handling work offline; the HTTP
//! [`client`] and the high-level [`importer`] are available behind the
//! `async` and `blocking` features.

#[cfg(any(feature = "async", feature = "blocking"))]
pub mod client;
pub mod error;
pub mod import;
#[cfg(any(feature = "async", feature = "blocking"))]
pub mod importer;
pub mod models;
pub mod templates;
