//! Lead qualification engine.
//!
//! Leads are scored against the current offer by summing a deterministic rule
//! score with points derived from an AI intent classification. The `scoring`
//! module owns that decision logic; `leads` and `storage` are the CSV intake
//! and JSON persistence collaborators the HTTP service wires around it.

pub mod config;
pub mod error;
pub mod leads;
pub mod scoring;
pub mod storage;
pub mod telemetry;
