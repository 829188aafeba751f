// SPDX-License-Identifier: PMPL-1.0-or-later
//
// Gazetteer — Core types, configuration, and error definitions shared across
// the scan pipeline crates.

pub mod config;
pub mod error;
pub mod types;

pub use config::ScanConfig;
pub use error::GazetteerError;
pub use types::*;
