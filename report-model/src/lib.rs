//! FILENAME: report-model/src/lib.rs
//! Report Design IR for the report execution engine.
//!
//! This crate provides the immutable design model consumed by the
//! `report-engine` crate, plus the extension surface for pluggable
//! extended items and the design compatibility loader.
//!
//! Layers:
//! - `design`: Design node types (what the report IS)
//! - `extended`: Extension traits and the extended-item design node
//! - `compat`: Version-aware loader with legacy expression migration

pub mod design;
pub mod extended;
pub mod compat;

pub use design::*;
pub use extended::{
    CompatibleExtension, ExtendedItemDesign, ExtensionError, ExtensionRegistry,
    ReportItemExtension,
};
pub use compat::{
    compare_versions, migrate_row_expressions, ExtendedItemLoader,
    UNIFIED_EXPRESSION_VERSION,
};
