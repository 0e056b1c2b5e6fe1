//! FILENAME: report-model/src/extended.rs
//! Extended items - design nodes whose behavior is supplied by a
//! pluggable extension rather than built-in logic.
//!
//! An `ExtendedItemDesign` starts out inert: it carries only its
//! extension name. Initialization (normally done by the compatibility
//! loader or the host right after parsing) asks an `ExtensionRegistry`
//! for a live instance. Initialization failure is recoverable: the node
//! stays inert and renders as empty rather than aborting document load.

use rustc_hash::FxHashMap;
use thiserror::Error;

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Error, Debug)]
pub enum ExtensionError {
    #[error("unknown extension: {0}")]
    UnknownExtension(String),

    #[error("extension '{name}' failed to initialize: {reason}")]
    InitializationFailed { name: String, reason: String },
}

// ============================================================================
// EXTENSION TRAITS
// ============================================================================

/// A live extension instance backing one extended item.
pub trait ReportItemExtension {
    /// Extension name, matching the design node's `extension_name`.
    fn name(&self) -> &str;

    /// One-time setup after instantiation. A failure here degrades the
    /// owning design node to inert.
    fn initialize(&mut self) -> Result<(), ExtensionError>;

    /// Access to the pre-unification scripting surface, if this
    /// extension still carries legacy per-row expressions.
    fn as_compatible(&mut self) -> Option<&mut dyn CompatibleExtension> {
        None
    }
}

/// Legacy scripting surface of extensions written before the unified
/// per-row expression model. The compatibility loader drains
/// `legacy_row_expressions` and writes the migrated mapping back through
/// `update_row_expressions`.
pub trait CompatibleExtension: ReportItemExtension {
    /// Remaining legacy expressions as (row id, expression source) pairs.
    fn legacy_row_expressions(&self) -> Vec<(String, String)>;

    /// Replace the expression mapping with the migrated form. After this
    /// call `legacy_row_expressions` must return an empty list.
    fn update_row_expressions(&mut self, expressions: FxHashMap<String, String>);
}

/// External lookup from extension name to live instance.
pub trait ExtensionRegistry {
    fn instantiate(&self, name: &str) -> Result<Box<dyn ReportItemExtension>, ExtensionError>;
}

// ============================================================================
// EXTENDED ITEM DESIGN NODE
// ============================================================================

/// Design node for an extended item.
pub struct ExtendedItemDesign {
    pub name: String,

    /// Name of the extension implementation this item asks for.
    pub extension_name: String,

    /// Live extension instance. `None` until initialized; stays `None`
    /// when initialization failed (the item is then inert).
    pub instance: Option<Box<dyn ReportItemExtension>>,

    /// Current per-row expression mapping (row id -> expression source).
    pub row_expressions: FxHashMap<String, String>,

    pub style: Option<String>,
}

impl ExtendedItemDesign {
    pub fn new(name: impl Into<String>, extension_name: impl Into<String>) -> Self {
        ExtendedItemDesign {
            name: name.into(),
            extension_name: extension_name.into(),
            instance: None,
            row_expressions: FxHashMap::default(),
            style: None,
        }
    }

    /// An item without a live instance renders as empty.
    pub fn is_inert(&self) -> bool {
        self.instance.is_none()
    }
}

impl std::fmt::Debug for ExtendedItemDesign {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtendedItemDesign")
            .field("name", &self.name)
            .field("extension_name", &self.extension_name)
            .field("initialized", &self.instance.is_some())
            .field("row_expressions", &self.row_expressions)
            .field("style", &self.style)
            .finish()
    }
}
