//! FILENAME: report-model/src/compat.rs
//! Design compatibility loader for extended items.
//!
//! Documents written before the unified per-row expression model
//! (format versions below [`UNIFIED_EXPRESSION_VERSION`]) carry legacy
//! expressions inside the extension instance. Loading such a document
//! eagerly initializes the extension and migrates those expressions into
//! the current mapping. Documents at or above the threshold are loaded
//! like any other element, with no special handling.

use std::cmp::Ordering;

use rustc_hash::FxHashMap;

use crate::extended::{ExtendedItemDesign, ExtensionRegistry};

/// First format version using the unified per-row expression model.
pub const UNIFIED_EXPRESSION_VERSION: &str = "3.2.1";

// ============================================================================
// VERSION COMPARISON
// ============================================================================

/// Compares two dotted-decimal version strings segment by segment.
/// Missing segments read as zero, so "3.2" == "3.2.0" and "3.2" < "3.2.1".
/// Non-numeric segments read as zero.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let mut left = a.split('.').map(parse_segment);
    let mut right = b.split('.').map(parse_segment);

    loop {
        match (left.next(), right.next()) {
            (None, None) => return Ordering::Equal,
            (la, ra) => {
                let la = la.unwrap_or(0);
                let ra = ra.unwrap_or(0);
                if la != ra {
                    return la.cmp(&ra);
                }
            }
        }
    }
}

fn parse_segment(segment: &str) -> u32 {
    segment.trim().parse().unwrap_or(0)
}

// ============================================================================
// EXTENDED ITEM LOADER
// ============================================================================

/// Loads extended-item design nodes for one document, applying the
/// legacy expression migration when the document predates the unified
/// scripting model.
pub struct ExtendedItemLoader<'a> {
    registry: &'a dyn ExtensionRegistry,
    document_version: String,
}

impl<'a> ExtendedItemLoader<'a> {
    pub fn new(registry: &'a dyn ExtensionRegistry, document_version: impl Into<String>) -> Self {
        ExtendedItemLoader {
            registry,
            document_version: document_version.into(),
        }
    }

    /// True when the document predates the unified expression model.
    pub fn needs_migration(&self) -> bool {
        compare_versions(&self.document_version, UNIFIED_EXPRESSION_VERSION) == Ordering::Less
    }

    /// Produces the design node for one extended item.
    ///
    /// At or above the version threshold the node is returned as parsed.
    /// Below it, the extension is initialized eagerly; a failed
    /// initialization leaves the node inert and is not an error - default
    /// parsing continues. A successfully initialized extension that still
    /// exposes legacy row expressions has them migrated in place.
    pub fn load(
        &self,
        name: impl Into<String>,
        extension_name: impl Into<String>,
    ) -> ExtendedItemDesign {
        let mut node = ExtendedItemDesign::new(name, extension_name);

        if !self.needs_migration() {
            return node;
        }

        let mut instance = match self.registry.instantiate(&node.extension_name) {
            Ok(instance) => instance,
            Err(err) => {
                log::debug!(
                    "extended item '{}' stays inert: {}",
                    node.name,
                    err
                );
                return node;
            }
        };
        if let Err(err) = instance.initialize() {
            log::debug!("extended item '{}' stays inert: {}", node.name, err);
            return node;
        }

        if let Some(compatible) = instance.as_compatible() {
            let legacy = compatible.legacy_row_expressions();
            if !legacy.is_empty() {
                let migrated = migrate_row_expressions(&legacy);
                compatible.update_row_expressions(migrated.clone());
                node.row_expressions = migrated;
            }
        }

        node.instance = Some(instance);
        node
    }
}

// ============================================================================
// EXPRESSION MIGRATION
// ============================================================================

/// Rewrites legacy expressions into the unified indexed-binding form:
/// every `row.ident` member access becomes `row["ident"]`.
pub fn migrate_row_expressions(legacy: &[(String, String)]) -> FxHashMap<String, String> {
    legacy
        .iter()
        .map(|(row_id, expr)| (row_id.clone(), migrate_expression(expr)))
        .collect()
}

fn migrate_expression(expr: &str) -> String {
    let bytes = expr.as_bytes();
    let mut out = String::with_capacity(expr.len());
    let mut i = 0;

    while i < bytes.len() {
        if expr[i..].starts_with("row.") && !is_ident_char_before(bytes, i) {
            let ident_start = i + 4;
            let ident_end = ident_end(bytes, ident_start);
            if ident_end > ident_start {
                out.push_str("row[\"");
                out.push_str(&expr[ident_start..ident_end]);
                out.push_str("\"]");
                i = ident_end;
                continue;
            }
        }
        // advance one full character
        let ch_len = expr[i..].chars().next().map(char::len_utf8).unwrap_or(1);
        out.push_str(&expr[i..i + ch_len]);
        i += ch_len;
    }

    out
}

fn is_ident_char_before(bytes: &[u8], index: usize) -> bool {
    index > 0 && is_ident_char(bytes[index - 1])
}

fn ident_end(bytes: &[u8], start: usize) -> usize {
    let mut end = start;
    while end < bytes.len() && is_ident_char(bytes[end]) {
        end += 1;
    }
    end
}

fn is_ident_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

// ============================================================================
// TESTS
// ============================================================================
