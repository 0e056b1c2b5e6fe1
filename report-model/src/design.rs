//! FILENAME: report-model/src/design.rs
//! Design IR - The immutable description of report structure.
//!
//! This module contains the types that DESCRIBE a report: the tree of
//! tables, bands, rows, cells and leaf items produced by a design loader.
//! These structures are designed to be:
//! - Immutable during a render pass (the engine only reads them)
//! - Shared across concurrent render passes
//! - Serializable where they carry no live extension instance
//!
//! The executable counterpart (content tree, executors) lives in the
//! `report-engine` crate.

use serde::{Deserialize, Serialize};

use crate::extended::ExtendedItemDesign;

// ============================================================================
// LIFECYCLE SCRIPTS
// ============================================================================

/// Per-phase script sources attached to a report design.
///
/// Each field holds the compiled-expression source for one lifecycle
/// phase, or `None` when the designer bound nothing. An empty string is
/// treated the same as `None` by the dispatcher.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LifecycleScripts {
    pub initialize: Option<String>,
    pub before_factory: Option<String>,
    pub after_factory: Option<String>,
    pub before_open_doc: Option<String>,
    pub after_open_doc: Option<String>,
    pub before_close_doc: Option<String>,
    pub after_close_doc: Option<String>,
    pub before_render: Option<String>,
    pub after_render: Option<String>,
}

// ============================================================================
// REPORT DESIGN (ROOT)
// ============================================================================

/// The root design node: one report document.
#[derive(Debug)]
pub struct ReportDesign {
    /// Report name, used in content identities and fault messages.
    pub name: String,

    /// Design format version as a dotted-decimal string (e.g. "3.2.1").
    pub version: String,

    /// Top-level body items in document order.
    pub items: Vec<ReportItemDesign>,

    /// Lifecycle event scripts.
    pub scripts: LifecycleScripts,
}

impl ReportDesign {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        ReportDesign {
            name: name.into(),
            version: version.into(),
            items: Vec::new(),
            scripts: LifecycleScripts::default(),
        }
    }
}

// ============================================================================
// REPORT ITEMS
// ============================================================================

/// A report item: anything that can appear in the report body or inside
/// a cell. Closed set - the executor family in `report-engine` matches
/// on these variants one to one.
#[derive(Debug)]
pub enum ReportItemDesign {
    Table(TableDesign),
    Label(LabelDesign),
    Data(DataItemDesign),
    ExtendedItem(ExtendedItemDesign),
}

impl ReportItemDesign {
    /// Design-time name of the item, for identities and fault messages.
    pub fn name(&self) -> &str {
        match self {
            ReportItemDesign::Table(t) => &t.name,
            ReportItemDesign::Label(l) => &l.name,
            ReportItemDesign::Data(d) => &d.name,
            ReportItemDesign::ExtendedItem(e) => &e.name,
        }
    }
}

/// A static text item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelDesign {
    pub name: String,
    pub text: String,
    /// When set, the item opens a TOC entry with this label.
    pub toc_label: Option<String>,
    pub style: Option<String>,
}

impl LabelDesign {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        LabelDesign {
            name: name.into(),
            text: text.into(),
            toc_label: None,
            style: None,
        }
    }
}

/// A data item: resolves one field of the current cursor row of the
/// nearest data-bound ancestor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataItemDesign {
    pub name: String,
    /// Cursor column index the item reads.
    pub field: usize,
    pub style: Option<String>,
}

impl DataItemDesign {
    pub fn new(name: impl Into<String>, field: usize) -> Self {
        DataItemDesign {
            name: name.into(),
            field,
            style: None,
        }
    }
}

// ============================================================================
// TABLE
// ============================================================================

/// A table: the only data-bound container. Owns the header/footer bands,
/// the ordered group list and the detail band.
#[derive(Debug)]
pub struct TableDesign {
    pub name: String,

    /// Name of the data set whose cursor drives this table. `None` makes
    /// the table render its bands exactly once, without data.
    pub data_set: Option<String>,

    /// When set, the table opens a TOC entry with this label.
    pub toc_label: Option<String>,

    pub style: Option<String>,

    /// Band rendered once before any data row.
    pub header: Option<TableBandDesign>,

    /// Groups ordered from outermost to innermost.
    pub groups: Vec<TableGroupDesign>,

    /// Band repeated once per data row.
    pub detail: Option<TableBandDesign>,

    /// Band rendered once after the last data row.
    pub footer: Option<TableBandDesign>,
}

impl TableDesign {
    pub fn new(name: impl Into<String>) -> Self {
        TableDesign {
            name: name.into(),
            data_set: None,
            toc_label: None,
            style: None,
            header: None,
            groups: Vec::new(),
            detail: None,
            footer: None,
        }
    }
}

/// One grouping level of a table.
#[derive(Debug)]
pub struct TableGroupDesign {
    /// Cursor column whose value changes delimit the group.
    pub key_field: usize,

    /// Band rendered at each group start. Its `band_type` must be
    /// `GroupHeader`.
    pub header: Option<TableBandDesign>,

    /// Band rendered at each group end. Its `band_type` must be
    /// `GroupFooter`.
    pub footer: Option<TableBandDesign>,

    /// When set, each group-header activation opens a TOC entry.
    pub toc_label: Option<String>,
}

impl TableGroupDesign {
    pub fn new(key_field: usize) -> Self {
        TableGroupDesign {
            key_field,
            header: None,
            footer: None,
            toc_label: None,
        }
    }
}

// ============================================================================
// BANDS, ROWS, CELLS
// ============================================================================

/// Role of a table band within its table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BandType {
    Header,
    Detail,
    Footer,
    GroupHeader,
    GroupFooter,
}

/// An ordered sequence of rows playing one role inside a table.
#[derive(Debug)]
pub struct TableBandDesign {
    pub band_type: BandType,
    pub rows: Vec<RowDesign>,
    pub toc_label: Option<String>,
}

impl TableBandDesign {
    pub fn new(band_type: BandType) -> Self {
        TableBandDesign {
            band_type,
            rows: Vec::new(),
            toc_label: None,
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn row(&self, index: usize) -> Option<&RowDesign> {
        self.rows.get(index)
    }
}

/// One design row of a band.
#[derive(Debug)]
pub struct RowDesign {
    pub cells: Vec<CellDesign>,
    pub style: Option<String>,
}

impl RowDesign {
    pub fn new() -> Self {
        RowDesign {
            cells: Vec::new(),
            style: None,
        }
    }
}

impl Default for RowDesign {
    fn default() -> Self {
        Self::new()
    }
}

/// One cell of a row. Cells nest arbitrary report items, including
/// tables - that is where nested data-bound subtrees come from.
#[derive(Debug)]
pub struct CellDesign {
    /// Column ordinal within the row.
    pub column: usize,
    pub items: Vec<ReportItemDesign>,
    pub style: Option<String>,
}

impl CellDesign {
    pub fn new(column: usize) -> Self {
        CellDesign {
            column,
            items: Vec::new(),
            style: None,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
