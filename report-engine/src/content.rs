//! FILENAME: report-engine/src/content.rs
//! Content tree - the runtime instantiation of design nodes.
//!
//! Each executor produces exactly one content node mirroring its design
//! node: identity, resolved style and computed values. Content is handed
//! to the emitter as the walk proceeds and is not mutated afterwards.

use serde::Serialize;

use report_model::BandType;

/// Globally unique (within one render pass) content node id.
pub type ContentId = u64;

/// Row identifier issued by the enclosing table's scope.
pub type RowId = u64;

/// Identity shared by every content node.
#[derive(Debug, Clone, Serialize)]
pub struct ContentIdentity {
    pub id: ContentId,

    /// Name of the design node this content instantiates.
    pub design_name: String,

    /// Style resolved during execution (own style, else inherited).
    pub style: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportContent {
    pub identity: ContentIdentity,
}

#[derive(Debug, Clone, Serialize)]
pub struct TableContent {
    pub identity: ContentIdentity,

    /// True when the bound data set produced no rows.
    pub empty: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct TableBandContent {
    pub identity: ContentIdentity,
    pub band_type: BandType,

    /// Grouping level for group bands, outermost = 0.
    pub group_level: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RowContent {
    pub identity: ContentIdentity,
    pub row_id: RowId,

    /// Set on exactly one row per group-header activation: the
    /// structurally first row produced in that activation.
    pub start_of_group: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct CellContent {
    pub identity: ContentIdentity,
    pub column: usize,
}

/// Resolved text of a label or data item.
#[derive(Debug, Clone, Serialize)]
pub struct TextContent {
    pub identity: ContentIdentity,
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExtendedContent {
    pub identity: ContentIdentity,
    pub extension_name: String,

    /// True when the extension never initialized; the item renders as
    /// empty instead of aborting the document.
    pub inert: bool,
}

/// One node of the content tree.
#[derive(Debug, Clone, Serialize)]
pub enum Content {
    Report(ReportContent),
    Table(TableContent),
    Band(TableBandContent),
    Row(RowContent),
    Cell(CellContent),
    Text(TextContent),
    Extended(ExtendedContent),
}

impl Content {
    pub fn identity(&self) -> &ContentIdentity {
        match self {
            Content::Report(c) => &c.identity,
            Content::Table(c) => &c.identity,
            Content::Band(c) => &c.identity,
            Content::Row(c) => &c.identity,
            Content::Cell(c) => &c.identity,
            Content::Text(c) => &c.identity,
            Content::Extended(c) => &c.identity,
        }
    }

    pub fn id(&self) -> ContentId {
        self.identity().id
    }

    pub fn design_name(&self) -> &str {
        &self.identity().design_name
    }
}
