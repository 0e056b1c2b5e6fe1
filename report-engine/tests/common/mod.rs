//! FILENAME: tests/common/mod.rs
//! Test harness and fixtures for report-engine integration tests.

use report_engine::content::{
    CellContent, ExtendedContent, ReportContent, RowContent, TableBandContent,
    TableContent, TextContent,
};
use report_engine::{ContentEmitter, CursorValue, EmitError, RowId, VecCursor};
use report_model::{
    BandType, CellDesign, DataItemDesign, LabelDesign, ReportDesign,
    ReportItemDesign, RowDesign, TableBandDesign, TableDesign, TableGroupDesign,
};

// ============================================================================
// RECORDING EMITTER
// ============================================================================

/// Emitter that records every notification as a compact event string,
/// in arrival order. Optionally fails the start notification of one row
/// to exercise fault unwinding.
#[derive(Default)]
pub struct RecordingEmitter {
    pub events: Vec<String>,
    pub fail_on_row: Option<RowId>,
}

impl RecordingEmitter {
    pub fn new() -> Self {
        RecordingEmitter::default()
    }

    pub fn failing_on_row(row_id: RowId) -> Self {
        RecordingEmitter {
            events: Vec::new(),
            fail_on_row: Some(row_id),
        }
    }

    /// Text payloads in emission order.
    pub fn texts(&self) -> Vec<String> {
        self.events
            .iter()
            .filter_map(|e| {
                e.strip_prefix("start-text(")
                    .and_then(|rest| rest.strip_suffix(')'))
                    .map(str::to_string)
            })
            .collect()
    }

    /// Band descriptors in emission order, e.g. "Detail" or
    /// "GroupHeader:0".
    pub fn bands(&self) -> Vec<String> {
        self.events
            .iter()
            .filter_map(|e| {
                e.strip_prefix("start-band(")
                    .and_then(|rest| rest.strip_suffix(')'))
                    .map(str::to_string)
            })
            .collect()
    }

    /// Row ids in emission order.
    pub fn row_ids(&self) -> Vec<RowId> {
        self.events
            .iter()
            .filter_map(|e| {
                let rest = e.strip_prefix("start-row(")?;
                let rest = rest.strip_suffix(')')?;
                rest.split(',').next()?.parse().ok()
            })
            .collect()
    }

    /// Row ids whose start notification carried the group-start flag.
    pub fn group_start_rows(&self) -> Vec<RowId> {
        self.events
            .iter()
            .filter_map(|e| {
                let rest = e.strip_prefix("start-row(")?;
                let rest = rest.strip_suffix(",start)")?;
                rest.parse().ok()
            })
            .collect()
    }

    fn record(&mut self, event: String) {
        self.events.push(event);
    }
}

fn band_descriptor(content: &TableBandContent) -> String {
    match content.group_level {
        Some(level) => format!("{:?}:{}", content.band_type, level),
        None => format!("{:?}", content.band_type),
    }
}

impl ContentEmitter for RecordingEmitter {
    fn start_report(&mut self, _content: &ReportContent) -> Result<(), EmitError> {
        self.record("start-report".to_string());
        Ok(())
    }

    fn end_report(&mut self, _content: &ReportContent) -> Result<(), EmitError> {
        self.record("end-report".to_string());
        Ok(())
    }

    fn start_table(&mut self, content: &TableContent) -> Result<(), EmitError> {
        let marker = if content.empty { ",empty" } else { "" };
        self.record(format!(
            "start-table({}{})",
            content.identity.design_name, marker
        ));
        Ok(())
    }

    fn end_table(&mut self, content: &TableContent) -> Result<(), EmitError> {
        self.record(format!("end-table({})", content.identity.design_name));
        Ok(())
    }

    fn start_table_band(&mut self, content: &TableBandContent) -> Result<(), EmitError> {
        self.record(format!("start-band({})", band_descriptor(content)));
        Ok(())
    }

    fn end_table_band(&mut self, content: &TableBandContent) -> Result<(), EmitError> {
        self.record(format!("end-band({})", band_descriptor(content)));
        Ok(())
    }

    fn start_row(&mut self, content: &RowContent) -> Result<(), EmitError> {
        if self.fail_on_row == Some(content.row_id) {
            return Err(EmitError(format!("sink rejected row {}", content.row_id)));
        }
        let marker = if content.start_of_group { ",start" } else { "" };
        self.record(format!("start-row({}{})", content.row_id, marker));
        Ok(())
    }

    fn end_row(&mut self, content: &RowContent) -> Result<(), EmitError> {
        self.record(format!("end-row({})", content.row_id));
        Ok(())
    }

    fn start_cell(&mut self, content: &CellContent) -> Result<(), EmitError> {
        self.record(format!("start-cell({})", content.column));
        Ok(())
    }

    fn end_cell(&mut self, content: &CellContent) -> Result<(), EmitError> {
        self.record(format!("end-cell({})", content.column));
        Ok(())
    }

    fn start_text(&mut self, content: &TextContent) -> Result<(), EmitError> {
        self.record(format!("start-text({})", content.text));
        Ok(())
    }

    fn end_text(&mut self, content: &TextContent) -> Result<(), EmitError> {
        self.record(format!("end-text({})", content.text));
        Ok(())
    }

    fn start_extended(&mut self, content: &ExtendedContent) -> Result<(), EmitError> {
        self.record(format!("start-extended({})", content.extension_name));
        Ok(())
    }

    fn end_extended(&mut self, content: &ExtendedContent) -> Result<(), EmitError> {
        self.record(format!("end-extended({})", content.extension_name));
        Ok(())
    }
}

/// Asserts that every start notification kind was closed as often as it
/// was opened.
pub fn assert_balanced(events: &[String]) {
    let count = |prefix: &str, kind: &str| {
        events
            .iter()
            .filter(|e| {
                e.strip_prefix(prefix)
                    .map(|rest| rest == kind || rest.starts_with(&format!("{}(", kind)))
                    .unwrap_or(false)
            })
            .count()
    };
    for kind in ["report", "table", "band", "row", "cell", "text", "extended"] {
        assert_eq!(
            count("start-", kind),
            count("end-", kind),
            "unbalanced {} notifications: {:?}",
            kind,
            events
        );
    }
}

// ============================================================================
// DESIGN BUILDERS
// ============================================================================

/// A band with the given rows.
pub fn band_of(band_type: BandType, rows: Vec<RowDesign>) -> TableBandDesign {
    let mut band = TableBandDesign::new(band_type);
    band.rows = rows;
    band
}

/// A row placing each item in its own cell, in order.
pub fn row_of(items: Vec<ReportItemDesign>) -> RowDesign {
    let mut row = RowDesign::new();
    for (column, item) in items.into_iter().enumerate() {
        let mut cell = CellDesign::new(column);
        cell.items.push(item);
        row.cells.push(cell);
    }
    row
}

pub fn label(name: &str, text: &str) -> ReportItemDesign {
    ReportItemDesign::Label(LabelDesign::new(name, text))
}

pub fn data_item(name: &str, field: usize) -> ReportItemDesign {
    ReportItemDesign::Data(DataItemDesign::new(name, field))
}

// ============================================================================
// SALES FIXTURE
// ============================================================================

/// Canonical grouped-report fixture: sales rows grouped by region.
///
/// Columns: 0 = region, 1 = product, 2 = amount.
pub struct SalesFixture;

impl SalesFixture {
    pub fn rows() -> Vec<(&'static str, &'static str, f64)> {
        vec![
            ("North", "Apples", 10.0),
            ("North", "Pears", 20.0),
            ("South", "Apples", 30.0),
        ]
    }

    pub fn cursor() -> Box<VecCursor> {
        let rows = Self::rows()
            .into_iter()
            .map(|(region, product, amount)| {
                vec![
                    CursorValue::Text(region.to_string()),
                    CursorValue::Text(product.to_string()),
                    CursorValue::Number(amount),
                ]
            })
            .collect();
        Box::new(VecCursor::new(rows))
    }

    /// Report with one table grouped by region: a group header and
    /// footer showing the region, a detail row showing product and
    /// amount, and a table footer label.
    pub fn design() -> ReportDesign {
        let mut table = TableDesign::new("sales-table");
        table.data_set = Some("sales".to_string());
        table.toc_label = Some("Sales".to_string());

        let mut group = TableGroupDesign::new(0);
        group.toc_label = Some("Region".to_string());
        group.header = Some(band_of(
            BandType::GroupHeader,
            vec![row_of(vec![data_item("region-head", 0)])],
        ));
        group.footer = Some(band_of(
            BandType::GroupFooter,
            vec![row_of(vec![data_item("region-foot", 0)])],
        ));
        table.groups.push(group);

        table.detail = Some(band_of(
            BandType::Detail,
            vec![row_of(vec![data_item("product", 1), data_item("amount", 2)])],
        ));
        table.footer = Some(band_of(
            BandType::Footer,
            vec![row_of(vec![label("total", "Total")])],
        ));

        let mut design = ReportDesign::new("sales", "3.2.1");
        design.items.push(ReportItemDesign::Table(table));
        design
    }
}
