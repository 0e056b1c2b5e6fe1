//! FILENAME: report-engine/src/emitter.rs
//! Content emitter - the external sink the executor tree streams into.
//!
//! The driver announces every content node twice: once when the node is
//! opened (`start_*`) and once when it is closed (`end_*`), in strict
//! depth-first order. Emitters may block on output and may signal a
//! fault; the engine propagates it tied to the node being emitted.

use crate::content::{
    CellContent, Content, ExtendedContent, ReportContent, RowContent,
    TableBandContent, TableContent, TextContent,
};
use crate::error::EmitError;

/// One start and one end notification per structural node kind. All
/// methods default to doing nothing so emitters only override the kinds
/// they render.
pub trait ContentEmitter {
    fn start_report(&mut self, _content: &ReportContent) -> Result<(), EmitError> {
        Ok(())
    }
    fn end_report(&mut self, _content: &ReportContent) -> Result<(), EmitError> {
        Ok(())
    }

    fn start_table(&mut self, _content: &TableContent) -> Result<(), EmitError> {
        Ok(())
    }
    fn end_table(&mut self, _content: &TableContent) -> Result<(), EmitError> {
        Ok(())
    }

    fn start_table_band(&mut self, _content: &TableBandContent) -> Result<(), EmitError> {
        Ok(())
    }
    fn end_table_band(&mut self, _content: &TableBandContent) -> Result<(), EmitError> {
        Ok(())
    }

    fn start_row(&mut self, _content: &RowContent) -> Result<(), EmitError> {
        Ok(())
    }
    fn end_row(&mut self, _content: &RowContent) -> Result<(), EmitError> {
        Ok(())
    }

    fn start_cell(&mut self, _content: &CellContent) -> Result<(), EmitError> {
        Ok(())
    }
    fn end_cell(&mut self, _content: &CellContent) -> Result<(), EmitError> {
        Ok(())
    }

    fn start_text(&mut self, _content: &TextContent) -> Result<(), EmitError> {
        Ok(())
    }
    fn end_text(&mut self, _content: &TextContent) -> Result<(), EmitError> {
        Ok(())
    }

    fn start_extended(&mut self, _content: &ExtendedContent) -> Result<(), EmitError> {
        Ok(())
    }
    fn end_extended(&mut self, _content: &ExtendedContent) -> Result<(), EmitError> {
        Ok(())
    }
}

/// Routes one content node to the matching start callback.
pub fn emit_start(emitter: &mut dyn ContentEmitter, content: &Content) -> Result<(), EmitError> {
    match content {
        Content::Report(c) => emitter.start_report(c),
        Content::Table(c) => emitter.start_table(c),
        Content::Band(c) => emitter.start_table_band(c),
        Content::Row(c) => emitter.start_row(c),
        Content::Cell(c) => emitter.start_cell(c),
        Content::Text(c) => emitter.start_text(c),
        Content::Extended(c) => emitter.start_extended(c),
    }
}

/// Routes one content node to the matching end callback.
pub fn emit_end(emitter: &mut dyn ContentEmitter, content: &Content) -> Result<(), EmitError> {
    match content {
        Content::Report(c) => emitter.end_report(c),
        Content::Table(c) => emitter.end_table(c),
        Content::Band(c) => emitter.end_table_band(c),
        Content::Row(c) => emitter.end_row(c),
        Content::Cell(c) => emitter.end_cell(c),
        Content::Text(c) => emitter.end_text(c),
        Content::Extended(c) => emitter.end_extended(c),
    }
}

/// Emitter that discards everything. Useful when only the TOC or the
/// side effects of a pass are of interest.
#[derive(Debug, Default)]
pub struct NullEmitter;

impl ContentEmitter for NullEmitter {}
