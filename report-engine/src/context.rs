//! FILENAME: report-engine/src/context.rs
//! Execution context - per-render-pass shared state.
//!
//! One context lives exactly as long as one render pass. It owns the
//! active cursor-frame stack, the TOC builder, the emitter handle, the
//! row-id scopes and the content-id counter. Executors receive it by
//! mutable reference; nothing in here is synchronized because a render
//! pass is a single logical thread of control.

use rustc_hash::FxHashMap;

use crate::content::{Content, ContentId, RowId};
use crate::cursor::{CursorPosition, CursorValue, DataCursor};
use crate::emitter::{emit_end, emit_start, ContentEmitter};
use crate::error::EngineError;
use crate::toc::TocBuilder;

/// Index of an open cursor frame, counted from the bottom of the stack.
pub type FrameId = usize;

/// Handle to one table activation's row-id counter.
pub type RowScope = usize;

/// One level of the active cursor stack: the cursor of a data-bound
/// node that is currently executing, plus the position its subtree is
/// expected to observe.
struct CursorFrame {
    data_set: String,
    cursor: Box<dyn DataCursor>,
    saved: CursorPosition,
}

// ============================================================================
// RENDER CONTEXT
// ============================================================================

/// Mutable surface handed to user-supplied lifecycle handlers.
#[derive(Debug, Default)]
pub struct RenderContext {
    globals: FxHashMap<String, String>,
}

impl RenderContext {
    pub fn set_global(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.globals.insert(name.into(), value.into());
    }

    pub fn global(&self, name: &str) -> Option<&str> {
        self.globals.get(name).map(String::as_str)
    }
}

// ============================================================================
// EXECUTION CONTEXT
// ============================================================================

pub struct ExecutionContext<'a> {
    emitter: &'a mut dyn ContentEmitter,

    /// Navigation tree built alongside the content tree.
    pub toc: TocBuilder,

    /// Mutable surface for lifecycle handlers.
    pub render: RenderContext,

    /// Cursors supplied by the host, keyed by data-set name. A cursor is
    /// moved onto the frame stack while its data set is active and moved
    /// back when the owning executor closes, so a later activation of
    /// the same data set (nested report re-run) finds it again.
    data_sets: FxHashMap<String, Box<dyn DataCursor>>,

    frames: Vec<CursorFrame>,

    /// Row-id counters, one per table activation.
    row_scopes: Vec<RowId>,

    content_seq: ContentId,
}

impl<'a> ExecutionContext<'a> {
    pub fn new(emitter: &'a mut dyn ContentEmitter) -> Self {
        ExecutionContext {
            emitter,
            toc: TocBuilder::new(),
            render: RenderContext::default(),
            data_sets: FxHashMap::default(),
            frames: Vec::new(),
            row_scopes: Vec::new(),
            content_seq: 0,
        }
    }

    /// Registers an already-open cursor for one data set.
    pub fn with_data_set(mut self, name: impl Into<String>, cursor: Box<dyn DataCursor>) -> Self {
        self.data_sets.insert(name.into(), cursor);
        self
    }

    pub fn add_data_set(&mut self, name: impl Into<String>, cursor: Box<dyn DataCursor>) {
        self.data_sets.insert(name.into(), cursor);
    }

    // ========================================================================
    // EMITTER
    // ========================================================================

    pub fn emit_start(&mut self, content: &Content) -> Result<(), EngineError> {
        emit_start(self.emitter, content).map_err(|source| EngineError::Emit {
            node: content.design_name().to_string(),
            source,
        })
    }

    pub fn emit_end(&mut self, content: &Content) -> Result<(), EngineError> {
        emit_end(self.emitter, content).map_err(|source| EngineError::Emit {
            node: content.design_name().to_string(),
            source,
        })
    }

    // ========================================================================
    // CURSOR STACK
    // ========================================================================

    /// Pushes the named data set's cursor onto the frame stack. The
    /// frame's recorded position starts at the cursor's current row.
    /// A missing data set is fatal to the pass.
    pub fn open_cursor(&mut self, data_set: &str, node: &str) -> Result<FrameId, EngineError> {
        let cursor = self
            .data_sets
            .remove(data_set)
            .ok_or_else(|| EngineError::cursor(node, format!("no cursor for data set '{}'", data_set)))?;

        let saved = cursor.position();
        let id = self.frames.len();
        self.frames.push(CursorFrame {
            data_set: data_set.to_string(),
            cursor,
            saved,
        });
        log::debug!("opened cursor frame {} for data set '{}'", id, data_set);
        Ok(id)
    }

    /// Pops the topmost frame and hands its cursor back for later
    /// re-activation. Executors close frames in strict reverse order of
    /// opening, so `frame` is always the top.
    pub fn close_cursor(&mut self, frame: FrameId) {
        debug_assert_eq!(frame + 1, self.frames.len());
        if let Some(frame) = self.frames.pop() {
            log::debug!("closed cursor frame for data set '{}'", frame.data_set);
            self.data_sets.insert(frame.data_set, frame.cursor);
        }
    }

    /// Snapshots the frame cursor's current position as the row the
    /// owning node's subtree expects to observe.
    pub fn record_position(&mut self, frame: FrameId) {
        if let Some(frame) = self.frames.get_mut(frame) {
            frame.saved = frame.cursor.position();
        }
    }

    /// Repositions the frame's cursor to the last recorded position.
    ///
    /// Mandatory before a node under a data-bound ancestor begins
    /// producing content: a sibling subtree may have advanced or
    /// replaced the cursor in the meantime. Idempotent - restoring twice
    /// without an intervening mutation is a no-op.
    pub fn restore_result_set(&mut self, frame: FrameId, node: &str) -> Result<(), EngineError> {
        let frame = self
            .frames
            .get_mut(frame)
            .ok_or_else(|| EngineError::cursor(node, "cursor frame no longer open"))?;
        frame
            .cursor
            .restore_to(frame.saved)
            .map_err(|e| EngineError::cursor(node, e.to_string()))
    }

    /// Direct access to a frame's cursor. The owning table executor uses
    /// this to advance through rows and probe group boundaries.
    pub fn frame_cursor(&mut self, frame: FrameId) -> Option<&mut (dyn DataCursor + 'static)> {
        self.frames.get_mut(frame).map(|f| &mut *f.cursor)
    }

    /// Value of one field of the frame's current row.
    pub fn cursor_value(&self, frame: FrameId, field: usize) -> CursorValue {
        self.frames
            .get(frame)
            .map(|f| f.cursor.value(field))
            .unwrap_or(CursorValue::Empty)
    }

    /// Recorded position of a frame.
    pub fn saved_position(&self, frame: FrameId) -> Option<CursorPosition> {
        self.frames.get(frame).map(|f| f.saved)
    }

    // ========================================================================
    // ID ISSUANCE
    // ========================================================================

    /// Opens a fresh row-id counter for one table activation.
    pub fn open_row_scope(&mut self) -> RowScope {
        self.row_scopes.push(0);
        self.row_scopes.len() - 1
    }

    /// Next row id within a table's scope. Strictly increasing, no gaps.
    pub fn next_row_id(&mut self, scope: RowScope) -> RowId {
        let counter = &mut self.row_scopes[scope];
        let id = *counter;
        *counter += 1;
        id
    }

    pub fn next_content_id(&mut self) -> ContentId {
        self.content_seq += 1;
        self.content_seq
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::VecCursor;
    use crate::emitter::NullEmitter;

    fn cursor_with_rows(n: usize) -> Box<VecCursor> {
        let rows = (0..n)
            .map(|i| vec![CursorValue::Number(i as f64)])
            .collect();
        Box::new(VecCursor::new(rows))
    }

    #[test]
    fn test_restore_result_set_is_idempotent() {
        let mut emitter = NullEmitter;
        let mut ctx = ExecutionContext::new(&mut emitter)
            .with_data_set("orders", cursor_with_rows(4));

        let frame = ctx.open_cursor("orders", "t").unwrap();
        let cursor = ctx.frame_cursor(frame).unwrap();
        cursor.advance();
        cursor.advance();
        ctx.record_position(frame);

        // A sibling subtree moves the cursor elsewhere.
        ctx.frame_cursor(frame).unwrap().restore_to(0).unwrap();

        ctx.restore_result_set(frame, "t").unwrap();
        assert_eq!(ctx.frame_cursor(frame).unwrap().position(), 2);

        // Second restore with no intervening mutation changes nothing.
        ctx.restore_result_set(frame, "t").unwrap();
        assert_eq!(ctx.frame_cursor(frame).unwrap().position(), 2);
    }

    #[test]
    fn test_record_position_snapshots_the_current_row() {
        let mut emitter = NullEmitter;
        let mut ctx = ExecutionContext::new(&mut emitter)
            .with_data_set("orders", cursor_with_rows(3));

        let frame = ctx.open_cursor("orders", "t").unwrap();
        assert_eq!(ctx.saved_position(frame), Some(0));

        // Moving the cursor alone does not move the snapshot.
        ctx.frame_cursor(frame).unwrap().advance();
        assert_eq!(ctx.saved_position(frame), Some(0));

        ctx.record_position(frame);
        assert_eq!(ctx.saved_position(frame), Some(1));
    }

    #[test]
    fn test_missing_data_set_is_a_cursor_fault() {
        let mut emitter = NullEmitter;
        let mut ctx = ExecutionContext::new(&mut emitter);

        let err = ctx.open_cursor("orders", "t").unwrap_err();
        assert!(matches!(err, EngineError::Cursor { .. }));
    }

    #[test]
    fn test_closed_cursor_can_be_reactivated() {
        let mut emitter = NullEmitter;
        let mut ctx = ExecutionContext::new(&mut emitter)
            .with_data_set("orders", cursor_with_rows(2));

        let frame = ctx.open_cursor("orders", "t").unwrap();
        ctx.frame_cursor(frame).unwrap().advance();
        ctx.close_cursor(frame);

        // A later activation of the same data set finds the cursor
        // where the previous one left it.
        let frame = ctx.open_cursor("orders", "t").unwrap();
        assert_eq!(ctx.frame_cursor(frame).unwrap().position(), 1);
    }

    #[test]
    fn test_row_ids_are_gap_free_per_scope() {
        let mut emitter = NullEmitter;
        let mut ctx = ExecutionContext::new(&mut emitter);

        let outer = ctx.open_row_scope();
        let inner = ctx.open_row_scope();

        assert_eq!(ctx.next_row_id(outer), 0);
        assert_eq!(ctx.next_row_id(inner), 0);
        assert_eq!(ctx.next_row_id(outer), 1);
        assert_eq!(ctx.next_row_id(outer), 2);
        assert_eq!(ctx.next_row_id(inner), 1);
    }

    #[test]
    fn test_content_ids_are_unique() {
        let mut emitter = NullEmitter;
        let mut ctx = ExecutionContext::new(&mut emitter);
        let a = ctx.next_content_id();
        let b = ctx.next_content_id();
        assert_ne!(a, b);
    }
}
