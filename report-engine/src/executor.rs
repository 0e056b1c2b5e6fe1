//! FILENAME: report-engine/src/executor.rs
//! Executor family - the units that interpret design nodes against data.
//!
//! One executor exists per design-node activation per render pass. All
//! variants share the same state-machine contract:
//!
//!   Created --execute()--> Started --get_next_child()--> Iterating --close()--> Closed
//!
//! `execute` builds the content node, opens the TOC entry, restores the
//! data cursor and announces the node to the emitter. `has_next_child` /
//! `get_next_child` form a finite, non-restartable lazy sequence of
//! child executors. `close` pairs every open notification, and is safe
//! after a partial failure as long as content was produced.
//!
//! The table variant drives the streaming grouping machine: header,
//! then per data row the group headers / detail band, group footers on
//! key change evaluated against the row that ended the group, and the
//! table footer after the last row.

use std::collections::VecDeque;

use smallvec::SmallVec;

use report_model::{
    BandType, CellDesign, DataItemDesign, ExtendedItemDesign, LabelDesign,
    ReportDesign, ReportItemDesign, RowDesign, TableBandDesign, TableDesign,
    TableGroupDesign,
};

use crate::content::{
    CellContent, Content, ContentIdentity, ExtendedContent, ReportContent,
    RowContent, RowId, TableBandContent, TableContent, TextContent,
};
use crate::context::{ExecutionContext, FrameId, RowScope};
use crate::cursor::{CursorPosition, CursorValue};
use crate::error::EngineError;
use crate::script::{LifecyclePhase, ScriptDispatcher};
use crate::toc::TocNodeId;

// ============================================================================
// STATE MACHINE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutorState {
    Created,
    Started,
    Iterating,
    Closed,
}

/// State a child executor inherits from its parent at creation time.
#[derive(Debug, Clone, Default)]
pub struct Inherited {
    /// Cursor frame of the nearest data-bound ancestor.
    pub frame: Option<FrameId>,

    /// Row-id scope of the nearest enclosing table activation.
    pub scope: Option<RowScope>,

    /// Style resolved by the parent, inherited when a node has none.
    pub style: Option<String>,
}

// ============================================================================
// TABLE STEPS
// ============================================================================

/// One band activation the table executor has committed to produce.
#[derive(Debug)]
struct TableStep<'d> {
    band: &'d TableBandDesign,
    group_level: Option<usize>,

    /// Cursor position the band (and its subtree) must observe. The
    /// frame's recorded position is moved here when the step is yielded.
    at: Option<CursorPosition>,

    /// TOC label resolved at enqueue time (group labels embed the key
    /// value of the row that opened the group).
    toc_label: Option<String>,
}

// ============================================================================
// EXECUTOR VARIANTS
// ============================================================================

#[derive(Debug)]
enum ExecutorKind<'d> {
    Report {
        design: &'d ReportDesign,
        item_cursor: usize,
    },
    Table {
        design: &'d TableDesign,
        /// Frame opened for this table's own data set.
        own_frame: Option<FrameId>,
        /// Frame visible to children (own frame, else inherited).
        frame: Option<FrameId>,
        scope: Option<RowScope>,
        queue: VecDeque<TableStep<'d>>,
        /// True while data rows may still add steps to the queue.
        rows_pending: bool,
        /// Position of the data row currently being walked.
        current_row_pos: CursorPosition,
    },
    Band {
        design: &'d TableBandDesign,
        group_level: Option<usize>,
        current_row: usize,
    },
    Row {
        design: &'d RowDesign,
        row_id: RowId,
        start_of_group: bool,
        cell_cursor: usize,
    },
    Cell {
        design: &'d CellDesign,
        item_cursor: usize,
    },
    Label {
        design: &'d LabelDesign,
    },
    Data {
        design: &'d DataItemDesign,
    },
    Extended {
        design: &'d ExtendedItemDesign,
    },
}

/// Runtime unit interpreting one design node.
#[derive(Debug)]
pub struct ReportItemExecutor<'d> {
    state: ExecutorState,
    kind: ExecutorKind<'d>,
    inherited: Inherited,

    /// TOC label resolved at creation (band steps may override the
    /// design's own label).
    toc_label: Option<String>,

    content: Option<Content>,
    toc_entry: Option<TocNodeId>,
    emitted: bool,
}

// ============================================================================
// EXECUTOR MANAGER
// ============================================================================

/// Factory instantiating the correct executor variant for a design node
/// and wiring the inherited parent state.
pub struct ExecutorManager;

impl ExecutorManager {
    pub fn create_report_executor(design: &ReportDesign) -> ReportItemExecutor<'_> {
        ReportItemExecutor::new(
            ExecutorKind::Report {
                design,
                item_cursor: 0,
            },
            Inherited::default(),
            None,
        )
    }

    pub fn create_item_executor<'d>(
        item: &'d ReportItemDesign,
        inherited: Inherited,
    ) -> ReportItemExecutor<'d> {
        match item {
            ReportItemDesign::Table(design) => ReportItemExecutor::new(
                ExecutorKind::Table {
                    design,
                    own_frame: None,
                    frame: None,
                    scope: None,
                    queue: VecDeque::new(),
                    rows_pending: false,
                    current_row_pos: 0,
                },
                inherited,
                design.toc_label.clone(),
            ),
            ReportItemDesign::Label(design) => ReportItemExecutor::new(
                ExecutorKind::Label { design },
                inherited,
                design.toc_label.clone(),
            ),
            ReportItemDesign::Data(design) => {
                ReportItemExecutor::new(ExecutorKind::Data { design }, inherited, None)
            }
            ReportItemDesign::ExtendedItem(design) => {
                ReportItemExecutor::new(ExecutorKind::Extended { design }, inherited, None)
            }
        }
    }

    pub fn create_band_executor<'d>(
        band: &'d TableBandDesign,
        group_level: Option<usize>,
        toc_label: Option<String>,
        inherited: Inherited,
    ) -> ReportItemExecutor<'d> {
        let label = toc_label.or_else(|| band.toc_label.clone());
        ReportItemExecutor::new(
            ExecutorKind::Band {
                design: band,
                group_level,
                current_row: 0,
            },
            inherited,
            label,
        )
    }

    fn create_row_executor<'d>(
        row: &'d RowDesign,
        row_id: RowId,
        start_of_group: bool,
        inherited: Inherited,
    ) -> ReportItemExecutor<'d> {
        ReportItemExecutor::new(
            ExecutorKind::Row {
                design: row,
                row_id,
                start_of_group,
                cell_cursor: 0,
            },
            inherited,
            None,
        )
    }

    fn create_cell_executor<'d>(
        cell: &'d CellDesign,
        inherited: Inherited,
    ) -> ReportItemExecutor<'d> {
        ReportItemExecutor::new(
            ExecutorKind::Cell {
                design: cell,
                item_cursor: 0,
            },
            inherited,
            None,
        )
    }
}

// ============================================================================
// EXECUTOR IMPLEMENTATION
// ============================================================================

impl<'d> ReportItemExecutor<'d> {
    fn new(kind: ExecutorKind<'d>, inherited: Inherited, toc_label: Option<String>) -> Self {
        ReportItemExecutor {
            state: ExecutorState::Created,
            kind,
            inherited,
            toc_label,
            content: None,
            toc_entry: None,
            emitted: false,
        }
    }

    pub fn state(&self) -> ExecutorState {
        self.state
    }

    pub fn content(&self) -> Option<&Content> {
        self.content.as_ref()
    }

    /// Design-time name used in content identities and fault messages.
    fn design_name(&self) -> String {
        match &self.kind {
            ExecutorKind::Report { design, .. } => design.name.clone(),
            ExecutorKind::Table { design, .. } => design.name.clone(),
            ExecutorKind::Band { design, .. } => match design.band_type {
                BandType::Header => "header-band".to_string(),
                BandType::Detail => "detail-band".to_string(),
                BandType::Footer => "footer-band".to_string(),
                BandType::GroupHeader => "group-header-band".to_string(),
                BandType::GroupFooter => "group-footer-band".to_string(),
            },
            ExecutorKind::Row { .. } => "row".to_string(),
            ExecutorKind::Cell { design, .. } => format!("cell-{}", design.column),
            ExecutorKind::Label { design } => design.name.clone(),
            ExecutorKind::Data { design } => design.name.clone(),
            ExecutorKind::Extended { design } => design.name.clone(),
        }
    }

    fn own_style(&self) -> Option<&str> {
        match &self.kind {
            ExecutorKind::Table { design, .. } => design.style.as_deref(),
            ExecutorKind::Row { design, .. } => design.style.as_deref(),
            ExecutorKind::Cell { design, .. } => design.style.as_deref(),
            ExecutorKind::Label { design } => design.style.as_deref(),
            ExecutorKind::Data { design } => design.style.as_deref(),
            ExecutorKind::Extended { design } => design.style.as_deref(),
            _ => None,
        }
    }

    /// Style this node resolves to: its own, else the inherited one.
    fn resolved_style(&self) -> Option<String> {
        self.own_style()
            .map(str::to_string)
            .or_else(|| self.inherited.style.clone())
    }

    // ========================================================================
    // EXECUTE
    // ========================================================================

    /// Created -> Started. Builds the content node, opens the TOC entry,
    /// restores the ancestor cursor and fires the emitter's start
    /// callback. Returns the produced content.
    pub fn execute(&mut self, ctx: &mut ExecutionContext) -> Result<&Content, EngineError> {
        debug_assert_eq!(self.state, ExecutorState::Created);
        let name = self.design_name();

        // The cursor is shared mutable state walked depth-first: a
        // sibling subtree may have moved it since the ancestor recorded
        // its position.
        if let Some(frame) = self.inherited.frame {
            ctx.restore_result_set(frame, &name)?;
        }

        let identity = ContentIdentity {
            id: ctx.next_content_id(),
            design_name: name,
            style: self.resolved_style(),
        };

        let content = match &mut self.kind {
            ExecutorKind::Report { .. } => Content::Report(ReportContent { identity }),

            ExecutorKind::Table {
                design,
                own_frame,
                frame,
                scope,
                queue,
                rows_pending,
                current_row_pos,
            } => {
                let design: &'d TableDesign = *design;
                let opened = match &design.data_set {
                    Some(data_set) => Some(ctx.open_cursor(data_set, &design.name)?),
                    None => None,
                };
                *own_frame = opened;
                *frame = opened.or(self.inherited.frame);
                *scope = Some(ctx.open_row_scope());

                let has_rows = match opened {
                    Some(f) => ctx
                        .frame_cursor(f)
                        .map(|c| c.has_rows())
                        .unwrap_or(false),
                    None => false,
                };

                if has_rows {
                    let f = opened.unwrap_or_default();
                    *current_row_pos = ctx
                        .frame_cursor(f)
                        .map(|c| c.position())
                        .unwrap_or(0);
                    *rows_pending = true;
                }

                let row_at = has_rows.then_some(*current_row_pos);
                if let Some(header) = &design.header {
                    push_band_step(queue, header, BandType::Header, None, row_at, None)?;
                }
                if has_rows {
                    for (level, group) in design.groups.iter().enumerate() {
                        if let Some(band) = &group.header {
                            let label = group_toc_label(ctx, *frame, group);
                            push_band_step(
                                queue,
                                band,
                                BandType::GroupHeader,
                                Some(level),
                                row_at,
                                label,
                            )?;
                        }
                    }
                    if let Some(detail) = &design.detail {
                        push_band_step(queue, detail, BandType::Detail, None, row_at, None)?;
                    }
                } else if let Some(footer) = &design.footer {
                    push_band_step(queue, footer, BandType::Footer, None, None, None)?;
                }

                Content::Table(TableContent {
                    identity,
                    empty: !has_rows,
                })
            }

            ExecutorKind::Band {
                design,
                group_level,
                ..
            } => Content::Band(TableBandContent {
                identity,
                band_type: design.band_type,
                group_level: *group_level,
            }),

            ExecutorKind::Row {
                row_id,
                start_of_group,
                ..
            } => Content::Row(RowContent {
                identity,
                row_id: *row_id,
                start_of_group: *start_of_group,
            }),

            ExecutorKind::Cell { design, .. } => Content::Cell(CellContent {
                identity,
                column: design.column,
            }),

            ExecutorKind::Label { design } => Content::Text(TextContent {
                identity,
                text: design.text.clone(),
            }),

            ExecutorKind::Data { design } => {
                let frame = self.inherited.frame.ok_or_else(|| {
                    EngineError::structural(&design.name, "data item outside a data-bound scope")
                })?;
                let value = ctx.cursor_value(frame, design.field);
                Content::Text(TextContent {
                    identity,
                    text: value.display(),
                })
            }

            ExecutorKind::Extended { design } => Content::Extended(ExtendedContent {
                identity,
                extension_name: design.extension_name.clone(),
                inert: design.is_inert(),
            }),
        };

        // A table with data rows but no per-row bands still has to walk
        // the cursor to find its footer position.
        self.refill_table_queue(ctx)?;

        if let Some(label) = self.toc_label.clone() {
            self.toc_entry = Some(ctx.toc.open_entry(label, content.id()));
        }

        ctx.emit_start(&content)?;
        self.emitted = true;
        self.content = Some(content);
        self.state = ExecutorState::Started;

        Ok(self.content.as_ref().expect("content just set"))
    }

    // ========================================================================
    // CHILD PRODUCTION
    // ========================================================================

    /// True while unconsumed structural children remain. Idempotent and
    /// side-effect-free.
    pub fn has_next_child(&self) -> bool {
        match &self.kind {
            ExecutorKind::Report {
                design,
                item_cursor,
            } => *item_cursor < design.items.len(),
            ExecutorKind::Table { queue, .. } => !queue.is_empty(),
            ExecutorKind::Band {
                design,
                current_row,
                ..
            } => *current_row < design.row_count(),
            ExecutorKind::Row {
                design,
                cell_cursor,
                ..
            } => *cell_cursor < design.cells.len(),
            ExecutorKind::Cell {
                design,
                item_cursor,
            } => *item_cursor < design.items.len(),
            ExecutorKind::Label { .. }
            | ExecutorKind::Data { .. }
            | ExecutorKind::Extended { .. } => false,
        }
    }

    /// Produces the next child executor, or `None` once exhausted.
    pub fn get_next_child(
        &mut self,
        ctx: &mut ExecutionContext,
    ) -> Result<Option<ReportItemExecutor<'d>>, EngineError> {
        debug_assert!(matches!(
            self.state,
            ExecutorState::Started | ExecutorState::Iterating
        ));
        self.state = ExecutorState::Iterating;
        let style = self.resolved_style();

        let child = match &mut self.kind {
            ExecutorKind::Report {
                design,
                item_cursor,
            } => {
                let design: &'d ReportDesign = *design;
                if *item_cursor >= design.items.len() {
                    return Ok(None);
                }
                let item = &design.items[*item_cursor];
                *item_cursor += 1;
                Some(ExecutorManager::create_item_executor(
                    item,
                    Inherited {
                        frame: None,
                        scope: None,
                        style,
                    },
                ))
            }

            ExecutorKind::Table { frame, scope, queue, .. } => {
                let frame = *frame;
                let scope = *scope;
                match queue.pop_front() {
                    None => None,
                    Some(step) => {
                        if let (Some(at), Some(f)) = (step.at, frame) {
                            move_frame_to(ctx, f, at, "table")?;
                        }
                        Some(ExecutorManager::create_band_executor(
                            step.band,
                            step.group_level,
                            step.toc_label,
                            Inherited {
                                frame,
                                scope,
                                style,
                            },
                        ))
                    }
                }
            }

            ExecutorKind::Band {
                design,
                current_row,
                ..
            } => {
                let design: &'d TableBandDesign = *design;
                if *current_row >= design.row_count() {
                    return Ok(None);
                }
                let index = *current_row;
                *current_row += 1;

                let row = design
                    .row(index)
                    .ok_or_else(|| EngineError::structural("band", "missing row design"))?;
                let scope = self.inherited.scope.ok_or_else(|| {
                    EngineError::structural("band", "band executed outside a table scope")
                })?;
                let row_id = ctx.next_row_id(scope);

                // The structurally first row of a group-header
                // activation starts the group.
                let start_of_group = design.band_type == BandType::GroupHeader && index == 0;

                Some(ExecutorManager::create_row_executor(
                    row,
                    row_id,
                    start_of_group,
                    Inherited {
                        frame: self.inherited.frame,
                        scope: Some(scope),
                        style,
                    },
                ))
            }

            ExecutorKind::Row {
                design,
                cell_cursor,
                ..
            } => {
                let design: &'d RowDesign = *design;
                if *cell_cursor >= design.cells.len() {
                    return Ok(None);
                }
                let cell = &design.cells[*cell_cursor];
                *cell_cursor += 1;
                Some(ExecutorManager::create_cell_executor(
                    cell,
                    Inherited {
                        frame: self.inherited.frame,
                        scope: self.inherited.scope,
                        style,
                    },
                ))
            }

            ExecutorKind::Cell {
                design,
                item_cursor,
            } => {
                let design: &'d CellDesign = *design;
                if *item_cursor >= design.items.len() {
                    return Ok(None);
                }
                let item = &design.items[*item_cursor];
                *item_cursor += 1;
                Some(ExecutorManager::create_item_executor(
                    item,
                    Inherited {
                        frame: self.inherited.frame,
                        scope: None,
                        style,
                    },
                ))
            }

            ExecutorKind::Label { .. }
            | ExecutorKind::Data { .. }
            | ExecutorKind::Extended { .. } => None,
        };

        self.refill_table_queue(ctx)?;
        Ok(child)
    }

    /// Walks the table's cursor forward until the step queue holds the
    /// next band activation (or the rows are exhausted and the closing
    /// footers are queued). No-op for non-table executors.
    fn refill_table_queue(&mut self, ctx: &mut ExecutionContext) -> Result<(), EngineError> {
        let ExecutorKind::Table {
            design,
            own_frame,
            queue,
            rows_pending,
            current_row_pos,
            ..
        } = &mut self.kind
        else {
            return Ok(());
        };
        let design: &'d TableDesign = *design;

        let Some(frame) = *own_frame else {
            return Ok(());
        };

        while queue.is_empty() && *rows_pending {
            // Children may have left the cursor anywhere.
            move_frame_to(ctx, frame, *current_row_pos, &design.name)?;

            let old_keys = group_keys(ctx, frame, design);
            let advanced = ctx
                .frame_cursor(frame)
                .map(|c| c.advance())
                .unwrap_or(false);

            if !advanced {
                // Last row: close every open group against it, then the
                // table footer.
                for (level, group) in design.groups.iter().enumerate().rev() {
                    if let Some(band) = &group.footer {
                        push_band_step(
                            queue,
                            band,
                            BandType::GroupFooter,
                            Some(level),
                            Some(*current_row_pos),
                            None,
                        )?;
                    }
                }
                if let Some(footer) = &design.footer {
                    push_band_step(
                        queue,
                        footer,
                        BandType::Footer,
                        None,
                        Some(*current_row_pos),
                        None,
                    )?;
                }
                *rows_pending = false;
                break;
            }

            let new_pos = ctx
                .frame_cursor(frame)
                .map(|c| c.position())
                .unwrap_or(*current_row_pos);
            let new_keys = group_keys(ctx, frame, design);
            let changed_level = old_keys
                .iter()
                .zip(new_keys.iter())
                .position(|(a, b)| a != b)
                .unwrap_or(design.groups.len());

            // Footers close innermost-first against the row that ended
            // the group; headers reopen outermost-first against the row
            // that starts the new one.
            for (level, group) in design.groups.iter().enumerate().rev() {
                if level < changed_level {
                    break;
                }
                if let Some(band) = &group.footer {
                    push_band_step(
                        queue,
                        band,
                        BandType::GroupFooter,
                        Some(level),
                        Some(*current_row_pos),
                        None,
                    )?;
                }
            }
            for (level, group) in design.groups.iter().enumerate() {
                if level < changed_level {
                    continue;
                }
                if let Some(band) = &group.header {
                    let label = group_toc_label(ctx, Some(frame), group);
                    push_band_step(
                        queue,
                        band,
                        BandType::GroupHeader,
                        Some(level),
                        Some(new_pos),
                        label,
                    )?;
                }
            }
            if let Some(detail) = &design.detail {
                push_band_step(queue, detail, BandType::Detail, None, Some(new_pos), None)?;
            }

            *current_row_pos = new_pos;
        }

        Ok(())
    }

    // ========================================================================
    // CLOSE
    // ========================================================================

    /// Iterating/Started -> Closed. Fires the emitter's end callback and
    /// closes the TOC entry opened in `execute`. Safe to call after a
    /// partial failure, and from the Iterating state with children left
    /// unconsumed (early cancellation).
    pub fn close(&mut self, ctx: &mut ExecutionContext) -> Result<(), EngineError> {
        if self.state == ExecutorState::Closed {
            return Ok(());
        }

        let mut result = Ok(());
        if let Some(content) = &self.content {
            if self.emitted {
                result = ctx.emit_end(content);
            }
        }
        if let Some(entry) = self.toc_entry.take() {
            ctx.toc.close_entry(entry);
        }
        if let ExecutorKind::Table { own_frame, .. } = &mut self.kind {
            if let Some(frame) = own_frame.take() {
                ctx.close_cursor(frame);
            }
        }
        self.state = ExecutorState::Closed;
        result
    }
}

// ============================================================================
// TABLE HELPERS
// ============================================================================

fn push_band_step<'d>(
    queue: &mut VecDeque<TableStep<'d>>,
    band: &'d TableBandDesign,
    expected: BandType,
    group_level: Option<usize>,
    at: Option<CursorPosition>,
    toc_label: Option<String>,
) -> Result<(), EngineError> {
    if band.band_type != expected {
        return Err(EngineError::structural(
            "table",
            format!(
                "band declared as {:?} but tagged {:?}",
                expected, band.band_type
            ),
        ));
    }
    queue.push_back(TableStep {
        band,
        group_level,
        at,
        toc_label,
    });
    Ok(())
}

/// Moves a frame's recorded position and its cursor to `position`.
fn move_frame_to(
    ctx: &mut ExecutionContext,
    frame: FrameId,
    position: CursorPosition,
    node: &str,
) -> Result<(), EngineError> {
    let cursor = ctx
        .frame_cursor(frame)
        .ok_or_else(|| EngineError::cursor(node, "cursor frame no longer open"))?;
    cursor
        .restore_to(position)
        .map_err(|e| EngineError::cursor(node, e.to_string()))?;
    ctx.record_position(frame);
    Ok(())
}

/// Key values of every grouping level at the cursor's current row.
fn group_keys(
    ctx: &ExecutionContext,
    frame: FrameId,
    design: &TableDesign,
) -> SmallVec<[CursorValue; 4]> {
    design
        .groups
        .iter()
        .map(|g| ctx.cursor_value(frame, g.key_field))
        .collect()
}

/// TOC label for one group activation: the configured label plus the
/// key value of the row opening the group.
fn group_toc_label(
    ctx: &ExecutionContext,
    frame: Option<FrameId>,
    group: &TableGroupDesign,
) -> Option<String> {
    let label = group.toc_label.as_ref()?;
    let key = frame
        .map(|f| ctx.cursor_value(f, group.key_field).display())
        .unwrap_or_default();
    if key.is_empty() {
        Some(label.clone())
    } else {
        Some(format!("{}: {}", label, key))
    }
}

// ============================================================================
// DRIVER
// ============================================================================

/// Depth-first pre-order walk of one executor subtree. Every executor
/// opened on the path is closed before a fault re-raises.
pub fn drive(
    executor: &mut ReportItemExecutor<'_>,
    ctx: &mut ExecutionContext,
) -> Result<(), EngineError> {
    let result = match executor.execute(ctx) {
        Err(err) => Err(err),
        Ok(_) => {
            let mut result = Ok(());
            while executor.has_next_child() {
                match executor.get_next_child(ctx) {
                    Ok(Some(mut child)) => {
                        if let Err(err) = drive(&mut child, ctx) {
                            result = Err(err);
                            break;
                        }
                    }
                    Ok(None) => break,
                    // The child cursor has already advanced past the
                    // failing index; the fault unwinds anyway.
                    Err(err) => {
                        result = Err(err);
                        break;
                    }
                }
            }
            result
        }
    };

    let close_result = executor.close(ctx);
    result.and(close_result)
}

/// Runs one full render pass: lifecycle phases around the executor walk.
pub fn run_report(
    design: &ReportDesign,
    ctx: &mut ExecutionContext,
    dispatcher: &mut ScriptDispatcher,
) -> Result<(), EngineError> {
    dispatcher.dispatch(LifecyclePhase::Initialize, design, &mut ctx.render);
    dispatcher.dispatch(LifecyclePhase::BeforeFactory, design, &mut ctx.render);
    dispatcher.dispatch(LifecyclePhase::BeforeRender, design, &mut ctx.render);

    let mut root = ExecutorManager::create_report_executor(design);
    let result = drive(&mut root, ctx);

    dispatcher.dispatch(LifecyclePhase::AfterRender, design, &mut ctx.render);
    dispatcher.dispatch(LifecyclePhase::AfterFactory, design, &mut ctx.render);

    result
}

// ============================================================================
// TESTS
// ============================================================================
