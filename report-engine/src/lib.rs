//! FILENAME: report-engine/src/lib.rs
//! Lazy pull-based execution engine for report designs.
//!
//! This crate turns an immutable `report-model` design tree into a
//! stream of content nodes delivered to an emitter, one executor
//! activation at a time. Nothing is produced ahead of the driver's
//! pull, so a consumer can stop after any node and pay only for what
//! it consumed.
//!
//! Layers:
//! - `cursor`: Data-cursor abstraction over host row sets
//! - `content`: Transient content nodes (what one pass PRODUCED)
//! - `emitter`: Paired start/end notification sink
//! - `toc`: Navigation tree built alongside the walk
//! - `context`: Per-pass shared state (cursor frames, ids, TOC)
//! - `script`: Lifecycle event dispatch (scripts and native handlers)
//! - `executor`: The executor family and the depth-first driver

pub mod content;
pub mod context;
pub mod cursor;
pub mod emitter;
pub mod error;
pub mod executor;
pub mod script;
pub mod toc;

pub use content::{Content, ContentId, ContentIdentity, RowId};
pub use context::{ExecutionContext, FrameId, RenderContext, RowScope};
pub use cursor::{CursorPosition, CursorValue, DataCursor, VecCursor};
pub use emitter::{ContentEmitter, NullEmitter};
pub use error::{EmitError, EngineError};
pub use executor::{
    drive, run_report, ExecutorManager, ExecutorState, Inherited, ReportItemExecutor,
};
pub use script::{
    LifecyclePhase, ReportEventHandler, ReportFacade, ScriptDispatcher, ScriptError,
    ScriptEvaluator, ScriptOutcome,
};
pub use toc::{TocBuilder, TocEntry, TocNodeId};
