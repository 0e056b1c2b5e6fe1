//! FILENAME: report-engine/src/script.rs
//! Script event dispatcher - named lifecycle phases routed to user code.
//!
//! Each phase can be handled by a script bound in the design or by a
//! native event-handler object, never both: the script wins when one is
//! bound and non-empty. User-supplied code must not be able to abort a
//! render, so every fault from either path is logged at warn severity
//! and swallowed.

use thiserror::Error;

use report_model::{LifecycleScripts, ReportDesign};

use crate::context::RenderContext;

/// Named points in report generation at which user logic may run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecyclePhase {
    Initialize,
    BeforeFactory,
    AfterFactory,
    BeforeOpenDoc,
    AfterOpenDoc,
    BeforeCloseDoc,
    AfterCloseDoc,
    BeforeRender,
    AfterRender,
}

impl LifecyclePhase {
    pub fn name(self) -> &'static str {
        match self {
            LifecyclePhase::Initialize => "initialize",
            LifecyclePhase::BeforeFactory => "beforeFactory",
            LifecyclePhase::AfterFactory => "afterFactory",
            LifecyclePhase::BeforeOpenDoc => "beforeOpenDoc",
            LifecyclePhase::AfterOpenDoc => "afterOpenDoc",
            LifecyclePhase::BeforeCloseDoc => "beforeCloseDoc",
            LifecyclePhase::AfterCloseDoc => "afterCloseDoc",
            LifecyclePhase::BeforeRender => "beforeRender",
            LifecyclePhase::AfterRender => "afterRender",
        }
    }

    /// Script source bound to this phase, if any and non-empty.
    fn script<'a>(self, scripts: &'a LifecycleScripts) -> Option<&'a str> {
        let source = match self {
            LifecyclePhase::Initialize => &scripts.initialize,
            LifecyclePhase::BeforeFactory => &scripts.before_factory,
            LifecyclePhase::AfterFactory => &scripts.after_factory,
            LifecyclePhase::BeforeOpenDoc => &scripts.before_open_doc,
            LifecyclePhase::AfterOpenDoc => &scripts.after_open_doc,
            LifecyclePhase::BeforeCloseDoc => &scripts.before_close_doc,
            LifecyclePhase::AfterCloseDoc => &scripts.after_close_doc,
            LifecyclePhase::BeforeRender => &scripts.before_render,
            LifecyclePhase::AfterRender => &scripts.after_render,
        };
        source.as_deref().filter(|s| !s.trim().is_empty())
    }
}

#[derive(Error, Debug)]
pub enum ScriptError {
    #[error("script evaluation failed: {0}")]
    Evaluation(String),

    #[error("event handler failed: {0}")]
    Handler(String),
}

/// Result of evaluating one script.
#[derive(Debug, Clone, Copy)]
pub struct ScriptOutcome {
    /// True when a script was actually run.
    pub did_run: bool,
}

/// Opaque script runtime capability.
pub trait ScriptEvaluator {
    fn evaluate(
        &mut self,
        source: &str,
        render: &mut RenderContext,
    ) -> Result<ScriptOutcome, ScriptError>;
}

// ============================================================================
// REPORT FACADE
// ============================================================================

/// Read-only view of the report handed to native event handlers.
pub struct ReportFacade<'a> {
    design: &'a ReportDesign,
}

impl<'a> ReportFacade<'a> {
    pub fn new(design: &'a ReportDesign) -> Self {
        ReportFacade { design }
    }

    pub fn name(&self) -> &str {
        &self.design.name
    }

    pub fn version(&self) -> &str {
        &self.design.version
    }

    pub fn item_count(&self) -> usize {
        self.design.items.len()
    }
}

/// Typed lifecycle methods of a native event-handler object. All
/// methods default to doing nothing so handlers only override the
/// phases they care about.
#[allow(unused_variables)]
pub trait ReportEventHandler {
    fn initialize(
        &mut self,
        report: &ReportFacade<'_>,
        render: &mut RenderContext,
    ) -> Result<(), ScriptError> {
        Ok(())
    }

    fn before_factory(
        &mut self,
        report: &ReportFacade<'_>,
        render: &mut RenderContext,
    ) -> Result<(), ScriptError> {
        Ok(())
    }

    fn after_factory(
        &mut self,
        report: &ReportFacade<'_>,
        render: &mut RenderContext,
    ) -> Result<(), ScriptError> {
        Ok(())
    }

    fn before_open_doc(
        &mut self,
        report: &ReportFacade<'_>,
        render: &mut RenderContext,
    ) -> Result<(), ScriptError> {
        Ok(())
    }

    fn after_open_doc(
        &mut self,
        report: &ReportFacade<'_>,
        render: &mut RenderContext,
    ) -> Result<(), ScriptError> {
        Ok(())
    }

    fn before_close_doc(
        &mut self,
        report: &ReportFacade<'_>,
        render: &mut RenderContext,
    ) -> Result<(), ScriptError> {
        Ok(())
    }

    fn after_close_doc(
        &mut self,
        report: &ReportFacade<'_>,
        render: &mut RenderContext,
    ) -> Result<(), ScriptError> {
        Ok(())
    }

    fn before_render(
        &mut self,
        report: &ReportFacade<'_>,
        render: &mut RenderContext,
    ) -> Result<(), ScriptError> {
        Ok(())
    }

    fn after_render(
        &mut self,
        report: &ReportFacade<'_>,
        render: &mut RenderContext,
    ) -> Result<(), ScriptError> {
        Ok(())
    }
}

// ============================================================================
// DISPATCHER
// ============================================================================

/// Routes lifecycle phases to the bound script or native handler.
pub struct ScriptDispatcher {
    evaluator: Option<Box<dyn ScriptEvaluator>>,
    handler: Option<Box<dyn ReportEventHandler>>,
}

impl ScriptDispatcher {
    pub fn new() -> Self {
        ScriptDispatcher {
            evaluator: None,
            handler: None,
        }
    }

    pub fn with_evaluator(mut self, evaluator: Box<dyn ScriptEvaluator>) -> Self {
        self.evaluator = Some(evaluator);
        self
    }

    pub fn with_handler(mut self, handler: Box<dyn ReportEventHandler>) -> Self {
        self.handler = Some(handler);
        self
    }

    /// Fires one lifecycle phase. Never fails: faults from user code are
    /// logged and swallowed, and a faulted script suppresses the native
    /// handler for this phase.
    pub fn dispatch(
        &mut self,
        phase: LifecyclePhase,
        design: &ReportDesign,
        render: &mut RenderContext,
    ) {
        if let Err(err) = self.try_dispatch(phase, design, render) {
            log::warn!("lifecycle phase {} failed: {}", phase.name(), err);
        }
    }

    fn try_dispatch(
        &mut self,
        phase: LifecyclePhase,
        design: &ReportDesign,
        render: &mut RenderContext,
    ) -> Result<(), ScriptError> {
        if let Some(source) = phase.script(&design.scripts) {
            if let Some(evaluator) = self.evaluator.as_mut() {
                if evaluator.evaluate(source, render)?.did_run {
                    return Ok(());
                }
            }
        }

        if let Some(handler) = self.handler.as_mut() {
            let report = ReportFacade::new(design);
            match phase {
                LifecyclePhase::Initialize => handler.initialize(&report, render)?,
                LifecyclePhase::BeforeFactory => handler.before_factory(&report, render)?,
                LifecyclePhase::AfterFactory => handler.after_factory(&report, render)?,
                LifecyclePhase::BeforeOpenDoc => handler.before_open_doc(&report, render)?,
                LifecyclePhase::AfterOpenDoc => handler.after_open_doc(&report, render)?,
                LifecyclePhase::BeforeCloseDoc => handler.before_close_doc(&report, render)?,
                LifecyclePhase::AfterCloseDoc => handler.after_close_doc(&report, render)?,
                LifecyclePhase::BeforeRender => handler.before_render(&report, render)?,
                LifecyclePhase::AfterRender => handler.after_render(&report, render)?,
            }
        }

        Ok(())
    }
}

impl Default for ScriptDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Evaluator that records every script it was asked to run.
    struct RecordingEvaluator {
        ran: Rc<RefCell<Vec<String>>>,
        fail: bool,
    }

    impl ScriptEvaluator for RecordingEvaluator {
        fn evaluate(
            &mut self,
            source: &str,
            render: &mut RenderContext,
        ) -> Result<ScriptOutcome, ScriptError> {
            if self.fail {
                return Err(ScriptError::Evaluation("boom".to_string()));
            }
            self.ran.borrow_mut().push(source.to_string());
            render.set_global("last_script", source);
            Ok(ScriptOutcome { did_run: true })
        }
    }

    /// Handler counting invocations per phase.
    struct CountingHandler {
        initialized: Rc<RefCell<u32>>,
        fail: bool,
    }

    impl ReportEventHandler for CountingHandler {
        fn initialize(
            &mut self,
            _report: &ReportFacade<'_>,
            _render: &mut RenderContext,
        ) -> Result<(), ScriptError> {
            if self.fail {
                return Err(ScriptError::Handler("handler boom".to_string()));
            }
            *self.initialized.borrow_mut() += 1;
            Ok(())
        }
    }

    fn design_with_initialize(script: Option<&str>) -> ReportDesign {
        let mut design = ReportDesign::new("r", "3.2.1");
        design.scripts.initialize = script.map(str::to_string);
        design
    }

    #[test]
    fn test_script_suppresses_native_handler() {
        let ran = Rc::new(RefCell::new(Vec::new()));
        let count = Rc::new(RefCell::new(0));
        let mut dispatcher = ScriptDispatcher::new()
            .with_evaluator(Box::new(RecordingEvaluator {
                ran: Rc::clone(&ran),
                fail: false,
            }))
            .with_handler(Box::new(CountingHandler {
                initialized: Rc::clone(&count),
                fail: false,
            }));

        let design = design_with_initialize(Some("setup()"));
        let mut render = RenderContext::default();
        dispatcher.dispatch(LifecyclePhase::Initialize, &design, &mut render);

        assert_eq!(*ran.borrow(), vec!["setup()".to_string()]);
        assert_eq!(*count.borrow(), 0);
    }

    #[test]
    fn test_handler_fires_once_when_no_script() {
        let count = Rc::new(RefCell::new(0));
        let mut dispatcher = ScriptDispatcher::new().with_handler(Box::new(CountingHandler {
            initialized: Rc::clone(&count),
            fail: false,
        }));

        let design = design_with_initialize(None);
        let mut render = RenderContext::default();
        dispatcher.dispatch(LifecyclePhase::Initialize, &design, &mut render);

        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn test_empty_script_falls_through_to_handler() {
        let ran = Rc::new(RefCell::new(Vec::new()));
        let count = Rc::new(RefCell::new(0));
        let mut dispatcher = ScriptDispatcher::new()
            .with_evaluator(Box::new(RecordingEvaluator {
                ran: Rc::clone(&ran),
                fail: false,
            }))
            .with_handler(Box::new(CountingHandler {
                initialized: Rc::clone(&count),
                fail: false,
            }));

        let design = design_with_initialize(Some("   "));
        let mut render = RenderContext::default();
        dispatcher.dispatch(LifecyclePhase::Initialize, &design, &mut render);

        assert!(ran.borrow().is_empty());
        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn test_handler_fault_is_swallowed() {
        let count = Rc::new(RefCell::new(0));
        let mut dispatcher = ScriptDispatcher::new().with_handler(Box::new(CountingHandler {
            initialized: Rc::clone(&count),
            fail: true,
        }));

        let design = design_with_initialize(None);
        let mut render = RenderContext::default();
        // Returns normally despite the handler fault.
        dispatcher.dispatch(LifecyclePhase::Initialize, &design, &mut render);
        assert_eq!(*count.borrow(), 0);
    }

    #[test]
    fn test_script_fault_suppresses_handler_and_is_swallowed() {
        let ran = Rc::new(RefCell::new(Vec::new()));
        let count = Rc::new(RefCell::new(0));
        let mut dispatcher = ScriptDispatcher::new()
            .with_evaluator(Box::new(RecordingEvaluator {
                ran: Rc::clone(&ran),
                fail: true,
            }))
            .with_handler(Box::new(CountingHandler {
                initialized: Rc::clone(&count),
                fail: false,
            }));

        let design = design_with_initialize(Some("setup()"));
        let mut render = RenderContext::default();
        dispatcher.dispatch(LifecyclePhase::Initialize, &design, &mut render);

        // The faulted script counts as the handled path.
        assert_eq!(*count.borrow(), 0);
    }

    #[test]
    fn test_no_bindings_is_a_no_op() {
        let mut dispatcher = ScriptDispatcher::new();
        let design = design_with_initialize(Some("setup()"));
        let mut render = RenderContext::default();
        dispatcher.dispatch(LifecyclePhase::Initialize, &design, &mut render);
        // With no evaluator the script cannot run; nothing fires.
    }
}
