//! Diagnostics for precision loss in stamp operations.
//!
//! Operations that cannot be bounded precisely fall back to the unrestricted
//! stamp, and refinements can prove a value impossible. Neither is an error,
//! but both are worth seeing when tuning an optimization. This module records
//! such events when asked to.
//!
//! # Usage
//!
//! Diagnostics are disabled by default so the hot path pays only a
//! thread-local flag read. Enable them via:
//! - `DiagnosticsCollector::enable()` - enable diagnostics collection
//! - `DiagnosticsCollector::disable()` - disable diagnostics collection
//! - `DiagnosticsCollector::take()` - retrieve and clear collected diagnostics

use std::cell::RefCell;

/// Why a stamp operation lost precision.
#[derive(Clone, Debug, PartialEq)]
pub enum DiagnosticReason {
    /// A fold could not bound its result and returned the unrestricted stamp.
    UnrestrictedFallback,

    /// A join or fold proved that no value is possible.
    EmptyResult,

    /// The assumption ledger refused to record an exactness assumption.
    AssumptionRejected,

    /// Two object stamps with unrelated types were joined.
    UnrelatedObjectTypes,
}

impl std::fmt::Display for DiagnosticReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiagnosticReason::UnrestrictedFallback => write!(f, "result widened to unrestricted"),
            DiagnosticReason::EmptyResult => write!(f, "no value possible"),
            DiagnosticReason::AssumptionRejected => write!(f, "exactness assumption rejected"),
            DiagnosticReason::UnrelatedObjectTypes => write!(f, "unrelated object types"),
        }
    }
}

/// A single precision-loss event.
#[derive(Clone, Debug)]
pub struct StampDiagnostic {
    pub reason: DiagnosticReason,
    /// Operation that produced the event (`"mul"`, `"join"`, ...).
    pub operation: Option<&'static str>,
    /// Operand or type description.
    pub context: Option<String>,
}

impl StampDiagnostic {
    pub fn new(reason: DiagnosticReason) -> Self {
        Self {
            reason,
            operation: None,
            context: None,
        }
    }

    pub fn with_operation(mut self, operation: &'static str) -> Self {
        self.operation = Some(operation);
        self
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

impl std::fmt::Display for StampDiagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "stamp warning: {}", self.reason)?;
        if let Some(op) = self.operation {
            write!(f, " in {}", op)?;
        }
        if let Some(ctx) = &self.context {
            write!(f, " ({})", ctx)?;
        }
        Ok(())
    }
}

thread_local! {
    static DIAGNOSTICS_ENABLED: RefCell<bool> = const { RefCell::new(false) };
    static DIAGNOSTICS: RefCell<Vec<StampDiagnostic>> = const { RefCell::new(Vec::new()) };
}

/// Collector for stamp diagnostics.
///
/// Uses thread-local storage, so each compiler worker thread sees only its own events.
#[derive(Debug)]
pub struct DiagnosticsCollector;

impl DiagnosticsCollector {
    pub fn enable() {
        DIAGNOSTICS_ENABLED.with(|enabled| {
            *enabled.borrow_mut() = true;
        });
    }

    pub fn disable() {
        DIAGNOSTICS_ENABLED.with(|enabled| {
            *enabled.borrow_mut() = false;
        });
    }

    pub fn is_enabled() -> bool {
        DIAGNOSTICS_ENABLED.with(|enabled| *enabled.borrow())
    }

    /// Add a diagnostic to the collection (if enabled).
    pub fn emit(diagnostic: StampDiagnostic) {
        if Self::is_enabled() {
            DIAGNOSTICS.with(|diags| {
                diags.borrow_mut().push(diagnostic);
            });
        }
    }

    /// Take all collected diagnostics, clearing the collection.
    pub fn take() -> Vec<StampDiagnostic> {
        DIAGNOSTICS.with(|diags| std::mem::take(&mut *diags.borrow_mut()))
    }

    pub fn clear() {
        DIAGNOSTICS.with(|diags| {
            diags.borrow_mut().clear();
        });
    }

    pub fn count() -> usize {
        DIAGNOSTICS.with(|diags| diags.borrow().len())
    }
}

/// Records that `operation` fell back to the unrestricted stamp.
///
/// The context closure runs only when collection is enabled.
pub fn emit_unrestricted_fallback(operation: &'static str, context: impl FnOnce() -> String) {
    if DiagnosticsCollector::is_enabled() {
        DiagnosticsCollector::emit(
            StampDiagnostic::new(DiagnosticReason::UnrestrictedFallback)
                .with_operation(operation)
                .with_context(context()),
        );
    }
}

/// Records that `operation` produced the empty stamp from non-empty inputs.
pub fn emit_empty_result(operation: &'static str, context: impl FnOnce() -> String) {
    if DiagnosticsCollector::is_enabled() {
        DiagnosticsCollector::emit(
            StampDiagnostic::new(DiagnosticReason::EmptyResult)
                .with_operation(operation)
                .with_context(context()),
        );
    }
}

pub fn emit_assumption_rejected(type_name: &str) {
    if DiagnosticsCollector::is_enabled() {
        DiagnosticsCollector::emit(
            StampDiagnostic::new(DiagnosticReason::AssumptionRejected).with_context(type_name),
        );
    }
}

pub fn emit_unrelated_object_types(operation: &'static str, a: &str, b: &str) {
    if DiagnosticsCollector::is_enabled() {
        DiagnosticsCollector::emit(
            StampDiagnostic::new(DiagnosticReason::UnrelatedObjectTypes)
                .with_operation(operation)
                .with_context(format!("{} and {}", a, b)),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_disabled_by_default() {
        DiagnosticsCollector::disable();
        DiagnosticsCollector::clear();

        assert!(!DiagnosticsCollector::is_enabled());

        emit_assumption_rejected("A");
        emit_unrestricted_fallback("mul", || panic!("context built while disabled"));
        assert_eq!(DiagnosticsCollector::count(), 0);
    }

    #[test]
    fn test_diagnostic_collection() {
        DiagnosticsCollector::enable();
        DiagnosticsCollector::clear();

        emit_unrestricted_fallback("mul", || "i32 and i32".to_string());
        emit_empty_result("join", || "i32 [0 - 1] and i32 [5]".to_string());

        assert_eq!(DiagnosticsCollector::count(), 2);

        let diags = DiagnosticsCollector::take();
        assert_eq!(diags.len(), 2);
        assert_eq!(DiagnosticsCollector::count(), 0);

        assert!(matches!(
            &diags[0].reason,
            DiagnosticReason::UnrestrictedFallback
        ));
        assert_eq!(diags[1].operation, Some("join"));

        DiagnosticsCollector::disable();
    }

    #[test]
    fn test_diagnostic_display() {
        let diag = StampDiagnostic::new(DiagnosticReason::UnrelatedObjectTypes)
            .with_operation("join")
            .with_context("A and B");
        assert_eq!(
            diag.to_string(),
            "stamp warning: unrelated object types in join (A and B)"
        );
    }
}
