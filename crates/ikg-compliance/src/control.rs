//! The `Control` trait: a declarative compliance rule, one predicate over a
//! single node plus its neighborhood (`spec.md` §4.4).

use ikg_core::ResourceType;
use std::sync::Arc;

use crate::context::ControlContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ControlStatus {
    Pass,
    Fail,
    Warning,
    NotApplicable,
}

/// A compliance rule. `evaluate` returns `Err` for an evaluation exception
/// (e.g. a malformed assumption about node shape) rather than panicking;
/// the engine isolates that per node and never aborts the framework on it.
pub trait Control: Send + Sync {
    fn id(&self) -> &str;
    fn framework(&self) -> &str;
    fn section(&self) -> &str;
    fn title(&self) -> &str;
    fn description(&self) -> &str;
    fn severity(&self) -> Severity;
    fn applicable_resource_types(&self) -> &[ResourceType];
    fn evaluate(&self, ctx: &ControlContext<'_>) -> Result<ControlStatus, String>;
    fn reason(&self, ctx: &ControlContext<'_>, status: ControlStatus) -> String;
}

type EvaluateFn = dyn Fn(&ControlContext<'_>) -> Result<ControlStatus, String> + Send + Sync;
type ReasonFn = dyn Fn(&ControlContext<'_>, ControlStatus) -> String + Send + Sync;

/// A `Control` built from closures rather than a dedicated type per rule —
/// the "registry of closures" realization of the control/model dispatch
/// pattern called out in `spec.md` §9.
pub struct ClosureControl {
    pub id: String,
    pub framework: String,
    pub section: String,
    pub title: String,
    pub description: String,
    pub severity: Severity,
    pub applicable_resource_types: Vec<ResourceType>,
    pub evaluate_fn: Arc<EvaluateFn>,
    pub reason_fn: Arc<ReasonFn>,
}

impl Control for ClosureControl {
    fn id(&self) -> &str {
        &self.id
    }
    fn framework(&self) -> &str {
        &self.framework
    }
    fn section(&self) -> &str {
        &self.section
    }
    fn title(&self) -> &str {
        &self.title
    }
    fn description(&self) -> &str {
        &self.description
    }
    fn severity(&self) -> Severity {
        self.severity
    }
    fn applicable_resource_types(&self) -> &[ResourceType] {
        &self.applicable_resource_types
    }
    fn evaluate(&self, ctx: &ControlContext<'_>) -> Result<ControlStatus, String> {
        (self.evaluate_fn)(ctx)
    }
    fn reason(&self, ctx: &ControlContext<'_>, status: ControlStatus) -> String {
        (self.reason_fn)(ctx, status)
    }
}

/// Builds a control whose `evaluate` is `pass` when `predicate` holds,
/// otherwise `fail`, with a single message used for both outcomes'
/// `reason`. Covers the common shape of the built-in control packs.
pub fn simple_control(
    id: impl Into<String>,
    framework: impl Into<String>,
    section: impl Into<String>,
    title: impl Into<String>,
    description: impl Into<String>,
    severity: Severity,
    applicable_resource_types: Vec<ResourceType>,
    predicate: impl Fn(&ControlContext<'_>) -> bool + Send + Sync + 'static,
    pass_reason: impl Into<String>,
    fail_reason: impl Into<String>,
) -> Arc<dyn Control> {
    let pass_reason = pass_reason.into();
    let fail_reason = fail_reason.into();
    Arc::new(ClosureControl {
        id: id.into(),
        framework: framework.into(),
        section: section.into(),
        title: title.into(),
        description: description.into(),
        severity,
        applicable_resource_types,
        evaluate_fn: Arc::new(move |ctx| Ok(if predicate(ctx) { ControlStatus::Pass } else { ControlStatus::Fail })),
        reason_fn: Arc::new(move |_ctx, status| {
            if status == ControlStatus::Pass {
                pass_reason.clone()
            } else {
                fail_reason.clone()
            }
        }),
    })
}
