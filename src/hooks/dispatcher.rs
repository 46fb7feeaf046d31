//! Hook dispatch.
//!
//! One dispatch walks a mission's `hook_rules` in array order and runs the
//! method for the current point on each rule's handler:
//!
//! - no handler registered: strict dispatch fails with
//!   [`UnknownHookError`]; lenient dispatch skips the rule and reports it
//!   to the telemetry sink
//! - handler without a method for this point: skipped silently
//! - otherwise the partial result is merged (see [`HookResult`])
//!
//! Handlers mutate the state in sequence, so rule N sees what rule N-1
//! did. Handler panics are not caught.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, trace, warn};

use super::handler::HookRegistry;
use super::point::{HookContext, HookPoint};
use super::result::HookResult;
use crate::core::{GameResult, PlayerId, UnknownHookError};
use crate::missions::{MissionDef, MissionId};

/// Structured trace of a dispatch, one event per step.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TraceEvent {
    DispatchStart { mission: MissionId, point: HookPoint, rules: usize },
    RuleInvoke { mission: MissionId, point: HookPoint, index: usize, kind: &'static str },
    RuleSkipNoHandler { mission: MissionId, point: HookPoint, index: usize, kind: &'static str },
    RuleSkipNoMethod { mission: MissionId, point: HookPoint, index: usize, kind: &'static str },
    DispatchEnd { mission: MissionId, point: HookPoint, result: HookResult },
}

/// Operational events worth counting in production.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TelemetryEvent {
    /// Lenient dispatch skipped a rule with no handler.
    UnknownHookSkipped { mission: MissionId, point: HookPoint, index: usize, kind: &'static str },

    MissionEnded {
        mission: MissionId,
        result: GameResult,
        turn: u32,
        detonator: u8,
        actor: Option<PlayerId>,
        target: Option<PlayerId>,
    },
}

pub type TraceSink = Arc<dyn Fn(&TraceEvent) + Send + Sync>;
pub type TelemetrySink = Arc<dyn Fn(&TelemetryEvent) + Send + Sync>;

/// Owns the handler registry and the optional sinks.
pub struct HookDispatcher {
    registry: HookRegistry,
    strict: bool,
    trace: Option<TraceSink>,
    telemetry: Option<TelemetrySink>,
}

impl HookDispatcher {
    #[must_use]
    pub fn new(registry: HookRegistry, strict: bool) -> Self {
        Self {
            registry,
            strict,
            trace: None,
            telemetry: None,
        }
    }

    #[must_use]
    pub fn registry(&self) -> &HookRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut HookRegistry {
        &mut self.registry
    }

    #[must_use]
    pub fn is_strict(&self) -> bool {
        self.strict
    }

    pub fn set_strict(&mut self, strict: bool) {
        self.strict = strict;
    }

    /// Install or clear the trace sink.
    pub fn set_trace_sink(&mut self, sink: Option<TraceSink>) {
        self.trace = sink;
    }

    /// Install or clear the telemetry sink.
    pub fn set_telemetry_sink(&mut self, sink: Option<TelemetrySink>) {
        self.telemetry = sink;
    }

    /// Forward an event to the telemetry sink, if any.
    pub fn report(&self, event: impl FnOnce() -> TelemetryEvent) {
        if let Some(sink) = &self.telemetry {
            sink(&event());
        }
    }

    fn emit(&self, event: impl FnOnce() -> TraceEvent) {
        if let Some(sink) = &self.trace {
            sink(&event());
        }
    }

    /// Run every rule of `mission` at the point carried by `ctx`.
    pub fn dispatch_hooks(
        &self,
        mission: &MissionDef,
        mut ctx: HookContext<'_>,
    ) -> Result<HookResult, UnknownHookError> {
        let point = ctx.point();
        let id = mission.id;
        debug!(mission = %id, %point, rules = mission.hook_rules.len(), "dispatching hooks");
        self.emit(|| TraceEvent::DispatchStart { mission: id, point, rules: mission.hook_rules.len() });

        let mut merged = HookResult::default();

        for (index, rule) in mission.hook_rules.iter().enumerate() {
            let kind = rule.kind();

            let Some(handler) = self.registry.get(kind) else {
                if self.strict {
                    return Err(UnknownHookError {
                        kind: kind.to_string(),
                        mission: id,
                        point,
                        index,
                    });
                }
                warn!(mission = %id, %point, index, kind, "no handler for hook rule, skipping");
                self.emit(|| TraceEvent::RuleSkipNoHandler { mission: id, point, index, kind });
                self.report(|| TelemetryEvent::UnknownHookSkipped { mission: id, point, index, kind });
                continue;
            };

            let partial = match &mut ctx {
                HookContext::Setup(state) => handler.setup.as_ref().map(|f| f(rule, &mut **state)),
                HookContext::Validate(view) => handler.validate.as_ref().map(|f| f(rule, view)),
                HookContext::Resolve(state, event) => {
                    handler.resolve.as_ref().map(|f| f(rule, &mut **state, *event))
                }
                HookContext::EndTurn(state, info) => {
                    handler.end_turn.as_ref().map(|f| f(rule, &mut **state, info))
                }
            };

            match partial {
                Some(result) => {
                    trace!(mission = %id, %point, index, kind, "hook rule invoked");
                    self.emit(|| TraceEvent::RuleInvoke { mission: id, point, index, kind });
                    merged.merge(result);
                }
                None => {
                    self.emit(|| TraceEvent::RuleSkipNoMethod { mission: id, point, index, kind });
                }
            }
        }

        self.emit(|| TraceEvent::DispatchEnd { mission: id, point, result: merged.clone() });
        Ok(merged)
    }
}

impl std::fmt::Debug for HookDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HookDispatcher")
            .field("registry", &self.registry)
            .field("strict", &self.strict)
            .field("trace", &self.trace.is_some())
            .field("telemetry", &self.telemetry.is_some())
            .finish()
    }
}
