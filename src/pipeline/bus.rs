//! The event bus: ordered dispatch of lifecycle phases to plugin handlers.
//!
//! Handlers run strictly in registration order, each to completion before
//! the next; there is no parallel fan-out anywhere. `run` snapshots the
//! handler list before dispatching, so a handler that unregisters itself
//! (or a sibling) affects later `run` calls but never the in-flight one —
//! mutation during dispatch cannot skip or double-invoke anyone.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::pipeline::context::PluginContext;
use crate::pipeline::phase::Phase;
use crate::util::errors::PipelineError;

/// A phase handler. Handlers receive the bus so they can unregister
/// themselves or siblings for later phases.
pub type Handler = Rc<dyn Fn(&EventBus, &mut PluginContext) -> Result<(), PipelineError>>;

struct Registration {
    owner: String,
    handler: Handler,
}

/// Ordered publish/subscribe primitive for lifecycle phases.
///
/// Created per invocation and passed down explicitly; never a process-wide
/// singleton.
#[derive(Default)]
pub struct EventBus {
    handlers: RefCell<HashMap<Phase, Vec<Registration>>>,
}

impl EventBus {
    pub fn new() -> Self {
        EventBus::default()
    }

    /// Register a handler for a phase under an owner identity.
    pub fn register(&self, phase: Phase, owner: impl Into<String>, handler: Handler) {
        self.handlers
            .borrow_mut()
            .entry(phase)
            .or_default()
            .push(Registration { owner: owner.into(), handler });
    }

    /// Remove every handler `owner` registered for `phase`.
    pub fn unregister(&self, phase: Phase, owner: &str) {
        if let Some(registrations) = self.handlers.borrow_mut().get_mut(&phase) {
            registrations.retain(|r| r.owner != owner);
        }
    }

    /// Remove every handler `owner` registered, across all phases.
    ///
    /// This is how a platform plugin opts out of an invocation it is not
    /// targeted by.
    pub fn unregister_owner(&self, owner: &str) {
        for registrations in self.handlers.borrow_mut().values_mut() {
            registrations.retain(|r| r.owner != owner);
        }
    }

    /// Number of handlers currently registered for a phase.
    pub fn handler_count(&self, phase: Phase) -> usize {
        self.handlers.borrow().get(&phase).map_or(0, Vec::len)
    }

    /// Run every handler registered for `phase`, in registration order.
    ///
    /// Returns `Ok(false)` if no handler was registered — a silent phase is
    /// not an error, and callers must not assume a phase fires. The first
    /// handler error aborts the remainder of the phase.
    pub fn run(&self, phase: Phase, ctx: &mut PluginContext) -> Result<bool, PipelineError> {
        // Snapshot before dispatch; the borrow must not be held while
        // handlers run, since they may re-enter to unregister.
        let snapshot: Vec<(String, Handler)> = self
            .handlers
            .borrow()
            .get(&phase)
            .map(|registrations| {
                registrations
                    .iter()
                    .map(|r| (r.owner.clone(), Rc::clone(&r.handler)))
                    .collect()
            })
            .unwrap_or_default();

        if snapshot.is_empty() {
            tracing::debug!(phase = %phase, "no handlers registered");
            return Ok(false);
        }

        for (owner, handler) in snapshot {
            tracing::debug!(phase = %phase, plugin = %owner, "dispatching");
            handler(self, ctx)?;
        }
        Ok(true)
    }
}
