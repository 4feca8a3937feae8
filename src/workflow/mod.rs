//! Guided workflow controller shared by every dashboard.
//!
//! A [`Flow`] describes one role: its ordered step table, the gate for each
//! step, what the primary button does on each step, and how each action
//! mutates the role's flags. [`Workflow`] runs any flow:
//! - Step-indicator jumps and `next`/`prev` are never gated
//! - The primary action only fires while [`Workflow::can_advance`] holds
//! - Delayed actions go through the [`ActionSimulator`]; at most one is in
//!   flight, and a second request while one is pending is dropped
//! - Completions arrive over a channel and are applied by [`Workflow::pump`]
//!   or [`Workflow::settle`] on the owning task, so state has a single writer

pub mod error;
pub mod simulator;
pub mod step;


use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::SimulationConfig;

pub use error::WorkflowError;
pub use simulator::{ActionBackend, ActionRequest, ActionSimulator, Completion, SimulatedBackend};
pub use step::{is_dense, Direction, Step, StepIcon, StepId, StepState, StepStatus};

/// What the primary call-to-action does on a given step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Primary<A> {
    /// Gated move to the next step
    Next,
    /// Run an action (immediate or simulated)
    Run(A),
    /// Reset the whole flow to step 1 ("Donate Again", "View More Pickups")
    Restart,
    /// No primary control on this step
    None,
}

/// Static description of an action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionDef {
    /// Step the action belongs to; auto-advance only fires from here
    pub trigger: StepId,
    /// `None` applies the action synchronously
    pub delay: Option<Duration>,
    /// Call `advance` once the action completes
    pub auto_advance: bool,
}

impl ActionDef {
    pub fn immediate(trigger: u8) -> Self {
        Self {
            trigger: StepId::at(trigger),
            delay: None,
            auto_advance: false,
        }
    }

    pub fn delayed(trigger: u8, delay: Duration, auto_advance: bool) -> Self {
        Self {
            trigger: StepId::at(trigger),
            delay: Some(delay),
            auto_advance,
        }
    }
}

/// Role-specific step table, gates and action effects
pub trait Flow {
    type Flags: Default + Clone + fmt::Debug;
    type Action: Clone + fmt::Debug + PartialEq;

    /// Name used in logs
    fn name(&self) -> &'static str;

    /// Ordered steps; ids must run 1..=N
    fn steps(&self) -> &'static [Step];

    /// Whether forward progression away from `step` is allowed
    fn gate(&self, step: StepId, flags: &Self::Flags) -> bool;

    /// What the primary button does on `step`
    fn primary(&self, step: StepId, flags: &Self::Flags) -> Primary<Self::Action>;

    fn action_def(&self, action: &Self::Action, timing: &SimulationConfig) -> ActionDef;

    /// Precondition for starting `action`
    fn action_ready(&self, _action: &Self::Action, _flags: &Self::Flags) -> bool {
        true
    }

    /// Applied when the action starts (in-progress indicators)
    fn begin(&self, _action: &Self::Action, _flags: &mut Self::Flags) {}

    /// Applied when the action completes successfully
    fn complete(&self, action: &Self::Action, flags: &mut Self::Flags);

    /// Undo what `begin` set after the backend failed. Other flags are left
    /// alone; immediate edits made while the action was in flight survive.
    fn rollback(&self, _action: &Self::Action, _flags: &mut Self::Flags) {}
}

/// Step cursor plus role flags. Created at dashboard mount, reset on restart.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowState<Fl> {
    pub step: StepState,
    pub flags: Fl,
}

impl<Fl: Default> WorkflowState<Fl> {
    pub fn new(len: usize) -> Self {
        Self {
            step: StepState::new(len),
            flags: Fl::default(),
        }
    }
}

/// Result of starting an action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionStart {
    /// Immediate action, flags already updated
    Applied,
    /// Handed to the simulator under this ticket
    Scheduled { ticket: u64 },
    /// Another simulated action is already in flight; nothing happened
    Debounced,
}

/// Result of pressing the primary button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimaryOutcome {
    Advanced(StepId),
    Action(ActionStart),
    Restarted,
}

/// Snapshot for the presentation layer
#[derive(Debug)]
pub struct WorkflowView<'a, Fl> {
    pub current: StepId,
    pub direction: Direction,
    pub can_advance: bool,
    pub busy: bool,
    pub progress: u8,
    pub flags: &'a Fl,
    pub last_error: Option<&'a WorkflowError>,
}

struct PendingAction<A> {
    ticket: u64,
    action: A,
    def: ActionDef,
    handle: JoinHandle<()>,
}

pub struct Workflow<F: Flow> {
    flow: F,
    state: WorkflowState<F::Flags>,
    timing: SimulationConfig,
    simulator: ActionSimulator,
    completions: mpsc::UnboundedReceiver<Completion>,
    pending: Option<PendingAction<F::Action>>,
    next_ticket: u64,
    last_error: Option<WorkflowError>,
}

impl<F: Flow> Workflow<F> {
    /// Create a workflow backed by the always-succeeding simulator
    pub fn new(flow: F, timing: SimulationConfig) -> Self {
        Self::with_backend(flow, timing, Arc::new(SimulatedBackend))
    }

    /// Create a workflow with a custom backend
    pub fn with_backend(flow: F, timing: SimulationConfig, backend: Arc<dyn ActionBackend>) -> Self {
        debug_assert!(is_dense(flow.steps()), "step ids must run 1..=N");

        let (tx, rx) = mpsc::unbounded_channel();
        let simulator = ActionSimulator::new(backend, timing.action_timeout(), tx);
        let state = WorkflowState::new(flow.steps().len());

        Self {
            flow,
            state,
            timing,
            simulator,
            completions: rx,
            pending: None,
            next_ticket: 1,
            last_error: None,
        }
    }

    pub fn flow(&self) -> &F {
        &self.flow
    }

    pub fn state(&self) -> &WorkflowState<F::Flags> {
        &self.state
    }

    pub fn flags(&self) -> &F::Flags {
        &self.state.flags
    }

    pub fn steps(&self) -> &'static [Step] {
        self.flow.steps()
    }

    pub fn current_step(&self) -> StepId {
        self.state.step.current()
    }

    /// Table entry for the current step
    pub fn current(&self) -> &'static Step {
        &self.flow.steps()[self.current_step().index()]
    }

    pub fn direction(&self) -> Direction {
        self.state.step.direction()
    }

    pub fn is_terminal(&self) -> bool {
        self.state.step.is_terminal()
    }

    /// True while a simulated action is in flight
    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending_action(&self) -> Option<&F::Action> {
        self.pending.as_ref().map(|p| &p.action)
    }

    pub fn last_error(&self) -> Option<&WorkflowError> {
        self.last_error.as_ref()
    }

    pub fn step_status(&self, id: StepId) -> StepStatus {
        self.state.step.status_of(id)
    }

    pub fn view(&self) -> WorkflowView<'_, F::Flags> {
        WorkflowView {
            current: self.current_step(),
            direction: self.direction(),
            can_advance: self.can_advance(),
            busy: self.is_busy(),
            progress: self.state.step.progress_percent(),
            flags: &self.state.flags,
            last_error: self.last_error.as_ref(),
        }
    }

    /// Whether the primary button is enabled
    pub fn can_advance(&self) -> bool {
        let step = self.current_step();
        match self.flow.primary(step, &self.state.flags) {
            Primary::Next => !self.is_terminal() && self.flow.gate(step, &self.state.flags),
            Primary::Run(action) => {
                self.pending.is_none() && self.flow.action_ready(&action, &self.state.flags)
            }
            Primary::Restart => self.pending.is_none(),
            Primary::None => false,
        }
    }

    // ─── Ungated navigation ────────────────────────────────────────────────

    /// Step-indicator jump. Clamped into range, never gated.
    pub fn go_to_step(&mut self, target: usize) -> bool {
        let from = self.current_step();
        let moved = self.state.step.go_to(target);
        if moved {
            debug!(
                flow = self.flow.name(),
                from = %from,
                to = %self.current_step(),
                "Jumped to step"
            );
        }
        moved
    }

    pub fn next(&mut self) -> bool {
        self.state.step.next()
    }

    pub fn prev(&mut self) -> bool {
        self.state.step.prev()
    }

    // ─── Gated progression ─────────────────────────────────────────────────

    /// Move forward if the current step's gate passes
    pub fn advance(&mut self) -> Result<StepId, WorkflowError> {
        let step = self.current_step();
        if self.is_terminal() || !self.flow.gate(step, &self.state.flags) {
            return Err(WorkflowError::Gated { step });
        }
        self.state.step.next();
        debug!(flow = self.flow.name(), to = %self.current_step(), "Advanced");
        Ok(self.current_step())
    }

    /// Press the primary button. Never changes the step while the gate is closed.
    pub fn primary(&mut self) -> Result<PrimaryOutcome, WorkflowError> {
        let step = self.current_step();
        if !self.can_advance() {
            return Err(WorkflowError::Gated { step });
        }

        match self.flow.primary(step, &self.state.flags) {
            Primary::Next => self.advance().map(PrimaryOutcome::Advanced),
            Primary::Run(action) => self.run_action(action).map(PrimaryOutcome::Action),
            Primary::Restart => {
                self.restart();
                Ok(PrimaryOutcome::Restarted)
            }
            Primary::None => Err(WorkflowError::Gated { step }),
        }
    }

    /// Start an action. Immediate actions apply now; delayed ones are
    /// scheduled unless another is already in flight.
    pub fn run_action(&mut self, action: F::Action) -> Result<ActionStart, WorkflowError> {
        let def = self.flow.action_def(&action, &self.timing);

        let Some(delay) = def.delay else {
            if !self.flow.action_ready(&action, &self.state.flags) {
                return Err(WorkflowError::Gated {
                    step: self.current_step(),
                });
            }
            self.flow.begin(&action, &mut self.state.flags);
            self.flow.complete(&action, &mut self.state.flags);
            debug!(flow = self.flow.name(), action = ?action, "Applied action");
            return Ok(ActionStart::Applied);
        };

        if let Some(pending) = &self.pending {
            debug!(
                flow = self.flow.name(),
                action = ?action,
                in_flight = ?pending.action,
                "Action already in flight, ignoring"
            );
            return Ok(ActionStart::Debounced);
        }

        if !self.flow.action_ready(&action, &self.state.flags) {
            return Err(WorkflowError::Gated {
                step: self.current_step(),
            });
        }

        self.flow.begin(&action, &mut self.state.flags);

        let ticket = self.next_ticket;
        self.next_ticket += 1;

        let handle = self.simulator.schedule(
            ticket,
            ActionRequest {
                label: format!("{action:?}"),
                delay,
            },
        );

        debug!(
            flow = self.flow.name(),
            action = ?action,
            ticket,
            delay_ms = delay.as_millis() as u64,
            "Scheduled action"
        );

        self.last_error = None;
        self.pending = Some(PendingAction {
            ticket,
            action,
            def,
            handle,
        });

        Ok(ActionStart::Scheduled { ticket })
    }

    /// Apply every completion that has already arrived. Returns how many applied.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(completion) = self.completions.try_recv() {
            if self.apply(completion) {
                applied += 1;
            }
        }
        applied
    }

    /// Wait for the in-flight action, if any, and apply its completion.
    pub async fn settle(&mut self) -> bool {
        while self.pending.is_some() {
            match self.completions.recv().await {
                Some(completion) => {
                    if self.apply(completion) {
                        return true;
                    }
                }
                None => break,
            }
        }
        false
    }

    fn apply(&mut self, completion: Completion) -> bool {
        let matches = self
            .pending
            .as_ref()
            .is_some_and(|p| p.ticket == completion.ticket);
        if !matches {
            debug!(
                flow = self.flow.name(),
                ticket = completion.ticket,
                "Dropping stale completion"
            );
            return false;
        }
        let Some(pending) = self.pending.take() else {
            return false;
        };

        match completion.result {
            Ok(()) => {
                self.flow.complete(&pending.action, &mut self.state.flags);
                info!(flow = self.flow.name(), action = ?pending.action, "Action completed");

                if pending.def.auto_advance {
                    if self.current_step() == pending.def.trigger {
                        if let Err(err) = self.advance() {
                            debug!(flow = self.flow.name(), %err, "Auto-advance blocked");
                        }
                    } else {
                        debug!(
                            flow = self.flow.name(),
                            trigger = %pending.def.trigger,
                            current = %self.current_step(),
                            "Left trigger step, skipping auto-advance"
                        );
                    }
                }
            }
            Err(err) => {
                warn!(flow = self.flow.name(), action = ?pending.action, %err, "Action failed");
                self.flow.rollback(&pending.action, &mut self.state.flags);
                self.last_error = Some(err);
            }
        }
        true
    }

    /// Abort the in-flight action without applying it
    pub fn cancel_pending(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.handle.abort();
            debug!(
                flow = self.flow.name(),
                ticket = pending.ticket,
                "Cancelled pending action"
            );
        }
    }

    /// Back to step 1 with fresh flags
    pub fn restart(&mut self) {
        self.cancel_pending();
        self.state = WorkflowState::new(self.flow.steps().len());
        self.last_error = None;
        info!(flow = self.flow.name(), "Workflow restarted");
    }
}

impl<F: Flow> Drop for Workflow<F> {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}

impl<F: Flow> fmt::Debug for Workflow<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Workflow")
            .field("flow", &self.flow.name())
            .field("state", &self.state)
            .field("pending", &self.pending_action())
            .finish_non_exhaustive()
    }
}
