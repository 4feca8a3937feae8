//! Headless scripted run through a role's happy path.
//!
//! Drives the same `Workflow` the dashboards use, with the configured
//! simulator delays, and records every move so the CLI can print it.

use anyhow::{bail, Context, Result};
use std::fmt;
use std::sync::Arc;

use crate::catalog::{Catalog, TaskStatus};
use crate::config::SimulationConfig;
use crate::roles::{
    DonorAction, DonorFlow, NgoAction, NgoFlow, Role, VolunteerAction, VolunteerFlow,
};
use crate::workflow::{ActionStart, Flow, PrimaryOutcome, Workflow};

/// One scripted input
#[derive(Debug, Clone)]
enum Move<A> {
    Run(A),
    Primary,
}

/// What happened after one scripted input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkEvent {
    pub step: u8,
    pub steps: usize,
    pub step_label: &'static str,
    pub input: String,
    pub outcome: String,
}

impl fmt::Display for WalkEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}/{} {:<16}] {:<28} {}",
            self.step, self.steps, self.step_label, self.input, self.outcome
        )
    }
}

async fn drive<F: Flow>(
    wf: &mut Workflow<F>,
    script: Vec<Move<F::Action>>,
) -> Result<Vec<WalkEvent>> {
    let mut events = Vec::with_capacity(script.len());

    for mv in script {
        let input = match &mv {
            Move::Run(action) => format!("{action:?}"),
            Move::Primary => "primary".to_string(),
        };

        let start = match mv {
            Move::Run(action) => wf.run_action(action).map(PrimaryOutcome::Action),
            Move::Primary => wf.primary(),
        }
        .with_context(|| format!("{} walkthrough stuck at '{input}'", wf.flow().name()))?;

        if matches!(start, PrimaryOutcome::Action(ActionStart::Scheduled { .. })) {
            wf.settle().await;
        }
        if let Some(err) = wf.last_error() {
            bail!("{} walkthrough failed at '{input}': {err}", wf.flow().name());
        }

        let outcome = match start {
            PrimaryOutcome::Advanced(to) => format!("→ step {to}"),
            PrimaryOutcome::Restarted => "restarted".to_string(),
            PrimaryOutcome::Action(ActionStart::Applied) => "applied".to_string(),
            PrimaryOutcome::Action(ActionStart::Debounced) => "ignored (busy)".to_string(),
            PrimaryOutcome::Action(ActionStart::Scheduled { .. }) => {
                format!("completed, now on step {}", wf.current_step())
            }
        };

        let current = wf.current();
        events.push(WalkEvent {
            step: current.id.get(),
            steps: wf.steps().len(),
            step_label: current.label,
            input,
            outcome,
        });
    }

    Ok(events)
}

/// Run `role`'s happy path from step 1 to its terminal step
pub async fn walkthrough(
    role: Role,
    catalog: Arc<Catalog>,
    timing: SimulationConfig,
) -> Result<Vec<WalkEvent>> {
    match role {
        Role::Donor => {
            let mut wf = Workflow::new(DonorFlow::new(catalog), timing);
            drive(
                &mut wf,
                vec![
                    Move::Run(DonorAction::ScanFood),
                    Move::Primary,
                    Move::Primary,
                    Move::Primary,
                ],
            )
            .await
        }
        Role::Ngo => {
            let donation = catalog
                .available_donations()
                .next()
                .map(|d| d.id.clone())
                .context("No available donations to claim")?;
            let volunteer = catalog
                .volunteers
                .iter()
                .find(|v| v.available)
                .map(|v| v.name.clone())
                .context("No available volunteers to assign")?;

            let mut wf = Workflow::new(NgoFlow::new(catalog), timing);
            drive(
                &mut wf,
                vec![
                    Move::Primary,
                    Move::Run(NgoAction::ToggleClaim(donation)),
                    Move::Primary,
                    Move::Run(NgoAction::AssignVolunteer(volunteer)),
                    Move::Primary,
                    Move::Primary,
                ],
            )
            .await
        }
        Role::Volunteer => {
            let task = catalog
                .tasks
                .iter()
                .find(|t| t.status == TaskStatus::Pending)
                .map(|t| t.id.clone())
                .context("No pending pickup tasks")?;
            let checklist = catalog.checklist.len();

            let mut script = vec![
                Move::Run(VolunteerAction::AcceptTask(task)),
                Move::Primary,
                Move::Run(VolunteerAction::ScanQr),
                Move::Run(VolunteerAction::UploadPhoto),
            ];
            script.extend((0..checklist).map(|i| Move::Run(VolunteerAction::ToggleChecklist(i))));
            script.push(Move::Primary);

            let mut wf = Workflow::new(VolunteerFlow::new(catalog), timing);
            drive(&mut wf, script).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn run(role: Role) -> Vec<WalkEvent> {
        walkthrough(role, Arc::new(Catalog::demo()), SimulationConfig::default())
            .await
            .unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_donor_walkthrough_reaches_impact() {
        let events = run(Role::Donor).await;
        let last = events.last().unwrap();
        assert_eq!(last.step, 4);
        assert_eq!(last.step_label, "Impact");
        assert_eq!(events[0].outcome, "completed, now on step 1");
    }

    #[tokio::test(start_paused = true)]
    async fn test_ngo_walkthrough_confirms_receipt() {
        let events = run(Role::Ngo).await;
        assert_eq!(events.len(), 6);
        assert_eq!(events[1].input, "ToggleClaim(\"DON-001\")");
        let last = events.last().unwrap();
        assert_eq!(last.step, 4);
        assert_eq!(last.outcome, "applied");
    }

    #[tokio::test(start_paused = true)]
    async fn test_volunteer_walkthrough_completes_drop_off() {
        let events = run(Role::Volunteer).await;
        assert_eq!(events[0].input, "AcceptTask(\"VT-001\")");
        assert_eq!(events[0].step, 2);
        assert_eq!(events.last().unwrap().step, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_walkthrough_fails_without_data() {
        let mut catalog = Catalog::demo();
        catalog.tasks.clear();
        let result = walkthrough(
            Role::Volunteer,
            Arc::new(catalog),
            SimulationConfig::default(),
        )
        .await;
        assert!(result.is_err());
    }

    #[test]
    fn test_event_display() {
        let event = WalkEvent {
            step: 2,
            steps: 4,
            step_label: "Wait for Claim",
            input: "primary".to_string(),
            outcome: "→ step 3".to_string(),
        };
        assert!(event.to_string().starts_with("[2/4 Wait for Claim"));
    }
}
