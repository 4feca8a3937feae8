//! Volunteer dashboard: accept a pickup alert, collect the food, complete
//! the drop-off protocol.

use std::sync::Arc;

use crate::catalog::{Catalog, TaskStatus, CHECKLIST_ITEMS};
use crate::config::SimulationConfig;
use crate::workflow::{ActionDef, Flow, Primary, Step, StepIcon, StepId};

pub static STEPS: &[Step] = &[
    Step::new(1, "Pickup Alerts", StepIcon::Bell),
    Step::new(2, "Accept Pickup", StepIcon::Truck),
    Step::new(3, "Drop-Off", StepIcon::CheckCircle),
];

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VolunteerFlags {
    pub accepted_task: Option<String>,
    pub qr_scanned: bool,
    pub photo_uploaded: bool,
    pub checklist: [bool; CHECKLIST_ITEMS],
    pub delivery_complete: bool,
}

impl VolunteerFlags {
    /// Percentage of drop-off checklist items ticked
    pub fn checklist_progress(&self) -> u8 {
        let done = self.checklist.iter().filter(|c| **c).count();
        (done * 100 / CHECKLIST_ITEMS) as u8
    }

    pub fn ready_to_confirm(&self) -> bool {
        self.qr_scanned && self.checklist_progress() == 100
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VolunteerAction {
    AcceptTask(String),
    ScanQr,
    UploadPhoto,
    ToggleChecklist(usize),
    ConfirmDelivery,
}

#[derive(Debug, Clone)]
pub struct VolunteerFlow {
    catalog: Arc<Catalog>,
}

impl VolunteerFlow {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }
}

impl Flow for VolunteerFlow {
    type Flags = VolunteerFlags;
    type Action = VolunteerAction;

    fn name(&self) -> &'static str {
        "volunteer"
    }

    fn steps(&self) -> &'static [Step] {
        STEPS
    }

    fn gate(&self, step: StepId, flags: &VolunteerFlags) -> bool {
        match step.get() {
            1 => flags.accepted_task.is_some(),
            2 => true,
            3 => flags.ready_to_confirm(),
            _ => false,
        }
    }

    fn primary(&self, step: StepId, flags: &VolunteerFlags) -> Primary<VolunteerAction> {
        match step.get() {
            // Tasks are accepted from the alert list, not the primary button
            1 if flags.accepted_task.is_none() => Primary::None,
            1 | 2 => Primary::Next,
            _ if flags.delivery_complete => Primary::Restart,
            _ => Primary::Run(VolunteerAction::ConfirmDelivery),
        }
    }

    fn action_def(&self, action: &VolunteerAction, timing: &SimulationConfig) -> ActionDef {
        match action {
            VolunteerAction::AcceptTask(_) => ActionDef::delayed(1, timing.accept_delay(), true),
            VolunteerAction::ScanQr
            | VolunteerAction::UploadPhoto
            | VolunteerAction::ToggleChecklist(_)
            | VolunteerAction::ConfirmDelivery => ActionDef::immediate(3),
        }
    }

    fn action_ready(&self, action: &VolunteerAction, flags: &VolunteerFlags) -> bool {
        match action {
            VolunteerAction::AcceptTask(id) => {
                flags.accepted_task.is_none()
                    && self
                        .catalog
                        .task(id)
                        .is_some_and(|t| t.status == TaskStatus::Pending)
            }
            VolunteerAction::ScanQr => !flags.qr_scanned,
            VolunteerAction::UploadPhoto => !flags.photo_uploaded,
            VolunteerAction::ToggleChecklist(i) => *i < CHECKLIST_ITEMS && !flags.delivery_complete,
            VolunteerAction::ConfirmDelivery => {
                flags.ready_to_confirm() && !flags.delivery_complete
            }
        }
    }

    fn complete(&self, action: &VolunteerAction, flags: &mut VolunteerFlags) {
        match action {
            VolunteerAction::AcceptTask(id) => flags.accepted_task = Some(id.clone()),
            VolunteerAction::ScanQr => flags.qr_scanned = true,
            VolunteerAction::UploadPhoto => flags.photo_uploaded = true,
            VolunteerAction::ToggleChecklist(i) => {
                if let Some(item) = flags.checklist.get_mut(*i) {
                    *item = !*item;
                }
            }
            VolunteerAction::ConfirmDelivery => flags.delivery_complete = true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::{ActionStart, PrimaryOutcome, Workflow};

    fn workflow() -> Workflow<VolunteerFlow> {
        Workflow::new(
            VolunteerFlow::new(Arc::new(Catalog::demo())),
            SimulationConfig::default(),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_accepting_a_task_auto_advances() {
        let mut wf = workflow();
        assert!(!wf.can_advance());

        assert!(matches!(
            wf.run_action(VolunteerAction::AcceptTask("VT-001".to_string())),
            Ok(ActionStart::Scheduled { .. })
        ));
        wf.settle().await;

        assert_eq!(wf.flags().accepted_task.as_deref(), Some("VT-001"));
        assert_eq!(wf.current_step().get(), 2);
    }

    #[test]
    fn test_already_accepted_task_is_not_offered() {
        let mut wf = workflow();
        assert!(wf
            .run_action(VolunteerAction::AcceptTask("VT-002".to_string()))
            .is_err());
        assert!(!wf.is_busy());
    }

    #[test]
    fn test_drop_off_requires_qr_and_full_checklist() {
        let mut wf = workflow();
        wf.go_to_step(3);
        assert!(!wf.can_advance());

        wf.run_action(VolunteerAction::ScanQr).unwrap();
        for i in 0..3 {
            wf.run_action(VolunteerAction::ToggleChecklist(i)).unwrap();
        }
        assert_eq!(wf.flags().checklist_progress(), 75);
        assert!(!wf.can_advance());

        wf.run_action(VolunteerAction::ToggleChecklist(3)).unwrap();
        assert!(wf.can_advance());

        assert_eq!(wf.primary(), Ok(PrimaryOutcome::Action(ActionStart::Applied)));
        assert!(wf.flags().delivery_complete);
        assert_eq!(wf.current_step().get(), 3);
    }

    #[test]
    fn test_checklist_index_out_of_range_is_rejected() {
        let mut wf = workflow();
        assert!(wf
            .run_action(VolunteerAction::ToggleChecklist(CHECKLIST_ITEMS))
            .is_err());
    }

    #[test]
    fn test_view_more_pickups_restarts() {
        let mut wf = workflow();
        wf.go_to_step(3);
        wf.run_action(VolunteerAction::ScanQr).unwrap();
        wf.run_action(VolunteerAction::UploadPhoto).unwrap();
        for i in 0..CHECKLIST_ITEMS {
            wf.run_action(VolunteerAction::ToggleChecklist(i)).unwrap();
        }
        wf.primary().unwrap();

        assert_eq!(wf.primary(), Ok(PrimaryOutcome::Restarted));
        assert_eq!(wf.current_step(), StepId::FIRST);
        assert_eq!(*wf.flags(), VolunteerFlags::default());
    }
}
