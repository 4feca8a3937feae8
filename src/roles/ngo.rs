//! NGO dashboard: browse surplus, claim it, assign a volunteer, confirm the
//! delivery arrived.

use std::sync::Arc;

use crate::catalog::{Catalog, DonationFilter, DonationStatus};
use crate::config::SimulationConfig;
use crate::workflow::{ActionDef, Flow, Primary, Step, StepIcon, StepId};

pub static STEPS: &[Step] = &[
    Step::new(1, "View Surplus", StepIcon::Eye),
    Step::new(2, "Claim Food", StepIcon::HandHeart),
    Step::new(3, "Volunteer", StepIcon::Truck),
    Step::new(4, "Delivery", StepIcon::Handshake),
];

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NgoFlags {
    pub filter: DonationFilter,
    /// Claimed donation ids, in claim order
    pub claimed: Vec<String>,
    pub assigned_volunteer: Option<String>,
    pub delivered: bool,
}

impl NgoFlags {
    pub fn is_claimed(&self, id: &str) -> bool {
        self.claimed.iter().any(|c| c == id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NgoAction {
    SetFilter(DonationFilter),
    ToggleClaim(String),
    AssignVolunteer(String),
    ConfirmReceipt,
}

#[derive(Debug, Clone)]
pub struct NgoFlow {
    catalog: Arc<Catalog>,
}

impl NgoFlow {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }
}

impl Flow for NgoFlow {
    type Flags = NgoFlags;
    type Action = NgoAction;

    fn name(&self) -> &'static str {
        "ngo"
    }

    fn steps(&self) -> &'static [Step] {
        STEPS
    }

    fn gate(&self, step: StepId, flags: &NgoFlags) -> bool {
        match step.get() {
            1 => true,
            2 => !flags.claimed.is_empty(),
            3 => flags.assigned_volunteer.is_some(),
            _ => false,
        }
    }

    fn primary(&self, step: StepId, flags: &NgoFlags) -> Primary<NgoAction> {
        match step.get() {
            1..=3 => Primary::Next,
            _ if flags.delivered => Primary::Restart,
            _ => Primary::Run(NgoAction::ConfirmReceipt),
        }
    }

    fn action_def(&self, action: &NgoAction, _timing: &SimulationConfig) -> ActionDef {
        match action {
            NgoAction::SetFilter(_) => ActionDef::immediate(1),
            NgoAction::ToggleClaim(_) => ActionDef::immediate(2),
            NgoAction::AssignVolunteer(_) => ActionDef::immediate(3),
            NgoAction::ConfirmReceipt => ActionDef::immediate(4),
        }
    }

    fn action_ready(&self, action: &NgoAction, flags: &NgoFlags) -> bool {
        match action {
            NgoAction::SetFilter(_) => true,
            NgoAction::ToggleClaim(id) => self
                .catalog
                .donation(id)
                .is_some_and(|d| d.status == DonationStatus::Available),
            NgoAction::AssignVolunteer(name) => {
                self.catalog.volunteer(name).is_some_and(|v| v.available)
            }
            NgoAction::ConfirmReceipt => {
                !flags.delivered
                    && !flags.claimed.is_empty()
                    && flags.assigned_volunteer.is_some()
            }
        }
    }

    fn complete(&self, action: &NgoAction, flags: &mut NgoFlags) {
        match action {
            NgoAction::SetFilter(filter) => flags.filter = *filter,
            NgoAction::ToggleClaim(id) => {
                if let Some(pos) = flags.claimed.iter().position(|c| c == id) {
                    flags.claimed.remove(pos);
                } else {
                    flags.claimed.push(id.clone());
                }
            }
            NgoAction::AssignVolunteer(name) => flags.assigned_volunteer = Some(name.clone()),
            NgoAction::ConfirmReceipt => flags.delivered = true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::{PrimaryOutcome, Workflow};

    fn workflow() -> Workflow<NgoFlow> {
        Workflow::new(
            NgoFlow::new(Arc::new(Catalog::demo())),
            SimulationConfig::default(),
        )
    }

    #[test]
    fn test_claim_opens_the_claim_gate() {
        let mut wf = workflow();
        wf.go_to_step(2);
        assert!(!wf.can_advance());

        wf.run_action(NgoAction::ToggleClaim("DON-001".to_string()))
            .unwrap();
        assert!(wf.can_advance());

        // Unclaiming closes it again
        wf.run_action(NgoAction::ToggleClaim("DON-001".to_string()))
            .unwrap();
        assert!(!wf.can_advance());
    }

    #[test]
    fn test_unknown_donation_cannot_be_claimed() {
        let mut wf = workflow();
        wf.go_to_step(2);
        assert!(wf
            .run_action(NgoAction::ToggleClaim("DON-999".to_string()))
            .is_err());
        assert!(wf.flags().claimed.is_empty());
    }

    #[test]
    fn test_view_surplus_is_never_gated() {
        let mut wf = workflow();
        assert!(wf.can_advance());
        assert_eq!(wf.primary(), Ok(PrimaryOutcome::Advanced(StepId::at(2))));
    }

    #[test]
    fn test_volunteer_step_needs_assignment() {
        let mut wf = workflow();
        wf.go_to_step(3);
        assert!(wf.primary().is_err());

        wf.run_action(NgoAction::AssignVolunteer("Rahul Sharma".to_string()))
            .unwrap();
        assert_eq!(wf.primary(), Ok(PrimaryOutcome::Advanced(StepId::at(4))));
    }

    #[test]
    fn test_confirm_receipt_then_restart() {
        let mut wf = workflow();
        wf.run_action(NgoAction::SetFilter(DonationFilter::Urgent))
            .unwrap();
        wf.run_action(NgoAction::ToggleClaim("DON-001".to_string()))
            .unwrap();
        wf.run_action(NgoAction::AssignVolunteer("Amit Kumar".to_string()))
            .unwrap();
        wf.go_to_step(4);

        wf.primary().unwrap();
        assert!(wf.flags().delivered);
        assert_eq!(wf.current_step().get(), 4);

        assert_eq!(wf.primary(), Ok(PrimaryOutcome::Restarted));
        assert_eq!(wf.current_step(), StepId::FIRST);
        assert_eq!(*wf.flags(), NgoFlags::default());
    }
}
