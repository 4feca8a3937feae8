//! Sign-in page as a two-step flow: fill in the account form, then land on
//! the chosen role's dashboard.

use crate::config::SimulationConfig;
use crate::workflow::{ActionDef, Flow, Primary, Step, StepIcon, StepId};

use super::Role;

pub static STEPS: &[Step] = &[
    Step::new(1, "Account", StepIcon::Key),
    Step::new(2, "Dashboard", StepIcon::Door),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    #[default]
    Login,
    Signup,
}

impl AuthMode {
    pub fn label(&self) -> &'static str {
        match self {
            AuthMode::Login => "Sign In",
            AuthMode::Signup => "Create Account",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            AuthMode::Login => AuthMode::Signup,
            AuthMode::Signup => AuthMode::Login,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SignInFlags {
    pub mode: AuthMode,
    pub role: Option<Role>,
    pub signed_in: bool,
}

impl SignInFlags {
    /// Dashboard opened after signing in; login without a role goes to donor
    pub fn destination(&self) -> Role {
        self.role.unwrap_or(Role::Donor)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignInAction {
    ToggleMode,
    SelectRole(Role),
    SignIn,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SignInFlow;

impl Flow for SignInFlow {
    type Flags = SignInFlags;
    type Action = SignInAction;

    fn name(&self) -> &'static str {
        "sign_in"
    }

    fn steps(&self) -> &'static [Step] {
        STEPS
    }

    fn gate(&self, step: StepId, flags: &SignInFlags) -> bool {
        step.get() == 1 && flags.signed_in
    }

    fn primary(&self, step: StepId, flags: &SignInFlags) -> Primary<SignInAction> {
        match step.get() {
            1 if flags.signed_in => Primary::Next,
            1 => Primary::Run(SignInAction::SignIn),
            _ => Primary::None,
        }
    }

    fn action_def(&self, action: &SignInAction, timing: &SimulationConfig) -> ActionDef {
        match action {
            SignInAction::SignIn => ActionDef::delayed(1, timing.sign_in_delay(), true),
            SignInAction::ToggleMode | SignInAction::SelectRole(_) => ActionDef::immediate(1),
        }
    }

    fn action_ready(&self, action: &SignInAction, flags: &SignInFlags) -> bool {
        match action {
            SignInAction::SignIn => {
                !flags.signed_in && (flags.mode == AuthMode::Login || flags.role.is_some())
            }
            _ => !flags.signed_in,
        }
    }

    fn complete(&self, action: &SignInAction, flags: &mut SignInFlags) {
        match action {
            SignInAction::ToggleMode => flags.mode = flags.mode.toggled(),
            SignInAction::SelectRole(role) => flags.role = Some(*role),
            SignInAction::SignIn => flags.signed_in = true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::Workflow;

    fn workflow() -> Workflow<SignInFlow> {
        Workflow::new(SignInFlow, SimulationConfig::default())
    }

    #[test]
    fn test_signup_requires_a_role() {
        let mut wf = workflow();
        wf.run_action(SignInAction::ToggleMode).unwrap();
        assert_eq!(wf.flags().mode, AuthMode::Signup);
        assert!(!wf.can_advance());

        wf.run_action(SignInAction::SelectRole(Role::Ngo)).unwrap();
        assert!(wf.can_advance());
    }

    #[tokio::test(start_paused = true)]
    async fn test_login_without_role_lands_on_donor() {
        let mut wf = workflow();
        assert!(wf.can_advance());

        wf.primary().unwrap();
        assert!(wf.is_busy());
        wf.settle().await;

        assert!(wf.flags().signed_in);
        assert!(wf.is_terminal());
        assert_eq!(wf.flags().destination(), Role::Donor);
        assert!(!wf.can_advance());
    }

    #[tokio::test(start_paused = true)]
    async fn test_form_is_locked_after_sign_in() {
        let mut wf = workflow();
        wf.run_action(SignInAction::SelectRole(Role::Volunteer))
            .unwrap();
        wf.primary().unwrap();
        wf.settle().await;

        assert!(wf.run_action(SignInAction::ToggleMode).is_err());
        assert_eq!(wf.flags().destination(), Role::Volunteer);
    }
}
