//! Role-specific flow tables for the dashboards

pub mod donor;
pub mod ngo;
pub mod sign_in;
pub mod volunteer;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::workflow::Step;

pub use donor::{DonorAction, DonorFlags, DonorFlow};
pub use ngo::{NgoAction, NgoFlags, NgoFlow};
pub use sign_in::{AuthMode, SignInAction, SignInFlags, SignInFlow};
pub use volunteer::{VolunteerAction, VolunteerFlags, VolunteerFlow};

/// Who is using a dashboard
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Donor,
    Ngo,
    Volunteer,
}

impl Role {
    pub fn all() -> &'static [Role] {
        &[Role::Donor, Role::Ngo, Role::Volunteer]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Role::Donor => "Donor",
            Role::Ngo => "NGO",
            Role::Volunteer => "Volunteer",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Role::Donor => "Share surplus food from events, restaurants, or households",
            Role::Ngo => "Receive and distribute food to communities in need",
            Role::Volunteer => "Pick up and deliver food between donors and NGOs",
        }
    }

    /// Step table of the role's dashboard
    pub fn steps(&self) -> &'static [Step] {
        match self {
            Role::Donor => donor::STEPS,
            Role::Ngo => ngo::STEPS,
            Role::Volunteer => volunteer::STEPS,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::is_dense;

    #[test]
    fn test_every_role_table_is_dense() {
        for role in Role::all() {
            assert!(is_dense(role.steps()), "{role} steps are not 1..=N");
        }
        assert!(is_dense(sign_in::STEPS));
    }

    #[test]
    fn test_step_counts() {
        assert_eq!(Role::Donor.steps().len(), 4);
        assert_eq!(Role::Ngo.steps().len(), 4);
        assert_eq!(Role::Volunteer.steps().len(), 3);
    }

    #[test]
    fn test_role_serde_uses_snake_case() {
        let json = serde_json::to_string(&Role::Ngo).unwrap();
        assert_eq!(json, "\"ngo\"");
        let role: Role = serde_json::from_str("\"volunteer\"").unwrap();
        assert_eq!(role, Role::Volunteer);
    }
}
