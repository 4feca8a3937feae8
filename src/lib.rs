//! ZeroWaste: guided food-rescue dashboards for donors, NGOs and volunteers.
//!
//! The core is [`workflow`], a generic linear step controller with gated
//! progression and simulated backend actions. [`roles`] instantiates it once
//! per dashboard; [`ui`] and [`app`] put those flows on a terminal.

pub mod app;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod roles;
pub mod ui;
pub mod walkthrough;
pub mod workflow;
