pub mod dashboards;
pub mod dialogs;
pub mod keybindings;
pub mod terminal_guard;
pub mod widgets;

pub use dashboards::{DonorDashboard, NgoDashboard, SignInDashboard, VolunteerDashboard};
pub use dialogs::HelpDialog;
pub use terminal_guard::{install_panic_hook, TerminalGuard};
