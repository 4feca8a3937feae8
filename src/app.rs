use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::Frame;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::catalog::Catalog;
use crate::config::Config;
use crate::roles::Role;
use crate::ui::keybindings::ShortcutContext;
use crate::ui::{
    install_panic_hook, DonorDashboard, HelpDialog, NgoDashboard, SignInDashboard,
    TerminalGuard, VolunteerDashboard,
};

/// The dashboard currently on screen
pub enum Screen {
    SignIn(SignInDashboard),
    Donor(DonorDashboard),
    Ngo(NgoDashboard),
    Volunteer(VolunteerDashboard),
}

impl Screen {
    pub fn role(&self) -> Option<Role> {
        match self {
            Screen::SignIn(_) => None,
            Screen::Donor(_) => Some(Role::Donor),
            Screen::Ngo(_) => Some(Role::Ngo),
            Screen::Volunteer(_) => Some(Role::Volunteer),
        }
    }

    fn context(&self) -> ShortcutContext {
        match self {
            Screen::SignIn(_) => ShortcutContext::SignIn,
            Screen::Donor(_) => ShortcutContext::Donor,
            Screen::Ngo(_) => ShortcutContext::Ngo,
            Screen::Volunteer(_) => ShortcutContext::Volunteer,
        }
    }

    fn render(&mut self, frame: &mut Frame) {
        match self {
            Screen::SignIn(d) => d.render(frame),
            Screen::Donor(d) => d.render(frame),
            Screen::Ngo(d) => d.render(frame),
            Screen::Volunteer(d) => d.render(frame),
        }
    }

    fn handle_key(&mut self, code: KeyCode) -> bool {
        match self {
            Screen::SignIn(d) => d.handle_key(code),
            Screen::Donor(d) => d.handle_key(code),
            Screen::Ngo(d) => d.handle_key(code),
            Screen::Volunteer(d) => d.handle_key(code),
        }
    }

    fn pump(&mut self) -> usize {
        match self {
            Screen::SignIn(d) => d.pump(),
            Screen::Donor(d) => d.pump(),
            Screen::Ngo(d) => d.pump(),
            Screen::Volunteer(d) => d.pump(),
        }
    }
}

pub struct App {
    config: Config,
    catalog: Arc<Catalog>,
    screen: Screen,
    help_dialog: HelpDialog,
    should_quit: bool,
}

impl App {
    pub fn new(config: Config, catalog: Arc<Catalog>, start_role: Option<Role>) -> Self {
        let mut app = Self {
            screen: Screen::SignIn(SignInDashboard::new(
                catalog.impact.clone(),
                config.simulation.clone(),
            )),
            config,
            catalog,
            help_dialog: HelpDialog::new(),
            should_quit: false,
        };
        if let Some(role) = start_role {
            app.open_dashboard(role);
        }
        app
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Replace the current screen. The old dashboard is dropped here, which
    /// aborts its pending simulated action.
    fn open_dashboard(&mut self, role: Role) {
        let catalog = Arc::clone(&self.catalog);
        let timing = self.config.simulation.clone();
        self.screen = match role {
            Role::Donor => Screen::Donor(DonorDashboard::new(catalog, timing)),
            Role::Ngo => Screen::Ngo(NgoDashboard::new(catalog, timing)),
            Role::Volunteer => Screen::Volunteer(VolunteerDashboard::new(catalog, timing)),
        };
        info!(role = %role, "Opened dashboard");
    }

    fn sign_out(&mut self) {
        self.screen = Screen::SignIn(SignInDashboard::new(
            self.catalog.impact.clone(),
            self.config.simulation.clone(),
        ));
        info!("Back to sign in");
    }

    pub fn handle_key(&mut self, code: KeyCode) {
        // Any key closes the help overlay
        if self.help_dialog.visible {
            self.help_dialog.toggle();
            return;
        }

        match code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.help_dialog.toggle(),
            KeyCode::Esc if self.screen.role().is_some() => self.sign_out(),
            _ => {
                self.screen.handle_key(code);
            }
        }
    }

    /// Apply finished simulated actions and follow a completed sign-in
    pub fn tick(&mut self) {
        self.screen.pump();

        if let Screen::SignIn(sign_in) = &self.screen {
            if let Some(role) = sign_in.signed_in_as() {
                self.open_dashboard(role);
            }
        }
    }

    pub fn render(&mut self, frame: &mut Frame) {
        self.screen.render(frame);
        self.help_dialog.render(frame, self.screen.context());
    }

    pub async fn run(&mut self) -> Result<()> {
        install_panic_hook();
        let mut guard = TerminalGuard::new()?;

        let tick_rate = Duration::from_millis(self.config.ui.refresh_rate_ms);

        while !self.should_quit {
            guard.terminal_mut().draw(|f| self.render(f))?;

            if event::poll(tick_rate)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code);
                    }
                }
            }

            self.tick();
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::dashboards::buffer_text;
    use ratatui::{backend::TestBackend, Terminal};

    fn app(start_role: Option<Role>) -> App {
        App::new(Config::default(), Arc::new(Catalog::demo()), start_role)
    }

    #[test]
    fn test_starts_on_sign_in_without_role() {
        let app = app(None);
        assert!(app.screen().role().is_none());
    }

    #[test]
    fn test_start_role_opens_dashboard() {
        let app = app(Some(Role::Ngo));
        assert_eq!(app.screen().role(), Some(Role::Ngo));
    }

    #[test]
    fn test_escape_signs_out() {
        let mut app = app(Some(Role::Volunteer));
        app.handle_key(KeyCode::Esc);
        assert!(app.screen().role().is_none());

        // Esc on the sign-in screen does nothing
        app.handle_key(KeyCode::Esc);
        assert!(!app.should_quit());
    }

    #[test]
    fn test_help_swallows_next_key() {
        let mut app = app(Some(Role::Donor));
        app.handle_key(KeyCode::Char('?'));
        app.handle_key(KeyCode::Char('q'));
        assert!(!app.should_quit());

        app.handle_key(KeyCode::Char('q'));
        assert!(app.should_quit());
    }

    #[test]
    fn test_help_overlay_renders_dashboard_keys() {
        let mut app = app(Some(Role::Ngo));
        app.handle_key(KeyCode::Char('?'));

        let mut terminal = Terminal::new(TestBackend::new(140, 40)).unwrap();
        terminal.draw(|f| app.render(f)).unwrap();
        let text = buffer_text(terminal.backend().buffer());
        assert!(text.contains("Keyboard Shortcuts"));
        assert!(text.contains("Cycle surplus filter"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_completed_sign_in_switches_screen() {
        let mut app = app(None);
        app.handle_key(KeyCode::Enter);
        app.tick();
        assert!(app.screen().role().is_none());

        tokio::time::sleep(Duration::from_millis(1300)).await;
        app.tick();
        assert_eq!(app.screen().role(), Some(Role::Donor));
    }

    #[tokio::test(start_paused = true)]
    async fn test_leaving_dashboard_drops_pending_action() {
        let mut app = app(Some(Role::Donor));
        app.handle_key(KeyCode::Enter);
        if let Screen::Donor(d) = app.screen() {
            assert!(d.workflow().is_busy());
        }

        app.handle_key(KeyCode::Esc);
        app.handle_key(KeyCode::Char('3'));
        tokio::time::sleep(Duration::from_secs(2)).await;
        app.tick();

        // The donor publish never lands on the fresh sign-in screen
        assert!(app.screen().role().is_none());
    }
}
