use crossterm::event::KeyCode;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

use super::{handle_step_key, move_cursor, run_logged};
use crate::catalog::{format_number, ImpactStats};
use crate::config::SimulationConfig;
use crate::roles::sign_in::{AuthMode, SignInAction, SignInFlow};
use crate::roles::Role;
use crate::ui::keybindings::ShortcutContext;
use crate::ui::widgets::{
    dashboard_layout, render_footer, render_header, render_step_indicator, PrimaryButton,
};
use crate::workflow::Workflow;

pub struct SignInDashboard {
    workflow: Workflow<SignInFlow>,
    role_state: ListState,
    impact: ImpactStats,
}

impl SignInDashboard {
    pub fn new(impact: ImpactStats, timing: SimulationConfig) -> Self {
        let mut role_state = ListState::default();
        role_state.select(Some(0));
        Self {
            workflow: Workflow::new(SignInFlow, timing),
            role_state,
            impact,
        }
    }

    pub fn workflow(&self) -> &Workflow<SignInFlow> {
        &self.workflow
    }

    pub fn pump(&mut self) -> usize {
        self.workflow.pump()
    }

    /// Dashboard to open once signing in has finished
    pub fn signed_in_as(&self) -> Option<Role> {
        let flags = self.workflow.flags();
        flags.signed_in.then(|| flags.destination())
    }

    pub fn handle_key(&mut self, code: KeyCode) -> bool {
        if handle_step_key(&mut self.workflow, code) {
            return true;
        }

        match code {
            KeyCode::Char('m') => {
                run_logged(&mut self.workflow, SignInAction::ToggleMode);
                true
            }
            KeyCode::Char(' ') => {
                let role = self
                    .role_state
                    .selected()
                    .and_then(|i| Role::all().get(i).copied());
                if let Some(role) = role {
                    run_logged(&mut self.workflow, SignInAction::SelectRole(role));
                }
                true
            }
            _ => move_cursor(&mut self.role_state, Role::all().len(), code),
        }
    }

    pub fn render(&mut self, frame: &mut Frame) {
        let layout = dashboard_layout(frame.area());

        let header_stats = [
            ("meals rescued", format_number(self.impact.total_meals_rescued)),
            ("tons CO₂ saved", format!("{:.1}", self.impact.total_co2_saved)),
            ("donors", format_number(self.impact.total_donors)),
            ("NGOs", self.impact.total_ngos.to_string()),
            ("cities", self.impact.cities_covered.to_string()),
        ];
        render_header(frame, layout.header, "Welcome", &header_stats);
        render_step_indicator(frame, layout.indicator, &self.workflow);
        self.render_form(frame, layout.body);

        let flags = self.workflow.flags();
        let label = if self.workflow.is_busy() {
            "Signing in"
        } else if flags.signed_in {
            "Opening dashboard"
        } else {
            flags.mode.label()
        };
        let button = PrimaryButton::for_workflow(&self.workflow, label);
        render_footer(
            frame,
            layout.footer,
            ShortcutContext::SignIn,
            &button,
            self.workflow.last_error(),
        );
    }

    fn render_form(&self, frame: &mut Frame, area: Rect) {
        let flags = self.workflow.flags();
        let role_hint = match flags.mode {
            AuthMode::Login => "optional, defaults to Donor",
            AuthMode::Signup => "required",
        };

        let mut items = vec![
            ListItem::new(Line::from(vec![
                Span::styled("Mode: ", Style::default().fg(Color::Gray)),
                Span::styled(
                    flags.mode.label(),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::styled("  (m to switch)", Style::default().fg(Color::DarkGray)),
            ])),
            ListItem::new(Line::from(Span::styled(
                format!("I am a... ({role_hint})"),
                Style::default().fg(Color::Gray),
            ))),
        ];
        let offset = items.len();

        for role in Role::all() {
            let mark = if flags.role == Some(*role) { "(●) " } else { "( ) " };
            items.push(ListItem::new(Line::from(vec![
                Span::styled(mark, Style::default().fg(Color::Green)),
                Span::styled(
                    format!("{:<10}", role.label()),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::styled(role.description(), Style::default().fg(Color::Gray)),
            ])));
        }

        let step = self.workflow.current();
        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan))
                    .title(format!(" {} {} ", step.icon.glyph(), step.label)),
            )
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");

        let mut state = ListState::default();
        state.select(self.role_state.selected().map(|i| i + offset));
        frame.render_stateful_widget(list, area, &mut state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::ui::dashboards::buffer_text;
    use ratatui::{backend::TestBackend, Terminal};

    fn dashboard() -> SignInDashboard {
        SignInDashboard::new(Catalog::demo().impact, SimulationConfig::default())
    }

    #[test]
    fn test_renders_roles_and_impact() {
        let mut dashboard = dashboard();
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal.draw(|f| dashboard.render(f)).unwrap();
        let text = buffer_text(terminal.backend().buffer());

        assert!(text.contains("128K"));
        assert!(text.contains("Volunteer"));
        assert!(text.contains("Share surplus food"));
    }

    #[test]
    fn test_signup_blocks_until_role_chosen() {
        let mut dashboard = dashboard();
        dashboard.handle_key(KeyCode::Char('m'));
        assert!(!dashboard.workflow().can_advance());

        dashboard.handle_key(KeyCode::Down);
        dashboard.handle_key(KeyCode::Char(' '));
        assert_eq!(dashboard.workflow().flags().role, Some(Role::Ngo));
        assert!(dashboard.workflow().can_advance());
    }

    #[tokio::test(start_paused = true)]
    async fn test_sign_in_reports_destination() {
        let mut dashboard = dashboard();
        dashboard.handle_key(KeyCode::Down);
        dashboard.handle_key(KeyCode::Down);
        dashboard.handle_key(KeyCode::Char(' '));
        dashboard.handle_key(KeyCode::Enter);
        assert_eq!(dashboard.signed_in_as(), None);

        tokio::time::sleep(std::time::Duration::from_millis(1300)).await;
        dashboard.pump();
        assert_eq!(dashboard.signed_in_as(), Some(Role::Volunteer));
    }
}
