use crossterm::event::KeyCode;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, List, ListItem, ListState, Paragraph},
    Frame,
};
use std::sync::Arc;

use super::{handle_step_key, move_cursor, run_logged};
use crate::catalog::{format_number, priority_score, Catalog, Donation};
use crate::config::SimulationConfig;
use crate::roles::ngo::{NgoAction, NgoFlow};
use crate::ui::keybindings::ShortcutContext;
use crate::ui::widgets::{
    dashboard_layout, diet_span, freshness_span, priority_color, render_footer, render_header,
    render_step_indicator, urgency_span, PrimaryButton,
};
use crate::workflow::Workflow;

pub struct NgoDashboard {
    workflow: Workflow<NgoFlow>,
    surplus_state: ListState,
    volunteer_state: ListState,
}

impl NgoDashboard {
    pub fn new(catalog: Arc<Catalog>, timing: SimulationConfig) -> Self {
        let mut surplus_state = ListState::default();
        surplus_state.select(Some(0));
        let mut volunteer_state = ListState::default();
        volunteer_state.select(Some(0));

        Self {
            workflow: Workflow::new(NgoFlow::new(catalog), timing),
            surplus_state,
            volunteer_state,
        }
    }

    pub fn workflow(&self) -> &Workflow<NgoFlow> {
        &self.workflow
    }

    pub fn pump(&mut self) -> usize {
        self.workflow.pump()
    }

    fn catalog(&self) -> &Catalog {
        self.workflow.flow().catalog()
    }

    /// Donations shown under the active filter, most urgent first
    fn visible_donations(&self) -> Vec<&Donation> {
        self.catalog()
            .ranked_donations(self.workflow.flags().filter)
    }

    fn selected_donation_id(&self) -> Option<String> {
        let i = self.surplus_state.selected()?;
        self.visible_donations().get(i).map(|d| d.id.clone())
    }

    fn selected_volunteer(&self) -> Option<String> {
        let i = self.volunteer_state.selected()?;
        self.catalog().volunteers.get(i).map(|v| v.name.clone())
    }

    pub fn handle_key(&mut self, code: KeyCode) -> bool {
        if handle_step_key(&mut self.workflow, code) {
            return true;
        }

        let step = self.workflow.current_step().get();
        match code {
            KeyCode::Char('f') => {
                let next = self.workflow.flags().filter.cycle();
                run_logged(&mut self.workflow, NgoAction::SetFilter(next));
                self.surplus_state.select(Some(0));
                true
            }
            KeyCode::Char(' ') if step == 2 => {
                if let Some(id) = self.selected_donation_id() {
                    run_logged(&mut self.workflow, NgoAction::ToggleClaim(id));
                }
                true
            }
            KeyCode::Char(' ') if step == 3 => {
                if let Some(name) = self.selected_volunteer() {
                    run_logged(&mut self.workflow, NgoAction::AssignVolunteer(name));
                }
                true
            }
            _ if step == 3 => {
                let len = self.catalog().volunteers.len();
                move_cursor(&mut self.volunteer_state, len, code)
            }
            _ => {
                let len = self.visible_donations().len();
                move_cursor(&mut self.surplus_state, len, code)
            }
        }
    }

    fn primary_label(&self) -> &'static str {
        match self.workflow.current_step().get() {
            1..=3 => "Continue",
            _ if self.workflow.flags().delivered => "Claim More Food",
            _ => "Confirm Receipt",
        }
    }

    pub fn render(&mut self, frame: &mut Frame) {
        let layout = dashboard_layout(frame.area());

        let stats = &self.catalog().ngo_stats;
        let header_stats = [
            ("meals received", format_number(stats.meals_received)),
            ("people served", format_number(stats.people_served)),
            ("active donations", stats.active_donations.to_string()),
            ("waste reduced", stats.waste_reduced.clone()),
        ];
        render_header(frame, layout.header, "NGO", &header_stats);
        render_step_indicator(frame, layout.indicator, &self.workflow);

        match self.workflow.current_step().get() {
            1 | 2 => self.render_surplus(frame, layout.body),
            3 => self.render_volunteers(frame, layout.body),
            _ => self.render_delivery(frame, layout.body),
        }

        let button = PrimaryButton::for_workflow(&self.workflow, self.primary_label());
        render_footer(
            frame,
            layout.footer,
            ShortcutContext::Ngo,
            &button,
            self.workflow.last_error(),
        );
    }

    fn body_block(&self, extra: &str) -> Block<'static> {
        let step = self.workflow.current();
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(format!(
                " {} {} {}{} ",
                self.workflow.direction().arrow(),
                step.icon.glyph(),
                step.label,
                extra
            ))
    }

    fn render_surplus(&mut self, frame: &mut Frame, area: Rect) {
        let flags = self.workflow.flags();
        let claiming = self.workflow.current_step().get() == 2;

        let items: Vec<ListItem> = self
            .visible_donations()
            .into_iter()
            .map(|d| {
                let mark = if flags.is_claimed(&d.id) { "[✓] " } else { "[ ] " };
                let mut spans = Vec::new();
                if claiming {
                    spans.push(Span::styled(mark, Style::default().fg(Color::Green)));
                }
                spans.extend([
                    Span::styled(
                        format!("{:<26}", d.food_type),
                        Style::default().fg(priority_color(d.priority)),
                    ),
                    Span::raw(format!("{:<22}", d.source)),
                    Span::raw(format!("{:>4.1} km  ", d.distance_km)),
                    freshness_span(d.freshness),
                    Span::raw("  "),
                    diet_span(d.is_veg),
                    Span::raw("  "),
                    urgency_span(d.urgency),
                    Span::styled(
                        format!("  score {}  {}", priority_score(d), d.time_ago),
                        Style::default().fg(Color::Gray),
                    ),
                ]);
                ListItem::new(Line::from(spans))
            })
            .collect();

        let extra = format!(
            "  filter: {}  claimed: {}",
            flags.filter.label(),
            flags.claimed.len()
        );
        let list = List::new(items)
            .block(self.body_block(&extra))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");

        let mut state = self.surplus_state.clone();
        frame.render_stateful_widget(list, area, &mut state);
        self.surplus_state = state;
    }

    fn render_volunteers(&mut self, frame: &mut Frame, area: Rect) {
        let assigned = self.workflow.flags().assigned_volunteer.clone();

        let items: Vec<ListItem> = self
            .catalog()
            .volunteers
            .iter()
            .map(|v| {
                let mark = if assigned.as_deref() == Some(v.name.as_str()) {
                    "(●) "
                } else {
                    "( ) "
                };
                ListItem::new(Line::from(vec![
                    Span::styled(mark, Style::default().fg(Color::Green)),
                    Span::styled(
                        format!("{:<16}", v.name),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(format!("{:<6}", v.vehicle)),
                    Span::raw(format!("{:.1} km  ★ {:.1}", v.distance_km, v.rating)),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(self.body_block(""))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");

        let mut state = self.volunteer_state.clone();
        frame.render_stateful_widget(list, area, &mut state);
        self.volunteer_state = state;
    }

    fn render_delivery(&self, frame: &mut Frame, area: Rect) {
        let block = self.body_block("");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(1)])
            .split(inner);

        let flags = self.workflow.flags();
        let volunteer = flags
            .assigned_volunteer
            .as_deref()
            .unwrap_or("no volunteer yet");
        let mut lines = vec![Line::from(format!(
            "{} claimed item(s) on the way with {volunteer}",
            flags.claimed.len()
        ))];

        if flags.delivered {
            lines.push(Line::from(Span::styled(
                "✓ Delivery received. Thank you!",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )));
        }

        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Incoming pickups:",
            Style::default().fg(Color::Gray),
        )));
        for pickup in &self.catalog().incoming_pickups {
            lines.push(Line::from(format!(
                "  {}  {:<24} {:<14} ETA {:<8} {}",
                pickup.id,
                pickup.food_item,
                pickup.volunteer,
                pickup.eta,
                pickup.status.label()
            )));
        }
        frame.render_widget(Paragraph::new(lines), rows[0]);

        let stats = &self.catalog().ngo_stats;
        let ratio = if stats.capacity_total == 0 {
            0.0
        } else {
            f64::from(stats.capacity_used) / f64::from(stats.capacity_total)
        };
        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(Color::Cyan))
            .ratio(ratio.clamp(0.0, 1.0))
            .label(format!(
                "Storage {} / {} meals",
                stats.capacity_used, stats.capacity_total
            ));
        frame.render_widget(gauge, rows[1]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::DonationFilter;
    use crate::ui::dashboards::buffer_text;
    use ratatui::{backend::TestBackend, Terminal};

    fn dashboard() -> NgoDashboard {
        NgoDashboard::new(Arc::new(Catalog::demo()), SimulationConfig::default())
    }

    fn render(dashboard: &mut NgoDashboard) -> String {
        let mut terminal = Terminal::new(TestBackend::new(140, 30)).unwrap();
        terminal.draw(|f| dashboard.render(f)).unwrap();
        buffer_text(terminal.backend().buffer())
    }

    #[test]
    fn test_surplus_list_is_ranked() {
        let mut dashboard = dashboard();
        let text = render(&mut dashboard);
        let biryani = text.find("Biryani").unwrap();
        let fruits = text.find("Mixed Fruits").unwrap();
        assert!(biryani < fruits);
        assert!(text.contains("score 160"));
    }

    #[test]
    fn test_space_claims_selected_donation() {
        let mut dashboard = dashboard();
        dashboard.handle_key(KeyCode::Char('2'));
        assert!(!dashboard.workflow().can_advance());

        dashboard.handle_key(KeyCode::Char(' '));
        assert_eq!(dashboard.workflow().flags().claimed, vec!["DON-001"]);
        assert!(dashboard.workflow().can_advance());
        assert!(render(&mut dashboard).contains("[✓]"));
    }

    #[test]
    fn test_filter_key_cycles() {
        let mut dashboard = dashboard();
        dashboard.handle_key(KeyCode::Char('f'));
        assert_eq!(dashboard.workflow().flags().filter, DonationFilter::Veg);
        assert!(!render(&mut dashboard).contains("Grand Hyatt"));
    }

    #[test]
    fn test_assign_then_confirm_delivery() {
        let mut dashboard = dashboard();
        dashboard.handle_key(KeyCode::Char('2'));
        dashboard.handle_key(KeyCode::Char(' '));
        dashboard.handle_key(KeyCode::Enter);
        assert_eq!(dashboard.workflow().current_step().get(), 3);

        dashboard.handle_key(KeyCode::Down);
        dashboard.handle_key(KeyCode::Char(' '));
        assert_eq!(
            dashboard.workflow().flags().assigned_volunteer.as_deref(),
            Some("Amit Kumar")
        );

        dashboard.handle_key(KeyCode::Enter);
        dashboard.handle_key(KeyCode::Enter);
        assert!(dashboard.workflow().flags().delivered);
        let text = render(&mut dashboard);
        assert!(text.contains("Delivery received"));
        assert!(text.contains("Storage 320 / 500 meals"));
    }
}
