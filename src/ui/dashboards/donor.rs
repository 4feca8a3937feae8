use crossterm::event::KeyCode;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};
use std::sync::Arc;

use super::{handle_step_key, move_cursor, run_logged};
use crate::catalog::{calculate_co2_prevented, format_number, Catalog, POUNDS_PER_MEAL};
use crate::config::SimulationConfig;
use crate::roles::donor::{DonorAction, DonorFlow, ScanStatus};
use crate::ui::keybindings::ShortcutContext;
use crate::ui::widgets::{
    dashboard_layout, freshness_span, render_footer, render_header, render_step_indicator,
    PrimaryButton,
};
use crate::workflow::Workflow;

pub struct DonorDashboard {
    workflow: Workflow<DonorFlow>,
    history_state: ListState,
}

impl DonorDashboard {
    pub fn new(catalog: Arc<Catalog>, timing: SimulationConfig) -> Self {
        Self {
            workflow: Workflow::new(DonorFlow::new(catalog), timing),
            history_state: ListState::default(),
        }
    }

    pub fn workflow(&self) -> &Workflow<DonorFlow> {
        &self.workflow
    }

    pub fn pump(&mut self) -> usize {
        self.workflow.pump()
    }

    fn catalog(&self) -> &Catalog {
        self.workflow.flow().catalog()
    }

    pub fn handle_key(&mut self, code: KeyCode) -> bool {
        if handle_step_key(&mut self.workflow, code) {
            return true;
        }

        let action = match code {
            KeyCode::Char('s') => DonorAction::ScanFood,
            KeyCode::Char('v') => DonorAction::ToggleDiet,
            KeyCode::Char('c') => DonorAction::CycleCategory,
            KeyCode::Char('u') => DonorAction::CycleUnit,
            KeyCode::Char('t') => DonorAction::CycleStorage,
            KeyCode::Char('+') => DonorAction::AdjustQuantity(10),
            KeyCode::Char('-') => DonorAction::AdjustQuantity(-10),
            _ => {
                let len = self.catalog().history.len();
                return move_cursor(&mut self.history_state, len, code);
            }
        };
        run_logged(&mut self.workflow, action);
        true
    }

    fn primary_label(&self) -> &'static str {
        let flags = self.workflow.flags();
        match self.workflow.current_step().get() {
            1 if !flags.donation_submitted => "Publish Listing",
            2 if !flags.claimed => "Accept Claim",
            3 if !flags.picked_up => "Confirm Pickup",
            1..=3 => "Continue",
            _ => "Donate Again",
        }
    }

    pub fn render(&mut self, frame: &mut Frame) {
        let layout = dashboard_layout(frame.area());

        let stats = &self.catalog().donor_stats;
        let header_stats = [
            ("donations", stats.total_donations.to_string()),
            ("meals rescued", format_number(stats.meals_rescued)),
            ("avg freshness", format!("{}%", stats.avg_freshness)),
            ("NGOs served", stats.ngos_served.to_string()),
        ];
        render_header(frame, layout.header, "Donor", &header_stats);
        render_step_indicator(frame, layout.indicator, &self.workflow);

        match self.workflow.current_step().get() {
            1 => self.render_post(frame, layout.body),
            2 => self.render_wait(frame, layout.body),
            3 => self.render_handover(frame, layout.body),
            _ => self.render_impact(frame, layout.body),
        }

        let button = PrimaryButton::for_workflow(&self.workflow, self.primary_label());
        render_footer(
            frame,
            layout.footer,
            ShortcutContext::Donor,
            &button,
            self.workflow.last_error(),
        );
    }

    fn body_block(&self) -> Block<'static> {
        let step = self.workflow.current();
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(format!(
                " {} {} {} ",
                self.workflow.direction().arrow(),
                step.icon.glyph(),
                step.label
            ))
    }

    fn render_post(&self, frame: &mut Frame, area: Rect) {
        let flags = self.workflow.flags();
        let draft = &flags.draft;
        let field = |label: &str, value: String, key: &str| {
            Line::from(vec![
                Span::styled(format!("{label:<15}"), Style::default().fg(Color::Gray)),
                Span::styled(value, Style::default().add_modifier(Modifier::BOLD)),
                Span::styled(format!("  ({key})"), Style::default().fg(Color::DarkGray)),
            ])
        };

        let diet = if draft.is_veg { "Veg" } else { "Non-Veg" };
        let mut lines = vec![
            field("Food", draft.food_name.clone(), "fixed"),
            field("Category", draft.category.label().to_string(), "c"),
            field("Quantity", draft.quantity_label(), "+/-, u"),
            field("Diet", diet.to_string(), "v"),
            field("Pickup window", draft.pickup_window.clone(), "fixed"),
            field("Storage", draft.storage.label().to_string(), "t"),
            Line::from(""),
        ];

        lines.push(match flags.scan {
            ScanStatus::Idle => Line::from(Span::styled(
                "Photo not scanned yet. Press s to check freshness.",
                Style::default().fg(Color::Gray),
            )),
            ScanStatus::Scanning => Line::from(Span::styled(
                "Analyzing freshness...",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::ITALIC),
            )),
            ScanStatus::Verified { freshness } => Line::from(vec![
                Span::styled("Freshness verified ", Style::default().fg(Color::Green)),
                freshness_span(freshness),
            ]),
        });

        if let Some(id) = &flags.listing_id {
            lines.push(Line::from(Span::styled(
                format!("Listing {id} published"),
                Style::default().fg(Color::Green),
            )));
        }

        frame.render_widget(
            Paragraph::new(lines)
                .block(self.body_block())
                .wrap(Wrap { trim: true }),
            area,
        );
    }

    fn render_wait(&self, frame: &mut Frame, area: Rect) {
        let flags = self.workflow.flags();
        let mut lines = Vec::new();

        match &flags.listing_id {
            Some(id) => lines.push(Line::from(format!(
                "Listing {id} is live: {} of {}",
                flags.draft.quantity_label(),
                flags.draft.food_name
            ))),
            None => lines.push(Line::from(Span::styled(
                "Nothing published yet. Go back to step 1.",
                Style::default().fg(Color::Yellow),
            ))),
        }
        lines.push(Line::from(""));

        match &flags.claimed_by {
            Some(ngo) => lines.push(Line::from(Span::styled(
                format!("✓ Claimed! {ngo} is on the way"),
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ))),
            None => {
                lines.push(Line::from(Span::styled(
                    "Nearby NGOs notified:",
                    Style::default().fg(Color::Gray),
                )));
                for ngo in &self.catalog().ngos {
                    lines.push(Line::from(format!(
                        "  {}  {:.1} km  capacity {}  needs {}",
                        ngo.name,
                        ngo.distance_km,
                        ngo.capacity.label(),
                        ngo.needs
                    )));
                }
            }
        }

        frame.render_widget(
            Paragraph::new(lines)
                .block(self.body_block())
                .wrap(Wrap { trim: true }),
            area,
        );
    }

    fn render_handover(&self, frame: &mut Frame, area: Rect) {
        let flags = self.workflow.flags();
        let mut lines = vec![Line::from(format!(
            "Pickup window: {}",
            flags.draft.pickup_window
        ))];

        if let Some(volunteer) = self.catalog().volunteers.first() {
            lines.push(Line::from(format!(
                "Volunteer: {} ({}, {:.1} km away, ★ {:.1})",
                volunteer.name, volunteer.vehicle, volunteer.distance_km, volunteer.rating
            )));
        }
        lines.push(Line::from(""));
        lines.push(if flags.picked_up {
            Line::from(Span::styled(
                "✓ Food handed over",
                Style::default().fg(Color::Green),
            ))
        } else {
            Line::from(Span::styled(
                "Waiting for the volunteer to collect",
                Style::default().fg(Color::Gray),
            ))
        });

        frame.render_widget(
            Paragraph::new(lines)
                .block(self.body_block())
                .wrap(Wrap { trim: true }),
            area,
        );
    }

    fn render_impact(&self, frame: &mut Frame, area: Rect) {
        let flags = self.workflow.flags();
        let meals = flags.meals_impact();
        let co2 = calculate_co2_prevented(f64::from(meals) * POUNDS_PER_MEAL);

        let mut items = vec![
            ListItem::new(Line::from(Span::styled(
                format!("🎉 {meals} meals rescued, {co2} lbs CO₂ prevented"),
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ))),
            ListItem::new(""),
        ];

        let history_offset = items.len();
        for record in &self.catalog().history {
            items.push(ListItem::new(Line::from(vec![
                Span::styled(format!("{} ", record.id), Style::default().fg(Color::Gray)),
                Span::raw(format!("{:<26}", record.food_item)),
                Span::raw(format!("{:<16}", record.ngo)),
                Span::raw(format!("{}  ", record.date.format("%b %d"))),
                freshness_span(record.freshness),
                Span::raw(format!("  {}", record.status.label())),
            ])));
        }

        let mut state = ListState::default();
        state.select(self.history_state.selected().map(|i| i + history_offset));

        let list = List::new(items)
            .block(self.body_block())
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
        frame.render_stateful_widget(list, area, &mut state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::dashboards::buffer_text;
    use ratatui::{backend::TestBackend, Terminal};

    fn dashboard() -> DonorDashboard {
        DonorDashboard::new(Arc::new(Catalog::demo()), SimulationConfig::default())
    }

    fn render(dashboard: &mut DonorDashboard) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal.draw(|f| dashboard.render(f)).unwrap();
        buffer_text(terminal.backend().buffer())
    }

    #[test]
    fn test_renders_post_surplus_form() {
        let mut dashboard = dashboard();
        let text = render(&mut dashboard);
        assert!(text.contains("Post Surplus"));
        assert!(text.contains("Veg Biryani"));
        assert!(text.contains("150 Plates"));
        assert!(text.contains("Publish Listing"));
    }

    #[test]
    fn test_form_keys_edit_the_draft() {
        let mut dashboard = dashboard();
        assert!(dashboard.handle_key(KeyCode::Char('+')));
        assert!(dashboard.handle_key(KeyCode::Char('u')));
        assert_eq!(dashboard.workflow().flags().draft.quantity_label(), "160 Kg");
    }

    #[tokio::test(start_paused = true)]
    async fn test_enter_publishes_and_moves_on() {
        let mut dashboard = dashboard();
        dashboard.handle_key(KeyCode::Enter);
        assert!(dashboard.workflow().is_busy());
        assert!(render(&mut dashboard).contains("Publish Listing..."));

        tokio::time::sleep(std::time::Duration::from_millis(900)).await;
        assert_eq!(dashboard.pump(), 1);
        assert_eq!(dashboard.workflow().current_step().get(), 2);
        assert!(render(&mut dashboard).contains("is live"));
    }

    #[test]
    fn test_impact_step_shows_history() {
        let mut dashboard = dashboard();
        dashboard.handle_key(KeyCode::Char('4'));
        let text = render(&mut dashboard);
        assert!(text.contains("150 meals rescued"));
        assert!(text.contains("D-1042"));
        assert!(text.contains("Donate Again"));
    }
}
