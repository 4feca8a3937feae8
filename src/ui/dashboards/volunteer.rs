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
use crate::catalog::{Catalog, TaskStatus};
use crate::config::SimulationConfig;
use crate::roles::volunteer::{VolunteerAction, VolunteerFlow};
use crate::ui::keybindings::ShortcutContext;
use crate::ui::widgets::{
    dashboard_layout, priority_color, render_footer, render_header, render_step_indicator,
    PrimaryButton,
};
use crate::workflow::Workflow;

pub struct VolunteerDashboard {
    workflow: Workflow<VolunteerFlow>,
    task_state: ListState,
    checklist_state: ListState,
}

impl VolunteerDashboard {
    pub fn new(catalog: Arc<Catalog>, timing: SimulationConfig) -> Self {
        let mut task_state = ListState::default();
        task_state.select(Some(0));
        let mut checklist_state = ListState::default();
        checklist_state.select(Some(0));

        Self {
            workflow: Workflow::new(VolunteerFlow::new(catalog), timing),
            task_state,
            checklist_state,
        }
    }

    pub fn workflow(&self) -> &Workflow<VolunteerFlow> {
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

        let step = self.workflow.current_step().get();
        match code {
            KeyCode::Char('s') => {
                run_logged(&mut self.workflow, VolunteerAction::ScanQr);
                true
            }
            KeyCode::Char('p') => {
                run_logged(&mut self.workflow, VolunteerAction::UploadPhoto);
                true
            }
            KeyCode::Char(' ') if step == 1 => {
                let selected = self
                    .task_state
                    .selected()
                    .and_then(|i| self.catalog().tasks.get(i))
                    .map(|t| t.id.clone());
                if let Some(id) = selected {
                    run_logged(&mut self.workflow, VolunteerAction::AcceptTask(id));
                }
                true
            }
            KeyCode::Char(' ') if step == 3 => {
                if let Some(i) = self.checklist_state.selected() {
                    run_logged(&mut self.workflow, VolunteerAction::ToggleChecklist(i));
                }
                true
            }
            _ if step == 3 => {
                let len = self.catalog().checklist.len();
                move_cursor(&mut self.checklist_state, len, code)
            }
            _ => {
                let len = self.catalog().tasks.len();
                move_cursor(&mut self.task_state, len, code)
            }
        }
    }

    fn primary_label(&self) -> &'static str {
        match self.workflow.current_step().get() {
            1 if self.workflow.is_busy() => "Accepting",
            1 if self.workflow.flags().accepted_task.is_none() => "Select a pickup",
            1 | 2 => "Continue",
            _ if self.workflow.flags().delivery_complete => "View More Pickups",
            _ => "Confirm Delivery",
        }
    }

    pub fn render(&mut self, frame: &mut Frame) {
        let layout = dashboard_layout(frame.area());

        let stats = &self.catalog().volunteer_stats;
        let header_stats = [
            ("deliveries", stats.completed_deliveries.to_string()),
            ("active pickups", stats.active_pickups.to_string()),
            ("score", format!("★ {:.1}", stats.volunteer_score)),
            ("travelled", stats.total_distance.clone()),
        ];
        render_header(frame, layout.header, "Volunteer", &header_stats);
        render_step_indicator(frame, layout.indicator, &self.workflow);

        match self.workflow.current_step().get() {
            1 => self.render_alerts(frame, layout.body),
            2 => self.render_pickup(frame, layout.body),
            _ => self.render_drop_off(frame, layout.body),
        }

        let button = PrimaryButton::for_workflow(&self.workflow, self.primary_label());
        render_footer(
            frame,
            layout.footer,
            ShortcutContext::Volunteer,
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

    fn render_alerts(&mut self, frame: &mut Frame, area: Rect) {
        let accepted = self.workflow.flags().accepted_task.clone();

        let items: Vec<ListItem> = self
            .catalog()
            .tasks
            .iter()
            .map(|t| {
                let status = if accepted.as_deref() == Some(t.id.as_str()) {
                    Span::styled("Accepted by you", Style::default().fg(Color::Green))
                } else if t.status == TaskStatus::Pending {
                    Span::styled("Open", Style::default().fg(Color::Yellow))
                } else {
                    Span::styled(t.status.label(), Style::default().fg(Color::Gray))
                };
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{} ", t.id), Style::default().fg(Color::Gray)),
                    Span::styled(
                        format!("{:<22}", t.food_item),
                        Style::default().fg(priority_color(t.priority)),
                    ),
                    Span::raw(format!("{} → {}  ", t.from, t.to)),
                    Span::raw(format!("{:.1} km  ETA {}  ", t.distance_km, t.eta)),
                    status,
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(self.body_block("  Space to accept"))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");

        let mut state = self.task_state.clone();
        frame.render_stateful_widget(list, area, &mut state);
        self.task_state = state;
    }

    fn render_pickup(&self, frame: &mut Frame, area: Rect) {
        let flags = self.workflow.flags();
        let task = flags
            .accepted_task
            .as_deref()
            .and_then(|id| self.catalog().task(id));

        let mut lines = Vec::new();
        match task {
            Some(task) => {
                lines.push(Line::from(Span::styled(
                    format!("{} ({})", task.food_item, task.id),
                    Style::default().add_modifier(Modifier::BOLD),
                )));
                lines.push(Line::from(format!("Pick up at: {}", task.from)));
                lines.push(Line::from(format!("Deliver to: {}", task.to)));
                lines.push(Line::from(format!(
                    "Route: {:.1} km, about {}",
                    task.distance_km, task.eta
                )));
            }
            None => lines.push(Line::from(Span::styled(
                "No pickup accepted yet. Pick one from the alerts.",
                Style::default().fg(Color::Yellow),
            ))),
        }

        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Pickup notes:",
            Style::default().fg(Color::Gray),
        )));
        for note in &self.catalog().pickup_notes {
            lines.push(Line::from(format!("  • {note}")));
        }

        frame.render_widget(
            Paragraph::new(lines)
                .block(self.body_block(""))
                .wrap(Wrap { trim: true }),
            area,
        );
    }

    fn render_drop_off(&mut self, frame: &mut Frame, area: Rect) {
        let flags = self.workflow.flags().clone();
        let done = |yes: bool| {
            if yes {
                Span::styled("✓", Style::default().fg(Color::Green))
            } else {
                Span::styled("✗", Style::default().fg(Color::Red))
            }
        };

        let mut items = vec![
            ListItem::new(Line::from(vec![
                done(flags.qr_scanned),
                Span::raw(" QR code scanned (s)   "),
                done(flags.photo_uploaded),
                Span::raw(" Photo uploaded (p)"),
            ])),
            ListItem::new(""),
        ];
        let offset = items.len();

        for (i, label) in self.catalog().checklist.iter().enumerate() {
            let ticked = flags.checklist.get(i).copied().unwrap_or(false);
            let mark = if ticked { "[✓] " } else { "[ ] " };
            items.push(ListItem::new(Line::from(vec![
                Span::styled(mark, Style::default().fg(Color::Green)),
                Span::raw(label.clone()),
            ])));
        }

        if flags.delivery_complete {
            items.push(ListItem::new(""));
            items.push(ListItem::new(Line::from(Span::styled(
                "✓ Delivery complete. Thank you!",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ))));
        }

        let extra = format!("  checklist {}%", flags.checklist_progress());
        let list = List::new(items)
            .block(self.body_block(&extra))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");

        let mut state = ListState::default();
        state.select(self.checklist_state.selected().map(|i| i + offset));
        frame.render_stateful_widget(list, area, &mut state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::dashboards::buffer_text;
    use ratatui::{backend::TestBackend, Terminal};

    fn dashboard() -> VolunteerDashboard {
        VolunteerDashboard::new(Arc::new(Catalog::demo()), SimulationConfig::default())
    }

    fn render(dashboard: &mut VolunteerDashboard) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal.draw(|f| dashboard.render(f)).unwrap();
        buffer_text(terminal.backend().buffer())
    }

    #[tokio::test(start_paused = true)]
    async fn test_space_accepts_task_and_advances() {
        let mut dashboard = dashboard();
        assert!(render(&mut dashboard).contains("Select a pickup"));

        dashboard.handle_key(KeyCode::Char(' '));
        assert!(dashboard.workflow().is_busy());

        tokio::time::sleep(std::time::Duration::from_millis(700)).await;
        dashboard.pump();

        assert_eq!(dashboard.workflow().current_step().get(), 2);
        let text = render(&mut dashboard);
        assert!(text.contains("Pick up at: Grand Hyatt"));
        assert!(text.contains("Take photo of seal"));
    }

    #[test]
    fn test_drop_off_checklist_keys() {
        let mut dashboard = dashboard();
        dashboard.handle_key(KeyCode::Char('3'));
        dashboard.handle_key(KeyCode::Char('s'));
        for _ in 0..4 {
            dashboard.handle_key(KeyCode::Char(' '));
            dashboard.handle_key(KeyCode::Down);
        }
        assert_eq!(dashboard.workflow().flags().checklist_progress(), 100);
        assert!(dashboard.workflow().can_advance());

        dashboard.handle_key(KeyCode::Enter);
        assert!(dashboard.workflow().flags().delivery_complete);
        let text = render(&mut dashboard);
        assert!(text.contains("Delivery complete"));
        assert!(text.contains("View More Pickups"));
    }
}
