//! Pieces shared by every dashboard: the layout, step indicator, stat header,
//! footer with the primary button, and a few colour helpers.

use ratatui::{
    layout::{Constraint, Direction as LayoutDirection, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
    Frame,
};

use crate::catalog::{freshness_band, FreshnessBand, Priority, Urgency};
use crate::ui::keybindings::{shortcuts_for_context, ShortcutContext};
use crate::workflow::{Flow, StepStatus, Workflow, WorkflowError};

/// Areas of a dashboard screen, top to bottom
pub struct DashboardLayout {
    pub header: Rect,
    pub indicator: Rect,
    pub body: Rect,
    pub footer: Rect,
}

pub fn dashboard_layout(area: Rect) -> DashboardLayout {
    let chunks = Layout::default()
        .direction(LayoutDirection::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Min(6),
            Constraint::Length(4),
        ])
        .split(area);

    DashboardLayout {
        header: chunks[0],
        indicator: chunks[1],
        body: chunks[2],
        footer: chunks[3],
    }
}

/// State of the primary call-to-action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonState {
    Enabled,
    Disabled,
    Busy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimaryButton {
    pub label: String,
    pub state: ButtonState,
}

impl PrimaryButton {
    pub fn for_workflow<F: Flow>(wf: &Workflow<F>, label: impl Into<String>) -> Self {
        let state = if wf.is_busy() {
            ButtonState::Busy
        } else if wf.can_advance() {
            ButtonState::Enabled
        } else {
            ButtonState::Disabled
        };
        Self {
            label: label.into(),
            state,
        }
    }

    fn span(&self) -> Span<'static> {
        match self.state {
            ButtonState::Enabled => Span::styled(
                format!("[ {} ]", self.label),
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            ButtonState::Disabled => Span::styled(
                format!("[ {} ]", self.label),
                Style::default().fg(Color::DarkGray),
            ),
            ButtonState::Busy => Span::styled(
                format!("[ {}... ]", self.label),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::ITALIC),
            ),
        }
    }
}

/// Role title plus headline stats
pub fn render_header(frame: &mut Frame, area: Rect, title: &str, stats: &[(&str, String)]) {
    let mut spans = vec![Span::styled(
        format!(" {title} "),
        Style::default()
            .fg(Color::Black)
            .bg(Color::Green)
            .add_modifier(Modifier::BOLD),
    )];

    for (label, value) in stats {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            value.clone(),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled(
            format!(" {label}"),
            Style::default().fg(Color::Gray),
        ));
    }

    let header = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Green))
            .title(" ZeroWaste "),
    );
    frame.render_widget(header, area);
}

/// One line of step badges: done, current, upcoming
pub fn step_line<F: Flow>(wf: &Workflow<F>) -> Line<'static> {
    let mut spans = Vec::new();
    for (i, step) in wf.steps().iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" ─ ", Style::default().fg(Color::DarkGray)));
        }

        let (marker, style) = match wf.step_status(step.id) {
            StepStatus::Done => ("✓", Style::default().fg(Color::Green)),
            StepStatus::Current => (
                step.icon.glyph(),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            ),
            StepStatus::Upcoming => ("○", Style::default().fg(Color::Gray)),
        };

        spans.push(Span::styled(
            format!("{} {} {}", marker, step.id, step.label),
            style,
        ));
    }
    Line::from(spans)
}

pub fn render_step_indicator<F: Flow>(frame: &mut Frame, area: Rect, wf: &Workflow<F>) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray))
        .title(format!(
            " Step {} of {} {} ",
            wf.current_step(),
            wf.steps().len(),
            wf.direction().arrow()
        ));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(LayoutDirection::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(inner);

    frame.render_widget(Paragraph::new(step_line(wf)), rows[0]);

    let progress = wf.view().progress;
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::Green).bg(Color::Black))
        .percent(u16::from(progress))
        .label(format!("{progress}%"));
    frame.render_widget(gauge, rows[1]);
}

/// Key hints for the dashboard's own actions
fn hint_line(context: ShortcutContext) -> Line<'static> {
    let mut spans = vec![Span::styled(
        "Enter",
        Style::default().fg(Color::Yellow),
    )];
    spans.push(Span::raw(" continue  "));
    for shortcut in shortcuts_for_context(context) {
        spans.push(Span::styled(
            shortcut.key_display(),
            Style::default().fg(Color::Yellow),
        ));
        spans.push(Span::raw(format!(" {}  ", shortcut.description.to_lowercase())));
    }
    spans.push(Span::styled("?", Style::default().fg(Color::Yellow)));
    spans.push(Span::raw(" help"));
    Line::from(spans)
}

pub fn render_footer(
    frame: &mut Frame,
    area: Rect,
    context: ShortcutContext,
    button: &PrimaryButton,
    error: Option<&WorkflowError>,
) {
    let mut status = vec![button.span()];
    if let Some(err) = error {
        status.push(Span::raw("  "));
        status.push(Span::styled(
            format!("✗ {err}"),
            Style::default().fg(Color::Red),
        ));
    }

    let footer = Paragraph::new(vec![Line::from(status), hint_line(context)])
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Gray)),
        );
    frame.render_widget(footer, area);
}

pub fn freshness_color(value: u8) -> Color {
    match freshness_band(value) {
        FreshnessBand::Good => Color::Green,
        FreshnessBand::Fair => Color::Yellow,
        FreshnessBand::Poor => Color::Red,
    }
}

/// Ten-cell bar: "████████░░ 82%"
pub fn freshness_span(value: u8) -> Span<'static> {
    let filled = usize::from(value.min(100)) / 10;
    Span::styled(
        format!("{}{} {value}%", "█".repeat(filled), "░".repeat(10 - filled)),
        Style::default().fg(freshness_color(value)),
    )
}

pub fn priority_color(priority: Priority) -> Color {
    match priority {
        Priority::High => Color::Red,
        Priority::Medium => Color::Yellow,
        Priority::Low => Color::Gray,
    }
}

pub fn urgency_span(urgency: Urgency) -> Span<'static> {
    let color = match urgency {
        Urgency::Urgent => Color::Red,
        Urgency::Expiring => Color::Yellow,
        Urgency::Fresh => Color::Green,
    };
    Span::styled(format!("[{}]", urgency.label()), Style::default().fg(color))
}

pub fn diet_span(is_veg: bool) -> Span<'static> {
    if is_veg {
        Span::styled("● Veg", Style::default().fg(Color::Green))
    } else {
        Span::styled("● Non-Veg", Style::default().fg(Color::Red))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::config::SimulationConfig;
    use crate::roles::VolunteerFlow;
    use std::sync::Arc;

    #[test]
    fn test_freshness_bar_fill() {
        let span = freshness_span(82);
        assert_eq!(span.content, "████████░░ 82%");
        assert_eq!(span.style.fg, Some(Color::Green));
        assert_eq!(freshness_span(30).style.fg, Some(Color::Red));
    }

    #[test]
    fn test_step_line_marks_status() {
        let mut wf = Workflow::new(
            VolunteerFlow::new(Arc::new(Catalog::demo())),
            SimulationConfig::default(),
        );
        wf.go_to_step(2);
        let text = step_line(&wf).to_string();
        assert!(text.contains("✓ 1 Pickup Alerts"));
        assert!(text.contains("○ 3 Drop-Off"));
    }

    #[test]
    fn test_primary_button_reflects_gate() {
        let wf = Workflow::new(
            VolunteerFlow::new(Arc::new(Catalog::demo())),
            SimulationConfig::default(),
        );
        let button = PrimaryButton::for_workflow(&wf, "Continue");
        assert_eq!(button.state, ButtonState::Disabled);
    }
}
