use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::host::App;
use crate::session::Phase;
use crate::timer::time_limit_ms;
use crate::util::{format_mm_ss, remaining_fraction};

const HORIZONTAL_MARGIN: u16 = 2;

fn timer_style(remaining_ms: u64, total_ms: u64) -> Style {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let fraction = remaining_fraction(remaining_ms, total_ms);
    if fraction < 0.25 {
        bold.fg(Color::Red)
    } else if fraction < 0.5 {
        bold.fg(Color::Yellow)
    } else {
        bold.fg(Color::Green)
    }
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.session.phase() {
            Phase::Loading => render_loading(area, buf),
            Phase::Failed(message) => render_failed(message, area, buf),
            Phase::InProgress => render_in_progress(self, area, buf),
            Phase::Completed => render_completed(self, area, buf),
        }
    }
}

fn render_loading(area: Rect, buf: &mut Buffer) {
    let message = Paragraph::new(Span::styled(
        "Loading questions...",
        Style::default()
            .add_modifier(Modifier::DIM | Modifier::ITALIC),
    ))
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true });

    message.render(area, buf);
}

fn render_failed(message: &str, area: Rect, buf: &mut Buffer) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(area);

    let error = Paragraph::new(Span::styled(
        format!("Could not start the interview: {message}"),
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true });
    error.render(chunks[0], buf);

    hint_line("(esc) quit and retry from the command line").render(chunks[1], buf);
}

fn render_in_progress(app: &App, area: Rect, buf: &mut Buffer) {
    // InProgress always has a current question.
    let Some(question) = app.session.current_question() else {
        return;
    };

    let total_ms = time_limit_ms(question.difficulty);
    let remaining_ms = app.session.time_remaining_ms();

    let warning_lines = if app.session.storage_warnings().is_empty() {
        0
    } else {
        1
    };

    let max_chars_per_line = area.width.saturating_sub(HORIZONTAL_MARGIN * 2).max(1);
    let editor_cap = (area.height / 3).max(3);
    let editor_occupied_lines =
        ((app.editor.width() as f64 / max_chars_per_line as f64).ceil() as u16)
            .clamp(3, editor_cap)
            + 2; // borders

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints([
            Constraint::Length(1), // header
            Constraint::Length(1), // padding
            Constraint::Min(3),    // question panel
            Constraint::Length(editor_occupied_lines),
            Constraint::Length(warning_lines),
            Constraint::Length(1), // hints
        ])
        .split(area);

    let header = Line::from(vec![
        Span::styled(
            format!(
                "Question {} of {}",
                app.session.current_index() + 1,
                app.session.total_questions()
            ),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(
            "  ·  {} / {}  ·  ",
            question.kind, question.difficulty
        )),
        Span::styled(
            format_mm_ss(remaining_ms),
            timer_style(remaining_ms, total_ms),
        ),
    ]);
    Paragraph::new(header).render(chunks[0], buf);

    let mut lines: Vec<Line> = vec![Line::from(question.prompt.clone())];
    if !question.examples.is_empty() {
        lines.push(Line::default());
        for (idx, example) in question.examples.iter().enumerate() {
            lines.push(Line::from(Span::styled(
                format!("Example {}:", idx + 1),
                Style::default().add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(format!("  Input: {}", example.input)));
            lines.push(Line::from(format!("  Output: {}", example.output)));
            if let Some(explanation) = &example.explanation {
                lines.push(Line::from(Span::styled(
                    format!("  {explanation}"),
                    Style::default().add_modifier(Modifier::ITALIC),
                )));
            }
        }
    }
    if !question.constraints.is_empty() {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            "Constraints:",
            Style::default().add_modifier(Modifier::BOLD),
        )));
        for constraint in &question.constraints {
            lines.push(Line::from(format!("  - {constraint}")));
        }
    }
    Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .render(chunks[2], buf);

    let mut editor_spans = vec![Span::raw(app.editor.clone())];
    editor_spans.push(Span::styled(
        "█",
        Style::default().add_modifier(Modifier::DIM),
    ));
    Paragraph::new(Line::from(editor_spans))
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title("Answer"))
        .render(chunks[3], buf);

    if let Some(last) = app.session.storage_warnings().last() {
        Paragraph::new(Span::styled(
            format!("warning: {last}"),
            Style::default().fg(Color::Yellow),
        ))
        .render(chunks[4], buf);
    }

    hint_line("(ctrl+s) submit answer  (esc) abandon interview").render(chunks[5], buf);
}

fn render_completed(app: &App, area: Rect, buf: &mut Buffer) {
    let answers = app.session.completed_answers();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(area);

    let who = app
        .candidate
        .as_deref()
        .map(|name| format!(" — thank you, {name}!"))
        .unwrap_or_default();
    Paragraph::new(Span::styled(
        format!(
            "Interview complete: {} of {} questions answered{who}",
            answers.len(),
            app.session.total_questions()
        ),
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD),
    ))
    .render(chunks[0], buf);

    let mut lines: Vec<Line> = Vec::with_capacity(answers.len() + 1);
    for record in answers {
        let clock = if record.time_remaining_ms == 0 {
            Span::styled("time expired", Style::default().fg(Color::Red))
        } else {
            Span::raw(format!("{} left", format_mm_ss(record.time_remaining_ms)))
        };
        lines.push(Line::from(vec![
            Span::styled(
                format!("{:<12}", record.question_id),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            clock,
        ]));
    }
    if !app.session.storage_warnings().is_empty() {
        lines.push(Line::from(Span::styled(
            "answers were not durably saved; this summary may be the only record:",
            Style::default().fg(Color::Yellow),
        )));
        for warning in app.session.storage_warnings() {
            lines.push(Line::from(Span::styled(
                format!("  {warning}"),
                Style::default().fg(Color::Yellow),
            )));
        }
    }
    Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .render(chunks[1], buf);

    hint_line("(esc) exit").render(chunks[2], buf);
}

fn hint_line(text: &str) -> Paragraph<'_> {
    Paragraph::new(Span::styled(
        text,
        Style::default().add_modifier(Modifier::DIM | Modifier::ITALIC),
    ))
    .alignment(Alignment::Center)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::question::{Difficulty, Question};
    use crate::session::Session;

    fn buffer_text(buf: &Buffer) -> String {
        let area = buf.area();
        let mut out = String::new();
        for y in area.top()..area.bottom() {
            for x in area.left()..area.right() {
                if let Some(cell) = buf.cell((x, y)) {
                    out.push_str(cell.symbol());
                }
            }
            out.push('\n');
        }
        out
    }

    fn render(app: &App) -> String {
        let area = Rect::new(0, 0, 100, 30);
        let mut buf = Buffer::empty(area);
        app.render(area, &mut buf);
        buffer_text(&buf)
    }

    fn app_with_open_warning() -> App {
        let mut session = Session::new();
        session.warn_storage("answer log unavailable (disk full); answers kept in memory only");
        session
            .begin(vec![Question {
                id: "q1".to_string(),
                prompt: "Reverse a string.".to_string(),
                kind: Default::default(),
                difficulty: Difficulty::Easy,
                starter_code: None,
                examples: vec![],
                constraints: vec![],
            }])
            .unwrap();
        App::new(session, "int-test".to_string(), None)
    }

    #[test]
    fn test_open_failure_warning_is_shown_in_progress() {
        let text = render(&app_with_open_warning());
        assert!(text.contains("warning: answer log unavailable"));
    }

    #[test]
    fn test_open_failure_warning_is_shown_on_completion() {
        let mut app = app_with_open_warning();
        app.session.submit_current("done").unwrap();

        let text = render(&app);
        assert!(text.contains("answers were not durably saved"));
        assert!(text.contains("answer log unavailable"));
    }

    #[test]
    fn test_timer_style_thresholds() {
        let green = timer_style(30_000, 60_000);
        assert_eq!(green.fg, Some(Color::Green));

        let yellow = timer_style(20_000, 60_000);
        assert_eq!(yellow.fg, Some(Color::Yellow));

        let red = timer_style(10_000, 60_000);
        assert_eq!(red.fg, Some(Color::Red));
    }

    #[test]
    fn test_timer_style_zero_budget_is_red() {
        assert_eq!(timer_style(0, 0).fg, Some(Color::Red));
    }
}
