use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{List, ListItem, ListState, Paragraph};
use ratatui::Frame;

use super::app::{AppState, ListRow};

const COLOR_TEXT: Color = Color::Rgb(234, 236, 239);
const COLOR_MUTED: Color = Color::Rgb(160, 165, 172);
const COLOR_HEADER: Color = Color::Rgb(122, 170, 255);
const COLOR_SELECTED: Color = Color::Rgb(126, 210, 146);
const COLOR_PRESENT: Color = Color::Rgb(244, 200, 98);

pub fn render(frame: &mut Frame, app: &mut AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(1),
            ]
            .as_ref(),
        )
        .split(frame.size());

    let header = Paragraph::new(Line::from(Span::styled(
        app.header.clone(),
        Style::default().fg(COLOR_HEADER).add_modifier(Modifier::BOLD),
    )));
    frame.render_widget(header, chunks[0]);

    let items: Vec<ListItem> = app.rows.iter().map(row_item).collect();
    let list = List::new(items).highlight_style(
        Style::default()
            .bg(Color::Rgb(52, 56, 60))
            .add_modifier(Modifier::BOLD),
    );
    let mut state = ListState::default();
    state.select(Some(app.cursor));
    frame.render_stateful_widget(list, chunks[1], &mut state);

    let footer_text = match &app.info_message {
        Some(message) => format!("{message}  \u{2502}  space select  c complete  r reset  h hide  q quit"),
        None => "space select  c complete  r reset  h hide  d/w simulate  q quit".to_string(),
    };
    let footer = Paragraph::new(Line::from(Span::styled(
        footer_text,
        Style::default().fg(COLOR_MUTED),
    )));
    frame.render_widget(footer, chunks[2]);
}

fn row_item(row: &ListRow) -> ListItem<'_> {
    let line = match row {
        ListRow::TierHeader(title) => Line::from(Span::styled(
            *title,
            Style::default().fg(COLOR_HEADER).add_modifier(Modifier::BOLD),
        )),
        ListRow::SectionHeader(title) => Line::from(Span::styled(
            format!("  {title}"),
            Style::default().fg(COLOR_TEXT).add_modifier(Modifier::BOLD),
        )),
        ListRow::Break => Line::from(Span::styled(
            "    \u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}",
            Style::default().fg(COLOR_MUTED),
        )),
        ListRow::Task { id, selected } => {
            let mark = if *selected { "[x]" } else { "[ ]" };
            let style = if *selected {
                Style::default().fg(COLOR_SELECTED)
            } else {
                Style::default().fg(COLOR_TEXT)
            };
            Line::from(Span::styled(format!("    {mark} {id}"), style))
        }
        ListRow::Timer { label, selected, .. } => {
            let mark = if *selected { "[x]" } else { "[ ]" };
            let style = if label.contains("Present") {
                Style::default().fg(COLOR_PRESENT)
            } else {
                Style::default().fg(COLOR_TEXT)
            };
            Line::from(Span::styled(format!("  {mark} {label}"), style))
        }
    };
    ListItem::new(line)
}
