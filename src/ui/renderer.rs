use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::core::app::{App, ChatState, Overlay};
use crate::core::message::{ConversationTurn, ProgressItem, ProgressStatus, Source, TranscriptRole};
use crate::core::profile::PROFILE;
use crate::ui::banner::banner_lines;
use crate::ui::theme::Theme;

const SPINNER_FRAMES: [&str; 4] = ["○", "◔", "◑", "◕"];
const INPUT_HEIGHT: u16 = 3;

pub fn ui(f: &mut Frame, app: &App) {
    let theme = &app.ui.theme;
    f.render_widget(
        Block::default().style(Style::default().bg(theme.background_color)),
        f.area(),
    );

    let banner = banner_lines(&PROFILE, theme);
    let activity = activity_lines(app);
    let activity_height = if activity.is_empty() {
        0
    } else {
        (activity.len() as u16).saturating_add(1).min(f.area().height / 3)
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(banner.len() as u16 + 1),
            Constraint::Min(1),
            Constraint::Length(activity_height),
            Constraint::Length(1),
            Constraint::Length(INPUT_HEIGHT + 2), // +2 for borders
        ])
        .split(f.area());

    let banner_widget = Paragraph::new(banner).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(theme.border_style),
    );
    f.render_widget(banner_widget, chunks[0]);

    render_transcript(f, app, chunks[1]);

    if activity_height > 0 {
        let activity_widget = Paragraph::new(activity)
            .block(
                Block::default()
                    .borders(Borders::TOP)
                    .border_style(theme.border_style),
            )
            .wrap(Wrap { trim: false });
        f.render_widget(activity_widget, chunks[2]);
    }

    if let Some(status) = app.ui.status.as_deref() {
        f.render_widget(
            Paragraph::new(Span::styled(status.to_string(), theme.status_style)),
            chunks[3],
        );
    }

    render_input(f, app, chunks[4]);

    match app.ui.overlay {
        Some(Overlay::Feedback) => render_overlay(f, theme, "Feedback", feedback_lines(theme)),
        Some(Overlay::Onboarding) => {
            render_overlay(f, theme, "Say hello", onboarding_lines(theme))
        }
        None => {}
    }
}

fn render_transcript(f: &mut Frame, app: &App, area: Rect) {
    let transcript = Paragraph::new(transcript_lines(app)).wrap(Wrap { trim: false });

    // Pin the view to the newest content.
    let total = u16::try_from(transcript.line_count(area.width)).unwrap_or(u16::MAX);
    let scroll = total.saturating_sub(area.height);

    f.render_widget(transcript.scroll((scroll, 0)), area);
}

fn render_input(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.ui.theme;
    let mut title = vec![Span::styled(app.ui.input_title(), theme.input_title_style)];
    if app.ui.is_in_flight() {
        title.push(Span::raw(" "));
        title.push(Span::styled(
            spinner_symbol(app.ui.spinner_frame),
            theme.streaming_indicator_style,
        ));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.input_border_style)
        .title(Line::from(title));
    let inner = block.inner(area);
    f.render_widget(block, area);
    if inner.width > 0 && inner.height > 0 {
        f.render_widget(app.ui.textarea(), inner);
    }
}

fn render_overlay(f: &mut Frame, theme: &Theme, title: &str, lines: Vec<Line<'static>>) {
    let area = centered_rect(60, lines.len() as u16 + 2, f.area());
    f.render_widget(Clear, area);
    let popup = Paragraph::new(lines)
        .style(Style::default().bg(theme.background_color))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.overlay_border_style)
                .title(Span::styled(title.to_string(), theme.title_style)),
        )
        .wrap(Wrap { trim: true });
    f.render_widget(popup, area);
}

/// Rectangle `percent_x` wide and `height` rows tall, centered in `area`.
fn centered_rect(percent_x: u16, height: u16, area: Rect) -> Rect {
    let width = (area.width as u32 * percent_x.min(100) as u32 / 100) as u16;
    let width = width.max(area.width.min(30));
    let height = height.min(area.height);
    Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 2,
        width,
        height,
    }
}

fn spinner_symbol(frame: usize) -> &'static str {
    SPINNER_FRAMES[frame % SPINNER_FRAMES.len()]
}

/// Whole conversation plus the answer currently being written.
pub fn transcript_lines(app: &App) -> Vec<Line<'static>> {
    let theme = &app.ui.theme;
    let mut lines = Vec::new();

    for turn in &app.ui.turns {
        push_turn_lines(&mut lines, turn, theme);
        lines.push(Line::default());
    }

    match app.ui.state {
        ChatState::AwaitingResponse if app.ui.partial_response.is_empty() => {
            lines.push(Line::from(Span::styled(
                format!("{} Thinking…", spinner_symbol(app.ui.spinner_frame)),
                theme.streaming_indicator_style,
            )));
        }
        ChatState::AwaitingResponse | ChatState::Responding => {
            for text in app.ui.partial_response.lines() {
                lines.push(Line::from(Span::styled(
                    text.to_string(),
                    theme.assistant_text_style,
                )));
            }
        }
        _ => {}
    }

    lines
}

fn push_turn_lines(lines: &mut Vec<Line<'static>>, turn: &ConversationTurn, theme: &Theme) {
    match turn.role {
        TranscriptRole::User => {
            let mut content = turn.content.lines();
            let first = content.next().unwrap_or_default();
            lines.push(Line::from(vec![
                Span::styled("You: ", theme.user_prefix_style),
                Span::styled(first.to_string(), theme.user_text_style),
            ]));
            for rest in content {
                lines.push(Line::from(Span::styled(
                    format!("     {rest}"),
                    theme.user_text_style,
                )));
            }
        }
        TranscriptRole::Assistant => {
            for text in turn.content.lines() {
                lines.push(Line::from(Span::styled(
                    text.to_string(),
                    theme.assistant_text_style,
                )));
            }
            if let Some(sources) = source_lines(&turn.sources, theme) {
                lines.extend(sources);
            }
        }
        TranscriptRole::AppInfo | TranscriptRole::AppWarning | TranscriptRole::AppError => {
            let style = match turn.role {
                TranscriptRole::AppWarning => theme.warning_text_style,
                TranscriptRole::AppError => theme.error_text_style,
                _ => theme.info_text_style,
            };
            for text in turn.content.lines() {
                lines.push(Line::from(Span::styled(text.to_string(), style)));
            }
        }
    }
}

/// Progress, sources gathered so far and follow-up questions, in that order.
fn activity_lines(app: &App) -> Vec<Line<'static>> {
    let theme = &app.ui.theme;
    let mut lines = Vec::new();
    if let Some(progress) = progress_lines(&app.ui.progress, theme) {
        lines.extend(progress);
    }
    if app.ui.is_in_flight() {
        if let Some(sources) = source_lines(&app.ui.sources, theme) {
            lines.extend(sources);
        }
    }
    let selected = match app.ui.state {
        ChatState::SuggestionFocus { selected } => Some(selected),
        _ => None,
    };
    if let Some(suggestions) = suggestion_lines(&app.ui.suggestions, selected, theme) {
        lines.extend(suggestions);
    }
    lines
}

pub fn progress_lines(items: &[ProgressItem], theme: &Theme) -> Option<Vec<Line<'static>>> {
    if items.is_empty() {
        return None;
    }
    let lines = items
        .iter()
        .map(|item| {
            let (glyph, style) = match item.status {
                ProgressStatus::Pending => ("○", theme.progress_pending_style),
                ProgressStatus::InProgress => ("◐", theme.progress_active_style),
                ProgressStatus::Completed => ("●", theme.progress_done_style),
            };
            let mut spans = vec![
                Span::styled(format!("{glyph} "), style),
                Span::styled(item.label.clone(), style),
            ];
            if let Some(detail) = item.detail.as_deref().filter(|d| !d.trim().is_empty()) {
                spans.push(Span::styled(
                    format!(" · {}", detail.trim()),
                    theme.progress_detail_style,
                ));
            }
            Line::from(spans)
        })
        .collect();
    Some(lines)
}

pub fn source_lines(sources: &[Source], theme: &Theme) -> Option<Vec<Line<'static>>> {
    if sources.is_empty() {
        return None;
    }
    let mut lines = Vec::with_capacity(sources.len() + 1);
    lines.push(Line::from(Span::styled(
        "Sources:",
        theme.source_heading_style,
    )));
    for source in sources {
        let title = if source.metadata.title.trim().is_empty() {
            source.id.as_str()
        } else {
            source.metadata.title.as_str()
        };
        let text = if source.metadata.kind.is_empty() {
            format!("  • {title}")
        } else {
            format!("  • {title} ({})", source.metadata.kind)
        };
        lines.push(Line::from(Span::styled(text, theme.source_style)));
    }
    Some(lines)
}

pub fn suggestion_lines(
    suggestions: &[String],
    selected: Option<usize>,
    theme: &Theme,
) -> Option<Vec<Line<'static>>> {
    if suggestions.is_empty() {
        return None;
    }
    let lines = suggestions
        .iter()
        .enumerate()
        .map(|(i, question)| {
            if selected == Some(i) {
                Line::from(Span::styled(
                    format!("› {question}"),
                    theme.suggestion_selected_style,
                ))
            } else {
                Line::from(Span::styled(format!("  {question}"), theme.suggestion_style))
            }
        })
        .collect();
    Some(lines)
}

fn feedback_lines(theme: &Theme) -> Vec<Line<'static>> {
    vec![
        Line::from(Span::styled(
            "How useful has this chat been?",
            theme.overlay_text_style,
        )),
        Line::default(),
        Line::from(Span::styled(
            "1 not much   2 somewhat   3 very",
            theme.suggestion_selected_style,
        )),
        Line::from(Span::styled(
            "Esc or d to skip, x to stop asking",
            theme.info_text_style,
        )),
    ]
}

fn onboarding_lines(theme: &Theme) -> Vec<Line<'static>> {
    vec![
        Line::from(Span::styled(
            format!("Want to reach {} directly?", PROFILE.name),
            theme.overlay_text_style,
        )),
        Line::from(vec![
            Span::styled("Email ", theme.link_label_style),
            Span::styled(PROFILE.email, theme.link_style),
        ]),
        Line::default(),
        Line::from(Span::styled(
            "Enter to start chatting, n to hide this next time",
            theme.info_text_style,
        )),
    ]
}
