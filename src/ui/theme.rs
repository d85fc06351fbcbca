use ratatui::style::{Color, Modifier, Style};

#[derive(Debug, Clone)]
pub struct Theme {
    // Overall background color to paint the full frame
    pub background_color: Color,

    // Banner
    pub name_style: Style,
    pub headline_style: Style,
    pub bio_style: Style,
    pub link_label_style: Style,
    pub link_style: Style,

    // Transcript
    pub user_prefix_style: Style,
    pub user_text_style: Style,
    pub assistant_text_style: Style,
    pub info_text_style: Style,
    pub warning_text_style: Style,
    pub error_text_style: Style,
    pub source_heading_style: Style,
    pub source_style: Style,

    // Request progress
    pub progress_pending_style: Style,
    pub progress_active_style: Style,
    pub progress_done_style: Style,
    pub progress_detail_style: Style,
    pub streaming_indicator_style: Style,

    // Follow-up questions
    pub suggestion_style: Style,
    pub suggestion_selected_style: Style,

    // Chrome
    pub title_style: Style,
    pub border_style: Style,
    pub status_style: Style,
    pub overlay_border_style: Style,
    pub overlay_text_style: Style,
    pub input_border_style: Style,
    pub input_title_style: Style,

    // Input area
    pub input_text_style: Style,
    pub input_cursor_style: Style,
    pub input_cursor_line_style: Style,
}

impl Theme {
    pub fn dark_default() -> Self {
        let accent = Color::Rgb(0x7a, 0xa2, 0xf7);
        let muted = Color::Rgb(0x56, 0x5f, 0x89);
        let text = Color::Rgb(0xc0, 0xca, 0xf5);

        Theme {
            background_color: Color::Rgb(0x1a, 0x1b, 0x26),

            name_style: Style::default().fg(accent).add_modifier(Modifier::BOLD),
            headline_style: Style::default().fg(text),
            bio_style: Style::default().fg(muted),
            link_label_style: Style::default()
                .fg(Color::Rgb(0xbb, 0x9a, 0xf7))
                .add_modifier(Modifier::BOLD),
            link_style: Style::default()
                .fg(Color::Rgb(0x7d, 0xcf, 0xff))
                .add_modifier(Modifier::UNDERLINED),

            user_prefix_style: Style::default().fg(accent).add_modifier(Modifier::BOLD),
            user_text_style: Style::default().fg(accent),
            assistant_text_style: Style::default().fg(text),
            info_text_style: Style::default().fg(muted),
            warning_text_style: Style::default().fg(Color::Rgb(0xe0, 0xaf, 0x68)),
            error_text_style: Style::default()
                .fg(Color::Rgb(0xf7, 0x76, 0x8e))
                .add_modifier(Modifier::BOLD),
            source_heading_style: Style::default().fg(muted).add_modifier(Modifier::BOLD),
            source_style: Style::default().fg(muted).add_modifier(Modifier::ITALIC),

            progress_pending_style: Style::default().fg(muted),
            progress_active_style: Style::default().fg(Color::Rgb(0xe0, 0xaf, 0x68)),
            progress_done_style: Style::default().fg(Color::Rgb(0x9e, 0xce, 0x6a)),
            progress_detail_style: Style::default().fg(muted),
            streaming_indicator_style: Style::default().fg(text),

            suggestion_style: Style::default().fg(muted),
            suggestion_selected_style: Style::default()
                .fg(Color::Rgb(0x7d, 0xcf, 0xff))
                .add_modifier(Modifier::BOLD),

            title_style: Style::default().fg(muted),
            border_style: Style::default().fg(muted),
            status_style: Style::default().fg(Color::Rgb(0xe0, 0xaf, 0x68)),
            overlay_border_style: Style::default().fg(accent),
            overlay_text_style: Style::default().fg(text),
            input_border_style: Style::default().fg(muted),
            input_title_style: Style::default().fg(muted),

            input_text_style: Style::default().fg(text),
            input_cursor_style: Style::default().add_modifier(Modifier::REVERSED),
            input_cursor_line_style: Style::default(),
        }
    }
}
