//! Business-card header shown above the chat and by the `profile` command.

use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthStr;

use crate::core::profile::Profile;
use crate::ui::theme::Theme;

pub fn banner_lines(profile: &Profile, theme: &Theme) -> Vec<Line<'static>> {
    let mut lines = Vec::with_capacity(profile.bio.len() + 4);
    lines.push(Line::from(vec![
        Span::styled(profile.name.to_string(), theme.name_style),
        Span::styled(format!("  @{}", profile.handle), theme.bio_style),
    ]));
    lines.push(Line::from(Span::styled(
        profile.title.to_string(),
        theme.headline_style,
    )));
    for bio in profile.bio {
        lines.push(Line::from(Span::styled(bio.to_string(), theme.bio_style)));
    }

    let label_width = label_width(profile);
    let mut links = Vec::new();
    for (i, link) in profile.links.iter().enumerate() {
        if i > 0 {
            links.push(Span::raw("   "));
        }
        links.push(Span::styled(
            format!("{} ", pad_label(link.label, label_width)),
            theme.link_label_style,
        ));
        links.push(Span::styled(link.url.to_string(), theme.link_style));
    }
    if !links.is_empty() {
        lines.push(Line::from(links));
    }
    lines
}

/// Unstyled card for stdout, one link per line.
pub fn banner_plain_text(profile: &Profile) -> String {
    let mut out = format!("{}  @{}\n{}\n", profile.name, profile.handle, profile.title);
    for bio in profile.bio {
        out.push_str(bio);
        out.push('\n');
    }
    out.push('\n');

    let label_width = label_width(profile);
    for link in profile.links {
        out.push_str(&format!("  {}  {}\n", pad_label(link.label, label_width), link.url));
    }
    out.push_str(&format!("  {}  {}\n", pad_label("Email", label_width), profile.email));
    out
}

/// Pads `label` to `width` terminal columns.
fn pad_label(label: &str, width: usize) -> String {
    let padding = width.saturating_sub(label.width());
    format!("{label}{}", " ".repeat(padding))
}

fn label_width(profile: &Profile) -> usize {
    profile
        .links
        .iter()
        .map(|link| link.label.width())
        .chain(std::iter::once("Email".width()))
        .max()
        .unwrap_or(0)
}
