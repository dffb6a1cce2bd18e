//! Detail overlay: fixed header, scrollable article body, fixed action bar.

use crate::app::App;
use crate::article::{AuthorBlock, MediaBlock};
use crate::overlay::OverlaySession;
use crate::theme::StyleMap;
use crate::util::{display_width, format_long_date, truncate_to_width, DateLocale};
use ratatui::{
    layout::{Constraint, Layout, Margin, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthChar;

use super::helpers::spinner_char;

/// Terminals at least this wide get a backdrop margin around the overlay.
const INSET_MIN_WIDTH: u16 = 100;
const INSET: Margin = Margin {
    horizontal: 4,
    vertical: 1,
};

const COMMENT_PLACEHOLDER: &str = "Написать комментарий...";

/// Screen rectangle of the overlay within `area`.
pub(super) fn overlay_rect(area: Rect) -> Rect {
    if area.width >= INSET_MIN_WIDTH {
        area.inner(INSET)
    } else {
        area
    }
}

/// Render the open overlay session, if any.
pub fn render(f: &mut Frame, app: &mut App, area: Rect) {
    let Some(session) = app.overlay.as_ref() else {
        app.layout.overlay_area = None;
        app.layout.backdrop_area = None;
        return;
    };

    let rect = overlay_rect(area);
    if rect != area {
        f.render_widget(Block::default().style(app.style("backdrop")), area);
        app.layout.backdrop_area = Some(area);
    } else {
        app.layout.backdrop_area = None;
    }
    f.render_widget(Clear, rect);
    app.layout.overlay_area = Some(rect);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.style("overlay_border"));
    let inner = block.inner(rect);
    f.render_widget(block, rect);
    if inner.height < 4 || inner.width < 10 {
        return;
    }

    let action_height = if session.comments_enabled() { 3 } else { 2 };
    let [header_area, body_area, action_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(1),
        Constraint::Length(action_height),
    ])
    .areas(inner);

    f.render_widget(
        Paragraph::new(header_line(session, &app.theme, header_area.width as usize)),
        header_area,
    );

    let lines = body_lines(session, &app.theme, app.date_locale);
    let action = action_lines(session, &app.theme, app.spinner_frame, action_area.width as usize);
    let cursor = session.input_focused().then(|| {
        let shown = visible_draft(session.draft(), input_width(action_area.width as usize));
        let x = action_area.x + 2 + display_width(shown) as u16;
        (x.min(action_area.right().saturating_sub(1)), action_area.y + 2)
    });

    let body = Paragraph::new(lines)
        .style(app.style("overlay_body"))
        .wrap(Wrap { trim: false });
    // Rows after word wrapping, so the last line is reachable by scrolling
    let content_lines = body.line_count(body_area.width);
    let visible_lines = body_area.height as usize;
    app.layout.detail_content_lines = content_lines;
    app.layout.detail_visible_lines = visible_lines;

    let scroll = match app.overlay.as_mut() {
        Some(session) => {
            session.clamp_scroll(content_lines, visible_lines);
            session.scroll()
        }
        None => 0,
    };

    let scroll = u16::try_from(scroll).unwrap_or(u16::MAX);
    f.render_widget(body.scroll((scroll, 0)), body_area);

    let action_block = Block::default()
        .borders(Borders::TOP)
        .border_style(app.style("overlay_border"));
    f.render_widget(Paragraph::new(action).block(action_block), action_area);

    if let Some(position) = cursor {
        f.set_cursor_position(position);
    }
}

/// Header row: topic (or title) on the left, close hint on the right.
fn header_line(session: &OverlaySession, theme: &StyleMap, width: usize) -> Line<'static> {
    const CLOSE_HINT: &str = "  [Esc] ✕";
    let text = truncate_to_width(
        session.article().header_text(),
        width.saturating_sub(display_width(CLOSE_HINT)),
    )
    .into_owned();
    let pad = width.saturating_sub(display_width(&text) + display_width(CLOSE_HINT));
    Line::from(vec![
        Span::styled(text, theme.resolve("overlay_header")),
        Span::raw(" ".repeat(pad)),
        Span::styled(CLOSE_HINT, theme.resolve("overlay_meta")),
    ])
}

/// Scrollable content: author, media, title, body, sources, publication date.
pub(super) fn body_lines(
    session: &OverlaySession,
    theme: &StyleMap,
    locale: DateLocale,
) -> Vec<Line<'static>> {
    let article = session.article();
    let meta = theme.resolve("overlay_meta");
    let mut lines = Vec::new();

    match article.author_block() {
        AuthorBlock::Named(author) => {
            let mut name = vec![
                Span::styled("◉ ", meta),
                Span::styled(author.display_name(), theme.resolve("author_name")),
            ];
            if author.is_premium {
                name.push(Span::styled(" ♛", theme.resolve("author_premium")));
            }
            lines.push(Line::from(name));
            if let Some(handle) = author.handle() {
                lines.push(Line::from(Span::styled(format!("  {}", handle), meta)));
            }
            lines.push(Line::from(Span::styled(
                format!("  [аватар] {}", author.avatar()),
                meta,
            )));

            let mut stats = format!(
                "  ★ {} репутации · ▤ {} статей",
                author.reputation(),
                author.articles_count()
            );
            if let Some(since) = &author.created_at {
                stats.push_str(&format!(" · С {}", format_long_date(since, locale)));
            }
            lines.push(Line::from(Span::styled(stats, meta)));
            lines.push(Line::from(""));
        }
        AuthorBlock::Anonymous => {
            lines.push(Line::from(Span::styled(
                "👤 Аноним",
                theme.resolve("author_anonymous"),
            )));
            lines.push(Line::from(Span::styled("  Автор скрыл свою личность", meta)));
            lines.push(Line::from(""));
        }
        AuthorBlock::Absent => {}
    }

    if let Some(media) = article.media() {
        let label = match &media {
            MediaBlock::Video { .. } => "▶ Видео: ",
            MediaBlock::Image { .. } => "▣ Изображение: ",
        };
        lines.push(Line::from(vec![
            Span::styled(label, meta),
            Span::styled(media.target_url().to_string(), theme.resolve("media_link")),
            Span::styled("  [m]", meta),
        ]));
        lines.push(Line::from(""));
    }

    lines.push(Line::from(Span::styled(
        article.title.clone(),
        theme.resolve("overlay_title"),
    )));
    lines.push(Line::from(""));
    lines.extend(article.body.lines().map(|l| Line::from(l.to_string())));

    if article.has_sources() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Источники:",
            theme.resolve("overlay_header"),
        )));
        for (i, source) in article.sources.iter().enumerate() {
            let line = if i == session.source_cursor() {
                Line::from(Span::styled(
                    format!("› {}", source),
                    theme.resolve("source_selected"),
                ))
            } else {
                Line::from(Span::styled(
                    format!("  {}", source),
                    theme.resolve("source_link"),
                ))
            };
            lines.push(line);
        }
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("Опубликовано {}", format_long_date(&article.created_at, locale)),
        meta,
    )));

    lines
}

/// Fixed action bar: counters and favorite marker, then the comment input.
pub(super) fn action_lines(
    session: &OverlaySession,
    theme: &StyleMap,
    spinner_frame: usize,
    width: usize,
) -> Vec<Line<'static>> {
    let article = session.article();
    let (heart, like_style) = if session.liked() {
        ("♥", theme.resolve("action_liked"))
    } else {
        ("♡", theme.resolve("action_idle"))
    };
    let (mark, fav_style) = if session.favorited() {
        ("★ Избранное", theme.resolve("action_favorited"))
    } else {
        ("☆ Избранное", theme.resolve("action_idle"))
    };
    let idle = theme.resolve("action_idle");

    let mut lines = vec![Line::from(vec![
        Span::styled(format!("{} {}", heart, session.displayed_likes()), like_style),
        Span::styled(format!("   ✉ {}", article.comments_count), idle),
        Span::raw("   "),
        Span::styled(mark, fav_style),
    ])];

    if session.comments_enabled() {
        let input_style = if session.input_focused() {
            theme.resolve("comment_input_focused")
        } else {
            theme.resolve("comment_input")
        };
        let field = input_width(width);
        let (text, text_style) = if session.draft().is_empty() {
            (
                truncate_to_width(COMMENT_PLACEHOLDER, field).into_owned(),
                theme.resolve("comment_placeholder"),
            )
        } else {
            (visible_draft(session.draft(), field).to_string(), input_style)
        };

        let submit = if session.submitting() {
            Span::styled(spinner_char(spinner_frame).to_string(), input_style)
        } else if session.can_submit() {
            Span::styled("➤", input_style)
        } else {
            Span::styled("➤", input_style.add_modifier(Modifier::DIM))
        };

        let pad = field.saturating_sub(display_width(&text));
        lines.push(Line::from(vec![
            Span::styled("› ", input_style),
            Span::styled(text, text_style),
            Span::raw(" ".repeat(pad + 1)),
            submit,
        ]));
    }

    lines
}

/// Columns available for draft text: prompt and submit control excluded.
fn input_width(width: usize) -> usize {
    width.saturating_sub(4)
}

/// The tail of `draft` that fits in `max_width` columns, so the caret end
/// stays visible while typing.
fn visible_draft(draft: &str, max_width: usize) -> &str {
    let mut width = 0;
    let mut start = draft.len();
    for (idx, c) in draft.char_indices().rev() {
        let w = UnicodeWidthChar::width(c).unwrap_or(0);
        if width + w > max_width {
            break;
        }
        width += w;
        start = idx;
    }
    &draft[start..]
}
