//! Article list widgets: one bordered block per section, one card line per entry.

use crate::app::{App, RowHit};
use crate::carousel::{Carousel, CarouselEntry};
use crate::theme::StyleMap;
use crate::util::{display_width, format_relative_time, truncate_to_width};
use chrono::{DateTime, Utc};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};
use tokio::time::Instant;

/// Render every section stacked vertically and record row hitboxes.
pub fn render(f: &mut Frame, app: &mut App, area: Rect) {
    app.layout.rows.clear();

    if app.sections.is_empty() {
        let empty = Paragraph::new("No articles").block(Block::default().borders(Borders::ALL));
        f.render_widget(empty, area);
        return;
    }

    let chunks = Layout::vertical(vec![Constraint::Fill(1); app.sections.len()]).split(area);
    let now = Instant::now();
    let wall_now = Utc::now();

    for (section_idx, chunk) in chunks.iter().enumerate() {
        let focused = section_idx == app.focused_section;
        let rows = render_section(
            f,
            &app.sections[section_idx],
            &app.theme,
            *chunk,
            focused,
            now,
            wall_now,
        );
        app.layout
            .rows
            .extend(rows.into_iter().map(|(area, index)| RowHit {
                area,
                section: section_idx,
                index,
            }));
    }
}

/// Draw one section; returns the screen row of each visible entry.
fn render_section(
    f: &mut Frame,
    carousel: &Carousel,
    theme: &StyleMap,
    area: Rect,
    focused: bool,
    now: Instant,
    wall_now: DateTime<Utc>,
) -> Vec<(Rect, usize)> {
    if area.height < 3 || area.width < 3 {
        return Vec::new();
    }

    let (title_style, border_style) = if focused {
        (
            theme.resolve("section_title_focused"),
            theme.resolve("section_title_focused"),
        )
    } else {
        (theme.resolve("section_title"), ratatui::style::Style::default())
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(Span::styled(format!(" {} ", carousel.title()), title_style));
    let inner = block.inner(area);

    if carousel.is_empty() {
        f.render_widget(Paragraph::new("No articles").block(block), area);
        return Vec::new();
    }

    let width = inner.width as usize;
    let items: Vec<ListItem> = carousel
        .entries(now)
        .iter()
        .map(|entry| {
            let selected = focused && entry.index == carousel.selected();
            ListItem::new(card_line(entry, theme, width, selected, wall_now))
        })
        .collect();

    let mut state = ListState::default().with_selected(Some(carousel.selected()));
    f.render_stateful_widget(List::new(items).block(block), area, &mut state);

    let offset = state.offset();
    let visible = (inner.height as usize).min(carousel.len().saturating_sub(offset));
    (0..visible)
        .map(|row| {
            let y = inner.y + row as u16;
            (Rect::new(inner.x, y, inner.width, 1), offset + row)
        })
        .collect()
}

/// One summary card: title, optional topic tag, counters and relative age.
///
/// Entries still waiting for their entrance render entirely in the pending
/// style; the selected entry is highlighted once it has entered.
pub(super) fn card_line(
    entry: &CarouselEntry<'_>,
    theme: &StyleMap,
    width: usize,
    selected: bool,
    now: DateTime<Utc>,
) -> Line<'static> {
    let article = entry.article;
    let age = format_relative_time(&article.created_at, now);
    let meta = format!(
        "  ♥ {}  ✉ {}  {}",
        article.likes_count, article.comments_count, age
    );
    let topic = article
        .topic
        .as_deref()
        .filter(|t| !t.is_empty())
        .map(|t| format!(" #{}", t));

    let reserved = display_width(&meta) + topic.as_deref().map_or(0, display_width);
    let title = truncate_to_width(&article.title, width.saturating_sub(reserved)).into_owned();

    let (title_style, topic_style, meta_style) = if !entry.entered {
        let pending = theme.resolve("card_pending");
        (pending, pending, pending)
    } else if selected {
        let sel = theme.resolve("card_selected");
        (sel, sel, sel)
    } else {
        (
            theme.resolve("card_title"),
            theme.resolve("card_topic"),
            theme.resolve("card_meta"),
        )
    };

    let mut spans = vec![Span::styled(title, title_style)];
    if let Some(topic) = topic {
        spans.push(Span::styled(topic, topic_style));
    }
    spans.push(Span::styled(meta, meta_style));
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::article::fixtures::article;
    use crate::article::Section;
    use crate::callbacks::ArticleCallbacks;
    use crate::config::Config;
    use chrono::TimeZone;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::mpsc;

    fn line_text(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn card_shows_counts_topic_and_age() {
        let mut a = article("1", "Economy news");
        a.topic = Some("finance".to_string());
        let entry = CarouselEntry {
            index: 0,
            article: &a,
            delay: Duration::ZERO,
            entered: true,
        };
        let now = Utc.with_ymd_and_hms(2024, 3, 5, 15, 0, 0).unwrap();
        let text = line_text(&card_line(&entry, &StyleMap::default(), 80, false, now));
        assert_eq!(text, "Economy news #finance  ♥ 10  ✉ 2  3h");
    }

    #[test]
    fn card_title_truncated_to_width() {
        let a = article("1", "A very long title that will not fit");
        let entry = CarouselEntry {
            index: 0,
            article: &a,
            delay: Duration::ZERO,
            entered: true,
        };
        let now = Utc.with_ymd_and_hms(2024, 3, 5, 12, 30, 0).unwrap();
        let line = card_line(&entry, &StyleMap::default(), 30, false, now);
        assert!(line.spans[0].content.ends_with("..."));
        assert!(line.width() <= 30);
    }

    #[test]
    fn pending_entry_uses_pending_style() {
        let theme = StyleMap::default();
        let a = article("1", "T");
        let entry = CarouselEntry {
            index: 3,
            article: &a,
            delay: Duration::from_millis(300),
            entered: false,
        };
        let line = card_line(&entry, &theme, 40, true, Utc::now());
        assert!(line
            .spans
            .iter()
            .all(|s| s.style == theme.resolve("card_pending")));
    }

    #[tokio::test(start_paused = true)]
    async fn render_records_row_hitboxes() {
        let (tx, _rx) = mpsc::channel(8);
        let sections = vec![
            Section {
                title: "Popular".to_string(),
                articles: Arc::new(vec![article("1", "First"), article("2", "Second")]),
            },
            Section {
                title: "Empty".to_string(),
                articles: Arc::new(Vec::new()),
            },
        ];
        let mut app = App::new(sections, &Config::default(), ArticleCallbacks::new(), &tx);

        let mut terminal = Terminal::new(TestBackend::new(60, 12)).unwrap();
        terminal
            .draw(|f| {
                let area = f.area();
                render(f, &mut app, area);
            })
            .unwrap();

        assert_eq!(app.layout.rows.len(), 2);
        let second = app.layout.rows[1];
        assert_eq!(second.index, 1);
        assert_eq!(app.layout.row_at(5, second.area.y).map(|h| h.index), Some(1));

        let buffer = terminal.backend().buffer().clone();
        let screen: String = buffer.content().iter().map(|c| c.symbol()).collect();
        assert!(screen.contains("Popular"));
        assert!(screen.contains("First"));
        assert!(screen.contains("No articles"));
    }
}
