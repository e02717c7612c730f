// TUI module for rendering the terminal interface
pub mod app;
pub mod colors;
pub mod helpers;
pub mod input;

// Re-exports
pub use app::{App, DeleteTarget, StatusMessage, ViewState};
pub use colors::*;
pub use helpers::{image_to_halfblock_lines, status_marker, truncate_name};
pub use input::{handle_key_event, KeyAction};

use crate::domain::{FileSystem, Item, ItemStatus, MediaKind, TriageEngine, TriageStatistics};
use crate::thumbnail::{SyncThumbnailManager, ThumbnailState};
use helpers::visible_window;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Gauge, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

/// Renders the whole screen, including the overlay for the current view
pub fn render<F: FileSystem>(
    frame: &mut Frame,
    app: &App<F>,
    thumbnails: &mut SyncThumbnailManager,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Header with progress
            Constraint::Min(0),    // Content
            Constraint::Length(3), // Footer
            Constraint::Length(1), // Status line
        ])
        .split(frame.area());

    render_header(frame, chunks[0], &app.engine);
    render_content(frame, chunks[1], &app.engine, thumbnails);
    render_footer(frame, chunks[2]);
    render_status_line(frame, chunks[3], app.status.as_ref());

    match &app.view {
        ViewState::Browsing => {}
        ViewState::Help => render_help_overlay(frame),
        ViewState::FolderPicker { selected, input } => {
            render_folder_picker(frame, &app.engine, *selected, input.as_deref())
        }
        ViewState::Archived { selected } => render_archived_overlay(frame, &app.engine, *selected),
        ViewState::ConfirmDelete { target, selected } => {
            render_archived_overlay(frame, &app.engine, *selected);
            render_confirm_delete_overlay(frame, &app.engine, *target);
        }
    }
}

/// Helper to create a centered rect
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

fn overlay_block(title: &str, accent: ratatui::style::Color) -> Block<'_> {
    Block::default()
        .title(title)
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(accent))
        .style(Style::default().bg(BG_DARK))
}

fn key_hint(key: &'static str, label: &'static str, color: ratatui::style::Color) -> [Span<'static>; 2] {
    [
        Span::styled(key, Style::default().fg(color).add_modifier(Modifier::BOLD)),
        Span::styled(label, Style::default().fg(TEXT_SECONDARY)),
    ]
}

/// Renders the header with position, file name and progress bar
fn render_header<F: FileSystem>(frame: &mut Frame, area: Rect, engine: &TriageEngine<F>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Length(2)])
        .split(area);

    let stats = engine.statistics();
    let root = engine
        .root()
        .map(|r| r.display().to_string())
        .unwrap_or_default();

    let (title_text, info) = match engine.current_item() {
        Some(item) if !engine.is_completed() => (
            format!(" Item {}/{} ", engine.cursor() + 1, stats.total),
            vec![
                Span::styled(
                    item.name(),
                    Style::default()
                        .fg(TEXT_PRIMARY)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw("  "),
                Span::styled(format!("({})", root), Style::default().fg(TEXT_SECONDARY)),
            ],
        ),
        _ => (
            " Nweat ".to_string(),
            vec![Span::styled(root, Style::default().fg(TEXT_SECONDARY))],
        ),
    };

    let header = Paragraph::new(vec![
        Line::from(Span::styled(
            title_text,
            Style::default()
                .fg(ACCENT_HIGHLIGHT)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(info),
    ])
    .block(
        Block::default()
            .borders(Borders::TOP | Borders::LEFT | Borders::RIGHT)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(BORDER_COLOR)),
    )
    .alignment(Alignment::Left);

    frame.render_widget(header, chunks[0]);

    let progress = stats.progress();
    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::BOTTOM | Borders::LEFT | Borders::RIGHT)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(BORDER_COLOR)),
        )
        .gauge_style(Style::default().fg(ACCENT_SECONDARY).bg(BG_DARK))
        .ratio(progress.clamp(0.0, 1.0))
        .label(format!(
            "{}% ({}/{})",
            (progress * 100.0) as u16,
            stats.processed(),
            stats.total
        ));

    frame.render_widget(gauge, chunks[1]);
}

/// Renders the item card and the item strip, or the completion/empty card
fn render_content<F: FileSystem>(
    frame: &mut Frame,
    area: Rect,
    engine: &TriageEngine<F>,
    thumbnails: &mut SyncThumbnailManager,
) {
    if engine.items().is_empty() {
        thumbnails.reset();
        frame.render_widget(render_empty_state_widget(), area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(area);

    if engine.is_completed() {
        thumbnails.reset();
        render_completion(frame, chunks[0], &engine.statistics());
    } else if let Some(item) = engine.current_item() {
        render_card(frame, chunks[0], engine, item, thumbnails);
    }

    render_strip(frame, chunks[1], engine);
}

fn render_card<F: FileSystem>(
    frame: &mut Frame,
    area: Rect,
    engine: &TriageEngine<F>,
    item: &Item,
    thumbnails: &mut SyncThumbnailManager,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER_COLOR))
        .title(format!(" {} ", item.name()));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(inner);

    let state = thumbnails.request(item.id(), item.path()).clone();
    let preview: Vec<Line> = match state {
        ThumbnailState::Ready(thumbnail) => {
            image_to_halfblock_lines(thumbnail.image(), columns[0].width, columns[0].height)
        }
        ThumbnailState::Loading => vec![
            Line::from(""),
            Line::from(Span::styled(
                "Loading preview...",
                Style::default()
                    .fg(TEXT_SECONDARY)
                    .add_modifier(Modifier::ITALIC),
            )),
        ],
        ThumbnailState::Unavailable => {
            let label = match item.media_kind() {
                MediaKind::Video => "▶ Video",
                MediaKind::Image => "No preview for this format",
            };
            vec![
                Line::from(""),
                Line::from(Span::styled(
                    label,
                    Style::default()
                        .fg(ACCENT_HIGHLIGHT)
                        .add_modifier(Modifier::BOLD),
                )),
            ]
        }
        ThumbnailState::Error(e) => vec![
            Line::from(""),
            Line::from(Span::styled(
                "[!] Error generating preview",
                Style::default()
                    .fg(ACCENT_PRIMARY)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(e),
        ],
    };

    frame.render_widget(
        Paragraph::new(preview)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: false }),
        columns[0],
    );

    let (marker, color) = status_marker(item.status());
    let kind = match item.media_kind() {
        MediaKind::Image => "Image",
        MediaKind::Video => "Video",
    };
    let location = item
        .path()
        .parent()
        .and_then(|parent| engine.root().map(|root| (parent, root)))
        .map(|(parent, root)| {
            parent
                .strip_prefix(root)
                .ok()
                .filter(|rel| !rel.as_os_str().is_empty())
                .map(|rel| rel.display().to_string())
                .unwrap_or_else(|| ".".to_string())
        })
        .unwrap_or_default();

    let info = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("  Status: ", Style::default().fg(TEXT_SECONDARY)),
            Span::styled(
                format!("{} {}", marker, item.status().label()),
                Style::default().fg(color),
            ),
        ]),
        Line::from(vec![
            Span::styled("  Type:   ", Style::default().fg(TEXT_SECONDARY)),
            Span::styled(kind, Style::default().fg(TEXT_PRIMARY)),
        ]),
        Line::from(vec![
            Span::styled("  Folder: ", Style::default().fg(TEXT_SECONDARY)),
            Span::styled(location, Style::default().fg(TEXT_PRIMARY)),
        ]),
        Line::from(vec![
            Span::styled("  Id:     ", Style::default().fg(TEXT_SECONDARY)),
            Span::styled(item.id().to_string(), Style::default().fg(TEXT_PRIMARY)),
        ]),
    ];

    frame.render_widget(
        Paragraph::new(info).wrap(Wrap { trim: false }),
        columns[1],
    );
}

/// One marker per item, the cursor highlighted
fn render_strip<F: FileSystem>(frame: &mut Frame, area: Rect, engine: &TriageEngine<F>) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER_COLOR));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let items = engine.items();
    let slots = (inner.width as usize / 2).max(1);
    let window = visible_window(items.len(), engine.cursor(), slots);

    let spans: Vec<Span> = items[window.clone()]
        .iter()
        .zip(window)
        .map(|(item, index)| {
            let (marker, color) = status_marker(item.status());
            let mut style = Style::default().fg(color);
            if index == engine.cursor() {
                style = style.bg(BG_SELECTED).add_modifier(Modifier::BOLD);
            }
            Span::styled(format!("{} ", marker), style)
        })
        .collect();

    frame.render_widget(
        Paragraph::new(Line::from(spans)).alignment(Alignment::Center),
        inner,
    );
}

/// Creates an empty state widget for when no media files are present
fn render_empty_state_widget() -> Paragraph<'static> {
    let lines = vec![
        Line::from(""),
        Line::from(""),
        Line::from(Span::styled(
            "No Media Found",
            Style::default()
                .fg(ACCENT_HIGHLIGHT)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "The directory contains no photos or videos.",
            Style::default().fg(TEXT_SECONDARY),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Try a different directory or pass --ext.",
            Style::default().fg(TEXT_SECONDARY),
        )),
    ];

    Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(BORDER_COLOR))
                .title(" Content "),
        )
        .alignment(Alignment::Center)
}

/// Renders the card shown once every item has a decision
fn render_completion(frame: &mut Frame, area: Rect, stats: &TriageStatistics) {
    let block = Block::default()
        .title(" All Done ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(ACCENT_HIGHLIGHT));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let count_line = |marker: &'static str, label: &'static str, count: usize, status: ItemStatus| {
        let (_, color) = status_marker(status);
        Line::from(vec![
            Span::styled(marker, Style::default().fg(color)),
            Span::raw(label),
            Span::styled(
                count.to_string(),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
        ])
    };

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Every item has been sorted",
            Style::default()
                .fg(TEXT_PRIMARY)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::raw("Total items:  "),
            Span::styled(
                stats.total.to_string(),
                Style::default()
                    .fg(ACCENT_HIGHLIGHT)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(""),
        count_line("✗ ", "Archived:  ", stats.archived, ItemStatus::Archived),
        count_line("✓ ", "Kept:      ", stats.skipped, ItemStatus::Skipped),
        count_line("→ ", "Moved:     ", stats.moved, ItemStatus::Moved),
        Line::from(""),
        Line::from(""),
        Line::from(Span::styled(
            "[ ] revisit items  •  r reset  •  v archived  •  q quit",
            Style::default().fg(TEXT_SECONDARY),
        )),
    ];

    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .style(Style::default().fg(TEXT_PRIMARY)),
        inner,
    );
}

/// Renders the footer with key hints
fn render_footer(frame: &mut Frame, area: Rect) {
    let mut spans = vec![Span::raw(" ")];
    let separator = || Span::raw("  │  ");

    spans.extend(key_hint("← ", "Archive", ACCENT_PRIMARY));
    spans.push(separator());
    spans.extend(key_hint("→ ", "Keep", ACCENT_SECONDARY));
    spans.push(separator());
    spans.extend(key_hint("↑ ", "Move", ACCENT_MOVED));
    spans.push(separator());
    spans.extend(key_hint("[ ] ", "Browse", TEXT_SECONDARY));
    spans.push(separator());
    spans.extend(key_hint("v ", "Archived", TEXT_SECONDARY));
    spans.push(separator());
    spans.extend(key_hint("? ", "Help", TEXT_SECONDARY));
    spans.push(separator());
    spans.extend(key_hint("q ", "Quit", TEXT_SECONDARY));

    let footer = Paragraph::new(Line::from(spans))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(BORDER_COLOR)),
        )
        .alignment(Alignment::Center);

    frame.render_widget(footer, area);
}

fn render_status_line(frame: &mut Frame, area: Rect, status: Option<&StatusMessage>) {
    let line = match status {
        Some(StatusMessage::Info(message)) => Line::from(Span::styled(
            format!(" {}", message),
            Style::default().fg(TEXT_SECONDARY),
        )),
        Some(StatusMessage::Error(message)) => Line::from(Span::styled(
            format!(" [!] {}", message),
            Style::default().fg(ACCENT_PRIMARY),
        )),
        None => Line::from(""),
    };
    frame.render_widget(Paragraph::new(line), area);
}

/// Renders the help overlay
pub fn render_help_overlay(frame: &mut Frame) {
    let help_area = centered_rect(50, 70, frame.area());
    frame.render_widget(Clear, help_area);

    let block = overlay_block(" Help ", ACCENT_HIGHLIGHT);
    let inner = block.inner(help_area);
    frame.render_widget(block, help_area);

    let row = |keys: &'static str, label: &'static str, color| {
        Line::from(vec![
            Span::styled(format!("  {:<10}", keys), Style::default().fg(color)),
            Span::raw(label),
        ])
    };

    let help_lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Keyboard Shortcuts",
            Style::default()
                .fg(ACCENT_HIGHLIGHT)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        row("← or a", "Archive item", ACCENT_PRIMARY),
        row("→ or s", "Keep item in place", ACCENT_SECONDARY),
        row("↑ or m", "Move item to a folder", ACCENT_MOVED),
        Line::from(""),
        row("[ ]", "Previous / next item", TEXT_SECONDARY),
        row("r", "Reset item to unsorted", TEXT_SECONDARY),
        row("v", "Archived items", TEXT_SECONDARY),
        Line::from(""),
        row("q or Esc", "Quit", TEXT_SECONDARY),
        row("?", "Toggle help", TEXT_SECONDARY),
        Line::from(""),
        Line::from(""),
        Line::from(Span::styled(
            "Press ? or Esc to close",
            Style::default().fg(TEXT_SECONDARY),
        )),
    ];

    frame.render_widget(
        Paragraph::new(help_lines).style(Style::default().fg(TEXT_PRIMARY)),
        inner,
    );
}

/// Renders the destination folder list
pub fn render_folder_picker<F: FileSystem>(
    frame: &mut Frame,
    engine: &TriageEngine<F>,
    selected: usize,
    input: Option<&str>,
) {
    let area = centered_rect(50, 60, frame.area());
    frame.render_widget(Clear, area);

    let block = overlay_block(" Move To Folder ", ACCENT_MOVED);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(inner);

    let folders = engine.folders();
    if folders.is_empty() {
        frame.render_widget(
            Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled(
                    "No folders yet. Press n to create one.",
                    Style::default().fg(TEXT_SECONDARY),
                )),
            ])
            .alignment(Alignment::Center),
            chunks[0],
        );
    } else {
        let items: Vec<ListItem> = folders
            .iter()
            .map(|folder| ListItem::new(format!("  {}", folder.name())))
            .collect();
        let list = List::new(items)
            .style(Style::default().fg(TEXT_PRIMARY))
            .highlight_style(
                Style::default()
                    .bg(BG_SELECTED)
                    .fg(ACCENT_MOVED)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("› ");
        let mut state = ListState::default().with_selected(Some(selected));
        frame.render_stateful_widget(list, chunks[0], &mut state);
    }

    let bottom = match input {
        Some(text) => Paragraph::new(Line::from(vec![
            Span::styled("New folder: ", Style::default().fg(ACCENT_HIGHLIGHT)),
            Span::styled(format!("{}█", text), Style::default().fg(TEXT_PRIMARY)),
        ]))
        .block(Block::default().borders(Borders::TOP).border_style(Style::default().fg(BORDER_COLOR))),
        None => Paragraph::new(Line::from(Span::styled(
            "↑↓ select  •  Enter move  •  n new folder  •  Esc cancel",
            Style::default().fg(TEXT_SECONDARY),
        )))
        .block(Block::default().borders(Borders::TOP).border_style(Style::default().fg(BORDER_COLOR)))
        .alignment(Alignment::Center),
    };
    frame.render_widget(bottom, chunks[1]);
}

/// Renders the archived items list
pub fn render_archived_overlay<F: FileSystem>(
    frame: &mut Frame,
    engine: &TriageEngine<F>,
    selected: usize,
) {
    let area = centered_rect(60, 70, frame.area());
    frame.render_widget(Clear, area);

    let archived: Vec<&Item> = engine.archived_items().collect();
    let title = format!(" Archived ({}) ", archived.len());
    let block = overlay_block(&title, ACCENT_PRIMARY);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(2)])
        .split(inner);

    if archived.is_empty() {
        frame.render_widget(
            Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled(
                    "Nothing archived",
                    Style::default().fg(TEXT_SECONDARY),
                )),
            ])
            .alignment(Alignment::Center),
            chunks[0],
        );
    } else {
        let width = chunks[0].width.saturating_sub(4) as usize;
        let items: Vec<ListItem> = archived
            .iter()
            .map(|item| ListItem::new(format!("  {}", truncate_name(&item.name(), width))))
            .collect();
        let list = List::new(items)
            .style(Style::default().fg(TEXT_PRIMARY))
            .highlight_style(
                Style::default()
                    .bg(BG_SELECTED)
                    .fg(ACCENT_PRIMARY)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("› ");
        let mut state = ListState::default().with_selected(Some(selected));
        frame.render_stateful_widget(list, chunks[0], &mut state);
    }

    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            "r restore  •  d delete  •  R restore all  •  D delete all  •  Esc back",
            Style::default().fg(TEXT_SECONDARY),
        )))
        .block(Block::default().borders(Borders::TOP).border_style(Style::default().fg(BORDER_COLOR)))
        .alignment(Alignment::Center),
        chunks[1],
    );
}

/// Renders the confirmation dialog for permanent deletion
pub fn render_confirm_delete_overlay<F: FileSystem>(
    frame: &mut Frame,
    engine: &TriageEngine<F>,
    target: DeleteTarget,
) {
    let confirm_area = centered_rect(50, 40, frame.area());
    frame.render_widget(Clear, confirm_area);

    let block = overlay_block(" ⚠ Confirm Delete ", ACCENT_PRIMARY);
    let inner = block.inner(confirm_area);
    frame.render_widget(block, confirm_area);

    let question = match target {
        DeleteTarget::One(id) => format!(
            "Permanently delete {}?",
            engine
                .item(id)
                .map(|item| item.name())
                .unwrap_or_else(|| id.to_string())
        ),
        DeleteTarget::All => format!(
            "Permanently delete all {} archived items?",
            engine.archived_items().count()
        ),
    };

    let confirm_lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            question,
            Style::default()
                .fg(TEXT_PRIMARY)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "This cannot be undone.",
            Style::default().fg(TEXT_SECONDARY),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("[Y]", Style::default().fg(ACCENT_PRIMARY)),
            Span::raw("es  "),
            Span::styled("[Enter]", Style::default().fg(ACCENT_PRIMARY)),
            Span::raw("     "),
            Span::styled("[N]", Style::default().fg(ACCENT_SECONDARY)),
            Span::raw("o  "),
            Span::styled("[Esc]", Style::default().fg(ACCENT_SECONDARY)),
        ]),
    ];

    frame.render_widget(
        Paragraph::new(confirm_lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: false })
            .style(Style::default().fg(TEXT_PRIMARY)),
        inner,
    );
}
