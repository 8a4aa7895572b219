//! UI rendering for the TUI.

use chrono::Local;
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Gauge, List, ListItem, Paragraph, Wrap},
    Frame,
};
use standup_core::format::{format_clock, format_duration};
use standup_core::{FeedLevel, ParticipantStatus};

use crate::app::{App, ViewMode};

// ========== Palette ==========

/// Indigo for the active speaker and selection highlights
const ACCENT: Color = Color::Rgb(99, 102, 241);
/// Emerald for completed turns and success lines
const OK: Color = Color::Rgb(16, 185, 129);
/// Amber for skipped turns and warnings
const WARNING: Color = Color::Rgb(245, 158, 11);
/// Red for over-limit clocks and errors
const DANGER: Color = Color::Rgb(239, 68, 68);
/// Slate for secondary text
const DIM: Color = Color::Rgb(100, 116, 139);
/// Primary text
const TEXT: Color = Color::Rgb(226, 232, 240);

/// Render the application UI.
pub fn render(frame: &mut Frame, app: &mut App) {
    match app.view_mode {
        ViewMode::Setup => render_setup(frame, app),
        ViewMode::Daily => render_daily(frame, app),
        ViewMode::Summary => render_summary(frame, app),
        ViewMode::History => render_history(frame, app),
    }
}

/// Render the header with title.
fn render_header(frame: &mut Frame, title: &str, area: Rect) {
    let header = Paragraph::new(title)
        .style(Style::default().fg(ACCENT).bold())
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, area);
}

fn render_footer(frame: &mut Frame, hints: &str, area: Rect) {
    let footer = Paragraph::new(hints).style(Style::default().fg(DIM));
    frame.render_widget(footer, area);
}

// ========== Setup view ==========

fn render_setup(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let chunks = Layout::vertical([
        Constraint::Length(2), // Header
        Constraint::Min(10),   // Body
        Constraint::Length(1), // Footer
    ])
    .split(area);

    render_header(frame, " standup — session setup", chunks[0]);

    let body = Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(chunks[1]);
    render_setup_form(frame, app, body[0]);
    render_storage_hub(frame, app, body[1]);

    render_footer(
        frame,
        " enter run  tab auto  ↑/↓ minutes  ctrl-s push  ctrl-l pull  ctrl-h history  ctrl-q quit",
        chunks[2],
    );
}

fn render_setup_form(frame: &mut Frame, app: &App, area: Rect) {
    let auto_label = if app.auto_transition { "ENABLED" } else { "DISABLED" };
    let auto_color = if app.auto_transition { ACCENT } else { DIM };
    let roster = parse_preview(&app.names_input);

    let lines = vec![
        Line::from(vec![
            Span::styled("Names: ", Style::default().fg(DIM)),
            Span::styled(app.names_input.clone(), Style::default().fg(TEXT)),
            Span::styled("_", Style::default().fg(ACCENT)),
        ]),
        Line::default(),
        Line::from(vec![
            Span::styled("Auto-transition: ", Style::default().fg(DIM)),
            Span::styled(auto_label, Style::default().fg(auto_color).bold()),
        ]),
        Line::from(vec![
            Span::styled("Time limit:      ", Style::default().fg(DIM)),
            Span::styled(
                format!("{} min", app.max_minutes),
                Style::default().fg(TEXT).bold(),
            ),
        ]),
        Line::default(),
        Line::from(Span::styled(
            format!("Session preview: {} nodes", roster.len()),
            Style::default().fg(DIM),
        )),
        Line::from(Span::styled(roster.join("  "), Style::default().fg(TEXT))),
    ];

    let form = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(ACCENT))
            .title(" SESSION_INIT_BUFFER "),
    );
    frame.render_widget(form, area);
}

fn render_storage_hub(frame: &mut Frame, app: &App, area: Rect) {
    let auto_color = if app.stored_config.auto_transition { OK } else { DIM };
    let auto_label = if app.stored_config.auto_transition {
        "ENABLED"
    } else {
        "DISABLED"
    };

    let mut lines = vec![
        Line::from(vec![
            Span::styled("DEFAULT_TIME:     ", Style::default().fg(DIM)),
            Span::styled(
                format!("{} MINS", app.stored_config.max_time_minutes),
                Style::default().fg(ACCENT),
            ),
        ]),
        Line::from(vec![
            Span::styled("AUTO_TRANSITION:  ", Style::default().fg(DIM)),
            Span::styled(auto_label, Style::default().fg(auto_color)),
        ]),
        Line::default(),
        Line::from(Span::styled("Default nodes:", Style::default().fg(DIM))),
        Line::from(Span::styled(
            app.stored_config.names.join(", "),
            Style::default().fg(TEXT),
        )),
    ];
    if app.saved_feedback {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            "STORAGE_UPDATED",
            Style::default().fg(OK).bold(),
        )));
    }

    let hub = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(WARNING))
            .title(" PERSISTENT_STORAGE_HUB "),
    );
    frame.render_widget(hub, area);
}

fn parse_preview(input: &str) -> Vec<String> {
    crate::app::parse_names(input)
}

// ========== Daily view ==========

fn render_daily(frame: &mut Frame, app: &mut App) {
    let area = frame.area();
    let chunks = Layout::vertical([
        Constraint::Length(2), // Header
        Constraint::Min(12),   // Roster + stage
        Constraint::Length(8), // Status feed
        Constraint::Length(1), // Footer
    ])
    .split(area);

    render_header(frame, " standup — active session", chunks[0]);

    let body = Layout::horizontal([Constraint::Percentage(32), Constraint::Percentage(68)])
        .split(chunks[1]);
    render_roster(frame, app, body[0]);
    render_stage(frame, app, body[1]);
    render_feed(frame, app, chunks[2]);

    let footer = match &app.name_entry {
        Some(buffer) => format!(" add node: {buffer}_   (enter register, esc cancel)"),
        None => {
            " space select  c complete  s skip  d defer  a add  j/k move  r rewind  esc abort  q quit"
                .to_string()
        }
    };
    render_footer(frame, &footer, chunks[3]);
}

fn render_roster(frame: &mut Frame, app: &mut App, area: Rect) {
    let pending = app.engine.session().pending_count();
    let items: Vec<ListItem> = app
        .engine
        .participants()
        .iter()
        .map(|p| {
            let (icon, color) = match p.status {
                ParticipantStatus::Speaking => ("●", ACCENT),
                ParticipantStatus::Completed => ("✔", OK),
                ParticipantStatus::Skipped => ("≫", WARNING),
                ParticipantStatus::Pending => ("○", DIM),
            };
            let name_color = if p.status.is_terminal() { DIM } else { TEXT };
            let mut spans = vec![
                Span::styled(format!("{icon} "), Style::default().fg(color)),
                Span::styled(p.name.clone(), Style::default().fg(name_color)),
            ];
            if p.status != ParticipantStatus::Pending {
                spans.push(Span::styled(
                    format!("  {}", format_clock(p.speaking_secs)),
                    Style::default().fg(color),
                ));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(DIM))
                .title(format!(" NODE_MONITOR — {pending} pending ")),
        )
        .highlight_style(Style::default().bg(Color::Rgb(30, 41, 59)))
        .highlight_symbol("▸ ");
    frame.render_stateful_widget(list, area, &mut app.roster_state);
}

fn render_stage(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(ACCENT))
        .title(" ACTIVE_STANDUP ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(5),
        Constraint::Fill(1),
    ])
    .split(inner);
    let center = rows[1];

    if let Some(run) = app.engine.selection() {
        let lines = vec![
            Line::from(Span::styled(
                run.guess.clone(),
                Style::default().fg(ACCENT).bold(),
            )),
            Line::default(),
            Line::from(Span::styled(
                "NODE_SYNC_IN_PROGRESS",
                Style::default().fg(DIM),
            )),
        ];
        let scan = Paragraph::new(lines).alignment(Alignment::Center);
        frame.render_widget(scan, center);
        return;
    }

    if let Some(speaker) = app.engine.session().active_speaker() {
        let max = app.engine.max_speaking_secs();
        let over_limit = speaker.speaking_secs > max;
        let bar_color = if over_limit { DANGER } else { ACCENT };
        let label = format!(
            "{} / {}",
            format_clock(speaker.speaking_secs),
            format_clock(max)
        );

        let name = Paragraph::new(Span::styled(
            speaker.name.clone(),
            Style::default().fg(TEXT).bold(),
        ))
        .alignment(Alignment::Center);
        frame.render_widget(name, Rect { height: 1, ..center });

        let gauge_area = Rect {
            y: center.y + 2,
            height: 1,
            ..center
        };
        let ratio = (f64::from(speaker.speaking_secs) / f64::from(max)).min(1.0);
        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(bar_color))
            .ratio(ratio)
            .label(label);
        frame.render_widget(gauge, gauge_area);

        let status = if over_limit {
            Span::styled("TIME_LIMIT_EXCEEDED", Style::default().fg(DANGER).bold())
        } else {
            Span::styled("(c) complete  (s) skip  (d) defer", Style::default().fg(DIM))
        };
        let hint_area = Rect {
            y: center.y + 4,
            height: 1,
            ..center
        };
        frame.render_widget(
            Paragraph::new(status).alignment(Alignment::Center),
            hint_area,
        );
        return;
    }

    // Idle: nothing selected, nobody speaking.
    let idle = if app.engine.auto_transition() {
        Line::from(Span::styled(
            "SCANNING_NODES...",
            Style::default().fg(DIM).bold(),
        ))
    } else {
        Line::from(Span::styled(
            "AWAITING_COMMAND — press space to execute selector",
            Style::default().fg(DIM).bold(),
        ))
    };
    frame.render_widget(Paragraph::new(idle).alignment(Alignment::Center), center);
}

fn render_feed(frame: &mut Frame, app: &App, area: Rect) {
    let visible = area.height.saturating_sub(2) as usize;
    let feed_len = app.engine.feed().len();
    let lines: Vec<Line> = app
        .engine
        .feed()
        .entries()
        .skip(feed_len.saturating_sub(visible))
        .map(|entry| {
            Line::from(vec![
                Span::styled(
                    format!("[{}] ", entry.timestamp.with_timezone(&Local).format("%H:%M:%S")),
                    Style::default().fg(DIM),
                ),
                Span::styled(
                    format!("{:<7} ", entry.level.as_str()),
                    Style::default().fg(level_color(entry.level)).bold(),
                ),
                Span::styled(entry.message.clone(), Style::default().fg(TEXT)),
            ])
        })
        .collect();

    let feed = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(DIM))
            .title(" DAILY_SCHEDULER.SH "),
    );
    frame.render_widget(feed, area);
}

fn level_color(level: FeedLevel) -> Color {
    match level {
        FeedLevel::Success => OK,
        FeedLevel::Warn => WARNING,
        FeedLevel::Error => DANGER,
        FeedLevel::Info => ACCENT,
    }
}

// ========== Summary view ==========

fn render_summary(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let chunks = Layout::vertical([
        Constraint::Length(2), // Header
        Constraint::Length(5), // Stats
        Constraint::Min(8),    // Reveal
        Constraint::Length(1), // Footer
    ])
    .split(area);

    render_header(frame, " standup — cycle complete", chunks[0]);
    render_summary_stats(frame, app, chunks[1]);
    render_reveal(frame, app, chunks[2]);
    render_footer(frame, " r reboot  h history  q quit", chunks[3]);
}

fn render_summary_stats(frame: &mut Frame, app: &App, area: Rect) {
    let Some(summary) = app.engine.summary() else {
        return;
    };
    let avg = summary.total_secs / summary.participant_count.max(1) as u32;
    let cells = [
        (
            "NODES_FINISHED",
            format!("{}/{}", summary.completed, summary.participant_count),
        ),
        ("TOTAL_DURATION", format_clock(summary.total_secs)),
        ("AVG_REPORT_TIME", format_clock(avg)),
    ];

    let columns = Layout::horizontal([
        Constraint::Ratio(1, 3),
        Constraint::Ratio(1, 3),
        Constraint::Ratio(1, 3),
    ])
    .split(area);

    for ((title, value), column) in cells.into_iter().zip(columns.iter()) {
        let stat = Paragraph::new(vec![
            Line::from(Span::styled(value, Style::default().fg(TEXT).bold())),
            Line::from(Span::styled(title, Style::default().fg(DIM))),
        ])
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(DIM)),
        );
        frame.render_widget(stat, *column);
    }
}

fn render_reveal(frame: &mut Frame, app: &App, area: Rect) {
    let Some(reveal) = app.engine.reveal() else {
        return;
    };

    let title = if reveal.revealed {
        " Next Cycle Administrator "
    } else {
        " Calculating_Next_Administrator "
    };
    let border = if reveal.revealed { ACCENT } else { DIM };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border))
        .title(title);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(3),
        Constraint::Fill(1),
    ])
    .split(inner);
    let center = rows[1];

    let name_style = if reveal.revealed {
        Style::default().fg(TEXT).bold()
    } else {
        Style::default().fg(DIM)
    };
    frame.render_widget(
        Paragraph::new(Span::styled(reveal.guess.clone(), name_style))
            .alignment(Alignment::Center),
        Rect { height: 1, ..center },
    );

    let bottom = Rect {
        y: center.y + 2,
        height: 1,
        ..center
    };
    if reveal.revealed {
        frame.render_widget(
            Paragraph::new(Span::styled(
                "This node leads the next synchronization event.",
                Style::default().fg(DIM),
            ))
            .alignment(Alignment::Center),
            bottom,
        );
    } else {
        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(ACCENT))
            .percent(reveal.progress());
        frame.render_widget(gauge, bottom);
    }
}

// ========== History view ==========

fn render_history(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let chunks = Layout::vertical([
        Constraint::Length(2), // Header
        Constraint::Min(5),    // Log
        Constraint::Length(1), // Footer
    ])
    .split(area);

    let count = app.history_entries.len();
    let plural = if count == 1 { "entry" } else { "entries" };
    render_header(
        frame,
        &format!(" Daily_History.log — {count} {plural}"),
        chunks[0],
    );

    if app.history_entries.is_empty() {
        let empty = Paragraph::new(vec![
            Line::default(),
            Line::from(Span::styled(
                "No standups recorded yet.",
                Style::default().fg(DIM),
            )),
            Line::from(Span::styled(
                "Complete a session to see it here.",
                Style::default().fg(DIM),
            )),
        ])
        .alignment(Alignment::Center);
        frame.render_widget(empty, chunks[1]);
    } else {
        let mut lines: Vec<Line> = Vec::new();
        for (index, entry) in app.history_entries.iter().enumerate() {
            let mut commit = vec![
                Span::styled("commit ", Style::default().fg(WARNING)),
                Span::styled(entry.id.clone(), Style::default().fg(WARNING)),
            ];
            if index == 0 {
                commit.push(Span::styled(" (HEAD)", Style::default().fg(OK).bold()));
            }
            lines.push(Line::from(commit));
            lines.push(Line::from(Span::styled(
                format!(
                    "Date:   {}",
                    entry.date.with_timezone(&Local).format("%a %b %-d %Y %H:%M")
                ),
                Style::default().fg(DIM),
            )));
            lines.push(Line::from(Span::styled(
                "    Daily standup",
                Style::default().fg(TEXT),
            )));
            lines.push(Line::from(Span::styled(
                "    Participants order:",
                Style::default().fg(DIM),
            )));
            for (position, name) in entry.participants_order.iter().enumerate() {
                lines.push(Line::from(Span::styled(
                    format!("      {}) {}", position + 1, name),
                    Style::default().fg(TEXT),
                )));
            }
            lines.push(Line::from(vec![
                Span::styled("    Duration: ", Style::default().fg(DIM)),
                Span::styled(
                    format_duration(entry.total_duration),
                    Style::default().fg(TEXT),
                ),
            ]));
            lines.push(Line::from(vec![
                Span::styled("    Next owner: ", Style::default().fg(DIM)),
                Span::styled(entry.next_owner.clone(), Style::default().fg(ACCENT).bold()),
            ]));
            lines.push(Line::default());
        }

        let log = Paragraph::new(lines)
            .scroll((app.history_scroll as u16, 0))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(DIM))
                    .title(" $ daily log "),
            );
        frame.render_widget(log, chunks[1]);
    }

    render_footer(frame, " j/k scroll  c clear log  esc back  q quit", chunks[2]);
}
