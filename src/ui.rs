use crate::audio::AudioEngine;
use crate::config;
use crate::core::{CardCore, NavDirection, NavState};
use crate::effects::ParticleKind;
use crate::gate::GateDialog;
use crate::model::{self, StatValue};
use crate::player;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use std::time::Instant;

const APP_TITLE: &str = "Keepsake";

/// Width of the header nav strip: "<  o o o o o  >".
const NAV_STRIP_WIDTH: u16 = 15;

#[derive(Clone, Copy)]
struct Palette {
    bg: Color,
    panel_bg: Color,
    border: Color,
    text: Color,
    muted: Color,
    accent: Color,
    alert: Color,
    heart: Color,
    popup_bg: Color,
}

fn palette() -> Palette {
    Palette {
        bg: Color::Rgb(24, 16, 28),
        panel_bg: Color::Rgb(36, 24, 42),
        border: Color::Rgb(212, 165, 165),
        text: Color::Rgb(248, 234, 240),
        muted: Color::Rgb(178, 150, 168),
        accent: Color::Rgb(168, 230, 207),
        alert: Color::Rgb(255, 179, 186),
        heart: Color::Rgb(255, 143, 171),
        popup_bg: Color::Rgb(44, 30, 52),
    }
}

/// Original card palette, used for confetti tints.
const CONFETTI_COLORS: [Color; 5] = [
    Color::Rgb(168, 230, 207),
    Color::Rgb(212, 165, 165),
    Color::Rgb(255, 179, 186),
    Color::Rgb(179, 217, 255),
    Color::Rgb(255, 209, 220),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderHit {
    Previous,
    Next,
    Page(usize),
}

pub fn header_rect(area: Rect) -> Rect {
    layout(area)[0]
}

fn layout(area: Rect) -> std::rc::Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(3),
        ])
        .split(area)
}

fn nav_strip_origin(header: Rect) -> (u16, u16) {
    let start = header.x + header.width.saturating_sub(NAV_STRIP_WIDTH) / 2;
    (start, header.y + 1)
}

/// Maps a click inside the header onto the prev/next arrows or one of the
/// page indicators.
pub fn header_hit(header: Rect, x: u16, y: u16) -> Option<HeaderHit> {
    let (start, row) = nav_strip_origin(header);
    if y != row {
        return None;
    }
    if x == start {
        return Some(HeaderHit::Previous);
    }
    if x == start + NAV_STRIP_WIDTH - 1 {
        return Some(HeaderHit::Next);
    }
    let indicators = start + 3;
    if x >= indicators && x < indicators + 9 && (x - indicators) % 2 == 0 {
        return Some(HeaderHit::Page(usize::from((x - indicators) / 2) + 1));
    }
    None
}

pub fn draw(frame: &mut Frame, core: &CardCore, audio: &dyn AudioEngine, now: Instant) {
    let colors = palette();
    frame.render_widget(
        Block::default().style(Style::default().bg(colors.bg)),
        frame.area(),
    );

    let chunks = layout(frame.area());
    draw_header(frame, core, &colors, chunks[0]);
    draw_body(frame, core, audio, now, &colors, chunks[1]);
    draw_footer(frame, core, &colors, chunks[2]);
    draw_particles(frame, core, now, &colors);
    // The modal paints last so decorations never land on top of it.
    draw_dialogs(frame, core, &colors);
}

fn draw_header(frame: &mut Frame, core: &CardCore, colors: &Palette, area: Rect) {
    frame.render_widget(
        panel_block(APP_TITLE, colors.panel_bg, colors.text, colors.border),
        area,
    );

    let mut spans = Vec::new();
    let prev_style = if core.prev_enabled() {
        Style::default().fg(colors.accent)
    } else {
        Style::default().fg(colors.muted).add_modifier(Modifier::DIM)
    };
    let next_style = if core.next_enabled() {
        Style::default().fg(colors.accent)
    } else {
        Style::default().fg(colors.muted).add_modifier(Modifier::DIM)
    };

    spans.push(Span::styled("‹", prev_style));
    spans.push(Span::raw("  "));
    for page in 1..=config::PAGE_COUNT {
        if page > 1 {
            spans.push(Span::raw(" "));
        }
        if page == core.page() {
            spans.push(Span::styled(
                "●",
                Style::default()
                    .fg(colors.heart)
                    .add_modifier(Modifier::BOLD),
            ));
        } else {
            spans.push(Span::styled("○", Style::default().fg(colors.muted)));
        }
    }
    spans.push(Span::raw("  "));
    spans.push(Span::styled("›", next_style));

    let (start, row) = nav_strip_origin(area);
    let strip = Rect {
        x: start,
        y: row,
        width: NAV_STRIP_WIDTH.min(area.width),
        height: 1,
    };
    frame.render_widget(Paragraph::new(Line::from(spans)), strip);

    let title = Paragraph::new(Span::styled(
        model::page_title(core.page()),
        Style::default().fg(colors.text).add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Right);
    let title_area = area.inner(Margin {
        vertical: 1,
        horizontal: 2,
    });
    frame.render_widget(title, title_area);
}

fn draw_body(
    frame: &mut Frame,
    core: &CardCore,
    audio: &dyn AudioEngine,
    now: Instant,
    colors: &Palette,
    area: Rect,
) {
    // A page mid-flight renders shifted one cell toward its origin side.
    let area = match core.nav {
        NavState::Transitioning {
            direction: NavDirection::Forward,
            ..
        } => Rect {
            x: area.x + 1,
            width: area.width.saturating_sub(1),
            ..area
        },
        NavState::Transitioning {
            direction: NavDirection::Backward,
            ..
        } => Rect {
            width: area.width.saturating_sub(1),
            ..area
        },
        NavState::Settled => area,
    };

    match core.page() {
        model::HERO_PAGE => draw_hero(frame, core, now, colors, area),
        model::TIMELINE_PAGE => draw_timeline(frame, core, now, colors, area),
        model::STATS_PAGE => draw_stats(frame, core, now, colors, area),
        model::MUSIC_PAGE => draw_music(frame, core, audio, now, colors, area),
        model::SURPRISE_PAGE => draw_surprise(frame, core, now, colors, area),
        _ => {}
    }
}

fn draw_hero(frame: &mut Frame, core: &CardCore, now: Instant, colors: &Palette, area: Rect) {
    let drift = core
        .effects
        .ambient_restarted_at
        .map(|at| now.saturating_duration_since(at).as_secs_f64())
        .unwrap_or(0.0);

    let mut ambient = String::new();
    for index in 0..6 {
        let phase = drift + f64::from(index) * 0.5;
        let pad = (2.0 + 2.0 * (phase * std::f64::consts::TAU / 6.0).sin()) as usize;
        ambient.push_str(&" ".repeat(pad + 1));
        ambient.push_str(if index % 2 == 0 { "♥" } else { "✧" });
    }

    let lines = vec![
        Line::from(""),
        Line::from(""),
        Line::from(Span::styled(
            ambient.clone(),
            Style::default().fg(colors.heart),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Happy Birthday",
            Style::default()
                .fg(colors.accent)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Five little pages, just for you.",
            Style::default().fg(colors.text),
        )),
        Line::from(Span::styled(
            "Swipe, use the arrows, or press Space to turn the page.",
            Style::default().fg(colors.muted),
        )),
        Line::from(""),
        Line::from(Span::styled(ambient, Style::default().fg(colors.heart))),
    ];

    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(panel_block("", colors.panel_bg, colors.text, colors.border)),
        area,
    );
}

fn draw_timeline(frame: &mut Frame, core: &CardCore, now: Instant, colors: &Palette, area: Rect) {
    let revealed = core.effects.revealed_timeline_rows(now, core.timeline.len());
    let mut lines = vec![Line::from("")];
    for item in core.timeline.iter().take(revealed) {
        lines.push(Line::from(vec![
            Span::styled(
                format!("  {}  ", item.date),
                Style::default().fg(colors.alert),
            ),
            Span::styled(
                item.title.clone(),
                Style::default().fg(colors.text).add_modifier(Modifier::BOLD),
            ),
        ]));
        lines.push(Line::from(Span::styled(
            format!("      {}", item.detail),
            Style::default().fg(colors.muted),
        )));
        lines.push(Line::from(""));
    }

    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(panel_block(
                "Our Timeline",
                colors.panel_bg,
                colors.text,
                colors.border,
            )),
        area,
    );
}

fn draw_stats(frame: &mut Frame, core: &CardCore, now: Instant, colors: &Palette, area: Rect) {
    let mut lines = vec![Line::from("")];
    for card in &core.stats {
        let value = match card.value {
            StatValue::Number(target) => core.effects.counter_value(now, target).to_string(),
            StatValue::Infinite => String::from("∞"),
        };
        lines.push(Line::from(vec![
            Span::styled(
                format!("  {value:>6}  "),
                Style::default()
                    .fg(colors.accent)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(card.label.clone(), Style::default().fg(colors.text)),
        ]));
        lines.push(Line::from(""));
    }

    frame.render_widget(
        Paragraph::new(lines).block(panel_block(
            "By the Numbers",
            colors.panel_bg,
            colors.text,
            colors.border,
        )),
        area,
    );
}

fn draw_music(
    frame: &mut Frame,
    core: &CardCore,
    audio: &dyn AudioEngine,
    now: Instant,
    colors: &Palette,
    area: Rect,
) {
    let entry = core.player.current();
    let track_number = core.player.cursor + 1;
    let bar = progress_bar(core.player.progress, 32);
    let affordance = if core.player.is_playing() {
        "[ pause ]"
    } else {
        "[ play ]"
    };

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("{track_number:02}. {}", entry.title),
            Style::default()
                .fg(colors.accent)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            entry.artist.clone(),
            Style::default().fg(colors.alert),
        )),
        Line::from(""),
        Line::from(Span::styled(
            entry.description.clone(),
            Style::default().fg(colors.muted),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled(
                core.player.time_label(now, audio),
                Style::default().fg(colors.text),
            ),
            Span::raw(" "),
            Span::styled(bar, Style::default().fg(colors.heart)),
            Span::raw(" "),
            Span::styled(
                player::Player::window_label(),
                Style::default().fg(colors.text),
            ),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            format!("{affordance}  Enter toggles playback"),
            Style::default().fg(colors.muted),
        )),
    ];

    if core.player.claim_revealed() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "♪ End of the mixtape - your surprise waits on the last page.",
            Style::default()
                .fg(colors.accent)
                .add_modifier(Modifier::BOLD),
        )));
    }

    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: false })
            .block(panel_block(
                &format!(
                    "Our Mixtape ({track_number}/{})",
                    core.player.entries().len()
                ),
                colors.panel_bg,
                colors.text,
                colors.border,
            )),
        area,
    );
}

fn draw_surprise(frame: &mut Frame, core: &CardCore, now: Instant, colors: &Palette, area: Rect) {
    let lines = if core.effects.surprise_visible(now) {
        vec![
            Line::from(""),
            Line::from(Span::styled(
                "      ______      ",
                Style::default().fg(colors.alert),
            )),
            Line::from(Span::styled(
                "     |\\ /\\ /|     ",
                Style::default().fg(colors.alert),
            )),
            Line::from(Span::styled(
                "     | \\/\\/ |     ",
                Style::default().fg(colors.alert),
            )),
            Line::from(Span::styled(
                "     |______|     ",
                Style::default().fg(colors.alert),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "One last thing...",
                Style::default()
                    .fg(colors.accent)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "Press Enter to open your gift.",
                Style::default().fg(colors.text),
            )),
        ]
    } else {
        vec![Line::from(""), Line::from("")]
    };

    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(panel_block(
                "A Little Surprise",
                colors.panel_bg,
                colors.text,
                colors.border,
            )),
        area,
    );
}

fn draw_footer(frame: &mut Frame, core: &CardCore, colors: &Palette, area: Rect) {
    let footer = Paragraph::new(Line::from(vec![
        Span::styled(
            "Keys: arrows/Space flip, Home/End jump, Enter act, c confetti, h hearts, Ctrl+C quit",
            Style::default().fg(colors.muted),
        ),
        Span::styled("  |  ", Style::default().fg(colors.muted)),
        Span::styled(core.status.as_str(), Style::default().fg(colors.text)),
        Span::styled("  |  ", Style::default().fg(colors.muted)),
        Span::styled(
            core.share_hint.as_str(),
            Style::default().fg(colors.accent),
        ),
    ]))
    .block(panel_block("", colors.panel_bg, colors.text, colors.border));
    frame.render_widget(footer, area);
}

fn draw_dialogs(frame: &mut Frame, core: &CardCore, colors: &Palette) {
    let (title, lines) = match core.gate.dialog {
        GateDialog::Hidden => return,
        GateDialog::Prompt => (
            "The Magic Words",
            vec![
                Line::from(Span::styled(
                    "Whisper the phrase to open the gift:",
                    Style::default().fg(colors.text),
                )),
                Line::from(""),
                Line::from(Span::styled(
                    format!("> {}_", core.gate.input),
                    Style::default().fg(colors.accent),
                )),
                Line::from(""),
                Line::from(Span::styled(
                    "Enter to submit, Esc to close",
                    Style::default().fg(colors.muted),
                )),
            ],
        ),
        GateDialog::Success => (
            "It's Yours",
            vec![
                Line::from(Span::styled(
                    "You remembered. Of course you did.",
                    Style::default().fg(colors.accent),
                )),
                Line::from(""),
                Line::from(Span::styled(
                    "Enter copies the claim link, Esc closes",
                    Style::default().fg(colors.muted),
                )),
            ],
        ),
        GateDialog::Error => (
            "Not Quite",
            vec![
                Line::from(Span::styled(
                    "That's not the phrase.",
                    Style::default().fg(colors.alert),
                )),
                Line::from(""),
                Line::from(Span::styled(
                    "Enter to try again, Esc to close",
                    Style::default().fg(colors.muted),
                )),
            ],
        ),
    };

    let popup = centered_rect(frame.area(), 52, 32);
    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: false })
            .block(panel_block(
                title,
                colors.popup_bg,
                colors.text,
                colors.border,
            )),
        popup,
    );
}

fn draw_particles(frame: &mut Frame, core: &CardCore, now: Instant, colors: &Palette) {
    let area = frame.area();
    for particle in &core.effects.particles {
        let Some((col, row)) = particle.position_at(now, area.height) else {
            continue;
        };
        if col >= area.width {
            continue;
        }
        let color = match particle.kind {
            ParticleKind::Confetti => {
                CONFETTI_COLORS[particle.tint % CONFETTI_COLORS.len()]
            }
            ParticleKind::Heart => colors.heart,
            ParticleKind::Sparkle => Color::Rgb(255, 229, 153),
        };
        let cell = Rect {
            x: col,
            y: row,
            width: 1,
            height: 1,
        };
        frame.render_widget(
            Paragraph::new(Span::styled(particle.glyph(), Style::default().fg(color))),
            cell,
        );
    }
}

fn panel_block(title: &str, bg: Color, text: Color, border: Color) -> Block<'static> {
    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .style(Style::default().bg(bg));
    if !title.is_empty() {
        block = block.title(Span::styled(
            format!(" {title} "),
            Style::default().fg(text).add_modifier(Modifier::BOLD),
        ));
    }
    block
}

fn centered_rect(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}

fn progress_bar(ratio: f64, width: usize) -> String {
    let clamped = ratio.clamp(0.0, 1.0);
    let filled = (clamped * width as f64).round() as usize;
    let mut bar = String::with_capacity(width + 2);
    bar.push('[');
    bar.push_str(&"#".repeat(filled));
    bar.push_str(&"-".repeat(width.saturating_sub(filled)));
    bar.push(']');
    bar
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::NullAudioEngine;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn symbol_at(terminal: &Terminal<TestBackend>, x: u16, y: u16) -> String {
        terminal
            .backend()
            .buffer()
            .cell((x, y))
            .map(|cell| cell.symbol().to_string())
            .unwrap_or_default()
    }

    #[test]
    fn open_dialog_covers_the_particle_layer() {
        let now = Instant::now();
        let mut core = CardCore::new(now).expect("core");
        let audio = NullAudioEngine::new();
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).expect("terminal");

        // A cell inside the area the centered popup occupies.
        core.effects.spawn_sparkle(now, 40, 12);
        terminal
            .draw(|frame| draw(frame, &core, &audio, now))
            .expect("draw");
        assert_eq!(symbol_at(&terminal, 40, 12), "✦");

        core.gate.open_prompt();
        terminal
            .draw(|frame| draw(frame, &core, &audio, now))
            .expect("draw");
        assert_ne!(
            symbol_at(&terminal, 40, 12),
            "✦",
            "the modal paints over the sparkle"
        );
    }
}
