use crate::audio::{AudioEngine, NullAudioEngine, RodioAudioEngine};
use crate::config;
use crate::core::{CardCore, SwipeDirection, classify_swipe};
use crate::gate::{GateDialog, GateOutcome};
use crate::model;
use crate::ui;
use anyhow::Result;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers,
    MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::prelude::Rect;
use std::io::stdout;
use std::time::{Duration, Instant};

#[derive(Debug, Default)]
pub struct AppStartupOptions {
    /// Raw `--page` value; invalid or out-of-range input silently defaults.
    pub initial_page: Option<String>,
    pub mute: bool,
}

pub fn run_with_startup(options: AppStartupOptions) -> Result<()> {
    let now = Instant::now();
    let mut core = CardCore::new(now)?;
    core.seed_page(options.initial_page.as_deref(), now);

    let mut audio: Box<dyn AudioEngine> = if options.mute {
        Box::new(NullAudioEngine::new())
    } else {
        match RodioAudioEngine::new() {
            Ok(engine) => Box::new(engine),
            Err(_) => Box::new(NullAudioEngine::new()),
        }
    };
    audio.set_volume(config::DEFAULT_VOLUME);
    if let Some(output) = audio.output_name() {
        core.set_status(&format!("Audio: {output}"));
    }

    enable_raw_mode()?;
    let mut out = stdout();
    execute!(out, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(out);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let mut last_frame = Instant::now();
    let mut drag_start: Option<(u16, u16)> = None;
    let mut area = Rect::default();

    let result: Result<()> = loop {
        let now = Instant::now();
        core.tick(now, area.width, &mut *audio);

        if core.dirty || last_frame.elapsed() >= config::PROGRESS_TICK {
            terminal.draw(|frame| {
                area = frame.area();
                ui::draw(frame, &core, &*audio, now);
            })?;
            core.dirty = false;
            last_frame = now;
        }

        if !event::poll(Duration::from_millis(33))? {
            continue;
        }

        match event::read()? {
            Event::Mouse(mouse) => {
                handle_mouse(&mut core, mouse, &mut drag_start, area, &mut *audio);
            }
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if key.code == KeyCode::Char('c')
                    && key.modifiers.contains(KeyModifiers::CONTROL)
                {
                    break Ok(());
                }
                if core.gate.is_open() {
                    handle_gate_key(&mut core, key.code);
                } else {
                    handle_key(&mut core, key.code, area, &mut *audio);
                }
            }
            _ => {}
        }
    };

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    result
}

fn handle_key(core: &mut CardCore, code: KeyCode, area: Rect, audio: &mut dyn AudioEngine) {
    let now = Instant::now();
    match code {
        KeyCode::Left | KeyCode::Up => core.previous(now, audio),
        KeyCode::Right | KeyCode::Down | KeyCode::Char(' ') => core.next(now, audio),
        KeyCode::Home => core.go_to(now, 1, audio),
        KeyCode::End => core.go_to(now, config::PAGE_COUNT, audio),
        // Ambient effect triggers, independent of the current page.
        KeyCode::Char('c') => {
            core.effects.spawn_confetti(now, area.width);
            core.dirty = true;
        }
        KeyCode::Char('h') => {
            core.effects.spawn_hearts(now, area.width, area.height);
            core.dirty = true;
        }
        KeyCode::Enter => match core.page() {
            model::MUSIC_PAGE => core.toggle_play(now, audio),
            model::SURPRISE_PAGE => {
                core.gate.open_prompt();
                core.dirty = true;
            }
            _ => {}
        },
        KeyCode::Char('+') | KeyCode::Char('=') => {
            let next = (audio.volume() + 0.05).clamp(0.0, 1.0);
            audio.set_volume(next);
            core.set_status(&format!("Volume: {}%", (next * 100.0).round() as u16));
        }
        KeyCode::Char('-') => {
            let next = (audio.volume() - 0.05).clamp(0.0, 1.0);
            audio.set_volume(next);
            core.set_status(&format!("Volume: {}%", (next * 100.0).round() as u16));
        }
        _ => {}
    }
}

fn handle_gate_key(core: &mut CardCore, code: KeyCode) {
    match code {
        KeyCode::Esc => {
            core.gate.close();
            core.dirty = true;
        }
        KeyCode::Enter => match core.gate.dialog {
            GateDialog::Prompt => match core.gate.submit() {
                GateOutcome::Matched => core.set_status("The magic words!"),
                GateOutcome::Mismatched => core.set_status("Hmm, that's not it."),
            },
            GateDialog::Error => {
                core.gate.retry();
                core.dirty = true;
            }
            GateDialog::Success => {
                claim_gift(core);
                core.gate.close();
            }
            GateDialog::Hidden => {}
        },
        KeyCode::Backspace => {
            core.gate.backspace();
            core.dirty = true;
        }
        KeyCode::Char(ch) => {
            core.gate.push_char(ch);
            core.dirty = true;
        }
        _ => {}
    }
}

/// A terminal has no "new browsing context": the claim link goes to the
/// clipboard instead and the status line says so.
fn claim_gift(core: &mut CardCore) {
    match arboard::Clipboard::new().and_then(|mut clip| clip.set_text(config::CLAIM_URL)) {
        Ok(()) => core.set_status("Claim link copied to your clipboard ♥"),
        Err(_) => core.set_status(&format!("Claim your gift at {}", config::CLAIM_URL)),
    }
}

fn handle_mouse(
    core: &mut CardCore,
    mouse: MouseEvent,
    drag_start: &mut Option<(u16, u16)>,
    area: Rect,
    audio: &mut dyn AudioEngine,
) {
    let now = Instant::now();
    // An open dialog is modal: a click anywhere acts as a backdrop click
    // and closes it; swipes and sparkles are suppressed.
    if core.gate.is_open() {
        if matches!(mouse.kind, MouseEventKind::Up(MouseButton::Left)) {
            core.gate.close();
            core.dirty = true;
        }
        *drag_start = None;
        return;
    }
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            *drag_start = Some((mouse.column, mouse.row));
        }
        MouseEventKind::Up(MouseButton::Left) => {
            let Some((start_x, start_y)) = drag_start.take() else {
                return;
            };
            let dx = i32::from(mouse.column) - i32::from(start_x);
            let dy = i32::from(mouse.row) - i32::from(start_y);

            match classify_swipe(dx, dy, config::SWIPE_THRESHOLD) {
                Some(SwipeDirection::Previous) => core.previous(now, audio),
                Some(SwipeDirection::Next) => core.next(now, audio),
                None => handle_click(core, mouse.column, mouse.row, area, audio),
            }
        }
        _ => {}
    }
}

fn handle_click(core: &mut CardCore, x: u16, y: u16, area: Rect, audio: &mut dyn AudioEngine) {
    let now = Instant::now();
    let header = ui::header_rect(area);
    if y < header.y + header.height {
        // Navigation controls and indicators never sparkle.
        match ui::header_hit(header, x, y) {
            Some(ui::HeaderHit::Previous) => core.previous(now, audio),
            Some(ui::HeaderHit::Next) => core.next(now, audio),
            Some(ui::HeaderHit::Page(page)) => core.go_to(now, page, audio),
            None => {}
        }
        return;
    }
    core.effects.spawn_sparkle(now, x, y);
    core.dirty = true;
}
