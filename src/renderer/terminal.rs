//! Terminal frontend
//!
//! Draws the 16x2 board inside a box with crossterm and reads the three
//! buttons from the keyboard. Terminals that support the keyboard enhancement
//! protocol report key releases; elsewhere a key counts as held for a short
//! window after each press or auto-repeat.

use std::collections::{HashMap, HashSet};
use std::io::{self, Stdout, Write, stdout};
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute, queue,
    style::Print,
    terminal::{self, ClearType},
};

use super::{DisplaySink, Frame, glyphs};
use crate::platform::{Button, InputSource};

const HELP: &str = "Space/Up jump  Down/S duck  Enter start  Q quit";

fn button_for(code: KeyCode) -> Option<Button> {
    match code {
        KeyCode::Char(' ') | KeyCode::Up | KeyCode::Char('w') => Some(Button::Jump),
        KeyCode::Down | KeyCode::Char('s') => Some(Button::Duck),
        KeyCode::Enter => Some(Button::Start),
        _ => None,
    }
}

/// Button state built from key events
#[derive(Debug)]
struct KeyState {
    /// Terminal reports key releases
    enhanced: bool,
    /// Hold window for terminals without release events
    hold: Duration,
    last_seen: HashMap<Button, Instant>,
    down: HashSet<Button>,
    quit: bool,
}

impl KeyState {
    fn new(enhanced: bool, hold: Duration) -> Self {
        Self {
            enhanced,
            hold,
            last_seen: HashMap::new(),
            down: HashSet::new(),
            quit: false,
        }
    }

    /// Apply a key event. Stale events only count for quitting and, when the
    /// terminal reports releases, for tracking which keys are still down.
    fn handle(&mut self, key: KeyEvent, now: Instant, stale: bool) {
        let ctrl_c =
            key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL);
        if ctrl_c || matches!(key.code, KeyCode::Char('q') | KeyCode::Esc) {
            self.quit = true;
            return;
        }

        let Some(button) = button_for(key.code) else {
            return;
        };
        match key.kind {
            KeyEventKind::Press | KeyEventKind::Repeat => {
                self.down.insert(button);
                if !stale {
                    self.last_seen.insert(button, now);
                }
            }
            KeyEventKind::Release => {
                self.down.remove(&button);
            }
        }
    }

    /// Forget presses seen so far; only keys still physically down survive
    fn forget_presses(&mut self) {
        self.last_seen.clear();
    }

    fn is_pressed(&self, button: Button, now: Instant) -> bool {
        if self.enhanced {
            self.down.contains(&button)
        } else {
            self.last_seen
                .get(&button)
                .is_some_and(|seen| now.saturating_duration_since(*seen) < self.hold)
        }
    }
}

/// crossterm-backed display sink and input source
pub struct TerminalConsole {
    out: Stdout,
    keys: KeyState,
    active: bool,
}

impl TerminalConsole {
    /// Switch the terminal into raw mode on the alternate screen
    pub fn new(key_hold_ms: u64) -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let mut out = stdout();
        execute!(
            out,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::DisableLineWrap,
        )?;

        let enhanced = terminal::supports_keyboard_enhancement().unwrap_or(false);
        if enhanced {
            execute!(
                out,
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
        }
        log::info!("Terminal ready (key release events: {})", enhanced);

        Ok(Self {
            out,
            keys: KeyState::new(enhanced, Duration::from_millis(key_hold_ms)),
            active: true,
        })
    }

    /// Drain pending keyboard events without blocking
    pub fn poll(&mut self) -> io::Result<()> {
        self.drain(false)
    }

    /// Drop presses that queued up while the game was blocked on a jingle
    ///
    /// Quit keys still count. Keys that are held keep auto-repeating, so they
    /// come back on the next `poll`.
    pub fn discard_pending(&mut self) -> io::Result<()> {
        self.drain(true)?;
        self.keys.forget_presses();
        Ok(())
    }

    fn drain(&mut self, stale: bool) -> io::Result<()> {
        while event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                self.keys.handle(key, Instant::now(), stale);
            }
        }
        Ok(())
    }

    /// Player asked to leave
    pub fn quit_requested(&self) -> bool {
        self.keys.quit
    }

    fn draw(&mut self, frame: &Frame) -> io::Result<()> {
        let lines = frame.to_lines();
        let high_score = match frame {
            Frame::Play(play) => Some(play.high_score),
            Frame::GameOver(over) => Some(over.high_score),
            Frame::Title(_) => None,
        };

        queue!(
            self.out,
            cursor::MoveTo(0, 0),
            terminal::Clear(ClearType::All),
            Print("+----------------+\r\n"),
            Print(format!("|{}|\r\n", lines[0])),
            Print(format!("|{}|\r\n", lines[1])),
            Print("+----------------+\r\n"),
        )?;
        if let Some(high_score) = high_score {
            queue!(self.out, Print(format!("HI {}\r\n", high_score)))?;
        } else {
            queue!(self.out, Print("\r\n"))?;
        }
        queue!(self.out, Print(HELP))?;
        self.out.flush()
    }

    /// Put the terminal back the way we found it
    pub fn restore(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        if self.keys.enhanced {
            execute!(self.out, PopKeyboardEnhancementFlags)?;
        }
        execute!(
            self.out,
            terminal::LeaveAlternateScreen,
            cursor::Show,
            terminal::EnableLineWrap,
        )?;
        terminal::disable_raw_mode()
    }
}

impl InputSource for TerminalConsole {
    fn is_pressed(&mut self, button: Button) -> bool {
        self.keys.is_pressed(button, Instant::now())
    }
}

impl DisplaySink for TerminalConsole {
    fn present(&mut self, frame: &Frame) {
        if matches!(frame, Frame::Play(play) if play.reload_glyphs) {
            // Text cells have no character generator; nothing to upload
            log::debug!("Glyph refresh ({} custom glyphs)", glyphs::uploadable().count());
        }
        if let Err(e) = self.draw(frame) {
            log::warn!("Render error: {:?}", e);
        }
    }
}

impl Drop for TerminalConsole {
    fn drop(&mut self) {
        if let Err(e) = self.restore() {
            log::error!("Failed to restore terminal: {:?}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_mapping() {
        assert_eq!(button_for(KeyCode::Char(' ')), Some(Button::Jump));
        assert_eq!(button_for(KeyCode::Up), Some(Button::Jump));
        assert_eq!(button_for(KeyCode::Down), Some(Button::Duck));
        assert_eq!(button_for(KeyCode::Enter), Some(Button::Start));
        assert_eq!(button_for(KeyCode::Char('x')), None);
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn release(code: KeyCode) -> KeyEvent {
        KeyEvent::new_with_kind(code, KeyModifiers::NONE, KeyEventKind::Release)
    }

    #[test]
    fn test_press_holds_for_window() {
        let start = Instant::now();
        let mut keys = KeyState::new(false, Duration::from_millis(150));
        keys.handle(press(KeyCode::Enter), start, false);
        assert!(keys.is_pressed(Button::Start, start + Duration::from_millis(100)));
        assert!(!keys.is_pressed(Button::Start, start + Duration::from_millis(200)));
    }

    #[test]
    fn test_presses_queued_while_blocked_are_dropped() {
        let start = Instant::now();
        let mut keys = KeyState::new(false, Duration::from_millis(150));

        // Enter hit during the game-over jingle, drained once it finished
        keys.handle(press(KeyCode::Enter), start, false);
        keys.handle(press(KeyCode::Enter), start, true);
        keys.forget_presses();
        assert!(!keys.is_pressed(Button::Start, start));

        // Quit still gets through
        keys.handle(press(KeyCode::Char('q')), start, true);
        assert!(keys.quit);
    }

    #[test]
    fn test_release_events_track_held_keys_across_block() {
        let start = Instant::now();
        let mut keys = KeyState::new(true, Duration::from_millis(150));

        keys.handle(press(KeyCode::Enter), start, true);
        keys.handle(release(KeyCode::Enter), start, true);
        keys.handle(press(KeyCode::Down), start, true);
        keys.forget_presses();

        assert!(!keys.is_pressed(Button::Start, start));
        assert!(keys.is_pressed(Button::Duck, start));
    }
}
