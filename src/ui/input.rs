//! Held-key tracking for the preview binary.
//!
//! Terminals rarely report key releases, so a key counts as held until
//! [`HOLD_TIMEOUT`] passes without a press or repeat for it.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crossterm::event::{self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

const HOLD_TIMEOUT: Duration = Duration::from_millis(160);

pub struct InputState {
    last_active: HashMap<KeyCode, Instant>,
    fresh_presses: Vec<KeyCode>,
    quit_requested: bool,
}

impl InputState {
    pub fn new() -> Self {
        InputState {
            last_active: HashMap::with_capacity(8),
            fresh_presses: Vec::with_capacity(4),
            quit_requested: false,
        }
    }

    /// Drain pending terminal events without blocking. Call once per frame.
    /// Presses stay latched until [`InputState::clear_presses`].
    pub fn drain_events(&mut self) -> std::io::Result<()> {
        while poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                self.record(key);
            }
        }

        let now = Instant::now();
        self.last_active.retain(|_, t| now.duration_since(*t) < HOLD_TIMEOUT);
        Ok(())
    }

    fn record(&mut self, key: KeyEvent) {
        if key.kind == KeyEventKind::Release {
            return;
        }
        let ctrl_c = key.modifiers.contains(KeyModifiers::CONTROL)
            && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'));
        if ctrl_c || key.code == KeyCode::Esc || key.code == KeyCode::Char('q') {
            self.quit_requested = true;
        }
        if !self.is_held(key.code) {
            self.fresh_presses.push(key.code);
        }
        self.last_active.insert(key.code, Instant::now());
    }

    pub fn is_held(&self, code: KeyCode) -> bool {
        self.last_active
            .get(&code)
            .map(|t| t.elapsed() < HOLD_TIMEOUT)
            .unwrap_or(false)
    }

    /// Edge trigger: pressed since the last [`InputState::clear_presses`].
    pub fn was_pressed(&self, code: KeyCode) -> bool {
        self.fresh_presses.contains(&code)
    }

    /// Forget latched presses once a tick has consumed them.
    pub fn clear_presses(&mut self) {
        self.fresh_presses.clear();
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}
