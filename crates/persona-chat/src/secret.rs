//! Reading secrets from the terminal without echoing them.

use std::io::{self, IsTerminal};

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyOutcome {
    Continue,
    Submit,
    Abort,
}

/// Feeds one key press into the secret being typed.
pub fn apply_key(buf: &mut String, key: &KeyEvent) -> KeyOutcome {
    // Some platforms report releases and repeats as well.
    if key.kind != KeyEventKind::Press {
        return KeyOutcome::Continue;
    }
    match key.code {
        KeyCode::Enter => KeyOutcome::Submit,
        KeyCode::Esc => KeyOutcome::Abort,
        KeyCode::Char('c' | 'd')
            if key.modifiers.contains(KeyModifiers::CONTROL) =>
        {
            KeyOutcome::Abort
        }
        KeyCode::Char(c) => {
            buf.push(c);
            KeyOutcome::Continue
        }
        KeyCode::Backspace => {
            buf.pop();
            KeyOutcome::Continue
        }
        _ => KeyOutcome::Continue,
    }
}

struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> io::Result<Self> {
        enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        disable_raw_mode().ok();
    }
}

/// Returns `true` if stdin is a terminal we can switch to raw mode.
#[inline]
pub fn is_interactive() -> bool {
    io::stdin().is_terminal()
}

/// Reads one line in raw mode, so typed characters are not shown.
///
/// Blocks the calling thread. Returns `None` if the user aborts with
/// Esc, Ctrl-C or Ctrl-D.
pub fn read_hidden_line() -> io::Result<Option<String>> {
    let _guard = RawModeGuard::enable()?;
    let mut buf = String::new();
    loop {
        let Event::Key(key) = event::read()? else {
            continue;
        };
        match apply_key(&mut buf, &key) {
            KeyOutcome::Continue => {}
            KeyOutcome::Submit => return Ok(Some(buf)),
            KeyOutcome::Abort => return Ok(None),
        }
    }
}
