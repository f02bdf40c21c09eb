use std::io::{self, BufRead, IsTerminal, Write};

use anyhow::{bail, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};

pub const PIN_ENV: &str = "SHIFTPLAN_PIN";

#[derive(Debug, PartialEq)]
enum Step {
    Continue,
    Done,
    Cancelled,
}

fn apply_key(buffer: &mut String, key: KeyEvent) -> Step {
    if key.kind != KeyEventKind::Press {
        return Step::Continue;
    }
    match key.code {
        KeyCode::Enter => Step::Done,
        KeyCode::Esc => Step::Cancelled,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Step::Cancelled,
        KeyCode::Backspace => {
            buffer.pop();
            Step::Continue
        }
        KeyCode::Char(c) => {
            buffer.push(c);
            Step::Continue
        }
        _ => Step::Continue,
    }
}

fn read_hidden() -> Result<Option<String>> {
    enable_raw_mode()?;
    let mut buffer = String::new();
    let outcome = loop {
        match event::read() {
            Ok(Event::Key(key)) => match apply_key(&mut buffer, key) {
                Step::Continue => {}
                Step::Done => break Ok(Some(buffer)),
                Step::Cancelled => break Ok(None),
            },
            Ok(_) => {}
            Err(error) => break Err(error.into()),
        }
    };
    disable_raw_mode()?;
    eprintln!();
    outcome
}

/// Reads a secret without echoing it. Falls back to one line of stdin when
/// it is not a terminal.
pub fn read_secret(label: &str) -> Result<String> {
    let stdin = io::stdin();
    if !stdin.is_terminal() {
        let mut line = String::new();
        stdin.lock().read_line(&mut line)?;
        return Ok(line.trim_end_matches(['\r', '\n']).to_string());
    }

    eprint!("{}: ", label);
    io::stderr().flush()?;
    match read_hidden()? {
        Some(secret) => Ok(secret),
        None => bail!("Cancelled"),
    }
}

/// The PIN from `SHIFTPLAN_PIN`, or an interactive prompt.
pub fn read_pin(label: &str) -> Result<String> {
    match std::env::var(PIN_ENV) {
        Ok(pin) => Ok(pin),
        Err(_) => read_secret(label),
    }
}
