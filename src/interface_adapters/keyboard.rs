// Line-oriented key-event source for the headless binary.

use crate::domain::KeyEvent;
use serde::Deserialize;
use std::io::BufRead;
use std::thread::JoinHandle;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Key transition as written on stdin, mirroring DOM keydown/keyup events.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum KeyEventDto {
    Keydown { key: String },
    Keyup { key: String },
}

impl From<KeyEventDto> for KeyEvent {
    fn from(dto: KeyEventDto) -> Self {
        match dto {
            KeyEventDto::Keydown { key } => KeyEvent::down(key),
            KeyEventDto::Keyup { key } => KeyEvent::up(key),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum KeyLineError {
    #[error("invalid key event json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("expected `+Key`, `-Key` or a json key event")]
    Unrecognized,
}

/// Parses one input line. Blank lines yield `None`.
pub fn parse_key_line(line: &str) -> Result<Option<KeyEvent>, KeyLineError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    if line.starts_with('{') {
        let dto: KeyEventDto = serde_json::from_str(line)?;
        return Ok(Some(dto.into()));
    }
    // Shorthand: +ArrowUp / -ArrowUp
    if let Some(key) = line.strip_prefix('+').filter(|key| !key.is_empty()) {
        return Ok(Some(KeyEvent::down(key)));
    }
    if let Some(key) = line.strip_prefix('-').filter(|key| !key.is_empty()) {
        return Ok(Some(KeyEvent::up(key)));
    }
    Err(KeyLineError::Unrecognized)
}

/// Forwards key events read from `reader` until EOF or until the receiver is gone.
/// Blocks the calling thread; must not run on a runtime worker.
pub fn forward_key_lines<R: BufRead>(reader: R, tx: mpsc::Sender<KeyEvent>) {
    for line in reader.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                warn!(error = %e, "key input read failed");
                return;
            }
        };
        match parse_key_line(&line) {
            Ok(Some(event)) => {
                if tx.blocking_send(event).is_err() {
                    return;
                }
            }
            Ok(None) => {}
            Err(e) => warn!(error = %e, line = %line, "skipping key line"),
        }
    }
    debug!("key input reached eof");
}

// Stdin reads block with no way to cancel them, so they get their own thread
// instead of a runtime task that would hold up shutdown.
pub fn spawn_stdin_keys(tx: mpsc::Sender<KeyEvent>) -> std::io::Result<JoinHandle<()>> {
    std::thread::Builder::new()
        .name("stdin-keys".into())
        .spawn(move || forward_key_lines(std::io::stdin().lock(), tx))
}
