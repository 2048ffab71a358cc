use anyhow::anyhow;
use std::sync::mpsc::{channel, Receiver};
use std::thread;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClipboardError {
    PermissionDenied,
    Unavailable(String),
    Empty,
}

impl std::fmt::Display for ClipboardError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClipboardError::PermissionDenied => write!(f, "clipboard access denied"),
            ClipboardError::Unavailable(reason) => write!(f, "clipboard unavailable: {reason}"),
            ClipboardError::Empty => write!(f, "clipboard holds no text"),
        }
    }
}

impl std::error::Error for ClipboardError {}

/// Anything that can hand over the current clipboard text.
pub trait ClipboardSource {
    fn read_text(&mut self) -> Result<String, ClipboardError>;
}

/// The system clipboard through `arboard`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClipboard;

impl ClipboardSource for SystemClipboard {
    fn read_text(&mut self) -> Result<String, ClipboardError> {
        let mut cb = arboard::Clipboard::new().map_err(map_arboard_error)?;
        cb.get_text().map_err(map_arboard_error)
    }
}

fn map_arboard_error(err: arboard::Error) -> ClipboardError {
    match err {
        arboard::Error::ContentNotAvailable => ClipboardError::Empty,
        other => ClipboardError::Unavailable(other.to_string()),
    }
}

/// Read the clipboard on a worker thread. The receiver yields exactly one
/// result; poll it with `try_recv` from the UI loop.
pub fn request_text<S>(mut source: S) -> anyhow::Result<Receiver<Result<String, ClipboardError>>>
where
    S: ClipboardSource + Send + 'static,
{
    let (tx, rx) = channel();
    thread::Builder::new()
        .name("clipboard-read".to_string())
        .spawn(move || {
            let _ = tx.send(source.read_text());
        })
        .map_err(|err| anyhow!("failed to spawn clipboard thread: {err}"))?;
    Ok(rx)
}
