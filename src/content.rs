/// A stretch of displayed text sharing one highlight state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRun {
    pub text: String,
    pub highlighted: bool,
}

impl TextRun {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            highlighted: false,
        }
    }

    pub fn highlighted(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            highlighted: true,
        }
    }
}

/// Append `ch` to `runs`, extending the last run when its highlight state
/// matches.
pub fn push_char(runs: &mut Vec<TextRun>, ch: char, highlighted: bool) {
    match runs.last_mut() {
        Some(last) if last.highlighted == highlighted => last.text.push(ch),
        _ => runs.push(TextRun {
            text: ch.to_string(),
            highlighted,
        }),
    }
}

/// Text of all runs with highlighting dropped.
pub fn plain_text(runs: &[TextRun]) -> String {
    runs.iter().map(|r| r.text.as_str()).collect()
}
