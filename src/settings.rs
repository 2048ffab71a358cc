use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Modifier key that must be held for a pointer press to start dragging an
/// overlay. Plain presses are left to the content underneath.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DragModifier {
    #[default]
    Shift,
    Ctrl,
    Alt,
}

impl std::fmt::Display for DragModifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DragModifier::Shift => write!(f, "Shift"),
            DragModifier::Ctrl => write!(f, "Ctrl"),
            DragModifier::Alt => write!(f, "Alt"),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// When enabled the application initialises the logger at debug level.
    pub debug_logging: bool,
    /// Optional log file. Logs go to stderr when unset.
    pub log_file: Option<PathBuf>,
    /// Scale change per wheel notch.
    pub zoom_step: f32,
    /// Lowest scale an overlay may be zoomed out to.
    pub min_scale: f32,
    pub default_width: f32,
    pub default_height: f32,
    /// Resizing never shrinks an overlay below this box.
    pub min_width: f32,
    pub min_height: f32,
    pub drag_modifier: DragModifier,
    /// Symbol used by the practice field's full-text masking.
    pub mask_symbol: char,
    /// Tag shown inside the brackets of a region that has not been revealed.
    pub placeholder_tag: String,
    /// Show captured text inside the brackets right after capture instead of
    /// the placeholder.
    pub reveal_on_capture: bool,
    pub highlight_open: String,
    pub highlight_close: String,
    /// Monospace metrics used to measure the natural size of overlay text.
    pub char_width: f32,
    pub line_height: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug_logging: false,
            log_file: None,
            zoom_step: 0.1,
            min_scale: 0.1,
            default_width: 320.0,
            default_height: 200.0,
            min_width: 24.0,
            min_height: 24.0,
            drag_modifier: DragModifier::Shift,
            mask_symbol: '*',
            placeholder_tag: "MASKED".into(),
            reveal_on_capture: true,
            highlight_open: "<<".into(),
            highlight_close: ">>".into(),
            char_width: 8.0,
            line_height: 16.0,
        }
    }
}

impl Settings {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path).unwrap_or_default();
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let mut settings: Self = serde_json::from_str(&content)?;
        settings.sanitize();
        Ok(settings)
    }

    pub fn save(&self, path: &str) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Replace values that would break zooming or fitting with their defaults.
    fn sanitize(&mut self) {
        let defaults = Self::default();
        if !(self.zoom_step > 0.0) {
            tracing::warn!(value = self.zoom_step, "invalid zoom_step; using default");
            self.zoom_step = defaults.zoom_step;
        }
        if !(self.min_scale > 0.0) {
            tracing::warn!(value = self.min_scale, "invalid min_scale; using default");
            self.min_scale = defaults.min_scale;
        }
        if !(self.char_width > 0.0) || !(self.line_height > 0.0) {
            tracing::warn!("invalid text metrics; using defaults");
            self.char_width = defaults.char_width;
            self.line_height = defaults.line_height;
        }
        self.min_width = self.min_width.max(1.0);
        self.min_height = self.min_height.max(1.0);
    }
}
