use crate::content::TextRun;
use crate::masking::registry::{OverlayRegistry, RegionId};
use crate::settings::Settings;

/// What a region shows between its brackets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Placeholder,
    Revealed(String),
}

/// Captured text hidden behind a bracketed placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskedRegion {
    original: String,
    placeholder_tag: String,
    payload: Payload,
}

impl MaskedRegion {
    pub fn new(original: impl Into<String>, placeholder_tag: impl Into<String>) -> Self {
        Self {
            original: original.into(),
            placeholder_tag: placeholder_tag.into(),
            payload: Payload::Placeholder,
        }
    }

    pub fn original(&self) -> &str {
        &self.original
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    pub fn is_revealed(&self) -> bool {
        matches!(self.payload, Payload::Revealed(_))
    }

    pub fn reveal(&mut self, text: impl Into<String>) {
        self.payload = Payload::Revealed(text.into());
    }

    fn payload_text(&self) -> &str {
        match &self.payload {
            Payload::Placeholder => &self.placeholder_tag,
            Payload::Revealed(text) => text,
        }
    }

    /// Displayed form: always `[<payload>]`.
    pub fn render(&self) -> String {
        bracketed(self.payload_text())
    }

    pub fn runs(&self) -> Vec<TextRun> {
        vec![TextRun::plain(self.render())]
    }
}

fn bracketed(text: &str) -> String {
    format!("[{text}]")
}

/// Regions touched by one paste.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubstitutionReport {
    pub replaced: Vec<RegionId>,
    pub unmatched: Vec<RegionId>,
}

impl SubstitutionReport {
    pub fn is_empty(&self) -> bool {
        self.replaced.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct MaskingEngine {
    placeholder_tag: String,
}

impl Default for MaskingEngine {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

impl MaskingEngine {
    pub fn new(placeholder_tag: impl Into<String>) -> Self {
        Self {
            placeholder_tag: placeholder_tag.into(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.placeholder_tag.clone())
    }

    /// Create a region showing the placeholder and register it.
    pub fn create_masked_region(
        &self,
        original: &str,
        registry: &mut OverlayRegistry,
    ) -> RegionId {
        let id = registry.register_region(MaskedRegion::new(original, self.placeholder_tag.as_str()));
        tracing::debug!(%id, len = original.chars().count(), "masked region created");
        id
    }

    /// Put `attempt` between the brackets of every region that still shows its
    /// placeholder or its original text.
    ///
    /// The original text is searched for as a literal `[original]` token in the
    /// region's rendered form, so brackets, dots or other punctuation in the
    /// captured text match verbatim. A region whose rendered form contains
    /// neither the placeholder nor that token keeps its text.
    pub fn substitute_on_paste(
        &self,
        attempt: &str,
        registry: &mut OverlayRegistry,
    ) -> SubstitutionReport {
        let mut report = SubstitutionReport::default();
        let replacement = bracketed(attempt);
        for (id, region) in registry.regions_mut() {
            if !region.is_revealed() {
                region.reveal(attempt);
                report.replaced.push(id);
                continue;
            }
            let rendered = region.render();
            let token = bracketed(&region.original);
            if !rendered.contains(&token) {
                tracing::debug!(%id, "paste substitution found no literal match");
                report.unmatched.push(id);
                continue;
            }
            let substituted = rendered.replace(&token, &replacement);
            let inner = substituted
                .strip_prefix('[')
                .and_then(|s| s.strip_suffix(']'))
                .unwrap_or(attempt);
            region.reveal(inner.to_string());
            report.replaced.push(id);
        }
        report
    }
}
