//! Wires capture, masking, comparison and pointer input for one page session.

use crate::clipboard::{ClipboardError, ClipboardSource};
use crate::diff::{self, DiffResult};
use crate::masking::{MaskingEngine, OverlayRegistry, PracticeField, SubstitutionReport};
use crate::overlay::{
    InputEvent, OverlayController, OverlayError, OverlayId, Point, PointerOutcome,
};
use crate::settings::Settings;

pub struct Session {
    settings: Settings,
    controller: OverlayController,
    masking: MaskingEngine,
    registry: OverlayRegistry,
    field: PracticeField,
}

impl Session {
    pub fn new(settings: Settings) -> Self {
        Self {
            controller: OverlayController::from_settings(&settings),
            masking: MaskingEngine::from_settings(&settings),
            registry: OverlayRegistry::new(),
            field: PracticeField::new(settings.mask_symbol),
            settings,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn controller(&self) -> &OverlayController {
        &self.controller
    }

    pub fn registry(&self) -> &OverlayRegistry {
        &self.registry
    }

    pub fn field(&self) -> &PracticeField {
        &self.field
    }

    pub fn field_mut(&mut self) -> &mut PracticeField {
        &mut self.field
    }

    /// Read the clipboard and open an overlay for its text. A failed read is
    /// logged and leaves the session unchanged.
    pub fn capture(&mut self, source: &mut dyn ClipboardSource, position: Point) -> Option<OverlayId> {
        let result = source.read_text();
        self.accept_capture(result, position)
    }

    /// Finish a capture whose clipboard read completed elsewhere.
    pub fn accept_capture(
        &mut self,
        result: Result<String, ClipboardError>,
        position: Point,
    ) -> Option<OverlayId> {
        match result {
            Ok(text) => Some(self.capture_text(&text, position)),
            Err(err) => {
                tracing::warn!(error = %err, "failed to read clipboard");
                None
            }
        }
    }

    pub fn capture_text(&mut self, text: &str, position: Point) -> OverlayId {
        let region_id = self.masking.create_masked_region(text, &mut self.registry);
        let overlay_id = self.controller.create(position);
        if self.settings.reveal_on_capture {
            if let Some(region) = self.registry.region_mut(region_id) {
                region.reveal(text);
            }
        }
        if let Err(err) = self.controller.attach_region(overlay_id, region_id) {
            tracing::warn!(error = %err, "region could not be attached");
        }
        self.refresh_overlay(overlay_id);
        tracing::info!(%overlay_id, %region_id, "captured clipboard text");
        overlay_id
    }

    /// Substitute a pasted attempt into every matching region and redraw the
    /// overlays showing them.
    pub fn paste(&mut self, attempt: &str) -> SubstitutionReport {
        let report = self.masking.substitute_on_paste(attempt, &mut self.registry);
        let touched: Vec<OverlayId> = self
            .controller
            .overlays()
            .filter(|o| o.region().is_some_and(|r| report.replaced.contains(&r)))
            .map(|o| o.id())
            .collect();
        for id in touched {
            self.refresh_overlay(id);
        }
        report
    }

    /// Compare `attempt` with the text captured into `id` and show the
    /// highlighted result in that overlay.
    pub fn compare_overlay(&mut self, id: OverlayId, attempt: &str) -> Result<Option<DiffResult>, OverlayError> {
        let overlay = self
            .controller
            .overlay(id)
            .ok_or(OverlayError::UnknownOverlay(id))?;
        let Some(region) = overlay.region().and_then(|r| self.registry.region(r)) else {
            return Ok(None);
        };
        let result = diff::compare(region.original(), attempt);
        tracing::debug!(%id, diff = %self.render_diff(&result), "overlay compared");
        self.controller.set_content(id, result.runs())?;
        Ok(Some(result))
    }

    /// Check the practice field against the text it held when masked. The
    /// field shows the original again afterwards.
    pub fn compare_field(&mut self) -> Option<DiffResult> {
        let result = self.field.compare()?;
        tracing::debug!(
            mismatches = result.mismatch_count(),
            diff = %self.render_diff(&result),
            "practice field compared"
        );
        Some(result)
    }

    /// Plain-text rendering of `result` with mismatches wrapped in the
    /// configured highlight markers.
    pub fn render_diff(&self, result: &DiffResult) -> String {
        result.render_marked(&self.settings.highlight_open, &self.settings.highlight_close)
    }

    /// Pin an overlay in place. Pinning twice is a no-op.
    pub fn pin(&mut self, id: OverlayId) -> Result<bool, OverlayError> {
        self.controller.detach(id, &mut self.registry)
    }

    /// Feed one host event to the overlays. A press on a pin control pins
    /// that overlay.
    pub fn handle(&mut self, event: InputEvent) -> PointerOutcome {
        let outcome = self.controller.handle(event);
        if let PointerOutcome::PinRequested(id) = outcome {
            if let Err(err) = self.pin(id) {
                tracing::warn!(error = %err, "pin request failed");
            }
        }
        outcome
    }

    /// Feed one frame's worth of host events. Returns whether the host must
    /// suppress its own pointer and scroll handling for this frame: an event
    /// moved, resized or zoomed an overlay, or a pointer session is still open.
    pub fn dispatch(&mut self, events: impl IntoIterator<Item = InputEvent>) -> bool {
        let mut captured = false;
        for event in events {
            captured |= self.handle(event).prevents_default();
        }
        captured || self.controller.active().is_some()
    }

    /// Drop every overlay and registry entry.
    pub fn reset(&mut self) {
        self.registry.reset();
        self.controller = OverlayController::from_settings(&self.settings);
    }

    fn refresh_overlay(&mut self, id: OverlayId) {
        let runs = self
            .controller
            .overlay(id)
            .and_then(|o| o.region())
            .and_then(|r| self.registry.region(r))
            .map(|region| region.runs());
        if let Some(runs) = runs {
            let _ = self.controller.set_content(id, runs);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Denied;

    impl ClipboardSource for Denied {
        fn read_text(&mut self) -> Result<String, ClipboardError> {
            Err(ClipboardError::PermissionDenied)
        }
    }

    #[test]
    fn denied_clipboard_creates_nothing() {
        let mut session = Session::new(Settings::default());
        assert_eq!(session.capture(&mut Denied, Point::default()), None);
        assert!(session.controller().is_empty());
        assert_eq!(session.registry().region_count(), 0);
    }

    #[test]
    fn capture_reveals_text_by_default() {
        let mut session = Session::new(Settings::default());
        let id = session.capture_text("hello", Point::default());
        assert_eq!(session.controller().overlay(id).unwrap().content_text(), "[hello]");
    }

    #[test]
    fn render_diff_uses_configured_markers() {
        let session = Session::new(Settings {
            highlight_open: "{".into(),
            highlight_close: "}".into(),
            ..Settings::default()
        });
        let result = diff::compare("hello", "hallo");
        assert_eq!(session.render_diff(&result), "h{a}llo");

        let defaults = Session::new(Settings::default());
        assert_eq!(defaults.render_diff(&result), "h<<a>>llo");
    }

    #[test]
    fn compare_field_reports_and_restores() {
        let mut session = Session::new(Settings::default());
        session.field_mut().set_value("abc");
        session.field_mut().mask();
        session.field_mut().set_value("abd");
        let result = session.compare_field().unwrap();
        assert_eq!(session.render_diff(&result), "ab<<d>>");
        assert_eq!(session.field().value(), "abc");
    }

    #[test]
    fn dispatch_captures_input_while_dragging() {
        use crate::overlay::{HitPart, Modifiers, PointerEvent};

        let mut session = Session::new(Settings::default());
        let id = session.capture_text("abc", Point::new(0.0, 0.0));
        let shift = Modifiers {
            shift: true,
            ..Modifiers::default()
        };
        let press = |modifiers| InputEvent::PointerDown {
            target: id,
            part: HitPart::Body,
            pointer: PointerEvent::at(5.0, 5.0).with_modifiers(modifiers),
        };

        assert!(!session.dispatch([press(Modifiers::default())]));
        assert!(session.dispatch([press(shift)]));
        // Still captured on a frame without movement while the button is held.
        assert!(session.dispatch([]));
        assert!(!session.dispatch([InputEvent::PointerUp]));
    }

    #[test]
    fn dispatch_captures_wheel_zoom_only_on_live_overlays() {
        let mut session = Session::new(Settings::default());
        let id = session.capture_text("abc", Point::default());
        let wheel = InputEvent::Wheel {
            target: id,
            delta_y: 1.0,
        };
        assert!(session.dispatch([wheel]));
        session.pin(id).unwrap();
        assert!(!session.dispatch([wheel]));
    }

    #[test]
    fn reset_drops_overlays_and_regions() {
        let mut session = Session::new(Settings::default());
        let id = session.capture_text("abc", Point::default());
        session.pin(id).unwrap();
        session.reset();
        assert!(session.controller().is_empty());
        assert!(session.registry().pinned().is_empty());
        assert_eq!(session.registry().region_count(), 0);
    }
}
