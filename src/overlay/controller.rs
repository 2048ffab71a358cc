use crate::content::TextRun;
use crate::masking::{OverlayRegistry, RegionId};
use crate::overlay::bindings::{EventHub, ListenerKind, OverlayBindings};
use crate::overlay::model::{
    HitPart, Modifiers, Overlay, OverlayId, Point, PointerEvent, PointerMode, Size,
};
use crate::overlay::scale::{self, ContentMeasure, MonospaceMetrics};
use crate::settings::{DragModifier, Settings};

/// Side of the square resize handle in the bottom-right corner.
pub const RESIZE_HANDLE_PX: f32 = 12.0;
/// Pin control in the top-right corner.
pub const PIN_BUTTON_SIZE: Size = Size::new(40.0, 18.0);

#[derive(Debug, Clone, PartialEq)]
pub enum OverlayError {
    UnknownOverlay(OverlayId),
}

impl std::fmt::Display for OverlayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OverlayError::UnknownOverlay(id) => write!(f, "unknown overlay {id}"),
        }
    }
}

impl std::error::Error for OverlayError {}

/// Interaction tuning taken from [`Settings`].
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionConfig {
    pub zoom_step: f32,
    pub min_scale: f32,
    pub default_size: Size,
    pub min_size: Size,
    pub drag_modifier: DragModifier,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

impl InteractionConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            zoom_step: settings.zoom_step,
            min_scale: settings.min_scale,
            default_size: Size::new(settings.default_width, settings.default_height),
            min_size: Size::new(settings.min_width, settings.min_height),
            drag_modifier: settings.drag_modifier,
        }
    }

    fn drag_modifier_held(&self, modifiers: Modifiers) -> bool {
        match self.drag_modifier {
            DragModifier::Shift => modifiers.shift,
            DragModifier::Ctrl => modifiers.ctrl,
            DragModifier::Alt => modifiers.alt,
        }
    }
}

/// Raw input delivered by the host window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerDown {
        target: OverlayId,
        part: HitPart,
        pointer: PointerEvent,
    },
    PointerMove(PointerEvent),
    PointerUp,
    Wheel {
        target: OverlayId,
        delta_y: f32,
    },
    WindowResize,
}

/// What an input event did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PointerOutcome {
    Ignored,
    SessionStarted(OverlayId),
    Moved(OverlayId),
    Resized(OverlayId),
    SessionEnded(OverlayId),
    Zoomed(OverlayId),
    Refitted(usize),
    /// The pin control was pressed; the caller decides whether to detach.
    PinRequested(OverlayId),
}

impl PointerOutcome {
    /// Whether the host's default drag/scroll handling must be suppressed.
    pub fn prevents_default(&self) -> bool {
        matches!(
            self,
            Self::SessionStarted(_) | Self::Moved(_) | Self::Resized(_) | Self::Zoomed(_)
        )
    }
}

struct Slot {
    overlay: Overlay,
    bindings: OverlayBindings,
}

/// Owns every overlay and drives its drag, resize, zoom and pin lifecycle.
pub struct OverlayController {
    config: InteractionConfig,
    measure: Box<dyn ContentMeasure>,
    slots: Vec<Slot>,
    hub: EventHub,
    active: Option<OverlayId>,
}

impl OverlayController {
    pub fn new(config: InteractionConfig, measure: Box<dyn ContentMeasure>) -> Self {
        Self {
            config,
            measure,
            slots: Vec::new(),
            hub: EventHub::new(),
            active: None,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            InteractionConfig::from_settings(settings),
            Box::new(MonospaceMetrics {
                char_width: settings.char_width,
                line_height: settings.line_height,
            }),
        )
    }

    pub fn config(&self) -> &InteractionConfig {
        &self.config
    }

    pub fn hub(&self) -> &EventHub {
        &self.hub
    }

    /// Overlay currently owning the pointer session, if any.
    pub fn active(&self) -> Option<OverlayId> {
        self.active
    }

    pub fn overlay(&self, id: OverlayId) -> Option<&Overlay> {
        self.slots.get(id.0).map(|s| &s.overlay)
    }

    pub fn overlays(&self) -> impl Iterator<Item = &Overlay> {
        self.slots.iter().map(|s| &s.overlay)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Allocate an interactive overlay at `position` with the default size and
    /// unit scale.
    pub fn create(&mut self, position: Point) -> OverlayId {
        let id = OverlayId(self.slots.len());
        let bindings = self.hub.bind_overlay(id);
        self.slots.push(Slot {
            overlay: Overlay {
                id,
                position,
                size: self.config.default_size,
                scale: 1.0,
                content_scale: 1.0,
                pinned: false,
                pin_control: true,
                session: PointerMode::Idle,
                region: None,
                content: Vec::new(),
            },
            bindings,
        });
        tracing::debug!(%id, x = position.x, y = position.y, "overlay created");
        id
    }

    /// Attach the masked region shown by this overlay.
    pub fn attach_region(&mut self, id: OverlayId, region: RegionId) -> Result<(), OverlayError> {
        self.slot_mut(id)?.overlay.region = Some(region);
        Ok(())
    }

    /// Replace the displayed runs and re-fit them to the overlay box.
    pub fn set_content(&mut self, id: OverlayId, runs: Vec<TextRun>) -> Result<(), OverlayError> {
        self.slot_mut(id)?.overlay.content = runs;
        self.refit(id);
        Ok(())
    }

    /// Begin dragging when the configured modifier is held. Returns whether a
    /// drag started.
    pub fn start_drag(&mut self, id: OverlayId, pointer: PointerEvent) -> Result<bool, OverlayError> {
        let held = self.config.drag_modifier_held(pointer.modifiers);
        let overlay = &self.slot(id)?.overlay;
        if overlay.pinned || !held {
            return Ok(false);
        }
        let offset = pointer.position - overlay.position;
        self.begin_session(id, PointerMode::Dragging { offset });
        Ok(true)
    }

    pub fn start_resize(&mut self, id: OverlayId, _pointer: PointerEvent) -> Result<bool, OverlayError> {
        if self.slot(id)?.overlay.pinned {
            return Ok(false);
        }
        self.begin_session(id, PointerMode::Resizing);
        Ok(true)
    }

    /// Window-level pointer move. Only the overlay that owns the active session
    /// and still listens on the move channel reacts.
    pub fn on_pointer_move(&mut self, pointer: PointerEvent) -> PointerOutcome {
        let Some(id) = self.active else {
            return PointerOutcome::Ignored;
        };
        if !self.hub.is_bound(id, ListenerKind::WindowPointerMove) {
            return PointerOutcome::Ignored;
        }
        let min_size = self.config.min_size;
        let Some(slot) = self.slots.get_mut(id.0) else {
            return PointerOutcome::Ignored;
        };
        let overlay = &mut slot.overlay;
        let mode = overlay.session;
        match mode {
            PointerMode::Idle => PointerOutcome::Ignored,
            PointerMode::Dragging { offset } => {
                overlay.position = pointer.position - offset;
                PointerOutcome::Moved(id)
            }
            PointerMode::Resizing => {
                let extent = pointer.position - overlay.position;
                overlay.size = Size::new(
                    extent.x.max(min_size.width),
                    extent.y.max(min_size.height),
                );
                self.refit(id);
                PointerOutcome::Resized(id)
            }
        }
    }

    /// Pointer release returns every listening overlay to `Idle`.
    pub fn end_pointer_session(&mut self) -> PointerOutcome {
        for id in self.hub.listeners_for(ListenerKind::WindowPointerUp) {
            if let Some(slot) = self.slots.get_mut(id.0) {
                slot.overlay.session = PointerMode::Idle;
            }
        }
        match self.active.take() {
            Some(id) => {
                tracing::debug!(%id, "pointer session ended");
                PointerOutcome::SessionEnded(id)
            }
            None => PointerOutcome::Ignored,
        }
    }

    /// Step the zoom by one notch. Positive deltas (scrolling down) zoom out,
    /// negative ones zoom in; the scale never drops below the floor.
    pub fn zoom(&mut self, id: OverlayId, wheel_delta: f32) -> Result<bool, OverlayError> {
        let step = self.config.zoom_step;
        let floor = self.config.min_scale;
        let slot = self.slot_mut(id)?;
        if slot.overlay.pinned || wheel_delta == 0.0 || wheel_delta.is_nan() {
            return Ok(false);
        }
        let change = if wheel_delta > 0.0 { -step } else { step };
        let wanted = slot.overlay.scale + change;
        if wanted < floor {
            tracing::debug!(%id, wanted, floor, "zoom clamped to floor");
        }
        slot.overlay.scale = wanted.max(floor);
        self.refit(id);
        Ok(true)
    }

    /// Ambient window resize: re-fit every overlay still listening for it.
    pub fn window_resized(&mut self) -> usize {
        let ids = self.hub.listeners_for(ListenerKind::WindowResize);
        for id in &ids {
            self.refit(*id);
        }
        ids.len()
    }

    /// Permanently freeze an overlay. Its listeners are unbound, the pin
    /// control is removed and it is recorded in `registry`. Detaching an overlay
    /// that is already pinned does nothing and returns `Ok(false)`.
    pub fn detach(&mut self, id: OverlayId, registry: &mut OverlayRegistry) -> Result<bool, OverlayError> {
        let slot = self.slots.get_mut(id.0).ok_or(OverlayError::UnknownOverlay(id))?;
        if slot.overlay.pinned {
            return Ok(false);
        }
        let removed = self.hub.unbind_overlay(&mut slot.bindings);
        slot.overlay.pin_control = false;
        slot.overlay.pinned = true;
        slot.overlay.session = PointerMode::Idle;
        if self.active == Some(id) {
            self.active = None;
        }
        registry.pin(id);
        tracing::debug!(%id, removed, "overlay pinned");
        Ok(true)
    }

    /// Route one host event through the bound listeners.
    pub fn handle(&mut self, event: InputEvent) -> PointerOutcome {
        match event {
            InputEvent::PointerDown {
                target,
                part,
                pointer,
            } => self.pointer_down(target, part, pointer),
            InputEvent::PointerMove(pointer) => self.on_pointer_move(pointer),
            InputEvent::PointerUp => self.end_pointer_session(),
            InputEvent::Wheel { target, delta_y } => {
                if !self.hub.is_bound(target, ListenerKind::Wheel) {
                    return PointerOutcome::Ignored;
                }
                match self.zoom(target, delta_y) {
                    Ok(true) => PointerOutcome::Zoomed(target),
                    _ => PointerOutcome::Ignored,
                }
            }
            InputEvent::WindowResize => PointerOutcome::Refitted(self.window_resized()),
        }
    }

    /// Topmost overlay part under `point`. Later overlays are drawn above
    /// earlier ones.
    pub fn hit_test(&self, point: Point) -> Option<(OverlayId, HitPart)> {
        self.slots.iter().rev().find_map(|slot| {
            let overlay = &slot.overlay;
            let (origin, size) = overlay.screen_rect();
            let local = point - origin;
            if local.x < 0.0 || local.y < 0.0 || local.x > size.width || local.y > size.height {
                return None;
            }
            let part = if overlay.pin_control
                && local.x >= size.width - PIN_BUTTON_SIZE.width
                && local.y <= PIN_BUTTON_SIZE.height
            {
                HitPart::PinButton
            } else if local.x >= size.width - RESIZE_HANDLE_PX
                && local.y >= size.height - RESIZE_HANDLE_PX
            {
                HitPart::ResizeHandle
            } else {
                HitPart::Body
            };
            Some((overlay.id, part))
        })
    }

    fn pointer_down(&mut self, target: OverlayId, part: HitPart, pointer: PointerEvent) -> PointerOutcome {
        let started = match part {
            HitPart::Body if self.hub.is_bound(target, ListenerKind::PointerDown) => {
                self.start_drag(target, pointer)
            }
            HitPart::ResizeHandle if self.hub.is_bound(target, ListenerKind::ResizeDown) => {
                self.start_resize(target, pointer)
            }
            HitPart::PinButton => {
                return match self.overlay(target) {
                    Some(o) if o.pin_control => PointerOutcome::PinRequested(target),
                    _ => PointerOutcome::Ignored,
                };
            }
            _ => Ok(false),
        };
        match started {
            Ok(true) => PointerOutcome::SessionStarted(target),
            _ => PointerOutcome::Ignored,
        }
    }

    fn begin_session(&mut self, id: OverlayId, mode: PointerMode) {
        if let Some(previous) = self.active.filter(|p| *p != id) {
            if let Some(slot) = self.slots.get_mut(previous.0) {
                slot.overlay.session = PointerMode::Idle;
            }
            tracing::debug!(%previous, next = %id, "pointer session handed over");
        }
        if let Some(slot) = self.slots.get_mut(id.0) {
            slot.overlay.session = mode;
            self.active = Some(id);
            tracing::debug!(%id, ?mode, "pointer session started");
        }
    }

    fn refit(&mut self, id: OverlayId) {
        let Some(slot) = self.slots.get_mut(id.0) else {
            return;
        };
        let overlay = &mut slot.overlay;
        let (content_w, content_h) = self.measure.measure(&overlay.content_text());
        overlay.content_scale = scale::fit(
            overlay.size.width,
            overlay.size.height,
            content_w,
            content_h,
        );
    }

    fn slot(&self, id: OverlayId) -> Result<&Slot, OverlayError> {
        self.slots.get(id.0).ok_or(OverlayError::UnknownOverlay(id))
    }

    fn slot_mut(&mut self, id: OverlayId) -> Result<&mut Slot, OverlayError> {
        self.slots.get_mut(id.0).ok_or(OverlayError::UnknownOverlay(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHIFT: Modifiers = Modifiers {
        shift: true,
        ctrl: false,
        alt: false,
    };

    fn controller() -> OverlayController {
        OverlayController::from_settings(&Settings::default())
    }

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn create_uses_default_size_and_unit_scale() {
        let mut c = controller();
        let id = c.create(Point::new(10.0, 20.0));
        let o = c.overlay(id).unwrap();
        assert_eq!(o.position(), Point::new(10.0, 20.0));
        assert_eq!(o.size(), Size::new(320.0, 200.0));
        assert_eq!(o.scale(), 1.0);
        assert!(!o.is_pinned());
        assert!(o.has_pin_control());
        assert_eq!(o.session(), PointerMode::Idle);
    }

    #[test]
    fn drag_requires_modifier() {
        let mut c = controller();
        let id = c.create(Point::new(0.0, 0.0));
        assert!(!c.start_drag(id, PointerEvent::at(5.0, 5.0)).unwrap());
        assert_eq!(c.overlay(id).unwrap().session(), PointerMode::Idle);
        assert_eq!(c.active(), None);
    }

    #[test]
    fn drag_moves_by_pointer_minus_offset() {
        let mut c = controller();
        let id = c.create(Point::new(100.0, 50.0));
        assert!(c
            .start_drag(id, PointerEvent::at(110.0, 60.0).with_modifiers(SHIFT))
            .unwrap());

        assert_eq!(c.on_pointer_move(PointerEvent::at(200.0, 300.0)), PointerOutcome::Moved(id));
        assert_eq!(c.overlay(id).unwrap().position(), Point::new(190.0, 290.0));

        assert_eq!(c.end_pointer_session(), PointerOutcome::SessionEnded(id));
        assert_eq!(c.overlay(id).unwrap().session(), PointerMode::Idle);
        assert_eq!(c.on_pointer_move(PointerEvent::at(0.0, 0.0)), PointerOutcome::Ignored);
        assert_eq!(c.overlay(id).unwrap().position(), Point::new(190.0, 290.0));
    }

    #[test]
    fn idle_move_is_a_no_op() {
        let mut c = controller();
        let id = c.create(Point::new(1.0, 2.0));
        assert_eq!(c.on_pointer_move(PointerEvent::at(50.0, 50.0)), PointerOutcome::Ignored);
        assert_eq!(c.overlay(id).unwrap().position(), Point::new(1.0, 2.0));
    }

    #[test]
    fn resize_tracks_pointer_and_refits() {
        let mut c = controller();
        let id = c.create(Point::new(0.0, 0.0));
        // "abcd" measures 32 x 16 with default metrics.
        c.set_content(id, vec![TextRun::plain("abcd")]).unwrap();
        assert!(c.start_resize(id, PointerEvent::at(320.0, 200.0)).unwrap());

        assert_eq!(c.on_pointer_move(PointerEvent::at(64.0, 64.0)), PointerOutcome::Resized(id));
        let o = c.overlay(id).unwrap();
        assert_eq!(o.size(), Size::new(64.0, 64.0));
        assert!(approx(o.content_scale(), 2.0));
    }

    #[test]
    fn resize_never_goes_below_minimum_box() {
        let mut c = controller();
        let id = c.create(Point::new(100.0, 100.0));
        c.start_resize(id, PointerEvent::default()).unwrap();
        c.on_pointer_move(PointerEvent::at(50.0, 110.0));
        assert_eq!(c.overlay(id).unwrap().size(), Size::new(24.0, 24.0));
    }

    #[test]
    fn zoom_direction_follows_delta_sign() {
        let mut c = controller();
        let id = c.create(Point::default());
        c.zoom(id, -1.0).unwrap();
        assert!(approx(c.overlay(id).unwrap().scale(), 1.1));
        c.zoom(id, 3.0).unwrap();
        c.zoom(id, 3.0).unwrap();
        assert!(approx(c.overlay(id).unwrap().scale(), 0.9));
        assert!(!c.zoom(id, 0.0).unwrap());
    }

    #[test]
    fn zoom_out_clamps_to_floor() {
        let mut c = controller();
        let id = c.create(Point::default());
        for _ in 0..20 {
            c.zoom(id, 1.0).unwrap();
        }
        assert!(approx(c.overlay(id).unwrap().scale(), 0.1));
        c.zoom(id, 1.0).unwrap();
        assert!(c.overlay(id).unwrap().scale() >= 0.1);
    }

    #[test]
    fn zoom_from_just_above_floor_clamps() {
        let mut c = controller();
        let id = c.create(Point::default());
        c.slots[id.0].overlay.scale = 0.15;
        c.zoom(id, 1.0).unwrap();
        assert!(approx(c.overlay(id).unwrap().scale(), 0.1));
    }

    #[test]
    fn detach_freezes_overlay() {
        let mut c = controller();
        let mut registry = OverlayRegistry::new();
        let id = c.create(Point::new(5.0, 5.0));
        c.start_drag(id, PointerEvent::at(6.0, 6.0).with_modifiers(SHIFT)).unwrap();

        assert!(c.detach(id, &mut registry).unwrap());
        assert_eq!(c.active(), None);
        assert_eq!(c.on_pointer_move(PointerEvent::at(300.0, 300.0)), PointerOutcome::Ignored);
        assert!(!c.zoom(id, -1.0).unwrap());
        assert!(!c.start_drag(id, PointerEvent::at(6.0, 6.0).with_modifiers(SHIFT)).unwrap());
        assert!(!c.start_resize(id, PointerEvent::default()).unwrap());

        let o = c.overlay(id).unwrap();
        assert_eq!(o.position(), Point::new(5.0, 5.0));
        assert_eq!(o.scale(), 1.0);
        assert!(o.is_pinned());
        assert!(!o.has_pin_control());
        assert_eq!(registry.pinned(), &[id]);
    }

    #[test]
    fn double_detach_is_a_guarded_no_op() {
        let mut c = controller();
        let mut registry = OverlayRegistry::new();
        let id = c.create(Point::default());
        assert!(c.detach(id, &mut registry).unwrap());
        assert!(!c.detach(id, &mut registry).unwrap());
        assert_eq!(registry.pinned().len(), 1);
    }

    #[test]
    fn detach_only_unbinds_that_overlay() {
        let mut c = controller();
        let mut registry = OverlayRegistry::new();
        let pinned = c.create(Point::default());
        let live = c.create(Point::new(400.0, 0.0));
        c.detach(pinned, &mut registry).unwrap();

        assert_eq!(c.hub().len(), ListenerKind::ALL.len());
        assert_eq!(c.window_resized(), 1);
        assert!(c
            .start_drag(live, PointerEvent::at(410.0, 10.0).with_modifiers(SHIFT))
            .unwrap());
        assert_eq!(c.on_pointer_move(PointerEvent::at(420.0, 20.0)), PointerOutcome::Moved(live));
    }

    #[test]
    fn unknown_overlay_is_an_error() {
        let mut c = controller();
        assert_eq!(
            c.zoom(OverlayId(9), 1.0),
            Err(OverlayError::UnknownOverlay(OverlayId(9)))
        );
    }

    #[test]
    fn second_overlay_does_not_inherit_session() {
        let mut c = controller();
        let a = c.create(Point::new(0.0, 0.0));
        let b = c.create(Point::new(500.0, 0.0));
        c.start_drag(a, PointerEvent::at(1.0, 1.0).with_modifiers(SHIFT)).unwrap();
        assert_eq!(c.overlay(b).unwrap().session(), PointerMode::Idle);

        c.start_resize(b, PointerEvent::default()).unwrap();
        assert_eq!(c.overlay(a).unwrap().session(), PointerMode::Idle);
        assert_eq!(c.overlay(b).unwrap().session(), PointerMode::Resizing);
        assert_eq!(c.active(), Some(b));
    }

    #[test]
    fn hit_test_finds_parts_topmost_first() {
        let mut c = controller();
        let below = c.create(Point::new(0.0, 0.0));
        let above = c.create(Point::new(100.0, 0.0));
        assert_eq!(c.hit_test(Point::new(150.0, 100.0)), Some((above, HitPart::Body)));
        assert_eq!(c.hit_test(Point::new(50.0, 100.0)), Some((below, HitPart::Body)));
        assert_eq!(
            c.hit_test(Point::new(415.0, 195.0)),
            Some((above, HitPart::ResizeHandle))
        );
        assert_eq!(
            c.hit_test(Point::new(410.0, 5.0)),
            Some((above, HitPart::PinButton))
        );
        assert_eq!(c.hit_test(Point::new(900.0, 900.0)), None);
    }

    #[test]
    fn handle_routes_wheel_only_while_bound() {
        let mut c = controller();
        let mut registry = OverlayRegistry::new();
        let id = c.create(Point::default());
        let outcome = c.handle(InputEvent::Wheel {
            target: id,
            delta_y: -1.0,
        });
        assert_eq!(outcome, PointerOutcome::Zoomed(id));
        assert!(outcome.prevents_default());

        c.detach(id, &mut registry).unwrap();
        assert_eq!(
            c.handle(InputEvent::Wheel {
                target: id,
                delta_y: -1.0
            }),
            PointerOutcome::Ignored
        );
    }

    #[test]
    fn pin_button_press_requests_pin() {
        let mut c = controller();
        let id = c.create(Point::default());
        let outcome = c.handle(InputEvent::PointerDown {
            target: id,
            part: HitPart::PinButton,
            pointer: PointerEvent::at(310.0, 5.0),
        });
        assert_eq!(outcome, PointerOutcome::PinRequested(id));
        assert!(!outcome.prevents_default());
    }
}
