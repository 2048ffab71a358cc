//! Floating overlays: geometry, pointer sessions, listener bindings and the
//! controller that ties them together.

pub mod bindings;
pub mod controller;
pub mod model;
pub mod scale;

pub use controller::{
    InputEvent, InteractionConfig, OverlayController, OverlayError, PointerOutcome,
    PIN_BUTTON_SIZE, RESIZE_HANDLE_PX,
};
pub use model::{HitPart, Modifiers, Overlay, OverlayId, Point, PointerEvent, PointerMode, Size};
