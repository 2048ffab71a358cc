use crate::content::{plain_text, TextRun};
use crate::masking::RegionId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OverlayId(pub usize);

impl std::fmt::Display for OverlayId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "overlay#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl std::ops::Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

/// A pointer sample in window coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerEvent {
    pub position: Point,
    pub modifiers: Modifiers,
}

impl PointerEvent {
    pub fn at(x: f32, y: f32) -> Self {
        Self {
            position: Point::new(x, y),
            modifiers: Modifiers::default(),
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

/// What a pointer session on one overlay is currently doing.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PointerMode {
    #[default]
    Idle,
    /// `offset` is the pointer position relative to the overlay's top-left
    /// corner at the moment the drag began.
    Dragging { offset: Point },
    Resizing,
}

/// Part of an overlay under the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitPart {
    Body,
    ResizeHandle,
    PinButton,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    pub(crate) id: OverlayId,
    pub(crate) position: Point,
    pub(crate) size: Size,
    pub(crate) scale: f32,
    pub(crate) content_scale: f32,
    pub(crate) pinned: bool,
    pub(crate) pin_control: bool,
    pub(crate) session: PointerMode,
    pub(crate) region: Option<RegionId>,
    pub(crate) content: Vec<TextRun>,
}

impl Overlay {
    pub fn id(&self) -> OverlayId {
        self.id
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn size(&self) -> Size {
        self.size
    }

    /// Zoom factor applied to the whole overlay.
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Factor applied to the text so it fits the overlay box.
    pub fn content_scale(&self) -> f32 {
        self.content_scale
    }

    pub fn is_pinned(&self) -> bool {
        self.pinned
    }

    /// Whether the pin control is still shown.
    pub fn has_pin_control(&self) -> bool {
        self.pin_control
    }

    pub fn session(&self) -> PointerMode {
        self.session
    }

    pub fn region(&self) -> Option<RegionId> {
        self.region
    }

    pub fn content(&self) -> &[TextRun] {
        &self.content
    }

    pub fn content_text(&self) -> String {
        plain_text(&self.content)
    }

    /// Footprint of the overlay after zoom, anchored at its top-left corner.
    pub fn screen_rect(&self) -> (Point, Size) {
        (
            self.position,
            Size::new(self.size.width * self.scale, self.size.height * self.scale),
        )
    }
}
