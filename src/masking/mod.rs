//! Masked regions, the practice field and the registry that tracks regions
//! and pinned overlays for the whole session.

pub mod field;
pub mod region;
pub mod registry;

pub use field::{mask_all, PracticeField};
pub use region::{MaskedRegion, MaskingEngine, Payload, SubstitutionReport};
pub use registry::{OverlayRegistry, RegionId};
