use crate::masking::region::MaskedRegion;
use crate::overlay::OverlayId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegionId(pub usize);

impl std::fmt::Display for RegionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "region#{}", self.0)
    }
}

/// Session-wide record of every masked region and every pinned overlay.
///
/// Created once at start-up and handed to the controller and masking engine.
/// Entries live until [`OverlayRegistry::reset`].
#[derive(Debug, Default)]
pub struct OverlayRegistry {
    regions: Vec<MaskedRegion>,
    pinned: Vec<OverlayId>,
}

impl OverlayRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_region(&mut self, region: MaskedRegion) -> RegionId {
        let id = RegionId(self.regions.len());
        self.regions.push(region);
        id
    }

    pub fn region(&self, id: RegionId) -> Option<&MaskedRegion> {
        self.regions.get(id.0)
    }

    pub(crate) fn region_mut(&mut self, id: RegionId) -> Option<&mut MaskedRegion> {
        self.regions.get_mut(id.0)
    }

    pub fn regions(&self) -> impl Iterator<Item = (RegionId, &MaskedRegion)> {
        self.regions.iter().enumerate().map(|(i, r)| (RegionId(i), r))
    }

    pub(crate) fn regions_mut(&mut self) -> impl Iterator<Item = (RegionId, &mut MaskedRegion)> {
        self.regions
            .iter_mut()
            .enumerate()
            .map(|(i, r)| (RegionId(i), r))
    }

    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    /// Record a pinned overlay. Returns `false` when it was already recorded.
    pub fn pin(&mut self, overlay: OverlayId) -> bool {
        if self.pinned.contains(&overlay) {
            return false;
        }
        self.pinned.push(overlay);
        true
    }

    pub fn pinned(&self) -> &[OverlayId] {
        &self.pinned
    }

    pub fn is_pinned(&self, overlay: OverlayId) -> bool {
        self.pinned.contains(&overlay)
    }

    pub fn reset(&mut self) {
        tracing::debug!(
            regions = self.regions.len(),
            pinned = self.pinned.len(),
            "registry reset"
        );
        self.regions.clear();
        self.pinned.clear();
    }
}
