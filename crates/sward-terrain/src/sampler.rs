//! Ground height queries with a flat fallback

use crate::provider::TerrainProvider;

/// Lift applied to every sampled height so blade roots sit just above the
/// terrain surface instead of z-fighting with it.
pub const DEFAULT_CLEARANCE: f32 = 0.2;

/// Ground level assumed while no terrain data is available
pub const PLACEHOLDER_GROUND: f32 = 0.0;

/// Answers "how high is the ground here" for a terrain tile.
///
/// Wraps an optional borrowed height source. When the source is missing,
/// not ready, or returns nothing usable for a point, the sampler falls back
/// to flat ground at [`PLACEHOLDER_GROUND`]. Sampling never fails.
#[derive(Clone, Copy)]
pub struct HeightSampler<'a> {
    provider: Option<&'a dyn TerrainProvider>,
    clearance: f32,
}

impl<'a> HeightSampler<'a> {
    pub fn new(provider: Option<&'a dyn TerrainProvider>) -> Self {
        Self {
            provider,
            clearance: DEFAULT_CLEARANCE,
        }
    }

    /// Sampler with no terrain at all
    pub fn placeholder() -> Self {
        Self::new(None)
    }

    pub fn with_clearance(mut self, clearance: f32) -> Self {
        self.clearance = clearance;
        self
    }

    pub fn clearance(&self) -> f32 {
        self.clearance
    }

    /// True when every sample will come from the flat fallback
    pub fn is_placeholder(&self) -> bool {
        !self.provider.is_some_and(|p| p.is_ready())
    }

    /// Height returned on the fallback path
    pub fn placeholder_height(&self) -> f32 {
        PLACEHOLDER_GROUND + self.clearance
    }

    /// Ground height plus clearance at normalized tile coordinates
    pub fn height_at(&self, u: f32, v: f32) -> f32 {
        let ground = self
            .provider
            .and_then(|p| p.height_at(u, v))
            .filter(|h| h.is_finite())
            .unwrap_or(PLACEHOLDER_GROUND);
        ground + self.clearance
    }
}
