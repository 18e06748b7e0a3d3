//! Attribute selection and construction options

use bitflags::bitflags;

bitflags! {
    /// Selectable attribute bundles.
    ///
    /// The engine enforces dependencies between bundles at dispatch time
    /// (see [`AttributeSet::resolved`]); callers only name what they want.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct AttributeSet: u32 {
        /// Subtree pixel counts.
        const AREA = 1;
        /// Area derivatives along the parent chain.
        const AREA_DERIVATIVES = 1 << 1;
        /// Level contrast below each node.
        const CONTRAST = 1 << 2;
        /// Subtree volumes.
        const VOLUME = 1 << 3;
        /// Mean gradient over saved contour pixels.
        const BORDER_GRADIENT = 1 << 4;
        /// Contour length, complexity and compactness.
        const COMPLEXITY = 1 << 5;
        /// Axis-aligned bounding boxes.
        const BOUNDING_BOX = 1 << 6;
        /// Descendant counts.
        const SUB_NODES = 1 << 7;
        /// Ring statistics and separability score.
        const OTSU = 1 << 8;
    }
}

impl AttributeSet {
    /// The bundle the plain constructors compute.
    pub fn standard() -> Self {
        AttributeSet::AREA
            | AttributeSet::CONTRAST
            | AttributeSet::VOLUME
            | AttributeSet::COMPLEXITY
            | AttributeSet::BOUNDING_BOX
            | AttributeSet::SUB_NODES
    }

    /// The bundle the Δ-parameterized constructor computes.
    pub fn stability() -> Self {
        AttributeSet::AREA
            | AttributeSet::AREA_DERIVATIVES
            | AttributeSet::CONTRAST
            | AttributeSet::VOLUME
    }

    /// Close the set over its dependencies: derivatives, volume, the shape
    /// scores and the separability score are all defined over areas.
    pub fn resolved(self) -> Self {
        let mut set = self;
        if set.intersects(
            AttributeSet::OTSU
                | AttributeSet::AREA_DERIVATIVES
                | AttributeSet::VOLUME
                | AttributeSet::COMPLEXITY,
        ) {
            set |= AttributeSet::AREA;
        }
        set
    }
}

/// Construction options.
///
/// `delta` is the MSER stability step; `ring_radius` is the Euclidean-ball
/// radius of the neighborhood-ring statistics and defaults to `delta`.
/// They are separate knobs because the two uses only coincide by
/// convention.
#[derive(Debug, Clone)]
pub struct TreeOptions {
    /// Attribute bundles to compute.
    pub attributes: AttributeSet,
    /// MSER stability step.
    pub delta: u32,
    /// Ring radius override for OTSU; `None` means `delta`.
    pub ring_radius: Option<u32>,
}

impl Default for TreeOptions {
    fn default() -> Self {
        TreeOptions {
            attributes: AttributeSet::standard(),
            delta: 1,
            ring_radius: None,
        }
    }
}

impl TreeOptions {
    /// Default bundle, no stability analysis.
    pub fn new() -> Self {
        TreeOptions::default()
    }

    /// Select the attribute bundles.
    pub fn with_attributes(mut self, attributes: AttributeSet) -> Self {
        self.attributes = attributes;
        self
    }

    /// Set the MSER stability step.
    pub fn with_delta(mut self, delta: u32) -> Self {
        self.delta = delta;
        self
    }

    /// Decouple the ring radius from `delta`.
    pub fn with_ring_radius(mut self, radius: u32) -> Self {
        self.ring_radius = Some(radius);
        self
    }

    /// Effective ring radius.
    pub fn ring_radius(&self) -> u32 {
        self.ring_radius.unwrap_or(self.delta)
    }
}

/// Reconstruction policy: how inactive descendants are repainted from
/// their nearest active ancestor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Prune: an inactive subtree collapses to its nearest active
    /// ancestor's level.
    Min,
    /// Shift up: each inactive-bounded leaf promotes the first active
    /// ancestor, which paints its whole subtree at its own level.
    Max,
    /// Active nodes paint themselves; chains of inactive descendants take
    /// the level of the active node above them.
    Direct,
}
