use std::fmt;

/// Draw layer; shapes render layer by layer so later layers blend over
/// earlier ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RenderLayer {
    /// Solid geometry.
    Opaque,
    /// Blended/stippled overlays.
    Screened,
    /// Text overlays.
    Text,
}

impl RenderLayer {
    /// Every layer in draw order.
    pub const ALL: [Self; 3] = [Self::Opaque, Self::Screened, Self::Text];
}

/// Kind tag of a shape slot. Declaration order is render priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ShapeKind {
    /// Atom spheres.
    Balls,
    /// Bond cylinders.
    Sticks,
    /// Secondary-structure cartoon.
    Cartoon,
    /// Ad hoc decorative primitives.
    Primitives,
    /// Selection halos.
    Halos,
    /// Click markers.
    ClickMarkers,
    /// Atom labels.
    Labels,
}

impl ShapeKind {
    /// Every kind in render priority order.
    pub const ALL: [Self; 7] = [
        Self::Balls,
        Self::Sticks,
        Self::Cartoon,
        Self::Primitives,
        Self::Halos,
        Self::ClickMarkers,
        Self::Labels,
    ];

    /// Number of kinds.
    pub const COUNT: usize = Self::ALL.len();

    /// Slot index.
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Layer this kind draws in.
    #[must_use]
    pub fn layer(self) -> RenderLayer {
        match self {
            Self::Balls | Self::Sticks | Self::Cartoon | Self::Primitives => {
                RenderLayer::Opaque
            }
            Self::Halos | Self::ClickMarkers => RenderLayer::Screened,
            Self::Labels => RenderLayer::Text,
        }
    }

    /// Lowercase name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Balls => "balls",
            Self::Sticks => "sticks",
            Self::Cartoon => "cartoon",
            Self::Primitives => "primitives",
            Self::Halos => "halos",
            Self::ClickMarkers => "click_markers",
            Self::Labels => "labels",
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A populated shape slot: display flags for one kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shape {
    kind: ShapeKind,
    /// Whether the shape draws at all.
    pub visible: bool,
    /// Draw with translucent colors.
    pub translucent: bool,
}

impl Shape {
    /// Visible, opaque slot of `kind`.
    #[must_use]
    pub fn new(kind: ShapeKind) -> Self {
        Self {
            kind,
            visible: true,
            translucent: false,
        }
    }

    /// Kind tag.
    #[must_use]
    pub fn kind(&self) -> ShapeKind {
        self.kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_order_never_goes_back_a_layer() {
        let layers: Vec<_> = ShapeKind::ALL.iter().map(|k| k.layer()).collect();
        assert!(layers.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(layers.first(), Some(&RenderLayer::Opaque));
        assert_eq!(layers.last(), Some(&RenderLayer::Text));
        assert!(RenderLayer::ALL.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn index_matches_declaration_order() {
        for (i, kind) in ShapeKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
        assert_eq!(ShapeKind::ClickMarkers.to_string(), "click_markers");
    }
}
