//! Color handles and the per-viewer palette they index.

use rustc_hash::FxHashMap;

use crate::scene::ShapeKind;
use crate::structure::StructureKind;

/// High bit marks a translucent variant of a palette entry.
const TRANSLUCENT_BIT: u16 = 0x8000;

/// Alpha applied to translucent handles.
const TRANSLUCENT_ALPHA: u8 = 128;

/// Handle to a palette color, with a translucency flag.
///
/// Handles are only meaningful together with the [`Palette`] that issued
/// them; the built-in constants are valid in every palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Colix(u16);

/// RGBA of the built-in handles, by index.
const BUILTIN: [[u8; 4]; 12] = [
    [0, 0, 0, 255],       // black
    [255, 255, 255, 255], // white
    [255, 0, 0, 255],     // red
    [0, 255, 0, 255],     // green
    [0, 0, 255, 255],     // blue
    [255, 255, 0, 255],   // yellow
    [255, 0, 255, 255],   // magenta
    [0, 255, 255, 255],   // cyan
    [255, 165, 0, 255],   // orange
    [128, 128, 128, 255], // gray
    [255, 215, 0, 255],   // gold
    [255, 200, 200, 255], // pink
];

impl Colix {
    /// Black.
    pub const BLACK: Self = Self(0);
    /// White.
    pub const WHITE: Self = Self(1);
    /// Red.
    pub const RED: Self = Self(2);
    /// Green.
    pub const GREEN: Self = Self(3);
    /// Blue.
    pub const BLUE: Self = Self(4);
    /// Yellow.
    pub const YELLOW: Self = Self(5);
    /// Magenta.
    pub const MAGENTA: Self = Self(6);
    /// Cyan.
    pub const CYAN: Self = Self(7);
    /// Orange.
    pub const ORANGE: Self = Self(8);
    /// Gray.
    pub const GRAY: Self = Self(9);
    /// Gold.
    pub const GOLD: Self = Self(10);
    /// Pink.
    pub const PINK: Self = Self(11);

    /// Translucent variant of this handle.
    #[must_use]
    pub fn translucent(self) -> Self {
        Self(self.0 | TRANSLUCENT_BIT)
    }

    /// Opaque variant of this handle.
    #[must_use]
    pub fn opaque(self) -> Self {
        Self(self.0 & !TRANSLUCENT_BIT)
    }

    /// Translucent when `translucent` is set, otherwise unchanged.
    #[must_use]
    pub fn with_translucency(self, translucent: bool) -> Self {
        if translucent {
            self.translucent()
        } else {
            self
        }
    }

    /// Whether the translucency flag is set.
    #[must_use]
    pub fn is_translucent(self) -> bool {
        self.0 & TRANSLUCENT_BIT != 0
    }

    /// Palette index.
    #[must_use]
    pub fn index(self) -> usize {
        usize::from(self.0 & !TRANSLUCENT_BIT)
    }
}

/// Color table owned by one viewer and passed to renderers through the
/// render context.
#[derive(Debug, Clone)]
pub struct Palette {
    colors: Vec<[u8; 4]>,
    lookup: FxHashMap<[u8; 4], u16>,
}

impl Default for Palette {
    fn default() -> Self {
        Self::new()
    }
}

impl Palette {
    /// Palette holding the built-in colors.
    #[must_use]
    pub fn new() -> Self {
        let mut palette = Self {
            colors: Vec::with_capacity(BUILTIN.len()),
            lookup: FxHashMap::default(),
        };
        for rgba in BUILTIN {
            let _ = palette.intern(rgba);
        }
        palette
    }

    /// Handle for an RGBA color, adding it on first use. Once the handle
    /// space is exhausted new colors map to gray.
    pub fn intern(&mut self, rgba: [u8; 4]) -> Colix {
        if let Some(&i) = self.lookup.get(&rgba) {
            return Colix(i);
        }
        let i = u16::try_from(self.colors.len()).unwrap_or(u16::MAX);
        if i >= TRANSLUCENT_BIT {
            log::warn!("palette full; {rgba:?} mapped to gray");
            return Colix::GRAY;
        }
        self.colors.push(rgba);
        let _ = self.lookup.insert(rgba, i);
        Colix(i)
    }

    /// Handle for an RGB triple in `0.0..=1.0`.
    pub fn intern_rgb(&mut self, rgb: [f32; 3]) -> Colix {
        let to_u8 = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        self.intern([to_u8(rgb[0]), to_u8(rgb[1]), to_u8(rgb[2]), 255])
    }

    /// RGBA for a handle; translucent handles get reduced alpha. Unknown
    /// handles resolve to gray.
    #[must_use]
    pub fn rgba(&self, colix: Colix) -> [u8; 4] {
        let mut rgba = self
            .colors
            .get(colix.index())
            .copied()
            .unwrap_or(BUILTIN[Colix::GRAY.index()]);
        if colix.is_translucent() {
            rgba[3] = rgba[3].min(TRANSLUCENT_ALPHA);
        }
        rgba
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Whether the palette is empty (never true after `new`).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Cartoon color for a structure family.
    #[must_use]
    pub fn structure_colix(&self, kind: StructureKind) -> Colix {
        match kind {
            StructureKind::Helix => Colix::MAGENTA,
            StructureKind::Sheet => Colix::YELLOW,
            StructureKind::Turn => Colix::PINK,
        }
    }

    /// Default overlay color for a screened shape.
    #[must_use]
    pub fn overlay_colix(&self, kind: ShapeKind) -> Colix {
        match kind {
            ShapeKind::Halos => Colix::GOLD,
            ShapeKind::ClickMarkers => Colix::CYAN,
            _ => Colix::WHITE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_resolve_in_a_fresh_palette() {
        let p = Palette::new();
        assert_eq!(p.len(), BUILTIN.len());
        assert_eq!(p.rgba(Colix::RED), [255, 0, 0, 255]);
        assert_eq!(p.rgba(Colix::GOLD), [255, 215, 0, 255]);
    }

    #[test]
    fn interning_is_stable() {
        let mut p = Palette::new();
        let a = p.intern([10, 20, 30, 255]);
        let b = p.intern([10, 20, 30, 255]);
        assert_eq!(a, b);
        assert_eq!(p.intern([255, 0, 0, 255]), Colix::RED);
        assert_eq!(p.intern_rgb([1.0, 1.0, 1.0]), Colix::WHITE);
    }

    #[test]
    fn translucency_round_trips() {
        let p = Palette::new();
        let t = Colix::BLUE.translucent();
        assert!(t.is_translucent());
        assert_eq!(t.opaque(), Colix::BLUE);
        assert_eq!(t.index(), Colix::BLUE.index());
        assert_eq!(p.rgba(t)[3], TRANSLUCENT_ALPHA);
    }
}
