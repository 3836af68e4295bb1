use glam::Vec3;

use crate::primitive::Bounds;
use crate::renderer::Colix;
use crate::structure::ProteinStructureSegment;

/// One atom of a displayed frame, in world coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// World position (Å).
    pub position: Vec3,
    /// Display radius (Å).
    pub radius: f32,
    /// Color handle.
    pub colix: Colix,
    /// Selected atoms get a halo.
    pub selected: bool,
    /// Optional label text, already formatted.
    pub label: Option<String>,
}

impl Atom {
    /// Unselected, unlabeled atom.
    #[must_use]
    pub fn new(position: Vec3, radius: f32, colix: Colix) -> Self {
        Self {
            position,
            radius,
            colix,
            selected: false,
            label: None,
        }
    }

    /// Set the label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set the selection flag.
    #[must_use]
    pub fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }
}

/// Bond between two atoms of the same frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bond {
    /// First atom index.
    pub a: usize,
    /// Second atom index.
    pub b: usize,
    /// Cylinder radius (Å).
    pub radius: f32,
    /// Whole-bond color; `None` splits the bond between the atom colors.
    pub colix: Option<Colix>,
}

impl Bond {
    /// Bond colored by its atoms.
    #[must_use]
    pub fn new(a: usize, b: usize, radius: f32) -> Self {
        Self {
            a,
            b,
            radius,
            colix: None,
        }
    }
}

/// Atoms, bonds, and structure segments of one model frame.
#[derive(Debug, Clone, Default)]
pub struct Frame {
    /// Atoms with precomputed world coordinates.
    pub atoms: Vec<Atom>,
    /// Bonds indexing into `atoms`.
    pub bonds: Vec<Bond>,
    /// Secondary-structure segments.
    pub structures: Vec<ProteinStructureSegment>,
}

impl Frame {
    /// Frame from atoms and bonds, without structure.
    #[must_use]
    pub fn new(atoms: Vec<Atom>, bonds: Vec<Bond>) -> Self {
        Self {
            atoms,
            bonds,
            structures: Vec::new(),
        }
    }

    /// Attach structure segments.
    #[must_use]
    pub fn with_structures(
        mut self,
        structures: Vec<ProteinStructureSegment>,
    ) -> Self {
        self.structures = structures;
        self
    }

    /// Extents of all atom spheres.
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        self.atoms.iter().fold(Bounds::EMPTY, |b, a| {
            b.union(&Bounds::from_sphere(a.position, a.radius))
        })
    }

    /// Farthest atom-sphere surface from `center` (0 for no atoms).
    #[must_use]
    pub fn rotation_radius(&self, center: Vec3) -> f32 {
        self.atoms
            .iter()
            .map(|a| a.position.distance(center) + a.radius.abs())
            .fold(0.0, f32::max)
    }

    /// Bonds whose atom indices are both valid.
    pub fn valid_bonds(&self) -> impl Iterator<Item = &Bond> {
        let n = self.atoms.len();
        self.bonds.iter().filter(move |b| b.a < n && b.b < n)
    }
}
