use std::sync::OnceLock;

use glam::Vec3;

use super::fit::{fit_axis_through_points, project_onto_axis, StructureAxis};

/// Secondary-structure family of a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StructureKind {
    /// α/3₁₀/π helix.
    Helix,
    /// β strand.
    Sheet,
    /// Turn.
    Turn,
}

impl StructureKind {
    /// Whether this kind keeps its raw endpoint when adjacent to a sheet.
    fn is_helix_or_sheet(self) -> bool {
        matches!(self, Self::Helix | Self::Sheet)
    }
}

/// One contiguous secondary-structure segment of a polymer.
///
/// Built from the lead-atom positions of its residues plus the lead of the
/// residue on either side, when there is one. The axis is computed on
/// first use and cached for the life of the segment; rebuild the segment
/// to invalidate it.
#[derive(Debug, Clone)]
pub struct ProteinStructureSegment {
    kind: StructureKind,
    leads: Vec<Vec3>,
    lead_before: Option<Vec3>,
    lead_after: Option<Vec3>,
    kind_before: Option<StructureKind>,
    kind_after: Option<StructureKind>,
    /// First residue index within the owning polymer.
    first_residue: usize,
    axis: OnceLock<StructureAxis>,
}

impl ProteinStructureSegment {
    /// Isolated segment with no neighbors.
    #[must_use]
    pub fn new(kind: StructureKind, leads: Vec<Vec3>) -> Self {
        Self {
            kind,
            leads,
            lead_before: None,
            lead_after: None,
            kind_before: None,
            kind_after: None,
            first_residue: 0,
            axis: OnceLock::new(),
        }
    }

    /// Set the residue preceding the segment.
    #[must_use]
    pub fn with_before(
        mut self,
        lead: Vec3,
        kind: Option<StructureKind>,
    ) -> Self {
        self.lead_before = Some(lead);
        self.kind_before = kind;
        self.axis = OnceLock::new();
        self
    }

    /// Set the residue following the segment.
    #[must_use]
    pub fn with_after(mut self, lead: Vec3, kind: Option<StructureKind>) -> Self {
        self.lead_after = Some(lead);
        self.kind_after = kind;
        self.axis = OnceLock::new();
        self
    }

    /// Split a polymer into segments from per-residue assignments.
    ///
    /// Runs of equal `Some(kind)` become segments; `None` residues (coil)
    /// only serve as neighbors. `leads` and `kinds` are paired by index;
    /// extra entries in the longer slice are ignored.
    #[must_use]
    pub fn from_assignments(
        leads: &[Vec3],
        kinds: &[Option<StructureKind>],
    ) -> Vec<Self> {
        let n = leads.len().min(kinds.len());
        let mut segments = Vec::new();
        let mut i = 0;
        while i < n {
            let Some(kind) = kinds[i] else {
                i += 1;
                continue;
            };
            let start = i;
            while i < n && kinds[i] == Some(kind) {
                i += 1;
            }
            let mut segment = Self::new(kind, leads[start..i].to_vec());
            segment.first_residue = start;
            if start > 0 {
                segment = segment.with_before(leads[start - 1], kinds[start - 1]);
            }
            if i < n {
                segment = segment.with_after(leads[i], kinds[i]);
            }
            segments.push(segment);
        }
        segments
    }

    /// Structure family.
    #[must_use]
    pub fn kind(&self) -> StructureKind {
        self.kind
    }

    /// Number of residues in the segment.
    #[must_use]
    pub fn residue_count(&self) -> usize {
        self.leads.len()
    }

    /// Lead-atom positions of the segment's residues.
    #[must_use]
    pub fn leads(&self) -> &[Vec3] {
        &self.leads
    }

    /// Index of the first residue within the owning polymer.
    #[must_use]
    pub fn first_residue(&self) -> usize {
        self.first_residue
    }

    /// Midpoint between lead `i - 1` and lead `i`, for `i` in
    /// `0..=residue_count()`. Index 0 and `residue_count()` pair with the
    /// neighboring residues, falling back to the segment's own end leads.
    #[must_use]
    pub fn lead_midpoint(&self, i: usize) -> Vec3 {
        let n = self.leads.len();
        if n == 0 {
            return Vec3::ZERO;
        }
        if i == 0 {
            return self
                .lead_before
                .map_or(self.leads[0], |b| b.lerp(self.leads[0], 0.5));
        }
        if i >= n {
            return self
                .lead_after
                .map_or(self.leads[n - 1], |a| self.leads[n - 1].lerp(a, 0.5));
        }
        self.leads[i - 1].lerp(self.leads[i], 0.5)
    }

    /// The segment's axis, computed once and cached.
    #[must_use]
    pub fn axis(&self) -> &StructureAxis {
        self.axis.get_or_init(|| match self.kind {
            StructureKind::Helix => self.helix_axis(),
            StructureKind::Sheet => self.sheet_axis(),
            StructureKind::Turn => StructureAxis::between(
                self.lead_midpoint(0),
                self.lead_midpoint(self.leads.len()),
            ),
        })
    }

    /// Whether the axis has been computed.
    #[must_use]
    pub fn has_cached_axis(&self) -> bool {
        self.axis.get().is_some()
    }

    /// Line fit through all lead midpoints.
    fn helix_axis(&self) -> StructureAxis {
        let points: Vec<Vec3> = (0..=self.leads.len())
            .map(|i| self.lead_midpoint(i))
            .collect();
        fit_axis_through_points(&points)
    }

    /// Chord between the first and last interior midpoints, with each end
    /// re-projected onto it unless the neighbor there is itself a helix or
    /// sheet.
    fn sheet_axis(&self) -> StructureAxis {
        let n = self.leads.len();
        if n < 2 {
            return StructureAxis::between(
                self.lead_midpoint(0),
                self.lead_midpoint(n),
            );
        }
        let (a, b) = if n == 2 {
            (self.leads[0], self.leads[1])
        } else {
            (self.lead_midpoint(1), self.lead_midpoint(n - 1))
        };
        let direction = (b - a).normalize_or_zero();

        let keep_raw = |kind: Option<StructureKind>| {
            kind.is_some_and(StructureKind::is_helix_or_sheet)
        };
        let mut start = self.lead_midpoint(0);
        if !keep_raw(self.kind_before) {
            start = project_onto_axis(start, a, direction);
        }
        let mut end = self.lead_midpoint(n);
        if !keep_raw(self.kind_after) {
            end = project_onto_axis(end, a, direction);
        }
        StructureAxis {
            start,
            end,
            direction,
            iterations: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strand(n: usize) -> Vec<Vec3> {
        // Pleated strand along +x, alternating ±0.9 Å in y.
        (0..n)
            .map(|i| {
                let y = if i % 2 == 0 { 0.9 } else { -0.9 };
                Vec3::new(3.3 * i as f32, y, 0.0)
            })
            .collect()
    }

    #[test]
    fn sheet_axis_runs_along_the_strand() {
        let seg = ProteinStructureSegment::new(StructureKind::Sheet, strand(6));
        let axis = seg.axis();
        assert!(axis.direction.abs_diff_eq(Vec3::X, 1e-5));
        // Isolated ends are projected onto the chord (y = 0).
        assert!(axis.start.y.abs() < 1e-5);
        assert!(axis.end.y.abs() < 1e-5);
        assert!((axis.start.x - 0.0).abs() < 1e-5);
        assert!((axis.end.x - 16.5).abs() < 1e-5);
    }

    #[test]
    fn sheet_end_next_to_helix_is_not_projected() {
        let leads = strand(5);
        let seg = ProteinStructureSegment::new(StructureKind::Sheet, leads.clone())
            .with_after(Vec3::new(16.5, 3.0, 0.0), Some(StructureKind::Helix));
        let axis = seg.axis();
        let raw_end = leads[4].lerp(Vec3::new(16.5, 3.0, 0.0), 0.5);
        assert_eq!(axis.end, raw_end);
        assert!(axis.start.y.abs() < 1e-5);
    }

    #[test]
    fn two_residue_sheet_uses_raw_leads_for_direction() {
        let a = Vec3::new(0.0, 0.0, 0.0);
        let b = Vec3::new(0.0, 3.3, 0.0);
        let seg = ProteinStructureSegment::new(StructureKind::Sheet, vec![a, b]);
        let axis = seg.axis();
        assert!(axis.direction.abs_diff_eq(Vec3::Y, 1e-6));
        assert_eq!(axis.start, a);
        assert!(axis.end.abs_diff_eq(b, 1e-5));
    }

    #[test]
    fn helix_axis_is_memoized() {
        let leads: Vec<_> = (0..6)
            .map(|i| Vec3::new(0.0, 0.0, 1.5 * i as f32))
            .collect();
        let seg = ProteinStructureSegment::new(StructureKind::Helix, leads);
        assert!(!seg.has_cached_axis());
        let first = *seg.axis();
        assert!(seg.has_cached_axis());
        assert!(std::ptr::eq(seg.axis(), seg.axis()));
        assert_eq!(*seg.axis(), first);
        assert!(first.direction.abs_diff_eq(Vec3::Z, 1e-6));
    }

    #[test]
    fn three_residue_helix_fits_through_lead_midpoints() {
        let turn = |i: i32| {
            let t = (i as f32) * 100f32.to_radians();
            Vec3::new(2.3 * t.cos(), 2.3 * t.sin(), 1.5 * i as f32)
        };
        let (before, after) = (turn(-1), turn(3));
        let leads = vec![turn(0), turn(1), turn(2)];
        let seg = ProteinStructureSegment::new(StructureKind::Helix, leads.clone())
            .with_before(before, Some(StructureKind::Turn))
            .with_after(after, None);
        let axis = *seg.axis();

        let midpoints = [
            before.lerp(leads[0], 0.5),
            leads[0].lerp(leads[1], 0.5),
            leads[1].lerp(leads[2], 0.5),
            leads[2].lerp(after, 0.5),
        ];
        assert_eq!(axis, fit_axis_through_points(&midpoints));
        assert_ne!(axis.start, axis.end);
        assert!((axis.direction.length() - 1.0).abs() < 1e-5);
        assert!(axis.direction.dot(axis.end - axis.start) > 0.0);
        assert!(axis.iterations >= 1);
        assert!(axis.iterations <= super::super::fit::MAX_FIT_ITERATIONS);
    }

    #[test]
    fn assignments_split_into_runs_with_neighbors() {
        let leads = strand(8);
        let h = Some(StructureKind::Helix);
        let e = Some(StructureKind::Sheet);
        let kinds = [None, h, h, h, e, e, None, None];
        let segs = ProteinStructureSegment::from_assignments(&leads, &kinds);
        assert_eq!(segs.len(), 2);
        assert_eq!(segs[0].kind(), StructureKind::Helix);
        assert_eq!(segs[0].residue_count(), 3);
        assert_eq!(segs[0].first_residue(), 1);
        assert_eq!(segs[0].lead_midpoint(0), leads[0].lerp(leads[1], 0.5));
        assert_eq!(segs[1].first_residue(), 4);
        assert_eq!(segs[1].lead_midpoint(2), leads[5].lerp(leads[6], 0.5));
    }
}
