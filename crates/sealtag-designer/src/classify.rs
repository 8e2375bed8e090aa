//! Outer/hole classification and hole ownership.

use tracing::trace;

use crate::contour::Contour;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContourRole {
    Outer,
    /// `outer` indexes the owning outer in the same classified list
    Hole { outer: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedContour {
    pub contour: Contour,
    pub area: f64,
    pub role: ContourRole,
}

impl ClassifiedContour {
    pub fn is_outer(&self) -> bool {
        self.role == ContourRole::Outer
    }
}

/// An outer boundary with the holes it owns
#[derive(Debug, Clone)]
pub struct Region<'a> {
    pub outer: &'a Contour,
    pub holes: Vec<&'a Contour>,
}

/// Classifies contours by signed area and pairs every hole with the first
/// outer containing the hole's first vertex.
///
/// Outers come first in the result, in input order, followed by the holes
/// that found an owner. Holes with no owner are dropped.
pub fn classify_contours(contours: Vec<Contour>) -> Vec<ClassifiedContour> {
    let (outers, holes): (Vec<_>, Vec<_>) = contours
        .into_iter()
        .map(|contour| {
            let area = contour.signed_area();
            (contour, area)
        })
        .partition(|(_, area)| *area > 0.0);

    let mut out: Vec<ClassifiedContour> = outers
        .into_iter()
        .map(|(contour, area)| ClassifiedContour {
            contour,
            area,
            role: ContourRole::Outer,
        })
        .collect();
    let outer_count = out.len();

    for (contour, area) in holes {
        let probe = contour.first();
        let owner = (0..outer_count).find(|&i| out[i].contour.contains(&probe));
        match owner {
            Some(outer) => out.push(ClassifiedContour {
                contour,
                area,
                role: ContourRole::Hole { outer },
            }),
            None => trace!("dropping orphan hole at {}", probe),
        }
    }
    out
}

/// Groups a classified list into regions, one per outer, in outer order
pub fn regions(classified: &[ClassifiedContour]) -> Vec<Region<'_>> {
    let mut regions: Vec<Region<'_>> = Vec::new();
    let mut slot = vec![usize::MAX; classified.len()];
    for (i, c) in classified.iter().enumerate() {
        if c.is_outer() {
            slot[i] = regions.len();
            regions.push(Region {
                outer: &c.contour,
                holes: Vec::new(),
            });
        }
    }
    for c in classified {
        if let ContourRole::Hole { outer } = c.role {
            if let Some(region) = slot.get(outer).and_then(|&s| regions.get_mut(s)) {
                region.holes.push(&c.contour);
            }
        }
    }
    regions
}
