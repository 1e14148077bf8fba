//! Read-only geometry for drawing the field.
//!
//! Each cell becomes one line segment from its lattice anchor `(i, j, k)` to
//! `anchor + vector * scale_view`, plus one point marker at the anchor. Anchors are in
//! lattice units, not world units.

use crate::lattice::LatticeField;
use glam::Vec3;
use serde::{Deserialize, Serialize};

pub const DEFAULT_VIEW_SCALE: f32 = 0.1;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FieldGlyph {
    pub anchor: Vec3,
    pub tip: Vec3,
}

fn anchor_of(coords: [usize; 3]) -> Vec3 {
    Vec3::new(coords[0] as f32, coords[1] as f32, coords[2] as f32)
}

impl LatticeField {
    /// Point markers, one per cell in linear-index order.
    pub fn anchors(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.iter().map(|(coords, _)| anchor_of(coords))
    }

    /// Line segments, one per cell in linear-index order.
    pub fn glyphs(&self, scale_view: f32) -> impl Iterator<Item = FieldGlyph> + '_ {
        self.iter().map(move |(coords, cell)| {
            let anchor = anchor_of(coords);
            FieldGlyph {
                anchor,
                tip: anchor + cell.vector * scale_view,
            }
        })
    }
}
