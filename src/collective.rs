//! Merging per-rank sizings for a collective write.
//!
//! When a mesh is distributed, each rank sizes and populates its own piece.
//! A collective writer needs the global array lengths and the position at
//! which each rank's piece starts; both follow from the per-rank sizings
//! alone.

use crate::error::ConfigMismatch;
use crate::sizing::{ContentType, Sizing, SlotType};
use crate::Error;

impl Sizing {
    /// Sum the sizings of all ranks. Every rank must have been sized with the
    /// same decompose flag; the face split of the first rank is kept.
    pub fn reduce(ranks: &[Sizing]) -> Result<Sizing, Error> {
        let Some(first) = ranks.first() else {
            return Ok(Sizing::default());
        };

        if ranks.iter().any(|r| r.decompose != first.decompose) {
            return Err(ConfigMismatch::RankDecompose.into());
        }

        let total = ranks.iter().fold(
            Sizing {
                decompose: first.decompose,
                face_split: first.face_split,
                ..Default::default()
            },
            |mut acc, r| {
                acc.n_cells += r.n_cells;
                acc.n_points += r.n_points;
                acc.n_vert_labels += r.n_vert_labels;
                acc.n_face_labels += r.n_face_labels;
                acc.n_cells_poly += r.n_cells_poly;
                acc.n_vert_poly += r.n_vert_poly;
                acc.n_add_cells += r.n_add_cells;
                acc.n_add_points += r.n_add_points;
                acc.n_add_verts += r.n_add_verts;
                acc
            },
        );

        log::debug!("reduced {} rank sizings to {} cells", ranks.len(), total.n_field_cells());
        Ok(total)
    }
}

/// Start of each rank's entries in the global `slot` array, followed by the
/// global length.
///
/// `INTERNAL_V2` cell offsets carry one trailing total per rank, which only
/// the last rank contributes to the global array.
///
/// Face offsets hold one entry per output cell as soon as any rank has a
/// face-stream. A rank without polyhedra then has no face offsets of its own
/// and fills its range with `-1`. The other ranks shift their non-negative
/// entries by the start of their `FACES` range.
pub fn rank_offsets(ranks: &[Sizing], content: ContentType, slot: SlotType) -> Vec<usize> {
    let trailing = usize::from(content == ContentType::Internal2 && slot == SlotType::CellsOffsets);
    let face_offsets = slot == SlotType::FacesOffsets
        && !content.layout().inline_face_stream
        && ranks.iter().any(|r| r.n_face_labels > 0);

    let mut offsets = Vec::with_capacity(ranks.len() + 1);
    let mut total = 0;
    offsets.push(total);
    for rank in ranks {
        total += if face_offsets {
            rank.n_field_cells()
        } else {
            rank.size_of(content, slot) - trailing
        };
        offsets.push(total);
    }
    if let Some(last) = offsets.last_mut() {
        if !ranks.is_empty() {
            *last += trailing;
        }
    }
    offsets
}
