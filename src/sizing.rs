//! # Sizing
//!
//! A [`Sizing`] is computed in a single pass over the mesh cells before any
//! output array exists. It records geometric facts only (how many vertex
//! labels, face-stream entries and decomposition products the mesh needs), so
//! the same value serves every [`ContentType`]; [`Sizing::size_of`] turns it
//! into the exact array length each content type needs for each [`SlotType`].
//!
//! The four content types lay out the same cells differently:
//!
//! | content     | `CELLS`                         | `CELLS_OFFSETS`          | `FACES` / `FACES_OFFSETS` |
//! |-------------|---------------------------------|--------------------------|---------------------------|
//! | `legacy`    | size-prefixed, polyhedra inline | none                     | none                      |
//! | `xml`       | bare vertex labels              | end offsets              | face-stream, end offsets  |
//! | `internal1` | size-prefixed vertex labels     | begin offsets (prefixed) | face-stream, begin offsets|
//! | `internal2` | bare vertex labels              | begin offsets + total    | face-stream, begin offsets|

use crate::decompose::{self, FaceSplit};
use crate::error::ConfigMismatch;
use crate::mesh::VolumeMesh;
use crate::model::{classify, CellModel};
use crate::Error;

use hashbrown::HashSet;
use std::fmt;
use std::str::FromStr;

/// Physical array layout targeted by population
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ContentType {
    /// legacy `.vtk` files: `[n, v0 .. vn]` per cell, polyhedra as
    /// `[len, nFaces, (n, v0 .. vn) ..]`
    Legacy,
    /// XML `.vtu` files: bare connectivity with end offsets
    #[default]
    Xml,
    /// in-memory grid with size-prefixed connectivity and begin offsets
    Internal1,
    /// in-memory grid with bare connectivity and `n + 1` offsets
    Internal2,
}

/// The storage slots a content type may fill
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SlotType {
    Cells,
    CellsOffsets,
    Faces,
    FacesOffsets,
}

/// How the `CELLS_OFFSETS` slot is interpreted
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OffsetKind {
    /// no offsets slot
    Absent,
    /// offset of the entry after each cell
    End,
    /// offset of each cell's first entry (its size prefix when prefixed)
    Begin,
    /// begin offsets followed by one trailing grand total
    BeginTotal,
}

/// Per-content description of the array layout
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Layout {
    /// every cell in `CELLS` is preceded by its number of entries
    pub prefixed: bool,
    /// polyhedron face-streams live in `CELLS` instead of `FACES`
    pub inline_face_stream: bool,
    pub offsets: OffsetKind,
    /// face offsets are end offsets rather than begin offsets
    pub face_end_offsets: bool,
}

impl ContentType {
    pub fn layout(self) -> Layout {
        match self {
            ContentType::Legacy => Layout {
                prefixed: true,
                inline_face_stream: true,
                offsets: OffsetKind::Absent,
                face_end_offsets: false,
            },
            ContentType::Xml => Layout {
                prefixed: false,
                inline_face_stream: false,
                offsets: OffsetKind::End,
                face_end_offsets: true,
            },
            ContentType::Internal1 => Layout {
                prefixed: true,
                inline_face_stream: false,
                offsets: OffsetKind::Begin,
                face_end_offsets: false,
            },
            ContentType::Internal2 => Layout {
                prefixed: false,
                inline_face_stream: false,
                offsets: OffsetKind::BeginTotal,
                face_end_offsets: false,
            },
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ContentType::Legacy => "legacy",
            ContentType::Xml => "xml",
            ContentType::Internal1 => "internal1",
            ContentType::Internal2 => "internal2",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "legacy" => Ok(ContentType::Legacy),
            "xml" => Ok(ContentType::Xml),
            "internal1" => Ok(ContentType::Internal1),
            "internal2" => Ok(ContentType::Internal2),
            _ => Err(ConfigMismatch::ContentName(s.to_string()).into()),
        }
    }
}

impl fmt::Display for SlotType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SlotType::Cells => "CELLS",
            SlotType::CellsOffsets => "CELLS_OFFSETS",
            SlotType::Faces => "FACES",
            SlotType::FacesOffsets => "FACES_OFFSETS",
        };
        f.write_str(name)
    }
}

/// Exact output sizes for one mesh and decompose setting.
///
/// The vertices of the first sub-cell of a decomposed polyhedron keep the
/// original cell slot and are counted in `n_vert_labels`; the remaining
/// sub-cells are the additional cells, and their vertices are `n_add_verts`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Sizing {
    pub(crate) decompose: bool,
    pub(crate) face_split: FaceSplit,
    pub(crate) n_cells: usize,
    pub(crate) n_points: usize,
    pub(crate) n_vert_labels: usize,
    pub(crate) n_face_labels: usize,
    pub(crate) n_cells_poly: usize,
    pub(crate) n_vert_poly: usize,
    pub(crate) n_add_cells: usize,
    pub(crate) n_add_points: usize,
    pub(crate) n_add_verts: usize,
}

impl Sizing {
    /// Walk the mesh once and count everything the output arrays need.
    ///
    /// Fails on the first face with fewer than three points that the walk
    /// has to read.
    pub fn compute<M: VolumeMesh + ?Sized>(
        mesh: &M,
        decompose: bool,
        face_split: FaceSplit,
    ) -> Result<Self, Error> {
        let mut sizing = Sizing {
            decompose,
            face_split,
            n_cells: mesh.n_cells(),
            n_points: mesh.n_points(),
            ..Default::default()
        };

        let mut unique = HashSet::new();

        for celli in 0..mesh.n_cells() {
            let shape = mesh.cell_shape(celli);
            let model = classify(&shape);

            match model {
                CellModel::Tet | CellModel::Pyr | CellModel::Prism | CellModel::Hex => {
                    sizing.n_vert_labels += shape.points.len();
                }
                CellModel::Wedge if decompose => {
                    // squeezed hex
                    sizing.n_vert_labels += 8;
                }
                CellModel::TetWedge if decompose => {
                    // squeezed prism
                    sizing.n_vert_labels += 6;
                }
                _ if decompose => {
                    let count = decompose::count_sub_cells(mesh, celli, face_split)?;

                    sizing.n_vert_labels += count.first_verts;
                    sizing.n_add_verts += count.n_verts() - count.first_verts;
                    sizing.n_add_cells += count.n_sub_cells() - 1;
                    sizing.n_add_points += 1;
                }
                _ => {
                    unique.clear();
                    let mut n_stream = 1;
                    for &facei in mesh.cell_faces(celli) {
                        let face = decompose::checked_face(mesh, facei)?;
                        n_stream += 1 + face.len();
                        unique.extend(face.iter().copied());
                    }

                    sizing.n_cells_poly += 1;
                    sizing.n_face_labels += n_stream;
                    sizing.n_vert_poly += unique.len();
                }
            }
        }

        log::debug!(
            "sized {} cells ({} polyhedra kept, {} cells / {} points added), decompose={}",
            sizing.n_cells,
            sizing.n_cells_poly,
            sizing.n_add_cells,
            sizing.n_add_points,
            decompose
        );

        Ok(sizing)
    }

    pub fn decompose(&self) -> bool {
        self.decompose
    }

    pub fn face_split(&self) -> FaceSplit {
        self.face_split
    }

    pub fn n_cells(&self) -> usize {
        self.n_cells
    }

    pub fn n_points(&self) -> usize {
        self.n_points
    }

    /// vertex labels of all cells in original slots, except kept polyhedra
    pub fn n_vert_labels(&self) -> usize {
        self.n_vert_labels
    }

    /// face-stream entries of the kept polyhedra
    pub fn n_face_labels(&self) -> usize {
        self.n_face_labels
    }

    pub fn n_cells_poly(&self) -> usize {
        self.n_cells_poly
    }

    /// unique vertices summed over the kept polyhedra
    pub fn n_vert_poly(&self) -> usize {
        self.n_vert_poly
    }

    pub fn n_add_cells(&self) -> usize {
        self.n_add_cells
    }

    pub fn n_add_points(&self) -> usize {
        self.n_add_points
    }

    pub fn n_add_verts(&self) -> usize {
        self.n_add_verts
    }

    pub fn n_field_cells(&self) -> usize {
        self.n_cells + self.n_add_cells
    }

    pub fn n_field_points(&self) -> usize {
        self.n_points + self.n_add_points
    }

    /// Required length of `slot` for `content`.
    pub fn size_of(&self, content: ContentType, slot: SlotType) -> usize {
        let layout = content.layout();
        match slot {
            SlotType::Cells => self.regular_len(content) + self.overflow_len(content),
            SlotType::CellsOffsets => match layout.offsets {
                OffsetKind::Absent => 0,
                OffsetKind::End | OffsetKind::Begin => self.n_field_cells(),
                OffsetKind::BeginTotal => self.n_field_cells() + 1,
            },
            SlotType::Faces if layout.inline_face_stream => 0,
            SlotType::Faces => self.n_face_labels,
            SlotType::FacesOffsets if layout.inline_face_stream || self.n_face_labels == 0 => 0,
            SlotType::FacesOffsets => self.n_field_cells(),
        }
    }

    /// `CELLS` entries used by the cells in original slots
    pub(crate) fn regular_len(&self, content: ContentType) -> usize {
        let layout = content.layout();
        let polys = if layout.inline_face_stream {
            // a leading block length ahead of each face-stream
            self.n_face_labels + self.n_cells_poly
        } else {
            self.n_vert_poly + if layout.prefixed { self.n_cells_poly } else { 0 }
        };
        let prefixes = if layout.prefixed {
            self.n_cells - self.n_cells_poly
        } else {
            0
        };
        self.n_vert_labels + polys + prefixes
    }

    /// `CELLS` entries used by the additional cells appended after all others
    pub(crate) fn overflow_len(&self, content: ContentType) -> usize {
        let prefixes = if content.layout().prefixed {
            self.n_add_cells
        } else {
            0
        };
        self.n_add_verts + prefixes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_names_round_trip() {
        for content in [
            ContentType::Legacy,
            ContentType::Xml,
            ContentType::Internal1,
            ContentType::Internal2,
        ] {
            assert_eq!(content.to_string().parse::<ContentType>().unwrap(), content);
        }
        assert!("vtkhdf".parse::<ContentType>().is_err());
    }

    #[test]
    fn slot_sizes_for_mixed_counts() {
        let sizing = Sizing {
            decompose: false,
            n_cells: 3,
            n_points: 20,
            n_vert_labels: 14, // hex + prism
            n_face_labels: 31,
            n_cells_poly: 1,
            n_vert_poly: 10,
            ..Default::default()
        };

        use SlotType::*;
        assert_eq!(sizing.size_of(ContentType::Legacy, Cells), 14 + 2 + 31 + 1);
        assert_eq!(sizing.size_of(ContentType::Legacy, CellsOffsets), 0);
        assert_eq!(sizing.size_of(ContentType::Legacy, Faces), 0);
        assert_eq!(sizing.size_of(ContentType::Legacy, FacesOffsets), 0);

        assert_eq!(sizing.size_of(ContentType::Xml, Cells), 24);
        assert_eq!(sizing.size_of(ContentType::Xml, CellsOffsets), 3);
        assert_eq!(sizing.size_of(ContentType::Xml, Faces), 31);
        assert_eq!(sizing.size_of(ContentType::Xml, FacesOffsets), 3);

        assert_eq!(sizing.size_of(ContentType::Internal1, Cells), 27);
        assert_eq!(sizing.size_of(ContentType::Internal1, CellsOffsets), 3);

        assert_eq!(sizing.size_of(ContentType::Internal2, Cells), 24);
        assert_eq!(sizing.size_of(ContentType::Internal2, CellsOffsets), 4);
        assert_eq!(sizing.size_of(ContentType::Internal2, FacesOffsets), 3);
    }

    #[test]
    fn no_face_offsets_without_polyhedra() {
        let sizing = Sizing {
            n_cells: 2,
            n_vert_labels: 16,
            ..Default::default()
        };
        assert_eq!(sizing.size_of(ContentType::Xml, SlotType::FacesOffsets), 0);
        assert_eq!(sizing.size_of(ContentType::Internal1, SlotType::Faces), 0);
    }
}
