//! # Polyhedral decomposition
//!
//! A polyhedron is split into one primitive per face piece, all sharing a
//! synthetic apex point placed at the cell centre. Each face is first split
//! into triangles and quads according to a [`FaceSplit`] policy; every
//! triangle becomes a tetrahedron and every quad a pyramid.
//!
//! Faces are stored once, pointing out of their owner. The base of every VTK
//! tet and pyramid must have its normal pointing at the apex, i.e. into the
//! cell, so pieces of faces the cell owns are emitted with reversed winding
//! and pieces of faces it neighbours are emitted as stored:
//!
//! | piece      | owner                    | neighbour                |
//! |------------|--------------------------|--------------------------|
//! | `a b c`    | tet `a c b apex`         | tet `a b c apex`         |
//! | `a b c d`  | pyramid `a d c b apex`   | pyramid `a b c d apex`   |

use crate::cell_type::VtkCellType;
use crate::error::{InvalidMesh, MalformedFace};
use crate::mesh::VolumeMesh;
use crate::Error;

/// How polygonal faces are split before decomposition
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FaceSplit {
    /// Triangles and quads are kept, larger polygons are fanned into
    /// triangles from their first vertex.
    Fan,
    /// Polygons are fanned into quads from their first vertex, with one
    /// triangle left over for an odd number of vertices.
    #[default]
    TrianglesQuads,
}

/// A piece of a split face, in face-local winding
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FacePiece {
    Tri([usize; 3]),
    Quad([usize; 4]),
}

impl FaceSplit {
    /// Number of `(triangles, quads)` a face of `n` points splits into
    pub fn count(self, n: usize) -> (usize, usize) {
        match (self, n) {
            (_, 0..=2) => (0, 0),
            (_, 3) => (1, 0),
            (_, 4) => (0, 1),
            (FaceSplit::Fan, n) => (n - 2, 0),
            (FaceSplit::TrianglesQuads, n) if n % 2 == 0 => (0, (n - 2) / 2),
            (FaceSplit::TrianglesQuads, n) => (1, (n - 3) / 2),
        }
    }

    /// Split `face` into pieces, calling `f` for each in order.
    pub fn split<F: FnMut(FacePiece)>(self, face: &[usize], mut f: F) {
        let n = face.len();
        match (self, n) {
            (_, 0..=2) => {}
            (_, 3) => f(FacePiece::Tri([face[0], face[1], face[2]])),
            (_, 4) => f(FacePiece::Quad([face[0], face[1], face[2], face[3]])),
            (FaceSplit::Fan, _) => {
                for i in 1..n - 1 {
                    f(FacePiece::Tri([face[0], face[i], face[i + 1]]));
                }
            }
            (FaceSplit::TrianglesQuads, _) => {
                let mut i = 1;
                while i + 2 < n {
                    f(FacePiece::Quad([face[0], face[i], face[i + 1], face[i + 2]]));
                    i += 2;
                }
                if i + 1 < n {
                    f(FacePiece::Tri([face[0], face[i], face[i + 1]]));
                }
            }
        }
    }
}

/// A primitive produced by decomposing a polyhedron
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubCell {
    Tet([usize; 4]),
    Pyr([usize; 5]),
}

impl SubCell {
    pub fn vtk_type(&self) -> VtkCellType {
        match self {
            SubCell::Tet(_) => VtkCellType::Tetra,
            SubCell::Pyr(_) => VtkCellType::Pyramid,
        }
    }

    /// vertices in VTK order, the apex last
    pub fn points(&self) -> &[usize] {
        match self {
            SubCell::Tet(p) => p,
            SubCell::Pyr(p) => p,
        }
    }

    fn from_piece(piece: FacePiece, is_owner: bool, apex: usize) -> Self {
        match (piece, is_owner) {
            (FacePiece::Tri([a, b, c]), true) => SubCell::Tet([a, c, b, apex]),
            (FacePiece::Tri([a, b, c]), false) => SubCell::Tet([a, b, c, apex]),
            (FacePiece::Quad([a, b, c, d]), true) => SubCell::Pyr([a, d, c, b, apex]),
            (FacePiece::Quad([a, b, c, d]), false) => SubCell::Pyr([a, b, c, d, apex]),
        }
    }
}

/// Summary of what decomposing one cell produces
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DecompCount {
    pub n_tets: usize,
    pub n_pyrs: usize,
    /// vertex count of the first sub-cell, which keeps the original cell slot
    pub first_verts: usize,
}

impl DecompCount {
    pub fn n_sub_cells(&self) -> usize {
        self.n_tets + self.n_pyrs
    }

    pub fn n_verts(&self) -> usize {
        4 * self.n_tets + 5 * self.n_pyrs
    }
}

/// Count the sub-cells of cell `celli` without producing them
pub fn count_sub_cells<M: VolumeMesh + ?Sized>(
    mesh: &M,
    celli: usize,
    split: FaceSplit,
) -> Result<DecompCount, Error> {
    let mut count = DecompCount::default();

    for &facei in mesh.cell_faces(celli) {
        let n = checked_face(mesh, facei)?.len();
        let (tris, quads) = split.count(n);
        if count.first_verts == 0 {
            // both policies emit quads before triangles
            count.first_verts = if quads > 0 { 5 } else { 4 };
        }
        count.n_tets += tris;
        count.n_pyrs += quads;
    }

    if count.n_sub_cells() == 0 {
        return Err(InvalidMesh::EmptyCell(celli).into());
    }

    Ok(count)
}

/// Decompose cell `celli` into tets and pyramids around the point `apex`.
///
/// Sub-cells come out face by face in the cell's face order, and within a
/// face in the order the split policy produces its pieces. The result only
/// depends on the mesh connectivity, never on point positions.
pub fn decompose_cell<M: VolumeMesh + ?Sized>(
    mesh: &M,
    celli: usize,
    apex: usize,
    split: FaceSplit,
) -> Result<Vec<SubCell>, Error> {
    let mut sub_cells = Vec::new();
    for_each_sub_cell(mesh, celli, apex, split, |sub| sub_cells.push(sub))?;

    if sub_cells.is_empty() {
        return Err(InvalidMesh::EmptyCell(celli).into());
    }

    Ok(sub_cells)
}

/// Visit the sub-cells of `celli` in the order [`decompose_cell`] returns them
pub fn for_each_sub_cell<M, F>(
    mesh: &M,
    celli: usize,
    apex: usize,
    split: FaceSplit,
    mut f: F,
) -> Result<(), Error>
where
    M: VolumeMesh + ?Sized,
    F: FnMut(SubCell),
{
    for &facei in mesh.cell_faces(celli) {
        let face = checked_face(mesh, facei)?;
        let is_owner = mesh.face_owner(facei) == celli;

        split.split(face, |piece| f(SubCell::from_piece(piece, is_owner, apex)));
    }

    Ok(())
}

pub(crate) fn checked_face<M: VolumeMesh + ?Sized>(
    mesh: &M,
    facei: usize,
) -> Result<&[usize], Error> {
    let face = mesh.face_points(facei);
    if face.len() < 3 {
        return Err(MalformedFace::new(facei, face.len()).into());
    }
    Ok(face)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pieces(split: FaceSplit, face: &[usize]) -> Vec<FacePiece> {
        let mut out = Vec::new();
        split.split(face, |p| out.push(p));
        out
    }

    #[test]
    fn split_counts_agree_with_pieces() {
        for split in [FaceSplit::Fan, FaceSplit::TrianglesQuads] {
            for n in 3..12 {
                let face: Vec<usize> = (0..n).collect();
                let out = pieces(split, &face);
                let tris = out.iter().filter(|p| matches!(p, FacePiece::Tri(_))).count();
                let quads = out.len() - tris;
                assert_eq!(split.count(n), (tris, quads), "{split:?} n={n}");
            }
        }
    }

    #[test]
    fn pieces_cover_the_face() {
        // every vertex of the face is used by some piece
        let face = [10, 11, 12, 13, 14, 15, 16];
        for split in [FaceSplit::Fan, FaceSplit::TrianglesQuads] {
            let out = pieces(split, &face);
            for v in face {
                assert!(out.iter().any(|p| match p {
                    FacePiece::Tri(t) => t.contains(&v),
                    FacePiece::Quad(q) => q.contains(&v),
                }));
            }
        }
    }

    #[test]
    fn hexagon_split() {
        let face = [0, 1, 2, 3, 4, 5];
        assert_eq!(
            pieces(FaceSplit::TrianglesQuads, &face),
            vec![FacePiece::Quad([0, 1, 2, 3]), FacePiece::Quad([0, 3, 4, 5])]
        );
        assert_eq!(
            pieces(FaceSplit::Fan, &face),
            vec![
                FacePiece::Tri([0, 1, 2]),
                FacePiece::Tri([0, 2, 3]),
                FacePiece::Tri([0, 3, 4]),
                FacePiece::Tri([0, 4, 5]),
            ]
        );
    }

    #[test]
    fn pentagon_split_leaves_one_triangle() {
        assert_eq!(
            pieces(FaceSplit::TrianglesQuads, &[0, 1, 2, 3, 4]),
            vec![FacePiece::Quad([0, 1, 2, 3]), FacePiece::Tri([0, 3, 4])]
        );
    }

    #[test]
    fn winding_flips_for_owner() {
        let tri = FacePiece::Tri([1, 2, 3]);
        assert_eq!(SubCell::from_piece(tri, true, 9), SubCell::Tet([1, 3, 2, 9]));
        assert_eq!(SubCell::from_piece(tri, false, 9), SubCell::Tet([1, 2, 3, 9]));

        let quad = FacePiece::Quad([1, 2, 3, 4]);
        assert_eq!(SubCell::from_piece(quad, true, 9), SubCell::Pyr([1, 4, 3, 2, 9]));
        assert_eq!(SubCell::from_piece(quad, false, 9), SubCell::Pyr([1, 2, 3, 4, 9]));
    }
}
