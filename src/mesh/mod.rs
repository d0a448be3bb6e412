//! # Volume mesh input
//!
//! The transcription engine only ever reads a mesh through the [`VolumeMesh`]
//! trait: cells as lists of faces, faces as ordered point lists stored once with
//! an owner cell, and a cell centre used for the synthetic apex of decomposed
//! polyhedra. Each face is oriented so that its right hand normal points out of
//! its owner cell; the neighbour sees the same face reversed.
//!
//! [`PolyMesh`] is an in-memory implementation of the trait, and
//! [`subset`] extracts a renumbered sub-mesh from any implementation.

mod poly_mesh;
pub mod subset;

pub use poly_mesh::PolyMesh;

use crate::model::{self, ModelDef};
use std::borrow::Cow;

/// point coordinates
pub type Point = [f64; 3];

/// A cell's declared model together with its vertices in that model's order
#[derive(Debug, Clone, PartialEq)]
pub struct CellShape {
    pub model: &'static ModelDef,
    pub points: Vec<usize>,
}

impl CellShape {
    pub fn new(model: &'static ModelDef, points: Vec<usize>) -> Self {
        Self { model, points }
    }

    /// a shape that matches no reference model
    pub fn unknown() -> Self {
        Self {
            model: &model::UNKNOWN,
            points: Vec::new(),
        }
    }
}

/// Read-only access to an unstructured volume mesh
pub trait VolumeMesh {
    fn n_points(&self) -> usize;

    fn n_cells(&self) -> usize;

    fn n_faces(&self) -> usize;

    /// faces bounding cell `celli`
    fn cell_faces(&self, celli: usize) -> &[usize];

    /// ordered points of face `facei`, oriented out of its owner
    fn face_points(&self, facei: usize) -> &[usize];

    /// the cell that owns face `facei`
    fn face_owner(&self, facei: usize) -> usize;

    fn point(&self, pointi: usize) -> Point;

    /// Shape of the cell. The default implementation runs the topological
    /// matcher on every call; implementations should cache the result.
    fn cell_shape(&self, celli: usize) -> Cow<'_, CellShape> {
        Cow::Owned(model::matcher::match_cell(self, celli))
    }

    /// centre of cell `celli`, used as the apex of decomposed polyhedra
    fn cell_centre(&self, celli: usize) -> Point;

    /// Revision counter for the mesh connectivity. Only changes in connectivity
    /// bump it, point motion leaves it untouched.
    fn topology_revision(&self) -> u64 {
        0
    }
}

impl<T: VolumeMesh + ?Sized> VolumeMesh for &T {
    fn n_points(&self) -> usize {
        (**self).n_points()
    }

    fn n_cells(&self) -> usize {
        (**self).n_cells()
    }

    fn n_faces(&self) -> usize {
        (**self).n_faces()
    }

    fn cell_faces(&self, celli: usize) -> &[usize] {
        (**self).cell_faces(celli)
    }

    fn face_points(&self, facei: usize) -> &[usize] {
        (**self).face_points(facei)
    }

    fn face_owner(&self, facei: usize) -> usize {
        (**self).face_owner(facei)
    }

    fn point(&self, pointi: usize) -> Point {
        (**self).point(pointi)
    }

    fn cell_shape(&self, celli: usize) -> Cow<'_, CellShape> {
        (**self).cell_shape(celli)
    }

    fn cell_centre(&self, celli: usize) -> Point {
        (**self).cell_centre(celli)
    }

    fn topology_revision(&self) -> u64 {
        (**self).topology_revision()
    }
}
