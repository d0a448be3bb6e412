//! # Cell models
//!
//! Every cell of a volume mesh either matches one of a handful of fixed-topology
//! reference models or is treated as a generic polyhedron. The reference models
//! are `static` values and a [`CellShape`](crate::CellShape) points at one of
//! them, so classification is a pointer comparison rather than a geometric test.
//!
//! Reference faces are listed with outward normals (right hand rule), and the
//! vertex numbering follows the usual finite volume convention:
//!
//! ```text
//!        7-------6
//!       /|      /|
//!      4-------5 |        hex: (0,1,2,3) is the base, its normal points at (4,5,6,7)
//!      | 3-----|-2
//!      |/      |/
//!      0-------1
//! ```
//!
//! `wedge` is a hex with the edge `2-3` collapsed (7 points) and `tetWedge`
//! a prism with the edge `3-4` collapsed (5 points).

pub mod matcher;

use crate::mesh::CellShape;

/// A fixed-topology reference cell
#[derive(Debug, PartialEq, Eq)]
pub struct ModelDef {
    pub name: &'static str,
    pub n_points: usize,
    /// outward oriented faces in local vertex numbering
    pub faces: &'static [&'static [usize]],
}

impl ModelDef {
    pub fn n_faces(&self) -> usize {
        self.faces.len()
    }
}

pub static HEX: ModelDef = ModelDef {
    name: "hex",
    n_points: 8,
    faces: &[
        &[0, 4, 7, 3],
        &[1, 2, 6, 5],
        &[0, 1, 5, 4],
        &[3, 7, 6, 2],
        &[0, 3, 2, 1],
        &[4, 5, 6, 7],
    ],
};

pub static WEDGE: ModelDef = ModelDef {
    name: "wedge",
    n_points: 7,
    faces: &[
        &[0, 3, 6, 2],
        &[1, 2, 5, 4],
        &[0, 1, 4, 3],
        &[2, 6, 5],
        &[0, 2, 1],
        &[3, 4, 5, 6],
    ],
};

pub static PRISM: ModelDef = ModelDef {
    name: "prism",
    n_points: 6,
    faces: &[
        &[0, 2, 1],
        &[3, 4, 5],
        &[0, 3, 5, 2],
        &[1, 2, 5, 4],
        &[0, 1, 4, 3],
    ],
};

pub static PYR: ModelDef = ModelDef {
    name: "pyr",
    n_points: 5,
    faces: &[&[0, 3, 2, 1], &[0, 4, 3], &[2, 3, 4], &[1, 2, 4], &[0, 1, 4]],
};

pub static TET: ModelDef = ModelDef {
    name: "tet",
    n_points: 4,
    faces: &[&[1, 2, 3], &[0, 3, 2], &[0, 1, 3], &[0, 2, 1]],
};

pub static TETWEDGE: ModelDef = ModelDef {
    name: "tetWedge",
    n_points: 5,
    faces: &[&[0, 2, 1], &[0, 3, 4, 2], &[1, 2, 4, 3], &[0, 1, 3]],
};

/// Placeholder model for cells that match nothing
pub static UNKNOWN: ModelDef = ModelDef {
    name: "unknown",
    n_points: 0,
    faces: &[],
};

/// The closed set of tags a cell is classified into
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum CellModel {
    Tet,
    Pyr,
    Prism,
    Wedge,
    TetWedge,
    Hex,
    GenericPolyhedron,
}

/// canonical models in the order the matcher tries them
pub(crate) static CANONICAL: [(&ModelDef, CellModel); 6] = [
    (&HEX, CellModel::Hex),
    (&PRISM, CellModel::Prism),
    (&PYR, CellModel::Pyr),
    (&TET, CellModel::Tet),
    (&WEDGE, CellModel::Wedge),
    (&TETWEDGE, CellModel::TetWedge),
];

/// Classify a cell shape against the canonical reference models.
///
/// A shape only matches when it points at the very same `static` reference
/// model and carries that model's number of vertices. Anything else, including
/// shapes built on [`UNKNOWN`], is a [`CellModel::GenericPolyhedron`].
pub fn classify(shape: &CellShape) -> CellModel {
    CANONICAL
        .iter()
        .find(|(def, _)| std::ptr::eq(shape.model, *def) && shape.points.len() == def.n_points)
        .map(|(_, tag)| *tag)
        .unwrap_or(CellModel::GenericPolyhedron)
}
