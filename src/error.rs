//! Detail types carried by the variants of [`Error`](crate::Error)

use crate::sizing::{ContentType, SlotType};
use derive_more::Constructor;

#[derive(thiserror::Error, Debug, Constructor, Clone, PartialEq, Eq)]
#[error("face {face} has {n_points} points, at least 3 are required")]
pub struct MalformedFace {
    pub face: usize,
    pub n_points: usize,
}

#[derive(thiserror::Error, Debug, Constructor, Clone, PartialEq, Eq)]
#[error("{content} {slot} array has length {actual} but sizing requires {expected}")]
pub struct SizeMismatch {
    pub content: ContentType,
    pub slot: SlotType,
    pub expected: usize,
    pub actual: usize,
}

#[derive(thiserror::Error, Debug, Constructor, Clone, PartialEq, Eq)]
#[error("{map} entry {position} holds {value} which has no entry in a mapping of length {mapping_len}")]
pub struct IncompleteMapping {
    pub map: &'static str,
    pub position: usize,
    pub value: usize,
    pub mapping_len: usize,
}

#[derive(thiserror::Error, Debug, Constructor, Clone, PartialEq, Eq)]
#[error("value {value} does not fit in a {label} label")]
pub struct LabelOverflow {
    pub value: usize,
    pub label: &'static str,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigMismatch {
    #[error("sizing was computed with decompose={sizing} but decompose={requested} was requested")]
    Decompose { sizing: bool, requested: bool },
    #[error("sizing was computed for {sizing_cells} cells and {sizing_points} points, the mesh has {mesh_cells} and {mesh_points}")]
    StaleSizing {
        sizing_cells: usize,
        sizing_points: usize,
        mesh_cells: usize,
        mesh_points: usize,
    },
    #[error("cannot merge rank sizings computed with different decompose flags")]
    RankDecompose,
    #[error("unknown content type `{0}`, expected one of legacy, xml, internal1, internal2")]
    ContentName(String),
    #[error("{writer} writer requires {expected} content but cells hold {actual}")]
    WriterContent {
        writer: &'static str,
        expected: ContentType,
        actual: ContentType,
    },
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidMesh {
    #[error("points array must have shape (n, 3), found (_, {0})")]
    PointColumns(usize),
    #[error("face {face} references point {point} but the mesh has {n_points} points")]
    PointOutOfRange {
        face: usize,
        point: usize,
        n_points: usize,
    },
    #[error("{faces} faces but {owners} owner entries")]
    OwnerLength { faces: usize, owners: usize },
    #[error("face {0} is shared by more than two cells")]
    OvershareFace(usize),
    #[error("face {0} names the same cell as owner and neighbour")]
    SelfNeighbour(usize),
    #[error("{shapes} cell shapes declared for {n_cells} cells")]
    ShapeCount { shapes: usize, n_cells: usize },
    #[error("{actual} points supplied for a mesh of {expected} points")]
    PointCount { expected: usize, actual: usize },
    #[error("cell {0} has no faces to decompose")]
    EmptyCell(usize),
    #[error("subset references cell {cell} but the mesh has {n_cells} cells")]
    SubsetCell { cell: usize, n_cells: usize },
    #[error("subset lists cell {0} more than once")]
    DuplicateSubsetCell(usize),
    #[error("shape of cell {cell} uses point {point} which none of its faces reference")]
    ShapePoint { cell: usize, point: usize },
}
