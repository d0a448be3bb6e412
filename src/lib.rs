#![doc = include_str!("../README.md")]

pub mod cell_type;
mod cells;
pub mod collective;
pub mod decompose;
pub mod error;
mod label;
pub mod maps;
pub mod mesh;
pub mod model;
pub mod populate;
pub mod prelude;
pub mod sizing;
pub mod write;

pub use cell_type::VtkCellType;
pub use cells::{VtuCells, VtuOptions};
pub use collective::rank_offsets;
pub use decompose::{decompose_cell, FaceSplit, SubCell};
pub use label::Label;
pub use maps::MeshMaps;
pub use mesh::subset::MeshSubset;
pub use mesh::{CellShape, PolyMesh, Point, VolumeMesh};
pub use model::{classify, CellModel, ModelDef};
pub use populate::{populate, populate_into, CellArrays, CellSlots};
pub use sizing::{ContentType, Sizing, SlotType};

pub use write::{
    write_legacy, write_vtu, Encoding, LegacyWriter, Numeric, UnstructuredWriter, VtuWriter,
};

pub use ndarray;

pub use quick_xml::writer::Writer;

/// general purpose error enumeration for possible causes of failure.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Malformed mesh face: {0}")]
    MalformedFace(#[from] error::MalformedFace),
    #[error("Output array does not match its sizing: {0}")]
    SizeMismatch(#[from] error::SizeMismatch),
    #[error("Renumbering failed: {0}")]
    IncompleteMapping(#[from] error::IncompleteMapping),
    #[error("Label overflow: {0}")]
    LabelOverflow(#[from] error::LabelOverflow),
    #[error("Unsupported configuration: {0}")]
    ConfigMismatch(#[from] error::ConfigMismatch),
    #[error("Invalid mesh: {0}")]
    InvalidMesh(#[from] error::InvalidMesh),
    #[error("An io error occured: `{0}`")]
    Io(#[from] std::io::Error),
    #[error("Could not write XML data to file: `{0}`")]
    XmlWrite(#[from] quick_xml::Error),
}
