//! Common traits and types that are useful for transcribing meshes
pub use crate::mesh::subset::MeshSubset;
pub use crate::mesh::{CellShape, PolyMesh, Point, VolumeMesh};
pub use crate::sizing::{ContentType, Sizing, SlotType};
pub use crate::write::{Encoding, UnstructuredWriter};
pub use crate::{FaceSplit, Label, VtuCells, VtuOptions};
