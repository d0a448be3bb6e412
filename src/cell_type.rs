//! VTK cell type codes written into the `types` array of an unstructured grid.

/// The subset of VTK linear cell types that volume meshes are transcribed into.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[repr(u8)]
pub enum VtkCellType {
    Tetra = 10,
    Hexahedron = 12,
    Wedge = 13,
    Pyramid = 14,
    Polyhedron = 42,
}

impl VtkCellType {
    /// the raw code as stored in the `types` array
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            10 => Some(VtkCellType::Tetra),
            12 => Some(VtkCellType::Hexahedron),
            13 => Some(VtkCellType::Wedge),
            14 => Some(VtkCellType::Pyramid),
            42 => Some(VtkCellType::Polyhedron),
            _ => None,
        }
    }
}

impl From<VtkCellType> for u8 {
    fn from(x: VtkCellType) -> u8 {
        x.code()
    }
}
