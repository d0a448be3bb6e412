//! # Array population
//!
//! Population fills arrays that were sized from a [`Sizing`] beforehand. All
//! slot lengths are checked before the first write, so a mismatch never leaves
//! partially written output behind. Cells are visited in mesh order; the first
//! sub-cell of a decomposed polyhedron takes the cell's own slot and the others
//! are appended after the last mesh cell, with their connectivity after the
//! connectivity of all mesh cells.
//!
//! During the pass the offsets slots hold per-cell sizes, a second pass turns
//! them into the offsets the content type asks for.

use crate::cell_type::VtkCellType;
use crate::decompose::{self, SubCell};
use crate::error::{ConfigMismatch, SizeMismatch};
use crate::maps::MeshMaps;
use crate::mesh::VolumeMesh;
use crate::model::{classify, CellModel};
use crate::sizing::{ContentType, OffsetKind, Sizing, SlotType};
use crate::{Error, Label};

use hashbrown::HashSet;

/// Owned, exactly sized output arrays
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellArrays<L> {
    pub cell_types: Vec<u8>,
    pub cells: Vec<L>,
    pub cells_offsets: Vec<L>,
    pub faces: Vec<L>,
    pub faces_offsets: Vec<L>,
}

impl<L: Label> CellArrays<L> {
    /// Allocate every slot at the size `sizing` computes for `content`.
    /// Face offsets start at the `-1` sentinel.
    pub fn allocate(sizing: &Sizing, content: ContentType) -> Self {
        Self {
            cell_types: vec![0; sizing.n_field_cells()],
            cells: vec![L::zero(); sizing.size_of(content, SlotType::Cells)],
            cells_offsets: vec![L::zero(); sizing.size_of(content, SlotType::CellsOffsets)],
            faces: vec![L::zero(); sizing.size_of(content, SlotType::Faces)],
            faces_offsets: vec![-L::one(); sizing.size_of(content, SlotType::FacesOffsets)],
        }
    }

    /// Borrow the arrays as slots, together with the map arrays
    pub fn slots<'a>(
        &'a mut self,
        cell_map: &'a mut [usize],
        add_point_ids: &'a mut [usize],
    ) -> CellSlots<'a, L> {
        CellSlots {
            cell_types: &mut self.cell_types,
            cells: &mut self.cells,
            cells_offsets: &mut self.cells_offsets,
            faces: &mut self.faces,
            faces_offsets: &mut self.faces_offsets,
            cell_map,
            add_point_ids,
        }
    }
}

/// Caller owned storage written by [`populate_into`]
#[derive(Debug)]
pub struct CellSlots<'a, L> {
    pub cell_types: &'a mut [u8],
    pub cells: &'a mut [L],
    pub cells_offsets: &'a mut [L],
    pub faces: &'a mut [L],
    pub faces_offsets: &'a mut [L],
    /// output cell -> original cell
    pub cell_map: &'a mut [usize],
    /// additional point -> originating cell
    pub add_point_ids: &'a mut [usize],
}

/// Allocate and populate the arrays for `content`.
pub fn populate<L: Label, M: VolumeMesh + ?Sized>(
    mesh: &M,
    sizing: &Sizing,
    content: ContentType,
) -> Result<(CellArrays<L>, MeshMaps), Error> {
    let mut arrays = CellArrays::allocate(sizing, content);
    let mut cell_map = vec![0; sizing.n_field_cells()];
    let mut add_point_ids = vec![0; sizing.n_add_points()];

    populate_into(
        mesh,
        sizing,
        content,
        arrays.slots(&mut cell_map, &mut add_point_ids),
    )?;

    Ok((arrays, MeshMaps::new(cell_map, add_point_ids)))
}

/// Populate caller provided slots. Every slot must have exactly the length
/// [`Sizing::size_of`] gives for `content`; this is checked before writing.
pub fn populate_into<L: Label, M: VolumeMesh + ?Sized>(
    mesh: &M,
    sizing: &Sizing,
    content: ContentType,
    slots: CellSlots<'_, L>,
) -> Result<(), Error> {
    if sizing.n_cells() != mesh.n_cells() || sizing.n_points() != mesh.n_points() {
        return Err(ConfigMismatch::StaleSizing {
            sizing_cells: sizing.n_cells(),
            sizing_points: sizing.n_points(),
            mesh_cells: mesh.n_cells(),
            mesh_points: mesh.n_points(),
        }
        .into());
    }
    check_sizes(sizing, content, &slots)?;

    let layout = content.layout();
    let CellSlots {
        cell_types,
        cells,
        cells_offsets,
        faces,
        faces_offsets,
        cell_map,
        add_point_ids,
    } = slots;

    faces_offsets.iter_mut().for_each(|x| *x = -L::one());

    let (regular, overflow) = cells.split_at_mut(sizing.regular_len(content));
    let mut regular = SlotWriter::new(regular, content, SlotType::Cells);
    let mut overflow = SlotWriter::new(overflow, content, SlotType::Cells);
    let mut faces = SlotWriter::new(faces, content, SlotType::Faces);

    let mut out = CellOut {
        prefixed: layout.prefixed,
        cell_types,
        cells_offsets,
    };

    let n_cells = sizing.n_cells();
    let mut add_cell = n_cells;
    let mut add_point = 0;
    let mut unique = HashSet::new();
    let mut sorted = Vec::new();

    for celli in 0..n_cells {
        cell_map[celli] = celli;

        let shape = mesh.cell_shape(celli);
        let model = classify(&shape);
        let p = &shape.points;

        match model {
            CellModel::Tet => out.write(&mut regular, celli, VtkCellType::Tetra, p)?,
            CellModel::Pyr => out.write(&mut regular, celli, VtkCellType::Pyramid, p)?,
            CellModel::Hex => out.write(&mut regular, celli, VtkCellType::Hexahedron, p)?,
            CellModel::Prism => {
                // VTK wedge winds its base the other way round
                let wedge = [p[0], p[2], p[1], p[3], p[5], p[4]];
                out.write(&mut regular, celli, VtkCellType::Wedge, &wedge)?
            }
            CellModel::Wedge if sizing.decompose() => {
                let hex = [p[0], p[1], p[2], p[2], p[3], p[4], p[5], p[6]];
                out.write(&mut regular, celli, VtkCellType::Hexahedron, &hex)?
            }
            CellModel::TetWedge if sizing.decompose() => {
                let wedge = [p[0], p[2], p[1], p[3], p[4], p[3]];
                out.write(&mut regular, celli, VtkCellType::Wedge, &wedge)?
            }
            _ if sizing.decompose() => {
                let apex = sizing.n_points() + add_point;
                *add_point_ids
                    .get_mut(add_point)
                    .ok_or_else(|| overrun(content, sizing.n_add_points()))? = celli;
                add_point += 1;

                let mut first = true;
                let mut result = Ok(());
                decompose::for_each_sub_cell(mesh, celli, apex, sizing.face_split(), |sub| {
                    if result.is_err() {
                        return;
                    }
                    result = if first {
                        first = false;
                        out.write_sub_cell(&mut regular, celli, &sub)
                    } else {
                        let slot = add_cell;
                        add_cell += 1;
                        match cell_map.get_mut(slot) {
                            Some(entry) => {
                                *entry = celli;
                                out.write_sub_cell(&mut overflow, slot, &sub)
                            }
                            None => Err(overrun(content, slot).into()),
                        }
                    };
                })?;
                result?;

                log::trace!("cell {celli} decomposed around point {apex}");
            }
            _ => {
                out.cell_types[celli] = VtkCellType::Polyhedron.code();

                let stream_start = faces.pos;
                let block_start = regular.pos;
                let stream = if layout.inline_face_stream {
                    // block length is filled in once the stream is written
                    regular.push(L::zero())?;
                    &mut regular
                } else {
                    &mut faces
                };

                let cell_faces = mesh.cell_faces(celli);
                stream.push_index(cell_faces.len())?;
                for &facei in cell_faces {
                    let face = decompose::checked_face(mesh, facei)?;
                    stream.push_index(face.len())?;
                    if mesh.face_owner(facei) == celli {
                        for &pointi in face {
                            stream.push_index(pointi)?;
                        }
                    } else {
                        // neighbour side: keep the first point, reverse the rest
                        stream.push_index(face[0])?;
                        for &pointi in face[1..].iter().rev() {
                            stream.push_index(pointi)?;
                        }
                    }
                }

                if layout.inline_face_stream {
                    let len = regular.pos - block_start - 1;
                    regular.set(block_start, L::from_index(len)?);
                } else {
                    let n_face_offsets = faces_offsets.len();
                    *faces_offsets
                        .get_mut(celli)
                        .ok_or_else(|| overrun(content, n_face_offsets))? =
                        L::from_index(faces.pos - stream_start)?;

                    unique.clear();
                    for &facei in cell_faces {
                        unique.extend(mesh.face_points(facei).iter().copied());
                    }
                    sorted.clear();
                    sorted.extend(unique.iter().copied());
                    sorted.sort_unstable();

                    out.write_labels(&mut regular, celli, &sorted)?;
                }
            }
        }
    }

    regular.finish()?;
    overflow.finish()?;
    faces.finish()?;
    if add_cell != sizing.n_field_cells() || add_point != sizing.n_add_points() {
        return Err(SizeMismatch::new(
            content,
            SlotType::CellsOffsets,
            sizing.n_field_cells(),
            add_cell,
        )
        .into());
    }

    finish_offsets(layout.offsets, out.cells_offsets, sizing.n_field_cells());
    finish_face_offsets(layout.face_end_offsets, faces_offsets);

    log::debug!(
        "populated {} cells for {} content ({} labels, {} face labels)",
        sizing.n_field_cells(),
        content,
        sizing.size_of(content, SlotType::Cells),
        sizing.size_of(content, SlotType::Faces),
    );

    Ok(())
}

/// an entry past the end of a per-cell slot was requested
fn overrun(content: ContentType, len: usize) -> SizeMismatch {
    SizeMismatch::new(content, SlotType::CellsOffsets, len, len + 1)
}

fn check_sizes<L>(
    sizing: &Sizing,
    content: ContentType,
    slots: &CellSlots<'_, L>,
) -> Result<(), Error> {
    let check = |slot: SlotType, expected: usize, actual: usize| {
        if expected == actual {
            Ok(())
        } else {
            Err(SizeMismatch::new(content, slot, expected, actual))
        }
    };

    let n_field_cells = sizing.n_field_cells();
    check(SlotType::Cells, sizing.size_of(content, SlotType::Cells), slots.cells.len())?;
    check(
        SlotType::CellsOffsets,
        sizing.size_of(content, SlotType::CellsOffsets),
        slots.cells_offsets.len(),
    )?;
    check(SlotType::Faces, sizing.size_of(content, SlotType::Faces), slots.faces.len())?;
    check(
        SlotType::FacesOffsets,
        sizing.size_of(content, SlotType::FacesOffsets),
        slots.faces_offsets.len(),
    )?;
    // the per-cell arrays are reported against the offsets slot they parallel
    check(SlotType::CellsOffsets, n_field_cells, slots.cell_types.len())?;
    check(SlotType::CellsOffsets, n_field_cells, slots.cell_map.len())?;
    check(SlotType::CellsOffsets, sizing.n_add_points(), slots.add_point_ids.len())?;

    Ok(())
}

/// sequential writer into one slot that refuses to run past its end
struct SlotWriter<'a, L> {
    data: &'a mut [L],
    pos: usize,
    content: ContentType,
    slot: SlotType,
}

impl<'a, L: Label> SlotWriter<'a, L> {
    fn new(data: &'a mut [L], content: ContentType, slot: SlotType) -> Self {
        Self {
            data,
            pos: 0,
            content,
            slot,
        }
    }

    fn push(&mut self, value: L) -> Result<(), Error> {
        let len = self.data.len();
        let entry = self
            .data
            .get_mut(self.pos)
            .ok_or(SizeMismatch::new(self.content, self.slot, len, len + 1))?;
        *entry = value;
        self.pos += 1;
        Ok(())
    }

    fn push_index(&mut self, value: usize) -> Result<(), Error> {
        self.push(L::from_index(value)?)
    }

    fn set(&mut self, pos: usize, value: L) {
        self.data[pos] = value;
    }

    /// every entry must have been written
    fn finish(&self) -> Result<(), Error> {
        if self.pos != self.data.len() {
            let mismatch = SizeMismatch::new(self.content, self.slot, self.data.len(), self.pos);
            return Err(mismatch.into());
        }
        Ok(())
    }
}

/// per-cell outputs shared by all the cell writing paths
struct CellOut<'a, L> {
    prefixed: bool,
    cell_types: &'a mut [u8],
    cells_offsets: &'a mut [L],
}

impl<'a, L: Label> CellOut<'a, L> {
    fn write(
        &mut self,
        writer: &mut SlotWriter<'_, L>,
        slot: usize,
        ty: VtkCellType,
        points: &[usize],
    ) -> Result<(), Error> {
        self.cell_types[slot] = ty.code();
        self.write_labels(writer, slot, points)
    }

    fn write_sub_cell(
        &mut self,
        writer: &mut SlotWriter<'_, L>,
        slot: usize,
        sub: &SubCell,
    ) -> Result<(), Error> {
        self.write(writer, slot, sub.vtk_type(), sub.points())
    }

    /// size prefix when the layout wants one, the labels, and the cell size
    /// recorded for the offsets pass
    fn write_labels(
        &mut self,
        writer: &mut SlotWriter<'_, L>,
        slot: usize,
        points: &[usize],
    ) -> Result<(), Error> {
        if self.prefixed {
            writer.push_index(points.len())?;
        }
        for &pointi in points {
            writer.push_index(pointi)?;
        }
        if let Some(size) = self.cells_offsets.get_mut(slot) {
            *size = L::from_index(points.len())?;
        }
        Ok(())
    }
}

/// turn per-cell sizes into offsets
fn finish_offsets<L: Label>(kind: OffsetKind, offsets: &mut [L], n_cells: usize) {
    let mut total = L::zero();
    match kind {
        OffsetKind::Absent => {}
        OffsetKind::End => {
            for offset in offsets.iter_mut() {
                total = total + *offset;
                *offset = total;
            }
        }
        OffsetKind::Begin => {
            for offset in offsets.iter_mut() {
                let size = *offset;
                *offset = total;
                total = total + size + L::one();
            }
        }
        OffsetKind::BeginTotal => {
            for offset in offsets[..n_cells].iter_mut() {
                let size = *offset;
                *offset = total;
                total = total + size;
            }
            offsets[n_cells] = total;
        }
    }
}

/// turn per-cell face-stream lengths into offsets, leaving `-1` entries alone
fn finish_face_offsets<L: Label>(end_offsets: bool, offsets: &mut [L]) {
    let mut total = L::zero();
    for offset in offsets.iter_mut().filter(|x| !x.is_negative()) {
        let size = *offset;
        if end_offsets {
            total = total + size;
            *offset = total;
        } else {
            *offset = total;
            total = total + size;
        }
    }
}
