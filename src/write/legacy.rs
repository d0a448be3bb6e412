use super::{ascii_values, UnstructuredWriter};
use crate::cells::VtuCells;
use crate::mesh::Point;
use crate::sizing::ContentType;
use crate::{Error, Label};

use std::io::Write;

/// Legacy ASCII `.vtk` writer.
///
/// `CELLS` is written one cell per line straight from the size-prefixed
/// connectivity, polyhedra included, and the original cell index of every
/// output cell goes to a `cellID` cell field.
pub struct LegacyWriter<W> {
    inner: W,
    title: String,
}

impl<W: Write> LegacyWriter<W> {
    pub fn new(inner: W, title: &str) -> Self {
        // the title is a single line of at most 256 characters
        let title: String = title.lines().next().unwrap_or_default().chars().take(256).collect();
        Self { inner, title }
    }
}

impl<W: Write> UnstructuredWriter for LegacyWriter<W> {
    const CONTENT: ContentType = ContentType::Legacy;
    const NAME: &'static str = "legacy";

    fn write_grid<L: Label>(mut self, points: &[Point], cells: &VtuCells<L>) -> Result<(), Error> {
        Self::check(points, cells)?;
        let w = &mut self.inner;

        writeln!(w, "# vtk DataFile Version 2.0")?;
        writeln!(w, "{}", self.title)?;
        writeln!(w, "ASCII")?;
        writeln!(w, "DATASET UNSTRUCTURED_GRID")?;

        writeln!(w, "POINTS {} double", points.len())?;
        let coords: Vec<f64> = points.iter().flatten().copied().collect();
        if !coords.is_empty() {
            writeln!(w, "{}", ascii_values(&coords, 3))?;
        }

        let connectivity = cells.cells();
        writeln!(w, "CELLS {} {}", cells.n_field_cells(), connectivity.len())?;
        let mut rest = connectivity;
        while let Some((&n, tail)) = rest.split_first() {
            let n = n.to_usize().unwrap_or_default().min(tail.len());
            let (cell, tail) = tail.split_at(n);
            write!(w, "{n}")?;
            for label in cell {
                write!(w, " {label}")?;
            }
            writeln!(w)?;
            rest = tail;
        }

        writeln!(w, "CELL_TYPES {}", cells.n_field_cells())?;
        for ty in cells.cell_types() {
            writeln!(w, "{ty}")?;
        }

        let ids: Vec<L> = cells
            .cell_map()
            .iter()
            .map(|&id| L::from_index(id))
            .collect::<Result<_, _>>()?;
        writeln!(w, "CELL_DATA {}", cells.n_field_cells())?;
        writeln!(w, "FIELD attributes 1")?;
        writeln!(w, "cellID 1 {} {}", ids.len(), legacy_type::<L>())?;
        if !ids.is_empty() {
            writeln!(w, "{}", ascii_values(&ids, 9))?;
        }

        w.flush()?;
        Ok(())
    }
}

fn legacy_type<L: Label>() -> &'static str {
    if L::SIZE == 8 {
        "vtktypeint64"
    } else {
        "int"
    }
}
