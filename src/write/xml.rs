use super::{ascii_values, base64_values, Encoding, Numeric, UnstructuredWriter};
use crate::cells::VtuCells;
use crate::mesh::Point;
use crate::sizing::ContentType;
use crate::{Error, Label};

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::writer::Writer;
use std::io::Write;

/// XML `.vtu` writer with all data arrays inline
pub struct VtuWriter<W: Write> {
    writer: Writer<W>,
    encoding: Encoding,
}

impl<W: Write> VtuWriter<W> {
    pub fn new(inner: W, encoding: Encoding) -> Self {
        Self {
            writer: Writer::new_with_indent(inner, b' ', 2),
            encoding,
        }
    }

    fn start(&mut self, name: &str, attributes: &[(&str, &str)]) -> Result<(), Error> {
        let start = BytesStart::new(name).with_attributes(attributes.iter().copied());
        self.writer.write_event(Event::Start(start))?;
        Ok(())
    }

    fn end(&mut self, name: &str) -> Result<(), Error> {
        self.writer.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    /// write a single inline `DataArray` element
    fn data_array<N: Numeric>(
        &mut self,
        name: &str,
        components: usize,
        data: &[N],
    ) -> Result<(), Error> {
        let components = components.to_string();
        let format = self.encoding.to_str();
        self.start(
            "DataArray",
            &[
                ("type", N::VTK_NAME),
                ("Name", name),
                ("NumberOfComponents", &components),
                ("format", format),
            ],
        )?;

        let text = match self.encoding {
            Encoding::Ascii => ascii_values(data, 12),
            Encoding::Base64 => base64_values(data),
        };
        self.writer.write_event(Event::Text(BytesText::new(&text)))?;

        self.end("DataArray")
    }
}

impl<W: Write> UnstructuredWriter for VtuWriter<W> {
    const CONTENT: ContentType = ContentType::Xml;
    const NAME: &'static str = "xml";

    fn write_grid<L: Label>(mut self, points: &[Point], cells: &VtuCells<L>) -> Result<(), Error> {
        Self::check(points, cells)?;

        self.writer
            .write_event(Event::Decl(BytesDecl::new("1.0", None, None)))?;
        self.start(
            "VTKFile",
            &[
                ("type", "UnstructuredGrid"),
                ("version", "1.0"),
                ("byte_order", "LittleEndian"),
                ("header_type", "UInt64"),
            ],
        )?;
        self.start("UnstructuredGrid", &[])?;

        let n_points = points.len().to_string();
        let n_cells = cells.n_field_cells().to_string();
        self.start(
            "Piece",
            &[("NumberOfPoints", &n_points), ("NumberOfCells", &n_cells)],
        )?;

        self.start("Points", &[])?;
        let coords: Vec<f64> = points.iter().flatten().copied().collect();
        self.data_array("Points", 3, &coords)?;
        self.end("Points")?;

        self.start("Cells", &[])?;
        self.data_array("connectivity", 1, cells.cells())?;
        self.data_array("offsets", 1, cells.cells_offsets())?;
        self.data_array("types", 1, cells.cell_types())?;
        if !cells.faces().is_empty() {
            self.data_array("faces", 1, cells.faces())?;
            self.data_array("faceoffsets", 1, cells.faces_offsets())?;
        }
        self.end("Cells")?;

        let ids: Vec<L> = cells
            .cell_map()
            .iter()
            .map(|&id| L::from_index(id))
            .collect::<Result<_, _>>()?;
        self.start("CellData", &[])?;
        self.data_array("cellID", 1, &ids)?;
        self.end("CellData")?;

        self.end("Piece")?;
        self.end("UnstructuredGrid")?;
        self.end("VTKFile")?;

        self.writer.inner().flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PolyMesh, VtuOptions};
    use ndarray::array;

    fn tet_cells() -> (Vec<Point>, VtuCells<i64>) {
        let points = array![[0., 0., 0.], [1., 0., 0.], [0., 1., 0.], [0., 0., 1.]];
        let tet = vec![vec![1, 2, 3], vec![0, 3, 2], vec![0, 1, 3], vec![0, 2, 1]];
        let mesh = PolyMesh::from_cells(points, &[tet]).unwrap();
        let cells = VtuCells::from_mesh(&mesh, VtuOptions::default()).unwrap();
        (cells.field_points(&mesh), cells)
    }

    #[test]
    fn ascii_arrays_inline() {
        let (points, cells) = tet_cells();
        let mut out = Vec::new();
        VtuWriter::new(&mut out, Encoding::Ascii)
            .write_grid(&points, &cells)
            .unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("<?xml version=\"1.0\"?>"));
        assert!(text.contains("<Piece NumberOfPoints=\"4\" NumberOfCells=\"1\">"));
        assert!(text.contains(
            "<DataArray type=\"Int64\" Name=\"connectivity\" NumberOfComponents=\"1\" format=\"ascii\">0 1 2 3</DataArray>"
        ));
        assert!(text.contains("format=\"ascii\">4</DataArray>"));
        assert!(text.contains("<DataArray type=\"UInt8\" Name=\"types\""));
        assert!(!text.contains("faceoffsets"));
    }

    #[test]
    fn base64_arrays_inline() {
        let (points, cells) = tet_cells();
        let mut out = Vec::new();
        VtuWriter::new(&mut out, Encoding::Base64)
            .write_grid(&points, &cells)
            .unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("format=\"binary\""));
        // 1 byte type array: 8 byte header + one byte
        let types = base64::encode([1u8, 0, 0, 0, 0, 0, 0, 0, 10]);
        assert!(text.contains(&types));
    }

    #[test]
    fn wrong_content_is_rejected() {
        let points = array![[0., 0., 0.], [1., 0., 0.], [0., 1., 0.], [0., 0., 1.]];
        let tet = vec![vec![1, 2, 3], vec![0, 3, 2], vec![0, 1, 3], vec![0, 2, 1]];
        let mesh = PolyMesh::from_cells(points, &[tet]).unwrap();
        let cells: VtuCells =
            VtuCells::from_mesh(&mesh, VtuOptions::default().content(ContentType::Internal1))
                .unwrap();

        let err = VtuWriter::new(Vec::new(), Encoding::Ascii)
            .write_grid(&cells.field_points(&mesh), &cells)
            .unwrap_err();
        assert!(matches!(err, Error::ConfigMismatch(_)));
    }
}
