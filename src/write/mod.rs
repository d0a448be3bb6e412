//! # Writers
//!
//! Both writers read a populated [`VtuCells`] and a list of field points, the
//! mesh points followed by the additional points of decomposed cells (see
//! [`VtuCells::field_points`]). Each writer requires the content type whose
//! layout it serializes:
//!
//! | writer          | file                           | content  |
//! |-----------------|--------------------------------|----------|
//! | [`LegacyWriter`]| ASCII `UNSTRUCTURED_GRID` `.vtk` | `legacy` |
//! | [`VtuWriter`]   | XML `UnstructuredGrid` `.vtu`  | `xml`    |

mod legacy;
mod xml;

pub use legacy::LegacyWriter;
pub use xml::VtuWriter;

use crate::cells::VtuCells;
use crate::error::{ConfigMismatch, InvalidMesh};
use crate::mesh::Point;
use crate::sizing::ContentType;
use crate::{Error, Label};

use std::fmt::Write as _;
use std::io::Write;

/// the encoding to use when writing an inline dataarray
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Encoding {
    #[default]
    Ascii,
    Base64,
}

impl Encoding {
    fn to_str(self) -> &'static str {
        match self {
            Self::Ascii => "ascii",
            Self::Base64 => "binary",
        }
    }
}

/// Element types that can be written to a `DataArray`
pub trait Numeric: Copy {
    /// VTK `type` attribute of an array of this element
    const VTK_NAME: &'static str;

    /// size in bytes of one element
    const SIZE: usize;

    /// append the little endian bytes of this element
    fn extend_le_bytes(&self, bytes: &mut Vec<u8>);

    /// append the ascii form of this element
    fn push_ascii(&self, out: &mut String);
}

macro_rules! numeric_int {
    ($ty:ty, $name:literal) => {
        impl Numeric for $ty {
            const VTK_NAME: &'static str = $name;
            const SIZE: usize = std::mem::size_of::<$ty>();

            fn extend_le_bytes(&self, bytes: &mut Vec<u8>) {
                bytes.extend_from_slice(&self.to_le_bytes())
            }

            fn push_ascii(&self, out: &mut String) {
                // writing to a String cannot fail
                let _ = write!(out, "{}", self);
            }
        }
    };
}

numeric_int!(u8, "UInt8");
numeric_int!(i32, "Int32");
numeric_int!(i64, "Int64");

impl Numeric for f64 {
    const VTK_NAME: &'static str = "Float64";
    const SIZE: usize = 8;

    fn extend_le_bytes(&self, bytes: &mut Vec<u8>) {
        bytes.extend_from_slice(&self.to_le_bytes())
    }

    fn push_ascii(&self, out: &mut String) {
        let mut buffer = ryu::Buffer::new();
        out.push_str(buffer.format(*self));
    }
}

/// A file format the populated cell arrays can be written in
pub trait UnstructuredWriter {
    /// the content type whose layout this writer serializes
    const CONTENT: ContentType;
    const NAME: &'static str;

    fn write_grid<L: Label>(self, points: &[Point], cells: &VtuCells<L>) -> Result<(), Error>;

    /// the cells must hold this writer's content, and one point must be
    /// given for every field point
    fn check<L: Label>(points: &[Point], cells: &VtuCells<L>) -> Result<(), Error> {
        if cells.content() != Self::CONTENT {
            return Err(ConfigMismatch::WriterContent {
                writer: Self::NAME,
                expected: Self::CONTENT,
                actual: cells.content(),
            }
            .into());
        }

        let expected = cells.sizing().n_field_points();
        if points.len() != expected {
            return Err(InvalidMesh::PointCount {
                expected,
                actual: points.len(),
            }
            .into());
        }

        Ok(())
    }
}

/// Write `cells` as a legacy ASCII `.vtk` file. The cells must hold
/// [`ContentType::Legacy`] content.
pub fn write_legacy<W: Write, L: Label>(
    writer: W,
    title: &str,
    points: &[Point],
    cells: &VtuCells<L>,
) -> Result<(), Error> {
    LegacyWriter::new(writer, title).write_grid(points, cells)
}

/// Write `cells` as an XML `.vtu` file with inline data arrays. The cells
/// must hold [`ContentType::Xml`] content.
pub fn write_vtu<W: Write, L: Label>(
    writer: W,
    points: &[Point],
    cells: &VtuCells<L>,
    encoding: Encoding,
) -> Result<(), Error> {
    VtuWriter::new(writer, encoding).write_grid(points, cells)
}

/// space separated ascii values, `per_line` to a line
pub(crate) fn ascii_values<N: Numeric>(data: &[N], per_line: usize) -> String {
    let mut out = String::with_capacity(data.len() * 4);
    for (i, x) in data.iter().enumerate() {
        if i > 0 {
            out.push(if i % per_line == 0 { '\n' } else { ' ' });
        }
        x.push_ascii(&mut out);
    }
    out
}

/// base64 of the little endian bytes preceded by their `UInt64` byte count
pub(crate) fn base64_values<N: Numeric>(data: &[N]) -> String {
    let n_bytes = data.len() * N::SIZE;
    let mut byte_data: Vec<u8> = Vec::with_capacity(n_bytes + 8);

    byte_data.extend_from_slice(&(n_bytes as u64).to_le_bytes());
    data.iter().for_each(|x| x.extend_le_bytes(&mut byte_data));

    base64::encode(byte_data.as_slice())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_lines() {
        assert_eq!(ascii_values(&[1i32, 2, 3, 4, 5], 2), "1 2\n3 4\n5");
        assert_eq!(ascii_values(&[0.5f64, 1.0], 3), "0.5 1.0");
    }

    #[test]
    fn base64_header_counts_bytes() {
        let encoded = base64_values(&[7u8, 8, 9]);
        let bytes = base64::decode(encoded).unwrap();
        assert_eq!(&bytes[..8], &3u64.to_le_bytes());
        assert_eq!(&bytes[8..], &[7, 8, 9]);
    }
}
