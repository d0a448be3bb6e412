//! Extraction of a cell subset into a standalone, locally numbered mesh.
//!
//! Transcription always runs on local indices. The maps returned here are what
//! [`VtuCells::renumber_cells`](crate::VtuCells::renumber_cells) and
//! [`VtuCells::renumber_points`](crate::VtuCells::renumber_points) expect to
//! take the output back to the numbering of the full mesh.

use super::{CellShape, PolyMesh, VolumeMesh};
use crate::error::InvalidMesh;
use crate::Error;

use hashbrown::HashMap;
use ndarray::Array2;

/// A subset of a mesh's cells, renumbered locally
#[derive(Debug, Clone)]
pub struct MeshSubset {
    mesh: PolyMesh,
    cell_map: Vec<usize>,
    point_map: Vec<usize>,
}

impl MeshSubset {
    /// Extract `cells` of `mesh`, in the given order.
    ///
    /// Faces between two selected cells stay internal. A face whose owner is
    /// not selected is flipped so that it points out of the selected
    /// neighbour. Cell shapes are carried over with local point labels.
    pub fn new<M: VolumeMesh + ?Sized>(mesh: &M, cells: &[usize]) -> Result<Self, Error> {
        let n_cells = mesh.n_cells();
        let mut local_cell = vec![None; n_cells];
        for (local, &celli) in cells.iter().enumerate() {
            if celli >= n_cells {
                return Err(InvalidMesh::SubsetCell { cell: celli, n_cells }.into());
            }
            if local_cell[celli].replace(local).is_some() {
                return Err(InvalidMesh::DuplicateSubsetCell(celli).into());
            }
        }

        let mut point_map = Vec::new();
        let mut local_point: HashMap<usize, usize> = HashMap::new();
        let mut to_local = |pointi: usize| {
            *local_point.entry(pointi).or_insert_with(|| {
                point_map.push(pointi);
                point_map.len() - 1
            })
        };

        let mut face_of: HashMap<usize, usize> = HashMap::new();
        let mut faces = Vec::new();
        let mut owner = Vec::new();
        let mut neighbour: Vec<Option<usize>> = Vec::new();

        for (local, &celli) in cells.iter().enumerate() {
            for &facei in mesh.cell_faces(celli) {
                if let Some(&fi) = face_of.get(&facei) {
                    if owner[fi] != local {
                        neighbour[fi] = Some(local);
                    }
                    continue;
                }

                let points = mesh.face_points(facei);
                let mut face: Vec<usize> = points.iter().map(|&p| to_local(p)).collect();

                let (own, nei) = match local_cell[mesh.face_owner(facei)] {
                    Some(own) if own == local => (own, None),
                    Some(own) => (own, Some(local)),
                    None => {
                        // only the neighbour side survives
                        face.reverse();
                        (local, None)
                    }
                };

                face_of.insert(facei, faces.len());
                faces.push(face);
                owner.push(own);
                neighbour.push(nei);
            }
        }

        let mut coords = Array2::zeros((point_map.len(), 3));
        for (local, &pointi) in point_map.iter().enumerate() {
            let p = mesh.point(pointi);
            for (c, x) in coords.row_mut(local).iter_mut().zip(p) {
                *c = x;
            }
        }

        let shapes = cells
            .iter()
            .map(|&celli| -> Result<CellShape, Error> {
                let shape = mesh.cell_shape(celli);
                let points = shape
                    .points
                    .iter()
                    .map(|&point| {
                        local_point
                            .get(&point)
                            .copied()
                            .ok_or(InvalidMesh::ShapePoint { cell: celli, point })
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(CellShape::new(shape.model, points))
            })
            .collect::<Result<Vec<_>, Error>>()?;

        let sub = PolyMesh::new(coords, faces, owner, neighbour)?.with_cell_shapes(shapes)?;

        log::debug!(
            "extracted {} of {} cells with {} points",
            cells.len(),
            n_cells,
            point_map.len()
        );

        Ok(Self {
            mesh: sub,
            cell_map: cells.to_vec(),
            point_map,
        })
    }

    pub fn mesh(&self) -> &PolyMesh {
        &self.mesh
    }

    pub fn into_mesh(self) -> PolyMesh {
        self.mesh
    }

    /// local cell -> original cell
    pub fn cell_map(&self) -> &[usize] {
        &self.cell_map
    }

    /// local point -> original point
    pub fn point_map(&self) -> &[usize] {
        &self.point_map
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::HEX;

    fn two_hexes() -> PolyMesh {
        let mut points = Vec::new();
        for z in 0..2 {
            for y in 0..2 {
                for x in 0..3 {
                    points.extend_from_slice(&[x as f64, y as f64, z as f64]);
                }
            }
        }
        let points = Array2::from_shape_vec((12, 3), points).unwrap();
        let id = |x: usize, y: usize, z: usize| x + 3 * y + 6 * z;
        let hex = |x: usize| {
            let labels = [
                id(x, 0, 0),
                id(x + 1, 0, 0),
                id(x + 1, 1, 0),
                id(x, 1, 0),
                id(x, 0, 1),
                id(x + 1, 0, 1),
                id(x + 1, 1, 1),
                id(x, 1, 1),
            ];
            HEX.faces
                .iter()
                .map(|f| f.iter().map(|&v| labels[v]).collect())
                .collect::<Vec<Vec<usize>>>()
        };
        PolyMesh::from_cells(points, &[hex(0), hex(1)]).unwrap()
    }

    #[test]
    fn neighbour_only_cell_gets_flipped_faces() {
        let mesh = two_hexes();
        let subset = MeshSubset::new(&mesh, &[1]).unwrap();
        let sub = subset.mesh();

        assert_eq!(sub.n_cells(), 1);
        assert_eq!(sub.n_faces(), 6);
        assert_eq!(sub.n_points(), 8);
        assert!(sub.neighbour().iter().all(Option::is_none));
        assert_eq!(subset.cell_map(), &[1]);

        // the shared face was owned by cell 0 and must now point out of cell 1
        let rematched = crate::model::matcher::match_cell(sub, 0);
        assert!(std::ptr::eq(rematched.model, &HEX));

        for (local, &orig) in subset.point_map().iter().enumerate() {
            assert_eq!(sub.point(local), mesh.point(orig));
        }
    }

    #[test]
    fn full_subset_keeps_internal_face() {
        let mesh = two_hexes();
        let subset = MeshSubset::new(&mesh, &[1, 0]).unwrap();
        assert_eq!(subset.mesh().n_faces(), 11);
        assert_eq!(subset.mesh().neighbour().iter().flatten().count(), 1);
    }

    #[test]
    fn out_of_range_cell() {
        let mesh = two_hexes();
        assert!(matches!(
            MeshSubset::new(&mesh, &[2]),
            Err(Error::InvalidMesh(InvalidMesh::SubsetCell { cell: 2, n_cells: 2 }))
        ));
    }

    #[test]
    fn repeated_cell_is_rejected() {
        let mesh = two_hexes();
        assert!(matches!(
            MeshSubset::new(&mesh, &[0, 0]),
            Err(Error::InvalidMesh(InvalidMesh::DuplicateSubsetCell(0)))
        ));
        assert!(matches!(
            MeshSubset::new(&mesh, &[1, 0, 1]),
            Err(Error::InvalidMesh(InvalidMesh::DuplicateSubsetCell(1)))
        ));
    }

    #[test]
    fn shape_point_off_the_cell_is_rejected() {
        let shapes = vec![
            CellShape::new(&HEX, vec![0, 1, 4, 3, 6, 7, 10, 11]),
            CellShape::new(&HEX, vec![1, 2, 5, 4, 7, 8, 11, 10]),
        ];
        let mesh = two_hexes().with_cell_shapes(shapes).unwrap();
        assert!(matches!(
            MeshSubset::new(&mesh, &[0]),
            Err(Error::InvalidMesh(InvalidMesh::ShapePoint { cell: 0, point: 11 }))
        ));
        assert!(MeshSubset::new(&mesh, &[1]).is_ok());
    }
}
