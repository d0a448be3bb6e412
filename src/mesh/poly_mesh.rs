use super::{CellShape, Point, VolumeMesh};
use crate::error::InvalidMesh;
use crate::model::matcher;
use crate::Error;

use hashbrown::{HashMap, HashSet};
use ndarray::Array2;
use std::borrow::Cow;

/// An in-memory face-based volume mesh.
///
/// Faces are stored once, oriented out of their `owner` cell. Boundary faces
/// have no neighbour. Cell to face addressing is built on construction, cell
/// shapes are matched on demand through [`PolyMesh::ensure_cell_shapes`].
#[derive(Debug, Clone)]
pub struct PolyMesh {
    points: Array2<f64>,
    faces: Vec<Vec<usize>>,
    owner: Vec<usize>,
    neighbour: Vec<Option<usize>>,
    cell_faces: Vec<Vec<usize>>,
    cell_shapes: Option<Vec<CellShape>>,
    revision: u64,
}

impl PolyMesh {
    /// Construct from raw face lists.
    ///
    /// `points` must have shape `(n_points, 3)`, and `owner` / `neighbour` one
    /// entry per face. The number of cells is one past the largest cell label.
    pub fn new(
        points: Array2<f64>,
        faces: Vec<Vec<usize>>,
        owner: Vec<usize>,
        neighbour: Vec<Option<usize>>,
    ) -> Result<Self, Error> {
        let cell_faces = Self::check_and_address(&points, &faces, &owner, &neighbour)?;

        Ok(Self {
            points,
            faces,
            owner,
            neighbour,
            cell_faces,
            cell_shapes: None,
            revision: 0,
        })
    }

    /// Construct from per-cell face lists, each face oriented out of its cell.
    ///
    /// A face shared by two cells is stored once, owned by the first cell that
    /// lists it and oriented as that cell lists it.
    pub fn from_cells(points: Array2<f64>, cells: &[Vec<Vec<usize>>]) -> Result<Self, Error> {
        let mut faces: Vec<Vec<usize>> = Vec::new();
        let mut owner = Vec::new();
        let mut neighbour: Vec<Option<usize>> = Vec::new();
        let mut lookup: HashMap<Vec<usize>, usize> = HashMap::new();

        for (celli, cell) in cells.iter().enumerate() {
            for face in cell {
                let mut key = face.clone();
                key.sort_unstable();

                match lookup.get(&key) {
                    Some(&facei) => {
                        if neighbour[facei].is_some() {
                            return Err(InvalidMesh::OvershareFace(facei).into());
                        }
                        neighbour[facei] = Some(celli);
                    }
                    None => {
                        lookup.insert(key, faces.len());
                        faces.push(face.clone());
                        owner.push(celli);
                        neighbour.push(None);
                    }
                }
            }
        }

        Self::new(points, faces, owner, neighbour)
    }

    /// Declare the shape of every cell instead of matching them
    pub fn with_cell_shapes(mut self, shapes: Vec<CellShape>) -> Result<Self, Error> {
        if shapes.len() != self.n_cells() {
            return Err(InvalidMesh::ShapeCount {
                shapes: shapes.len(),
                n_cells: self.n_cells(),
            }
            .into());
        }
        self.cell_shapes = Some(shapes);
        Ok(self)
    }

    /// Match every cell against the reference models, once.
    pub fn ensure_cell_shapes(&mut self) -> &[CellShape] {
        if self.cell_shapes.is_none() {
            let shapes: Vec<CellShape> = (0..self.n_cells())
                .map(|celli| matcher::match_cell(&*self, celli))
                .collect();
            self.cell_shapes = Some(shapes);
        }

        self.cell_shapes.as_deref().unwrap_or_default()
    }

    /// Move the points. Connectivity, shapes and the topology revision are kept.
    pub fn move_points(&mut self, points: Array2<f64>) -> Result<(), Error> {
        if points.ncols() != 3 {
            return Err(InvalidMesh::PointColumns(points.ncols()).into());
        }
        if points.nrows() != self.points.nrows() {
            return Err(InvalidMesh::PointCount {
                expected: self.points.nrows(),
                actual: points.nrows(),
            }
            .into());
        }
        self.points = points;
        Ok(())
    }

    /// Replace the connectivity. Cached shapes are dropped and the topology
    /// revision is bumped.
    pub fn replace_topology(
        &mut self,
        faces: Vec<Vec<usize>>,
        owner: Vec<usize>,
        neighbour: Vec<Option<usize>>,
    ) -> Result<(), Error> {
        let cell_faces = Self::check_and_address(&self.points, &faces, &owner, &neighbour)?;
        self.faces = faces;
        self.owner = owner;
        self.neighbour = neighbour;
        self.cell_faces = cell_faces;
        self.cell_shapes = None;
        self.revision += 1;
        Ok(())
    }

    pub fn points(&self) -> &Array2<f64> {
        &self.points
    }

    pub fn faces(&self) -> &[Vec<usize>] {
        &self.faces
    }

    pub fn owner(&self) -> &[usize] {
        &self.owner
    }

    pub fn neighbour(&self) -> &[Option<usize>] {
        &self.neighbour
    }

    /// unique points of a cell in ascending order
    pub fn cell_points(&self, celli: usize) -> Vec<usize> {
        let unique: HashSet<usize> = self.cell_faces[celli]
            .iter()
            .flat_map(|&facei| self.faces[facei].iter().copied())
            .collect();
        let mut points: Vec<usize> = unique.into_iter().collect();
        points.sort_unstable();
        points
    }

    fn check_and_address(
        points: &Array2<f64>,
        faces: &[Vec<usize>],
        owner: &[usize],
        neighbour: &[Option<usize>],
    ) -> Result<Vec<Vec<usize>>, Error> {
        if points.ncols() != 3 {
            return Err(InvalidMesh::PointColumns(points.ncols()).into());
        }
        if owner.len() != faces.len() || neighbour.len() != faces.len() {
            return Err(InvalidMesh::OwnerLength {
                faces: faces.len(),
                owners: owner.len().min(neighbour.len()),
            }
            .into());
        }

        let n_points = points.nrows();
        for (facei, face) in faces.iter().enumerate() {
            if let Some(&point) = face.iter().find(|&&p| p >= n_points) {
                return Err(InvalidMesh::PointOutOfRange {
                    face: facei,
                    point,
                    n_points,
                }
                .into());
            }
        }

        let n_cells = owner
            .iter()
            .copied()
            .chain(neighbour.iter().flatten().copied())
            .max()
            .map_or(0, |max| max + 1);

        let mut cell_faces = vec![Vec::new(); n_cells];
        for (facei, &own) in owner.iter().enumerate() {
            cell_faces[own].push(facei);
        }
        for (facei, nei) in neighbour.iter().enumerate() {
            if let Some(nei) = *nei {
                if nei == owner[facei] {
                    return Err(InvalidMesh::SelfNeighbour(facei).into());
                }
                cell_faces[nei].push(facei);
            }
        }

        Ok(cell_faces)
    }
}

impl VolumeMesh for PolyMesh {
    fn n_points(&self) -> usize {
        self.points.nrows()
    }

    fn n_cells(&self) -> usize {
        self.cell_faces.len()
    }

    fn n_faces(&self) -> usize {
        self.faces.len()
    }

    fn cell_faces(&self, celli: usize) -> &[usize] {
        &self.cell_faces[celli]
    }

    fn face_points(&self, facei: usize) -> &[usize] {
        &self.faces[facei]
    }

    fn face_owner(&self, facei: usize) -> usize {
        self.owner[facei]
    }

    fn point(&self, pointi: usize) -> Point {
        let row = self.points.row(pointi);
        [row[0], row[1], row[2]]
    }

    fn cell_shape(&self, celli: usize) -> Cow<'_, CellShape> {
        match &self.cell_shapes {
            Some(shapes) => Cow::Borrowed(&shapes[celli]),
            None => Cow::Owned(matcher::match_cell(self, celli)),
        }
    }

    fn cell_centre(&self, celli: usize) -> Point {
        let points = self.cell_points(celli);
        let mut centre = [0.0; 3];
        for &pointi in &points {
            let row = self.points.row(pointi);
            for (c, x) in centre.iter_mut().zip(row.iter()) {
                *c += x;
            }
        }
        let n = points.len().max(1) as f64;
        centre.map(|c| c / n)
    }

    fn topology_revision(&self) -> u64 {
        self.revision
    }
}
