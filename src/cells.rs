use crate::decompose::FaceSplit;
use crate::error::ConfigMismatch;
use crate::maps::MeshMaps;
use crate::mesh::{Point, VolumeMesh};
use crate::populate::{self, CellArrays};
use crate::sizing::{ContentType, Sizing};
use crate::{Error, Label};

/// How a mesh is transcribed into unstructured grid arrays
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VtuOptions {
    pub content: ContentType,
    pub decompose: bool,
    pub face_split: FaceSplit,
}

impl VtuOptions {
    pub fn content(mut self, content: ContentType) -> Self {
        self.content = content;
        self
    }

    pub fn decompose(mut self, decompose: bool) -> Self {
        self.decompose = decompose;
        self
    }

    pub fn face_split(mut self, face_split: FaceSplit) -> Self {
        self.face_split = face_split;
        self
    }
}

/// Unstructured grid cell arrays for one mesh.
///
/// `VtuCells` owns the sizing, the populated arrays and the maps back to the
/// source mesh, and is what the writers read from. Every (re)population
/// recreates the arrays and maps from scratch; renumbering applied before a
/// repopulation is lost.
///
/// ```
/// use vtk_cells::{ContentType, PolyMesh, VtuCells, VtuOptions};
/// use vtk_cells::ndarray::array;
///
/// let points = array![[0., 0., 0.], [1., 0., 0.], [0., 1., 0.], [0., 0., 1.]];
/// let tet = vec![vec![1, 2, 3], vec![0, 3, 2], vec![0, 1, 3], vec![0, 2, 1]];
/// let mesh = PolyMesh::from_cells(points, &[tet]).unwrap();
///
/// let cells: VtuCells = VtuCells::from_mesh(&mesh, VtuOptions::default()).unwrap();
/// assert_eq!(cells.content(), ContentType::Xml);
/// assert_eq!(cells.cell_types(), &[10]);
/// assert_eq!(cells.cells_offsets(), &[4]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct VtuCells<L: Label = i64> {
    options: VtuOptions,
    sizing: Sizing,
    arrays: CellArrays<L>,
    maps: MeshMaps,
    /// local cells the additional points were created for
    apex_cells: Vec<usize>,
    revision: Option<u64>,
}

impl<L: Label> VtuCells<L> {
    /// Empty arrays, populated by the first [`reset`](Self::reset) or
    /// [`update`](Self::update)
    pub fn new(options: VtuOptions) -> Self {
        Self {
            options,
            sizing: Sizing::default(),
            arrays: CellArrays::default(),
            maps: MeshMaps::default(),
            apex_cells: Vec::new(),
            revision: None,
        }
    }

    pub fn from_mesh<M: VolumeMesh + ?Sized>(mesh: &M, options: VtuOptions) -> Result<Self, Error> {
        let mut cells = Self::new(options);
        cells.repopulate(mesh, options)?;
        Ok(cells)
    }

    /// Size and populate the arrays for `mesh` with a new content type and
    /// decompose setting. On failure the previous arrays and options stay.
    pub fn reset<M: VolumeMesh + ?Sized>(
        &mut self,
        mesh: &M,
        content: ContentType,
        decompose: bool,
    ) -> Result<(), Error> {
        let options = self.options.content(content).decompose(decompose);
        self.repopulate(mesh, options)
    }

    pub fn reset_with<M: VolumeMesh + ?Sized>(
        &mut self,
        mesh: &M,
        options: VtuOptions,
    ) -> Result<(), Error> {
        self.repopulate(mesh, options)
    }

    /// Populate from a sizing computed elsewhere, for example one shared by
    /// several content types. The sizing must carry the decompose setting
    /// of the current options.
    pub fn reset_sized<M: VolumeMesh + ?Sized>(
        &mut self,
        mesh: &M,
        sizing: Sizing,
    ) -> Result<(), Error> {
        if sizing.decompose() != self.options.decompose {
            return Err(ConfigMismatch::Decompose {
                sizing: sizing.decompose(),
                requested: self.options.decompose,
            }
            .into());
        }
        let options = self.options.face_split(sizing.face_split());
        self.populate_sized(mesh, sizing, options)
    }

    /// Repopulate when the mesh topology changed since the last population.
    /// Returns whether anything was repopulated.
    pub fn update<M: VolumeMesh + ?Sized>(&mut self, mesh: &M) -> Result<bool, Error> {
        if self.revision == Some(mesh.topology_revision()) {
            return Ok(false);
        }
        self.repopulate(mesh, self.options)?;
        Ok(true)
    }

    fn repopulate<M: VolumeMesh + ?Sized>(
        &mut self,
        mesh: &M,
        options: VtuOptions,
    ) -> Result<(), Error> {
        let sizing = Sizing::compute(mesh, options.decompose, options.face_split)?;
        self.populate_sized(mesh, sizing, options)
    }

    /// Nothing is stored unless population succeeds, so the options always
    /// describe the arrays held.
    fn populate_sized<M: VolumeMesh + ?Sized>(
        &mut self,
        mesh: &M,
        sizing: Sizing,
        options: VtuOptions,
    ) -> Result<(), Error> {
        let (arrays, maps) = populate::populate(mesh, &sizing, options.content)?;

        self.options = options;
        self.apex_cells = maps.additional_ids().to_vec();
        self.sizing = sizing;
        self.arrays = arrays;
        self.maps = maps;
        self.revision = Some(mesh.topology_revision());
        Ok(())
    }

    /// see [`MeshMaps::renumber_cells`]
    pub fn renumber_cells(&mut self, mapping: &[usize]) -> Result<(), Error> {
        self.maps.renumber_cells(mapping)
    }

    /// see [`MeshMaps::renumber_points`]
    pub fn renumber_points(&mut self, mapping: &[usize]) -> Result<(), Error> {
        self.maps.renumber_points(mapping)
    }

    /// Coordinates of the additional points, the centres of the decomposed
    /// cells of `mesh`. `mesh` must be the mesh last populated from, though
    /// its points may have moved since.
    pub fn additional_points<M: VolumeMesh + ?Sized>(&self, mesh: &M) -> Vec<Point> {
        self.apex_cells.iter().map(|&celli| mesh.cell_centre(celli)).collect()
    }

    /// mesh points followed by the additional points
    pub fn field_points<M: VolumeMesh + ?Sized>(&self, mesh: &M) -> Vec<Point> {
        let mut points = Vec::with_capacity(self.sizing.n_field_points());
        points.extend((0..mesh.n_points()).map(|pointi| mesh.point(pointi)));
        points.extend(self.additional_points(mesh));
        points
    }

    pub fn options(&self) -> &VtuOptions {
        &self.options
    }

    pub fn content(&self) -> ContentType {
        self.options.content
    }

    pub fn sizing(&self) -> &Sizing {
        &self.sizing
    }

    pub fn n_field_cells(&self) -> usize {
        self.arrays.cell_types.len()
    }

    pub fn cell_types(&self) -> &[u8] {
        &self.arrays.cell_types
    }

    pub fn cells(&self) -> &[L] {
        &self.arrays.cells
    }

    pub fn cells_offsets(&self) -> &[L] {
        &self.arrays.cells_offsets
    }

    pub fn faces(&self) -> &[L] {
        &self.arrays.faces
    }

    pub fn faces_offsets(&self) -> &[L] {
        &self.arrays.faces_offsets
    }

    pub fn arrays(&self) -> &CellArrays<L> {
        &self.arrays
    }

    pub fn maps(&self) -> &MeshMaps {
        &self.maps
    }

    pub fn cell_map(&self) -> &[usize] {
        self.maps.cell_map()
    }

    pub fn point_map(&self) -> &[usize] {
        self.maps.point_map()
    }

    pub fn additional_ids(&self) -> &[usize] {
        self.maps.additional_ids()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::PolyMesh;
    use ndarray::array;

    fn tet_mesh() -> PolyMesh {
        let points = array![[0., 0., 0.], [1., 0., 0.], [0., 1., 0.], [0., 0., 1.]];
        let tet = vec![vec![1, 2, 3], vec![0, 3, 2], vec![0, 1, 3], vec![0, 2, 1]];
        PolyMesh::from_cells(points, &[tet]).unwrap()
    }

    #[test]
    fn update_follows_topology_revision() {
        let mut mesh = tet_mesh();
        let mut cells: VtuCells<i32> = VtuCells::new(VtuOptions::default());
        assert!(cells.update(&mesh).unwrap());
        assert!(!cells.update(&mesh).unwrap());

        mesh.move_points(array![[0., 0., 0.], [2., 0., 0.], [0., 2., 0.], [0., 0., 2.]])
            .unwrap();
        assert!(!cells.update(&mesh).unwrap());

        let (faces, owner, neighbour) = (
            mesh.faces().to_vec(),
            mesh.owner().to_vec(),
            mesh.neighbour().to_vec(),
        );
        mesh.replace_topology(faces, owner, neighbour).unwrap();
        assert!(cells.update(&mesh).unwrap());
    }

    #[test]
    fn foreign_sizing_must_agree_on_decompose() {
        let mesh = tet_mesh();
        let sizing = Sizing::compute(&mesh, true, FaceSplit::default()).unwrap();
        let mut cells: VtuCells = VtuCells::new(VtuOptions::default());
        let err = cells.reset_sized(&mesh, sizing).unwrap_err();
        assert!(matches!(err, Error::ConfigMismatch(ConfigMismatch::Decompose { .. })));

        cells.reset_with(&mesh, VtuOptions::default().decompose(true)).unwrap();
        assert!(cells.reset_sized(&mesh, sizing).is_ok());
    }

    #[test]
    fn reset_switches_content() {
        let mesh = tet_mesh();
        let mut cells: VtuCells = VtuCells::from_mesh(&mesh, VtuOptions::default()).unwrap();
        cells.reset(&mesh, ContentType::Legacy, false).unwrap();
        assert_eq!(cells.cells(), &[4, 0, 1, 2, 3]);
        assert!(cells.cells_offsets().is_empty());
        assert_eq!(cells.field_points(&mesh).len(), 4);
    }

    #[test]
    fn failed_reset_keeps_previous_layout() {
        let mesh = tet_mesh();
        let mut cells: VtuCells = VtuCells::from_mesh(&mesh, VtuOptions::default()).unwrap();

        let points = array![[0., 0., 0.], [1., 0., 0.], [0., 1., 0.], [0., 0., 1.]];
        let faces = vec![vec![0, 2, 1], vec![0, 1, 3], vec![1, 2, 3], vec![0, 3]];
        let broken = PolyMesh::new(points, faces, vec![0; 4], vec![None; 4]).unwrap();

        assert!(cells.reset(&broken, ContentType::Legacy, true).is_err());
        assert_eq!(cells.content(), ContentType::Xml);
        assert!(!cells.options().decompose);
        assert_eq!(cells.cells(), &[0, 1, 2, 3]);
        assert_eq!(cells.cells_offsets(), &[4]);

        // the arrays are still xml, so the legacy writer must refuse them
        let points = cells.field_points(&mesh);
        let err = crate::write::write_legacy(Vec::new(), "tet", &points, &cells).unwrap_err();
        assert!(matches!(err, Error::ConfigMismatch(ConfigMismatch::WriterContent { .. })));

        let internal = VtuOptions::default().content(ContentType::Internal1);
        assert!(cells.reset_with(&broken, internal).is_err());
        assert_eq!(cells.content(), ContentType::Xml);
    }
}
