//! Index bookkeeping that ties output cells and points back to the mesh they
//! were transcribed from.

use crate::error::IncompleteMapping;
use crate::Error;

/// Maps from output cells and points to the cells and points of the source mesh
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MeshMaps {
    cell_map: Vec<usize>,
    point_map: Vec<usize>,
    additional_ids: Vec<usize>,
}

impl MeshMaps {
    /// Maps produced by one population pass. The point map starts empty,
    /// meaning points are not renumbered.
    pub fn new(cell_map: Vec<usize>, additional_ids: Vec<usize>) -> Self {
        Self {
            cell_map,
            point_map: Vec::new(),
            additional_ids,
        }
    }

    /// output cell -> source cell, one entry per output cell
    pub fn cell_map(&self) -> &[usize] {
        &self.cell_map
    }

    /// output point -> source point, empty when points are not renumbered
    pub fn point_map(&self) -> &[usize] {
        &self.point_map
    }

    /// additional point -> source cell it was created for
    pub fn additional_ids(&self) -> &[usize] {
        &self.additional_ids
    }

    /// Rewrite the cell map and the additional point ids through `mapping`
    /// (old cell index -> new cell index).
    ///
    /// Every current value must have an entry in `mapping`; nothing is
    /// changed when one does not.
    pub fn renumber_cells(&mut self, mapping: &[usize]) -> Result<(), Error> {
        check_total("cellMap", &self.cell_map, mapping)?;
        check_total("additionalIds", &self.additional_ids, mapping)?;

        apply(&mut self.cell_map, mapping);
        apply(&mut self.additional_ids, mapping);
        Ok(())
    }

    /// Compose the point map with `mapping` (old point index -> new point
    /// index). On an empty point map the mapping is taken as is, unless it is
    /// the identity.
    pub fn renumber_points(&mut self, mapping: &[usize]) -> Result<(), Error> {
        if self.point_map.is_empty() {
            if !is_identity(mapping) {
                self.point_map = mapping.to_vec();
            }
            return Ok(());
        }

        check_total("pointMap", &self.point_map, mapping)?;
        apply(&mut self.point_map, mapping);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.cell_map.clear();
        self.point_map.clear();
        self.additional_ids.clear();
    }
}

fn check_total(
    map: &'static str,
    values: &[usize],
    mapping: &[usize],
) -> Result<(), IncompleteMapping> {
    match values.iter().position(|&v| v >= mapping.len()) {
        Some(position) => Err(IncompleteMapping::new(
            map,
            position,
            values[position],
            mapping.len(),
        )),
        None => Ok(()),
    }
}

fn apply(values: &mut [usize], mapping: &[usize]) {
    values.iter_mut().for_each(|v| *v = mapping[*v]);
}

fn is_identity(mapping: &[usize]) -> bool {
    mapping.iter().enumerate().all(|(i, &v)| i == v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells_compose_through_mapping() {
        let mut maps = MeshMaps::new(vec![0, 1, 2, 1, 1], vec![1]);
        maps.renumber_cells(&[10, 20, 30]).unwrap();
        assert_eq!(maps.cell_map(), &[10, 20, 30, 20, 20]);
        assert_eq!(maps.additional_ids(), &[20]);
    }

    #[test]
    fn identity_changes_nothing() {
        let mut maps = MeshMaps::new(vec![2, 0, 1], vec![]);
        let before = maps.clone();
        maps.renumber_cells(&[0, 1, 2]).unwrap();
        maps.renumber_points(&[0, 1, 2, 3]).unwrap();
        maps.renumber_points(&[0, 1, 2, 3]).unwrap();
        assert_eq!(maps, before);
    }

    #[test]
    fn short_mapping_fails_without_changes() {
        let mut maps = MeshMaps::new(vec![0, 1], vec![3]);
        let before = maps.clone();
        let err = maps.renumber_cells(&[5, 6]).unwrap_err();
        match err {
            Error::IncompleteMapping(e) => {
                assert_eq!(e.map, "additionalIds");
                assert_eq!(e.value, 3);
            }
            other => panic!("unexpected error {other}"),
        }
        assert_eq!(maps, before);
    }

    #[test]
    fn points_compose() {
        let mut maps = MeshMaps::default();
        maps.renumber_points(&[4, 5, 6]).unwrap();
        assert_eq!(maps.point_map(), &[4, 5, 6]);

        let mut global = vec![0; 7];
        global[4] = 40;
        global[5] = 50;
        global[6] = 60;
        maps.renumber_points(&global).unwrap();
        assert_eq!(maps.point_map(), &[40, 50, 60]);

        assert!(maps.renumber_points(&[1, 2]).is_err());
    }
}
