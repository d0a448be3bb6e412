//! Topological matching of mesh cells against the reference models.
//!
//! The cell faces are first oriented outward (owner faces as stored, neighbour
//! faces reversed). One face of the cell is then aligned with the first face of
//! a model and the vertex correspondence is grown across shared edges: in a
//! closed, outward oriented cell every directed edge belongs to exactly one
//! face, so each model face whose edge is already mapped pins down exactly one
//! cell face. A match succeeds when every model face found its cell face.

use super::{ModelDef, CANONICAL};
use crate::mesh::{CellShape, VolumeMesh};
use hashbrown::HashMap;

/// Match cell `celli` of `mesh`, falling back to [`CellShape::unknown`]
pub fn match_cell<M: VolumeMesh + ?Sized>(mesh: &M, celli: usize) -> CellShape {
    let faces: Vec<Vec<usize>> = mesh
        .cell_faces(celli)
        .iter()
        .map(|&facei| {
            let mut points = mesh.face_points(facei).to_vec();
            if mesh.face_owner(facei) != celli {
                points.reverse();
            }
            points
        })
        .collect();

    if directed_edges(&faces).is_none() {
        log::warn!("cell {celli} is not a closed oriented surface, treating it as a polyhedron");
        return CellShape::unknown();
    }

    match_oriented(&faces).unwrap_or_else(CellShape::unknown)
}

/// Match a cell given by its outward oriented faces against every canonical model
pub fn match_oriented(faces: &[Vec<usize>]) -> Option<CellShape> {
    let edges = directed_edges(faces)?;

    CANONICAL
        .iter()
        .find_map(|(def, _)| match_model(def, faces, &edges))
}

/// directed edge -> (face, position of the edge start). `None` when an edge
/// repeats, which means the cell is not a closed oriented surface.
fn directed_edges(faces: &[Vec<usize>]) -> Option<HashMap<(usize, usize), (usize, usize)>> {
    let mut edges = HashMap::new();
    for (fi, face) in faces.iter().enumerate() {
        for (pos, &a) in face.iter().enumerate() {
            let b = face[(pos + 1) % face.len()];
            if edges.insert((a, b), (fi, pos)).is_some() {
                return None;
            }
        }
    }
    Some(edges)
}

fn match_model(
    def: &'static ModelDef,
    faces: &[Vec<usize>],
    edges: &HashMap<(usize, usize), (usize, usize)>,
) -> Option<CellShape> {
    if faces.len() != def.n_faces() {
        return None;
    }

    let mut model_sizes: Vec<usize> = def.faces.iter().map(|f| f.len()).collect();
    let mut cell_sizes: Vec<usize> = faces.iter().map(|f| f.len()).collect();
    model_sizes.sort_unstable();
    cell_sizes.sort_unstable();
    if model_sizes != cell_sizes {
        return None;
    }

    let first = def.faces[0];

    for (fi, face) in faces.iter().enumerate() {
        if face.len() != first.len() {
            continue;
        }
        for rotation in 0..face.len() {
            if let Some(points) = grow(def, faces, edges, fi, rotation) {
                return Some(CellShape::new(def, points));
            }
        }
    }

    None
}

/// try aligning model face 0 with cell face `start` at `rotation` and grow the
/// vertex correspondence over the remaining faces
fn grow(
    def: &ModelDef,
    faces: &[Vec<usize>],
    edges: &HashMap<(usize, usize), (usize, usize)>,
    start: usize,
    rotation: usize,
) -> Option<Vec<usize>> {
    let mut vertex: Vec<Option<usize>> = vec![None; def.n_points];
    let mut model_face_of: Vec<Option<usize>> = vec![None; def.n_faces()];
    let mut cell_face_used = vec![false; faces.len()];

    assign(def.faces[0], &faces[start], 0, rotation, &mut vertex)?;
    model_face_of[0] = Some(start);
    cell_face_used[start] = true;

    let mut progress = true;
    while progress {
        progress = false;

        for (mfi, mface) in def.faces.iter().enumerate() {
            if model_face_of[mfi].is_some() {
                continue;
            }

            // find an edge of this model face whose ends are both known
            let known = (0..mface.len()).find_map(|i| {
                let a = vertex[mface[i]]?;
                let b = vertex[mface[(i + 1) % mface.len()]]?;
                Some((i, a, b))
            });

            let (i, a, b) = match known {
                Some(x) => x,
                None => continue,
            };

            let &(cfi, pos) = edges.get(&(a, b))?;
            if cell_face_used[cfi] || faces[cfi].len() != mface.len() {
                return None;
            }

            assign(mface, &faces[cfi], i, pos, &mut vertex)?;
            model_face_of[mfi] = Some(cfi);
            cell_face_used[cfi] = true;
            progress = true;
        }
    }

    if model_face_of.iter().any(Option::is_none) {
        return None;
    }

    let points: Vec<usize> = vertex.into_iter().collect::<Option<_>>()?;

    // degenerate cells may map two model vertices onto one point
    let mut unique = points.clone();
    unique.sort_unstable();
    unique.dedup();
    if unique.len() != points.len() {
        return None;
    }

    Some(points)
}

/// map `mface[(mstart + j) % n]` onto `cface[(cstart + j) % n]` for every `j`,
/// failing on any conflict with an existing assignment
fn assign(
    mface: &[usize],
    cface: &[usize],
    mstart: usize,
    cstart: usize,
    vertex: &mut [Option<usize>],
) -> Option<()> {
    let n = mface.len();
    for j in 0..n {
        let model_vertex = mface[(mstart + j) % n];
        let point = cface[(cstart + j) % n];
        match vertex[model_vertex] {
            Some(existing) if existing != point => return None,
            Some(_) => {}
            None => {
                if vertex.iter().any(|v| *v == Some(point)) {
                    return None;
                }
                vertex[model_vertex] = Some(point);
            }
        }
    }
    Some(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{classify, CellModel, HEX, PRISM, PYR, TET, TETWEDGE, WEDGE};

    /// faces of a reference model relabelled through `labels`
    fn relabel(def: &ModelDef, labels: &[usize]) -> Vec<Vec<usize>> {
        def.faces
            .iter()
            .map(|f| f.iter().map(|&v| labels[v]).collect())
            .collect()
    }

    #[test]
    fn reference_models_match_themselves() {
        for def in [&HEX, &PRISM, &PYR, &TET, &WEDGE, &TETWEDGE] {
            let labels: Vec<usize> = (0..def.n_points).map(|i| 100 + 3 * i).collect();
            let faces = relabel(def, &labels);
            let shape = match_oriented(&faces).unwrap();
            assert!(std::ptr::eq(shape.model, def), "{}", def.name);
            // the matched order must reproduce the model faces
            let rebuilt = relabel(def, &shape.points);
            for face in rebuilt {
                assert!(faces.iter().any(|f| same_cycle(f, &face)), "{}", def.name);
            }
        }
    }

    #[test]
    fn shuffled_hex_faces_still_match() {
        let labels = [7, 3, 9, 1, 4, 0, 8, 2];
        let mut faces = relabel(&HEX, &labels);
        faces.reverse();
        faces[2].rotate_left(1);
        let shape = match_oriented(&faces).unwrap();
        assert_eq!(classify(&shape), CellModel::Hex);
    }

    #[test]
    fn inward_faces_do_not_match() {
        let labels: Vec<usize> = (0..8).collect();
        let mut faces = relabel(&HEX, &labels);
        faces[0].reverse();
        assert!(match_oriented(&faces).is_none());
    }

    #[test]
    fn pentagonal_prism_is_unknown() {
        let faces = vec![
            vec![0, 4, 3, 2, 1],
            vec![5, 6, 7, 8, 9],
            vec![0, 1, 6, 5],
            vec![1, 2, 7, 6],
            vec![2, 3, 8, 7],
            vec![3, 4, 9, 8],
            vec![4, 0, 5, 9],
        ];
        assert!(match_oriented(&faces).is_none());
    }

    fn same_cycle(a: &[usize], b: &[usize]) -> bool {
        let n = a.len();
        n == b.len() && (0..n).any(|r| (0..n).all(|i| a[(r + i) % n] == b[i]))
    }
}
