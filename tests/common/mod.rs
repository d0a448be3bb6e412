#![allow(dead_code)]

use vtk_cells::model::{HEX, PRISM};
use vtk_cells::ndarray::Array2;
use vtk_cells::PolyMesh;

/// outward faces of a reference model with its vertices relabelled
pub fn model_faces(faces: &[&[usize]], labels: &[usize]) -> Vec<Vec<usize>> {
    faces
        .iter()
        .map(|f| f.iter().map(|&v| labels[v]).collect())
        .collect()
}

pub fn points(coords: &[[f64; 3]]) -> Array2<f64> {
    let flat: Vec<f64> = coords.iter().flatten().copied().collect();
    Array2::from_shape_vec((coords.len(), 3), flat).unwrap()
}

pub fn unit_cube() -> Vec<[f64; 3]> {
    vec![
        [0., 0., 0.],
        [1., 0., 0.],
        [1., 1., 0.],
        [0., 1., 0.],
        [0., 0., 1.],
        [1., 0., 1.],
        [1., 1., 1.],
        [0., 1., 1.],
    ]
}

pub fn hex_faces(labels: &[usize]) -> Vec<Vec<usize>> {
    model_faces(HEX.faces, labels)
}

pub fn single_hex() -> PolyMesh {
    PolyMesh::from_cells(points(&unit_cube()), &[hex_faces(&[0, 1, 2, 3, 4, 5, 6, 7])]).unwrap()
}

pub fn single_prism() -> PolyMesh {
    let coords = [
        [0., 0., 0.],
        [1., 0., 0.],
        [0., 1., 0.],
        [0., 0., 1.],
        [1., 0., 1.],
        [0., 1., 1.],
    ];
    PolyMesh::from_cells(points(&coords), &[model_faces(PRISM.faces, &[0, 1, 2, 3, 4, 5])]).unwrap()
}

/// Corner points and outward faces of a prism over a regular `n`-gon,
/// bottom points `offset..offset + n`, top points after those.
pub fn ngon_prism(n: usize, height: f64, offset: usize) -> (Vec<[f64; 3]>, Vec<Vec<usize>>) {
    let mut coords = Vec::with_capacity(2 * n);
    for z in [0.0, height] {
        for i in 0..n {
            let angle = 2.0 * std::f64::consts::PI * i as f64 / n as f64;
            coords.push([angle.cos(), angle.sin(), z]);
        }
    }

    let bottom = |i: usize| offset + i % n;
    let top = |i: usize| offset + n + i % n;

    let mut faces = Vec::with_capacity(n + 2);
    faces.push((0..n).rev().map(bottom).collect());
    faces.push((0..n).map(top).collect());
    for i in 0..n {
        faces.push(vec![bottom(i), bottom(i + 1), top(i + 1), top(i)]);
    }
    (coords, faces)
}

/// `nx * ny * nz` unit hexahedra, cells ordered x fastest
pub fn block(nx: usize, ny: usize, nz: usize) -> PolyMesh {
    let id = |i: usize, j: usize, k: usize| i + (nx + 1) * (j + (ny + 1) * k);

    let mut coords = Vec::new();
    for k in 0..=nz {
        for j in 0..=ny {
            for i in 0..=nx {
                coords.push([i as f64, j as f64, k as f64]);
            }
        }
    }

    let mut cells = Vec::new();
    for k in 0..nz {
        for j in 0..ny {
            for i in 0..nx {
                let labels = [
                    id(i, j, k),
                    id(i + 1, j, k),
                    id(i + 1, j + 1, k),
                    id(i, j + 1, k),
                    id(i, j, k + 1),
                    id(i + 1, j, k + 1),
                    id(i + 1, j + 1, k + 1),
                    id(i, j + 1, k + 1),
                ];
                cells.push(hex_faces(&labels));
            }
        }
    }

    PolyMesh::from_cells(points(&coords), &cells).unwrap()
}

/// A hex, a prism and a pentagonal prism, not touching each other
pub fn mixed() -> PolyMesh {
    let mut coords = unit_cube();
    let hex = hex_faces(&[0, 1, 2, 3, 4, 5, 6, 7]);

    coords.extend_from_slice(&[
        [2., 0., 0.],
        [3., 0., 0.],
        [2., 1., 0.],
        [2., 0., 1.],
        [3., 0., 1.],
        [2., 1., 1.],
    ]);
    let prism = model_faces(PRISM.faces, &[8, 9, 10, 11, 12, 13]);

    let (ngon, poly) = ngon_prism(5, 1.0, 14);
    coords.extend(ngon.into_iter().map(|[x, y, z]| [x + 5.0, y, z]));

    PolyMesh::from_cells(points(&coords), &[hex, prism, poly]).unwrap()
}

/// signed volume of a tet, positive when `d` is on the normal side of `a b c`
pub fn tet_volume(p: &[[f64; 3]], a: usize, b: usize, c: usize, d: usize) -> f64 {
    let sub = |x: [f64; 3], y: [f64; 3]| [x[0] - y[0], x[1] - y[1], x[2] - y[2]];
    let u = sub(p[b], p[a]);
    let v = sub(p[c], p[a]);
    let w = sub(p[d], p[a]);
    (u[0] * (v[1] * w[2] - v[2] * w[1]) - u[1] * (v[0] * w[2] - v[2] * w[0])
        + u[2] * (v[0] * w[1] - v[1] * w[0]))
        / 6.0
}
