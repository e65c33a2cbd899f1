//! Vertex post-processing run after a mesh is read.

use crate::{ImportOptions, Mesh, Vertex};

const DEGENERATE_UV_EPSILON: f32 = 1e-12;

pub fn apply(mesh: &mut Mesh, options: &ImportOptions, bottom_left_uvs: bool) {
    firestorm::profile_fn!(apply);

    if options.flip_uvs && bottom_left_uvs {
        flip_uvs(&mut mesh.vertices);
    }
    if options.generate_normals {
        generate_smooth_normals(&mut mesh.vertices, &mesh.indices);
    }
    if options.calc_tangents {
        calc_tangents(&mut mesh.vertices, &mesh.indices);
    }
}

pub fn flip_uvs(vertices: &mut [Vertex]) {
    for vertex in vertices {
        vertex.tex_coords.y = 1. - vertex.tex_coords.y;
    }
}

fn triangles(indices: &[u32]) -> impl Iterator<Item = [usize; 3]> + '_ {
    indices
        .chunks_exact(3)
        .map(|tri| [tri[0] as usize, tri[1] as usize, tri[2] as usize])
}

/// Area-weighted smooth normals for every vertex whose normal is zero.
/// Vertices that already carry a normal are left alone.
pub fn generate_smooth_normals(vertices: &mut [Vertex], indices: &[u32]) {
    let missing = vertices
        .iter()
        .map(|v| v.normal == glam::Vec3::ZERO)
        .collect::<Vec<_>>();
    if !missing.contains(&true) {
        return;
    }

    let mut accumulated = vec![glam::Vec3::ZERO; vertices.len()];
    for [a, b, c] in triangles(indices) {
        let (Some(pa), Some(pb), Some(pc)) = (vertices.get(a), vertices.get(b), vertices.get(c))
        else {
            continue;
        };
        // unnormalized cross product is proportional to triangle area
        let face_normal = (pb.position - pa.position).cross(pc.position - pa.position);
        for idx in [a, b, c] {
            accumulated[idx] += face_normal;
        }
    }

    for ((vertex, normal), missing) in vertices.iter_mut().zip(accumulated).zip(missing) {
        if missing {
            vertex.normal = normal.normalize_or_zero();
        }
    }
}

/// Per-vertex tangent frame from position and UV deltas, orthogonalized
/// against the normal. Triangles with degenerate UVs contribute nothing.
pub fn calc_tangents(vertices: &mut [Vertex], indices: &[u32]) {
    let mut tangents = vec![glam::Vec3::ZERO; vertices.len()];
    let mut bitangents = vec![glam::Vec3::ZERO; vertices.len()];

    for [a, b, c] in triangles(indices) {
        let (Some(va), Some(vb), Some(vc)) = (vertices.get(a), vertices.get(b), vertices.get(c))
        else {
            continue;
        };
        let edge1 = vb.position - va.position;
        let edge2 = vc.position - va.position;
        let duv1 = vb.tex_coords - va.tex_coords;
        let duv2 = vc.tex_coords - va.tex_coords;

        let det = duv1.x * duv2.y - duv2.x * duv1.y;
        if det.abs() < DEGENERATE_UV_EPSILON {
            continue;
        }
        let r = det.recip();
        let tangent = (edge1 * duv2.y - edge2 * duv1.y) * r;
        let bitangent = (edge2 * duv1.x - edge1 * duv2.x) * r;

        for idx in [a, b, c] {
            tangents[idx] += tangent;
            bitangents[idx] += bitangent;
        }
    }

    for ((vertex, tangent), bitangent) in vertices.iter_mut().zip(tangents).zip(bitangents) {
        let n = vertex.normal;
        let tangent = if n == glam::Vec3::ZERO {
            tangent
        } else {
            tangent - n * n.dot(tangent)
        };
        vertex.tangent = tangent.normalize_or_zero();
        vertex.bitangent = bitangent.normalize_or_zero();
    }
}

/// Strip `a b c d e` becomes `abc bdc cde`, keeping a consistent winding.
/// Degenerate triangles used to stitch strips are dropped.
pub fn triangulate_strip(indices: &[u32]) -> Vec<u32> {
    indices
        .windows(3)
        .enumerate()
        .map(|(i, w)| {
            if i % 2 == 0 {
                [w[0], w[1], w[2]]
            } else {
                [w[1], w[0], w[2]]
            }
        })
        .filter(|[a, b, c]| a != b && b != c && a != c)
        .flatten()
        .collect()
}

/// Fan `a b c d` becomes `abc acd`.
pub fn triangulate_fan(indices: &[u32]) -> Vec<u32> {
    let Some((&hub, rest)) = indices.split_first() else {
        return Vec::new();
    };
    rest.windows(2)
        .flat_map(|w| [hub, w[0], w[1]])
        .collect()
}
