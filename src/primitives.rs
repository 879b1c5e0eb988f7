//! Small indexed triangle meshes and their interleaved encoding.
//!
//! Encoded vertices are `position: f32 x 3`, `normal: f32 x 3`, `colour: u8 x 4`, so the
//! vertex stride is `VERTEX_STRIDE` bytes.

use std::convert::TryFrom;

use crate::buffers::{DataBuffer, IndexBuffer};
use crate::errors::*;

pub const VERTEX_STRIDE: usize = 3 * 4 + 3 * 4 + 4;
pub const TRIANGLE_BYTES: usize = 3 * 2;

pub type Vec3 = [f32; 3];
pub type Rgba = [u8; 4];

/// Positions, normals and triangle indices local to the primitive.
/// `normals` holds either one normal per position or a single normal shared by all of them.
#[derive(Debug, Clone, PartialEq)]
pub struct Primitive {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub triangles: Vec<[u16; 3]>,
}

impl Primitive {
    pub fn vertices_count(&self) -> usize {
        self.positions.len()
    }

    /// Vertex buffer bytes needed by `encode_primitive`.
    pub fn vertex_bytes(&self) -> usize {
        self.positions.len() * VERTEX_STRIDE
    }

    /// Index buffer bytes needed by `encode_primitive`.
    pub fn index_bytes(&self) -> usize {
        self.triangles.len() * TRIANGLE_BYTES
    }

    fn normal(&self, vertex: usize) -> Vec3 {
        if self.normals.len() == 1 {
            self.normals[0]
        } else {
            self.normals[vertex]
        }
    }

    pub fn translate(&mut self, dx: f32, dy: f32, dz: f32) {
        for p in &mut self.positions {
            p[0] += dx;
            p[1] += dy;
            p[2] += dz;
        }
    }

    /// Half turn around the z axis, then shifted back so it covers the same x/y extent.
    pub fn rotate_z180(&mut self) {
        let max_x = self.positions.iter().map(|p| p[0]).fold(f32::MIN, f32::max);
        let max_y = self.positions.iter().map(|p| p[1]).fold(f32::MIN, f32::max);
        for p in &mut self.positions {
            p[0] = -p[0];
            p[1] = -p[1];
        }
        for n in &mut self.normals {
            n[0] = -n[0];
            n[1] = -n[1];
        }
        self.translate(max_x, max_y, 0.0);
    }
}

/// Axis aligned box from the origin, four vertices and a normal per face.
pub fn cuboid(width: f32, depth: f32, height: f32) -> Primitive {
    let (w, d, h) = (width, depth, height);
    let faces: [([Vec3; 4], Vec3); 6] = [
        ([[0., 0., 0.], [w, 0., 0.], [w, 0., h], [0., 0., h]], [0., -1., 0.]),
        ([[w, 0., 0.], [w, 0., h], [w, d, 0.], [w, d, h]], [1., 0., 0.]),
        ([[0., d, 0.], [w, d, 0.], [w, d, h], [0., d, h]], [0., 1., 0.]),
        ([[0., 0., 0.], [0., 0., h], [0., d, 0.], [0., d, h]], [-1., 0., 0.]),
        ([[0., 0., h], [w, 0., h], [w, d, h], [0., d, h]], [0., 0., 1.]),
        ([[0., 0., 0.], [w, 0., 0.], [w, d, 0.], [0., d, 0.]], [0., 0., -1.]),
    ];
    let mut positions = Vec::with_capacity(24);
    let mut normals = Vec::with_capacity(24);
    for (corners, normal) in faces.iter() {
        positions.extend_from_slice(corners);
        normals.extend_from_slice(&[*normal; 4]);
    }
    Primitive {
        positions,
        normals,
        triangles: vec![[0, 1, 2], [0, 2, 3],
                        [4, 6, 5], [5, 6, 7],
                        [8, 10, 9], [8, 11, 10],
                        [12, 13, 14], [13, 15, 14],
                        [16, 17, 18], [16, 18, 19],
                        [20, 22, 21], [20, 23, 22]],
    }
}

fn quad(corners: [Vec3; 4], normal: Vec3) -> Primitive {
    Primitive {
        positions: corners.to_vec(),
        normals: vec![normal],
        triangles: vec![[0, 1, 2], [2, 1, 3]],
    }
}

/// Horizontal rectangle facing +z.
pub fn xy_plane(width: f32, depth: f32) -> Primitive {
    quad([[0., 0., 0.], [width, 0., 0.], [0., depth, 0.], [width, depth, 0.]],
         [0., 0., 1.])
}

/// Upright rectangle facing -y.
pub fn xz_plane(width: f32, height: f32) -> Primitive {
    quad([[0., 0., 0.], [width, 0., 0.], [0., 0., height], [width, 0., height]],
         [0., -1., 0.])
}

/// Upright rectangle facing -x.
pub fn yz_plane(depth: f32, height: f32) -> Primitive {
    quad([[0., 0., 0.], [0., 0., height], [0., depth, 0.], [0., depth, height]],
         [-1., 0., 0.])
}

/// Triangle from the origin to `second` and `third` with an explicit normal.
pub fn triangle(second: Vec3, third: Vec3, normal: Vec3) -> Primitive {
    Primitive {
        positions: vec![[0., 0., 0.], second, third],
        normals: vec![normal],
        triangles: vec![[0, 1, 2]],
    }
}

/// Square based pyramid with its apex above the centre of the base.
pub fn pyramid(width: f32, depth: f32, height: f32) -> Primitive {
    let x_angle = (height / (width / 2.0)).atan() + std::f32::consts::FRAC_PI_2;
    let (nx, nz1) = (x_angle.cos(), x_angle.sin());
    let y_angle = (height / (depth / 2.0)).atan() + std::f32::consts::FRAC_PI_2;
    let (ny, nz2) = (y_angle.cos(), y_angle.sin());
    let apex = [width / 2.0, depth / 2.0, height];
    let (a, b, c, d) = ([0., 0., 0.], [width, 0., 0.], [0., depth, 0.], [width, depth, 0.]);

    let mut normals = vec![[0., 0., -1.]; 4];
    normals.extend_from_slice(&[[nx, 0., nz1]; 3]);
    normals.extend_from_slice(&[[-nx, 0., nz1]; 3]);
    normals.extend_from_slice(&[[0., ny, nz2]; 3]);
    normals.extend_from_slice(&[[0., -ny, nz2]; 3]);
    Primitive {
        positions: vec![a, b, c, d, a, apex, c, b, d, apex, a, b, apex, c, apex, d],
        normals,
        triangles: vec![[0, 1, 2], [2, 1, 3], [4, 5, 6], [7, 8, 9], [10, 11, 12], [13, 14, 15]],
    }
}

/// Append `primitive` to the buffers: its vertices interleaved in `vertices`, its triangles
/// in `indices` shifted past every index written since the last clear.
///
/// # Panics
/// If the buffers were not reserved with room for `vertex_bytes` and `index_bytes`.
pub fn encode_primitive(primitive: &Primitive,
                        colour: Rgba,
                        vertices: &mut DataBuffer,
                        indices: &mut IndexBuffer)
                        -> Result<()> {
    let vertices_count = primitive.vertices_count();
    let normals_count = primitive.normals.len();
    if normals_count != 1 && normals_count != vertices_count {
        bail!(ErrorKind::MalformedPrimitive(vertices_count, normals_count));
    }

    let base = indices.next_index();
    let last = base + vertices_count as u32;
    if u16::try_from(last.saturating_sub(1)).is_err() {
        bail!(ErrorKind::IndexOutOfRange(last - 1));
    }
    let shifted = |i: u16| -> Result<u16> {
        let index = base + u32::from(i);
        if i as usize >= vertices_count {
            bail!(ErrorKind::IndexOutOfRange(index));
        }
        Ok(index as u16)
    };
    let triangles = primitive.triangles
        .iter()
        .map(|t| -> Result<[u16; 3]> { Ok([shifted(t[0])?, shifted(t[1])?, shifted(t[2])?]) })
        .collect::<Result<Vec<[u16; 3]>>>()?;

    for (i, p) in primitive.positions.iter().enumerate() {
        let n = primitive.normal(i);
        vertices.write_float32_triple(p[0], p[1], p[2]);
        vertices.write_float32_triple(n[0], n[1], n[2]);
        vertices.write_uint8_quad(colour[0], colour[1], colour[2], colour[3]);
    }
    for t in triangles {
        indices.write_uint16_triple(t[0], t[1], t[2]);
    }
    Ok(())
}
