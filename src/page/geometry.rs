//! Page mesh geometry.
//!
//! A page is a thin box whose long axis runs from the hinge at x = 0 to
//! x = `width`. The front, back, top and bottom faces are subdivided into one
//! column per segment so the mesh can bend, and every vertex is bound to the
//! two nearest bones of the page rig.

use super::material::MaterialSlot;
use crate::config::PageDimensions;
use glam::Vec3;

/// Up to two bone influences for a vertex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkinBinding {
    /// Bone indices.
    pub joints: [u16; 2],
    /// Weights for `joints`, summing to 1.
    pub weights: [f32; 2],
}

impl SkinBinding {
    /// Bind a vertex at `x` along the long axis.
    ///
    /// The vertex blends linearly between the bone at the start of its
    /// segment and the next bone. Vertices exactly on a segment boundary get
    /// a 0/1 split; both neighbouring bones agree there so no crease appears.
    pub fn at(x: f32, segment_width: f32, segments: usize) -> Self {
        let last = segments.saturating_sub(1);
        let segment = ((x / segment_width).floor().max(0.0) as usize).min(last);
        let local = ((x - segment as f32 * segment_width) / segment_width).clamp(0.0, 1.0);
        Self {
            joints: [segment as u16, (segment + 1) as u16],
            weights: [1.0 - local, local],
        }
    }

    /// Joint indices padded to four influences (glTF JOINTS_0 layout).
    pub fn joints4(&self) -> [u16; 4] {
        [self.joints[0], self.joints[1], 0, 0]
    }

    /// Weights padded to four influences (glTF WEIGHTS_0 layout).
    pub fn weights4(&self) -> [f32; 4] {
        [self.weights[0], self.weights[1], 0.0, 0.0]
    }
}

/// A vertex in a page mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    /// Position in page space (bind pose).
    pub position: [f32; 3],
    /// Normal vector.
    pub normal: [f32; 3],
    /// Texture coordinates.
    pub uv: [f32; 2],
    pub skin: SkinBinding,
}

impl Vertex {
    pub fn new(position: [f32; 3], normal: [f32; 3], uv: [f32; 2], skin: SkinBinding) -> Self {
        Self {
            position,
            normal,
            uv,
            skin,
        }
    }
}

/// A contiguous index range drawn with one material slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceGroup {
    pub slot: MaterialSlot,
    /// First index into `PageMesh::indices`.
    pub start: usize,
    /// Number of indices.
    pub count: usize,
}

/// A triangle mesh with per-slot index groups.
#[derive(Debug, Clone, Default)]
pub struct PageMesh {
    /// Vertex data.
    pub vertices: Vec<Vertex>,
    /// Triangle indices (3 per triangle).
    pub indices: Vec<u32>,
    /// One group per material slot, in slot order.
    pub groups: Vec<FaceGroup>,
}

impl PageMesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a vertex and return its index.
    pub fn add_vertex(&mut self, vertex: Vertex) -> u32 {
        let index = self.vertices.len() as u32;
        self.vertices.push(vertex);
        index
    }

    /// Add a triangle by vertex indices.
    pub fn add_triangle(&mut self, i0: u32, i1: u32, i2: u32) {
        self.indices.push(i0);
        self.indices.push(i1);
        self.indices.push(i2);
    }

    /// Add a quad whose vertices run counter-clockwise seen from the front.
    pub fn add_quad(&mut self, i0: u32, i1: u32, i2: u32, i3: u32) {
        self.add_triangle(i0, i1, i2);
        self.add_triangle(i0, i2, i3);
    }

    /// Get the number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Get the number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Check if the mesh is empty.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Index range drawn with `slot`.
    pub fn group(&self, slot: MaterialSlot) -> Option<&FaceGroup> {
        self.groups.iter().find(|g| g.slot == slot)
    }

    /// Get positions as a flat array (for glTF export).
    pub fn positions_flat(&self) -> Vec<f32> {
        self.vertices.iter().flat_map(|v| v.position).collect()
    }

    /// Get normals as a flat array (for glTF export).
    pub fn normals_flat(&self) -> Vec<f32> {
        self.vertices.iter().flat_map(|v| v.normal).collect()
    }

    /// Get UVs as a flat array (for glTF export).
    pub fn uvs_flat(&self) -> Vec<f32> {
        self.vertices.iter().flat_map(|v| v.uv).collect()
    }

    /// Get joint indices as a flat array (for glTF export).
    pub fn joints_flat(&self) -> Vec<u16> {
        self.vertices.iter().flat_map(|v| v.skin.joints4()).collect()
    }

    /// Get skin weights as a flat array (for glTF export).
    pub fn weights_flat(&self) -> Vec<f32> {
        self.vertices.iter().flat_map(|v| v.skin.weights4()).collect()
    }
}

/// One side of the page box: a grid spanned by two edges from a corner.
#[derive(Clone, Copy)]
struct Face {
    slot: MaterialSlot,
    corner: Vec3,
    u_edge: Vec3,
    v_edge: Vec3,
    u_segments: usize,
    normal: Vec3,
}

/// Builds the subdivided box mesh for one page.
pub struct PageGeometryBuilder {
    dims: PageDimensions,
}

impl PageGeometryBuilder {
    pub fn new(dims: PageDimensions) -> Self {
        Self { dims }
    }

    pub fn build(&self) -> PageMesh {
        let PageDimensions {
            width: w,
            height: h,
            thickness: t,
            segments,
        } = self.dims;
        let hh = h * 0.5;
        let ht = t * 0.5;

        // u x v points along the normal so quads wind counter-clockwise.
        let faces = [
            Face {
                slot: MaterialSlot::Top,
                corner: Vec3::new(0.0, hh, ht),
                u_edge: Vec3::new(w, 0.0, 0.0),
                v_edge: Vec3::new(0.0, 0.0, -t),
                u_segments: segments,
                normal: Vec3::Y,
            },
            Face {
                slot: MaterialSlot::Bottom,
                corner: Vec3::new(0.0, -hh, -ht),
                u_edge: Vec3::new(w, 0.0, 0.0),
                v_edge: Vec3::new(0.0, 0.0, t),
                u_segments: segments,
                normal: Vec3::NEG_Y,
            },
            Face {
                slot: MaterialSlot::Left,
                corner: Vec3::new(0.0, -hh, -ht),
                u_edge: Vec3::new(0.0, 0.0, t),
                v_edge: Vec3::new(0.0, h, 0.0),
                u_segments: 1,
                normal: Vec3::NEG_X,
            },
            Face {
                slot: MaterialSlot::Right,
                corner: Vec3::new(w, -hh, ht),
                u_edge: Vec3::new(0.0, 0.0, -t),
                v_edge: Vec3::new(0.0, h, 0.0),
                u_segments: 1,
                normal: Vec3::X,
            },
            Face {
                slot: MaterialSlot::Front,
                corner: Vec3::new(0.0, -hh, ht),
                u_edge: Vec3::new(w, 0.0, 0.0),
                v_edge: Vec3::new(0.0, h, 0.0),
                u_segments: segments,
                normal: Vec3::Z,
            },
            Face {
                slot: MaterialSlot::Back,
                corner: Vec3::new(w, -hh, -ht),
                u_edge: Vec3::new(-w, 0.0, 0.0),
                v_edge: Vec3::new(0.0, h, 0.0),
                u_segments: segments,
                normal: Vec3::NEG_Z,
            },
        ];

        let mut mesh = PageMesh::new();
        for face in &faces {
            self.add_face(&mut mesh, face);
        }
        mesh
    }

    fn add_face(&self, mesh: &mut PageMesh, face: &Face) {
        let Face {
            slot,
            corner,
            u_edge,
            v_edge,
            u_segments,
            normal,
        } = *face;
        let segment_width = self.dims.segment_width();
        let start = mesh.indices.len();
        let base = mesh.vertices.len() as u32;
        let columns = u_segments as u32 + 1;

        for j in 0..=1u32 {
            let v = j as f32;
            for i in 0..columns {
                let u = i as f32 / u_segments as f32;
                let position = corner + u_edge * u + v_edge * v;
                let skin = SkinBinding::at(position.x, segment_width, self.dims.segments);
                mesh.add_vertex(Vertex::new(
                    position.to_array(),
                    normal.to_array(),
                    [u, 1.0 - v],
                    skin,
                ));
            }
        }

        for i in 0..u_segments as u32 {
            let a = base + i;
            let b = base + i + 1;
            let c = base + columns + i + 1;
            let d = base + columns + i;
            mesh.add_quad(a, b, c, d);
        }

        mesh.groups.push(FaceGroup {
            slot,
            start,
            count: mesh.indices.len() - start,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_mesh() -> PageMesh {
        PageGeometryBuilder::new(PageDimensions::default()).build()
    }

    #[test]
    fn test_weights_sum_to_one() {
        let mesh = default_mesh();
        for vertex in &mesh.vertices {
            let sum = vertex.skin.weights[0] + vertex.skin.weights[1];
            assert!((sum - 1.0).abs() < 1e-6, "weights {:?}", vertex.skin.weights);
            assert!(vertex.skin.weights.iter().any(|w| *w > 0.0));
        }
    }

    #[test]
    fn test_joints_in_range() {
        let dims = PageDimensions::default();
        let mesh = PageGeometryBuilder::new(dims).build();
        for vertex in &mesh.vertices {
            assert!((vertex.skin.joints[1] as usize) < dims.bone_count());
            assert_eq!(vertex.skin.joints[1], vertex.skin.joints[0] + 1);
        }
    }

    #[test]
    fn test_binding_interpolates_by_distance() {
        let binding = SkinBinding::at(0.25, 1.0, 4);
        assert_eq!(binding.joints, [0, 1]);
        assert!((binding.weights[0] - 0.75).abs() < 1e-6);
        assert!((binding.weights[1] - 0.25).abs() < 1e-6);

        let mid = SkinBinding::at(2.5, 1.0, 4);
        assert_eq!(mid.joints, [2, 3]);
        assert!((mid.weights[1] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_binding_on_boundary() {
        let binding = SkinBinding::at(2.0, 1.0, 4);
        assert_eq!(binding.joints, [2, 3]);
        assert_eq!(binding.weights, [1.0, 0.0]);
    }

    #[test]
    fn test_binding_clamps_at_free_edge() {
        // x == width lands in the last segment, fully on the last bone.
        let binding = SkinBinding::at(4.0, 1.0, 4);
        assert_eq!(binding.joints, [3, 4]);
        assert_eq!(binding.weights, [0.0, 1.0]);

        let outside = SkinBinding::at(-0.5, 1.0, 4);
        assert_eq!(outside.joints, [0, 1]);
        assert_eq!(outside.weights, [1.0, 0.0]);
    }

    #[test]
    fn test_long_axis_starts_at_hinge() {
        let dims = PageDimensions::default();
        let mesh = PageGeometryBuilder::new(dims).build();
        let min_x = mesh.vertices.iter().map(|v| v.position[0]).fold(f32::MAX, f32::min);
        let max_x = mesh.vertices.iter().map(|v| v.position[0]).fold(f32::MIN, f32::max);
        assert_eq!(min_x, 0.0);
        assert!((max_x - dims.width).abs() < 1e-6);
    }

    #[test]
    fn test_groups_cover_all_indices_in_slot_order() {
        let mesh = default_mesh();
        let slots: Vec<_> = mesh.groups.iter().map(|g| g.slot).collect();
        assert_eq!(slots, MaterialSlot::ALL.to_vec());

        let mut next = 0;
        for group in &mesh.groups {
            assert_eq!(group.start, next);
            assert_eq!(group.count % 3, 0);
            next += group.count;
        }
        assert_eq!(next, mesh.indices.len());
    }

    #[test]
    fn test_counts() {
        let mesh = PageGeometryBuilder::new(PageDimensions {
            segments: 4,
            ..Default::default()
        })
        .build();
        // Four subdivided faces of 2 * 5 vertices, two end caps of 2 * 2.
        assert_eq!(mesh.vertex_count(), 4 * 10 + 2 * 4);
        assert_eq!(mesh.triangle_count(), 4 * 8 + 2 * 2);
        assert_eq!(mesh.group(MaterialSlot::Front).unwrap().count, 4 * 6);
        assert_eq!(mesh.group(MaterialSlot::Left).unwrap().count, 6);
    }

    #[test]
    fn test_winding_matches_normals() {
        let mesh = default_mesh();
        for tri in mesh.indices.chunks(3) {
            let p = |i: u32| Vec3::from_array(mesh.vertices[i as usize].position);
            let face = (p(tri[1]) - p(tri[0])).cross(p(tri[2]) - p(tri[0]));
            let normal = Vec3::from_array(mesh.vertices[tri[0] as usize].normal);
            assert!(face.dot(normal) > 0.0);
        }
    }
}
