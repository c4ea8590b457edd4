//! Fixed geometry and the scene variants built from it.

use bytemuck::{Pod, Zeroable};

/// Which fixed scene the renderer draws.
///
/// The variant decides the vertex layout, whether an MVP uniform, a texture and
/// a depth buffer are used, and which draw call is issued.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum SceneKind {
    /// Three clip-space points, non-indexed, no transform.
    Triangle,
    /// Eight cube corners, indexed, MVP transform, no depth test.
    Cube,
    /// Textured cube with depth testing.
    #[default]
    TexturedCube,
}

impl SceneKind {
    #[inline]
    pub fn uses_transform(self) -> bool {
        !matches!(self, Self::Triangle)
    }

    #[inline]
    pub fn uses_texture(self) -> bool {
        matches!(self, Self::TexturedCube)
    }

    #[inline]
    pub fn uses_depth(self) -> bool {
        matches!(self, Self::TexturedCube)
    }

    /// The single draw call covering the whole geometry.
    pub fn draw(self) -> DrawCall {
        match self {
            Self::Triangle => DrawCall::Vertices(TRIANGLE_VERTICES.len() as u32),
            Self::Cube | Self::TexturedCube => DrawCall::Indexed(CUBE_INDICES.len() as u32),
        }
    }

    /// Vertex data as bytes, ready for upload.
    pub fn vertex_bytes(self) -> &'static [u8] {
        match self {
            Self::Triangle => bytemuck::cast_slice(&TRIANGLE_VERTICES),
            Self::Cube => bytemuck::cast_slice(&CUBE_VERTICES),
            Self::TexturedCube => bytemuck::cast_slice(&TEXTURED_CUBE_VERTICES),
        }
    }

    /// Index data as bytes, if the scene is indexed.
    pub fn index_bytes(self) -> Option<&'static [u8]> {
        match self.draw() {
            DrawCall::Indexed(_) => Some(bytemuck::cast_slice(&CUBE_INDICES)),
            DrawCall::Vertices(_) => None,
        }
    }

    pub fn vertex_layout(self) -> wgpu::VertexBufferLayout<'static> {
        match self {
            Self::Triangle | Self::Cube => PositionVertex::layout(),
            Self::TexturedCube => TexturedVertex::layout(),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Triangle => "triangle",
            Self::Cube => "cube",
            Self::TexturedCube => "textured cube",
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum DrawCall {
    /// Non-indexed draw of `n` vertices.
    Vertices(u32),
    /// Indexed draw of `n` `u16` indices.
    Indexed(u32),
}

// ── vertex types ──────────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct PositionVertex {
    pub position: [f32; 4],
}

impl PositionVertex {
    const ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x4];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<PositionVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct TexturedVertex {
    pub position: [f32; 4],
    pub uv: [f32; 2],
}

impl TexturedVertex {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x4, // position
        1 => Float32x2  // uv
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<TexturedVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

// ── data ──────────────────────────────────────────────────────────────────

const fn pv(x: f32, y: f32, z: f32) -> PositionVertex {
    PositionVertex { position: [x, y, z, 1.0] }
}

const fn tv(x: f32, y: f32, z: f32, u: f32, v: f32) -> TexturedVertex {
    TexturedVertex { position: [x, y, z, 1.0], uv: [u, v] }
}

pub static TRIANGLE_VERTICES: [PositionVertex; 3] = [
    pv(0.0, 0.5, 0.0),
    pv(-0.5, -0.5, 0.0),
    pv(0.5, -0.5, 0.0),
];

pub static CUBE_VERTICES: [PositionVertex; 8] = [
    pv(-1.0, 1.0, 1.0),
    pv(-1.0, -1.0, 1.0),
    pv(1.0, -1.0, 1.0),
    pv(1.0, 1.0, 1.0),
    pv(-1.0, 1.0, -1.0),
    pv(-1.0, -1.0, -1.0),
    pv(1.0, -1.0, -1.0),
    pv(1.0, 1.0, -1.0),
];

/// Same corners as [`CUBE_VERTICES`]. Front and back faces get a full `[0, 1]`
/// mapping; the side faces reuse those corners.
pub static TEXTURED_CUBE_VERTICES: [TexturedVertex; 8] = [
    tv(-1.0, 1.0, 1.0, 0.0, 0.0),
    tv(-1.0, -1.0, 1.0, 0.0, 1.0),
    tv(1.0, -1.0, 1.0, 1.0, 1.0),
    tv(1.0, 1.0, 1.0, 1.0, 0.0),
    tv(-1.0, 1.0, -1.0, 1.0, 0.0),
    tv(-1.0, -1.0, -1.0, 1.0, 1.0),
    tv(1.0, -1.0, -1.0, 0.0, 1.0),
    tv(1.0, 1.0, -1.0, 0.0, 0.0),
];

/// Two triangles per face.
pub static CUBE_INDICES: [u16; 36] = [
    3, 2, 6, 6, 7, 3, // +x
    4, 5, 1, 1, 0, 4, // -x
    4, 0, 3, 3, 7, 4, // +y
    1, 5, 6, 6, 2, 1, // -y
    0, 1, 2, 2, 3, 0, // +z
    7, 6, 5, 5, 4, 7, // -z
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_indices_reference_existing_corners() {
        assert!(CUBE_INDICES.iter().all(|&i| (i as usize) < CUBE_VERTICES.len()));
        assert_eq!(CUBE_INDICES.len() / 3, 12);
    }

    #[test]
    fn every_corner_is_used() {
        for corner in 0..CUBE_VERTICES.len() as u16 {
            assert!(CUBE_INDICES.contains(&corner), "corner {corner} unused");
        }
    }

    #[test]
    fn textured_positions_match_plain_cube() {
        for (plain, textured) in CUBE_VERTICES.iter().zip(TEXTURED_CUBE_VERTICES.iter()) {
            assert_eq!(plain.position, textured.position);
        }
    }

    #[test]
    fn vertex_strides() {
        assert_eq!(PositionVertex::layout().array_stride, 16);
        assert_eq!(TexturedVertex::layout().array_stride, 24);
        assert_eq!(TexturedVertex::layout().attributes[1].offset, 16);
    }

    #[test]
    fn scene_features() {
        assert!(!SceneKind::Triangle.uses_transform());
        assert!(SceneKind::Cube.uses_transform());
        assert!(!SceneKind::Cube.uses_depth());
        assert!(SceneKind::TexturedCube.uses_texture());
        assert!(SceneKind::TexturedCube.uses_depth());
    }

    #[test]
    fn draw_calls_cover_whole_geometry() {
        assert_eq!(SceneKind::Triangle.draw(), DrawCall::Vertices(3));
        assert_eq!(SceneKind::Cube.draw(), DrawCall::Indexed(36));
        assert_eq!(SceneKind::TexturedCube.draw(), DrawCall::Indexed(36));
        assert!(SceneKind::Triangle.index_bytes().is_none());
        assert_eq!(SceneKind::Cube.index_bytes().map(<[u8]>::len), Some(72));
    }

    #[test]
    fn vertex_bytes_sizes() {
        assert_eq!(SceneKind::Triangle.vertex_bytes().len(), 3 * 16);
        assert_eq!(SceneKind::Cube.vertex_bytes().len(), 8 * 16);
        assert_eq!(SceneKind::TexturedCube.vertex_bytes().len(), 8 * 24);
    }
}
