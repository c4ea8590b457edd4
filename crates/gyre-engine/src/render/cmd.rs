use super::geometry::{DrawCall, SceneKind};
use super::pipeline::{TEXTURE_GROUP, UNIFORM_GROUP};

/// Vertex buffer slot the scene geometry is bound to.
pub const VERTEX_SLOT: u32 = 0;

/// Load/store behavior of the depth attachment.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DepthOps {
    pub clear: f32,
    pub store: wgpu::StoreOp,
}

impl Default for DepthOps {
    fn default() -> Self {
        // Depth is only needed while the pass runs.
        Self {
            clear: 1.0,
            store: wgpu::StoreOp::Discard,
        }
    }
}

/// Attachment operations of the single render pass.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PassOps {
    pub clear_color: wgpu::Color,
    pub color_store: wgpu::StoreOp,
    pub depth: Option<DepthOps>,
}

impl Default for PassOps {
    fn default() -> Self {
        Self {
            clear_color: wgpu::Color::BLACK,
            color_store: wgpu::StoreOp::Store,
            depth: None,
        }
    }
}

/// Backend-agnostic render command.
///
/// Resources are referred to by role; the backend resolves them against the
/// frame resources it owns.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RenderCmd {
    SetPipeline,
    SetVertexBuffer { slot: u32 },
    /// Binds the uniform bind group of `ring_slot` at `group`.
    SetUniforms { group: u32, ring_slot: usize },
    SetTexture { group: u32 },
    SetIndexBuffer { format: wgpu::IndexFormat },
    Draw { vertices: u32 },
    DrawIndexed { indices: u32 },
}

/// Recorded commands for one frame: one pass, then the commands inside it.
///
/// `record` reuses the command allocation, so a warmed list does not allocate.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CommandList {
    pass: PassOps,
    cmds: Vec<RenderCmd>,
}

impl CommandList {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the list with the draw sequence of `scene`.
    pub fn record(&mut self, scene: SceneKind, ring_slot: usize, clear_color: wgpu::Color) {
        self.cmds.clear();
        self.pass = PassOps {
            clear_color,
            depth: scene.uses_depth().then(DepthOps::default),
            ..PassOps::default()
        };

        self.cmds.push(RenderCmd::SetPipeline);
        self.cmds.push(RenderCmd::SetVertexBuffer { slot: VERTEX_SLOT });
        if scene.uses_transform() {
            self.cmds.push(RenderCmd::SetUniforms {
                group: UNIFORM_GROUP,
                ring_slot,
            });
        }
        if scene.uses_texture() {
            self.cmds.push(RenderCmd::SetTexture {
                group: TEXTURE_GROUP,
            });
        }

        match scene.draw() {
            DrawCall::Vertices(vertices) => self.cmds.push(RenderCmd::Draw { vertices }),
            DrawCall::Indexed(indices) => {
                self.cmds.push(RenderCmd::SetIndexBuffer {
                    format: wgpu::IndexFormat::Uint16,
                });
                self.cmds.push(RenderCmd::DrawIndexed { indices });
            }
        }
    }

    #[inline]
    pub fn pass(&self) -> &PassOps {
        &self.pass
    }

    #[inline]
    pub fn commands(&self) -> &[RenderCmd] {
        &self.cmds
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cmds.is_empty()
    }

    #[inline]
    pub fn clear(&mut self) {
        self.cmds.clear();
        self.pass = PassOps::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triangle_is_a_plain_draw() {
        let mut list = CommandList::new();
        list.record(SceneKind::Triangle, 0, wgpu::Color::BLACK);

        assert_eq!(
            list.commands(),
            &[
                RenderCmd::SetPipeline,
                RenderCmd::SetVertexBuffer { slot: 0 },
                RenderCmd::Draw { vertices: 3 },
            ]
        );
        assert!(list.pass().depth.is_none());
    }

    #[test]
    fn cube_binds_uniforms_and_draws_indexed() {
        let mut list = CommandList::new();
        list.record(SceneKind::Cube, 2, wgpu::Color::BLACK);

        assert_eq!(
            list.commands(),
            &[
                RenderCmd::SetPipeline,
                RenderCmd::SetVertexBuffer { slot: 0 },
                RenderCmd::SetUniforms { group: 0, ring_slot: 2 },
                RenderCmd::SetIndexBuffer { format: wgpu::IndexFormat::Uint16 },
                RenderCmd::DrawIndexed { indices: 36 },
            ]
        );
        assert!(list.pass().depth.is_none());
    }

    #[test]
    fn textured_cube_adds_texture_and_depth() {
        let mut list = CommandList::new();
        list.record(SceneKind::TexturedCube, 1, wgpu::Color::BLACK);

        assert_eq!(
            list.commands(),
            &[
                RenderCmd::SetPipeline,
                RenderCmd::SetVertexBuffer { slot: 0 },
                RenderCmd::SetUniforms { group: 0, ring_slot: 1 },
                RenderCmd::SetTexture { group: 1 },
                RenderCmd::SetIndexBuffer { format: wgpu::IndexFormat::Uint16 },
                RenderCmd::DrawIndexed { indices: 36 },
            ]
        );

        let pass = list.pass();
        assert_eq!(pass.clear_color, wgpu::Color::BLACK);
        assert_eq!(pass.color_store, wgpu::StoreOp::Store);
        let depth = pass.depth.expect("depth ops");
        assert_eq!(depth.clear, 1.0);
        assert_eq!(depth.store, wgpu::StoreOp::Discard);
    }

    #[test]
    fn record_replaces_previous_frame() {
        let mut list = CommandList::new();
        list.record(SceneKind::TexturedCube, 0, wgpu::Color::BLACK);
        list.record(SceneKind::Triangle, 0, wgpu::Color::WHITE);

        assert_eq!(list.commands().len(), 3);
        assert_eq!(list.pass().clear_color, wgpu::Color::WHITE);
        assert!(list.pass().depth.is_none());

        list.clear();
        assert!(list.is_empty());
    }
}
