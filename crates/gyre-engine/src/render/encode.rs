use super::cmd::{CommandList, RenderCmd};
use super::pipeline::RenderPipeline;
use super::resources::FrameResources;

/// Records `commands` as one render pass into `encoder`, targeting `color`.
///
/// `commands` must be recorded for the scene `resources` were built for.
/// A command whose resource is missing is skipped and logged in release builds
/// and panics in debug builds.
pub fn encode_pass(
    encoder: &mut wgpu::CommandEncoder,
    color: &wgpu::TextureView,
    pipeline: &RenderPipeline,
    resources: &FrameResources,
    commands: &CommandList,
) {
    let ops = commands.pass();

    let depth_stencil_attachment = ops.depth.and_then(|depth| {
        let view = resources.depth_view()?;
        Some(wgpu::RenderPassDepthStencilAttachment {
            view,
            depth_ops: Some(wgpu::Operations {
                load: wgpu::LoadOp::Clear(depth.clear),
                store: depth.store,
            }),
            stencil_ops: None,
        })
    });

    let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some("gyre frame pass"),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view: color,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(ops.clear_color),
                store: ops.color_store,
            },
            depth_slice: None,
        })],
        depth_stencil_attachment,
        timestamp_writes: None,
        occlusion_query_set: None,
        multiview_mask: None,
    });

    for cmd in commands.commands() {
        match *cmd {
            RenderCmd::SetPipeline => rpass.set_pipeline(pipeline.raw()),
            RenderCmd::SetVertexBuffer { slot } => {
                rpass.set_vertex_buffer(slot, resources.vertex_buffer().slice(..));
            }
            RenderCmd::SetUniforms { group, ring_slot } => {
                match resources.uniform_bind_group(ring_slot) {
                    Some(bind_group) => rpass.set_bind_group(group, bind_group, &[]),
                    None => missing_resource("uniform bind group", cmd),
                }
            }
            RenderCmd::SetTexture { group } => {
                match resources.texture_bind_group() {
                    Some(bind_group) => rpass.set_bind_group(group, bind_group, &[]),
                    None => missing_resource("texture bind group", cmd),
                }
            }
            RenderCmd::SetIndexBuffer { format } => {
                match resources.index_buffer() {
                    Some(indices) => rpass.set_index_buffer(indices.slice(..), format),
                    None => missing_resource("index buffer", cmd),
                }
            }
            RenderCmd::Draw { vertices } => rpass.draw(0..vertices, 0..1),
            RenderCmd::DrawIndexed { indices } => rpass.draw_indexed(0..indices, 0, 0..1),
        }
    }
}

fn missing_resource(what: &str, cmd: &RenderCmd) {
    log::warn!("skipping {cmd:?}: frame resources have no {what}");
    if cfg!(debug_assertions) {
        panic!("{cmd:?} recorded against resources without a {what}");
    }
}
