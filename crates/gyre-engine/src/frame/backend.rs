use crate::coords::DrawableSize;
use crate::render::{CommandList, MvpUniform};

/// Result of asking for the next presentable surface.
#[derive(Debug)]
pub enum Acquire<S> {
    Ready(S),
    /// Nothing to draw into this tick (timeout, reconfigured surface).
    Unavailable,
    /// The surface cannot be used again.
    Fatal,
}

/// GPU-facing operations the frame loop drives, in the order it calls them.
///
/// The loop owns the sequencing; a backend only performs each step.
pub trait FrameBackend {
    /// Acquired surface plus whatever is needed to record into it.
    type Surface;

    /// Current drawable size in physical pixels.
    fn drawable_size(&self) -> DrawableSize;

    /// Claims a uniform ring slot whose previous submission has completed.
    fn claim_uniform_slot(&mut self) -> Option<usize>;

    fn acquire_surface(&mut self) -> Acquire<Self::Surface>;

    /// Overwrites the uniforms of a claimed slot.
    fn write_uniforms(&mut self, slot: usize, uniforms: &MvpUniform);

    /// Makes the depth target match `size`.
    fn prepare_depth(&mut self, size: DrawableSize);

    /// Records `commands` into `surface`.
    fn encode(&mut self, surface: &mut Self::Surface, commands: &CommandList);

    /// Submits the recorded work, signals `slot`'s fence on completion and
    /// presents.
    fn submit(&mut self, surface: Self::Surface, slot: usize);
}
