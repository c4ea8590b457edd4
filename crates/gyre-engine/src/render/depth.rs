use crate::coords::DrawableSize;

use super::pipeline::DEPTH_FORMAT;

/// A value rebuilt whenever its size key changes.
///
/// Size-dependent render targets are cached here instead of behind a
/// "create if missing" check, so a resize can never leave a stale target
/// attached to a differently sized surface.
#[derive(Debug)]
pub struct SizedCache<T> {
    entry: Option<(DrawableSize, T)>,
    rebuilds: u64,
}

impl<T> Default for SizedCache<T> {
    fn default() -> Self {
        Self {
            entry: None,
            rebuilds: 0,
        }
    }
}

impl<T> SizedCache<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached value for `size`, rebuilding it with `create` if the
    /// cache is empty or was built for another size.
    pub fn get_or_rebuild(&mut self, size: DrawableSize, create: impl FnOnce(DrawableSize) -> T) -> &T {
        if self.entry.as_ref().is_some_and(|(key, _)| *key != size) {
            self.entry = None;
        }
        let (_, value) = self.entry.get_or_insert_with(|| {
            self.rebuilds += 1;
            (size, create(size))
        });
        value
    }

    /// The cached value, whatever its size.
    #[inline]
    pub fn get(&self) -> Option<&T> {
        self.entry.as_ref().map(|(_, v)| v)
    }

    /// The size the cached value was built for.
    #[inline]
    pub fn size(&self) -> Option<DrawableSize> {
        self.entry.as_ref().map(|(s, _)| *s)
    }

    /// Number of times a value has been (re)built.
    #[inline]
    pub fn rebuilds(&self) -> u64 {
        self.rebuilds
    }
}

/// Depth attachment sized to the drawable.
pub struct DepthTarget {
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
}

impl DepthTarget {
    pub fn new(device: &wgpu::Device, size: DrawableSize) -> Self {
        log::debug!("creating depth target {}x{}", size.width, size.height);

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("gyre depth target"),
            size: wgpu::Extent3d {
                width: size.width.max(1),
                height: size.height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Self {
            _texture: texture,
            view,
        }
    }

    #[inline]
    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }
}
