use winit::dpi::PhysicalSize;

/// Drawable size in physical pixels.
///
/// Used as the invalidation key for size-dependent GPU targets (depth buffer).
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct DrawableSize {
    pub width: u32,
    pub height: u32,
}

impl DrawableSize {
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Returns `true` if either dimension is zero (e.g. a minimized window).
    #[inline]
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Width divided by height.
    ///
    /// Callers must check [`is_empty`](Self::is_empty) first; a zero height
    /// yields a non-finite ratio.
    #[inline]
    pub fn aspect_ratio(self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

impl From<PhysicalSize<u32>> for DrawableSize {
    #[inline]
    fn from(size: PhysicalSize<u32>) -> Self {
        Self::new(size.width, size.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_when_any_dimension_is_zero() {
        assert!(DrawableSize::new(0, 600).is_empty());
        assert!(DrawableSize::new(800, 0).is_empty());
        assert!(!DrawableSize::new(1, 1).is_empty());
    }

    #[test]
    fn aspect_ratio() {
        assert_eq!(DrawableSize::new(800, 400).aspect_ratio(), 2.0);
        assert_eq!(DrawableSize::new(1024, 1024).aspect_ratio(), 1.0);
    }

    #[test]
    fn from_physical_size() {
        let size: DrawableSize = PhysicalSize::new(1280u32, 720u32).into();
        assert_eq!(size, DrawableSize::new(1280, 720));
    }
}
