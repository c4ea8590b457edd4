use std::path::Path;

use super::SetupError;

/// RGBA8 pixels decoded from an image asset.
#[derive(Clone, PartialEq, Eq)]
pub struct DecodedImage {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

impl std::fmt::Debug for DecodedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecodedImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl DecodedImage {
    /// Decodes an encoded image (format guessed from the bytes).
    pub fn decode(bytes: &[u8]) -> Result<Self, SetupError> {
        let image = image::load_from_memory(bytes)?;
        Ok(Self::from_rgba(image.to_rgba8()))
    }

    /// Reads and decodes the image at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SetupError> {
        let path = path.as_ref();
        let image = image::open(path)?;
        log::debug!("decoded {} ({}x{})", path.display(), image.width(), image.height());
        Ok(Self::from_rgba(image.to_rgba8()))
    }

    fn from_rgba(rgba: image::RgbaImage) -> Self {
        let (width, height) = rgba.dimensions();
        Self {
            width,
            height,
            rgba: rgba.into_raw(),
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Tightly packed RGBA8 rows.
    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.rgba
    }
}

/// Texture format matching the color space of `surface_format`.
///
/// Image bytes are sRGB-encoded; they are only decoded to linear when the
/// surface re-encodes on output.
pub fn texture_format_for(surface_format: wgpu::TextureFormat) -> wgpu::TextureFormat {
    if surface_format.is_srgb() {
        wgpu::TextureFormat::Rgba8UnormSrgb
    } else {
        wgpu::TextureFormat::Rgba8Unorm
    }
}

/// An uploaded, immutable 2D texture.
pub struct GpuTexture {
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
}

impl GpuTexture {
    /// Uploads `image` once.
    pub fn upload(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        image: &DecodedImage,
        format: wgpu::TextureFormat,
    ) -> Result<Self, SetupError> {
        check_dimensions(image.width, image.height, device.limits().max_texture_dimension_2d)?;

        let size = wgpu::Extent3d {
            width: image.width,
            height: image.height,
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("gyre cube texture"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            image.pixels(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * image.width),
                rows_per_image: Some(image.height),
            },
            size,
        );

        log::debug!("uploaded texture {}x{} as {format:?}", image.width, image.height);

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Ok(Self {
            _texture: texture,
            view,
        })
    }

    #[inline]
    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }
}

/// Linear min/mag/mip filtering, repeat addressing on every axis.
pub fn create_repeat_sampler(device: &wgpu::Device) -> wgpu::Sampler {
    device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some("gyre cube sampler"),
        address_mode_u: wgpu::AddressMode::Repeat,
        address_mode_v: wgpu::AddressMode::Repeat,
        address_mode_w: wgpu::AddressMode::Repeat,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        mipmap_filter: wgpu::MipmapFilterMode::Linear,
        ..Default::default()
    })
}

/// Rejects images wgpu cannot hold in a single 2D texture.
fn check_dimensions(width: u32, height: u32, limit: u32) -> Result<(), SetupError> {
    if width == 0 || height == 0 {
        return Err(SetupError::EmptyTexture { width, height });
    }
    if width > limit || height > limit {
        return Err(SetupError::TextureTooLarge {
            width,
            height,
            limit,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn encode_png(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbaImage::from_fn(width, height, |x, y| {
            image::Rgba([x as u8, y as u8, 0x80, 0xff])
        });
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .expect("png encode");
        bytes
    }

    #[test]
    fn decode_png() {
        let decoded = DecodedImage::decode(&encode_png(4, 2)).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (4, 2));
        assert_eq!(decoded.pixels().len(), 4 * 2 * 4);
        // Pixel (3, 1) of a 4-wide image.
        let i = (4 + 3) * 4;
        assert_eq!(&decoded.pixels()[i..i + 4], &[3, 1, 0x80, 0xff]);
    }

    #[test]
    fn empty_image_is_not_too_large() {
        assert!(matches!(
            check_dimensions(0, 16, 8192),
            Err(SetupError::EmptyTexture { width: 0, height: 16 })
        ));
        assert!(matches!(
            check_dimensions(16, 0, 8192),
            Err(SetupError::EmptyTexture { .. })
        ));
    }

    #[test]
    fn dimensions_checked_against_limit() {
        assert!(check_dimensions(8192, 8192, 8192).is_ok());
        assert!(matches!(
            check_dimensions(8193, 1, 8192),
            Err(SetupError::TextureTooLarge { width: 8193, height: 1, limit: 8192 })
        ));
    }

    #[test]
    fn garbage_is_a_decode_error() {
        let err = DecodedImage::decode(b"definitely not an image").unwrap_err();
        assert!(matches!(err, SetupError::TextureDecode(_)), "{err}");
    }

    #[test]
    fn missing_file_is_a_decode_error() {
        let err = DecodedImage::open("this/path/does/not/exist.png").unwrap_err();
        assert!(matches!(err, SetupError::TextureDecode(_)));
    }

    #[test]
    fn texture_format_follows_surface() {
        assert_eq!(
            texture_format_for(wgpu::TextureFormat::Bgra8UnormSrgb),
            wgpu::TextureFormat::Rgba8UnormSrgb
        );
        assert_eq!(
            texture_format_for(wgpu::TextureFormat::Bgra8Unorm),
            wgpu::TextureFormat::Rgba8Unorm
        );
    }
}
