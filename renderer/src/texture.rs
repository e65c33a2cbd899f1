use std::path::Path;

use image::DynamicImage;

use crate::{Error, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PixelFormat {
    Red,
    Rg,
    Rgb,
    Rgba,
}

/// Decoded 8-bit pixels, rows top to bottom.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextureData {
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    pub pixels: Vec<u8>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Wrap {
    Repeat,
    MirroredRepeat,
    ClampToEdge,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Filter {
    Nearest,
    Linear,
    LinearMipmapLinear,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Sampler {
    pub wrap: Wrap,
    pub min_filter: Filter,
    pub mag_filter: Filter,
    pub mipmaps: bool,
}

impl PixelFormat {
    pub const fn channels(self) -> usize {
        match self {
            Self::Red => 1,
            Self::Rg => 2,
            Self::Rgb => 3,
            Self::Rgba => 4,
        }
    }
}

impl TextureData {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        firestorm::profile_fn!(load);

        let path = path.as_ref();
        let image = image::open(path).map_err(|source| Error::Image {
            path: path.to_owned(),
            source,
        })?;
        let data = Self::from_image(image);

        log::debug!(
            "Decoded {}: {}x{} {:?}",
            path.display(),
            data.width,
            data.height,
            data.format
        );
        Ok(data)
    }

    /// Keeps 8-bit grey, grey-alpha, RGB and RGBA images in their own
    /// channel layout. Anything else is converted to RGBA8.
    pub fn from_image(image: DynamicImage) -> Self {
        let (width, height) = (image.width(), image.height());
        let (format, pixels) = match image {
            DynamicImage::ImageLuma8(img) => (PixelFormat::Red, img.into_raw()),
            DynamicImage::ImageLumaA8(img) => (PixelFormat::Rg, img.into_raw()),
            DynamicImage::ImageRgb8(img) => (PixelFormat::Rgb, img.into_raw()),
            DynamicImage::ImageRgba8(img) => (PixelFormat::Rgba, img.into_raw()),
            other => (PixelFormat::Rgba, other.into_rgba8().into_raw()),
        };
        Self {
            width,
            height,
            format,
            pixels,
        }
    }

    /// 1x1 opaque white, used in place of textures that fail to load.
    pub fn white() -> Self {
        Self {
            width: 1,
            height: 1,
            format: PixelFormat::Rgba,
            pixels: vec![u8::MAX; 4],
        }
    }
}

impl Default for Sampler {
    fn default() -> Self {
        Self {
            wrap: Wrap::Repeat,
            min_filter: Filter::LinearMipmapLinear,
            mag_filter: Filter::Linear,
            mipmaps: true,
        }
    }
}
