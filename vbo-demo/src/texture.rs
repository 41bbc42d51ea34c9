use crate::error::TextureError;
use gl::types::{GLint, GLsizei};
use gl_thin::gl_helper::{GLErrorWrapper, Texture};
use std::path::Path;

/// 8-bit RGBA pixels, rows top to bottom
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl DecodedImage {
    /// Alternating light and dark squares of `cell` pixels, `cells` across and down.
    pub fn checkerboard(cells: u32, cell: u32) -> Self {
        let side = cells * cell;
        let mut rgba = Vec::with_capacity((side * side * 4) as usize);
        for y in 0..side {
            for x in 0..side {
                let light = (x / cell + y / cell) % 2 == 0;
                let v = if light { 0xe0 } else { 0x30 };
                rgba.extend_from_slice(&[v, v, v, 0xff]);
            }
        }
        Self {
            width: side,
            height: side,
            rgba,
        }
    }

    /// Load the image at `path`, or fall back to a checkerboard with a warning.
    pub fn load_or_checkerboard(path: &Path) -> Self {
        match Self::load(path) {
            Ok(image) => {
                log::debug!(
                    "loaded {}x{} texture from {}",
                    image.width,
                    image.height,
                    path.display()
                );
                image
            }
            Err(e) => {
                log::warn!(
                    "using a checkerboard, could not load {}: {}",
                    path.display(),
                    e
                );
                Self::checkerboard(8, 16)
            }
        }
    }

    pub fn load(path: &Path) -> Result<Self, TextureError> {
        let raw = std::fs::read(path)?;
        Self::decode(&raw)
    }

    #[cfg(feature = "png")]
    pub fn decode(raw: &[u8]) -> Result<Self, TextureError> {
        use png::{BitDepth, ColorType, Transformations};

        let mut decoder = png::Decoder::new(raw);
        decoder.set_transformations(Transformations::EXPAND | Transformations::STRIP_16);
        let mut reader = decoder.read_info()?;
        let mut buf = vec![0u8; reader.output_buffer_size()];
        let info = reader.next_frame(&mut buf)?;
        let pixels = &buf[..info.buffer_size()];

        if info.bit_depth != BitDepth::Eight {
            return Err(TextureError::UnsupportedLayout(format!(
                "{:?} bit depth",
                info.bit_depth
            )));
        }

        let rgba = match info.color_type {
            ColorType::Rgba => pixels.to_vec(),
            ColorType::Rgb => pixels
                .chunks_exact(3)
                .flat_map(|p| [p[0], p[1], p[2], 0xff])
                .collect(),
            ColorType::GrayscaleAlpha => pixels
                .chunks_exact(2)
                .flat_map(|p| [p[0], p[0], p[0], p[1]])
                .collect(),
            ColorType::Grayscale => pixels.iter().flat_map(|&g| [g, g, g, 0xff]).collect(),
            ColorType::Indexed => {
                return Err(TextureError::UnsupportedLayout(
                    "palette left unexpanded".to_string(),
                ))
            }
        };

        Ok(Self {
            width: info.width,
            height: info.height,
            rgba,
        })
    }

    #[cfg(not(feature = "png"))]
    pub fn decode(_raw: &[u8]) -> Result<Self, TextureError> {
        Err(TextureError::DecoderDisabled)
    }

    /// Send the pixels to a new `GL_TEXTURE_2D` with linear filtering.  The texture is left bound.
    pub fn upload(&self) -> Result<Texture, GLErrorWrapper> {
        let target = gl::TEXTURE_2D;
        let mut texture = Texture::new()?;
        texture.bind(target)?;
        texture.set_linear_filtering(target)?;
        texture.write_pixels(
            target,
            0,
            gl::RGBA as GLint,
            self.width as GLsizei,
            self.height as GLsizei,
            gl::RGBA,
            &self.rgba,
        )?;
        Ok(texture)
    }
}
