use std::path::Path;

use image::RgbaImage;

use crate::error::EngineError;

/// Decoded pixels of an image file, always RGBA8.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData
{
        pixels: RgbaImage,
}

impl ImageData
{
        pub fn load(path: impl AsRef<Path>) -> Result<Self, EngineError>
        {
                let path = path.as_ref();

                let bytes = std::fs::read(path).map_err(|e| EngineError::decode("Image", path, e))?;

                let img = image::load_from_memory(&bytes)
                        .map_err(|e| EngineError::decode("Image", path, e))?;

                let pixels = img.to_rgba8();

                log::debug!(
                        "Decoded '{}' ({}x{}).",
                        path.display(),
                        pixels.width(),
                        pixels.height()
                );

                Ok(Self {
                        pixels,
                })
        }

        pub fn from_rgba(pixels: RgbaImage) -> Self
        {
                Self {
                        pixels,
                }
        }

        pub fn width(&self) -> u32
        {
                self.pixels.width()
        }

        pub fn height(&self) -> u32
        {
                self.pixels.height()
        }

        /// Tightly packed RGBA8 rows.
        pub fn rgba(&self) -> &[u8]
        {
                self.pixels.as_raw()
        }
}
