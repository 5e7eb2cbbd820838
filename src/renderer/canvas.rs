use crate::color::Color;

/// Software RGBA8 render target.
///
/// Every drawing primitive is rasterised here; the presenter uploads the
/// finished frame once per iteration. Coordinates outside the canvas are
/// clipped silently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas
{
        width: u32,
        height: u32,
        pixels: Vec<u8>,
}

impl Canvas
{
        pub fn new(
                width: u32,
                height: u32,
        ) -> Self
        {
                Self {
                        width,
                        height,
                        pixels: vec![0; width as usize * height as usize * 4],
                }
        }

        pub fn width(&self) -> u32
        {
                self.width
        }

        pub fn height(&self) -> u32
        {
                self.height
        }

        pub fn size(&self) -> (u32, u32)
        {
                (self.width, self.height)
        }

        /// Raw RGBA8 rows, tightly packed.
        pub fn pixels(&self) -> &[u8]
        {
                &self.pixels
        }

        pub fn resize(
                &mut self,
                width: u32,
                height: u32,
        )
        {
                if (width, height) == self.size()
                {
                        return;
                }

                let Some(len) = (width as usize)
                        .checked_mul(height as usize)
                        .and_then(|n| n.checked_mul(4))
                else
                {
                        log::warn!(
                                "Canvas size {width}x{height} is not addressable, keeping {}x{}.",
                                self.width,
                                self.height
                        );

                        return;
                };

                self.width = width;
                self.height = height;
                self.pixels = vec![0; len];
        }

        pub fn pixel(
                &self,
                x: i32,
                y: i32,
        ) -> Option<Color>
        {
                let offset = self.offset(x, y)?;

                let mut rgba = [0u8; 4];
                rgba.copy_from_slice(&self.pixels[offset..offset + 4]);

                Some(Color::from_array(rgba))
        }

        pub fn clear(
                &mut self,
                color: Color,
        )
        {
                let rgba = color.to_array();

                for px in self.pixels.chunks_exact_mut(4)
                {
                        px.copy_from_slice(&rgba);
                }
        }

        pub fn draw_point(
                &mut self,
                x: i32,
                y: i32,
                color: Color,
        )
        {
                if let Some(offset) = self.offset(x, y)
                {
                        self.pixels[offset..offset + 4].copy_from_slice(&color.to_array());
                }
        }

        /// One pixel wide outline of the rectangle.
        pub fn draw_rect(
                &mut self,
                x: i32,
                y: i32,
                w: i32,
                h: i32,
                color: Color,
        )
        {
                if w <= 0 || h <= 0
                {
                        return;
                }

                let right = x.saturating_add(w - 1);
                let bottom = y.saturating_add(h - 1);

                self.fill_rect(x, y, w, 1, color);
                self.fill_rect(x, bottom, w, 1, color);
                self.fill_rect(x, y, 1, h, color);
                self.fill_rect(right, y, 1, h, color);
        }

        pub fn fill_rect(
                &mut self,
                x: i32,
                y: i32,
                w: i32,
                h: i32,
                color: Color,
        )
        {
                let Some((x0, y0, x1, y1)) = self.clip(x, y, w, h)
                else
                {
                        return;
                };

                let rgba = color.to_array();

                for row in y0..y1
                {
                        let start = (row * self.width as usize + x0) * 4;
                        let end = (row * self.width as usize + x1) * 4;

                        for px in self.pixels[start..end].chunks_exact_mut(4)
                        {
                                px.copy_from_slice(&rgba);
                        }
                }
        }

        /// Alpha-blends a tightly packed RGBA8 source at `(x, y)`.
        pub fn blit(
                &mut self,
                src: &[u8],
                src_width: u32,
                src_height: u32,
                x: i32,
                y: i32,
        )
        {
                if src.len() < src_width as usize * src_height as usize * 4
                {
                        log::warn!("Blit source smaller than its declared size, skipped.");
                        return;
                }

                let Some((x0, y0, x1, y1)) = self.clip(x, y, src_width as i32, src_height as i32)
                else
                {
                        return;
                };

                for row in y0..y1
                {
                        let sy = (row as i64 - y as i64) as usize;

                        for col in x0..x1
                        {
                                let sx = (col as i64 - x as i64) as usize;

                                let s = (sy * src_width as usize + sx) * 4;
                                let d = (row * self.width as usize + col) * 4;

                                blend_over(&mut self.pixels[d..d + 4], &src[s..s + 4]);
                        }
                }
        }

        fn offset(
                &self,
                x: i32,
                y: i32,
        ) -> Option<usize>
        {
                if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height
                {
                        return None;
                }

                Some((y as usize * self.width as usize + x as usize) * 4)
        }

        /// Intersects a rectangle with the canvas, returning pixel bounds
        /// `(x0, y0, x1, y1)` with exclusive ends.
        fn clip(
                &self,
                x: i32,
                y: i32,
                w: i32,
                h: i32,
        ) -> Option<(usize, usize, usize, usize)>
        {
                if w <= 0 || h <= 0
                {
                        return None;
                }

                let x0 = (x as i64).max(0);
                let y0 = (y as i64).max(0);
                let x1 = (x as i64 + w as i64).min(self.width as i64);
                let y1 = (y as i64 + h as i64).min(self.height as i64);

                if x0 >= x1 || y0 >= y1
                {
                        return None;
                }

                Some((x0 as usize, y0 as usize, x1 as usize, y1 as usize))
        }
}

/// Source-over blending with straight alpha.
fn blend_over(
        dst: &mut [u8],
        src: &[u8],
)
{
        let sa = src[3] as u32;

        if sa == 255
        {
                dst.copy_from_slice(src);
                return;
        }

        if sa == 0
        {
                return;
        }

        let inv = 255 - sa;

        for i in 0..3
        {
                dst[i] = ((src[i] as u32 * sa + dst[i] as u32 * inv) / 255) as u8;
        }

        dst[3] = (sa + dst[3] as u32 * inv / 255) as u8;
}
