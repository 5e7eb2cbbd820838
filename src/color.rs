use std::fmt;

/// RGBA color with 8-bit channels.
///
/// Plain value type: every read and write through a script handle copies it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color
{
        pub r: u8,
        pub g: u8,
        pub b: u8,
        pub a: u8,
}

impl Color
{
        pub const BLACK: Color = Color::rgba(0, 0, 0, 255);

        pub const WHITE: Color = Color::rgba(255, 255, 255, 255);

        pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);

        pub const fn rgba(
                r: u8,
                g: u8,
                b: u8,
                a: u8,
        ) -> Self
        {
                Self { r, g, b, a }
        }

        /// Converts a script number into a channel value.
        ///
        /// Fractions are truncated, out of range values clamped, NaN maps to 0.
        pub fn channel(value: f64) -> u8
        {
                if value.is_nan()
                {
                        return 0;
                }

                value.trunc().clamp(0.0, 255.0) as u8
        }

        /// Scales r, g and b by `factor`, keeping alpha.
        pub fn scaled(
                self,
                factor: f64,
        ) -> Self
        {
                let scale = |c: u8| Self::channel(c as f64 * factor);

                Self {
                        r: scale(self.r),
                        g: scale(self.g),
                        b: scale(self.b),
                        a: self.a,
                }
        }

        /// Channel-wise modulation, alpha included.
        pub fn modulate(
                self,
                other: Color,
        ) -> Self
        {
                let mul = |a: u8, b: u8| ((a as u16 * b as u16) / 255) as u8;

                Self {
                        r: mul(self.r, other.r),
                        g: mul(self.g, other.g),
                        b: mul(self.b, other.b),
                        a: mul(self.a, other.a),
                }
        }

        pub fn to_array(self) -> [u8; 4]
        {
                [self.r, self.g, self.b, self.a]
        }

        pub fn from_array(rgba: [u8; 4]) -> Self
        {
                Self::rgba(rgba[0], rgba[1], rgba[2], rgba[3])
        }

        /// Linear `wgpu` clear color.
        pub fn to_wgpu(self) -> wgpu::Color
        {
                wgpu::Color {
                        r: self.r as f64 / 255.0,
                        g: self.g as f64 / 255.0,
                        b: self.b as f64 / 255.0,
                        a: self.a as f64 / 255.0,
                }
        }
}

impl Default for Color
{
        fn default() -> Self
        {
                Self::BLACK
        }
}

impl fmt::Display for Color
{
        fn fmt(
                &self,
                f: &mut fmt::Formatter<'_>,
        ) -> fmt::Result
        {
                write!(f, "Color {}, {}, {}, {}", self.r, self.g, self.b, self.a)
        }
}
