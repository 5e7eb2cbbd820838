//! Script handles for colours, images and sounds.

use std::sync::OnceLock;

use mlua::{IntoLua, Lua, MetaMethod, UserData, UserDataMethods, Value};

use crate::{
        audio::{ChannelLease, SoundData},
        color::Color,
        error::ArgumentError,
        resource::ImageData,
        script::{
                self,
                args::{self, type_name},
                registry::{FieldTable, Handle, HandleKind, add_field_metamethods},
        },
};

/// Interprets a field write as a colour channel.
fn channel_value(
        field: &'static str,
        value: &Value,
) -> mlua::Result<u8>
{
        args::to_number(value).map(Color::channel).ok_or_else(|| {
                ArgumentError {
                        function: field,
                        position: 3,
                        expected: "number",
                        actual: type_name(Some(value)),
                }
                .into()
        })
}

fn path_value(
        field: &'static str,
        value: &Value,
) -> mlua::Result<String>
{
        match value
        {
                Value::String(s) => Ok(s.to_string_lossy()),
                Value::Integer(i) => Ok(i.to_string()),
                Value::Number(n) => Ok(n.to_string()),
                other => Err(ArgumentError {
                        function: field,
                        position: 3,
                        expected: "string",
                        actual: type_name(Some(other)),
                }
                .into()),
        }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorHandle(pub Color);

impl ColorHandle
{
        /// The colour wrapped by `value`, if it is a Color handle.
        pub fn from_value(value: &Value) -> Option<Color>
        {
                match value
                {
                        Value::UserData(ud) => ud.borrow::<ColorHandle>().ok().map(|c| c.0),
                        _ => None,
                }
        }

        fn mul(
                a: &Value,
                b: &Value,
        ) -> mlua::Result<ColorHandle>
        {
                let product = match (Self::from_value(a), Self::from_value(b))
                {
                        (Some(x), Some(y)) => x.modulate(y),
                        (Some(c), None) => c.scaled(Self::factor("Color.__mul", 2, b)?),
                        (None, Some(c)) => c.scaled(Self::factor("Color.__mul", 1, a)?),
                        (None, None) => not_a_color("Color.__mul", a)?,
                };

                Ok(ColorHandle(product))
        }

        fn div(
                a: &Value,
                b: &Value,
        ) -> mlua::Result<ColorHandle>
        {
                let Some(color) = Self::from_value(a)
                else
                {
                        return Err(ArgumentError {
                                function: "Color.__div",
                                position: 1,
                                expected: "Color",
                                actual: type_name(Some(a)),
                        }
                        .into());
                };

                let divisor = Self::factor("Color.__div", 2, b)?;

                Ok(ColorHandle(color.scaled(1.0 / divisor)))
        }

        fn factor(
                function: &'static str,
                position: usize,
                value: &Value,
        ) -> mlua::Result<f64>
        {
                args::to_number(value).ok_or_else(|| {
                        ArgumentError {
                                function,
                                position,
                                expected: "number",
                                actual: type_name(Some(value)),
                        }
                        .into()
                })
        }
}

fn not_a_color(
        function: &'static str,
        value: &Value,
) -> mlua::Result<Color>
{
        Err(ArgumentError {
                function,
                position: 1,
                expected: "Color",
                actual: type_name(Some(value)),
        }
        .into())
}

impl Handle for ColorHandle
{
        const KIND: HandleKind = HandleKind::Color;

        fn fields() -> &'static FieldTable<Self>
        {
                static FIELDS: OnceLock<FieldTable<ColorHandle>> = OnceLock::new();

                FIELDS.get_or_init(|| {
                        FieldTable::<ColorHandle>::new()
                                .field(
                                        "r",
                                        |_, c| Ok(Value::Integer(c.0.r.into())),
                                        |_, c, v| {
                                                c.0.r = channel_value("Color.r", &v)?;
                                                Ok(())
                                        },
                                )
                                .field(
                                        "g",
                                        |_, c| Ok(Value::Integer(c.0.g.into())),
                                        |_, c, v| {
                                                c.0.g = channel_value("Color.g", &v)?;
                                                Ok(())
                                        },
                                )
                                .field(
                                        "b",
                                        |_, c| Ok(Value::Integer(c.0.b.into())),
                                        |_, c, v| {
                                                c.0.b = channel_value("Color.b", &v)?;
                                                Ok(())
                                        },
                                )
                                .field(
                                        "a",
                                        |_, c| Ok(Value::Integer(c.0.a.into())),
                                        |_, c, v| {
                                                c.0.a = channel_value("Color.a", &v)?;
                                                Ok(())
                                        },
                                )
                })
        }

        fn describe(&self) -> String
        {
                self.0.to_string()
        }

        fn duplicate(
                &self,
                _lua: &Lua,
        ) -> mlua::Result<Self>
        {
                Ok(*self)
        }
}

impl UserData for ColorHandle
{
        fn add_methods<M: UserDataMethods<Self>>(methods: &mut M)
        {
                add_field_metamethods(methods);

                methods.add_meta_function(MetaMethod::Mul, |_, (a, b): (Value, Value)| {
                        ColorHandle::mul(&a, &b)
                });

                methods.add_meta_function(MetaMethod::Div, |_, (a, b): (Value, Value)| {
                        ColorHandle::div(&a, &b)
                });

                methods.add_meta_function(MetaMethod::Eq, |_, (a, b): (Value, Value)| {
                        Ok(matches!(
                                (ColorHandle::from_value(&a), ColorHandle::from_value(&b)),
                                (Some(x), Some(y)) if x == y
                        ))
                });
        }
}

/// A decoded image and the path it came from.
#[derive(Debug)]
pub struct ImageHandle
{
        path: String,
        data: ImageData,
}

impl ImageHandle
{
        /// Decodes `path`. A decode failure is fatal.
        pub fn open(
                lua: &Lua,
                path: String,
        ) -> mlua::Result<Self>
        {
                match ImageData::load(&path)
                {
                        Ok(data) => Ok(Self {
                                path,
                                data,
                        }),
                        Err(e) => Err(script::raise_fatal(lua, e)),
                }
        }

        pub fn path(&self) -> &str
        {
                &self.path
        }

        pub fn data(&self) -> &ImageData
        {
                &self.data
        }

        fn reload(
                &mut self,
                lua: &Lua,
                path: String,
        ) -> mlua::Result<()>
        {
                if !script::images_ready(lua)
                {
                        return Ok(());
                }

                *self = Self::open(lua, path)?;

                Ok(())
        }
}

impl Handle for ImageHandle
{
        const KIND: HandleKind = HandleKind::Image;

        fn fields() -> &'static FieldTable<Self>
        {
                static FIELDS: OnceLock<FieldTable<ImageHandle>> = OnceLock::new();

                FIELDS.get_or_init(|| {
                        FieldTable::<ImageHandle>::new()
                                .field(
                                        "path",
                                        |lua, i| i.path.as_str().into_lua(lua),
                                        |lua, i, v| {
                                                let path = path_value("Image.path", &v)?;
                                                i.reload(lua, path)
                                        },
                                )
                                .read_only("width", |_, i| Ok(Value::Integer(i.data.width().into())))
                                .read_only("height", |_, i| Ok(Value::Integer(i.data.height().into())))
                })
        }

        fn describe(&self) -> String
        {
                format!("Image {}", self.path)
        }

        fn duplicate(
                &self,
                lua: &Lua,
        ) -> mlua::Result<Self>
        {
                Self::open(lua, self.path.clone())
        }
}

impl UserData for ImageHandle
{
        fn add_methods<M: UserDataMethods<Self>>(methods: &mut M)
        {
                add_field_metamethods(methods);
        }
}

/// A decoded sound bound to its own mixer channel.
///
/// The channel goes back to the pool when the handle is collected, or
/// earlier if the mixer shuts down first.
#[derive(Debug)]
pub struct SoundHandle
{
        path: String,
        data: SoundData,
        lease: ChannelLease,
}

impl SoundHandle
{
        /// Decodes `path` and claims a channel. Both failures are fatal.
        pub fn open(
                lua: &Lua,
                path: String,
        ) -> mlua::Result<Self>
        {
                let Some(audio) = script::context(lua).and_then(|ctx| {
                        let audio = ctx.borrow().audio.clone();
                        audio
                })
                else
                {
                        return Err(mlua::Error::RuntimeError(String::from(
                                "Sound used without an audio subsystem",
                        )));
                };

                let data = SoundData::load(&path).map_err(|e| script::raise_fatal(lua, e))?;

                let lease = ChannelLease::acquire(&audio).map_err(|e| script::raise_fatal(lua, e))?;

                log::debug!("Sound '{path}' on channel {}.", lease.channel());

                Ok(Self {
                        path,
                        data,
                        lease,
                })
        }

        pub fn path(&self) -> &str
        {
                &self.path
        }

        pub fn channel(&self) -> usize
        {
                self.lease.channel()
        }

        fn reload(
                &mut self,
                lua: &Lua,
                path: String,
        ) -> mlua::Result<()>
        {
                let data = SoundData::load(&path).map_err(|e| script::raise_fatal(lua, e))?;

                self.lease.with_audio(|audio, channel| audio.stop(channel));

                self.path = path;
                self.data = data;

                Ok(())
        }
}

impl Handle for SoundHandle
{
        const KIND: HandleKind = HandleKind::Sound;

        fn fields() -> &'static FieldTable<Self>
        {
                static FIELDS: OnceLock<FieldTable<SoundHandle>> = OnceLock::new();

                FIELDS.get_or_init(|| {
                        FieldTable::<SoundHandle>::new()
                                .field(
                                        "path",
                                        |lua, s| s.path.as_str().into_lua(lua),
                                        |lua, s, v| {
                                                let path = path_value("Sound.path", &v)?;
                                                s.reload(lua, path)
                                        },
                                )
                                .read_only("channel", |_, s| Ok(Value::Integer(s.channel() as i64)))
                })
        }

        fn describe(&self) -> String
        {
                format!("Sound {}", self.path)
        }

        fn duplicate(
                &self,
                lua: &Lua,
        ) -> mlua::Result<Self>
        {
                Self::open(lua, self.path.clone())
        }
}

impl UserData for SoundHandle
{
        fn add_methods<M: UserDataMethods<Self>>(methods: &mut M)
        {
                methods.add_method("Play", |_, this, ()| {
                        this.lease.with_audio(|audio, channel| audio.play(channel, &this.data));
                        Ok(())
                });

                methods.add_method("Pause", |_, this, ()| {
                        this.lease.with_audio(|audio, channel| audio.pause(channel));
                        Ok(())
                });

                methods.add_method("Resume", |_, this, ()| {
                        this.lease.with_audio(|audio, channel| audio.resume(channel));
                        Ok(())
                });

                methods.add_method("Stop", |_, this, ()| {
                        this.lease.with_audio(|audio, channel| audio.stop(channel));
                        Ok(())
                });

                methods.add_method("IsPlaying", |_, this, ()| {
                        Ok(this
                                .lease
                                .with_audio(|audio, channel| audio.is_playing(channel))
                                .unwrap_or(false))
                });

                methods.add_method("IsPaused", |_, this, ()| {
                        Ok(this
                                .lease
                                .with_audio(|audio, channel| audio.is_paused(channel))
                                .unwrap_or(false))
                });

                add_field_metamethods(methods);
        }
}

#[cfg(test)]
mod tests
{
        use super::*;

        #[test]
        fn color_fields_read_back()
        {
                let lua = Lua::new();

                let c = ColorHandle(Color::rgba(10, 20, 30, 40));

                let fields = ColorHandle::fields();

                assert_eq!(fields.get(&lua, &c, "r").unwrap(), Value::Integer(10));
                assert_eq!(fields.get(&lua, &c, "a").unwrap(), Value::Integer(40));
                assert_eq!(fields.get(&lua, &c, "x").unwrap(), Value::Nil);
        }

        #[test]
        fn color_unknown_write_is_ignored()
        {
                let lua = Lua::new();

                let mut c = ColorHandle(Color::rgba(1, 2, 3, 4));

                let written = ColorHandle::fields()
                        .set(&lua, &mut c, "alpha", Value::Integer(9))
                        .unwrap();

                assert!(!written);
                assert_eq!(c.0, Color::rgba(1, 2, 3, 4));
        }

        #[test]
        fn color_channel_writes_clamp()
        {
                let lua = Lua::new();

                let mut c = ColorHandle(Color::BLACK);

                ColorHandle::fields().set(&lua, &mut c, "r", Value::Integer(300)).unwrap();
                ColorHandle::fields().set(&lua, &mut c, "g", Value::Number(-4.0)).unwrap();
                ColorHandle::fields().set(&lua, &mut c, "b", Value::Number(7.9)).unwrap();

                assert_eq!(c.0, Color::rgba(255, 0, 7, 255));
        }

        #[test]
        fn color_describes_itself()
        {
                assert_eq!(ColorHandle(Color::rgba(10, 20, 30, 40)).describe(), "Color 10, 20, 30, 40");
        }

        #[test]
        fn color_write_of_wrong_type_is_an_argument_error()
        {
                let lua = Lua::new();

                let mut c = ColorHandle(Color::BLACK);

                let err = ColorHandle::fields()
                        .set(&lua, &mut c, "r", Value::Boolean(true))
                        .unwrap_err();

                assert!(err.to_string().contains("bad argument #3 to 'Color.r'"));
        }

        #[test]
        fn image_fields_are_registered()
        {
                let fields = ImageHandle::fields();

                assert!(fields.contains("path"));
                assert!(fields.contains("width"));
                assert!(fields.contains("height"));
                assert!(!fields.contains("pixels"));
        }

        #[test]
        fn sound_channel_is_read_only()
        {
                assert!(SoundHandle::fields().contains("channel"));
                assert!(SoundHandle::fields().contains("path"));
        }
}
