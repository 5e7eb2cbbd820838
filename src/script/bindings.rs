//! The `Luma` global table.
//!
//! Every binding receives its arguments unconverted and checks them through
//! [`Args`], so type errors read like Lua's own `bad argument` messages.
//! Window, input and drawing calls return nothing until `Luma.Start` has
//! opened the window.

use mlua::{IntoLuaMulti, Lua, MultiValue, Table, Value, Variadic};

use crate::{
        color::Color,
        context::{LoopState, SharedContext},
        platform::{self, WindowSettings},
        script::{
                args::Args,
                handles::{ColorHandle, ImageHandle, SoundHandle},
                registry::copy_value,
        },
};

/// Name of the global table.
pub const NAMESPACE: &str = "Luma";

type Binding = fn(&Lua, &SharedContext, &Args) -> mlua::Result<MultiValue>;

/// Qualified name (`Area.Name`) to implementation.
const BINDINGS: &[(&str, Binding)] = &[
        ("Start", start),
        ("PollEvents", poll_events),
        ("Copy", copy),
        ("Window.GetSize", window_get_size),
        ("Window.SetSize", window_set_size),
        ("Window.GetPos", window_get_pos),
        ("Window.SetPos", window_set_pos),
        ("Input.IsKeyDown", input_is_key_down),
        ("Input.IsKeyReleased", input_is_key_released),
        ("Input.IsMouseButtonDown", input_is_mouse_button_down),
        ("Input.IsMouseButtonReleased", input_is_mouse_button_released),
        ("Input.GetMousePos", input_get_mouse_pos),
        ("Input.GetMouseRelPos", input_get_mouse_rel_pos),
        ("Background.SetColor", background_set_color),
        ("Background.GetColor", background_get_color),
        ("Drawing.SetColor", drawing_set_color),
        ("Drawing.GetColor", drawing_get_color),
        ("Drawing.DrawRect", drawing_draw_rect),
        ("Drawing.FillRect", drawing_fill_rect),
        ("Drawing.DrawPixel", drawing_draw_pixel),
        ("Drawing.DrawImage", drawing_draw_image),
        ("Color.new", color_new),
        ("Image.new", image_new),
        ("Sound.new", sound_new),
];

/// Builds the `Luma` table and installs it as a global.
pub fn register(
        lua: &Lua,
        ctx: &SharedContext,
) -> mlua::Result<()>
{
        let root = lua.create_table()?;

        for &(qualified, binding) in BINDINGS
        {
                let (table, name) = match qualified.split_once('.')
                {
                        Some((area, name)) => (area_table(lua, &root, area)?, name),
                        None => (root.clone(), qualified),
                };

                let ctx = ctx.clone();

                let function = lua.create_function(move |lua, values: Variadic<Value>| {
                        binding(lua, &ctx, &Args::new(qualified, &values))
                })?;

                table.set(name, function)?;
        }

        lua.globals().set(NAMESPACE, root)?;

        log::debug!("Registered {} bindings under '{NAMESPACE}'.", BINDINGS.len());

        Ok(())
}

fn area_table(
        lua: &Lua,
        root: &Table,
        area: &str,
) -> mlua::Result<Table>
{
        if let Value::Table(table) = root.get::<Value>(area)?
        {
                return Ok(table);
        }

        let table = lua.create_table()?;

        root.set(area, table.clone())?;

        Ok(table)
}

fn nothing() -> mlua::Result<MultiValue>
{
        Ok(MultiValue::new())
}

/// Reads a Color handle argument by value.
fn color_arg(
        args: &Args,
        position: usize,
) -> mlua::Result<Color>
{
        Ok(args.handle::<ColorHandle>(position)?.0)
}

/// Window dimension argument, clamped to `1..=MAX_WINDOW_DIMENSION`.
fn dimension(
        args: &Args,
        position: usize,
) -> mlua::Result<u32>
{
        Ok(platform::window_dimension(args.int(position)?))
}

fn start(
        _lua: &Lua,
        ctx: &SharedContext,
        args: &Args,
) -> mlua::Result<MultiValue>
{
        let title = args.opt_string(1)?;
        let width = args.opt_int(2)?;
        let height = args.opt_int(3)?;
        let x = args.opt_int(4)?;
        let y = args.opt_int(5)?;

        let mut ctx = ctx.borrow_mut();

        if ctx.state != LoopState::NotStarted
        {
                log::warn!("Luma.Start called twice, ignored.");

                return nothing();
        }

        let defaults = ctx.defaults.clone();

        let settings = WindowSettings {
                title: title.unwrap_or(defaults.title),
                width: width.map_or(defaults.width, platform::window_dimension),
                height: height.map_or(defaults.height, platform::window_dimension),
                x: x.or(defaults.x),
                y: y.or(defaults.y),
        };

        if let Err(e) = ctx.start(&settings)
        {
                return Err(ctx.fatal(e));
        }

        nothing()
}

fn poll_events(
        _lua: &Lua,
        ctx: &SharedContext,
        _args: &Args,
) -> mlua::Result<MultiValue>
{
        let mut ctx = ctx.borrow_mut();

        if ctx.window_ready()
        {
                ctx.poll_events();
        }

        nothing()
}

fn copy(
        lua: &Lua,
        _ctx: &SharedContext,
        args: &Args,
) -> mlua::Result<MultiValue>
{
        let mut copies = Vec::with_capacity(args.len());

        for position in 1..=args.len()
        {
                let value = args.get(position).cloned().unwrap_or(Value::Nil);

                copies.push(copy_value(lua, value)?);
        }

        Ok(MultiValue::from_iter(copies))
}

fn window_get_size(
        lua: &Lua,
        ctx: &SharedContext,
        _args: &Args,
) -> mlua::Result<MultiValue>
{
        let ctx = ctx.borrow();

        if !ctx.window_ready()
        {
                return nothing();
        }

        ctx.platform.window_size().into_lua_multi(lua)
}

fn window_set_size(
        _lua: &Lua,
        ctx: &SharedContext,
        args: &Args,
) -> mlua::Result<MultiValue>
{
        let width = dimension(args, 1)?;
        let height = dimension(args, 2)?;

        let mut ctx = ctx.borrow_mut();

        if ctx.window_ready()
        {
                ctx.set_window_size(width, height);
        }

        nothing()
}

/// Returns `(y, x)`, the reverse of `SetPos`'s argument order.
fn window_get_pos(
        lua: &Lua,
        ctx: &SharedContext,
        _args: &Args,
) -> mlua::Result<MultiValue>
{
        let ctx = ctx.borrow();

        if !ctx.window_ready()
        {
                return nothing();
        }

        let (x, y) = ctx.platform.window_position();

        (y, x).into_lua_multi(lua)
}

fn window_set_pos(
        _lua: &Lua,
        ctx: &SharedContext,
        args: &Args,
) -> mlua::Result<MultiValue>
{
        let x = args.int(1)?;
        let y = args.int(2)?;

        let mut ctx = ctx.borrow_mut();

        if ctx.window_ready()
        {
                ctx.platform.set_window_position(x, y);
        }

        nothing()
}

fn key_query(
        lua: &Lua,
        ctx: &SharedContext,
        args: &Args,
        down: bool,
) -> mlua::Result<MultiValue>
{
        let key = args.string(1)?;

        let ctx = ctx.borrow();

        if !ctx.window_ready()
        {
                return nothing();
        }

        (ctx.input.is_key_name_down(&key) == down).into_lua_multi(lua)
}

fn input_is_key_down(
        lua: &Lua,
        ctx: &SharedContext,
        args: &Args,
) -> mlua::Result<MultiValue>
{
        key_query(lua, ctx, args, true)
}

fn input_is_key_released(
        lua: &Lua,
        ctx: &SharedContext,
        args: &Args,
) -> mlua::Result<MultiValue>
{
        key_query(lua, ctx, args, false)
}

fn button_query(
        lua: &Lua,
        ctx: &SharedContext,
        args: &Args,
        down: bool,
) -> mlua::Result<MultiValue>
{
        let button = args.int(1)?;

        let ctx = ctx.borrow();

        if !ctx.window_ready()
        {
                return nothing();
        }

        (ctx.input.is_mouse_button_down(button.into()) == down).into_lua_multi(lua)
}

fn input_is_mouse_button_down(
        lua: &Lua,
        ctx: &SharedContext,
        args: &Args,
) -> mlua::Result<MultiValue>
{
        button_query(lua, ctx, args, true)
}

fn input_is_mouse_button_released(
        lua: &Lua,
        ctx: &SharedContext,
        args: &Args,
) -> mlua::Result<MultiValue>
{
        button_query(lua, ctx, args, false)
}

fn input_get_mouse_pos(
        lua: &Lua,
        ctx: &SharedContext,
        _args: &Args,
) -> mlua::Result<MultiValue>
{
        let ctx = ctx.borrow();

        if !ctx.window_ready()
        {
                return nothing();
        }

        ctx.input.mouse_position().into_lua_multi(lua)
}

/// Mouse position as fractions of the window size.
fn input_get_mouse_rel_pos(
        lua: &Lua,
        ctx: &SharedContext,
        _args: &Args,
) -> mlua::Result<MultiValue>
{
        let ctx = ctx.borrow();

        if !ctx.window_ready()
        {
                return nothing();
        }

        let (x, y) = ctx.input.mouse_position();

        let (width, height) = ctx.platform.window_size();

        let rx = f64::from(x) / f64::from(width.max(1));
        let ry = f64::from(y) / f64::from(height.max(1));

        (rx, ry).into_lua_multi(lua)
}

fn background_set_color(
        _lua: &Lua,
        ctx: &SharedContext,
        args: &Args,
) -> mlua::Result<MultiValue>
{
        let color = color_arg(args, 1)?;

        let mut ctx = ctx.borrow_mut();

        if ctx.window_ready()
        {
                ctx.background = color;
        }

        nothing()
}

fn background_get_color(
        lua: &Lua,
        ctx: &SharedContext,
        _args: &Args,
) -> mlua::Result<MultiValue>
{
        let color = {
                let ctx = ctx.borrow();

                if !ctx.window_ready()
                {
                        return nothing();
                }

                ctx.background
        };

        ColorHandle(color).into_lua_multi(lua)
}

fn drawing_set_color(
        _lua: &Lua,
        ctx: &SharedContext,
        args: &Args,
) -> mlua::Result<MultiValue>
{
        let color = color_arg(args, 1)?;

        let mut ctx = ctx.borrow_mut();

        if ctx.window_ready()
        {
                ctx.draw_color = color;
        }

        nothing()
}

fn drawing_get_color(
        lua: &Lua,
        ctx: &SharedContext,
        _args: &Args,
) -> mlua::Result<MultiValue>
{
        let color = {
                let ctx = ctx.borrow();

                if !ctx.window_ready()
                {
                        return nothing();
                }

                ctx.draw_color
        };

        ColorHandle(color).into_lua_multi(lua)
}

/// `x, y[, w, h]`. Without a size the rectangle collapses to the pixel at
/// `(x, y)`; with only one of `w` and `h` the other is 0 and nothing is drawn.
fn rect_args(args: &Args) -> mlua::Result<(i32, i32, Option<(i32, i32)>)>
{
        let x = args.int(1)?;
        let y = args.int(2)?;

        if args.is_absent(3) && args.is_absent(4)
        {
                return Ok((x, y, None));
        }

        let w = args.opt_int(3)?.unwrap_or(0);
        let h = args.opt_int(4)?.unwrap_or(0);

        Ok((x, y, Some((w, h))))
}

fn drawing_draw_rect(
        _lua: &Lua,
        ctx: &SharedContext,
        args: &Args,
) -> mlua::Result<MultiValue>
{
        let (x, y, size) = rect_args(args)?;

        let mut ctx = ctx.borrow_mut();

        if !ctx.window_ready()
        {
                return nothing();
        }

        let color = ctx.draw_color;

        match size
        {
                Some((w, h)) => ctx.canvas.draw_rect(x, y, w, h, color),
                None => ctx.canvas.draw_point(x, y, color),
        }

        nothing()
}

fn drawing_fill_rect(
        _lua: &Lua,
        ctx: &SharedContext,
        args: &Args,
) -> mlua::Result<MultiValue>
{
        let (x, y, size) = rect_args(args)?;

        let mut ctx = ctx.borrow_mut();

        if !ctx.window_ready()
        {
                return nothing();
        }

        let color = ctx.draw_color;

        match size
        {
                Some((w, h)) => ctx.canvas.fill_rect(x, y, w, h, color),
                None => ctx.canvas.draw_point(x, y, color),
        }

        nothing()
}

fn drawing_draw_pixel(
        _lua: &Lua,
        ctx: &SharedContext,
        args: &Args,
) -> mlua::Result<MultiValue>
{
        let x = args.int(1)?;
        let y = args.int(2)?;

        let mut ctx = ctx.borrow_mut();

        if ctx.window_ready()
        {
                let color = ctx.draw_color;

                ctx.canvas.draw_point(x, y, color);
        }

        nothing()
}

fn drawing_draw_image(
        _lua: &Lua,
        ctx: &SharedContext,
        args: &Args,
) -> mlua::Result<MultiValue>
{
        let image = args.handle::<ImageHandle>(1)?;
        let x = args.int(2)?;
        let y = args.int(3)?;

        let mut ctx = ctx.borrow_mut();

        if !ctx.window_ready() || !ctx.images_ready
        {
                return nothing();
        }

        let data = image.data();

        ctx.canvas.blit(data.rgba(), data.width(), data.height(), x, y);

        nothing()
}

/// `r, g, b` default to 0 and `a` to 255.
fn color_new(
        lua: &Lua,
        _ctx: &SharedContext,
        args: &Args,
) -> mlua::Result<MultiValue>
{
        let channel = |position: usize, default: u8| -> mlua::Result<u8> {
                Ok(args.opt_number(position)?.map_or(default, Color::channel))
        };

        let color = Color::rgba(channel(1, 0)?, channel(2, 0)?, channel(3, 0)?, channel(4, 255)?);

        ColorHandle(color).into_lua_multi(lua)
}

fn image_new(
        lua: &Lua,
        ctx: &SharedContext,
        args: &Args,
) -> mlua::Result<MultiValue>
{
        let path = args.string(1)?;

        if !ctx.borrow().images_ready
        {
                return nothing();
        }

        ImageHandle::open(lua, path)?.into_lua_multi(lua)
}

fn sound_new(
        lua: &Lua,
        ctx: &SharedContext,
        args: &Args,
) -> mlua::Result<MultiValue>
{
        let path = args.string(1)?;

        if !ctx.borrow().audio_ready()
        {
                return nothing();
        }

        SoundHandle::open(lua, path)?.into_lua_multi(lua)
}

#[cfg(test)]
mod tests
{
        use super::*;

        #[test]
        fn qualified_names_are_unique()
        {
                let mut names: Vec<&str> = BINDINGS.iter().map(|(name, _)| *name).collect();

                names.sort_unstable();
                names.dedup();

                assert_eq!(names.len(), BINDINGS.len());
        }

        #[test]
        fn every_area_is_registered()
        {
                for area in ["Window", "Input", "Background", "Drawing", "Color", "Image", "Sound"]
                {
                        assert!(
                                BINDINGS.iter().any(|(name, _)| name.starts_with(&format!("{area}."))),
                                "missing {area}"
                        );
                }
        }
}
