//! Lua host and the `Luma` binding surface.

pub mod args;
pub mod bindings;
pub mod handles;
pub mod registry;

use std::path::Path;

use mlua::{Function, IntoLuaMulti, Lua, Value, Variadic};

use crate::{context::SharedContext, error::EngineError};

/// Context stored in the Lua app data, if any.
pub fn context(lua: &Lua) -> Option<SharedContext>
{
        lua.app_data_ref::<SharedContext>().map(|ctx| SharedContext::clone(&ctx))
}

/// Latches `err` as fatal and returns the error that unwinds the script.
pub fn raise_fatal(
        lua: &Lua,
        err: EngineError,
) -> mlua::Error
{
        let Some(ctx) = context(lua)
        else
        {
                return mlua::Error::RuntimeError(err.to_string());
        };

        match ctx.try_borrow_mut()
        {
                Ok(mut ctx) => ctx.fatal(err),
                Err(_) =>
                {
                        log::error!("Fatal error raised while the context was busy: {err}");

                        mlua::Error::RuntimeError(err.to_string())
                }
        }
}

/// Whether the image subsystem is up. Without a context images are always
/// allowed.
pub fn images_ready(lua: &Lua) -> bool
{
        context(lua).is_none_or(|ctx| ctx.borrow().images_ready)
}

/// Owns the Lua state.
#[derive(Debug)]
pub struct ScriptHost
{
        lua: Lua,
}

impl ScriptHost
{
        /// Creates the state, installs the `Luma` table and routes `print` to
        /// the log.
        pub fn new(ctx: &SharedContext) -> Result<Self, EngineError>
        {
                let lua = Lua::new();

                lua.set_app_data(ctx.clone());

                Self::route_print(&lua)?;

                bindings::register(&lua, ctx)?;

                Ok(Self {
                        lua,
                })
        }

        pub fn lua(&self) -> &Lua
        {
                &self.lua
        }

        fn route_print(lua: &Lua) -> mlua::Result<()>
        {
                let tostring: Function = lua.globals().get("tostring")?;

                let print = lua.create_function(move |_, values: Variadic<Value>| {
                        let mut line = String::new();

                        for (i, value) in values.into_iter().enumerate()
                        {
                                if i > 0
                                {
                                        line.push('\t');
                                }

                                line.push_str(&tostring.call::<String>(value)?);
                        }

                        log::info!(target: "script", "{line}");

                        Ok(())
                })?;

                lua.globals().set("print", print)
        }

        /// Runs a file's top level code.
        pub fn exec_file(
                &self,
                path: &Path,
        ) -> Result<(), EngineError>
        {
                let source = std::fs::read_to_string(path).map_err(|e| {
                        EngineError::Script(format!("Can't read '{}': {e}", path.display()))
                })?;

                self.exec(&path.display().to_string(), &source)
        }

        pub fn exec(
                &self,
                name: &str,
                source: &str,
        ) -> Result<(), EngineError>
        {
                self.lua
                        .load(source)
                        .set_name(format!("@{name}"))
                        .exec()
                        .map_err(EngineError::from)
        }

        /// Calls the global function `name` if the script defines one.
        ///
        /// A runtime error inside the call is logged and swallowed. Returns
        /// whether the function existed.
        pub fn call_entry(
                &self,
                name: &str,
                args: impl IntoLuaMulti,
        ) -> bool
        {
                let entry = match self.lua.globals().get::<Value>(name)
                {
                        Ok(Value::Function(f)) => f,
                        _ => return false,
                };

                if let Err(e) = entry.call::<()>(args)
                {
                        log::error!("Error in '{name}': {e}");
                }

                true
        }

        /// Runs a full garbage collection cycle, finalizing unreachable
        /// handles.
        pub fn collect_garbage(&self)
        {
                if let Err(e) = self.lua.gc_collect()
                {
                        log::warn!("Garbage collection failed: {e}");
                }
        }
}
