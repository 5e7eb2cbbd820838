//! Type registry for script handles.
//!
//! Each handle type owns a [`FieldTable`], built once on first use, that maps
//! a field name to its accessor pair. The `__index`, `__newindex` and
//! `__tostring` metamethods of every handle type go through
//! [`add_field_metamethods`].

use std::{collections::HashMap, fmt};

use mlua::{AnyUserData, Lua, MetaMethod, UserData, UserDataMethods, Value};

use crate::script::handles::{ColorHandle, ImageHandle, SoundHandle};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleKind
{
        Color,
        Image,
        Sound,
}

impl HandleKind
{
        pub fn name(self) -> &'static str
        {
                match self
                {
                        HandleKind::Color => "Color",
                        HandleKind::Image => "Image",
                        HandleKind::Sound => "Sound",
                }
        }

        /// Kind of the handle wrapped by `value`, if it is one.
        pub fn of(value: &Value) -> Option<HandleKind>
        {
                let Value::UserData(ud) = value
                else
                {
                        return None;
                };

                if ud.is::<ColorHandle>()
                {
                        Some(HandleKind::Color)
                }
                else if ud.is::<ImageHandle>()
                {
                        Some(HandleKind::Image)
                }
                else if ud.is::<SoundHandle>()
                {
                        Some(HandleKind::Sound)
                }
                else
                {
                        None
                }
        }
}

impl fmt::Display for HandleKind
{
        fn fmt(
                &self,
                f: &mut fmt::Formatter<'_>,
        ) -> fmt::Result
        {
                f.write_str(self.name())
        }
}

pub type Getter<T> = fn(&Lua, &T) -> mlua::Result<Value>;

pub type Setter<T> = fn(&Lua, &mut T, Value) -> mlua::Result<()>;

struct Field<T>
{
        get: Getter<T>,
        set: Option<Setter<T>>,
}

/// Field name to accessor lookup for one handle type.
pub struct FieldTable<T>
{
        fields: HashMap<&'static str, Field<T>>,
}

impl<T> FieldTable<T>
{
        pub fn new() -> Self
        {
                Self {
                        fields: HashMap::new(),
                }
        }

        pub fn field(
                mut self,
                name: &'static str,
                get: Getter<T>,
                set: Setter<T>,
        ) -> Self
        {
                self.fields.insert(name, Field {
                        get,
                        set: Some(set),
                });

                self
        }

        /// Adds a field whose writes are ignored.
        pub fn read_only(
                mut self,
                name: &'static str,
                get: Getter<T>,
        ) -> Self
        {
                self.fields.insert(name, Field {
                        get,
                        set: None,
                });

                self
        }

        pub fn contains(
                &self,
                name: &str,
        ) -> bool
        {
                self.fields.contains_key(name)
        }

        /// Reads `name`, or `nil` when there is no such field.
        pub fn get(
                &self,
                lua: &Lua,
                handle: &T,
                name: &str,
        ) -> mlua::Result<Value>
        {
                match self.fields.get(name)
                {
                        Some(field) => (field.get)(lua, handle),
                        None => Ok(Value::Nil),
                }
        }

        /// Writes `name`. Returns `false` when the field is unknown or read
        /// only, in which case nothing happened.
        pub fn set(
                &self,
                lua: &Lua,
                handle: &mut T,
                name: &str,
                value: Value,
        ) -> mlua::Result<bool>
        {
                match self.fields.get(name).and_then(|f| f.set)
                {
                        Some(set) =>
                        {
                                set(lua, handle, value)?;

                                Ok(true)
                        }
                        None => Ok(false),
                }
        }
}

impl<T> Default for FieldTable<T>
{
        fn default() -> Self
        {
                Self::new()
        }
}

/// Behaviour shared by every script-visible handle type.
pub trait Handle: UserData + Sized + 'static
{
        const KIND: HandleKind;

        fn fields() -> &'static FieldTable<Self>;

        /// `__tostring` text.
        fn describe(&self) -> String;

        /// Independent copy built from the current field values.
        fn duplicate(
                &self,
                lua: &Lua,
        ) -> mlua::Result<Self>;
}

/// Installs `__index`, `__newindex` and `__tostring` backed by the type's
/// field table. Named methods registered with `add_method` are found before
/// `__index` runs.
pub fn add_field_metamethods<T, M>(methods: &mut M)
where
        T: Handle,
        M: UserDataMethods<T>,
{
        methods.add_meta_method(MetaMethod::Index, |lua, this, key: Value| {
                let Value::String(name) = key
                else
                {
                        return Ok(Value::Nil);
                };

                T::fields().get(lua, this, &name.to_str()?)
        });

        methods.add_meta_method_mut(MetaMethod::NewIndex, |lua, this, (key, value): (Value, Value)| {
                let name = match &key
                {
                        Value::String(name) => name.to_str()?.to_string(),
                        other => format!("<{}>", other.type_name()),
                };

                if !T::fields().set(lua, this, &name, value)?
                {
                        log::debug!("Ignored write to field '{name}' of {}.", T::KIND);
                }

                Ok(())
        });

        methods.add_meta_method(MetaMethod::ToString, |_, this, ()| Ok(this.describe()));
}

fn duplicate_as<T: Handle>(
        lua: &Lua,
        ud: &AnyUserData,
) -> mlua::Result<Value>
{
        let copy = ud.borrow::<T>()?.duplicate(lua)?;

        Ok(Value::UserData(lua.create_userdata(copy)?))
}

/// Deep copy for handles, the value itself for everything else.
pub fn copy_value(
        lua: &Lua,
        value: Value,
) -> mlua::Result<Value>
{
        let (kind, ud) = match (HandleKind::of(&value), value)
        {
                (Some(kind), Value::UserData(ud)) => (kind, ud),
                (_, value) => return Ok(value),
        };

        match kind
        {
                HandleKind::Color => duplicate_as::<ColorHandle>(lua, &ud),
                HandleKind::Image => duplicate_as::<ImageHandle>(lua, &ud),
                HandleKind::Sound => duplicate_as::<SoundHandle>(lua, &ud),
        }
}
