//! Argument checks for bindings.
//!
//! Positions are 1-based like Lua's own `bad argument #n` messages.

use mlua::{UserDataRef, Value};

use crate::{
        error::ArgumentError,
        script::registry::{Handle, HandleKind},
};

/// Lua-style type name, with handle types reported by their own name.
pub fn type_name(value: Option<&Value>) -> String
{
        match value
        {
                None => String::from("no value"),
                Some(value) => match HandleKind::of(value)
                {
                        Some(kind) => kind.name().to_string(),
                        None => value.type_name().to_string(),
                },
        }
}

/// Numbers and numeric strings, as `lua_isnumber` accepts them.
pub fn to_number(value: &Value) -> Option<f64>
{
        match value
        {
                Value::Integer(i) => Some(*i as f64),
                Value::Number(n) => Some(*n),
                Value::String(s) => s.to_str().ok()?.trim().parse().ok(),
                _ => None,
        }
}

/// Arguments of one binding call.
pub struct Args<'a>
{
        function: &'static str,
        values: &'a [Value],
}

impl<'a> Args<'a>
{
        pub fn new(
                function: &'static str,
                values: &'a [Value],
        ) -> Self
        {
                Self {
                        function,
                        values,
                }
        }

        pub fn function(&self) -> &'static str
        {
                self.function
        }

        pub fn len(&self) -> usize
        {
                self.values.len()
        }

        pub fn is_empty(&self) -> bool
        {
                self.values.is_empty()
        }

        pub fn get(
                &self,
                position: usize,
        ) -> Option<&'a Value>
        {
                position.checked_sub(1).and_then(|i| self.values.get(i))
        }

        /// `nil` and missing arguments both count as absent.
        pub fn is_absent(
                &self,
                position: usize,
        ) -> bool
        {
                matches!(self.get(position), None | Some(Value::Nil))
        }

        pub fn mismatch(
                &self,
                position: usize,
                expected: &'static str,
        ) -> ArgumentError
        {
                ArgumentError {
                        function: self.function,
                        position,
                        expected,
                        actual: type_name(self.get(position)),
                }
        }

        pub fn number(
                &self,
                position: usize,
        ) -> Result<f64, ArgumentError>
        {
                self.get(position)
                        .and_then(to_number)
                        .ok_or_else(|| self.mismatch(position, "number"))
        }

        pub fn opt_number(
                &self,
                position: usize,
        ) -> Result<Option<f64>, ArgumentError>
        {
                if self.is_absent(position)
                {
                        return Ok(None);
                }

                self.number(position).map(Some)
        }

        /// Number truncated toward zero, saturating at the `i32` range.
        pub fn int(
                &self,
                position: usize,
        ) -> Result<i32, ArgumentError>
        {
                self.number(position).map(|n| n as i32)
        }

        pub fn opt_int(
                &self,
                position: usize,
        ) -> Result<Option<i32>, ArgumentError>
        {
                self.opt_number(position).map(|n| n.map(|n| n as i32))
        }

        pub fn string(
                &self,
                position: usize,
        ) -> Result<String, ArgumentError>
        {
                match self.get(position)
                {
                        Some(Value::String(s)) => Ok(s.to_string_lossy()),
                        Some(Value::Integer(i)) => Ok(i.to_string()),
                        Some(Value::Number(n)) => Ok(n.to_string()),
                        _ => Err(self.mismatch(position, "string")),
                }
        }

        pub fn opt_string(
                &self,
                position: usize,
        ) -> Result<Option<String>, ArgumentError>
        {
                if self.is_absent(position)
                {
                        return Ok(None);
                }

                self.string(position).map(Some)
        }

        /// Borrows the handle of type `T` at `position`.
        pub fn handle<T: Handle>(
                &self,
                position: usize,
        ) -> mlua::Result<UserDataRef<T>>
        {
                match self.get(position)
                {
                        Some(Value::UserData(ud)) if ud.is::<T>() => ud.borrow::<T>(),
                        _ => Err(self.mismatch(position, T::KIND.name()).into()),
                }
        }
}
