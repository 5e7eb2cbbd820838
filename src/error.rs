//! Error taxonomy of the runtime.
//!
//! There are two kinds of failure a script can run into:
//!
//! - [`EngineError`]: fatal conditions (subsystem initialisation, decode
//!   failures, channel exhaustion). These are latched in the engine context
//!   and end the process after teardown, even if the script wraps the call in
//!   `pcall`.
//! - [`ArgumentError`]: a binding was called with the wrong argument type.
//!   It is raised as an ordinary Lua error the script may catch.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError
{
        #[error("Can't initialize {subsystem}: {message}")]
        SubsystemInit
        {
                subsystem: &'static str,
                message: String,
        },

        #[error("Can't create {kind} from '{}': {message}", path.display())]
        Decode
        {
                kind: &'static str,
                path: PathBuf,
                message: String,
        },

        #[error("Can't create Sound: all {capacity} mixer channels are in use")]
        ChannelsExhausted
        {
                capacity: usize
        },

        #[error("Script error: {0}")]
        Script(String),

        #[error("Invalid config: {0}")]
        Config(String),
}

impl EngineError
{
        pub fn init(
                subsystem: &'static str,
                err: impl std::fmt::Display,
        ) -> Self
        {
                Self::SubsystemInit {
                        subsystem,
                        message: err.to_string(),
                }
        }

        pub fn decode(
                kind: &'static str,
                path: impl Into<PathBuf>,
                err: impl std::fmt::Display,
        ) -> Self
        {
                Self::Decode {
                        kind,
                        path: path.into(),
                        message: err.to_string(),
                }
        }
}

impl From<mlua::Error> for EngineError
{
        fn from(err: mlua::Error) -> Self
        {
                Self::Script(err.to_string())
        }
}

/// Argument contract violation at a binding boundary.
#[derive(Debug, Clone, Error)]
#[error("bad argument #{position} to '{function}' ({expected} expected, got {actual})")]
pub struct ArgumentError
{
        pub function: &'static str,
        pub position: usize,
        pub expected: &'static str,
        pub actual: String,
}

impl From<ArgumentError> for mlua::Error
{
        fn from(err: ArgumentError) -> Self
        {
                mlua::Error::RuntimeError(err.to_string())
        }
}
