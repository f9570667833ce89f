//! Caller-side bridge to an out-of-runtime compute engine.
//!
//! Resolve a [`binding::BindingHandle`] once with a [`resolver::Resolver`],
//! wrap it in a [`bridge::Bridge`], and send it [`command::Command`]s.

pub mod binding;
pub mod bridge;
pub mod command;
pub mod consts;
pub mod error;
pub mod protocol;
pub mod resolver;

pub use bridge::Bridge;
pub use command::{Command, RawCommand, Request};
pub use error::{BridgeError, Result};
