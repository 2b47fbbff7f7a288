//! Wire messages exchanged between `poseidonos-cli` and the storage daemon.
//!
//! Every control operation travels as a single JSON [`Request`] envelope and
//! is answered with a single JSON [`Response`]. Field names are part of the
//! wire contract shared with the daemon, so the serde attributes in this crate
//! must not be changed independently of it.

mod command;
mod error;
mod params;
mod request;
mod response;

pub use command::{Command, CommandId};
pub use error::MessageError;
pub use params::{
    ArrayParam, CreateVolumeParam, MountVolumeParam, RenameVolumeParam, ResizeVolumeParam,
    VolumeParam, VolumeQosParam,
};
pub use request::Request;
pub use response::{CommandResult, Response, Status};

/// Status code reported by the daemon when a command succeeds.
pub const SUCCESS_CODE: i32 = 0;
