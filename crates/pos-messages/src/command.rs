//! The closed set of control commands understood by the daemon.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::params::{
    ArrayParam, CreateVolumeParam, MountVolumeParam, RenameVolumeParam, ResizeVolumeParam,
    VolumeParam, VolumeQosParam,
};

/// Wire identifiers for every supported command.
///
/// `Display` and `FromStr` use the wire spelling (for example `CREATEVOLUME`).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
pub enum CommandId {
    /// Launches the daemon locally.
    #[serde(rename = "RUNIBOFOS")]
    #[strum(serialize = "RUNIBOFOS")]
    StartSystem,
    /// Asks the daemon to exit.
    #[serde(rename = "EXITIBOFOS")]
    #[strum(serialize = "EXITIBOFOS")]
    StopSystem,
    /// Requests the daemon state summary.
    #[serde(rename = "GETIBOFOSINFO")]
    #[strum(serialize = "GETIBOFOSINFO")]
    SystemInfo,
    /// Requests the daemon version.
    #[serde(rename = "GETVERSION")]
    #[strum(serialize = "GETVERSION")]
    SystemVersion,
    /// Creates a volume.
    #[serde(rename = "CREATEVOLUME")]
    #[strum(serialize = "CREATEVOLUME")]
    CreateVolume,
    /// Deletes a volume.
    #[serde(rename = "DELETEVOLUME")]
    #[strum(serialize = "DELETEVOLUME")]
    DeleteVolume,
    /// Exposes a volume to hosts.
    #[serde(rename = "MOUNTVOLUME")]
    #[strum(serialize = "MOUNTVOLUME")]
    MountVolume,
    /// Withdraws a volume from hosts.
    #[serde(rename = "UNMOUNTVOLUME")]
    #[strum(serialize = "UNMOUNTVOLUME")]
    UnmountVolume,
    /// Lists the volumes of an array.
    #[serde(rename = "LISTVOLUME")]
    #[strum(serialize = "LISTVOLUME")]
    ListVolume,
    /// Renames a volume.
    #[serde(rename = "RENAMEVOLUME")]
    #[strum(serialize = "RENAMEVOLUME")]
    RenameVolume,
    /// Grows or shrinks a volume.
    #[serde(rename = "RESIZEVOLUME")]
    #[strum(serialize = "RESIZEVOLUME")]
    ResizeVolume,
    /// Changes the throttling limits of a volume.
    #[serde(rename = "UPDATEVOLUMEQOS")]
    #[strum(serialize = "UPDATEVOLUMEQOS")]
    UpdateVolumeQos,
}

impl CommandId {
    /// Returns the identifier as it appears in the `command` field.
    #[must_use]
    pub fn wire_name(self) -> &'static str {
        self.into()
    }

    /// Short operator-facing description, such as `create volume`.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::StartSystem => "start system",
            Self::StopSystem => "stop system",
            Self::SystemInfo => "system info",
            Self::SystemVersion => "system version",
            Self::CreateVolume => "create volume",
            Self::DeleteVolume => "delete volume",
            Self::MountVolume => "mount volume",
            Self::UnmountVolume => "unmount volume",
            Self::ListVolume => "list volume",
            Self::RenameVolume => "rename volume",
            Self::ResizeVolume => "resize volume",
            Self::UpdateVolumeQos => "update volume qos",
        }
    }

    /// Returns true for the command that launches the daemon instead of
    /// talking to it.
    #[must_use]
    pub const fn is_bootstrap(self) -> bool {
        matches!(self, Self::StartSystem)
    }
}

/// A command together with the parameters its wire identifier requires.
///
/// The variant fixes both the `command` string and the shape of `param`, so
/// a request can never pair an identifier with another command's payload.
/// Commands without parameters omit `param` entirely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", content = "param")]
pub enum Command {
    /// `RUNIBOFOS`
    #[serde(rename = "RUNIBOFOS")]
    StartSystem,
    /// `EXITIBOFOS`
    #[serde(rename = "EXITIBOFOS")]
    StopSystem,
    /// `GETIBOFOSINFO`
    #[serde(rename = "GETIBOFOSINFO")]
    SystemInfo,
    /// `GETVERSION`
    #[serde(rename = "GETVERSION")]
    SystemVersion,
    /// `CREATEVOLUME`
    #[serde(rename = "CREATEVOLUME")]
    CreateVolume(CreateVolumeParam),
    /// `DELETEVOLUME`
    #[serde(rename = "DELETEVOLUME")]
    DeleteVolume(VolumeParam),
    /// `MOUNTVOLUME`
    #[serde(rename = "MOUNTVOLUME")]
    MountVolume(MountVolumeParam),
    /// `UNMOUNTVOLUME`
    #[serde(rename = "UNMOUNTVOLUME")]
    UnmountVolume(VolumeParam),
    /// `LISTVOLUME`
    #[serde(rename = "LISTVOLUME")]
    ListVolume(ArrayParam),
    /// `RENAMEVOLUME`
    #[serde(rename = "RENAMEVOLUME")]
    RenameVolume(RenameVolumeParam),
    /// `RESIZEVOLUME`
    #[serde(rename = "RESIZEVOLUME")]
    ResizeVolume(ResizeVolumeParam),
    /// `UPDATEVOLUMEQOS`
    #[serde(rename = "UPDATEVOLUMEQOS")]
    UpdateVolumeQos(VolumeQosParam),
}

impl Command {
    /// Returns the wire identifier for this command.
    #[must_use]
    pub const fn id(&self) -> CommandId {
        match self {
            Self::StartSystem => CommandId::StartSystem,
            Self::StopSystem => CommandId::StopSystem,
            Self::SystemInfo => CommandId::SystemInfo,
            Self::SystemVersion => CommandId::SystemVersion,
            Self::CreateVolume(_) => CommandId::CreateVolume,
            Self::DeleteVolume(_) => CommandId::DeleteVolume,
            Self::MountVolume(_) => CommandId::MountVolume,
            Self::UnmountVolume(_) => CommandId::UnmountVolume,
            Self::ListVolume(_) => CommandId::ListVolume,
            Self::RenameVolume(_) => CommandId::RenameVolume,
            Self::ResizeVolume(_) => CommandId::ResizeVolume,
            Self::UpdateVolumeQos(_) => CommandId::UpdateVolumeQos,
        }
    }

    /// Name of the volume the command targets, when it targets one.
    #[must_use]
    pub fn volume_name(&self) -> Option<&str> {
        match self {
            Self::CreateVolume(param) => Some(&param.volume_name),
            Self::DeleteVolume(param) | Self::UnmountVolume(param) => Some(&param.volume_name),
            Self::MountVolume(param) => Some(&param.volume_name),
            Self::RenameVolume(param) => Some(&param.volume_name),
            Self::ResizeVolume(param) => Some(&param.volume_name),
            Self::UpdateVolumeQos(param) => Some(&param.volume_name),
            Self::StartSystem
            | Self::StopSystem
            | Self::SystemInfo
            | Self::SystemVersion
            | Self::ListVolume(_) => None,
        }
    }

    /// Name of the array the command targets, when it targets one.
    #[must_use]
    pub fn array_name(&self) -> Option<&str> {
        match self {
            Self::CreateVolume(param) => Some(&param.array_name),
            Self::DeleteVolume(param) | Self::UnmountVolume(param) => Some(&param.array_name),
            Self::MountVolume(param) => Some(&param.array_name),
            Self::ListVolume(param) => Some(&param.array_name),
            Self::RenameVolume(param) => Some(&param.array_name),
            Self::ResizeVolume(param) => Some(&param.array_name),
            Self::UpdateVolumeQos(param) => Some(&param.array_name),
            Self::StartSystem | Self::StopSystem | Self::SystemInfo | Self::SystemVersion => None,
        }
    }
}
