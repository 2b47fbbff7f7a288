//! Command modelling for `poseidonos-cli` requests.
//!
//! This module turns parsed CLI arguments into the typed [`Command`] carried
//! by the request envelope, so the runtime never handles loose flag values.

use pos_messages::{
    ArrayParam, Command, CreateVolumeParam, MountVolumeParam, RenameVolumeParam, Request,
    ResizeVolumeParam, VolumeParam, VolumeQosParam,
};

use crate::cli::{CliCommand, SystemAction, VolumeAction};

impl From<CliCommand> for Command {
    fn from(command: CliCommand) -> Self {
        match command {
            CliCommand::System { action } => action.into(),
            CliCommand::Volume { action } => action.into(),
        }
    }
}

impl From<SystemAction> for Command {
    fn from(action: SystemAction) -> Self {
        match action {
            SystemAction::Start => Self::StartSystem,
            SystemAction::Stop => Self::StopSystem,
            SystemAction::Info => Self::SystemInfo,
            SystemAction::Version => Self::SystemVersion,
        }
    }
}

impl From<VolumeAction> for Command {
    fn from(action: VolumeAction) -> Self {
        match action {
            VolumeAction::Create(args) => Self::CreateVolume(CreateVolumeParam {
                volume_name: args.volume_name,
                size: args.size,
                max_iops: args.maxiops,
                max_bandwidth: args.maxbw,
                array_name: args.array_name,
            }),
            VolumeAction::Delete(args) => Self::DeleteVolume(VolumeParam {
                volume_name: args.volume_name,
                array_name: args.array_name,
            }),
            VolumeAction::Mount(args) => Self::MountVolume(MountVolumeParam {
                volume_name: args.volume_name,
                subnqn: args.subnqn,
                array_name: args.array_name,
            }),
            VolumeAction::Unmount(args) => Self::UnmountVolume(VolumeParam {
                volume_name: args.volume_name,
                array_name: args.array_name,
            }),
            VolumeAction::List(args) => Self::ListVolume(ArrayParam {
                array_name: args.array_name,
            }),
            VolumeAction::Rename(args) => Self::RenameVolume(RenameVolumeParam {
                volume_name: args.volume_name,
                new_name: args.new_volume_name,
                array_name: args.array_name,
            }),
            VolumeAction::Resize(args) => Self::ResizeVolume(ResizeVolumeParam {
                volume_name: args.volume_name,
                size: args.size,
                array_name: args.array_name,
            }),
            VolumeAction::SetQos(args) => Self::UpdateVolumeQos(VolumeQosParam {
                volume_name: args.volume_name,
                max_iops: args.maxiops,
                max_bandwidth: args.maxbw,
                array_name: args.array_name,
            }),
        }
    }
}

/// Correlation identifier attached to every request from this process.
pub(crate) fn process_request_id() -> String {
    format!("poseidonos-cli-{}", std::process::id())
}

/// Builds the request envelope for `command`.
pub(crate) fn build_request(request_id: &str, command: Command) -> Request {
    Request::new(request_id, command)
}
