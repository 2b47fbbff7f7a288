//! CLI argument definitions for `poseidonos-cli`.
//!
//! This module defines the command-line interface structure used by
//! both the runtime parser and the build script for manpage generation.

use clap::{Args, Parser, Subcommand};

/// Command-line client for the PoseidonOS storage daemon.
#[derive(Parser, Debug)]
#[command(
    name = "poseidonos-cli",
    version,
    disable_help_subcommand = true,
    after_help = "Configuration flags (--config-path, --daemon-socket, --log-filter, \
                  --log-format, --request-timeout-ms, --start-script) must precede the command.\n\
                  Use --log-filter warn,pos_cli::request=info to log every request sent."
)]
pub(crate) struct Cli {
    /// Prints the request sent to the daemon and its raw reply on stderr.
    #[arg(long, global = true)]
    pub(crate) debug: bool,
    /// Prints the daemon's reply as raw JSON instead of a summary.
    #[arg(long, global = true)]
    pub(crate) json: bool,
    /// The command to run.
    #[command(subcommand)]
    pub(crate) command: CliCommand,
}

/// Command groups.
#[derive(Subcommand, Debug, Clone)]
pub(crate) enum CliCommand {
    /// Controls the PoseidonOS process.
    System {
        /// The system action to perform.
        #[command(subcommand)]
        action: SystemAction,
    },
    /// Manages volumes inside an array.
    Volume {
        /// The volume action to perform.
        #[command(subcommand)]
        action: VolumeAction,
    },
}

/// System actions.
#[derive(Subcommand, Debug, Clone, Copy)]
pub(crate) enum SystemAction {
    /// Starts PoseidonOS using the local start script.
    Start,
    /// Stops PoseidonOS.
    Stop,
    /// Prints the PoseidonOS state summary.
    Info,
    /// Prints the PoseidonOS version.
    Version,
}

/// Volume actions.
#[derive(Subcommand, Debug, Clone)]
pub(crate) enum VolumeAction {
    /// Creates a volume from an array.
    Create(CreateVolumeArgs),
    /// Deletes a volume.
    Delete(VolumeArgs),
    /// Mounts a volume to hosts.
    Mount(MountVolumeArgs),
    /// Unmounts a volume from hosts.
    Unmount(VolumeArgs),
    /// Lists the volumes of an array.
    List(ArrayArgs),
    /// Renames a volume.
    Rename(RenameVolumeArgs),
    /// Resizes a volume.
    Resize(ResizeVolumeArgs),
    /// Sets the IOPS and bandwidth limits of a volume.
    SetQos(VolumeQosArgs),
}

/// Arguments for `volume create`.
#[derive(Args, Debug, Clone)]
pub(crate) struct CreateVolumeArgs {
    /// Name of the volume to create.
    #[arg(long = "volume-name")]
    pub(crate) volume_name: String,
    /// Name of the array the volume is created from.
    #[arg(long = "array-name", short = 'a')]
    pub(crate) array_name: String,
    /// Size of the volume.
    #[arg(long)]
    pub(crate) size: u64,
    /// Maximum IOPS of the volume; 0 means unlimited.
    #[arg(long, default_value_t = 0)]
    pub(crate) maxiops: u64,
    /// Maximum bandwidth of the volume in MB/s; 0 means unlimited.
    #[arg(long, default_value_t = 0)]
    pub(crate) maxbw: u64,
}

/// Arguments naming one volume.
#[derive(Args, Debug, Clone)]
pub(crate) struct VolumeArgs {
    /// Name of the volume.
    #[arg(long = "volume-name")]
    pub(crate) volume_name: String,
    /// Name of the array the volume belongs to.
    #[arg(long = "array-name", short = 'a')]
    pub(crate) array_name: String,
}

/// Arguments for `volume mount`.
#[derive(Args, Debug, Clone)]
pub(crate) struct MountVolumeArgs {
    /// Name of the volume to mount.
    #[arg(long = "volume-name")]
    pub(crate) volume_name: String,
    /// Name of the array the volume belongs to.
    #[arg(long = "array-name", short = 'a')]
    pub(crate) array_name: String,
    /// NVMe qualified name of the target NVM subsystem.
    #[arg(long, default_value = "")]
    pub(crate) subnqn: String,
}

/// Arguments naming one array.
#[derive(Args, Debug, Clone)]
pub(crate) struct ArrayArgs {
    /// Name of the array.
    #[arg(long = "array-name", short = 'a')]
    pub(crate) array_name: String,
}

/// Arguments for `volume rename`.
#[derive(Args, Debug, Clone)]
pub(crate) struct RenameVolumeArgs {
    /// Current name of the volume.
    #[arg(long = "volume-name")]
    pub(crate) volume_name: String,
    /// New name of the volume.
    #[arg(long = "new-volume-name")]
    pub(crate) new_volume_name: String,
    /// Name of the array the volume belongs to.
    #[arg(long = "array-name", short = 'a')]
    pub(crate) array_name: String,
}

/// Arguments for `volume resize`.
#[derive(Args, Debug, Clone)]
pub(crate) struct ResizeVolumeArgs {
    /// Name of the volume to resize.
    #[arg(long = "volume-name")]
    pub(crate) volume_name: String,
    /// Name of the array the volume belongs to.
    #[arg(long = "array-name", short = 'a')]
    pub(crate) array_name: String,
    /// New size of the volume.
    #[arg(long)]
    pub(crate) size: u64,
}

/// Arguments for `volume set-qos`.
#[derive(Args, Debug, Clone)]
pub(crate) struct VolumeQosArgs {
    /// Name of the volume.
    #[arg(long = "volume-name")]
    pub(crate) volume_name: String,
    /// Name of the array the volume belongs to.
    #[arg(long = "array-name", short = 'a')]
    pub(crate) array_name: String,
    /// Maximum IOPS of the volume; 0 means unlimited.
    #[arg(long, default_value_t = 0)]
    pub(crate) maxiops: u64,
    /// Maximum bandwidth of the volume in MB/s; 0 means unlimited.
    #[arg(long, default_value_t = 0)]
    pub(crate) maxbw: u64,
}
