//! Per-command parameter payloads carried in the request `param` object.
//!
//! Rust field names are descriptive; the serde renames are the wire names the
//! daemon reads from `param`.

use serde::{Deserialize, Serialize};

/// Parameters for `CREATEVOLUME`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateVolumeParam {
    /// Name of the volume to create.
    #[serde(rename = "name")]
    pub volume_name: String,
    /// Volume size in bytes as understood by the daemon.
    pub size: u64,
    /// Maximum IOPS; zero leaves the volume unthrottled.
    #[serde(rename = "maxiops", default)]
    pub max_iops: u64,
    /// Maximum bandwidth; zero leaves the volume unthrottled.
    #[serde(rename = "maxbw", default)]
    pub max_bandwidth: u64,
    /// Array the volume is carved from.
    #[serde(rename = "array")]
    pub array_name: String,
}

/// Parameters for `MOUNTVOLUME`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MountVolumeParam {
    /// Name of the volume to expose.
    #[serde(rename = "name")]
    pub volume_name: String,
    /// NVMe qualified name of the target subsystem; omitted on the wire when
    /// empty so the daemon picks a subsystem itself.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub subnqn: String,
    /// Array owning the volume.
    #[serde(rename = "array")]
    pub array_name: String,
}

/// Parameters naming a single volume, used by `DELETEVOLUME` and
/// `UNMOUNTVOLUME`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeParam {
    /// Name of the target volume.
    #[serde(rename = "name")]
    pub volume_name: String,
    /// Array owning the volume.
    #[serde(rename = "array")]
    pub array_name: String,
}

/// Parameters naming an array, used by `LISTVOLUME`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArrayParam {
    /// Name of the array to inspect.
    #[serde(rename = "array")]
    pub array_name: String,
}

/// Parameters for `RENAMEVOLUME`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameVolumeParam {
    /// Current volume name.
    #[serde(rename = "name")]
    pub volume_name: String,
    /// Name the volume should carry afterwards.
    #[serde(rename = "newname")]
    pub new_name: String,
    /// Array owning the volume.
    #[serde(rename = "array")]
    pub array_name: String,
}

/// Parameters for `RESIZEVOLUME`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResizeVolumeParam {
    /// Name of the volume to resize.
    #[serde(rename = "name")]
    pub volume_name: String,
    /// New volume size.
    pub size: u64,
    /// Array owning the volume.
    #[serde(rename = "array")]
    pub array_name: String,
}

/// Parameters for `UPDATEVOLUMEQOS`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeQosParam {
    /// Name of the throttled volume.
    #[serde(rename = "name")]
    pub volume_name: String,
    /// Maximum IOPS; zero removes the limit.
    #[serde(rename = "maxiops", default)]
    pub max_iops: u64,
    /// Maximum bandwidth; zero removes the limit.
    #[serde(rename = "maxbw", default)]
    pub max_bandwidth: u64,
    /// Array owning the volume.
    #[serde(rename = "array")]
    pub array_name: String,
}
