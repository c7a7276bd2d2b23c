//! Basic types for the boot order tree.

use serde::{Deserialize, Serialize};

/// Every logical device name a boot device list may contain.
#[derive(
    Serialize,
    Deserialize,
    Debug,
    Copy,
    Clone,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum_macros::Display,
    strum_macros::EnumString,
    strum_macros::EnumIter,
    strum_macros::IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DeviceKind {
    LocalDisk,
    LocalLun,
    LocalJbod,
    Sdcard,
    InternalUsb,
    ExternalUsb,
    EmbeddedLun,
    EmbeddedDisk,
    CdDvd,
    CdDvdLocal,
    CdDvdRemote,
    Floppy,
    FloppyLocal,
    FloppyRemote,
    VirtualDrive,
    CdDvdCimc,
    HddCimc,
    Lan,
    San,
    Iscsi,
    Efi,
}

/// Device families. Each family has its own place in the policy tree and its
/// own invariants.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum DeviceFamily {
    /// Attached under the singleton local storage umbrella.
    Local,

    /// One virtual media node per access kind.
    VirtualMedia,

    /// One LAN umbrella with up to two image paths.
    Lan,

    /// One iSCSI umbrella with up to two image paths.
    Iscsi,

    /// One SAN umbrella with up to two images, each with up to two targets.
    San,

    /// Singleton EFI shell.
    Efi,
}

/// Access discriminator of virtual media devices.
#[derive(
    Serialize,
    Deserialize,
    Debug,
    Copy,
    Clone,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum_macros::Display,
    strum_macros::EnumString,
    strum_macros::EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum VmediaAccess {
    ReadOnly,
    ReadOnlyLocal,
    ReadOnlyRemote,
    ReadWrite,
    ReadWriteLocal,
    ReadWriteRemote,
    ReadWriteDrive,
    ReadOnlyRemoteCimc,
    ReadWriteRemoteCimc,
}

/// Specialized builders, for families whose invariants go beyond creating
/// one leaf per device.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DeviceBuilder {
    /// Umbrella with up to two typed LUN entries.
    LocalLun,

    /// Umbrella with exactly one slot entry.
    LocalJbod,

    /// Umbrella with up to two typed slot entries.
    EmbeddedDisk,

    /// Umbrella with up to two vNIC image paths.
    Lan,

    /// Umbrella with up to two iSCSI vNIC image paths.
    Iscsi,

    /// Umbrella with up to two images, each with up to two targets.
    San,
}

impl DeviceBuilder {
    /// Number of typed entries the umbrella may hold. For SAN this counts
    /// images, not the targets under them.
    pub const fn max_entries(self) -> usize {
        match self {
            Self::LocalJbod => 1,
            Self::LocalLun | Self::EmbeddedDisk | Self::Lan | Self::Iscsi | Self::San => 2,
        }
    }
}
