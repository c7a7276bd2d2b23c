use serde::{Deserialize, Serialize};

/// Backend class identifiers of the managed objects handled by this crate.
///
/// The serialized form is the identifier used by UCS Manager.
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
    strum_macros::EnumIter,
)]
#[serde(rename_all = "camelCase")]
pub enum ClassId {
    /// An organization.
    #[strum(serialize = "orgOrg")]
    OrgOrg,

    /// A boot policy, root of the boot order tree.
    #[strum(serialize = "lsbootPolicy")]
    LsbootPolicy,

    /// Storage umbrella.
    #[strum(serialize = "lsbootStorage")]
    LsbootStorage,

    /// Local storage umbrella, child of the storage umbrella.
    #[strum(serialize = "lsbootLocalStorage")]
    LsbootLocalStorage,

    /// Any local disk.
    #[strum(serialize = "lsbootDefaultLocalImage")]
    LsbootDefaultLocalImage,

    /// Local LUN umbrella.
    #[strum(serialize = "lsbootLocalHddImage")]
    LsbootLocalHddImage,

    /// Typed local LUN entry.
    #[strum(serialize = "lsbootLocalLunImagePath")]
    LsbootLocalLunImagePath,

    /// Local JBOD umbrella.
    #[strum(serialize = "lsbootLocalDiskImage")]
    LsbootLocalDiskImage,

    /// Local JBOD slot entry.
    #[strum(serialize = "lsbootLocalDiskImagePath")]
    LsbootLocalDiskImagePath,

    /// SD card.
    #[strum(serialize = "lsbootUsbFlashStorageImage")]
    LsbootUsbFlashStorageImage,

    /// Internal USB.
    #[strum(serialize = "lsbootUsbInternalImage")]
    LsbootUsbInternalImage,

    /// External USB.
    #[strum(serialize = "lsbootUsbExternalImage")]
    LsbootUsbExternalImage,

    /// Embedded local LUN.
    #[strum(serialize = "lsbootEmbeddedLocalLunImage")]
    LsbootEmbeddedLocalLunImage,

    /// Embedded local disk umbrella.
    #[strum(serialize = "lsbootEmbeddedLocalDiskImage")]
    LsbootEmbeddedLocalDiskImage,

    /// Typed embedded local disk entry.
    #[strum(serialize = "lsbootEmbeddedLocalDiskImagePath")]
    LsbootEmbeddedLocalDiskImagePath,

    /// Virtual media, keyed by access.
    #[strum(serialize = "lsbootVirtualMedia")]
    LsbootVirtualMedia,

    /// LAN umbrella.
    #[strum(serialize = "lsbootLan")]
    LsbootLan,

    /// Typed LAN image path.
    #[strum(serialize = "lsbootLanImagePath")]
    LsbootLanImagePath,

    /// iSCSI umbrella.
    #[strum(serialize = "lsbootIScsi")]
    #[serde(rename = "lsbootIScsi")]
    LsbootIScsi,

    /// Typed iSCSI image path.
    #[strum(serialize = "lsbootIScsiImagePath")]
    #[serde(rename = "lsbootIScsiImagePath")]
    LsbootIScsiImagePath,

    /// SAN umbrella.
    #[strum(serialize = "lsbootSan")]
    LsbootSan,

    /// Typed SAN image.
    #[strum(serialize = "lsbootSanCatSanImage")]
    LsbootSanCatSanImage,

    /// Typed SAN target path.
    #[strum(serialize = "lsbootSanCatSanImagePath")]
    LsbootSanCatSanImagePath,

    /// EFI shell.
    #[strum(serialize = "lsbootEFIShell")]
    #[serde(rename = "lsbootEFIShell")]
    LsbootEfiShell,

    /// Boot security sub-policy.
    #[strum(serialize = "lsbootBootSecurity")]
    LsbootBootSecurity,
}
