//! Device registry: the static table mapping logical device names to backend
//! classes, and its inverse.

use std::collections::BTreeMap;

use lazy_static::lazy_static;
use strum::IntoEnumIterator;

use crate::{
    constants::{attr, ISCSI_RN, LAN_RN, SAN_RN, VMEDIA_RN_PREFIX},
    ClassId, ManagedObject,
};

use super::types::{DeviceBuilder, DeviceFamily, DeviceKind, VmediaAccess};

/// One row of the device registry.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RegistryEntry {
    /// Backend class of the node created for the device.
    pub class_id: ClassId,

    /// Family the device belongs to.
    pub family: DeviceFamily,

    /// Specialized builder, if the family needs one.
    pub builder: Option<DeviceBuilder>,

    /// Fixed relative name of the node. Virtual media derive theirs from
    /// the access kind instead.
    pub rn: Option<&'static str>,

    /// Access kind, for virtual media only.
    pub access: Option<VmediaAccess>,
}

impl RegistryEntry {
    const fn local(class_id: ClassId, rn: &'static str) -> Self {
        Self {
            class_id,
            family: DeviceFamily::Local,
            builder: None,
            rn: Some(rn),
            access: None,
        }
    }

    const fn local_with(class_id: ClassId, rn: &'static str, builder: DeviceBuilder) -> Self {
        Self {
            builder: Some(builder),
            ..Self::local(class_id, rn)
        }
    }

    const fn vmedia(access: VmediaAccess) -> Self {
        Self {
            class_id: ClassId::LsbootVirtualMedia,
            family: DeviceFamily::VirtualMedia,
            builder: None,
            rn: None,
            access: Some(access),
        }
    }

    const fn umbrella(
        class_id: ClassId,
        family: DeviceFamily,
        rn: &'static str,
        builder: Option<DeviceBuilder>,
    ) -> Self {
        Self {
            class_id,
            family,
            builder,
            rn: Some(rn),
            access: None,
        }
    }
}

impl DeviceKind {
    /// Returns the registry row of this device.
    pub const fn entry(self) -> RegistryEntry {
        use ClassId as C;
        use DeviceBuilder as B;
        use VmediaAccess as A;

        match self {
            Self::LocalDisk => RegistryEntry::local(C::LsbootDefaultLocalImage, "local-any"),
            Self::LocalLun => {
                RegistryEntry::local_with(C::LsbootLocalHddImage, "local-hdd", B::LocalLun)
            }
            Self::LocalJbod => {
                RegistryEntry::local_with(C::LsbootLocalDiskImage, "local-jbod", B::LocalJbod)
            }
            Self::Sdcard => RegistryEntry::local(C::LsbootUsbFlashStorageImage, "sd-card"),
            Self::InternalUsb => RegistryEntry::local(C::LsbootUsbInternalImage, "usb-internal"),
            Self::ExternalUsb => RegistryEntry::local(C::LsbootUsbExternalImage, "usb-external"),
            Self::EmbeddedLun => {
                RegistryEntry::local(C::LsbootEmbeddedLocalLunImage, "embedded-local-lun")
            }
            Self::EmbeddedDisk => RegistryEntry::local_with(
                C::LsbootEmbeddedLocalDiskImage,
                "embedded-local-jbod",
                B::EmbeddedDisk,
            ),
            Self::CdDvd => RegistryEntry::vmedia(A::ReadOnly),
            Self::CdDvdLocal => RegistryEntry::vmedia(A::ReadOnlyLocal),
            Self::CdDvdRemote => RegistryEntry::vmedia(A::ReadOnlyRemote),
            Self::Floppy => RegistryEntry::vmedia(A::ReadWrite),
            Self::FloppyLocal => RegistryEntry::vmedia(A::ReadWriteLocal),
            Self::FloppyRemote => RegistryEntry::vmedia(A::ReadWriteRemote),
            Self::VirtualDrive => RegistryEntry::vmedia(A::ReadWriteDrive),
            Self::CdDvdCimc => RegistryEntry::vmedia(A::ReadOnlyRemoteCimc),
            Self::HddCimc => RegistryEntry::vmedia(A::ReadWriteRemoteCimc),
            Self::Lan => {
                RegistryEntry::umbrella(C::LsbootLan, DeviceFamily::Lan, LAN_RN, Some(B::Lan))
            }
            Self::San => {
                RegistryEntry::umbrella(C::LsbootSan, DeviceFamily::San, SAN_RN, Some(B::San))
            }
            Self::Iscsi => RegistryEntry::umbrella(
                C::LsbootIScsi,
                DeviceFamily::Iscsi,
                ISCSI_RN,
                Some(B::Iscsi),
            ),
            Self::Efi => {
                RegistryEntry::umbrella(C::LsbootEfiShell, DeviceFamily::Efi, "efi-shell", None)
            }
        }
    }

    pub const fn class_id(self) -> ClassId {
        self.entry().class_id
    }

    pub const fn family(self) -> DeviceFamily {
        self.entry().family
    }

    pub const fn builder(self) -> Option<DeviceBuilder> {
        self.entry().builder
    }

    pub const fn vmedia_access(self) -> Option<VmediaAccess> {
        self.entry().access
    }

    /// Relative name of the node created for this device.
    pub fn rn(self) -> String {
        let entry = self.entry();
        match (entry.rn, entry.access) {
            (Some(rn), _) => rn.to_string(),
            (None, Some(access)) => format!("{VMEDIA_RN_PREFIX}{access}"),
            (None, None) => self.to_string(),
        }
    }

    /// Returns true for the devices that live under the local storage
    /// umbrella, other than `local_disk`.
    pub fn is_other_local(self) -> bool {
        self.family() == DeviceFamily::Local && self != Self::LocalDisk
    }

    /// Inverse registry lookup: finds the logical device a node of the tree
    /// stands for. Returns None for nodes that are not devices (umbrellas,
    /// paths, boot security...).
    pub fn from_mo(mo: &ManagedObject) -> Option<Self> {
        if mo.class_id == ClassId::LsbootVirtualMedia {
            let access = mo.get(attr::ACCESS)?.parse::<VmediaAccess>().ok()?;
            return VMEDIA_ACCESS_TO_DEVICE.get(&access).copied();
        }
        CLASS_TO_DEVICE.get(&mo.class_id).copied()
    }
}

impl VmediaAccess {
    /// The logical device bound to this access kind.
    pub fn device(self) -> Option<DeviceKind> {
        VMEDIA_ACCESS_TO_DEVICE.get(&self).copied()
    }
}

lazy_static! {
    static ref CLASS_TO_DEVICE: BTreeMap<ClassId, DeviceKind> = DeviceKind::iter()
        .filter(|kind| kind.family() != DeviceFamily::VirtualMedia)
        .map(|kind| (kind.class_id(), kind))
        .collect();
    static ref VMEDIA_ACCESS_TO_DEVICE: BTreeMap<VmediaAccess, DeviceKind> = DeviceKind::iter()
        .filter_map(|kind| kind.vmedia_access().map(|access| (access, kind)))
        .collect();
}
