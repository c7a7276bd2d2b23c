//! Builders for the LAN and iSCSI umbrellas, each holding up to two vNIC
//! image paths.

use ucsm_api::{
    boot_order::{BootOrderError, DeviceBuilder, DeviceKind},
    config::{BootDevice, ImageType},
    constants::{attr, LAN_PROTOCOL, PATH_RN_PREFIX},
    error::{MissingArgumentError, OperationError, ReportError},
    ClassId, ManagedObject,
};

pub(crate) struct NetworkFamily {
    pub caller: &'static str,
    pub builder: DeviceBuilder,
    /// Name used in error messages.
    pub label: &'static str,
    pub path_class: ClassId,
    /// Attribute of the path holding the vNIC name.
    pub vnic_attr: &'static str,
    /// Fixed attributes of the umbrella.
    pub umbrella_attributes: &'static [(&'static str, &'static str)],
}

pub(crate) const LAN: NetworkFamily = NetworkFamily {
    caller: "_lan_device_add",
    builder: DeviceBuilder::Lan,
    label: "Lan Device",
    path_class: ClassId::LsbootLanImagePath,
    vnic_attr: attr::VNIC_NAME,
    umbrella_attributes: &[(attr::PROTOCOL, LAN_PROTOCOL)],
};

pub(crate) const ISCSI: NetworkFamily = NetworkFamily {
    caller: "_iscsi_device_add",
    builder: DeviceBuilder::Iscsi,
    label: "iSCSI Device",
    path_class: ClassId::LsbootIScsiImagePath,
    vnic_attr: attr::ISCSI_VNIC_NAME,
    umbrella_attributes: &[],
};

/// Adds one image path. The first path is primary, the second takes the
/// other type.
pub(crate) fn add_image_path(
    policy: &mut ManagedObject,
    family: &NetworkFamily,
    kind: DeviceKind,
    device: &BootDevice,
) -> Result<(), OperationError> {
    if let Some(existing) = policy.child_of(kind.class_id()) {
        let count = existing.children_of(family.path_class).count();
        if count >= family.builder.max_entries() {
            return Err(OperationError::new(
                family.caller,
                BootOrderError::BothPathsPresent {
                    device: family.label.into(),
                },
            ));
        }
    }

    let vnic_name = device.vnic_name.as_deref().structured(
        family.caller,
        MissingArgumentError::Parameter(attr::VNIC_NAME.into()),
    )?;

    let (umbrella, created) = super::umbrella(policy, kind, &device.device_order);
    if created {
        for (name, value) in family.umbrella_attributes {
            umbrella.set(name, *value);
        }
    }

    let image_type = umbrella
        .child_of(family.path_class)
        .and_then(|path| path.get(attr::TYPE))
        .and_then(|t| t.parse::<ImageType>().ok())
        .map_or(ImageType::Primary, ImageType::other);

    let path = umbrella.add_child(family.path_class, &format!("{PATH_RN_PREFIX}{image_type}"));
    path.set(attr::TYPE, image_type.to_string());
    path.set(family.vnic_attr, vnic_name);
    Ok(())
}
