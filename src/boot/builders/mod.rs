//! Device builders: each one attaches a single device of the list to the
//! policy tree being composed, enforcing the invariants of its family.
//!
//! Builders only touch the in-memory tree. Nothing reaches the backend until
//! the composed tree is staged and committed by the caller.

use log::trace;

use ucsm_api::{
    boot_order::{BootOrderError, DeviceBuilder, DeviceFamily, DeviceKind},
    config::BootDevice,
    constants::{attr, LOCAL_STORAGE_RN, MAX_DEVICE_ORDER, MIN_DEVICE_ORDER, STORAGE_RN},
    error::{OperationError, UnknownError},
    ClassId, ManagedObject,
};

use super::ADD_DEVICE_CALLER;

pub(crate) mod local;
pub(crate) mod network;
pub(crate) mod san;

const VMEDIA_CALLER: &str = "_vmedia_device_add";
const EFI_CALLER: &str = "_efi_device_add";

/// Attaches one device to `policy`, dispatching on its family.
pub(crate) fn add_device(
    policy: &mut ManagedObject,
    device: &BootDevice,
) -> Result<(), OperationError> {
    let kind = device.device_name.parse::<DeviceKind>().map_err(|_| {
        OperationError::new(
            ADD_DEVICE_CALLER,
            UnknownError::Device(device.device_name.clone()),
        )
    })?;
    check_order(kind, &device.device_order)?;
    trace!("Adding '{kind}' at order '{}'", device.device_order);

    match kind.family() {
        DeviceFamily::Local => {
            let local_storage = policy
                .child_or_insert(ClassId::LsbootStorage, STORAGE_RN)
                .child_or_insert(ClassId::LsbootLocalStorage, LOCAL_STORAGE_RN);
            match kind.builder() {
                Some(DeviceBuilder::LocalLun) => {
                    local::add_typed_image(local_storage, &local::LOCAL_LUN, kind, device)
                }
                Some(DeviceBuilder::EmbeddedDisk) => {
                    local::add_typed_image(local_storage, &local::EMBEDDED_DISK, kind, device)
                }
                Some(DeviceBuilder::LocalJbod) => local::add_jbod(local_storage, kind, device),
                _ => local::add_leaf(local_storage, kind, device),
            }
        }
        DeviceFamily::VirtualMedia => add_vmedia(policy, kind, device),
        DeviceFamily::Lan => network::add_image_path(policy, &network::LAN, kind, device),
        DeviceFamily::Iscsi => network::add_image_path(policy, &network::ISCSI, kind, device),
        DeviceFamily::San => san::add_san(policy, device),
        DeviceFamily::Efi => add_efi(policy, kind, device),
    }
}

/// The order must be an integer within the range the backend accepts.
fn check_order(kind: DeviceKind, order: &str) -> Result<(), OperationError> {
    match order.trim().parse::<u32>() {
        Ok(n) if (MIN_DEVICE_ORDER..=MAX_DEVICE_ORDER).contains(&n) => Ok(()),
        _ => Err(OperationError::new(
            ADD_DEVICE_CALLER,
            BootOrderError::InvalidOrder {
                device: kind.to_string(),
                order: order.into(),
                min: MIN_DEVICE_ORDER,
                max: MAX_DEVICE_ORDER,
            },
        )),
    }
}

/// Returns the umbrella node of `kind` under `parent`, creating it with the
/// device's order if it does not exist yet. The flag is true if the node was
/// just created.
pub(crate) fn umbrella<'a>(
    parent: &'a mut ManagedObject,
    kind: DeviceKind,
    order: &str,
) -> (&'a mut ManagedObject, bool) {
    let created = !parent.has_child(kind.class_id());
    let node = parent.child_or_insert(kind.class_id(), &kind.rn());
    if created {
        node.set(attr::ORDER, order);
    }
    (node, created)
}

/// Order recorded on an existing node, for error messages.
pub(crate) fn order_of(mo: &ManagedObject) -> String {
    mo.get(attr::ORDER).unwrap_or_default().to_string()
}

fn add_vmedia(
    policy: &mut ManagedObject,
    kind: DeviceKind,
    device: &BootDevice,
) -> Result<(), OperationError> {
    let Some(access) = kind.vmedia_access() else {
        return Err(OperationError::internal(
            VMEDIA_CALLER,
            format!("'{kind}' has no virtual media access kind"),
        ));
    };
    let access = access.to_string();

    if let Some(existing) = policy.child_where(ClassId::LsbootVirtualMedia, attr::ACCESS, &access) {
        return Err(OperationError::new(
            VMEDIA_CALLER,
            BootOrderError::DevicePresent {
                device: kind.to_string(),
                order: order_of(existing),
            },
        ));
    }

    let node = policy.add_child(ClassId::LsbootVirtualMedia, &kind.rn());
    node.set(attr::ACCESS, access);
    node.set(attr::ORDER, device.device_order.as_str());
    Ok(())
}

fn add_efi(
    policy: &mut ManagedObject,
    kind: DeviceKind,
    device: &BootDevice,
) -> Result<(), OperationError> {
    if let Some(existing) = policy.child_of(kind.class_id()) {
        return Err(OperationError::new(
            EFI_CALLER,
            BootOrderError::DevicePresent {
                device: kind.to_string(),
                order: order_of(existing),
            },
        ));
    }

    policy
        .add_child(kind.class_id(), &kind.rn())
        .set(attr::ORDER, device.device_order.as_str());
    Ok(())
}

#[cfg(test)]
mod tests {
    use ucsm_api::constants::ORG_ROOT;

    use super::*;

    fn policy() -> ManagedObject {
        ManagedObject::new(ClassId::LsbootPolicy, ORG_ROOT, "boot-policy-web")
    }

    #[test]
    fn test_unknown_device() {
        let err = add_device(&mut policy(), &BootDevice::new("tape", "1")).unwrap_err();
        assert_eq!(err.to_string(), "_add_device failed, error: Invalid Device tape");
    }

    #[test]
    fn test_order_range() {
        let mut policy = policy();
        add_device(&mut policy, &BootDevice::new("efi", "16")).unwrap();

        for order in ["0", "17", "first", ""] {
            let err = add_device(&mut policy, &BootDevice::new("sdcard", order)).unwrap_err();
            assert_eq!(
                err.message(),
                format!("Invalid order '{order}' for device 'sdcard', supported range is 1 to 16")
            );
        }
    }

    #[test]
    fn test_vmedia() {
        let mut policy = policy();
        add_device(&mut policy, &BootDevice::new("cd_dvd", "1")).unwrap();
        add_device(&mut policy, &BootDevice::new("floppy_local", "2")).unwrap();

        let cd = policy
            .child_where(ClassId::LsbootVirtualMedia, attr::ACCESS, "read-only")
            .unwrap();
        assert_eq!(cd.rn(), "vm-read-only");
        assert_eq!(cd.get(attr::ORDER), Some("1"));

        let err = add_device(&mut policy, &BootDevice::new("cd_dvd", "3")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "_vmedia_device_add failed, error: Device 'cd_dvd' already exist at order '1'"
        );
    }

    #[test]
    fn test_efi_singleton() {
        let mut policy = policy();
        add_device(&mut policy, &BootDevice::new("efi", "5")).unwrap();
        assert_eq!(
            policy.child_of(ClassId::LsbootEfiShell).unwrap().dn,
            "org-root/boot-policy-web/efi-shell"
        );

        let err = add_device(&mut policy, &BootDevice::new("efi", "6")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "_efi_device_add failed, error: Device 'efi' already exist at order '5'"
        );
    }

    #[test]
    fn test_local_devices_share_umbrella() {
        let mut policy = policy();
        add_device(&mut policy, &BootDevice::new("sdcard", "1")).unwrap();
        add_device(&mut policy, &BootDevice::new("internal_usb", "2")).unwrap();

        assert_eq!(policy.children.len(), 1);
        let local_storage = policy
            .child_of(ClassId::LsbootStorage)
            .and_then(|s| s.child_of(ClassId::LsbootLocalStorage))
            .unwrap();
        assert_eq!(local_storage.children.len(), 2);
        assert_eq!(
            local_storage.children[1].dn,
            "org-root/boot-policy-web/storage/local-storage/usb-internal"
        );
    }
}
