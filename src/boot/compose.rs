use log::trace;

use ucsm_api::{
    boot_order::rules::check_device_combinations, config::BootDevice, error::OperationError,
    ManagedObject,
};

use super::{builders, ADD_DEVICE_CALLER};

/// Composes the boot order tree of `policy` from a device list.
///
/// The returned tree is a copy of `policy` without its existing children,
/// holding one subtree per device family. Devices are attached in list
/// order; the first failing device aborts the composition.
pub fn compose(
    policy: &ManagedObject,
    devices: &[BootDevice],
) -> Result<ManagedObject, OperationError> {
    check_device_combinations(devices).map_err(|e| OperationError::new(ADD_DEVICE_CALLER, e))?;

    let mut tree = policy.shallow();
    for device in devices {
        builders::add_device(&mut tree, device)?;
    }

    trace!("Composed boot order:\n{}", tree.describe_tree());
    Ok(tree)
}

#[cfg(test)]
mod tests {
    use ucsm_api::{config::ImageType, constants::ORG_ROOT, ClassId};

    use super::*;

    fn policy() -> ManagedObject {
        ManagedObject::new(ClassId::LsbootPolicy, ORG_ROOT, "boot-policy-web")
            .with("name", "web")
    }

    #[test]
    fn test_compose_mixed_families() {
        let devices = vec![
            BootDevice::new("local_lun", "1")
                .with_type(ImageType::Primary)
                .with_lun_name("boot"),
            BootDevice::new("cd_dvd", "2"),
            BootDevice::new("lan", "3").with_vnic_name("eth0"),
            BootDevice::new("sdcard", "3"),
            BootDevice::new("efi", "4"),
        ];

        let tree = compose(&policy(), &devices).unwrap();
        assert_eq!(tree.get("name"), Some("web"));
        let classes: Vec<ClassId> = tree.children.iter().map(|c| c.class_id).collect();
        assert_eq!(
            classes,
            vec![
                ClassId::LsbootStorage,
                ClassId::LsbootVirtualMedia,
                ClassId::LsbootLan,
                ClassId::LsbootEfiShell,
            ]
        );
        let local_storage = &tree.children[0].children[0];
        assert_eq!(local_storage.children.len(), 2);
    }

    #[test]
    fn test_compose_drops_existing_children() {
        let mut policy = policy();
        policy.add_child(ClassId::LsbootEfiShell, "efi-shell");
        let tree = compose(&policy, &[BootDevice::new("sdcard", "1")]).unwrap();
        assert!(!tree.has_child(ClassId::LsbootEfiShell));
    }

    #[test]
    fn test_rules_run_before_builders() {
        // The unknown device comes first but the rule violation is reported
        let devices = vec![
            BootDevice::new("tape", "1"),
            BootDevice::new("floppy", "2"),
            BootDevice::new("floppy_remote", "3"),
        ];
        let err = compose(&policy(), &devices).unwrap_err();
        assert_eq!(
            err.to_string(),
            "_add_device failed, error: Either 'floppy' or 'floppy_local, floppy_remote' can be added."
        );
    }
}
