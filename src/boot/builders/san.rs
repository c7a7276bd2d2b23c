//! Builder for the SAN umbrella: up to two images keyed by type, each with
//! up to two target paths keyed by target type.

use ucsm_api::{
    boot_order::{BootOrderError, DeviceBuilder, DeviceKind},
    config::{BootDevice, ImageType},
    constants::{attr, PATH_RN_PREFIX, SAN_IMAGE_RN_PREFIX},
    error::{MissingArgumentError, OperationError},
    ClassId, ManagedObject,
};

const SAN_CALLER: &str = "_san_device_add";

pub(crate) const IMAGE_CLASS: ClassId = ClassId::LsbootSanCatSanImage;
pub(crate) const PATH_CLASS: ClassId = ClassId::LsbootSanCatSanImagePath;

/// Target paths per SAN image.
const MAX_TARGETS: usize = 2;

/// Adds a `san` device.
///
/// A call without image fields only creates the umbrella. A call naming an
/// image type that is not present yet adds that image. A call naming a
/// present image type adds a target path under that image. Once both
/// images exist, the target path goes under the image whose type equals
/// the caller's `target_type`.
pub(crate) fn add_san(
    policy: &mut ManagedObject,
    device: &BootDevice,
) -> Result<(), OperationError> {
    let (san, created) = super::umbrella(policy, DeviceKind::San, &device.device_order);
    let has_image_fields = device.vnic_name.is_some() || device.image_type.is_some();

    if created {
        return if has_image_fields {
            add_image(san, device)
        } else {
            Ok(())
        };
    }

    if !has_image_fields {
        return Err(OperationError::new(SAN_CALLER, BootOrderError::SanPresent));
    }

    let image_type = image_type(device)?;
    if san.children_of(IMAGE_CLASS).count() >= DeviceBuilder::San.max_entries() {
        // Both images exist: the target type picks the image.
        let Some(target_type) = target_type(device)? else {
            return Err(OperationError::new(
                SAN_CALLER,
                BootOrderError::SanImagePresent { image_type },
            ));
        };
        return match san.child_where_mut(IMAGE_CLASS, attr::TYPE, target_type.into()) {
            Some(image) => add_target(image, device, target_type),
            None => Err(OperationError::internal(
                SAN_CALLER,
                format!("No '{target_type}' san image under '{}'", san.dn),
            )),
        };
    }

    match san.child_where_mut(IMAGE_CLASS, attr::TYPE, image_type.into()) {
        Some(image) => add_target(image, device, image_type),
        None => add_image(san, device),
    }
}

fn image_type(device: &BootDevice) -> Result<ImageType, OperationError> {
    device.image_type.ok_or_else(|| {
        OperationError::new(
            SAN_CALLER,
            MissingArgumentError::Parameter(attr::TYPE.into()),
        )
    })
}

/// Returns the target type if the device describes a target path.
fn target_type(device: &BootDevice) -> Result<Option<ImageType>, OperationError> {
    match device.target_type {
        Some(target_type) => Ok(Some(target_type)),
        None if device.wwn.is_some() || device.lun.is_some() => Err(OperationError::new(
            SAN_CALLER,
            MissingArgumentError::Parameter("target_type".into()),
        )),
        None => Ok(None),
    }
}

fn add_image(san: &mut ManagedObject, device: &BootDevice) -> Result<(), OperationError> {
    let image_type = image_type(device)?;
    let target_type = target_type(device)?;

    let image = san.add_child(IMAGE_CLASS, &format!("{SAN_IMAGE_RN_PREFIX}{image_type}"));
    image.set(attr::TYPE, image_type.to_string());
    if let Some(vnic_name) = &device.vnic_name {
        image.set(attr::VNIC_NAME, vnic_name.as_str());
    }

    if let Some(target_type) = target_type {
        add_path(image, device, target_type);
    }
    Ok(())
}

/// Adds a target path under an image that is already present.
fn add_target(
    image: &mut ManagedObject,
    device: &BootDevice,
    image_type: ImageType,
) -> Result<(), OperationError> {
    let Some(target_type) = target_type(device)? else {
        return Err(OperationError::new(
            SAN_CALLER,
            BootOrderError::SanImagePresent { image_type },
        ));
    };

    let count = image.children_of(PATH_CLASS).count();
    if count >= MAX_TARGETS {
        return Err(OperationError::new(
            SAN_CALLER,
            BootOrderError::SanTargetsFull,
        ));
    }

    if image
        .child_where(PATH_CLASS, attr::TYPE, target_type.into())
        .is_some()
    {
        return Err(OperationError::new(
            SAN_CALLER,
            BootOrderError::SanTargetPresent { target_type },
        ));
    }

    add_path(image, device, target_type);
    Ok(())
}

fn add_path(image: &mut ManagedObject, device: &BootDevice, target_type: ImageType) {
    let path = image.add_child(PATH_CLASS, &format!("{PATH_RN_PREFIX}{target_type}"));
    path.set(attr::TYPE, target_type.to_string());
    if let Some(wwn) = &device.wwn {
        path.set(attr::WWN, wwn.as_str());
    }
    if let Some(lun) = &device.lun {
        path.set(attr::LUN, lun.as_str());
    }
}

#[cfg(test)]
mod tests {
    use ucsm_api::constants::ORG_ROOT;

    use super::*;

    const WWN: &str = "20:00:00:25:B5:00:00:01";

    fn policy() -> ManagedObject {
        ManagedObject::new(ClassId::LsbootPolicy, ORG_ROOT, "boot-policy-web")
    }

    fn image(order: &str, image_type: ImageType) -> BootDevice {
        BootDevice::new("san", order)
            .with_vnic_name(format!("fc-{image_type}"))
            .with_type(image_type)
    }

    fn target(order: &str, image_type: ImageType, target_type: ImageType) -> BootDevice {
        image(order, image_type).with_target(WWN, "0", target_type)
    }

    #[test]
    fn test_full_san() {
        let mut policy = policy();
        for (order, image_type, target_type) in [
            ("2", ImageType::Primary, ImageType::Primary),
            ("3", ImageType::Primary, ImageType::Secondary),
            ("4", ImageType::Secondary, ImageType::Primary),
            ("5", ImageType::Secondary, ImageType::Secondary),
        ] {
            add_san(&mut policy, &target(order, image_type, target_type)).unwrap();
        }

        let san = policy.child_of(ClassId::LsbootSan).unwrap();
        assert_eq!(san.get(attr::ORDER), Some("2"));
        assert_eq!(san.children_of(IMAGE_CLASS).count(), 2);

        let secondary = san.child_where(IMAGE_CLASS, attr::TYPE, "secondary").unwrap();
        assert_eq!(secondary.get(attr::VNIC_NAME), Some("fc-secondary"));
        let path = secondary
            .child_where(PATH_CLASS, attr::TYPE, "primary")
            .unwrap();
        assert_eq!(
            path.dn,
            "org-root/boot-policy-web/san/sanimg-secondary/path-primary"
        );
        assert_eq!(path.get(attr::WWN), Some(WWN));
        assert_eq!(path.get(attr::LUN), Some("0"));

        let err =
            add_san(&mut policy, &target("6", ImageType::Primary, ImageType::Primary)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "_san_device_add failed, error: Both instance of SAN target devices are already added."
        );
    }

    #[test]
    fn test_umbrella_only() {
        let mut policy = policy();
        add_san(&mut policy, &BootDevice::new("san", "1")).unwrap();
        assert!(policy.child_of(ClassId::LsbootSan).unwrap().children.is_empty());

        let err = add_san(&mut policy, &BootDevice::new("san", "2")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "_san_device_add failed, error: Instance of San device is already added."
        );
    }

    #[test]
    fn test_image_present() {
        let mut policy = policy();
        add_san(&mut policy, &BootDevice::new("san", "1")).unwrap();
        add_san(&mut policy, &image("2", ImageType::Primary)).unwrap();
        let err = add_san(&mut policy, &image("3", ImageType::Primary)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "_san_device_add failed, error: Instance of 'primary' san image is already added."
        );
    }

    #[test]
    fn test_target_present() {
        let mut policy = policy();
        add_san(&mut policy, &target("2", ImageType::Primary, ImageType::Primary)).unwrap();
        let err =
            add_san(&mut policy, &target("3", ImageType::Primary, ImageType::Primary)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "_san_device_add failed, error: Instance of SAN target type 'primary' is already added."
        );
    }

    #[test]
    fn test_target_type_selects_image_when_both_present() {
        let mut policy = policy();
        add_san(&mut policy, &image("1", ImageType::Primary)).unwrap();
        add_san(&mut policy, &image("1", ImageType::Secondary)).unwrap();
        add_san(
            &mut policy,
            &target("1", ImageType::Primary, ImageType::Secondary),
        )
        .unwrap();

        let san = policy.child_of(ClassId::LsbootSan).unwrap();
        let primary = san.child_where(IMAGE_CLASS, attr::TYPE, "primary").unwrap();
        let secondary = san.child_where(IMAGE_CLASS, attr::TYPE, "secondary").unwrap();
        assert!(primary.children.is_empty());
        assert_eq!(secondary.children.len(), 1);
        assert_eq!(
            secondary.children[0].dn,
            "org-root/boot-policy-web/san/sanimg-secondary/path-secondary"
        );

        let err = add_san(&mut policy, &image("1", ImageType::Secondary)).unwrap_err();
        assert_eq!(
            err.message(),
            "Instance of 'secondary' san image is already added."
        );

        let err = add_san(
            &mut policy,
            &target("1", ImageType::Primary, ImageType::Secondary),
        )
        .unwrap_err();
        assert_eq!(
            err.message(),
            "Instance of SAN target type 'secondary' is already added."
        );
    }

    #[test]
    fn test_missing_fields() {
        let mut policy = policy();
        let err = add_san(
            &mut policy,
            &BootDevice::new("san", "1").with_vnic_name("fc0"),
        )
        .unwrap_err();
        assert_eq!(err.message(), "Required parameter 'type' missing");

        let mut device = image("1", ImageType::Primary);
        device.wwn = Some(WWN.into());
        let err = add_san(&mut policy, &device).unwrap_err();
        assert_eq!(err.message(), "Required parameter 'target_type' missing");
    }
}
