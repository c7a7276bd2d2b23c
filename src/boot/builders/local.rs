//! Builders for the devices under the local storage umbrella.

use ucsm_api::{
    boot_order::{BootOrderError, DeviceBuilder, DeviceKind},
    config::{BootDevice, ImageType},
    constants::{attr, DISK_PATH_RN_PREFIX, LOCAL_LUN_PATH_RN_PREFIX},
    error::{MissingArgumentError, OperationError, ReportError},
    ClassId, ManagedObject,
};

use super::order_of;

const LOCAL_DEVICE_CALLER: &str = "_local_device_add";
const LOCAL_JBOD_CALLER: &str = "_local_jbod_add";

/// A local device whose umbrella holds up to two typed entries, each
/// carrying one distinguishing value.
pub(crate) struct TypedImageFamily {
    pub caller: &'static str,
    pub builder: DeviceBuilder,
    /// Name used in error messages.
    pub label: &'static str,
    pub path_class: ClassId,
    pub path_rn_prefix: &'static str,
    /// Attribute (and input parameter) holding the distinguishing value.
    pub value_attr: &'static str,
    value: fn(&BootDevice) -> Option<&str>,
}

pub(crate) const LOCAL_LUN: TypedImageFamily = TypedImageFamily {
    caller: "_local_lun_add",
    builder: DeviceBuilder::LocalLun,
    label: "Local Lun",
    path_class: ClassId::LsbootLocalLunImagePath,
    path_rn_prefix: LOCAL_LUN_PATH_RN_PREFIX,
    value_attr: attr::LUN_NAME,
    value: |device| device.lun_name.as_deref(),
};

pub(crate) const EMBEDDED_DISK: TypedImageFamily = TypedImageFamily {
    caller: "_embedded_disk_add",
    builder: DeviceBuilder::EmbeddedDisk,
    label: "Local Embedded Disk",
    path_class: ClassId::LsbootEmbeddedLocalDiskImagePath,
    path_rn_prefix: DISK_PATH_RN_PREFIX,
    value_attr: attr::SLOT_NUMBER,
    value: |device| device.slot_number.as_deref(),
};

/// The path class and distinguishing attribute of the `local_jbod` entry.
pub(crate) const JBOD_PATH_CLASS: ClassId = ClassId::LsbootLocalDiskImagePath;
pub(crate) const JBOD_VALUE_ATTR: &str = attr::SLOT_NUMBER;

impl TypedImageFamily {
    fn missing(&self) -> OperationError {
        OperationError::new(
            self.caller,
            MissingArgumentError::one_of(&[self.value_attr, attr::TYPE]),
        )
    }

    fn attach(&self, umbrella: &mut ManagedObject, image_type: ImageType, value: &str) {
        let path = umbrella.add_child(
            self.path_class,
            &format!("{}{image_type}", self.path_rn_prefix),
        );
        path.set(attr::TYPE, image_type.to_string());
        path.set(self.value_attr, value);
    }
}

/// Adds a `local_lun` or `embedded_disk` device.
///
/// The first call creates the umbrella, empty if neither the value nor the
/// type is given. A second call may add the entry of the other type; the
/// umbrella then is full.
pub(crate) fn add_typed_image(
    local_storage: &mut ManagedObject,
    family: &TypedImageFamily,
    kind: DeviceKind,
    device: &BootDevice,
) -> Result<(), OperationError> {
    let value = (family.value)(device);
    let (umbrella, created) = super::umbrella(local_storage, kind, &device.device_order);

    if created {
        return match (value, device.image_type) {
            (None, None) => Ok(()),
            (Some(value), Some(image_type)) => {
                family.attach(umbrella, image_type, value);
                Ok(())
            }
            _ => Err(family.missing()),
        };
    }

    let order = order_of(umbrella);
    let count = umbrella.children_of(family.path_class).count();
    let existing_type = umbrella
        .child_of(family.path_class)
        .and_then(|entry| entry.get(attr::TYPE))
        .map(str::to_string);

    if count == 0 {
        return Err(OperationError::new(
            family.caller,
            BootOrderError::UmbrellaPresent {
                device: family.label.into(),
                order,
            },
        ));
    }

    if count >= family.builder.max_entries() {
        return Err(OperationError::new(
            family.caller,
            BootOrderError::BothImagesPresent {
                device: family.label.into(),
            },
        ));
    }

    if let Some(image_type) = device.image_type {
        if existing_type.as_deref() == Some(<&str>::from(image_type)) {
            return Err(OperationError::new(
                family.caller,
                BootOrderError::ImageTypePresent {
                    device: family.label.into(),
                    image_type,
                    order,
                },
            ));
        }
    }

    match (value, device.image_type) {
        (Some(value), Some(image_type)) => {
            family.attach(umbrella, image_type, value);
            Ok(())
        }
        _ => Err(family.missing()),
    }
}

/// Adds the `local_jbod` device: an umbrella with exactly one primary entry.
pub(crate) fn add_jbod(
    local_storage: &mut ManagedObject,
    kind: DeviceKind,
    device: &BootDevice,
) -> Result<(), OperationError> {
    if let Some(existing) = local_storage.child_of(kind.class_id()) {
        return Err(OperationError::new(
            LOCAL_JBOD_CALLER,
            BootOrderError::UmbrellaPresent {
                device: "Local JBOD".into(),
                order: order_of(existing),
            },
        ));
    }

    let slot_number = device.slot_number.as_deref().structured(
        LOCAL_JBOD_CALLER,
        MissingArgumentError::Parameter(attr::SLOT_NUMBER.into()),
    )?;

    let (umbrella, _) = super::umbrella(local_storage, kind, &device.device_order);
    let path = umbrella.add_child(
        JBOD_PATH_CLASS,
        &format!("{DISK_PATH_RN_PREFIX}{}", ImageType::Primary),
    );
    path.set(attr::TYPE, ImageType::Primary.to_string());
    path.set(JBOD_VALUE_ATTR, slot_number);
    Ok(())
}

/// Adds a local device that is a single leaf.
pub(crate) fn add_leaf(
    local_storage: &mut ManagedObject,
    kind: DeviceKind,
    device: &BootDevice,
) -> Result<(), OperationError> {
    if let Some(existing) = local_storage.child_of(kind.class_id()) {
        return Err(OperationError::new(
            LOCAL_DEVICE_CALLER,
            BootOrderError::DevicePresent {
                device: kind.to_string(),
                order: order_of(existing),
            },
        ));
    }

    local_storage
        .add_child(kind.class_id(), &kind.rn())
        .set(attr::ORDER, device.device_order.as_str());
    Ok(())
}
