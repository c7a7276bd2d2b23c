//! Structural comparison of a composed boot order against a live one.
//!
//! The backend does not preserve child order, so typed children are paired
//! by their `type` attribute and devices are keyed by logical device name.

use std::{collections::BTreeMap, fmt};

use log::trace;

use ucsm_api::{
    boot_order::{DeviceBuilder, DeviceKind},
    constants::attr,
    ClassId, ManagedObject,
};

use super::builders::{local, network, san};

/// The first difference found between two trees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    pub dn: String,
    pub reason: String,
}

impl Mismatch {
    fn new(dn: &str, reason: impl Into<String>) -> Self {
        Self {
            dn: dn.to_string(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.dn, self.reason)
    }
}

/// Compares the device subtrees of two policies. Boot security nodes are
/// ignored on both sides.
pub fn compare_policies(expected: &ManagedObject, live: &ManagedObject) -> Result<(), Mismatch> {
    let count = |policy: &ManagedObject| {
        policy
            .children
            .iter()
            .filter(|c| c.class_id != ClassId::LsbootBootSecurity)
            .count()
    };
    let (expected_count, live_count) = (count(expected), count(live));
    if expected_count != live_count {
        return Err(Mismatch::new(
            &live.dn,
            format!("expected {expected_count} device subtrees, found {live_count}"),
        ));
    }

    let expected_devices = devices(expected);
    let live_devices = devices(live);
    if expected_devices.len() != live_devices.len() {
        return Err(Mismatch::new(
            &live.dn,
            format!(
                "expected {} devices, found {}",
                expected_devices.len(),
                live_devices.len()
            ),
        ));
    }

    for (kind, expected_device) in &expected_devices {
        let live_device = live_devices
            .get(kind)
            .ok_or_else(|| Mismatch::new(&live.dn, format!("device '{kind}' is missing")))?;
        trace!("Comparing '{kind}'");
        compare_device(*kind, expected_device, live_device)?;
    }

    Ok(())
}

/// Maps every device of a policy to its node, looking through the local
/// storage umbrellas.
fn devices(policy: &ManagedObject) -> BTreeMap<DeviceKind, &ManagedObject> {
    let mut devices = BTreeMap::new();
    for child in &policy.children {
        match child.class_id {
            ClassId::LsbootBootSecurity => {}
            ClassId::LsbootStorage => {
                for node in child
                    .children_of(ClassId::LsbootLocalStorage)
                    .flat_map(|local_storage| local_storage.children.iter())
                {
                    if let Some(kind) = DeviceKind::from_mo(node) {
                        devices.insert(kind, node);
                    }
                }
            }
            _ => {
                if let Some(kind) = DeviceKind::from_mo(child) {
                    devices.insert(kind, child);
                }
            }
        }
    }
    devices
}

fn compare_device(
    kind: DeviceKind,
    expected: &ManagedObject,
    live: &ManagedObject,
) -> Result<(), Mismatch> {
    attribute_eq(expected, live, attr::ORDER)?;

    match kind.builder() {
        None => Ok(()),
        Some(DeviceBuilder::LocalLun) => pair_by_type(
            expected,
            live,
            local::LOCAL_LUN.path_class,
            |e, l| attribute_eq(e, l, local::LOCAL_LUN.value_attr),
        ),
        Some(DeviceBuilder::EmbeddedDisk) => pair_by_type(
            expected,
            live,
            local::EMBEDDED_DISK.path_class,
            |e, l| attribute_eq(e, l, local::EMBEDDED_DISK.value_attr),
        ),
        Some(DeviceBuilder::LocalJbod) => {
            pair_by_type(expected, live, local::JBOD_PATH_CLASS, |e, l| {
                attribute_eq(e, l, local::JBOD_VALUE_ATTR)
            })
        }
        Some(DeviceBuilder::Lan) => pair_by_type(expected, live, network::LAN.path_class, |e, l| {
            attribute_eq(e, l, network::LAN.vnic_attr)
        }),
        Some(DeviceBuilder::Iscsi) => {
            pair_by_type(expected, live, network::ISCSI.path_class, |e, l| {
                attribute_eq(e, l, network::ISCSI.vnic_attr)
            })
        }
        Some(DeviceBuilder::San) => pair_by_type(expected, live, san::IMAGE_CLASS, |e, l| {
            attribute_eq(e, l, attr::VNIC_NAME)?;
            pair_by_type(e, l, san::PATH_CLASS, |e, l| {
                attribute_eq(e, l, attr::WWN)?;
                attribute_eq(e, l, attr::LUN)
            })
        }),
    }
}

fn attribute_eq(expected: &ManagedObject, live: &ManagedObject, name: &str) -> Result<(), Mismatch> {
    if expected.get(name) == live.get(name) {
        Ok(())
    } else {
        Err(Mismatch::new(
            &live.dn,
            format!(
                "'{name}' is {:?}, expected {:?}",
                live.get(name),
                expected.get(name)
            ),
        ))
    }
}

/// Pairs the children of class `class_id` by their `type` attribute and
/// compares each pair.
fn pair_by_type<F>(
    expected: &ManagedObject,
    live: &ManagedObject,
    class_id: ClassId,
    compare: F,
) -> Result<(), Mismatch>
where
    F: Fn(&ManagedObject, &ManagedObject) -> Result<(), Mismatch>,
{
    let expected_count = expected.children_of(class_id).count();
    let live_count = live.children_of(class_id).count();
    if expected_count != live_count {
        return Err(Mismatch::new(
            &live.dn,
            format!("expected {expected_count} {class_id} children, found {live_count}"),
        ));
    }

    for expected_child in expected.children_of(class_id) {
        let image_type = expected_child.get(attr::TYPE).unwrap_or_default();
        let live_child = live
            .child_where(class_id, attr::TYPE, image_type)
            .ok_or_else(|| {
                Mismatch::new(
                    &live.dn,
                    format!("no {class_id} child of type '{image_type}'"),
                )
            })?;
        compare(expected_child, live_child)?;
    }

    Ok(())
}
