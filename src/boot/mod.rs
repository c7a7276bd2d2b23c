//! # Boot Policies
//!
//! Boot policy management on top of a [`Handle`]: CRUD of the policy
//! itself, its boot security sub-policy, and its boot order.
//!
//! Setting a boot order goes through these steps:
//!
//! 1. The policy is fetched and its current boot order is cleared, keeping
//!    boot security.
//! 2. The device list is checked against the cross-family rules.
//! 3. The new order is composed in memory, one device at a time, each
//!    family's builder enforcing its own invariants.
//! 4. The composed tree is staged and committed.
//!
//! Checking whether an order exists composes the same tree and compares it
//! with the live one, without any write.
//!
//! ## Layout
//!
//! ```text
//! src/boot
//! ├── builders
//! │   ├── local.rs ---------> # Local storage devices.
//! │   ├── mod.rs -----------> # Dispatch, virtual media and EFI shell.
//! │   ├── network.rs -------> # LAN and iSCSI.
//! │   └── san.rs -----------> # SAN images and targets.
//! ├── clear.rs -------------> # Removal of the current order.
//! ├── compare.rs -----------> # Structural comparison of two orders.
//! ├── compose.rs -----------> # Composition of an order from a device list.
//! ├── mod.rs ---------------> # This file.
//! ├── policy.rs ------------> # Boot policy CRUD.
//! ├── scenario_tests.rs ----> # End-to-end tests.
//! └── security.rs ----------> # Boot security sub-policy.
//! ```

use log::{debug, info, warn};

use moutils::Handle;
use ucsm_api::{
    config::BootDevice,
    error::{BackendError, MissingArgumentError, NotFoundError, OperationError, ReportError},
    ClassId, ManagedObject,
};

mod builders;
mod clear;
pub mod compare;
pub mod compose;
pub mod policy;
pub mod security;


pub use policy::{
    boot_policy_create, boot_policy_delete, boot_policy_exists, boot_policy_get,
    boot_policy_modify,
};
pub use security::{boot_security_disable, boot_security_enable, boot_security_exists};

/// Caller tag of failures not owned by a single family builder.
const ADD_DEVICE_CALLER: &str = "_add_device";

const ORDER_SET_CALLER: &str = "boot_policy_order_set";
const ORDER_EXISTS_CALLER: &str = "boot_policy_order_exists";

/// Replaces the boot order of a policy with `devices`.
///
/// The current order is cleared and committed before the new one is
/// composed. A failure while composing leaves the policy without a boot
/// order; reissue the call to recover.
pub fn boot_policy_order_set(
    handle: &mut dyn Handle,
    name: &str,
    devices: &[BootDevice],
    org_dn: &str,
) -> Result<ManagedObject, OperationError> {
    debug!(
        "Setting boot order of '{name}' in '{org_dn}' to {} devices",
        devices.len()
    );
    if devices.is_empty() {
        return Err(OperationError::new(
            ORDER_SET_CALLER,
            MissingArgumentError::Parameter("devices".into()),
        ));
    }

    let policy = policy::fetch(handle, ORDER_SET_CALLER, name, org_dn)?;
    clear::clear(handle, &policy)?;

    let tree = compose::compose(&policy, devices)?;
    handle
        .add_mo(tree.clone(), true)
        .structured(ORDER_SET_CALLER, BackendError::AddMo { dn: tree.dn.clone() })?;
    handle
        .commit()
        .structured(ORDER_SET_CALLER, BackendError::Commit)?;

    info!("Boot order of '{}' set", tree.dn);
    Ok(tree)
}

/// Returns `(true, policy)` if the live boot order of the policy is the one
/// `boot_policy_order_set` would build from `devices`. Any error, including
/// an invalid device list or a missing policy, yields `(false, None)`.
pub fn boot_policy_order_exists(
    handle: &dyn Handle,
    name: &str,
    devices: &[BootDevice],
    org_dn: &str,
) -> (bool, Option<ManagedObject>) {
    match order_matches(handle, name, devices, org_dn) {
        Ok(policy) => (policy.is_some(), policy),
        Err(e) => {
            warn!("{e}");
            (false, None)
        }
    }
}

fn order_matches(
    handle: &dyn Handle,
    name: &str,
    devices: &[BootDevice],
    org_dn: &str,
) -> Result<Option<ManagedObject>, OperationError> {
    let dn = policy::policy_dn(org_dn, name);
    let expected = compose::compose(
        &ManagedObject::new(ClassId::LsbootPolicy, org_dn, &policy::policy_rn(name)),
        devices,
    )?;

    let live = handle
        .query_hierarchy(&dn)
        .structured(
            ORDER_EXISTS_CALLER,
            BackendError::QueryHierarchy { dn: dn.clone() },
        )?
        .structured(
            ORDER_EXISTS_CALLER,
            NotFoundError::BootPolicy { dn: dn.clone() },
        )?;

    match compare::compare_policies(&expected, &live) {
        Ok(()) => Ok(Some(live.shallow())),
        Err(mismatch) => {
            debug!("Boot order of '{dn}' differs: {mismatch}");
            Ok(None)
        }
    }
}
