//! Boot security sub-policy: the secure boot switch of a UEFI boot policy.

use moutils::Handle;
use ucsm_api::{
    config::{BootMode, YesNo},
    constants::{attr, BOOT_SECURITY_RN},
    error::{ModeMismatchError, OperationError},
    mo::dn,
    ClassId, ManagedObject,
};

use super::policy::{self, policy_dn};
use crate::crud;

const ENABLE_CALLER: &str = "boot_security_enable";
const DISABLE_CALLER: &str = "boot_security_disable";
const EXISTS_CALLER: &str = "boot_security_exists";

fn security_node(policy: &ManagedObject, secure_boot: YesNo) -> ManagedObject {
    ManagedObject::new(ClassId::LsbootBootSecurity, &policy.dn, BOOT_SECURITY_RN)
        .with(attr::SECURE_BOOT, secure_boot.to_string())
}

/// Turns secure boot on. The policy must be in UEFI boot mode.
pub fn boot_security_enable(
    handle: &mut dyn Handle,
    name: &str,
    org_dn: &str,
) -> Result<ManagedObject, OperationError> {
    let policy = policy::fetch(handle, ENABLE_CALLER, name, org_dn)?;
    if policy.get(attr::BOOT_MODE) != Some(<&str>::from(BootMode::Uefi)) {
        return Err(OperationError::new(
            ENABLE_CALLER,
            ModeMismatchError::BootSecurity,
        ));
    }

    crud::create(
        handle,
        ENABLE_CALLER,
        security_node(&policy, YesNo::Yes),
        true,
    )
}

/// Turns secure boot off and returns the boot security node.
pub fn boot_security_disable(
    handle: &mut dyn Handle,
    name: &str,
    org_dn: &str,
) -> Result<ManagedObject, OperationError> {
    let policy = policy::fetch(handle, DISABLE_CALLER, name, org_dn)?;
    crud::create(
        handle,
        DISABLE_CALLER,
        security_node(&policy, YesNo::No),
        true,
    )
}

/// Returns `(true, node)` if secure boot is on.
pub fn boot_security_exists(
    handle: &dyn Handle,
    name: &str,
    org_dn: &str,
) -> Result<(bool, Option<ManagedObject>), OperationError> {
    crud::exists(
        handle,
        EXISTS_CALLER,
        &dn::join(&policy_dn(org_dn, name), BOOT_SECURITY_RN),
        &[(attr::SECURE_BOOT, YesNo::Yes.to_string())],
    )
}
