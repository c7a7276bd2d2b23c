//! Boot policy CRUD.

use log::debug;

use moutils::Handle;
use ucsm_api::{
    config::BootPolicyProps,
    constants::{attr, BOOT_POLICY_RN_PREFIX},
    error::{MissingArgumentError, NotFoundError, OperationError, ReportError},
    mo::dn,
    ClassId, ManagedObject,
};

use crate::crud;

const CREATE_CALLER: &str = "boot_policy_create";
const GET_CALLER: &str = "boot_policy_get";
const EXISTS_CALLER: &str = "boot_policy_exists";
const MODIFY_CALLER: &str = "boot_policy_modify";
const DELETE_CALLER: &str = "boot_policy_delete";

pub fn policy_rn(name: &str) -> String {
    format!("{BOOT_POLICY_RN_PREFIX}{name}")
}

/// DN of the boot policy `name` under `org_dn`.
pub fn policy_dn(org_dn: &str, name: &str) -> String {
    dn::join(org_dn, &policy_rn(name))
}

fn check_name(caller: &'static str, name: &str) -> Result<(), OperationError> {
    if name.is_empty() {
        return Err(OperationError::new(
            caller,
            MissingArgumentError::Positional(attr::NAME.into()),
        ));
    }
    Ok(())
}

/// Fetches an existing policy, failing with NotFound if either the org or
/// the policy is missing.
pub(crate) fn fetch(
    handle: &dyn Handle,
    caller: &'static str,
    name: &str,
    org_dn: &str,
) -> Result<ManagedObject, OperationError> {
    check_name(caller, name)?;
    let org = crud::parent_get(handle, caller, org_dn)?;
    let dn = policy_dn(&org.dn, name);
    crud::get(handle, caller, &dn)?.structured(caller, NotFoundError::BootPolicy { dn })
}

/// Creates a boot policy, or updates it if it already exists. Properties
/// left unset get their creation defaults.
pub fn boot_policy_create(
    handle: &mut dyn Handle,
    name: &str,
    org_dn: &str,
    props: &BootPolicyProps,
) -> Result<ManagedObject, OperationError> {
    check_name(CREATE_CALLER, name)?;
    let org = crud::parent_get(handle, CREATE_CALLER, org_dn)?;

    let mut mo = ManagedObject::new(ClassId::LsbootPolicy, &org.dn, &policy_rn(name))
        .with(attr::NAME, name);
    for (attribute, value) in props.clone().with_creation_defaults().attributes() {
        mo.set(attribute, value);
    }

    crud::create(handle, CREATE_CALLER, mo, true)
}

pub fn boot_policy_get(
    handle: &dyn Handle,
    name: &str,
    org_dn: &str,
) -> Result<Option<ManagedObject>, OperationError> {
    check_name(GET_CALLER, name)?;
    crud::parent_get(handle, GET_CALLER, org_dn)?;
    crud::get(handle, GET_CALLER, &policy_dn(org_dn, name))
}

/// Returns `(true, policy)` if the policy exists and every supplied
/// property matches.
pub fn boot_policy_exists(
    handle: &dyn Handle,
    name: &str,
    org_dn: &str,
    props: &BootPolicyProps,
) -> Result<(bool, Option<ManagedObject>), OperationError> {
    check_name(EXISTS_CALLER, name)?;
    if crud::get(handle, EXISTS_CALLER, org_dn)?.is_none() {
        debug!("Org '{org_dn}' does not exist");
        return Ok((false, None));
    }
    crud::exists(
        handle,
        EXISTS_CALLER,
        &policy_dn(org_dn, name),
        &props.attributes(),
    )
}

/// Applies the supplied properties to an existing policy.
pub fn boot_policy_modify(
    handle: &mut dyn Handle,
    name: &str,
    org_dn: &str,
    props: &BootPolicyProps,
) -> Result<ManagedObject, OperationError> {
    check_name(MODIFY_CALLER, name)?;
    crud::parent_get(handle, MODIFY_CALLER, org_dn)?;
    let dn = policy_dn(org_dn, name);
    crud::modify(
        handle,
        MODIFY_CALLER,
        &dn,
        &props.attributes(),
        NotFoundError::BootPolicy { dn: dn.clone() },
    )
}

/// Deletes a policy together with its boot order and boot security.
pub fn boot_policy_delete(
    handle: &mut dyn Handle,
    name: &str,
    org_dn: &str,
) -> Result<ManagedObject, OperationError> {
    check_name(DELETE_CALLER, name)?;
    crud::parent_get(handle, DELETE_CALLER, org_dn)?;
    let dn = policy_dn(org_dn, name);
    crud::delete(
        handle,
        DELETE_CALLER,
        &dn,
        NotFoundError::BootPolicy { dn: dn.clone() },
    )
}
