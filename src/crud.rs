//! Create/get/exists/modify/delete over a single managed object.
//!
//! Every operation commits its own changes. The `caller` tag names the
//! public operation on whose behalf the call is made and ends up in any
//! error raised here.

use log::{debug, info};

use moutils::Handle;
use ucsm_api::{
    error::{BackendError, ErrorKind, NotFoundError, OperationError, ReportError},
    ManagedObject,
};

/// Fetches the organization that will hold a new object.
pub fn parent_get(
    handle: &dyn Handle,
    caller: &'static str,
    org_dn: &str,
) -> Result<ManagedObject, OperationError> {
    handle
        .query_dn(org_dn)
        .structured(caller, BackendError::QueryDn { dn: org_dn.into() })?
        .structured(caller, NotFoundError::Org { dn: org_dn.into() })
}

/// Stages `mo` (and its children) and commits.
pub fn create(
    handle: &mut dyn Handle,
    caller: &'static str,
    mo: ManagedObject,
    modify_present: bool,
) -> Result<ManagedObject, OperationError> {
    debug!("{caller}: creating '{}'", mo.dn);
    handle
        .add_mo(mo.clone(), modify_present)
        .structured(caller, BackendError::AddMo { dn: mo.dn.clone() })?;
    handle.commit().structured(caller, BackendError::Commit)?;
    info!("Created '{}'", mo.dn);
    Ok(mo)
}

pub fn get(
    handle: &dyn Handle,
    caller: &'static str,
    dn: &str,
) -> Result<Option<ManagedObject>, OperationError> {
    handle
        .query_dn(dn)
        .structured(caller, BackendError::QueryDn { dn: dn.into() })
}

/// Returns `(true, mo)` if the object exists and every listed property
/// matches.
pub fn exists(
    handle: &dyn Handle,
    caller: &'static str,
    dn: &str,
    properties: &[(&'static str, String)],
) -> Result<(bool, Option<ManagedObject>), OperationError> {
    let Some(mo) = get(handle, caller, dn)? else {
        debug!("{caller}: '{dn}' does not exist");
        return Ok((false, None));
    };

    if mo.properties_match(properties.iter().map(|(name, value)| (*name, value.as_str()))) {
        Ok((true, Some(mo)))
    } else {
        debug!("{caller}: '{dn}' exists with different properties");
        Ok((false, None))
    }
}

/// Applies `attributes` to an existing object and commits. Fails with
/// `not_found` if the object does not exist.
pub fn modify(
    handle: &mut dyn Handle,
    caller: &'static str,
    dn: &str,
    attributes: &[(&'static str, String)],
    not_found: impl Into<ErrorKind>,
) -> Result<ManagedObject, OperationError> {
    let mut mo = get(handle, caller, dn)?.structured(caller, not_found)?;

    let mut update = mo.shallow();
    update.attributes.clear();
    for (name, value) in attributes {
        update.set(name, value.as_str());
        mo.set(name, value.as_str());
    }

    handle
        .set_mo(update)
        .structured(caller, BackendError::SetMo { dn: dn.into() })?;
    handle.commit().structured(caller, BackendError::Commit)?;
    info!("Modified '{dn}'");
    Ok(mo)
}

/// Removes an existing object and its subtree, and commits. Fails with
/// `not_found` if the object does not exist.
pub fn delete(
    handle: &mut dyn Handle,
    caller: &'static str,
    dn: &str,
    not_found: impl Into<ErrorKind>,
) -> Result<ManagedObject, OperationError> {
    let mo = get(handle, caller, dn)?.structured(caller, not_found)?;
    handle
        .remove_mo(&mo)
        .structured(caller, BackendError::RemoveMo { dn: dn.into() })?;
    handle.commit().structured(caller, BackendError::Commit)?;
    info!("Deleted '{dn}'");
    Ok(mo)
}

#[cfg(test)]
mod tests {
    use maplit::btreemap;

    use moutils::MemoryHandle;
    use ucsm_api::{constants::ORG_ROOT, ClassId};

    use super::*;

    const CALLER: &str = "test_caller";

    fn shell(org_dn: &str) -> ManagedObject {
        ManagedObject::new(ClassId::LsbootEfiShell, org_dn, "efi-shell").with("order", "1")
    }

    #[test]
    fn test_parent_get() {
        let handle = MemoryHandle::new();
        assert_eq!(
            parent_get(&handle, CALLER, ORG_ROOT).unwrap().class_id,
            ClassId::OrgOrg
        );

        let err = parent_get(&handle, CALLER, "org-root/org-missing").unwrap_err();
        assert_eq!(
            err.to_string(),
            "test_caller failed, error: org 'org-root/org-missing' does not exist"
        );
    }

    #[test]
    fn test_create_get_exists() {
        let mut handle = MemoryHandle::new();
        let created = create(&mut handle, CALLER, shell(ORG_ROOT), false).unwrap();
        assert_eq!(get(&handle, CALLER, &created.dn).unwrap(), Some(created.clone()));

        let (found, mo) = exists(&handle, CALLER, &created.dn, &[("order", "1".into())]).unwrap();
        assert!(found);
        assert_eq!(mo, Some(created.clone()));

        let (found, mo) = exists(&handle, CALLER, &created.dn, &[("order", "2".into())]).unwrap();
        assert!(!found);
        assert!(mo.is_none());

        assert!(!exists(&handle, CALLER, "org-root/efi-missing", &[]).unwrap().0);
    }

    #[test]
    fn test_create_under_missing_parent_fails() {
        let mut handle = MemoryHandle::new();
        let err = create(&mut handle, CALLER, shell("org-root/org-missing"), false).unwrap_err();
        assert_eq!(
            err.to_string(),
            "test_caller failed, error: Failed to commit pending changes"
        );
    }

    #[test]
    fn test_modify() {
        let mut handle = MemoryHandle::new();
        let created = create(&mut handle, CALLER, shell(ORG_ROOT), false).unwrap();
        let modified = modify(
            &mut handle,
            CALLER,
            &created.dn,
            &[("order", "4".into())],
            NotFoundError::ManagedObject {
                dn: created.dn.clone(),
            },
        )
        .unwrap();
        assert_eq!(
            modified.attributes,
            btreemap! { "order".to_string() => "4".to_string() }
        );
        assert_eq!(get(&handle, CALLER, &created.dn).unwrap(), Some(modified));

        let err = modify(
            &mut handle,
            CALLER,
            "org-root/efi-missing",
            &[],
            NotFoundError::ManagedObject {
                dn: "org-root/efi-missing".into(),
            },
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "test_caller failed, error: Managed object 'org-root/efi-missing' does not exist"
        );
    }

    #[test]
    fn test_delete() {
        let mut handle = MemoryHandle::new();
        let created = create(&mut handle, CALLER, shell(ORG_ROOT), false).unwrap();
        let not_found = || NotFoundError::ManagedObject {
            dn: created.dn.clone(),
        };

        delete(&mut handle, CALLER, &created.dn, not_found()).unwrap();
        assert!(get(&handle, CALLER, &created.dn).unwrap().is_none());
        delete(&mut handle, CALLER, &created.dn, not_found()).unwrap_err();
    }
}
