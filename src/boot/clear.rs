use log::{debug, trace};

use moutils::Handle;
use ucsm_api::{
    constants::attr,
    error::{BackendError, OperationError, ReportError},
    ClassId, ManagedObject,
};

const CLEAR_CALLER: &str = "_boot_policy_order_clear";

/// Removes every device from `policy`, keeping its boot security node.
///
/// If the live policy reboots on update, the flag is turned off and back on
/// around the removal, each change in its own commit, so that the server does
/// not reboot between the clear and the rebuild of the order.
pub(crate) fn clear(handle: &mut dyn Handle, policy: &ManagedObject) -> Result<(), OperationError> {
    debug!("Clearing boot order of '{}'", policy.dn);

    let children = handle
        .query_children(&policy.dn)
        .structured(CLEAR_CALLER, BackendError::QueryChildren { dn: policy.dn.clone() })?;
    for child in children
        .iter()
        .filter(|c| c.class_id != ClassId::LsbootBootSecurity)
    {
        trace!("Removing '{}'", child.dn);
        handle
            .remove_mo(child)
            .structured(CLEAR_CALLER, BackendError::RemoveMo { dn: child.dn.clone() })?;
    }

    if policy.get(attr::REBOOT_ON_UPDATE) == Some("yes") {
        for value in ["no", "yes"] {
            let mut toggle = policy.shallow();
            toggle.attributes.clear();
            toggle.set(attr::REBOOT_ON_UPDATE, value);
            handle
                .set_mo(toggle)
                .structured(CLEAR_CALLER, BackendError::SetMo { dn: policy.dn.clone() })?;
            handle.commit().structured(CLEAR_CALLER, BackendError::Commit)?;
        }
    }

    handle.commit().structured(CLEAR_CALLER, BackendError::Commit)
}

#[cfg(test)]
mod tests {
    use maplit::btreemap;

    use moutils::{
        testutils::{Call, Fault, RecordingHandle},
        MemoryHandle,
    };
    use ucsm_api::constants::ORG_ROOT;

    use super::*;

    fn setup(reboot_on_update: &str) -> (MemoryHandle, ManagedObject) {
        let mut policy = ManagedObject::new(ClassId::LsbootPolicy, ORG_ROOT, "boot-policy-web")
            .with(attr::REBOOT_ON_UPDATE, reboot_on_update)
            .with(attr::BOOT_MODE, "uefi");
        policy.add_child(ClassId::LsbootEfiShell, "efi-shell").set(attr::ORDER, "1");
        policy
            .add_child(ClassId::LsbootBootSecurity, "boot-security")
            .set(attr::SECURE_BOOT, "yes");

        let mut handle = MemoryHandle::new();
        handle.add_mo(policy.clone(), false).unwrap();
        handle.commit().unwrap();
        (handle, policy.shallow())
    }

    #[test]
    fn test_clear_keeps_boot_security() {
        let (mut handle, policy) = setup("no");
        clear(&mut handle, &policy).unwrap();

        let children = handle.query_children(&policy.dn).unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].class_id, ClassId::LsbootBootSecurity);
    }

    #[test]
    fn test_clear_without_reboot_on_update() {
        let (handle, policy) = setup("no");
        let mut handle = RecordingHandle::new(handle);
        clear(&mut handle, &policy).unwrap();
        assert_eq!(
            handle.mutations(),
            vec![
                Call::RemoveMo("org-root/boot-policy-web/efi-shell".into()),
                Call::Commit,
            ]
        );
    }

    #[test]
    fn test_clear_toggles_reboot_on_update() {
        let (handle, policy) = setup("yes");
        let mut handle = RecordingHandle::new(handle);
        clear(&mut handle, &policy).unwrap();

        let toggle = |value: &str| Call::SetMo {
            dn: policy.dn.clone(),
            attributes: btreemap! { attr::REBOOT_ON_UPDATE.to_string() => value.to_string() },
        };
        assert_eq!(
            handle.mutations(),
            vec![
                Call::RemoveMo("org-root/boot-policy-web/efi-shell".into()),
                toggle("no"),
                Call::Commit,
                toggle("yes"),
                Call::Commit,
                Call::Commit,
            ]
        );
        assert_eq!(
            handle
                .query_dn(&policy.dn)
                .unwrap()
                .unwrap()
                .get(attr::REBOOT_ON_UPDATE),
            Some("yes")
        );
    }

    #[test]
    fn test_clear_commit_failure() {
        let (handle, policy) = setup("no");
        let mut handle = RecordingHandle::new(handle).fail_on(Fault::Commit(1));
        let err = clear(&mut handle, &policy).unwrap_err();
        assert_eq!(
            err.to_string(),
            "_boot_policy_order_clear failed, error: Failed to commit pending changes"
        );
    }
}
