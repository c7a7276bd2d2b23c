//! In-memory managed object store.
//!
//! Objects are kept flat, keyed by DN. Child enumeration therefore follows DN
//! order, not the order in which objects were added, the same way the real
//! backend does not preserve child order.

use std::{collections::BTreeMap, path::Path};

use anyhow::{bail, ensure, Context, Error};
use log::{debug, trace};
use serde::{Deserialize, Serialize};

use ucsm_api::{constants::ORG_ROOT, mo::dn, ClassId, ManagedObject};

use crate::{files, handle::Handle};

/// A stored object: everything but its DN and children.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
struct StoredObject {
    class_id: ClassId,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    attributes: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq)]
enum PendingOp {
    Add {
        mo: ManagedObject,
        modify_present: bool,
    },
    Set(ManagedObject),
    Remove(String),
}

type ObjectMap = BTreeMap<String, StoredObject>;

#[derive(Debug, Clone, PartialEq)]
pub struct MemoryHandle {
    objects: ObjectMap,
    pending: Vec<PendingOp>,
}

impl Default for MemoryHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryHandle {
    /// Creates a store holding only the root organization.
    pub fn new() -> Self {
        let mut objects = ObjectMap::new();
        objects.insert(
            ORG_ROOT.to_string(),
            StoredObject {
                class_id: ClassId::OrgOrg,
                attributes: BTreeMap::new(),
            },
        );
        Self {
            objects,
            pending: Vec::new(),
        }
    }

    /// Loads a store previously written with `save()`. A missing file yields
    /// a fresh store.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(
                "Store '{}' does not exist, starting from an empty store",
                path.display()
            );
            return Ok(Self::new());
        }

        let contents = std::fs::read_to_string(path)
            .context(format!("Failed to read store '{}'", path.display()))?;
        let objects: ObjectMap = serde_yaml::from_str(&contents)
            .context(format!("Failed to parse store '{}'", path.display()))?;
        debug!(
            "Loaded {} objects from store '{}'",
            objects.len(),
            path.display()
        );

        let mut handle = Self {
            objects,
            pending: Vec::new(),
        };
        handle.objects.entry(ORG_ROOT.to_string()).or_insert(StoredObject {
            class_id: ClassId::OrgOrg,
            attributes: BTreeMap::new(),
        });
        Ok(handle)
    }

    /// Writes the committed state to `path`. Pending mutations are not
    /// saved.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), Error> {
        let path = path.as_ref();
        ensure!(
            self.pending.is_empty(),
            "Refusing to save store with {} uncommitted changes",
            self.pending.len()
        );
        let contents = serde_yaml::to_string(&self.objects).context("Failed to serialize store")?;
        files::write_file_atomic(path, contents.as_bytes())?;
        debug!(
            "Saved {} objects to store '{}'",
            self.objects.len(),
            path.display()
        );
        Ok(())
    }

    /// Number of queued mutations.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Number of committed objects, including the root organization.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Returns true if nothing but the root organization is stored.
    pub fn is_empty(&self) -> bool {
        self.objects.keys().all(|dn| dn == ORG_ROOT)
    }

    fn to_mo(dn: &str, stored: &StoredObject) -> ManagedObject {
        ManagedObject {
            class_id: stored.class_id,
            dn: dn.to_string(),
            attributes: stored.attributes.clone(),
            children: Vec::new(),
        }
    }

    /// Iterates over the direct children of `parent_dn` in DN order.
    fn children<'a>(
        objects: &'a ObjectMap,
        parent_dn: &'a str,
    ) -> impl Iterator<Item = (&'a String, &'a StoredObject)> + 'a {
        let prefix = format!("{parent_dn}/");
        objects
            .range(prefix.clone()..)
            .take_while(move |(dn, _)| dn.starts_with(&prefix))
            .filter(move |(dn, _)| dn::is_child(dn, parent_dn))
    }

    fn hierarchy(objects: &ObjectMap, dn: &str, stored: &StoredObject) -> ManagedObject {
        let mut mo = Self::to_mo(dn, stored);
        mo.children = Self::children(objects, dn)
            .map(|(child_dn, child)| Self::hierarchy(objects, child_dn, child))
            .collect();
        mo
    }

    fn apply(objects: &mut ObjectMap, op: &PendingOp) -> Result<(), Error> {
        match op {
            PendingOp::Add { mo, modify_present } => Self::apply_add(objects, mo, *modify_present),
            PendingOp::Set(mo) => {
                let existing = objects
                    .get_mut(&mo.dn)
                    .context(format!("Cannot modify '{}': object does not exist", mo.dn))?;
                ensure!(
                    existing.class_id == mo.class_id,
                    "Cannot modify '{}': class mismatch ({} != {})",
                    mo.dn,
                    existing.class_id,
                    mo.class_id
                );
                existing.attributes.extend(mo.attributes.clone());
                trace!("Modified '{}'", mo.dn);
                Ok(())
            }
            PendingOp::Remove(target) => {
                ensure!(
                    objects.contains_key(target),
                    "Cannot remove '{target}': object does not exist"
                );
                objects.retain(|dn, _| dn != target && !dn::is_descendant(dn, target));
                trace!("Removed '{target}' and its subtree");
                Ok(())
            }
        }
    }

    fn apply_add(objects: &mut ObjectMap, mo: &ManagedObject, modify_present: bool) -> Result<(), Error> {
        let parent = mo.parent_dn();
        if !parent.is_empty() && !objects.contains_key(parent) {
            bail!(
                "Cannot create '{}': parent '{}' does not exist",
                mo.dn,
                parent
            );
        }

        match objects.get_mut(&mo.dn) {
            Some(existing) if modify_present => {
                ensure!(
                    existing.class_id == mo.class_id,
                    "Cannot modify '{}': class mismatch ({} != {})",
                    mo.dn,
                    existing.class_id,
                    mo.class_id
                );
                existing.attributes.extend(mo.attributes.clone());
                trace!("Modified '{}'", mo.dn);
            }
            Some(_) => bail!("Cannot create '{}': object already exists", mo.dn),
            None => {
                objects.insert(
                    mo.dn.clone(),
                    StoredObject {
                        class_id: mo.class_id,
                        attributes: mo.attributes.clone(),
                    },
                );
                trace!("Created '{}'", mo.dn);
            }
        }

        for child in &mo.children {
            ensure!(
                child.parent_dn() == mo.dn,
                "Child '{}' is not located under '{}'",
                child.dn,
                mo.dn
            );
            Self::apply_add(objects, child, modify_present)?;
        }

        Ok(())
    }
}

impl Handle for MemoryHandle {
    fn query_dn(&self, dn: &str) -> Result<Option<ManagedObject>, Error> {
        Ok(self.objects.get(dn).map(|stored| Self::to_mo(dn, stored)))
    }

    fn query_children(&self, dn: &str) -> Result<Vec<ManagedObject>, Error> {
        ensure!(self.objects.contains_key(dn), "Object '{dn}' does not exist");
        Ok(Self::children(&self.objects, dn)
            .map(|(child_dn, stored)| Self::to_mo(child_dn, stored))
            .collect())
    }

    fn query_hierarchy(&self, dn: &str) -> Result<Option<ManagedObject>, Error> {
        Ok(self
            .objects
            .get(dn)
            .map(|stored| Self::hierarchy(&self.objects, dn, stored)))
    }

    fn add_mo(&mut self, mo: ManagedObject, modify_present: bool) -> Result<(), Error> {
        ensure!(!mo.dn.is_empty(), "Cannot add an object without a DN");
        self.pending.push(PendingOp::Add { mo, modify_present });
        Ok(())
    }

    fn set_mo(&mut self, mo: ManagedObject) -> Result<(), Error> {
        ensure!(!mo.dn.is_empty(), "Cannot modify an object without a DN");
        self.pending.push(PendingOp::Set(mo));
        Ok(())
    }

    fn remove_mo(&mut self, mo: &ManagedObject) -> Result<(), Error> {
        ensure!(!mo.dn.is_empty(), "Cannot remove an object without a DN");
        self.pending.push(PendingOp::Remove(mo.dn.clone()));
        Ok(())
    }

    fn commit(&mut self) -> Result<(), Error> {
        let pending = std::mem::take(&mut self.pending);
        let mut staged = self.objects.clone();
        for op in &pending {
            Self::apply(&mut staged, op).context("Commit failed, no changes were applied")?;
        }
        debug!("Committed {} changes", pending.len());
        self.objects = staged;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use maplit::btreemap;

    use super::*;

    fn policy() -> ManagedObject {
        ManagedObject::new(ClassId::LsbootPolicy, ORG_ROOT, "boot-policy-web")
            .with("name", "web")
            .with("reboot_on_update", "no")
    }

    #[test]
    fn test_new_store_has_root_org() {
        let handle = MemoryHandle::new();
        let root = handle.query_dn(ORG_ROOT).unwrap().unwrap();
        assert_eq!(root.class_id, ClassId::OrgOrg);
        assert_eq!(handle.len(), 1);
        assert!(handle.is_empty());
    }

    #[test]
    fn test_mutations_are_invisible_until_commit() {
        let mut handle = MemoryHandle::new();
        handle.add_mo(policy(), false).unwrap();
        assert_eq!(handle.pending_count(), 1);
        assert!(handle.query_dn("org-root/boot-policy-web").unwrap().is_none());
        assert!(handle.is_empty());

        handle.commit().unwrap();
        assert_eq!(handle.pending_count(), 0);
        assert!(!handle.is_empty());
        assert_eq!(
            handle.query_dn("org-root/boot-policy-web").unwrap().unwrap(),
            policy()
        );
    }

    #[test]
    fn test_add_subtree_and_query_hierarchy() {
        let mut handle = MemoryHandle::new();
        let mut policy = policy();
        let lan = policy.add_child(ClassId::LsbootLan, "lan");
        lan.set("order", "3");
        lan.add_child(ClassId::LsbootLanImagePath, "path-secondary")
            .set("type", "secondary");
        lan.add_child(ClassId::LsbootLanImagePath, "path-primary")
            .set("type", "primary");
        handle.add_mo(policy, false).unwrap();
        handle.commit().unwrap();

        let children = handle.query_children("org-root/boot-policy-web").unwrap();
        assert_eq!(children.len(), 1);
        assert!(children[0].children.is_empty());

        let tree = handle
            .query_hierarchy("org-root/boot-policy-web")
            .unwrap()
            .unwrap();
        let lan = &tree.children[0];
        assert_eq!(lan.get("order"), Some("3"));
        // Children come back in DN order, not insertion order
        let types: Vec<&str> = lan.children.iter().filter_map(|c| c.get("type")).collect();
        assert_eq!(types, vec!["primary", "secondary"]);
    }

    #[test]
    fn test_add_existing_requires_modify_present() {
        let mut handle = MemoryHandle::new();
        handle.add_mo(policy(), false).unwrap();
        handle.commit().unwrap();

        handle.add_mo(policy(), false).unwrap();
        handle.commit().unwrap_err();
        assert_eq!(handle.pending_count(), 0);

        handle
            .add_mo(policy().with("reboot_on_update", "yes"), true)
            .unwrap();
        handle.commit().unwrap();
        assert_eq!(
            handle
                .query_dn("org-root/boot-policy-web")
                .unwrap()
                .unwrap()
                .get("reboot_on_update"),
            Some("yes")
        );
    }

    #[test]
    fn test_failed_commit_applies_nothing() {
        let mut handle = MemoryHandle::new();
        handle.add_mo(policy(), false).unwrap();
        handle
            .add_mo(
                ManagedObject::new(ClassId::LsbootLan, "org-root/boot-policy-missing", "lan"),
                false,
            )
            .unwrap();
        handle.commit().unwrap_err();
        assert!(handle.query_dn("org-root/boot-policy-web").unwrap().is_none());
        assert_eq!(handle.len(), 1);
    }

    #[test]
    fn test_set_and_remove() {
        let mut handle = MemoryHandle::new();
        let mut policy = policy();
        policy.add_child(ClassId::LsbootEfiShell, "efi-shell").set("order", "1");
        handle.add_mo(policy.clone(), false).unwrap();
        handle.commit().unwrap();

        let mut update = policy.shallow();
        update.set("reboot_on_update", "yes");
        handle.set_mo(update).unwrap();
        handle.remove_mo(&policy.children[0]).unwrap();
        handle.commit().unwrap();

        let tree = handle
            .query_hierarchy("org-root/boot-policy-web")
            .unwrap()
            .unwrap();
        assert_eq!(tree.get("reboot_on_update"), Some("yes"));
        assert!(tree.children.is_empty());

        // Removing a missing object fails at commit
        handle.remove_mo(&policy.children[0]).unwrap();
        handle.commit().unwrap_err();

        // Removing the policy removes its subtree
        handle.remove_mo(&policy).unwrap();
        handle.commit().unwrap();
        assert_eq!(handle.len(), 1);
    }

    #[test]
    fn test_set_missing_object_fails() {
        let mut handle = MemoryHandle::new();
        handle.set_mo(policy()).unwrap();
        handle.commit().unwrap_err();
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.yaml");

        let mut handle = MemoryHandle::new();
        handle.add_mo(policy(), false).unwrap();
        handle.commit().unwrap();
        handle.save(&path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("org-root/boot-policy-web:"));
        assert!(contents.contains("class-id: lsbootPolicy"));

        let loaded = MemoryHandle::load(&path).unwrap();
        assert_eq!(loaded, handle);
        assert_eq!(
            loaded
                .query_dn("org-root/boot-policy-web")
                .unwrap()
                .unwrap()
                .attributes,
            btreemap! {
                "name".to_string() => "web".to_string(),
                "reboot_on_update".to_string() => "no".to_string(),
            }
        );
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let handle = MemoryHandle::load(dir.path().join("absent.yaml")).unwrap();
        assert_eq!(handle, MemoryHandle::new());
    }

    #[test]
    fn test_save_refuses_pending_changes() {
        let dir = tempfile::tempdir().unwrap();
        let mut handle = MemoryHandle::new();
        handle.add_mo(policy(), false).unwrap();
        handle.save(dir.path().join("store.yaml")).unwrap_err();
    }
}
