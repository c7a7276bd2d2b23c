//! Managed objects: the nodes of the UCS Manager configuration tree.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub mod class;
pub mod display;
pub mod dn;

use class::ClassId;

/// A node of the configuration tree, addressable by its distinguished name.
///
/// Children are held in the order they were attached. The backend does not
/// preserve that order, so anything comparing trees must pair children by
/// attribute rather than by position.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct ManagedObject {
    pub class_id: ClassId,

    pub dn: String,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ManagedObject>,
}

impl ManagedObject {
    /// Creates a detached object with the given class under `parent_dn`.
    pub fn new(class_id: ClassId, parent_dn: &str, rn: &str) -> Self {
        Self {
            class_id,
            dn: dn::join(parent_dn, rn),
            attributes: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    /// Relative name of this object.
    pub fn rn(&self) -> &str {
        dn::rn(&self.dn)
    }

    /// DN of this object's parent.
    pub fn parent_dn(&self) -> &str {
        dn::parent(&self.dn)
    }

    pub fn get(&self, attribute: &str) -> Option<&str> {
        self.attributes.get(attribute).map(String::as_str)
    }

    pub fn set(&mut self, attribute: &str, value: impl Into<String>) {
        self.attributes.insert(attribute.to_string(), value.into());
    }

    /// Builder-style variant of `set()`.
    pub fn with(mut self, attribute: &str, value: impl Into<String>) -> Self {
        self.set(attribute, value);
        self
    }

    /// Shallow equality over the named attributes. Attributes not listed are
    /// ignored; a listed attribute missing on the object never matches.
    pub fn properties_match<'a, I, V>(&self, properties: I) -> bool
    where
        I: IntoIterator<Item = (&'a str, V)>,
        V: AsRef<str>,
    {
        properties
            .into_iter()
            .all(|(name, value)| self.get(name) == Some(value.as_ref()))
    }

    /// Returns a copy of this object without its children.
    pub fn shallow(&self) -> Self {
        Self {
            class_id: self.class_id,
            dn: self.dn.clone(),
            attributes: self.attributes.clone(),
            children: Vec::new(),
        }
    }

    /// Creates a new child and returns a mutable reference to it.
    pub fn add_child(&mut self, class_id: ClassId, rn: &str) -> &mut ManagedObject {
        let child = ManagedObject::new(class_id, &self.dn, rn);
        self.children.push(child);
        let last = self.children.len() - 1;
        &mut self.children[last]
    }

    /// Returns the first child of the class, creating it if there is none.
    pub fn child_or_insert(&mut self, class_id: ClassId, rn: &str) -> &mut ManagedObject {
        match self.children.iter().position(|c| c.class_id == class_id) {
            Some(index) => &mut self.children[index],
            None => self.add_child(class_id, rn),
        }
    }

    pub fn has_child(&self, class_id: ClassId) -> bool {
        self.children.iter().any(|c| c.class_id == class_id)
    }

    /// Iterates over the children of the given class.
    pub fn children_of(&self, class_id: ClassId) -> impl Iterator<Item = &ManagedObject> {
        self.children.iter().filter(move |c| c.class_id == class_id)
    }

    pub fn child_of(&self, class_id: ClassId) -> Option<&ManagedObject> {
        self.children_of(class_id).next()
    }

    pub fn child_of_mut(&mut self, class_id: ClassId) -> Option<&mut ManagedObject> {
        self.children.iter_mut().find(|c| c.class_id == class_id)
    }

    /// Finds the first child of the class whose attribute equals `value`.
    pub fn child_where(
        &self,
        class_id: ClassId,
        attribute: &str,
        value: &str,
    ) -> Option<&ManagedObject> {
        self.children_of(class_id)
            .find(|c| c.get(attribute) == Some(value))
    }

    pub fn child_where_mut(
        &mut self,
        class_id: ClassId,
        attribute: &str,
        value: &str,
    ) -> Option<&mut ManagedObject> {
        self.children
            .iter_mut()
            .find(|c| c.class_id == class_id && c.get(attribute) == Some(value))
    }
}

#[cfg(test)]
mod tests {
    use maplit::btreemap;

    use super::*;

    fn policy() -> ManagedObject {
        ManagedObject::new(ClassId::LsbootPolicy, "org-root", "boot-policy-web")
            .with("name", "web")
            .with("boot_mode", "uefi")
    }

    #[test]
    fn test_new_and_names() {
        let policy = policy();
        assert_eq!(policy.dn, "org-root/boot-policy-web");
        assert_eq!(policy.rn(), "boot-policy-web");
        assert_eq!(policy.parent_dn(), "org-root");
        assert_eq!(
            policy.attributes,
            btreemap! {
                "name".to_string() => "web".to_string(),
                "boot_mode".to_string() => "uefi".to_string(),
            }
        );
    }

    #[test]
    fn test_properties_match() {
        let policy = policy();
        assert!(policy.properties_match([("name", "web")]));
        assert!(policy.properties_match([("name", "web"), ("boot_mode", "uefi")]));
        assert!(!policy.properties_match([("boot_mode", "legacy")]));
        assert!(!policy.properties_match([("descr", "")]));
        assert!(policy.properties_match(Vec::<(&str, &str)>::new()));
    }

    #[test]
    fn test_children() {
        let mut policy = policy();
        policy
            .add_child(ClassId::LsbootLan, "lan")
            .add_child(ClassId::LsbootLanImagePath, "path-primary")
            .set("type", "primary");
        assert_eq!(
            policy.children[0].children[0].dn,
            "org-root/boot-policy-web/lan/path-primary"
        );

        // child_or_insert must reuse the existing umbrella
        policy.child_or_insert(ClassId::LsbootStorage, "storage");
        policy.child_or_insert(ClassId::LsbootStorage, "storage");
        assert_eq!(policy.children_of(ClassId::LsbootStorage).count(), 1);

        let lan = policy.child_of(ClassId::LsbootLan).unwrap();
        assert!(lan
            .child_where(ClassId::LsbootLanImagePath, "type", "primary")
            .is_some());
        assert!(lan
            .child_where(ClassId::LsbootLanImagePath, "type", "secondary")
            .is_none());

        assert_eq!(policy.shallow().children.len(), 0);
        assert!(policy.has_child(ClassId::LsbootLan));
        assert!(!policy.has_child(ClassId::LsbootEfiShell));
    }
}
