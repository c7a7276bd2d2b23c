//! The backend contract: a tree-shaped object store, addressable by DN, with
//! a commit boundary.

use anyhow::Error;

use ucsm_api::ManagedObject;

/// A session against a managed object store.
///
/// Reads see committed state only. Mutations are queued and applied
/// together by `commit()`.
pub trait Handle {
    /// Returns the object at `dn` without its children.
    fn query_dn(&self, dn: &str) -> Result<Option<ManagedObject>, Error>;

    /// Returns the direct children of `dn`, without their own children.
    fn query_children(&self, dn: &str) -> Result<Vec<ManagedObject>, Error>;

    /// Returns the object at `dn` with its full subtree.
    fn query_hierarchy(&self, dn: &str) -> Result<Option<ManagedObject>, Error>;

    /// Queues the creation of `mo` and its subtree. With `modify_present`,
    /// objects that already exist are updated instead.
    fn add_mo(&mut self, mo: ManagedObject, modify_present: bool) -> Result<(), Error>;

    /// Queues an update of the attributes of an existing object.
    fn set_mo(&mut self, mo: ManagedObject) -> Result<(), Error>;

    /// Queues the removal of an object and its subtree.
    fn remove_mo(&mut self, mo: &ManagedObject) -> Result<(), Error>;

    /// Applies all queued mutations atomically.
    fn commit(&mut self) -> Result<(), Error>;
}
