//! Test helpers for code that talks to a [`Handle`].

use std::cell::RefCell;
use std::collections::BTreeMap;

use anyhow::{bail, Error};

use ucsm_api::ManagedObject;

use crate::handle::Handle;

/// A single call made through a [`RecordingHandle`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    QueryDn(String),
    QueryChildren(String),
    QueryHierarchy(String),
    AddMo {
        dn: String,
        modify_present: bool,
    },
    SetMo {
        dn: String,
        attributes: BTreeMap<String, String>,
    },
    RemoveMo(String),
    Commit,
}

/// Which call a [`RecordingHandle`] should fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    Query,
    Add,
    Set,
    Remove,
    /// Fails the nth commit, counting from 1.
    Commit(usize),
}

/// Wraps another handle and records every call made through it.
pub struct RecordingHandle<H> {
    inner: H,
    calls: RefCell<Vec<Call>>,
    fault: Option<Fault>,
}

impl<H: Handle> RecordingHandle<H> {
    pub fn new(inner: H) -> Self {
        Self {
            inner,
            calls: RefCell::new(Vec::new()),
            fault: None,
        }
    }

    /// Makes the handle fail the given kind of call.
    pub fn fail_on(mut self, fault: Fault) -> Self {
        self.fault = Some(fault);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    /// Only the mutating calls, in order.
    pub fn mutations(&self) -> Vec<Call> {
        self.calls
            .borrow()
            .iter()
            .filter(|call| {
                !matches!(
                    call,
                    Call::QueryDn(_) | Call::QueryChildren(_) | Call::QueryHierarchy(_)
                )
            })
            .cloned()
            .collect()
    }

    pub fn commit_count(&self) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|call| matches!(call, Call::Commit))
            .count()
    }

    pub fn clear(&self) {
        self.calls.borrow_mut().clear();
    }

    pub fn inner(&self) -> &H {
        &self.inner
    }

    pub fn into_inner(self) -> H {
        self.inner
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }

    fn check(&self, fault: Fault) -> Result<(), Error> {
        if self.fault == Some(fault) {
            bail!("Injected failure: {fault:?}");
        }
        Ok(())
    }
}

impl<H: Handle> Handle for RecordingHandle<H> {
    fn query_dn(&self, dn: &str) -> Result<Option<ManagedObject>, Error> {
        self.record(Call::QueryDn(dn.to_string()));
        self.check(Fault::Query)?;
        self.inner.query_dn(dn)
    }

    fn query_children(&self, dn: &str) -> Result<Vec<ManagedObject>, Error> {
        self.record(Call::QueryChildren(dn.to_string()));
        self.check(Fault::Query)?;
        self.inner.query_children(dn)
    }

    fn query_hierarchy(&self, dn: &str) -> Result<Option<ManagedObject>, Error> {
        self.record(Call::QueryHierarchy(dn.to_string()));
        self.check(Fault::Query)?;
        self.inner.query_hierarchy(dn)
    }

    fn add_mo(&mut self, mo: ManagedObject, modify_present: bool) -> Result<(), Error> {
        self.record(Call::AddMo {
            dn: mo.dn.clone(),
            modify_present,
        });
        self.check(Fault::Add)?;
        self.inner.add_mo(mo, modify_present)
    }

    fn set_mo(&mut self, mo: ManagedObject) -> Result<(), Error> {
        self.record(Call::SetMo {
            dn: mo.dn.clone(),
            attributes: mo.attributes.clone(),
        });
        self.check(Fault::Set)?;
        self.inner.set_mo(mo)
    }

    fn remove_mo(&mut self, mo: &ManagedObject) -> Result<(), Error> {
        self.record(Call::RemoveMo(mo.dn.clone()));
        self.check(Fault::Remove)?;
        self.inner.remove_mo(mo)
    }

    fn commit(&mut self) -> Result<(), Error> {
        self.record(Call::Commit);
        self.check(Fault::Commit(self.commit_count()))?;
        self.inner.commit()
    }
}

#[cfg(test)]
mod tests {
    use ucsm_api::{constants::ORG_ROOT, ClassId};

    use super::*;
    use crate::MemoryHandle;

    #[test]
    fn test_records_calls() {
        let mut handle = RecordingHandle::new(MemoryHandle::new());
        let policy = ManagedObject::new(ClassId::LsbootPolicy, ORG_ROOT, "boot-policy-web");
        handle.add_mo(policy.clone(), false).unwrap();
        handle.commit().unwrap();
        handle.query_dn(&policy.dn).unwrap().unwrap();

        assert_eq!(
            handle.calls(),
            vec![
                Call::AddMo {
                    dn: policy.dn.clone(),
                    modify_present: false
                },
                Call::Commit,
                Call::QueryDn(policy.dn.clone()),
            ]
        );
        assert_eq!(handle.mutations().len(), 2);
        assert_eq!(handle.commit_count(), 1);
    }

    #[test]
    fn test_injected_commit_failure() {
        let mut handle = RecordingHandle::new(MemoryHandle::new()).fail_on(Fault::Commit(2));
        handle.commit().unwrap();
        handle.commit().unwrap_err();
        handle.commit().unwrap();
        assert_eq!(handle.commit_count(), 3);
    }
}
