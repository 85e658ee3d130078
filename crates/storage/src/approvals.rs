// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Approval store trait and the in-memory implementation.

use parking_lot::RwLock;
use shep_core::{Approval, ApprovalId, ApprovalStatus};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("approval {0} already exists")]
    Duplicate(ApprovalId),
    #[error("approval {0} not found")]
    Missing(ApprovalId),
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Persistence for approval records.
///
/// Calls are synchronous and expected to be short; the approval engine
/// holds its transition lock across a `get` + `update` pair.
pub trait ApprovalStore: Send + Sync + 'static {
    /// Insert a new record. Fails if the ID is taken.
    fn create(&self, approval: &Approval) -> Result<(), StoreError>;

    /// Load a record; `Ok(None)` when the ID is unknown.
    fn get(&self, id: &ApprovalId) -> Result<Option<Approval>, StoreError>;

    /// Replace an existing record. Fails if the ID is unknown.
    fn update(&self, approval: &Approval) -> Result<(), StoreError>;

    /// All records in `status`, oldest first.
    fn list_by_status(&self, status: ApprovalStatus) -> Result<Vec<Approval>, StoreError>;
}

impl<S: ApprovalStore> ApprovalStore for Arc<S> {
    fn create(&self, approval: &Approval) -> Result<(), StoreError> {
        (**self).create(approval)
    }

    fn get(&self, id: &ApprovalId) -> Result<Option<Approval>, StoreError> {
        (**self).get(id)
    }

    fn update(&self, approval: &Approval) -> Result<(), StoreError> {
        (**self).update(approval)
    }

    fn list_by_status(&self, status: ApprovalStatus) -> Result<Vec<Approval>, StoreError> {
        (**self).list_by_status(status)
    }
}

/// Process-local store. Records live as long as the process.
#[derive(Clone, Default)]
pub struct MemoryApprovalStore {
    records: Arc<RwLock<HashMap<ApprovalId, Approval>>>,
}

impl MemoryApprovalStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

impl ApprovalStore for MemoryApprovalStore {
    fn create(&self, approval: &Approval) -> Result<(), StoreError> {
        let mut records = self.records.write();
        if records.contains_key(&approval.id) {
            return Err(StoreError::Duplicate(approval.id.clone()));
        }
        records.insert(approval.id.clone(), approval.clone());
        tracing::debug!(approval_id = %approval.id, "approval stored");
        Ok(())
    }

    fn get(&self, id: &ApprovalId) -> Result<Option<Approval>, StoreError> {
        Ok(self.records.read().get(id).cloned())
    }

    fn update(&self, approval: &Approval) -> Result<(), StoreError> {
        match self.records.write().get_mut(&approval.id) {
            Some(existing) => {
                *existing = approval.clone();
                Ok(())
            }
            None => Err(StoreError::Missing(approval.id.clone())),
        }
    }

    fn list_by_status(&self, status: ApprovalStatus) -> Result<Vec<Approval>, StoreError> {
        let mut matching: Vec<Approval> =
            self.records.read().values().filter(|a| a.status == status).cloned().collect();
        matching.sort_by(|a, b| a.created_at_ms.cmp(&b.created_at_ms).then_with(|| a.id.cmp(&b.id)));
        Ok(matching)
    }
}

#[cfg(test)]
#[path = "approvals_tests.rs"]
mod tests;
