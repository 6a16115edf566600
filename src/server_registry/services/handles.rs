//! Bounded registry of launch handles owned by the launch supervisor.

use crate::server_registry::domain::{LaunchHandle, LaunchId};
use std::collections::VecDeque;
use std::sync::RwLock;
use thiserror::Error;

/// Default number of handles kept by a [`LaunchHandleRegistry`].
pub const DEFAULT_HANDLE_CAPACITY: usize = 64;

/// Errors raised when launch supervisor state cannot be accessed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SupervisorStateError {
    /// The handle registry lock was poisoned by a panicking holder.
    #[error("launch handle registry lock poisoned: {0}")]
    HandlesPoisoned(String),

    /// The per-server launch lock table was poisoned by a panicking holder.
    #[error("launch lock table poisoned: {0}")]
    LocksPoisoned(String),
}

/// Result type for launch handle registry operations.
pub type SupervisorStateResult<T> = Result<T, SupervisorStateError>;

/// Registry holding the handle of the most recent launch of each server.
///
/// Recording a launch for a server replaces the previous handle for that
/// server. When the registry is full, the least recently recorded handle is
/// evicted to make room. All access is serialized through an internal lock.
#[derive(Debug)]
pub struct LaunchHandleRegistry {
    capacity: usize,
    handles: RwLock<VecDeque<LaunchHandle>>,
}

impl LaunchHandleRegistry {
    /// Creates a registry holding at most `capacity` handles (minimum one).
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            handles: RwLock::new(VecDeque::new()),
        }
    }

    /// Returns the maximum number of handles kept.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Records a handle and returns the handle it displaced, if any.
    ///
    /// The displaced handle is either the previous handle for the same server
    /// or, when the registry was full, the least recently recorded one.
    ///
    /// # Errors
    ///
    /// Returns [`SupervisorStateError::HandlesPoisoned`] when the registry
    /// lock is poisoned.
    pub fn record(&self, handle: LaunchHandle) -> SupervisorStateResult<Option<LaunchHandle>> {
        let mut handles = self
            .handles
            .write()
            .map_err(|err| SupervisorStateError::HandlesPoisoned(err.to_string()))?;

        let previous = handles
            .iter()
            .position(|existing| existing.server_name() == handle.server_name())
            .and_then(|index| handles.remove(index));
        handles.push_back(handle);

        if previous.is_some() || handles.len() <= self.capacity {
            return Ok(previous);
        }
        Ok(handles.pop_front())
    }

    /// Removes the handle recorded by launch `id`.
    ///
    /// A handle recorded by a later launch of the same server is left alone.
    ///
    /// # Errors
    ///
    /// Returns [`SupervisorStateError::HandlesPoisoned`] when the registry
    /// lock is poisoned.
    pub fn evict_launch(&self, id: LaunchId) -> SupervisorStateResult<Option<LaunchHandle>> {
        let mut handles = self
            .handles
            .write()
            .map_err(|err| SupervisorStateError::HandlesPoisoned(err.to_string()))?;
        Ok(handles
            .iter()
            .position(|existing| existing.id() == id)
            .and_then(|index| handles.remove(index)))
    }

    /// Returns a snapshot of every recorded handle, least recent first.
    ///
    /// # Errors
    ///
    /// Returns [`SupervisorStateError::HandlesPoisoned`] when the registry
    /// lock is poisoned.
    pub fn snapshot(&self) -> SupervisorStateResult<Vec<LaunchHandle>> {
        let handles = self
            .handles
            .read()
            .map_err(|err| SupervisorStateError::HandlesPoisoned(err.to_string()))?;
        Ok(handles.iter().cloned().collect())
    }
}

impl Default for LaunchHandleRegistry {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_HANDLE_CAPACITY)
    }
}
