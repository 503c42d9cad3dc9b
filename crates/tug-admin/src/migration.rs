//! Migration execution
//!
//! A migration is an opaque, all-or-nothing step run strictly before the
//! pointer swap during accept. The registry owns the ordering and the
//! rollback decision; the executor owns the effect.

use std::sync::Arc;

use tug_identity::Address;

use crate::types::MigrationData;

/// Why a migration step did not complete
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MigrationError {
    /// The executor refused the payload before doing anything
    #[error("migration rejected: {0}")]
    Rejected(String),

    /// The migration started and failed; the executor rolled back
    #[error("migration failed: {0}")]
    Failed(String),
}

/// Applies migration payloads during accept
///
/// An implementation must be all-or-nothing: on `Err` the target state
/// must be as if `execute` was never called, because the registry will
/// keep the request pending for a retry.
pub trait MigrationExecutor: Send + Sync {
    /// Run the migration for `proxy`
    ///
    /// # Errors
    /// Returns the executor's failure; the registry maps it to
    /// [`AdminError::MigrationFailed`](crate::error::AdminError::MigrationFailed).
    fn execute(&self, proxy: Address, data: &MigrationData) -> Result<(), MigrationError>;
}

impl<T: MigrationExecutor + ?Sized> MigrationExecutor for &T {
    fn execute(&self, proxy: Address, data: &MigrationData) -> Result<(), MigrationError> {
        (**self).execute(proxy, data)
    }
}

impl<T: MigrationExecutor + ?Sized> MigrationExecutor for Arc<T> {
    fn execute(&self, proxy: Address, data: &MigrationData) -> Result<(), MigrationError> {
        (**self).execute(proxy, data)
    }
}

/// Executor that accepts every payload and performs no effects
///
/// The right choice when upgrades never carry migrations, and a useful
/// baseline in tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopExecutor;

impl MigrationExecutor for NoopExecutor {
    fn execute(&self, _proxy: Address, _data: &MigrationData) -> Result<(), MigrationError> {
        Ok(())
    }
}
