// Copyright (c) 2026 Oleksandr Melnychenko, Ukraine
// Ecliptix Security — Shade OPAQUE Relay (Responder)
// Licensed under the MIT License

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use shade_core::types::{OpaqueError, OpaqueResult};

use crate::state::{PasswordFile, PendingRegistration};

/// Storage abstraction for the relay's two per-account mappings.
///
/// Implementations must make every method atomic with respect to the others:
/// [`store_file`](FileStore::store_file) is a check-and-insert (a concurrent
/// finalize race must admit exactly one winner) and
/// [`take_pending`](FileStore::take_pending) is a remove-and-return. A write
/// that returns must be visible to every later lookup. Password files need
/// crash-consistent durability in a durable implementation; pending
/// registrations do not.
pub trait FileStore {
    /// Inserts or replaces the pending registration for an account.
    fn store_pending(&self, account_id: &str, pending: PendingRegistration);

    /// Removes and returns the pending registration for an account.
    fn take_pending(&self, account_id: &str) -> Option<PendingRegistration>;

    /// Lists accounts with a pending registration, for caller-driven
    /// garbage collection.
    fn pending_account_ids(&self) -> Vec<String>;

    /// Removes the pending registration for an account, reporting whether
    /// one existed.
    fn remove_pending(&self, account_id: &str) -> bool;

    /// Atomically stores the password file for an account if none exists.
    ///
    /// # Errors
    ///
    /// Returns [`OpaqueError::DuplicateRegistration`] if the account already
    /// has a file.
    fn store_file(&self, account_id: &str, file: PasswordFile) -> OpaqueResult<()>;

    /// Returns the password file for an account, if registered.
    fn lookup_file(&self, account_id: &str) -> Option<PasswordFile>;

    /// Reports whether an account has a password file.
    fn contains_file(&self, account_id: &str) -> bool;

    /// Removes the password file for an account, reporting whether one
    /// existed.
    fn remove_file(&self, account_id: &str) -> bool;
}

/// In-memory store backing both mappings with mutex-guarded hash maps.
pub struct MemoryStore {
    password_files: Mutex<HashMap<String, PasswordFile>>,
    pending_registrations: Mutex<HashMap<String, PendingRegistration>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            password_files: Mutex::new(HashMap::new()),
            pending_registrations: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

// A poisoned lock only means another thread panicked mid-operation; the maps
// themselves stay structurally sound, so the guard is recovered rather than
// propagating the panic.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl FileStore for MemoryStore {
    fn store_pending(&self, account_id: &str, pending: PendingRegistration) {
        lock(&self.pending_registrations).insert(account_id.to_string(), pending);
    }

    fn take_pending(&self, account_id: &str) -> Option<PendingRegistration> {
        lock(&self.pending_registrations).remove(account_id)
    }

    fn pending_account_ids(&self) -> Vec<String> {
        lock(&self.pending_registrations).keys().cloned().collect()
    }

    fn remove_pending(&self, account_id: &str) -> bool {
        lock(&self.pending_registrations).remove(account_id).is_some()
    }

    fn store_file(&self, account_id: &str, file: PasswordFile) -> OpaqueResult<()> {
        let mut files = lock(&self.password_files);
        if files.contains_key(account_id) {
            return Err(OpaqueError::DuplicateRegistration);
        }
        files.insert(account_id.to_string(), file);
        Ok(())
    }

    fn lookup_file(&self, account_id: &str) -> Option<PasswordFile> {
        lock(&self.password_files).get(account_id).cloned()
    }

    fn contains_file(&self, account_id: &str) -> bool {
        lock(&self.password_files).contains_key(account_id)
    }

    fn remove_file(&self, account_id: &str) -> bool {
        lock(&self.password_files).remove(account_id).is_some()
    }
}
