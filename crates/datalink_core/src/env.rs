//! Process-global environment mutation helpers used by config tests.

use std::sync::{Mutex, OnceLock};

/// Return the lock that serializes environment mutation across test threads.
pub fn env_lock() -> &'static Mutex<()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(()))
}

#[allow(unused_unsafe)]
fn set_env_var(key: &str, value: &str) {
    // SAFETY: callers hold `env_lock` while mutating.
    unsafe {
        std::env::set_var(key, value);
    }
}

#[allow(unused_unsafe)]
fn remove_env_var(key: &str) {
    // SAFETY: callers hold `env_lock` while mutating.
    unsafe {
        std::env::remove_var(key);
    }
}

/// Sets or removes a variable and restores the prior value on drop.
pub struct EnvGuard {
    key: String,
    previous: Option<String>,
}

impl EnvGuard {
    /// Set `key=value` for the lifetime of the guard.
    pub fn set(key: &str, value: &str) -> Self {
        let previous = std::env::var(key).ok();
        set_env_var(key, value);
        Self {
            key: key.to_string(),
            previous,
        }
    }

    /// Remove `key` for the lifetime of the guard.
    pub fn remove(key: &str) -> Self {
        let previous = std::env::var(key).ok();
        remove_env_var(key);
        Self {
            key: key.to_string(),
            previous,
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match self.previous.as_deref() {
            Some(previous) => set_env_var(&self.key, previous),
            None => remove_env_var(&self.key),
        }
    }
}
