//! Persistence of the cumulative squash count.
//!
//! The count lives under a single string key. Reads and writes are best-effort:
//! callers treat any `StorageError` as "no stored value" and carry on in memory.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("local storage is unavailable")]
    Unavailable,
    #[error("storage access failed: {0}")]
    Access(String),
}

/// Minimal string key/value store the tracker persists through.
pub trait SquashStore {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Parse a stored count the way `parseInt(raw, 10)` does: leading whitespace and a
/// sign are accepted, trailing garbage is ignored. Zero, negative and non-numeric
/// values yield `None`; overly large values saturate.
pub fn parse_total(raw: &str) -> Option<u32> {
    let s = raw.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits.bytes().take_while(u8::is_ascii_digit).count();
    if end == 0 {
        return None;
    }
    let digits = &digits[..end];
    if negative {
        // "-0" and every negative number are non-positive.
        return None;
    }
    let value = digits.parse::<u64>().unwrap_or(u64::MAX);
    if value == 0 { None } else { Some(value.min(u32::MAX as u64) as u32) }
}

/// In-memory store. Clones share the same map, which models several tabs of one
/// browser profile sharing `localStorage`.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    items: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_item(key: &str, value: &str) -> Self {
        let store = Self::new();
        store.items.borrow_mut().insert(key.to_string(), value.to_string());
        store
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }
}

impl SquashStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.get(key))
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// `window.localStorage`. Acquisition may fail (privacy modes, sandboxed iframes);
/// the handle then stays empty and every call reports `Unavailable`.
pub struct BrowserStorage {
    storage: Option<web_sys::Storage>,
}

impl BrowserStorage {
    pub fn acquire() -> Self {
        let storage = web_sys::window().and_then(|w| match w.local_storage() {
            Ok(s) => s,
            Err(e) => {
                log::warn!("localStorage access denied: {:?}", e);
                None
            }
        });
        Self { storage }
    }

    pub fn is_available(&self) -> bool {
        self.storage.is_some()
    }

    fn handle(&self) -> Result<&web_sys::Storage, StorageError> {
        self.storage.as_ref().ok_or(StorageError::Unavailable)
    }
}

impl SquashStore for BrowserStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.handle()?.get_item(key).map_err(|e| StorageError::Access(format!("{:?}", e)))
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.handle()?.set_item(key, value).map_err(|e| StorageError::Access(format!("{:?}", e)))
    }
}
