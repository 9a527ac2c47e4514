//! Pick the storage backend.
//!
//! Priority: localStorage → Memory (fallback, e.g. private mode or no window)

use std::rc::Rc;
use aihub_core::ports::StoragePort;
use super::{LocalStorage, MemoryStorage};

/// Open the best available backend as a trait object.
pub fn detect_storage() -> Rc<dyn StoragePort> {
    match LocalStorage::open() {
        Ok(local) => {
            log::info!("Storage backend: localStorage");
            Rc::new(local)
        }
        Err(e) => {
            log::warn!("localStorage unavailable ({}), falling back to memory", e);
            Rc::new(MemoryStorage::new())
        }
    }
}
