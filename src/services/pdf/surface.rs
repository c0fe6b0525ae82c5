//! Headless render host and the offscreen containers attached to it.
//!
//! A container stays attached to its host for as long as it is alive and
//! detaches on drop, so every exit path of an export cleans up.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use super::document::Document;

#[derive(Debug, Clone, Default)]
pub struct RenderHost {
    attached: Arc<Mutex<Vec<u64>>>,
    next_id: Arc<AtomicU64>,
}

impl RenderHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mount `document` in a new container of fixed width and unconstrained height
    pub fn attach(&self, document: Document, width_px: u32) -> OffscreenContainer {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.lock().push(id);
        log::debug!("Attached offscreen container {} ({} px wide)", id, width_px);

        OffscreenContainer {
            id,
            width_px,
            document,
            host: self.clone(),
        }
    }

    /// Number of containers currently attached
    pub fn attached_count(&self) -> usize {
        self.lock().len()
    }

    fn detach(&self, id: u64) {
        self.lock().retain(|attached| *attached != id);
        log::debug!("Detached offscreen container {}", id);
    }

    fn lock(&self) -> MutexGuard<'_, Vec<u64>> {
        self.attached
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[derive(Debug)]
pub struct OffscreenContainer {
    id: u64,
    width_px: u32,
    document: Document,
    host: RenderHost,
}

impl OffscreenContainer {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn width_px(&self) -> u32 {
        self.width_px
    }

    pub fn document(&self) -> &Document {
        &self.document
    }
}

impl Drop for OffscreenContainer {
    fn drop(&mut self) {
        self.host.detach(self.id);
    }
}
