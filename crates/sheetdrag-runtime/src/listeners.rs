#![forbid(unsafe_code)]

//! Document-level listeners for mouse drags.
//!
//! A mouse drag keeps going after the cursor leaves the sheet, so the host
//! attaches `mousemove`/`mouseup` listeners to the document when a mouse
//! gesture starts. [`DragListeners`] owns that registration: it attaches at
//! most once per gesture and detaches synchronously on release or teardown,
//! so no handler outlives the gesture it was attached for.

/// Handle for one attached listener pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// Host capability for document-wide pointer listeners.
pub trait DocumentListeners {
    /// Attach move/up listeners routed back to the sheet.
    fn attach_drag_listeners(&mut self) -> ListenerId;
    /// Remove a previously attached pair.
    fn detach(&mut self, id: ListenerId);
}

/// Hosts that deliver every pointer event to the sheet already (touch only).
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDocumentListeners;

impl DocumentListeners for NoDocumentListeners {
    fn attach_drag_listeners(&mut self) -> ListenerId {
        ListenerId(0)
    }

    fn detach(&mut self, _id: ListenerId) {}
}

/// Owned registration over a [`DocumentListeners`] capability.
pub struct DragListeners {
    host: Box<dyn DocumentListeners>,
    attached: Option<ListenerId>,
}

impl std::fmt::Debug for DragListeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DragListeners")
            .field("attached", &self.attached)
            .finish()
    }
}

impl Default for DragListeners {
    fn default() -> Self {
        Self::new(NoDocumentListeners)
    }
}

impl DragListeners {
    #[must_use]
    pub fn new(host: impl DocumentListeners + 'static) -> Self {
        Self {
            host: Box::new(host),
            attached: None,
        }
    }

    /// Attach unless already attached.
    pub fn attach(&mut self) {
        if self.attached.is_none() {
            self.attached = Some(self.host.attach_drag_listeners());
        }
    }

    /// Detach if attached. Safe to call repeatedly.
    pub fn detach(&mut self) {
        if let Some(id) = self.attached.take() {
            self.host.detach(id);
        }
    }

    #[inline]
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.attached.is_some()
    }
}

impl Drop for DragListeners {
    fn drop(&mut self) {
        self.detach();
    }
}
