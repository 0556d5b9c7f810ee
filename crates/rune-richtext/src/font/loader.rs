use std::cell::RefCell;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::channel::oneshot;

use crate::font::{FontError, Result};

/// Starts loading a font family without blocking the caller.
pub trait FontLoader {
    fn load(&mut self, family: &str) -> PendingFont;
}

/// Handle to an in-flight font load.
///
/// Resolves exactly once, to `Ok(())` when the family became available
/// or to the error that stopped it. The provider polls it with
/// [`PendingFont::try_complete`]; async callers can simply `.await` it.
#[derive(Debug)]
pub struct PendingFont {
    family: String,
    rx: oneshot::Receiver<Result<()>>,
}

/// Completion side of a [`PendingFont`].
///
/// Completing after the pending handle was dropped is a no-op.
#[derive(Debug)]
pub struct FontLoadHandle {
    family: String,
    tx: oneshot::Sender<Result<()>>,
}

impl PendingFont {
    /// Create a pending load together with the handle that completes it.
    pub fn channel(family: impl Into<String>) -> (PendingFont, FontLoadHandle) {
        let family = family.into();
        let (tx, rx) = oneshot::channel();
        (
            PendingFont {
                family: family.clone(),
                rx,
            },
            FontLoadHandle { family, tx },
        )
    }

    /// A load that has already finished.
    pub fn ready(family: impl Into<String>, result: Result<()>) -> PendingFont {
        let (pending, handle) = Self::channel(family);
        handle.complete(result);
        pending
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    /// Non-blocking check for completion.
    ///
    /// Returns `None` while the load is still running. A completion handle
    /// dropped without reporting resolves to [`FontError::Canceled`].
    pub fn try_complete(&mut self) -> Option<Result<()>> {
        match self.rx.try_recv() {
            Ok(Some(result)) => Some(result),
            Ok(None) => None,
            Err(oneshot::Canceled) => Some(Err(FontError::Canceled {
                family: self.family.clone(),
            })),
        }
    }
}

impl Future for PendingFont {
    type Output = Result<()>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let family = self.family.clone();
        Pin::new(&mut self.rx).poll(cx).map(|received| {
            received.unwrap_or_else(|oneshot::Canceled| Err(FontError::Canceled { family }))
        })
    }
}

impl FontLoadHandle {
    pub fn family(&self) -> &str {
        &self.family
    }

    pub fn complete(self, result: Result<()>) {
        if self.tx.send(result).is_err() {
            tracing::debug!(family = %self.family, "font load finished after its requester went away");
        }
    }
}

/// Resolves every family successfully right away.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImmediateLoader;

impl FontLoader for ImmediateLoader {
    fn load(&mut self, family: &str) -> PendingFont {
        PendingFont::ready(family, Ok(()))
    }
}

/// Resolves families against the installed system fonts.
pub struct SystemFontLoader {
    db: Arc<fontdb::Database>,
}

impl SystemFontLoader {
    pub fn new(db: Arc<fontdb::Database>) -> Self {
        Self { db }
    }
}

impl FontLoader for SystemFontLoader {
    fn load(&mut self, family: &str) -> PendingFont {
        let result = if super::source::lookup_face(&self.db, family).is_some() {
            Ok(())
        } else {
            Err(FontError::NotFound {
                family: family.to_string(),
            })
        };
        PendingFont::ready(family, result)
    }
}

/// Loader whose requests are fulfilled later by the host.
///
/// Each request is parked in a shared [`LoadQueue`]; the host fetches the
/// font however it likes and reports back through the queue.
#[derive(Debug, Default, Clone)]
pub struct DeferredLoader {
    queue: LoadQueue,
}

/// Requests parked by a [`DeferredLoader`].
#[derive(Debug, Default, Clone)]
pub struct LoadQueue {
    handles: Rc<RefCell<Vec<FontLoadHandle>>>,
}

impl DeferredLoader {
    pub fn new() -> (Self, LoadQueue) {
        let queue = LoadQueue::default();
        (
            Self {
                queue: queue.clone(),
            },
            queue,
        )
    }
}

impl FontLoader for DeferredLoader {
    fn load(&mut self, family: &str) -> PendingFont {
        let (pending, handle) = PendingFont::channel(family);
        self.queue.handles.borrow_mut().push(handle);
        pending
    }
}

impl LoadQueue {
    /// Families waiting for the host, oldest first.
    pub fn pending_families(&self) -> Vec<String> {
        self.handles
            .borrow()
            .iter()
            .map(|h| h.family().to_string())
            .collect()
    }

    /// Report the outcome for `family`. Returns `false` if nothing was
    /// waiting on it.
    pub fn complete(&self, family: &str, result: Result<()>) -> bool {
        let handle = {
            let mut handles = self.handles.borrow_mut();
            let Some(index) = handles.iter().position(|h| h.family() == family) else {
                return false;
            };
            handles.remove(index)
        };
        handle.complete(result);
        true
    }
}
