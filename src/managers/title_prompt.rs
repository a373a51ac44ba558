//! Title prompt shown when saving from the popup.
//!
//! The prompt can be resolved by Enter, Escape or losing focus, and the
//! popup may report more than one of those for the same prompt. Only the
//! first resolution takes effect; later ones find the prompt already taken.

use std::sync::Mutex;

/// A page waiting for the user to confirm its title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTitle {
    pub url: String,
    pub default_title: String,
}

/// A confirmed save produced by [`TitlePrompt::submit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmedTitle {
    pub url: String,
    pub title: String,
    pub original_title: String,
}

#[derive(Debug, Default)]
pub struct TitlePrompt {
    pending: Mutex<Option<PendingTitle>>,
}

impl TitlePrompt {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a prompt for `url`, replacing any prompt still open.
    pub fn open(&self, url: &str, default_title: &str) -> PendingTitle {
        let pending = PendingTitle {
            url: url.to_string(),
            default_title: default_title.to_string(),
        };
        if let Ok(mut slot) = self.pending.lock() {
            *slot = Some(pending.clone());
        }
        pending
    }

    pub fn is_open(&self) -> bool {
        self.pending.lock().map(|slot| slot.is_some()).unwrap_or(false)
    }

    /// Resolves the prompt with the user's input.
    ///
    /// Blank input keeps the default title. Returns `None` when the prompt was
    /// already resolved.
    pub fn submit(&self, input: &str) -> Option<ConfirmedTitle> {
        let pending = self.take()?;
        let trimmed = input.trim();
        let title = if trimmed.is_empty() {
            pending.default_title.clone()
        } else {
            trimmed.to_string()
        };
        Some(ConfirmedTitle {
            url: pending.url,
            title,
            original_title: pending.default_title,
        })
    }

    /// Dismisses the prompt. Returns `false` when it was already resolved.
    pub fn cancel(&self) -> bool {
        self.take().is_some()
    }

    fn take(&self) -> Option<PendingTitle> {
        self.pending.lock().ok().and_then(|mut slot| slot.take())
    }
}
