//! Latest-only commit gate for interactive previews
//!
//! Every request takes a [`Ticket`] from the gate before work starts. A
//! result is stored only while its ticket is still the newest one issued, so
//! a slow render that finishes after a newer request is dropped.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};

use log::debug;

use crate::matrix::EcLevel;
use crate::scene::Scene;
use crate::style::StyleConfig;
use crate::{generate_with_config, RenderConfig, RenderError};

/// Generation number handed out by [`LatestOnly::begin`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

impl Ticket {
    pub fn generation(self) -> u64 {
        self.0
    }
}

/// Slot that keeps only the value of the most recent request
pub struct LatestOnly<T> {
    generation: AtomicU64,
    slot: Mutex<Option<(Ticket, T)>>,
}

impl<T> Default for LatestOnly<T> {
    fn default() -> Self {
        Self {
            generation: AtomicU64::new(0),
            slot: Mutex::new(None),
        }
    }
}

impl<T> LatestOnly<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new request, superseding every earlier ticket
    pub fn begin(&self) -> Ticket {
        Ticket(self.generation.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Whether `ticket` is still the newest issued
    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket.0
    }

    /// Store `value` if `ticket` is current. Stale values are dropped and
    /// `false` is returned.
    ///
    /// [`begin`](Self::begin) does not take the slot lock, so a commit that
    /// saw its ticket as current may land just after a newer `begin`. That
    /// value is then overwritten by the newer ticket's commit, and a committed
    /// value never replaces one from a newer ticket.
    pub fn commit(&self, ticket: Ticket, value: T) -> bool {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        if !self.is_current(ticket) {
            return false;
        }
        if matches!(&*slot, Some((stored, _)) if *stored > ticket) {
            return false;
        }
        *slot = Some((ticket, value));
        true
    }

    /// Remove and return the committed value
    pub fn take(&self) -> Option<T> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .map(|(_, value)| value)
    }

    /// Ticket of the committed value, if any
    pub fn committed(&self) -> Option<Ticket> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|(ticket, _)| *ticket)
    }
}

impl<T: Clone> LatestOnly<T> {
    /// Copy of the committed value
    pub fn latest(&self) -> Option<T> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|(_, value)| value.clone())
    }
}

/// Outcome of one preview request
pub type Preview = Result<Scene, RenderError>;

/// Renders previews on worker threads, keeping only the newest result
#[derive(Clone, Default)]
pub struct Previewer {
    gate: Arc<LatestOnly<Preview>>,
    config: RenderConfig,
}

impl Previewer {
    pub fn new(config: RenderConfig) -> Self {
        Self {
            gate: Arc::new(LatestOnly::new()),
            config,
        }
    }

    /// Encode and render `style` on a new thread.
    ///
    /// The handle yields whether the result was committed.
    pub fn request(&self, style: StyleConfig, level: EcLevel, draw_width: f64) -> JoinHandle<bool> {
        let ticket = self.gate.begin();
        let gate = Arc::clone(&self.gate);
        let config = self.config.clone();
        thread::spawn(move || {
            let preview = generate_with_config(&style, level, draw_width, &config);
            let committed = gate.commit(ticket, preview);
            if !committed {
                debug!("discarded stale preview #{}", ticket.generation());
            }
            committed
        })
    }

    /// Take the newest committed preview
    pub fn take(&self) -> Option<Preview> {
        self.gate.take()
    }

    pub fn gate(&self) -> &LatestOnly<Preview> {
        &self.gate
    }
}
