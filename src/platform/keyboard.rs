//! Keyboard listener lifecycle
//!
//! Playback listens to key presses while it is open and must stop on every
//! exit path. [`PlaySession`] registers with a [`KeyboardHost`] on open and
//! unregisters when closed or dropped. Each key press advances playback
//! inside the listener and the resulting events are handed to the host's
//! update callback, so nothing polls and nothing queues.

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use thiserror::Error;

use crate::sim::{PlayEvent, PlayFrame, Playback};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlatformError {
    #[error("keyboard listener could not be registered: {0}")]
    Listener(String),
}

/// Called by a host listener with the key name of every press
pub type KeyHandler = Box<dyn FnMut(&str)>;

/// Receives the events a key press produced and the frame after it
pub type UpdateCallback = Box<dyn FnMut(&[PlayEvent], &PlayFrame)>;

/// Something that can deliver key presses to a handler
pub trait KeyboardHost {
    /// Handle needed to unregister
    type Token;

    fn subscribe(&mut self, handler: KeyHandler) -> Result<Self::Token, PlatformError>;

    fn unsubscribe(&mut self, token: Self::Token);
}

/// Open playback with a registered keyboard listener
pub struct PlaySession<H: KeyboardHost> {
    host: H,
    token: Option<H::Token>,
    playback: Rc<RefCell<Playback>>,
}

impl<H: KeyboardHost> PlaySession<H> {
    /// Register the listener. `on_update` runs once per key press that
    /// produced events; unmapped keys and presses after the game ended are
    /// silent.
    pub fn open(mut host: H, playback: Playback, mut on_update: UpdateCallback) -> Result<Self, PlatformError> {
        let playback = Rc::new(RefCell::new(playback));
        let shared = Rc::clone(&playback);
        let handler: KeyHandler = Box::new(move |key: &str| {
            // Release the borrow before the callback so it may read the session
            let (events, frame) = {
                let mut playback = shared.borrow_mut();
                let events = playback.handle_key(key);
                if events.is_empty() {
                    return;
                }
                (events, playback.frame())
            };
            on_update(&events, &frame);
        });
        let token = host.subscribe(handler)?;
        log::debug!("Keyboard listener registered");
        Ok(Self {
            host,
            token: Some(token),
            playback,
        })
    }

    /// Restart from the snapshot; returns the events like a key press would
    pub fn reset(&mut self) -> Vec<PlayEvent> {
        self.playback.borrow_mut().reset()
    }

    pub fn frame(&self) -> PlayFrame {
        self.playback.borrow().frame()
    }

    pub fn playback(&self) -> Ref<'_, Playback> {
        self.playback.borrow()
    }

    pub fn is_listening(&self) -> bool {
        self.token.is_some()
    }

    /// Close explicitly; dropping does the same
    pub fn close(mut self) {
        self.unsubscribe();
    }

    fn unsubscribe(&mut self) {
        if let Some(token) = self.token.take() {
            self.host.unsubscribe(token);
            log::debug!("Keyboard listener removed");
        }
    }
}

impl<H: KeyboardHost> Drop for PlaySession<H> {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}
