//! Browser keyboard host

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::KeyboardEvent;

use super::keyboard::{KeyHandler, KeyboardHost, PlatformError};

/// `keydown` listener on the window
pub struct WindowKeyboard {
    window: web_sys::Window,
}

impl WindowKeyboard {
    pub fn new() -> Result<Self, PlatformError> {
        let window = web_sys::window().ok_or_else(|| PlatformError::Listener("no window".into()))?;
        Ok(Self { window })
    }
}

impl KeyboardHost for WindowKeyboard {
    type Token = Closure<dyn FnMut(KeyboardEvent)>;

    fn subscribe(&mut self, mut handler: KeyHandler) -> Result<Self::Token, PlatformError> {
        let closure = Closure::<dyn FnMut(KeyboardEvent)>::new(move |event: KeyboardEvent| {
            handler(&event.key());
        });
        self.window
            .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())
            .map_err(|e| PlatformError::Listener(format!("{:?}", e)))?;
        Ok(closure)
    }

    fn unsubscribe(&mut self, token: Self::Token) {
        if let Err(e) = self
            .window
            .remove_event_listener_with_callback("keydown", token.as_ref().unchecked_ref())
        {
            log::warn!("Failed to remove keydown listener: {:?}", e);
        }
    }
}
