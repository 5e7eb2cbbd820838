//! Device-state snapshot queried by the `Input` bindings.
//!
//! The snapshot is only updated when events are polled; querying it before
//! the first poll of a frame returns whatever the previous poll left behind.

pub mod keys;

use std::collections::HashSet;

use winit::keyboard::KeyCode;

use crate::platform::PlatformEvent;

/// Maps a script button number (1 left, 2 middle, 3 right, 4 back,
/// 5 forward) to its bit in [`InputState::mouse_buttons`].
pub fn button_mask(button: i64) -> u32
{
        if !(1..=32).contains(&button)
        {
                return 0;
        }

        1 << (button - 1)
}

#[derive(Debug, Default, Clone)]
pub struct InputState
{
        keys_down: HashSet<KeyCode>,

        /// Bit `n - 1` is set while button `n` is held.
        mouse_buttons: u32,

        mouse_position: (i32, i32),
}

impl InputState
{
        pub fn new() -> Self
        {
                Self::default()
        }

        pub fn apply(
                &mut self,
                event: &PlatformEvent,
        )
        {
                match *event
                {
                        PlatformEvent::Key {
                                code,
                                pressed,
                        } =>
                        {
                                if pressed
                                {
                                        self.keys_down.insert(code);
                                }
                                else
                                {
                                        self.keys_down.remove(&code);
                                }
                        }
                        PlatformEvent::MouseButton {
                                button,
                                pressed,
                        } =>
                        {
                                let mask = button_mask(button as i64);

                                if pressed
                                {
                                        self.mouse_buttons |= mask;
                                }
                                else
                                {
                                        self.mouse_buttons &= !mask;
                                }
                        }
                        PlatformEvent::MouseMoved {
                                x,
                                y,
                        } => self.mouse_position = (x, y),
                        PlatformEvent::FocusLost =>
                        {
                                // Releases are not delivered to unfocused windows.
                                self.keys_down.clear();
                                self.mouse_buttons = 0;
                        }
                        _ =>
                        {}
                }
        }

        pub fn is_key_down(
                &self,
                code: KeyCode,
        ) -> bool
        {
                self.keys_down.contains(&code)
        }

        /// Looks the key up by name; unknown names are never down.
        pub fn is_key_name_down(
                &self,
                name: &str,
        ) -> bool
        {
                keys::key_from_name(name).is_some_and(|code| self.is_key_down(code))
        }

        pub fn is_mouse_button_down(
                &self,
                button: i64,
        ) -> bool
        {
                self.mouse_buttons & button_mask(button) != 0
        }

        pub fn mouse_position(&self) -> (i32, i32)
        {
                self.mouse_position
        }
}

#[cfg(test)]
mod tests
{
        use super::*;

        #[test]
        fn key_press_and_release_update_snapshot()
        {
                let mut input = InputState::new();

                input.apply(&PlatformEvent::Key {
                        code: KeyCode::Space,
                        pressed: true,
                });

                assert!(input.is_key_name_down("Space"));

                input.apply(&PlatformEvent::Key {
                        code: KeyCode::Space,
                        pressed: false,
                });

                assert!(!input.is_key_name_down("Space"));
        }

        #[test]
        fn mouse_buttons_are_tracked_independently()
        {
                let mut input = InputState::new();

                input.apply(&PlatformEvent::MouseButton {
                        button: 1,
                        pressed: true,
                });
                input.apply(&PlatformEvent::MouseButton {
                        button: 3,
                        pressed: true,
                });
                input.apply(&PlatformEvent::MouseButton {
                        button: 1,
                        pressed: false,
                });

                assert!(!input.is_mouse_button_down(1));
                assert!(input.is_mouse_button_down(3));
                assert!(!input.is_mouse_button_down(0));
                assert!(!input.is_mouse_button_down(99));
        }

        #[test]
        fn focus_loss_releases_everything()
        {
                let mut input = InputState::new();

                input.apply(&PlatformEvent::Key {
                        code: KeyCode::KeyW,
                        pressed: true,
                });
                input.apply(&PlatformEvent::MouseButton {
                        button: 2,
                        pressed: true,
                });
                input.apply(&PlatformEvent::FocusLost);

                assert!(!input.is_key_down(KeyCode::KeyW));
                assert!(!input.is_mouse_button_down(2));
        }

        #[test]
        fn mouse_motion_records_last_position()
        {
                let mut input = InputState::new();

                input.apply(&PlatformEvent::MouseMoved { x: 10, y: 20 });
                input.apply(&PlatformEvent::MouseMoved { x: 12, y: 7 });

                assert_eq!(input.mouse_position(), (12, 7));
        }
}
