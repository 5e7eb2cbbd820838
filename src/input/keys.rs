//! Human readable key names accepted by `Input.IsKeyDown`.
//!
//! Names follow the conventional desktop naming ("A", "Return",
//! "Left Shift", "Keypad 5", ...) and are matched case-insensitively.

use winit::keyboard::KeyCode;

const LETTERS: [KeyCode; 26] = [
        KeyCode::KeyA,
        KeyCode::KeyB,
        KeyCode::KeyC,
        KeyCode::KeyD,
        KeyCode::KeyE,
        KeyCode::KeyF,
        KeyCode::KeyG,
        KeyCode::KeyH,
        KeyCode::KeyI,
        KeyCode::KeyJ,
        KeyCode::KeyK,
        KeyCode::KeyL,
        KeyCode::KeyM,
        KeyCode::KeyN,
        KeyCode::KeyO,
        KeyCode::KeyP,
        KeyCode::KeyQ,
        KeyCode::KeyR,
        KeyCode::KeyS,
        KeyCode::KeyT,
        KeyCode::KeyU,
        KeyCode::KeyV,
        KeyCode::KeyW,
        KeyCode::KeyX,
        KeyCode::KeyY,
        KeyCode::KeyZ,
];

const DIGITS: [KeyCode; 10] = [
        KeyCode::Digit0,
        KeyCode::Digit1,
        KeyCode::Digit2,
        KeyCode::Digit3,
        KeyCode::Digit4,
        KeyCode::Digit5,
        KeyCode::Digit6,
        KeyCode::Digit7,
        KeyCode::Digit8,
        KeyCode::Digit9,
];

const NAMED: &[(&str, KeyCode)] = &[
        ("Return", KeyCode::Enter),
        ("Escape", KeyCode::Escape),
        ("Backspace", KeyCode::Backspace),
        ("Tab", KeyCode::Tab),
        ("Space", KeyCode::Space),
        ("-", KeyCode::Minus),
        ("=", KeyCode::Equal),
        ("[", KeyCode::BracketLeft),
        ("]", KeyCode::BracketRight),
        ("\\", KeyCode::Backslash),
        (";", KeyCode::Semicolon),
        ("'", KeyCode::Quote),
        ("`", KeyCode::Backquote),
        (",", KeyCode::Comma),
        (".", KeyCode::Period),
        ("/", KeyCode::Slash),
        ("CapsLock", KeyCode::CapsLock),
        ("F1", KeyCode::F1),
        ("F2", KeyCode::F2),
        ("F3", KeyCode::F3),
        ("F4", KeyCode::F4),
        ("F5", KeyCode::F5),
        ("F6", KeyCode::F6),
        ("F7", KeyCode::F7),
        ("F8", KeyCode::F8),
        ("F9", KeyCode::F9),
        ("F10", KeyCode::F10),
        ("F11", KeyCode::F11),
        ("F12", KeyCode::F12),
        ("PrintScreen", KeyCode::PrintScreen),
        ("ScrollLock", KeyCode::ScrollLock),
        ("Pause", KeyCode::Pause),
        ("Insert", KeyCode::Insert),
        ("Home", KeyCode::Home),
        ("PageUp", KeyCode::PageUp),
        ("Delete", KeyCode::Delete),
        ("End", KeyCode::End),
        ("PageDown", KeyCode::PageDown),
        ("Right", KeyCode::ArrowRight),
        ("Left", KeyCode::ArrowLeft),
        ("Down", KeyCode::ArrowDown),
        ("Up", KeyCode::ArrowUp),
        ("Numlock", KeyCode::NumLock),
        ("Keypad /", KeyCode::NumpadDivide),
        ("Keypad *", KeyCode::NumpadMultiply),
        ("Keypad -", KeyCode::NumpadSubtract),
        ("Keypad +", KeyCode::NumpadAdd),
        ("Keypad Enter", KeyCode::NumpadEnter),
        ("Keypad 0", KeyCode::Numpad0),
        ("Keypad 1", KeyCode::Numpad1),
        ("Keypad 2", KeyCode::Numpad2),
        ("Keypad 3", KeyCode::Numpad3),
        ("Keypad 4", KeyCode::Numpad4),
        ("Keypad 5", KeyCode::Numpad5),
        ("Keypad 6", KeyCode::Numpad6),
        ("Keypad 7", KeyCode::Numpad7),
        ("Keypad 8", KeyCode::Numpad8),
        ("Keypad 9", KeyCode::Numpad9),
        ("Keypad .", KeyCode::NumpadDecimal),
        ("Left Ctrl", KeyCode::ControlLeft),
        ("Left Shift", KeyCode::ShiftLeft),
        ("Left Alt", KeyCode::AltLeft),
        ("Left GUI", KeyCode::SuperLeft),
        ("Right Ctrl", KeyCode::ControlRight),
        ("Right Shift", KeyCode::ShiftRight),
        ("Right Alt", KeyCode::AltRight),
        ("Right GUI", KeyCode::SuperRight),
        ("Menu", KeyCode::ContextMenu),
];

/// Resolves a key name to its physical key code.
pub fn key_from_name(name: &str) -> Option<KeyCode>
{
        let mut chars = name.chars();

        if let (Some(c), None) = (chars.next(), chars.next())
        {
                if c.is_ascii_alphabetic()
                {
                        let index = (c.to_ascii_uppercase() as u8 - b'A') as usize;
                        return Some(LETTERS[index]);
                }

                if c.is_ascii_digit()
                {
                        return Some(DIGITS[(c as u8 - b'0') as usize]);
                }
        }

        NAMED.iter()
                .find(|(n, _)| n.eq_ignore_ascii_case(name))
                .map(|(_, code)| *code)
}

/// Inverse of [`key_from_name`], used in log output.
pub fn key_name(code: KeyCode) -> Option<String>
{
        if let Some(i) = LETTERS.iter().position(|k| *k == code)
        {
                return Some(((b'A' + i as u8) as char).to_string());
        }

        if let Some(i) = DIGITS.iter().position(|k| *k == code)
        {
                return Some(((b'0' + i as u8) as char).to_string());
        }

        NAMED.iter()
                .find(|(_, k)| *k == code)
                .map(|(n, _)| n.to_string())
}

#[cfg(test)]
mod tests
{
        use super::*;

        #[test]
        fn letters_and_digits_resolve_in_any_case()
        {
                assert_eq!(key_from_name("a"), Some(KeyCode::KeyA));
                assert_eq!(key_from_name("Z"), Some(KeyCode::KeyZ));
                assert_eq!(key_from_name("7"), Some(KeyCode::Digit7));
        }

        #[test]
        fn named_keys_are_case_insensitive()
        {
                assert_eq!(key_from_name("space"), Some(KeyCode::Space));
                assert_eq!(key_from_name("LEFT SHIFT"), Some(KeyCode::ShiftLeft));
                assert_eq!(key_from_name("Keypad 5"), Some(KeyCode::Numpad5));
                assert_eq!(key_from_name("Up"), Some(KeyCode::ArrowUp));
        }

        #[test]
        fn unknown_names_do_not_resolve()
        {
                assert_eq!(key_from_name(""), None);
                assert_eq!(key_from_name("Hyper"), None);
        }

        #[test]
        fn names_round_trip_for_common_keys()
        {
                for name in ["Q", "4", "Return", "Right Alt", "F11"]
                {
                        let code = key_from_name(name).unwrap();

                        assert_eq!(key_name(code).as_deref(), Some(name));
                }
        }
}
