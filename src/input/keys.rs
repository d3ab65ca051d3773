//! Key, button and mouse identifiers
//!
//! Only the keys the runtime and its modes read are named here. Every
//! platform binding maps its own key codes onto these.

macro_rules! indexed_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident),* $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),*
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),*];
            pub const COUNT: usize = $name::ALL.len();

            #[inline]
            pub fn index(self) -> usize {
                self as usize
            }
        }
    };
}

indexed_enum! {
    Key {
        Escape, Return, Space, Backspace, Tab, F1,
        LeftCtrl, RightCtrl, LeftShift, RightShift,
        Up, Down, Left, Right,
        A, B, C, D, E, F, G, H, I, J, K, L, M,
        N, O, P, Q, R, S, T, U, V, W, X, Y, Z,
    }
}

indexed_enum! {
    /// Controller buttons in the standard game-controller layout. The index
    /// of each variant is its bit in the latch mask.
    JoystickButton {
        A, B, X, Y, Back, Guide, Start,
        LeftStick, RightStick, LeftShoulder, RightShoulder,
        DpadUp, DpadDown, DpadLeft, DpadRight,
    }
}

indexed_enum! {
    MouseButton { Left, Right }
}

impl JoystickButton {
    #[inline]
    pub fn bit(self) -> u16 {
        1 << self.index()
    }

    /// Keyboard stand-in used when no controller reports the button.
    pub fn fallback_key(self) -> Option<Key> {
        match self {
            JoystickButton::A => Some(Key::LeftCtrl),
            JoystickButton::B => Some(Key::RightCtrl),
            JoystickButton::X => Some(Key::X),
            JoystickButton::Y => Some(Key::Y),
            JoystickButton::Back => Some(Key::Backspace),
            JoystickButton::Guide => Some(Key::F1),
            JoystickButton::Start => Some(Key::Return),
            JoystickButton::LeftStick | JoystickButton::RightStick => None,
            JoystickButton::LeftShoulder => Some(Key::LeftShift),
            JoystickButton::RightShoulder => Some(Key::RightShift),
            JoystickButton::DpadUp => Some(Key::Up),
            JoystickButton::DpadDown => Some(Key::Down),
            JoystickButton::DpadLeft => Some(Key::Left),
            JoystickButton::DpadRight => Some(Key::Right),
        }
    }
}

// key latches live in a u64
const _: () = assert!(Key::COUNT <= 64);
const _: () = assert!(JoystickButton::COUNT <= 16);
