//! Native controller support through gilrs
//!
//! The first connected controller wins. Button levels are refreshed by
//! draining the gilrs event queue in `poll`.

use gilrs::{Button as GilrsButton, Gilrs};
use log::{info, warn};

use super::{ButtonSource, JoystickButton};
use crate::error::CoreError;

pub struct Gamepad {
    gilrs: Gilrs,
}

impl Gamepad {
    pub fn new() -> Result<Self, CoreError> {
        let gilrs = Gilrs::new().map_err(|e| CoreError::InitializationFailure {
            subsystem: "gamepad",
            reason: e.to_string(),
        })?;

        match gilrs.gamepads().next() {
            Some((_, gp)) => info!("controller opened: {}", gp.name()),
            None => info!("no controller connected, using keyboard fallback"),
        }
        Ok(Self { gilrs })
    }

    pub fn poll(&mut self) {
        while let Some(event) = self.gilrs.next_event() {
            if let gilrs::EventType::Disconnected = event.event {
                warn!("controller disconnected");
            }
        }
    }

    fn active(&self) -> Option<gilrs::Gamepad<'_>> {
        self.gilrs.gamepads().next().map(|(_, gp)| gp)
    }
}

fn gilrs_button(button: JoystickButton) -> GilrsButton {
    match button {
        JoystickButton::A => GilrsButton::South,
        JoystickButton::B => GilrsButton::East,
        JoystickButton::X => GilrsButton::West,
        JoystickButton::Y => GilrsButton::North,
        JoystickButton::Back => GilrsButton::Select,
        JoystickButton::Guide => GilrsButton::Mode,
        JoystickButton::Start => GilrsButton::Start,
        JoystickButton::LeftStick => GilrsButton::LeftThumb,
        JoystickButton::RightStick => GilrsButton::RightThumb,
        JoystickButton::LeftShoulder => GilrsButton::LeftTrigger,
        JoystickButton::RightShoulder => GilrsButton::RightTrigger,
        JoystickButton::DpadUp => GilrsButton::DPadUp,
        JoystickButton::DpadDown => GilrsButton::DPadDown,
        JoystickButton::DpadLeft => GilrsButton::DPadLeft,
        JoystickButton::DpadRight => GilrsButton::DPadRight,
    }
}

impl ButtonSource for Gamepad {
    fn button_down(&self, button: JoystickButton) -> bool {
        self.active().is_some_and(|gp| gp.is_pressed(gilrs_button(button)))
    }

    fn connected(&self) -> bool {
        self.active().is_some()
    }
}
