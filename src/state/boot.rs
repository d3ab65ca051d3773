//! Start-up splash

use super::{Mode, ModeContext};
use crate::error::CoreError;
use crate::video::{BankId, Point, SYSTEM_BANK};

pub const BOOT_LOGO: BankId = BankId::new(SYSTEM_BANK, 2);
pub const BOOT_BADGE: BankId = BankId::new(SYSTEM_BANK, 1);

/// Draws the two system splash images every frame.
#[derive(Debug, Default)]
pub struct BootMode;

impl BootMode {
    pub const TYPE: u32 = 0x1a;
}

impl Mode for BootMode {
    fn name(&self) -> &str {
        "boot"
    }

    fn update(&mut self, ctx: &mut ModeContext<'_>) -> Result<(), CoreError> {
        ctx.video.queue_image(BOOT_LOGO, Point::new(100, 135), None)?;
        ctx.video.queue_image(BOOT_BADGE, Point::new(400, 175), None)?;
        Ok(())
    }
}
