//! Editor mode
//!
//! Placeholder for the tile and sprite editor. It only raises the editor
//! flag while it is on the stack.

use super::{Mode, ModeContext};
use crate::error::CoreError;

#[derive(Debug, Default)]
pub struct EditorMode;

impl EditorMode {
    pub const TYPE: u32 = 0x1b;
}

impl Mode for EditorMode {
    fn name(&self) -> &str {
        "editor"
    }

    fn enter(&mut self, ctx: &mut ModeContext<'_>) -> Result<(), CoreError> {
        ctx.flags.in_editor = true;
        Ok(())
    }

    fn leave(&mut self, ctx: &mut ModeContext<'_>) -> Result<(), CoreError> {
        ctx.flags.in_editor = false;
        Ok(())
    }
}
