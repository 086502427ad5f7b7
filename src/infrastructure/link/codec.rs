//! Wire encoding for positioner motion commands.
//!
//! A command is a fixed 5-byte ASCII frame: `&`, the direction character
//! (`R` or `L`) and the step magnitude zero-padded to three digits, e.g.
//! `&R015`. The codec appends no terminator; the peer firmware parses
//! fixed-length frames.

use crate::domain::models::MotorCommand;

/// Largest magnitude the three-digit wire field can carry.
const MAX_WIRE_STEPS: u16 = 999;

/// Encode a motion command, silently clamping the magnitude into the
/// hardware's field.
pub fn encode(command: &MotorCommand) -> String {
    let steps = command.steps.min(MAX_WIRE_STEPS);
    format!("&{}{:03}", command.direction.as_char(), steps)
}
