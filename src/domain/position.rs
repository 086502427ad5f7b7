use crate::domain::measurements::MeasurementStore;
use crate::domain::models::{Direction, MotorCommand, ValidationError};

/// Upper angular limit of the positioner; the motor never wraps past it.
pub const MAX_POSITION_DEG: u16 = 360;

/// Largest step the hardware's three-digit wire field can carry.
pub const MAX_STEP: u16 = 999;

const DEFAULT_STEP: u16 = 1;

/// Authoritative model of the motor angle, step size and slider tracking.
///
/// Every mutation clips the position into `[0, 360]`; reaching a boundary is
/// a quiet no-op, never an error. Methods return the motion command the move
/// implies (if any) so the caller can hand it to the link layer.
#[derive(Debug)]
pub struct PositionController {
    position: u16,
    step: u16,
    last_slider_value: u16,
}

/// Outcome of a successful power registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Registration {
    /// Angle the reading was stored at.
    pub angle_deg: u16,
    /// Step command to transmit, absent when the 360° ceiling was reached.
    pub command: Option<MotorCommand>,
    pub limit_reached: bool,
}

impl Default for PositionController {
    fn default() -> Self {
        Self {
            position: 0,
            step: DEFAULT_STEP,
            last_slider_value: 0,
        }
    }
}

impl PositionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self) -> u16 {
        self.position
    }

    pub fn step(&self) -> u16 {
        self.step
    }

    /// Move one configured step in `direction`.
    ///
    /// Returns the command to transmit, or `None` when the boundary was
    /// already reached and nothing changed.
    pub fn step_by(&mut self, direction: Direction) -> Option<MotorCommand> {
        let candidate = match direction {
            Direction::Right => (self.position + self.step).min(MAX_POSITION_DEG),
            Direction::Left => self.position.saturating_sub(self.step),
        };
        if candidate == self.position {
            return None;
        }
        self.position = candidate;
        self.last_slider_value = candidate;
        Some(MotorCommand {
            direction,
            steps: self.step,
        })
    }

    /// Accepts only integers in `[0, 999]`; anything else leaves the step
    /// unchanged.
    pub fn set_step(&mut self, input: &str) -> Result<(), ValidationError> {
        let value: u16 = input
            .trim()
            .parse()
            .map_err(|_| ValidationError::InvalidStep)?;
        if value > MAX_STEP {
            return Err(ValidationError::InvalidStep);
        }
        self.step = value;
        Ok(())
    }

    /// Track the slider while it is being dragged; no command is sent until
    /// release.
    pub fn slider_moved(&mut self, value: u16) {
        self.position = value.min(MAX_POSITION_DEG);
    }

    /// Turn the accumulated slider delta into one command.
    pub fn slider_released(&mut self) -> Option<MotorCommand> {
        let current = self.position;
        let last = self.last_slider_value;
        if current == last {
            return None;
        }
        let command = if current > last {
            MotorCommand::right(current - last)
        } else {
            MotorCommand::left(last - current)
        };
        self.last_slider_value = current;
        Some(command)
    }

    /// Parse the operator's power reading, advance one step to the right and
    /// store the reading at the new angle.
    ///
    /// At the 360° ceiling no command is sent; the reading still overwrites
    /// the entry at 360° and `limit_reached` is set so the operator can be
    /// told.
    pub fn register_measurement(
        &mut self,
        power_input: &str,
        store: &mut MeasurementStore,
    ) -> Result<Registration, ValidationError> {
        let power: f64 = power_input
            .trim()
            .parse()
            .map_err(|_| ValidationError::InvalidPower)?;

        if self.position >= MAX_POSITION_DEG {
            store.upsert(self.position, power);
            return Ok(Registration {
                angle_deg: self.position,
                command: None,
                limit_reached: true,
            });
        }

        let command = MotorCommand::right(self.step);
        self.position = (self.position + self.step).min(MAX_POSITION_DEG);
        store.upsert(self.position, power);
        self.last_slider_value = self.position;
        Ok(Registration {
            angle_deg: self.position,
            command: Some(command),
            limit_reached: false,
        })
    }

    /// Start a new diagram: clear collected data, reset to the defaults and
    /// return the single re-homing command (only when the motor is away from
    /// zero).
    pub fn reset_session(&mut self, store: &mut MeasurementStore) -> Option<MotorCommand> {
        let steps_to_zero = self.position;
        store.clear();
        self.position = 0;
        self.step = DEFAULT_STEP;
        self.last_slider_value = 0;
        (steps_to_zero > 0).then(|| MotorCommand::left(steps_to_zero))
    }
}
