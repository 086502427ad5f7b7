use thiserror::Error;

/// Rotation direction of the positioner motor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Right,
    Left,
}

impl Direction {
    /// Wire character for this direction.
    pub fn as_char(self) -> char {
        match self {
            Self::Right => 'R',
            Self::Left => 'L',
        }
    }
}

/// One motion request before wire encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotorCommand {
    pub direction: Direction,
    pub steps: u16,
}

impl MotorCommand {
    pub fn right(steps: u16) -> Self {
        Self {
            direction: Direction::Right,
            steps,
        }
    }

    pub fn left(steps: u16) -> Self {
        Self {
            direction: Direction::Left,
            steps,
        }
    }
}

/// One operator-entered power reading tied to an angular position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    pub angle_deg: u16,
    pub power_dbm: f64,
}

/// Link lifecycle as reported by the link actor, which is its only writer.
#[derive(Debug, Clone, PartialEq)]
pub enum LinkState {
    Disconnected,
    Searching,
    Connecting,
    Connected,
    Lost,
    Error(String),
}

impl LinkState {
    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected)
    }
}

/// Commands accepted by the link actor.
#[derive(Debug)]
pub enum LinkCommand {
    Connect,
    Disconnect,
    Send(MotorCommand),
    /// Reader task reporting its exit, tagged with the connection generation
    /// so a stale reader cannot tear down a newer socket.
    ReaderClosed {
        generation: u64,
        error: Option<String>,
    },
}

/// Events flowing from background tasks to the UI thread, the only place
/// application state is published for display.
#[derive(Debug, Clone)]
pub enum AppEvent {
    LinkState(LinkState),
    Notice(StatusMessage),
    FrameReceived(String),
}

#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub message: String,
    pub severity: MessageSeverity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageSeverity {
    Info,
    Success,
    Warning,
    Error,
}

/// Operator input that failed validation; state is left unchanged and the
/// offending field regains focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("step must be an integer between 0 and 999")]
    InvalidStep,
    #[error("enter a power value in dBm")]
    InvalidPower,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Connection,
    Control,
    Session,
}
