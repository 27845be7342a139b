use std::error::Error;
use std::fmt;

use crate::types::Axis;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormError {
    SlotOutOfRange { index: usize, slots: usize },
    InvalidVelocity { axis: Axis, raw: String },
}

impl fmt::Display for FormError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SlotOutOfRange { index, slots } => {
                write!(f, "player slot {index} is out of range (0..{slots})")
            }
            Self::InvalidVelocity { axis, raw } => {
                write!(f, "velocity {} is not a number: {raw:?}", axis.as_str())
            }
        }
    }
}

impl Error for FormError {}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OrchestratorError {
    RoundRunning { round_id: u64 },
    NoticePending { round_id: u64 },
    Form(FormError),
}

impl fmt::Display for OrchestratorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RoundRunning { round_id } => write!(f, "round {round_id} is already running"),
            Self::NoticePending { round_id } => {
                write!(f, "round {round_id} result has not been acknowledged")
            }
            Self::Form(error) => write!(f, "invalid settings: {error}"),
        }
    }
}

impl Error for OrchestratorError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Form(error) => Some(error),
            _ => None,
        }
    }
}

impl From<FormError> for OrchestratorError {
    fn from(error: FormError) -> Self {
        Self::Form(error)
    }
}
