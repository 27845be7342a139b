use serde::Serialize;

use crate::constants::{DEFAULT_VELOCITY, MAX_PLAYERS};
use crate::error::FormError;
use crate::input_utils::parse_velocity_component;
use crate::types::{Axis, Velocity};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StartRequest {
    pub names: Vec<String>,
    pub velocity: Velocity,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SettingsForm {
    names: Vec<String>,
    #[serde(rename = "velocityX")]
    velocity_x: String,
    #[serde(rename = "velocityY")]
    velocity_y: String,
}

impl Default for SettingsForm {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsForm {
    pub fn new() -> Self {
        Self::with_slots(MAX_PLAYERS)
    }

    pub fn with_slots(slots: usize) -> Self {
        Self {
            names: vec![String::new(); slots],
            velocity_x: format_component(DEFAULT_VELOCITY.x),
            velocity_y: format_component(DEFAULT_VELOCITY.y),
        }
    }

    pub fn slots(&self) -> usize {
        self.names.len()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn set_name(&mut self, index: usize, value: impl Into<String>) -> Result<(), FormError> {
        let slots = self.names.len();
        let slot = self
            .names
            .get_mut(index)
            .ok_or(FormError::SlotOutOfRange { index, slots })?;
        *slot = value.into();
        Ok(())
    }

    pub fn set_velocity(&mut self, axis: Axis, raw: impl Into<String>) {
        match axis {
            Axis::X => self.velocity_x = raw.into(),
            Axis::Y => self.velocity_y = raw.into(),
        }
    }

    pub fn velocity_text(&self, axis: Axis) -> &str {
        match axis {
            Axis::X => &self.velocity_x,
            Axis::Y => &self.velocity_y,
        }
    }

    pub fn velocity(&self) -> Result<Velocity, FormError> {
        Ok(Velocity {
            x: parse_velocity_component(Axis::X, &self.velocity_x)?,
            y: parse_velocity_component(Axis::Y, &self.velocity_y)?,
        })
    }

    pub fn submit(&self) -> Result<StartRequest, FormError> {
        Ok(StartRequest {
            names: self.names.clone(),
            velocity: self.velocity()?,
        })
    }
}

fn format_component(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}
