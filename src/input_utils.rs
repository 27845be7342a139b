use crate::constants::default_player_name;
use crate::error::FormError;
use crate::types::Axis;

pub fn default_name(name: &str, index: usize) -> String {
    if name.trim().is_empty() {
        return default_player_name(index);
    }
    name.to_string()
}

pub fn parse_velocity_component(axis: Axis, raw: &str) -> Result<f64, FormError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| FormError::InvalidVelocity {
            axis,
            raw: raw.to_string(),
        })
}

pub fn normalize_tick_ms(value: Option<u64>, fallback: u64) -> u64 {
    value.unwrap_or(fallback).clamp(10, 60_000)
}
