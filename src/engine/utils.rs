use chrono::{SecondsFormat, Utc};

use crate::types::Vec2;

pub(super) fn is_out_of_bounds(value: f64, board_size: f64) -> bool {
    !(value > 0.0 && value < board_size)
}

pub(super) fn within_capture_box(target: Vec2, chaser: Vec2, radius: f64) -> bool {
    (target.x - chaser.x).abs() < radius && (target.y - chaser.y).abs() < radius
}

pub(super) fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
