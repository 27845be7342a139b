use serde_json::{json, Value};

use crate::settings::SettingsForm;
use crate::types::{Axis, GameOverNotice, Snapshot};

#[derive(Clone, Debug, PartialEq)]
pub enum ParsedInputMessage {
    SetName { index: usize, value: String },
    SetVelocity { axis: Axis, value: String },
    Start,
    Ack,
    Abort,
}

pub fn parse_input_message(raw: &str) -> Option<ParsedInputMessage> {
    let value: Value = serde_json::from_str(raw).ok()?;
    let object = value.as_object()?;
    let message_type = object.get("type")?.as_str()?;

    match message_type {
        "set_name" => {
            let index = usize::try_from(object.get("index")?.as_u64()?).ok()?;
            let value = object.get("value")?.as_str()?.to_string();
            Some(ParsedInputMessage::SetName { index, value })
        }
        "set_velocity" => {
            let axis = Axis::parse(object.get("axis")?.as_str()?)?;
            let value = field_text(object.get("value")?)?;
            Some(ParsedInputMessage::SetVelocity { axis, value })
        }
        "start" => Some(ParsedInputMessage::Start),
        "ack" => Some(ParsedInputMessage::Ack),
        "abort" => Some(ParsedInputMessage::Abort),
        _ => None,
    }
}

fn field_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

pub fn setup_frame(form: &SettingsForm) -> Value {
    json!({
        "type": "setup",
        "form": form,
    })
}

pub fn state_frame(snapshot: &Snapshot) -> Value {
    json!({
        "type": "state",
        "snapshot": snapshot,
    })
}

pub fn game_over_frame(notice: &GameOverNotice) -> Value {
    json!({
        "type": "game_over",
        "message": notice.message(),
        "notice": notice,
    })
}

pub fn error_frame(message: &str) -> Value {
    json!({
        "type": "error",
        "message": message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{GameOverReason, GameSummary, PlayerView, Vec2};

    #[test]
    fn parse_set_name_message() {
        let parsed = parse_input_message(r#"{"type":"set_name","index":3,"value":"Dana"}"#);
        assert_eq!(
            parsed,
            Some(ParsedInputMessage::SetName {
                index: 3,
                value: "Dana".to_string(),
            })
        );
    }

    #[test]
    fn parse_set_name_rejects_negative_index() {
        assert!(parse_input_message(r#"{"type":"set_name","index":-1,"value":"x"}"#).is_none());
        assert!(parse_input_message(r#"{"type":"set_name","index":1.5,"value":"x"}"#).is_none());
    }

    #[test]
    fn parse_set_velocity_accepts_text_and_numbers() {
        assert_eq!(
            parse_input_message(r#"{"type":"set_velocity","axis":"x","value":"abc"}"#),
            Some(ParsedInputMessage::SetVelocity {
                axis: Axis::X,
                value: "abc".to_string(),
            })
        );
        assert_eq!(
            parse_input_message(r#"{"type":"set_velocity","axis":"y","value":-12}"#),
            Some(ParsedInputMessage::SetVelocity {
                axis: Axis::Y,
                value: "-12".to_string(),
            })
        );
    }

    #[test]
    fn parse_set_velocity_rejects_unknown_axis() {
        assert!(parse_input_message(r#"{"type":"set_velocity","axis":"z","value":"1"}"#).is_none());
    }

    #[test]
    fn parse_button_messages() {
        assert_eq!(
            parse_input_message(r#"{"type":"start"}"#),
            Some(ParsedInputMessage::Start)
        );
        assert_eq!(
            parse_input_message(r#"{"type":"ack"}"#),
            Some(ParsedInputMessage::Ack)
        );
        assert_eq!(
            parse_input_message(r#"{"type":"abort"}"#),
            Some(ParsedInputMessage::Abort)
        );
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(parse_input_message("not json").is_none());
        assert!(parse_input_message("[]").is_none());
        assert!(parse_input_message(r#"{"type":"jump"}"#).is_none());
    }

    #[test]
    fn game_over_frame_names_the_winner() {
        let notice = GameOverNotice {
            round_id: 4,
            summary: GameSummary {
                reason: GameOverReason::LastSurvivor,
                winner: Some(PlayerView {
                    name: "Eve".to_string(),
                    position: Vec2::new(1.0, 2.0),
                }),
                ticks: 12,
                captures: 1,
                final_velocity: Vec2::new(11.0, 11.0),
                eliminations: Vec::new(),
                finished_at_iso: "2026-01-01T00:00:00.000Z".to_string(),
            },
        };

        let frame = game_over_frame(&notice);
        assert_eq!(frame["type"], "game_over");
        assert_eq!(frame["message"], "Game Over! The winner is Eve");
        assert_eq!(frame["notice"]["roundId"], 4);
        assert_eq!(frame["notice"]["summary"]["reason"], "last_survivor");
        assert_eq!(frame["notice"]["summary"]["winner"]["name"], "Eve");
    }

    #[test]
    fn setup_frame_exposes_raw_velocity_text() {
        let frame = setup_frame(&SettingsForm::new());
        assert_eq!(frame["type"], "setup");
        assert_eq!(frame["form"]["velocityX"], "10");
        assert_eq!(frame["form"]["names"].as_array().map(Vec::len), Some(25));
    }
}
