use serde::{ Deserialize, Deserializer, Serialize };
use serde_json::Value as JsonValue;

use super::chat::{ Message, Timestamp, UserId };

/// Body of `POST /token`. Credentials are present only on the initial login.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct RegisterRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub token: String,
    #[serde(rename = "lastMessage")]
    pub last_message: Timestamp,
}

impl RegisterRequest {
    pub fn login(username: &str, password: &str, token: &str) -> Self {
        Self {
            username: Some(username.to_string()),
            password: Some(password.to_string()),
            token: token.to_string(),
            last_message: Timestamp::default(),
        }
    }

    pub fn refresh(token: &str, last_message: impl Into<Timestamp>) -> Self {
        Self {
            username: None,
            password: None,
            token: token.to_string(),
            last_message: last_message.into(),
        }
    }
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct RegisterResponse {
    #[serde(default, deserialize_with = "messages_or_empty")]
    pub messages: Vec<Message>,
    #[serde(rename = "userId", default)]
    pub user_id: Option<UserId>,
}

/// Body of `POST /push`.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct PushRequest {
    pub token: String,
    pub messages: Vec<Message>,
}

fn messages_or_empty<'de, D>(deserializer: D) -> Result<Vec<Message>, D::Error>
    where D: Deserializer<'de>
{
    match JsonValue::deserialize(deserializer)? {
        JsonValue::Array(items) => {
            items
                .into_iter()
                .map(|item| serde_json::from_value(item).map_err(serde::de::Error::custom))
                .collect()
        }
        _ => Ok(Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refresh_request_omits_credentials() {
        let value = serde_json::to_value(RegisterRequest::refresh("tok", 42)).unwrap();
        assert_eq!(value, serde_json::json!({ "token": "tok", "lastMessage": 42 }));
    }

    #[test]
    fn login_request_sends_zero_checkpoint() {
        let value = serde_json::to_value(RegisterRequest::login("al", "pw", "tok")).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "username": "al", "password": "pw", "token": "tok", "lastMessage": 0 })
        );
    }

    #[test]
    fn refresh_echoes_string_checkpoint_verbatim() {
        let value = serde_json::to_value(
            RegisterRequest::refresh("tok", "2019-05-01T10:00:00.000Z")
        ).unwrap();
        assert_eq!(value["lastMessage"], "2019-05-01T10:00:00.000Z");
    }

    #[test]
    fn reply_accepts_both_timestamp_forms() {
        let body =
            r#"{"messages": [
                {"_id": "a", "text": "x", "createdAt": 1556704800000, "user": {"_id": 1}},
                {"_id": "b", "text": "y", "createdAt": "2019-05-01T10:00:00.000Z", "user": {"_id": 2}}
            ], "userId": 1}"#;
        let r: RegisterResponse = serde_json::from_str(body).unwrap();
        assert_eq!(r.messages[0].created_at, Timestamp::Millis(1_556_704_800_000));
        assert_eq!(r.messages[1].created_at, Timestamp::from("2019-05-01T10:00:00.000Z"));
        assert_eq!(r.messages[0].created_at.to_datetime(), r.messages[1].created_at.to_datetime());
    }

    #[test]
    fn missing_or_non_array_messages_are_empty() {
        let r: RegisterResponse = serde_json::from_str(r#"{"userId": 2}"#).unwrap();
        assert!(r.messages.is_empty());
        assert_eq!(r.user_id, Some(2));

        let r: RegisterResponse = serde_json::from_str(r#"{"messages": "nope"}"#).unwrap();
        assert!(r.messages.is_empty());
        assert_eq!(r.user_id, None);
    }

    #[test]
    fn malformed_message_entry_is_an_error() {
        let r = serde_json::from_str::<RegisterResponse>(r#"{"messages": [{"text": "no id"}]}"#);
        assert!(r.is_err());
    }
}
