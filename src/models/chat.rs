use chrono::{ DateTime, TimeZone, Utc };
use serde::{ Deserialize, Deserializer, Serialize };
use std::fmt;

pub type UserId = i64;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl User {
    /// A bare reference carrying only the id, as sent by the chat endpoint.
    pub fn reference(id: UserId) -> Self {
        Self { id, name: None, avatar: None }
    }
}

/// Message ids are strings when produced locally but the endpoint may echo numbers.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageId {
    Text(String),
    Number(i64),
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageId::Text(s) => write!(f, "{}", s),
            MessageId::Number(n) => write!(f, "{}", n),
        }
    }
}

impl From<&str> for MessageId {
    fn from(value: &str) -> Self {
        MessageId::Text(value.to_string())
    }
}

/// A message timestamp as it appears on the wire: integer milliseconds since
/// the Unix epoch, or an RFC 3339 string. The original form is kept so the
/// checkpoint goes back to the endpoint exactly as it arrived.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Timestamp {
    Millis(i64),
    Rfc3339(String),
}

impl Timestamp {
    pub fn now() -> Self {
        Timestamp::Millis(Utc::now().timestamp_millis())
    }

    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            Timestamp::Millis(ms) => Utc.timestamp_millis_opt(*ms).single(),
            Timestamp::Rfc3339(s) => {
                DateTime::parse_from_rfc3339(s)
                    .ok()
                    .map(|dt| dt.with_timezone(&Utc))
            }
        }
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Timestamp::Millis(0)
    }
}

impl From<i64> for Timestamp {
    fn from(ms: i64) -> Self {
        Timestamp::Millis(ms)
    }
}

impl From<&str> for Timestamp {
    fn from(value: &str) -> Self {
        Timestamp::Rfc3339(value.to_string())
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timestamp::Millis(ms) => write!(f, "{}", ms),
            Timestamp::Rfc3339(s) => write!(f, "{}", s),
        }
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error> where D: Deserializer<'de> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Millis(i64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Millis(ms) => Ok(Timestamp::Millis(ms)),
            Raw::Text(s) => {
                DateTime::parse_from_rfc3339(&s).map_err(|e|
                    serde::de::Error::custom(format!("invalid createdAt '{}': {}", s, e))
                )?;
                Ok(Timestamp::Rfc3339(s))
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(rename = "_id")]
    pub id: MessageId,
    #[serde(default)]
    pub text: String,
    #[serde(rename = "createdAt")]
    pub created_at: Timestamp,
    #[serde(default)]
    pub user: Option<User>,
}

impl Message {
    pub fn new(text: &str, user_id: Option<UserId>) -> Self {
        Self {
            id: MessageId::Text(uuid::Uuid::new_v4().to_string()),
            text: text.to_string(),
            created_at: Timestamp::now(),
            user: user_id.map(User::reference),
        }
    }

    pub fn sender_name(&self) -> &str {
        self.user
            .as_ref()
            .and_then(|u| u.name.as_deref())
            .unwrap_or("unknown")
    }
}

/// Checkpoint for incremental fetch: `createdAt` of the last message, or 0.
pub fn last_message_checkpoint(messages: &[Message]) -> Timestamp {
    messages
        .last()
        .map(|m| m.created_at.clone())
        .unwrap_or_default()
}
