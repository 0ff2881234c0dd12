use serde::{Deserialize, Serialize};

/// Payload announcing a capture to the processing pipeline.
///
/// Field names are part of the wire contract with downstream consumers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingMessage {
    #[serde(rename = "id")]
    pub capture_id: i64,
    #[serde(rename = "id_user")]
    pub owner_id: i64,
    #[serde(rename = "email")]
    pub owner_email: String,
    #[serde(rename = "video")]
    pub location: String,
}

impl ProcessingMessage {
    pub fn new(
        capture_id: i64,
        owner_id: i64,
        owner_email: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            capture_id,
            owner_id,
            owner_email: owner_email.into(),
            location: location.into(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_field_names() {
        let message = ProcessingMessage::new(5, 1, "user@example.com", "abc.mp4");
        let value: serde_json::Value = serde_json::from_str(&message.to_json().unwrap()).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "id": 5,
                "id_user": 1,
                "email": "user@example.com",
                "video": "abc.mp4"
            })
        );
    }
}
