//! The notification payload delivered to devices.

use serde::Serialize;

/// Data payload serialized into each push message. The service worker on
/// the client renders it as a notification.
#[derive(Debug, Clone, Serialize)]
pub struct CheckInPayload {
    pub title: String,
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
}

impl CheckInPayload {
    /// Check-in prompt for a group ping.
    pub fn for_group(group_name: &str) -> Self {
        Self {
            title: "Time to check in".to_string(),
            body: format!("How is everyone in {group_name} doing right now?"),
            url: Some("/checkin".to_string()),
            icon: Some("/icons/icon-192.png".to_string()),
            badge: None,
        }
    }

    /// Check-in prompt for a user outside any group.
    pub fn for_solo_user() -> Self {
        Self {
            title: "Time to check in".to_string(),
            body: "Take a moment to check in with yourself.".to_string(),
            url: Some("/checkin".to_string()),
            icon: Some("/icons/icon-192.png".to_string()),
            badge: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_fields_are_omitted_from_json() {
        let payload = CheckInPayload {
            title: "t".into(),
            body: "b".into(),
            url: None,
            icon: None,
            badge: None,
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json, serde_json::json!({ "title": "t", "body": "b" }));
    }

    #[test]
    fn group_payload_names_the_group() {
        let payload = CheckInPayload::for_group("Morning Crew");
        assert!(payload.body.contains("Morning Crew"));
        assert_eq!(payload.url.as_deref(), Some("/checkin"));
    }
}
