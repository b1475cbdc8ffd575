//! Wire types for the two backend endpoints.
//!
//! The backend speaks JSON over two POST routes: `/auth` collects identity
//! until it reports `authenticated: true`, and `/rag` answers database
//! questions for an authenticated user. `UserInfo` fields serialize as
//! explicit nulls while unset; the backend fills them in progressively.

use serde::{Deserialize, Serialize};

pub mod client;

/// Progressively-collected identity record. All fields start unset and may
/// be overwritten wholesale by any later auth response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub name: Option<String>,
    pub id: Option<String>,
    pub division: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AuthRequest {
    pub message: String,
    pub user_info: UserInfo,
    pub system_last_message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub user_info: UserInfo,
    pub system_last_message: String,
    pub authenticated: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct RagRequest {
    pub user_message: String,
    pub user_info: UserInfo,
}

/// The `/rag` response is backend-defined beyond `system_reply`; unknown
/// fields are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct RagResponse {
    pub system_reply: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn user_info_serializes_unset_fields_as_null() {
        let value = serde_json::to_value(UserInfo::default()).unwrap();
        assert_eq!(
            value,
            json!({"name": null, "id": null, "division": null})
        );
    }

    #[test]
    fn auth_request_matches_backend_shape() {
        let request = AuthRequest {
            message: "Alice, id 42".to_string(),
            user_info: UserInfo::default(),
            system_last_message: "Please write your name and id.".to_string(),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "message": "Alice, id 42",
                "user_info": {"name": null, "id": null, "division": null},
                "system_last_message": "Please write your name and id.",
            })
        );
    }

    #[test]
    fn auth_response_parses_partial_identity() {
        let response: AuthResponse = serde_json::from_value(json!({
            "user_info": {"name": "Alice", "id": "42", "division": null},
            "system_last_message": "What division?",
            "authenticated": false,
        }))
        .unwrap();
        assert_eq!(response.user_info.name.as_deref(), Some("Alice"));
        assert_eq!(response.user_info.id.as_deref(), Some("42"));
        assert_eq!(response.user_info.division, None);
        assert!(!response.authenticated);
    }

    #[test]
    fn rag_request_matches_backend_shape() {
        let request = RagRequest {
            user_message: "How many vacation days do I have?".to_string(),
            user_info: UserInfo {
                name: Some("Alice".to_string()),
                id: Some("42".to_string()),
                division: Some("Engineering".to_string()),
            },
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "user_message": "How many vacation days do I have?",
                "user_info": {"name": "Alice", "id": "42", "division": "Engineering"},
            })
        );
    }

    #[test]
    fn rag_response_ignores_extra_fields() {
        let response: RagResponse = serde_json::from_value(json!({
            "system_reply": "You have 12 vacation days left.",
            "sources": ["hr_db"],
        }))
        .unwrap();
        assert_eq!(response.system_reply, "You have 12 vacation days left.");
    }
}
