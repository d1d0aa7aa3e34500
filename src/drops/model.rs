use crate::error::{DropsError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Authentication material for the remote service. Loaded once per run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Credentials {
    Anonymous,
    Basic { username: String, password: String },
    Token { jwt: String },
}

impl Credentials {
    pub fn kind(&self) -> &'static str {
        match self {
            Credentials::Anonymous => "anonymous",
            Credentials::Basic { .. } => "basic",
            Credentials::Token { .. } => "token",
        }
    }

    pub fn is_anonymous(&self) -> bool {
        matches!(self, Credentials::Anonymous)
    }

    pub fn require_authenticated(&self) -> Result<()> {
        if self.is_anonymous() {
            return Err(DropsError::MissingAuthentication);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DropType {
    File,
    Link,
    Note,
}

impl fmt::Display for DropType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DropType::File => "file",
            DropType::Link => "link",
            DropType::Note => "note",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Privacy {
    #[default]
    Public,
    Private,
}

impl Privacy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "public" => Some(Privacy::Public),
            "private" => Some(Privacy::Private),
            _ => None,
        }
    }
}

impl fmt::Display for Privacy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Privacy::Public => f.write_str("public"),
            Privacy::Private => f.write_str("private"),
        }
    }
}

/// Content kind of a note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteVariant {
    #[default]
    Plain,
    Code,
}

impl NoteVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoteVariant::Plain => "plain",
            NoteVariant::Code => "code",
        }
    }
}

/// Type-specific payload of a new drop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropContent {
    File {
        path: PathBuf,
        content_type: String,
    },
    Link {
        url: String,
    },
    Note {
        text: String,
        variant: NoteVariant,
        language: Option<String>,
    },
}

impl DropContent {
    pub fn drop_type(&self) -> DropType {
        match self {
            DropContent::File { .. } => DropType::File,
            DropContent::Link { .. } => DropType::Link,
            DropContent::Note { .. } => DropType::Note,
        }
    }

    /// The variant tag sent to the service: the MIME type for files,
    /// `plain`/`code` for notes, nothing for links.
    pub fn variant(&self) -> Option<&str> {
        match self {
            DropContent::File { content_type, .. } => Some(content_type),
            DropContent::Link { .. } => None,
            DropContent::Note { variant, .. } => Some(variant.as_str()),
        }
    }
}

/// What the user asked for. Immutable once built from parsed arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropIntent {
    pub content: DropContent,
    pub title: Option<String>,
    pub privacy: Privacy,
    pub password: Option<String>,
    pub board_id: Option<String>,
}

impl DropIntent {
    pub fn new(content: DropContent) -> Self {
        Self {
            content,
            title: None,
            privacy: Privacy::Public,
            password: None,
            board_id: None,
        }
    }

    pub fn drop_type(&self) -> DropType {
        self.content.drop_type()
    }

    pub fn wants_private(&self) -> bool {
        self.privacy == Privacy::Private
    }

    /// The creation payload. Drops are always created public.
    pub fn to_new_drop(&self) -> NewDrop {
        NewDrop {
            content: self.content.clone(),
            title: self.title.clone(),
            board_id: self.board_id.clone(),
        }
    }
}

/// Payload for `drops.create`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDrop {
    pub content: DropContent,
    pub title: Option<String>,
    pub board_id: Option<String>,
}

/// Partial fields for `drops.update`. Only set fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DropUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub privacy: Option<Privacy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl DropUpdate {
    pub fn is_empty(&self) -> bool {
        self.privacy.is_none() && self.password.is_none() && self.title.is_none()
    }
}

/// Whatever the service echoed back from an update. Any field may be missing,
/// and an empty body is a valid answer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatedDrop {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub privacy: Option<Privacy>,
    #[serde(default)]
    pub password_protected: Option<bool>,
}

/// The service's view of a drop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropResult {
    pub code: String,
    pub shortlink: String,
    #[serde(rename = "type")]
    pub drop_type: DropType,
    #[serde(default)]
    pub privacy: Privacy,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub board_id: Option<String>,
    #[serde(default)]
    pub password_protected: bool,
    #[serde(
        default,
        with = "chrono::serde::ts_milliseconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
}

/// A named collection of drops.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub drop_count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anonymous_requires_login() {
        assert!(matches!(
            Credentials::Anonymous.require_authenticated(),
            Err(DropsError::MissingAuthentication)
        ));
        let token = Credentials::Token {
            jwt: "abc".to_string(),
        };
        assert!(token.require_authenticated().is_ok());
    }

    #[test]
    fn test_credentials_serialize_with_kind_tag() {
        let creds = Credentials::Basic {
            username: "ada".to_string(),
            password: "secret".to_string(),
        };
        let json = serde_json::to_value(&creds).unwrap();
        assert_eq!(json["kind"], "basic");
        assert_eq!(json["username"], "ada");
    }

    #[test]
    fn test_privacy_parse() {
        assert_eq!(Privacy::parse("Private"), Some(Privacy::Private));
        assert_eq!(Privacy::parse(" public "), Some(Privacy::Public));
        assert_eq!(Privacy::parse("obscure"), None);
    }

    #[test]
    fn test_drop_result_from_service_json() {
        let json = r#"{
            "code": "aB3x",
            "shortlink": "https://d.pr/aB3x",
            "type": "NOTE",
            "privacy": "PRIVATE",
            "title": "todo",
            "variant": "code",
            "createdAt": 1700000000000
        }"#;
        let drop: DropResult = serde_json::from_str(json).unwrap();
        assert_eq!(drop.drop_type, DropType::Note);
        assert_eq!(drop.privacy, Privacy::Private);
        assert_eq!(drop.title.as_deref(), Some("todo"));
        assert!(drop.created_at.is_some());
        assert!(!drop.password_protected);
    }

    #[test]
    fn test_drop_result_defaults_to_public() {
        let json = r#"{"code": "x", "shortlink": "https://d.pr/x", "type": "LINK"}"#;
        let drop: DropResult = serde_json::from_str(json).unwrap();
        assert_eq!(drop.privacy, Privacy::Public);
        assert_eq!(drop.title, None);
    }

    #[test]
    fn test_update_skips_unset_fields() {
        let update = DropUpdate {
            privacy: Some(Privacy::Private),
            ..Default::default()
        };
        let json = serde_json::to_string(&update).unwrap();
        assert_eq!(json, r#"{"privacy":"PRIVATE"}"#);
        assert!(DropUpdate::default().is_empty());
    }

    #[test]
    fn test_new_drop_has_no_privacy() {
        let mut intent = DropIntent::new(DropContent::Link {
            url: "https://example.com".to_string(),
        });
        intent.privacy = Privacy::Private;
        intent.title = Some("Example".to_string());
        let payload = intent.to_new_drop();
        assert_eq!(payload.title.as_deref(), Some("Example"));
        assert_eq!(payload.content.drop_type(), DropType::Link);
    }
}
