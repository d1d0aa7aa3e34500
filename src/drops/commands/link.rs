use crate::commands::helpers::{build_intent, create_drop};
use crate::commands::{CmdResult, CreateOptions};
use crate::error::{DropsError, Result};
use crate::model::DropContent;
use crate::service::DropService;
use url::Url;

const ALLOWED_SCHEMES: &[&str] = &["http", "https"];

/// Accepts absolute http(s) URLs only. Other schemes are rejected even when
/// they are syntactically valid.
pub fn validate_url(input: &str) -> Result<Url> {
    let invalid = || DropsError::InvalidUrl(input.to_string());
    let url = Url::parse(input.trim()).map_err(|_| invalid())?;
    if !ALLOWED_SCHEMES.contains(&url.scheme()) || url.host_str().is_none() {
        return Err(invalid());
    }
    Ok(url)
}

pub fn run<S: DropService>(service: &mut S, input: &str, options: CreateOptions) -> Result<CmdResult> {
    let url = validate_url(input)?;
    let content = DropContent::Link {
        url: url.to_string(),
    };
    let intent = build_intent(service, content, &options)?;
    create_drop(service, &intent, "Shorten link")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DropType, Privacy};
    use crate::service::memory::InMemoryService;

    #[test]
    fn test_not_a_url_is_rejected() {
        let mut service = InMemoryService::new();
        let err = run(&mut service, "not-a-url", CreateOptions::default()).unwrap_err();
        assert!(matches!(&err, DropsError::InvalidUrl(input) if input == "not-a-url"));
        assert!(err.to_string().contains("not-a-url"));
        assert!(service.created.is_empty());
    }

    #[test]
    fn test_scheme_allow_list() {
        assert!(validate_url("https://example.com/a?b=c").is_ok());
        assert!(validate_url("http://localhost:8080").is_ok());
        assert!(validate_url("ftp://example.com/file").is_err());
        assert!(validate_url("javascript:alert(1)").is_err());
        assert!(validate_url("mailto:someone@example.com").is_err());
        assert!(validate_url("/relative/path").is_err());
    }

    #[test]
    fn test_shorten_link() {
        let mut service = InMemoryService::new();

        let result = run(&mut service, "https://example.com", CreateOptions::default()).unwrap();

        let drop = &result.drops[0];
        assert_eq!(drop.drop_type, DropType::Link);
        assert_eq!(drop.shortlink, "https://d.pr/d1");
        assert_eq!(
            service.created[0].content,
            DropContent::Link {
                url: "https://example.com/".to_string()
            }
        );
    }

    #[test]
    fn test_private_link_is_reconciled() {
        let mut service = InMemoryService::new();
        let options = CreateOptions {
            privacy: Some(Privacy::Private),
            password: Some("s3cret".to_string()),
            ..Default::default()
        };

        let result = run(&mut service, "https://example.com", options).unwrap();

        assert_eq!(result.drops[0].privacy, Privacy::Private);
        assert!(result.drops[0].password_protected);
        assert_eq!(service.update_calls(), 1);
    }
}
