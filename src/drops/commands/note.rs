use crate::commands::helpers::{build_intent, create_drop};
use crate::commands::{CmdResult, CreateOptions};
use crate::content::language_for;
use crate::error::{DropsError, Result};
use crate::model::{DropContent, NoteVariant};
use crate::service::DropService;
use std::fs;
use std::path::PathBuf;

/// Where the note text comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteSource {
    Text(String),
    File(PathBuf),
    /// Inline code snippet; always produces a code note.
    Code(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteRequest {
    pub source: NoteSource,
    pub language: Option<String>,
    /// Explicit code flag.
    pub code: bool,
}

impl NoteRequest {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            source: NoteSource::Text(text.into()),
            language: None,
            code: false,
        }
    }
}

pub fn run<S: DropService>(
    service: &mut S,
    request: NoteRequest,
    options: CreateOptions,
) -> Result<CmdResult> {
    let mut options = options;
    let mut language = request.language;
    let mut code = request.code;

    let raw = match request.source {
        NoteSource::Text(text) => text,
        NoteSource::Code(snippet) => {
            code = true;
            snippet
        }
        NoteSource::File(path) => {
            if !path.is_file() {
                return Err(DropsError::FileNotFound(path));
            }
            if options.title.is_none() {
                options.title = path
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned());
            }
            if language.is_none() {
                language = language_for(&path).map(str::to_string);
            }
            fs::read_to_string(&path)?
        }
    };

    let text = raw.trim();
    if text.is_empty() {
        return Err(DropsError::EmptyContent);
    }

    let variant = if code || language.is_some() {
        NoteVariant::Code
    } else {
        NoteVariant::Plain
    };
    let content = DropContent::Note {
        text: text.to_string(),
        variant,
        language,
    };
    let intent = build_intent(service, content, &options)?;
    create_drop(service, &intent, "Create note")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DropType;
    use crate::service::memory::InMemoryService;
    use tempfile::TempDir;

    fn created_content(service: &InMemoryService) -> &DropContent {
        &service.created[0].content
    }

    #[test]
    fn test_blank_note_is_rejected() {
        let mut service = InMemoryService::new();
        let err = run(&mut service, NoteRequest::text("   "), CreateOptions::default()).unwrap_err();
        assert!(matches!(err, DropsError::EmptyContent));
        assert!(service.created.is_empty());
    }

    #[test]
    fn test_note_content_is_trimmed() {
        let mut service = InMemoryService::new();

        let result = run(&mut service, NoteRequest::text("  hi  "), CreateOptions::default()).unwrap();

        assert_eq!(result.drops[0].drop_type, DropType::Note);
        assert_eq!(
            created_content(&service),
            &DropContent::Note {
                text: "hi".to_string(),
                variant: NoteVariant::Plain,
                language: None,
            }
        );
    }

    #[test]
    fn test_note_from_source_file_is_code() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("script.js");
        fs::write(&path, "console.log('hi');\n").unwrap();
        let mut service = InMemoryService::new();
        let request = NoteRequest {
            source: NoteSource::File(path),
            language: None,
            code: false,
        };

        let result = run(&mut service, request, CreateOptions::default()).unwrap();

        assert_eq!(result.drops[0].title.as_deref(), Some("script.js"));
        assert_eq!(result.drops[0].variant.as_deref(), Some("code"));
        assert_eq!(
            created_content(&service),
            &DropContent::Note {
                text: "console.log('hi');".to_string(),
                variant: NoteVariant::Code,
                language: Some("javascript".to_string()),
            }
        );
    }

    #[test]
    fn test_explicit_language_overrides_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("build.js");
        fs::write(&path, "let x = 1;").unwrap();
        let mut service = InMemoryService::new();
        let request = NoteRequest {
            source: NoteSource::File(path),
            language: Some("typescript".to_string()),
            code: false,
        };

        run(&mut service, request, CreateOptions::default()).unwrap();

        assert!(matches!(
            created_content(&service),
            DropContent::Note { language: Some(lang), .. } if lang == "typescript"
        ));
    }

    #[test]
    fn test_plain_text_file_stays_plain() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("shopping.txt");
        fs::write(&path, "milk\neggs").unwrap();
        let mut service = InMemoryService::new();
        let request = NoteRequest {
            source: NoteSource::File(path),
            language: None,
            code: false,
        };

        run(&mut service, request, CreateOptions::default()).unwrap();

        assert!(matches!(
            created_content(&service),
            DropContent::Note { variant: NoteVariant::Plain, language: None, .. }
        ));
    }

    #[test]
    fn test_inline_code_and_code_flag() {
        let mut service = InMemoryService::new();
        let request = NoteRequest {
            source: NoteSource::Code("SELECT 1;".to_string()),
            language: None,
            code: false,
        };
        run(&mut service, request, CreateOptions::default()).unwrap();
        assert!(matches!(
            created_content(&service),
            DropContent::Note { variant: NoteVariant::Code, .. }
        ));

        let mut service = InMemoryService::new();
        let request = NoteRequest {
            code: true,
            ..NoteRequest::text("fn main() {}")
        };
        run(&mut service, request, CreateOptions::default()).unwrap();
        assert!(matches!(
            created_content(&service),
            DropContent::Note { variant: NoteVariant::Code, .. }
        ));
    }

    #[test]
    fn test_missing_note_file() {
        let dir = TempDir::new().unwrap();
        let mut service = InMemoryService::new();
        let request = NoteRequest {
            source: NoteSource::File(dir.path().join("gone.md")),
            language: None,
            code: false,
        };
        let err = run(&mut service, request, CreateOptions::default()).unwrap_err();
        assert!(matches!(err, DropsError::FileNotFound(_)));
    }
}
