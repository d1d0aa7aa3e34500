use crate::commands::helpers::{build_intent, create_drop};
use crate::commands::{CmdResult, CreateOptions};
use crate::content::content_type_for;
use crate::error::{DropsError, Result};
use crate::model::DropContent;
use crate::service::DropService;
use std::path::Path;

pub fn run<S: DropService>(service: &mut S, path: &Path, options: CreateOptions) -> Result<CmdResult> {
    if !path.is_file() {
        return Err(DropsError::FileNotFound(path.to_path_buf()));
    }

    let content = DropContent::File {
        path: path.to_path_buf(),
        content_type: content_type_for(path).to_string(),
    };
    let mut options = options;
    if options.title.is_none() {
        options.title = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned());
    }

    let intent = build_intent(service, content, &options)?;
    create_drop(service, &intent, "Upload")
}
