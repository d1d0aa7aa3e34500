use crate::commands::{CmdMessage, CmdResult};
use crate::credentials::CredentialStore;
use crate::error::Result;
use crate::model::Credentials;

pub fn login<C: CredentialStore>(store: &mut C, credentials: &Credentials) -> Result<CmdResult> {
    credentials.require_authenticated()?;
    store.set(credentials)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Credentials saved ({})",
        credentials.kind()
    )));
    Ok(result)
}

pub fn logout<C: CredentialStore>(store: &mut C) -> Result<CmdResult> {
    store.clear()?;
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success("Credentials removed"));
    Ok(result)
}

/// Describes the stored credentials without revealing secrets.
pub fn whoami<C: CredentialStore>(store: &C) -> Result<CmdResult> {
    let text = match store.get()? {
        Credentials::Anonymous => "Not logged in".to_string(),
        Credentials::Basic { username, .. } => format!("Logged in as {} (basic)", username),
        Credentials::Token { .. } => "Logged in with a token".to_string(),
    };
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::info(text));
    Ok(result)
}
