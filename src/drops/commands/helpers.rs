use crate::classify::classify;
use crate::commands::{CmdMessage, CmdResult, CreateOptions};
use crate::error::{DropsError, Result};
use crate::model::{Board, DropContent, DropIntent, DropResult};
use crate::reconcile::reconcile;
use crate::service::DropService;
use tracing::debug;

/// Finds a board by id or case-insensitive name with a single list call.
pub fn resolve_board<S: DropService>(service: &S, board: &str) -> Result<Board> {
    let boards = service
        .list_boards()
        .map_err(|e| classify(e, "List boards"))?;
    boards
        .into_iter()
        .find(|candidate| candidate.id == board || candidate.name.eq_ignore_ascii_case(board))
        .ok_or_else(|| DropsError::BoardNotFound(board.to_string()))
}

/// Turns validated content plus options into an intent, resolving the board.
pub(crate) fn build_intent<S: DropService>(
    service: &S,
    content: DropContent,
    options: &CreateOptions,
) -> Result<DropIntent> {
    let board_id = match options.board.as_deref() {
        Some(board) => Some(resolve_board(service, board)?.id),
        None => None,
    };
    Ok(DropIntent {
        content,
        title: options.title.clone(),
        privacy: options.privacy.unwrap_or_default(),
        password: options.password.clone(),
        board_id,
    })
}

/// Creates the drop, then hands it to reconciliation.
pub(crate) fn create_drop<S: DropService>(
    service: &mut S,
    intent: &DropIntent,
    operation: &str,
) -> Result<CmdResult> {
    debug!(drop_type = %intent.drop_type(), "creating drop");
    let created = service
        .create_drop(&intent.to_new_drop())
        .map_err(|e| classify(e, operation))?;
    let drop = reconcile(service, created, intent)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(describe(&drop)));
    if let Some(requested) = intent.title.as_deref() {
        if drop.title.as_deref().is_some_and(|title| title != requested) {
            result.add_message(CmdMessage::warning(format!(
                "The service stored the title as {:?}",
                drop.title.as_deref().unwrap_or_default()
            )));
        }
    }
    Ok(result.with_drop(drop))
}

fn describe(drop: &DropResult) -> String {
    let mut text = format!("Created {} {}", drop.privacy, drop.drop_type);
    if drop.password_protected {
        text.push_str(" (password protected)");
    }
    text
}
