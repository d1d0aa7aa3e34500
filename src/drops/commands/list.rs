use crate::classify::classify;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::service::DropService;

/// Lists the caller's drops, newest first.
pub fn run<S: DropService>(service: &S) -> Result<CmdResult> {
    let mut drops = service
        .list_drops()
        .map_err(|e| classify(e, "List drops"))?;
    drops.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let mut result = CmdResult::default();
    if drops.is_empty() {
        result.add_message(CmdMessage::info("No drops yet."));
    }
    result.drops = drops;
    Ok(result)
}
