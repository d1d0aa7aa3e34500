use crate::classify::classify;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::service::DropService;

/// Lists all boards, or shows the one with `id`.
pub fn run<S: DropService>(service: &S, id: Option<&str>) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    match id {
        Some(id) => {
            let board = service
                .get_board(id)
                .map_err(|e| classify(e, "Get board"))?;
            result.boards.push(board);
        }
        None => {
            result.boards = service
                .list_boards()
                .map_err(|e| classify(e, "List boards"))?;
            if result.boards.is_empty() {
                result.add_message(CmdMessage::info("No boards yet."));
            }
        }
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::memory::InMemoryService;

    #[test]
    fn test_list_boards() {
        let service = InMemoryService::new()
            .with_board("b1", "Screenshots")
            .with_board("b2", "Work");
        let result = run(&service, None).unwrap();
        assert_eq!(result.boards.len(), 2);
    }

    #[test]
    fn test_show_board() {
        let service = InMemoryService::new().with_board("b1", "Screenshots");
        let result = run(&service, Some("b1")).unwrap();
        assert_eq!(result.boards[0].name, "Screenshots");

        let err = run(&service, Some("b9")).unwrap_err();
        assert_eq!(err.to_string(), "Get board failed: 404 Not Found");
    }
}
