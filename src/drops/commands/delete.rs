use crate::classify::classify;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::service::DropService;

pub fn run<S: DropService>(service: &mut S, code: &str) -> Result<CmdResult> {
    service
        .delete_drop(code)
        .map_err(|e| classify(e, "Delete drop"))?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!("Drop deleted: {}", code)));
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{link, CreateOptions};
    use crate::service::memory::InMemoryService;

    #[test]
    fn test_delete_existing_drop() {
        let mut service = InMemoryService::new();
        let created = link::run(&mut service, "https://a.example", CreateOptions::default()).unwrap();
        let code = created.drops[0].code.clone();

        run(&mut service, &code).unwrap();

        assert_eq!(service.drop_count(), 0);
    }

    #[test]
    fn test_delete_unknown_drop_is_classified() {
        let mut service = InMemoryService::new();
        let err = run(&mut service, "zzz").unwrap_err();
        assert_eq!(err.to_string(), "Delete drop failed: 404 Not Found");
    }
}
