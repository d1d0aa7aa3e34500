use super::{DropService, ServiceError, ServiceResult};
use crate::model::{Board, DropContent, DropResult, DropUpdate, NewDrop, Privacy, UpdatedDrop};
use chrono::Utc;
use std::cell::Cell;
use std::collections::BTreeMap;

/// In-memory drop service for testing.
///
/// Records every mutating call so tests can assert on exactly what reached
/// the service, and can be told to fail any of them.
pub struct InMemoryService {
    drops: BTreeMap<String, DropResult>,
    boards: Vec<Board>,
    next_code: usize,
    /// Titles sent on create are kept (true) or silently dropped (false).
    pub keeps_titles_on_create: bool,
    /// The update response reports the new privacy (true) or stale PUBLIC (false).
    pub echoes_privacy: bool,
    /// The update response carries no fields at all, like a 204.
    pub empty_update_response: bool,
    /// Updated titles get a ` (1)` suffix, as a service deduplicating names would.
    pub renames_titles: bool,
    pub fail_create: Option<ServiceError>,
    pub fail_update: Option<ServiceError>,
    pub fail_delete: Option<ServiceError>,
    pub created: Vec<NewDrop>,
    pub updates: Vec<(String, DropUpdate)>,
    pub deleted: Vec<String>,
    board_lookups: Cell<usize>,
}

impl Default for InMemoryService {
    fn default() -> Self {
        Self {
            drops: BTreeMap::new(),
            boards: Vec::new(),
            next_code: 0,
            keeps_titles_on_create: true,
            echoes_privacy: true,
            empty_update_response: false,
            renames_titles: false,
            fail_create: None,
            fail_update: None,
            fail_delete: None,
            created: Vec::new(),
            updates: Vec::new(),
            deleted: Vec::new(),
            board_lookups: Cell::new(0),
        }
    }
}

impl InMemoryService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_board(mut self, id: &str, name: &str) -> Self {
        self.boards.push(Board {
            id: id.to_string(),
            name: name.to_string(),
            drop_count: 0,
        });
        self
    }

    pub fn failing_update(mut self, error: ServiceError) -> Self {
        self.fail_update = Some(error);
        self
    }

    pub fn failing_delete(mut self, error: ServiceError) -> Self {
        self.fail_delete = Some(error);
        self
    }

    pub fn find_drop(&self, code: &str) -> Option<&DropResult> {
        self.drops.get(code)
    }

    pub fn drop_count(&self) -> usize {
        self.drops.len()
    }

    pub fn update_calls(&self) -> usize {
        self.updates.len()
    }

    pub fn delete_calls(&self) -> usize {
        self.deleted.len()
    }

    pub fn board_lookups(&self) -> usize {
        self.board_lookups.get()
    }

    fn bump_lookups(&self) {
        self.board_lookups.set(self.board_lookups.get() + 1);
    }
}

impl DropService for InMemoryService {
    fn create_drop(&mut self, payload: &NewDrop) -> ServiceResult<DropResult> {
        self.created.push(payload.clone());
        if let Some(error) = &self.fail_create {
            return Err(error.clone());
        }

        self.next_code += 1;
        let code = format!("d{}", self.next_code);
        let variant = payload.content.variant().map(str::to_string);
        let title = match &payload.content {
            _ if !self.keeps_titles_on_create => None,
            DropContent::File { path, .. } => payload.title.clone().or_else(|| {
                path.file_name()
                    .map(|name| name.to_string_lossy().into_owned())
            }),
            _ => payload.title.clone(),
        };
        let drop = DropResult {
            shortlink: format!("https://d.pr/{}", code),
            code: code.clone(),
            drop_type: payload.content.drop_type(),
            privacy: Privacy::Public,
            title,
            variant,
            board_id: payload.board_id.clone(),
            password_protected: false,
            created_at: Some(Utc::now()),
        };
        self.drops.insert(code, drop.clone());
        Ok(drop)
    }

    fn update_drop(&mut self, code: &str, update: &DropUpdate) -> ServiceResult<UpdatedDrop> {
        self.updates.push((code.to_string(), update.clone()));
        if let Some(error) = &self.fail_update {
            return Err(error.clone());
        }

        let drop = self
            .drops
            .get_mut(code)
            .ok_or_else(|| ServiceError::status(404, "Not Found"))?;
        if let Some(privacy) = update.privacy {
            drop.privacy = privacy;
        }
        if let Some(title) = &update.title {
            drop.title = Some(if self.renames_titles {
                format!("{} (1)", title)
            } else {
                title.clone()
            });
        }
        if update.password.is_some() {
            drop.password_protected = true;
        }

        if self.empty_update_response {
            return Ok(UpdatedDrop::default());
        }
        let privacy = if self.echoes_privacy {
            drop.privacy
        } else {
            Privacy::Public
        };
        Ok(UpdatedDrop {
            title: drop.title.clone(),
            privacy: Some(privacy),
            password_protected: Some(drop.password_protected),
        })
    }

    fn delete_drop(&mut self, code: &str) -> ServiceResult<()> {
        self.deleted.push(code.to_string());
        if let Some(error) = &self.fail_delete {
            return Err(error.clone());
        }
        self.drops
            .remove(code)
            .map(|_| ())
            .ok_or_else(|| ServiceError::status(404, "Not Found"))
    }

    fn list_drops(&self) -> ServiceResult<Vec<DropResult>> {
        Ok(self.drops.values().cloned().collect())
    }

    fn list_boards(&self) -> ServiceResult<Vec<Board>> {
        self.bump_lookups();
        Ok(self.boards.clone())
    }

    fn get_board(&self, id: &str) -> ServiceResult<Board> {
        self.bump_lookups();
        self.boards
            .iter()
            .find(|board| board.id == id)
            .cloned()
            .ok_or_else(|| ServiceError::status(404, "Not Found"))
    }
}
