//! # Privacy Reconciliation
//!
//! The service only creates public drops. Anything else the user asked for
//! (privacy, a password, a title the create call did not apply) is brought in
//! line afterwards with a single corrective update.
//!
//! ```text
//! Absent ──create──▶ PublicCreated ──nothing to fix──────────────────▶ Final
//!                         │
//!                         ├──update ok────────────────────────────────▶ Reconciled
//!                         ├──update failed, private requested──delete─▶ Deleted (error)
//!                         └──update failed, public requested──────────▶ PublicCreated (error)
//! ```
//!
//! A drop that was meant to be private is never left public: if the update
//! fails it is deleted. The delete is best effort. Its failure is logged and
//! recorded in [`CleanupOutcome`], but the user always sees the update error.
//!
//! Nothing here retries. The caller decides whether to run the command again.

use crate::classify::classify;
use crate::error::{CleanupOutcome, DropsError, Result};
use crate::model::{DropIntent, DropResult, DropUpdate, Privacy};
use crate::service::DropService;
use tracing::{debug, info, warn};

const UPDATE_OPERATION: &str = "Update drop";

/// Fields of `created` that still differ from `intent`.
pub fn plan_update(created: &DropResult, intent: &DropIntent) -> DropUpdate {
    let title = intent
        .title
        .as_ref()
        .filter(|title| created.title.as_ref() != Some(*title))
        .cloned();

    DropUpdate {
        privacy: intent.wants_private().then_some(Privacy::Private),
        password: intent.password.clone(),
        title,
    }
}

/// Brings a freshly created drop in line with `intent`, using at most one
/// update call and, if privacy was requested and the update failed, one delete.
pub fn reconcile<S: DropService>(
    service: &mut S,
    mut created: DropResult,
    intent: &DropIntent,
) -> Result<DropResult> {
    let update = plan_update(&created, intent);
    if update.is_empty() {
        debug!(code = %created.code, "drop needs no reconciliation");
        return Ok(created);
    }

    debug!(
        code = %created.code,
        privacy = update.privacy.is_some(),
        password = update.password.is_some(),
        title = update.title.is_some(),
        "reconciling drop"
    );

    match service.update_drop(&created.code, &update) {
        Ok(response) => {
            // An echoed title wins; without one, the accepted update stands.
            if let Some(title) = response.title.or_else(|| update.title.clone()) {
                created.title = Some(title);
            }
            if update.password.is_some() || response.password_protected == Some(true) {
                created.password_protected = true;
            }
            // The update response does not reliably echo privacy; the successful
            // call is the confirmation.
            if update.privacy.is_some() {
                created.privacy = Privacy::Private;
            }
            Ok(created)
        }
        Err(raw) => {
            let error = classify(raw, UPDATE_OPERATION);
            let cleanup = if intent.wants_private() {
                delete_unreconciled(service, &created.code)
            } else {
                debug!(code = %created.code, "update failed on a public drop, leaving it in place");
                CleanupOutcome::NotAttempted
            };
            Err(DropsError::Reconciliation { error, cleanup })
        }
    }
}

fn delete_unreconciled<S: DropService>(service: &mut S, code: &str) -> CleanupOutcome {
    match service.delete_drop(code) {
        Ok(()) => {
            info!(code, "deleted drop that could not be made private");
            CleanupOutcome::Deleted
        }
        Err(error) => {
            warn!(
                code,
                error = %error,
                "could not delete drop after privacy update failed, it may still be public"
            );
            CleanupOutcome::Failed(error.to_string())
        }
    }
}
