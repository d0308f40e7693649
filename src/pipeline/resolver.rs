//! Issue-to-author resolution

use std::sync::Arc;

use crate::git::{BlameError, BlameService, WarningSink};
use crate::models::{BlameInfo, Issue};
use crate::pipeline::gate::Gate;

/// Maps an issue's line to the contributor of the nearest attributed line.
pub struct Resolver {
    blame: Arc<BlameService>,
    gate: Arc<Gate>,
}

impl Resolver {
    pub fn new(blame: Arc<BlameService>, gate: Arc<Gate>) -> Self {
        Self { blame, gate }
    }

    /// Resolve the contributor for `issue`.
    ///
    /// Picks the smallest attributed line at or after `issue.line`, falling
    /// back to the last attributed line. `Ok(None)` means blame succeeded but
    /// nothing could be attributed.
    pub fn resolve(
        &self,
        issue: &Issue,
        warnings: &dyn WarningSink,
    ) -> Result<Option<BlameInfo>, BlameError> {
        let index = self.blame.attribute(&issue.file_path, &self.gate, warnings)?;
        if index.is_empty() {
            return Ok(None);
        }
        Ok(index
            .nearest_at_or_after(issue.line)
            .and_then(|line| index.get(line))
            .cloned())
    }
}
