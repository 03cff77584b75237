//! Directory-backed resolution.
//!
//! Each lookup fetches a fresh candidate set from ClickUp and hands it to the
//! matcher. A failed fetch is logged and treated as an empty set: resolving
//! against nothing correctly yields no match.

use clickup_types::NamedEntity;
use tracing::{debug, warn};

use super::matching::{resolve_best_match, resolve_user_match};
use super::{ResolutionFailure, Stage};
use crate::clickup::ClickUpApi;
use crate::error::Result;

/// Human names locating one list. `folder: None` means the list sits
/// directly under the space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListPath {
    pub space: String,
    pub folder: Option<String>,
    pub list: String,
}

/// Every entity matched along a [`ListPath`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedList {
    pub space: NamedEntity,
    pub folder: Option<NamedEntity>,
    pub list: NamedEntity,
}

pub struct DirectoryResolver<'a> {
    api: &'a dyn ClickUpApi,
    threshold: f64,
}

impl<'a> DirectoryResolver<'a> {
    pub fn new(api: &'a dyn ClickUpApi, threshold: f64) -> Self {
        Self { api, threshold }
    }

    pub async fn space(&self, team_id: &str, name: &str) -> Option<NamedEntity> {
        let candidates = candidates(Stage::Space, team_id, self.api.spaces(team_id).await);
        self.pick(Stage::Space, name, &candidates)
    }

    pub async fn folder(&self, space_id: &str, name: &str) -> Option<NamedEntity> {
        let candidates = candidates(Stage::Folder, space_id, self.api.folders(space_id).await);
        self.pick(Stage::Folder, name, &candidates)
    }

    pub async fn list_in_folder(&self, folder_id: &str, name: &str) -> Option<NamedEntity> {
        let candidates = candidates(
            Stage::List,
            folder_id,
            self.api.folder_lists(folder_id).await,
        );
        self.pick(Stage::List, name, &candidates)
    }

    pub async fn list_in_space(&self, space_id: &str, name: &str) -> Option<NamedEntity> {
        let candidates = candidates(Stage::List, space_id, self.api.space_lists(space_id).await);
        self.pick(Stage::List, name, &candidates)
    }

    /// Email-first, then username
    pub async fn user(&self, team_id: &str, name: &str) -> Option<NamedEntity> {
        let candidates = candidates(Stage::User, team_id, self.api.members(team_id).await);
        let hit = resolve_user_match(name, &candidates, self.threshold).cloned();
        log_outcome(Stage::User, name, hit.as_ref(), candidates.len());
        hit
    }

    /// Resolve space → folder → list, stopping at the first stage with no
    /// match.
    pub async fn resolve_list_path(
        &self,
        team_id: &str,
        path: &ListPath,
    ) -> std::result::Result<ResolvedList, ResolutionFailure> {
        let space = self
            .space(team_id, &path.space)
            .await
            .ok_or_else(|| ResolutionFailure::new(Stage::Space, &path.space))?;

        let folder = match &path.folder {
            Some(folder_name) => Some(
                self.folder(&space.id, folder_name)
                    .await
                    .ok_or_else(|| ResolutionFailure::new(Stage::Folder, folder_name))?,
            ),
            None => None,
        };

        let list = match &folder {
            Some(folder) => self.list_in_folder(&folder.id, &path.list).await,
            None => self.list_in_space(&space.id, &path.list).await,
        }
        .ok_or_else(|| ResolutionFailure::new(Stage::List, &path.list))?;

        Ok(ResolvedList {
            space,
            folder,
            list,
        })
    }

    fn pick(&self, stage: Stage, name: &str, candidates: &[NamedEntity]) -> Option<NamedEntity> {
        let hit = resolve_best_match(name, candidates, self.threshold).cloned();
        log_outcome(stage, name, hit.as_ref(), candidates.len());
        hit
    }
}

/// Normalize a fetch result into a candidate set; errors become empty sets.
fn candidates<T>(stage: Stage, parent_id: &str, fetched: Result<Vec<T>>) -> Vec<NamedEntity>
where
    for<'t> NamedEntity: From<&'t T>,
{
    match fetched {
        Ok(records) => records.iter().map(NamedEntity::from).collect(),
        Err(e) => {
            warn!(%stage, parent_id, error = %e, "Candidate fetch failed, resolving against nothing");
            Vec::new()
        }
    }
}

fn log_outcome(stage: Stage, name: &str, hit: Option<&NamedEntity>, searched: usize) {
    match hit {
        Some(entity) => debug!(%stage, name, id = %entity.id, matched = entity.label(), "Resolved name"),
        None => debug!(%stage, name, searched, "No match"),
    }
}
