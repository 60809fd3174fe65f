use crate::error::AppError;
use crate::model::Project;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const SCHEMA_VERSION: u32 = 1;
const STORE_FILE_NAME: &str = "projects.json";
const STORE_ENV_VAR: &str = "GOALPLAN_STORE_PATH";

#[derive(Debug, Serialize, Deserialize)]
struct StoredProjects {
    schema_version: u32,
    #[serde(default)]
    projects: Vec<Project>,
    #[serde(default)]
    active_project_id: Option<String>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ProjectState {
    pub projects: Vec<Project>,
    pub active_project_id: Option<String>,
}

impl ProjectState {
    pub fn find(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|project| project.id == id)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.projects.iter().position(|project| project.id == id)
    }
}

pub fn store_path() -> Result<PathBuf, AppError> {
    if let Ok(path) = std::env::var(STORE_ENV_VAR)
        && !path.trim().is_empty()
    {
        return Ok(PathBuf::from(path));
    }

    if cfg!(windows) {
        let appdata =
            std::env::var("APPDATA").map_err(|_| AppError::invalid_data("APPDATA is not set"))?;
        Ok(PathBuf::from(appdata).join("goalplan").join(STORE_FILE_NAME))
    } else {
        let home = std::env::var("HOME").map_err(|_| AppError::invalid_data("HOME is not set"))?;
        Ok(PathBuf::from(home)
            .join(".config")
            .join("goalplan")
            .join(STORE_FILE_NAME))
    }
}

pub fn load_state(path: &Path) -> Result<ProjectState, AppError> {
    if !path.exists() {
        return Ok(ProjectState::default());
    }

    let content = std::fs::read_to_string(path).map_err(|err| AppError::io(err.to_string()))?;
    let stored: StoredProjects =
        serde_json::from_str(&content).map_err(|err| AppError::invalid_data(err.to_string()))?;

    if stored.schema_version != SCHEMA_VERSION {
        return Err(AppError::invalid_data("schema_version mismatch"));
    }

    if let Some(active_id) = stored.active_project_id.as_deref() {
        let exists = stored.projects.iter().any(|project| project.id == active_id);
        if !exists {
            return Err(AppError::invalid_data("active_project_id not found"));
        }
    }

    tracing::debug!(path = %path.display(), projects = stored.projects.len(), "store loaded");
    Ok(ProjectState {
        projects: stored.projects,
        active_project_id: stored.active_project_id,
    })
}

pub fn save_state(path: &Path, state: &ProjectState) -> Result<(), AppError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|err| AppError::io(err.to_string()))?;
    }

    let stored = StoredProjects {
        schema_version: SCHEMA_VERSION,
        projects: state.projects.clone(),
        active_project_id: state.active_project_id.clone(),
    };
    let content = serde_json::to_string_pretty(&stored)
        .map_err(|err| AppError::invalid_data(err.to_string()))?;
    std::fs::write(path, content).map_err(|err| AppError::io(err.to_string()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let permissions = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(path, permissions).map_err(|err| AppError::io(err.to_string()))?;
    }

    tracing::debug!(path = %path.display(), projects = state.projects.len(), "store saved");
    Ok(())
}
