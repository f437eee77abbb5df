//! Project Loader
//!
//! Loads the project manifest and every actor's logic sheet from disk.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{debug, info};

use logic_types::{LogicSheet, SheetError};

use super::config::*;

/// Error type for project loading
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Project path does not exist: {0}")]
    PathNotFound(PathBuf),

    #[error("Project manifest not found: {0}")]
    ManifestNotFound(PathBuf),

    #[error("Logic sheet for actor '{actor_id}' not found: {path}")]
    SheetNotFound { actor_id: String, path: PathBuf },

    #[error("Actor id '{0}' is declared more than once")]
    DuplicateActor(String),

    #[error("Failed to read file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    TomlParseError(#[from] toml::de::Error),

    #[error("Failed to parse logic sheet {path}: {source}")]
    SheetParseError {
        path: PathBuf,
        #[source]
        source: SheetError,
    },
}

/// A loaded project
#[derive(Debug, Clone)]
pub struct Project {
    /// Project root directory
    pub path: PathBuf,
    pub manifest: ProjectManifest,
    /// Logic sheets by actor id
    pub sheets: HashMap<String, LogicSheet>,
}

impl Project {
    pub fn id(&self) -> &str {
        &self.manifest.project.id
    }

    pub fn name(&self) -> &str {
        &self.manifest.project.name
    }

    /// Actors in manifest order
    pub fn actors(&self) -> &[ActorConfig] {
        &self.manifest.actors
    }

    /// Get the sheet loaded for an actor
    pub fn sheet(&self, actor_id: &str) -> Option<&LogicSheet> {
        self.sheets.get(actor_id)
    }
}

/// Project loader
pub struct ProjectLoader;

impl ProjectLoader {
    /// Load a project from the given path
    pub async fn load(path: impl AsRef<Path>) -> Result<Project, LoadError> {
        let path = path.as_ref();

        // Check path exists
        if !path.exists() {
            return Err(LoadError::PathNotFound(path.to_path_buf()));
        }

        info!("Loading project from: {}", path.display());

        // Load manifest
        let manifest_path = path.join("project.toml");
        if !manifest_path.exists() {
            return Err(LoadError::ManifestNotFound(manifest_path));
        }

        let manifest_content = fs::read_to_string(&manifest_path).await?;
        let manifest: ProjectManifest = toml::from_str(&manifest_content)?;
        info!("Loaded project manifest: {} ({})", manifest.project.name, manifest.project.id);

        // Load one sheet per actor that declares one
        let mut seen = HashSet::new();
        let mut sheets = HashMap::new();
        for actor in &manifest.actors {
            if !seen.insert(actor.id.as_str()) {
                return Err(LoadError::DuplicateActor(actor.id.clone()));
            }

            let Some(sheet_path) = &actor.sheet else {
                debug!("Actor {} has no logic sheet", actor.id);
                continue;
            };

            let sheet = Self::load_sheet(&actor.id, &path.join(sheet_path)).await?;
            debug!(
                "Loaded sheet for {}: {} nodes, {} connections",
                actor.id,
                sheet.nodes.len(),
                sheet.connections.len()
            );
            sheets.insert(actor.id.clone(), sheet);
        }
        info!("Loaded {} actors, {} logic sheets", manifest.actors.len(), sheets.len());

        Ok(Project {
            path: path.to_path_buf(),
            manifest,
            sheets,
        })
    }

    /// Load a single logic sheet
    pub async fn load_sheet(actor_id: &str, path: &Path) -> Result<LogicSheet, LoadError> {
        if !path.exists() {
            return Err(LoadError::SheetNotFound {
                actor_id: actor_id.to_string(),
                path: path.to_path_buf(),
            });
        }

        let content = fs::read_to_string(path).await?;
        LogicSheet::from_json(&content).map_err(|source| LoadError::SheetParseError {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Reload the sheet for one actor
    pub async fn reload_sheet(
        project: &Project,
        actor_id: &str,
    ) -> Result<Option<LogicSheet>, LoadError> {
        let Some(sheet_path) = project
            .actors()
            .iter()
            .find(|a| a.id == actor_id)
            .and_then(|a| a.sheet.as_ref())
        else {
            return Ok(None);
        };

        let sheet = Self::load_sheet(actor_id, &project.path.join(sheet_path)).await?;
        Ok(Some(sheet))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use tokio::fs;

    const BALL_SHEET: &str = r#"{
        "nodes": [
            {"id": "tick", "type": "event", "subtype": "Update"},
            {"id": "move", "type": "action", "subtype": "Move"}
        ],
        "connections": [
            {"from": {"nodeId": "tick", "outputId": "exec"}, "to": {"nodeId": "move", "inputId": "exec"}}
        ]
    }"#;

    async fn create_test_project(manifest: &str) -> TempDir {
        let dir = TempDir::new().unwrap();
        let path = dir.path();

        fs::write(path.join("project.toml"), manifest).await.unwrap();
        fs::create_dir(path.join("sheets")).await.unwrap();
        fs::write(path.join("sheets/ball.json"), BALL_SHEET).await.unwrap();

        dir
    }

    const MANIFEST: &str = r#"
[project]
id = "test-project"
name = "Test Project"

[[actors]]
id = "ball"
tag = "Ball"
sheet = "sheets/ball.json"

[actors.variables]
velocityX = 60

[[actors]]
id = "wall"
tag = "Wall"
x = 400
"#;

    #[tokio::test]
    async fn test_load_project() {
        let dir = create_test_project(MANIFEST).await;
        let project = ProjectLoader::load(dir.path()).await.unwrap();

        assert_eq!(project.id(), "test-project");
        assert_eq!(project.name(), "Test Project");
        assert_eq!(project.actors().len(), 2);
        assert_eq!(project.sheets.len(), 1);
        assert_eq!(project.sheet("ball").unwrap().nodes.len(), 2);
        assert!(project.sheet("wall").is_none());
    }

    #[tokio::test]
    async fn test_missing_paths() {
        let dir = TempDir::new().unwrap();
        let err = ProjectLoader::load(dir.path().join("nope")).await.unwrap_err();
        assert!(matches!(err, LoadError::PathNotFound(_)));

        let err = ProjectLoader::load(dir.path()).await.unwrap_err();
        assert!(matches!(err, LoadError::ManifestNotFound(_)));

        let dir = create_test_project(&MANIFEST.replace("sheets/ball.json", "sheets/gone.json")).await;
        let err = ProjectLoader::load(dir.path()).await.unwrap_err();
        assert!(matches!(err, LoadError::SheetNotFound { ref actor_id, .. } if actor_id == "ball"));
    }

    #[tokio::test]
    async fn test_bad_documents() {
        let dir = create_test_project("[project\nid = 1").await;
        let err = ProjectLoader::load(dir.path()).await.unwrap_err();
        assert!(matches!(err, LoadError::TomlParseError(_)));

        let dir = create_test_project(MANIFEST).await;
        fs::write(dir.path().join("sheets/ball.json"), "{\"nodes\": 5}").await.unwrap();
        let err = ProjectLoader::load(dir.path()).await.unwrap_err();
        assert!(matches!(err, LoadError::SheetParseError { .. }));
    }

    #[tokio::test]
    async fn test_duplicate_actor() {
        let manifest = format!("{}\n[[actors]]\nid = \"ball\"\ntag = \"Ball\"\n", MANIFEST);
        let dir = create_test_project(&manifest).await;
        let err = ProjectLoader::load(dir.path()).await.unwrap_err();
        assert!(matches!(err, LoadError::DuplicateActor(ref id) if id == "ball"));
    }

    #[tokio::test]
    async fn test_reload_sheet() {
        let dir = create_test_project(MANIFEST).await;
        let project = ProjectLoader::load(dir.path()).await.unwrap();

        fs::write(
            dir.path().join("sheets/ball.json"),
            r#"{"nodes": [{"id": "only", "type": "event", "subtype": "Update"}]}"#,
        )
        .await
        .unwrap();

        let sheet = ProjectLoader::reload_sheet(&project, "ball").await.unwrap().unwrap();
        assert_eq!(sheet.nodes.len(), 1);
        assert!(ProjectLoader::reload_sheet(&project, "wall").await.unwrap().is_none());
    }
}
