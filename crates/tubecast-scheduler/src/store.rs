//! File-based template store — reusable message texts.
//! Templates saved as JSON — human-readable, easy to edit by hand.
//! Only reads/writes on CRUD calls, never while a job runs.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::Utc;
use tubecast_core::error::{Result, TubecastError};
use tubecast_core::traits::TemplateStore;
use tubecast_core::types::Template;

const TEMPLATES_FILE: &str = "templates.json";

/// Template store backed by `<dir>/templates.json`.
pub struct FileTemplateStore {
    path: PathBuf,
    /// Serializes read-modify-write cycles.
    write_lock: Mutex<()>,
}

impl FileTemplateStore {
    /// Create a new template store at the given directory.
    pub fn new(dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(dir)?;
        Ok(Self {
            path: dir.to_path_buf(),
            write_lock: Mutex::new(()),
        })
    }

    fn file(&self) -> PathBuf {
        self.path.join(TEMPLATES_FILE)
    }

    fn load(&self) -> Result<Vec<Template>> {
        let file = self.file();
        if !file.exists() {
            return Ok(Vec::new());
        }
        let json = std::fs::read_to_string(&file)?;
        match serde_json::from_str(&json) {
            Ok(templates) => Ok(templates),
            Err(e) => {
                tracing::warn!("⚠️ Failed to parse {}: {e}", file.display());
                Err(TubecastError::Template(format!("Corrupt template file: {e}")))
            }
        }
    }

    fn save(&self, templates: &[Template]) -> Result<()> {
        let file = self.file();
        let json = serde_json::to_string_pretty(templates)?;
        std::fs::write(&file, json)?;
        tracing::debug!("💾 Saved {} templates to {}", templates.len(), file.display());
        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, ()>> {
        self.write_lock
            .lock()
            .map_err(|_| TubecastError::Template("Template store lock poisoned".into()))
    }
}

impl TemplateStore for FileTemplateStore {
    fn list(&self) -> Result<Vec<Template>> {
        self.load()
    }

    fn create(&self, title: &str, text: &str) -> Result<Template> {
        let title = title.trim();
        if title.is_empty() {
            return Err(TubecastError::Template("Template title is empty".into()));
        }
        if text.trim().is_empty() {
            return Err(TubecastError::Template("Template text is empty".into()));
        }

        let _guard = self.lock()?;
        let mut templates = self.load()?;
        let template = Template {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.to_string(),
            text: text.to_string(),
            created_at: Utc::now(),
        };
        templates.push(template.clone());
        self.save(&templates)?;
        tracing::info!("📝 Template added: '{}' ({})", template.title, template.id);
        Ok(template)
    }

    fn delete(&self, id: &str) -> Result<bool> {
        let _guard = self.lock()?;
        let mut templates = self.load()?;
        let len = templates.len();
        templates.retain(|t| t.id != id);
        if templates.len() == len {
            return Ok(false);
        }
        self.save(&templates)?;
        tracing::info!("🗑️ Template removed: {id}");
        Ok(true)
    }
}
