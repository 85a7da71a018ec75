//! Template store — reusable message texts.

use crate::error::Result;
use crate::types::Template;

pub trait TemplateStore: Send + Sync {
    fn list(&self) -> Result<Vec<Template>>;

    fn create(&self, title: &str, text: &str) -> Result<Template>;

    /// Returns `false` when no template had that id.
    fn delete(&self, id: &str) -> Result<bool>;
}
