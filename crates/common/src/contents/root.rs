use super::backend::{Backend, ReadOptions};
use super::error::{ContentsError, Result};
use super::model::{Checkpoint, Content, ContentModel};

/// Pseudo-backend serving the namespace root.
///
/// The root is a synthetic directory with one entry per registered backend
/// alias. Listing is the only capability; every mutating operation is
/// `Unsupported`.
pub struct RootBackend {
    aliases: Vec<String>,
}

impl RootBackend {
    pub fn new(aliases: Vec<String>) -> Self {
        Self { aliases }
    }

    fn unsupported<T>(&self, op: &str) -> Result<T> {
        Err(ContentsError::Unsupported(format!(
            "{op} is not available on the namespace root"
        )))
    }
}

impl Backend for RootBackend {
    fn exists(&self, path: &str) -> bool {
        path.is_empty()
    }

    fn is_dir(&self, path: &str) -> bool {
        path.is_empty()
    }

    fn is_document(&self, _path: &str) -> bool {
        false
    }

    fn list(&self, path: &str) -> Result<Vec<ContentModel>> {
        if !path.is_empty() {
            return Err(ContentsError::NotFound(path.to_string()));
        }
        Ok(self
            .aliases
            .iter()
            .map(|alias| ContentModel::directory(alias, alias))
            .collect())
    }

    fn read(&self, path: &str, _opts: ReadOptions) -> Result<ContentModel> {
        if !path.is_empty() {
            return Err(ContentsError::NotFound(path.to_string()));
        }
        let mut model = ContentModel::directory("", "");
        model.content = Some(Content::Listing(self.list("")?));
        model.format = Some("json".to_string());
        Ok(model)
    }

    fn write(&self, _model: &ContentModel, _path: &str) -> Result<ContentModel> {
        self.unsupported("save")
    }

    fn rename(&self, _path: &str, _new_path: &str) -> Result<ContentModel> {
        self.unsupported("rename")
    }

    fn delete(&self, _path: &str) -> Result<()> {
        self.unsupported("delete")
    }

    fn create_checkpoint(&self, _path: &str) -> Result<Checkpoint> {
        self.unsupported("create_checkpoint")
    }

    fn list_checkpoints(&self, _path: &str) -> Result<Vec<Checkpoint>> {
        self.unsupported("list_checkpoints")
    }

    fn restore_checkpoint(&self, _checkpoint_id: &str, _path: &str) -> Result<()> {
        self.unsupported("restore_checkpoint")
    }

    fn delete_checkpoint(&self, _checkpoint_id: &str, _path: &str) -> Result<()> {
        self.unsupported("delete_checkpoint")
    }
}
