use std::{io, path::PathBuf};

use async_trait::async_trait;
use tokio::fs;

use super::Collection;

/// Raw persistence for collections.
/// Implementations can be file-backed, in-memory, or remote object storage.
#[async_trait]
pub trait CollectionBackend: Send + Sync {
    /// Stored text for `collection`, or `None` when nothing has been stored yet.
    async fn load(&self, collection: Collection) -> io::Result<Option<String>>;
    /// Replace the stored text for `collection`.
    async fn save(&self, collection: Collection, contents: &str) -> io::Result<()>;
}

/// One JSON file per collection.
#[derive(Clone, Debug)]
pub struct FileBackend {
    menu_path: PathBuf,
    orders_path: PathBuf,
}

impl FileBackend {
    pub fn new<M: Into<PathBuf>, O: Into<PathBuf>>(menu_path: M, orders_path: O) -> Self {
        Self { menu_path: menu_path.into(), orders_path: orders_path.into() }
    }

    pub fn from_config(cfg: &configs::StorageConfig) -> Self {
        Self::new(cfg.menu_path(), cfg.orders_path())
    }

    pub fn path(&self, collection: Collection) -> &PathBuf {
        match collection {
            Collection::Menu => &self.menu_path,
            Collection::Orders => &self.orders_path,
        }
    }
}

#[async_trait]
impl CollectionBackend for FileBackend {
    async fn load(&self, collection: Collection) -> io::Result<Option<String>> {
        match fs::read_to_string(self.path(collection)).await {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn save(&self, collection: Collection, contents: &str) -> io::Result<()> {
        let path = self.path(collection);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.ok();
        }
        fs::write(path, contents).await
    }
}
