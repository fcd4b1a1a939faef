use std::{
    marker::PhantomData,
    path::{Path, PathBuf},
};

use serde::{de::DeserializeOwned, Serialize};
use tokio::fs;

use crate::errors::ServiceError;

/// Generic JSON file-backed list store.
///
/// The file holds a single JSON array. Every read parses the whole document
/// and every write replaces it; there is no in-memory cache, so the file is
/// the only state.
#[derive(Debug, Clone)]
pub struct JsonListStore<T> {
    file_path: PathBuf,
    _item: PhantomData<fn() -> T>,
}

impl<T> JsonListStore<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Open the store at `path`. Creates parent directories and an empty
    /// array document if the file is missing; an existing file is left as is.
    pub async fn open<P: Into<PathBuf>>(path: P) -> Result<Self, ServiceError> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(ServiceError::storage)?;
        }

        let store = Self { file_path, _item: PhantomData };
        if fs::metadata(&store.file_path).await.is_err() {
            store.write_all(&[]).await?;
        }
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Read and parse the whole document.
    pub async fn read_all(&self) -> Result<Vec<T>, ServiceError> {
        let bytes = fs::read(&self.file_path).await.map_err(ServiceError::storage)?;
        serde_json::from_slice(&bytes).map_err(ServiceError::storage)
    }

    /// Replace the document with `items`, pretty-printed.
    ///
    /// Writes a sibling `.tmp` file and renames it over the target so readers
    /// never observe a half-written document.
    pub async fn write_all(&self, items: &[T]) -> Result<(), ServiceError> {
        let data = serde_json::to_vec_pretty(items).map_err(ServiceError::storage)?;
        let tmp = self.tmp_path();
        fs::write(&tmp, data).await.map_err(ServiceError::storage)?;
        if let Err(e) = fs::rename(&tmp, &self.file_path).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(ServiceError::storage(e));
        }
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.file_path.clone().into_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }
}
