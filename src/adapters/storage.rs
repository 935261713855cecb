use crate::domain::ports::SiteFiles;
use crate::utils::error::{Result, SiteError};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Serves files from a directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct LocalSite {
    root: PathBuf,
}

impl LocalSite {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl SiteFiles for LocalSite {
    async fn read(&self, relative_path: &str) -> Result<Vec<u8>> {
        let full_path = self.root.join(relative_path.trim_start_matches('/'));

        let metadata = match tokio::fs::metadata(&full_path).await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(SiteError::NotFound {
                    path: relative_path.to_string(),
                })
            }
            Err(e) => {
                tracing::warn!("stat failed for {}: {}", full_path.display(), e);
                return Err(SiteError::FileReadError {
                    path: relative_path.to_string(),
                });
            }
        };

        if metadata.is_dir() {
            return Err(SiteError::NotFound {
                path: relative_path.to_string(),
            });
        }

        tokio::fs::read(&full_path).await.map_err(|e| {
            tracing::warn!("read failed for {}: {}", full_path.display(), e);
            match e.kind() {
                ErrorKind::NotFound => SiteError::NotFound {
                    path: relative_path.to_string(),
                },
                _ => SiteError::FileReadError {
                    path: relative_path.to_string(),
                },
            }
        })
    }
}
