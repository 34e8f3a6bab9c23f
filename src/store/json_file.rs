// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Processos-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Processos and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::fs;
use std::io;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::model::Document;

#[derive(Debug)]
pub enum StoreError {
    Io {
        path: PathBuf,
        source: io::Error,
    },
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "io error at {path:?}: {source}"),
            Self::Json { path, source } => write!(f, "json error at {path:?}: {source}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum WriteDurability {
    /// Fast, best-effort persistence.
    ///
    /// - Writes a temp file and renames atomically into place.
    /// - Does not perform per-file fsync/sync.
    #[default]
    BestEffort,

    /// Slower, best-effort durability.
    ///
    /// Attempts to flush written file contents and rename operations to stable storage where
    /// possible. Exact guarantees are platform/filesystem-dependent.
    Durable,
}

/// File-backed store for the single process document.
///
/// `save` always overwrites the document in full; there are no partial or
/// merge writes. Sequential access is assumed (see the service layer); the
/// store itself takes no locks.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    durability: WriteDurability,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            durability: WriteDurability::default(),
        }
    }

    pub fn with_durability(mut self, durability: WriteDurability) -> Self {
        self.durability = durability;
        self
    }

    pub fn durability(&self) -> WriteDurability {
        self.durability
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Document, StoreError> {
        let contents = fs::read_to_string(&self.path).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;

        serde_json::from_str(&contents).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })
    }

    /// Loads the document, creating and persisting an empty one if the file
    /// does not exist yet. Any other failure propagates unchanged.
    pub fn load_or_init(&self) -> Result<Document, StoreError> {
        match self.load() {
            Ok(document) => Ok(document),
            Err(StoreError::Io { path, source })
                if source.kind() == io::ErrorKind::NotFound && path == self.path =>
            {
                let document = Document::empty();
                self.save(&document)?;
                Ok(document)
            }
            Err(err) => Err(err),
        }
    }

    pub fn save(&self, document: &Document) -> Result<(), StoreError> {
        let mut contents =
            serde_json::to_vec_pretty(document).map_err(|source| StoreError::Json {
                path: self.path.clone(),
                source,
            })?;
        contents.push(b'\n');

        self.write_atomic(&contents)
    }

    fn write_atomic(&self, contents: &[u8]) -> Result<(), StoreError> {
        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent).map_err(|source| StoreError::Io {
            path: parent.to_path_buf(),
            source,
        })?;

        let Some(file_name) = self.path.file_name() else {
            return Err(StoreError::Io {
                path: self.path.clone(),
                source: io::Error::other("path has no file name"),
            });
        };

        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        let tmp_path = parent.join(format!(
            ".processos.tmp.{}.{}",
            file_name.to_string_lossy(),
            nanos
        ));

        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&tmp_path)
            .map_err(|source| StoreError::Io {
                path: tmp_path.clone(),
                source,
            })?;

        file.write_all(contents).map_err(|source| StoreError::Io {
            path: tmp_path.clone(),
            source,
        })?;

        if self.durability == WriteDurability::Durable {
            file.sync_all().map_err(|source| StoreError::Io {
                path: tmp_path.clone(),
                source,
            })?;
        }
        drop(file);

        if let Err(source) = rename_overwrite(&tmp_path, &self.path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(StoreError::Io {
                path: self.path.clone(),
                source,
            });
        }

        if self.durability == WriteDurability::Durable {
            #[cfg(unix)]
            {
                let dir = fs::File::open(parent).map_err(|source| StoreError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
                dir.sync_all().map_err(|source| StoreError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        Ok(())
    }
}

fn rename_overwrite(from: &Path, to: &Path) -> io::Result<()> {
    #[cfg(windows)]
    {
        match fs::rename(from, to) {
            Ok(()) => Ok(()),
            Err(err)
                if matches!(
                    err.kind(),
                    io::ErrorKind::AlreadyExists | io::ErrorKind::PermissionDenied
                ) =>
            {
                let _ = fs::remove_file(to);
                fs::rename(from, to)
            }
            Err(err) => Err(err),
        }
    }

    #[cfg(not(windows))]
    {
        fs::rename(from, to)
    }
}
