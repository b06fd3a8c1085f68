// SPDX-FileCopyrightText: 2026 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{error::Result, metadata};

use super::{IsPersistent, Storage};

/// Stores data as JSON in the user's data directory. The file is only
/// readable by its owner on platforms that support it, since it may hold
/// bearer tokens.
pub(crate) struct File {
    path: PathBuf,
}

impl File {
    pub(crate) fn new<P: AsRef<Path>>(file: P) -> Option<Self> {
        metadata::PROJECT_DIRS
            .as_ref()
            .map(|dirs| Self::at(dirs.data_dir().join(file)))
    }

    pub(crate) fn at<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }
}

impl IsPersistent for File {
    fn is_persistent(&self) -> bool {
        true
    }
}

// The mode only applies to newly created files, so a cache left behind with
// wider permissions is tightened as well.
fn create(path: &Path) -> io::Result<fs::File> {
    let mut options = fs::OpenOptions::new();
    let _ = options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt as _;
        let _ = options.mode(0o600);
    }
    let file = options.open(path)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt as _;
        file.set_permissions(fs::Permissions::from_mode(0o600))?;
    }
    Ok(file)
}

#[async_trait]
impl<T: Send + Serialize + Sync + for<'de> Deserialize<'de>> Storage<T> for File {
    async fn get(&mut self) -> Result<Option<T>> {
        match fs::File::open(&self.path) {
            Ok(fp) => Ok(Some(serde_json::from_reader::<fs::File, T>(fp)?)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn update(&mut self, data: &T) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = create(&self.path)?;
        serde_json::to_writer(file, data)?;
        Ok(())
    }

    async fn clear(&mut self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e.into()),
            Ok(()) | Err(_) => Ok(()),
        }
    }
}
