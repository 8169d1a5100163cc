// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

use super::{File, TypedFile};
use crate::{
    camera::Camera,
    error::{Error, Result},
    path::split_device_path,
};

/// A `.zpl` playlist. Its body lists one full device path per line.
#[derive(Clone, Debug)]
pub struct PlaylistFile {
    file: File,
    paths: Vec<String>,
}

impl PlaylistFile {
    pub fn new(file: File, body: &str) -> Self {
        let paths = body
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        Self { file, paths }
    }

    pub fn file(&self) -> &File {
        &self.file
    }

    pub fn file_mut(&mut self) -> &mut File {
        &mut self.file
    }

    pub fn into_file(self) -> File {
        self.file
    }

    pub fn name(&self) -> &str {
        self.file.get_str("Name")
    }

    pub fn set_name(&mut self, name: &str) {
        self.file.set_str("Name", name);
    }

    /// Full device paths of the entries, in playlist order.
    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    /// Looks every entry up on `camera`.
    ///
    /// Entries that are playlists themselves are returned without their own
    /// entries.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownStorage`] when an entry names a storage the
    /// camera does not have, and any device error raised while reading an
    /// entry.
    pub fn entries(&self, camera: &Camera) -> Result<Vec<TypedFile>> {
        self.paths
            .iter()
            .map(|path| {
                let parts = split_device_path(path).ok_or_else(|| {
                    Error::InvalidArgument(format!("`{path}` is not a full device path"))
                })?;
                let fs = camera
                    .filesystem_for_base(&parts.storage)
                    .ok_or_else(|| Error::UnknownStorage(parts.storage.clone()))?;
                let file = fs.file_untyped(&parts.directory, &parts.filename)?;
                Ok(TypedFile::classify(file))
            })
            .collect()
    }
}
