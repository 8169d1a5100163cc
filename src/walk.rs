// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

use crate::{error::Result, filesystem::FileSystem, path::combine};
use serde::Serialize;
use std::collections::VecDeque;
use tracing::debug;

/// A file found by [`Walk`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct WalkEntry {
    /// Directory relative to the storage base.
    pub directory: String,
    pub filename: String,
}

impl WalkEntry {
    /// Path relative to the storage base.
    pub fn path(&self) -> String {
        combine(&self.directory, &self.filename)
    }
}

/// Depth-first walk over a storage directory tree.
///
/// Only one directory listing is held at a time. The files of a directory
/// are yielded before anything below its subfolders. A listing error is
/// yielded once and the walk moves on to the next pending directory.
pub struct Walk<'a> {
    fs: FileSystem<'a>,
    pending: Vec<String>,
    files: VecDeque<WalkEntry>,
}

impl<'a> Walk<'a> {
    pub(crate) fn new(fs: FileSystem<'a>, directory: &str) -> Self {
        Self {
            fs,
            pending: vec![directory.to_string()],
            files: VecDeque::new(),
        }
    }

    fn visit(&mut self, directory: String) -> Result<()> {
        let folder = self.fs.full_path(&directory);
        let camera = self.fs.camera();
        debug!("walking {folder}");

        let names = camera.with_device(|device| device.list_files(&folder))?;
        self.files.extend(names.into_iter().map(|filename| WalkEntry {
            directory: directory.clone(),
            filename,
        }));

        let folders = camera.with_device(|device| device.list_folders(&folder))?;
        // Reversed so the first folder is visited first.
        self.pending.extend(
            folders
                .iter()
                .rev()
                .map(|name| combine(&directory, name)),
        );
        Ok(())
    }
}

impl Iterator for Walk<'_> {
    type Item = Result<WalkEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(entry) = self.files.pop_front() {
                return Some(Ok(entry));
            }
            let directory = self.pending.pop()?;
            if let Err(e) = self.visit(directory) {
                return Some(Err(e));
            }
        }
    }
}
