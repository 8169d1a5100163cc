// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

use crate::{
    camera::Camera,
    driver::{CameraFile, FileType},
    error::{Error, ErrorCode, Result},
    file::{File, Origin, TypedFile},
    mime::FileKind,
    path::{self, combine, split_parent},
    storage::StorageInfo,
    walk::Walk,
};
use std::{fs, io::Write};
use tracing::{debug, info};

/// One storage of a connected camera.
///
/// Directory arguments are relative to the storage base directory; "" is the
/// storage root. Every call goes to the device; nothing is cached.
#[derive(Clone, Copy, Debug)]
pub struct FileSystem<'a> {
    camera: &'a Camera,
    storage: &'a StorageInfo,
}

impl<'a> FileSystem<'a> {
    pub(crate) fn new(camera: &'a Camera, storage: &'a StorageInfo) -> Self {
        Self { camera, storage }
    }

    pub fn camera(&self) -> &'a Camera {
        self.camera
    }

    pub fn storage(&self) -> &'a StorageInfo {
        self.storage
    }

    pub fn base_dir(&self) -> &'a str {
        self.storage.base_dir()
    }

    pub fn label(&self) -> &'a str {
        self.storage.label.as_deref().unwrap_or("")
    }

    pub fn description(&self) -> &'a str {
        self.storage.description.as_deref().unwrap_or("")
    }

    /// Capacity in bytes, 0 when unknown.
    pub fn capacity(&self) -> u64 {
        self.storage.capacity.unwrap_or(0)
    }

    /// Free space in bytes, 0 when unknown.
    pub fn free_space(&self) -> u64 {
        self.storage.free_space.unwrap_or(0)
    }

    pub fn used_space(&self) -> u64 {
        self.storage.used_space().unwrap_or(0)
    }

    pub fn can_read(&self) -> bool {
        self.storage.can_read()
    }

    pub fn can_write(&self) -> bool {
        self.storage.can_write()
    }

    pub fn can_delete(&self) -> bool {
        self.storage.can_delete()
    }

    /// Absolute device path of `directory`.
    pub fn full_path(&self, directory: &str) -> String {
        combine(self.base_dir(), directory)
    }

    /// True when `directory` exists. Only "directory not found" is treated
    /// as absence; other errors are returned.
    pub fn contains_directory(&self, directory: &str) -> Result<bool> {
        let folder = self.full_path(directory);
        match self.camera.with_device(|device| device.list_files(&folder)) {
            Ok(_) => Ok(true),
            Err(e) if e.is(ErrorCode::DirectoryNotFound) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// True when `filename` exists in `directory`.
    pub fn contains_file(&self, directory: &str, filename: &str) -> Result<bool> {
        if !self.contains_directory(directory)? {
            return Ok(false);
        }
        match self.file_untyped(directory, filename) {
            Ok(_) => Ok(true),
            Err(e) if e.is(ErrorCode::FileNotFound) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// True when `file` is stored on this storage.
    pub fn owns(&self, file: &File) -> bool {
        file.storage() == Some(self.base_dir())
    }

    /// Number of files in `directory`, and in all its subdirectories when
    /// `recursive` is set.
    pub fn count(&self, directory: &str, recursive: bool) -> Result<usize> {
        if !recursive {
            let folder = self.full_path(directory);
            return Ok(self.camera.with_device(|device| device.list_files(&folder))?.len());
        }
        self.walk(directory)
            .try_fold(0, |count, entry| entry.map(|_| count + 1))
    }

    /// Lazily walks `directory` depth-first. See [`Walk`].
    pub fn walk(&self, directory: &str) -> Walk<'a> {
        Walk::new(*self, directory)
    }

    /// Creates every missing component of `directory`.
    pub fn create_directory(&self, directory: &str) -> Result<()> {
        if path::components(directory).next().is_none() {
            return Err(Error::InvalidArgument(
                "directory cannot be empty".to_string(),
            ));
        }

        let mut current = String::new();
        for part in path::components(directory) {
            let next = combine(&current, part);
            if !self.contains_directory(&next)? {
                let parent = self.full_path(&current);
                debug!("mkdir {parent}/{part}");
                self.camera
                    .with_device(|device| device.make_dir(&parent, part))?;
            }
            current = next;
        }
        Ok(())
    }

    pub fn delete_file(&self, directory: &str, filename: &str) -> Result<()> {
        if filename.is_empty() {
            return Err(Error::InvalidArgument(
                "filename cannot be empty".to_string(),
            ));
        }
        let folder = self.full_path(directory);
        self.camera
            .with_device(|device| device.delete_file(&folder, filename))
    }

    /// Deletes `file` from this storage.
    pub fn delete(&self, file: &File) -> Result<()> {
        if file.is_local() {
            return Err(Error::LocalFile(file.filename().to_string()));
        }
        if !self.owns(file) {
            return Err(Error::InvalidArgument(format!(
                "{} is not stored on {}",
                file.filename(),
                self.base_dir()
            )));
        }
        self.delete_file(file.directory(), file.filename())
    }

    /// Deletes every file in `folder`. With `remove_folder`, the (now
    /// empty) folder is removed too; the storage root is never removed.
    pub fn delete_all(&self, folder: &str, remove_folder: bool) -> Result<()> {
        let full = self.full_path(folder);
        self.camera.with_device(|device| device.delete_all(&full))?;

        if !remove_folder || path::components(folder).next().is_none() {
            return Ok(());
        }

        let (parent, name) = split_parent(full.trim_end_matches(path::SEPARATOR));
        self.camera
            .with_device(|device| device.remove_dir(parent, name))
    }

    /// Reads `filename` in `directory` and wraps it by type. Playlists get
    /// their entry list from the file body.
    pub fn file(&self, directory: &str, filename: &str) -> Result<TypedFile> {
        if filename.is_empty() {
            return Err(Error::InvalidArgument(
                "filename cannot be empty".to_string(),
            ));
        }
        let file = self.file_untyped(directory, filename)?;
        if file.kind() == FileKind::Playlist {
            let body = self.download(&file)?;
            return Ok(TypedFile::with_playlist_body(
                file,
                &String::from_utf8_lossy(&body),
            ));
        }
        Ok(TypedFile::classify(file))
    }

    /// Reads `filename` in `directory` without looking at its body.
    pub fn file_untyped(&self, directory: &str, filename: &str) -> Result<File> {
        let base = self.base_dir();
        self.camera
            .with_device(|device| File::from_device(device, base, directory, filename))
    }

    /// Every file directly in `directory`.
    pub fn files(&self, directory: &str) -> Result<Vec<TypedFile>> {
        let folder = self.full_path(directory);
        let names = self.camera.with_device(|device| device.list_files(&folder))?;
        names
            .iter()
            .map(|name| self.file(directory, name))
            .collect()
    }

    /// Names of the folders directly in `directory`.
    pub fn folders(&self, directory: &str) -> Result<Vec<String>> {
        let folder = self.full_path(directory);
        self.camera.with_device(|device| device.list_folders(&folder))
    }

    /// Reads the whole content of a device file.
    pub fn download(&self, file: &File) -> Result<Vec<u8>> {
        let Origin::Device { storage } = file.origin() else {
            return Err(Error::LocalFile(file.filename().to_string()));
        };
        let folder = combine(storage, file.directory());
        let data = self.camera.with_device(|device| {
            device.get_file(&folder, file.filename(), FileType::Normal)
        })?;
        Ok(data.data)
    }

    /// Writes the content of a device file to `writer`, returning the number
    /// of bytes written.
    pub fn download_to<W: Write>(&self, file: &File, writer: &mut W) -> Result<u64> {
        let data = self.download(file)?;
        writer.write_all(&data)?;
        Ok(data.len() as u64)
    }

    /// Writes a dirty file's metadata back to the device. Clean files are
    /// left alone.
    pub fn update(&self, file: &mut File) -> Result<()> {
        let Origin::Device { storage } = file.origin() else {
            return Err(Error::LocalFile(file.filename().to_string()));
        };
        if !file.is_dirty() {
            return Ok(());
        }

        let folder = combine(storage, file.directory());
        let metadata = CameraFile::new(
            file.filename(),
            FileType::Metadata,
            file.mime_type(),
            file.metadata().to_xml().into_bytes(),
        );
        self.camera
            .with_device(|device| device.put_file(&folder, &metadata))?;
        file.mark_clean();
        debug!("{folder}/{}: metadata updated", file.filename());
        Ok(())
    }

    /// Copies a local file to `directory`/`filename`, creating the directory
    /// when needed, and returns the device copy.
    ///
    /// The returned file carries the local metadata and size, as the device
    /// may not report them until it re-indexes.
    pub fn upload(&self, file: &File, directory: &str, filename: &str) -> Result<TypedFile> {
        if filename.is_empty() {
            return Err(Error::InvalidArgument(
                "filename cannot be empty".to_string(),
            ));
        }
        let Origin::Local(local) = file.origin() else {
            return Err(Error::InvalidArgument(format!(
                "{} is already on a device",
                file.filename()
            )));
        };

        if path::components(directory).next().is_some() && !self.contains_directory(directory)? {
            self.create_directory(directory)?;
        }

        let data = fs::read(local)?;
        let folder = self.full_path(directory);
        let normal = CameraFile::new(filename, FileType::Normal, file.mime_type(), data);
        let metadata = CameraFile::new(
            filename,
            FileType::Metadata,
            file.mime_type(),
            file.metadata().to_xml().into_bytes(),
        );
        self.camera.with_device(|device| {
            device.put_file(&folder, &normal)?;
            device.put_file(&folder, &metadata)
        })?;
        info!("uploaded {} to {folder}/{filename}", local.display());

        let mut uploaded = self.file_untyped(directory, filename)?;
        uploaded.adopt(file);
        if uploaded.kind() == FileKind::Playlist {
            return Ok(TypedFile::with_playlist_body(
                uploaded,
                &String::from_utf8_lossy(&normal.data),
            ));
        }
        Ok(TypedFile::classify(uploaded))
    }

    /// True when `file` fits in the free space of this storage.
    pub fn can_upload(&self, file: &File) -> bool {
        self.free_space() > file.size()
    }
}
