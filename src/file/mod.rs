// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

//! Files on a device (or on the local disk, ready to be uploaded) and the
//! typed views over their metadata.

mod generic;
mod image;
mod music;
mod playlist;

pub use generic::GenericFile;
pub use image::ImageFile;
pub use music::MusicFile;
pub use playlist::PlaylistFile;

use crate::{
    driver::{Device, FileType},
    error::{Error, Result},
    metadata::Metadata,
    mime::{self, FileKind},
    path,
};
use chrono::NaiveDateTime;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::debug;

/// Where a [`File`] lives.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Origin {
    /// On the local filesystem at the given path.
    Local(PathBuf),
    /// On the device, in the storage with this base directory.
    Device { storage: String },
}

/// A file and its metadata.
///
/// Setters only touch the in-memory metadata and mark the file dirty when
/// a value actually changes; [`crate::FileSystem::update`] writes it back.
#[derive(Clone, Debug)]
pub struct File {
    directory: String,
    filename: String,
    mime_type: &'static str,
    metadata: Metadata,
    size: u64,
    dirty: bool,
    origin: Origin,
}

impl File {
    /// A file on the local disk. Its metadata starts empty.
    pub fn local(path: impl AsRef<Path>) -> Result<File> {
        let path = path.as_ref();
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| Error::InvalidArgument(format!("{} has no file name", path.display())))?;
        let directory = path
            .parent()
            .map(|parent| parent.to_string_lossy().into_owned())
            .unwrap_or_default();
        let size = fs::metadata(path)?.len();

        Ok(File {
            mime_type: mime::guess(&filename),
            directory,
            filename,
            metadata: Metadata::new(),
            size,
            dirty: false,
            origin: Origin::Local(path.to_path_buf()),
        })
    }

    /// Reads a device file's metadata and size.
    ///
    /// `directory` is relative to the storage base `storage`.
    pub(crate) fn from_device(
        device: &mut dyn Device,
        storage: &str,
        directory: &str,
        filename: &str,
    ) -> Result<File> {
        let folder = path::combine(storage, directory);
        let raw = device.get_file(&folder, filename, FileType::Metadata)?;
        let metadata = Metadata::parse(&String::from_utf8_lossy(&raw.data));
        let size = device.file_info(&folder, filename)?.size.unwrap_or(0);
        debug!("{folder}/{filename}: {} metadata entries, {size} bytes", metadata.len());

        Ok(File {
            directory: directory.to_string(),
            filename: filename.to_string(),
            mime_type: mime::guess(filename),
            metadata,
            size,
            dirty: false,
            origin: Origin::Device {
                storage: storage.to_string(),
            },
        })
    }

    /// Directory of the file: relative to the storage for device files,
    /// the parent directory for local files.
    pub fn directory(&self) -> &str {
        &self.directory
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn mime_type(&self) -> &'static str {
        self.mime_type
    }

    pub fn kind(&self) -> FileKind {
        FileKind::classify(&self.filename)
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Size in bytes.
    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn is_local(&self) -> bool {
        matches!(self.origin, Origin::Local(_))
    }

    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    /// Base directory of the storage holding a device file.
    pub fn storage(&self) -> Option<&str> {
        match &self.origin {
            Origin::Device { storage } => Some(storage),
            Origin::Local(_) => None,
        }
    }

    /// Full device path, e.g. `/store_00010001/Music/track.mp3`.
    pub fn device_path(&self) -> Option<String> {
        let storage = self.storage()?;
        Some(path::combine(
            &path::combine(storage, &self.directory),
            &self.filename,
        ))
    }

    pub fn get_str(&self, key: &str) -> &str {
        self.metadata.get_str(key)
    }

    pub fn get_int(&self, key: &str) -> i64 {
        self.metadata.get_int(key)
    }

    pub fn get_date(&self, key: &str) -> Option<NaiveDateTime> {
        self.metadata.get_date(key)
    }

    pub fn set_str(&mut self, key: &str, value: impl Into<String>) {
        if self.metadata.set(key, value) {
            self.dirty = true;
        }
    }

    pub fn set_int(&mut self, key: &str, value: i64) {
        self.set_str(key, value.to_string());
    }

    pub fn date_added(&self) -> Option<NaiveDateTime> {
        self.get_date("DateAdded")
    }

    pub fn date_created(&self) -> Option<NaiveDateTime> {
        self.get_date("DateCreated")
    }

    pub fn date_modified(&self) -> Option<NaiveDateTime> {
        self.get_date("DateModified")
    }

    pub fn last_played(&self) -> Option<NaiveDateTime> {
        self.get_date("LastAccessed")
    }

    pub fn rating(&self) -> i64 {
        self.get_int("Rating")
    }

    pub fn set_rating(&mut self, rating: i64) {
        self.set_int("Rating", rating);
    }

    pub(crate) fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Carries an uploaded file's local metadata and size over to its device
    /// counterpart; devices report neither until they re-index.
    pub(crate) fn adopt(&mut self, source: &File) {
        self.metadata = source.metadata.clone();
        self.size = source.size;
    }
}

/// A file viewed through the accessors matching its type.
#[derive(Clone, Debug)]
pub enum TypedFile {
    Music(MusicFile),
    Image(ImageFile),
    Playlist(PlaylistFile),
    Generic(GenericFile),
}

impl TypedFile {
    /// Wraps `file` by its filename. Playlists get no entries; use
    /// [`TypedFile::with_playlist_body`] when the body is known.
    pub fn classify(file: File) -> TypedFile {
        Self::with_playlist_body(file, "")
    }

    pub fn with_playlist_body(file: File, body: &str) -> TypedFile {
        match file.kind() {
            FileKind::Music => TypedFile::Music(MusicFile::new(file)),
            FileKind::Image => TypedFile::Image(ImageFile::new(file)),
            FileKind::Playlist => TypedFile::Playlist(PlaylistFile::new(file, body)),
            FileKind::Generic => TypedFile::Generic(GenericFile::new(file)),
        }
    }

    /// A local file, typed by its name. A local playlist's body is read from
    /// disk.
    pub fn local(path: impl AsRef<Path>) -> Result<TypedFile> {
        let path = path.as_ref();
        let file = File::local(path)?;
        if file.kind() == FileKind::Playlist {
            let body = fs::read_to_string(path)?;
            return Ok(TypedFile::with_playlist_body(file, &body));
        }
        Ok(TypedFile::classify(file))
    }

    pub fn file(&self) -> &File {
        match self {
            TypedFile::Music(f) => f.file(),
            TypedFile::Image(f) => f.file(),
            TypedFile::Playlist(f) => f.file(),
            TypedFile::Generic(f) => f.file(),
        }
    }

    pub fn file_mut(&mut self) -> &mut File {
        match self {
            TypedFile::Music(f) => f.file_mut(),
            TypedFile::Image(f) => f.file_mut(),
            TypedFile::Playlist(f) => f.file_mut(),
            TypedFile::Generic(f) => f.file_mut(),
        }
    }

    pub fn into_file(self) -> File {
        match self {
            TypedFile::Music(f) => f.into_file(),
            TypedFile::Image(f) => f.into_file(),
            TypedFile::Playlist(f) => f.into_file(),
            TypedFile::Generic(f) => f.into_file(),
        }
    }

    pub fn kind(&self) -> FileKind {
        match self {
            TypedFile::Music(_) => FileKind::Music,
            TypedFile::Image(_) => FileKind::Image,
            TypedFile::Playlist(_) => FileKind::Playlist,
            TypedFile::Generic(_) => FileKind::Generic,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_local_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Song.MP3");
        fs::File::create(&path)
            .unwrap()
            .write_all(&[0u8; 1234])
            .unwrap();

        let file = File::local(&path).unwrap();
        assert!(file.is_local());
        assert_eq!(file.filename(), "Song.MP3");
        assert_eq!(file.size(), 1234);
        assert_eq!(file.mime_type(), mime::MP3);
        assert_eq!(file.kind(), FileKind::Music);
        assert!(file.metadata().is_empty());
        assert_eq!(file.storage(), None);
        assert_eq!(file.device_path(), None);
        assert!(!file.is_dirty());
    }

    #[test]
    fn test_local_missing() {
        assert!(matches!(
            File::local("/nonexistent/dir/file.jpg"),
            Err(Error::Io(_))
        ));
    }

    #[test]
    fn test_dirty_only_on_change() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        fs::write(&path, b"hello").unwrap();

        let mut file = File::local(&path).unwrap();
        file.set_rating(3);
        assert!(file.is_dirty());
        assert_eq!(file.rating(), 3);

        file.mark_clean();
        file.set_rating(3);
        assert!(!file.is_dirty());
        file.set_str("Rating", "4");
        assert!(file.is_dirty());
    }

    #[test]
    fn test_local_playlist_body() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mix.zpl");
        fs::write(&path, "/store_1/Music/a.mp3\n\n/store_1/b.mp3\n").unwrap();

        match TypedFile::local(&path).unwrap() {
            TypedFile::Playlist(playlist) => {
                assert_eq!(playlist.paths(), ["/store_1/Music/a.mp3", "/store_1/b.mp3"]);
            }
            other => panic!("expected a playlist, got {:?}", other.kind()),
        }
    }
}
