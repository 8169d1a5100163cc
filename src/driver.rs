// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

//! The seam between the safe device model and the camera library.
//!
//! [`Driver`] and [`Device`] are implemented by the libgphoto2 backend in
//! [`crate::native`] and, with the `mock` feature, by an in-memory device.

use crate::{
    abilities::Abilities,
    error::Result,
    storage::StorageInfo,
    widget::{Widget, WidgetValue},
};
use chrono::NaiveDateTime;
use gphoto2_sys as sys;
use serde::Serialize;

/// A camera as reported by detection: model name and port path.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DeviceEntry {
    pub model: String,
    pub port: String,
}

impl DeviceEntry {
    pub fn new(model: impl Into<String>, port: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            port: port.into(),
        }
    }
}

/// Which representation of a file to transfer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum FileType {
    Preview,
    Normal,
    Raw,
    Audio,
    Exif,
    Metadata,
}

impl FileType {
    pub fn raw(self) -> i32 {
        match self {
            FileType::Preview => sys::GP_FILE_TYPE_PREVIEW,
            FileType::Normal => sys::GP_FILE_TYPE_NORMAL,
            FileType::Raw => sys::GP_FILE_TYPE_RAW,
            FileType::Audio => sys::GP_FILE_TYPE_AUDIO,
            FileType::Exif => sys::GP_FILE_TYPE_EXIF,
            FileType::Metadata => sys::GP_FILE_TYPE_METADATA,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum CaptureKind {
    Image,
    Movie,
    Sound,
}

impl CaptureKind {
    pub fn raw(self) -> i32 {
        match self {
            CaptureKind::Image => sys::GP_CAPTURE_IMAGE,
            CaptureKind::Movie => sys::GP_CAPTURE_MOVIE,
            CaptureKind::Sound => sys::GP_CAPTURE_SOUND,
        }
    }
}

/// In-memory file buffer exchanged with the device.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CameraFile {
    pub name: String,
    pub file_type: FileType,
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl CameraFile {
    pub fn new(
        name: impl Into<String>,
        file_type: FileType,
        mime_type: impl Into<String>,
        data: Vec<u8>,
    ) -> Self {
        Self {
            name: name.into(),
            file_type,
            mime_type: mime_type.into(),
            data,
        }
    }
}

/// Information about a file on the device. Fields the device did not report
/// are `None`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct FileInfo {
    pub size: Option<u64>,
    pub mime_type: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub readable: Option<bool>,
    pub deletable: Option<bool>,
    pub modified: Option<NaiveDateTime>,
}

/// Where a capture landed on the device.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CapturePath {
    pub folder: String,
    pub name: String,
}

/// Session-level access to the camera library.
pub trait Driver {
    /// Enumerates attached cameras.
    fn detect(&self) -> Result<Vec<DeviceEntry>>;

    /// Looks up what `model` supports.
    fn abilities(&self, model: &str) -> Result<Abilities>;

    /// Opens and initialises the camera described by `entry`.
    fn open(&self, entry: &DeviceEntry) -> Result<Box<dyn Device>>;
}

/// An open camera handle.
///
/// Folder arguments are absolute device paths such as `/store_00010001/DCIM`.
pub trait Device {
    fn storages(&mut self) -> Result<Vec<StorageInfo>>;

    fn list_files(&mut self, folder: &str) -> Result<Vec<String>>;

    fn list_folders(&mut self, folder: &str) -> Result<Vec<String>>;

    fn get_file(&mut self, folder: &str, name: &str, file_type: FileType) -> Result<CameraFile>;

    /// Stores `file` in `folder` under `file.name`.
    fn put_file(&mut self, folder: &str, file: &CameraFile) -> Result<()>;

    fn delete_file(&mut self, folder: &str, name: &str) -> Result<()>;

    /// Deletes every file in `folder`, leaving subfolders.
    fn delete_all(&mut self, folder: &str) -> Result<()>;

    fn make_dir(&mut self, folder: &str, name: &str) -> Result<()>;

    fn remove_dir(&mut self, folder: &str, name: &str) -> Result<()>;

    fn file_info(&mut self, folder: &str, name: &str) -> Result<FileInfo>;

    fn capture(&mut self, kind: CaptureKind) -> Result<CapturePath>;

    fn summary(&mut self) -> Result<String>;

    fn config(&mut self) -> Result<Widget>;

    fn set_config(&mut self, name: &str, value: &WidgetValue) -> Result<()>;

    /// Closes the session with the camera. The handle is unusable afterwards.
    fn exit(&mut self) -> Result<()>;
}
