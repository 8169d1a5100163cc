// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

//! In-memory camera for exercising the library without hardware.
//!
//! The device tree and counters live in a shared [`MockState`], so a test
//! can inspect what the library did through [`MockDriver::state`].
//!
//! # Example
//!
//! ```
//! use gphoto2_fs::{mock::MockDriver, Abilities, Camera, DeviceEntry, Driver, StorageInfo};
//! use std::rc::Rc;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mock = MockDriver::new()
//!     .with_camera(DeviceEntry::new("ModelA", "usb:001,002"), Abilities::new("ModelA", 1, 2))
//!     .with_storage(StorageInfo { base: Some("/store_1".into()), ..Default::default() })
//!     .with_file("/store_1/DCIM", "a.jpg", b"jpeg".to_vec(), "<Width>640</Width>");
//! let driver: Rc<dyn Driver> = Rc::new(mock);
//!
//! let mut camera = Camera::detect(&driver)?.remove(0);
//! camera.connect()?;
//! assert_eq!(camera.filesystems()[0].count("", true)?, 1);
//! # Ok(())
//! # }
//! ```

use crate::{
    abilities::Abilities,
    driver::{CameraFile, CaptureKind, CapturePath, Device, DeviceEntry, Driver, FileInfo, FileType},
    error::{Error, ErrorCode, Result},
    mime,
    path::{combine, split_parent, SEPARATOR},
    storage::StorageInfo,
    widget::{Widget, WidgetKind, WidgetValue},
};
use std::{
    cell::RefCell,
    collections::{BTreeMap, BTreeSet},
    rc::Rc,
};
use tracing::debug;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MockFile {
    pub data: Vec<u8>,
    pub metadata: String,
    pub mime_type: String,
}

/// Everything the mock camera knows. Paths are absolute device paths.
#[derive(Debug)]
pub struct MockState {
    pub storages: Vec<StorageInfo>,
    pub folders: BTreeSet<String>,
    pub files: BTreeMap<(String, String), MockFile>,
    pub config: Widget,
    /// Makes `storages()` fail with this code.
    pub fail_storages: Option<ErrorCode>,
    /// Makes `list_files`/`list_folders` fail for this folder.
    pub fail_listing: Option<(String, ErrorCode)>,
    pub opens: usize,
    pub exits: usize,
    pub captures: usize,
}

impl Default for MockState {
    fn default() -> Self {
        Self {
            storages: Vec::new(),
            folders: BTreeSet::new(),
            files: BTreeMap::new(),
            config: default_config(),
            fail_storages: None,
            fail_listing: None,
            opens: 0,
            exits: 0,
            captures: 0,
        }
    }
}

fn default_config() -> Widget {
    let mut serial = Widget::new("serialnumber", WidgetKind::Text)
        .with_value(WidgetValue::Text("0000001".into()));
    serial.readonly = true;

    Widget::new("main", WidgetKind::Window)
        .with_child(
            Widget::new("settings", WidgetKind::Section)
                .with_child(
                    Widget::new("owner", WidgetKind::Text)
                        .with_value(WidgetValue::Text(String::new())),
                )
                .with_child(Widget::new("beep", WidgetKind::Toggle).with_value(WidgetValue::Int(0))),
        )
        .with_child(Widget::new("status", WidgetKind::Section).with_child(serial))
}

fn normalize(folder: &str) -> String {
    let trimmed = folder.trim_end_matches(SEPARATOR);
    if trimmed.is_empty() {
        SEPARATOR.to_string()
    } else {
        trimmed.to_string()
    }
}

impl MockState {
    /// Adds `folder` and all its ancestors.
    pub fn add_folder(&mut self, folder: &str) {
        let mut current = String::new();
        for part in crate::path::components(folder) {
            current = combine(&current, part);
            self.folders.insert(current.clone());
        }
    }

    pub fn file(&self, folder: &str, name: &str) -> Option<&MockFile> {
        self.files.get(&(normalize(folder), name.to_string()))
    }

    fn require_folder(&self, folder: &str) -> Result<String> {
        let folder = normalize(folder);
        if self.folders.contains(&folder) {
            Ok(folder)
        } else {
            Err(Error::native(ErrorCode::DirectoryNotFound))
        }
    }

    fn check_listing(&self, folder: &str) -> Result<()> {
        match &self.fail_listing {
            Some((failing, code)) if normalize(failing) == folder => Err(Error::native(*code)),
            _ => Ok(()),
        }
    }

    fn children(&self, folder: &str) -> Vec<String> {
        self.folders
            .iter()
            .filter_map(|candidate| {
                let (parent, name) = split_parent(candidate);
                let parent = if parent.is_empty() { "/" } else { parent };
                (parent == folder).then(|| name.to_string())
            })
            .collect()
    }
}

/// A [`Driver`] serving cameras from memory.
#[derive(Default)]
pub struct MockDriver {
    cameras: Vec<(DeviceEntry, Abilities)>,
    state: Rc<RefCell<MockState>>,
}

impl MockDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a detection entry. Entries for the same model share the
    /// same device tree.
    pub fn with_camera(mut self, entry: DeviceEntry, abilities: Abilities) -> Self {
        self.cameras.push((entry, abilities));
        self
    }

    /// Adds a storage and its base folder.
    pub fn with_storage(self, storage: StorageInfo) -> Self {
        {
            let mut state = self.state.borrow_mut();
            state.add_folder(storage.base_dir());
            state.storages.push(storage);
        }
        self
    }

    pub fn with_folder(self, folder: &str) -> Self {
        self.state.borrow_mut().add_folder(folder);
        self
    }

    /// Adds a file (and its folder) with the given body and metadata fragment.
    pub fn with_file(self, folder: &str, name: &str, data: Vec<u8>, metadata: &str) -> Self {
        {
            let mut state = self.state.borrow_mut();
            state.add_folder(folder);
            state.files.insert(
                (normalize(folder), name.to_string()),
                MockFile {
                    data,
                    metadata: metadata.to_string(),
                    mime_type: mime::guess(name).to_string(),
                },
            );
        }
        self
    }

    pub fn state(&self) -> Rc<RefCell<MockState>> {
        Rc::clone(&self.state)
    }
}

impl Driver for MockDriver {
    fn detect(&self) -> Result<Vec<DeviceEntry>> {
        Ok(self.cameras.iter().map(|(entry, _)| entry.clone()).collect())
    }

    fn abilities(&self, model: &str) -> Result<Abilities> {
        self.cameras
            .iter()
            .find(|(entry, _)| entry.model == model)
            .map(|(_, abilities)| abilities.clone())
            .ok_or_else(|| Error::native(ErrorCode::ModelNotFound))
    }

    fn open(&self, entry: &DeviceEntry) -> Result<Box<dyn Device>> {
        self.abilities(&entry.model)?;
        self.state.borrow_mut().opens += 1;
        debug!("mock open {} on {}", entry.model, entry.port);
        Ok(Box::new(MockDevice {
            state: Rc::clone(&self.state),
            model: entry.model.clone(),
            open: true,
        }))
    }
}

/// A [`Device`] over a shared [`MockState`].
pub struct MockDevice {
    state: Rc<RefCell<MockState>>,
    model: String,
    open: bool,
}

impl MockDevice {
    fn state(&self) -> Result<std::cell::RefMut<'_, MockState>> {
        if !self.open {
            return Err(Error::native(ErrorCode::General));
        }
        Ok(self.state.borrow_mut())
    }
}

impl Device for MockDevice {
    fn storages(&mut self) -> Result<Vec<StorageInfo>> {
        let state = self.state()?;
        if let Some(code) = state.fail_storages {
            return Err(Error::native(code));
        }
        Ok(state.storages.clone())
    }

    fn list_files(&mut self, folder: &str) -> Result<Vec<String>> {
        let state = self.state()?;
        let folder = state.require_folder(folder)?;
        state.check_listing(&folder)?;
        Ok(state
            .files
            .keys()
            .filter(|(parent, _)| *parent == folder)
            .map(|(_, name)| name.clone())
            .collect())
    }

    fn list_folders(&mut self, folder: &str) -> Result<Vec<String>> {
        let state = self.state()?;
        let folder = state.require_folder(folder)?;
        state.check_listing(&folder)?;
        Ok(state.children(&folder))
    }

    fn get_file(&mut self, folder: &str, name: &str, file_type: FileType) -> Result<CameraFile> {
        let state = self.state()?;
        let folder = state.require_folder(folder)?;
        let file = state
            .files
            .get(&(folder, name.to_string()))
            .ok_or_else(|| Error::native(ErrorCode::FileNotFound))?;
        let data = match file_type {
            FileType::Normal => file.data.clone(),
            FileType::Metadata => file.metadata.clone().into_bytes(),
            _ => return Err(Error::native(ErrorCode::NotSupported)),
        };
        Ok(CameraFile::new(name, file_type, file.mime_type.clone(), data))
    }

    fn put_file(&mut self, folder: &str, file: &CameraFile) -> Result<()> {
        let mut state = self.state()?;
        let folder = state.require_folder(folder)?;
        let key = (folder, file.name.clone());
        match file.file_type {
            FileType::Normal => {
                let entry = state.files.entry(key).or_default();
                entry.data = file.data.clone();
                entry.mime_type = file.mime_type.clone();
            }
            FileType::Metadata => {
                let entry = state
                    .files
                    .get_mut(&key)
                    .ok_or_else(|| Error::native(ErrorCode::FileNotFound))?;
                entry.metadata = String::from_utf8_lossy(&file.data).into_owned();
            }
            _ => return Err(Error::native(ErrorCode::NotSupported)),
        }
        Ok(())
    }

    fn delete_file(&mut self, folder: &str, name: &str) -> Result<()> {
        let mut state = self.state()?;
        let folder = state.require_folder(folder)?;
        state
            .files
            .remove(&(folder, name.to_string()))
            .map(|_| ())
            .ok_or_else(|| Error::native(ErrorCode::FileNotFound))
    }

    fn delete_all(&mut self, folder: &str) -> Result<()> {
        let mut state = self.state()?;
        let folder = state.require_folder(folder)?;
        state.files.retain(|(parent, _), _| *parent != folder);
        Ok(())
    }

    fn make_dir(&mut self, folder: &str, name: &str) -> Result<()> {
        let mut state = self.state()?;
        let folder = state.require_folder(folder)?;
        let path = combine(&folder, name);
        if !state.folders.insert(path) {
            return Err(Error::native(ErrorCode::DirectoryExists));
        }
        Ok(())
    }

    fn remove_dir(&mut self, folder: &str, name: &str) -> Result<()> {
        let mut state = self.state()?;
        let folder = state.require_folder(folder)?;
        let path = state.require_folder(&combine(&folder, name))?;
        let has_files = state.files.keys().any(|(parent, _)| *parent == path);
        if has_files || !state.children(&path).is_empty() {
            return Err(Error::native(ErrorCode::General));
        }
        state.folders.remove(&path);
        Ok(())
    }

    fn file_info(&mut self, folder: &str, name: &str) -> Result<FileInfo> {
        let state = self.state()?;
        let folder = state.require_folder(folder)?;
        let file = state
            .files
            .get(&(folder, name.to_string()))
            .ok_or_else(|| Error::native(ErrorCode::FileNotFound))?;
        Ok(FileInfo {
            size: Some(file.data.len() as u64),
            mime_type: Some(file.mime_type.clone()),
            readable: Some(true),
            deletable: Some(true),
            ..Default::default()
        })
    }

    fn capture(&mut self, kind: CaptureKind) -> Result<CapturePath> {
        let mut state = self.state()?;
        if kind != CaptureKind::Image {
            return Err(Error::native(ErrorCode::NotSupported));
        }
        let folder = state
            .storages
            .first()
            .map(|storage| normalize(storage.base_dir()))
            .ok_or_else(|| Error::native(ErrorCode::NoSpace))?;
        state.captures += 1;
        let name = format!("capt{:04}.jpg", state.captures);
        state.files.insert(
            (folder.clone(), name.clone()),
            MockFile {
                data: vec![0xff, 0xd8, 0xff, 0xd9],
                metadata: String::new(),
                mime_type: mime::JPEG.to_string(),
            },
        );
        Ok(CapturePath { folder, name })
    }

    fn summary(&mut self) -> Result<String> {
        let state = self.state()?;
        Ok(format!(
            "Model: {}\nStorages: {}\n",
            self.model,
            state.storages.len()
        ))
    }

    fn config(&mut self) -> Result<Widget> {
        Ok(self.state()?.config.clone())
    }

    fn set_config(&mut self, name: &str, value: &WidgetValue) -> Result<()> {
        let mut state = self.state()?;
        let widget = state
            .config
            .find_mut(name)
            .ok_or_else(|| Error::native(ErrorCode::BadParameters))?;
        if widget.readonly || widget.kind.is_container() {
            return Err(Error::native(ErrorCode::NotSupported));
        }
        widget.value = value.clone();
        Ok(())
    }

    fn exit(&mut self) -> Result<()> {
        if !self.open {
            return Ok(());
        }
        self.open = false;
        self.state.borrow_mut().exits += 1;
        Ok(())
    }
}
