// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

//! # gphoto2-fs
//!
//! A safe device and filesystem model over libgphoto2 for MTP/PTP cameras
//! and media players.
//!
//! ## Features
//!
//! - **Detection**: Enumerate attached cameras, with duplicate generic `usb:`
//!   entries removed and USB bus/device numbers decoded.
//! - **Session Lifecycle**: Connect, disconnect and reconnect with the native
//!   handle released exactly once.
//! - **Filesystems**: One [`FileSystem`] per storage volume with listing,
//!   counting, lazy recursive walks, directory creation, deletion, download
//!   and upload.
//! - **Typed Files**: Music, image and playlist views over the object
//!   properties the device reports for each file.
//! - **Configuration**: Read and write the camera's configuration widgets.
//!
//! ## Example
//!
//! ```no_run
//! use gphoto2_fs::{native::Gphoto2Driver, Camera, Driver, TypedFile};
//! use std::rc::Rc;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let driver: Rc<dyn Driver> = Rc::new(Gphoto2Driver::new("libgphoto2.so.6")?);
//! let mut camera = Camera::detect(&driver)?.remove(0);
//! camera.connect()?;
//!
//! for fs in camera.filesystems() {
//!     for file in fs.files("Music")? {
//!         if let TypedFile::Music(track) = file {
//!             println!("{} - {}", track.artist(), track.title());
//!         }
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Platform Requirements
//!
//! - **libgphoto2 2.5** is loaded at runtime; nothing links against it at
//!   build time.
//! - The `mock` feature provides an in-memory camera for tests.
//!
//! ## Safety
//!
//! `unsafe` code is confined to the [`native`] module and the `gphoto2-sys`
//! crate, and wrapped in owning types that release each handle once.

pub mod abilities;
pub mod camera;
pub mod driver;
pub mod error;
pub mod file;
pub mod filesystem;
pub mod metadata;
pub mod mime;
#[cfg(feature = "mock")]
pub mod mock;
pub mod native;
pub mod path;
pub mod storage;
pub mod walk;
pub mod widget;

pub use abilities::{Abilities, Capability};
pub use camera::Camera;
pub use driver::{
    CameraFile, CaptureKind, CapturePath, Device, DeviceEntry, Driver, FileInfo, FileType,
};
pub use error::{Error, ErrorCode, Result};
pub use file::{File, GenericFile, ImageFile, MusicFile, Origin, PlaylistFile, TypedFile};
pub use filesystem::FileSystem;
pub use metadata::Metadata;
pub use mime::FileKind;
pub use storage::{AccessMode, FilesystemType, StorageInfo, StorageType};
pub use walk::{Walk, WalkEntry};
pub use widget::{Widget, WidgetKind, WidgetValue};
