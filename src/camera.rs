// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

use crate::{
    abilities::Abilities,
    driver::{CaptureKind, CapturePath, Device, DeviceEntry, Driver},
    error::{Error, Result},
    filesystem::FileSystem,
    storage::StorageInfo,
    widget::{Widget, WidgetValue},
};
use std::{cell::RefCell, fmt, rc::Rc};
use tracing::{debug, info, warn};

/// Port reported by some drivers next to the fully qualified `usb:BBB,DDD`
/// entry of the same camera.
const GENERIC_USB_PORT: &str = "usb:";

/// A camera found by [`Camera::detect`].
///
/// A camera starts disconnected. [`Camera::connect`] opens the device and
/// reads its storages; each storage is then reachable as a [`FileSystem`].
///
/// # Thread Safety
///
/// `Camera` is **not** thread-safe. The camera library expects one thread
/// per context.
///
/// # Example
///
/// ```no_run
/// use gphoto2_fs::{native::Gphoto2Driver, Camera, Driver};
/// use std::rc::Rc;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let driver: Rc<dyn Driver> = Rc::new(Gphoto2Driver::new("libgphoto2.so.6")?);
/// let mut cameras = Camera::detect(&driver)?;
/// if let Some(camera) = cameras.first_mut() {
///     camera.connect()?;
///     for fs in camera.filesystems() {
///         println!("{}: {} files", fs.base_dir(), fs.count("", true)?);
///     }
///     camera.disconnect()?;
/// }
/// # Ok(())
/// # }
/// ```
pub struct Camera {
    driver: Rc<dyn Driver>,
    entry: DeviceEntry,
    abilities: Abilities,
    usb: Option<(u32, u32)>,
    device: RefCell<Option<Box<dyn Device>>>,
    storages: Vec<StorageInfo>,
}

impl Camera {
    /// Lists the cameras attached to the system.
    ///
    /// Entries on the generic `usb:` port are dropped in favour of the fully
    /// qualified `usb:BBB,DDD` entry for the same camera.
    ///
    /// # Errors
    ///
    /// Returns an error if detection fails or a detected model is unknown to
    /// the driver.
    pub fn detect(driver: &Rc<dyn Driver>) -> Result<Vec<Camera>> {
        let entries = driver.detect()?;
        debug!("detected {} entries", entries.len());

        dedup_entries(entries)
            .into_iter()
            .map(|entry| Camera::new(Rc::clone(driver), entry))
            .collect()
    }

    /// Builds a disconnected camera for `entry`.
    pub fn new(driver: Rc<dyn Driver>, entry: DeviceEntry) -> Result<Camera> {
        let abilities = driver.abilities(&entry.model)?;
        let usb = parse_usb_port(&entry.port);
        Ok(Camera {
            driver,
            entry,
            abilities,
            usb,
            device: RefCell::new(None),
            storages: Vec::new(),
        })
    }

    /// Opens the device and reads its storages.
    ///
    /// Either both steps succeed, or the device is closed again and the
    /// camera stays disconnected.
    pub fn connect(&mut self) -> Result<()> {
        if self.is_connected() {
            return Err(Error::AlreadyConnected);
        }

        let mut device = self.driver.open(&self.entry)?;
        let storages = match device.storages() {
            Ok(storages) => storages,
            Err(e) => {
                if let Err(exit) = device.exit() {
                    warn!("{}: exit after failed connect: {exit}", self.entry.model);
                }
                return Err(e);
            }
        };

        info!(
            "{} connected on {} with {} storages",
            self.entry.model,
            self.entry.port,
            storages.len()
        );
        self.storages = storages;
        *self.device.get_mut() = Some(device);
        Ok(())
    }

    /// Closes the device. The native handle is released exactly once.
    pub fn disconnect(&mut self) -> Result<()> {
        let mut device = self.device.get_mut().take().ok_or(Error::NotConnected)?;
        self.storages.clear();
        let result = device.exit();
        drop(device);
        info!("{} disconnected", self.entry.model);
        result
    }

    pub fn reconnect(&mut self) -> Result<()> {
        self.disconnect()?;
        self.connect()
    }

    pub fn is_connected(&self) -> bool {
        self.device.borrow().is_some()
    }

    /// Re-reads the storages, e.g. after uploads changed the free space.
    pub fn refresh_storages(&mut self) -> Result<()> {
        let storages = self.with_device(|device| device.storages())?;
        self.storages = storages;
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.abilities.model
    }

    pub fn vendor(&self) -> u16 {
        self.abilities.usb_vendor
    }

    pub fn product(&self) -> u16 {
        self.abilities.usb_product
    }

    pub fn usb_bus(&self) -> Option<u32> {
        self.usb.map(|(bus, _)| bus)
    }

    pub fn usb_device(&self) -> Option<u32> {
        self.usb.map(|(_, device)| device)
    }

    pub fn port(&self) -> &str {
        &self.entry.port
    }

    pub fn abilities(&self) -> &Abilities {
        &self.abilities
    }

    pub fn storages(&self) -> &[StorageInfo] {
        &self.storages
    }

    /// One [`FileSystem`] per storage. Empty while disconnected.
    pub fn filesystems(&self) -> Vec<FileSystem<'_>> {
        self.storages
            .iter()
            .map(|storage| FileSystem::new(self, storage))
            .collect()
    }

    /// The filesystem whose base directory is `base`, e.g. `/store_00010001`.
    pub fn filesystem_for_base(&self, base: &str) -> Option<FileSystem<'_>> {
        self.storages
            .iter()
            .find(|storage| storage.base.as_deref() == Some(base))
            .map(|storage| FileSystem::new(self, storage))
    }

    pub fn capture(&self, kind: CaptureKind) -> Result<CapturePath> {
        let path = self.with_device(|device| device.capture(kind))?;
        info!("captured {}/{}", path.folder, path.name);
        Ok(path)
    }

    pub fn summary(&self) -> Result<String> {
        self.with_device(|device| device.summary())
    }

    pub fn config(&self) -> Result<Widget> {
        self.with_device(|device| device.config())
    }

    pub fn set_config(&self, name: &str, value: &WidgetValue) -> Result<()> {
        self.with_device(|device| device.set_config(name, value))
    }

    /// Runs `f` against the open device.
    pub(crate) fn with_device<R>(&self, f: impl FnOnce(&mut dyn Device) -> Result<R>) -> Result<R> {
        let mut device = self.device.borrow_mut();
        let device = device.as_mut().ok_or(Error::NotConnected)?;
        f(device.as_mut())
    }
}

impl fmt::Debug for Camera {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Camera")
            .field("entry", &self.entry)
            .field("abilities", &self.abilities)
            .field("connected", &self.is_connected())
            .finish()
    }
}

impl Drop for Camera {
    fn drop(&mut self) {
        if let Some(mut device) = self.device.get_mut().take() {
            if let Err(e) = device.exit() {
                warn!("{}: exit on drop failed: {e}", self.entry.model);
            }
        }
    }
}

/// Drops every entry on the generic `usb:` port.
pub fn dedup_entries(entries: Vec<DeviceEntry>) -> Vec<DeviceEntry> {
    entries
        .into_iter()
        .filter(|entry| entry.port != GENERIC_USB_PORT)
        .collect()
}

/// Parses `usb:BBB,DDD` into (bus, device).
pub fn parse_usb_port(port: &str) -> Option<(u32, u32)> {
    let (bus, device) = port.strip_prefix(GENERIC_USB_PORT)?.split_once(',')?;
    Some((bus.trim().parse().ok()?, device.trim().parse().ok()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedup_entries() {
        let entries = vec![
            DeviceEntry::new("ModelA", "usb:"),
            DeviceEntry::new("ModelA", "usb:001,002"),
        ];
        assert_eq!(
            dedup_entries(entries),
            vec![DeviceEntry::new("ModelA", "usb:001,002")]
        );
    }

    #[test]
    fn test_parse_usb_port() {
        assert_eq!(parse_usb_port("usb:001,002"), Some((1, 2)));
        assert_eq!(parse_usb_port("usb:"), None);
        assert_eq!(parse_usb_port("ptpip:192.168.1.2"), None);
        assert_eq!(parse_usb_port("usb:x,2"), None);
    }
}
