// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

//! libgphoto2 backend.
//!
//! The library is opened at runtime through `gphoto2-sys`, so nothing here
//! links against libgphoto2 at build time.

mod device;
mod list;
mod widget;

pub use device::NativeDevice;

use crate::{
    abilities::Abilities,
    driver::{Device, DeviceEntry, Driver},
    error::{Error, ErrorCode, Result},
};
use gphoto2_sys as sys;
use list::{AbilitiesList, CameraList, PortInfoList};
use std::{
    ffi::{CStr, CString, OsStr},
    os::raw::c_int,
    ptr::null_mut,
    rc::Rc,
};
use tracing::{debug, info};

/// The loaded library and the context every call runs in.
pub(crate) struct Session {
    lib: sys::gphoto2,
    context: *mut sys::GPContext,
}

impl Session {
    fn load<P: AsRef<OsStr>>(path: P) -> Result<Self> {
        let lib = unsafe { sys::gphoto2::new(path.as_ref()) }
            .map_err(|e| Error::Library(e.to_string()))?;
        let context = unsafe { lib.gp_context_new() };
        if context.is_null() {
            return Err(Error::native(ErrorCode::NoMemory));
        }
        debug!("gphoto2 context created");
        Ok(Self { lib, context })
    }

    pub(crate) fn lib(&self) -> &sys::gphoto2 {
        &self.lib
    }

    pub(crate) fn context(&self) -> *mut sys::GPContext {
        self.context
    }

    /// Turns a native return code into a `Result`, keeping non-negative
    /// values (some calls return counts or indices).
    pub(crate) fn check(&self, call: &str, code: c_int) -> Result<c_int> {
        debug!("{call} -> {code}");
        if code >= sys::GP_OK {
            Ok(code)
        } else {
            Err(self.error(code))
        }
    }

    /// Builds an error for `raw`, asking the library for its message.
    pub(crate) fn error(&self, raw: c_int) -> Error {
        let code = ErrorCode::from_raw(raw);
        let text = unsafe {
            if code.is_port_error() {
                self.lib.gp_port_result_as_string(raw)
            } else {
                self.lib.gp_result_as_string(raw)
            }
        };
        let message = if text.is_null() {
            code.description().to_string()
        } else {
            unsafe { CStr::from_ptr(text) }.to_string_lossy().into_owned()
        };
        Error::Native { code, message }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        unsafe { self.lib.gp_context_unref(self.context) };
        debug!("gphoto2 context released");
    }
}

pub(crate) fn cstring(value: &str) -> Result<CString> {
    CString::new(value).map_err(|_| Error::InvalidArgument(format!("`{value}` contains a NUL byte")))
}

/// Reads a borrowed C string owned by the library.
pub(crate) fn borrowed_string(ptr: *const libc::c_char) -> String {
    if ptr.is_null() {
        return String::new();
    }
    unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned()
}

/// [`Driver`] backed by libgphoto2.
///
/// # Example
///
/// ```no_run
/// use gphoto2_fs::{native::Gphoto2Driver, Camera, Driver};
/// use std::rc::Rc;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let driver: Rc<dyn Driver> = Rc::new(Gphoto2Driver::new("libgphoto2.so.6")?);
/// for camera in Camera::detect(&driver)? {
///     println!("{} on {}", camera.name(), camera.port());
/// }
/// # Ok(())
/// # }
/// ```
pub struct Gphoto2Driver {
    session: Rc<Session>,
    abilities: AbilitiesList,
}

impl Gphoto2Driver {
    /// Loads libgphoto2 from `path` and reads the list of supported models.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Library`] when the library cannot be loaded and a
    /// native error when the camera driver list cannot be read.
    pub fn new<P: AsRef<OsStr>>(path: P) -> Result<Self> {
        let session = Rc::new(Session::load(path)?);
        let abilities = AbilitiesList::load(&session)?;
        if let Some(version) = sys::version(session.lib()) {
            info!("loaded libgphoto2 {version}");
        }
        Ok(Self { session, abilities })
    }

    pub fn version(&self) -> Option<String> {
        sys::version(self.session.lib())
    }

    fn native_abilities(&self, model: &str) -> Result<sys::CameraAbilities> {
        let index = self.abilities.lookup_model(model)?;
        self.abilities.get(index)
    }
}

impl Driver for Gphoto2Driver {
    fn detect(&self) -> Result<Vec<DeviceEntry>> {
        let ports = PortInfoList::load(&self.session)?;
        let list = CameraList::new(&self.session)?;
        let session = &self.session;
        session.check("gp_abilities_list_detect", unsafe {
            session.lib().gp_abilities_list_detect(
                self.abilities.as_ptr(),
                ports.as_ptr(),
                list.as_ptr(),
                session.context(),
            )
        })?;

        Ok(list
            .entries()?
            .into_iter()
            .map(|(model, port)| DeviceEntry::new(model, port))
            .collect())
    }

    fn abilities(&self, model: &str) -> Result<Abilities> {
        let native = self.native_abilities(model)?;
        Ok(Abilities::from_masks(
            sys::c_array_to_string(&native.model),
            native.usb_vendor as u16,
            native.usb_product as u16,
            native.operations,
            native.file_operations,
            native.folder_operations,
        ))
    }

    fn open(&self, entry: &DeviceEntry) -> Result<Box<dyn Device>> {
        let abilities = self.native_abilities(&entry.model)?;
        let ports = PortInfoList::load(&self.session)?;
        let port = ports.lookup(&entry.port)?;

        let session = &self.session;
        let mut camera = null_mut();
        session.check("gp_camera_new", unsafe { session.lib().gp_camera_new(&mut camera) })?;
        // From here on the handle is released by the device's Drop.
        let mut device = NativeDevice::new(Rc::clone(session), camera);
        device.init(abilities, port)?;
        info!("opened {} on {}", entry.model, entry.port);
        Ok(Box::new(device))
    }
}
