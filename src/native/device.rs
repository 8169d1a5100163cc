// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

use super::{borrowed_string, cstring, list::CameraList, widget, Session};
use crate::{
    driver::{CameraFile, CaptureKind, CapturePath, Device, FileInfo, FileType},
    error::Result,
    storage::StorageInfo,
    widget::{Widget, WidgetValue},
};
use chrono::DateTime;
use gphoto2_sys as sys;
use std::{
    ptr::{null, null_mut},
    rc::Rc,
    slice,
};
use tracing::{debug, warn};

/// An open libgphoto2 camera handle.
///
/// The handle is exited at most once, either by [`Device::exit`] or on drop,
/// and unreferenced on drop.
pub struct NativeDevice {
    session: Rc<Session>,
    camera: *mut sys::Camera,
    initialised: bool,
}

impl NativeDevice {
    pub(crate) fn new(session: Rc<Session>, camera: *mut sys::Camera) -> Self {
        Self {
            session,
            camera,
            initialised: false,
        }
    }

    pub(crate) fn init(
        &mut self,
        abilities: sys::CameraAbilities,
        port: sys::GPPortInfo,
    ) -> Result<()> {
        let session = &self.session;
        session.check("gp_camera_set_abilities", unsafe {
            session.lib().gp_camera_set_abilities(self.camera, abilities)
        })?;
        session.check("gp_camera_set_port_info", unsafe {
            session.lib().gp_camera_set_port_info(self.camera, port)
        })?;
        session.check("gp_camera_init", unsafe {
            session.lib().gp_camera_init(self.camera, session.context())
        })?;
        self.initialised = true;
        Ok(())
    }

    fn list(
        &mut self,
        call: &str,
        folder: &str,
        f: unsafe fn(
            &sys::gphoto2,
            *mut sys::Camera,
            *const libc::c_char,
            *mut sys::CameraList,
            *mut sys::GPContext,
        ) -> libc::c_int,
    ) -> Result<Vec<String>> {
        let folder = cstring(folder)?;
        let list = CameraList::new(&self.session)?;
        self.session.check(call, unsafe {
            f(
                self.session.lib(),
                self.camera,
                folder.as_ptr(),
                list.as_ptr(),
                self.session.context(),
            )
        })?;
        list.names()
    }
}

impl Device for NativeDevice {
    fn storages(&mut self) -> Result<Vec<StorageInfo>> {
        let session = &self.session;
        let mut infos: *mut sys::CameraStorageInformation = null_mut();
        let mut count = 0;
        session.check("gp_camera_get_storageinfo", unsafe {
            session.lib().gp_camera_get_storageinfo(
                self.camera,
                &mut infos,
                &mut count,
                session.context(),
            )
        })?;
        if infos.is_null() {
            return Ok(Vec::new());
        }

        let storages = unsafe { slice::from_raw_parts(infos, count.max(0) as usize) }
            .iter()
            .map(StorageInfo::from_native)
            .collect();
        // The array is allocated by the library with malloc.
        unsafe { libc::free(infos.cast()) };
        Ok(storages)
    }

    fn list_files(&mut self, folder: &str) -> Result<Vec<String>> {
        self.list(
            "gp_camera_folder_list_files",
            folder,
            sys::gphoto2::gp_camera_folder_list_files,
        )
    }

    fn list_folders(&mut self, folder: &str) -> Result<Vec<String>> {
        self.list(
            "gp_camera_folder_list_folders",
            folder,
            sys::gphoto2::gp_camera_folder_list_folders,
        )
    }

    fn get_file(&mut self, folder: &str, name: &str, file_type: FileType) -> Result<CameraFile> {
        let c_folder = cstring(folder)?;
        let c_name = cstring(name)?;
        let file = NativeFile::new(&self.session)?;
        let session = &self.session;
        session.check("gp_camera_file_get", unsafe {
            session.lib().gp_camera_file_get(
                self.camera,
                c_folder.as_ptr(),
                c_name.as_ptr(),
                file_type.raw(),
                file.file,
                session.context(),
            )
        })?;
        Ok(CameraFile::new(
            name,
            file_type,
            file.mime_type()?,
            file.data()?,
        ))
    }

    fn put_file(&mut self, folder: &str, file: &CameraFile) -> Result<()> {
        let c_folder = cstring(folder)?;
        let c_name = cstring(&file.name)?;
        let native = NativeFile::new(&self.session)?;
        native.fill(file)?;
        let session = &self.session;
        session.check("gp_camera_folder_put_file", unsafe {
            session.lib().gp_camera_folder_put_file(
                self.camera,
                c_folder.as_ptr(),
                c_name.as_ptr(),
                file.file_type.raw(),
                native.file,
                session.context(),
            )
        })?;
        Ok(())
    }

    fn delete_file(&mut self, folder: &str, name: &str) -> Result<()> {
        let folder = cstring(folder)?;
        let name = cstring(name)?;
        let session = &self.session;
        session.check("gp_camera_file_delete", unsafe {
            session.lib().gp_camera_file_delete(
                self.camera,
                folder.as_ptr(),
                name.as_ptr(),
                session.context(),
            )
        })?;
        Ok(())
    }

    fn delete_all(&mut self, folder: &str) -> Result<()> {
        let folder = cstring(folder)?;
        let session = &self.session;
        session.check("gp_camera_folder_delete_all", unsafe {
            session
                .lib()
                .gp_camera_folder_delete_all(self.camera, folder.as_ptr(), session.context())
        })?;
        Ok(())
    }

    fn make_dir(&mut self, folder: &str, name: &str) -> Result<()> {
        let folder = cstring(folder)?;
        let name = cstring(name)?;
        let session = &self.session;
        session.check("gp_camera_folder_make_dir", unsafe {
            session.lib().gp_camera_folder_make_dir(
                self.camera,
                folder.as_ptr(),
                name.as_ptr(),
                session.context(),
            )
        })?;
        Ok(())
    }

    fn remove_dir(&mut self, folder: &str, name: &str) -> Result<()> {
        let folder = cstring(folder)?;
        let name = cstring(name)?;
        let session = &self.session;
        session.check("gp_camera_folder_remove_dir", unsafe {
            session.lib().gp_camera_folder_remove_dir(
                self.camera,
                folder.as_ptr(),
                name.as_ptr(),
                session.context(),
            )
        })?;
        Ok(())
    }

    fn file_info(&mut self, folder: &str, name: &str) -> Result<FileInfo> {
        let folder = cstring(folder)?;
        let name = cstring(name)?;
        let mut info = sys::CameraFileInfo::zeroed();
        let session = &self.session;
        session.check("gp_camera_file_get_info", unsafe {
            session.lib().gp_camera_file_get_info(
                self.camera,
                folder.as_ptr(),
                name.as_ptr(),
                &mut info,
                session.context(),
            )
        })?;
        Ok(file_info(&info.file))
    }

    fn capture(&mut self, kind: CaptureKind) -> Result<CapturePath> {
        let mut path = sys::CameraFilePath::zeroed();
        let session = &self.session;
        session.check("gp_camera_capture", unsafe {
            session
                .lib()
                .gp_camera_capture(self.camera, kind.raw(), &mut path, session.context())
        })?;
        Ok(CapturePath {
            folder: sys::c_array_to_string(&path.folder),
            name: sys::c_array_to_string(&path.name),
        })
    }

    fn summary(&mut self) -> Result<String> {
        let mut text = Box::new(sys::CameraText::zeroed());
        let session = &self.session;
        session.check("gp_camera_get_summary", unsafe {
            session
                .lib()
                .gp_camera_get_summary(self.camera, &mut *text, session.context())
        })?;
        Ok(sys::c_array_to_string(&text.text))
    }

    fn config(&mut self) -> Result<Widget> {
        let window = widget::Window::get(&self.session, self.camera)?;
        window.to_widget()
    }

    fn set_config(&mut self, name: &str, value: &WidgetValue) -> Result<()> {
        let window = widget::Window::get(&self.session, self.camera)?;
        window.set_value(name, value)?;
        window.apply(self.camera)
    }

    fn exit(&mut self) -> Result<()> {
        if !self.initialised {
            return Ok(());
        }
        self.initialised = false;
        let session = &self.session;
        session.check("gp_camera_exit", unsafe {
            session.lib().gp_camera_exit(self.camera, session.context())
        })?;
        Ok(())
    }
}

impl Drop for NativeDevice {
    fn drop(&mut self) {
        if let Err(e) = self.exit() {
            warn!("camera exit failed: {e}");
        }
        _ = unsafe { self.session.lib().gp_camera_unref(self.camera) };
        debug!("camera released");
    }
}

fn file_info(file: &sys::CameraFileInfoFile) -> FileInfo {
    let has = |bit: i32| file.fields & bit != 0;
    FileInfo {
        size: has(sys::GP_FILE_INFO_SIZE).then_some(file.size),
        mime_type: has(sys::GP_FILE_INFO_TYPE).then(|| sys::c_array_to_string(&file.type_)),
        width: has(sys::GP_FILE_INFO_WIDTH).then_some(file.width),
        height: has(sys::GP_FILE_INFO_HEIGHT).then_some(file.height),
        readable: has(sys::GP_FILE_INFO_PERMISSIONS)
            .then_some(file.permissions & sys::GP_FILE_PERM_READ != 0),
        deletable: has(sys::GP_FILE_INFO_PERMISSIONS)
            .then_some(file.permissions & sys::GP_FILE_PERM_DELETE != 0),
        modified: if has(sys::GP_FILE_INFO_MTIME) {
            DateTime::from_timestamp(file.mtime as i64, 0).map(|t| t.naive_utc())
        } else {
            None
        },
    }
}

/// Owned `CameraFile`.
struct NativeFile {
    session: Rc<Session>,
    file: *mut sys::CameraFile,
}

impl NativeFile {
    fn new(session: &Rc<Session>) -> Result<Self> {
        let mut file = null_mut();
        session.check("gp_file_new", unsafe { session.lib().gp_file_new(&mut file) })?;
        Ok(Self {
            session: Rc::clone(session),
            file,
        })
    }

    fn fill(&self, source: &CameraFile) -> Result<()> {
        let name = cstring(&source.name)?;
        let mime_type = cstring(&source.mime_type)?;
        let lib = self.session.lib();
        self.session.check("gp_file_set_name", unsafe {
            lib.gp_file_set_name(self.file, name.as_ptr())
        })?;
        self.session.check("gp_file_set_mime_type", unsafe {
            lib.gp_file_set_mime_type(self.file, mime_type.as_ptr())
        })?;
        self.session.check("gp_file_append", unsafe {
            lib.gp_file_append(
                self.file,
                source.data.as_ptr().cast(),
                source.data.len() as libc::c_ulong,
            )
        })?;
        Ok(())
    }

    fn data(&self) -> Result<Vec<u8>> {
        let mut data = null();
        let mut size: libc::c_ulong = 0;
        self.session.check("gp_file_get_data_and_size", unsafe {
            self.session
                .lib()
                .gp_file_get_data_and_size(self.file, &mut data, &mut size)
        })?;
        if data.is_null() || size == 0 {
            return Ok(Vec::new());
        }
        // The buffer stays owned by the CameraFile, copy it out.
        Ok(unsafe { slice::from_raw_parts(data.cast::<u8>(), size as usize) }.to_vec())
    }

    fn mime_type(&self) -> Result<String> {
        let mut mime_type = null();
        self.session.check("gp_file_get_mime_type", unsafe {
            self.session
                .lib()
                .gp_file_get_mime_type(self.file, &mut mime_type)
        })?;
        Ok(borrowed_string(mime_type))
    }
}

impl Drop for NativeFile {
    fn drop(&mut self) {
        _ = unsafe { self.session.lib().gp_file_unref(self.file) };
    }
}
