// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

//! Low-level FFI bindings for libgphoto2 2.5.
//!
//! The library is opened at runtime with `libloading` so that crates depending
//! on these bindings build on machines without libgphoto2 installed. All
//! symbols are resolved when [`gphoto2::new`] is called; a missing symbol is
//! reported as a [`libloading::Error`] instead of failing later.
//!
//! The port functions (`gp_port_*`) live in `libgphoto2_port`, which
//! libgphoto2 links against; `dlsym` on the libgphoto2 handle searches its
//! dependencies, so a single handle resolves both sets.

#![allow(non_camel_case_types)]

use std::ffi::{c_char, c_float, c_int, c_ulong, c_void, CStr, OsStr};

/// Default soname of the libgphoto2 2.5 series.
pub const LIBGPHOTO2: &str = "libgphoto2.so.6";

/* Result codes shared by the core and port libraries */
pub const GP_OK: c_int = 0;
pub const GP_ERROR: c_int = -1;
pub const GP_ERROR_BAD_PARAMETERS: c_int = -2;
pub const GP_ERROR_NO_MEMORY: c_int = -3;
pub const GP_ERROR_LIBRARY: c_int = -4;
pub const GP_ERROR_UNKNOWN_PORT: c_int = -5;
pub const GP_ERROR_NOT_SUPPORTED: c_int = -6;
pub const GP_ERROR_IO: c_int = -7;
pub const GP_ERROR_FIXED_LIMIT_EXCEEDED: c_int = -8;
pub const GP_ERROR_TIMEOUT: c_int = -10;
pub const GP_ERROR_IO_SUPPORTED_SERIAL: c_int = -20;
pub const GP_ERROR_IO_SUPPORTED_USB: c_int = -21;
pub const GP_ERROR_IO_INIT: c_int = -31;
pub const GP_ERROR_IO_READ: c_int = -34;
pub const GP_ERROR_IO_WRITE: c_int = -35;
pub const GP_ERROR_IO_UPDATE: c_int = -37;
pub const GP_ERROR_IO_SERIAL_SPEED: c_int = -41;
pub const GP_ERROR_IO_USB_CLEAR_HALT: c_int = -51;
pub const GP_ERROR_IO_USB_FIND: c_int = -52;
pub const GP_ERROR_IO_USB_CLAIM: c_int = -53;
pub const GP_ERROR_IO_LOCK: c_int = -60;
pub const GP_ERROR_HAL: c_int = -70;

/* Result codes of the core library */
pub const GP_ERROR_CORRUPTED_DATA: c_int = -102;
pub const GP_ERROR_FILE_EXISTS: c_int = -103;
pub const GP_ERROR_MODEL_NOT_FOUND: c_int = -105;
pub const GP_ERROR_DIRECTORY_NOT_FOUND: c_int = -107;
pub const GP_ERROR_FILE_NOT_FOUND: c_int = -108;
pub const GP_ERROR_DIRECTORY_EXISTS: c_int = -109;
pub const GP_ERROR_CAMERA_BUSY: c_int = -110;
pub const GP_ERROR_PATH_NOT_ABSOLUTE: c_int = -111;
pub const GP_ERROR_CANCEL: c_int = -112;
pub const GP_ERROR_CAMERA_ERROR: c_int = -113;
pub const GP_ERROR_OS_FAILURE: c_int = -114;
pub const GP_ERROR_NO_SPACE: c_int = -115;

/* CameraOperation */
pub const GP_OPERATION_NONE: c_int = 0;
pub const GP_OPERATION_CAPTURE_IMAGE: c_int = 1 << 0;
pub const GP_OPERATION_CAPTURE_VIDEO: c_int = 1 << 1;
pub const GP_OPERATION_CAPTURE_AUDIO: c_int = 1 << 2;
pub const GP_OPERATION_CAPTURE_PREVIEW: c_int = 1 << 3;
pub const GP_OPERATION_CONFIG: c_int = 1 << 4;
pub const GP_OPERATION_TRIGGER_CAPTURE: c_int = 1 << 5;

/* CameraFileOperation */
pub const GP_FILE_OPERATION_NONE: c_int = 0;
pub const GP_FILE_OPERATION_DELETE: c_int = 1 << 1;
pub const GP_FILE_OPERATION_PREVIEW: c_int = 1 << 3;
pub const GP_FILE_OPERATION_RAW: c_int = 1 << 4;
pub const GP_FILE_OPERATION_AUDIO: c_int = 1 << 5;
pub const GP_FILE_OPERATION_EXIF: c_int = 1 << 6;

/* CameraFolderOperation */
pub const GP_FOLDER_OPERATION_NONE: c_int = 0;
pub const GP_FOLDER_OPERATION_DELETE_ALL: c_int = 1 << 0;
pub const GP_FOLDER_OPERATION_PUT_FILE: c_int = 1 << 1;
pub const GP_FOLDER_OPERATION_MAKE_DIR: c_int = 1 << 2;
pub const GP_FOLDER_OPERATION_REMOVE_DIR: c_int = 1 << 3;

/* CameraStorageInfoFields */
pub const GP_STORAGEINFO_BASE: c_int = 1 << 0;
pub const GP_STORAGEINFO_LABEL: c_int = 1 << 1;
pub const GP_STORAGEINFO_DESCRIPTION: c_int = 1 << 2;
pub const GP_STORAGEINFO_ACCESS: c_int = 1 << 3;
pub const GP_STORAGEINFO_STORAGETYPE: c_int = 1 << 4;
pub const GP_STORAGEINFO_FILESYSTEMTYPE: c_int = 1 << 5;
pub const GP_STORAGEINFO_MAXCAPACITY: c_int = 1 << 6;
pub const GP_STORAGEINFO_FREESPACEKBYTES: c_int = 1 << 7;
pub const GP_STORAGEINFO_FREESPACEIMAGES: c_int = 1 << 8;

/* CameraStorageType */
pub const GP_STORAGEINFO_ST_UNKNOWN: c_int = 0;
pub const GP_STORAGEINFO_ST_FIXED_ROM: c_int = 1;
pub const GP_STORAGEINFO_ST_REMOVABLE_ROM: c_int = 2;
pub const GP_STORAGEINFO_ST_FIXED_RAM: c_int = 3;
pub const GP_STORAGEINFO_ST_REMOVABLE_RAM: c_int = 4;

/* CameraStorageFilesystemType */
pub const GP_STORAGEINFO_FST_UNDEFINED: c_int = 0;
pub const GP_STORAGEINFO_FST_GENERICFLAT: c_int = 1;
pub const GP_STORAGEINFO_FST_GENERICHIERARCHICAL: c_int = 2;
pub const GP_STORAGEINFO_FST_DCF: c_int = 3;

/* CameraStorageAccessType */
pub const GP_STORAGEINFO_AC_READWRITE: c_int = 0;
pub const GP_STORAGEINFO_AC_READONLY: c_int = 1;
pub const GP_STORAGEINFO_AC_READONLY_WITH_DELETE: c_int = 2;

/* CameraFileType */
pub const GP_FILE_TYPE_PREVIEW: c_int = 0;
pub const GP_FILE_TYPE_NORMAL: c_int = 1;
pub const GP_FILE_TYPE_RAW: c_int = 2;
pub const GP_FILE_TYPE_AUDIO: c_int = 3;
pub const GP_FILE_TYPE_EXIF: c_int = 4;
pub const GP_FILE_TYPE_METADATA: c_int = 5;

/* CameraFileInfoFields */
pub const GP_FILE_INFO_NONE: c_int = 0;
pub const GP_FILE_INFO_TYPE: c_int = 1 << 0;
pub const GP_FILE_INFO_SIZE: c_int = 1 << 2;
pub const GP_FILE_INFO_WIDTH: c_int = 1 << 3;
pub const GP_FILE_INFO_HEIGHT: c_int = 1 << 4;
pub const GP_FILE_INFO_PERMISSIONS: c_int = 1 << 5;
pub const GP_FILE_INFO_STATUS: c_int = 1 << 6;
pub const GP_FILE_INFO_MTIME: c_int = 1 << 7;

/* CameraFilePermissions */
pub const GP_FILE_PERM_NONE: c_int = 0;
pub const GP_FILE_PERM_READ: c_int = 1 << 0;
pub const GP_FILE_PERM_DELETE: c_int = 1 << 1;

/* CameraCaptureType */
pub const GP_CAPTURE_IMAGE: c_int = 0;
pub const GP_CAPTURE_MOVIE: c_int = 1;
pub const GP_CAPTURE_SOUND: c_int = 2;

/* CameraWidgetType */
pub const GP_WIDGET_WINDOW: c_int = 0;
pub const GP_WIDGET_SECTION: c_int = 1;
pub const GP_WIDGET_TEXT: c_int = 2;
pub const GP_WIDGET_RANGE: c_int = 3;
pub const GP_WIDGET_TOGGLE: c_int = 4;
pub const GP_WIDGET_RADIO: c_int = 5;
pub const GP_WIDGET_MENU: c_int = 6;
pub const GP_WIDGET_BUTTON: c_int = 7;
pub const GP_WIDGET_DATE: c_int = 8;

/* GPVersionVerbosity */
pub const GP_VERSION_SHORT: c_int = 0;
pub const GP_VERSION_VERBOSE: c_int = 1;

#[repr(C)]
pub struct GPContext {
    _private: [u8; 0],
}

#[repr(C)]
pub struct Camera {
    _private: [u8; 0],
}

#[repr(C)]
pub struct CameraList {
    _private: [u8; 0],
}

#[repr(C)]
pub struct CameraAbilitiesList {
    _private: [u8; 0],
}

#[repr(C)]
pub struct GPPortInfoList {
    _private: [u8; 0],
}

#[repr(C)]
pub struct _GPPortInfo {
    _private: [u8; 0],
}

/// Port descriptions are handed out by pointer since libgphoto2 2.5.
pub type GPPortInfo = *mut _GPPortInfo;

#[repr(C)]
pub struct CameraFile {
    _private: [u8; 0],
}

#[repr(C)]
pub struct CameraWidget {
    _private: [u8; 0],
}

#[repr(C)]
#[derive(Clone, Copy)]
pub struct CameraAbilities {
    pub model: [c_char; 128],
    pub status: c_int,
    pub port: c_int,
    pub speed: [c_int; 64],
    pub operations: c_int,
    pub file_operations: c_int,
    pub folder_operations: c_int,
    pub usb_vendor: c_int,
    pub usb_product: c_int,
    pub usb_class: c_int,
    pub usb_subclass: c_int,
    pub usb_protocol: c_int,
    pub library: [c_char; 1024],
    pub id: [c_char; 1024],
    pub device_type: c_int,
    pub reserved2: c_int,
    pub reserved3: c_int,
    pub reserved4: c_int,
    pub reserved5: c_int,
    pub reserved6: c_int,
    pub reserved7: c_int,
    pub reserved8: c_int,
}

#[repr(C)]
#[derive(Clone, Copy)]
pub struct CameraStorageInformation {
    pub fields: c_int,
    pub basedir: [c_char; 256],
    pub label: [c_char; 256],
    pub description: [c_char; 256],
    pub type_: c_int,
    pub fstype: c_int,
    pub access: c_int,
    pub capacitykbytes: u64,
    pub freekbytes: u64,
    pub freeimages: u64,
}

#[repr(C)]
#[derive(Clone, Copy)]
pub struct CameraFileInfoPreview {
    pub fields: c_int,
    pub status: c_int,
    pub size: u64,
    pub type_: [c_char; 64],
    pub width: u32,
    pub height: u32,
}

#[repr(C)]
#[derive(Clone, Copy)]
pub struct CameraFileInfoFile {
    pub fields: c_int,
    pub status: c_int,
    pub size: u64,
    pub type_: [c_char; 64],
    pub width: u32,
    pub height: u32,
    pub permissions: c_int,
    pub mtime: libc::time_t,
}

#[repr(C)]
#[derive(Clone, Copy)]
pub struct CameraFileInfoAudio {
    pub fields: c_int,
    pub status: c_int,
    pub size: u64,
    pub type_: [c_char; 64],
}

#[repr(C)]
#[derive(Clone, Copy)]
pub struct CameraFileInfo {
    pub preview: CameraFileInfoPreview,
    pub file: CameraFileInfoFile,
    pub audio: CameraFileInfoAudio,
}

#[repr(C)]
#[derive(Clone, Copy)]
pub struct CameraFilePath {
    pub name: [c_char; 128],
    pub folder: [c_char; 1024],
}

#[repr(C)]
#[derive(Clone, Copy)]
pub struct CameraText {
    pub text: [c_char; 32 * 1024],
}

macro_rules! zeroed {
    ($($ty:ident),*) => {
        $(impl $ty {
            /// An all-zero value, as the C API expects for output parameters.
            pub fn zeroed() -> Self {
                // SAFETY: plain C data, every field is valid when zero.
                unsafe { std::mem::zeroed() }
            }
        })*
    };
}

zeroed!(
    CameraAbilities,
    CameraStorageInformation,
    CameraFileInfo,
    CameraFilePath,
    CameraText
);

/// Declares the runtime-loaded function table.
macro_rules! dynamic_library {
    (
        $(#[$meta:meta])*
        pub struct $name:ident {
            $(fn $func:ident($($arg:ident: $ty:ty),* $(,)?) -> $ret:ty;)*
        }
    ) => {
        $(#[$meta])*
        pub struct $name {
            __library: libloading::Library,
            $($func: unsafe extern "C" fn($($ty),*) -> $ret,)*
        }

        impl $name {
            /// Opens the shared library at `path` and resolves every symbol.
            ///
            /// # Safety
            ///
            /// Loading a shared library runs its initialisers. The caller must
            /// ensure that `path` names a libgphoto2 2.5 compatible library.
            pub unsafe fn new<P>(path: P) -> Result<Self, libloading::Error>
            where
                P: AsRef<OsStr>,
            {
                let library = unsafe { libloading::Library::new(path) }?;
                $(
                    let $func = unsafe {
                        *library.get::<unsafe extern "C" fn($($ty),*) -> $ret>(
                            concat!(stringify!($func), "\0").as_bytes(),
                        )?
                    };
                )*
                Ok(Self {
                    __library: library,
                    $($func,)*
                })
            }

            $(
                #[allow(clippy::missing_safety_doc)]
                pub unsafe fn $func(&self, $($arg: $ty),*) -> $ret {
                    unsafe { (self.$func)($($arg),*) }
                }
            )*
        }
    };
}

dynamic_library! {
    /// Function table of libgphoto2 (and, through it, libgphoto2_port).
    pub struct gphoto2 {
        fn gp_library_version(verbose: c_int) -> *const *const c_char;
        fn gp_result_as_string(result: c_int) -> *const c_char;
        fn gp_port_result_as_string(result: c_int) -> *const c_char;

        fn gp_context_new() -> *mut GPContext;
        fn gp_context_unref(context: *mut GPContext) -> ();

        fn gp_list_new(list: *mut *mut CameraList) -> c_int;
        fn gp_list_free(list: *mut CameraList) -> c_int;
        fn gp_list_count(list: *mut CameraList) -> c_int;
        fn gp_list_get_name(list: *mut CameraList, index: c_int, name: *mut *const c_char) -> c_int;
        fn gp_list_get_value(list: *mut CameraList, index: c_int, value: *mut *const c_char) -> c_int;

        fn gp_abilities_list_new(list: *mut *mut CameraAbilitiesList) -> c_int;
        fn gp_abilities_list_free(list: *mut CameraAbilitiesList) -> c_int;
        fn gp_abilities_list_load(list: *mut CameraAbilitiesList, context: *mut GPContext) -> c_int;
        fn gp_abilities_list_detect(
            list: *mut CameraAbilitiesList,
            info_list: *mut GPPortInfoList,
            l: *mut CameraList,
            context: *mut GPContext,
        ) -> c_int;
        fn gp_abilities_list_lookup_model(list: *mut CameraAbilitiesList, model: *const c_char) -> c_int;
        fn gp_abilities_list_get_abilities(
            list: *mut CameraAbilitiesList,
            index: c_int,
            abilities: *mut CameraAbilities,
        ) -> c_int;

        fn gp_port_info_list_new(list: *mut *mut GPPortInfoList) -> c_int;
        fn gp_port_info_list_free(list: *mut GPPortInfoList) -> c_int;
        fn gp_port_info_list_load(list: *mut GPPortInfoList) -> c_int;
        fn gp_port_info_list_lookup_path(list: *mut GPPortInfoList, path: *const c_char) -> c_int;
        fn gp_port_info_list_get_info(list: *mut GPPortInfoList, n: c_int, info: *mut GPPortInfo) -> c_int;

        fn gp_camera_new(camera: *mut *mut Camera) -> c_int;
        fn gp_camera_unref(camera: *mut Camera) -> c_int;
        fn gp_camera_set_abilities(camera: *mut Camera, abilities: CameraAbilities) -> c_int;
        fn gp_camera_set_port_info(camera: *mut Camera, info: GPPortInfo) -> c_int;
        fn gp_camera_init(camera: *mut Camera, context: *mut GPContext) -> c_int;
        fn gp_camera_exit(camera: *mut Camera, context: *mut GPContext) -> c_int;
        fn gp_camera_get_storageinfo(
            camera: *mut Camera,
            sifs: *mut *mut CameraStorageInformation,
            nrofsifs: *mut c_int,
            context: *mut GPContext,
        ) -> c_int;
        fn gp_camera_get_summary(camera: *mut Camera, summary: *mut CameraText, context: *mut GPContext) -> c_int;
        fn gp_camera_capture(
            camera: *mut Camera,
            type_: c_int,
            path: *mut CameraFilePath,
            context: *mut GPContext,
        ) -> c_int;
        fn gp_camera_get_config(camera: *mut Camera, window: *mut *mut CameraWidget, context: *mut GPContext) -> c_int;
        fn gp_camera_set_config(camera: *mut Camera, window: *mut CameraWidget, context: *mut GPContext) -> c_int;

        fn gp_camera_folder_list_files(
            camera: *mut Camera,
            folder: *const c_char,
            list: *mut CameraList,
            context: *mut GPContext,
        ) -> c_int;
        fn gp_camera_folder_list_folders(
            camera: *mut Camera,
            folder: *const c_char,
            list: *mut CameraList,
            context: *mut GPContext,
        ) -> c_int;
        fn gp_camera_folder_delete_all(camera: *mut Camera, folder: *const c_char, context: *mut GPContext) -> c_int;
        fn gp_camera_folder_put_file(
            camera: *mut Camera,
            folder: *const c_char,
            filename: *const c_char,
            type_: c_int,
            file: *mut CameraFile,
            context: *mut GPContext,
        ) -> c_int;
        fn gp_camera_folder_make_dir(
            camera: *mut Camera,
            folder: *const c_char,
            name: *const c_char,
            context: *mut GPContext,
        ) -> c_int;
        fn gp_camera_folder_remove_dir(
            camera: *mut Camera,
            folder: *const c_char,
            name: *const c_char,
            context: *mut GPContext,
        ) -> c_int;

        fn gp_camera_file_get(
            camera: *mut Camera,
            folder: *const c_char,
            file: *const c_char,
            type_: c_int,
            camera_file: *mut CameraFile,
            context: *mut GPContext,
        ) -> c_int;
        fn gp_camera_file_delete(
            camera: *mut Camera,
            folder: *const c_char,
            file: *const c_char,
            context: *mut GPContext,
        ) -> c_int;
        fn gp_camera_file_get_info(
            camera: *mut Camera,
            folder: *const c_char,
            file: *const c_char,
            info: *mut CameraFileInfo,
            context: *mut GPContext,
        ) -> c_int;

        fn gp_file_new(file: *mut *mut CameraFile) -> c_int;
        fn gp_file_unref(file: *mut CameraFile) -> c_int;
        fn gp_file_append(file: *mut CameraFile, data: *const c_char, size: c_ulong) -> c_int;
        fn gp_file_get_data_and_size(file: *mut CameraFile, data: *mut *const c_char, size: *mut c_ulong) -> c_int;
        fn gp_file_set_name(file: *mut CameraFile, name: *const c_char) -> c_int;
        fn gp_file_get_name(file: *mut CameraFile, name: *mut *const c_char) -> c_int;
        fn gp_file_set_mime_type(file: *mut CameraFile, mime_type: *const c_char) -> c_int;
        fn gp_file_get_mime_type(file: *mut CameraFile, mime_type: *mut *const c_char) -> c_int;

        fn gp_widget_free(widget: *mut CameraWidget) -> c_int;
        fn gp_widget_count_children(widget: *mut CameraWidget) -> c_int;
        fn gp_widget_get_child(widget: *mut CameraWidget, child_number: c_int, child: *mut *mut CameraWidget) -> c_int;
        fn gp_widget_get_child_by_name(
            widget: *mut CameraWidget,
            name: *const c_char,
            child: *mut *mut CameraWidget,
        ) -> c_int;
        fn gp_widget_get_id(widget: *mut CameraWidget, id: *mut c_int) -> c_int;
        fn gp_widget_get_name(widget: *mut CameraWidget, name: *mut *const c_char) -> c_int;
        fn gp_widget_get_label(widget: *mut CameraWidget, label: *mut *const c_char) -> c_int;
        fn gp_widget_get_info(widget: *mut CameraWidget, info: *mut *const c_char) -> c_int;
        fn gp_widget_get_type(widget: *mut CameraWidget, type_: *mut c_int) -> c_int;
        fn gp_widget_get_readonly(widget: *mut CameraWidget, readonly: *mut c_int) -> c_int;
        fn gp_widget_get_value(widget: *mut CameraWidget, value: *mut c_void) -> c_int;
        fn gp_widget_set_value(widget: *mut CameraWidget, value: *const c_void) -> c_int;
        fn gp_widget_get_range(
            widget: *mut CameraWidget,
            min: *mut c_float,
            max: *mut c_float,
            increment: *mut c_float,
        ) -> c_int;
        fn gp_widget_count_choices(widget: *mut CameraWidget) -> c_int;
        fn gp_widget_get_choice(widget: *mut CameraWidget, choice_number: c_int, choice: *mut *const c_char) -> c_int;
    }
}

/// Returns the short version string of the loaded library, if it reports one.
pub fn version(lib: &gphoto2) -> Option<String> {
    let versions = unsafe { lib.gp_library_version(GP_VERSION_SHORT) };
    if versions.is_null() {
        return None;
    }
    let first = unsafe { *versions };
    if first.is_null() {
        return None;
    }
    Some(unsafe { CStr::from_ptr(first) }.to_string_lossy().into_owned())
}

/// Converts a fixed-size, NUL-terminated C character array into a `String`.
pub fn c_array_to_string(chars: &[c_char]) -> String {
    let bytes: Vec<u8> = chars
        .iter()
        .take_while(|&&c| c != 0)
        .map(|&c| c as u8)
        .collect();
    String::from_utf8_lossy(&bytes).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_c_array_to_string() {
        let mut chars = [0 as c_char; 16];
        for (dst, src) in chars.iter_mut().zip(b"/store_0001".iter()) {
            *dst = *src as c_char;
        }
        assert_eq!(c_array_to_string(&chars), "/store_0001");
        assert_eq!(c_array_to_string(&[0 as c_char; 4]), "");
    }

    #[test]
    fn test_zeroed_storage() {
        let info = CameraStorageInformation::zeroed();
        assert_eq!(info.fields, 0);
        assert_eq!(info.capacitykbytes, 0);
        assert_eq!(c_array_to_string(&info.basedir), "");
    }
}
