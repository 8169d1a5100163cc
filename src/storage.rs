// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

use gphoto2_sys as sys;
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum StorageType {
    Unknown,
    FixedRom,
    RemovableRom,
    FixedRam,
    RemovableRam,
}

impl StorageType {
    pub fn from_raw(raw: i32) -> Self {
        match raw {
            sys::GP_STORAGEINFO_ST_FIXED_ROM => StorageType::FixedRom,
            sys::GP_STORAGEINFO_ST_REMOVABLE_ROM => StorageType::RemovableRom,
            sys::GP_STORAGEINFO_ST_FIXED_RAM => StorageType::FixedRam,
            sys::GP_STORAGEINFO_ST_REMOVABLE_RAM => StorageType::RemovableRam,
            _ => StorageType::Unknown,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum FilesystemType {
    Undefined,
    Flat,
    Hierarchical,
    Dcf,
}

impl FilesystemType {
    pub fn from_raw(raw: i32) -> Self {
        match raw {
            sys::GP_STORAGEINFO_FST_GENERICFLAT => FilesystemType::Flat,
            sys::GP_STORAGEINFO_FST_GENERICHIERARCHICAL => FilesystemType::Hierarchical,
            sys::GP_STORAGEINFO_FST_DCF => FilesystemType::Dcf,
            _ => FilesystemType::Undefined,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum AccessMode {
    ReadWrite,
    ReadOnly,
    ReadOnlyWithDelete,
}

impl AccessMode {
    pub fn from_raw(raw: i32) -> Option<Self> {
        match raw {
            sys::GP_STORAGEINFO_AC_READWRITE => Some(AccessMode::ReadWrite),
            sys::GP_STORAGEINFO_AC_READONLY => Some(AccessMode::ReadOnly),
            sys::GP_STORAGEINFO_AC_READONLY_WITH_DELETE => Some(AccessMode::ReadOnlyWithDelete),
            _ => None,
        }
    }
}

/// One storage volume of a device. Fields the device did not report are
/// `None`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct StorageInfo {
    pub base: Option<String>,
    pub label: Option<String>,
    pub description: Option<String>,
    pub storage_type: Option<StorageType>,
    pub filesystem_type: Option<FilesystemType>,
    pub access: Option<AccessMode>,
    /// Capacity in bytes.
    pub capacity: Option<u64>,
    /// Free space in bytes.
    pub free_space: Option<u64>,
    pub free_images: Option<u64>,
}

impl StorageInfo {
    /// Decodes the native record, honouring its `fields` mask.
    pub fn from_native(info: &sys::CameraStorageInformation) -> Self {
        let has = |bit: i32| info.fields & bit != 0;
        let text = |bit: i32, chars: &[libc::c_char]| has(bit).then(|| sys::c_array_to_string(chars));

        Self {
            base: text(sys::GP_STORAGEINFO_BASE, &info.basedir),
            label: text(sys::GP_STORAGEINFO_LABEL, &info.label),
            description: text(sys::GP_STORAGEINFO_DESCRIPTION, &info.description),
            storage_type: has(sys::GP_STORAGEINFO_STORAGETYPE)
                .then(|| StorageType::from_raw(info.type_)),
            filesystem_type: has(sys::GP_STORAGEINFO_FILESYSTEMTYPE)
                .then(|| FilesystemType::from_raw(info.fstype)),
            access: if has(sys::GP_STORAGEINFO_ACCESS) {
                AccessMode::from_raw(info.access)
            } else {
                None
            },
            capacity: has(sys::GP_STORAGEINFO_MAXCAPACITY)
                .then(|| info.capacitykbytes.saturating_mul(1024)),
            free_space: has(sys::GP_STORAGEINFO_FREESPACEKBYTES)
                .then(|| info.freekbytes.saturating_mul(1024)),
            free_images: has(sys::GP_STORAGEINFO_FREESPACEIMAGES).then_some(info.freeimages),
        }
    }

    /// Base directory, or "/" when the device did not report one.
    pub fn base_dir(&self) -> &str {
        self.base.as_deref().unwrap_or("/")
    }

    pub fn used_space(&self) -> Option<u64> {
        Some(self.capacity?.saturating_sub(self.free_space?))
    }

    pub fn can_read(&self) -> bool {
        self.access.is_some()
    }

    pub fn can_write(&self) -> bool {
        self.access == Some(AccessMode::ReadWrite)
    }

    pub fn can_delete(&self) -> bool {
        matches!(
            self.access,
            Some(AccessMode::ReadWrite | AccessMode::ReadOnlyWithDelete)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn native(fields: i32) -> sys::CameraStorageInformation {
        let mut info = sys::CameraStorageInformation::zeroed();
        info.fields = fields;
        for (dst, src) in info.basedir.iter_mut().zip(b"/store_00010001".iter()) {
            *dst = *src as libc::c_char;
        }
        info.capacitykbytes = 4;
        info.freekbytes = 1;
        info.access = sys::GP_STORAGEINFO_AC_READONLY_WITH_DELETE;
        info.type_ = sys::GP_STORAGEINFO_ST_REMOVABLE_RAM;
        info
    }

    #[test]
    fn test_from_native_all_fields() {
        let info = StorageInfo::from_native(&native(
            sys::GP_STORAGEINFO_BASE
                | sys::GP_STORAGEINFO_ACCESS
                | sys::GP_STORAGEINFO_STORAGETYPE
                | sys::GP_STORAGEINFO_MAXCAPACITY
                | sys::GP_STORAGEINFO_FREESPACEKBYTES,
        ));
        assert_eq!(info.base.as_deref(), Some("/store_00010001"));
        assert_eq!(info.capacity, Some(4096));
        assert_eq!(info.free_space, Some(1024));
        assert_eq!(info.used_space(), Some(3072));
        assert_eq!(info.storage_type, Some(StorageType::RemovableRam));
        assert_eq!(info.label, None);
        assert!(info.can_read());
        assert!(!info.can_write());
        assert!(info.can_delete());
    }

    #[test]
    fn test_unset_fields() {
        let info = StorageInfo::from_native(&native(0));
        assert_eq!(info.base, None);
        assert_eq!(info.base_dir(), "/");
        assert_eq!(info.used_space(), None);
        assert!(!info.can_read());
        assert!(!info.can_write());
        assert!(!info.can_delete());
    }

    #[test]
    fn test_read_write_access() {
        // Read-write is the zero value natively, so it must not be tested
        // with a bit mask.
        let info = StorageInfo {
            access: AccessMode::from_raw(sys::GP_STORAGEINFO_AC_READWRITE),
            ..Default::default()
        };
        assert!(info.can_read());
        assert!(info.can_write());
        assert!(info.can_delete());

        let read_only = StorageInfo {
            access: Some(AccessMode::ReadOnly),
            ..Default::default()
        };
        assert!(read_only.can_read());
        assert!(!read_only.can_write());
        assert!(!read_only.can_delete());
    }
}
