// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

use bitflags::bitflags;
use gphoto2_sys as sys;
use serde::Serialize;
use std::collections::BTreeSet;

bitflags! {
    /// Raw `CameraOperation` mask.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct CameraOperations: i32 {
        const CAPTURE_IMAGE = sys::GP_OPERATION_CAPTURE_IMAGE;
        const CAPTURE_VIDEO = sys::GP_OPERATION_CAPTURE_VIDEO;
        const CAPTURE_AUDIO = sys::GP_OPERATION_CAPTURE_AUDIO;
        const CAPTURE_PREVIEW = sys::GP_OPERATION_CAPTURE_PREVIEW;
        const CONFIG = sys::GP_OPERATION_CONFIG;
        const TRIGGER_CAPTURE = sys::GP_OPERATION_TRIGGER_CAPTURE;
    }

    /// Raw `CameraFileOperation` mask.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct FileOperations: i32 {
        const DELETE = sys::GP_FILE_OPERATION_DELETE;
        const PREVIEW = sys::GP_FILE_OPERATION_PREVIEW;
        const RAW = sys::GP_FILE_OPERATION_RAW;
        const AUDIO = sys::GP_FILE_OPERATION_AUDIO;
        const EXIF = sys::GP_FILE_OPERATION_EXIF;
    }

    /// Raw `CameraFolderOperation` mask.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct FolderOperations: i32 {
        const DELETE_ALL = sys::GP_FOLDER_OPERATION_DELETE_ALL;
        const PUT_FILE = sys::GP_FOLDER_OPERATION_PUT_FILE;
        const MAKE_DIR = sys::GP_FOLDER_OPERATION_MAKE_DIR;
        const REMOVE_DIR = sys::GP_FOLDER_OPERATION_REMOVE_DIR;
    }
}

/// A single operation a camera driver may support.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Capability {
    DeleteFiles,
    PreviewViewfinder,
    RetrieveRaw,
    RetrieveAudio,
    RetrieveExif,
    DeleteAll,
    UploadFile,
    CreateDirectory,
    DeleteDirectory,
    CaptureImage,
    CaptureVideo,
    CaptureAudio,
    CapturePreview,
    TriggerCapture,
    Configure,
}

const OPERATION_CAPABILITIES: &[(CameraOperations, Capability)] = &[
    (CameraOperations::CAPTURE_IMAGE, Capability::CaptureImage),
    (CameraOperations::CAPTURE_VIDEO, Capability::CaptureVideo),
    (CameraOperations::CAPTURE_AUDIO, Capability::CaptureAudio),
    (CameraOperations::CAPTURE_PREVIEW, Capability::CapturePreview),
    (CameraOperations::CONFIG, Capability::Configure),
    (CameraOperations::TRIGGER_CAPTURE, Capability::TriggerCapture),
];

const FILE_CAPABILITIES: &[(FileOperations, Capability)] = &[
    (FileOperations::DELETE, Capability::DeleteFiles),
    (FileOperations::PREVIEW, Capability::PreviewViewfinder),
    (FileOperations::RAW, Capability::RetrieveRaw),
    (FileOperations::AUDIO, Capability::RetrieveAudio),
    (FileOperations::EXIF, Capability::RetrieveExif),
];

const FOLDER_CAPABILITIES: &[(FolderOperations, Capability)] = &[
    (FolderOperations::DELETE_ALL, Capability::DeleteAll),
    (FolderOperations::PUT_FILE, Capability::UploadFile),
    (FolderOperations::MAKE_DIR, Capability::CreateDirectory),
    (FolderOperations::REMOVE_DIR, Capability::DeleteDirectory),
];

/// What a camera model supports, decoded once from the driver's masks.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Abilities {
    pub model: String,
    pub usb_vendor: u16,
    pub usb_product: u16,
    capabilities: BTreeSet<Capability>,
}

impl Abilities {
    pub fn new(model: impl Into<String>, usb_vendor: u16, usb_product: u16) -> Self {
        Self {
            model: model.into(),
            usb_vendor,
            usb_product,
            capabilities: BTreeSet::new(),
        }
    }

    /// Decodes the three native operation masks. Unknown bits are ignored.
    pub fn from_masks(
        model: impl Into<String>,
        usb_vendor: u16,
        usb_product: u16,
        operations: i32,
        file_operations: i32,
        folder_operations: i32,
    ) -> Self {
        let operations = CameraOperations::from_bits_truncate(operations);
        let file_operations = FileOperations::from_bits_truncate(file_operations);
        let folder_operations = FolderOperations::from_bits_truncate(folder_operations);

        let capabilities = OPERATION_CAPABILITIES
            .iter()
            .filter(|(flag, _)| operations.contains(*flag))
            .map(|(_, cap)| *cap)
            .chain(
                FILE_CAPABILITIES
                    .iter()
                    .filter(|(flag, _)| file_operations.contains(*flag))
                    .map(|(_, cap)| *cap),
            )
            .chain(
                FOLDER_CAPABILITIES
                    .iter()
                    .filter(|(flag, _)| folder_operations.contains(*flag))
                    .map(|(_, cap)| *cap),
            )
            .collect();

        Self {
            model: model.into(),
            usb_vendor,
            usb_product,
            capabilities,
        }
    }

    pub fn with(mut self, capability: Capability) -> Self {
        self.capabilities.insert(capability);
        self
    }

    pub fn has(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }

    pub fn capabilities(&self) -> impl Iterator<Item = Capability> + '_ {
        self.capabilities.iter().copied()
    }

    pub fn can_delete_files(&self) -> bool {
        self.has(Capability::DeleteFiles)
    }

    pub fn can_preview_viewfinder(&self) -> bool {
        self.has(Capability::PreviewViewfinder)
    }

    pub fn can_retrieve_raw(&self) -> bool {
        self.has(Capability::RetrieveRaw)
    }

    pub fn can_retrieve_audio(&self) -> bool {
        self.has(Capability::RetrieveAudio)
    }

    pub fn can_retrieve_exif(&self) -> bool {
        self.has(Capability::RetrieveExif)
    }

    pub fn can_delete_all(&self) -> bool {
        self.has(Capability::DeleteAll)
    }

    pub fn can_upload_file(&self) -> bool {
        self.has(Capability::UploadFile)
    }

    pub fn can_create_directory(&self) -> bool {
        self.has(Capability::CreateDirectory)
    }

    pub fn can_delete_directory(&self) -> bool {
        self.has(Capability::DeleteDirectory)
    }

    pub fn can_capture_images(&self) -> bool {
        self.has(Capability::CaptureImage)
    }

    pub fn can_capture_video(&self) -> bool {
        self.has(Capability::CaptureVideo)
    }

    pub fn can_capture_audio(&self) -> bool {
        self.has(Capability::CaptureAudio)
    }

    pub fn can_capture_preview(&self) -> bool {
        self.has(Capability::CapturePreview)
    }

    pub fn can_configure(&self) -> bool {
        self.has(Capability::Configure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delete_only() {
        let abilities = Abilities::from_masks(
            "ModelA",
            0x04a9,
            0x3139,
            0,
            sys::GP_FILE_OPERATION_DELETE,
            0,
        );
        assert!(abilities.can_delete_files());
        assert!(!abilities.can_preview_viewfinder());
        assert!(!abilities.can_retrieve_raw());
        assert!(!abilities.can_retrieve_audio());
        assert!(!abilities.can_retrieve_exif());
        assert!(!abilities.can_delete_all());
        assert!(!abilities.can_upload_file());
        assert!(!abilities.can_create_directory());
        assert!(!abilities.can_delete_directory());
        assert!(!abilities.can_capture_images());
        assert!(!abilities.can_capture_video());
        assert!(!abilities.can_capture_audio());
        assert!(!abilities.can_capture_preview());
        assert!(!abilities.can_configure());
        assert_eq!(abilities.capabilities().count(), 1);
    }

    #[test]
    fn test_all_masks() {
        let abilities = Abilities::from_masks(
            "ModelB",
            0,
            0,
            sys::GP_OPERATION_CAPTURE_IMAGE | sys::GP_OPERATION_CONFIG,
            sys::GP_FILE_OPERATION_EXIF,
            sys::GP_FOLDER_OPERATION_PUT_FILE | sys::GP_FOLDER_OPERATION_MAKE_DIR,
        );
        let caps: Vec<_> = abilities.capabilities().collect();
        assert_eq!(
            caps,
            vec![
                Capability::RetrieveExif,
                Capability::UploadFile,
                Capability::CreateDirectory,
                Capability::CaptureImage,
                Capability::Configure,
            ]
        );
    }

    #[test]
    fn test_unknown_bits_ignored() {
        let abilities = Abilities::from_masks("ModelC", 0, 0, 1 << 20, 1 << 0, 1 << 12);
        assert_eq!(abilities.capabilities().count(), 0);
    }
}
