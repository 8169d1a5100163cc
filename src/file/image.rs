// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

use super::File;

/// An image (bmp, jpeg, png, raw, tiff).
#[derive(Clone, Debug)]
pub struct ImageFile {
    file: File,
}

impl ImageFile {
    pub fn new(file: File) -> Self {
        Self { file }
    }

    pub fn file(&self) -> &File {
        &self.file
    }

    pub fn file_mut(&mut self) -> &mut File {
        &mut self.file
    }

    pub fn into_file(self) -> File {
        self.file
    }

    /// Bits per pixel.
    pub fn depth(&self) -> i64 {
        self.file.get_int("ImageBitDepth")
    }

    pub fn set_depth(&mut self, depth: i64) {
        self.file.set_int("ImageBitDepth", depth);
    }

    pub fn exposure_index(&self) -> i64 {
        self.file.get_int("ExposureIndex")
    }

    pub fn set_exposure_index(&mut self, index: i64) {
        self.file.set_int("ExposureIndex", index);
    }

    pub fn fnumber(&self) -> i64 {
        self.file.get_int("Fnumber")
    }

    pub fn set_fnumber(&mut self, fnumber: i64) {
        self.file.set_int("Fnumber", fnumber);
    }

    pub fn exposure_time(&self) -> i64 {
        self.file.get_int("ExposureTime")
    }

    pub fn set_exposure_time(&mut self, time: i64) {
        self.file.set_int("ExposureTime", time);
    }

    pub fn height(&self) -> i64 {
        self.file.get_int("Height")
    }

    pub fn set_height(&mut self, height: i64) {
        self.file.set_int("Height", height);
    }

    pub fn width(&self) -> i64 {
        self.file.get_int("Width")
    }

    pub fn set_width(&mut self, width: i64) {
        self.file.set_int("Width", width);
    }
}
