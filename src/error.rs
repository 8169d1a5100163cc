// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

use gphoto2_sys as sys;
use std::{fmt, io};

pub type Result<T> = std::result::Result<T, Error>;

/// Result codes reported by libgphoto2 and libgphoto2_port.
///
/// Codes in `(-100, 0)` come from the port library, the rest from the core
/// library. Anything not known here is kept as [`ErrorCode::Other`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    General,
    BadParameters,
    NoMemory,
    Library,
    UnknownPort,
    NotSupported,
    Io,
    FixedLimitExceeded,
    Timeout,
    SupportedSerial,
    SupportedUsb,
    Init,
    Read,
    Write,
    Update,
    SerialSpeed,
    UsbClearHalt,
    UsbFind,
    UsbClaim,
    Lock,
    Hal,
    CorruptedData,
    FileExists,
    ModelNotFound,
    DirectoryNotFound,
    FileNotFound,
    DirectoryExists,
    CameraBusy,
    PathNotAbsolute,
    Cancel,
    CameraError,
    OsFailure,
    NoSpace,
    Other(i32),
}

const CODES: &[(ErrorCode, i32, &str)] = &[
    (ErrorCode::General, sys::GP_ERROR, "Unspecified error"),
    (ErrorCode::BadParameters, sys::GP_ERROR_BAD_PARAMETERS, "Bad parameters"),
    (ErrorCode::NoMemory, sys::GP_ERROR_NO_MEMORY, "Out of memory"),
    (ErrorCode::Library, sys::GP_ERROR_LIBRARY, "Error loading a library"),
    (ErrorCode::UnknownPort, sys::GP_ERROR_UNKNOWN_PORT, "Unknown port"),
    (ErrorCode::NotSupported, sys::GP_ERROR_NOT_SUPPORTED, "Unsupported operation"),
    (ErrorCode::Io, sys::GP_ERROR_IO, "I/O problem"),
    (ErrorCode::FixedLimitExceeded, sys::GP_ERROR_FIXED_LIMIT_EXCEEDED, "Fixed limit exceeded"),
    (ErrorCode::Timeout, sys::GP_ERROR_TIMEOUT, "Timeout reading from or writing to the port"),
    (ErrorCode::SupportedSerial, sys::GP_ERROR_IO_SUPPORTED_SERIAL, "Serial port not supported"),
    (ErrorCode::SupportedUsb, sys::GP_ERROR_IO_SUPPORTED_USB, "USB port not supported"),
    (ErrorCode::Init, sys::GP_ERROR_IO_INIT, "Error initializing the port"),
    (ErrorCode::Read, sys::GP_ERROR_IO_READ, "Error reading from the port"),
    (ErrorCode::Write, sys::GP_ERROR_IO_WRITE, "Error writing to the port"),
    (ErrorCode::Update, sys::GP_ERROR_IO_UPDATE, "Error updating the port settings"),
    (ErrorCode::SerialSpeed, sys::GP_ERROR_IO_SERIAL_SPEED, "Error setting the serial port speed"),
    (ErrorCode::UsbClearHalt, sys::GP_ERROR_IO_USB_CLEAR_HALT, "Error clearing a halt condition on the USB port"),
    (ErrorCode::UsbFind, sys::GP_ERROR_IO_USB_FIND, "Could not find the requested device on the USB port"),
    (ErrorCode::UsbClaim, sys::GP_ERROR_IO_USB_CLAIM, "Could not claim the USB device"),
    (ErrorCode::Lock, sys::GP_ERROR_IO_LOCK, "Could not lock the device"),
    (ErrorCode::Hal, sys::GP_ERROR_HAL, "libhal error"),
    (ErrorCode::CorruptedData, sys::GP_ERROR_CORRUPTED_DATA, "Corrupted data"),
    (ErrorCode::FileExists, sys::GP_ERROR_FILE_EXISTS, "File exists"),
    (ErrorCode::ModelNotFound, sys::GP_ERROR_MODEL_NOT_FOUND, "Unknown model"),
    (ErrorCode::DirectoryNotFound, sys::GP_ERROR_DIRECTORY_NOT_FOUND, "Directory not found"),
    (ErrorCode::FileNotFound, sys::GP_ERROR_FILE_NOT_FOUND, "File not found"),
    (ErrorCode::DirectoryExists, sys::GP_ERROR_DIRECTORY_EXISTS, "Directory exists"),
    (ErrorCode::CameraBusy, sys::GP_ERROR_CAMERA_BUSY, "I/O in progress"),
    (ErrorCode::PathNotAbsolute, sys::GP_ERROR_PATH_NOT_ABSOLUTE, "Path not absolute"),
    (ErrorCode::Cancel, sys::GP_ERROR_CANCEL, "Cancelled"),
    (ErrorCode::CameraError, sys::GP_ERROR_CAMERA_ERROR, "The camera reported an error"),
    (ErrorCode::OsFailure, sys::GP_ERROR_OS_FAILURE, "Unspecified failure of the operating system"),
    (ErrorCode::NoSpace, sys::GP_ERROR_NO_SPACE, "Not enough space"),
];

impl ErrorCode {
    pub fn from_raw(code: i32) -> Self {
        CODES
            .iter()
            .find(|(_, raw, _)| *raw == code)
            .map(|(known, _, _)| *known)
            .unwrap_or(ErrorCode::Other(code))
    }

    pub fn raw(self) -> i32 {
        match self {
            ErrorCode::Other(code) => code,
            known => CODES
                .iter()
                .find(|(c, _, _)| *c == known)
                .map(|(_, raw, _)| *raw)
                .unwrap_or(sys::GP_ERROR),
        }
    }

    /// True when the code belongs to the port I/O range rather than the core
    /// library range.
    pub fn is_port_error(self) -> bool {
        let raw = self.raw();
        raw < 0 && raw > -100
    }

    /// Fixed English description, used when no native library is available
    /// to render the code.
    pub fn description(self) -> &'static str {
        CODES
            .iter()
            .find(|(c, _, _)| *c == self)
            .map(|(_, _, text)| *text)
            .unwrap_or("Unknown error")
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCode::Other(code) => write!(f, "Other({code})"),
            known => write!(f, "{known:?}"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{code} ({}): {message}", .code.raw())]
    Native { code: ErrorCode, message: String },

    #[error("Camera has not been connected to yet")]
    NotConnected,

    #[error("Camera has already been connected to")]
    AlreadyConnected,

    #[error("`{0}` is a local file and cannot be used for device I/O")]
    LocalFile(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("No storage with base directory `{0}`")]
    UnknownStorage(String),

    #[error("Cannot load libgphoto2: {0}")]
    Library(String),

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl Error {
    /// Builds a native error with the built-in description of `code`.
    pub fn native(code: ErrorCode) -> Self {
        Error::Native {
            code,
            message: code.description().to_string(),
        }
    }

    /// The native result code carried by this error, if any.
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            Error::Native { code, .. } => Some(*code),
            _ => None,
        }
    }

    pub fn is(&self, code: ErrorCode) -> bool {
        self.code() == Some(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_round_trip() {
        for (code, raw, _) in CODES {
            assert_eq!(ErrorCode::from_raw(*raw), *code);
            assert_eq!(code.raw(), *raw);
        }
        assert_eq!(ErrorCode::from_raw(-999), ErrorCode::Other(-999));
        assert_eq!(ErrorCode::Other(-999).raw(), -999);
    }

    #[test]
    fn test_port_range() {
        assert!(ErrorCode::UsbClaim.is_port_error());
        assert!(ErrorCode::General.is_port_error());
        assert!(!ErrorCode::DirectoryNotFound.is_port_error());
        assert!(!ErrorCode::Other(3).is_port_error());
    }

    #[test]
    fn test_error_code_lookup() {
        let err = Error::native(ErrorCode::DirectoryNotFound);
        assert!(err.is(ErrorCode::DirectoryNotFound));
        assert!(!err.is(ErrorCode::FileNotFound));
        assert_eq!(err.to_string(), "DirectoryNotFound (-107): Directory not found");
        assert_eq!(Error::NotConnected.code(), None);
    }
}
