// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// What to capture with `capture`.
#[derive(clap::ValueEnum, Clone, Debug, PartialEq, Copy)]
pub enum CaptureSetting {
    /// Still image
    Image,
    /// Movie clip
    Movie,
    /// Sound recording
    Sound,
}

impl From<CaptureSetting> for gphoto2_fs::CaptureKind {
    fn from(setting: CaptureSetting) -> Self {
        match setting {
            CaptureSetting::Image => gphoto2_fs::CaptureKind::Image,
            CaptureSetting::Movie => gphoto2_fs::CaptureKind::Movie,
            CaptureSetting::Sound => gphoto2_fs::CaptureKind::Sound,
        }
    }
}

/// Command-line arguments for gphoto2-fs.
///
/// Global options can also be set through environment variables.
///
/// # Example
///
/// ```bash
/// # List the music folder of the first storage
/// gphoto2-fs ls /store_00010001 Music
///
/// # Use another library build and the second camera
/// export GPHOTO2_LIBRARY=/opt/gphoto2/lib/libgphoto2.so.6
/// gphoto2-fs --camera 1 storages
/// ```
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path or name of the libgphoto2 shared library
    #[arg(long, env = "GPHOTO2_LIBRARY", default_value = gphoto2_sys::LIBGPHOTO2)]
    pub library: PathBuf,

    /// Index of the camera to use, in detection order
    #[arg(short, long, env = "GPHOTO2_CAMERA", default_value = "0")]
    pub camera: usize,

    /// Print results as JSON
    #[arg(long, env = "GPHOTO2_JSON")]
    pub json: bool,

    /// Enable verbose debug logging
    #[arg(short, long, env = "GPHOTO2_VERBOSE")]
    pub verbose: bool,

    /// Send logs to the systemd journal
    #[arg(long, env = "GPHOTO2_JOURNALD")]
    pub journald: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List attached cameras
    Detect,

    /// List the storages of the camera
    Storages,

    /// List the folders and files of a directory
    Ls {
        /// Storage base directory, e.g. /store_00010001
        storage: String,
        /// Directory relative to the storage
        #[arg(default_value = "")]
        directory: String,
    },

    /// Recursively list every file below a directory
    Tree {
        storage: String,
        #[arg(default_value = "")]
        directory: String,
    },

    /// Count the files in a directory
    Count {
        storage: String,
        #[arg(default_value = "")]
        directory: String,
        /// Include subdirectories
        #[arg(short, long)]
        recursive: bool,
    },

    /// Download a file
    Get {
        storage: String,
        directory: String,
        filename: String,
        /// Destination, defaults to the file name in the current directory
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Upload a local file
    Put {
        storage: String,
        /// Local file to upload
        source: PathBuf,
        /// Destination directory, created when missing
        #[arg(default_value = "")]
        directory: String,
        /// Name on the device, defaults to the local file name
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Delete a file
    Rm {
        storage: String,
        directory: String,
        filename: String,
    },

    /// Create a directory and any missing parents
    Mkdir { storage: String, directory: String },

    /// Delete every file in a directory, then the directory itself
    Rmdir {
        storage: String,
        directory: String,
        /// Keep the emptied directory
        #[arg(long)]
        keep: bool,
    },

    /// Trigger a capture
    Capture {
        #[arg(value_enum, default_value = "image")]
        kind: CaptureSetting,
    },

    /// Show the configuration tree, one widget, or set a widget value
    Config {
        name: Option<String>,
        value: Option<String>,
    },

    /// Print the camera summary
    Summary,
}
