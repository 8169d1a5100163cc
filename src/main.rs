// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

mod args;

use args::{Args, Command};
use clap::Parser;
use gphoto2_fs::{
    native::Gphoto2Driver, Camera, Driver, Error as CameraError, FileSystem, TypedFile, Widget,
    WidgetValue,
};
use serde::Serialize;
use serde_json::json;
use std::{error::Error, io, path::PathBuf, rc::Rc};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Serialize)]
struct CameraRow<'a> {
    name: &'a str,
    port: &'a str,
    vendor: u16,
    product: u16,
    usb_bus: Option<u32>,
    usb_device: Option<u32>,
}

impl<'a> From<&'a Camera> for CameraRow<'a> {
    fn from(camera: &'a Camera) -> Self {
        Self {
            name: camera.name(),
            port: camera.port(),
            vendor: camera.vendor(),
            product: camera.product(),
            usb_bus: camera.usb_bus(),
            usb_device: camera.usb_device(),
        }
    }
}

fn init_logging(args: &Args) {
    let filter = if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let journald = if args.journald {
        match tracing_journald::layer() {
            Ok(layer) => Some(layer),
            Err(e) => {
                eprintln!("journald unavailable, logging to stderr: {e}");
                None
            }
        }
    } else {
        None
    };

    let stderr = journald
        .is_none()
        .then(|| tracing_subscriber::fmt::layer().with_writer(io::stderr));

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr)
        .with(journald)
        .init();
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    init_logging(&args);

    let driver: Rc<dyn Driver> = Rc::new(Gphoto2Driver::new(&args.library)?);
    let mut cameras = Camera::detect(&driver)?;

    if let Command::Detect = args.command {
        return detect(&cameras, args.json);
    }

    if args.camera >= cameras.len() {
        return Err(format!(
            "camera {} not found, {} detected",
            args.camera,
            cameras.len()
        )
        .into());
    }
    let mut camera = cameras.swap_remove(args.camera);
    drop(cameras);

    camera.connect()?;
    let result = run(&camera, &args);
    if let Err(e) = camera.disconnect() {
        warn!("disconnect failed: {e}");
    }
    result
}

fn detect(cameras: &[Camera], json: bool) -> Result<(), Box<dyn Error>> {
    if json {
        let rows: Vec<CameraRow> = cameras.iter().map(CameraRow::from).collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    for (index, camera) in cameras.iter().enumerate() {
        println!(
            "{index}: {} on {} [{:04x}:{:04x}]",
            camera.name(),
            camera.port(),
            camera.vendor(),
            camera.product()
        );
    }
    Ok(())
}

fn filesystem<'a>(camera: &'a Camera, base: &str) -> Result<FileSystem<'a>, CameraError> {
    camera
        .filesystem_for_base(base)
        .ok_or_else(|| CameraError::UnknownStorage(base.to_string()))
}

fn run(camera: &Camera, args: &Args) -> Result<(), Box<dyn Error>> {
    let json = args.json;

    match &args.command {
        Command::Detect => unreachable!("handled before connecting"),

        Command::Storages => {
            if json {
                println!("{}", serde_json::to_string_pretty(camera.storages())?);
                return Ok(());
            }
            for fs in camera.filesystems() {
                println!(
                    "{}\t{}\t{}/{} bytes free\t{}{}{}",
                    fs.base_dir(),
                    fs.description(),
                    fs.free_space(),
                    fs.capacity(),
                    if fs.can_read() { "r" } else { "-" },
                    if fs.can_write() { "w" } else { "-" },
                    if fs.can_delete() { "d" } else { "-" },
                );
            }
        }

        Command::Ls { storage, directory } => {
            let fs = filesystem(camera, storage)?;
            let folders = fs.folders(directory)?;
            let files = fs.files(directory)?;
            if json {
                let files: Vec<_> = files
                    .iter()
                    .map(|file| {
                        let file = file.file();
                        json!({
                            "name": file.filename(),
                            "size": file.size(),
                            "mime_type": file.mime_type(),
                            "kind": file.kind(),
                        })
                    })
                    .collect();
                let listing = json!({ "folders": folders, "files": files });
                println!("{}", serde_json::to_string_pretty(&listing)?);
                return Ok(());
            }
            for folder in &folders {
                println!("{folder}/");
            }
            for file in &files {
                print_file(file);
            }
        }

        Command::Tree { storage, directory } => {
            let fs = filesystem(camera, storage)?;
            let mut entries = Vec::new();
            let mut count = 0;
            for entry in fs.walk(directory) {
                match entry {
                    Ok(entry) if json => entries.push(entry),
                    Ok(entry) => {
                        count += 1;
                        println!("{}", entry.path());
                    }
                    Err(e) => warn!("{e}"),
                }
            }
            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else {
                println!("{count} files");
            }
        }

        Command::Count {
            storage,
            directory,
            recursive,
        } => {
            let count = filesystem(camera, storage)?.count(directory, *recursive)?;
            if json {
                println!("{}", json!({ "count": count }));
            } else {
                println!("{count}");
            }
        }

        Command::Get {
            storage,
            directory,
            filename,
            output,
        } => {
            let fs = filesystem(camera, storage)?;
            let file = fs.file_untyped(directory, filename)?;
            let output = output.clone().unwrap_or_else(|| PathBuf::from(filename));
            let mut writer = std::fs::File::create(&output)?;
            let bytes = fs.download_to(&file, &mut writer)?;
            info!("{bytes} bytes written to {}", output.display());
        }

        Command::Put {
            storage,
            source,
            directory,
            name,
        } => {
            let fs = filesystem(camera, storage)?;
            let local = TypedFile::local(source)?;
            if !fs.can_upload(local.file()) {
                return Err(format!("{} does not fit on {}", source.display(), fs.base_dir()).into());
            }
            let name = name
                .clone()
                .unwrap_or_else(|| local.file().filename().to_string());
            let uploaded = fs.upload(local.file(), directory, &name)?;
            if json {
                println!(
                    "{}",
                    json!({ "path": uploaded.file().device_path(), "kind": uploaded.kind() })
                );
            } else {
                print_file(&uploaded);
            }
        }

        Command::Rm {
            storage,
            directory,
            filename,
        } => filesystem(camera, storage)?.delete_file(directory, filename)?,

        Command::Mkdir { storage, directory } => {
            filesystem(camera, storage)?.create_directory(directory)?
        }

        Command::Rmdir {
            storage,
            directory,
            keep,
        } => filesystem(camera, storage)?.delete_all(directory, !keep)?,

        Command::Capture { kind } => {
            let path = camera.capture((*kind).into())?;
            if json {
                println!("{}", serde_json::to_string(&path)?);
            } else {
                println!("{}/{}", path.folder, path.name);
            }
        }

        Command::Config { name, value } => {
            let root = camera.config()?;
            let Some(name) = name else {
                if json {
                    println!("{}", serde_json::to_string_pretty(&root)?);
                } else {
                    print_config(&root, 0);
                }
                return Ok(());
            };

            let widget = root
                .find(name)
                .ok_or_else(|| CameraError::InvalidArgument(format!("no setting named {name}")))?;

            match value {
                Some(text) => {
                    let value = parse_setting(widget, text)?;
                    camera.set_config(name, &value)?;
                    info!("{name} set to {value}");
                }
                None if json => println!("{}", serde_json::to_string_pretty(widget)?),
                None => print_config(widget, 0),
            }
        }

        Command::Summary => {
            let summary = camera.summary()?;
            if json {
                println!("{}", json!({ "summary": summary }));
            } else {
                println!("{summary}");
            }
        }
    }

    Ok(())
}

fn parse_setting(widget: &Widget, text: &str) -> Result<WidgetValue, CameraError> {
    if widget.readonly {
        return Err(CameraError::InvalidArgument(format!(
            "{} is read-only",
            widget.name
        )));
    }
    widget.parse_value(text).ok_or_else(|| {
        CameraError::InvalidArgument(format!("{text:?} is not valid for {}", widget.name))
    })
}

fn print_file(file: &TypedFile) {
    match file {
        TypedFile::Music(track) => println!(
            "{}\t{}\t{} - {}",
            track.file().filename(),
            track.file().size(),
            track.artist(),
            track.title()
        ),
        TypedFile::Playlist(playlist) => println!(
            "{}\t{} entries",
            playlist.file().filename(),
            playlist.paths().len()
        ),
        other => println!(
            "{}\t{}\t{}",
            other.file().filename(),
            other.file().size(),
            other.file().mime_type()
        ),
    }
}

fn print_config(widget: &Widget, depth: usize) {
    let indent = "  ".repeat(depth);
    if widget.kind.is_container() {
        println!("{indent}{} ({})", widget.name, widget.label);
    } else {
        let lock = if widget.readonly { " [ro]" } else { "" };
        println!("{indent}{} = {}{lock}", widget.name, widget.value);
        if !widget.choices.is_empty() {
            println!("{indent}  choices: {}", widget.choices.join(", "));
        }
    }
    for child in &widget.children {
        print_config(child, depth + 1);
    }
}
