// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

//! Tests against libgphoto2 and a real device. Run with
//! `cargo test --test test_native -- --ignored` with a camera attached.

use gphoto2_fs::{native::Gphoto2Driver, Camera, Driver};
use serial_test::serial;
use std::{error::Error, rc::Rc, time::Instant};

fn driver() -> Result<Rc<dyn Driver>, Box<dyn Error>> {
    let library =
        std::env::var("GPHOTO2_LIBRARY").unwrap_or_else(|_| gphoto2_sys::LIBGPHOTO2.to_string());
    Ok(Rc::new(Gphoto2Driver::new(library)?))
}

#[test]
#[ignore = "requires libgphoto2"]
#[serial]
fn test_version() -> Result<(), Box<dyn Error>> {
    let driver = Gphoto2Driver::new(gphoto2_sys::LIBGPHOTO2)?;
    let version = driver.version().ok_or("no version string")?;
    println!("libgphoto2 {version}");
    assert!(version.starts_with('2'));
    Ok(())
}

#[test]
#[ignore = "requires libgphoto2"]
#[serial]
fn test_detect() -> Result<(), Box<dyn Error>> {
    let cameras = Camera::detect(&driver()?)?;
    for camera in &cameras {
        println!("{camera:?}");
        assert_ne!(camera.port(), "usb:");
    }
    Ok(())
}

#[test]
#[ignore = "requires an attached camera"]
#[serial]
fn test_connect_walk() -> Result<(), Box<dyn Error>> {
    let mut cameras = Camera::detect(&driver()?)?;
    let camera = cameras.first_mut().ok_or("no camera attached")?;

    let now = Instant::now();
    camera.connect()?;
    println!("connect: {:?}", now.elapsed());
    assert!(!camera.storages().is_empty());

    for fs in camera.filesystems() {
        let now = Instant::now();
        let count = fs.count("", true)?;
        println!(
            "{} ({}): {count} files, {} of {} bytes free, walked in {:?}",
            fs.base_dir(),
            fs.description(),
            fs.free_space(),
            fs.capacity(),
            now.elapsed()
        );
        assert_eq!(fs.count("", false)?, fs.files("")?.len());
    }

    camera.disconnect()?;
    assert!(!camera.is_connected());
    Ok(())
}

#[test]
#[ignore = "requires an attached camera"]
#[serial]
fn test_reconnect() -> Result<(), Box<dyn Error>> {
    let mut cameras = Camera::detect(&driver()?)?;
    let camera = cameras.first_mut().ok_or("no camera attached")?;

    camera.connect()?;
    let storages = camera.storages().len();
    camera.reconnect()?;
    assert_eq!(camera.storages().len(), storages);
    println!("{}", camera.summary()?);
    Ok(())
}
