// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

use gphoto2_fs::{
    mock::{MockDriver, MockState},
    Abilities, AccessMode, Camera, CaptureKind, DeviceEntry, Driver, Error, ErrorCode,
    StorageInfo, WidgetValue,
};
use std::{cell::RefCell, error::Error as StdError, rc::Rc};

const MODEL: &str = "Creative Zen";

fn storage(base: &str, free: u64) -> StorageInfo {
    StorageInfo {
        base: Some(base.to_string()),
        label: Some(format!("{base} label")),
        description: Some("Internal".to_string()),
        access: Some(AccessMode::ReadWrite),
        capacity: Some(1 << 30),
        free_space: Some(free),
        ..Default::default()
    }
}

fn setup() -> (Rc<dyn Driver>, Rc<RefCell<MockState>>) {
    let mock = MockDriver::new()
        .with_camera(DeviceEntry::new(MODEL, "usb:"), Abilities::new(MODEL, 0x041e, 0x4157))
        .with_camera(
            DeviceEntry::new(MODEL, "usb:002,014"),
            Abilities::new(MODEL, 0x041e, 0x4157),
        )
        .with_storage(storage("/store_00010001", 1 << 20))
        .with_storage(storage("/store_00020001", 1 << 10))
        .with_file("/store_00010001/DCIM", "a.jpg", vec![1, 2, 3], "");
    let state = mock.state();
    (Rc::new(mock), state)
}

fn camera(driver: &Rc<dyn Driver>) -> Result<Camera, Box<dyn StdError>> {
    let mut cameras = Camera::detect(driver)?;
    assert_eq!(cameras.len(), 1);
    Ok(cameras.remove(0))
}

#[test]
fn test_detect() -> Result<(), Box<dyn StdError>> {
    let (driver, state) = setup();
    let camera = camera(&driver)?;

    assert_eq!(camera.name(), MODEL);
    assert_eq!(camera.port(), "usb:002,014");
    assert_eq!(camera.vendor(), 0x041e);
    assert_eq!(camera.product(), 0x4157);
    assert_eq!(camera.usb_bus(), Some(2));
    assert_eq!(camera.usb_device(), Some(14));
    assert!(!camera.is_connected());
    assert!(camera.storages().is_empty());
    assert!(camera.filesystems().is_empty());
    assert_eq!(state.borrow().opens, 0);

    Ok(())
}

#[test]
fn test_connect_disconnect() -> Result<(), Box<dyn StdError>> {
    let (driver, state) = setup();
    let mut camera = camera(&driver)?;

    camera.connect()?;
    assert!(camera.is_connected());
    assert_eq!(camera.storages().len(), 2);
    let bases: Vec<_> = camera.filesystems().iter().map(|fs| fs.base_dir()).collect();
    assert_eq!(bases, ["/store_00010001", "/store_00020001"]);

    assert!(matches!(camera.connect(), Err(Error::AlreadyConnected)));
    assert_eq!(state.borrow().opens, 1);

    camera.disconnect()?;
    assert!(!camera.is_connected());
    assert!(camera.storages().is_empty());
    assert_eq!(state.borrow().exits, 1);

    assert!(matches!(camera.disconnect(), Err(Error::NotConnected)));
    drop(camera);
    assert_eq!(state.borrow().exits, 1);

    Ok(())
}

#[test]
fn test_drop_exits_once() -> Result<(), Box<dyn StdError>> {
    let (driver, state) = setup();
    let mut camera = camera(&driver)?;
    camera.connect()?;
    drop(camera);

    assert_eq!(state.borrow().opens, 1);
    assert_eq!(state.borrow().exits, 1);

    Ok(())
}

#[test]
fn test_reconnect() -> Result<(), Box<dyn StdError>> {
    let (driver, state) = setup();
    let mut camera = camera(&driver)?;

    assert!(matches!(camera.reconnect(), Err(Error::NotConnected)));

    camera.connect()?;
    camera.reconnect()?;
    assert!(camera.is_connected());
    assert_eq!(state.borrow().opens, 2);
    assert_eq!(state.borrow().exits, 1);

    Ok(())
}

#[test]
fn test_connect_failure() -> Result<(), Box<dyn StdError>> {
    let (driver, state) = setup();
    let mut camera = camera(&driver)?;
    state.borrow_mut().fail_storages = Some(ErrorCode::Read);

    let err = camera.connect().unwrap_err();
    assert!(err.is(ErrorCode::Read));
    assert!(!camera.is_connected());
    assert!(camera.storages().is_empty());
    assert_eq!(state.borrow().exits, 1);

    state.borrow_mut().fail_storages = None;
    camera.connect()?;
    assert_eq!(camera.storages().len(), 2);

    Ok(())
}

#[test]
fn test_not_connected() -> Result<(), Box<dyn StdError>> {
    let (driver, _) = setup();
    let mut camera = camera(&driver)?;

    assert!(matches!(camera.summary(), Err(Error::NotConnected)));
    assert!(matches!(
        camera.capture(CaptureKind::Image),
        Err(Error::NotConnected)
    ));
    assert!(matches!(camera.config(), Err(Error::NotConnected)));
    assert!(matches!(camera.refresh_storages(), Err(Error::NotConnected)));

    Ok(())
}

#[test]
fn test_filesystem_for_base() -> Result<(), Box<dyn StdError>> {
    let (driver, _) = setup();
    let mut camera = camera(&driver)?;
    camera.connect()?;

    let fs = camera
        .filesystem_for_base("/store_00020001")
        .ok_or("storage missing")?;
    assert_eq!(fs.free_space(), 1 << 10);
    assert_eq!(fs.label(), "/store_00020001 label");
    assert!(camera.filesystem_for_base("/store_00030001").is_none());

    Ok(())
}

#[test]
fn test_refresh_storages() -> Result<(), Box<dyn StdError>> {
    let (driver, state) = setup();
    let mut camera = camera(&driver)?;
    camera.connect()?;

    state.borrow_mut().storages[0].free_space = Some(42);
    assert_eq!(camera.filesystems()[0].free_space(), 1 << 20);
    camera.refresh_storages()?;
    assert_eq!(camera.filesystems()[0].free_space(), 42);

    Ok(())
}

#[test]
fn test_capture() -> Result<(), Box<dyn StdError>> {
    let (driver, state) = setup();
    let mut camera = camera(&driver)?;
    camera.connect()?;

    let path = camera.capture(CaptureKind::Image)?;
    assert_eq!(path.folder, "/store_00010001");
    assert_eq!(path.name, "capt0001.jpg");
    assert!(state.borrow().file(&path.folder, &path.name).is_some());
    assert!(camera.filesystems()[0].contains_file("", "capt0001.jpg")?);

    let err = camera.capture(CaptureKind::Movie).unwrap_err();
    assert!(err.is(ErrorCode::NotSupported));

    Ok(())
}

#[test]
fn test_summary() -> Result<(), Box<dyn StdError>> {
    let (driver, _) = setup();
    let mut camera = camera(&driver)?;
    camera.connect()?;

    let summary = camera.summary()?;
    assert!(summary.contains(MODEL));

    Ok(())
}

#[test]
fn test_config() -> Result<(), Box<dyn StdError>> {
    let (driver, _) = setup();
    let mut camera = camera(&driver)?;
    camera.connect()?;

    let root = camera.config()?;
    let names: Vec<_> = root.iter().map(|w| w.name.as_str()).collect();
    assert_eq!(
        names,
        ["main", "settings", "owner", "beep", "status", "serialnumber"]
    );

    camera.set_config("owner", &WidgetValue::Text("Ada".to_string()))?;
    let root = camera.config()?;
    assert_eq!(
        root.find("owner").map(|w| &w.value),
        Some(&WidgetValue::Text("Ada".to_string()))
    );

    let beep = root.find("beep").ok_or("beep missing")?;
    assert_eq!(beep.parse_value("1"), Some(WidgetValue::Int(1)));
    assert_eq!(beep.parse_value("on"), None);

    let err = camera
        .set_config("serialnumber", &WidgetValue::Text("1".to_string()))
        .unwrap_err();
    assert!(err.is(ErrorCode::NotSupported));

    Ok(())
}
