// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

use super::{borrowed_string, cstring, Session};
use crate::{
    error::{Error, Result},
    widget::{Widget, WidgetKind, WidgetRange, WidgetValue},
};
use gphoto2_sys as sys;
use libc::{c_char, c_float, c_int, c_void};
use std::{
    ptr::{null, null_mut},
    rc::Rc,
};

/// A configuration window fetched from the camera, freed on drop.
pub(crate) struct Window {
    session: Rc<Session>,
    root: *mut sys::CameraWidget,
}

impl Window {
    pub fn get(session: &Rc<Session>, camera: *mut sys::Camera) -> Result<Self> {
        let mut root = null_mut();
        session.check("gp_camera_get_config", unsafe {
            session
                .lib()
                .gp_camera_get_config(camera, &mut root, session.context())
        })?;
        Ok(Self {
            session: Rc::clone(session),
            root,
        })
    }

    /// Copies the native tree into an owned [`Widget`].
    pub fn to_widget(&self) -> Result<Widget> {
        self.convert(self.root)
    }

    pub fn set_value(&self, name: &str, value: &WidgetValue) -> Result<()> {
        let lib = self.session.lib();
        let c_name = cstring(name)?;
        let mut child = null_mut();
        self.session.check("gp_widget_get_child_by_name", unsafe {
            lib.gp_widget_get_child_by_name(self.root, c_name.as_ptr(), &mut child)
        })?;

        let kind = self.kind(child)?;
        let code = match (kind, value) {
            (WidgetKind::Text | WidgetKind::Radio | WidgetKind::Menu, WidgetValue::Text(text)) => {
                let text = cstring(text)?;
                unsafe { lib.gp_widget_set_value(child, text.as_ptr().cast()) }
            }
            (WidgetKind::Range, WidgetValue::Float(v)) => {
                let v: c_float = *v;
                unsafe { lib.gp_widget_set_value(child, (&v as *const c_float).cast()) }
            }
            (WidgetKind::Range, WidgetValue::Int(v)) => {
                let v = *v as c_float;
                unsafe { lib.gp_widget_set_value(child, (&v as *const c_float).cast()) }
            }
            (WidgetKind::Toggle | WidgetKind::Date, WidgetValue::Int(v)) => {
                let v: c_int = *v;
                unsafe { lib.gp_widget_set_value(child, (&v as *const c_int).cast()) }
            }
            (kind, value) => {
                return Err(Error::InvalidArgument(format!(
                    "cannot set {kind:?} widget `{name}` to {value:?}"
                )))
            }
        };
        self.session.check("gp_widget_set_value", code)?;
        Ok(())
    }

    /// Sends the (modified) window back to the camera.
    pub fn apply(&self, camera: *mut sys::Camera) -> Result<()> {
        self.session.check("gp_camera_set_config", unsafe {
            self.session
                .lib()
                .gp_camera_set_config(camera, self.root, self.session.context())
        })?;
        Ok(())
    }

    fn kind(&self, widget: *mut sys::CameraWidget) -> Result<WidgetKind> {
        let mut raw: c_int = 0;
        self.session.check("gp_widget_get_type", unsafe {
            self.session.lib().gp_widget_get_type(widget, &mut raw)
        })?;
        WidgetKind::from_raw(raw)
            .ok_or_else(|| Error::InvalidArgument(format!("unknown widget type {raw}")))
    }

    fn text(
        &self,
        call: &str,
        widget: *mut sys::CameraWidget,
        get: unsafe fn(&sys::gphoto2, *mut sys::CameraWidget, *mut *const c_char) -> c_int,
    ) -> Result<String> {
        let mut text = null();
        self.session
            .check(call, unsafe { get(self.session.lib(), widget, &mut text) })?;
        Ok(borrowed_string(text))
    }

    fn convert(&self, widget: *mut sys::CameraWidget) -> Result<Widget> {
        let lib = self.session.lib();

        let mut id: c_int = 0;
        self.session
            .check("gp_widget_get_id", unsafe { lib.gp_widget_get_id(widget, &mut id) })?;
        let mut readonly: c_int = 0;
        self.session.check("gp_widget_get_readonly", unsafe {
            lib.gp_widget_get_readonly(widget, &mut readonly)
        })?;
        let kind = self.kind(widget)?;

        let mut node = Widget::new(
            self.text("gp_widget_get_name", widget, sys::gphoto2::gp_widget_get_name)?,
            kind,
        );
        node.id = id;
        node.readonly = readonly != 0;
        node.label = self.text("gp_widget_get_label", widget, sys::gphoto2::gp_widget_get_label)?;
        node.info = self.text("gp_widget_get_info", widget, sys::gphoto2::gp_widget_get_info)?;
        node.value = self.value(widget, kind)?;

        if matches!(kind, WidgetKind::Radio | WidgetKind::Menu) {
            let count = self.session.check("gp_widget_count_choices", unsafe {
                lib.gp_widget_count_choices(widget)
            })?;
            for index in 0..count {
                let mut choice = null();
                self.session.check("gp_widget_get_choice", unsafe {
                    lib.gp_widget_get_choice(widget, index, &mut choice)
                })?;
                node.choices.push(borrowed_string(choice));
            }
        }

        if kind == WidgetKind::Range {
            let (mut min, mut max, mut step): (c_float, c_float, c_float) = (0.0, 0.0, 0.0);
            self.session.check("gp_widget_get_range", unsafe {
                lib.gp_widget_get_range(widget, &mut min, &mut max, &mut step)
            })?;
            node.range = Some(WidgetRange { min, max, step });
        }

        let children = self.session.check("gp_widget_count_children", unsafe {
            lib.gp_widget_count_children(widget)
        })?;
        for index in 0..children {
            let mut child = null_mut();
            self.session.check("gp_widget_get_child", unsafe {
                lib.gp_widget_get_child(widget, index, &mut child)
            })?;
            node.children.push(self.convert(child)?);
        }

        Ok(node)
    }

    fn value(&self, widget: *mut sys::CameraWidget, kind: WidgetKind) -> Result<WidgetValue> {
        let lib = self.session.lib();
        Ok(match kind {
            WidgetKind::Window | WidgetKind::Section | WidgetKind::Button => WidgetValue::None,
            WidgetKind::Text | WidgetKind::Radio | WidgetKind::Menu => {
                let mut text: *const c_char = null();
                self.session.check("gp_widget_get_value", unsafe {
                    lib.gp_widget_get_value(widget, (&mut text as *mut *const c_char).cast::<c_void>())
                })?;
                WidgetValue::Text(borrowed_string(text))
            }
            WidgetKind::Range => {
                let mut value: c_float = 0.0;
                self.session.check("gp_widget_get_value", unsafe {
                    lib.gp_widget_get_value(widget, (&mut value as *mut c_float).cast::<c_void>())
                })?;
                WidgetValue::Float(value)
            }
            WidgetKind::Toggle | WidgetKind::Date => {
                let mut value: c_int = 0;
                self.session.check("gp_widget_get_value", unsafe {
                    lib.gp_widget_get_value(widget, (&mut value as *mut c_int).cast::<c_void>())
                })?;
                WidgetValue::Int(value)
            }
        })
    }
}

impl Drop for Window {
    fn drop(&mut self) {
        _ = unsafe { self.session.lib().gp_widget_free(self.root) };
    }
}
