// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

use super::{borrowed_string, cstring, Session};
use crate::error::Result;
use gphoto2_sys as sys;
use std::{ptr::null_mut, rc::Rc};
use tracing::debug;

/// Owned `CameraList`.
pub(crate) struct CameraList {
    session: Rc<Session>,
    list: *mut sys::CameraList,
}

impl CameraList {
    pub fn new(session: &Rc<Session>) -> Result<Self> {
        let mut list = null_mut();
        session.check("gp_list_new", unsafe { session.lib().gp_list_new(&mut list) })?;
        Ok(Self {
            session: Rc::clone(session),
            list,
        })
    }

    pub fn as_ptr(&self) -> *mut sys::CameraList {
        self.list
    }

    pub fn len(&self) -> Result<usize> {
        let count = self
            .session
            .check("gp_list_count", unsafe { self.session.lib().gp_list_count(self.list) })?;
        Ok(count as usize)
    }

    pub fn names(&self) -> Result<Vec<String>> {
        (0..self.len()?).map(|i| self.name(i)).collect()
    }

    /// (name, value) pairs, as filled in by detection.
    pub fn entries(&self) -> Result<Vec<(String, String)>> {
        (0..self.len()?)
            .map(|i| Ok((self.name(i)?, self.value(i)?)))
            .collect()
    }

    fn name(&self, index: usize) -> Result<String> {
        let mut name = std::ptr::null();
        self.session.check("gp_list_get_name", unsafe {
            self.session
                .lib()
                .gp_list_get_name(self.list, index as i32, &mut name)
        })?;
        Ok(borrowed_string(name))
    }

    fn value(&self, index: usize) -> Result<String> {
        let mut value = std::ptr::null();
        self.session.check("gp_list_get_value", unsafe {
            self.session
                .lib()
                .gp_list_get_value(self.list, index as i32, &mut value)
        })?;
        Ok(borrowed_string(value))
    }
}

impl Drop for CameraList {
    fn drop(&mut self) {
        _ = unsafe { self.session.lib().gp_list_free(self.list) };
    }
}

/// Owned `CameraAbilitiesList`, loaded with every driver the library ships.
pub(crate) struct AbilitiesList {
    session: Rc<Session>,
    list: *mut sys::CameraAbilitiesList,
}

impl AbilitiesList {
    pub fn load(session: &Rc<Session>) -> Result<Self> {
        let mut list = null_mut();
        session.check("gp_abilities_list_new", unsafe {
            session.lib().gp_abilities_list_new(&mut list)
        })?;
        let list = Self {
            session: Rc::clone(session),
            list,
        };
        session.check("gp_abilities_list_load", unsafe {
            session
                .lib()
                .gp_abilities_list_load(list.list, session.context())
        })?;
        Ok(list)
    }

    pub fn as_ptr(&self) -> *mut sys::CameraAbilitiesList {
        self.list
    }

    pub fn lookup_model(&self, model: &str) -> Result<i32> {
        let model = cstring(model)?;
        self.session.check("gp_abilities_list_lookup_model", unsafe {
            self.session
                .lib()
                .gp_abilities_list_lookup_model(self.list, model.as_ptr())
        })
    }

    pub fn get(&self, index: i32) -> Result<sys::CameraAbilities> {
        let mut abilities = sys::CameraAbilities::zeroed();
        self.session.check("gp_abilities_list_get_abilities", unsafe {
            self.session
                .lib()
                .gp_abilities_list_get_abilities(self.list, index, &mut abilities)
        })?;
        Ok(abilities)
    }
}

impl Drop for AbilitiesList {
    fn drop(&mut self) {
        _ = unsafe { self.session.lib().gp_abilities_list_free(self.list) };
        debug!("abilities list freed");
    }
}

/// Owned `GPPortInfoList`.
pub(crate) struct PortInfoList {
    session: Rc<Session>,
    list: *mut sys::GPPortInfoList,
}

impl PortInfoList {
    pub fn load(session: &Rc<Session>) -> Result<Self> {
        let mut list = null_mut();
        session.check("gp_port_info_list_new", unsafe {
            session.lib().gp_port_info_list_new(&mut list)
        })?;
        let list = Self {
            session: Rc::clone(session),
            list,
        };
        session.check("gp_port_info_list_load", unsafe {
            session.lib().gp_port_info_list_load(list.list)
        })?;
        Ok(list)
    }

    pub fn as_ptr(&self) -> *mut sys::GPPortInfoList {
        self.list
    }

    /// Finds the port called `path`. The returned info is owned by the list
    /// and must not outlive it.
    pub fn lookup(&self, path: &str) -> Result<sys::GPPortInfo> {
        let path = cstring(path)?;
        let index = self.session.check("gp_port_info_list_lookup_path", unsafe {
            self.session
                .lib()
                .gp_port_info_list_lookup_path(self.list, path.as_ptr())
        })?;
        let mut info = null_mut();
        self.session.check("gp_port_info_list_get_info", unsafe {
            self.session
                .lib()
                .gp_port_info_list_get_info(self.list, index, &mut info)
        })?;
        Ok(info)
    }
}

impl Drop for PortInfoList {
    fn drop(&mut self) {
        _ = unsafe { self.session.lib().gp_port_info_list_free(self.list) };
    }
}
