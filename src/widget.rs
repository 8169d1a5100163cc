// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

use gphoto2_sys as sys;
use serde::Serialize;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum WidgetKind {
    Window,
    Section,
    Text,
    Range,
    Toggle,
    Radio,
    Menu,
    Button,
    Date,
}

impl WidgetKind {
    pub fn from_raw(raw: i32) -> Option<Self> {
        Some(match raw {
            sys::GP_WIDGET_WINDOW => WidgetKind::Window,
            sys::GP_WIDGET_SECTION => WidgetKind::Section,
            sys::GP_WIDGET_TEXT => WidgetKind::Text,
            sys::GP_WIDGET_RANGE => WidgetKind::Range,
            sys::GP_WIDGET_TOGGLE => WidgetKind::Toggle,
            sys::GP_WIDGET_RADIO => WidgetKind::Radio,
            sys::GP_WIDGET_MENU => WidgetKind::Menu,
            sys::GP_WIDGET_BUTTON => WidgetKind::Button,
            sys::GP_WIDGET_DATE => WidgetKind::Date,
            _ => return None,
        })
    }

    /// True for widgets that only group other widgets.
    pub fn is_container(self) -> bool {
        matches!(self, WidgetKind::Window | WidgetKind::Section)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum WidgetValue {
    None,
    Text(String),
    Float(f32),
    Int(i32),
}

impl fmt::Display for WidgetValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WidgetValue::None => Ok(()),
            WidgetValue::Text(s) => f.write_str(s),
            WidgetValue::Float(v) => write!(f, "{v}"),
            WidgetValue::Int(v) => write!(f, "{v}"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct WidgetRange {
    pub min: f32,
    pub max: f32,
    pub step: f32,
}

/// One node of a camera configuration tree, copied out of the native widget.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Widget {
    pub id: i32,
    pub name: String,
    pub label: String,
    pub info: String,
    pub kind: WidgetKind,
    pub readonly: bool,
    pub value: WidgetValue,
    pub choices: Vec<String>,
    pub range: Option<WidgetRange>,
    pub children: Vec<Widget>,
}

impl Widget {
    pub fn new(name: impl Into<String>, kind: WidgetKind) -> Self {
        let name = name.into();
        Self {
            id: 0,
            label: name.clone(),
            name,
            info: String::new(),
            kind,
            readonly: false,
            value: WidgetValue::None,
            choices: Vec::new(),
            range: None,
            children: Vec::new(),
        }
    }

    pub fn with_value(mut self, value: WidgetValue) -> Self {
        self.value = value;
        self
    }

    pub fn with_child(mut self, child: Widget) -> Self {
        self.children.push(child);
        self
    }

    /// Depth-first search for the first widget called `name`, this one
    /// included.
    pub fn find(&self, name: &str) -> Option<&Widget> {
        self.iter().find(|w| w.name == name)
    }

    pub fn find_mut(&mut self, name: &str) -> Option<&mut Widget> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter_mut().find_map(|c| c.find_mut(name))
    }

    /// Pre-order traversal of the tree.
    pub fn iter(&self) -> WidgetIter<'_> {
        WidgetIter { stack: vec![self] }
    }

    /// Parses `text` into a value suitable for this widget's kind.
    pub fn parse_value(&self, text: &str) -> Option<WidgetValue> {
        match self.kind {
            WidgetKind::Window | WidgetKind::Section | WidgetKind::Button => None,
            WidgetKind::Text | WidgetKind::Radio | WidgetKind::Menu => {
                Some(WidgetValue::Text(text.to_string()))
            }
            WidgetKind::Range => text.trim().parse().ok().map(WidgetValue::Float),
            WidgetKind::Toggle | WidgetKind::Date => {
                text.trim().parse().ok().map(WidgetValue::Int)
            }
        }
    }
}

pub struct WidgetIter<'a> {
    stack: Vec<&'a Widget>,
}

impl<'a> Iterator for WidgetIter<'a> {
    type Item = &'a Widget;

    fn next(&mut self) -> Option<Self::Item> {
        let widget = self.stack.pop()?;
        self.stack.extend(widget.children.iter().rev());
        Some(widget)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> Widget {
        Widget::new("main", WidgetKind::Window)
            .with_child(
                Widget::new("settings", WidgetKind::Section)
                    .with_child(
                        Widget::new("owner", WidgetKind::Text)
                            .with_value(WidgetValue::Text("alice".into())),
                    )
                    .with_child(Widget::new("beep", WidgetKind::Toggle).with_value(WidgetValue::Int(1))),
            )
            .with_child(
                Widget::new("status", WidgetKind::Section)
                    .with_child(Widget::new("battery", WidgetKind::Text)),
            )
    }

    #[test]
    fn test_iter_pre_order() {
        let names: Vec<_> = tree().iter().map(|w| w.name.clone()).collect();
        assert_eq!(
            names,
            vec!["main", "settings", "owner", "beep", "status", "battery"]
        );
    }

    #[test]
    fn test_find() {
        let tree = tree();
        assert_eq!(
            tree.find("owner").map(|w| &w.value),
            Some(&WidgetValue::Text("alice".into()))
        );
        assert!(tree.find("missing").is_none());
    }

    #[test]
    fn test_parse_value() {
        let tree = tree();
        let beep = tree.find("beep").unwrap();
        assert_eq!(beep.parse_value("0"), Some(WidgetValue::Int(0)));
        assert_eq!(beep.parse_value("off"), None);
        assert_eq!(tree.parse_value("x"), None);
    }
}
