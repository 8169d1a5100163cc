// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

//! Helpers for the '/'-separated paths the camera library expects.

pub const SEPARATOR: char = '/';

/// Appends `tail` to `head` with exactly one separator between them.
///
/// An empty `tail` (or one that is just "/") leaves `head` unchanged.
pub fn combine(head: &str, tail: &str) -> String {
    if tail.is_empty() || tail == "/" {
        return head.to_string();
    }

    let tail = tail.strip_prefix(SEPARATOR).unwrap_or(tail);
    let head = head.strip_suffix(SEPARATOR).unwrap_or(head);

    format!("{head}{SEPARATOR}{tail}")
}

/// Non-empty components of `path`.
pub fn components(path: &str) -> impl Iterator<Item = &str> {
    path.split(SEPARATOR).filter(|s| !s.is_empty())
}

/// A full device path split into its storage, directory and filename parts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DevicePath {
    /// Storage base directory, always with a leading "/".
    pub storage: String,
    /// Directory relative to the storage, "" for the storage root.
    pub directory: String,
    pub filename: String,
}

/// Splits `/store_00010001/Music/Album/track.mp3` into its storage base,
/// directory and filename. Returns `None` when there are fewer than two
/// components.
pub fn split_device_path(path: &str) -> Option<DevicePath> {
    let parts: Vec<&str> = components(path).collect();
    if parts.len() < 2 {
        return None;
    }

    let directory = parts[1..parts.len() - 1]
        .iter()
        .fold(String::new(), |acc, part| combine(&acc, part));

    Some(DevicePath {
        storage: format!("{SEPARATOR}{}", parts[0]),
        directory,
        filename: parts[parts.len() - 1].to_string(),
    })
}

/// Splits `path` at its last separator into (parent, name).
pub fn split_parent(path: &str) -> (&str, &str) {
    match path.rfind(SEPARATOR) {
        Some(index) => (&path[..index], &path[index + 1..]),
        None => ("", path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combine() {
        assert_eq!(combine("a/", "/b"), "a/b");
        assert_eq!(combine("a", "b"), "a/b");
        assert_eq!(combine("a", ""), "a");
        assert_eq!(combine("a", "/"), "a");
        assert_eq!(combine("/store_0001", "DCIM/100CANON"), "/store_0001/DCIM/100CANON");
        assert_eq!(combine("", "DCIM"), "/DCIM");
    }

    #[test]
    fn test_split_device_path() {
        let path = split_device_path("/store_00010001/Music/Album/track.mp3").unwrap();
        assert_eq!(path.storage, "/store_00010001");
        assert_eq!(path.directory, "/Music/Album");
        assert_eq!(path.filename, "track.mp3");

        let root = split_device_path("//store_00010001//track.mp3").unwrap();
        assert_eq!(root.storage, "/store_00010001");
        assert_eq!(root.directory, "");
        assert_eq!(root.filename, "track.mp3");

        assert_eq!(split_device_path("/track.mp3"), None);
    }

    #[test]
    fn test_split_parent() {
        assert_eq!(split_parent("/store/a/b"), ("/store/a", "b"));
        assert_eq!(split_parent("/store"), ("", "store"));
        assert_eq!(split_parent("plain"), ("", "plain"));
    }
}
