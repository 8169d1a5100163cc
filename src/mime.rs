// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

use serde::Serialize;

pub const WAV: &str = "audio/wav";
pub const RAW: &str = "image/x-raw";
pub const PNG: &str = "image/png";
pub const PGM: &str = "image/x-portable-graymap";
pub const PPM: &str = "image/x-portable-pixmap";
pub const PNM: &str = "image/x-portable-anymap";
pub const JPEG: &str = "image/jpeg";
pub const TIFF: &str = "image/tiff";
pub const BMP: &str = "image/bmp";
pub const QUICKTIME: &str = "video/quicktime";
pub const AVI: &str = "video/x-msvideo";
pub const CRW: &str = "image/x-canon-raw";
pub const UNKNOWN: &str = "application/octet-stream";
pub const EXIF: &str = "application/x-exif";
pub const MP3: &str = "audio/mpeg";
pub const OGG: &str = "application/ogg";
pub const WMA: &str = "audio/x-wma";
pub const ASF: &str = "audio/x-asf";
pub const MPEG: &str = "video/mpeg";

const EXTENSIONS: &[(&str, &str)] = &[
    (".asf", ASF),
    (".avi", AVI),
    (".bmp", BMP),
    (".crw", CRW),
    (".exif", EXIF),
    (".jpeg", JPEG),
    (".jpg", JPEG),
    (".mp3", MP3),
    (".mpg", MPEG),
    (".mpeg", MPEG),
    (".ogg", OGG),
    (".ogm", OGG),
    (".pgm", PGM),
    (".png", PNG),
    (".pnm", PNM),
    (".ppm", PPM),
    (".mov", QUICKTIME),
    (".raw", RAW),
    (".tiff", TIFF),
    (".wav", WAV),
    (".wma", WMA),
];

const PLAYLIST_SUFFIX: &str = ".zpl";

fn ends_with_ignore_case(name: &str, suffix: &str) -> bool {
    name.len() >= suffix.len()
        && name.is_char_boundary(name.len() - suffix.len())
        && name[name.len() - suffix.len()..].eq_ignore_ascii_case(suffix)
}

/// Guesses a MIME type from the filename suffix alone.
pub fn guess(filename: &str) -> &'static str {
    EXTENSIONS
        .iter()
        .find(|(suffix, _)| ends_with_ignore_case(filename, suffix))
        .map(|(_, mime)| *mime)
        .unwrap_or(UNKNOWN)
}

/// The typed file variant a filename maps to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum FileKind {
    Music,
    Image,
    Playlist,
    Generic,
}

impl FileKind {
    pub fn classify(filename: &str) -> Self {
        match guess(filename) {
            MP3 | WMA | WAV | OGG => FileKind::Music,
            BMP | JPEG | PNG | RAW | TIFF => FileKind::Image,
            _ if filename.ends_with(PLAYLIST_SUFFIX) => FileKind::Playlist,
            _ => FileKind::Generic,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guess_case_insensitive() {
        assert_eq!(guess("track.MP3"), MP3);
        assert_eq!(guess("track.mp3"), MP3);
        assert_eq!(guess("IMG_0001.JpG"), JPEG);
        assert_eq!(guess("clip.mpeg"), MPEG);
        assert_eq!(guess("clip.MOV"), QUICKTIME);
    }

    #[test]
    fn test_guess_unknown() {
        assert_eq!(guess("x.unknownext"), UNKNOWN);
        assert_eq!(guess("noextension"), UNKNOWN);
        assert_eq!(guess(""), UNKNOWN);
        assert_eq!(guess("ünïcödé"), UNKNOWN);
    }

    #[test]
    fn test_classify() {
        assert_eq!(FileKind::classify("song.ogg"), FileKind::Music);
        assert_eq!(FileKind::classify("song.wma"), FileKind::Music);
        assert_eq!(FileKind::classify("photo.tiff"), FileKind::Image);
        assert_eq!(FileKind::classify("photo.CRW"), FileKind::Generic);
        assert_eq!(FileKind::classify("party.zpl"), FileKind::Playlist);
        assert_eq!(FileKind::classify("movie.avi"), FileKind::Generic);
    }
}
