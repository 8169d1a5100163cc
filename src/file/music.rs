// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

use super::File;
use crate::error::{Error, Result};

const ALBUM: &str = "AlbumName";
const ARTIST: &str = "Artist";
const BITRATE: &str = "AudioBitDepth";
const DURATION: &str = "Duration";
const FORMAT: &str = "AudioWAVECodec";
const GENRE: &str = "Genre";
const TITLE: &str = "Name";
const TRACK: &str = "Track";
const USE_COUNT: &str = "UseCount";
const RELEASE_DATE: &str = "OriginalReleaseDate";

/// A music track (mp3, wma, wav, ogg).
///
/// Two tracks are equal when album, artist, title and track number match,
/// wherever they are stored.
#[derive(Clone, Debug)]
pub struct MusicFile {
    file: File,
}

impl MusicFile {
    pub fn new(file: File) -> Self {
        Self { file }
    }

    pub fn file(&self) -> &File {
        &self.file
    }

    pub fn file_mut(&mut self) -> &mut File {
        &mut self.file
    }

    pub fn into_file(self) -> File {
        self.file
    }

    pub fn album(&self) -> &str {
        self.file.get_str(ALBUM)
    }

    pub fn set_album(&mut self, album: &str) {
        self.file.set_str(ALBUM, album);
    }

    pub fn artist(&self) -> &str {
        self.file.get_str(ARTIST)
    }

    pub fn set_artist(&mut self, artist: &str) {
        self.file.set_str(ARTIST, artist);
    }

    pub fn bitrate(&self) -> i64 {
        self.file.get_int(BITRATE)
    }

    pub fn set_bitrate(&mut self, bitrate: i64) {
        self.file.set_int(BITRATE, bitrate);
    }

    /// Duration in milliseconds.
    pub fn duration(&self) -> i64 {
        self.file.get_int(DURATION)
    }

    pub fn set_duration(&mut self, duration: i64) {
        self.file.set_int(DURATION, duration);
    }

    pub fn format(&self) -> &str {
        self.file.get_str(FORMAT)
    }

    pub fn set_format(&mut self, format: &str) {
        self.file.set_str(FORMAT, format);
    }

    pub fn genre(&self) -> &str {
        self.file.get_str(GENRE)
    }

    pub fn set_genre(&mut self, genre: &str) {
        self.file.set_str(GENRE, genre);
    }

    pub fn title(&self) -> &str {
        self.file.get_str(TITLE)
    }

    pub fn set_title(&mut self, title: &str) {
        self.file.set_str(TITLE, title);
    }

    pub fn track(&self) -> i64 {
        self.file.get_int(TRACK)
    }

    pub fn set_track(&mut self, track: i64) {
        self.file.set_int(TRACK, track);
    }

    pub fn use_count(&self) -> i64 {
        self.file.get_int(USE_COUNT)
    }

    pub fn set_use_count(&mut self, count: i64) {
        self.file.set_int(USE_COUNT, count);
    }

    /// Release year, taken from the first four characters of the release
    /// date. 0 when missing or not a number.
    pub fn year(&self) -> i64 {
        let year: String = self.file.get_str(RELEASE_DATE).chars().take(4).collect();
        year.parse().unwrap_or(0)
    }

    /// Stores the release date as January 1st of `year`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] for a negative year.
    pub fn set_year(&mut self, year: i64) -> Result<()> {
        if year < 0 {
            return Err(Error::InvalidArgument(format!("year {year} is negative")));
        }
        self.file
            .set_str(RELEASE_DATE, format!("{year:04}0101T0000.0"));
        Ok(())
    }
}

impl PartialEq for MusicFile {
    fn eq(&self, other: &Self) -> bool {
        self.album() == other.album()
            && self.artist() == other.artist()
            && self.title() == other.title()
            && self.track() == other.track()
    }
}

impl Eq for MusicFile {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn music(dir: &tempfile::TempDir, name: &str) -> MusicFile {
        let path = dir.path().join(name);
        fs::write(&path, b"ID3").unwrap();
        MusicFile::new(File::local(path).unwrap())
    }

    #[test]
    fn test_year() {
        let dir = tempfile::tempdir().unwrap();
        let mut track = music(&dir, "a.mp3");
        assert_eq!(track.year(), 0);

        track.set_year(1999).unwrap();
        assert_eq!(track.file().get_str(RELEASE_DATE), "19990101T0000.0");
        assert_eq!(track.year(), 1999);

        track.set_year(7).unwrap();
        assert_eq!(track.file().get_str(RELEASE_DATE), "00070101T0000.0");
        assert_eq!(track.year(), 7);

        assert!(matches!(track.set_year(-1), Err(Error::InvalidArgument(_))));
        assert_eq!(track.year(), 7);

        track.file_mut().set_str(RELEASE_DATE, "abcd0101");
        assert_eq!(track.year(), 0);
        track.file_mut().set_str(RELEASE_DATE, "");
        assert_eq!(track.year(), 0);
        track.file_mut().set_str(RELEASE_DATE, "20x");
        assert_eq!(track.year(), 0);
        // Dates shorter than a full year are read as they are.
        track.file_mut().set_str(RELEASE_DATE, "19");
        assert_eq!(track.year(), 19);
    }

    #[test]
    fn test_accessors() {
        let dir = tempfile::tempdir().unwrap();
        let mut track = music(&dir, "b.mp3");
        assert_eq!(track.track(), -1);
        assert_eq!(track.artist(), "");

        track.set_artist("The Band");
        track.set_track(4);
        track.set_duration(215_000);
        assert_eq!(track.artist(), "The Band");
        assert_eq!(track.track(), 4);
        assert_eq!(track.duration(), 215_000);
        assert_eq!(track.file().get_str("Artist"), "The Band");
        assert!(track.file().is_dirty());
    }

    #[test]
    fn test_equality() {
        let dir = tempfile::tempdir().unwrap();
        let mut a = music(&dir, "a.mp3");
        let mut b = music(&dir, "b.wma");
        for track in [&mut a, &mut b] {
            track.set_album("Album");
            track.set_artist("Artist");
            track.set_title("Title");
            track.set_track(1);
        }
        a.set_genre("Rock");
        assert_eq!(a, b);

        b.set_track(2);
        assert_ne!(a, b);
    }
}
