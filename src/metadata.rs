// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

//! Object properties as exchanged with the device: a flat, rootless XML
//! fragment such as `<Artist>Foo</Artist><Track>3</Track>`.

use chrono::NaiveDateTime;
use quick_xml::{escape::escape, events::Event, Reader};
use regex::Regex;
use std::{collections::BTreeMap, sync::OnceLock};
use tracing::{debug, warn};

/// Value returned by integer accessors when the key is missing or does not
/// hold a number.
pub const MISSING_INT: i64 = -1;

const DATE_FORMATS: &[&str] = &["%Y%m%dT%H%M%S%.f", "%Y%m%dT%H%M%S", "%Y%m%dT%H%M%.f"];

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("malformed fragment: {0}")]
    Xml(String),
    #[error("duplicate key `{0}`")]
    DuplicateKey(String),
    #[error("nested element `{0}`")]
    NestedElement(String),
    #[error("text outside an element: `{0}`")]
    StrayText(String),
    #[error("element `{0}` is not closed")]
    Unclosed(String),
}

/// Key/value properties of a file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Metadata {
    entries: BTreeMap<String, String>,
}

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a metadata fragment, falling back to the lenient scanner when
    /// the strict parser rejects it.
    pub fn parse(xml: &str) -> Self {
        match Self::parse_strict(xml) {
            Ok(metadata) => metadata,
            Err(e) => {
                warn!("metadata rejected by strict parser ({e}), using lenient scan");
                Self::parse_lenient(xml)
            }
        }
    }

    /// Strict fragment parse. Every top-level element becomes one entry.
    pub fn parse_strict(xml: &str) -> Result<Self, ParseError> {
        // Values are kept verbatim, including surrounding whitespace.
        let mut reader = Reader::from_str(xml);

        let mut entries = BTreeMap::new();
        let mut open: Option<(String, String)> = None;

        loop {
            let event = reader
                .read_event()
                .map_err(|e| ParseError::Xml(e.to_string()))?;
            match event {
                Event::Start(start) => {
                    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
                    if open.is_some() {
                        return Err(ParseError::NestedElement(name));
                    }
                    open = Some((name, String::new()));
                }
                Event::Empty(empty) => {
                    let name = String::from_utf8_lossy(empty.name().as_ref()).into_owned();
                    if open.is_some() {
                        return Err(ParseError::NestedElement(name));
                    }
                    insert_unique(&mut entries, name, String::new())?;
                }
                Event::Text(text) => {
                    let text = text
                        .unescape()
                        .map_err(|e| ParseError::Xml(e.to_string()))?;
                    match open.as_mut() {
                        Some((_, value)) => value.push_str(&text),
                        None if text.trim().is_empty() => {}
                        None => return Err(ParseError::StrayText(text.into_owned())),
                    }
                }
                Event::CData(data) => {
                    let text = String::from_utf8_lossy(&data.into_inner()).into_owned();
                    match open.as_mut() {
                        Some((_, value)) => value.push_str(&text),
                        None => return Err(ParseError::StrayText(text)),
                    }
                }
                Event::End(_) => {
                    // quick-xml has already matched the end name against the
                    // start name.
                    if let Some((name, value)) = open.take() {
                        insert_unique(&mut entries, name, value)?;
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if let Some((name, _)) = open {
            return Err(ParseError::Unclosed(name));
        }

        Ok(Self { entries })
    }

    /// Scans for `<tag>value</tag>` pairs, taking the first closing tag of
    /// the same name. Attributes on the opening tag are ignored. Tolerates
    /// fragments the strict parser refuses. The first occurrence of a
    /// repeated key wins.
    pub fn parse_lenient(xml: &str) -> Self {
        static OPEN_TAG: OnceLock<Regex> = OnceLock::new();
        let open_tag = OPEN_TAG.get_or_init(|| {
            Regex::new(r"<([^<>/!?\s][^<>\s]*)[^<>]*>").expect("open tag pattern is valid")
        });

        let mut entries = BTreeMap::new();
        let mut position = 0;

        while let Some(captures) = open_tag.captures_at(xml, position) {
            let (Some(whole), Some(name)) = (captures.get(0), captures.get(1)) else {
                break;
            };
            let closing = format!("</{}>", name.as_str());
            match xml[whole.end()..].find(&closing) {
                Some(offset) => {
                    let value = &xml[whole.end()..whole.end() + offset];
                    entries
                        .entry(name.as_str().to_string())
                        .or_insert_with(|| value.to_string());
                    position = whole.end() + offset + closing.len();
                }
                None => position = whole.end(),
            }
        }

        debug!("lenient metadata scan found {} entries", entries.len());
        Self { entries }
    }

    /// Serialises the properties as a flat fragment. Keys are written as tag
    /// names verbatim, values are escaped.
    pub fn to_xml(&self) -> String {
        let mut xml = String::with_capacity(self.entries.len() * 32);
        for (key, value) in &self.entries {
            xml.push('<');
            xml.push_str(key);
            xml.push('>');
            xml.push_str(&escape(value.as_str()));
            xml.push_str("</");
            xml.push_str(key);
            xml.push('>');
        }
        xml
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// The value of `key`, or "" when it is missing.
    pub fn get_str(&self, key: &str) -> &str {
        self.get(key).unwrap_or("")
    }

    /// The value of `key` as an integer, or [`MISSING_INT`].
    pub fn get_int(&self, key: &str) -> i64 {
        self.get_str(key).trim().parse().unwrap_or(MISSING_INT)
    }

    /// The value of `key` as a PTP date-time (`YYYYMMDDThhmmss[.s]`).
    pub fn get_date(&self, key: &str) -> Option<NaiveDateTime> {
        parse_date(self.get(key)?)
    }

    /// Stores `value` under `key`. Returns true when the stored value changed.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> bool {
        let value = value.into();
        match self.entries.insert(key.into(), value.clone()) {
            Some(previous) => previous != value,
            None => true,
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.entries.remove(key)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Metadata {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

fn insert_unique(
    entries: &mut BTreeMap<String, String>,
    key: String,
    value: String,
) -> Result<(), ParseError> {
    if entries.contains_key(&key) {
        return Err(ParseError::DuplicateKey(key));
    }
    entries.insert(key, value);
    Ok(())
}

/// Parses a PTP date-time string.
pub fn parse_date(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_flat_fragment() {
        let metadata = Metadata::parse("<Artist>Foo</Artist><Track>3</Track><Genre/>");
        assert_eq!(metadata.get("Artist"), Some("Foo"));
        assert_eq!(metadata.get_int("Track"), 3);
        assert_eq!(metadata.get("Genre"), Some(""));
        assert_eq!(metadata.len(), 3);
    }

    #[test]
    fn test_parse_escaped_and_whitespace() {
        let xml = "\n  <Name>Rock &amp; Roll</Name>\n  <Album><![CDATA[<b>]]></Album>\n";
        let metadata = Metadata::parse_strict(xml).unwrap();
        assert_eq!(metadata.get("Name"), Some("Rock & Roll"));
        assert_eq!(metadata.get("Album"), Some("<b>"));
    }

    #[test]
    fn test_strict_rejects_duplicates() {
        let xml = "<Artist>A</Artist><Artist>B</Artist>";
        assert_eq!(
            Metadata::parse_strict(xml),
            Err(ParseError::DuplicateKey("Artist".to_string()))
        );
        assert_eq!(
            ParseError::DuplicateKey("Artist".to_string()).to_string(),
            "duplicate key `Artist`"
        );
        // The lenient pass keeps the first value.
        assert_eq!(Metadata::parse(xml).get("Artist"), Some("A"));
    }

    #[test]
    fn test_strict_rejects_malformed() {
        assert!(Metadata::parse_strict("<a><b>x</b></a>").is_err());
        assert!(Metadata::parse_strict("loose<a>x</a>").is_err());
        assert!(Metadata::parse_strict("<a>x").is_err());
        assert!(Metadata::parse_strict("<a>x</b>").is_err());
    }

    #[test]
    fn test_lenient_fallback() {
        // An unescaped ampersand breaks the strict parser.
        let metadata = Metadata::parse("<Name>Salt & Pepper</Name><Track>7</Track><Broken>");
        assert_eq!(metadata.get("Name"), Some("Salt & Pepper"));
        assert_eq!(metadata.get_int("Track"), 7);
        assert_eq!(metadata.get("Broken"), None);
    }

    #[test]
    fn test_lenient_first_closing_tag() {
        let metadata = Metadata::parse_lenient("<a>x<b>y</b></a>");
        assert_eq!(metadata.get("a"), Some("x<b>y</b>"));
        assert_eq!(metadata.get("b"), None);
    }

    #[test]
    fn test_lenient_ignores_attributes() {
        let metadata = Metadata::parse_lenient("<a x=\"1\">v</a><Track id='2'>9 & 1</Track>");
        assert_eq!(metadata.get("a"), Some("v"));
        assert_eq!(metadata.get("Track"), Some("9 & 1"));
        assert_eq!(metadata.len(), 2);
    }

    #[test]
    fn test_strict_keeps_padding() -> Result<(), ParseError> {
        let metadata: Metadata = [("Name", " Intro "), ("Album", "\tB-sides\n")]
            .into_iter()
            .collect();
        assert_eq!(Metadata::parse_strict(&metadata.to_xml())?, metadata);

        let mixed = Metadata::parse_strict("<A>x <![CDATA[y]]></A>")?;
        assert_eq!(mixed.get("A"), Some("x y"));
        Ok(())
    }

    #[test]
    fn test_xml_round_trip() {
        let metadata: Metadata = [
            ("Artist", "The Band"),
            ("Name", "Fish & <Chips>"),
            ("Track", "12"),
        ]
        .into_iter()
        .collect();
        let parsed = Metadata::parse_strict(&metadata.to_xml()).unwrap();
        assert_eq!(parsed, metadata);
    }

    #[test]
    fn test_typed_reads() {
        let metadata: Metadata = [("Track", "x1"), ("DateAdded", "20080115T093000.0")]
            .into_iter()
            .collect();
        assert_eq!(metadata.get_int("Track"), MISSING_INT);
        assert_eq!(metadata.get_int("Missing"), MISSING_INT);
        assert_eq!(metadata.get_str("Missing"), "");

        let date = metadata.get_date("DateAdded").unwrap();
        assert_eq!((date.year(), date.month(), date.day()), (2008, 1, 15));
        assert_eq!((date.hour(), date.minute()), (9, 30));
        assert_eq!(metadata.get_date("Track"), None);
    }

    #[test]
    fn test_set_reports_change() {
        let mut metadata = Metadata::new();
        assert!(metadata.set("Rating", "5"));
        assert!(!metadata.set("Rating", "5"));
        assert!(metadata.set("Rating", "4"));
        assert_eq!(metadata.get_int("Rating"), 4);
    }
}
