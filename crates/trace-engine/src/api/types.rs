use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Identifier of one traceable glyph: a single uppercase letter.
///
/// Construction goes through [`LetterKey::parse`] or [`LetterKey::from_char`],
/// which are the normalization boundary for caller input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LetterKey(char);

impl LetterKey {
    /// Normalize arbitrary text into a key.
    ///
    /// Surrounding whitespace is ignored; what remains must be exactly one
    /// alphabetic character. Anything else yields `None`.
    pub fn parse(input: &str) -> Option<Self> {
        let mut chars = input.trim().chars();
        let ch = chars.next()?;
        if chars.next().is_some() {
            return None;
        }
        Self::from_char(ch)
    }

    /// Build a key from a single character, canonicalized to uppercase.
    /// Letters whose uppercase form is more than one character are rejected.
    pub fn from_char(ch: char) -> Option<Self> {
        if !ch.is_alphabetic() {
            return None;
        }
        let mut upper = ch.to_uppercase();
        match (upper.next(), upper.next()) {
            (Some(u), None) => Some(Self(u)),
            _ => None,
        }
    }

    /// The canonical (uppercase) character.
    pub fn as_char(self) -> char {
        self.0
    }

    /// The lowercase alias served by the catalog.
    pub fn lowercase(self) -> char {
        let mut lower = self.0.to_lowercase();
        match (lower.next(), lower.next()) {
            (Some(l), None) => l,
            _ => self.0,
        }
    }
}

impl fmt::Display for LetterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for LetterKey {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| format!("`{value}` is not a single letter"))
    }
}

impl From<LetterKey> for String {
    fn from(key: LetterKey) -> Self {
        key.0.to_string()
    }
}

/// One continuous pen motion. Never empty; playback order is point order.
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    points: Vec<Vec2>,
}

impl Stroke {
    /// Returns `None` for an empty point list.
    pub fn new(points: Vec<Vec2>) -> Option<Self> {
        if points.is_empty() {
            None
        } else {
            Some(Self { points })
        }
    }

    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The point where the pen lifts.
    pub fn terminal(&self) -> Vec2 {
        self.points[self.points.len() - 1]
    }
}

/// Stroke geometry for one letter. Never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct LetterEntry {
    strokes: Vec<Stroke>,
}

impl LetterEntry {
    /// Returns `None` when there are no strokes.
    pub fn new(strokes: Vec<Stroke>) -> Option<Self> {
        if strokes.is_empty() {
            None
        } else {
            Some(Self { strokes })
        }
    }

    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    pub fn stroke_count(&self) -> usize {
        self.strokes.len()
    }

    /// Total number of points across all strokes.
    pub fn point_count(&self) -> usize {
        self.strokes.iter().map(Stroke::len).sum()
    }
}

/// Catalog status as reported to the view layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Loading,
    Ready,
    Error,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Loading => "loading",
            Status::Ready => "ready",
            Status::Error => "error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_normalizes_case_and_whitespace() {
        assert_eq!(LetterKey::parse("a").map(LetterKey::as_char), Some('A'));
        assert_eq!(LetterKey::parse("  b \n").map(LetterKey::as_char), Some('B'));
        assert_eq!(LetterKey::parse("Q").map(LetterKey::as_char), Some('Q'));
    }

    #[test]
    fn parse_rejects_non_letters() {
        for input in ["", "   ", "AB", "3", "?", "a b", "ab"] {
            assert!(LetterKey::parse(input).is_none(), "{input:?} should be rejected");
        }
    }

    #[test]
    fn parse_rejects_multi_char_uppercase() {
        // 'ß' uppercases to "SS"
        assert!(LetterKey::parse("ß").is_none());
    }

    #[test]
    fn lowercase_alias() {
        let key = LetterKey::parse("e").unwrap();
        assert_eq!(key.lowercase(), 'e');
        assert_eq!(key.to_string(), "E");
    }

    #[test]
    fn serde_as_string() {
        let keys: Vec<LetterKey> = serde_json::from_str(r#"["a", "B"]"#).unwrap();
        assert_eq!(keys[0].as_char(), 'A');
        assert_eq!(serde_json::to_string(&keys).unwrap(), r#"["A","B"]"#);
        assert!(serde_json::from_str::<Vec<LetterKey>>(r#"["AB"]"#).is_err());
    }

    #[test]
    fn empty_geometry_is_rejected() {
        assert!(Stroke::new(Vec::new()).is_none());
        assert!(LetterEntry::new(Vec::new()).is_none());

        let stroke = Stroke::new(vec![Vec2::new(1.0, 2.0), Vec2::new(3.0, 4.0)]).unwrap();
        assert_eq!(stroke.terminal(), Vec2::new(3.0, 4.0));
        let entry = LetterEntry::new(vec![stroke.clone(), stroke]).unwrap();
        assert_eq!(entry.stroke_count(), 2);
        assert_eq!(entry.point_count(), 4);
    }
}
