use std::collections::HashMap;
use std::fmt;

use glam::Vec2;
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

use crate::api::types::{LetterEntry, Stroke};

/// One point as it appears in letter data: `{ "x": 1, "y": 2 }` or `[1, 2]`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawPoint {
    Object { x: f32, y: f32 },
    Pair([f32; 2]),
}

impl From<RawPoint> for Vec2 {
    fn from(p: RawPoint) -> Self {
        match p {
            RawPoint::Object { x, y } => Vec2::new(x, y),
            RawPoint::Pair([x, y]) => Vec2::new(x, y),
        }
    }
}

/// Named stroke groups, kept in document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NamedStrokes(pub Vec<(String, Vec<RawPoint>)>);

impl<'de> Deserialize<'de> for NamedStrokes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct GroupsVisitor;

        impl<'de> Visitor<'de> for GroupsVisitor {
            type Value = NamedStrokes;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object of named point lists")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut groups = Vec::with_capacity(map.size_hint().unwrap_or(4));
                while let Some((name, points)) = map.next_entry::<String, Vec<RawPoint>>()? {
                    groups.push((name, points));
                }
                Ok(NamedStrokes(groups))
            }
        }

        deserializer.deserialize_map(GroupsVisitor)
    }
}

/// The `strokes` field: a list of point lists, or named groups.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawStrokes {
    List(Vec<Vec<RawPoint>>),
    Named(NamedStrokes),
}

impl RawStrokes {
    fn into_point_lists(self) -> Vec<Vec<RawPoint>> {
        match self {
            RawStrokes::List(list) => list,
            RawStrokes::Named(NamedStrokes(groups)) => groups.into_iter().map(|(_, pts)| pts).collect(),
        }
    }
}

/// Geometry record for one letter.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LetterRecord {
    /// Stroke groups; preferred when present and non-empty.
    #[serde(default)]
    pub strokes: Option<RawStrokes>,
    /// A single flat point list, treated as one stroke.
    #[serde(default)]
    pub points: Option<Vec<RawPoint>>,
}

impl LetterRecord {
    /// Normalize into a catalog entry.
    ///
    /// Empty point lists are dropped. If no stroke group survives, the flat
    /// `points` list is used as a single stroke. `None` when nothing usable remains.
    pub fn into_entry(self) -> Option<LetterEntry> {
        let strokes: Vec<Stroke> = self
            .strokes
            .map(RawStrokes::into_point_lists)
            .unwrap_or_default()
            .into_iter()
            .filter_map(to_stroke)
            .collect();
        if !strokes.is_empty() {
            return LetterEntry::new(strokes);
        }
        let single = to_stroke(self.points.unwrap_or_default())?;
        LetterEntry::new(vec![single])
    }
}

fn to_stroke(points: Vec<RawPoint>) -> Option<Stroke> {
    Stroke::new(points.into_iter().map(Vec2::from).collect())
}

/// One letter-data document: letter → record. A `null` record is allowed
/// and contributes nothing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct LetterDocument {
    pub letters: HashMap<String, Option<LetterRecord>>,
}

impl LetterDocument {
    /// Parse a document from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
