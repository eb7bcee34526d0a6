// Serializable composition types
// Plain data mirrors of `Composition` and `Note`

use serde::{Deserialize, Deserializer, Serialize};

use crate::sequencer::note::{DEFAULT_VELOCITY, Note, NoteId};

/// Saved form of a composition.
///
/// Zero values stand for "missing" and are replaced by defaults on load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompositionData {
    pub tempo: f64,
    pub bars: u32,
    pub beats_per_bar: u32,
    pub notes: Vec<NoteData>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteData {
    /// Missing ids get a fresh one on load, and so do string ids that are
    /// not a plain number (e.g. base36 tokens from other editors)
    #[serde(
        default,
        deserialize_with = "deserialize_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<u64>,
    pub pitch: u8,
    pub start: f64,
    pub duration: f64,
    #[serde(default = "default_velocity")]
    pub velocity: u8,
}

fn default_velocity() -> u8 {
    DEFAULT_VELOCITY
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SavedId {
    Raw(u64),
    Token(String),
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<SavedId>::deserialize(deserializer)? {
        Some(SavedId::Raw(raw)) => Some(raw),
        Some(SavedId::Token(token)) => token.parse().ok(),
        None => None,
    })
}

impl From<&Note> for NoteData {
    fn from(note: &Note) -> Self {
        Self {
            id: Some(note.id.raw()),
            pitch: note.pitch,
            start: note.start,
            duration: note.duration,
            velocity: note.velocity,
        }
    }
}

impl From<&NoteData> for Note {
    fn from(data: &NoteData) -> Self {
        let id = data.id.map_or_else(NoteId::generate, NoteId::from_raw);
        Note::with_id(id, data.pitch, data.start, data.duration, data.velocity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camel_case_shape() {
        let data = CompositionData {
            tempo: 90.0,
            bars: 8,
            beats_per_bar: 3,
            notes: vec![NoteData {
                id: Some(7),
                pitch: 60,
                start: 0.5,
                duration: 1.0,
                velocity: 80,
            }],
        };
        let value = serde_json::to_value(&data).unwrap();

        assert_eq!(value["beatsPerBar"], 3);
        assert_eq!(value["notes"][0]["id"], 7);
        assert_eq!(value["notes"][0]["velocity"], 80);
    }

    #[test]
    fn test_missing_fields_default() {
        let data: CompositionData =
            serde_json::from_str(r#"{"notes":[{"pitch":64,"start":1,"duration":2}]}"#).unwrap();

        assert_eq!(data.tempo, 0.0);
        assert_eq!(data.bars, 0);
        assert_eq!(data.notes[0].id, None);
        assert_eq!(data.notes[0].velocity, DEFAULT_VELOCITY);
    }

    #[test]
    fn test_string_ids() {
        let data: CompositionData = serde_json::from_str(
            r#"{"notes":[
                {"id":"lx3k2abcdefg","pitch":60,"start":0,"duration":1},
                {"id":"42","pitch":62,"start":1,"duration":1},
                {"id":null,"pitch":64,"start":2,"duration":1}
            ]}"#,
        )
        .unwrap();

        assert_eq!(data.notes[0].id, None);
        assert_eq!(data.notes[1].id, Some(42));
        assert_eq!(data.notes[2].id, None);
    }

    #[test]
    fn test_note_without_id_gets_fresh_one() {
        let data = NoteData {
            id: None,
            pitch: 60,
            start: 0.0,
            duration: 1.0,
            velocity: 100,
        };
        let a = Note::from(&data);
        let b = Note::from(&data);
        assert_ne!(a.id, b.id);
    }
}
