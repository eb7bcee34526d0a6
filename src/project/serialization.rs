// Serialization utilities for composition persistence

use std::path::Path;

use ron::ser::PrettyConfig;

use super::ProjectError;
use super::types::{CompositionData, NoteData};
use crate::sequencer::composition::Composition;
use crate::sequencer::note::Note;

/// On-disk encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectFormat {
    Json,
    Ron,
}

impl ProjectFormat {
    /// Pick the format from the file extension (`.ron`, anything else is JSON)
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("ron") => ProjectFormat::Ron,
            _ => ProjectFormat::Json,
        }
    }
}

impl Composition {
    /// Snapshot into the saved shape
    pub fn to_data(&self) -> CompositionData {
        CompositionData {
            tempo: self.tempo(),
            bars: self.bars(),
            beats_per_bar: self.beats_per_bar(),
            notes: self.all_notes().map(NoteData::from).collect(),
        }
    }

    /// Replace the whole composition with saved data.
    ///
    /// Zero or non-finite tempo, zero bars and zero beats-per-bar fall back to
    /// the composition defaults. Emits `Load` then `Change`.
    pub fn load(&mut self, data: &CompositionData) {
        let defaults = self.defaults();
        let tempo = if data.tempo.is_finite() && data.tempo != 0.0 {
            data.tempo
        } else {
            defaults.tempo
        };
        let bars = if data.bars == 0 { defaults.bars } else { data.bars };
        let beats_per_bar = if data.beats_per_bar == 0 {
            defaults.beats_per_bar
        } else {
            data.beats_per_bar
        };
        let notes = data.notes.iter().map(Note::from).collect();

        self.replace(tempo, bars, beats_per_bar, notes);
        log::debug!(
            "loaded composition: {} notes, {} bars at {:.1} BPM",
            self.note_count(),
            self.bars(),
            self.tempo()
        );
    }

    pub fn to_json_string(&self) -> Result<String, ProjectError> {
        Ok(serde_json::to_string_pretty(&self.to_data())?)
    }

    /// Parse JSON and load it; on error the composition is left untouched
    pub fn load_json_str(&mut self, json: &str) -> Result<(), ProjectError> {
        let data: CompositionData = serde_json::from_str(json)?;
        self.load(&data);
        Ok(())
    }

    pub fn to_ron_string(&self) -> Result<String, ProjectError> {
        Ok(ron::ser::to_string_pretty(
            &self.to_data(),
            PrettyConfig::default(),
        )?)
    }

    /// Parse RON and load it; on error the composition is left untouched
    pub fn load_ron_str(&mut self, input: &str) -> Result<(), ProjectError> {
        let data: CompositionData = ron::from_str(input)?;
        self.load(&data);
        Ok(())
    }

    /// Write to `path`, as RON for `.ron` files and JSON otherwise
    pub fn save_to_file(&self, path: &Path) -> Result<(), ProjectError> {
        let content = match ProjectFormat::from_path(path) {
            ProjectFormat::Json => self.to_json_string()?,
            ProjectFormat::Ron => self.to_ron_string()?,
        };
        std::fs::write(path, content)?;
        log::info!("saved composition to {}", path.display());
        Ok(())
    }

    /// Read a file written by `save_to_file` (or any JSON of the same shape)
    pub fn load_from_file(&mut self, path: &Path) -> Result<(), ProjectError> {
        let content = std::fs::read_to_string(path)?;
        match ProjectFormat::from_path(path) {
            ProjectFormat::Json => self.load_json_str(&content)?,
            ProjectFormat::Ron => self.load_ron_str(&content)?,
        }
        log::info!("loaded composition from {}", path.display());
        Ok(())
    }
}
