use crate::error::Result;
use crate::lane_assigner::ChartEvent;
use std::path::{Path, PathBuf};

/// A finished chart ready to be written for the game client.
///
/// Only `events` reach the file: the on-disk format is a bare JSON array of
/// `{"time", "lane", "duration"}` objects in play order.
#[derive(Debug, Clone)]
pub struct ChartExport {
    pub name: String,
    pub lanes: u8,
    pub events: Vec<ChartEvent>,
}

impl ChartExport {
    pub fn new(name: String, lanes: u8, events: Vec<ChartEvent>) -> Self {
        ChartExport { name, lanes, events }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.events)?)
    }

    pub fn file_name(&self) -> String {
        format!("{}.json", self.name)
    }

    /// Write `<dir>/<name>.json`, creating `dir` if needed
    pub fn save(&self, dir: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(self.file_name());
        std::fs::write(&path, self.to_json()?)?;
        Ok(path)
    }
}

/// Read a chart written by [`ChartExport::save`]
pub fn load_chart(path: &Path) -> Result<Vec<ChartEvent>> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
