//! Widget position persistence.
//!
//! The timeline widget can be dragged around the page. Its position is
//! anchored to the viewport top-right corner: `x` is the distance from the
//! right edge, `y` from the top. It is loaded once at startup and persisted
//! only when a drag gesture ends, never on every pointer move.

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Storage key the position is filed under.
pub const WIDGET_POSITION_KEY: &str = "widget_position";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetPosition {
    /// Distance from the viewport's right edge.
    pub x: f64,
    /// Distance from the viewport's top edge.
    pub y: f64,
}

impl Default for WidgetPosition {
    fn default() -> Self {
        WidgetPosition { x: 20.0, y: 20.0 }
    }
}

/// Where widget preferences live.
pub trait PositionStore {
    fn load(&self) -> Result<Option<WidgetPosition>>;
    fn save(&self, position: WidgetPosition) -> Result<()>;
}

/// Key/value JSON file store. Unknown keys in the file are preserved.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: PathBuf) -> Self {
        JsonFileStore { path }
    }

    fn read_map(&self) -> Result<HashMap<String, serde_json::Value>> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }
        let raw = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read store file: {}", self.path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse store file: {}", self.path.display()))
    }
}

impl PositionStore for JsonFileStore {
    fn load(&self) -> Result<Option<WidgetPosition>> {
        let map = self.read_map()?;
        match map.get(WIDGET_POSITION_KEY) {
            Some(value) => Ok(Some(
                serde_json::from_value(value.clone()).context("Invalid stored widget position")?,
            )),
            None => Ok(None),
        }
    }

    fn save(&self, position: WidgetPosition) -> Result<()> {
        let mut map = self.read_map()?;
        map.insert(
            WIDGET_POSITION_KEY.to_string(),
            serde_json::to_value(position).context("Failed to serialize widget position")?,
        );
        let raw = serde_json::to_string_pretty(&map).context("Failed to serialize store")?;
        std::fs::write(&self.path, raw)
            .with_context(|| format!("Failed to write store file: {}", self.path.display()))
    }
}

/// An in-progress drag. Position updates are clamped to the viewport; the
/// store is only touched by [`DragGesture::finish`].
#[derive(Debug)]
pub struct DragGesture {
    position: WidgetPosition,
    viewport_width: f64,
    viewport_height: f64,
}

impl DragGesture {
    pub fn begin(start: WidgetPosition, viewport_width: f64, viewport_height: f64) -> Self {
        DragGesture {
            position: start,
            viewport_width,
            viewport_height,
        }
    }

    pub fn update(&mut self, x: f64, y: f64) -> WidgetPosition {
        self.position = WidgetPosition {
            x: x.clamp(0.0, self.viewport_width),
            y: y.clamp(0.0, self.viewport_height),
        };
        self.position
    }

    pub fn position(&self) -> WidgetPosition {
        self.position
    }

    /// End the gesture and persist the final position.
    pub fn finish(self, store: &dyn PositionStore) -> Result<WidgetPosition> {
        store.save(self.position)?;
        Ok(self.position)
    }
}
