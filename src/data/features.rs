//! Vector features document produced by the OSM/DXF parsers.
//!
//! Several documents may be layered: a later document replaces whole
//! `areas`/`highways`/`buildings` lists, while `decorations` are replaced
//! per decoration type.

use crate::error::Result;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Area {
    pub x: Vec<i32>,
    pub y: Vec<i32>,
    pub surface: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Highway {
    pub x: Vec<i32>,
    pub y: Vec<i32>,
    pub surface: String,
    /// Negative layers are below grade.
    #[serde(default)]
    pub layer: i32,
    #[serde(rename = "type", default)]
    pub kind: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Building {
    pub x: Vec<i32>,
    pub y: Vec<i32>,
    #[serde(default)]
    pub is_part: bool,
    #[serde(default)]
    pub height: Option<i32>,
    #[serde(default)]
    pub levels: Option<i32>,
    #[serde(default)]
    pub material: Option<String>,
}

impl Building {
    /// Explicit height, else three blocks per level.
    pub fn estimated_height(&self) -> Option<i32> {
        self.height.or(self.levels.map(|l| l * 3))
    }
}

/// A single node (bench, tree, ...) or a linear barrier.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum DecorationShape {
    Point { x: i32, y: i32 },
    Line { x: Vec<i32>, y: Vec<i32> },
}

/// One features document as found on disk; every key is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeatureFile {
    pub min_x: Option<i32>,
    pub max_x: Option<i32>,
    pub min_y: Option<i32>,
    pub max_y: Option<i32>,
    #[serde(default)]
    pub areas: Option<Vec<Area>>,
    #[serde(default)]
    pub highways: Option<Vec<Highway>>,
    #[serde(default)]
    pub buildings: Option<Vec<Building>>,
    #[serde(default)]
    pub decorations: Option<BTreeMap<String, Vec<DecorationShape>>>,
}

impl FeatureFile {
    pub fn from_reader<R: Read>(r: R) -> Result<Self> {
        Ok(serde_json::from_reader(r)?)
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_reader(BufReader::new(File::open(path)?))
    }
}

/// Bounding box sides declared by the inputs; the first declaration wins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeclaredBounds {
    pub min_x: Option<i32>,
    pub max_x: Option<i32>,
    pub min_y: Option<i32>,
    pub max_y: Option<i32>,
}

impl DeclaredBounds {
    /// Fills sides that are still unknown from `other`.
    pub fn or(self, other: DeclaredBounds) -> DeclaredBounds {
        DeclaredBounds {
            min_x: self.min_x.or(other.min_x),
            max_x: self.max_x.or(other.max_x),
            min_y: self.min_y.or(other.min_y),
            max_y: self.max_y.or(other.max_y),
        }
    }
}

/// All features of a run after layering the documents.
#[derive(Debug, Clone, Default)]
pub struct FeatureSet {
    pub areas: Vec<Area>,
    pub highways: Vec<Highway>,
    pub buildings: Vec<Building>,
    /// Keyed by decoration name, iterated in name order.
    pub decorations: BTreeMap<String, Vec<DecorationShape>>,
    pub declared: DeclaredBounds,
}

impl FeatureSet {
    /// Layers `file` over the features collected so far.
    pub fn merge(&mut self, file: FeatureFile) {
        self.declared = self.declared.or(DeclaredBounds {
            min_x: file.min_x,
            max_x: file.max_x,
            min_y: file.min_y,
            max_y: file.max_y,
        });

        if let Some(areas) = file.areas.filter(|v| !v.is_empty()) {
            self.areas = areas;
        }
        if let Some(highways) = file.highways.filter(|v| !v.is_empty()) {
            self.highways = highways;
        }
        if let Some(buildings) = file.buildings.filter(|v| !v.is_empty()) {
            self.buildings = buildings;
        }
        for (name, shapes) in file.decorations.unwrap_or_default() {
            if !shapes.is_empty() {
                self.decorations.insert(name, shapes);
            }
        }
    }
}
