//! One generation run: load inputs, resolve the map frame, rasterize, diff
//! against the previous map, write.

use crate::config::GenerateOptions;
use crate::data::features::{DeclaredBounds, FeatureFile, FeatureSet};
use crate::diff::{changed_blocks, check_compatible};
use crate::error::{MapGenError, Result};
use crate::math::{Bounds, Fitted, Plane};
use crate::preview;
use crate::raster::Rasterizer;
use crate::voxel::VoxelGrid;
use log::{debug, info};
use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::Path;
use vmap::{BlockPos, ColumnBuilding, Heightmap, MapFile, MapHeader};

/// Everything read from disk before the frame is known.
#[derive(Debug, Clone, Default)]
pub struct Inputs {
    pub heightmap: Option<Heightmap>,
    pub features: FeatureSet,
    pub columns: Option<Vec<ColumnBuilding>>,
}

impl Inputs {
    pub fn load(opts: &GenerateOptions) -> Result<Self> {
        let heightmap = match &opts.heightmap {
            Some(path) => {
                let hm = vmap::read_heightmap(&mut open(path)?)?;
                info!(
                    "heightmap {}: {}x{} at {},{}",
                    path.display(),
                    hm.size_x,
                    hm.size_y,
                    hm.min_x,
                    hm.min_y
                );
                Some(hm)
            }
            None => None,
        };

        let mut features = FeatureSet::default();
        for path in &opts.features {
            debug!("reading features {}", path.display());
            features.merge(FeatureFile::open(path)?);
        }

        let columns = match &opts.buildings {
            Some(path) => {
                let columns = vmap::read_buildings(&mut open(path)?)?;
                info!("{} buildings in {}", columns.len(), path.display());
                Some(columns)
            }
            None => None,
        };

        Ok(Self {
            heightmap,
            features,
            columns,
        })
    }
}

fn open(path: &Path) -> Result<BufReader<File>> {
    File::open(path).map(BufReader::new).map_err(|e| {
        MapGenError::Io(io::Error::new(e.kind(), format!("{}: {e}", path.display())))
    })
}

/// Map written by an earlier run. The version is checked before the grid is
/// inflated.
fn read_previous(path: &Path) -> Result<MapFile> {
    let context = |e: io::Error| {
        MapGenError::Io(io::Error::new(
            e.kind(),
            format!("previous map {}: {e}", path.display()),
        ))
    };
    let mut r = open(path)?;
    let header = vmap::read_header(&mut r).map_err(context)?;
    check_compatible(&header)?;
    vmap::read_body(&mut r, header).map_err(context)
}

/// Per side: explicit value, else the heightmap extent, else the first
/// features document declaring it.
pub fn resolve_bounds(given: DeclaredBounds, heightmap: Option<&Heightmap>, features: &FeatureSet) -> Result<Bounds> {
    let from_heightmap = heightmap
        .map(|hm| DeclaredBounds {
            min_x: Some(hm.min_x),
            max_x: Some(hm.max_x()),
            min_y: Some(hm.min_y),
            max_y: Some(hm.max_y()),
        })
        .unwrap_or_default();
    let b = given.or(from_heightmap).or(features.declared);

    Bounds::new(
        b.min_x.ok_or(MapGenError::MissingBound("min_x"))?,
        b.max_x.ok_or(MapGenError::MissingBound("max_x"))?,
        b.min_y.ok_or(MapGenError::MissingBound("min_y"))?,
        b.max_y.ok_or(MapGenError::MissingBound("max_y"))?,
    )
}

/// Grid position of the spawn point; it defaults to the minimum corner.
pub fn spawn_offset(bounds: &Bounds, spawn_x: Option<i32>, spawn_z: Option<i32>) -> Result<(u16, u16)> {
    let x = spawn_x.unwrap_or(bounds.min_x);
    let z = spawn_z.unwrap_or(bounds.min_y);
    let (ox, oz) = bounds
        .shift(x, z)
        .ok_or(MapGenError::SpawnOutsideBounds { x, z })?;
    // Bounds sizes fit u16, so do positions inside them.
    Ok((ox as u16, oz as u16))
}

fn fit_heightmap(hm: Heightmap, bounds: &Bounds) -> Result<Fitted<u8>> {
    let (w, h) = (hm.size_x as usize, hm.size_y as usize);
    let plane = Plane::from_vec(w, h, hm.data).ok_or_else(|| {
        MapGenError::Io(io::Error::new(
            io::ErrorKind::InvalidData,
            "heightmap data does not match its size",
        ))
    })?;
    Ok(plane.fit(
        (hm.min_x as i64, hm.min_y as i64),
        (bounds.min_x as i64, bounds.min_y as i64),
        (bounds.size_x(), bounds.size_y()),
    ))
}

/// Rasterized map, not yet written.
#[derive(Debug, Clone)]
pub struct GeneratedMap {
    pub bounds: Bounds,
    pub offset: (u16, u16),
    pub height_at_spawn: u8,
    pub grid: VoxelGrid,
}

impl GeneratedMap {
    pub fn to_map_file(&self, changed_blocks: Option<Vec<BlockPos>>) -> MapFile {
        MapFile {
            header: MapHeader::current(
                self.height_at_spawn,
                self.offset,
                (self.grid.size_x() as u16, self.grid.size_y() as u16),
            ),
            grid: self.grid.as_bytes().to_vec(),
            changed_blocks,
        }
    }
}

/// Builds the grid from already loaded inputs.
pub fn build_map(opts: &GenerateOptions, inputs: Inputs) -> Result<GeneratedMap> {
    let Inputs {
        heightmap,
        features,
        columns,
    } = inputs;

    let bounds = resolve_bounds(opts.bounds, heightmap.as_ref(), &features)?;
    info!(
        "map from {},{} to {},{} ({}x{})",
        bounds.min_x,
        bounds.min_y,
        bounds.max_x,
        bounds.max_y,
        bounds.size_x(),
        bounds.size_y()
    );
    let offset = spawn_offset(&bounds, opts.spawn_x, opts.spawn_z)?;
    info!("offset x: {} offset z: {}", offset.0, offset.1);

    let fitted = heightmap.map(|hm| fit_heightmap(hm, &bounds)).transpose()?;
    let grid = Rasterizer::new(bounds, fitted, opts.raster_options()).run(features, columns)?;
    let height_at_spawn = grid.height(offset.0 as usize, offset.1 as usize);

    Ok(GeneratedMap {
        bounds,
        offset,
        height_at_spawn,
        grid,
    })
}

/// What a run produced, for reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub bounds: Bounds,
    pub offset: (u16, u16),
    pub height_at_spawn: u8,
    /// Number of changed blocks in incremental mode.
    pub changed_blocks: Option<usize>,
}

/// Full run as driven by the CLI.
pub fn generate(opts: &GenerateOptions) -> Result<Summary> {
    opts.validate()?;
    let inputs = Inputs::load(opts)?;
    let map = build_map(opts, inputs)?;

    let changed = if opts.incremental {
        let previous = read_previous(&opts.output)?;
        Some(changed_blocks(&map.grid, map.offset, &previous)?)
    } else {
        None
    };
    let summary = Summary {
        bounds: map.bounds,
        offset: map.offset,
        height_at_spawn: map.height_at_spawn,
        changed_blocks: changed.as_ref().map(Vec::len),
    };

    if let Some(parent) = opts.output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    vmap::write_file(&opts.output, &map.to_map_file(changed))?;
    info!(
        "wrote {} (height at spawn {})",
        opts.output.display(),
        map.height_at_spawn
    );

    preview::export_layers(&map.grid, opts.create_images.then(|| opts.image_dir()));
    Ok(summary)
}
