use byteorder::{LittleEndian as LE, ReadBytesExt, WriteBytesExt};
use std::io::{self, Read, Write};

use crate::invalid;

/// How the points of a group contribute to a building column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKind {
    /// Ground contact: sets terrain height under the building.
    Ground,
    /// Topmost block is a roof block.
    Roof,
    Wall,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnGroup {
    pub name: String,
    /// World coordinates `[x, y, z]`, z is elevation.
    pub points: Vec<[i32; 3]>,
}

impl ColumnGroup {
    pub fn kind(&self) -> GroupKind {
        match self.name.as_str() {
            "ground" => GroupKind::Ground,
            "roof" => GroupKind::Roof,
            _ => GroupKind::Wall,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnBuilding {
    pub groups: Vec<ColumnGroup>,
}

pub fn read_buildings<R: Read>(r: &mut R) -> io::Result<Vec<ColumnBuilding>> {
    let count = r.read_u32::<LE>()? as usize;
    let flag = r.read_u8()?;
    if flag != 0 {
        return Err(invalid(format!("unsupported buildings flag {}", flag)));
    }

    let mut buildings = Vec::with_capacity(count.min(1 << 16));
    for _ in 0..count {
        let mut building = ColumnBuilding::default();
        loop {
            let name_len = r.read_u8()? as usize;
            if name_len == 0 {
                break;
            }
            let mut name = vec![0u8; name_len];
            r.read_exact(&mut name)?;
            let name = String::from_utf8(name)
                .map_err(|_| invalid("building group name is not utf-8"))?;

            let pos_count = r.read_u32::<LE>()? as usize;
            let mut points = Vec::with_capacity(pos_count.min(1 << 20));
            for _ in 0..pos_count {
                let x = r.read_i32::<LE>()?;
                let y = r.read_i32::<LE>()?;
                let z = r.read_i32::<LE>()?;
                points.push([x, y, z]);
            }
            building.groups.push(ColumnGroup { name, points });
        }
        buildings.push(building);
    }

    Ok(buildings)
}

pub fn write_buildings<W: Write>(w: &mut W, buildings: &[ColumnBuilding]) -> io::Result<()> {
    w.write_u32::<LE>(buildings.len() as u32)?;
    w.write_u8(0)?;

    for building in buildings {
        for group in &building.groups {
            let name = group.name.as_bytes();
            if name.is_empty() || name.len() > u8::MAX as usize {
                return Err(invalid(format!(
                    "group name length {} not in 1..=255",
                    name.len()
                )));
            }
            w.write_u8(name.len() as u8)?;
            w.write_all(name)?;
            w.write_u32::<LE>(group.points.len() as u32)?;
            for p in &group.points {
                w.write_i32::<LE>(p[0])?;
                w.write_i32::<LE>(p[1])?;
                w.write_i32::<LE>(p[2])?;
            }
        }
        w.write_u8(0)?;
    }

    Ok(())
}
