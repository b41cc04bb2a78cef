//! Surface and decoration ids understood by the world loader, plus the road
//! width table.

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Surface {
    Default = 0,

    PavingStones = 1,
    FineGravel = 2,
    Concrete = 3,
    Asphalt = 4,
    Dirt = 5,

    Highway = 10,
    Footway = 11,
    Service = 12,
    Cycleway = 13,
    Pedestrian = 14,
    Residential = 15,
    Path = 16,
    Railway = 17,

    Leisure = 20,
    Park = 21,
    Playground = 22,
    SportsCentre = 23,
    Pitch = 24,

    Amenity = 30,
    School = 31,
    Parking = 32,

    Landuse = 40,
    ResidentialLanduse = 41,
    VillageGreen = 42,

    Natural = 50,
    Water = 51,

    BuildingGround = 60,
}

impl Surface {
    #[inline]
    pub fn id(self) -> u8 {
        self as u8
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "default" => Surface::Default,
            "paving_stones" => Surface::PavingStones,
            "fine_gravel" => Surface::FineGravel,
            "concrete" => Surface::Concrete,
            "asphalt" => Surface::Asphalt,
            "dirt" => Surface::Dirt,
            "highway" => Surface::Highway,
            "footway" => Surface::Footway,
            "service" => Surface::Service,
            "cycleway" => Surface::Cycleway,
            "pedestrian" => Surface::Pedestrian,
            "residential" => Surface::Residential,
            "path" => Surface::Path,
            "railway" => Surface::Railway,
            "leisure" => Surface::Leisure,
            "park" => Surface::Park,
            "playground" => Surface::Playground,
            "sports_centre" => Surface::SportsCentre,
            "pitch" => Surface::Pitch,
            "amenity" => Surface::Amenity,
            "school" => Surface::School,
            "parking" => Surface::Parking,
            "landuse" => Surface::Landuse,
            "residential_landuse" => Surface::ResidentialLanduse,
            "village_green" => Surface::VillageGreen,
            "natural" => Surface::Natural,
            "water" => Surface::Water,
            "building_ground" => Surface::BuildingGround,
            _ => return None,
        })
    }

    /// Areas of this surface are levelled to their mean height.
    #[inline]
    pub fn is_flattened(self) -> bool {
        matches!(
            self,
            Surface::Water
                | Surface::Pitch
                | Surface::Playground
                | Surface::SportsCentre
                | Surface::Parking
        )
    }

    /// Areas of this surface get sparse grass.
    #[inline]
    pub fn is_grassy(self) -> bool {
        matches!(self, Surface::Park | Surface::VillageGreen)
    }
}

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Decoration {
    Natural = 10,
    Tree = 11,
    Grass = 12,
    LeafTree = 13,
    Conifer = 14,
    Bush = 15,

    PostBox = 21,
    Recycling = 22,
    VendingMachine = 23,
    Bench = 24,
    Telephone = 25,

    Barrier = 30,
    Fence = 31,
    Wall = 32,
    Bollard = 33,
    Gate = 34,
    Hedge = 35,
}

impl Decoration {
    #[inline]
    pub fn id(self) -> u8 {
        self as u8
    }

    /// `"none"` (air) is not a placeable decoration and maps to `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "natural" => Decoration::Natural,
            "tree" => Decoration::Tree,
            "grass" => Decoration::Grass,
            "leaf_tree" => Decoration::LeafTree,
            "conifer" => Decoration::Conifer,
            "bush" => Decoration::Bush,
            "post_box" => Decoration::PostBox,
            "recycling" => Decoration::Recycling,
            "vending_machine" => Decoration::VendingMachine,
            "bench" => Decoration::Bench,
            "telephone" => Decoration::Telephone,
            "barrier" => Decoration::Barrier,
            "fence" => Decoration::Fence,
            "wall" => Decoration::Wall,
            "bollard" => Decoration::Bollard,
            "gate" => Decoration::Gate,
            "hedge" => Decoration::Hedge,
            _ => return None,
        })
    }

    /// Trees and bushes get dirt underneath.
    #[inline]
    pub fn is_plant(self) -> bool {
        matches!(
            self,
            Decoration::Tree | Decoration::LeafTree | Decoration::Conifer | Decoration::Bush
        )
    }
}

pub const DEFAULT_HIGHWAY_WIDTH: u8 = 3;

#[inline]
pub fn highway_width(kind: &str) -> u8 {
    match kind {
        "footway" | "cycleway" | "pedestrian" | "path" => 3,
        "service" => 4,
        "residential" => 5,
        "primary" | "secondary" => 6,
        _ => DEFAULT_HIGHWAY_WIDTH,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surface_ids() {
        assert_eq!(Surface::from_name("water").map(Surface::id), Some(51));
        assert_eq!(Surface::from_name("dirt").map(Surface::id), Some(5));
        assert_eq!(Surface::from_name("residential_landuse").map(Surface::id), Some(41));
        assert_eq!(Surface::from_name("lava"), None);
        assert!(Surface::Parking.is_flattened());
        assert!(!Surface::Park.is_flattened());
        assert!(Surface::VillageGreen.is_grassy());
    }

    #[test]
    fn test_decoration_ids_stay_below_sentinel() {
        for name in ["tree", "grass", "bench", "hedge", "bush", "conifer"] {
            let id = Decoration::from_name(name).unwrap().id();
            assert!(id > 0 && id < 128, "{name} -> {id}");
        }
        assert_eq!(Decoration::from_name("none"), None);
        assert!(Decoration::Conifer.is_plant());
        assert!(!Decoration::Fence.is_plant());
    }

    #[test]
    fn test_highway_widths() {
        assert_eq!(highway_width("primary"), 6);
        assert_eq!(highway_width("service"), 4);
        assert_eq!(highway_width("residential"), 5);
        assert_eq!(highway_width("motorway"), DEFAULT_HIGHWAY_WIDTH);
    }
}
