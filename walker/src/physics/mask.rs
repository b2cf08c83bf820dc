//! Collision categories and the masks every query is built from.
//!
//! A body carries a set of categories; a query carries a mask. The query can only see bodies
//! whose categories intersect its mask. Walkable floors and blocking walls live on disjoint
//! bits so a ground probe never mistakes a wall for a floor and vice versa.

use crate::{bitmask_flags::BitmaskFlags, define_bitmask_flags};

define_bitmask_flags!(Category, u32, {
    /// Walkable outdoor terrain (base ground and the mid layer's top surface).
    Ground = 1,
    /// Impassable terrain such as cliff faces and mountain sides.
    Cliff = 2,
    /// Cave and tunnel shells.
    CaveWall = 3,
    HoleSensor = 4,
    TunnelSensor = 5,
    LandingSensor = 6,
    Avatar = 7,
    RoomFloor = 8,
    RoomWall = 9,
    /// Walkable floor inside caves and tunnels.
    CaveFloor = 10,
});

pub type CollisionMask = BitmaskFlags<u32>;

impl Category {
    pub const ALL: [Category; 10] = [
        Category::Ground,
        Category::Cliff,
        Category::CaveWall,
        Category::HoleSensor,
        Category::TunnelSensor,
        Category::LandingSensor,
        Category::Avatar,
        Category::RoomFloor,
        Category::RoomWall,
        Category::CaveFloor,
    ];

    /// Snake-case name used in scene files.
    pub fn name(&self) -> &'static str {
        match self {
            Category::Ground => "ground",
            Category::Cliff => "cliff",
            Category::CaveWall => "cave_wall",
            Category::HoleSensor => "hole_sensor",
            Category::TunnelSensor => "tunnel_sensor",
            Category::LandingSensor => "landing_sensor",
            Category::Avatar => "avatar",
            Category::RoomFloor => "room_floor",
            Category::RoomWall => "room_wall",
            Category::CaveFloor => "cave_floor",
        }
    }

    pub fn from_name(name: &str) -> Option<Category> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }
}

const fn bit(category: Category) -> u32 {
    1 << (category as u8)
}

/// Outdoor floors. Spawning only looks for these.
pub const WALKABLE: CollisionMask =
    CollisionMask::new(bit(Category::Ground) | bit(Category::CaveFloor));

/// Geometry that stops horizontal movement outdoors.
pub const BLOCKING: CollisionMask =
    CollisionMask::new(bit(Category::Cliff) | bit(Category::CaveWall));

pub const ROOM_WALKABLE: CollisionMask = CollisionMask::new(bit(Category::RoomFloor));

pub const ROOM_BLOCKING: CollisionMask = CollisionMask::new(bit(Category::RoomWall));

/// Every floor. The surface walker keeps seeing room floors so it can walk out of a room.
pub const FLOORS: CollisionMask = CollisionMask::new(WALKABLE.bits | ROOM_WALKABLE.bits);

/// Every wall, outdoors or in a room.
pub const WALLS: CollisionMask = CollisionMask::new(BLOCKING.bits | ROOM_BLOCKING.bits);

pub const HOLE: CollisionMask = CollisionMask::new(bit(Category::HoleSensor));

pub const TUNNEL: CollisionMask = CollisionMask::new(bit(Category::TunnelSensor));

pub const LANDING: CollisionMask = CollisionMask::new(bit(Category::LandingSensor));

pub const AVATAR: CollisionMask = CollisionMask::new(bit(Category::Avatar));

/// Everything that can stand between the camera and the avatar, plus the avatar itself so a
/// clear line of sight reports the avatar as the closest hit.
pub const CAMERA_OCCLUDERS: CollisionMask = CollisionMask::new(
    bit(Category::Ground) | bit(Category::Cliff) | bit(Category::CaveWall) | bit(Category::Avatar),
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walkable_and_blocking_never_overlap() {
        assert!(!WALKABLE.intersects(BLOCKING));
        assert!(!ROOM_WALKABLE.intersects(ROOM_BLOCKING));
        assert!(!WALKABLE.intersects(ROOM_BLOCKING));
        assert!(!ROOM_WALKABLE.intersects(BLOCKING));
        assert!(!FLOORS.intersects(WALLS));
    }

    #[test]
    fn sensor_masks_are_single_bits() {
        for mask in [HOLE, TUNNEL, LANDING] {
            assert_eq!(mask.bits.count_ones(), 1);
            assert!(!mask.intersects(WALKABLE));
            assert!(!mask.intersects(BLOCKING));
        }
    }

    #[test]
    fn names_round_trip() {
        for category in Category::ALL {
            assert_eq!(Category::from_name(category.name()), Some(category));
        }
        assert_eq!(Category::from_name("lava"), None);
    }

    #[test]
    fn camera_sees_the_avatar() {
        assert!(CAMERA_OCCLUDERS.has(Category::Avatar));
        assert!(!CAMERA_OCCLUDERS.intersects(HOLE | TUNNEL | LANDING));
    }
}
