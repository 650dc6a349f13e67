//! Collision layer system for filtering collision detection and queries

/// Collision layer definitions using bit masks for efficient filtering
pub struct CollisionLayers;

impl CollisionLayers {
    /// No collision layer
    pub const NONE: u32 = 0;

    /// All collision layers
    pub const ALL: u32 = 0xFFFF_FFFF;

    /// Default layer for objects without an explicit assignment
    pub const DEFAULT: u32 = 1 << 0;

    /// Player character layer
    pub const PLAYER: u32 = 1 << 1;

    /// Enemy character layer
    pub const ENEMY: u32 = 1 << 2;

    /// Projectiles (bullets, missiles, etc.)
    pub const PROJECTILE: u32 = 1 << 3;

    /// Static environment geometry
    pub const ENVIRONMENT: u32 = 1 << 4;

    /// Trigger volumes (no physical response)
    pub const TRIGGER: u32 = 1 << 5;

    /// Debris and small physics objects
    pub const DEBRIS: u32 = 1 << 6;

    /// Check if two layers pass a mutual layer/mask filter
    pub fn should_collide(layer_a: u32, mask_a: u32, layer_b: u32, mask_b: u32) -> bool {
        // A's layer must be in B's mask AND B's layer must be in A's mask
        (layer_a & mask_b) != 0 && (layer_b & mask_a) != 0
    }

    /// Helper to create a mask from multiple layers
    pub fn mask(layers: &[u32]) -> u32 {
        layers.iter().fold(0, |acc, &layer| acc | layer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_collide_mutual() {
        assert!(CollisionLayers::should_collide(
            CollisionLayers::PLAYER,
            CollisionLayers::ENEMY,
            CollisionLayers::ENEMY,
            CollisionLayers::PLAYER,
        ));
    }

    #[test]
    fn test_should_not_collide_one_way() {
        // Player wants to hit enemies, but the enemy only masks projectiles.
        assert!(!CollisionLayers::should_collide(
            CollisionLayers::PLAYER,
            CollisionLayers::ENEMY,
            CollisionLayers::ENEMY,
            CollisionLayers::PROJECTILE,
        ));
    }

    #[test]
    fn test_mask_creation() {
        let mask = CollisionLayers::mask(&[CollisionLayers::PLAYER, CollisionLayers::ENEMY]);
        assert_eq!(mask, CollisionLayers::PLAYER | CollisionLayers::ENEMY);
    }
}
