//! Point cloud → GPU bridge: converts `cumulus_cloud::PointCloud` data
//! into the `SpriteVertex` array the expander pipeline consumes.

use cumulus_cloud::PointCloud;

use crate::vertex::SpriteVertex;

/// Convert an imported cloud into source vertices, preserving order so
/// that point `i` always drives sink vertices `3i..3i+3`.
pub fn collect_sprites(cloud: &PointCloud) -> Vec<SpriteVertex> {
    cloud
        .points()
        .iter()
        .map(|p| SpriteVertex::new(p.position, p.color))
        .collect()
}

/// Build source vertices directly from `(position, color)` pairs.
///
/// Useful for testing, demos, and bring-up before PLY import is wired.
pub fn collect_sprites_direct(points: &[([f32; 3], [f32; 3])]) -> Vec<SpriteVertex> {
    points
        .iter()
        .map(|&(position, color)| SpriteVertex::new(position, color))
        .collect()
}

// ===================================================================
// Tests
// ===================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use cumulus_cloud::Point;

    #[test]
    fn test_collect_sprites_preserves_order_and_data() {
        let cloud = PointCloud::new(vec![
            Point::new([0.0, 1.0, 2.0], [1.0, 0.0, 0.0]),
            Point::new([3.0, 4.0, 5.0], [0.0, 1.0, 0.0]),
        ]);
        let sprites = collect_sprites(&cloud);
        assert_eq!(sprites.len(), 2);
        assert_eq!(sprites[0].position, [0.0, 1.0, 2.0]);
        assert_eq!(sprites[0].color, [1.0, 0.0, 0.0]);
        assert_eq!(sprites[1].position, [3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_collect_sprites_direct() {
        let sprites = collect_sprites_direct(&[
            ([0.0; 3], [1.0, 1.0, 1.0]),
            ([1.0, 0.0, 0.0], [0.5, 0.5, 0.5]),
        ]);
        assert_eq!(sprites.len(), 2);
        assert_eq!(sprites[1].position, [1.0, 0.0, 0.0]);
        assert_eq!(sprites[1].color, [0.5, 0.5, 0.5]);
        // Padding is zeroed, keeping uploads deterministic.
        assert_eq!(sprites[0]._pad0, 0.0);
        assert_eq!(sprites[0]._pad1, 0.0);
    }

    #[test]
    fn test_empty_cloud() {
        assert!(collect_sprites(&PointCloud::default()).is_empty());
    }
}
