use arbormap_core::models::{Pixel, RecordId};
use rstar::primitives::GeomWithData;
use rstar::RTree;

type IndexedPixel = GeomWithData<[f64; 2], RecordId>;

/// Spatial index over rendered pixel positions, for hit testing
#[derive(Default)]
pub struct PixelIndex {
    tree: RTree<IndexedPixel>,
}

impl std::fmt::Debug for PixelIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelIndex").field("len", &self.tree.size()).finish()
    }
}

impl PixelIndex {
    pub fn new() -> Self {
        Self { tree: RTree::new() }
    }

    pub fn insert(&mut self, id: RecordId, pixel: Pixel) {
        self.tree.insert(GeomWithData::new(pixel.to_array(), id));
    }

    /// Remove an entry; both identity and position must match
    pub fn remove(&mut self, id: RecordId, pixel: Pixel) -> bool {
        self.tree.remove(&GeomWithData::new(pixel.to_array(), id)).is_some()
    }

    /// Nearest indexed record no farther than `radius` pixels
    pub fn nearest_within(&self, pixel: Pixel, radius: f64) -> Option<RecordId> {
        let query = pixel.to_array();
        self.tree
            .nearest_neighbor(&query)
            .filter(|hit| Pixel::from(*hit.geom()).distance_squared(&pixel) <= radius * radius)
            .map(|hit| hit.data)
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nearest_within_radius() {
        let mut index = PixelIndex::new();
        index.insert(RecordId(1), Pixel::new(10.0, 10.0));
        index.insert(RecordId(2), Pixel::new(20.0, 10.0));

        assert_eq!(index.nearest_within(Pixel::new(12.0, 10.0), 4.0), Some(RecordId(1)));
        assert_eq!(index.nearest_within(Pixel::new(19.0, 11.0), 4.0), Some(RecordId(2)));
        assert_eq!(index.nearest_within(Pixel::new(15.0, 30.0), 4.0), None);
    }

    #[test]
    fn test_remove() {
        let mut index = PixelIndex::new();
        index.insert(RecordId(1), Pixel::new(10.0, 10.0));

        assert!(!index.remove(RecordId(2), Pixel::new(10.0, 10.0)));
        assert!(index.remove(RecordId(1), Pixel::new(10.0, 10.0)));
        assert!(index.is_empty());
        assert_eq!(index.nearest_within(Pixel::new(10.0, 10.0), 4.0), None);
    }

    #[test]
    fn test_empty_index() {
        let index = PixelIndex::default();
        assert_eq!(index.len(), 0);
        assert_eq!(index.nearest_within(Pixel::new(0.0, 0.0), 100.0), None);
    }
}
