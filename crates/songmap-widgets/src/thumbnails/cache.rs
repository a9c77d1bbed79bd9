//! Rendered thumbnails per cover, ready for the renderer

use std::collections::HashMap;

use iced::widget::image::Handle;

/// One zoom level of a cover
#[derive(Debug, Clone)]
pub struct ThumbnailLevel {
    pub zoom: f32,
    /// Edge length in pixels
    pub size: u32,
    pub handle: Handle,
}

/// Every zoom level rendered for one cover
#[derive(Debug, Clone, Default)]
pub struct CoverThumbnails {
    levels: Vec<ThumbnailLevel>,
}

impl CoverThumbnails {
    pub fn new(levels: Vec<ThumbnailLevel>) -> Self {
        Self { levels }
    }

    /// Level whose zoom is closest to `target`; the earlier level wins ties
    pub fn best_for(&self, target: f32) -> Option<&ThumbnailLevel> {
        self.levels.iter().fold(None, |best: Option<&ThumbnailLevel>, level| match best {
            Some(b) if (b.zoom - target).abs() <= (level.zoom - target).abs() => Some(b),
            _ => Some(level),
        })
    }

    pub fn levels(&self) -> &[ThumbnailLevel] {
        &self.levels
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

/// `cover file name → thumbnails`; covers that failed to load are absent
#[derive(Debug, Clone, Default)]
pub struct ThumbnailCache {
    covers: HashMap<String, CoverThumbnails>,
}

impl ThumbnailCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, cover: String, thumbnails: CoverThumbnails) {
        self.covers.insert(cover, thumbnails);
    }

    pub fn best_for(&self, cover: &str, target_zoom: f32) -> Option<&ThumbnailLevel> {
        self.covers.get(cover)?.best_for(target_zoom)
    }

    pub fn contains(&self, cover: &str) -> bool {
        self.covers.contains_key(cover)
    }

    pub fn len(&self) -> usize {
        self.covers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.covers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level(zoom: f32) -> ThumbnailLevel {
        ThumbnailLevel {
            zoom,
            size: 8,
            handle: Handle::from_rgba(1, 1, vec![0u8; 4]),
        }
    }

    fn thumbnails() -> CoverThumbnails {
        CoverThumbnails::new([0.25, 0.5, 0.75, 1.0, 1.5, 2.0].into_iter().map(level).collect())
    }

    #[test]
    fn test_best_for_closest_zoom() {
        let thumbs = thumbnails();
        assert_eq!(thumbs.best_for(0.6).unwrap().zoom, 0.5);
        assert_eq!(thumbs.best_for(1.3).unwrap().zoom, 1.5);
        assert_eq!(thumbs.best_for(10.0).unwrap().zoom, 2.0);
        assert_eq!(thumbs.best_for(0.0).unwrap().zoom, 0.25);
    }

    #[test]
    fn test_best_for_tie_prefers_first() {
        let thumbs = CoverThumbnails::new(vec![level(1.0), level(2.0)]);
        assert_eq!(thumbs.best_for(1.5).unwrap().zoom, 1.0);
    }

    #[test]
    fn test_cache_lookup() {
        let mut cache = ThumbnailCache::new();
        cache.insert("a.png".into(), thumbnails());
        cache.insert("empty.png".into(), CoverThumbnails::default());

        assert!(cache.best_for("a.png", 1.0).is_some());
        assert!(cache.best_for("missing.png", 1.0).is_none());
        assert!(cache.best_for("empty.png", 1.0).is_none());
        assert_eq!(cache.len(), 2);
    }
}
