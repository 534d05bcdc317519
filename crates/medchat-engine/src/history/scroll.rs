/// Scroll position of the history list, sampled when a scroll gesture settles
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollMetrics {
    /// Distance scrolled from the top
    pub offset: f64,
    pub viewport_height: f64,
    pub content_height: f64,
}

impl ScrollMetrics {
    pub fn new(offset: f64, viewport_height: f64, content_height: f64) -> Self {
        Self {
            offset,
            viewport_height,
            content_height,
        }
    }

    /// Remaining distance to the content's bottom edge
    pub fn distance_to_bottom(&self) -> f64 {
        (self.content_height - (self.offset + self.viewport_height)).max(0.0)
    }
}

/// Whether the viewport is within `threshold` of the bottom edge
pub fn should_load_more(metrics: &ScrollMetrics, threshold: f64) -> bool {
    metrics.distance_to_bottom() <= threshold
}
