use geo::{BoundingRect, Coord, LineString, Rect};

use crate::TextDetection;

pub(crate) fn quad_rect(quad: &[Coord<f32>]) -> Option<Rect<f32>> {
    if quad.len() < 4 {
        return None;
    }
    LineString::new(quad.to_vec()).bounding_rect()
}

pub(crate) fn union(a: Rect<f32>, b: Rect<f32>) -> Rect<f32> {
    Rect::new(
        Coord {
            x: a.min().x.min(b.min().x),
            y: a.min().y.min(b.min().y),
        },
        Coord {
            x: a.max().x.max(b.max().x),
            y: a.max().y.max(b.max().y),
        },
    )
}

/// Union of every surviving detection in one invocation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageBounds {
    rect: Rect<f32>,
}

impl ImageBounds {
    pub fn from_rects(rects: impl IntoIterator<Item = Rect<f32>>) -> Option<Self> {
        rects
            .into_iter()
            .reduce(union)
            .map(|rect| Self { rect })
    }

    pub fn min(&self) -> Coord<f32> {
        self.rect.min()
    }

    pub fn max(&self) -> Coord<f32> {
        self.rect.max()
    }

    pub fn width(&self) -> f32 {
        self.rect.width().max(0.0)
    }

    pub fn height(&self) -> f32 {
        self.rect.height().max(0.0)
    }

    /// Position of `point` normalized to the bounds. A collapsed axis maps to 0.5.
    pub fn relative(&self, point: Coord<f32>) -> Coord<f32> {
        let min = self.min();
        let x = if self.width() > 0.0 {
            (point.x - min.x) / self.width()
        } else {
            0.5
        };
        let y = if self.height() > 0.0 {
            (point.y - min.y) / self.height()
        } else {
            0.5
        };
        Coord { x, y }
    }

    pub fn relative_area(&self, area: f32) -> f32 {
        let image_area = self.width() * self.height();
        if image_area > 0.0 {
            area / image_area
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockMetrics {
    pub rect: Rect<f32>,
    pub center: Coord<f32>,
    pub width: f32,
    pub height: f32,
    pub relative: Coord<f32>,
    pub aspect_ratio: f32,
    pub relative_area: f32,
}

impl BlockMetrics {
    pub fn new(rect: Rect<f32>, bounds: &ImageBounds) -> Self {
        let center = rect.center();
        let width = rect.width();
        let height = rect.height();
        Self {
            rect,
            center,
            width,
            height,
            relative: bounds.relative(center),
            aspect_ratio: if height > 0.0 { width / height } else { 0.0 },
            relative_area: bounds.relative_area(width * height),
        }
    }
}

/// A detection that passed filtering and has usable geometry.
#[derive(Debug, Clone)]
pub(crate) struct MeasuredBlock<'a> {
    pub detection: &'a TextDetection,
    pub metrics: BlockMetrics,
}

/// Drops detections without four corners or with zero height, then measures the rest against
/// their common bounds.
pub(crate) fn measure<'a>(
    detections: &[&'a TextDetection],
) -> Option<(ImageBounds, Vec<MeasuredBlock<'a>>)> {
    let rects = detections
        .iter()
        .filter_map(|detection| match quad_rect(&detection.quad) {
            Some(rect) if rect.height() > 0.0 => Some((*detection, rect)),
            Some(_) => {
                log::debug!("Dropping zero-height detection {:?}", detection.text);
                None
            }
            None => {
                log::debug!(
                    "Dropping detection {:?} with {} quad points",
                    detection.text,
                    detection.quad.len()
                );
                None
            }
        })
        .collect::<Vec<_>>();

    let bounds = ImageBounds::from_rects(rects.iter().map(|(_, rect)| *rect))?;
    log::trace!(
        "Image bounds {:?}..{:?} ({} x {})",
        bounds.min(),
        bounds.max(),
        bounds.width(),
        bounds.height()
    );

    let blocks = rects
        .into_iter()
        .map(|(detection, rect)| MeasuredBlock {
            detection,
            metrics: BlockMetrics::new(rect, &bounds),
        })
        .collect();
    Some((bounds, blocks))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x0: f32, y0: f32, x1: f32, y1: f32) -> Rect<f32> {
        Rect::new(Coord { x: x0, y: y0 }, Coord { x: x1, y: y1 })
    }

    #[test]
    fn short_quad_has_no_rect() {
        let quad = [Coord { x: 0.0, y: 0.0 }, Coord { x: 4.0, y: 4.0 }];
        assert!(quad_rect(&quad).is_none());
    }

    #[test]
    fn quad_rect_spans_all_corners() {
        let detection = TextDetection::new(
            "skew",
            [(10.0, 12.0), (50.0, 10.0), (52.0, 30.0), (8.0, 31.0)],
        );
        let rect = quad_rect(&detection.quad).unwrap();
        assert_eq!(rect.min(), Coord { x: 8.0, y: 10.0 });
        assert_eq!(rect.max(), Coord { x: 52.0, y: 31.0 });
    }

    #[test]
    fn collapsed_bounds_default_to_center() {
        let bounds = ImageBounds::from_rects([rect(5.0, 5.0, 5.0, 5.0)]).unwrap();
        assert_eq!(bounds.relative(Coord { x: 5.0, y: 5.0 }), Coord { x: 0.5, y: 0.5 });
        assert_eq!(bounds.relative_area(10.0), 0.0);
    }

    #[test]
    fn metrics_are_relative_to_union() {
        let bounds =
            ImageBounds::from_rects([rect(0.0, 0.0, 100.0, 50.0), rect(50.0, 150.0, 200.0, 200.0)])
                .unwrap();
        assert_eq!(bounds.width(), 200.0);
        assert_eq!(bounds.height(), 200.0);

        let metrics = BlockMetrics::new(rect(0.0, 0.0, 100.0, 50.0), &bounds);
        assert_eq!(metrics.center, Coord { x: 50.0, y: 25.0 });
        assert_eq!(metrics.relative, Coord { x: 0.25, y: 0.125 });
        assert_eq!(metrics.aspect_ratio, 2.0);
        assert_eq!(metrics.relative_area, 5000.0 / 40000.0);
    }

    #[test]
    fn measure_skips_malformed_geometry() {
        let good = TextDetection::from_rect("GOOD", 0.0, 0.0, 40.0, 10.0);
        let flat = TextDetection::from_rect("FLAT", 0.0, 20.0, 40.0, 20.0);
        let short = TextDetection::new("SHORT", [(0.0, 0.0), (1.0, 1.0), (2.0, 2.0)]);
        let (_, measured) = measure(&[&good, &flat, &short]).unwrap();
        assert_eq!(measured.len(), 1);
        assert_eq!(measured[0].detection.text, "GOOD");
    }

    #[test]
    fn measure_without_geometry_is_none() {
        let short = TextDetection::new("SHORT", [(0.0, 0.0)]);
        assert!(measure(&[&short]).is_none());
    }
}
