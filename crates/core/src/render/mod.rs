//! Per-frame queries against a built [`Timeline`].
//!
//! Nothing in here mutates the timeline, so a renderer may ask for frames in
//! any order and as often as it likes.

use serde::{Deserialize, Serialize};

use crate::{
    layout::LayoutCategory,
    timeline::{Geometry, RenderItem, Timeline},
};

/// Returns every item that has started by `frame`, in paint order.
///
/// Items never expire, so the visible set only grows as `frame` increases.
pub fn visible(timeline: &Timeline, frame: u64) -> Vec<&RenderItem> {
    let mut items: Vec<&RenderItem> = timeline
        .items()
        .iter()
        .filter(|item| item.start_frame <= frame)
        .collect();
    items.sort_by_key(|item| item.z_order);
    items
}

/// Pixel rectangle handed to the compositor.
///
/// For coordinate images `x`/`y` is the image centre and the height is left to
/// the image aspect ratio; every other layer is anchored at its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrawRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: Option<f64>,
    pub anchor: Anchor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Anchor {
    TopLeft,
    Center,
}

/// Drawing hints that travel with each layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerStyle {
    /// Scale to cover the rectangle, cropping overflow.
    pub cover: bool,
    pub drop_shadow: bool,
}

/// Maps an item's geometry onto a `width` x `height` frame.
pub fn resolve_rect(item: &RenderItem, width: u32, height: u32) -> DrawRect {
    let (width, height) = (f64::from(width), f64::from(height));
    match (item.geometry, item.category) {
        (Geometry::FullBleed, _) => DrawRect {
            x: 0.0,
            y: 0.0,
            width,
            height: Some(height),
            anchor: Anchor::TopLeft,
        },
        (Geometry::GridSlot { slot }, category) => {
            let slots = match category {
                LayoutCategory::Grid { slots } => slots.max(1),
                _ => 1,
            };
            let band = height / slots as f64;
            DrawRect {
                x: 0.0,
                y: slot as f64 * band,
                width,
                height: Some(band),
                anchor: Anchor::TopLeft,
            }
        }
        (Geometry::Coords(position), _) => DrawRect {
            x: width * position.left / 100.0,
            y: height * position.top / 100.0,
            width: width * position.width_percent / 100.0,
            height: None,
            anchor: Anchor::Center,
        },
    }
}

pub fn layer_style(item: &RenderItem) -> LayerStyle {
    LayerStyle {
        cover: true,
        drop_shadow: matches!(item.geometry, Geometry::Coords(_)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{build_timeline, layout::CoordsPosition, BeatSchedule, ImagePool, LayoutRules};

    fn demo_timeline() -> Timeline {
        let pool: ImagePool = ["a", "b", "c", "d"].into_iter().collect();
        build_timeline(&BeatSchedule::demo(), &pool, 30, &LayoutRules::default()).unwrap()
    }

    fn item(category: LayoutCategory, geometry: Geometry) -> RenderItem {
        RenderItem {
            group_index: 3,
            category,
            image_index: 0,
            start_frame: 0,
            z_order: 3,
            geometry,
        }
    }

    #[test]
    fn nothing_visible_before_first_beat() {
        let timeline = demo_timeline();
        assert!(visible(&timeline, 0).is_empty());
        assert_eq!(visible(&timeline, 1).len(), 1);
    }

    #[test]
    fn everything_visible_after_last_beat() {
        let timeline = demo_timeline();
        assert_eq!(visible(&timeline, 10_000).len(), timeline.len());
    }

    #[test]
    fn visible_set_only_grows() {
        let timeline = demo_timeline();
        let mut previous: Vec<&RenderItem> = Vec::new();
        for frame in 0..500 {
            let current = visible(&timeline, frame);
            assert!(previous.iter().all(|item| current.contains(item)));
            assert!(current.windows(2).all(|pair| pair[0].z_order <= pair[1].z_order));
            previous = current;
        }
    }

    #[test]
    fn queries_are_order_independent() {
        let timeline = demo_timeline();
        let late = visible(&timeline, 300);
        let _ = visible(&timeline, 5);
        assert_eq!(visible(&timeline, 300), late);
    }

    #[test]
    fn grid_slots_stack_top_to_bottom() {
        let rect = resolve_rect(
            &item(LayoutCategory::Grid { slots: 4 }, Geometry::GridSlot { slot: 2 }),
            1080,
            1920,
        );
        assert_eq!(rect.y, 960.0);
        assert_eq!(rect.height, Some(480.0));
        assert_eq!(rect.width, 1080.0);
        assert_eq!(rect.anchor, Anchor::TopLeft);
    }

    #[test]
    fn coords_are_centre_anchored() {
        let position = CoordsPosition {
            left: 30.0,
            top: 80.0,
            width_percent: 70.0,
        };
        let coords = item(
            LayoutCategory::Coords {
                count: 3,
                orientation: crate::layout::Orientation::LeftToRight,
            },
            Geometry::Coords(position),
        );
        let rect = resolve_rect(&coords, 1000, 2000);
        assert_eq!((rect.x, rect.y, rect.width), (300.0, 1600.0, 700.0));
        assert_eq!(rect.height, None);
        assert!(layer_style(&coords).drop_shadow);

        let single = item(LayoutCategory::Single, Geometry::FullBleed);
        assert!(!layer_style(&single).drop_shadow);
        assert_eq!(resolve_rect(&single, 1000, 2000).height, Some(2000.0));
    }
}
