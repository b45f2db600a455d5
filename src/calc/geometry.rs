use serde::{Deserialize, Serialize};

/// How a planned offset is handed to the scroll container.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ScrollBehavior {
    #[default]
    Instant,
    Smooth,
    /// Ask the container to bring the item into view itself.
    IntoView,
}

/// The horizontally scrolling element hosting the strip.
pub trait ScrollContainer {
    /// Measured visible width, in the same unit as the strip geometry.
    fn visible_width(&self) -> f64;
    fn set_scroll_offset(&mut self, offset: f64, smooth: bool);
    fn scroll_item_into_view(&mut self, item_index: usize);
}

/// Measured sizes of strip items. `item_margin` is a fraction of
/// `item_width`; `leading_padding` is the width of the spacer element that
/// precedes the first item.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StripGeometry {
    pub item_width: f64,
    pub item_margin: f64,
    pub leading_padding: f64,
}

/// Terminal-cell sizes: four-cell items, two-cell gaps, a two-cell spacer.
impl Default for StripGeometry {
    fn default() -> Self {
        StripGeometry {
            item_width: 4.0,
            item_margin: 0.5,
            leading_padding: 2.0,
        }
    }
}

impl StripGeometry {
    pub fn item_pitch(&self) -> f64 {
        self.item_width + self.item_width * self.item_margin
    }

    /// Total strip width. Each item reserves a full container width on top
    /// of its own pitch so the first and last items can always be centered.
    pub fn strip_width(&self, container_width: f64, item_count: usize) -> f64 {
        (container_width + self.item_pitch()) * item_count as f64
    }

    pub fn item_left_edge(&self, index: usize) -> f64 {
        self.leading_padding + self.item_pitch() * index as f64
    }

    /// Scroll offset that centers item `active_index` in the container.
    /// May be negative for items near the start; containers clamp.
    pub fn plan_offset(&self, container_width: f64, active_index: usize) -> f64 {
        let centered = plan_offset(
            container_width,
            self.item_width,
            self.item_margin,
            active_index,
        );
        self.leading_padding + centered
    }

    pub fn apply<C: ScrollContainer + ?Sized>(
        &self,
        container: &mut C,
        behavior: ScrollBehavior,
        active_index: usize,
    ) {
        match behavior {
            ScrollBehavior::IntoView => container.scroll_item_into_view(active_index),
            ScrollBehavior::Instant | ScrollBehavior::Smooth => {
                let offset = self.plan_offset(container.visible_width(), active_index);
                container.set_scroll_offset(offset, behavior == ScrollBehavior::Smooth);
            }
        }
    }
}

/// Centering offset for a strip with no leading padding.
pub fn plan_offset(
    container_width: f64,
    item_width: f64,
    item_margin: f64,
    active_index: usize,
) -> f64 {
    let pitch = item_width + item_width * item_margin;
    pitch * active_index as f64 - container_width / 2.0 + item_width / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingContainer {
        width: f64,
        offsets: Vec<(f64, bool)>,
        into_view: Vec<usize>,
    }

    impl ScrollContainer for RecordingContainer {
        fn visible_width(&self) -> f64 {
            self.width
        }
        fn set_scroll_offset(&mut self, offset: f64, smooth: bool) {
            self.offsets.push((offset, smooth));
        }
        fn scroll_item_into_view(&mut self, item_index: usize) {
            self.into_view.push(item_index);
        }
    }

    fn geometry() -> StripGeometry {
        StripGeometry {
            item_width: 64.0,
            item_margin: 0.5,
            leading_padding: 160.0,
        }
    }

    #[test]
    fn test_default_geometry_pitch() {
        let g = StripGeometry::default();
        assert_eq!(g.item_pitch(), 6.0);
        assert_eq!(g.item_left_edge(1), 8.0);
    }

    #[test]
    fn test_item_pitch_includes_margin() {
        assert_eq!(geometry().item_pitch(), 96.0);
    }

    #[test]
    fn test_strip_width_formula() {
        let g = geometry();
        assert_eq!(g.strip_width(320.0, 3), (320.0 + 64.0 + 32.0) * 3.0);
        assert_eq!(g.strip_width(320.0, 0), 0.0);
    }

    #[test]
    fn test_strip_always_overflows_container() {
        let g = geometry();
        for count in 1..40 {
            assert!(g.strip_width(320.0, count) > 320.0);
        }
    }

    #[test]
    fn test_plan_offset_centers_item() {
        let g = geometry();
        // item 2 starts at 160 + 2 * 96 = 352; center = 352 + 32 = 384
        assert_eq!(g.plan_offset(320.0, 2), 384.0 - 160.0);
    }

    #[test]
    fn test_plan_offset_free_function_matches_formula() {
        assert_eq!(plan_offset(300.0, 64.0, 0.5, 0), -150.0 + 32.0);
        assert_eq!(plan_offset(300.0, 64.0, 0.5, 1), 96.0 - 150.0 + 32.0);
    }

    #[test]
    fn test_plan_offset_monotonic_in_active_index() {
        for &(cw, iw, m) in &[(320.0, 64.0, 0.5), (80.0, 6.0, 0.0), (1.0, 200.0, 2.0)] {
            let mut last = f64::NEG_INFINITY;
            for i in 0..100 {
                let off = plan_offset(cw, iw, m, i);
                assert!(off >= last);
                last = off;
            }
        }
    }

    #[test]
    fn test_apply_instant_and_smooth() {
        let g = geometry();
        let mut c = RecordingContainer {
            width: 320.0,
            ..Default::default()
        };
        g.apply(&mut c, ScrollBehavior::Instant, 0);
        g.apply(&mut c, ScrollBehavior::Smooth, 1);
        assert_eq!(c.offsets, vec![(32.0, false), (128.0, true)]);
        assert!(c.into_view.is_empty());
    }

    #[test]
    fn test_apply_into_view_delegates_to_container() {
        let g = geometry();
        let mut c = RecordingContainer::default();
        g.apply(&mut c, ScrollBehavior::IntoView, 4);
        assert_eq!(c.into_view, vec![4]);
        assert!(c.offsets.is_empty());
    }
}
