use serde::{Deserialize, Serialize};

use crate::{
    layout::{coords_positions, AlternationMemory, CoordsPosition, LayoutCategory, LayoutRules},
    BeatSchedule, CollageError, ImagePool, Result,
};

/// Where a render item sits inside the frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Geometry {
    FullBleed,
    /// Full-width horizontal band, counted from the top of the frame.
    GridSlot { slot: usize },
    Coords(CoordsPosition),
}

/// One positioned, time-stamped draw instruction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderItem {
    pub group_index: usize,
    pub category: LayoutCategory,
    /// Index into the image pool, already wrapped into `0..pool.len()`.
    pub image_index: usize,
    pub start_frame: u64,
    pub z_order: usize,
    pub geometry: Geometry,
}

/// Every render item for one (schedule, pool, fps, rules) combination.
///
/// Items are stored in build order, which is also ascending `z_order`. Items
/// never expire: once started they stay on screen underneath later groups.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    pub fps: u32,
    items: Vec<RenderItem>,
}

impl Timeline {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[RenderItem] {
        &self.items
    }

    /// Frame at which the last item appears.
    pub fn last_start_frame(&self) -> Option<u64> {
        self.items.iter().map(|item| item.start_frame).max()
    }

    /// Number of distinct beat groups in the timeline.
    pub fn group_count(&self) -> usize {
        let mut groups = 0;
        let mut previous = None;
        for item in &self.items {
            if previous != Some(item.group_index) {
                groups += 1;
                previous = Some(item.group_index);
            }
        }
        groups
    }
}

/// Walks a beat schedule and emits the render items for each beat group.
#[derive(Debug)]
pub struct TimelineBuilder<'a> {
    schedule: &'a BeatSchedule,
    pool: &'a ImagePool,
    fps: u32,
    rules: &'a LayoutRules,
}

impl<'a> TimelineBuilder<'a> {
    pub fn new(
        schedule: &'a BeatSchedule,
        pool: &'a ImagePool,
        fps: u32,
        rules: &'a LayoutRules,
    ) -> Self {
        Self {
            schedule,
            pool,
            fps,
            rules,
        }
    }

    /// Builds the timeline.
    ///
    /// Configuration is checked before any beat is consumed. An empty
    /// schedule or image pool produces an empty timeline.
    #[tracing::instrument(
        skip(self),
        fields(beats = self.schedule.len(), images = self.pool.len(), fps = self.fps)
    )]
    pub fn build(&self) -> Result<Timeline> {
        if self.fps == 0 {
            return Err(CollageError::invalid_config("fps must be greater than zero"));
        }
        self.rules.validate()?;

        if self.pool.is_empty() {
            tracing::warn!("image pool is empty, timeline will be empty");
            return Ok(Timeline {
                fps: self.fps,
                items: Vec::new(),
            });
        }

        let beats = self.schedule.len();
        let mut items = Vec::with_capacity(beats);
        let mut memory = AlternationMemory::default();
        let mut beat_index = 0;
        let mut groups = 0;

        while beat_index < beats {
            let group_index = beat_index;
            let (category, next) = self.rules.decide(group_index, memory);
            memory = next;
            groups += 1;
            tracing::debug!(group_index, ?category, "layout decided");

            match category {
                LayoutCategory::Single => {
                    self.push(&mut items, group_index, category, 0, Geometry::FullBleed);
                }
                LayoutCategory::Grid { slots } => {
                    for offset in 0..slots {
                        self.push(
                            &mut items,
                            group_index,
                            category,
                            offset,
                            Geometry::GridSlot { slot: offset },
                        );
                    }
                }
                LayoutCategory::Coords { count, orientation } => {
                    let positions = coords_positions(count, orientation);
                    for (offset, position) in positions.iter().enumerate() {
                        self.push(
                            &mut items,
                            group_index,
                            category,
                            offset,
                            Geometry::Coords(*position),
                        );
                    }
                }
            }

            beat_index += category.beat_advance();
        }

        tracing::info!(groups, items = items.len(), "timeline built");
        Ok(Timeline {
            fps: self.fps,
            items,
        })
    }

    /// Emits the item for beat `group_index + offset`, unless the schedule
    /// has already run out.
    fn push(
        &self,
        items: &mut Vec<RenderItem>,
        group_index: usize,
        category: LayoutCategory,
        offset: usize,
        geometry: Geometry,
    ) {
        let beat = group_index + offset;
        let (Some(start_frame), Some(image_index)) = (
            self.schedule.start_frame(beat, self.fps),
            self.pool.cyclic_index(beat),
        ) else {
            return;
        };

        items.push(RenderItem {
            group_index,
            category,
            image_index,
            start_frame,
            z_order: group_index,
            geometry,
        });
    }
}

/// Convenience wrapper around [`TimelineBuilder`].
pub fn build_timeline(
    schedule: &BeatSchedule,
    pool: &ImagePool,
    fps: u32,
    rules: &LayoutRules,
) -> Result<Timeline> {
    TimelineBuilder::new(schedule, pool, fps, rules).build()
}
