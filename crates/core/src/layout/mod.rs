use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{rng::seeded_int, CollageError, Result};

const GRID_SEED_FACTOR: f64 = 99.0;
const COORDS_COUNT_SEED_FACTOR: f64 = 123.0;
const ORIENTATION_SEED_FACTOR: f64 = 200.0;

/// Largest coordinate group for which a position table exists.
pub const MAX_COORDS_COUNT: usize = 3;

/// Reading direction used to mirror coordinate layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    LeftToRight,
    RightToLeft,
}

/// Shape of the visual composition chosen for one beat group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LayoutCategory {
    /// One full-bleed image on a single beat.
    Single,
    /// Vertically stacked full-width slots, one per beat.
    Grid { slots: usize },
    /// Up to three freely positioned images.
    Coords {
        count: usize,
        orientation: Orientation,
    },
}

impl LayoutCategory {
    /// Number of beats the group consumes, independent of how many items the
    /// schedule tail actually leaves room for.
    pub fn beat_advance(&self) -> usize {
        match self {
            Self::Single => 1,
            Self::Grid { slots } => *slots,
            Self::Coords { count, .. } => *count,
        }
    }

    pub fn is_single(&self) -> bool {
        matches!(self, Self::Single)
    }
}

/// The non-single categories tracked by the alternation rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NonSingle {
    Grid,
    Coords,
}

impl NonSingle {
    fn flipped(self) -> Self {
        match self {
            Self::Grid => Self::Coords,
            Self::Coords => Self::Grid,
        }
    }
}

/// Last non-single category chosen during a timeline build.
///
/// Forced-single groups leave it untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AlternationMemory {
    pub last: Option<NonSingle>,
}

/// Normalised placement of a coordinate image, in percent of the frame.
///
/// `left`/`top` locate the image centre; `width_percent` is relative to the
/// frame width and the height follows the image aspect ratio.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoordsPosition {
    pub left: f64,
    pub top: f64,
    pub width_percent: f64,
}

impl CoordsPosition {
    const fn new(left: f64, top: f64, width_percent: f64) -> Self {
        Self {
            left,
            top,
            width_percent,
        }
    }
}

const ONE: [CoordsPosition; 1] = [CoordsPosition::new(50.0, 50.0, 100.0)];
const TWO_LTR: [CoordsPosition; 2] = [
    CoordsPosition::new(30.0, 30.0, 90.0),
    CoordsPosition::new(70.0, 70.0, 90.0),
];
const TWO_RTL: [CoordsPosition; 2] = [
    CoordsPosition::new(70.0, 30.0, 90.0),
    CoordsPosition::new(30.0, 70.0, 90.0),
];
const THREE_LTR: [CoordsPosition; 3] = [
    CoordsPosition::new(70.0, 20.0, 70.0),
    CoordsPosition::new(50.0, 50.0, 70.0),
    CoordsPosition::new(30.0, 80.0, 70.0),
];
const THREE_RTL: [CoordsPosition; 3] = [
    CoordsPosition::new(30.0, 20.0, 70.0),
    CoordsPosition::new(50.0, 50.0, 70.0),
    CoordsPosition::new(70.0, 80.0, 70.0),
];

/// Returns the fixed position table for a coordinate group.
///
/// Counts outside `1..=3` have no table and yield an empty slice; the rules
/// validation keeps the decision engine from producing them.
pub fn coords_positions(count: usize, orientation: Orientation) -> &'static [CoordsPosition] {
    match (count, orientation) {
        (1, _) => &ONE,
        (2, Orientation::LeftToRight) => &TWO_LTR,
        (2, Orientation::RightToLeft) => &TWO_RTL,
        (3, Orientation::LeftToRight) => &THREE_LTR,
        (3, Orientation::RightToLeft) => &THREE_RTL,
        _ => &[],
    }
}

/// Tunable constants of the layout decision.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutRules {
    /// Group indices that always render as a single full-bleed image.
    pub forced_single: BTreeSet<usize>,
    /// Beats consumed (and slots shown) by a grid group.
    pub grid_slots: usize,
    pub coords_min: usize,
    pub coords_max: usize,
}

impl Default for LayoutRules {
    fn default() -> Self {
        Self {
            forced_single: [0, 4, 9, 14, 15, 18, 21, 26, 27].into_iter().collect(),
            grid_slots: 4,
            coords_min: 1,
            coords_max: MAX_COORDS_COUNT,
        }
    }
}

impl LayoutRules {
    pub fn validate(&self) -> Result<()> {
        if self.grid_slots == 0 {
            return Err(CollageError::invalid_config("grid_slots must be at least 1"));
        }
        if self.coords_min == 0 || self.coords_min > self.coords_max {
            return Err(CollageError::invalid_config(format!(
                "coords range {}..={} is empty or starts at zero",
                self.coords_min, self.coords_max
            )));
        }
        if self.coords_max > MAX_COORDS_COUNT {
            return Err(CollageError::invalid_config(format!(
                "coords_max {} exceeds the {MAX_COORDS_COUNT} available positions",
                self.coords_max
            )));
        }
        Ok(())
    }

    pub fn is_forced_single(&self, group_index: usize) -> bool {
        self.forced_single.contains(&group_index)
    }

    /// Chooses the layout for the group starting at `group_index`.
    ///
    /// The alternation memory is passed in and the updated memory returned, so
    /// the caller owns the only piece of state the decision depends on.
    pub fn decide(
        &self,
        group_index: usize,
        memory: AlternationMemory,
    ) -> (LayoutCategory, AlternationMemory) {
        if self.is_forced_single(group_index) {
            return (LayoutCategory::Single, memory);
        }

        let group = group_index as f64;
        let mut candidate = if seeded_int(group * GRID_SEED_FACTOR, 0, 1) == 0 {
            NonSingle::Grid
        } else {
            NonSingle::Coords
        };
        if memory.last == Some(candidate) {
            candidate = candidate.flipped();
        }

        let category = match candidate {
            NonSingle::Grid => LayoutCategory::Grid {
                slots: self.grid_slots,
            },
            NonSingle::Coords => {
                let count = seeded_int(
                    group * COORDS_COUNT_SEED_FACTOR,
                    self.coords_min as i64,
                    self.coords_max as i64,
                );
                let orientation = if seeded_int(group * ORIENTATION_SEED_FACTOR, 0, 1) == 1 {
                    Orientation::LeftToRight
                } else {
                    Orientation::RightToLeft
                };
                LayoutCategory::Coords {
                    count: count.clamp(self.coords_min as i64, self.coords_max as i64) as usize,
                    orientation,
                }
            }
        };

        (
            category,
            AlternationMemory {
                last: Some(candidate),
            },
        )
    }
}
