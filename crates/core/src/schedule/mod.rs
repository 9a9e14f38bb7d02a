use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{CollageError, Result};

/// Beat times the bundled demo video was cut to.
const DEMO_BEAT_TIMES: [f64; 27] = [
    0.05, 0.45, 0.87, 1.7, 2.1, 2.94, 3.36, 4.18, 4.6, 5.42, 5.83, 6.66, 7.08, 7.91, 8.31, 8.73,
    9.56, 9.97, 10.8, 11.22, 12.04, 12.46, 13.28, 13.7, 14.52, 14.98, 15.87,
];

/// Ordered beat timestamps, in seconds.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BeatSchedule {
    beat_times: Vec<f64>,
}

#[derive(Deserialize)]
struct BeatScheduleFile {
    beat_times: Vec<f64>,
}

impl BeatSchedule {
    /// Validates and wraps a list of beat times.
    ///
    /// Timestamps must be finite, non-negative and never go backwards.
    /// Repeated timestamps are kept, so items of one group can share a start
    /// frame; start frames are non-decreasing, not strictly increasing.
    pub fn new(beat_times: Vec<f64>) -> Result<Self> {
        for (index, time) in beat_times.iter().enumerate() {
            if !time.is_finite() || *time < 0.0 {
                return Err(CollageError::invalid_input(format!(
                    "beat {index} has unusable timestamp {time}"
                )));
            }
        }
        if let Some(index) = beat_times.windows(2).position(|pair| pair[1] < pair[0]) {
            return Err(CollageError::invalid_input(format!(
                "beat {} at {}s comes before beat {index}",
                index + 1,
                beat_times[index + 1]
            )));
        }
        Ok(Self { beat_times })
    }

    /// The 27-beat schedule shipped with the demo composition.
    pub fn demo() -> Self {
        Self {
            beat_times: DEMO_BEAT_TIMES.to_vec(),
        }
    }

    /// Parses `{ "beat_times": [...] }`.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let file: BeatScheduleFile = serde_json::from_str(json)?;
        Self::new(file.beat_times)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn len(&self) -> usize {
        self.beat_times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.beat_times.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.beat_times.get(index).copied()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.beat_times
    }

    /// Frame on which the beat at `index` lands, or `None` past the end.
    pub fn start_frame(&self, index: usize, fps: u32) -> Option<u64> {
        self.get(index)
            .map(|seconds| (seconds * f64::from(fps)).floor() as u64)
    }
}

/// Ordered image references. Lookups wrap around the pool.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImagePool {
    images: Vec<String>,
}

impl ImagePool {
    pub fn new(images: Vec<String>) -> Self {
        Self { images }
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Maps any index into `0..len`, or `None` for an empty pool.
    pub fn cyclic_index(&self, index: usize) -> Option<usize> {
        if self.images.is_empty() {
            None
        } else {
            Some(index % self.images.len())
        }
    }

    pub fn get_cyclic(&self, index: usize) -> Option<&str> {
        self.cyclic_index(index)
            .map(|index| self.images[index].as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.images.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for ImagePool {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_schedule_is_valid() {
        let demo = BeatSchedule::demo();
        assert_eq!(demo.len(), 27);
        assert!(BeatSchedule::new(demo.as_slice().to_vec()).is_ok());
        assert_eq!(demo.start_frame(0, 30), Some(1));
        assert_eq!(demo.start_frame(1, 30), Some(13));
        assert_eq!(demo.start_frame(27, 30), None);
    }

    #[test]
    fn rejects_bad_timestamps() {
        assert!(BeatSchedule::new(vec![0.0, f64::NAN]).is_err());
        assert!(BeatSchedule::new(vec![-0.5]).is_err());
        let err = BeatSchedule::new(vec![0.0, 2.0, 1.0]).unwrap_err();
        assert!(matches!(err, CollageError::InvalidInput(_)));
        assert!(err.to_string().contains("beat 2"));
    }

    #[test]
    fn accepts_repeated_timestamps() {
        let schedule = BeatSchedule::new(vec![0.5, 0.5, 1.0]).unwrap();
        assert_eq!(schedule.start_frame(0, 30), schedule.start_frame(1, 30));
    }

    #[test]
    fn parses_json_schedule() {
        let schedule = BeatSchedule::from_json_str(r#"{ "beat_times": [0.0, 1.0, 2.0] }"#).unwrap();
        assert_eq!(schedule.as_slice(), &[0.0, 1.0, 2.0]);
        assert!(BeatSchedule::from_json_str("[1, 2]").is_err());
    }

    #[test]
    fn pool_indexing_wraps() {
        let pool: ImagePool = ["a.jpg", "b.jpg", "c.jpg"].into_iter().collect();
        assert_eq!(pool.get_cyclic(4), Some("b.jpg"));
        assert_eq!(pool.cyclic_index(3), Some(0));
        assert_eq!(ImagePool::default().cyclic_index(7), None);
    }
}
