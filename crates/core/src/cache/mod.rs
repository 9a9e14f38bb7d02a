use std::{
    collections::{HashMap, VecDeque},
    sync::Arc,
};

use crate::{
    timeline::{build_timeline, Timeline},
    BeatSchedule, ImagePool, LayoutRules, Result,
};

/// Content fingerprint of everything a timeline is derived from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimelineKey {
    pub hi: u64,
    pub lo: u64,
}

impl TimelineKey {
    pub fn new(schedule: &BeatSchedule, pool: &ImagePool, fps: u32, rules: &LayoutRules) -> Self {
        let mut a = Fnv1a64::new(0xcbf29ce484222325);
        let mut b = Fnv1a64::new(0x9ae16a3b2f90404f);

        write_u64_pair(&mut a, &mut b, schedule.len() as u64);
        for time in schedule.as_slice() {
            write_u64_pair(&mut a, &mut b, time.to_bits());
        }

        write_u64_pair(&mut a, &mut b, pool.len() as u64);
        for image in pool.iter() {
            write_str_pair(&mut a, &mut b, image);
        }

        write_u64_pair(&mut a, &mut b, u64::from(fps));

        write_u64_pair(&mut a, &mut b, rules.forced_single.len() as u64);
        for index in &rules.forced_single {
            write_u64_pair(&mut a, &mut b, *index as u64);
        }
        write_u64_pair(&mut a, &mut b, rules.grid_slots as u64);
        write_u64_pair(&mut a, &mut b, rules.coords_min as u64);
        write_u64_pair(&mut a, &mut b, rules.coords_max as u64);

        Self {
            hi: a.finish(),
            lo: b.finish(),
        }
    }
}

/// Entries kept by [`TimelineCache::new`] before the oldest is evicted.
pub const DEFAULT_CACHE_CAPACITY: usize = 16;

/// Memoises built timelines by their inputs.
///
/// Each render owns its cache; hits hand out shared, immutable timelines.
/// The cache holds at most `capacity` timelines and evicts in insertion order.
#[derive(Debug)]
pub struct TimelineCache {
    entries: HashMap<TimelineKey, Arc<Timeline>>,
    order: VecDeque<TimelineKey>,
    capacity: usize,
}

impl Default for TimelineCache {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }
}

impl TimelineCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// A cache holding at most `capacity` timelines (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn get_or_build(
        &mut self,
        schedule: &BeatSchedule,
        pool: &ImagePool,
        fps: u32,
        rules: &LayoutRules,
    ) -> Result<Arc<Timeline>> {
        let key = TimelineKey::new(schedule, pool, fps, rules);
        if let Some(timeline) = self.entries.get(&key) {
            tracing::trace!(?key, "timeline cache hit");
            return Ok(Arc::clone(timeline));
        }

        let timeline = Arc::new(build_timeline(schedule, pool, fps, rules)?);
        while self.order.len() >= self.capacity {
            let Some(oldest) = self.order.pop_front() else {
                break;
            };
            self.entries.remove(&oldest);
            tracing::trace!(key = ?oldest, "timeline evicted");
        }
        self.entries.insert(key, Arc::clone(&timeline));
        self.order.push_back(key);
        Ok(timeline)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }
}

fn write_u64_pair(a: &mut Fnv1a64, b: &mut Fnv1a64, v: u64) {
    a.write_u64(v);
    b.write_u64(v);
}

fn write_str_pair(a: &mut Fnv1a64, b: &mut Fnv1a64, s: &str) {
    write_u64_pair(a, b, s.len() as u64);
    a.write_bytes(s.as_bytes());
    b.write_bytes(s.as_bytes());
}

struct Fnv1a64 {
    state: u64,
}

impl Fnv1a64 {
    fn new(offset_basis: u64) -> Self {
        Self {
            state: offset_basis,
        }
    }

    fn write_u64(&mut self, v: u64) {
        self.write_bytes(&v.to_le_bytes());
    }

    fn write_bytes(&mut self, bytes: &[u8]) {
        const PRIME: u64 = 0x00000100000001B3;
        for &byte in bytes {
            self.state ^= u64::from(byte);
            self.state = self.state.wrapping_mul(PRIME);
        }
    }

    fn finish(&self) -> u64 {
        self.state
    }
}
