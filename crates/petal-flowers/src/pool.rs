//! Fixed-capacity flower pool with first-free slot reuse

use crate::config::FlowerConfig;
use crate::curves::growth_scale;
use crate::slot::{FlowerSeed, FlowerSlot};
use glam::Vec3;
use rand::Rng;

/// Most active slots aged by a single `update` call
pub const MAX_UPDATES_PER_FRAME: usize = 500;

/// Age written into a slot when it is released at end of life
pub const RELEASED_AGE: f32 = 0.001;

/// Outcome of one `FlowerPool::update` call
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UpdateReport {
    /// Active slots visited this call (including those released)
    pub aged: usize,
    /// Slots that reached end of life
    pub released: usize,
    /// Active slots left for the next call because the cap was hit
    pub deferred: usize,
}

/// Owns every flower's state.
///
/// Slots never move: a flower keeps its index from acquire until release, and
/// acquire always takes the lowest free index.
///
/// Aging is driven by a pool-wide growth clock (the sum of `dt * speed`). Each
/// slot remembers the clock value it was last aged to, so a slot skipped by the
/// per-call cap catches up on its next visit instead of losing time.
pub struct FlowerPool {
    slots: Vec<FlowerSlot>,
    active_count: usize,
    growth_clock: f64,
    cursor: usize,
    update_cap: usize,
    initialized: bool,
}

impl FlowerPool {
    pub fn new(capacity: usize) -> Self {
        let mut pool = Self {
            slots: Vec::new(),
            active_count: 0,
            growth_clock: 0.0,
            cursor: 0,
            update_cap: MAX_UPDATES_PER_FRAME,
            initialized: false,
        };
        pool.initialize(capacity);
        pool
    }

    /// Override the per-call update cap (minimum 1)
    pub fn with_update_cap(mut self, cap: usize) -> Self {
        self.update_cap = cap.max(1);
        self
    }

    /// Allocate `capacity` empty slots, discarding all prior state.
    ///
    /// Returns false without touching anything when the pool is already
    /// initialized at this capacity.
    pub fn initialize(&mut self, capacity: usize) -> bool {
        if self.initialized && self.slots.len() == capacity {
            return false;
        }
        self.slots = vec![FlowerSlot::empty(); capacity];
        self.active_count = 0;
        self.growth_clock = 0.0;
        self.cursor = 0;
        self.initialized = true;
        tracing::info!(capacity, "flower pool initialized");
        true
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn active_count(&self) -> usize {
        self.active_count
    }

    pub fn is_full(&self) -> bool {
        self.active_count >= self.slots.len()
    }

    pub fn slots(&self) -> &[FlowerSlot] {
        &self.slots
    }

    pub fn slot(&self, index: usize) -> Option<&FlowerSlot> {
        self.slots.get(index)
    }

    /// Active slots with their indices
    pub fn iter_active(&self) -> impl Iterator<Item = (usize, &FlowerSlot)> {
        self.slots.iter().enumerate().filter(|(_, s)| s.active)
    }

    /// Spawn one flower at `position`, rolling its attributes from `config`.
    ///
    /// Returns the slot index, or `None` when every slot is taken. Nothing is
    /// rolled for a rejected spawn.
    pub fn acquire<R: Rng + ?Sized>(
        &mut self,
        position: Vec3,
        normal: Vec3,
        config: &FlowerConfig,
        rng: &mut R,
    ) -> Option<usize> {
        if self.is_full() {
            return None;
        }
        let seed = FlowerSeed::roll(position, normal, config, rng);
        self.acquire_seed(&seed, config.instant_growth)
    }

    /// Occupy the first free slot with pre-rolled attributes
    pub fn acquire_seed(&mut self, seed: &FlowerSeed, instant: bool) -> Option<usize> {
        if self.is_full() {
            return None;
        }
        let index = self.slots.iter().position(|s| !s.active)?;
        self.slots[index].occupy(seed, growth_scale(0.0, instant), self.growth_clock);
        self.active_count += 1;
        Some(index)
    }

    /// `count` independent acquisitions at one point; each is capacity-checked
    pub fn acquire_burst<R: Rng + ?Sized>(
        &mut self,
        count: usize,
        position: Vec3,
        normal: Vec3,
        config: &FlowerConfig,
        rng: &mut R,
    ) -> Vec<Option<usize>> {
        (0..count)
            .map(|_| self.acquire(position, normal, config, rng))
            .collect()
    }

    /// Age active slots by `dt * speed * growth_rate`, releasing any that
    /// reach age 1 and recomputing the rest's scale from the growth curve.
    pub fn update(&mut self, dt: f32, speed: f32, instant: bool) -> UpdateReport {
        self.growth_clock += (dt.max(0.0) * speed.max(0.0)) as f64;

        let mut report = UpdateReport::default();
        let capacity = self.slots.len();
        if self.active_count == 0 || capacity == 0 {
            self.cursor = 0;
            return report;
        }

        let start = self.cursor.min(capacity - 1);
        let mut next_cursor = 0;
        for offset in 0..capacity {
            let index = (start + offset) % capacity;
            if !self.slots[index].active {
                continue;
            }
            if report.aged == self.update_cap {
                next_cursor = index;
                report.deferred = self.active_count - (report.aged - report.released);
                break;
            }
            report.aged += 1;

            let clock = self.growth_clock;
            let slot = &mut self.slots[index];
            let elapsed = (clock - slot.aged_until) as f32;
            slot.aged_until = clock;
            slot.age += elapsed * slot.growth_rate;

            if slot.age >= 1.0 {
                slot.age = RELEASED_AGE;
                slot.current_scale = 0.0;
                slot.active = false;
                self.active_count -= 1;
                report.released += 1;
                continue;
            }
            slot.current_scale = growth_scale(slot.age, instant) * slot.target_scale;
        }
        self.cursor = next_cursor;

        if report.deferred > 0 {
            tracing::debug!(
                aged = report.aged,
                deferred = report.deferred,
                "update cap reached"
            );
        }
        report
    }

    /// Deactivate every slot and zero its age and scale. Idempotent.
    pub fn release_all(&mut self) {
        for slot in &mut self.slots {
            slot.active = false;
            slot.age = 0.0;
            slot.current_scale = 0.0;
            slot.target_scale = 0.0;
        }
        self.active_count = 0;
        self.cursor = 0;
    }

    #[cfg(test)]
    pub(crate) fn slot_mut(&mut self, index: usize) -> &mut FlowerSlot {
        &mut self.slots[index]
    }
}
