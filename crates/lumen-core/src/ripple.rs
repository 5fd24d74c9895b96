//! Ripple effect manager.
//!
//! Each [`RippleKind`] owns one ordered collection of transient records and
//! one monotonic id counter. Spawning appends a record (append order is
//! render order) and schedules its expiry in the engine's timer queue.
//! Expiry removes the record if it is still present; a second expiry of the
//! same id, or an expiry after [`RippleManager::clear`], is a silent no-op.

use std::time::Duration;

use lumen_types::{Point, RippleId, RippleKind, RippleView};
use tracing::debug;

use crate::clock::Timestamp;
use crate::engine::EffectTask;
use crate::timer::TimerQueue;

/// A live ripple.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RippleRecord {
    /// Identifier, unique within `kind` for the life of the process.
    pub id: RippleId,
    /// Collection this record belongs to.
    pub kind: RippleKind,
    /// Spawn position.
    pub position: Point,
    /// Spawn time.
    pub created_at: Timestamp,
}

#[derive(Debug, Clone)]
struct RippleCollection {
    next_id: RippleId,
    records: Vec<RippleRecord>,
}

impl RippleCollection {
    const fn new() -> Self {
        Self {
            next_id: RippleId::FIRST,
            records: Vec::new(),
        }
    }

    fn allocate(&mut self) -> RippleId {
        let id = self.next_id;
        // Exhausting a u64 counter is out of reach at any spawn rate.
        self.next_id = id.next().unwrap_or(RippleId(u64::MAX));
        id
    }
}

/// Owns the click and ambient ripple collections.
#[derive(Debug, Clone)]
pub struct RippleManager {
    ttl: Duration,
    click: RippleCollection,
    ambient: RippleCollection,
}

impl RippleManager {
    /// Create a manager whose ripples live for `ttl`.
    pub const fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            click: RippleCollection::new(),
            ambient: RippleCollection::new(),
        }
    }

    /// Time-to-live of every ripple.
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Spawn a ripple of `kind` at `position` and schedule its expiry at
    /// `now + ttl`. Returns the new record's id.
    pub fn spawn(
        &mut self,
        kind: RippleKind,
        position: Point,
        now: Timestamp,
        timers: &mut TimerQueue<EffectTask>,
    ) -> RippleId {
        let ttl = self.ttl;
        let collection = self.collection_mut(kind);
        let id = collection.allocate();
        collection.records.push(RippleRecord {
            id,
            kind,
            position,
            created_at: now,
        });
        let _ = timers.schedule_once(now, ttl, EffectTask::ExpireRipple { kind, id });

        debug!(%kind, %id, x = position.x, y = position.y, "ripple spawned");
        id
    }

    /// Remove the record `id` from `kind`'s collection.
    ///
    /// Returns `true` if a record was removed, `false` if it was already gone.
    pub fn expire(&mut self, kind: RippleKind, id: RippleId) -> bool {
        let records = &mut self.collection_mut(kind).records;
        let before = records.len();
        records.retain(|record| record.id != id);
        let removed = records.len() < before;
        if removed {
            debug!(%kind, %id, "ripple expired");
        }
        removed
    }

    /// Drop every live record of every kind. Id counters keep counting.
    pub fn clear(&mut self) {
        self.click.records.clear();
        self.ambient.records.clear();
    }

    /// Live records of `kind` in spawn order.
    pub fn records(&self, kind: RippleKind) -> &[RippleRecord] {
        &self.collection(kind).records
    }

    /// Number of live records of `kind`.
    pub fn len(&self, kind: RippleKind) -> usize {
        self.collection(kind).records.len()
    }

    /// Whether no record of any kind is live.
    pub fn is_empty(&self) -> bool {
        self.click.records.is_empty() && self.ambient.records.is_empty()
    }

    /// Render views of `kind`'s live records at time `now`.
    pub fn views(&self, kind: RippleKind, now: Timestamp) -> Vec<RippleView> {
        self.collection(kind)
            .records
            .iter()
            .map(|record| {
                let age = now.saturating_since(record.created_at);
                RippleView {
                    id: record.id,
                    kind,
                    position: record.position,
                    age_ms: u64::try_from(age.as_millis()).unwrap_or(u64::MAX),
                    progress: self.progress(age),
                    marker_diameter: kind.marker_diameter(),
                }
            })
            .collect()
    }

    fn progress(&self, age: Duration) -> f64 {
        if self.ttl.is_zero() {
            return 1.0;
        }
        (age.as_secs_f64() / self.ttl.as_secs_f64()).clamp(0.0, 1.0)
    }

    const fn collection(&self, kind: RippleKind) -> &RippleCollection {
        match kind {
            RippleKind::Click => &self.click,
            RippleKind::Ambient => &self.ambient,
        }
    }

    const fn collection_mut(&mut self, kind: RippleKind) -> &mut RippleCollection {
        match kind {
            RippleKind::Click => &mut self.click,
            RippleKind::Ambient => &mut self.ambient,
        }
    }
}
