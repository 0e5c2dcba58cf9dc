/// Reuse caches for transient entities.
///
/// One `Pool<T>` per concrete entity type. Entities move out of the pool on
/// `acquire` and back in on `release`, so an instance can never be live and
/// pooled at the same time. A miss constructs a fresh instance; pools grow
/// under pressure and never shrink.

use std::fmt;

use tracing::debug;

use crate::entities::{Bullet, Enemy, Particle};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Bullet,
    Enemy,
    Particle,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Bullet => write!(f, "bullet"),
            EntityKind::Enemy => write!(f, "enemy"),
            EntityKind::Particle => write!(f, "particle"),
        }
    }
}

/// An entity that can be recycled. `reset` must overwrite every field so
/// nothing leaks from the previous use.
pub trait Poolable: Default {
    type Args;
    const KIND: EntityKind;

    fn reset(&mut self, args: Self::Args);

    fn create(args: Self::Args) -> Self {
        let mut fresh = Self::default();
        fresh.reset(args);
        fresh
    }
}

#[derive(Debug)]
pub struct Pool<T> {
    free: Vec<T>,
    handed_out: u64,
    returned: u64,
    created: u64,
}

impl<T: Poolable> Pool<T> {
    pub fn new() -> Self {
        Self {
            free: Vec::new(),
            handed_out: 0,
            returned: 0,
            created: 0,
        }
    }

    /// Pool pre-filled with `count` default instances.
    pub fn with_prewarm(count: usize) -> Self {
        let mut pool = Self::new();
        pool.free.reserve(count);
        for _ in 0..count {
            pool.free.push(T::default());
        }
        pool.created = count as u64;
        pool
    }

    /// Pop an instance from the tail and reset it, or build a new one.
    pub fn acquire(&mut self, args: T::Args) -> T {
        self.handed_out += 1;
        match self.free.pop() {
            Some(mut item) => {
                item.reset(args);
                item
            }
            None => {
                self.created += 1;
                debug!(kind = %T::KIND, total = self.created, "pool empty, allocating");
                T::create(args)
            }
        }
    }

    /// Push an instance back; its fields are left as-is until the next reset.
    pub fn release(&mut self, item: T) {
        self.returned += 1;
        self.free.push(item);
    }

    /// Release every item in `live`, leaving it empty.
    pub fn release_all(&mut self, live: &mut Vec<T>) {
        self.returned += live.len() as u64;
        self.free.append(live);
    }

    /// Instances currently waiting in the pool.
    pub fn available(&self) -> usize {
        self.free.len()
    }

    /// Instances handed out and not yet returned. Releasing an instance the
    /// pool never handed out only grows the free list.
    pub fn outstanding(&self) -> u64 {
        self.handed_out.saturating_sub(self.returned)
    }

    /// Every instance this pool has ever constructed.
    pub fn created(&self) -> u64 {
        self.created
    }
}

impl<T: Poolable> Default for Pool<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
pub struct EntityPools {
    pub bullets: Pool<Bullet>,
    pub enemies: Pool<Enemy>,
    pub particles: Pool<Particle>,
}

impl EntityPools {
    pub fn prewarmed(count: usize) -> Self {
        Self {
            bullets: Pool::with_prewarm(count),
            enemies: Pool::with_prewarm(count),
            particles: Pool::with_prewarm(count),
        }
    }
}
