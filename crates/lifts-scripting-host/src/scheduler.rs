use std::collections::{HashMap, HashSet};

/// Unique identifier for a scheduled run
///
/// Ids are never reused within a process, including across
/// [`Scheduler::clear_all`], so a handle that outlived its run can never
/// cancel somebody else's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RunId(u64);

impl RunId {
    /// Raw value, for storing the handle in an entity property
    pub fn as_u64(self) -> u64 {
        self.0
    }

    /// Rebuild a handle from a stored raw value. The result may not refer
    /// to a live run.
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

/// Type of run
#[derive(Debug, Clone)]
enum RunKind {
    /// Fires once and is removed
    Once { fire_at: u64 },
    /// Fires every `every` ticks until cleared
    Interval { every: u64, next_fire: u64 },
}

/// A scheduled run with metadata
#[derive(Debug, Clone)]
struct Run {
    name: String,
    kind: RunKind,
}

/// Tick-driven scheduler shared by all scripts.
///
/// Scripts register runs and later ask, from their tick handler, whether a
/// run fired this tick. Nothing here blocks: "waiting" is a run that keeps
/// firing until its owner clears it.
#[derive(Debug)]
pub struct Scheduler {
    runs: HashMap<RunId, Run>,
    next_id: u64,
    current_tick: u64,
    fired: HashSet<RunId>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            runs: HashMap::new(),
            next_id: 1,
            current_tick: 0,
            fired: HashSet::new(),
        }
    }

    fn allocate(&mut self, name: String, kind: RunKind) -> RunId {
        let id = RunId(self.next_id);
        self.next_id += 1;
        self.runs.insert(id, Run { name, kind });
        id
    }

    /// Schedule a run that fires once, `delay` ticks from now (at least one)
    pub fn run_once(&mut self, delay: u64, name: impl Into<String>) -> RunId {
        let fire_at = self.current_tick + delay.max(1);
        self.allocate(name.into(), RunKind::Once { fire_at })
    }

    /// Schedule a run that fires every `every` ticks (at least one), starting
    /// `every` ticks from now
    pub fn run_interval(&mut self, every: u64, name: impl Into<String>) -> RunId {
        let every = every.max(1);
        self.allocate(
            name.into(),
            RunKind::Interval {
                every,
                next_fire: self.current_tick + every,
            },
        )
    }

    /// Cancel a run. Unknown or already cleared ids are a no-op returning false.
    pub fn clear_run(&mut self, id: RunId) -> bool {
        self.fired.remove(&id);
        self.runs.remove(&id).is_some()
    }

    /// Check if a run fired on the current tick (and consume the fired state)
    pub fn check_run(&mut self, id: RunId) -> bool {
        self.fired.remove(&id)
    }

    pub fn is_active(&self, id: RunId) -> bool {
        self.runs.contains_key(&id)
    }

    pub fn current_tick(&self) -> u64 {
        self.current_tick
    }

    /// Advance one tick and return the runs that fired, with their names.
    /// Fired state not consumed during the previous tick is dropped.
    pub fn advance(&mut self) -> Vec<(RunId, String)> {
        self.current_tick += 1;
        self.fired.clear();

        let now = self.current_tick;
        let mut fired = Vec::new();
        let mut to_remove = Vec::new();

        for (id, run) in self.runs.iter_mut() {
            match &mut run.kind {
                RunKind::Once { fire_at } => {
                    if now >= *fire_at {
                        fired.push((*id, run.name.clone()));
                        to_remove.push(*id);
                    }
                }
                RunKind::Interval { every, next_fire } => {
                    if now >= *next_fire {
                        fired.push((*id, run.name.clone()));
                        *next_fire = now + *every;
                    }
                }
            }
        }

        // Remove one-shot runs that have fired
        for id in to_remove {
            self.runs.remove(&id);
        }

        fired.sort_by_key(|(id, _)| *id);
        self.fired.extend(fired.iter().map(|(id, _)| *id));

        fired
    }

    /// Drop every run. Used when the script environment is rebuilt; the id
    /// counter keeps counting.
    pub fn clear_all(&mut self) {
        self.runs.clear();
        self.fired.clear();
    }

    /// Get the number of active runs
    pub fn active_count(&self) -> usize {
        self.runs.len()
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_once() {
        let mut scheduler = Scheduler::new();
        let id = scheduler.run_once(2, "test");

        // Should not fire on the first tick
        assert!(scheduler.advance().is_empty());

        let fired = scheduler.advance();
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].0, id);
        assert_eq!(fired[0].1, "test");

        // Should be removed after firing
        assert_eq!(scheduler.active_count(), 0);
    }

    #[test]
    fn test_run_interval_every_tick() {
        let mut scheduler = Scheduler::new();
        let id = scheduler.run_interval(1, "poll");

        for _ in 0..3 {
            let fired = scheduler.advance();
            assert_eq!(fired.len(), 1);
            assert_eq!(fired[0].0, id);
        }

        // Should still be active
        assert_eq!(scheduler.active_count(), 1);
        assert_eq!(scheduler.current_tick(), 3);
    }

    #[test]
    fn test_run_interval_spacing() {
        let mut scheduler = Scheduler::new();
        scheduler.run_interval(3, "slow");

        let fired_on: Vec<u64> = (0..9)
            .filter_map(|_| {
                let fired = scheduler.advance();
                (!fired.is_empty()).then(|| scheduler.current_tick())
            })
            .collect();
        assert_eq!(fired_on, vec![3, 6, 9]);
    }

    #[test]
    fn test_clear_run_is_idempotent() {
        let mut scheduler = Scheduler::new();
        let id = scheduler.run_interval(1, "test");

        assert!(scheduler.clear_run(id));
        assert_eq!(scheduler.active_count(), 0);
        assert!(!scheduler.clear_run(id)); // Already removed
        assert!(!scheduler.clear_run(RunId::from_raw(999)));
    }

    #[test]
    fn test_check_run() {
        let mut scheduler = Scheduler::new();
        let id = scheduler.run_interval(1, "test");

        // Not fired yet
        assert!(!scheduler.check_run(id));

        scheduler.advance();

        // Should return true once
        assert!(scheduler.check_run(id));
        // Should return false second time (consumed)
        assert!(!scheduler.check_run(id));
    }

    #[test]
    fn test_clear_run_drops_fired_state() {
        let mut scheduler = Scheduler::new();
        let id = scheduler.run_interval(1, "test");
        scheduler.advance();

        scheduler.clear_run(id);
        assert!(!scheduler.check_run(id));
    }

    #[test]
    fn test_unconsumed_fired_state_expires() {
        let mut scheduler = Scheduler::new();
        let id = scheduler.run_once(1, "test");
        scheduler.advance();
        scheduler.advance();

        assert!(!scheduler.check_run(id));
    }

    #[test]
    fn test_clear_all_keeps_ids_unique() {
        let mut scheduler = Scheduler::new();
        let before = scheduler.run_interval(1, "a");
        scheduler.clear_all();
        let after = scheduler.run_interval(1, "b");

        assert_ne!(before, after);
        assert!(!scheduler.is_active(before));
        assert!(scheduler.is_active(after));
    }
}
