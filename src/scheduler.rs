//! Deferred callbacks on a virtual millisecond clock.
//!
//! Nothing here sleeps: the owner calls [`Scheduler::pop_due`] as real (or
//! simulated) time passes and runs each task to completion before asking for
//! the next one. Every task carries the generation of the session that
//! scheduled it so the owner can discard callbacks from a replaced session.

pub type Generation = u64;

/// Identifies a scheduled task for cancellation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskHandle(u64);

/// A task whose due time has been reached
#[derive(Debug, Clone, PartialEq)]
pub struct Fired<T> {
    pub at_ms: u64,
    pub generation: Generation,
    pub task: T,
}

#[derive(Debug, Clone)]
struct Entry<T> {
    handle: TaskHandle,
    due_ms: u64,
    // insertion order, breaks ties between equal due times
    seq: u64,
    generation: Generation,
    period_ms: Option<u64>,
    task: T,
}

#[derive(Debug, Clone)]
pub struct Scheduler<T> {
    now_ms: u64,
    next_id: u64,
    next_seq: u64,
    entries: Vec<Entry<T>>,
}

impl<T: Clone> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            now_ms: 0,
            next_id: 0,
            next_seq: 0,
            entries: Vec::new(),
        }
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn pending(&self) -> usize {
        self.entries.len()
    }

    /// Run `task` once, `delay_ms` from now
    pub fn after(&mut self, delay_ms: u64, generation: Generation, task: T) -> TaskHandle {
        self.insert(delay_ms, None, generation, task)
    }

    /// Run `task` every `period_ms` until canceled. The first run is one period from now.
    pub fn every(&mut self, period_ms: u64, generation: Generation, task: T) -> TaskHandle {
        let period_ms = period_ms.max(1);
        self.insert(period_ms, Some(period_ms), generation, task)
    }

    /// Returns false if the task already ran (one-shot) or was canceled
    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.handle != handle);
        self.entries.len() != before
    }

    /// Drop every task scheduled under `generation`
    pub fn cancel_generation(&mut self, generation: Generation) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| e.generation != generation);
        before - self.entries.len()
    }

    /// Take the earliest task due at or before `until_ms`, moving the clock to its due time.
    /// Repeating tasks are re-armed one period later.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<Fired<T>> {
        let (pos, _) = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.due_ms <= until_ms)
            .min_by_key(|(_, e)| (e.due_ms, e.seq))?;

        let entry = self.entries.swap_remove(pos);
        self.now_ms = self.now_ms.max(entry.due_ms);

        let fired = Fired {
            at_ms: entry.due_ms,
            generation: entry.generation,
            task: entry.task.clone(),
        };

        if let Some(period) = entry.period_ms {
            let seq = self.bump_seq();
            self.entries.push(Entry {
                due_ms: entry.due_ms + period,
                seq,
                ..entry
            });
        }

        Some(fired)
    }

    /// Move the clock forward without firing anything
    pub fn advance_to(&mut self, until_ms: u64) {
        self.now_ms = self.now_ms.max(until_ms);
    }

    fn insert(
        &mut self,
        delay_ms: u64,
        period_ms: Option<u64>,
        generation: Generation,
        task: T,
    ) -> TaskHandle {
        let handle = TaskHandle(self.next_id);
        self.next_id += 1;
        let seq = self.bump_seq();
        self.entries.push(Entry {
            handle,
            due_ms: self.now_ms + delay_ms,
            seq,
            generation,
            period_ms,
            task,
        });
        handle
    }

    fn bump_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }
}

impl<T: Clone> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}
