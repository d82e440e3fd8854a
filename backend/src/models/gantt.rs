//! Gantt chart records for scheduling runs
//!
//! Tick-driven policies execute one unit at a time, so the chart merges a
//! segment into the previous entry whenever it continues the same process
//! without a gap. A single uninterrupted burst is therefore always one entry.

use serde::{Deserialize, Serialize};

use crate::core::Time;
use crate::models::process::Pid;

/// One contiguous run of a process on the CPU
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GanttEntry {
    pub process_id: Pid,
    pub start_time: Time,
    pub end_time: Time,
    pub duration: Time,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub queue_level: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantum: Option<Time>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<Time>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline_missed: Option<bool>,
}

impl GanttEntry {
    /// Segment `[start_time, end_time)` for `process_id`
    pub fn new(process_id: Pid, start_time: Time, end_time: Time) -> Self {
        debug_assert!(end_time > start_time, "empty Gantt segment");
        Self {
            process_id,
            start_time,
            end_time,
            duration: end_time - start_time,
            priority: None,
            queue_level: None,
            quantum: None,
            deadline: None,
            deadline_missed: None,
        }
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn with_queue_level(mut self, level: usize, quantum: Time) -> Self {
        self.queue_level = Some(level);
        self.quantum = Some(quantum);
        self
    }

    pub fn with_deadline(mut self, deadline: Time, missed: bool) -> Self {
        self.deadline = Some(deadline);
        self.deadline_missed = Some(missed);
        self
    }

    fn continues(&self, next: &GanttEntry) -> bool {
        self.process_id == next.process_id && self.end_time == next.start_time
    }
}

/// Ordered list of Gantt entries with contiguous-run merging
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GanttChart {
    entries: Vec<GanttEntry>,
}

impl GanttChart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a segment, extending the last entry when it is contiguous
    ///
    /// A merged entry keeps the annotations it started with, except that a
    /// deadline miss is sticky: once any merged unit is late the entry is.
    ///
    /// # Example
    /// ```
    /// use os_simulator_core_rs::models::{GanttChart, GanttEntry};
    ///
    /// let mut chart = GanttChart::new();
    /// chart.push(GanttEntry::new(1, 0, 1));
    /// chart.push(GanttEntry::new(1, 1, 2));
    /// chart.push(GanttEntry::new(2, 2, 3));
    ///
    /// assert_eq!(chart.len(), 2);
    /// assert_eq!(chart.entries()[0].duration, 2);
    /// ```
    pub fn push(&mut self, entry: GanttEntry) {
        match self.entries.last_mut() {
            Some(last) if last.continues(&entry) => {
                last.end_time = entry.end_time;
                last.duration = last.end_time - last.start_time;
                if entry.deadline_missed == Some(true) {
                    last.deadline_missed = Some(true);
                }
            }
            _ => self.entries.push(entry),
        }
    }

    pub fn entries(&self) -> &[GanttEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries for one process in time order
    pub fn entries_for(&self, pid: Pid) -> Vec<&GanttEntry> {
        self.entries
            .iter()
            .filter(|e| e.process_id == pid)
            .collect()
    }

    /// Total CPU time given to `pid`
    pub fn cpu_time(&self, pid: Pid) -> Time {
        self.entries_for(pid).iter().map(|e| e.duration).sum()
    }

    pub fn into_entries(self) -> Vec<GanttEntry> {
        self.entries
    }
}
