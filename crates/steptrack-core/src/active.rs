//! The set of steps currently open for the loaded activity.

use std::collections::BTreeSet;

use crate::step::{Step, StepKind, TimeLog};

/// Holds at most one sequential member plus any number of distinct parallel
/// starts; never a parallel end, and never a start whose end has already
/// been recorded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveSet {
    steps: BTreeSet<Step>,
}

impl ActiveSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the open set from a historical log.
    ///
    /// Scans backwards and stops at the first pause. A parallel end seen on
    /// the way marks its pair as resolved; a sequential step only counts if
    /// no later session-opening step was seen. The scan stops early once a
    /// sequential step is open and every parallel pair is accounted for.
    pub fn bootstrap(logs: &[TimeLog]) -> Self {
        let mut seen: BTreeSet<Step> = BTreeSet::new();

        for log in logs.iter().rev() {
            match log.step.kind() {
                StepKind::Pause => break,
                StepKind::Sequential => {
                    let superseded = seen.iter().any(|s| {
                        matches!(s.kind(), StepKind::Sequential | StepKind::ParallelStart)
                    });
                    if !superseded {
                        seen.insert(log.step);
                    }
                }
                StepKind::ParallelEnd => {
                    if !seen.contains(&log.step.parallel_start()) {
                        seen.insert(log.step);
                    }
                }
                StepKind::ParallelStart => {
                    if !seen.contains(&log.step.parallel_end()) {
                        seen.insert(log.step);
                    }
                }
                StepKind::Total => {}
            }

            let has_sequential = seen.iter().any(|s| s.kind() == StepKind::Sequential);
            if has_sequential && all_parallels_resolved(&seen) {
                break;
            }
        }

        let steps = seen
            .into_iter()
            .filter(|s| matches!(s.kind(), StepKind::Sequential | StepKind::ParallelStart))
            .collect();
        Self { steps }
    }

    /// Apply a live step transition.
    ///
    /// A sequential step replaces the previous sequential member; a parallel
    /// start joins the set and also evicts the sequential member (entering a
    /// parallel phase suspends sequential tracking from then on); a parallel
    /// end closes its counterpart; a pause clears everything.
    pub fn apply(&mut self, step: Step) {
        match step.kind() {
            StepKind::Sequential => {
                self.steps.retain(|s| s.is_parallel());
                self.steps.insert(step);
            }
            StepKind::ParallelStart => {
                self.steps.insert(step);
                self.steps.retain(|s| s.is_parallel());
            }
            StepKind::ParallelEnd => {
                self.steps.remove(&step.parallel_start());
            }
            StepKind::Pause => self.steps.clear(),
            StepKind::Total => {}
        }
    }

    pub fn contains(&self, step: Step) -> bool {
        self.steps.contains(&step)
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Members in step order.
    pub fn iter(&self) -> impl Iterator<Item = Step> + '_ {
        self.steps.iter().copied()
    }
}

/// Every known parallel pair has either its start or its end in `seen`.
fn all_parallels_resolved(seen: &BTreeSet<Step>) -> bool {
    Step::PARALLEL_STARTS
        .iter()
        .all(|start| seen.contains(start) || seen.contains(&start.parallel_end()))
}
