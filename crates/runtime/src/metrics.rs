use std::collections::BTreeMap;

/// Per-frame draw statistics.
///
/// Counters are keyed in sorted maps so snapshots have stable ordering and
/// can be compared across replays.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FrameMetrics {
    draw_calls: BTreeMap<String, u64>,
    skips: BTreeMap<String, u64>,
    program_switches: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameMetricsSnapshot {
    pub draw_calls: Vec<(String, u64)>,
    pub skips: Vec<(String, u64)>,
    pub program_switches: u64,
}

impl FrameMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.draw_calls.clear();
        self.skips.clear();
        self.program_switches = 0;
    }

    pub fn record_draw(&mut self, kind: impl Into<String>) {
        *self.draw_calls.entry(kind.into()).or_insert(0) += 1;
    }

    pub fn record_skip(&mut self, reason: impl Into<String>) {
        *self.skips.entry(reason.into()).or_insert(0) += 1;
    }

    pub fn record_program_switch(&mut self) {
        self.program_switches += 1;
    }

    pub fn draw_calls(&self, kind: &str) -> u64 {
        self.draw_calls.get(kind).copied().unwrap_or(0)
    }

    pub fn total_draw_calls(&self) -> u64 {
        self.draw_calls.values().sum()
    }

    pub fn skips(&self, reason: &str) -> u64 {
        self.skips.get(reason).copied().unwrap_or(0)
    }

    pub fn program_switches(&self) -> u64 {
        self.program_switches
    }

    /// Returns a stable, sorted snapshot suitable for logs/debug UI.
    pub fn snapshot(&self) -> FrameMetricsSnapshot {
        FrameMetricsSnapshot {
            draw_calls: self
                .draw_calls
                .iter()
                .map(|(k, v)| (k.clone(), *v))
                .collect(),
            skips: self.skips.iter().map(|(k, v)| (k.clone(), *v)).collect(),
            program_switches: self.program_switches,
        }
    }
}
