use std::fmt;

/// Counters accumulated over the reference stream. Each is monotonically
/// non-decreasing; the translator bumps them at fixed points in its
/// pipeline.
#[derive(Debug, PartialEq, Eq, Default)]
pub struct Tracker {
    pub translated: usize,
    pub page_faults: usize,
    pub tlb_hits: usize,
    pub write_backs: usize,
}

impl Tracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page_fault_rate(&self) -> f64 {
        ratio(self.page_faults, self.translated)
    }

    pub fn tlb_hit_ratio(&self) -> f64 {
        ratio(self.tlb_hits, self.translated)
    }
}

// an empty stream reports zero rates rather than dividing by zero
fn ratio(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    count as f64 / total as f64
}

impl fmt::Display for Tracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Number of Translated Addresses = {}\n\
             Percentage of Page Faults = {:.6} (absolute = {})\n\
             TLB Hit Ratio = {:.6} (absolute = {})\n\
             Write-Backs = {}",
            self.translated,
            self.page_fault_rate(),
            self.page_faults,
            self.tlb_hit_ratio(),
            self.tlb_hits,
            self.write_backs,
        )
    }
}
