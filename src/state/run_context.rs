/// Counters and limits scoped to one crawl run
///
/// The coordinator owns a single `RunContext` and threads it through the
/// crawl loop, so a run with fixed inputs can be built directly in tests.
#[derive(Debug, Clone, Default)]
pub struct RunContext {
    /// Number of successful pagination advances
    pub pages_visited: u32,

    /// Number of unique records accepted so far
    pub records_collected: u64,

    /// Upper bound on records, fixed for the whole run
    target_cap: Option<u64>,
}

impl RunContext {
    /// Creates a fresh context with both counters at zero
    pub fn new(target_cap: Option<u64>) -> Self {
        Self {
            pages_visited: 0,
            records_collected: 0,
            target_cap,
        }
    }

    /// Returns the configured cap, if any
    pub fn target_cap(&self) -> Option<u64> {
        self.target_cap
    }

    /// Returns true once the cap has been met
    ///
    /// An unbounded run never reaches its cap.
    pub fn cap_reached(&self) -> bool {
        self.target_cap
            .map_or(false, |cap| self.records_collected >= cap)
    }

    /// Counts one accepted record
    ///
    /// # Returns
    ///
    /// * `true` - The record was counted
    /// * `false` - The cap was already met and the record must be dropped
    pub fn record_collected(&mut self) -> bool {
        if self.cap_reached() {
            return false;
        }
        self.records_collected += 1;
        true
    }

    /// Counts one successful move to the next list page
    pub fn page_advanced(&mut self) {
        self.pages_visited += 1;
    }
}
