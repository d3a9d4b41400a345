//! Session-unique identifiers for menu action names.
//!
//! Two layouts whose names differ only in spaces vs. underscores would map
//! to the same action name, so every generated action name gets a numeric
//! suffix from this generator. Values only need to be unique within one run.

/// Minimum number of digits in a generated id.
const MIN_WIDTH: usize = 6;

/// Produces `"000000"`, `"000001"`, ... in strictly increasing order.
#[derive(Debug, Default)]
pub struct UniqueIdGenerator {
    next: u64,
}

impl UniqueIdGenerator {
    /// Create a generator starting at `"000000"`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the next id. Width grows past six digits once the counter does.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> String {
        let id = format!("{:0width$}", self.next, width = MIN_WIDTH);
        self.next += 1;
        id
    }
}
