//! Progress UI for batch runs.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

const BAR_TEMPLATE: &str = "{spinner} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}";

/// Progress reporting for one batch run.
///
/// Wraps an `indicatif` bar ticked once per terminal item outcome
/// (success or failure). Created at batch start, finished at batch end.
/// [`BatchProgress::hidden`] gives the same interface with no terminal
/// output, for quiet mode and tests.
#[derive(Debug, Clone)]
pub struct BatchProgress {
    bar: ProgressBar,
}

impl BatchProgress {
    /// Creates a visible progress bar for a batch of `total` items.
    #[must_use]
    pub fn new(total: u64) -> Self {
        let bar = ProgressBar::new(total);
        bar.set_style(
            ProgressStyle::with_template(BAR_TEMPLATE)
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        bar.enable_steady_tick(Duration::from_millis(100));
        Self { bar }
    }

    /// Creates a hidden progress bar (no terminal output).
    #[must_use]
    pub fn hidden(total: u64) -> Self {
        let bar = ProgressBar::hidden();
        bar.set_length(total);
        Self { bar }
    }

    /// Advances the bar by one completed item.
    pub fn tick(&self) {
        self.bar.inc(1);
    }

    /// Returns the number of ticks recorded so far.
    #[must_use]
    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    /// Finishes the bar, leaving the final count visible.
    pub fn finish(&self) {
        self.bar.finish();
    }
}

#[cfg(test)]
mod tests {
    use super::BatchProgress;

    #[test]
    fn hidden_bar_counts_ticks() {
        let progress = BatchProgress::hidden(3);
        assert_eq!(progress.position(), 0);
        progress.tick();
        progress.tick();
        assert_eq!(progress.position(), 2);
        progress.finish();
    }
}
