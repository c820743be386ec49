//! 📊 progress.rs — "Are we there yet?" — every batch job, every time, forever.
//!
//! One bar, sized in documents, advanced per flushed batch. Watching it
//! will not make the cluster faster. We've tried. Science says no.

use indicatif::{ProgressBar, ProgressStyle};

/// 📊 The ingestion progress bar. Advanced by the pipeline after each
/// successful flush; finished by the driver once the run completes.
///
/// Purely cosmetic — it holds no state the run depends on, and nothing
/// here can fail (the template is hardcoded and known-valid).
pub(crate) struct IngestProgress {
    bar: ProgressBar,
}

impl std::fmt::Debug for IngestProgress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // 🔧 indicatif::ProgressBar does not derive Debug, and printing a
        // terminal widget into debug output would be... a choice.
        f.debug_struct("IngestProgress")
            .field("position", &self.bar.position())
            .field("length", &self.bar.length())
            .finish()
    }
}

impl IngestProgress {
    /// 🚀 A bar sized to the article count. Cyan because it's classy,
    /// blue because it's calm.
    pub(crate) fn new(total_docs: u64) -> Self {
        let bar = ProgressBar::new(total_docs);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{msg}\n| [{bar:40.cyan/blue}] {pos}/{len} docs")
                .unwrap() // 🐛 safe unwrap: template string is hardcoded and valid, I checked, twice
                .progress_chars("=>-"),
        );
        bar.set_message("📡 shipping articles to the index");
        Self { bar }
    }

    /// 📦 One batch landed — move the needle by that many documents.
    pub(crate) fn batch_flushed(&self, docs: usize) {
        self.bar.inc(docs as u64);
    }

    /// 🏁 The run is over. Freeze the bar with a closing line.
    pub(crate) fn finish(&self) {
        self.bar.finish_with_message("✅ all batches flushed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn the_one_where_the_needle_moves_by_whole_batches() {
        let progress = IngestProgress::new(1200);
        progress.batch_flushed(500);
        progress.batch_flushed(500);
        progress.batch_flushed(200);
        assert_eq!(progress.bar.position(), 1200);
        progress.finish();
    }
}
