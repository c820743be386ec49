//! 🧾 The result reporter — counts, milliseconds, and a table with manners.
//!
//! No side effects beyond producing text. It cannot fail, which makes it
//! the most reliable module in the workspace by a comfortable margin.

use std::time::Duration;

use comfy_table::{Cell, CellAlignment, ContentArrangement, Table, presets::NOTHING};

/// 📊 What the run amounted to: how many articles, how long it took.
#[derive(Debug, Clone)]
pub struct IngestSummary {
    pub articles_indexed: usize,
    pub elapsed: Duration,
}

impl IngestSummary {
    /// 🔢 Throughput, guarded against the zero-duration run that only
    /// happens in tests and on suspiciously fast laptops.
    fn docs_per_sec(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.articles_indexed as f64 / secs
        } else {
            0.0
        }
    }

    /// 🍽️ Render the terminal summary table.
    pub fn render(&self) -> String {
        let mut table = Table::new();
        table
            .load_preset(NOTHING)
            .set_content_arrangement(ContentArrangement::Dynamic);
        table.add_row(vec![
            Cell::new("articles indexed"),
            Cell::new(format_number(self.articles_indexed as u64)).set_alignment(CellAlignment::Right),
        ]);
        table.add_row(vec![
            Cell::new("elapsed"),
            Cell::new(format!("{} ms", self.elapsed.as_millis())).set_alignment(CellAlignment::Right),
        ]);
        table.add_row(vec![
            Cell::new("throughput"),
            Cell::new(format!("{:.0} docs/sec", self.docs_per_sec()))
                .set_alignment(CellAlignment::Right),
        ]);
        table.to_string()
    }
}

/// 🔢 Formats a number with commas for the 3 people in the audience who
/// like readability. "1000000" → "1,000,000" — you're welcome, eyes.
fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    for (i, c) in s.chars().enumerate() {
        if i > 0 && (s.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn the_one_where_the_summary_names_its_numbers() {
        let summary = IngestSummary {
            articles_indexed: 1200,
            elapsed: Duration::from_millis(2345),
        };
        let rendered = summary.render();
        assert!(rendered.contains("1,200"));
        assert!(rendered.contains("2345 ms"));
    }

    #[test]
    fn the_one_where_commas_land_every_three_digits() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(1234567), "1,234,567");
    }

    #[test]
    fn the_one_where_a_zero_duration_run_divides_by_nothing() {
        let summary = IngestSummary {
            articles_indexed: 10,
            elapsed: Duration::ZERO,
        };
        // 🧪 No panic, no NaN in the table. Just a calm zero.
        assert!(summary.render().contains("0 docs/sec"));
    }
}
