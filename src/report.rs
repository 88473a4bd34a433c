use std::path::Path;

use anyhow::{Context, Result};
use chrono::Local;
use plotly::common::Font;
use plotly::{Bar, Layout, Plot};

use crate::counter::ClassCount;

/// Options controlling which report artifacts are produced
#[derive(Debug, Clone)]
pub struct ReportConfig {
    /// Render the bar chart at all; when false nothing is produced even if
    /// the save or write flags are set
    pub plot_bars: bool,
    /// Open the chart in an interactive view
    pub show_plots: bool,
    /// Save the chart as a self-contained html document
    pub save_plots: bool,
    /// Write the count table to a delimited text file
    pub write_counts: bool,
    /// Base name for the output files. A second-precision timestamp is
    /// appended, so reruns in the same second into the same directory
    /// overwrite each other.
    pub description: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            plot_bars: true,
            show_plots: false,
            save_plots: true,
            write_counts: true,
            description: "counts".to_string(),
        }
    }
}

/// Plots a bar chart of class counts and writes the artifacts selected by
/// `config` into `write_path`, printing the path of everything it saves.
pub fn plot_counts(counts: &[ClassCount], write_path: &Path, config: &ReportConfig) -> Result<()> {
    if !config.plot_bars {
        return Ok(());
    }

    let time = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();

    // one trace per class so each class gets its own color and legend entry
    let mut plot = Plot::new();
    for entry in counts {
        plot.add_trace(Bar::new(vec![entry.clss.clone()], vec![entry.count]).name(&entry.clss));
    }
    plot.set_layout(
        Layout::new()
            .width(800)
            .height(400)
            .show_legend(true)
            .font(Font::new().size(16)),
    );

    if config.show_plots {
        plot.show();
    }

    if config.save_plots {
        let chart_path = write_path.join(format!("{}_{}.html", config.description, time));
        plot.write_html(&chart_path);
        println!("Saved bar plot to: {}", chart_path.display());
    }

    if config.write_counts {
        let counts_path = write_path.join(format!("{}_{}.txt", config.description, time));
        write_count_table(counts, &counts_path)?;
        println!("Saved summary to: {}", counts_path.display());
    }

    Ok(())
}

/// Writes the count table as delimited text with a leading index column
fn write_count_table(counts: &[ClassCount], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create count summary file: {}", path.display()))?;

    writer.write_record(["", "clss", "count"])?;
    for (idx, entry) in counts.iter().enumerate() {
        writer.write_record(&[idx.to_string(), entry.clss.clone(), entry.count.to_string()])?;
    }
    writer.flush()?;

    Ok(())
}
