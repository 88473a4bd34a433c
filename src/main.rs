use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use boxtally::{annotation, counter, report};

mod cli;

fn main() -> Result<()> {
    let args: cli::Args = argh::from_env();

    let annot_path = Path::new(&args.annot_path);
    let files = collect_annotation_files(annot_path)?;
    println!(
        "Found {} annotation files in {}",
        files.len(),
        annot_path.display()
    );

    let mut bboxes = Vec::with_capacity(files.len());
    for file in &files {
        bboxes.push(annotation::parse_annotation(file, annot_path)?);
    }

    let (counts, objects) = counter::count_classes(&bboxes)?;
    println!("Total objects: {}", objects.len());

    if args.area_summary {
        println!("\nBounding Box Area Summary:");
        for summary in counter::class_area_summary(&objects) {
            println!(
                "Class: {} Count: {} Min: {} Max: {} Mean: {:.1}",
                summary.clss, summary.count, summary.min, summary.max, summary.mean
            );
        }
    }

    let config = report::ReportConfig {
        plot_bars: !args.no_plot,
        show_plots: args.show_plots,
        save_plots: !args.no_save,
        write_counts: !args.no_counts,
        description: args.description.clone(),
    };

    let write_path = Path::new(&args.write_path);
    fs::create_dir_all(write_path)
        .with_context(|| format!("Failed to create output directory: {}", write_path.display()))?;
    report::plot_counts(&counts, write_path, &config)?;

    Ok(())
}

/// Collects the xml annotation file names in `annot_path`, sorted by name
/// so the flattened object table is deterministic across runs
fn collect_annotation_files(annot_path: &Path) -> Result<Vec<String>> {
    let entries = fs::read_dir(annot_path).with_context(|| {
        format!(
            "Failed to read annotation directory: {}",
            annot_path.display()
        )
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        let is_xml = Path::new(&name)
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("xml"))
            .unwrap_or(false);
        if is_xml && entry.file_type()?.is_file() {
            files.push(name);
        }
    }
    files.sort();

    Ok(files)
}
