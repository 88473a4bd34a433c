use std::collections::BTreeSet;

use anyhow::{Context, Result, ensure};
use indicatif::{ProgressBar, ProgressStyle};

use crate::annotation::BboxRecords;

/// One flattened object row: class label plus bounding box pixel area
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectRow {
    pub clss: String,
    pub area: i64,
}

/// One entry of the per-class count table
#[derive(Debug, Clone, PartialEq)]
pub struct ClassCount {
    pub clss: String,
    pub count: usize,
}

/// Per-class bounding box area statistics over the raw object table
#[derive(Debug, Clone, PartialEq)]
pub struct AreaSummary {
    pub clss: String,
    pub count: usize,
    pub min: i64,
    pub max: i64,
    pub mean: f64,
}

fn parse_coord(value: &str) -> Result<i64> {
    value
        .trim()
        .parse()
        .with_context(|| format!("Invalid bounding box coordinate: {:?}", value))
}

/// Calculates the pixel area of the bounding box at `idx`
fn calc_area(records: &BboxRecords, idx: usize) -> Result<i64> {
    let xmin = parse_coord(&records.xmin[idx])?;
    let ymin = parse_coord(&records.ymin[idx])?;
    let xmax = parse_coord(&records.xmax[idx])?;
    let ymax = parse_coord(&records.ymax[idx])?;
    Ok((xmax - xmin) * (ymax - ymin))
}

/// Counts each class across a list of annotation record sets.
///
/// Returns the per-class count table, sorted by class name so repeated runs
/// over the same input are identical, and the flattened raw table of
/// (class, area) rows the counts were derived from, in document order.
/// Prints a per-class summary to stdout while counting.
pub fn count_classes(bboxes: &[BboxRecords]) -> Result<(Vec<ClassCount>, Vec<ObjectRow>)> {
    let progress = ProgressBar::new(bboxes.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} files | {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );
    progress.set_message("counting classes");

    let mut objects = Vec::new();
    for records in bboxes {
        ensure!(
            records.is_consistent(),
            "Record set has mismatched tag sequences (file: {:?})",
            records.file.first()
        );
        for (idx, clss) in records.clss.iter().enumerate() {
            objects.push(ObjectRow {
                clss: clss.clone(),
                area: calc_area(records, idx)?,
            });
        }
        progress.inc(1);
    }
    progress.finish_and_clear();

    let classes: BTreeSet<&str> = objects.iter().map(|row| row.clss.as_str()).collect();

    println!("\nClass Count Summary:");
    let mut counts = Vec::with_capacity(classes.len());
    for clss in classes {
        let count = objects.iter().filter(|row| row.clss == clss).count();
        println!("Class: {} Count: {}", clss, count);
        counts.push(ClassCount {
            clss: clss.to_string(),
            count,
        });
    }

    Ok((counts, objects))
}

/// Summarizes bounding box areas per class: row count, min, max and mean.
/// Classes come back in the same sorted order as the count table.
pub fn class_area_summary(objects: &[ObjectRow]) -> Vec<AreaSummary> {
    let classes: BTreeSet<&str> = objects.iter().map(|row| row.clss.as_str()).collect();

    let mut summaries = Vec::with_capacity(classes.len());
    for clss in classes {
        let areas: Vec<i64> = objects
            .iter()
            .filter(|row| row.clss == clss)
            .map(|row| row.area)
            .collect();
        // every enumerated class has at least one row
        let count = areas.len();
        summaries.push(AreaSummary {
            clss: clss.to_string(),
            count,
            min: areas.iter().copied().min().unwrap_or(0),
            max: areas.iter().copied().max().unwrap_or(0),
            mean: areas.iter().sum::<i64>() as f64 / count as f64,
        });
    }
    summaries
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_set(file: &str, objects: &[(&str, i64, i64, i64, i64)]) -> BboxRecords {
        let mut records = BboxRecords::default();
        for (clss, xmin, ymin, xmax, ymax) in objects {
            records.clss.push(clss.to_string());
            records.xmin.push(xmin.to_string());
            records.ymin.push(ymin.to_string());
            records.xmax.push(xmax.to_string());
            records.ymax.push(ymax.to_string());
            records.file.push(file.to_string());
        }
        records
    }

    #[test]
    fn test_count_single_file_with_areas() {
        let bboxes = vec![record_set(
            "img001",
            &[("car", 10, 10, 50, 60), ("car", 0, 0, 20, 20)],
        )];

        let (counts, objects) = count_classes(&bboxes).expect("count classes");

        assert_eq!(counts.len(), 1);
        assert_eq!(counts[0].clss, "car");
        assert_eq!(counts[0].count, 2);

        // (50-10)*(60-10) = 2000, (20-0)*(20-0) = 400, in document order
        assert_eq!(objects.len(), 2);
        assert_eq!(objects[0].clss, "car");
        assert_eq!(objects[0].area, 2000);
        assert_eq!(objects[1].area, 400);
    }

    #[test]
    fn test_counts_across_files() {
        let bboxes = vec![
            record_set("img001", &[("car", 0, 0, 10, 10)]),
            record_set("img002", &[("pedestrian", 5, 5, 15, 25)]),
        ];

        let (counts, objects) = count_classes(&bboxes).expect("count classes");

        assert_eq!(counts.len(), 2);
        assert_eq!(counts[0].clss, "car");
        assert_eq!(counts[0].count, 1);
        assert_eq!(counts[1].clss, "pedestrian");
        assert_eq!(counts[1].count, 1);

        // sum of counts equals the number of raw rows
        let total: usize = counts.iter().map(|entry| entry.count).sum();
        assert_eq!(total, objects.len());
    }

    #[test]
    fn test_empty_input_yields_empty_tables() {
        let (counts, objects) = count_classes(&[]).expect("count classes");
        assert!(counts.is_empty());
        assert!(objects.is_empty());
    }

    #[test]
    fn test_degenerate_box_has_zero_area() {
        let bboxes = vec![record_set("img001", &[("car", 10, 10, 10, 60)])];
        let (_, objects) = count_classes(&bboxes).expect("count classes");
        assert_eq!(objects[0].area, 0);
    }

    #[test]
    fn test_classes_are_sorted_and_distinct() {
        let bboxes = vec![record_set(
            "img001",
            &[
                ("zebra", 0, 0, 1, 1),
                ("car", 0, 0, 1, 1),
                ("zebra", 0, 0, 2, 2),
            ],
        )];

        let (counts, _) = count_classes(&bboxes).expect("count classes");
        let names: Vec<&str> = counts.iter().map(|entry| entry.clss.as_str()).collect();
        assert_eq!(names, vec!["car", "zebra"]);
        assert_eq!(counts[1].count, 2);
    }

    #[test]
    fn test_aggregation_is_idempotent() {
        let bboxes = vec![
            record_set("img001", &[("car", 1, 2, 3, 4), ("bus", 0, 0, 5, 5)]),
            record_set("img002", &[("car", 2, 2, 8, 8)]),
        ];

        let first = count_classes(&bboxes).expect("count classes");
        let second = count_classes(&bboxes).expect("count classes");
        assert_eq!(first, second);
    }

    #[test]
    fn test_non_integer_coordinate_fails() {
        let mut records = record_set("img001", &[("car", 0, 0, 10, 10)]);
        records.xmax[0] = "ten".to_string();

        let err = count_classes(&[records]).unwrap_err();
        assert!(err.to_string().contains("Invalid bounding box coordinate"));
    }

    #[test]
    fn test_whitespace_around_coordinates_is_accepted() {
        let mut records = record_set("img001", &[("car", 0, 0, 10, 10)]);
        records.xmax[0] = " 10 ".to_string();

        let (_, objects) = count_classes(&[records]).expect("count classes");
        assert_eq!(objects[0].area, 100);
    }

    #[test]
    fn test_inconsistent_record_set_fails() {
        let mut records = record_set("img001", &[("car", 0, 0, 10, 10)]);
        records.ymax.pop();

        assert!(count_classes(&[records]).is_err());
    }

    #[test]
    fn test_area_summary_per_class() {
        let objects = vec![
            ObjectRow {
                clss: "car".to_string(),
                area: 2000,
            },
            ObjectRow {
                clss: "car".to_string(),
                area: 400,
            },
            ObjectRow {
                clss: "bus".to_string(),
                area: 900,
            },
        ];

        let summaries = class_area_summary(&objects);
        assert_eq!(summaries.len(), 2);

        assert_eq!(summaries[0].clss, "bus");
        assert_eq!(summaries[0].count, 1);
        assert_eq!(summaries[0].min, 900);
        assert_eq!(summaries[0].max, 900);
        assert!((summaries[0].mean - 900.0).abs() < f64::EPSILON);

        assert_eq!(summaries[1].clss, "car");
        assert_eq!(summaries[1].count, 2);
        assert_eq!(summaries[1].min, 400);
        assert_eq!(summaries[1].max, 2000);
        assert!((summaries[1].mean - 1200.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_area_summary_of_empty_table_is_empty() {
        assert!(class_area_summary(&[]).is_empty());
    }
}
