use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

/// Per-object fields extracted from one annotation file, kept as parallel
/// sequences in document order of the object tags.
///
/// Coordinate fields stay raw text; integer conversion happens during
/// aggregation so a bad value is reported together with the row that owns it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BboxRecords {
    pub clss: Vec<String>,
    pub xmin: Vec<String>,
    pub ymin: Vec<String>,
    pub xmax: Vec<String>,
    pub ymax: Vec<String>,
    pub file: Vec<String>,
}

impl BboxRecords {
    /// Number of labeled objects in this record set
    pub fn len(&self) -> usize {
        self.clss.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clss.is_empty()
    }

    /// Checks that the five tag sequences line up one entry per object
    pub fn is_consistent(&self) -> bool {
        let n = self.clss.len();
        self.xmin.len() == n
            && self.ymin.len() == n
            && self.xmax.len() == n
            && self.ymax.len() == n
            && self.file.len() == n
    }
}

/// Parses the annotation file `file` inside `annot_path` and returns the
/// bounding box records for every labeled object in it.
///
/// The five tag kinds (`name`, `xmin`, `ymin`, `xmax`, `ymax`) are collected
/// independently in document order. A document where the tag multiplicities
/// do not match is rejected here rather than silently misaligning boxes
/// during aggregation.
pub fn parse_annotation(file: &str, annot_path: &Path) -> Result<BboxRecords> {
    let path = annot_path.join(file);
    let xml = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read annotation file: {}", path.display()))?;

    // source file identifier: the annotation file name without extension
    let stem = Path::new(file)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.to_string());

    let mut records = BboxRecords::default();
    let mut reader = Reader::from_str(&xml);

    loop {
        let event = reader
            .read_event()
            .with_context(|| format!("Malformed annotation document: {}", path.display()))?;
        match event {
            Event::Start(tag) => match tag.name().as_ref() {
                b"name" => {
                    records.clss.push(read_tag_text(&mut reader, &tag, &path)?);
                    records.file.push(stem.clone());
                }
                b"xmin" => records.xmin.push(read_tag_text(&mut reader, &tag, &path)?),
                b"ymin" => records.ymin.push(read_tag_text(&mut reader, &tag, &path)?),
                b"xmax" => records.xmax.push(read_tag_text(&mut reader, &tag, &path)?),
                b"ymax" => records.ymax.push(read_tag_text(&mut reader, &tag, &path)?),
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    if !records.is_consistent() {
        bail!(
            "Annotation tag counts do not match in {}: name={} xmin={} ymin={} xmax={} ymax={}",
            path.display(),
            records.clss.len(),
            records.xmin.len(),
            records.ymin.len(),
            records.xmax.len(),
            records.ymax.len()
        );
    }

    Ok(records)
}

/// Reads the text content of the element opened by `tag`
fn read_tag_text<'i>(
    reader: &mut Reader<&'i [u8]>,
    tag: &BytesStart<'i>,
    path: &Path,
) -> Result<String> {
    let text = reader
        .read_text(tag.name())
        .with_context(|| format!("Malformed annotation document: {}", path.display()))?;
    Ok(text.into_owned())
}
