//! Reporting utilities over a bounding box annotation directory: parse
//! Pascal VOC style XML annotation files, tally per-class object counts and
//! areas, and render a bar chart plus a delimited count summary.

pub mod annotation;
pub mod counter;
pub mod report;
pub mod text_writer;
