use argh::FromArgs;

/// Class count reporting over a bounding box annotation directory
#[derive(FromArgs, Debug)]
pub struct Args {
    /// directory containing the xml annotation files
    #[argh(option, default = "String::from(\"./Annotations/\")")]
    pub annot_path: String,

    /// directory the report files are written to
    #[argh(option, default = "String::from(\"./\")")]
    pub write_path: String,

    /// base name for the report files
    #[argh(option, default = "String::from(\"counts\")")]
    pub description: String,

    /// skip the bar chart and all report files
    #[argh(switch)]
    pub no_plot: bool,

    /// open the bar chart in an interactive view
    #[argh(switch)]
    pub show_plots: bool,

    /// do not save the bar chart html document
    #[argh(switch)]
    pub no_save: bool,

    /// do not write the count summary file
    #[argh(switch)]
    pub no_counts: bool,

    /// print per-class bounding box area statistics
    #[argh(switch)]
    pub area_summary: bool,
}
