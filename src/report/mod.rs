//! Spreadsheet and image output for classification results.

mod color;
pub mod plot;
pub mod workbook;

pub use color::generate_palette;
pub use plot::{
    log2_ratio, neg_log2_pvalue, plot_metabolite, plot_volcano, sanitize_file_name, write_plots,
    PVALUE_FLOOR, RATIO_FLOOR,
};
pub use workbook::{workbook_path, write_workbook};
