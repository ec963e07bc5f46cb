//! Output formatting module.
//!
//! Console table for interactive use and a flat-text report file.

mod plain;
mod report;

pub use plain::{
    print_error, print_info, print_interrupted, print_results, print_scan_header, print_warning,
    write_results,
};
pub use report::{save_report, write_report};
