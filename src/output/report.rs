//! Flat-text report file.

use crate::scanner::ScanReport;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Write `report` in the plain report layout.
pub fn write_report<W: Write>(out: &mut W, report: &ScanReport) -> io::Result<()> {
    writeln!(
        out,
        "Scan Results for {} ({})",
        report.target.hostname, report.target.ip
    )?;
    writeln!(out, "Duration: {:.2} seconds", report.duration_secs())?;
    writeln!(out)?;

    if report.open_ports.is_empty() {
        writeln!(out, "No open ports found")?;
    } else {
        writeln!(out, "Open ports:")?;
        for outcome in &report.open_ports {
            writeln!(out, "Port {}: {}", outcome.port, outcome.service)?;
        }
    }

    Ok(())
}

/// Create (or truncate) `path` and write the report into it.
pub fn save_report(path: &Path, report: &ScanReport) -> io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    write_report(&mut out, report)?;
    out.flush()
}
