//! Console output.
//!
//! Human-readable scan header and result table, styled with `console`.
//! Styling is dropped automatically when stdout is not a terminal.

use crate::scanner::{ScanConfig, ScanReport};
use crate::types::ScanTarget;
use console::style;
use std::io::{self, Write};

const RULE_WIDTH: usize = 70;

/// Print the banner shown before scanning starts.
pub fn print_scan_header(target: &ScanTarget, config: &ScanConfig) {
    println!();
    println!(
        "{} {} v{}",
        style("Starting").cyan(),
        style("portsweep").cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!(
        "{} Target: {} ({})",
        style("•").dim(),
        style(&target.hostname).white().bold(),
        target.ip
    );
    println!("{} Port range: {}", style("•").dim(), config.range);
    println!("{} Threads: {}", style("•").dim(), config.threads);
    println!(
        "{} Timeout: {:.1} seconds",
        style("•").dim(),
        config.timeout.as_secs_f64()
    );
    println!();
}

/// Print the result table to stdout.
pub fn print_results(report: &ScanReport) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_results(&mut out, report)
}

/// Write the result table: summary, then one `PORT SERVICE` row per open port.
pub fn write_results<W: Write>(out: &mut W, report: &ScanReport) -> io::Result<()> {
    let rule = "=".repeat(RULE_WIDTH);

    writeln!(out)?;
    writeln!(out, "{}", style(&rule).cyan())?;
    writeln!(
        out,
        "Scan Results for {}",
        style(&report.target.hostname).bold()
    )?;
    writeln!(out, "Scan duration: {:.2} seconds", report.duration_secs())?;
    writeln!(out, "{}", style(&rule).cyan())?;
    writeln!(out)?;

    if report.open_ports.is_empty() {
        writeln!(out, "{}", style("No open ports found").dim())?;
    } else {
        writeln!(
            out,
            "Found {} open ports:",
            style(report.open_ports.len()).green().bold()
        )?;
        writeln!(out)?;
        writeln!(out, "{:<10}{:<20}", "PORT", "SERVICE")?;
        writeln!(out, "{}", "-".repeat(30))?;
        for outcome in &report.open_ports {
            writeln!(out, "{:<10}{:<20}", outcome.port, outcome.service)?;
        }
    }
    writeln!(out)?;

    Ok(())
}

/// Print the notice for a scan stopped by the user, with any open ports
/// found before the stop.
pub fn print_interrupted(report: &ScanReport) {
    eprintln!();
    print_warning("Scan interrupted by user");
    if !report.open_ports.is_empty() {
        let ports: Vec<String> = report
            .open_ports
            .iter()
            .map(|o| format!("{}/{}", o.port, o.service))
            .collect();
        print_info(&format!(
            "{} of {} ports probed, open so far: {}",
            report.probed,
            report.range.len(),
            ports.join(", ")
        ));
    }
}

/// Print an error message.
pub fn print_error(msg: &str) {
    eprintln!("{} {}", style("Error:").red().bold(), msg);
}

/// Print a warning message.
pub fn print_warning(msg: &str) {
    eprintln!("{} {}", style("Warning:").yellow().bold(), msg);
}

/// Print an info message.
pub fn print_info(msg: &str) {
    eprintln!("{} {}", style("ℹ").blue().bold(), msg);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::{ProbeOutcome, ScanPhase};
    use crate::types::{Port, PortRange};
    use std::net::{IpAddr, Ipv4Addr};
    use std::time::Duration;

    fn report(open: &[u16]) -> ScanReport {
        ScanReport {
            target: ScanTarget::new("localhost", IpAddr::V4(Ipv4Addr::LOCALHOST)),
            range: PortRange::new(1, 1024).unwrap(),
            open_ports: open
                .iter()
                .map(|&p| ProbeOutcome::new(Port::new(p).unwrap(), true))
                .collect(),
            duration: Duration::from_millis(1500),
            phase: ScanPhase::Completed,
            workers: 100,
            probed: 1024,
        }
    }

    fn render(report: &ScanReport) -> String {
        let mut buf = Vec::new();
        write_results(&mut buf, report).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_table_lists_open_ports() {
        let text = render(&report(&[22, 80, 8080]));
        assert!(text.contains("Scan duration: 1.50 seconds"));
        assert!(text.contains("PORT      SERVICE"));
        assert!(text.contains("22        ssh"));
        assert!(text.contains("80        http"));
        assert!(text.contains("8080      http-alt"));
        assert!(!text.contains("No open ports found"));
    }

    #[test]
    fn test_table_without_open_ports() {
        let text = render(&report(&[]));
        assert!(text.contains("No open ports found"));
        assert!(!text.contains("PORT"));
    }
}
