//! Output rendering and formatting

use console::Style;
use snapfind_ops::{DownloadReport, OperationResult, SelectionReport};
use snapfind_types::format_rate;
use std::io::{self, Write};
use std::time::Duration;

/// Output renderer for CLI results
#[derive(Clone)]
pub struct OutputRenderer {
    /// Use JSON output format
    json_output: bool,
    colors_enabled: bool,
}

impl OutputRenderer {
    /// Create new output renderer
    pub fn new(json_output: bool, colors_enabled: bool) -> Self {
        Self {
            json_output,
            colors_enabled,
        }
    }

    /// Render operation result to stdout
    pub fn render_result(&self, result: &OperationResult) -> io::Result<()> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        self.render_to(&mut out, result)
    }

    /// Render operation result to any writer
    pub fn render_to<W: Write>(&self, out: &mut W, result: &OperationResult) -> io::Result<()> {
        if self.json_output {
            let json = result.to_json().map_err(io::Error::other)?;
            return writeln!(out, "{json}");
        }
        match result {
            OperationResult::Selection(report) => self.render_selection(out, report),
            OperationResult::Download(report) => self.render_download(out, report),
        }
    }

    fn render_selection<W: Write>(&self, out: &mut W, report: &SelectionReport) -> io::Result<()> {
        let label = self.style(Style::new().bold());
        writeln!(out)?;
        writeln!(out, "{} {}", label.apply_to("Snapshot:"), report.provider)?;
        writeln!(out, "{} {}", label.apply_to("URL:"), report.url)?;
        writeln!(out, "{} {}", label.apply_to("Speed:"), format_rate(report.rate))?;
        if let Some(eta) = report.estimated_time {
            writeln!(
                out,
                "{} {}",
                label.apply_to("Estimated time:"),
                format_duration(eta)
            )?;
        }
        Ok(())
    }

    fn render_download<W: Write>(&self, out: &mut W, report: &DownloadReport) -> io::Result<()> {
        let success = self.style(Style::new().green().bold());
        writeln!(out)?;
        writeln!(out, "{}", success.apply_to("✓ Download completed!"))?;
        writeln!(out, "Snapshot saved to: {}", report.path.display())?;
        writeln!(out, "Size: {:.2} GB", report.size_gb())?;
        Ok(())
    }

    fn style(&self, style: Style) -> Style {
        if self.colors_enabled {
            style.force_styling(true)
        } else {
            Style::new().force_styling(false)
        }
    }
}

/// `1h 02m 03s`, `4m 05s`, `6s`
fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    let (hours, minutes, seconds) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    if hours > 0 {
        format!("{hours}h {minutes:02}m {seconds:02}s")
    } else if minutes > 0 {
        format!("{minutes}m {seconds:02}s")
    } else {
        format!("{seconds}s")
    }
}
