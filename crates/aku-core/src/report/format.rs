//! ReportFormat trait definition

use crate::search::SearchReport;

/// Trait for report renderers
///
/// Provides a common interface for the different output formats (text, JSON)
pub trait ReportFormat {
    /// Render the result of a single search
    fn render(&self, report: &SearchReport) -> String;

    /// Render the results of several searches run against the same ROMs
    fn render_all(&self, reports: &[SearchReport]) -> String {
        let mut output = String::new();
        for report in reports {
            output.push_str(&self.render(report));
            output.push('\n');
        }
        output
    }
}
