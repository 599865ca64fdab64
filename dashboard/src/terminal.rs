//! Terminal front end: stdin dialogs and plain-text drawing of the view slots.

use crate::admin::{AdminListing, Interaction};
use crate::chart::{BarChart, ChartBoard, ChartSlot};
use crate::dashboard::Dashboard;
use crate::fetch::Scope;
use crate::map::{Marker, MarkerLayer};
use crate::view::{CameraDetails, ModelInfo, ModelPreview, NavEntry, SummaryCards};
use std::io::{self, BufRead, Write};
use tokio::runtime::{Handle, RuntimeFlavor};
use tracing::warn;

const BAR_WIDTH: usize = 40;

/// Dialogs on stdin/stderr
#[derive(Debug, Default)]
pub struct TerminalInteraction {
    assume_yes: bool,
}

impl TerminalInteraction {
    /// Answers every confirmation with yes without asking.
    pub fn assume_yes(assume_yes: bool) -> Self {
        Self { assume_yes }
    }

    fn read_answer(&self, question: &str) -> Option<String> {
        let read = || ask(&mut io::stdin().lock(), &mut io::stderr(), question);
        // block_in_place is only allowed on the multi-threaded runtime.
        match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(read)
            }
            _ => read(),
        }
    }
}

/// Writes the question, then reads one line. `None` on end of input or a read error.
fn ask(input: &mut impl BufRead, output: &mut impl Write, question: &str) -> Option<String> {
    if let Err(e) = write!(output, "{} ", question).and_then(|_| output.flush()) {
        warn!("Could not show question: {}", e);
    }

    let mut line = String::new();
    match input.read_line(&mut line) {
        Ok(0) => None,
        Ok(_) => Some(line.trim().to_string()),
        Err(e) => {
            warn!("Could not read answer: {}", e);
            None
        }
    }
}

impl Interaction for TerminalInteraction {
    fn confirm(&mut self, message: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        matches!(
            self.read_answer(&format!("{} [y/N]", message))
                .map(|a| a.to_ascii_lowercase())
                .as_deref(),
            Some("y") | Some("yes")
        )
    }

    fn prompt(&mut self, message: &str) -> Option<String> {
        self.read_answer(&format!("{}:", message))
    }

    fn alert(&mut self, message: &str) {
        eprintln!("! {}", message);
    }
}

pub fn render_page(dashboard: &Dashboard<MarkerLayer, ChartBoard>) -> String {
    let view = dashboard.view();
    let mut lines = Vec::new();

    match dashboard.scope() {
        Scope::Fleet => lines.push("== Camera fleet ==".to_string()),
        Scope::Model(name) => lines.push(format!("== Model {} ==", name)),
    }
    if let Some(at) = view.last_refresh {
        lines.push(format!("Updated {}", at.format("%Y-%m-%d %H:%M:%S")));
    }
    if let Some(summary) = &view.summary {
        lines.extend(summary_lines(summary));
    }
    if let Some(info) = &view.model_info {
        lines.extend(model_info_lines(info));
    }
    if !view.model_list.is_empty() {
        lines.push(String::new());
        lines.extend(nav_lines(&view.model_list));
    }

    lines.push(String::new());
    lines.extend(marker_lines(dashboard.map_surface().markers()));

    for slot in [ChartSlot::Storage, ChartSlot::Incidents] {
        if let Some(chart) = dashboard.chart_surface().chart(slot) {
            lines.push(String::new());
            lines.extend(chart_lines(chart));
        }
    }

    lines.join("\n")
}

fn summary_lines(summary: &SummaryCards) -> Vec<String> {
    vec![
        format!("Total cameras:   {}", summary.total_cameras),
        format!("Total storage:   {}", summary.total_storage),
        format!("Incidents:       {}", summary.incidents),
        format!("Active cameras:  {}", summary.active_cameras),
    ]
}

fn model_info_lines(info: &ModelInfo) -> Vec<String> {
    vec![
        format!("Installed:       {}", info.installed),
        format!("Total storage:   {}", info.total_storage),
        format!("Total incidents: {}", info.total_incidents),
    ]
}

fn nav_lines(entries: &[NavEntry]) -> Vec<String> {
    let mut lines = vec!["Models:".to_string()];
    lines.extend(entries.iter().map(|e| format!("  {} ({})", e.name, e.href)));
    lines
}

fn marker_lines(markers: &[Marker]) -> Vec<String> {
    let mut lines = vec![format!("Map ({} markers):", markers.len())];
    for marker in markers {
        lines.push(format!(
            "  [{}, {}] {} | {}",
            marker.position.x,
            marker.position.y,
            marker.title,
            marker.details.join(" | ")
        ));
    }
    lines
}

/// Horizontal bars scaled so the largest value spans the full width.
pub fn chart_lines(chart: &BarChart) -> Vec<String> {
    let mut lines = vec![format!("{} ({} / {})", chart.title, chart.x_title, chart.y_title)];
    let max = chart.values.iter().copied().fold(0.0_f64, f64::max);
    let label_width = chart.categories.iter().map(|c| c.len()).max().unwrap_or(0);

    for (category, value) in chart.bars() {
        let width = if max > 0.0 {
            ((value / max) * BAR_WIDTH as f64).round() as usize
        } else {
            0
        };
        lines.push(format!(
            "  {:<label_width$} {} {}",
            category,
            "#".repeat(width),
            value,
            label_width = label_width
        ));
    }
    lines
}

pub fn render_details(details: &CameraDetails) -> String {
    details
        .rows
        .iter()
        .map(|(label, value)| format!("{:<18} {}", format!("{}:", label), value))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_preview(preview: &ModelPreview) -> String {
    let mut lines = vec![format!("{}: {}", preview.name, preview.description)];
    if let Some(url) = &preview.image_url {
        lines.push(format!("Image: {}", url));
    }
    lines.join("\n")
}

pub fn render_listing(listing: &AdminListing) -> String {
    let mut lines = vec!["Models:".to_string()];
    for model in &listing.models {
        lines.push(format!(
            "  #{} {} - {}",
            model.id,
            model.name,
            model.description.as_deref().unwrap_or("")
        ));
    }
    lines.push("Cameras:".to_string());
    for camera in &listing.cameras {
        lines.push(format!(
            "  #{} {} - Serial: {}",
            camera.id, camera.model, camera.serial_number
        ));
    }
    lines.join("\n")
}
