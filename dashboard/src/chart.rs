use crate::aggregate::ModelGroup;
use crate::model::Camera;
use tracing::debug;

/// Chart position on the page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartSlot {
    Storage,
    Incidents,
}

/// Single categorical bar series with its axis labels
#[derive(Debug, Clone, PartialEq)]
pub struct BarChart {
    pub title: String,
    pub series: String,
    pub x_title: String,
    pub y_title: String,
    pub categories: Vec<String>,
    pub values: Vec<f64>,
}

impl BarChart {
    pub fn bars(&self) -> impl Iterator<Item = (&str, f64)> {
        self.categories
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }
}

/// Anything that can draw a bar chart into a slot, replacing what was there
pub trait ChartSurface {
    fn plot(&mut self, slot: ChartSlot, chart: BarChart);
}

/// In-memory chart holder
#[derive(Debug, Default)]
pub struct ChartBoard {
    storage: Option<BarChart>,
    incidents: Option<BarChart>,
}

impl ChartBoard {
    pub fn chart(&self, slot: ChartSlot) -> Option<&BarChart> {
        match slot {
            ChartSlot::Storage => self.storage.as_ref(),
            ChartSlot::Incidents => self.incidents.as_ref(),
        }
    }
}

impl ChartSurface for ChartBoard {
    fn plot(&mut self, slot: ChartSlot, chart: BarChart) {
        match slot {
            ChartSlot::Storage => self.storage = Some(chart),
            ChartSlot::Incidents => self.incidents = Some(chart),
        }
    }
}

pub struct ChartRenderer<S> {
    surface: S,
}

impl<S: ChartSurface> ChartRenderer<S> {
    pub fn new(surface: S) -> Self {
        Self { surface }
    }

    /// Overview charts, one bar per model in aggregation order.
    pub fn render_by_model(&mut self, groups: &[ModelGroup]) {
        let categories: Vec<String> = groups.iter().map(|g| g.model.clone()).collect();

        self.surface.plot(
            ChartSlot::Storage,
            BarChart {
                title: "Storage by Model".to_string(),
                series: "Total storage (GB)".to_string(),
                x_title: "Model".to_string(),
                y_title: "Storage (GB)".to_string(),
                categories: categories.clone(),
                values: groups.iter().map(|g| g.storage_gb).collect(),
            },
        );
        self.surface.plot(
            ChartSlot::Incidents,
            BarChart {
                title: "Incidents by Model".to_string(),
                series: "Total incidents".to_string(),
                x_title: "Model".to_string(),
                y_title: "Total incidents".to_string(),
                categories,
                values: groups.iter().map(|g| g.incidents as f64).collect(),
            },
        );
        debug!("Plotted {} model groups", groups.len());
    }

    /// Detail charts, one bar per camera keyed by serial number in fetch order.
    pub fn render_by_camera(&mut self, cameras: &[Camera]) {
        let categories: Vec<String> = cameras.iter().map(|c| c.serial_number.clone()).collect();

        self.surface.plot(
            ChartSlot::Incidents,
            BarChart {
                title: "Incidents by Camera".to_string(),
                series: "Incidents".to_string(),
                x_title: "Serial number".to_string(),
                y_title: "Incidents".to_string(),
                categories: categories.clone(),
                values: cameras.iter().map(|c| c.incidents_captured as f64).collect(),
            },
        );
        self.surface.plot(
            ChartSlot::Storage,
            BarChart {
                title: "Storage by Camera".to_string(),
                series: "Storage".to_string(),
                x_title: "Serial number".to_string(),
                y_title: "Storage (GB)".to_string(),
                categories,
                values: cameras.iter().map(|c| c.image_storage_gb).collect(),
            },
        );
        debug!("Plotted {} cameras", cameras.len());
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }
}
