use crate::metrics::MARKERS;
use crate::model::{Camera, CameraId, Location};
use crate::view::format_storage;
use tracing::debug;

/// Map pin for one camera with its popup content
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub camera_id: CameraId,
    pub position: Location,
    pub title: String,
    pub details: Vec<String>,
}

/// Anything that can hold map markers
pub trait MapSurface {
    fn clear_markers(&mut self);
    fn add_marker(&mut self, marker: Marker);
}

/// In-memory marker layer
#[derive(Debug, Default)]
pub struct MarkerLayer {
    markers: Vec<Marker>,
}

impl MarkerLayer {
    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }
}

impl MapSurface for MarkerLayer {
    fn clear_markers(&mut self) {
        self.markers.clear();
    }

    fn add_marker(&mut self, marker: Marker) {
        self.markers.push(marker);
    }
}

/// Popup content variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupLayout {
    /// Fleet map: model, serial, status, storage
    Overview,
    /// Single-model floor map: serial, installation, status, storage, incidents
    Detail,
}

impl PopupLayout {
    pub fn marker(self, camera: &Camera) -> Marker {
        let (title, details) = match self {
            PopupLayout::Overview => (
                camera.model.clone(),
                vec![
                    format!("Serial: {}", camera.serial_number),
                    format!("Status: {}", camera.status),
                    format!("Storage: {}", format_storage(camera.image_storage_gb)),
                ],
            ),
            PopupLayout::Detail => (
                format!("Serial: {}", camera.serial_number),
                vec![
                    format!("Installed: {}", camera.installation_date.format("%Y-%m-%d")),
                    format!("Status: {}", camera.status),
                    format!("Storage: {}", format_storage(camera.image_storage_gb)),
                    format!("Incidents: {}", camera.incidents_captured),
                ],
            ),
        };

        Marker {
            camera_id: camera.id,
            position: camera.location,
            title,
            details,
        }
    }
}

/// Keeps a map surface in step with the latest camera snapshot.
///
/// Every render drops all markers and rebuilds them; nothing is patched.
pub struct MapRenderer<S> {
    surface: S,
    layout: PopupLayout,
}

impl<S: MapSurface> MapRenderer<S> {
    pub fn new(surface: S, layout: PopupLayout) -> Self {
        Self { surface, layout }
    }

    pub fn render(&mut self, cameras: &[Camera]) -> usize {
        self.surface.clear_markers();
        for camera in cameras {
            self.surface.add_marker(self.layout.marker(camera));
        }

        debug!("Placed {} markers", cameras.len());
        MARKERS.set(cameras.len() as f64);
        cameras.len()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }
}
