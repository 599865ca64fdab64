use crate::model::Camera;
use std::collections::HashMap;

/// Fleet-wide figures for the summary cards
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Totals {
    pub cameras: usize,
    pub storage_gb: f64,
    pub incidents: u64,
    pub active: usize,
}

/// Per-model accumulator
#[derive(Debug, Clone, PartialEq)]
pub struct ModelGroup {
    pub model: String,
    pub cameras: usize,
    pub storage_gb: f64,
    pub incidents: u64,
}

impl ModelGroup {
    fn new(model: &str) -> Self {
        Self {
            model: model.to_string(),
            cameras: 0,
            storage_gb: 0.0,
            incidents: 0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregate {
    pub totals: Totals,
    /// Groups in the order their model was first seen
    pub groups: Vec<ModelGroup>,
}

pub fn aggregate(cameras: &[Camera]) -> Aggregate {
    let mut totals = Totals::default();
    let mut groups: Vec<ModelGroup> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for camera in cameras {
        totals.cameras += 1;
        totals.storage_gb += camera.image_storage_gb;
        totals.incidents += camera.incidents_captured;
        if camera.status.is_active() {
            totals.active += 1;
        }

        let slot = *index.entry(camera.model.as_str()).or_insert_with(|| {
            groups.push(ModelGroup::new(&camera.model));
            groups.len() - 1
        });
        let group = &mut groups[slot];
        group.cameras += 1;
        group.storage_gb += camera.image_storage_gb;
        group.incidents += camera.incidents_captured;
    }

    Aggregate { totals, groups }
}
