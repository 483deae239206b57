use crate::domain::model::{MockupPayload, Placement, PlacementSpec, Position};
use serde::{Deserialize, Serialize};

pub const DEFAULT_VARIANT_IDS: [u64; 6] = [4012, 4013, 4014, 4017, 4018, 4019];
pub const DEFAULT_FORMAT: &str = "jpg";
pub const SUPPORTED_FORMATS: [&str; 2] = ["jpg", "png"];

/// Print area shared by every placement.
pub const PRINT_POSITION: Position = Position {
    area_width: 1800,
    area_height: 2400,
    width: 1800,
    height: 1800,
    top: 300,
    left: 0,
};

pub const PLACEMENTS: [Placement; 2] = [Placement::Front, Placement::Back];

/// Fixed part of every create-task payload.
///
/// The variant list is global: it is not looked up per product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MockupTemplate {
    pub variant_ids: Vec<u64>,
    pub format: String,
}

impl Default for MockupTemplate {
    fn default() -> Self {
        Self {
            variant_ids: DEFAULT_VARIANT_IDS.to_vec(),
            format: DEFAULT_FORMAT.to_string(),
        }
    }
}

impl MockupTemplate {
    pub fn build_payload(&self, image_url: &str) -> MockupPayload {
        let files = PLACEMENTS
            .iter()
            .map(|&placement| PlacementSpec {
                placement,
                image_url: image_url.to_string(),
                position: PRINT_POSITION,
            })
            .collect();

        MockupPayload {
            variant_ids: self.variant_ids.clone(),
            format: self.format.clone(),
            files,
        }
    }
}
