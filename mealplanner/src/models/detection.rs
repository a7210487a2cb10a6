use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DetectedItem {
    pub name: String,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub yolo_class: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Detection {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub detected_items: Vec<DetectedItem>,
}

impl Detection {
    /// Distinct item names, highest confidence first.
    pub fn item_names(&self) -> Vec<String> {
        let mut items: Vec<&DetectedItem> = self.detected_items.iter().collect();
        items.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
        let mut names: Vec<String> = Vec::with_capacity(items.len());
        for item in items {
            if !names.iter().any(|n| n.eq_ignore_ascii_case(&item.name)) {
                names.push(item.name.clone());
            }
        }
        names
    }
}
