use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum UtensilCategory {
    Cookware,
    Bakeware,
    Knives,
    Utensils,
    Appliances,
    Measuring,
    #[serde(rename = "Prep Tools")]
    PrepTools,
    Storage,
    #[default]
    #[serde(other)]
    Other,
}

impl UtensilCategory {
    pub const ALL: [UtensilCategory; 9] = [
        Self::Cookware,
        Self::Bakeware,
        Self::Knives,
        Self::Utensils,
        Self::Appliances,
        Self::Measuring,
        Self::PrepTools,
        Self::Storage,
        Self::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cookware => "Cookware",
            Self::Bakeware => "Bakeware",
            Self::Knives => "Knives",
            Self::Utensils => "Utensils",
            Self::Appliances => "Appliances",
            Self::Measuring => "Measuring",
            Self::PrepTools => "Prep Tools",
            Self::Storage => "Storage",
            Self::Other => "Other",
        }
    }

    /// Quick-add suggestions offered for each category.
    pub fn common_items(self) -> &'static [&'static str] {
        match self {
            Self::Cookware => &[
                "Frying Pan",
                "Saucepan",
                "Stock Pot",
                "Cast Iron Skillet",
                "Wok",
                "Dutch Oven",
            ],
            Self::Bakeware => &[
                "Baking Sheet",
                "Cake Pan",
                "Muffin Tin",
                "Loaf Pan",
                "Pie Dish",
                "Casserole Dish",
            ],
            Self::Knives => &[
                "Chef's Knife",
                "Paring Knife",
                "Bread Knife",
                "Utility Knife",
                "Carving Knife",
            ],
            Self::Utensils => &[
                "Wooden Spoon",
                "Spatula",
                "Whisk",
                "Ladle",
                "Tongs",
                "Slotted Spoon",
                "Peeler",
            ],
            Self::Appliances => &[
                "Blender",
                "Food Processor",
                "Stand Mixer",
                "Hand Mixer",
                "Toaster",
                "Microwave",
            ],
            Self::Measuring => &[
                "Measuring Cups",
                "Measuring Spoons",
                "Kitchen Scale",
                "Liquid Measuring Cup",
            ],
            Self::PrepTools => &[
                "Cutting Board",
                "Colander",
                "Mixing Bowls",
                "Grater",
                "Can Opener",
                "Garlic Press",
            ],
            Self::Storage => &[
                "Glass Containers",
                "Plastic Containers",
                "Mason Jars",
                "Zip-Lock Bags",
            ],
            Self::Other => &[],
        }
    }
}

impl fmt::Display for UtensilCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UtensilCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace(['-', '_'], " ");
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().to_lowercase() == wanted)
            .ok_or_else(|| format!("Unknown utensil category: {s}"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Utensil {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub category: UtensilCategory,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq, Eq)]
pub struct NewUtensil {
    #[validate(length(min = 1, max = 200, message = "Please enter a utensil name"))]
    pub name: String,
    pub category: UtensilCategory,
}

impl NewUtensil {
    pub fn new(name: &str, category: UtensilCategory) -> Self {
        Self {
            name: name.trim().to_string(),
            category,
        }
    }
}
