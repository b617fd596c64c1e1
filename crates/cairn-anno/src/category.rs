//! The fixed category palette.
//!
//! Categories serve two purposes: grouping in the generated document and
//! user-selected filtering of which notes participate in a report. The
//! palette is fixed; authoring tools tag notes with a color keyword that
//! maps onto it.

use serde::{Deserialize, Serialize};

/// A note category from the fixed palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Object / Work.
    ObjectWork,
    /// Physical Dimensions / Measurements.
    Measurements,
    /// Creation.
    Creation,
    /// Materials and Techniques.
    Materials,
    /// Stylistic Analysis and Descriptions.
    StylisticAnalysis,
    /// Condition and Conservation.
    Conservation,
    /// Analyses.
    Analyses,
    /// Related Works.
    RelatedWorks,
    /// Exhibition / Loans and Legal Issues.
    Administration,
    /// Image/Audio Documentation.
    Documentation,
    /// Other.
    Other,
}

impl Category {
    /// All categories in palette order.
    pub const ALL: [Category; 11] = [
        Category::ObjectWork,
        Category::Measurements,
        Category::Creation,
        Category::Materials,
        Category::StylisticAnalysis,
        Category::Conservation,
        Category::Analyses,
        Category::RelatedWorks,
        Category::Administration,
        Category::Documentation,
        Category::Other,
    ];

    /// Full display name used in captions and note blocks.
    pub fn full_name(&self) -> &'static str {
        match self {
            Category::ObjectWork => "Object / Work",
            Category::Measurements => "Physical Dimensions / Measurements",
            Category::Creation => "Creation",
            Category::Materials => "Materials and Techniques",
            Category::StylisticAnalysis => "Stylistic Analysis and Descriptions",
            Category::Conservation => "Condition and Conservation",
            Category::Analyses => "Analyses",
            Category::RelatedWorks => "Related Works",
            Category::Administration => "Exhibition / Loans and Legal Issues",
            Category::Documentation => "Image/Audio Documentation",
            Category::Other => "Other",
        }
    }

    /// Map an authoring-tool color keyword onto the palette.
    ///
    /// Unrecognized keywords fall back to [`Category::Other`], matching the
    /// authoring layer's behavior.
    pub fn from_color_tag(tag: &str) -> Category {
        match tag {
            "MAROON" => Category::ObjectWork,
            "RED" => Category::Measurements,
            "ORANGE" => Category::Creation,
            "YELLOW" => Category::Materials,
            "LIME" => Category::StylisticAnalysis,
            "GREEN" => Category::Conservation,
            "AQUA" => Category::Analyses,
            "BLUE" => Category::RelatedWorks,
            "PINK" => Category::Administration,
            "PURPLE" => Category::Documentation,
            _ => Category::Other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_tags_cover_palette() {
        assert_eq!(Category::from_color_tag("MAROON"), Category::ObjectWork);
        assert_eq!(Category::from_color_tag("GREEN"), Category::Conservation);
        assert_eq!(Category::from_color_tag("WHITE"), Category::Other);
        assert_eq!(Category::from_color_tag("bogus"), Category::Other);
    }

    #[test]
    fn test_full_names_unique() {
        let mut names: Vec<&str> = Category::ALL.iter().map(|c| c.full_name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), Category::ALL.len());
    }
}
