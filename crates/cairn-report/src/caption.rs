//! Caption text and linked-image layout.

use cairn_anno::{AnnotationKind, Category};
use serde::{Deserialize, Serialize};

/// A numbered caption accompanying one marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caption {
    /// Marker number shared with the screenshots.
    pub number: u32,
    /// Heading, like "Point Note 3".
    pub title: String,
    /// Full category name.
    pub category: String,
    /// Free-text body of the note.
    pub body: String,
}

/// Builds the caption for one note, using the same number its marker
/// carries in every viewpoint.
pub fn caption_for(kind: AnnotationKind, number: u32, category: Category, body: &str) -> Caption {
    Caption {
        number,
        title: format!("{} {}", kind.caption_prefix(), number),
        category: category.full_name().to_string(),
        body: body.to_string(),
    }
}

/// How a linked illustration is scaled on the report page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "fit", rename_all = "snake_case")]
pub enum ImageLayout {
    /// Panoramic image, laid out wide.
    Wide {
        /// Page width in points.
        width: u32,
    },
    /// Ordinary aspect, laid out at column width.
    Standard {
        /// Page width in points.
        width: u32,
    },
    /// Tall image, constrained by height instead.
    Tall {
        /// Page height in points.
        height: u32,
    },
}

/// Picks a layout bucket from an illustration's pixel dimensions.
///
/// Aspect ratio at least 3 reads as a panorama, below 0.5 as a tall
/// strip, anything between as an ordinary picture.
pub fn linked_image_layout(width: u32, height: u32) -> ImageLayout {
    if height == 0 {
        return ImageLayout::Wide { width: 300 };
    }
    let aspect = width as f64 / height as f64;
    if aspect >= 3.0 {
        ImageLayout::Wide { width: 300 }
    } else if aspect >= 0.5 {
        ImageLayout::Standard { width: 150 }
    } else {
        ImageLayout::Tall { height: 250 }
    }
}
