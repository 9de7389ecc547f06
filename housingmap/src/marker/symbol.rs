//! Marker symbol description.

use serde::Serialize;

use crate::records::Rgb;

/// Shape drawn for a marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolStyle {
    Circle,
    Square,
}

/// Marker outline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Outline {
    pub color: Rgb,
    pub width: f64,
}

/// Visual appearance of a marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Symbol {
    pub style: SymbolStyle,
    pub color: Rgb,
    /// Size in points (diameter for circles, side for squares).
    pub size: f64,
    pub outline: Outline,
    /// Optional text drawn with the marker.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Fill color of housing markers.
pub const HOUSING_COLOR: Rgb = Rgb(251, 52, 153);

/// Size of housing markers.
pub const HOUSING_SIZE: f64 = 15.0;

/// Outline width shared by every marker.
pub const OUTLINE_WIDTH: f64 = 1.0;

impl Symbol {
    /// The fixed square used for housing listings.
    pub fn housing() -> Self {
        Self {
            style: SymbolStyle::Square,
            color: HOUSING_COLOR,
            size: HOUSING_SIZE,
            outline: Outline {
                color: Rgb::BLACK,
                width: OUTLINE_WIDTH,
            },
            label: None,
        }
    }

    /// A circle whose outline matches its fill, labelled with `label`.
    pub fn energy(color: Rgb, radius: f64, label: impl Into<String>) -> Self {
        Self {
            style: SymbolStyle::Circle,
            color,
            size: radius,
            outline: Outline {
                color,
                width: OUTLINE_WIDTH,
            },
            label: Some(label.into()),
        }
    }
}
