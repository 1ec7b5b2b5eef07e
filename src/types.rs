use serde::{Deserialize, Deserializer, Serialize};

/// Tolerance used for every dimensional comparison in the engine.
pub const EPSILON: f64 = 1e-9;

/// Suffix appended to the name of a part assembled from several glued pieces.
pub const GLUE_LAYER_SUFFIX: &str = " (Glue Layer)";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub thickness: f64,
    pub width: f64,
    pub length: f64,
}

impl Dimensions {
    pub fn new(thickness: f64, width: f64, length: f64) -> Self {
        Self {
            thickness,
            width,
            length,
        }
    }

    pub fn volume(&self) -> f64 {
        self.thickness * self.width * self.length
    }

    pub fn cross_section_area(&self) -> f64 {
        self.thickness * self.width
    }

    pub fn axis(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Thickness => self.thickness,
            Axis::Width => self.width,
        }
    }

    /// All three dimensions are finite and strictly positive.
    pub fn is_valid(&self) -> bool {
        [self.thickness, self.width, self.length]
            .iter()
            .all(|d| d.is_finite() && *d > 0.0)
    }
}

impl std::fmt::Display for Dimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} x {} x {}", self.thickness, self.width, self.length)
    }
}

/// Cross-section axis along which strips may be glued. Length never laminates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Thickness,
    Width,
}

impl Axis {
    pub const ALL: [Axis; 2] = [Axis::Thickness, Axis::Width];
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Axis::Thickness => write!(f, "thickness"),
            Axis::Width => write!(f, "width"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Unit {
    #[default]
    #[serde(rename = "mm", alias = "metric")]
    Mm,
    #[serde(rename = "inch", alias = "imperial")]
    Inch,
}

impl Unit {
    pub fn symbol(&self) -> &'static str {
        match self {
            Unit::Mm => "mm",
            Unit::Inch => "in",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Unit::Mm => "millimeters",
            Unit::Inch => "inches",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinishedPart {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(deserialize_with = "deserialize_u32_from_number")]
    pub quantity: u32,
    #[serde(flatten)]
    pub dimensions: Dimensions,
}

impl FinishedPart {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        quantity: u32,
        dimensions: Dimensions,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            quantity,
            dimensions,
        }
    }
}

/// A purchasable board type from the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawStock {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub dimensions: Dimensions,
}

impl RawStock {
    pub fn new(id: impl Into<String>, name: impl Into<String>, dimensions: Dimensions) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            dimensions,
        }
    }
}

/// Machining parameters applied to every part/board pair of a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub thickness_allowance: f64,
    pub width_allowance: f64,
    pub kerf: f64,
    pub unit: Unit,
}

impl Settings {
    pub fn new(thickness_allowance: f64, width_allowance: f64, kerf: f64, unit: Unit) -> Self {
        Self {
            thickness_allowance,
            width_allowance,
            kerf,
            unit,
        }
    }

    pub fn allowance(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Thickness => self.thickness_allowance,
            Axis::Width => self.width_allowance,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            thickness_allowance: 5.0,
            width_allowance: 5.0,
            kerf: 3.0,
            unit: Unit::Mm,
        }
    }
}

/// Whether the machining allowance was fully met or only the finished size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FitQuality {
    Full,
    Tight,
}

impl FitQuality {
    /// The weaker of two qualities.
    pub fn worst(self, other: FitQuality) -> FitQuality {
        self.max(other)
    }
}

/// A group of identical finished units of one part, all made the same way.
///
/// `count` is the number of finished units; each unit takes `layers` new raw
/// strips of `length` from the board type that owns this cut. A unit glued
/// from two or more pieces has `glue_layer` set and its name suffixed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cut {
    pub part_id: String,
    pub part_name: String,
    pub length: f64,
    pub count: u32,
    pub layers: u32,
    pub glue_layer: bool,
}

impl Cut {
    /// Total strips cut from raw boards for this group.
    pub fn strips(&self) -> u32 {
        self.count * self.layers
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedPiece {
    pub part_name: String,
    pub length: f64,
}

/// Pieces cut from one physical board, in cutting order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardLayout {
    pub pieces: Vec<PlacedPiece>,
    pub used_length: f64,
    pub waste: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawBoardResult {
    pub raw_stock_id: String,
    pub raw_stock_name: String,
    pub dimensions: Dimensions,
    pub cuts: Vec<Cut>,
    /// Leftover length summed over all boards of this line.
    pub waste: f64,
    pub quantity_needed: u32,
    pub boards: Vec<BoardLayout>,
}

impl RawBoardResult {
    pub fn volume(&self) -> f64 {
        self.dimensions.volume() * self.quantity_needed as f64
    }
}

/// How the units of one part were sourced from one stock type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartAssignment {
    pub part_id: String,
    pub part_name: String,
    pub raw_stock_id: String,
    pub raw_stock_name: String,
    pub fit: FitQuality,
    pub units: u32,
    pub new_strips: u32,
    pub offcuts_consumed: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationResult {
    pub plan: Vec<RawBoardResult>,
    pub unmatchable_parts: Vec<String>,
    pub total_raw_volume: f64,
    #[serde(default)]
    pub assignments: Vec<PartAssignment>,
    #[serde(default)]
    pub offcuts_discarded: usize,
}

impl OptimizationResult {
    pub fn board_count(&self) -> u32 {
        self.plan.iter().map(|line| line.quantity_needed).sum()
    }

    pub fn total_waste_length(&self) -> f64 {
        self.plan.iter().map(|line| line.waste).sum()
    }

    /// Finished units of `part_id` accounted for across the plan.
    pub fn units_for(&self, part_id: &str) -> u32 {
        self.plan
            .iter()
            .flat_map(|line| &line.cuts)
            .filter(|cut| cut.part_id == part_id)
            .map(|cut| cut.count)
            .sum()
    }
}

/// Accepts integral JSON numbers written either as `3` or `3.0`.
pub fn deserialize_u32_from_number<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    if !value.is_finite() || value.fract() != 0.0 || value < 0.0 || value > u32::MAX as f64 {
        return Err(serde::de::Error::custom(format!(
            "expected a non-negative whole number, got {value}"
        )));
    }
    Ok(value as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_part_wire_format_is_flat() {
        let json =
            r#"{"id":"p1","name":"Leg","quantity":4.0,"thickness":45,"width":45,"length":700}"#;
        let part: FinishedPart = serde_json::from_str(json).unwrap();
        assert_eq!(part.quantity, 4);
        assert_eq!(part.dimensions, Dimensions::new(45.0, 45.0, 700.0));
    }

    #[test]
    fn test_fractional_quantity_rejected() {
        let json = r#"{"name":"Leg","quantity":1.5,"thickness":45,"width":45,"length":700}"#;
        assert!(serde_json::from_str::<FinishedPart>(json).is_err());
    }

    #[test]
    fn test_settings_defaults_and_unit_aliases() {
        let settings: Settings = serde_json::from_str(r#"{"kerf":2,"unit":"imperial"}"#).unwrap();
        assert_eq!(settings.kerf, 2.0);
        assert_eq!(settings.width_allowance, 5.0);
        assert_eq!(settings.unit, Unit::Inch);
        let json = serde_json::to_string(&settings).unwrap();
        assert!(json.contains("\"thicknessAllowance\""));
        assert!(json.contains("\"inch\""));
    }

    #[test]
    fn test_dimension_validity() {
        assert!(Dimensions::new(1.0, 2.0, 3.0).is_valid());
        assert!(!Dimensions::new(0.0, 2.0, 3.0).is_valid());
        assert!(!Dimensions::new(1.0, f64::NAN, 3.0).is_valid());
        assert!(!Dimensions::new(1.0, 2.0, -3.0).is_valid());
    }

    #[test]
    fn test_fit_quality_worst() {
        assert_eq!(FitQuality::Full.worst(FitQuality::Tight), FitQuality::Tight);
        assert_eq!(FitQuality::Full.worst(FitQuality::Full), FitQuality::Full);
    }
}
