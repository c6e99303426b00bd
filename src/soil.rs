//! Soil parameters sent to the prediction service
//!
//! [`SoilParameters`] is the seven-field record describing the current land
//! conditions. It serializes with the field names the prediction service
//! expects (note `pH_Level`). [`SoilField`] names a single field so the
//! chat session can update one value in place.

use crate::error::AgronusError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the seven soil/agronomic fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoilField {
    Nitrogen,
    Phosphorus,
    Potassium,
    Temperature,
    Humidity,
    PhLevel,
    Rainfall,
}

impl SoilField {
    /// All fields in wire order
    pub const ALL: [SoilField; 7] = [
        SoilField::Nitrogen,
        SoilField::Phosphorus,
        SoilField::Potassium,
        SoilField::Temperature,
        SoilField::Humidity,
        SoilField::PhLevel,
        SoilField::Rainfall,
    ];

    /// Parse a field from its wire name, plain name, or agronomic symbol
    ///
    /// Matching is case-insensitive.
    ///
    /// # Examples
    ///
    /// ```
    /// use agronus::soil::SoilField;
    ///
    /// assert_eq!(SoilField::parse_str("pH_Level").unwrap(), SoilField::PhLevel);
    /// assert_eq!(SoilField::parse_str("N").unwrap(), SoilField::Nitrogen);
    /// assert!(SoilField::parse_str("sulfur").is_err());
    /// ```
    pub fn parse_str(s: &str) -> Result<Self, AgronusError> {
        match s.trim().to_lowercase().as_str() {
            "nitrogen" | "n" => Ok(Self::Nitrogen),
            "phosphorus" | "p" => Ok(Self::Phosphorus),
            "potassium" | "k" => Ok(Self::Potassium),
            "temperature" | "temp" => Ok(Self::Temperature),
            "humidity" | "hum" => Ok(Self::Humidity),
            "ph_level" | "ph" | "ph-level" => Ok(Self::PhLevel),
            "rainfall" | "rain" => Ok(Self::Rainfall),
            _ => Err(AgronusError::UnknownParameter(s.trim().to_string())),
        }
    }

    /// Field name as sent to the prediction service
    pub fn wire_name(&self) -> &'static str {
        match self {
            Self::Nitrogen => "nitrogen",
            Self::Phosphorus => "phosphorus",
            Self::Potassium => "potassium",
            Self::Temperature => "temperature",
            Self::Humidity => "humidity",
            Self::PhLevel => "pH_Level",
            Self::Rainfall => "rainfall",
        }
    }

    /// Human-readable label used in the parameter table
    pub fn label(&self) -> &'static str {
        match self {
            Self::Nitrogen => "N (Nitrogen)",
            Self::Phosphorus => "P (Phosphorus)",
            Self::Potassium => "K (Potassium)",
            Self::Temperature => "Temperature (°C)",
            Self::Humidity => "Humidity (%)",
            Self::PhLevel => "pH",
            Self::Rainfall => "Rainfall (mm)",
        }
    }
}

impl fmt::Display for SoilField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.wire_name())
    }
}

/// Current soil conditions
///
/// Missing fields deserialize to the form defaults, so a config file may
/// override only the values it cares about.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SoilParameters {
    pub nitrogen: f64,
    pub phosphorus: f64,
    pub potassium: f64,
    pub temperature: f64,
    pub humidity: f64,
    #[serde(rename = "pH_Level")]
    pub ph_level: f64,
    pub rainfall: f64,
}

impl Default for SoilParameters {
    fn default() -> Self {
        Self {
            nitrogen: 90.0,
            phosphorus: 42.0,
            potassium: 43.0,
            temperature: 20.8,
            humidity: 82.0,
            ph_level: 6.5,
            rainfall: 202.9,
        }
    }
}

/// A validation problem with one field
#[derive(Debug, Clone, PartialEq)]
pub struct FieldIssue {
    pub field: SoilField,
    pub message: &'static str,
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl SoilParameters {
    /// Read one field
    pub fn get(&self, field: SoilField) -> f64 {
        match field {
            SoilField::Nitrogen => self.nitrogen,
            SoilField::Phosphorus => self.phosphorus,
            SoilField::Potassium => self.potassium,
            SoilField::Temperature => self.temperature,
            SoilField::Humidity => self.humidity,
            SoilField::PhLevel => self.ph_level,
            SoilField::Rainfall => self.rainfall,
        }
    }

    /// Overwrite one field, leaving the others untouched
    ///
    /// No range check is applied here; see [`SoilParameters::validate`].
    pub fn set(&mut self, field: SoilField, value: f64) {
        let slot = match field {
            SoilField::Nitrogen => &mut self.nitrogen,
            SoilField::Phosphorus => &mut self.phosphorus,
            SoilField::Potassium => &mut self.potassium,
            SoilField::Temperature => &mut self.temperature,
            SoilField::Humidity => &mut self.humidity,
            SoilField::PhLevel => &mut self.ph_level,
            SoilField::Rainfall => &mut self.rainfall,
        };
        *slot = value;
    }

    /// Parse a raw name/value pair and apply it
    ///
    /// # Errors
    ///
    /// Returns `UnknownParameter` if `name` is not a soil field and
    /// `InvalidParameter` if `value` is not a number. The record is left
    /// unchanged in both cases.
    ///
    /// # Examples
    ///
    /// ```
    /// use agronus::soil::SoilParameters;
    ///
    /// let mut soil = SoilParameters::default();
    /// soil.update("nitrogen", "120").unwrap();
    /// assert_eq!(soil.nitrogen, 120.0);
    /// ```
    pub fn update(&mut self, name: &str, value: &str) -> Result<SoilField, AgronusError> {
        let field = SoilField::parse_str(name)?;
        let parsed = parse_value(value).ok_or_else(|| AgronusError::InvalidParameter {
            field: field.wire_name().to_string(),
            value: value.to_string(),
        })?;
        self.set(field, parsed);
        Ok(field)
    }

    /// Range-check every field
    ///
    /// Returns one issue per out-of-range field, in wire order. An empty
    /// vector means the record is acceptable.
    pub fn validate(&self) -> Vec<FieldIssue> {
        SoilField::ALL
            .iter()
            .filter_map(|&field| {
                let value = self.get(field);
                let (ok, message) = match field {
                    SoilField::Nitrogen => (non_negative(value), "Enter a valid nitrogen level (≥ 0)"),
                    SoilField::Phosphorus => {
                        (non_negative(value), "Enter a valid phosphorus level (≥ 0)")
                    }
                    SoilField::Potassium => {
                        (non_negative(value), "Enter a valid potassium level (≥ 0)")
                    }
                    SoilField::Temperature => (value.is_finite(), "Enter a valid temperature"),
                    SoilField::Humidity => {
                        (within(value, 0.0, 100.0), "Enter humidity between 0 - 100%")
                    }
                    SoilField::PhLevel => (within(value, 0.0, 14.0), "Enter pH level between 0 - 14"),
                    SoilField::Rainfall => {
                        (non_negative(value), "Enter a valid rainfall amount (≥ 0)")
                    }
                };
                (!ok).then_some(FieldIssue { field, message })
            })
            .collect()
    }

    /// Compact one-line summary, e.g. for the chat prompt banner
    pub fn summary(&self) -> String {
        format!(
            "N: {}, P: {}, K: {}, Temperature: {}, Humidity: {}, pH: {}, Rainfall: {}",
            self.nitrogen,
            self.phosphorus,
            self.potassium,
            self.temperature,
            self.humidity,
            self.ph_level,
            self.rainfall
        )
    }
}

fn non_negative(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

fn within(value: f64, min: f64, max: f64) -> bool {
    value.is_finite() && (min..=max).contains(&value)
}

/// Parse a soil reading, accepting only finite numbers
///
/// `NaN` and infinities parse as `f64` but serialize to JSON `null`, which
/// the prediction service cannot read.
pub fn parse_value(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
