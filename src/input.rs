//! JSON model files.
//!
//! ```json
//! {
//!   "material": { "modulus": 210000.0, "area": 1000.0 },
//!   "nodes": [[0, 0], [1, 0]],
//!   "elements": [{ "nodes": [1, 2] }],
//!   "displacement_conditions": [0, 0, null, 0],
//!   "force_conditions": [null, null, 1000, null],
//!   "policy": "corrected"
//! }
//! ```
//!
//! Element `modulus` and `area` override the shared `material` defaults.

use std::fs;
use std::path::Path;

use log::info;
use serde::Deserialize;
use thiserror::Error;

use crate::boundary::ReductionPolicy;
use crate::errors::AnalysisError;
use crate::truss::PlaneTruss;

/// Error returned while loading a model file.
#[derive(Debug, Error)]
pub enum InputError {
    /// Returned when the file cannot be read.
    #[error("failed to read model file: {0}")]
    Io(#[from] std::io::Error),
    /// Returned when the file is not valid JSON for a model.
    #[error("failed to parse model: {0}")]
    Json(#[from] serde_json::Error),
    /// Returned when an element has no value and no default for a property.
    #[error("element {element} has no {property} and no material default")]
    MissingProperty {
        /// One-based element number.
        element: usize,
        /// Name of the missing property.
        property: &'static str,
    },
    /// Returned when the tables do not describe a valid truss.
    #[error("invalid model: {0}")]
    Model(#[from] AnalysisError),
}

/// Shared defaults for element properties.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct MaterialInput {
    /// Default elastic modulus.
    pub modulus: Option<f64>,
    /// Default cross-sectional area.
    pub area: Option<f64>,
}

/// One element entry.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ElementInput {
    /// One-based `[start, end]` node numbers.
    pub nodes: [usize; 2],
    /// Elastic modulus, falling back to the material default.
    pub modulus: Option<f64>,
    /// Cross-sectional area, falling back to the material default.
    pub area: Option<f64>,
}

/// A complete model description.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TrussInput {
    /// Shared element defaults.
    #[serde(default)]
    pub material: MaterialInput,
    /// Node coordinates in node order.
    pub nodes: Vec<[f64; 2]>,
    /// Elements in element order.
    pub elements: Vec<ElementInput>,
    /// Prescribed displacement per DOF, `null` where unknown.
    pub displacement_conditions: Vec<Option<f64>>,
    /// Prescribed force per DOF, `null` where unknown.
    pub force_conditions: Vec<Option<f64>>,
    /// Load reduction policy.
    #[serde(default)]
    pub policy: ReductionPolicy,
}

impl TrussInput {
    /// Read a model from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::Io`] or [`InputError::Json`] when the file cannot
    /// be read or parsed.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, InputError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let input = Self::from_json_str(&contents)?;
        info!(
            "loaded {} with {} nodes and {} elements",
            path.display(),
            input.nodes.len(),
            input.elements.len()
        );
        Ok(input)
    }

    /// Parse a model from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::Json`] for malformed input.
    pub fn from_json_str(contents: &str) -> Result<Self, InputError> {
        Ok(serde_json::from_str(contents)?)
    }

    /// Build the truss described by this input.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::MissingProperty`] when an element lacks a
    /// modulus or area and [`InputError::Model`] for inconsistent tables.
    pub fn build_truss(&self) -> Result<PlaneTruss, InputError> {
        let mut moduli = Vec::with_capacity(self.elements.len());
        let mut areas = Vec::with_capacity(self.elements.len());
        for (index, element) in self.elements.iter().enumerate() {
            let missing = |property| InputError::MissingProperty {
                element: index + 1,
                property,
            };
            moduli.push(
                element
                    .modulus
                    .or(self.material.modulus)
                    .ok_or_else(|| missing("modulus"))?,
            );
            areas.push(
                element
                    .area
                    .or(self.material.area)
                    .ok_or_else(|| missing("area"))?,
            );
        }
        let coordinates = self
            .nodes
            .iter()
            .map(|&[x, y]| (x, y))
            .collect::<Vec<_>>();
        let connectivity = self
            .elements
            .iter()
            .map(|element| (element.nodes[0], element.nodes[1]))
            .collect::<Vec<_>>();
        Ok(PlaneTruss::from_tables(
            &coordinates,
            &connectivity,
            &moduli,
            &areas,
            &self.displacement_conditions,
            &self.force_conditions,
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::IllPosedSystem;

    const CANTILEVER: &str = r#"{
        "material": { "modulus": 210000.0, "area": 1000.0 },
        "nodes": [[0, 0], [1000, 0]],
        "elements": [{ "nodes": [1, 2] }],
        "displacement_conditions": [0, 0, null, 0],
        "force_conditions": [null, null, 1000, null]
    }"#;

    #[test]
    fn parses_defaults_and_policy() {
        let input = TrussInput::from_json_str(CANTILEVER).expect("valid json");
        assert_eq!(input.policy, ReductionPolicy::Corrected);
        assert_eq!(input.material.modulus, Some(210_000.0));
        assert_eq!(input.elements[0].area, None);

        let truss = input.build_truss().expect("valid model");
        assert_eq!(truss.node_count(), 2);
        assert_eq!(truss.element_count(), 1);
    }

    #[test]
    fn element_values_override_material() {
        let json = CANTILEVER.replace(
            r#"{ "nodes": [1, 2] }"#,
            r#"{ "nodes": [1, 2], "area": 500.0 }"#,
        );
        let truss = TrussInput::from_json_str(&json).unwrap().build_truss().unwrap();
        let solution = truss.evaluate().unwrap();
        assert!((solution.displacements()[2] - 2.0 / 210.0).abs() < 1.0e-12);
    }

    #[test]
    fn direct_policy_is_accepted() {
        let json = CANTILEVER.replace(
            r#""force_conditions""#,
            r#""policy": "direct", "force_conditions""#,
        );
        let input = TrussInput::from_json_str(&json).unwrap();
        assert_eq!(input.policy, ReductionPolicy::Direct);
    }

    #[test]
    fn missing_properties_are_reported() {
        let material = r#""material": { "modulus": 210000.0, "area": 1000.0 },"#;
        let json = CANTILEVER.replace(material, "");
        let error = TrussInput::from_json_str(&json)
            .unwrap()
            .build_truss()
            .expect_err("no modulus anywhere");
        assert!(matches!(
            error,
            InputError::MissingProperty {
                element: 1,
                property: "modulus"
            }
        ));
    }

    #[test]
    fn inconsistent_conditions_are_reported() {
        let json = CANTILEVER.replace("[null, null, 1000, null]", "[null, null, 1000, 5]");
        let error = TrussInput::from_json_str(&json)
            .unwrap()
            .build_truss()
            .expect_err("DOF 3 has both quantities");
        assert!(matches!(
            error,
            InputError::Model(AnalysisError::IllPosed(IllPosedSystem::BothKnown { dof: 3 }))
        ));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let json = CANTILEVER.replace(
            r#""nodes": [[0, 0]"#,
            r#""units": "mm", "nodes": [[0, 0]"#,
        );
        assert!(matches!(
            TrussInput::from_json_str(&json),
            Err(InputError::Json(_))
        ));
    }
}
