use serde::{Deserialize, Serialize};

use crate::error::PluginError;

/// Operations a plugin instance may declare support for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Capability {
    Availability,
    Reservations,
    ReservationCancellation,
    Amendment,
}

impl Capability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::Availability => "AVAILABILITY",
            Capability::Reservations => "RESERVATIONS",
            Capability::ReservationCancellation => "RESERVATION_CANCELLATION",
            Capability::Amendment => "AMENDMENT",
        }
    }
}

/// Immutable capability set, declared once at startup.
///
/// Cancellation-of-reservation and amendment only make sense under the
/// two-step reservation model, so declaring either without `RESERVATIONS`
/// is rejected at construction.
#[derive(Debug, Clone, Serialize)]
pub struct CapabilitySet(Vec<Capability>);

impl CapabilitySet {
    pub fn new<I>(capabilities: I) -> Result<Self, PluginError>
    where
        I: IntoIterator<Item = Capability>,
    {
        let mut declared: Vec<Capability> = capabilities.into_iter().collect();
        declared.sort();
        declared.dedup();

        for dependent in [Capability::ReservationCancellation, Capability::Amendment] {
            if declared.contains(&dependent) && !declared.contains(&Capability::Reservations) {
                return Err(PluginError::Configuration(format!(
                    "capability {} requires RESERVATIONS to be declared as well",
                    dependent.as_str()
                )));
            }
        }
        Ok(CapabilitySet(declared))
    }

    pub fn supports(&self, capability: Capability) -> bool {
        self.0.contains(&capability)
    }

    /// Gate for dispatch: fails fast with `UnsupportedCapability` carrying the
    /// operation name, identically on every transport.
    pub fn require(
        &self,
        capability: Capability,
        operation: &'static str,
    ) -> Result<(), PluginError> {
        if self.supports(capability) {
            Ok(())
        } else {
            Err(PluginError::UnsupportedCapability(operation))
        }
    }

    pub fn declared(&self) -> &[Capability] {
        &self.0
    }
}

/// Data type of a plugin configuration parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParameterDataType {
    String,
    Long,
}

/// One entry of the configuration parameter schema.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterDescriptor {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub data_type: ParameterDataType,
    pub required: bool,
}

impl ParameterDescriptor {
    pub const fn required(name: &'static str, data_type: ParameterDataType) -> Self {
        ParameterDescriptor {
            name,
            data_type,
            required: true,
        }
    }
}

/// Plugin metadata served before any credentials exist.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginDefinition {
    pub name: String,
    pub description: String,
    pub capabilities: Vec<Capability>,
    pub parameters: Vec<ParameterDescriptor>,
}

impl PluginDefinition {
    pub fn new(name: &str, description: &str, capabilities: &CapabilitySet) -> Self {
        PluginDefinition {
            name: name.to_string(),
            description: description.to_string(),
            capabilities: capabilities.declared().to_vec(),
            parameters: crate::config::CONFIG_SCHEMA.to_vec(),
        }
    }
}
