//! Chart trial identifiers of the form `<material>-<temp>Liquid`.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::constants::TRIAL_ID_SUFFIX;
use crate::error::ParseError;
use crate::types::{Material, Temperature};

/// Material and beverage temperature named by a chart trial.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrialId {
    pub material: Material,
    pub bev_temp: Temperature,
}

/// Parse `<material>-<temp>Liquid`. The last `-` separates the two parts.
pub fn parse_trial_id(id: &str) -> Result<TrialId, ParseError> {
    let malformed = || ParseError::MalformedTrialId(id.to_string());
    let body = id.strip_suffix(TRIAL_ID_SUFFIX).ok_or_else(malformed)?;
    let (material, temp) = body.rsplit_once('-').ok_or_else(malformed)?;
    if material.is_empty() || temp.is_empty() {
        return Err(malformed());
    }
    Ok(TrialId {
        material: material.parse()?,
        bev_temp: temp.parse()?,
    })
}

impl FromStr for TrialId {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_trial_id(s)
    }
}

impl fmt::Display for TrialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}{}", self.material, self.bev_temp, TRIAL_ID_SUFFIX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        let id = parse_trial_id("Styrofoam-ColdLiquid").unwrap();
        assert_eq!(id.material, Material::Styrofoam);
        assert_eq!(id.bev_temp, Temperature::Cold);
        assert_eq!(id.to_string(), "Styrofoam-ColdLiquid");
    }

    #[test]
    fn test_parse_rejects_bad_shape() {
        for bad in ["", "Wood-Hot", "WoodHotLiquid", "-HotLiquid", "Wood-Liquid"] {
            assert_eq!(
                parse_trial_id(bad),
                Err(ParseError::MalformedTrialId(bad.to_string())),
                "{bad}"
            );
        }
    }

    #[test]
    fn test_parse_rejects_unknown_parts() {
        assert!(matches!(
            "Steel-HotLiquid".parse::<TrialId>(),
            Err(ParseError::UnknownMaterial(_))
        ));
        assert!(matches!(
            "Wood-TepidLiquid".parse::<TrialId>(),
            Err(ParseError::UnknownTemperature(_))
        ));
    }
}
