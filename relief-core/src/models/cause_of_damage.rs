use serde::{Deserialize, Serialize};

/// NFIP cause-of-damage code selected for a claim.
///
/// The prediction backend consumes the cause as a number, so every code
/// carries a numeric string: digits map to themselves and the letter codes
/// continue the sequence (`A` is `10` through `D` is `13`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CauseOfDamage {
    OtherCauses,
    TidalWaterOverflow,
    StreamRiverOrLakeOverflow,
    AlluvialFanOverflow,
    RainfallOrSnowmeltAccumulation,
    ErosionDemolition,
    ErosionRemoval,
    EarthMovement,
    ClosedBasinLake,
    ExpeditedWithoutInspection,
    ExpeditedFollowUpInspection,
    ExpeditedRemoteAdjustment,
}

impl CauseOfDamage {
    pub fn all() -> &'static [CauseOfDamage] {
        &[
            Self::OtherCauses,
            Self::TidalWaterOverflow,
            Self::StreamRiverOrLakeOverflow,
            Self::AlluvialFanOverflow,
            Self::RainfallOrSnowmeltAccumulation,
            Self::ErosionDemolition,
            Self::ErosionRemoval,
            Self::EarthMovement,
            Self::ClosedBasinLake,
            Self::ExpeditedWithoutInspection,
            Self::ExpeditedFollowUpInspection,
            Self::ExpeditedRemoteAdjustment,
        ]
    }

    /// The single-character code used on claim forms.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OtherCauses => "0",
            Self::TidalWaterOverflow => "1",
            Self::StreamRiverOrLakeOverflow => "2",
            Self::AlluvialFanOverflow => "3",
            Self::RainfallOrSnowmeltAccumulation => "4",
            Self::ErosionDemolition => "7",
            Self::ErosionRemoval => "8",
            Self::EarthMovement => "9",
            Self::ClosedBasinLake => "A",
            Self::ExpeditedWithoutInspection => "B",
            Self::ExpeditedFollowUpInspection => "C",
            Self::ExpeditedRemoteAdjustment => "D",
        }
    }

    /// Numeric string the prediction backend expects for this code.
    pub fn numeric_str(&self) -> &'static str {
        match self {
            Self::ClosedBasinLake => "10",
            Self::ExpeditedWithoutInspection => "11",
            Self::ExpeditedFollowUpInspection => "12",
            Self::ExpeditedRemoteAdjustment => "13",
            other => other.as_str(),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::OtherCauses => "Other causes",
            Self::TidalWaterOverflow => "Tidal water overflow",
            Self::StreamRiverOrLakeOverflow => "Stream, river, or lake overflow",
            Self::AlluvialFanOverflow => "Alluvial fan overflow",
            Self::RainfallOrSnowmeltAccumulation => "Accumulation of rainfall or snowmelt",
            Self::ErosionDemolition => "Erosion-demolition (loss before Sept 23, 1995 only)",
            Self::ErosionRemoval => "Erosion-removal (loss before Sept 23, 1995 only)",
            Self::EarthMovement => "Earth movement, landslide, land subsidence, sinkholes, etc.",
            Self::ClosedBasinLake => "Closed basin lake",
            Self::ExpeditedWithoutInspection => {
                "Expedited claim handling process without site inspection"
            }
            Self::ExpeditedFollowUpInspection => {
                "Expedited claim handling process follow-up site inspection"
            }
            Self::ExpeditedRemoteAdjustment => {
                "Expedited claim handling process by Adjusting Process Pilot Program (Remote Adjustment)"
            }
        }
    }

    /// Parses a claim-form code. Letter codes are accepted in either case.
    pub fn parse(s: &str) -> Option<Self> {
        let code = s.trim().to_ascii_uppercase();
        Self::all().iter().copied().find(|c| c.as_str() == code)
    }
}
