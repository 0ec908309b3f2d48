//! Identifiers for the remote API surfaces, deployment targets and versions.
//!
//! Each enum serializes to the exact string the API expects on the wire, and
//! parses back from it via [`FromStr`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::MomoError;

/// A MoMo API product line. The lowercase name is also its URL path segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Product {
    Collection,
    Disbursement,
    Remittance,
}

impl Product {
    pub const ALL: [Product; 3] = [
        Product::Collection,
        Product::Disbursement,
        Product::Remittance,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Product::Collection => "collection",
            Product::Disbursement => "disbursement",
            Product::Remittance => "remittance",
        }
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Product {
    type Err = MomoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Product::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| MomoError::Config(format!("unknown product: {s}")))
    }
}

/// Deployment target, sent as `X-Target-Environment`.
///
/// `Sandbox` is the only value accepted by the sandbox host; the rest name
/// the live markets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetEnvironment {
    #[default]
    Sandbox,
    MtnUganda,
    MtnGhana,
    MtnIvoryCoast,
    MtnZambia,
    MtnCameroon,
    MtnBenin,
    MtnCongo,
    MtnSwaziland,
    MtnGuineaConakry,
    MtnSouthAfrica,
    MtnLiberia,
}

impl TargetEnvironment {
    pub const ALL: [TargetEnvironment; 12] = [
        TargetEnvironment::Sandbox,
        TargetEnvironment::MtnUganda,
        TargetEnvironment::MtnGhana,
        TargetEnvironment::MtnIvoryCoast,
        TargetEnvironment::MtnZambia,
        TargetEnvironment::MtnCameroon,
        TargetEnvironment::MtnBenin,
        TargetEnvironment::MtnCongo,
        TargetEnvironment::MtnSwaziland,
        TargetEnvironment::MtnGuineaConakry,
        TargetEnvironment::MtnSouthAfrica,
        TargetEnvironment::MtnLiberia,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TargetEnvironment::Sandbox => "sandbox",
            TargetEnvironment::MtnUganda => "mtnuganda",
            TargetEnvironment::MtnGhana => "mtnghana",
            TargetEnvironment::MtnIvoryCoast => "mtnivorycoast",
            TargetEnvironment::MtnZambia => "mtnzambia",
            TargetEnvironment::MtnCameroon => "mtncameroon",
            TargetEnvironment::MtnBenin => "mtnbenin",
            TargetEnvironment::MtnCongo => "mtncongo",
            TargetEnvironment::MtnSwaziland => "mtnswaziland",
            TargetEnvironment::MtnGuineaConakry => "mtnguineaconakry",
            TargetEnvironment::MtnSouthAfrica => "mtnsouthafrica",
            TargetEnvironment::MtnLiberia => "mtnliberia",
        }
    }

    pub fn is_sandbox(&self) -> bool {
        matches!(self, TargetEnvironment::Sandbox)
    }
}

impl fmt::Display for TargetEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetEnvironment {
    type Err = MomoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TargetEnvironment::ALL
            .into_iter()
            .find(|e| e.as_str() == s)
            .ok_or_else(|| MomoError::Config(format!("unknown target environment: {s}")))
    }
}

/// API version tag. Selects the URL path segment under a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiVersion {
    #[default]
    V1,
    V2,
}

impl ApiVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiVersion::V1 => "v1",
            ApiVersion::V2 => "v2",
        }
    }

    /// URL path segment for this version (`v1` -> `v1_0`).
    pub fn path_segment(&self) -> &'static str {
        match self {
            ApiVersion::V1 => "v1_0",
            ApiVersion::V2 => "v2_0",
        }
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApiVersion {
    type Err = MomoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "v1" => Ok(ApiVersion::V1),
            "v2" => Ok(ApiVersion::V2),
            other => Err(MomoError::Config(format!("unknown api version: {other}"))),
        }
    }
}
