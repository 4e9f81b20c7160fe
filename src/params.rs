use anyhow::{anyhow, Context, Result};
use hex::FromHex;
use itertools::Itertools;
use serde::{
    de::{self, Deserializer},
    Deserialize,
};

use crate::consts::{Address, ExtensionIds, ReservedAddresses, OFFCHAIN_VOTING_V2_ADDRESS};

fn parse_address(raw: &str) -> Result<Address> {
    let trimmed = raw.trim();
    let hex_str = trimmed
        .strip_prefix("0x")
        .unwrap_or(trimmed);
    <[u8; 20]>::from_hex(hex_str).map_err(|e| anyhow!("invalid address hex {raw:?}: {e}"))
}

fn deserialize_optional_address<'de, D>(deserializer: D) -> Result<Option<Address>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: String = Deserialize::deserialize(deserializer)?;
    if s.trim().is_empty() {
        return Ok(None);
    }
    parse_address(&s)
        .map(Some)
        .map_err(de::Error::custom)
}

fn deserialize_address_list<'de, D>(deserializer: D) -> Result<Vec<Address>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: String = Deserialize::deserialize(deserializer)?;
    s.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(parse_address)
        .collect::<Result<Vec<_>>>()
        .map_err(de::Error::custom)
}

fn deserialize_optional_address_list<'de, D>(deserializer: D) -> Result<Option<Vec<Address>>, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_address_list(deserializer).map(Some)
}

/// Deployment parameters, passed as a query string:
/// `dao_factory=0x…&daos=0x…,0x…&coupon_onboarding=0x…&offchain_voting_v2=0x…`
#[derive(Debug, Default, Deserialize, PartialEq)]
pub struct Params {
    #[serde(default, deserialize_with = "deserialize_optional_address")]
    pub dao_factory: Option<Address>,
    #[serde(default, deserialize_with = "deserialize_address_list")]
    pub daos: Vec<Address>,
    #[serde(default, deserialize_with = "deserialize_address_list")]
    pub coupon_onboarding: Vec<Address>,
    #[serde(default, deserialize_with = "deserialize_optional_address_list")]
    pub offchain_voting_v2: Option<Vec<Address>>,
}

impl Params {
    pub fn parse_from_query(input: &str) -> Result<Self> {
        serde_qs::from_str(input).map_err(|e| anyhow!("Failed to parse query params: {}", e))
    }
}

/// Immutable configuration handed to every handler.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub reserved: ReservedAddresses,
    pub extensions: ExtensionIds,
    pub dao_factory: Option<Address>,
    pub daos: Vec<Address>,
    pub coupon_onboarding: Vec<Address>,
    pub offchain_voting_v2: Vec<Address>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            reserved: ReservedAddresses::default(),
            extensions: ExtensionIds::default(),
            dao_factory: None,
            daos: vec![],
            coupon_onboarding: vec![],
            offchain_voting_v2: vec![OFFCHAIN_VOTING_V2_ADDRESS],
        }
    }
}

impl Config {
    pub fn from_params(params: &str) -> Result<Self> {
        let params = Params::parse_from_query(params).context("invalid indexer params")?;
        let config = Self::from(params);
        substreams::log::info!(
            "Indexing DAOs [{}] with factory {:?}",
            config
                .daos
                .iter()
                .map(hex::encode)
                .join(", "),
            config.dao_factory.map(hex::encode)
        );
        Ok(config)
    }

    pub fn is_dao_factory(&self, address: &[u8]) -> bool {
        self.dao_factory
            .is_some_and(|factory| factory.as_slice() == address)
    }

    pub fn is_coupon_onboarding(&self, address: &[u8]) -> bool {
        self.coupon_onboarding
            .iter()
            .any(|coupon| coupon.as_slice() == address)
    }

    pub fn uses_current_offchain_layout(&self, adapter: &[u8]) -> bool {
        self.offchain_voting_v2
            .iter()
            .any(|v2| v2.as_slice() == adapter)
    }
}

impl From<Params> for Config {
    fn from(params: Params) -> Self {
        let defaults = Config::default();
        Self {
            dao_factory: params.dao_factory,
            daos: params.daos.into_iter().unique().collect(),
            coupon_onboarding: params.coupon_onboarding,
            offchain_voting_v2: params
                .offchain_voting_v2
                .unwrap_or(defaults.offchain_voting_v2),
            ..defaults
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use substreams::hex;

    #[test]
    fn test_parse_from_query() {
        let input = "dao_factory=0x4a9Ee7A3AC4F1F1ba6Ef3DDB6bC6E1C3aD2b5C01&daos=0x00000000000000000000000000000000000000d1,00000000000000000000000000000000000000D2&coupon_onboarding=0x00000000000000000000000000000000000000c1";

        let params = Params::parse_from_query(input).expect("Failed to parse query string");

        assert_eq!(params.dao_factory, Some(hex!("4a9Ee7A3AC4F1F1ba6Ef3DDB6bC6E1C3aD2b5C01")));
        assert_eq!(
            params.daos,
            vec![
                hex!("00000000000000000000000000000000000000d1"),
                hex!("00000000000000000000000000000000000000d2")
            ]
        );
        assert_eq!(params.coupon_onboarding, vec![hex!("00000000000000000000000000000000000000c1")]);
        assert_eq!(params.offchain_voting_v2, None);
    }

    #[test]
    fn test_empty_params_use_defaults() {
        let config = Config::from_params("").unwrap();

        assert_eq!(config, Config::default());
        assert!(config.uses_current_offchain_layout(&OFFCHAIN_VOTING_V2_ADDRESS));
    }

    #[test]
    fn test_offchain_layout_override() {
        let config =
            Config::from_params("offchain_voting_v2=0x00000000000000000000000000000000000000e1")
                .unwrap();

        assert!(config.uses_current_offchain_layout(&hex!("00000000000000000000000000000000000000e1")));
        assert!(!config.uses_current_offchain_layout(&OFFCHAIN_VOTING_V2_ADDRESS));
    }

    #[test]
    fn test_duplicate_daos_are_collapsed() {
        let config = Config::from_params(
            "daos=0x00000000000000000000000000000000000000d1,0x00000000000000000000000000000000000000D1",
        )
        .unwrap();

        assert_eq!(config.daos.len(), 1);
    }

    #[test]
    fn test_invalid_address_is_rejected() {
        assert!(Config::from_params("daos=0x1234").is_err());
        assert!(Config::from_params("dao_factory=zz").is_err());
    }

    #[test]
    fn test_routing_helpers() {
        let config = Config::from_params(
            "dao_factory=0x00000000000000000000000000000000000000f1&coupon_onboarding=0x00000000000000000000000000000000000000c1",
        )
        .unwrap();

        assert!(config.is_dao_factory(&hex!("00000000000000000000000000000000000000f1")));
        assert!(!config.is_dao_factory(&hex!("00000000000000000000000000000000000000c1")));
        assert!(config.is_coupon_onboarding(&hex!("00000000000000000000000000000000000000c1")));
    }
}
