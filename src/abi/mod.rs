#![allow(clippy::all)]

pub mod bank_extension;
pub mod coupon_onboarding;
pub mod dao_factory;
pub mod dao_registry;
pub mod erc20_extension;
pub mod i_voting;
pub mod offchain_voting_contract;
pub mod offchain_voting_contract_v1;
pub mod voting_contract;
