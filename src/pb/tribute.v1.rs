// @generated
/// Decoded events of a block, in log order.
#[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Events {
    #[prost(message, repeated, tag="1")]
    pub events: ::prost::alloc::vec::Vec<DaoEvent>,
    /// eth_calls made while handling the events, answered at this block.
    #[prost(message, repeated, tag="2")]
    pub reads: ::prost::alloc::vec::Vec<ContractRead>,
}
#[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ContractRead {
    #[prost(bytes="vec", tag="1")]
    pub to: ::prost::alloc::vec::Vec<u8>,
    /// ABI-encoded call data, selector included.
    #[prost(bytes="vec", tag="2")]
    pub data: ::prost::alloc::vec::Vec<u8>,
    #[prost(bool, tag="3")]
    pub failed: bool,
    #[prost(bytes="vec", tag="4")]
    pub output: ::prost::alloc::vec::Vec<u8>,
}
/// Contract addresses whose events are being indexed.
#[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct WatchedContracts {
    #[prost(message, repeated, tag="1")]
    pub contracts: ::prost::alloc::vec::Vec<WatchedContract>,
}
#[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct WatchedContract {
    #[prost(string, tag="1")]
    pub template: ::prost::alloc::string::String,
    #[prost(bytes="vec", tag="2")]
    pub address: ::prost::alloc::vec::Vec<u8>,
}
#[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct EventMeta {
    /// Contract that emitted the log.
    #[prost(bytes="vec", tag="1")]
    pub address: ::prost::alloc::vec::Vec<u8>,
    #[prost(bytes="vec", tag="2")]
    pub tx_hash: ::prost::alloc::vec::Vec<u8>,
    #[prost(bytes="vec", tag="3")]
    pub tx_from: ::prost::alloc::vec::Vec<u8>,
    #[prost(uint64, tag="4")]
    pub block_number: u64,
    /// Block timestamp, in seconds.
    #[prost(uint64, tag="5")]
    pub timestamp: u64,
    #[prost(uint64, tag="6")]
    pub ordinal: u64,
}
#[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DaoEvent {
    #[prost(message, optional, tag="1")]
    pub meta: ::core::option::Option<EventMeta>,
    #[prost(oneof="dao_event::Kind", tags="10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 20, 21, 22, 23")]
    pub kind: ::core::option::Option<dao_event::Kind>,
}
/// Nested message and enum types in `DaoEvent`.
pub mod dao_event {
    #[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Kind {
        #[prost(message, tag="10")]
        SubmittedProposal(super::SubmittedProposal),
        #[prost(message, tag="11")]
        SponsoredProposal(super::SponsoredProposal),
        #[prost(message, tag="12")]
        ProcessedProposal(super::ProcessedProposal),
        #[prost(message, tag="13")]
        AdapterAdded(super::AdapterAdded),
        #[prost(message, tag="14")]
        AdapterRemoved(super::AdapterRemoved),
        #[prost(message, tag="15")]
        ExtensionAdded(super::ExtensionAdded),
        #[prost(message, tag="16")]
        ExtensionRemoved(super::ExtensionRemoved),
        #[prost(message, tag="17")]
        UpdateDelegateKey(super::UpdateDelegateKey),
        #[prost(message, tag="18")]
        ConfigurationUpdated(super::ConfigurationUpdated),
        #[prost(message, tag="19")]
        AddressConfigurationUpdated(super::AddressConfigurationUpdated),
        #[prost(message, tag="20")]
        NewBalance(super::NewBalance),
        #[prost(message, tag="21")]
        Withdraw(super::Withdraw),
        #[prost(message, tag="22")]
        CouponRedeemed(super::CouponRedeemed),
        #[prost(message, tag="23")]
        DaoCreated(super::DaoCreated),
    }
}
#[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SubmittedProposal {
    #[prost(bytes="vec", tag="1")]
    pub proposal_id: ::prost::alloc::vec::Vec<u8>,
    #[prost(string, tag="2")]
    pub flags: ::prost::alloc::string::String,
}
#[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SponsoredProposal {
    #[prost(bytes="vec", tag="1")]
    pub proposal_id: ::prost::alloc::vec::Vec<u8>,
    #[prost(string, tag="2")]
    pub flags: ::prost::alloc::string::String,
    #[prost(bytes="vec", tag="3")]
    pub voting_adapter: ::prost::alloc::vec::Vec<u8>,
}
#[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProcessedProposal {
    #[prost(bytes="vec", tag="1")]
    pub proposal_id: ::prost::alloc::vec::Vec<u8>,
    #[prost(string, tag="2")]
    pub flags: ::prost::alloc::string::String,
}
#[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AdapterAdded {
    #[prost(bytes="vec", tag="1")]
    pub adapter_id: ::prost::alloc::vec::Vec<u8>,
    #[prost(bytes="vec", tag="2")]
    pub adapter_address: ::prost::alloc::vec::Vec<u8>,
    #[prost(string, tag="3")]
    pub flags: ::prost::alloc::string::String,
}
#[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AdapterRemoved {
    #[prost(bytes="vec", tag="1")]
    pub adapter_id: ::prost::alloc::vec::Vec<u8>,
}
#[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ExtensionAdded {
    #[prost(bytes="vec", tag="1")]
    pub extension_id: ::prost::alloc::vec::Vec<u8>,
    #[prost(bytes="vec", tag="2")]
    pub extension_address: ::prost::alloc::vec::Vec<u8>,
}
#[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ExtensionRemoved {
    #[prost(bytes="vec", tag="1")]
    pub extension_id: ::prost::alloc::vec::Vec<u8>,
}
#[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct UpdateDelegateKey {
    #[prost(bytes="vec", tag="1")]
    pub member_address: ::prost::alloc::vec::Vec<u8>,
    #[prost(bytes="vec", tag="2")]
    pub new_delegate_key: ::prost::alloc::vec::Vec<u8>,
}
#[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ConfigurationUpdated {
    #[prost(bytes="vec", tag="1")]
    pub key: ::prost::alloc::vec::Vec<u8>,
    #[prost(string, tag="2")]
    pub value: ::prost::alloc::string::String,
}
#[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AddressConfigurationUpdated {
    #[prost(bytes="vec", tag="1")]
    pub key: ::prost::alloc::vec::Vec<u8>,
    #[prost(bytes="vec", tag="2")]
    pub value: ::prost::alloc::vec::Vec<u8>,
}
#[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct NewBalance {
    #[prost(bytes="vec", tag="1")]
    pub member: ::prost::alloc::vec::Vec<u8>,
    #[prost(bytes="vec", tag="2")]
    pub token_addr: ::prost::alloc::vec::Vec<u8>,
    #[prost(string, tag="3")]
    pub amount: ::prost::alloc::string::String,
}
#[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Withdraw {
    #[prost(bytes="vec", tag="1")]
    pub account: ::prost::alloc::vec::Vec<u8>,
    #[prost(bytes="vec", tag="2")]
    pub token_addr: ::prost::alloc::vec::Vec<u8>,
    #[prost(string, tag="3")]
    pub amount: ::prost::alloc::string::String,
}
#[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CouponRedeemed {
    #[prost(bytes="vec", tag="1")]
    pub dao_address: ::prost::alloc::vec::Vec<u8>,
    #[prost(string, tag="2")]
    pub nonce: ::prost::alloc::string::String,
    #[prost(bytes="vec", tag="3")]
    pub authorized_member: ::prost::alloc::vec::Vec<u8>,
    #[prost(string, tag="4")]
    pub amount: ::prost::alloc::string::String,
}
#[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DaoCreated {
    #[prost(bytes="vec", tag="1")]
    pub dao_address: ::prost::alloc::vec::Vec<u8>,
    #[prost(string, tag="2")]
    pub name: ::prost::alloc::string::String,
}
#[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TributeDao {
    #[prost(string, tag="1")]
    pub id: ::prost::alloc::string::String,
    #[prost(bytes="vec", tag="2")]
    pub dao_address: ::prost::alloc::vec::Vec<u8>,
    #[prost(string, tag="3")]
    pub name: ::prost::alloc::string::String,
    #[prost(bytes="vec", tag="4")]
    pub creator: ::prost::alloc::vec::Vec<u8>,
    #[prost(string, tag="5")]
    pub created_at: ::prost::alloc::string::String,
}
#[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Member {
    #[prost(string, tag="1")]
    pub id: ::prost::alloc::string::String,
    #[prost(string, tag="2")]
    pub tribute_dao: ::prost::alloc::string::String,
    #[prost(bytes="vec", tag="3")]
    pub member_address: ::prost::alloc::vec::Vec<u8>,
    #[prost(bytes="vec", tag="4")]
    pub delegate_key: ::prost::alloc::vec::Vec<u8>,
    #[prost(bool, tag="5")]
    pub is_delegated: bool,
    #[prost(string, tag="6")]
    pub units: ::prost::alloc::string::String,
    #[prost(string, tag="7")]
    pub created_at: ::prost::alloc::string::String,
}
#[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Adapter {
    #[prost(string, tag="1")]
    pub id: ::prost::alloc::string::String,
    #[prost(string, tag="2")]
    pub tribute_dao: ::prost::alloc::string::String,
    #[prost(bytes="vec", tag="3")]
    pub adapter_id: ::prost::alloc::vec::Vec<u8>,
    #[prost(bytes="vec", tag="4")]
    pub adapter_address: ::prost::alloc::vec::Vec<u8>,
    #[prost(string, tag="5")]
    pub acl: ::prost::alloc::string::String,
}
#[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Extension {
    #[prost(string, tag="1")]
    pub id: ::prost::alloc::string::String,
    #[prost(string, tag="2")]
    pub tribute_dao: ::prost::alloc::string::String,
    #[prost(bytes="vec", tag="3")]
    pub extension_id: ::prost::alloc::vec::Vec<u8>,
    #[prost(bytes="vec", tag="4")]
    pub extension_address: ::prost::alloc::vec::Vec<u8>,
}
#[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Proposal {
    #[prost(string, tag="1")]
    pub id: ::prost::alloc::string::String,
    #[prost(string, tag="2")]
    pub tribute_dao: ::prost::alloc::string::String,
    #[prost(bytes="vec", tag="3")]
    pub proposal_id: ::prost::alloc::vec::Vec<u8>,
    #[prost(bytes="vec", tag="4")]
    pub adapter_id: ::prost::alloc::vec::Vec<u8>,
    #[prost(bytes="vec", tag="5")]
    pub adapter_address: ::prost::alloc::vec::Vec<u8>,
    #[prost(string, tag="6")]
    pub flags: ::prost::alloc::string::String,
    #[prost(bytes="vec", tag="7")]
    pub submitted_by: ::prost::alloc::vec::Vec<u8>,
    #[prost(string, tag="8")]
    pub member: ::prost::alloc::string::String,
    #[prost(bool, tag="9")]
    pub sponsored: bool,
    #[prost(string, tag="10")]
    pub sponsored_at: ::prost::alloc::string::String,
    #[prost(bytes="vec", tag="11")]
    pub sponsored_by: ::prost::alloc::vec::Vec<u8>,
    #[prost(bytes="vec", tag="12")]
    pub voting_adapter: ::prost::alloc::vec::Vec<u8>,
    #[prost(bool, tag="13")]
    pub processed: bool,
    #[prost(string, tag="14")]
    pub processed_at: ::prost::alloc::string::String,
    #[prost(bytes="vec", tag="15")]
    pub processed_by: ::prost::alloc::vec::Vec<u8>,
    #[prost(string, tag="16")]
    pub nb_yes: ::prost::alloc::string::String,
    #[prost(string, tag="17")]
    pub nb_no: ::prost::alloc::string::String,
    #[prost(string, tag="18")]
    pub starting_time: ::prost::alloc::string::String,
    #[prost(string, tag="19")]
    pub block_number: ::prost::alloc::string::String,
    #[prost(string, tag="20")]
    pub voting_state: ::prost::alloc::string::String,
    #[prost(string, tag="21")]
    pub voting_result: ::prost::alloc::string::String,
    #[prost(string, tag="22")]
    pub snapshot: ::prost::alloc::string::String,
    #[prost(bytes="vec", tag="23")]
    pub reporter: ::prost::alloc::vec::Vec<u8>,
    #[prost(bytes="vec", tag="24")]
    pub result_root: ::prost::alloc::vec::Vec<u8>,
    #[prost(string, tag="25")]
    pub grace_period_starting_time: ::prost::alloc::string::String,
    #[prost(bool, tag="26")]
    pub is_challenged: bool,
    #[prost(string, tag="27")]
    pub step_requested: ::prost::alloc::string::String,
    #[prost(bool, tag="28")]
    pub force_failed: bool,
    #[prost(string, tag="29")]
    pub fallback_votes_count: ::prost::alloc::string::String,
}
#[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Vote {
    #[prost(string, tag="1")]
    pub id: ::prost::alloc::string::String,
    #[prost(string, tag="2")]
    pub adapter_name: ::prost::alloc::string::String,
    #[prost(bytes="vec", tag="3")]
    pub adapter_address: ::prost::alloc::vec::Vec<u8>,
    #[prost(string, tag="4")]
    pub nb_yes: ::prost::alloc::string::String,
    #[prost(string, tag="5")]
    pub nb_no: ::prost::alloc::string::String,
    #[prost(string, tag="6")]
    pub proposal: ::prost::alloc::string::String,
}
#[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Bank {
    #[prost(string, tag="1")]
    pub id: ::prost::alloc::string::String,
    #[prost(string, tag="2")]
    pub tribute_dao: ::prost::alloc::string::String,
    #[prost(bytes="vec", tag="3")]
    pub bank_address: ::prost::alloc::vec::Vec<u8>,
    #[prost(string, tag="4")]
    pub total_units: ::prost::alloc::string::String,
    #[prost(string, tag="5")]
    pub total_units_issued: ::prost::alloc::string::String,
}
#[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Token {
    #[prost(string, tag="1")]
    pub id: ::prost::alloc::string::String,
    #[prost(string, tag="2")]
    pub tribute_dao: ::prost::alloc::string::String,
    #[prost(bytes="vec", tag="3")]
    pub token_address: ::prost::alloc::vec::Vec<u8>,
    #[prost(string, tag="4")]
    pub name: ::prost::alloc::string::String,
    #[prost(string, tag="5")]
    pub symbol: ::prost::alloc::string::String,
    #[prost(string, tag="6")]
    pub total_supply: ::prost::alloc::string::String,
}
#[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TokenHolder {
    #[prost(string, tag="1")]
    pub id: ::prost::alloc::string::String,
    #[prost(string, tag="2")]
    pub tribute_dao: ::prost::alloc::string::String,
    #[prost(bytes="vec", tag="3")]
    pub member_address: ::prost::alloc::vec::Vec<u8>,
    #[prost(string, tag="4")]
    pub token: ::prost::alloc::string::String,
    #[prost(string, tag="5")]
    pub balance: ::prost::alloc::string::String,
    #[prost(string, tag="6")]
    pub total_units: ::prost::alloc::string::String,
    #[prost(string, tag="7")]
    pub created_at: ::prost::alloc::string::String,
}
#[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Coupon {
    #[prost(string, tag="1")]
    pub id: ::prost::alloc::string::String,
    #[prost(string, tag="2")]
    pub tribute_dao: ::prost::alloc::string::String,
    #[prost(bytes="vec", tag="3")]
    pub authorized_member: ::prost::alloc::vec::Vec<u8>,
    #[prost(string, tag="4")]
    pub amount: ::prost::alloc::string::String,
    #[prost(string, tag="5")]
    pub nonce: ::prost::alloc::string::String,
    #[prost(string, tag="6")]
    pub redeemed_at: ::prost::alloc::string::String,
}
// @@protoc_insertion_point(module)
