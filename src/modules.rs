use std::convert::identity;

use substreams::store::{
    StoreGet, StoreGetString, StoreNew, StoreSet, StoreSetIfNotExists, StoreSetIfNotExistsString,
    StoreSetString,
};
use substreams_ethereum::{
    pb::eth::v2::{self as eth, Log},
    Event,
};

use crate::{
    abi::{bank_extension, coupon_onboarding, dao_factory, dao_registry},
    calls::RpcEthCall,
    consts::ExtensionIds,
    data_sources::Template,
    params::Config,
    prefetch::{data_source_key, data_source_registrations, record_reads, sponsorships, IndexState},
    pb::tribute::v1::{
        dao_event::Kind, AdapterAdded, AdapterRemoved, AddressConfigurationUpdated,
        ConfigurationUpdated, CouponRedeemed, DaoCreated, DaoEvent, EventMeta, Events,
        ExtensionAdded, ExtensionRemoved, NewBalance, ProcessedProposal, SponsoredProposal,
        SubmittedProposal, UpdateDelegateKey, Withdraw,
    },
};

#[substreams::handlers::map]
pub fn map_events(block: eth::Block) -> Result<Events, substreams::errors::Error> {
    Ok(decode_block(&block))
}

/// Every contract a DAOCreated or bank ExtensionAdded event asked to watch, keyed by
/// `{template}:{address}`.
#[substreams::handlers::store]
pub fn store_data_sources(events: Events, store: StoreSetIfNotExistsString) {
    for (ordinal, key, registered_by) in data_source_registrations(&ExtensionIds::default(), &events)
    {
        store.set_if_not_exists(ordinal, key, &registered_by);
    }
}

/// Last voting adapter each proposal was sponsored with.
#[substreams::handlers::store]
pub fn store_voting_adapters(events: Events, store: StoreSetString) {
    for (ordinal, proposal_id, voting_adapter) in sponsorships(&events) {
        store.set(ordinal, proposal_id, &voting_adapter);
    }
}

struct StoreIndexState {
    data_sources: StoreGetString,
    voting_adapters: StoreGetString,
}

impl IndexState for StoreIndexState {
    fn may_watch(&self, template: Template, address: &[u8]) -> bool {
        self.data_sources
            .has_last(data_source_key(template, address))
    }

    fn voting_adapter(&self, proposal_id: &str) -> Option<Vec<u8>> {
        let address = self.voting_adapters.get_last(proposal_id)?;
        hex::decode(address.trim_start_matches("0x")).ok()
    }
}

/// The block's events together with the contract reads indexing them needs.
#[substreams::handlers::map]
pub fn map_dao_events(
    params: String,
    events: Events,
    data_sources: StoreGetString,
    voting_adapters: StoreGetString,
) -> Result<Events, substreams::errors::Error> {
    let config = Config::from_params(&params)?;
    let state = StoreIndexState { data_sources, voting_adapters };
    let reads = record_reads(&config, &events, &state, &RpcEthCall)?;
    Ok(Events { reads, ..events })
}

/// Decodes every recognized log of the block's successful transactions, in log order.
pub fn decode_block(block: &eth::Block) -> Events {
    let timestamp = block
        .header
        .as_ref()
        .and_then(|header| header.timestamp.as_ref())
        .map(|timestamp| u64::try_from(timestamp.seconds).unwrap_or_default())
        .unwrap_or_default();

    let events = block
        .logs()
        .filter_map(|log| {
            decode_log(log.log).map(|kind| DaoEvent {
                meta: Some(EventMeta {
                    address: log.address().to_vec(),
                    tx_hash: log.receipt.transaction.hash.clone(),
                    tx_from: log.receipt.transaction.from.clone(),
                    block_number: block.number,
                    timestamp,
                    ordinal: log.ordinal(),
                }),
                kind: Some(kind),
            })
        })
        .collect();

    Events { events, reads: vec![] }
}

/// Decodes a log into the event it carries, whatever contract emitted it.
pub fn decode_log(log: &Log) -> Option<Kind> {
    [
        dao_registry::events::SubmittedProposal::match_and_decode(log).map(|e| {
            Kind::SubmittedProposal(SubmittedProposal {
                proposal_id: e.proposal_id.to_vec(),
                flags: e.flags.to_string(),
            })
        }),
        dao_registry::events::SponsoredProposal::match_and_decode(log).map(|e| {
            Kind::SponsoredProposal(SponsoredProposal {
                proposal_id: e.proposal_id.to_vec(),
                flags: e.flags.to_string(),
                voting_adapter: e.voting_adapter,
            })
        }),
        dao_registry::events::ProcessedProposal::match_and_decode(log).map(|e| {
            Kind::ProcessedProposal(ProcessedProposal {
                proposal_id: e.proposal_id.to_vec(),
                flags: e.flags.to_string(),
            })
        }),
        dao_registry::events::AdapterAdded::match_and_decode(log).map(|e| {
            Kind::AdapterAdded(AdapterAdded {
                adapter_id: e.adapter_id.to_vec(),
                adapter_address: e.adapter_address,
                flags: e.flags.to_string(),
            })
        }),
        dao_registry::events::AdapterRemoved::match_and_decode(log).map(|e| {
            Kind::AdapterRemoved(AdapterRemoved { adapter_id: e.adapter_id.to_vec() })
        }),
        dao_registry::events::ExtensionAdded::match_and_decode(log).map(|e| {
            Kind::ExtensionAdded(ExtensionAdded {
                extension_id: e.extension_id.to_vec(),
                extension_address: e.extension_address,
            })
        }),
        dao_registry::events::ExtensionRemoved::match_and_decode(log).map(|e| {
            Kind::ExtensionRemoved(ExtensionRemoved { extension_id: e.extension_id.to_vec() })
        }),
        dao_registry::events::UpdateDelegateKey::match_and_decode(log).map(|e| {
            Kind::UpdateDelegateKey(UpdateDelegateKey {
                member_address: e.member_address,
                new_delegate_key: e.new_delegate_key,
            })
        }),
        dao_registry::events::ConfigurationUpdated::match_and_decode(log).map(|e| {
            Kind::ConfigurationUpdated(ConfigurationUpdated {
                key: e.key.to_vec(),
                value: e.value.to_string(),
            })
        }),
        dao_registry::events::AddressConfigurationUpdated::match_and_decode(log).map(|e| {
            Kind::AddressConfigurationUpdated(AddressConfigurationUpdated {
                key: e.key.to_vec(),
                value: e.value,
            })
        }),
        bank_extension::events::NewBalance::match_and_decode(log).map(|e| {
            Kind::NewBalance(NewBalance {
                member: e.member,
                token_addr: e.token_addr,
                amount: e.amount.to_string(),
            })
        }),
        bank_extension::events::Withdraw::match_and_decode(log).map(|e| {
            Kind::Withdraw(Withdraw {
                account: e.account,
                token_addr: e.token_addr,
                amount: e.amount.to_string(),
            })
        }),
        coupon_onboarding::events::CouponRedeemed::match_and_decode(log).map(|e| {
            Kind::CouponRedeemed(CouponRedeemed {
                dao_address: e.dao_address,
                nonce: e.nonce.to_string(),
                authorized_member: e.authorized_member,
                amount: e.amount.to_string(),
            })
        }),
        dao_factory::events::DaoCreated::match_and_decode(log).map(|e| {
            Kind::DaoCreated(DaoCreated { dao_address: e.dao_address, name: e.name })
        }),
    ]
    .into_iter()
    .find_map(identity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{consts::keccak256, testing::*};
    use ethabi::{Token, Uint};
    use substreams_ethereum::pb::eth::v2::{
        BlockHeader, TransactionReceipt, TransactionTrace, TransactionTraceStatus,
    };

    fn raw_log(address: &[u8], signature: &str, params: &[Token], ordinal: u64) -> Log {
        Log {
            address: address.to_vec(),
            topics: vec![keccak256(signature.as_bytes()).to_vec()],
            data: ethabi::encode(params),
            ordinal,
            ..Default::default()
        }
    }

    fn address(raw: &[u8]) -> Token {
        Token::Address(ethabi::Address::from_slice(raw))
    }

    fn transaction(status: TransactionTraceStatus, logs: Vec<Log>) -> TransactionTrace {
        TransactionTrace {
            hash: vec![0x11; 32],
            from: SENDER.to_vec(),
            status: status as i32,
            receipt: Some(TransactionReceipt { logs, ..Default::default() }),
            ..Default::default()
        }
    }

    #[test]
    fn test_decode_submitted_proposal() {
        let log = raw_log(
            &DAO,
            "SubmittedProposal(bytes32,uint256)",
            &[Token::FixedBytes(bytes32(1).to_vec()), Token::Uint(Uint::from(5))],
            0,
        );

        assert_eq!(
            decode_log(&log),
            Some(Kind::SubmittedProposal(SubmittedProposal {
                proposal_id: bytes32(1).to_vec(),
                flags: "5".to_string(),
            }))
        );
    }

    #[test]
    fn test_decode_bank_and_factory_events() {
        let new_balance = raw_log(
            &BANK,
            "NewBalance(address,address,uint160)",
            &[address(&MEMBER), address(&crate::consts::UNITS), Token::Uint(Uint::from(42))],
            0,
        );
        let dao_created = raw_log(
            &FACTORY,
            "DAOCreated(address,string)",
            &[address(&OTHER_DAO), Token::String("muse0".to_string())],
            1,
        );

        assert_eq!(
            decode_log(&new_balance),
            Some(Kind::NewBalance(NewBalance {
                member: MEMBER.to_vec(),
                token_addr: crate::consts::UNITS.to_vec(),
                amount: "42".to_string(),
            }))
        );
        assert_eq!(
            decode_log(&dao_created),
            Some(Kind::DaoCreated(DaoCreated {
                dao_address: OTHER_DAO.to_vec(),
                name: "muse0".to_string(),
            }))
        );
    }

    #[test]
    fn test_unrecognized_log_is_ignored() {
        let log = raw_log(
            &DAO,
            "Transfer(address,address,uint256)",
            &[address(&MEMBER), address(&DELEGATE), Token::Uint(Uint::from(1))],
            0,
        );

        assert_eq!(decode_log(&log), None);
    }

    #[test]
    fn test_decode_block_keeps_log_order_and_metadata() {
        let block = eth::Block {
            number: BLOCK_NUMBER,
            transaction_traces: vec![
                transaction(
                    TransactionTraceStatus::Succeeded,
                    vec![
                        raw_log(
                            &DAO,
                            "AdapterRemoved(bytes32)",
                            &[Token::FixedBytes(bytes32(2).to_vec())],
                            3,
                        ),
                        raw_log(
                            &DAO,
                            "UpdateDelegateKey(address,address)",
                            &[address(&MEMBER), address(&DELEGATE)],
                            4,
                        ),
                    ],
                ),
                transaction(
                    TransactionTraceStatus::Reverted,
                    vec![raw_log(
                        &DAO,
                        "ExtensionRemoved(bytes32)",
                        &[Token::FixedBytes(bytes32(3).to_vec())],
                        5,
                    )],
                ),
            ],
            ..Default::default()
        };

        let events = decode_block(&block).events;

        assert_eq!(events.len(), 2);
        assert!(matches!(events[0].kind, Some(Kind::AdapterRemoved(_))));
        assert!(matches!(events[1].kind, Some(Kind::UpdateDelegateKey(_))));
        let meta = events[1].meta.as_ref().unwrap();
        assert_eq!(meta.address, DAO.to_vec());
        assert_eq!(meta.tx_from, SENDER.to_vec());
        assert_eq!(meta.block_number, BLOCK_NUMBER);
        assert_eq!(meta.ordinal, 4);
    }

    #[test]
    fn test_pre_epoch_timestamp_decodes_as_zero() {
        let block = eth::Block {
            number: BLOCK_NUMBER,
            header: Some(BlockHeader {
                timestamp: Some(prost_types::Timestamp { seconds: -5, nanos: 0 }),
                ..Default::default()
            }),
            transaction_traces: vec![transaction(
                TransactionTraceStatus::Succeeded,
                vec![raw_log(
                    &DAO,
                    "AdapterRemoved(bytes32)",
                    &[Token::FixedBytes(bytes32(2).to_vec())],
                    0,
                )],
            )],
            ..Default::default()
        };

        let events = decode_block(&block);

        assert_eq!(events.events[0].meta.as_ref().unwrap().timestamp, 0);
        assert!(events.reads.is_empty());
    }
}
