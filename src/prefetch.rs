//! Captures the contract reads the indexer makes for a block, inside the wasm runtime where
//! `eth_call` is served. The sink replays them with [`crate::calls::RecordedCalls`].

use anyhow::Result;

use crate::{
    calls::{EthCall, RecordingEthCall},
    consts::{ExtensionIds, ExtensionKind},
    contracts::AbiContractReader,
    data_sources::Template,
    events::to_bytes32,
    identifiers::{dao_id, proposal_id, to_hex},
    indexer::Indexer,
    params::Config,
    pb::tribute::v1::{dao_event::Kind, ContractRead, DaoEvent, EventMeta, Events, Proposal},
    store::{EntityStoreExt, MemoryStore},
};

/// State kept by the substreams stores between blocks.
///
/// Only the state that decides which calls the handlers make is tracked. Registrations are a
/// superset of what the indexer watches, which costs extra calls but never misses one.
pub trait IndexState {
    fn may_watch(&self, template: Template, address: &[u8]) -> bool;

    /// Voting adapter the proposal was last sponsored with.
    fn voting_adapter(&self, proposal_id: &str) -> Option<Vec<u8>>;
}

pub fn data_source_key(template: Template, address: &[u8]) -> String {
    format!("{}:{}", template.name(), to_hex(address))
}

fn with_meta(event: &DaoEvent) -> Option<(&EventMeta, &Kind)> {
    Some((event.meta.as_ref()?, event.kind.as_ref()?))
}

/// `(ordinal, key, registering address)` for every registration the block may make.
pub fn data_source_registrations(
    extensions: &ExtensionIds,
    events: &Events,
) -> Vec<(u64, String, String)> {
    events
        .events
        .iter()
        .filter_map(with_meta)
        .filter_map(|(meta, kind)| {
            let key = match kind {
                Kind::DaoCreated(created) => {
                    data_source_key(Template::DaoRegistry, &created.dao_address)
                }
                Kind::ExtensionAdded(added)
                    if extensions.kind_of(&added.extension_id) == Some(ExtensionKind::Bank) =>
                {
                    data_source_key(Template::BankExtension, &added.extension_address)
                }
                _ => return None,
            };
            Some((meta.ordinal, key, to_hex(&meta.address)))
        })
        .collect()
}

/// `(ordinal, proposal id, voting adapter)` for every sponsorship in the block.
pub fn sponsorships(events: &Events) -> Vec<(u64, String, String)> {
    events
        .events
        .iter()
        .filter_map(with_meta)
        .filter_map(|(meta, kind)| match kind {
            Kind::SponsoredProposal(sponsored) => {
                let raw_id = to_bytes32(&sponsored.proposal_id).ok()?;
                Some((
                    meta.ordinal,
                    proposal_id(&meta.address, &raw_id),
                    to_hex(&sponsored.voting_adapter),
                ))
            }
            _ => None,
        })
        .collect()
}

/// Runs the block through a scratch indexer seeded from `state` and returns every call it made.
pub fn record_reads<C: EthCall>(
    config: &Config,
    events: &Events,
    state: &impl IndexState,
    calls: &C,
) -> Result<Vec<ContractRead>> {
    let mut store = MemoryStore::new();
    for (meta, kind) in events.events.iter().filter_map(with_meta) {
        let Kind::ProcessedProposal(processed) = kind else {
            continue;
        };
        let Ok(raw_id) = to_bytes32(&processed.proposal_id) else {
            continue;
        };
        let id = proposal_id(&meta.address, &raw_id);
        if let Some(voting_adapter) = state.voting_adapter(&id) {
            store.save(&Proposal {
                id,
                tribute_dao: dao_id(&meta.address),
                proposal_id: raw_id.to_vec(),
                voting_adapter,
                ..Default::default()
            });
        }
    }

    let mut indexer = Indexer::new(config.clone(), store)?;
    for meta in events.events.iter().filter_map(|event| event.meta.as_ref()) {
        for template in [Template::DaoRegistry, Template::BankExtension] {
            if state.may_watch(template, &meta.address) {
                indexer.watch(template, &meta.address);
            }
        }
    }

    let reader = AbiContractReader::new(RecordingEthCall::new(calls));
    indexer.process_events(events, &reader)?;
    Ok(reader.into_inner().into_reads())
}
