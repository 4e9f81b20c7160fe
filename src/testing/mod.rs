//! Test doubles and fixtures shared by the handler and indexer tests.

use std::collections::HashMap;

use anyhow::Result;
use substreams::{hex, scalar::BigInt};

use crate::{
    consts::Address,
    contracts::{ContractReader, VotingAdapterKind, VotingResult},
    data_sources::{DataSources, Template},
    events::{handle_event, HandlerContext},
    params::Config,
    pb::tribute::v1::{dao_event::Kind, DaoEvent, EventMeta},
    store::MemoryStore,
};

pub const DAO: Address = hex!("0000000000000000000000000000000000000DA0");
pub const OTHER_DAO: Address = hex!("0000000000000000000000000000000000000DA1");
pub const FACTORY: Address = hex!("00000000000000000000000000000000000000F1");
pub const COUPONS: Address = hex!("00000000000000000000000000000000000000C1");
pub const ADAPTER: Address = hex!("0000000000000000000000000000000000000AD1");
pub const VOTING_ADAPTER: Address = hex!("00000000000000000000000000000000000000E1");
pub const BANK: Address = hex!("000000000000000000000000000000000000BA01");
pub const ERC20_TOKEN: Address = hex!("000000000000000000000000000000000000E020");
pub const SENDER: Address = hex!("00000000000000000000000000000000000000A0");
pub const MEMBER: Address = hex!("00000000000000000000000000000000000000A1");
pub const DELEGATE: Address = hex!("00000000000000000000000000000000000000A2");

pub const TIMESTAMP: u64 = 1_650_000_000;
pub const BLOCK_NUMBER: u64 = 14_000_000;

pub fn bytes32(n: u8) -> [u8; 32] {
    let mut out = [0u8; 32];
    out[31] = n;
    out
}

pub fn big(n: u64) -> BigInt {
    BigInt::from(n)
}

pub fn test_config() -> Config {
    Config {
        dao_factory: Some(FACTORY),
        daos: vec![DAO],
        coupon_onboarding: vec![COUPONS],
        ..Config::default()
    }
}

pub fn meta(address: &[u8]) -> EventMeta {
    EventMeta {
        address: address.to_vec(),
        tx_hash: vec![0x11; 32],
        tx_from: SENDER.to_vec(),
        block_number: BLOCK_NUMBER,
        timestamp: TIMESTAMP,
        ordinal: 0,
    }
}

pub fn event(address: &[u8], kind: Kind) -> DaoEvent {
    DaoEvent { meta: Some(meta(address)), kind: Some(kind) }
}

/// Contract reader answering from fixed tables. Anything not configured reverts.
#[derive(Debug, Default)]
pub struct MockContractReader {
    pub proposals: HashMap<(Vec<u8>, [u8; 32]), (Vec<u8>, BigInt)>,
    pub inverse_adapters: HashMap<(Vec<u8>, Vec<u8>), ([u8; 32], BigInt)>,
    pub extensions: HashMap<(Vec<u8>, [u8; 32]), Vec<u8>>,
    pub bank_daos: HashMap<Vec<u8>, Vec<u8>>,
    pub bank_balances: HashMap<(Vec<u8>, Vec<u8>, Vec<u8>), BigInt>,
    pub erc20_tokens: HashMap<Vec<u8>, (String, String, BigInt)>,
    pub erc20_balances: HashMap<(Vec<u8>, Vec<u8>), BigInt>,
    pub adapter_names: HashMap<Vec<u8>, String>,
    /// Keyed by adapter and proposal. The result is only returned when queried with the
    /// matching kind, as a mismatched layout would fail to decode.
    pub votes: HashMap<(Vec<u8>, [u8; 32]), (VotingAdapterKind, VotingResult)>,
    pub vote_states: HashMap<(Vec<u8>, [u8; 32]), BigInt>,
}

impl MockContractReader {
    pub fn with_proposal(
        mut self,
        dao: &[u8],
        proposal_id: [u8; 32],
        adapter: &[u8],
        flags: u64,
    ) -> Self {
        self.proposals
            .insert((dao.to_vec(), proposal_id), (adapter.to_vec(), big(flags)));
        self
    }

    pub fn with_inverse_adapter(
        mut self,
        dao: &[u8],
        adapter: &[u8],
        adapter_id: [u8; 32],
        acl: u64,
    ) -> Self {
        self.inverse_adapters
            .insert((dao.to_vec(), adapter.to_vec()), (adapter_id, big(acl)));
        self
    }

    pub fn with_extension(mut self, dao: &[u8], extension_id: [u8; 32], address: &[u8]) -> Self {
        self.extensions
            .insert((dao.to_vec(), extension_id), address.to_vec());
        self
    }

    pub fn with_bank(mut self, bank: &[u8], dao: &[u8]) -> Self {
        self.bank_daos
            .insert(bank.to_vec(), dao.to_vec());
        self
    }

    pub fn with_bank_balance(mut self, bank: &[u8], member: &[u8], token: &[u8], n: u64) -> Self {
        self.bank_balances
            .insert((bank.to_vec(), member.to_vec(), token.to_vec()), big(n));
        self
    }

    pub fn with_erc20(mut self, token: &[u8], name: &str, symbol: &str, total_supply: u64) -> Self {
        self.erc20_tokens.insert(
            token.to_vec(),
            (name.to_string(), symbol.to_string(), big(total_supply)),
        );
        self
    }

    pub fn with_erc20_balance(mut self, token: &[u8], account: &[u8], n: u64) -> Self {
        self.erc20_balances
            .insert((token.to_vec(), account.to_vec()), big(n));
        self
    }

    pub fn with_adapter_name(mut self, adapter: &[u8], name: &str) -> Self {
        self.adapter_names
            .insert(adapter.to_vec(), name.to_string());
        self
    }

    pub fn with_votes(
        mut self,
        adapter: &[u8],
        proposal_id: [u8; 32],
        kind: VotingAdapterKind,
        result: VotingResult,
    ) -> Self {
        self.votes
            .insert((adapter.to_vec(), proposal_id), (kind, result));
        self
    }

    pub fn with_vote_state(mut self, adapter: &[u8], proposal_id: [u8; 32], state: u64) -> Self {
        self.vote_states
            .insert((adapter.to_vec(), proposal_id), big(state));
        self
    }
}

impl ContractReader for MockContractReader {
    fn proposal(&self, dao: &[u8], proposal_id: &[u8; 32]) -> Option<(Vec<u8>, BigInt)> {
        self.proposals
            .get(&(dao.to_vec(), *proposal_id))
            .cloned()
    }

    fn inverse_adapter(&self, dao: &[u8], adapter: &[u8]) -> Option<([u8; 32], BigInt)> {
        self.inverse_adapters
            .get(&(dao.to_vec(), adapter.to_vec()))
            .cloned()
    }

    fn extension_address(&self, dao: &[u8], extension_id: &[u8; 32]) -> Option<Vec<u8>> {
        self.extensions
            .get(&(dao.to_vec(), *extension_id))
            .cloned()
    }

    fn bank_dao(&self, bank: &[u8]) -> Option<Vec<u8>> {
        self.bank_daos.get(bank).cloned()
    }

    fn bank_balance(&self, bank: &[u8], member: &[u8], token: &[u8]) -> Option<BigInt> {
        self.bank_balances
            .get(&(bank.to_vec(), member.to_vec(), token.to_vec()))
            .cloned()
    }

    fn erc20_name(&self, token: &[u8]) -> Option<String> {
        self.erc20_tokens
            .get(token)
            .map(|(name, _, _)| name.clone())
    }

    fn erc20_symbol(&self, token: &[u8]) -> Option<String> {
        self.erc20_tokens
            .get(token)
            .map(|(_, symbol, _)| symbol.clone())
    }

    fn erc20_total_supply(&self, token: &[u8]) -> Option<BigInt> {
        self.erc20_tokens
            .get(token)
            .map(|(_, _, supply)| supply.clone())
    }

    fn erc20_balance(&self, token: &[u8], account: &[u8]) -> Option<BigInt> {
        self.erc20_balances
            .get(&(token.to_vec(), account.to_vec()))
            .cloned()
    }

    fn adapter_name(&self, adapter: &[u8]) -> Option<String> {
        self.adapter_names.get(adapter).cloned()
    }

    fn votes(
        &self,
        kind: VotingAdapterKind,
        adapter: &[u8],
        _dao: &[u8],
        proposal_id: &[u8; 32],
    ) -> Option<VotingResult> {
        self.votes
            .get(&(adapter.to_vec(), *proposal_id))
            .filter(|(expected, _)| *expected == kind)
            .map(|(_, result)| result.clone())
    }

    fn vote_state(
        &self,
        _kind: VotingAdapterKind,
        adapter: &[u8],
        _dao: &[u8],
        proposal_id: &[u8; 32],
    ) -> Option<BigInt> {
        self.vote_states
            .get(&(adapter.to_vec(), *proposal_id))
            .cloned()
    }
}

/// Runs single events through their handler against an in-memory store, without routing.
pub struct Harness {
    pub config: Config,
    pub store: MemoryStore,
    pub reader: MockContractReader,
    pub data_sources: DataSources,
}

impl Harness {
    pub fn new(reader: MockContractReader) -> Self {
        Self {
            config: test_config(),
            store: MemoryStore::new(),
            reader,
            data_sources: DataSources::default(),
        }
    }

    pub fn handle(&mut self, event: &DaoEvent) -> Result<()> {
        let meta = event
            .meta
            .as_ref()
            .expect("event has metadata");
        let kind = event.kind.as_ref().expect("event has a kind");
        let mut ctx = HandlerContext {
            config: &self.config,
            meta,
            store: &mut self.store,
            reader: &self.reader,
            data_sources: &mut self.data_sources,
        };
        handle_event(kind, &mut ctx)
    }

    /// Every address the handled events asked to watch.
    pub fn watched(&self) -> Vec<(Template, Vec<u8>)> {
        [Template::DaoRegistry, Template::BankExtension]
            .into_iter()
            .flat_map(|template| {
                self.data_sources
                    .addresses(template)
                    .map(move |address| (template, address.to_vec()))
            })
            .collect()
    }
}
