use anyhow::{Context, Result};
use prost::Message;
use substreams::log;
use substreams_entity_change::{pb::entity::EntityChanges, tables::Tables};

use crate::{
    calls::RecordedCalls,
    contracts::{AbiContractReader, ContractReader},
    data_sources::{
        DataSourceRegistry, DataSources, Template, WATCHED_CONTRACTS_ID, WATCHED_CONTRACTS_TYPE,
    },
    entities::{write_delta, EntityDelta},
    events::{event_name, event_source, handle_event, EventSource, HandlerContext},
    identifiers::to_hex,
    params::Config,
    pb::tribute::v1::{DaoEvent, Events, WatchedContracts},
    store::{EntityStore, StagedStore},
};

/// Applies decoded events to an entity store, block by block, and reports the net entity
/// changes of every block.
pub struct Indexer<S: EntityStore> {
    config: Config,
    store: S,
    data_sources: DataSources,
}

impl<S: EntityStore> Indexer<S> {
    /// Opens an indexer over `store`, watching the configured DAOs and every contract an earlier
    /// block registered.
    pub fn new(config: Config, store: S) -> Result<Self> {
        let mut data_sources = DataSources::new(&config.daos);
        if let Some(raw) = store.get(WATCHED_CONTRACTS_TYPE, WATCHED_CONTRACTS_ID) {
            let record = WatchedContracts::decode(raw.as_slice())
                .context("failed to decode the watched contracts")?;
            data_sources.restore(&record)?;
        }
        Ok(Self { config, store, data_sources })
    }

    pub fn from_params(params: &str, store: S) -> Result<Self> {
        Self::new(Config::from_params(params)?, store)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn data_sources(&self) -> &DataSources {
        &self.data_sources
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn watch(&mut self, template: Template, address: &[u8]) {
        self.data_sources.create(template, address);
        self.persist_data_sources();
    }

    fn persist_data_sources(&mut self) {
        self.store.put(
            WATCHED_CONTRACTS_TYPE,
            WATCHED_CONTRACTS_ID,
            self.data_sources.to_record().encode_to_vec(),
        );
    }

    /// Handles a block of `map_dao_events` output, answering contract reads from the calls
    /// recorded with it.
    pub fn process_recorded(&mut self, events: &Events) -> Result<EntityChanges> {
        let reader = AbiContractReader::new(RecordedCalls::new(&events.reads));
        self.process_events(events, &reader)
    }

    /// Handles the events of one block in order.
    ///
    /// The block commits as a whole. When an event fails, the store and the watched contracts
    /// are left as they were before the block and no change is reported.
    pub fn process_events(
        &mut self,
        events: &Events,
        reader: &dyn ContractReader,
    ) -> Result<EntityChanges> {
        let mut data_sources = self.data_sources.clone();
        let mut staged = StagedStore::new(&self.store);
        for event in &events.events {
            process_event(&self.config, &mut data_sources, &mut staged, reader, event)?;
        }
        let writes = staged.into_writes();

        let mut tables = Tables::new();
        for ((entity_type, id), value) in &writes {
            let existed = self.store.get(entity_type, id).is_some();
            write_delta(
                &mut tables,
                &EntityDelta { entity_type, id, existed, value: value.as_deref() },
            )?;
        }

        for ((entity_type, id), value) in writes {
            match value {
                Some(value) => self.store.put(&entity_type, &id, value),
                None => self.store.delete(&entity_type, &id),
            }
        }
        if data_sources != self.data_sources {
            self.data_sources = data_sources;
            self.persist_data_sources();
        }
        Ok(tables.to_entity_changes())
    }
}

fn is_routed(config: &Config, data_sources: &DataSources, event: &DaoEvent) -> bool {
    let (Some(meta), Some(kind)) = (&event.meta, &event.kind) else {
        return false;
    };
    match event_source(kind) {
        EventSource::DaoRegistry => data_sources.is_watched(Template::DaoRegistry, &meta.address),
        EventSource::BankExtension => {
            data_sources.is_watched(Template::BankExtension, &meta.address)
        }
        EventSource::CouponOnboarding => config.is_coupon_onboarding(&meta.address),
        EventSource::DaoFactory => config.is_dao_factory(&meta.address),
    }
}

fn process_event<S: EntityStore>(
    config: &Config,
    data_sources: &mut DataSources,
    store: &mut StagedStore<'_, S>,
    reader: &dyn ContractReader,
    event: &DaoEvent,
) -> Result<()> {
    let meta = event
        .meta
        .as_ref()
        .context("event without metadata")?;
    let kind = event
        .kind
        .as_ref()
        .with_context(|| format!("event without a kind at ordinal {}", meta.ordinal))?;

    if !is_routed(config, data_sources, event) {
        log::debug!("Skipping {} from unwatched {}", event_name(kind), to_hex(&meta.address));
        return Ok(());
    }

    let mut ctx = HandlerContext { config, meta, store, reader, data_sources };
    handle_event(kind, &mut ctx).with_context(|| {
        format!(
            "{} from {} failed at block {} ordinal {}",
            event_name(kind),
            to_hex(&meta.address),
            meta.block_number,
            meta.ordinal
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        consts::{BANK_EXTENSION_ID, GUILD, TOTAL, UNITS},
        contracts::{VotingAdapterKind, VotingResult},
        identifiers::{adapter_id, bank_id, dao_id, extension_id, member_id, proposal_id, vote_id},
        pb::tribute::v1::{
            dao_event::Kind, Adapter, AdapterAdded, AdapterRemoved, Bank, DaoCreated,
            ExtensionAdded, Member, NewBalance, ProcessedProposal, Proposal, SponsoredProposal,
            SubmittedProposal, TributeDao, Vote,
        },
        store::{EntityStoreExt, MemoryStore},
        testing::*,
    };
    use substreams_entity_change::pb::entity::entity_change::Operation;

    fn indexer() -> Indexer<MemoryStore> {
        Indexer::new(test_config(), MemoryStore::new()).unwrap()
    }

    fn block(events: Vec<DaoEvent>) -> Events {
        Events { events, reads: vec![] }
    }

    fn operations(changes: &EntityChanges) -> Vec<(String, String, i32)> {
        let mut ops: Vec<_> = changes
            .entity_changes
            .iter()
            .map(|change| (change.entity.clone(), change.id.clone(), change.operation))
            .collect();
        ops.sort();
        ops
    }

    fn submitted(n: u8) -> Kind {
        Kind::SubmittedProposal(SubmittedProposal {
            proposal_id: bytes32(n).to_vec(),
            flags: "1".to_string(),
        })
    }

    fn sponsored(n: u8) -> Kind {
        Kind::SponsoredProposal(SponsoredProposal {
            proposal_id: bytes32(n).to_vec(),
            flags: "3".to_string(),
            voting_adapter: VOTING_ADAPTER.to_vec(),
        })
    }

    fn processed(n: u8) -> Kind {
        Kind::ProcessedProposal(ProcessedProposal {
            proposal_id: bytes32(n).to_vec(),
            flags: "7".to_string(),
        })
    }

    fn adapter_added(n: u8) -> Kind {
        Kind::AdapterAdded(AdapterAdded {
            adapter_id: bytes32(n).to_vec(),
            adapter_address: ADAPTER.to_vec(),
            flags: "1".to_string(),
        })
    }

    fn bank_added() -> Kind {
        Kind::ExtensionAdded(ExtensionAdded {
            extension_id: BANK_EXTENSION_ID.to_vec(),
            extension_address: BANK.to_vec(),
        })
    }

    fn new_balance(member: &[u8]) -> Kind {
        Kind::NewBalance(NewBalance {
            member: member.to_vec(),
            token_addr: UNITS.to_vec(),
            amount: "100".to_string(),
        })
    }

    fn dao_created(dao: &[u8]) -> Kind {
        Kind::DaoCreated(DaoCreated { dao_address: dao.to_vec(), name: "muse0".to_string() })
    }

    fn voting_reader() -> MockContractReader {
        MockContractReader::default()
            .with_proposal(&DAO, bytes32(1), &ADAPTER, 1)
            .with_inverse_adapter(&DAO, &ADAPTER, bytes32(0xad), 255)
            .with_adapter_name(&VOTING_ADAPTER, "VotingContract")
            .with_votes(
                &VOTING_ADAPTER,
                bytes32(1),
                VotingAdapterKind::OnChain,
                VotingResult::OnChain {
                    nb_yes: big(7),
                    nb_no: big(2),
                    starting_time: big(100),
                    block_number: big(50),
                },
            )
            .with_vote_state(&VOTING_ADAPTER, bytes32(1), 2)
    }

    fn bank_reader() -> MockContractReader {
        MockContractReader::default()
            .with_bank(&BANK, &DAO)
            .with_bank_balance(&BANK, &MEMBER, &UNITS, 100)
            .with_bank_balance(&BANK, &TOTAL, &UNITS, 100)
            .with_bank_balance(&BANK, &GUILD, &UNITS, 0)
    }

    #[test]
    fn test_proposal_lifecycle_across_blocks() {
        let reader = voting_reader();
        let mut indexer = indexer();
        let proposal_key = proposal_id(&DAO, &bytes32(1));

        let changes = indexer
            .process_events(&block(vec![event(&DAO, submitted(1))]), &reader)
            .unwrap();
        assert_eq!(
            operations(&changes),
            vec![("Proposal".to_string(), proposal_key.clone(), Operation::Create as i32)]
        );
        let proposal = indexer
            .store()
            .load::<Proposal>(&proposal_key)
            .unwrap()
            .unwrap();
        assert!(!proposal.sponsored && !proposal.processed);

        let changes = indexer
            .process_events(&block(vec![event(&DAO, sponsored(1))]), &reader)
            .unwrap();
        assert_eq!(
            operations(&changes),
            vec![("Proposal".to_string(), proposal_key.clone(), Operation::Update as i32)]
        );

        let changes = indexer
            .process_events(&block(vec![event(&DAO, processed(1))]), &reader)
            .unwrap();
        let vote_key = vote_id(&DAO, &bytes32(1));
        assert_eq!(
            operations(&changes),
            vec![
                ("Proposal".to_string(), proposal_key.clone(), Operation::Update as i32),
                ("Vote".to_string(), vote_key.clone(), Operation::Create as i32),
            ]
        );

        let proposal = indexer
            .store()
            .load::<Proposal>(&proposal_key)
            .unwrap()
            .unwrap();
        assert!(proposal.sponsored);
        assert!(proposal.processed);
        assert_eq!(proposal.nb_yes, "7");
        assert_eq!(proposal.nb_no, "2");
        assert_eq!(proposal.voting_state, "2");
        assert_eq!(proposal.voting_result, vote_key);
        assert_eq!(
            proposal.voting_result,
            "0x0000000000000000000000000000000000000da0-vote-0x0000000000000000000000000000000000000000000000000000000000000001"
        );
    }

    #[test]
    fn test_replayed_processed_event_keeps_one_vote() {
        let reader = voting_reader();
        let mut indexer = indexer();
        indexer
            .process_events(
                &block(vec![
                    event(&DAO, submitted(1)),
                    event(&DAO, sponsored(1)),
                    event(&DAO, processed(1)),
                ]),
                &reader,
            )
            .unwrap();

        let changes = indexer
            .process_events(
                &block(vec![event(&DAO, processed(1)), event(&DAO, processed(1))]),
                &reader,
            )
            .unwrap();

        assert_eq!(indexer.store().count("Vote"), 1);
        assert_eq!(
            changes
                .entity_changes
                .iter()
                .filter(|change| change.entity == "Vote")
                .count(),
            1
        );
        let vote = indexer
            .store()
            .load::<Vote>(&vote_id(&DAO, &bytes32(1)))
            .unwrap()
            .unwrap();
        assert_eq!((vote.nb_yes.as_str(), vote.nb_no.as_str()), ("7", "2"));
    }

    #[test]
    fn test_reverted_votes_leave_prior_tallies() {
        let reader = MockContractReader::default()
            .with_adapter_name(&VOTING_ADAPTER, "VotingContract");
        let mut indexer = indexer();

        indexer
            .process_events(
                &block(vec![
                    event(&DAO, submitted(1)),
                    event(&DAO, sponsored(1)),
                    event(&DAO, processed(1)),
                ]),
                &reader,
            )
            .unwrap();

        let proposal = indexer
            .store()
            .load::<Proposal>(&proposal_id(&DAO, &bytes32(1)))
            .unwrap()
            .unwrap();
        assert!(proposal.processed);
        assert_eq!(proposal.nb_yes, "");
        assert_eq!(proposal.nb_no, "");
    }

    #[test]
    fn test_unwatched_contracts_are_skipped() {
        let mut indexer = indexer();

        let changes = indexer
            .process_events(
                &block(vec![
                    event(&OTHER_DAO, submitted(1)),
                    event(&DAO, dao_created(&OTHER_DAO)),
                    event(&BANK, new_balance(&MEMBER)),
                ]),
                &voting_reader(),
            )
            .unwrap();

        assert!(changes.entity_changes.is_empty());
        assert!(indexer.store().is_empty());
    }

    #[test]
    fn test_dao_created_routes_later_logs_of_the_block() {
        let reader = MockContractReader::default()
            .with_proposal(&OTHER_DAO, bytes32(1), &ADAPTER, 1);
        let mut indexer = indexer();

        indexer
            .process_events(
                &block(vec![
                    event(&FACTORY, dao_created(&OTHER_DAO)),
                    event(&OTHER_DAO, submitted(1)),
                ]),
                &reader,
            )
            .unwrap();

        assert!(indexer
            .data_sources()
            .is_watched(Template::DaoRegistry, &OTHER_DAO));
        let proposal = indexer
            .store()
            .load::<Proposal>(&proposal_id(&OTHER_DAO, &bytes32(1)))
            .unwrap()
            .unwrap();
        assert_eq!(proposal.adapter_address, ADAPTER.to_vec());
        assert_eq!(
            indexer
                .store()
                .load::<TributeDao>(&dao_id(&OTHER_DAO))
                .unwrap()
                .unwrap()
                .name,
            "muse0"
        );
    }

    #[test]
    fn test_bank_extension_is_watched_once_added() {
        let mut indexer = indexer();

        let changes = indexer
            .process_events(
                &block(vec![event(&DAO, bank_added()), event(&BANK, new_balance(&MEMBER))]),
                &bank_reader(),
            )
            .unwrap();

        assert_eq!(
            operations(&changes),
            vec![
                ("Bank".to_string(), bank_id(&DAO, &BANK), Operation::Create as i32),
                (
                    "Extension".to_string(),
                    extension_id(&DAO, &BANK_EXTENSION_ID),
                    Operation::Create as i32
                ),
                ("Member".to_string(), member_id(&DAO, &MEMBER), Operation::Create as i32),
                ("TributeDao".to_string(), dao_id(&DAO), Operation::Create as i32),
            ]
        );
        let bank = indexer
            .store()
            .load::<Bank>(&bank_id(&DAO, &BANK))
            .unwrap()
            .unwrap();
        assert_eq!(bank.total_units, "100");
        assert_eq!(bank.total_units_issued, "100");
        let member = indexer
            .store()
            .load::<Member>(&member_id(&DAO, &MEMBER))
            .unwrap()
            .unwrap();
        assert_eq!(member.units, "100");
    }

    #[test]
    fn test_registered_contracts_survive_a_restart() {
        let mut indexer = indexer();
        indexer
            .process_events(
                &block(vec![
                    event(&DAO, bank_added()),
                    event(&FACTORY, dao_created(&OTHER_DAO)),
                ]),
                &MockContractReader::default(),
            )
            .unwrap();

        let mut restarted = Indexer::new(test_config(), indexer.into_store()).unwrap();

        assert!(restarted
            .data_sources()
            .is_watched(Template::BankExtension, &BANK));
        assert!(restarted
            .data_sources()
            .is_watched(Template::DaoRegistry, &OTHER_DAO));
        let changes = restarted
            .process_events(&block(vec![event(&BANK, new_balance(&MEMBER))]), &bank_reader())
            .unwrap();
        assert!(changes
            .entity_changes
            .iter()
            .any(|change| change.entity == "Member"
                && change.operation == Operation::Create as i32));
        assert_eq!(
            restarted
                .store()
                .load::<Member>(&member_id(&DAO, &MEMBER))
                .unwrap()
                .unwrap()
                .units,
            "100"
        );
    }

    #[test]
    fn test_watch_list_is_not_reported_as_a_change() {
        let mut indexer = indexer();

        let changes = indexer
            .process_events(
                &block(vec![event(&FACTORY, dao_created(&OTHER_DAO))]),
                &MockContractReader::default(),
            )
            .unwrap();

        assert_eq!(
            operations(&changes),
            vec![("TributeDao".to_string(), dao_id(&OTHER_DAO), Operation::Create as i32)]
        );
    }

    #[test]
    fn test_corrupt_watch_list_is_an_error() {
        let mut store = MemoryStore::new();
        store.put(WATCHED_CONTRACTS_TYPE, WATCHED_CONTRACTS_ID, vec![0xff, 0xff, 0xff]);

        assert!(Indexer::new(test_config(), store).is_err());
    }

    #[test]
    fn test_add_and_remove_in_one_block_emits_nothing() {
        let mut indexer = indexer();
        let reader = MockContractReader::default();
        let added = event(&DAO, adapter_added(1));
        let removed = event(
            &DAO,
            Kind::AdapterRemoved(AdapterRemoved { adapter_id: bytes32(1).to_vec() }),
        );

        let changes = indexer
            .process_events(&block(vec![added.clone(), removed.clone()]), &reader)
            .unwrap();
        assert!(changes.entity_changes.is_empty());

        indexer
            .process_events(&block(vec![added]), &reader)
            .unwrap();
        let changes = indexer
            .process_events(&block(vec![removed]), &reader)
            .unwrap();
        assert_eq!(
            operations(&changes),
            vec![("Adapter".to_string(), adapter_id(&DAO, &bytes32(1)), Operation::Delete as i32)]
        );
        assert!(indexer
            .store()
            .load::<Adapter>(&adapter_id(&DAO, &bytes32(1)))
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_failing_event_aborts_the_whole_block() {
        let reader = MockContractReader::default();
        let mut store = MemoryStore::new();
        store.put("Extension", &extension_id(&DAO, &bytes32(9)), vec![0xff, 0xff, 0xff]);
        let mut indexer = Indexer::new(test_config(), store).unwrap();

        let result = indexer.process_events(
            &block(vec![
                event(&DAO, adapter_added(1)),
                event(&FACTORY, dao_created(&OTHER_DAO)),
                event(
                    &DAO,
                    Kind::ExtensionAdded(ExtensionAdded {
                        extension_id: bytes32(9).to_vec(),
                        extension_address: BANK.to_vec(),
                    }),
                ),
            ]),
            &reader,
        );

        assert!(result.is_err());
        assert_eq!(indexer.store().count("Adapter"), 0);
        assert_eq!(indexer.store().count("TributeDao"), 0);
        assert!(!indexer
            .data_sources()
            .is_watched(Template::DaoRegistry, &OTHER_DAO));

        // the adapter is still new to whoever consumes the changes
        let changes = indexer
            .process_events(&block(vec![event(&DAO, adapter_added(1))]), &reader)
            .unwrap();
        assert_eq!(
            operations(&changes),
            vec![("Adapter".to_string(), adapter_id(&DAO, &bytes32(1)), Operation::Create as i32)]
        );
    }

    #[test]
    fn test_event_without_metadata_is_fatal() {
        let mut indexer = indexer();

        let result = indexer.process_events(
            &block(vec![DaoEvent { meta: None, kind: Some(submitted(1)) }]),
            &MockContractReader::default(),
        );

        assert!(result.is_err());
    }

    #[test]
    fn test_from_params_seeds_watched_daos() {
        let indexer = Indexer::from_params(
            "daos=0x0000000000000000000000000000000000000DA0",
            MemoryStore::new(),
        )
        .unwrap();

        assert!(indexer
            .data_sources()
            .is_watched(Template::DaoRegistry, &DAO));
        assert!(indexer.into_store().is_empty());
    }
}
