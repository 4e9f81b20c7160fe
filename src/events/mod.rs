use anyhow::{anyhow, Result};

use crate::{
    contracts::ContractReader,
    data_sources::{DataSourceRegistry, Template},
    params::Config,
    pb::tribute::v1::{dao_event::Kind, EventMeta},
    store::{Entity, EntityStore, EntityStoreExt},
};

pub mod bank;
pub mod coupons;
pub mod extension_entities;
pub mod factory;
pub mod members;
pub mod proposals;
pub mod registry;
pub mod vote_results;

/// Everything a handler may touch while reconciling one event.
pub struct HandlerContext<'a> {
    pub config: &'a Config,
    pub meta: &'a EventMeta,
    pub store: &'a mut dyn EntityStore,
    pub reader: &'a dyn ContractReader,
    pub data_sources: &'a mut dyn DataSourceRegistry,
}

impl HandlerContext<'_> {
    /// Contract that emitted the event.
    pub fn address(&self) -> &[u8] {
        &self.meta.address
    }

    pub fn tx_from(&self) -> &[u8] {
        &self.meta.tx_from
    }

    pub fn block_number(&self) -> u64 {
        self.meta.block_number
    }

    /// Block timestamp rendered the way entities store it.
    pub fn timestamp(&self) -> String {
        self.meta.timestamp.to_string()
    }

    pub fn load<E: Entity>(&self, id: &str) -> Result<Option<E>> {
        self.store.load(id)
    }

    pub fn save<E: Entity>(&mut self, entity: &E) {
        self.store.save(entity);
    }

    pub fn remove<E: Entity>(&mut self, id: &str) {
        self.store.remove::<E>(id);
    }

    pub fn watch(&mut self, template: Template, address: &[u8]) {
        self.data_sources.create(template, address);
    }
}

/// Reconciles the entity store with one decoded event.
pub trait EventHandler {
    fn handle(&self, ctx: &mut HandlerContext) -> Result<()>;
}

/// Kind of contract an event is expected to come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventSource {
    DaoRegistry,
    BankExtension,
    CouponOnboarding,
    DaoFactory,
}

pub fn event_source(kind: &Kind) -> EventSource {
    match kind {
        Kind::SubmittedProposal(_) |
        Kind::SponsoredProposal(_) |
        Kind::ProcessedProposal(_) |
        Kind::AdapterAdded(_) |
        Kind::AdapterRemoved(_) |
        Kind::ExtensionAdded(_) |
        Kind::ExtensionRemoved(_) |
        Kind::UpdateDelegateKey(_) |
        Kind::ConfigurationUpdated(_) |
        Kind::AddressConfigurationUpdated(_) => EventSource::DaoRegistry,
        Kind::NewBalance(_) | Kind::Withdraw(_) => EventSource::BankExtension,
        Kind::CouponRedeemed(_) => EventSource::CouponOnboarding,
        Kind::DaoCreated(_) => EventSource::DaoFactory,
    }
}

pub fn event_name(kind: &Kind) -> &'static str {
    match kind {
        Kind::SubmittedProposal(_) => "SubmittedProposal",
        Kind::SponsoredProposal(_) => "SponsoredProposal",
        Kind::ProcessedProposal(_) => "ProcessedProposal",
        Kind::AdapterAdded(_) => "AdapterAdded",
        Kind::AdapterRemoved(_) => "AdapterRemoved",
        Kind::ExtensionAdded(_) => "ExtensionAdded",
        Kind::ExtensionRemoved(_) => "ExtensionRemoved",
        Kind::UpdateDelegateKey(_) => "UpdateDelegateKey",
        Kind::ConfigurationUpdated(_) => "ConfigurationUpdated",
        Kind::AddressConfigurationUpdated(_) => "AddressConfigurationUpdated",
        Kind::NewBalance(_) => "NewBalance",
        Kind::Withdraw(_) => "Withdraw",
        Kind::CouponRedeemed(_) => "CouponRedeemed",
        Kind::DaoCreated(_) => "DAOCreated",
    }
}

fn as_event_handler(kind: &Kind) -> &dyn EventHandler {
    match kind {
        Kind::SubmittedProposal(e) => e,
        Kind::SponsoredProposal(e) => e,
        Kind::ProcessedProposal(e) => e,
        Kind::AdapterAdded(e) => e,
        Kind::AdapterRemoved(e) => e,
        Kind::ExtensionAdded(e) => e,
        Kind::ExtensionRemoved(e) => e,
        Kind::UpdateDelegateKey(e) => e,
        Kind::ConfigurationUpdated(e) => e,
        Kind::AddressConfigurationUpdated(e) => e,
        Kind::NewBalance(e) => e,
        Kind::Withdraw(e) => e,
        Kind::CouponRedeemed(e) => e,
        Kind::DaoCreated(e) => e,
    }
}

pub fn handle_event(kind: &Kind, ctx: &mut HandlerContext) -> Result<()> {
    as_event_handler(kind).handle(ctx)
}

/// Reads a `bytes32` event parameter back from its protobuf rendering.
pub(crate) fn to_bytes32(raw: &[u8]) -> Result<[u8; 32]> {
    raw.try_into()
        .map_err(|_| anyhow!("expected 32 bytes, got {}", raw.len()))
}
