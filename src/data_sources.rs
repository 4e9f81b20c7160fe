use std::collections::BTreeSet;

use anyhow::{bail, Result};

use crate::{
    identifiers::to_hex,
    pb::tribute::v1::{WatchedContract, WatchedContracts},
};

/// Store key of the persisted watch list. Not an entity, never emitted as a change.
pub const WATCHED_CONTRACTS_TYPE: &str = "_WatchedContracts";
pub const WATCHED_CONTRACTS_ID: &str = "all";

/// Contract templates that can be instantiated for addresses discovered while indexing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Template {
    DaoRegistry,
    BankExtension,
}

impl Template {
    pub fn name(&self) -> &'static str {
        match self {
            Template::DaoRegistry => "DaoRegistry",
            Template::BankExtension => "BankExtension",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "DaoRegistry" => Some(Template::DaoRegistry),
            "BankExtension" => Some(Template::BankExtension),
            _ => None,
        }
    }
}

pub trait DataSourceRegistry {
    /// Starts delivering the events of `address` as `template`.
    fn create(&mut self, template: Template, address: &[u8]);
}

/// Live set of watched contract addresses, per template.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct DataSources {
    watched: BTreeSet<(Template, Vec<u8>)>,
}

impl DataSources {
    pub fn new<I, A>(daos: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: AsRef<[u8]>,
    {
        let mut sources = Self::default();
        for dao in daos {
            sources.create(Template::DaoRegistry, dao.as_ref());
        }
        sources
    }

    pub fn is_watched(&self, template: Template, address: &[u8]) -> bool {
        self.watched
            .contains(&(template, address.to_vec()))
    }

    pub fn addresses(&self, template: Template) -> impl Iterator<Item = &[u8]> {
        self.watched
            .iter()
            .filter(move |(kind, _)| *kind == template)
            .map(|(_, address)| address.as_slice())
    }

    pub fn to_record(&self) -> WatchedContracts {
        WatchedContracts {
            contracts: self
                .watched
                .iter()
                .map(|(template, address)| WatchedContract {
                    template: template.name().to_string(),
                    address: address.clone(),
                })
                .collect(),
        }
    }

    /// Adds back registrations persisted with [`DataSources::to_record`].
    pub fn restore(&mut self, record: &WatchedContracts) -> Result<()> {
        for contract in &record.contracts {
            let Some(template) = Template::from_name(&contract.template) else {
                bail!("unknown data source template {:?}", contract.template);
            };
            self.watched
                .insert((template, contract.address.clone()));
        }
        Ok(())
    }
}

impl DataSourceRegistry for DataSources {
    fn create(&mut self, template: Template, address: &[u8]) {
        if self
            .watched
            .insert((template, address.to_vec()))
        {
            substreams::log::info!("Watching {} at {}", template.name(), to_hex(address));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_daos_are_watched() {
        let sources = DataSources::new([[0xda; 20]]);

        assert!(sources.is_watched(Template::DaoRegistry, &[0xda; 20]));
        assert!(!sources.is_watched(Template::BankExtension, &[0xda; 20]));
    }

    #[test]
    fn test_registrations_are_idempotent() {
        let mut sources = DataSources::default();
        sources.create(Template::BankExtension, &[0xba; 20]);
        sources.create(Template::BankExtension, &[0xba; 20]);

        assert_eq!(sources.addresses(Template::BankExtension).count(), 1);
    }

    #[test]
    fn test_record_restores_registrations() {
        let mut sources = DataSources::new([[0xda; 20]]);
        sources.create(Template::BankExtension, &[0xba; 20]);

        let mut restored = DataSources::default();
        restored.restore(&sources.to_record()).unwrap();

        assert_eq!(restored, sources);
    }

    #[test]
    fn test_unknown_template_is_rejected() {
        let record = WatchedContracts {
            contracts: vec![WatchedContract {
                template: "Erc20Extension".to_string(),
                address: vec![0xe0; 20],
            }],
        };

        assert!(DataSources::default().restore(&record).is_err());
    }
}
