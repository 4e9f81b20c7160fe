use anyhow::Result;
use substreams::log;

use crate::{
    events::{extension_entities::on_extension_added, EventHandler, HandlerContext},
    identifiers::{adapter_id, dao_id, extension_id, to_hex},
    pb::tribute::v1::{
        Adapter, AdapterAdded, AdapterRemoved, AddressConfigurationUpdated, ConfigurationUpdated,
        Extension, ExtensionAdded, ExtensionRemoved, TributeDao,
    },
};

impl EventHandler for AdapterAdded {
    fn handle(&self, ctx: &mut HandlerContext) -> Result<()> {
        let dao = ctx.address().to_vec();
        log::info!(
            "AdapterAdded dao {} adapterId {} adapterAddress {}",
            to_hex(&dao),
            to_hex(&self.adapter_id),
            to_hex(&self.adapter_address)
        );

        let id = adapter_id(&dao, &self.adapter_id);
        let mut adapter = ctx
            .load::<Adapter>(&id)?
            .unwrap_or_else(|| Adapter {
                id,
                tribute_dao: dao_id(&dao),
                adapter_id: self.adapter_id.clone(),
                ..Default::default()
            });
        adapter.adapter_address = self.adapter_address.clone();
        adapter.acl = self.flags.clone();

        ctx.save(&adapter);
        Ok(())
    }
}

impl EventHandler for AdapterRemoved {
    fn handle(&self, ctx: &mut HandlerContext) -> Result<()> {
        let dao = ctx.address().to_vec();
        log::info!("AdapterRemoved dao {} adapterId {}", to_hex(&dao), to_hex(&self.adapter_id));

        ctx.remove::<Adapter>(&adapter_id(&dao, &self.adapter_id));
        Ok(())
    }
}

impl EventHandler for ExtensionAdded {
    fn handle(&self, ctx: &mut HandlerContext) -> Result<()> {
        let dao = ctx.address().to_vec();
        log::info!(
            "ExtensionAdded dao {} extensionId {} extensionAddress {}",
            to_hex(&dao),
            to_hex(&self.extension_id),
            to_hex(&self.extension_address)
        );

        let id = dao_id(&dao);
        if ctx.load::<TributeDao>(&id)?.is_none() {
            let tribute_dao = TributeDao {
                id,
                dao_address: dao.clone(),
                creator: ctx.tx_from().to_vec(),
                created_at: ctx.timestamp(),
                ..Default::default()
            };
            ctx.save(&tribute_dao);
        }

        let id = extension_id(&dao, &self.extension_id);
        let mut extension = ctx
            .load::<Extension>(&id)?
            .unwrap_or_else(|| Extension {
                id,
                tribute_dao: dao_id(&dao),
                extension_id: self.extension_id.clone(),
                ..Default::default()
            });
        extension.extension_address = self.extension_address.clone();
        ctx.save(&extension);

        on_extension_added(ctx, &self.extension_id, &self.extension_address)
    }
}

impl EventHandler for ExtensionRemoved {
    fn handle(&self, ctx: &mut HandlerContext) -> Result<()> {
        let dao = ctx.address().to_vec();
        log::info!(
            "ExtensionRemoved dao {} extensionId {}",
            to_hex(&dao),
            to_hex(&self.extension_id)
        );

        ctx.remove::<Extension>(&extension_id(&dao, &self.extension_id));
        Ok(())
    }
}

impl EventHandler for ConfigurationUpdated {
    fn handle(&self, ctx: &mut HandlerContext) -> Result<()> {
        log::info!(
            "ConfigurationUpdated dao {} key {} value {}",
            to_hex(ctx.address()),
            to_hex(&self.key),
            self.value
        );
        Ok(())
    }
}

impl EventHandler for AddressConfigurationUpdated {
    fn handle(&self, ctx: &mut HandlerContext) -> Result<()> {
        log::info!(
            "AddressConfigurationUpdated dao {} key {} value {}",
            to_hex(ctx.address()),
            to_hex(&self.key),
            to_hex(&self.value)
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{pb::tribute::v1::dao_event::Kind, store::EntityStoreExt, testing::*};

    fn adapter_added(n: u8, address: &[u8], flags: &str) -> Kind {
        Kind::AdapterAdded(AdapterAdded {
            adapter_id: bytes32(n).to_vec(),
            adapter_address: address.to_vec(),
            flags: flags.to_string(),
        })
    }

    fn extension_added(n: u8, address: &[u8]) -> Kind {
        Kind::ExtensionAdded(ExtensionAdded {
            extension_id: bytes32(n).to_vec(),
            extension_address: address.to_vec(),
        })
    }

    #[test]
    fn test_adapter_add_then_remove() {
        let mut harness = Harness::new(MockContractReader::default());
        let id = adapter_id(&DAO, &bytes32(1));

        harness
            .handle(&event(&DAO, adapter_added(1, &ADAPTER, "255")))
            .unwrap();
        let adapter = harness
            .store
            .load::<Adapter>(&id)
            .unwrap()
            .unwrap();
        assert_eq!(adapter.tribute_dao, dao_id(&DAO));
        assert_eq!(adapter.adapter_address, ADAPTER.to_vec());
        assert_eq!(adapter.acl, "255");

        harness
            .handle(&event(
                &DAO,
                Kind::AdapterRemoved(AdapterRemoved { adapter_id: bytes32(1).to_vec() }),
            ))
            .unwrap();
        assert!(harness
            .store
            .load::<Adapter>(&id)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_readding_adapter_overwrites_mutable_fields() {
        let mut harness = Harness::new(MockContractReader::default());

        harness
            .handle(&event(&DAO, adapter_added(1, &ADAPTER, "1")))
            .unwrap();
        harness
            .handle(&event(&DAO, adapter_added(1, &VOTING_ADAPTER, "3")))
            .unwrap();

        let adapter = harness
            .store
            .load::<Adapter>(&adapter_id(&DAO, &bytes32(1)))
            .unwrap()
            .unwrap();
        assert_eq!(adapter.adapter_address, VOTING_ADAPTER.to_vec());
        assert_eq!(adapter.acl, "3");
        assert_eq!(harness.store.count("Adapter"), 1);
    }

    #[test]
    fn test_removing_unknown_ids_is_a_no_op() {
        let mut harness = Harness::new(MockContractReader::default());

        harness
            .handle(&event(
                &DAO,
                Kind::AdapterRemoved(AdapterRemoved { adapter_id: bytes32(4).to_vec() }),
            ))
            .unwrap();
        harness
            .handle(&event(
                &DAO,
                Kind::ExtensionRemoved(ExtensionRemoved { extension_id: bytes32(4).to_vec() }),
            ))
            .unwrap();

        assert!(harness.store.is_empty());
    }

    #[test]
    fn test_extension_added_creates_dao_once() {
        let mut harness = Harness::new(MockContractReader::default());

        harness
            .handle(&event(&DAO, extension_added(1, &BANK)))
            .unwrap();
        let mut later = event(&DAO, extension_added(2, &ERC20_TOKEN));
        if let Some(meta) = later.meta.as_mut() {
            meta.tx_from = MEMBER.to_vec();
            meta.timestamp = TIMESTAMP + 100;
        }
        harness.handle(&later).unwrap();

        let tribute_dao = harness
            .store
            .load::<TributeDao>(&dao_id(&DAO))
            .unwrap()
            .unwrap();
        assert_eq!(tribute_dao.dao_address, DAO.to_vec());
        assert_eq!(tribute_dao.creator, SENDER.to_vec());
        assert_eq!(tribute_dao.created_at, TIMESTAMP.to_string());
        assert_eq!(harness.store.count("Extension"), 2);
        // unrecognized extension ids register nothing
        assert!(harness.watched().is_empty());
    }

    #[test]
    fn test_extension_add_then_remove() {
        let mut harness = Harness::new(MockContractReader::default());
        let id = extension_id(&DAO, &bytes32(1));

        harness
            .handle(&event(&DAO, extension_added(1, &BANK)))
            .unwrap();
        let extension = harness
            .store
            .load::<Extension>(&id)
            .unwrap()
            .unwrap();
        assert_eq!(extension.extension_address, BANK.to_vec());
        assert_eq!(extension.extension_id, bytes32(1).to_vec());

        harness
            .handle(&event(
                &DAO,
                Kind::ExtensionRemoved(ExtensionRemoved { extension_id: bytes32(1).to_vec() }),
            ))
            .unwrap();
        assert!(harness
            .store
            .load::<Extension>(&id)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_configuration_events_write_nothing() {
        let mut harness = Harness::new(MockContractReader::default());

        harness
            .handle(&event(
                &DAO,
                Kind::ConfigurationUpdated(ConfigurationUpdated {
                    key: bytes32(1).to_vec(),
                    value: "10".to_string(),
                }),
            ))
            .unwrap();
        harness
            .handle(&event(
                &DAO,
                Kind::AddressConfigurationUpdated(AddressConfigurationUpdated {
                    key: bytes32(2).to_vec(),
                    value: MEMBER.to_vec(),
                }),
            ))
            .unwrap();

        assert!(harness.store.is_empty());
    }
}
