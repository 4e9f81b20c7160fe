use anyhow::Result;
use substreams::log;

use crate::{
    data_sources::Template,
    events::{EventHandler, HandlerContext},
    identifiers::{dao_id, to_hex},
    pb::tribute::v1::{DaoCreated, TributeDao},
};

impl EventHandler for DaoCreated {
    fn handle(&self, ctx: &mut HandlerContext) -> Result<()> {
        log::info!("DAOCreated daoAddress {} name {}", to_hex(&self.dao_address), self.name);

        let id = dao_id(&self.dao_address);
        let mut tribute_dao = ctx
            .load::<TributeDao>(&id)?
            .unwrap_or_else(|| TributeDao {
                id,
                dao_address: self.dao_address.clone(),
                creator: ctx.tx_from().to_vec(),
                created_at: ctx.timestamp(),
                ..Default::default()
            });
        tribute_dao.name = self.name.clone();
        ctx.save(&tribute_dao);

        ctx.watch(Template::DaoRegistry, &self.dao_address);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{pb::tribute::v1::dao_event::Kind, store::EntityStoreExt, testing::*};

    #[test]
    fn test_dao_created_registers_dao() {
        let mut harness = Harness::new(MockContractReader::default());

        harness
            .handle(&event(
                &FACTORY,
                Kind::DaoCreated(DaoCreated {
                    dao_address: OTHER_DAO.to_vec(),
                    name: "muse0".to_string(),
                }),
            ))
            .unwrap();

        let tribute_dao = harness
            .store
            .load::<TributeDao>(&dao_id(&OTHER_DAO))
            .unwrap()
            .unwrap();
        assert_eq!(tribute_dao.name, "muse0");
        assert_eq!(tribute_dao.dao_address, OTHER_DAO.to_vec());
        assert_eq!(tribute_dao.creator, SENDER.to_vec());
        assert_eq!(tribute_dao.created_at, TIMESTAMP.to_string());
        assert_eq!(harness.watched(), &[(Template::DaoRegistry, OTHER_DAO.to_vec())]);
    }
}
