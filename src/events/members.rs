use anyhow::Result;
use substreams::{log, scalar::BigInt};

use crate::{
    events::{EventHandler, HandlerContext},
    identifiers::{dao_id, member_id, to_hex},
    pb::tribute::v1::{Member, UpdateDelegateKey},
};

impl EventHandler for UpdateDelegateKey {
    fn handle(&self, ctx: &mut HandlerContext) -> Result<()> {
        let dao = ctx.address().to_vec();
        log::info!(
            "UpdateDelegateKey dao {} memberAddress {} newDelegateKey {}",
            to_hex(&dao),
            to_hex(&self.member_address),
            to_hex(&self.new_delegate_key)
        );

        let id = member_id(&dao, &self.member_address);
        let Some(mut member) = ctx.load::<Member>(&id)? else {
            log::debug!("Member {} is unknown, dropping delegate key update", id);
            return Ok(());
        };
        member.delegate_key = self.new_delegate_key.clone();
        member.is_delegated = self.new_delegate_key != self.member_address;

        ctx.save(&member);
        Ok(())
    }
}

/// Creates the member on first sight, delegating to itself, and records its units balance
/// when it could be read.
pub fn upsert_member_units(
    ctx: &mut HandlerContext,
    dao: &[u8],
    member_address: &[u8],
    units: Option<&BigInt>,
) -> Result<()> {
    let id = member_id(dao, member_address);
    let mut member = ctx
        .load::<Member>(&id)?
        .unwrap_or_else(|| Member {
            id,
            tribute_dao: dao_id(dao),
            member_address: member_address.to_vec(),
            delegate_key: member_address.to_vec(),
            is_delegated: false,
            units: "0".to_string(),
            created_at: ctx.timestamp(),
        });
    if let Some(units) = units {
        member.units = units.to_string();
    }

    ctx.save(&member);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{pb::tribute::v1::dao_event::Kind, store::EntityStoreExt, testing::*};

    fn delegate(member: &[u8], key: &[u8]) -> Kind {
        Kind::UpdateDelegateKey(UpdateDelegateKey {
            member_address: member.to_vec(),
            new_delegate_key: key.to_vec(),
        })
    }

    fn harness_with_member() -> Harness {
        let mut harness = Harness::new(MockContractReader::default());
        harness.store.save(&Member {
            id: member_id(&DAO, &MEMBER),
            tribute_dao: dao_id(&DAO),
            member_address: MEMBER.to_vec(),
            delegate_key: MEMBER.to_vec(),
            units: "10".to_string(),
            ..Default::default()
        });
        harness
    }

    fn load(harness: &Harness) -> Member {
        harness
            .store
            .load::<Member>(&member_id(&DAO, &MEMBER))
            .unwrap()
            .unwrap()
    }

    #[test]
    fn test_delegating_to_another_key() {
        let mut harness = harness_with_member();

        harness
            .handle(&event(&DAO, delegate(&MEMBER, &DELEGATE)))
            .unwrap();

        let member = load(&harness);
        assert_eq!(member.delegate_key, DELEGATE.to_vec());
        assert!(member.is_delegated);
        assert_eq!(member.units, "10");
    }

    #[test]
    fn test_delegating_back_to_self() {
        let mut harness = harness_with_member();

        harness
            .handle(&event(&DAO, delegate(&MEMBER, &DELEGATE)))
            .unwrap();
        harness
            .handle(&event(&DAO, delegate(&MEMBER, &MEMBER)))
            .unwrap();

        let member = load(&harness);
        assert_eq!(member.delegate_key, MEMBER.to_vec());
        assert!(!member.is_delegated);
    }

    #[test]
    fn test_unknown_member_is_dropped() {
        let mut harness = Harness::new(MockContractReader::default());

        harness
            .handle(&event(&DAO, delegate(&MEMBER, &DELEGATE)))
            .unwrap();

        assert!(harness.store.is_empty());
    }

    #[test]
    fn test_member_lookup_is_dao_scoped() {
        let mut harness = harness_with_member();

        harness
            .handle(&event(&OTHER_DAO, delegate(&MEMBER, &DELEGATE)))
            .unwrap();

        assert!(!load(&harness).is_delegated);
        assert_eq!(harness.store.count("Member"), 1);
    }
}
