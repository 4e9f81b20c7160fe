use anyhow::{bail, Context, Result};
use substreams_entity_change::tables::{Row, Tables};

use crate::{
    pb::tribute::v1::{
        Adapter, Bank, Coupon, Extension, Member, Proposal, Token, TokenHolder, TributeDao, Vote,
    },
    store::Entity,
};

macro_rules! entity {
    ($ty:ty, $name:literal) => {
        impl Entity for $ty {
            const ENTITY_TYPE: &'static str = $name;

            fn id(&self) -> &str {
                &self.id
            }

            fn write_row(&self, row: &mut Row) {
                self.fill(row);
            }
        }
    };
}

entity!(TributeDao, "TributeDao");
entity!(Member, "Member");
entity!(Adapter, "Adapter");
entity!(Extension, "Extension");
entity!(Proposal, "Proposal");
entity!(Vote, "Vote");
entity!(Bank, "Bank");
entity!(Token, "Token");
entity!(TokenHolder, "TokenHolder");
entity!(Coupon, "Coupon");

impl TributeDao {
    fn fill(&self, row: &mut Row) {
        row.set("daoAddress", &self.dao_address)
            .set("name", &self.name)
            .set("creator", &self.creator)
            .set("createdAt", &self.created_at);
    }
}

impl Member {
    fn fill(&self, row: &mut Row) {
        row.set("tributeDao", &self.tribute_dao)
            .set("memberAddress", &self.member_address)
            .set("delegateKey", &self.delegate_key)
            .set("isDelegated", self.is_delegated)
            .set("units", &self.units)
            .set("createdAt", &self.created_at);
    }
}

impl Adapter {
    fn fill(&self, row: &mut Row) {
        row.set("tributeDao", &self.tribute_dao)
            .set("adapterId", &self.adapter_id)
            .set("adapterAddress", &self.adapter_address)
            .set("acl", &self.acl);
    }
}

impl Extension {
    fn fill(&self, row: &mut Row) {
        row.set("tributeDao", &self.tribute_dao)
            .set("extensionId", &self.extension_id)
            .set("extensionAddress", &self.extension_address);
    }
}

impl Proposal {
    fn fill(&self, row: &mut Row) {
        row.set("tributeDao", &self.tribute_dao)
            .set("proposalId", &self.proposal_id)
            .set("adapterId", &self.adapter_id)
            .set("adapterAddress", &self.adapter_address)
            .set("flags", &self.flags)
            .set("submittedBy", &self.submitted_by)
            .set("member", &self.member)
            .set("sponsored", self.sponsored)
            .set("sponsoredAt", &self.sponsored_at)
            .set("sponsoredBy", &self.sponsored_by)
            .set("votingAdapter", &self.voting_adapter)
            .set("processed", self.processed)
            .set("processedAt", &self.processed_at)
            .set("processedBy", &self.processed_by)
            .set("nbYes", &self.nb_yes)
            .set("nbNo", &self.nb_no)
            .set("startingTime", &self.starting_time)
            .set("blockNumber", &self.block_number)
            .set("votingState", &self.voting_state)
            .set("votingResult", &self.voting_result)
            .set("snapshot", &self.snapshot)
            .set("reporter", &self.reporter)
            .set("resultRoot", &self.result_root)
            .set("gracePeriodStartingTime", &self.grace_period_starting_time)
            .set("isChallenged", self.is_challenged)
            .set("stepRequested", &self.step_requested)
            .set("forceFailed", self.force_failed)
            .set("fallbackVotesCount", &self.fallback_votes_count);
    }
}

impl Vote {
    fn fill(&self, row: &mut Row) {
        row.set("adapterName", &self.adapter_name)
            .set("adapterAddress", &self.adapter_address)
            .set("nbYes", &self.nb_yes)
            .set("nbNo", &self.nb_no)
            .set("proposal", &self.proposal);
    }
}

impl Bank {
    fn fill(&self, row: &mut Row) {
        row.set("tributeDao", &self.tribute_dao)
            .set("bankAddress", &self.bank_address)
            .set("totalUnits", &self.total_units)
            .set("totalUnitsIssued", &self.total_units_issued);
    }
}

impl Token {
    fn fill(&self, row: &mut Row) {
        row.set("tributeDao", &self.tribute_dao)
            .set("tokenAddress", &self.token_address)
            .set("name", &self.name)
            .set("symbol", &self.symbol)
            .set("totalSupply", &self.total_supply);
    }
}

impl TokenHolder {
    fn fill(&self, row: &mut Row) {
        row.set("tributeDao", &self.tribute_dao)
            .set("memberAddress", &self.member_address)
            .set("token", &self.token)
            .set("balance", &self.balance)
            .set("totalUnits", &self.total_units)
            .set("createdAt", &self.created_at);
    }
}

impl Coupon {
    fn fill(&self, row: &mut Row) {
        row.set("tributeDao", &self.tribute_dao)
            .set("authorizedMember", &self.authorized_member)
            .set("amount", &self.amount)
            .set("nonce", &self.nonce)
            .set("redeemedAt", &self.redeemed_at);
    }
}

/// Net change of one entity over a block.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityDelta<'a> {
    pub entity_type: &'a str,
    pub id: &'a str,
    /// Whether the row existed before the block.
    pub existed: bool,
    /// Encoded final state, `None` when the entity was removed.
    pub value: Option<&'a [u8]>,
}

fn emit<E: Entity>(tables: &mut Tables, delta: &EntityDelta) -> Result<()> {
    match (delta.value, delta.existed) {
        (Some(raw), existed) => {
            let entity = E::decode(raw)
                .with_context(|| format!("failed to decode {} {}", E::ENTITY_TYPE, delta.id))?;
            let row = if existed {
                tables.update_row(E::ENTITY_TYPE, delta.id)
            } else {
                tables.create_row(E::ENTITY_TYPE, delta.id)
            };
            entity.write_row(row);
        }
        (None, true) => {
            tables.delete_row(E::ENTITY_TYPE, delta.id);
        }
        // created and removed within the same block
        (None, false) => {}
    }
    Ok(())
}

/// Renders an entity delta as a create, update or delete row, dispatching on the entity type.
pub fn write_delta(tables: &mut Tables, delta: &EntityDelta) -> Result<()> {
    match delta.entity_type {
        TributeDao::ENTITY_TYPE => emit::<TributeDao>(tables, delta),
        Member::ENTITY_TYPE => emit::<Member>(tables, delta),
        Adapter::ENTITY_TYPE => emit::<Adapter>(tables, delta),
        Extension::ENTITY_TYPE => emit::<Extension>(tables, delta),
        Proposal::ENTITY_TYPE => emit::<Proposal>(tables, delta),
        Vote::ENTITY_TYPE => emit::<Vote>(tables, delta),
        Bank::ENTITY_TYPE => emit::<Bank>(tables, delta),
        Token::ENTITY_TYPE => emit::<Token>(tables, delta),
        TokenHolder::ENTITY_TYPE => emit::<TokenHolder>(tables, delta),
        Coupon::ENTITY_TYPE => emit::<Coupon>(tables, delta),
        other => bail!("unknown entity type {other}"),
    }
}
