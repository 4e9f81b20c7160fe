use anyhow::Result;
use substreams::{log, scalar::BigInt};

use crate::{
    events::{members::upsert_member_units, EventHandler, HandlerContext},
    identifiers::{bank_id, dao_id, to_hex, token_holder_id, token_id},
    pb::tribute::v1::{Bank, NewBalance, Token, TokenHolder, Withdraw},
};

impl EventHandler for NewBalance {
    fn handle(&self, ctx: &mut HandlerContext) -> Result<()> {
        log::info!(
            "NewBalance bank {} member {} tokenAddr {} amount {}",
            to_hex(ctx.address()),
            to_hex(&self.member),
            to_hex(&self.token_addr),
            self.amount
        );
        reconcile_balances(ctx, &self.member, &self.token_addr)
    }
}

impl EventHandler for Withdraw {
    fn handle(&self, ctx: &mut HandlerContext) -> Result<()> {
        log::info!(
            "Withdraw bank {} account {} tokenAddr {} amount {}",
            to_hex(ctx.address()),
            to_hex(&self.account),
            to_hex(&self.token_addr),
            self.amount
        );
        reconcile_balances(ctx, &self.account, &self.token_addr)
    }
}

/// Re-reads the balances touched by a bank event emitted by the bank extension in `ctx`.
fn reconcile_balances(ctx: &mut HandlerContext, member: &[u8], token: &[u8]) -> Result<()> {
    let bank = ctx.address().to_vec();
    let config = ctx.config;
    let reader = ctx.reader;

    let Some(dao) = reader.bank_dao(&bank) else {
        log::info!("dao() reverted on bank {}, {}", to_hex(&bank), ctx.block_number());
        return Ok(());
    };

    if config.reserved.is_reserved(member) || config.reserved.is_reserved(token) {
        log::debug!(
            "Skipping member bookkeeping for reserved {} / {}",
            to_hex(member),
            to_hex(token)
        );
    } else {
        let units = reader.bank_balance(&bank, member, &config.reserved.units);
        if units.is_none() {
            log::info!("balanceOf({}, UNITS) reverted, {}", to_hex(member), ctx.block_number());
        }
        upsert_member_units(ctx, &dao, member, units.as_ref())?;
        sync_erc20_holder(ctx, &dao, member, units.as_ref())?;
    }

    update_bank_totals(ctx, &dao, &bank)
}

/// Upserts the bank aggregates: units outstanding, and units issued outside the guild bank.
fn update_bank_totals(ctx: &mut HandlerContext, dao: &[u8], bank: &[u8]) -> Result<()> {
    let config = ctx.config;
    let reserved = &config.reserved;
    let total = ctx
        .reader
        .bank_balance(bank, &reserved.total, &reserved.units);
    let guild = ctx
        .reader
        .bank_balance(bank, &reserved.guild, &reserved.units);
    let (Some(total_units), Some(guild_units)) = (total, guild) else {
        log::info!("Bank totals of {} reverted, {}", to_hex(bank), ctx.block_number());
        return Ok(());
    };
    let total_units_issued = total_units.clone() - guild_units;

    let id = bank_id(dao, bank);
    let mut entity = ctx
        .load::<Bank>(&id)?
        .unwrap_or_else(|| Bank {
            id,
            tribute_dao: dao_id(dao),
            bank_address: bank.to_vec(),
            ..Default::default()
        });
    entity.total_units = total_units.to_string();
    entity.total_units_issued = total_units_issued.to_string();

    ctx.save(&entity);
    Ok(())
}

/// Mirrors `member`'s holding of the DAO's ERC20 extension token, if the DAO has one.
///
/// `units` is the member's internal units balance when the caller already read it.
pub fn sync_erc20_holder(
    ctx: &mut HandlerContext,
    dao: &[u8],
    member: &[u8],
    units: Option<&BigInt>,
) -> Result<()> {
    let reader = ctx.reader;
    let token = match reader.extension_address(dao, &ctx.config.extensions.erc20) {
        Some(token) if token.iter().any(|byte| *byte != 0) => token,
        _ => {
            log::info!("No ERC20 extension on {}, {}", to_hex(dao), ctx.block_number());
            return Ok(());
        }
    };

    let id = token_id(dao, &token);
    let mut entity = ctx
        .load::<Token>(&id)?
        .unwrap_or_else(|| Token {
            id: id.clone(),
            tribute_dao: dao_id(dao),
            token_address: token.clone(),
            ..Default::default()
        });
    if let Some(name) = reader.erc20_name(&token) {
        entity.name = name;
    }
    if let Some(symbol) = reader.erc20_symbol(&token) {
        entity.symbol = symbol;
    }
    match reader.erc20_total_supply(&token) {
        Some(total_supply) => entity.total_supply = total_supply.to_string(),
        None => log::info!("totalSupply reverted on {}, {}", to_hex(&token), ctx.block_number()),
    }
    ctx.save(&entity);

    let holder_id = token_holder_id(dao, &token, member);
    let mut holder = ctx
        .load::<TokenHolder>(&holder_id)?
        .unwrap_or_else(|| TokenHolder {
            id: holder_id,
            tribute_dao: dao_id(dao),
            member_address: member.to_vec(),
            token: id,
            balance: "0".to_string(),
            created_at: ctx.timestamp(),
            ..Default::default()
        });
    match reader.erc20_balance(&token, member) {
        Some(balance) => holder.balance = balance.to_string(),
        None => log::info!("balanceOf({}) reverted on {}", to_hex(member), to_hex(&token)),
    }
    if let Some(units) = units {
        holder.total_units = units.to_string();
    }
    ctx.save(&holder);
    Ok(())
}
