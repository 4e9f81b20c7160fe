use anyhow::Result;
use substreams::log;

use crate::{
    consts::ExtensionKind,
    data_sources::Template,
    events::{bank::sync_erc20_holder, HandlerContext},
    identifiers::{bank_id, dao_id, to_hex},
    pb::tribute::v1::Bank,
};

/// Side effects of adding one of the recognized extensions to the emitting DAO.
pub fn on_extension_added(
    ctx: &mut HandlerContext,
    extension_id: &[u8],
    extension_address: &[u8],
) -> Result<()> {
    let dao = ctx.address().to_vec();
    match ctx.config.extensions.kind_of(extension_id) {
        Some(ExtensionKind::Bank) => {
            log::info!("Bank extension {} added to {}", to_hex(extension_address), to_hex(&dao));
            ctx.watch(Template::BankExtension, extension_address);

            let id = bank_id(&dao, extension_address);
            let mut bank = ctx
                .load::<Bank>(&id)?
                .unwrap_or_else(|| Bank { id, ..Default::default() });
            bank.tribute_dao = dao_id(&dao);
            bank.bank_address = extension_address.to_vec();
            ctx.save(&bank);
        }
        Some(ExtensionKind::Erc20) => {
            log::info!("ERC20 extension {} added to {}", to_hex(extension_address), to_hex(&dao));
            let creator = ctx.tx_from().to_vec();
            if ctx.config.reserved.is_reserved(&creator) {
                log::debug!("Skipping ERC20 snapshot of reserved address {}", to_hex(&creator));
                return Ok(());
            }
            sync_erc20_holder(ctx, &dao, &creator, None)?;
        }
        None => log::debug!("Extension {} has no derived entities", to_hex(extension_id)),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        consts::{BANK_EXTENSION_ID, ERC20_EXTENSION_ID},
        identifiers::{token_holder_id, token_id},
        pb::tribute::v1::{dao_event::Kind, ExtensionAdded, Token, TokenHolder},
        store::EntityStoreExt,
        testing::*,
    };

    fn extension_added(extension_id: [u8; 32], address: &[u8]) -> Kind {
        Kind::ExtensionAdded(ExtensionAdded {
            extension_id: extension_id.to_vec(),
            extension_address: address.to_vec(),
        })
    }

    #[test]
    fn test_bank_extension_registers_template_and_bank() {
        let mut harness = Harness::new(MockContractReader::default());

        harness
            .handle(&event(&DAO, extension_added(BANK_EXTENSION_ID, &BANK)))
            .unwrap();

        assert_eq!(harness.watched(), &[(Template::BankExtension, BANK.to_vec())]);
        let bank = harness
            .store
            .load::<Bank>(&bank_id(&DAO, &BANK))
            .unwrap()
            .unwrap();
        assert_eq!(bank.tribute_dao, dao_id(&DAO));
        assert_eq!(bank.bank_address, BANK.to_vec());
        assert_eq!(bank.total_units, "");
    }

    #[test]
    fn test_erc20_extension_snapshots_sender() {
        let reader = MockContractReader::default()
            .with_extension(&DAO, ERC20_EXTENSION_ID, &ERC20_TOKEN)
            .with_erc20(&ERC20_TOKEN, "Tribute Units", "TUN", 1_000)
            .with_erc20_balance(&ERC20_TOKEN, &SENDER, 400);
        let mut harness = Harness::new(reader);

        harness
            .handle(&event(&DAO, extension_added(ERC20_EXTENSION_ID, &ERC20_TOKEN)))
            .unwrap();

        assert!(harness.watched().is_empty());
        let token = harness
            .store
            .load::<Token>(&token_id(&DAO, &ERC20_TOKEN))
            .unwrap()
            .unwrap();
        assert_eq!(token.name, "Tribute Units");
        assert_eq!(token.symbol, "TUN");
        assert_eq!(token.total_supply, "1000");

        let holder = harness
            .store
            .load::<TokenHolder>(&token_holder_id(&DAO, &ERC20_TOKEN, &SENDER))
            .unwrap()
            .unwrap();
        assert_eq!(holder.balance, "400");
        assert_eq!(holder.token, token.id);
        assert_eq!(holder.created_at, TIMESTAMP.to_string());
    }

    #[test]
    fn test_erc20_extension_without_lookup_writes_no_token() {
        let mut harness = Harness::new(MockContractReader::default());

        harness
            .handle(&event(&DAO, extension_added(ERC20_EXTENSION_ID, &ERC20_TOKEN)))
            .unwrap();

        assert_eq!(harness.store.count("Token"), 0);
        assert_eq!(harness.store.count("TokenHolder"), 0);
        assert_eq!(harness.store.count("Extension"), 1);
    }
}
