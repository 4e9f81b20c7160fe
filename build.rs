use anyhow::Result;
use substreams_ethereum::Abigen;

const CONTRACTS: [(&str, &str); 9] = [
    ("DaoRegistry", "dao_registry"),
    ("DaoFactory", "dao_factory"),
    ("BankExtension", "bank_extension"),
    ("ERC20Extension", "erc20_extension"),
    ("IVoting", "i_voting"),
    ("VotingContract", "voting_contract"),
    ("OffchainVotingContract", "offchain_voting_contract"),
    ("OffchainVotingContractV1", "offchain_voting_contract_v1"),
    ("CouponOnboarding", "coupon_onboarding"),
];

fn main() -> Result<(), anyhow::Error> {
    for (contract, module) in CONTRACTS {
        let abi_path = format!("abi/{contract}.json");
        Abigen::new(contract, abi_path.as_str())?
            .generate()?
            .write_to_file(format!("src/abi/{module}.rs"))?;
    }
    Ok(())
}
