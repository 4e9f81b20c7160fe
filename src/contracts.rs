use substreams::{log, scalar::BigInt};
use substreams_ethereum::{rpc::RPCDecodable, Function};

use crate::{
    abi::{
        bank_extension, dao_registry, erc20_extension, i_voting, offchain_voting_contract,
        offchain_voting_contract_v1, voting_contract,
    },
    calls::EthCall,
    consts::{OFFCHAIN_VOTING_CONTRACT_NAME, VOTING_CONTRACT_NAME},
    identifiers::to_hex,
};

/// Return shape of an offchain voting adapter's `votes()` accessor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OffchainLayout {
    /// Upgraded adapter, reports `stepRequested`.
    Current,
    Legacy,
}

/// Voting adapter implementation, identified by the name the adapter reports about itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VotingAdapterKind {
    OnChain,
    Offchain(OffchainLayout),
}

impl VotingAdapterKind {
    /// Maps an adapter name to its kind. `current_layout` picks between the two offchain
    /// `votes()` shapes and is ignored for on-chain adapters.
    pub fn from_adapter_name(name: &str, current_layout: bool) -> Option<Self> {
        match name {
            VOTING_CONTRACT_NAME => Some(Self::OnChain),
            OFFCHAIN_VOTING_CONTRACT_NAME if current_layout => {
                Some(Self::Offchain(OffchainLayout::Current))
            }
            OFFCHAIN_VOTING_CONTRACT_NAME => Some(Self::Offchain(OffchainLayout::Legacy)),
            _ => None,
        }
    }
}

/// Normalized result of a voting adapter's `votes(dao, proposalId)` call.
#[derive(Debug, Clone, PartialEq)]
pub enum VotingResult {
    OnChain {
        nb_yes: BigInt,
        nb_no: BigInt,
        starting_time: BigInt,
        block_number: BigInt,
    },
    Offchain {
        snapshot: BigInt,
        reporter: Vec<u8>,
        result_root: [u8; 32],
        nb_yes: BigInt,
        nb_no: BigInt,
        starting_time: BigInt,
        grace_period_starting_time: BigInt,
        is_challenged: bool,
        /// Only reported by the current offchain layout.
        step_requested: Option<BigInt>,
        force_failed: bool,
        fallback_votes_count: BigInt,
    },
}

impl VotingResult {
    pub fn tally(&self) -> (&BigInt, &BigInt) {
        match self {
            VotingResult::OnChain { nb_yes, nb_no, .. } => (nb_yes, nb_no),
            VotingResult::Offchain { nb_yes, nb_no, .. } => (nb_yes, nb_no),
        }
    }
}

/// Read-only calls against contract state at the block being processed.
///
/// Every method returns `None` when the call reverted or its output could not be decoded.
pub trait ContractReader {
    /// `DaoRegistry.proposals(proposalId)`: `(adapterAddress, flags)`.
    fn proposal(&self, dao: &[u8], proposal_id: &[u8; 32]) -> Option<(Vec<u8>, BigInt)>;

    /// `DaoRegistry.inverseAdapters(adapterAddress)`: `(adapterId, acl)`.
    fn inverse_adapter(&self, dao: &[u8], adapter: &[u8]) -> Option<([u8; 32], BigInt)>;

    fn extension_address(&self, dao: &[u8], extension_id: &[u8; 32]) -> Option<Vec<u8>>;

    /// DAO owning a bank extension.
    fn bank_dao(&self, bank: &[u8]) -> Option<Vec<u8>>;

    fn bank_balance(&self, bank: &[u8], member: &[u8], token: &[u8]) -> Option<BigInt>;

    fn erc20_name(&self, token: &[u8]) -> Option<String>;

    fn erc20_symbol(&self, token: &[u8]) -> Option<String>;

    fn erc20_total_supply(&self, token: &[u8]) -> Option<BigInt>;

    fn erc20_balance(&self, token: &[u8], account: &[u8]) -> Option<BigInt>;

    /// `IVoting.getAdapterName()`.
    fn adapter_name(&self, adapter: &[u8]) -> Option<String>;

    fn votes(
        &self,
        kind: VotingAdapterKind,
        adapter: &[u8],
        dao: &[u8],
        proposal_id: &[u8; 32],
    ) -> Option<VotingResult>;

    /// `voteResult(dao, proposalId)`: the adapter's numeric voting state.
    fn vote_state(
        &self,
        kind: VotingAdapterKind,
        adapter: &[u8],
        dao: &[u8],
        proposal_id: &[u8; 32],
    ) -> Option<BigInt>;
}

/// Reader that encodes calls through the generated contract bindings and decodes their
/// output. Where the calls are answered is up to `C`.
pub struct AbiContractReader<C: EthCall> {
    calls: C,
}

impl<C: EthCall> AbiContractReader<C> {
    pub fn new(calls: C) -> Self {
        Self { calls }
    }

    pub fn into_inner(self) -> C {
        self.calls
    }

    fn read<F, T>(&self, address: &[u8], function: F) -> Option<T>
    where
        F: Function + RPCDecodable<T>,
    {
        let output = self
            .calls
            .eth_call(address, function.encode())?;
        match F::output(&output) {
            Ok(value) => Some(value),
            Err(err) => {
                log::info!("{} output from {} failed to decode: {}", F::NAME, to_hex(address), err);
                None
            }
        }
    }
}

impl<C: EthCall> ContractReader for AbiContractReader<C> {
    fn proposal(&self, dao: &[u8], proposal_id: &[u8; 32]) -> Option<(Vec<u8>, BigInt)> {
        self.read(dao, dao_registry::functions::Proposals { proposal_id: *proposal_id })
    }

    fn inverse_adapter(&self, dao: &[u8], adapter: &[u8]) -> Option<([u8; 32], BigInt)> {
        self.read(
            dao,
            dao_registry::functions::InverseAdapters { adapter_address: adapter.to_vec() },
        )
    }

    fn extension_address(&self, dao: &[u8], extension_id: &[u8; 32]) -> Option<Vec<u8>> {
        self.read(dao, dao_registry::functions::GetExtensionAddress { extension_id: *extension_id })
    }

    fn bank_dao(&self, bank: &[u8]) -> Option<Vec<u8>> {
        self.read(bank, bank_extension::functions::Dao {})
    }

    fn bank_balance(&self, bank: &[u8], member: &[u8], token: &[u8]) -> Option<BigInt> {
        self.read(
            bank,
            bank_extension::functions::BalanceOf {
                member: member.to_vec(),
                token_addr: token.to_vec(),
            },
        )
    }

    fn erc20_name(&self, token: &[u8]) -> Option<String> {
        self.read(token, erc20_extension::functions::Name {})
    }

    fn erc20_symbol(&self, token: &[u8]) -> Option<String> {
        self.read(token, erc20_extension::functions::Symbol {})
    }

    fn erc20_total_supply(&self, token: &[u8]) -> Option<BigInt> {
        self.read(token, erc20_extension::functions::TotalSupply {})
    }

    fn erc20_balance(&self, token: &[u8], account: &[u8]) -> Option<BigInt> {
        self.read(token, erc20_extension::functions::BalanceOf { account: account.to_vec() })
    }

    fn adapter_name(&self, adapter: &[u8]) -> Option<String> {
        self.read(adapter, i_voting::functions::GetAdapterName {})
    }

    fn votes(
        &self,
        kind: VotingAdapterKind,
        adapter: &[u8],
        dao: &[u8],
        proposal_id: &[u8; 32],
    ) -> Option<VotingResult> {
        match kind {
            VotingAdapterKind::OnChain => self
                .read(
                    adapter,
                    voting_contract::functions::Votes { dao: dao.to_vec(), proposal_id: *proposal_id },
                )
                .map(|(nb_yes, nb_no, starting_time, block_number)| VotingResult::OnChain {
                    nb_yes,
                    nb_no,
                    starting_time,
                    block_number,
                }),
            VotingAdapterKind::Offchain(OffchainLayout::Current) => self
                .read(
                    adapter,
                    offchain_voting_contract::functions::Votes {
                        dao: dao.to_vec(),
                        proposal_id: *proposal_id,
                    },
                )
                .map(
                    |(
                        snapshot,
                        reporter,
                        result_root,
                        nb_yes,
                        nb_no,
                        starting_time,
                        grace_period_starting_time,
                        is_challenged,
                        step_requested,
                        force_failed,
                        fallback_votes_count,
                    )| VotingResult::Offchain {
                        snapshot,
                        reporter,
                        result_root,
                        nb_yes,
                        nb_no,
                        starting_time,
                        grace_period_starting_time,
                        is_challenged,
                        step_requested: Some(step_requested),
                        force_failed,
                        fallback_votes_count,
                    },
                ),
            VotingAdapterKind::Offchain(OffchainLayout::Legacy) => self
                .read(
                    adapter,
                    offchain_voting_contract_v1::functions::Votes {
                        dao: dao.to_vec(),
                        proposal_id: *proposal_id,
                    },
                )
                .map(
                    |(
                        snapshot,
                        reporter,
                        result_root,
                        nb_yes,
                        nb_no,
                        starting_time,
                        grace_period_starting_time,
                        is_challenged,
                        force_failed,
                        fallback_votes_count,
                    )| VotingResult::Offchain {
                        snapshot,
                        reporter,
                        result_root,
                        nb_yes,
                        nb_no,
                        starting_time,
                        grace_period_starting_time,
                        is_challenged,
                        step_requested: None,
                        force_failed,
                        fallback_votes_count,
                    },
                ),
        }
    }

    fn vote_state(
        &self,
        kind: VotingAdapterKind,
        adapter: &[u8],
        dao: &[u8],
        proposal_id: &[u8; 32],
    ) -> Option<BigInt> {
        let (dao, proposal_id) = (dao.to_vec(), *proposal_id);
        match kind {
            VotingAdapterKind::OnChain => self
                .read(adapter, voting_contract::functions::VoteResult { dao, proposal_id }),
            VotingAdapterKind::Offchain(OffchainLayout::Current) => self.read(
                adapter,
                offchain_voting_contract::functions::VoteResult { dao, proposal_id },
            ),
            VotingAdapterKind::Offchain(OffchainLayout::Legacy) => self.read(
                adapter,
                offchain_voting_contract_v1::functions::VoteResult { dao, proposal_id },
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{calls::RecordedCalls, pb::tribute::v1::ContractRead};
    use ethabi::{Token, Uint};

    fn answered(to: &[u8], data: Vec<u8>, output: Vec<u8>) -> ContractRead {
        ContractRead { to: to.to_vec(), data, failed: false, output }
    }

    #[test]
    fn test_abi_reader_decodes_call_outputs() {
        let adapter = [0xe1; 20];
        let bank = [0xba; 20];
        let balance_call = bank_extension::functions::BalanceOf {
            member: vec![0xa1; 20],
            token_addr: vec![0x01; 20],
        };
        let reader = AbiContractReader::new(RecordedCalls::new(&[
            answered(
                &adapter,
                i_voting::functions::GetAdapterName {}.encode(),
                ethabi::encode(&[Token::String("VotingContract".to_string())]),
            ),
            answered(&bank, balance_call.encode(), ethabi::encode(&[Token::Uint(Uint::from(42))])),
            ContractRead {
                to: bank.to_vec(),
                data: bank_extension::functions::Dao {}.encode(),
                failed: true,
                output: vec![],
            },
        ]));

        assert_eq!(reader.adapter_name(&adapter), Some("VotingContract".to_string()));
        assert_eq!(reader.bank_balance(&bank, &[0xa1; 20], &[0x01; 20]), Some(BigInt::from(42)));
        assert_eq!(reader.bank_dao(&bank), None);
    }

    #[test]
    fn test_abi_reader_rejects_undecodable_output() {
        let token = [0xe0; 20];
        let reader = AbiContractReader::new(RecordedCalls::new(&[answered(
            &token,
            erc20_extension::functions::TotalSupply {}.encode(),
            vec![0x01, 0x02],
        )]));

        assert_eq!(reader.erc20_total_supply(&token), None);
    }

    #[test]
    fn test_kind_from_adapter_name() {
        assert_eq!(
            VotingAdapterKind::from_adapter_name("VotingContract", true),
            Some(VotingAdapterKind::OnChain)
        );
        assert_eq!(
            VotingAdapterKind::from_adapter_name("OffchainVotingContract", true),
            Some(VotingAdapterKind::Offchain(OffchainLayout::Current))
        );
        assert_eq!(
            VotingAdapterKind::from_adapter_name("OffchainVotingContract", false),
            Some(VotingAdapterKind::Offchain(OffchainLayout::Legacy))
        );
        assert_eq!(VotingAdapterKind::from_adapter_name("SnapshotProposalContract", false), None);
        assert_eq!(VotingAdapterKind::from_adapter_name("", true), None);
    }

    #[test]
    fn test_tally() {
        let result = VotingResult::OnChain {
            nb_yes: BigInt::from(7),
            nb_no: BigInt::from(2),
            starting_time: BigInt::from(100),
            block_number: BigInt::from(50),
        };

        assert_eq!(result.tally(), (&BigInt::from(7), &BigInt::from(2)));
    }
}
