use substreams::hex;
use tiny_keccak::{Hasher, Keccak};

pub type Address = [u8; 20];

// Reserved internal addresses used by the bank extension for bookkeeping.
pub const UNITS: Address = hex!("00000000000000000000000000000000000Ff1CE");
pub const GUILD: Address = hex!("000000000000000000000000000000000000dead");
pub const TOTAL: Address = hex!("000000000000000000000000000000000000babe");
pub const MEMBER_COUNT: Address = hex!("00000000000000000000000000000000decafbad");
pub const ESCROW: Address = hex!("0000000000000000000000000000000000004bec");

/// keccak256("bank")
pub const BANK_EXTENSION_ID: [u8; 32] =
    hex!("ea0ca03c7adbe41dc655fec28a9209dc8e6e042f3d991a67765ba285b9cf73a0");
/// keccak256("erc20-ext")
pub const ERC20_EXTENSION_ID: [u8; 32] =
    hex!("77d63af07d7aad7f422b79cf9d7285aec3f3e6f32e6e4391f1ce842d752663fd");

pub const VOTING_CONTRACT_NAME: &str = "VotingContract";
pub const OFFCHAIN_VOTING_CONTRACT_NAME: &str = "OffchainVotingContract";

/// Offchain voting adapter deployed with the upgraded `votes()` layout (adds `stepRequested`).
pub const OFFCHAIN_VOTING_V2_ADDRESS: Address = hex!("ffe158C044bE67C06a869E7DE92F437934c799b1");

pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    let mut output = [0u8; 32];
    hasher.update(data);
    hasher.finalize(&mut output);
    output
}

/// Addresses that stand for bank pseudo-accounts and must never be booked as members or tokens.
#[derive(Debug, Clone, PartialEq)]
pub struct ReservedAddresses {
    pub units: Address,
    pub guild: Address,
    pub total: Address,
    pub member_count: Address,
    pub escrow: Address,
}

impl Default for ReservedAddresses {
    fn default() -> Self {
        Self { units: UNITS, guild: GUILD, total: TOTAL, member_count: MEMBER_COUNT, escrow: ESCROW }
    }
}

impl ReservedAddresses {
    /// Whether `address` is one of the sentinels excluded from member bookkeeping.
    ///
    /// `UNITS` is not part of that set: it names the internal units token, so balance events
    /// carry it as their token address for every ordinary member.
    pub fn is_reserved(&self, address: &[u8]) -> bool {
        [self.total, self.guild, self.member_count, self.escrow]
            .iter()
            .any(|reserved| reserved.as_slice() == address)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExtensionIds {
    pub bank: [u8; 32],
    pub erc20: [u8; 32],
}

impl Default for ExtensionIds {
    fn default() -> Self {
        Self { bank: BANK_EXTENSION_ID, erc20: ERC20_EXTENSION_ID }
    }
}

impl ExtensionIds {
    pub fn from_names(bank: &str, erc20: &str) -> Self {
        Self { bank: keccak256(bank.as_bytes()), erc20: keccak256(erc20.as_bytes()) }
    }

    pub fn kind_of(&self, extension_id: &[u8]) -> Option<ExtensionKind> {
        if extension_id == self.bank {
            Some(ExtensionKind::Bank)
        } else if extension_id == self.erc20 {
            Some(ExtensionKind::Erc20)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtensionKind {
    Bank,
    Erc20,
}
