//! Deterministic entity ids. Every id is derived from the DAO address and on-chain identifiers
//! only, so replaying an event always lands on the same rows.

pub fn to_hex<T: AsRef<[u8]>>(bytes: T) -> String {
    format!("0x{}", hex::encode(bytes))
}

pub fn dao_id(dao: &[u8]) -> String {
    to_hex(dao)
}

fn scoped(dao: &[u8], tag: &str, key: &str) -> String {
    format!("{}-{}-{}", to_hex(dao), tag, key)
}

pub fn member_id(dao: &[u8], member: &[u8]) -> String {
    scoped(dao, "member", &to_hex(member))
}

pub fn adapter_id(dao: &[u8], adapter_id: &[u8]) -> String {
    scoped(dao, "adapter", &to_hex(adapter_id))
}

pub fn extension_id(dao: &[u8], extension_id: &[u8]) -> String {
    scoped(dao, "extension", &to_hex(extension_id))
}

pub fn proposal_id(dao: &[u8], proposal_id: &[u8]) -> String {
    scoped(dao, "proposal", &to_hex(proposal_id))
}

pub fn vote_id(dao: &[u8], proposal_id: &[u8]) -> String {
    scoped(dao, "vote", &to_hex(proposal_id))
}

pub fn bank_id(dao: &[u8], bank: &[u8]) -> String {
    scoped(dao, "bank", &to_hex(bank))
}

pub fn token_id(dao: &[u8], token: &[u8]) -> String {
    scoped(dao, "token", &to_hex(token))
}

pub fn token_holder_id(dao: &[u8], token: &[u8], member: &[u8]) -> String {
    scoped(dao, "tokenholder", &format!("{}-{}", to_hex(token), to_hex(member)))
}

/// `nonce` is the decimal rendering of the coupon nonce.
pub fn coupon_id(dao: &[u8], nonce: &str, member: &[u8]) -> String {
    scoped(dao, "coupon", &format!("{}-{}", nonce, to_hex(member)))
}
