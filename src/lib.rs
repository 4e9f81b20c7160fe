pub mod abi;
pub mod calls;
pub mod consts;
pub mod contracts;
pub mod data_sources;
pub mod entities;
pub mod events;
pub mod identifiers;
pub mod indexer;
pub mod modules;
pub mod params;
pub mod pb;
pub mod prefetch;
pub mod store;

#[cfg(test)]
pub mod testing;

pub use indexer::Indexer;

substreams_ethereum::init!();
