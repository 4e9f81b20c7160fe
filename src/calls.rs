use std::{cell::RefCell, collections::BTreeMap};

use substreams::log;
use substreams_ethereum::pb::eth::rpc::{RpcCall, RpcCalls};

use crate::{identifiers::to_hex, pb::tribute::v1::ContractRead};

type CallKey = (Vec<u8>, Vec<u8>);

/// Raw `eth_call` transport. Returns the call's return data, `None` when it reverted.
pub trait EthCall {
    fn eth_call(&self, to: &[u8], data: Vec<u8>) -> Option<Vec<u8>>;
}

/// Live substreams `eth_call`, only available inside the wasm runtime.
#[derive(Debug, Default, Clone, Copy)]
pub struct RpcEthCall;

impl EthCall for RpcEthCall {
    fn eth_call(&self, to: &[u8], data: Vec<u8>) -> Option<Vec<u8>> {
        let calls = RpcCalls { calls: vec![RpcCall { to_addr: to.to_vec(), data }] };
        let response = substreams_ethereum::rpc::eth_call(&calls)
            .responses
            .into_iter()
            .next()?;
        if response.failed {
            None
        } else {
            Some(response.raw)
        }
    }
}

/// Forwards calls to `inner` and keeps every distinct call with its outcome. A repeated call is
/// answered from the recording.
pub struct RecordingEthCall<'a, C: EthCall> {
    inner: &'a C,
    recorded: RefCell<BTreeMap<CallKey, Option<Vec<u8>>>>,
}

impl<'a, C: EthCall> RecordingEthCall<'a, C> {
    pub fn new(inner: &'a C) -> Self {
        Self { inner, recorded: RefCell::new(BTreeMap::new()) }
    }

    pub fn into_reads(self) -> Vec<ContractRead> {
        self.recorded
            .into_inner()
            .into_iter()
            .map(|((to, data), output)| ContractRead {
                to,
                data,
                failed: output.is_none(),
                output: output.unwrap_or_default(),
            })
            .collect()
    }
}

impl<C: EthCall> EthCall for RecordingEthCall<'_, C> {
    fn eth_call(&self, to: &[u8], data: Vec<u8>) -> Option<Vec<u8>> {
        let key = (to.to_vec(), data);
        if let Some(output) = self.recorded.borrow().get(&key) {
            return output.clone();
        }
        let output = self.inner.eth_call(to, key.1.clone());
        self.recorded
            .borrow_mut()
            .insert(key, output.clone());
        output
    }
}

/// Answers calls from the reads recorded for a block.
#[derive(Debug, Default)]
pub struct RecordedCalls {
    reads: BTreeMap<CallKey, Option<Vec<u8>>>,
}

impl RecordedCalls {
    pub fn new(reads: &[ContractRead]) -> Self {
        Self {
            reads: reads
                .iter()
                .map(|read| {
                    let output = (!read.failed).then(|| read.output.clone());
                    ((read.to.clone(), read.data.clone()), output)
                })
                .collect(),
        }
    }
}

impl EthCall for RecordedCalls {
    fn eth_call(&self, to: &[u8], data: Vec<u8>) -> Option<Vec<u8>> {
        match self.reads.get(&(to.to_vec(), data)) {
            Some(output) => output.clone(),
            None => {
                log::info!("No recorded eth_call to {}, treating it as reverted", to_hex(to));
                None
            }
        }
    }
}
