use anyhow::Result;
use substreams::log;

use crate::{
    events::{to_bytes32, vote_results::resolve_vote_results, EventHandler, HandlerContext},
    identifiers::{dao_id, member_id, proposal_id, to_hex},
    pb::tribute::v1::{ProcessedProposal, Proposal, SponsoredProposal, SubmittedProposal},
};

fn fill_if_unset<T: Default + PartialEq>(field: &mut T, value: T) {
    if *field == T::default() {
        *field = value;
    }
}

fn new_proposal(dao: &[u8], id: String, raw_proposal_id: &[u8]) -> Proposal {
    Proposal {
        id,
        tribute_dao: dao_id(dao),
        proposal_id: raw_proposal_id.to_vec(),
        ..Default::default()
    }
}

impl EventHandler for SubmittedProposal {
    fn handle(&self, ctx: &mut HandlerContext) -> Result<()> {
        let dao = ctx.address().to_vec();
        let raw_id = to_bytes32(&self.proposal_id)?;
        log::info!(
            "SubmittedProposal dao {} proposalId {}",
            to_hex(&dao),
            to_hex(raw_id)
        );

        let structural = ctx.reader.proposal(&dao, &raw_id);
        if structural.is_none() {
            log::info!("proposals({}) reverted, {}", to_hex(raw_id), ctx.block_number());
        }
        let inverse = structural
            .as_ref()
            .and_then(|(adapter, _)| ctx.reader.inverse_adapter(&dao, adapter));
        if let (Some((adapter, _)), None) = (&structural, &inverse) {
            log::info!("inverseAdapters({}) reverted, {}", to_hex(adapter), ctx.block_number());
        }

        let id = proposal_id(&dao, &raw_id);
        let mut proposal = ctx
            .load::<Proposal>(&id)?
            .unwrap_or_else(|| new_proposal(&dao, id, &raw_id));

        // identity fields are first-write-wins, lifecycle flags are never touched here
        fill_if_unset(&mut proposal.tribute_dao, dao_id(&dao));
        fill_if_unset(&mut proposal.proposal_id, raw_id.to_vec());
        fill_if_unset(&mut proposal.flags, self.flags.clone());
        fill_if_unset(&mut proposal.submitted_by, ctx.tx_from().to_vec());
        fill_if_unset(&mut proposal.member, member_id(&dao, ctx.tx_from()));
        if let Some((adapter_address, _)) = structural {
            fill_if_unset(&mut proposal.adapter_address, adapter_address);
        }
        if let Some((adapter_id, _)) = inverse {
            fill_if_unset(&mut proposal.adapter_id, adapter_id.to_vec());
        }

        ctx.save(&proposal);
        Ok(())
    }
}

impl EventHandler for SponsoredProposal {
    fn handle(&self, ctx: &mut HandlerContext) -> Result<()> {
        let dao = ctx.address().to_vec();
        let raw_id = to_bytes32(&self.proposal_id)?;
        log::info!(
            "SponsoredProposal dao {} proposalId {} votingAdapter {}",
            to_hex(&dao),
            to_hex(raw_id),
            to_hex(&self.voting_adapter)
        );

        let id = proposal_id(&dao, &raw_id);
        let mut proposal = match ctx.load::<Proposal>(&id)? {
            Some(proposal) => proposal,
            None => {
                log::debug!("Sponsored proposal {} was never submitted, creating it", id);
                new_proposal(&dao, id, &raw_id)
            }
        };

        proposal.flags = self.flags.clone();
        proposal.sponsored_at = ctx.timestamp();
        proposal.sponsored = true;
        proposal.sponsored_by = ctx.tx_from().to_vec();
        proposal.voting_adapter = self.voting_adapter.clone();

        ctx.save(&proposal);
        Ok(())
    }
}

impl EventHandler for ProcessedProposal {
    fn handle(&self, ctx: &mut HandlerContext) -> Result<()> {
        let dao = ctx.address().to_vec();
        let raw_id = to_bytes32(&self.proposal_id)?;
        log::info!("ProcessedProposal dao {} proposalId {}", to_hex(&dao), to_hex(raw_id));

        let id = proposal_id(&dao, &raw_id);
        let Some(mut proposal) = ctx.load::<Proposal>(&id)? else {
            log::info!("Processed proposal {} is unknown, dropping the event", id);
            return Ok(());
        };

        resolve_vote_results(ctx, &raw_id, &mut proposal)?;

        proposal.flags = self.flags.clone();
        proposal.processed_at = ctx.timestamp();
        proposal.processed = true;
        proposal.processed_by = ctx.tx_from().to_vec();

        ctx.save(&proposal);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        contracts::{VotingAdapterKind, VotingResult},
        pb::tribute::v1::{dao_event::Kind, Vote},
        store::EntityStoreExt,
        testing::*,
    };

    fn submitted(n: u8, flags: &str) -> Kind {
        Kind::SubmittedProposal(SubmittedProposal {
            proposal_id: bytes32(n).to_vec(),
            flags: flags.to_string(),
        })
    }

    fn sponsored(n: u8, flags: &str) -> Kind {
        Kind::SponsoredProposal(SponsoredProposal {
            proposal_id: bytes32(n).to_vec(),
            flags: flags.to_string(),
            voting_adapter: VOTING_ADAPTER.to_vec(),
        })
    }

    fn processed(n: u8, flags: &str) -> Kind {
        Kind::ProcessedProposal(ProcessedProposal {
            proposal_id: bytes32(n).to_vec(),
            flags: flags.to_string(),
        })
    }

    fn load(harness: &Harness, n: u8) -> Option<Proposal> {
        harness
            .store
            .load::<Proposal>(&proposal_id(&DAO, &bytes32(n)))
            .unwrap()
    }

    fn reader() -> MockContractReader {
        MockContractReader::default()
            .with_proposal(&DAO, bytes32(1), &ADAPTER, 1)
            .with_inverse_adapter(&DAO, &ADAPTER, bytes32(0xad), 255)
    }

    #[test]
    fn test_submitted_creates_proposal() {
        let mut harness = Harness::new(reader());

        harness
            .handle(&event(&DAO, submitted(1, "1")))
            .unwrap();

        let proposal = load(&harness, 1).unwrap();
        assert_eq!(proposal.tribute_dao, dao_id(&DAO));
        assert_eq!(proposal.proposal_id, bytes32(1).to_vec());
        assert_eq!(proposal.adapter_address, ADAPTER.to_vec());
        assert_eq!(proposal.adapter_id, bytes32(0xad).to_vec());
        assert_eq!(proposal.flags, "1");
        assert_eq!(proposal.submitted_by, SENDER.to_vec());
        assert_eq!(proposal.member, member_id(&DAO, &SENDER));
        assert!(!proposal.sponsored);
        assert!(!proposal.processed);
    }

    #[test]
    fn test_submitted_tolerates_reverted_reads() {
        let mut harness = Harness::new(MockContractReader::default());

        harness
            .handle(&event(&DAO, submitted(1, "1")))
            .unwrap();

        let proposal = load(&harness, 1).unwrap();
        assert!(proposal.adapter_address.is_empty());
        assert!(proposal.adapter_id.is_empty());
        assert_eq!(proposal.flags, "1");
    }

    #[test]
    fn test_resubmission_keeps_first_identity_and_flags() {
        let mut harness = Harness::new(reader());
        harness
            .handle(&event(&DAO, sponsored(1, "3")))
            .unwrap();

        harness
            .handle(&event(&DAO, submitted(1, "1")))
            .unwrap();

        let proposal = load(&harness, 1).unwrap();
        assert!(proposal.sponsored);
        assert_eq!(proposal.flags, "3");
        // still unset identity fields are filled in
        assert_eq!(proposal.adapter_address, ADAPTER.to_vec());
        assert_eq!(proposal.submitted_by, SENDER.to_vec());
    }

    #[test]
    fn test_sponsored_without_submission_creates_stub() {
        let mut harness = Harness::new(MockContractReader::default());

        harness
            .handle(&event(&DAO, sponsored(2, "3")))
            .unwrap();

        let proposal = load(&harness, 2).unwrap();
        assert!(proposal.sponsored);
        assert!(!proposal.processed);
        assert_eq!(proposal.tribute_dao, dao_id(&DAO));
        assert_eq!(proposal.sponsored_at, TIMESTAMP.to_string());
        assert_eq!(proposal.sponsored_by, SENDER.to_vec());
        assert_eq!(proposal.voting_adapter, VOTING_ADAPTER.to_vec());
    }

    #[test]
    fn test_processed_unknown_proposal_is_dropped() {
        let mut harness = Harness::new(MockContractReader::default());

        harness
            .handle(&event(&DAO, processed(9, "7")))
            .unwrap();

        assert!(harness.store.is_empty());
    }

    #[test]
    fn test_full_lifecycle() {
        let reader = reader()
            .with_adapter_name(&VOTING_ADAPTER, "VotingContract")
            .with_votes(
                &VOTING_ADAPTER,
                bytes32(1),
                VotingAdapterKind::OnChain,
                VotingResult::OnChain {
                    nb_yes: big(7),
                    nb_no: big(2),
                    starting_time: big(100),
                    block_number: big(50),
                },
            )
            .with_vote_state(&VOTING_ADAPTER, bytes32(1), 2);
        let mut harness = Harness::new(reader);

        for kind in [submitted(1, "1"), sponsored(1, "3"), processed(1, "7")] {
            harness
                .handle(&event(&DAO, kind))
                .unwrap();
        }

        let proposal = load(&harness, 1).unwrap();
        assert!(proposal.sponsored);
        assert!(proposal.processed);
        assert_eq!(proposal.flags, "7");
        assert_eq!(proposal.processed_at, TIMESTAMP.to_string());
        assert_eq!(proposal.processed_by, SENDER.to_vec());
        assert_eq!(proposal.nb_yes, "7");
        assert_eq!(proposal.nb_no, "2");
        assert_eq!(proposal.voting_state, "2");

        let vote_id = crate::identifiers::vote_id(&DAO, &bytes32(1));
        assert_eq!(proposal.voting_result, vote_id);
        let vote = harness
            .store
            .load::<Vote>(&vote_id)
            .unwrap()
            .unwrap();
        assert_eq!((vote.nb_yes.as_str(), vote.nb_no.as_str()), ("7", "2"));
    }

    #[test]
    fn test_processed_with_reverted_votes_is_still_processed() {
        let reader = reader().with_adapter_name(&VOTING_ADAPTER, "VotingContract");
        let mut harness = Harness::new(reader);

        for kind in [submitted(1, "1"), sponsored(1, "3"), processed(1, "7")] {
            harness
                .handle(&event(&DAO, kind))
                .unwrap();
        }

        let proposal = load(&harness, 1).unwrap();
        assert!(proposal.processed);
        assert_eq!(proposal.nb_yes, "");
        assert_eq!(proposal.nb_no, "");
    }

    #[test]
    fn test_unknown_voting_adapter_name_writes_no_vote() {
        let reader = reader().with_adapter_name(&VOTING_ADAPTER, "SnapshotProposalContract");
        let mut harness = Harness::new(reader);

        for kind in [submitted(1, "1"), sponsored(1, "3"), processed(1, "7")] {
            harness
                .handle(&event(&DAO, kind))
                .unwrap();
        }

        let proposal = load(&harness, 1).unwrap();
        assert!(proposal.processed);
        assert!(proposal.voting_result.is_empty());
        assert_eq!(harness.store.count("Vote"), 0);
    }

    #[test]
    fn test_malformed_proposal_id_is_an_error() {
        let mut harness = Harness::new(MockContractReader::default());
        let kind = Kind::SubmittedProposal(SubmittedProposal {
            proposal_id: vec![1, 2, 3],
            flags: "1".to_string(),
        });

        assert!(harness.handle(&event(&DAO, kind)).is_err());
    }
}
