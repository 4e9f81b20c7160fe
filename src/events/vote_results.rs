use anyhow::Result;
use substreams::log;

use crate::{
    contracts::{VotingAdapterKind, VotingResult},
    events::HandlerContext,
    identifiers::{to_hex, vote_id},
    pb::tribute::v1::{Proposal, Vote},
};

/// Copies a voting result positionally into the proposal's denormalized vote fields.
fn apply_voting_result(proposal: &mut Proposal, result: &VotingResult) {
    match result {
        VotingResult::OnChain { nb_yes, nb_no, starting_time, block_number } => {
            proposal.nb_yes = nb_yes.to_string();
            proposal.nb_no = nb_no.to_string();
            proposal.starting_time = starting_time.to_string();
            proposal.block_number = block_number.to_string();
        }
        VotingResult::Offchain {
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
        } => {
            proposal.snapshot = snapshot.to_string();
            proposal.reporter = reporter.clone();
            proposal.result_root = result_root.to_vec();
            proposal.nb_yes = nb_yes.to_string();
            proposal.nb_no = nb_no.to_string();
            proposal.starting_time = starting_time.to_string();
            proposal.grace_period_starting_time = grace_period_starting_time.to_string();
            proposal.is_challenged = *is_challenged;
            if let Some(step) = step_requested {
                proposal.step_requested = step.to_string();
            }
            proposal.force_failed = *force_failed;
            proposal.fallback_votes_count = fallback_votes_count.to_string();
        }
    }
}

/// Asks the proposal's voting adapter what it is, reads its result for the proposal and
/// back-fills the vote fields of `proposal`. Saves the resulting `Vote`; the caller owns
/// persisting the proposal.
///
/// Proposals without a voting adapter, and adapters whose name cannot be read or is not a known
/// voting implementation, are left untouched and produce no vote.
pub fn resolve_vote_results(
    ctx: &mut HandlerContext,
    proposal_id: &[u8; 32],
    proposal: &mut Proposal,
) -> Result<()> {
    if proposal.voting_adapter.is_empty() {
        log::debug!("Proposal {} has no voting adapter", proposal.id);
        return Ok(());
    }
    let dao = ctx.address().to_vec();
    let adapter = proposal.voting_adapter.clone();

    let Some(adapter_name) = ctx.reader.adapter_name(&adapter) else {
        log::info!(
            "getAdapterName reverted on {}, block {}",
            to_hex(&adapter),
            ctx.block_number()
        );
        return Ok(());
    };
    let current_layout = ctx
        .config
        .uses_current_offchain_layout(&adapter);
    let Some(kind) = VotingAdapterKind::from_adapter_name(&adapter_name, current_layout) else {
        log::debug!("Unknown voting adapter {} at {}", adapter_name, to_hex(&adapter));
        return Ok(());
    };
    log::debug!("Resolving votes of {} with {:?}", proposal.id, kind);

    let id = vote_id(&dao, proposal_id);
    let mut vote = Vote {
        id: id.clone(),
        adapter_name,
        adapter_address: adapter.clone(),
        nb_yes: "0".to_string(),
        nb_no: "0".to_string(),
        proposal: proposal.id.clone(),
    };

    match ctx
        .reader
        .votes(kind, &adapter, &dao, proposal_id)
    {
        Some(result) => {
            let (nb_yes, nb_no) = result.tally();
            vote.nb_yes = nb_yes.to_string();
            vote.nb_no = nb_no.to_string();

            apply_voting_result(proposal, &result);
            proposal.voting_result = id;

            match ctx
                .reader
                .vote_state(kind, &adapter, &dao, proposal_id)
            {
                Some(state) => proposal.voting_state = state.to_string(),
                None => log::info!(
                    "{} voteResult reverted, {}",
                    vote.adapter_name,
                    ctx.block_number()
                ),
            }
        }
        None => log::info!("{} try_votes reverted, {}", vote.adapter_name, ctx.block_number()),
    }

    ctx.save(&vote);
    Ok(())
}
