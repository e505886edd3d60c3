use super::domain::{AdmissionApplication, ApplicationStatus};

/// A candidate positioned in a course's merit order for one admission cycle.
#[derive(Debug, Clone)]
pub struct RankedCandidate {
    pub rank: u32,
    pub application: AdmissionApplication,
}

/// The pending pool contained nothing at or above the eligibility threshold.
///
/// Surfaced to callers as an empty-result condition, not a fault; the
/// orchestrator must not mutate anything when it sees this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("no eligible applications found")]
pub struct NoEligibleCandidates;

/// Order a course's application pool by merit.
///
/// Only `pending` applications at or above `eligibility_percentage` enter the
/// ordering — the pending filter is the precondition that makes repeated
/// settlement runs safe, so it is enforced here rather than left to the
/// caller's query. Ordering: declared percentage descending, ties broken by
/// earlier submission. The sort is stable, so identical input multisets
/// always produce identical rankings.
pub fn rank_applications(
    applications: Vec<AdmissionApplication>,
    eligibility_percentage: f64,
) -> Result<Vec<RankedCandidate>, NoEligibleCandidates> {
    let mut eligible: Vec<AdmissionApplication> = applications
        .into_iter()
        .filter(|application| application.status == ApplicationStatus::Pending)
        .filter(|application| application.percentage >= eligibility_percentage)
        .collect();

    if eligible.is_empty() {
        return Err(NoEligibleCandidates);
    }

    eligible.sort_by(|a, b| {
        b.percentage
            .total_cmp(&a.percentage)
            .then_with(|| a.submitted_at.cmp(&b.submitted_at))
    });

    Ok(eligible
        .into_iter()
        .zip(1u32..)
        .map(|(application, rank)| RankedCandidate { rank, application })
        .collect())
}
