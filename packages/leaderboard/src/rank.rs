//! Ranking and global summary statistics.
//!
//! Converts an accumulated [`Tally`] into the ordered leaderboard served to
//! clients. Entries are sorted by total descending; equal totals are ordered
//! by participant name ascending so repeated runs over the same data produce
//! byte-identical output. Ranks are dense 1-based positions over the sorted
//! sequence; tied participants still receive distinct consecutive ranks.

use serde::{Deserialize, Serialize};

use crate::tally::{Tally, round_div};

/// Sentinel top-participant name for an empty leaderboard.
pub const NO_TOP_PARTICIPANT: &str = "N/A";

/// One ranked leaderboard row.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct LeaderboardEntry {
    /// 1-based dense rank.
    #[schema(example = 1)]
    pub rank: u32,
    /// Participant name exactly as it appears in name lists.
    #[schema(example = "Alice")]
    pub name: String,
    /// Sum of all counted amounts.
    #[schema(example = 600)]
    pub total: u64,
    /// Average counted amount, rounded half-up.
    #[schema(example = 300)]
    pub average: u64,
    /// Largest single counted amount.
    #[schema(example = 300)]
    pub highest: u32,
}

/// Cross-cutting statistics over the whole leaderboard.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct GlobalStats {
    /// Number of distinct participants.
    pub participant_count: u64,
    /// Sum of every participant's total.
    pub total_distributed: u64,
    /// `round(total_distributed / participant_count)`, 0 when empty.
    pub average_per_participant: u64,
    /// Name at rank 1, or `"N/A"` when the board is empty.
    pub top_participant: String,
}

impl GlobalStats {
    /// The zeroed stats of an empty leaderboard.
    pub fn empty() -> Self {
        Self {
            participant_count: 0,
            total_distributed: 0,
            average_per_participant: 0,
            top_participant: NO_TOP_PARTICIPANT.to_string(),
        }
    }
}

/// The ranked leaderboard plus its global summary.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Leaderboard {
    pub entries: Vec<LeaderboardEntry>,
    pub global_stats: GlobalStats,
}

impl Leaderboard {
    /// The well-formed empty leaderboard, also used as the degraded fallback
    /// shape when source rows cannot be fetched.
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
            global_stats: GlobalStats::empty(),
        }
    }

    /// Compute the leaderboard from (amount, name-list blob) pairs belonging
    /// to completed distributions.
    pub fn compute<'a, I>(awards: I) -> Self
    where
        I: IntoIterator<Item = (u32, &'a str)>,
    {
        Self::from_tally(Tally::from_awards(awards))
    }

    /// Rank an accumulated tally and derive its global statistics.
    pub fn from_tally(tally: Tally) -> Self {
        let mut rows: Vec<(String, crate::tally::ParticipantTotals)> =
            tally.into_inner().into_iter().collect();
        rows.sort_by(|(a_name, a), (b_name, b)| {
            b.total.cmp(&a.total).then_with(|| a_name.cmp(b_name))
        });

        let entries: Vec<LeaderboardEntry> = rows
            .into_iter()
            .enumerate()
            .map(|(i, (name, totals))| LeaderboardEntry {
                rank: i as u32 + 1,
                name,
                total: totals.total,
                average: totals.average(),
                highest: totals.highest,
            })
            .collect();

        let total_distributed: u64 = entries.iter().map(|e| e.total).sum();
        let global_stats = if entries.is_empty() {
            GlobalStats::empty()
        } else {
            GlobalStats {
                participant_count: entries.len() as u64,
                total_distributed,
                average_per_participant: round_div(total_distributed, entries.len() as u64),
                top_participant: entries[0].name.clone(),
            }
        };

        Self {
            entries,
            global_stats,
        }
    }
}
