/// Standings: aggregate recorded match scores into ranked tables.
///
/// This half of the crate is independent of scheduling. It consumes scores
/// for arbitrary team numbers (whatever the organizer printed on the
/// sign-up sheet) and produces per-team statistics plus rankings with
/// head-to-head tiebreaking and shared-place ranges.
use std::collections::HashMap;

/// Winner of the most recent meeting for each canonical team pair.
pub type HeadToHead = HashMap<(u32, u32), u32>;

/// A recorded match result between two teams.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MatchScore {
    pub team_a: u32,
    pub score_a: u32,
    pub team_b: u32,
    pub score_b: u32,
    /// Game number from the transcript header, when one was present.
    pub game: Option<u32>,
}

impl MatchScore {
    /// The winning team. Scores must be decisive; a draw here is a caller
    /// bug, since validation rejects drawn lines before they get this far.
    pub fn winner(&self) -> u32 {
        assert!(
            self.score_a != self.score_b,
            "match scores must be decisive"
        );
        if self.score_a > self.score_b {
            self.team_a
        } else {
            self.team_b
        }
    }
}

/// Accumulated record of one team.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TeamStats {
    pub team: u32,
    pub games: u32,
    pub wins: u32,
    pub losses: u32,
    pub points_for: u32,
    pub points_against: u32,
}

impl TeamStats {
    fn blank(team: u32) -> Self {
        TeamStats {
            team,
            games: 0,
            wins: 0,
            losses: 0,
            points_for: 0,
            points_against: 0,
        }
    }

    /// Point differential, the classic quality-of-wins measure.
    pub fn diff(&self) -> i64 {
        self.points_for as i64 - self.points_against as i64
    }
}

/// Which ordering a ranking uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RankingMode {
    /// Wins first, then point diff, then points scored.
    Wins,
    /// Points scored first, then wins, then point diff. Rewards teams that
    /// keep games close even when they lose them.
    Points,
}

/// One row of a finished ranking. `place_start == place_end` for a sole
/// place; a shared group spans the same range on every one of its rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StandingRow {
    pub stats: TeamStats,
    pub place_start: usize,
    pub place_end: usize,
}

impl StandingRow {
    pub fn is_shared(&self) -> bool {
        self.place_start != self.place_end
    }

    /// The place as it prints: `3` for a sole place, `3–4` for a shared one.
    pub fn place_label(&self) -> String {
        if self.is_shared() {
            format!("{}–{}", self.place_start, self.place_end)
        } else {
            self.place_start.to_string()
        }
    }
}

fn team_key(a: u32, b: u32) -> (u32, u32) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Aggregate raw scores into per-team stats plus the head-to-head map.
///
/// Teams come back in ascending number order. The head-to-head map keeps
/// the winner of each pairing's LAST meeting, which is how a rematch
/// settles an earlier result.
pub fn compute_stats(scores: &[MatchScore]) -> (Vec<TeamStats>, HeadToHead) {
    let mut by_team: HashMap<u32, TeamStats> = HashMap::new();
    let mut h2h: HeadToHead = HashMap::new();

    for score in scores {
        let winner = score.winner();

        let a = by_team
            .entry(score.team_a)
            .or_insert_with(|| TeamStats::blank(score.team_a));
        a.games += 1;
        a.points_for += score.score_a;
        a.points_against += score.score_b;
        if winner == score.team_a {
            a.wins += 1;
        } else {
            a.losses += 1;
        }

        let b = by_team
            .entry(score.team_b)
            .or_insert_with(|| TeamStats::blank(score.team_b));
        b.games += 1;
        b.points_for += score.score_b;
        b.points_against += score.score_a;
        if winner == score.team_b {
            b.wins += 1;
        } else {
            b.losses += 1;
        }

        h2h.insert(team_key(score.team_a, score.team_b), winner);
    }

    let mut stats: Vec<TeamStats> = by_team.into_values().collect();
    stats.sort_by_key(|s| s.team);
    (stats, h2h)
}

fn sort_key(s: &TeamStats, mode: RankingMode) -> (i64, i64, i64) {
    match mode {
        RankingMode::Wins => (s.wins as i64, s.diff(), s.points_for as i64),
        RankingMode::Points => (s.points_for as i64, s.wins as i64, s.diff()),
    }
}

/// Rank teams under `mode`.
///
/// Teams sort descending on the mode's key. A two-way tie between teams
/// that actually met is settled by their last meeting, winner first; any
/// other tie is left shared and its rows carry a place range instead of
/// an arbitrary order. Groups of three or more always share, since a
/// head-to-head cycle cannot order them.
pub fn rank_teams(stats: &[TeamStats], h2h: &HeadToHead, mode: RankingMode) -> Vec<StandingRow> {
    let mut sorted = stats.to_vec();
    // Stable sort: teams with equal keys stay in ascending number order.
    sorted.sort_by(|a, b| sort_key(b, mode).cmp(&sort_key(a, mode)));

    let mut rows: Vec<StandingRow> = Vec::with_capacity(sorted.len());
    let mut place = 1;
    let mut i = 0;
    while i < sorted.len() {
        let mut j = i + 1;
        while j < sorted.len() && sort_key(&sorted[j], mode) == sort_key(&sorted[i], mode) {
            j += 1;
        }
        let group = &mut sorted[i..j];

        if group.len() == 2 {
            if let Some(&winner) = h2h.get(&team_key(group[0].team, group[1].team)) {
                if group[0].team != winner {
                    group.swap(0, 1);
                }
                rows.push(StandingRow {
                    stats: group[0],
                    place_start: place,
                    place_end: place,
                });
                rows.push(StandingRow {
                    stats: group[1],
                    place_start: place + 1,
                    place_end: place + 1,
                });
                place += 2;
                i = j;
                continue;
            }
        }

        let end = place + group.len() - 1;
        for entry in group.iter() {
            rows.push(StandingRow {
                stats: *entry,
                place_start: place,
                place_end: end,
            });
        }
        place = end + 1;
        i = j;
    }

    rows
}
