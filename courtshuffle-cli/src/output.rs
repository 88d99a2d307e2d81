/// Output formatting: text for humans, JSON for scripts, CSV for spreadsheets.
use std::collections::BTreeMap;

use chrono::{Duration, NaiveTime};
use courtshuffle_core::{Match, RankingMode, SessionSchedule, StandingRow, TeamStats};
use serde::Serialize;

/// How many rows each ranking contributes to the share text. Enough for a
/// whole club night, short enough to paste into a chat.
const SHARE_TOP_N: usize = 16;

/// Spreadsheets only detect UTF-8 reliably when the file starts with a BOM.
const UTF8_BOM: &str = "\u{feff}";

/// Courts are assigned strongest-first: matches sort by the average rank of
/// their two pairs, so court 1 always hosts the top of the list.
fn court_order(round: &[Match]) -> Vec<Match> {
    let mut ordered = round.to_vec();
    ordered.sort_by_key(|m| m.a + m.b);
    ordered
}

fn round_time(start: NaiveTime, round_minutes: u32, round_index: usize) -> String {
    let offset = Duration::minutes(round_minutes as i64 * round_index as i64);
    (start + offset).format("%H:%M").to_string()
}

/// The schedule as printable text, one block per round.
pub fn render_schedule_text(
    names: &[String],
    schedule: &SessionSchedule,
    start: NaiveTime,
    round_minutes: u32,
) -> String {
    let mut out = String::new();
    for (r, round) in schedule.rounds.iter().enumerate() {
        if r > 0 {
            out.push('\n');
        }
        out.push_str(&format!(
            "Tour {} ({})\n",
            r + 1,
            round_time(start, round_minutes, r)
        ));
        for (court, m) in court_order(round).iter().enumerate() {
            let note = if m.forced_repeat_early {
                "  [early repeat]"
            } else {
                ""
            };
            out.push_str(&format!(
                "  Court {}: {} vs {}{}\n",
                court + 1,
                names[m.a],
                names[m.b],
                note
            ));
        }
    }
    out
}

#[derive(Serialize)]
struct JsonMatch<'a> {
    court: usize,
    rank_a: usize,
    rank_b: usize,
    pair_a: &'a str,
    pair_b: &'a str,
    forced_repeat_early: bool,
}

#[derive(Serialize)]
struct JsonRound<'a> {
    round: usize,
    time: String,
    matches: Vec<JsonMatch<'a>>,
}

#[derive(Serialize)]
struct JsonSchedule<'a> {
    seed: u64,
    rounds_requested: usize,
    rounds_actual: usize,
    forced_early_repeats: usize,
    rounds: Vec<JsonRound<'a>>,
}

/// The schedule as pretty JSON with the seed and degradation counters, so
/// a script can both consume and reproduce the run.
pub fn render_schedule_json(
    names: &[String],
    schedule: &SessionSchedule,
    start: NaiveTime,
    round_minutes: u32,
) -> String {
    let rounds: Vec<JsonRound> = schedule
        .rounds
        .iter()
        .enumerate()
        .map(|(r, round)| JsonRound {
            round: r + 1,
            time: round_time(start, round_minutes, r),
            matches: court_order(round)
                .iter()
                .enumerate()
                .map(|(court, m)| JsonMatch {
                    court: court + 1,
                    rank_a: m.a,
                    rank_b: m.b,
                    pair_a: names[m.a].as_str(),
                    pair_b: names[m.b].as_str(),
                    forced_repeat_early: m.forced_repeat_early,
                })
                .collect(),
        })
        .collect();

    let output = JsonSchedule {
        seed: schedule.seed,
        rounds_requested: schedule.rounds_requested,
        rounds_actual: schedule.rounds_actual(),
        forced_early_repeats: schedule.forced_early_repeats,
        rounds,
    };

    serde_json::to_string_pretty(&output).unwrap()
}

/// Display name for a team number, falling back to `Team N` when the
/// sign-up list doesn't cover it.
pub fn team_name(teams: &BTreeMap<u32, String>, team: u32) -> String {
    match teams.get(&team) {
        Some(name) => name.clone(),
        None => format!("Team {team}"),
    }
}

fn name_width(names: &[String]) -> usize {
    names
        .iter()
        .map(|name| name.chars().count())
        .max()
        .unwrap_or(4)
        .max(4)
}

/// Per-team statistics as an aligned table, teams in number order.
pub fn render_stats_table(stats: &[TeamStats], teams: &BTreeMap<u32, String>) -> String {
    let names: Vec<String> = stats.iter().map(|s| team_name(teams, s.team)).collect();
    let width = name_width(&names);

    let mut out = String::new();
    out.push_str(&format!(
        "{:>4}  {:<width$}  {:>5}  {:>4}  {:>6}  {:>4}  {:>4}  {:>5}\n",
        "Team", "Pair", "Games", "Wins", "Losses", "PF", "PA", "DIFF"
    ));
    for (s, name) in stats.iter().zip(&names) {
        out.push_str(&format!(
            "{:>4}  {:<width$}  {:>5}  {:>4}  {:>6}  {:>4}  {:>4}  {:>5}\n",
            s.team,
            name,
            s.games,
            s.wins,
            s.losses,
            s.points_for,
            s.points_against,
            s.diff()
        ));
    }
    out
}

fn ranking_heading(mode: RankingMode) -> &'static str {
    match mode {
        RankingMode::Wins => "Ranking A (by wins)",
        RankingMode::Points => "Ranking B (by points scored)",
    }
}

/// A finished ranking as an aligned table. Shared places print as a range
/// on every row of the tied group.
pub fn render_ranking_table(
    rows: &[StandingRow],
    teams: &BTreeMap<u32, String>,
    mode: RankingMode,
) -> String {
    let names: Vec<String> = rows
        .iter()
        .map(|r| team_name(teams, r.stats.team))
        .collect();
    let width = name_width(&names);
    let place_width = rows
        .iter()
        .map(|r| r.place_label().chars().count())
        .max()
        .unwrap_or(5)
        .max(5);

    let mut out = String::new();
    out.push_str(&format!("{}\n", ranking_heading(mode)));
    out.push_str(&format!(
        "{:>place_width$}  {:<width$}  {:>5}  {:>4}  {:>6}  {:>4}  {:>4}  {:>5}\n",
        "Place", "Pair", "Games", "Wins", "Losses", "PF", "PA", "DIFF"
    ));
    for (row, name) in rows.iter().zip(&names) {
        out.push_str(&format!(
            "{:>place_width$}  {:<width$}  {:>5}  {:>4}  {:>6}  {:>4}  {:>4}  {:>5}\n",
            row.place_label(),
            name,
            row.stats.games,
            row.stats.wins,
            row.stats.losses,
            row.stats.points_for,
            row.stats.points_against,
            row.stats.diff()
        ));
    }
    out
}

fn share_section(
    out: &mut String,
    heading: &str,
    rows: &[StandingRow],
    teams: &BTreeMap<u32, String>,
) {
    out.push_str(heading);
    out.push('\n');
    for row in rows.iter().take(SHARE_TOP_N) {
        out.push_str(&format!(
            "{}. {}: {} wins, {}:{} ({:+})\n",
            row.place_label(),
            team_name(teams, row.stats.team),
            row.stats.wins,
            row.stats.points_for,
            row.stats.points_against,
            row.stats.diff()
        ));
    }
}

/// Both rankings as compact text made for pasting into a group chat.
pub fn render_share_text(
    wins: &[StandingRow],
    points: &[StandingRow],
    teams: &BTreeMap<u32, String>,
) -> String {
    let mut out = String::new();
    share_section(&mut out, ranking_heading(RankingMode::Wins), wins, teams);
    out.push('\n');
    share_section(
        &mut out,
        ranking_heading(RankingMode::Points),
        points,
        teams,
    );
    out
}

#[derive(Serialize)]
struct JsonTeamStats {
    team: u32,
    name: String,
    games: u32,
    wins: u32,
    losses: u32,
    points_for: u32,
    points_against: u32,
    diff: i64,
}

#[derive(Serialize)]
struct JsonRankedTeam {
    place_start: usize,
    place_end: usize,
    place: String,
    team: u32,
    name: String,
    games: u32,
    wins: u32,
    losses: u32,
    points_for: u32,
    points_against: u32,
    diff: i64,
}

#[derive(Serialize)]
struct JsonStandings {
    stats: Vec<JsonTeamStats>,
    ranking_wins: Vec<JsonRankedTeam>,
    ranking_points: Vec<JsonRankedTeam>,
}

fn json_ranked(rows: &[StandingRow], teams: &BTreeMap<u32, String>) -> Vec<JsonRankedTeam> {
    rows.iter()
        .map(|row| JsonRankedTeam {
            place_start: row.place_start,
            place_end: row.place_end,
            place: row.place_label(),
            team: row.stats.team,
            name: team_name(teams, row.stats.team),
            games: row.stats.games,
            wins: row.stats.wins,
            losses: row.stats.losses,
            points_for: row.stats.points_for,
            points_against: row.stats.points_against,
            diff: row.stats.diff(),
        })
        .collect()
}

/// Stats plus both rankings as pretty JSON.
pub fn render_standings_json(
    stats: &[TeamStats],
    wins: &[StandingRow],
    points: &[StandingRow],
    teams: &BTreeMap<u32, String>,
) -> String {
    let output = JsonStandings {
        stats: stats
            .iter()
            .map(|s| JsonTeamStats {
                team: s.team,
                name: team_name(teams, s.team),
                games: s.games,
                wins: s.wins,
                losses: s.losses,
                points_for: s.points_for,
                points_against: s.points_against,
                diff: s.diff(),
            })
            .collect(),
        ranking_wins: json_ranked(wins, teams),
        ranking_points: json_ranked(points, teams),
    };
    serde_json::to_string_pretty(&output).unwrap()
}

fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Per-team statistics as CSV, BOM included so spreadsheets decode it.
pub fn stats_csv(stats: &[TeamStats], teams: &BTreeMap<u32, String>) -> String {
    let mut out = String::from(UTF8_BOM);
    out.push_str("Team,Pair,Games,Wins,Losses,PF,PA,DIFF\n");
    for s in stats {
        out.push_str(&format!(
            "{},{},{},{},{},{},{},{}\n",
            s.team,
            csv_field(&team_name(teams, s.team)),
            s.games,
            s.wins,
            s.losses,
            s.points_for,
            s.points_against,
            s.diff()
        ));
    }
    out
}

/// A ranking as CSV, BOM included.
pub fn ranking_csv(rows: &[StandingRow], teams: &BTreeMap<u32, String>) -> String {
    let mut out = String::from(UTF8_BOM);
    out.push_str("Place,Team,Pair,Games,Wins,Losses,PF,PA,DIFF\n");
    for row in rows {
        out.push_str(&format!(
            "{},{},{},{},{},{},{},{},{}\n",
            row.place_label(),
            row.stats.team,
            csv_field(&team_name(teams, row.stats.team)),
            row.stats.games,
            row.stats.wins,
            row.stats.losses,
            row.stats.points_for,
            row.stats.points_against,
            row.stats.diff()
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use courtshuffle_core::{schedule_session, SessionConfig};

    fn demo_names(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("Pair {}", i + 1)).collect()
    }

    #[test]
    fn test_court_order_puts_strongest_match_first() {
        let round = vec![
            Match {
                a: 4,
                b: 5,
                forced_repeat_early: false,
            },
            Match {
                a: 0,
                b: 1,
                forced_repeat_early: false,
            },
        ];
        let ordered = court_order(&round);
        assert_eq!((ordered[0].a, ordered[0].b), (0, 1));
        assert_eq!((ordered[1].a, ordered[1].b), (4, 5));
    }

    #[test]
    fn test_schedule_text_layout() {
        let schedule = schedule_session(&SessionConfig {
            n_pairs: 4,
            courts: 2,
            rounds_requested: 1,
            max_gap: 10,
            max_repeat_per_matchup: 1,
            repeat_tail_rounds: 2,
            seed: Some(42),
        });
        let start = NaiveTime::from_hms_opt(19, 0, 0).unwrap();
        let text = render_schedule_text(&demo_names(4), &schedule, start, 12);
        assert!(text.starts_with("Tour 1 (19:00)\n"));
        assert!(text.contains("  Court 1: "));
        assert!(text.contains("  Court 2: "));
    }

    #[test]
    fn test_round_times_advance_by_round_minutes() {
        let start = NaiveTime::from_hms_opt(23, 50, 0).unwrap();
        assert_eq!(round_time(start, 12, 0), "23:50");
        assert_eq!(round_time(start, 12, 1), "00:02"); // wraps past midnight
    }

    #[test]
    fn test_team_name_falls_back_to_number() {
        let mut teams = BTreeMap::new();
        teams.insert(1, "Alex + Sam".to_string());
        assert_eq!(team_name(&teams, 1), "Alex + Sam");
        assert_eq!(team_name(&teams, 9), "Team 9");
    }

    #[test]
    fn test_csv_quotes_names_with_commas() {
        assert_eq!(csv_field("Alex + Sam"), "Alex + Sam");
        assert_eq!(csv_field("Smith, Jones"), "\"Smith, Jones\"");
        assert_eq!(csv_field("The \"Aces\""), "\"The \"\"Aces\"\"\"");
    }
}
