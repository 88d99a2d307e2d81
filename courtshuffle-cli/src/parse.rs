/// Line parsing for pair lists, team lists and match-result transcripts.
///
/// These formats are what people paste out of a group chat, so parsing is
/// forgiving about whitespace and headers, and strict about scores. Every
/// problem line is reported with its line number instead of aborting at
/// the first one.
use std::collections::BTreeMap;

use courtshuffle_core::constants::MAX_POINTS_GUARD;
use courtshuffle_core::MatchScore;

use crate::bail;

/// Parse a ranked pair list: either a JSON array of names or plain text
/// with one name per line, strongest first. Inner whitespace runs collapse
/// to a single space and blank entries are dropped.
pub fn parse_pair_list(content: &str) -> Vec<String> {
    let trimmed = content.trim();
    let lines: Vec<String> = if trimmed.starts_with('[') {
        // Try JSON array
        serde_json::from_str(trimmed)
            .unwrap_or_else(|e| bail(format!("File looks like JSON but failed to parse: {e}")))
    } else {
        trimmed.lines().map(|l| l.to_string()).collect()
    };

    lines
        .iter()
        .map(|l| l.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|s| !s.is_empty())
        .collect()
}

/// Parse a team list: `<number> <name>` per line. Lines that don't match
/// are skipped, and a duplicated number keeps its last name.
pub fn parse_team_list(content: &str) -> BTreeMap<u32, String> {
    let mut teams = BTreeMap::new();
    for raw in content.lines() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        let (number, name) = match line.split_once(char::is_whitespace) {
            Some(parts) => parts,
            None => continue,
        };
        if !number.bytes().all(|b| b.is_ascii_digit()) {
            continue;
        }
        if let Ok(team) = number.parse::<u32>() {
            let name = name.trim();
            if !name.is_empty() {
                teams.insert(team, name.to_string());
            }
        }
    }
    teams
}

/// A parsed results transcript: the recognized scores plus one message per
/// problem line.
pub struct ParsedResults {
    pub scores: Vec<MatchScore>,
    pub errors: Vec<String>,
}

/// Parse a results transcript.
///
/// `Game N` headers set the game number for the lines that follow; every
/// other non-blank line must read `A x-y B` (team, score, dash, score,
/// team), with free spacing around the dash.
pub fn parse_results(content: &str) -> ParsedResults {
    let mut scores = Vec::new();
    let mut errors = Vec::new();
    let mut current_game: Option<u32> = None;

    for (idx, raw) in content.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(game) = parse_game_header(line) {
            current_game = Some(game);
            continue;
        }

        let (team_a, score_a, score_b, team_b) = match parse_match_line(line) {
            Some(parts) => parts,
            None => {
                errors.push(format!("line {line_no}: unrecognized format: {line}"));
                continue;
            }
        };

        if team_a == team_b {
            errors.push(format!("line {line_no}: both sides are team {team_a}"));
            continue;
        }

        if let Some(problem) = validate_score(score_a, score_b) {
            errors.push(format!(
                "line {line_no}: score {score_a}-{score_b} rejected ({problem})"
            ));
            continue;
        }

        scores.push(MatchScore {
            team_a,
            score_a,
            team_b,
            score_b,
            game: current_game,
        });
    }

    ParsedResults { scores, errors }
}

/// `Game N`, case-insensitive. Anything else is not a header.
fn parse_game_header(line: &str) -> Option<u32> {
    let mut parts = line.split_whitespace();
    let keyword = parts.next()?;
    if !keyword.eq_ignore_ascii_case("game") {
        return None;
    }
    let number = parts.next()?;
    if parts.next().is_some() {
        return None;
    }
    if !number.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    number.parse().ok()
}

/// `A x-y B` with free spacing: team number, score, dash, score, team number.
fn parse_match_line(line: &str) -> Option<(u32, u32, u32, u32)> {
    let (team_a, rest) = split_leading_number(line)?;
    let (score_a, rest) = split_leading_number(rest.trim_start())?;
    let rest = rest.trim_start().strip_prefix('-')?;
    let (score_b, rest) = split_leading_number(rest.trim_start())?;
    let (team_b, rest) = split_leading_number(rest.trim_start())?;
    if !rest.trim().is_empty() {
        return None;
    }
    Some((team_a, score_a, score_b, team_b))
}

fn split_leading_number(s: &str) -> Option<(u32, &str)> {
    let end = s
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(s.len());
    if end == 0 {
        return None;
    }
    let value = s[..end].parse().ok()?;
    Some((value, &s[end..]))
}

/// Sanity rules only. A draw is impossible in badminton scoring, and a
/// score above [`MAX_POINTS_GUARD`] is presumed a typo such as `211-19`.
fn validate_score(score_a: u32, score_b: u32) -> Option<String> {
    if score_a == score_b {
        return Some("a draw is not possible".to_string());
    }
    if score_a.max(score_b) > MAX_POINTS_GUARD {
        return Some(format!(
            "scores above {MAX_POINTS_GUARD} look like typos"
        ));
    }
    None
}
