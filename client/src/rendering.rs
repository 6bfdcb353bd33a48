//! Plain-text rendering of search results and guess feedback

use shared::{
    AttributeKey, Comparison, EntityRecord, EntitySummary, GameStatus, GuessOutcome, SessionView,
    VerdictStatus,
};
use std::fmt::Write;

const LABEL_WIDTH: usize = 12;
const VALUE_WIDTH: usize = 24;

/// Single-character marker shown next to each attribute
pub fn marker(status: VerdictStatus) -> &'static str {
    match status {
        VerdictStatus::Correct => "✓",
        VerdictStatus::Higher => "↑",
        VerdictStatus::Lower => "↓",
        VerdictStatus::Partial => "~",
        VerdictStatus::Incorrect => "✗",
    }
}

pub fn render_summaries(players: &[EntitySummary]) -> String {
    if players.is_empty() {
        return "No players found".to_string();
    }

    let mut out = String::new();
    for player in players {
        let _ = writeln!(out, "{:>8}  {:<28} {}", player.id, player.name, player.team);
    }
    out.trim_end().to_string()
}

/// One line per attribute. Target values are only shown when `reveal` is set.
pub fn render_comparison(comparison: &Comparison, reveal: bool) -> String {
    let mut out = String::new();
    for (key, verdict) in comparison {
        let label = key_label(*key);
        let guessed = verdict.guessed.to_string();
        let _ = write!(
            out,
            "  {} {:<LABEL_WIDTH$} {:<VALUE_WIDTH$}",
            marker(verdict.status),
            label,
            guessed
        );
        if reveal {
            let _ = write!(out, " (target {})", verdict.target);
        }
        out.push('\n');
    }
    out.trim_end().to_string()
}

fn key_label(key: AttributeKey) -> &'static str {
    match key {
        AttributeKey::Team => "Team",
        AttributeKey::Division => "Division",
        AttributeKey::Conference => "Conference",
        AttributeKey::Age => "Age",
        AttributeKey::Height => "Height",
        AttributeKey::Position => "Position",
        AttributeKey::JerseyNumber => "Jersey",
        AttributeKey::ScoringRate => "PPG",
    }
}

fn render_target(target: &EntityRecord) -> String {
    format!("The player was {} ({}, #{})", target.name, target.team, target.jersey_number)
}

pub fn render_outcome(outcome: &GuessOutcome, max_guesses: Option<u32>) -> String {
    let mut out = String::new();

    let _ = match max_guesses {
        Some(max) => writeln!(
            out,
            "Guess {}/{}: {}",
            outcome.guess_number, max, outcome.guessed_entity.name
        ),
        None => writeln!(out, "Guess {}: {}", outcome.guess_number, outcome.guessed_entity.name),
    };
    let _ = writeln!(out, "{}", render_comparison(&outcome.comparison, outcome.is_game_over));

    if outcome.is_won {
        let _ = writeln!(out, "Correct! You found them in {} guesses.", outcome.guess_number);
    } else if outcome.is_game_over {
        let _ = writeln!(out, "Out of guesses.");
        if let Some(target) = &outcome.target {
            let _ = writeln!(out, "{}", render_target(target));
        }
    }

    out.trim_end().to_string()
}

pub fn render_view(view: &SessionView) -> String {
    let mut out = String::new();

    let status = match view.status {
        GameStatus::Active => "in progress",
        GameStatus::Won => "won",
        GameStatus::Lost => "lost",
    };
    let _ = writeln!(
        out,
        "Game {} ({}), {}/{} guesses used",
        view.session_id, status, view.guess_count, view.max_guesses
    );

    for guess in &view.guesses {
        let _ = writeln!(out, "#{} {}", guess.guess_number, guess.guessed_entity.name);
        let _ = writeln!(out, "{}", render_comparison(&guess.comparison, view.is_game_over));
    }

    if let Some(target) = &view.target {
        let _ = writeln!(out, "{}", render_target(target));
    }

    out.trim_end().to_string()
}
