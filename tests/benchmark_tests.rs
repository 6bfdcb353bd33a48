//! Performance benchmarks for the hot paths of a guess

use bincode::{deserialize, serialize};
use server::roster::index::RosterIndex;
use server::session::GameSession;
use shared::{compare, EntityRecord, EntitySummary, Packet, Position, SessionId};
use std::time::Instant;

const POSITIONS: [&str; 7] = ["PG", "SG", "SF", "PF", "C", "G-F", "F-C"];

fn record(id: u32) -> EntityRecord {
    EntityRecord {
        id,
        name: format!("Player {:04}", id),
        team: format!("Team {}", id % 30),
        team_abbreviation: format!("T{:02}", id % 30),
        division: format!("Division {}", id % 6),
        conference: if id % 2 == 0 { "East" } else { "West" }.to_string(),
        age: 19 + id % 20,
        height_inches: 70 + id % 18,
        jersey_number: id % 100,
        scoring_rate: (id % 350) as f64 / 10.0,
        position: Position::parse(POSITIONS[id as usize % POSITIONS.len()]).unwrap(),
        image_url: None,
    }
}

fn summaries(count: u32) -> Vec<EntitySummary> {
    (1..=count).map(|id| record(id).summary()).collect()
}

/// Benchmarks the comparison engine
#[test]
fn benchmark_compare() {
    let records: Vec<EntityRecord> = (1..=100).map(record).collect();
    let target = record(7);

    let iterations = 100_000;
    let start = Instant::now();

    for i in 0..iterations {
        let _ = compare(&records[i % records.len()], &target);
    }

    let duration = start.elapsed();
    println!(
        "Compare: {} iterations in {:?} ({:.2} ns/iter)",
        iterations,
        duration,
        duration.as_nanos() as f64 / iterations as f64
    );

    // Should complete in under 2 seconds for 100k iterations
    assert!(duration.as_millis() < 2000);
}

/// Benchmarks name search over a full-size roster
#[test]
fn benchmark_roster_search() {
    let index = RosterIndex::build(summaries(600));
    let queries = ["player 01", "player", "team", "00", "zz"];

    let iterations = 2_000;
    let start = Instant::now();

    for i in 0..iterations {
        let _ = index.search(queries[i % queries.len()], 20);
    }

    let duration = start.elapsed();
    println!(
        "Roster search: {} iterations in {:?} ({:.2} μs/iter)",
        iterations,
        duration,
        duration.as_micros() as f64 / iterations as f64
    );

    // Should complete in under 2 seconds
    assert!(duration.as_millis() < 2000);
}

/// Benchmarks building the index from a raw roster
#[test]
fn benchmark_index_build() {
    let roster = summaries(600);

    let iterations = 200;
    let start = Instant::now();

    for _ in 0..iterations {
        let index = RosterIndex::build(roster.clone());
        assert_eq!(index.len(), 600);
    }

    let duration = start.elapsed();
    println!(
        "Index build: {} iterations in {:?} ({:.2} μs/iter)",
        iterations,
        duration,
        duration.as_micros() as f64 / iterations as f64
    );

    assert!(duration.as_millis() < 2000);
}

/// Benchmarks a full game worth of guesses against the session state machine
#[test]
fn benchmark_session_games() {
    let games = 5_000;
    let start = Instant::now();

    for game in 0..games {
        let mut session = GameSession::new(SessionId(format!("{:032x}", game)), record(1), 8);
        for id in 2..=9 {
            let _ = session.apply_guess(record(id));
        }
        assert!(session.status().is_terminal());
    }

    let duration = start.elapsed();
    println!(
        "Session games: {} games in {:?} ({:.2} μs/game)",
        games,
        duration,
        duration.as_micros() as f64 / games as f64
    );

    assert!(duration.as_millis() < 3000);
}

/// Benchmarks encoding and decoding of the largest reply packet
#[test]
fn benchmark_session_state_packet() {
    let mut session = GameSession::new(SessionId::from("bench"), record(1), 8);
    for id in 2..=9 {
        let _ = session.apply_guess(record(id));
    }
    let packet = Packet::SessionState {
        request_id: 1,
        view: session.view(),
    };

    let encoded = serialize(&packet).unwrap();
    assert!(encoded.len() < shared::MAX_PACKET_SIZE);

    let iterations = 10_000;
    let start = Instant::now();

    for _ in 0..iterations {
        let data = serialize(&packet).unwrap();
        let _: Packet = deserialize(&data).unwrap();
    }

    let duration = start.elapsed();
    println!(
        "SessionState packet ({} bytes): {} iterations in {:?} ({:.2} μs/iter)",
        encoded.len(),
        iterations,
        duration,
        duration.as_micros() as f64 / iterations as f64
    );

    assert!(duration.as_millis() < 3000);
}
