//! CSV export of group standings.

use crate::models::GroupStandings;
use serde::Serialize;
use std::io::Write;

#[derive(Serialize)]
struct StandingRow<'a> {
    group: &'a str,
    rank: u32,
    participant_id: String,
    played: u32,
    wins: u32,
    draws: u32,
    losses: u32,
    points_for: u64,
    points_against: u64,
    point_difference: i64,
    points: i64,
}

/// Write one row per standing, groups in the given order, with a header row.
pub fn write_standings_csv<W: Write>(groups: &[GroupStandings], out: W) -> csv::Result<()> {
    let mut wtr = csv::Writer::from_writer(out);
    for g in groups {
        for s in &g.standings {
            wtr.serialize(StandingRow {
                group: &g.group_name,
                rank: s.rank,
                participant_id: s.participant_id.to_string(),
                played: s.played,
                wins: s.wins,
                draws: s.draws,
                losses: s.losses,
                points_for: s.points_for,
                points_against: s.points_against,
                point_difference: s.point_difference,
                points: s.total_points,
            })?;
        }
    }
    wtr.flush()?;
    Ok(())
}
