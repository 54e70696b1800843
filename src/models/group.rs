//! Group of the group stage.

use crate::models::participant::ParticipantId;
use crate::models::tournament::TournamentId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a group.
pub type GroupId = Uuid;

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub tournament_id: TournamentId,
    /// "Group A", "Group B", ... derived from `position`.
    pub name: String,
    /// 0-based position in the tournament's group plan.
    pub position: usize,
    pub capacity: usize,
    /// Members in draw order. The schedule is generated from this order.
    pub members: Vec<ParticipantId>,
}

impl Group {
    pub fn new(
        tournament_id: TournamentId,
        position: usize,
        capacity: usize,
        members: Vec<ParticipantId>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            tournament_id,
            name: group_name(position),
            position,
            capacity,
            members,
        }
    }
}

/// Display name for a group position: 0 -> "Group A", 25 -> "Group Z", 26 -> "Group AA".
pub fn group_name(position: usize) -> String {
    let mut letters = Vec::new();
    let mut n = position + 1;
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push((b'A' + rem as u8) as char);
        n = (n - 1) / 26;
    }
    letters.reverse();
    format!("Group {}", letters.into_iter().collect::<String>())
}
