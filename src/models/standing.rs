//! Standing: derived group-stage record of one participant (never persisted).

use crate::models::group::GroupId;
use crate::models::participant::ParticipantId;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Standing {
    pub participant_id: ParticipantId,
    pub played: u32,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub points_for: u64,
    pub points_against: u64,
    pub point_difference: i64,
    pub total_points: i64,
    /// 1-based, strictly ordinal.
    pub rank: u32,
}

impl Standing {
    pub fn new(participant_id: ParticipantId) -> Self {
        Self {
            participant_id,
            ..Self::default()
        }
    }
}

/// Ranked standings of one group (for API / display).
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GroupStandings {
    pub group_id: GroupId,
    pub group_name: String,
    pub standings: Vec<Standing>,
}
