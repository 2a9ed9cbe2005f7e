use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use rocket::serde::{Deserialize, Serialize};

// Types the `Any` driver can carry:
// i32
// i64
// f32
// f64
// bool
// String
// so timestamps travel as unix milliseconds.

pub type ScoreId = i64;
/// Elapsed race time in milliseconds.
pub type RaceTime = i64;
pub type Rings = i64;

/// A validated score that has not been stored yet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewScore {
    pub name: String,
    pub email: String,
    pub time: RaceTime,
    pub rings: Option<Rings>,
}

#[derive(Clone, Serialize, Deserialize, PartialEq, Eq, Debug)]
#[serde(crate = "rocket::serde")]
#[serde(rename_all = "camelCase")]
pub struct ScoreRecord {
    pub id: ScoreId,
    pub name: String,
    pub email: String,
    pub time: RaceTime,
    pub rings: Option<Rings>,
    pub created_at: DateTime<Utc>,
}

impl ScoreRecord {
    pub fn new(id: ScoreId, score: NewScore, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: score.name,
            email: score.email,
            time: score.time,
            rings: score.rings,
            created_at,
        }
    }
}

/// Ranking order: fastest time first, then more rings, then older id.
/// A record without rings loses a tie against one that has them.
impl Ord for ScoreRecord {
    fn cmp(&self, other: &Self) -> Ordering {
        self.time
            .cmp(&other.time)
            .then_with(|| match (self.rings, other.rings) {
                (Some(a), Some(b)) => b.cmp(&a),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            })
            .then_with(|| self.id.cmp(&other.id))
    }
}

impl PartialOrd for ScoreRecord {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
