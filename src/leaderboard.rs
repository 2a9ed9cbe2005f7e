use rocket::serde::{Deserialize, Serialize};

/// A ranked list of items, always kept in ascending `Ord` order
/// (best item first).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leaderboard<T: LeaderboardItem> {
    collection: Vec<T>,
}

impl<T: LeaderboardItem> Leaderboard<T> {
    pub fn new(mut collection: Vec<T>) -> Self {
        collection.sort();
        Self { collection }
    }

    #[cfg(test)]
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.collection.iter()
    }

    pub fn len(&self) -> usize {
        self.collection.len()
    }
}

impl<T: LeaderboardItem> Serialize for Leaderboard<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: rocket::serde::Serializer,
    {
        self.collection.serialize(serializer)
    }
}

impl<'de, T: LeaderboardItem> Deserialize<'de> for Leaderboard<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: rocket::serde::Deserializer<'de>,
    {
        Ok(Self::new(Vec::deserialize(deserializer)?))
    }
}

pub trait LeaderboardItem: Ord + Serialize {}

impl<T: Ord + Serialize> LeaderboardItem for T {}
