use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

mod archives;
pub use archives::*;

mod top100;
pub use top100::*;

mod tournament;
pub use tournament::*;

/// A player as listed on a game record.
#[skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    #[serde(default)]
    pub name: String,
    pub rank: Option<String>,
}

impl Player {
    /// The recorded rank, empty if the record has none.
    pub fn rank_or_empty(&self) -> String {
        self.rank.clone().unwrap_or_default()
    }
}
