use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Top100 {
    #[serde(default)]
    pub players: Vec<RankedPlayer>,
}

#[skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedPlayer {
    pub position: Option<u32>,
    #[serde(default)]
    pub name: String,
    pub rank: Option<String>,
    pub uri: Option<String>,
}
