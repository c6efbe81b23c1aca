use serde::{Deserialize, Serialize};
use serde_with::{formats::PreferMany, serde_as, skip_serializing_none, OneOrMany};

use crate::models::Player;

#[skip_serializing_none]
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Archives {
    pub user: Option<String>,
    pub year: Option<u32>,
    pub month: Option<u32>,
    #[serde(default)]
    pub games: Vec<Game>,
}

#[skip_serializing_none]
#[serde_as]
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Game {
    pub sgf_url: Option<String>,
    pub board_size: Option<u32>,
    pub handicap: Option<u32>,
    pub komi: Option<f64>,
    #[serde(rename = "type")]
    pub game_type: Option<String>,
    #[serde(default)]
    #[serde_as(as = "OneOrMany<_, PreferMany>")]
    pub black: Vec<Player>,
    #[serde(default)]
    #[serde_as(as = "OneOrMany<_, PreferMany>")]
    pub white: Vec<Player>,
    /// Set on games that were saved by someone other than the players.
    pub owner: Option<Player>,
    pub setup: Option<String>,
    pub date: Option<String>,
    pub result: Option<String>,
}

impl Game {
    /// Black players followed by white players.
    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.black.iter().chain(self.white.iter())
    }
}
