use serde::{Deserialize, Serialize};
use serde_with::{formats::PreferMany, serde_as, skip_serializing_none, OneOrMany};

use crate::models::Player;

#[skip_serializing_none]
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Tournaments {
    pub year: Option<u32>,
    #[serde(default)]
    pub tournaments: Vec<TournamentSummary>,
}

#[skip_serializing_none]
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TournamentSummary {
    #[serde(default)]
    pub id: u64,
    pub name: Option<String>,
    pub uri: Option<String>,
}

#[skip_serializing_none]
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Tournament {
    pub id: Option<u64>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub uri: Option<String>,
    #[serde(default)]
    pub rounds: Vec<RoundSummary>,
}

#[skip_serializing_none]
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RoundSummary {
    #[serde(default)]
    pub round: u32,
    pub start_at: Option<String>,
    pub end_at: Option<String>,
    pub uri: Option<String>,
}

#[skip_serializing_none]
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Entrants {
    pub id: Option<u64>,
    pub name: Option<String>,
    #[serde(default)]
    pub entrants: Vec<Entrant>,
}

#[skip_serializing_none]
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Entrant {
    #[serde(default)]
    pub name: String,
    pub rank: Option<String>,
    pub standing: Option<u32>,
    pub score: Option<f64>,
}

#[skip_serializing_none]
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TournamentRound {
    pub id: Option<u64>,
    pub round: Option<u32>,
    #[serde(default)]
    pub games: Vec<RoundGame>,
    #[serde(default)]
    pub byes: Vec<Bye>,
}

#[skip_serializing_none]
#[serde_as]
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RoundGame {
    pub sgf_url: Option<String>,
    #[serde(default)]
    #[serde_as(as = "OneOrMany<_, PreferMany>")]
    pub black: Vec<Player>,
    #[serde(default)]
    #[serde_as(as = "OneOrMany<_, PreferMany>")]
    pub white: Vec<Player>,
    pub setup: Option<String>,
    pub result: Option<String>,
}

#[skip_serializing_none]
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Bye {
    #[serde(default)]
    pub name: String,
    pub rank: Option<String>,
    #[serde(rename = "type")]
    pub bye_type: Option<String>,
}
