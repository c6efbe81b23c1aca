use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument};

pub mod fetch;
pub mod models;
pub mod paginate;
pub mod query;
pub mod rank;

#[cfg(test)]
mod testing;

pub use fetch::{Body, Exchange, Fetch, HttpClient, HttpClientBuilder, Reply, Request, Response};
pub use paginate::{Links, Page, Paginated, Rel};
pub use query::ArchivesQuery;
pub use rank::{LatestRank, MAX_ARCHIVE_REQUESTS};

use models::{
    Archives, Bye, Entrant, Entrants, Game, RankedPlayer, RoundGame, RoundSummary, Top100,
    Tournament, TournamentRound, TournamentSummary, Tournaments,
};

#[derive(Debug, Error)]
#[error(transparent)]
pub struct Error(#[from] ApiError);

impl Error {
    /// Whether the arguments were rejected before any request was made.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self.0,
            ApiError::InvalidArgument { .. } | ApiError::MissingArgument { .. }
        )
    }

    pub fn is_transport(&self) -> bool {
        matches!(self.0, ApiError::Reqwest(_))
    }

    pub fn is_decode(&self) -> bool {
        matches!(self.0, ApiError::Decode { .. })
    }
}

#[derive(Error, Debug)]
pub(crate) enum ApiError {
    #[error("Request failed")]
    Reqwest(#[from] reqwest::Error),
    #[error("Failed to decode body of {url}: {source}")]
    Decode {
        url: String,
        source: serde_json::Error,
    },
    #[error("'{field}' is invalid: '{value}'")]
    InvalidArgument { field: &'static str, value: String },
    #[error("'{field}' is required")]
    MissingArgument { field: &'static str },
}

pub type Result<T> = std::result::Result<T, Error>;

/// Client for the metadata API.
///
/// Endpoint methods return `Err` only for invalid arguments. Anything that
/// goes wrong remotely shows up as a [`Reply`] without content.
#[derive(Clone, Debug)]
pub struct Api<F = HttpClient> {
    fetcher: F,
}

impl Api {
    #[instrument]
    pub fn new() -> Self {
        Self {
            fetcher: HttpClient::new(),
        }
    }
}

impl Default for Api {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Fetch> Api<F> {
    pub fn with_fetcher(fetcher: F) -> Self {
        Self { fetcher }
    }

    /// Fetches any resource and unwraps its content, paginated if the
    /// response has links.
    pub async fn get_content<T: DeserializeOwned>(&self, path: &str) -> Reply<Page<T, F>> {
        paginate::get_content(&self.fetcher, path).await
    }

    #[instrument(skip(self))]
    pub async fn archives(&self, query: &ArchivesQuery) -> Result<Reply<Page<Archives, F>>> {
        let path = query.path()?;
        debug!(path = %path, "Getting archives");
        Ok(self.get_content(&path).await)
    }

    pub async fn games(&self, query: &ArchivesQuery) -> Result<Reply<Vec<Game>>> {
        Ok(self.archives(query).await?.map(|a| a.into_inner().games))
    }

    #[instrument(skip(self))]
    pub async fn top100(&self) -> Reply<Page<Top100, F>> {
        self.get_content("top100").await
    }

    pub async fn top100_players(&self) -> Reply<Vec<RankedPlayer>> {
        self.top100().await.map(|t| t.into_inner().players)
    }

    #[instrument(skip(self))]
    pub async fn tournaments(&self, year: Option<u32>) -> Result<Reply<Page<Tournaments, F>>> {
        let path = query::tournaments_path(year)?;
        Ok(self.get_content(&path).await)
    }

    pub async fn tournament_list(&self, year: Option<u32>) -> Result<Reply<Vec<TournamentSummary>>> {
        Ok(self
            .tournaments(year)
            .await?
            .map(|t| t.into_inner().tournaments))
    }

    #[instrument(skip(self))]
    pub async fn tournament(&self, id: u64) -> Result<Reply<Page<Tournament, F>>> {
        let path = query::tournament_path(id)?;
        Ok(self.get_content(&path).await)
    }

    pub async fn tournament_rounds(&self, id: u64) -> Result<Reply<Vec<RoundSummary>>> {
        Ok(self.tournament(id).await?.map(|t| t.into_inner().rounds))
    }

    #[instrument(skip(self))]
    pub async fn tournament_entrants(&self, id: u64) -> Result<Reply<Page<Entrants, F>>> {
        let path = query::entrants_path(id)?;
        Ok(self.get_content(&path).await)
    }

    pub async fn tournament_entrant_list(&self, id: u64) -> Result<Reply<Vec<Entrant>>> {
        Ok(self
            .tournament_entrants(id)
            .await?
            .map(|e| e.into_inner().entrants))
    }

    #[instrument(skip(self))]
    pub async fn tournament_round(
        &self,
        id: u64,
        round: u32,
    ) -> Result<Reply<Page<TournamentRound, F>>> {
        let path = query::round_path(id, round)?;
        Ok(self.get_content(&path).await)
    }

    pub async fn tournament_games(&self, id: u64, round: u32) -> Result<Reply<Vec<RoundGame>>> {
        Ok(self
            .tournament_round(id, round)
            .await?
            .map(|r| r.into_inner().games))
    }

    pub async fn tournament_byes(&self, id: u64, round: u32) -> Result<Reply<Vec<Bye>>> {
        Ok(self
            .tournament_round(id, round)
            .await?
            .map(|r| r.into_inner().byes))
    }
}
