use tracing::{debug, info, instrument};

use crate::{
    fetch::{Exchange, Fetch},
    models::Archives,
    paginate::Page,
    query::ArchivesQuery,
    Api, Result,
};

/// Most archive pages fetched while looking for a player's latest game.
pub const MAX_ARCHIVE_REQUESTS: usize = 6;

/// Outcome of a latest-rank lookup.
///
/// `rank` is `None` when no rank could be determined; `Some("")` means a game
/// was found but carried no rank.
#[derive(Debug)]
pub struct LatestRank {
    pub rank: Option<String>,
    pub requests: usize,
    /// The last request made and its response.
    pub exchange: Exchange,
}

enum Found {
    Rank(String),
    NoMatch,
    NoGames,
}

fn inspect(archives: &Archives, name: &str) -> Found {
    let Some(game) = archives.games.first() else {
        return Found::NoGames;
    };
    if let Some(owner) = &game.owner {
        return Found::Rank(owner.rank_or_empty());
    }
    match game.players().find(|p| p.name == name) {
        Some(player) => Found::Rank(player.rank_or_empty()),
        None => Found::NoMatch,
    }
}

impl<F: Fetch> Api<F> {
    /// Rank of `name` as recorded in their most recent game.
    ///
    /// Walks back through monthly archive pages while they are empty, issuing
    /// at most [`MAX_ARCHIVE_REQUESTS`] fetches. Only an invalid user name is
    /// an error; every other dead end resolves to an unknown rank.
    #[instrument(skip(self))]
    pub async fn latest_rank(&self, name: &str) -> Result<LatestRank> {
        let mut reply = self.archives(&ArchivesQuery::user(name)).await?;
        let mut requests = 1;
        loop {
            let rank = match &reply.content {
                None => {
                    info!(status = ?reply.exchange.status(), "Archive page unavailable");
                    None
                }
                Some(page) => match inspect(page, name) {
                    Found::Rank(rank) => Some(rank),
                    Found::NoMatch => {
                        info!("Latest game does not list the player");
                        None
                    }
                    Found::NoGames => match page {
                        Page::Paginated(archives)
                            if archives.has_prev() && requests < MAX_ARCHIVE_REQUESTS =>
                        {
                            debug!(requests, "No games, trying previous page");
                            if let Some(prev) = archives.prev().await {
                                reply = prev;
                                requests += 1;
                                continue;
                            }
                            None
                        }
                        _ => None,
                    },
                },
            };
            info!(rank = ?rank, requests, "Resolved latest rank");
            return Ok(LatestRank {
                rank,
                requests,
                exchange: reply.exchange,
            });
        }
    }
}
