use std::{fmt::Display, ops::Deref};

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_with::skip_serializing_none;
use tracing::{debug, error, instrument};

use crate::fetch::{Fetch, Reply};

/// Link relation between pages of a list resource.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Rel {
    First,
    Prev,
    Next,
    Last,
}

impl Display for Rel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rel::First => write!(f, "first"),
            Rel::Prev => write!(f, "prev"),
            Rel::Next => write!(f, "next"),
            Rel::Last => write!(f, "last"),
        }
    }
}

#[skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Links {
    pub first: Option<String>,
    pub prev: Option<String>,
    pub next: Option<String>,
    pub last: Option<String>,
}

impl Links {
    /// The target of `rel`, if present and non-empty.
    pub fn get(&self, rel: Rel) -> Option<&str> {
        let link = match rel {
            Rel::First => &self.first,
            Rel::Prev => &self.prev,
            Rel::Next => &self.next,
            Rel::Last => &self.last,
        };
        link.as_deref().filter(|l| !l.is_empty())
    }
}

/// Content of a list resource that knows how to reach its neighbours.
///
/// Derefs to the wrapped content, so fields are read as if the wrapper were
/// not there. Navigating always fetches a fresh page and never touches `self`.
#[derive(Clone, Debug)]
pub struct Paginated<T, F> {
    content: T,
    links: Links,
    fetcher: Option<F>,
}

impl<T, F> Paginated<T, F> {
    pub fn new(content: T, links: Links, fetcher: F) -> Self {
        Self {
            content,
            links,
            fetcher: Some(fetcher),
        }
    }

    /// A resource that can answer link queries but cannot navigate.
    ///
    /// Following a present link on it panics.
    pub fn detached(content: T, links: Links) -> Self {
        Self {
            content,
            links,
            fetcher: None,
        }
    }

    pub fn link(&self, rel: Rel) -> Option<&str> {
        self.links.get(rel)
    }

    pub fn has_prev(&self) -> bool {
        self.link(Rel::Prev).is_some()
    }

    pub fn has_next(&self) -> bool {
        self.link(Rel::Next).is_some()
    }

    pub fn is_first(&self) -> bool {
        !self.has_prev()
    }

    pub fn is_last(&self) -> bool {
        !self.has_next()
    }

    pub fn into_inner(self) -> T {
        self.content
    }
}

impl<T, F> Paginated<T, F>
where
    T: DeserializeOwned,
    F: Fetch,
{
    /// Fetches the page behind `rel`, or returns `None` without fetching when
    /// the relation is absent.
    ///
    /// On a detached resource every call panics except `prev`/`next` with no
    /// link, which stay no-ops.
    #[instrument(skip(self))]
    pub async fn follow(&self, rel: Rel) -> Option<Reply<Page<T, F>>> {
        let Some(fetcher) = &self.fetcher else {
            if matches!(rel, Rel::Prev | Rel::Next) && self.link(rel).is_none() {
                return None;
            }
            panic!("call to abstract method 'get' following '{rel}'");
        };
        let path = self.link(rel)?;
        debug!(path, "Following link");
        Some(get_content(fetcher, path).await)
    }

    pub async fn first(&self) -> Option<Reply<Page<T, F>>> {
        self.follow(Rel::First).await
    }

    pub async fn prev(&self) -> Option<Reply<Page<T, F>>> {
        self.follow(Rel::Prev).await
    }

    pub async fn next(&self) -> Option<Reply<Page<T, F>>> {
        self.follow(Rel::Next).await
    }

    pub async fn last(&self) -> Option<Reply<Page<T, F>>> {
        self.follow(Rel::Last).await
    }
}

impl<T, F> Deref for Paginated<T, F> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.content
    }
}

/// A fetched resource: paginated if the response carried links.
#[derive(Clone, Debug)]
pub enum Page<T, F> {
    Paginated(Paginated<T, F>),
    Plain(T),
}

impl<T, F> Page<T, F> {
    pub fn as_paginated(&self) -> Option<&Paginated<T, F>> {
        match self {
            Page::Paginated(p) => Some(p),
            Page::Plain(_) => None,
        }
    }

    pub fn into_inner(self) -> T {
        match self {
            Page::Paginated(p) => p.into_inner(),
            Page::Plain(content) => content,
        }
    }
}

impl<T, F> Deref for Page<T, F> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        match self {
            Page::Paginated(p) => &p.content,
            Page::Plain(content) => content,
        }
    }
}

#[derive(Deserialize)]
struct Envelope<T> {
    content: Option<T>,
    link: Option<Links>,
}

/// Fetches `path` and unwraps the `{ content, link }` envelope.
#[instrument(skip(fetcher))]
pub(crate) async fn get_content<T, F>(fetcher: &F, path: &str) -> Reply<Page<T, F>>
where
    T: DeserializeOwned,
    F: Fetch,
{
    let exchange = fetcher.fetch(path).await;
    let content = match exchange.ok_json() {
        Some(body) => match Envelope::<T>::deserialize(body) {
            Ok(Envelope {
                content: Some(content),
                link: Some(links),
            }) => Some(Page::Paginated(Paginated::new(
                content,
                links,
                fetcher.clone(),
            ))),
            Ok(Envelope {
                content: Some(content),
                link: None,
            }) => Some(Page::Plain(content)),
            Ok(Envelope { content: None, .. }) => None,
            Err(e) => {
                error!(url = %exchange.request.url, error = %e, "Failed to decode content");
                None
            }
        },
        None => {
            debug!(status = ?exchange.status(), "No content");
            None
        }
    };
    Reply { content, exchange }
}
