use std::fmt;
use std::sync::Arc;

use iced::widget::{column, container, text, Column, Row};
use iced::{Element, Length, Padding};
use tracing::debug;

use crate::cards::{media_image_urls, person_image_urls};
use crate::media::{MediaKind, MediaSummary, Message, PersonSummary, TEXT_MUTED, TEXT_PRIMARY};
use crate::normalize::partition_by_kind;
use crate::page::{or_empty, Generation, LoadGuard, PageState};
use crate::tmdb::CatalogApi;
use crate::Cinescope;

const CARDS_PER_ROW: usize = 6;

/// Which result buckets the search page shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchScope {
    #[default]
    All,
    Movies,
    Tv,
    People,
}

impl SearchScope {
    pub const ALL: [SearchScope; 4] = [
        SearchScope::All,
        SearchScope::Movies,
        SearchScope::Tv,
        SearchScope::People,
    ];

    pub fn as_param(&self) -> &'static str {
        match self {
            SearchScope::All => "multi",
            SearchScope::Movies => "movie",
            SearchScope::Tv => "tv",
            SearchScope::People => "person",
        }
    }

    pub fn from_param(param: &str) -> Self {
        match param {
            "movie" => SearchScope::Movies,
            "tv" => SearchScope::Tv,
            "person" => SearchScope::People,
            _ => SearchScope::All,
        }
    }

    pub fn shows(&self, kind: MediaKind) -> bool {
        match self {
            SearchScope::All => true,
            SearchScope::Movies => kind == MediaKind::Movie,
            SearchScope::Tv => kind == MediaKind::Tv,
            SearchScope::People => kind == MediaKind::Person,
        }
    }
}

impl fmt::Display for SearchScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SearchScope::All => "All",
            SearchScope::Movies => "Movies",
            SearchScope::Tv => "TV Shows",
            SearchScope::People => "People",
        };
        write!(f, "{}", label)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchQuery {
    pub text: String,
    pub scope: SearchScope,
}

impl SearchQuery {
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchBuckets {
    pub movies: Vec<MediaSummary>,
    pub tv: Vec<MediaSummary>,
    pub people: Vec<MediaSummary>,
}

impl SearchBuckets {
    pub fn len(&self) -> usize {
        self.movies.len() + self.tv.len() + self.people.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn bucket(&self, kind: MediaKind) -> &[MediaSummary] {
        match kind {
            MediaKind::Movie => &self.movies,
            MediaKind::Tv => &self.tv,
            MediaKind::Person => &self.people,
        }
    }

    /// URLs the result cards render: posters for titles, small portraits for people.
    pub fn image_urls(&self) -> Vec<String> {
        let mut urls = media_image_urls(self.movies.iter().chain(&self.tv));
        let people: Vec<PersonSummary> = self.people.iter().map(PersonSummary::from).collect();
        urls.extend(person_image_urls(&people));
        urls
    }

    /// Number of hits the given scope puts on screen.
    pub fn visible_count(&self, scope: SearchScope) -> usize {
        [MediaKind::Movie, MediaKind::Tv, MediaKind::Person]
            .into_iter()
            .filter(|kind| scope.shows(*kind))
            .map(|kind| self.bucket(kind).len())
            .sum()
    }
}

#[derive(Debug, Default)]
pub struct SearchController {
    query: SearchQuery,
    guard: LoadGuard,
    state: PageState<SearchBuckets>,
}

impl SearchController {
    pub fn query(&self) -> &SearchQuery {
        &self.query
    }

    pub fn state(&self) -> &PageState<SearchBuckets> {
        &self.state
    }

    /// Switches to `query`. A blank query settles at once with no results and
    /// returns `None`; anything else goes back to loading.
    pub fn begin(&mut self, query: SearchQuery) -> Option<Generation> {
        self.query = query;
        if self.query.is_blank() {
            self.guard = LoadGuard::default();
            self.state = PageState::Ready(SearchBuckets::default());
            return None;
        }
        self.state = PageState::Loading;
        Some(self.guard.begin())
    }

    pub fn apply(&mut self, generation: Generation, buckets: SearchBuckets) -> bool {
        if !self.guard.accept(generation) {
            debug!(query = %self.query.text, "dropping stale search results");
            return false;
        }
        debug!(query = %self.query.text, hits = buckets.len(), "search settled");
        self.state = PageState::Ready(buckets);
        true
    }
}

pub async fn fetch_search(catalog: Arc<dyn CatalogApi>, text: String) -> SearchBuckets {
    let hits = or_empty(
        catalog.search_multi(&text).await.map(|page| page.results),
        "search results",
    );
    partition_by_kind(hits.into_iter().map(MediaSummary::from).collect())
}

impl Cinescope {
    pub fn view_search_page<'a>(&'a self, search: &'a SearchController) -> Element<'a, Message> {
        let query = search.query();

        let body: Element<'a, Message> = match search.state() {
            PageState::Loading => self.view_loading("Searching..."),
            PageState::NotFound => self.view_no_results(query),
            PageState::Ready(_) if query.is_blank() => text("Enter a search term to get started")
                .size(16)
                .color(TEXT_MUTED)
                .into(),
            PageState::Ready(buckets) if buckets.visible_count(query.scope) == 0 => {
                self.view_no_results(query)
            }
            PageState::Ready(buckets) => {
                let sections: Vec<Element<'a, Message>> = [
                    (MediaKind::Movie, "Movies"),
                    (MediaKind::Tv, "TV Shows"),
                    (MediaKind::Person, "People"),
                ]
                .into_iter()
                .filter(|(kind, _)| query.scope.shows(*kind) && !buckets.bucket(*kind).is_empty())
                .map(|(kind, title)| self.view_search_section(title, kind, buckets.bucket(kind)))
                .collect();
                Column::with_children(sections).spacing(40).into()
            }
        };

        let header = self.view_search_header(search);

        column![header, body]
            .spacing(24)
            .padding(Padding::new(32.0).left(48.0).right(48.0).bottom(48.0))
            .width(Length::Fill)
            .into()
    }

    fn view_search_header<'a>(&'a self, search: &'a SearchController) -> Element<'a, Message> {
        let query = search.query();
        let title = text(format!("Search Results for \"{}\"", query.text))
            .size(28)
            .color(TEXT_PRIMARY)
            .font(iced::Font {
                weight: iced::font::Weight::Bold,
                ..Default::default()
            });

        let count = search
            .state()
            .ready()
            .map(|buckets| buckets.visible_count(query.scope))
            .unwrap_or(0);
        let count_text = if count == 1 {
            String::from("1 result found")
        } else {
            format!("{} results found", count)
        };

        column![title, text(count_text).size(16).color(TEXT_MUTED)]
            .spacing(8)
            .width(Length::Fill)
            .into()
    }

    fn view_search_section<'a>(
        &'a self,
        title: &str,
        kind: MediaKind,
        hits: &'a [MediaSummary],
    ) -> Element<'a, Message> {
        let mut rows: Vec<Element<Message>> = Vec::new();
        for chunk in hits.chunks(CARDS_PER_ROW) {
            let cards: Vec<Element<Message>> = chunk
                .iter()
                .map(|hit| match kind {
                    MediaKind::Person => self.view_person_card(&PersonSummary::from(hit)),
                    MediaKind::Movie | MediaKind::Tv => self.view_media_card(hit),
                })
                .collect();
            rows.push(Row::with_children(cards).spacing(16).into());
        }

        column![
            self.view_section_header(title),
            Column::with_children(rows).spacing(24)
        ]
        .spacing(16)
        .width(Length::Fill)
        .into()
    }

    fn view_no_results<'a>(&'a self, query: &SearchQuery) -> Element<'a, Message> {
        container(
            column![
                text("No results found").size(20).color(TEXT_PRIMARY),
                text(format!(
                    "Nothing matched \"{}\" in {}",
                    query.text,
                    query.scope.to_string().to_lowercase()
                ))
                .size(14)
                .color(TEXT_MUTED),
            ]
            .spacing(8)
            .align_x(iced::Alignment::Center),
        )
        .width(Length::Fill)
        .padding(48)
        .center_x(Length::Fill)
        .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tmdb::fake::FakeCatalog;
    use serde_json::json;

    fn query(text: &str, scope: SearchScope) -> SearchQuery {
        SearchQuery {
            text: text.to_string(),
            scope,
        }
    }

    fn mixed_results() -> serde_json::Value {
        json!({
            "results": [
                { "id": 1, "title": "Heat", "media_type": "movie" },
                { "id": 2, "name": "Heat Wave", "media_type": "tv" },
                { "id": 3, "name": "Heath Ledger", "media_type": "person" },
                { "id": 4, "title": "Heatwave", "media_type": "movie" }
            ]
        })
    }

    #[test]
    fn scope_params_round_trip() {
        for scope in SearchScope::ALL {
            assert_eq!(SearchScope::from_param(scope.as_param()), scope);
        }
        assert_eq!(SearchScope::from_param("collection"), SearchScope::All);
        assert_eq!(SearchScope::Tv.to_string(), "TV Shows");
    }

    #[tokio::test]
    async fn person_hits_prefetch_the_portrait_their_card_shows() {
        let catalog = FakeCatalog::default().with(
            "/search/multi?query=brad",
            json!({
                "results": [
                    { "id": 287, "name": "Brad Pitt", "media_type": "person", "profile_path": "/brad.jpg" },
                    { "id": 1, "title": "Troy", "media_type": "movie", "poster_path": "/troy.jpg" }
                ]
            }),
        );
        let buckets = fetch_search(Arc::new(catalog), String::from("brad")).await;

        let urls = buckets.image_urls();
        let shown = crate::cards::profile_url(
            PersonSummary::from(&buckets.people[0]).profile_path.as_deref(),
        );
        assert!(urls.contains(&shown));
        assert!(urls.contains(&crate::cards::poster_url(&buckets.movies[0])));
        assert!(!urls.iter().any(|url| url.ends_with("/w500/brad.jpg")));
    }

    #[test]
    fn blank_query_settles_without_fetching() {
        let mut search = SearchController::default();
        assert_eq!(search.begin(query("   ", SearchScope::All)), None);
        assert_eq!(search.state(), &PageState::Ready(SearchBuckets::default()));
    }

    #[test]
    fn new_query_discards_older_results() {
        let mut search = SearchController::default();
        let first = search.begin(query("heat", SearchScope::All)).expect("fetch");
        let second = search.begin(query("alien", SearchScope::All)).expect("fetch");

        assert!(!search.apply(first, SearchBuckets::default()));
        assert!(search.state().is_loading());
        assert!(search.apply(second, SearchBuckets::default()));
        assert!(!search.state().is_loading());
    }

    #[test]
    fn blank_query_cancels_pending_search() {
        let mut search = SearchController::default();
        let pending = search.begin(query("heat", SearchScope::All)).expect("fetch");
        search.begin(query("", SearchScope::All));
        assert!(!search.apply(pending, SearchBuckets::default()));
    }

    #[tokio::test]
    async fn results_are_partitioned_by_kind() {
        let catalog = FakeCatalog::default().with("/search/multi?query=heat", mixed_results());
        let buckets = fetch_search(Arc::new(catalog), String::from("heat")).await;

        assert_eq!(buckets.len(), 4);
        assert_eq!(buckets.movies.iter().map(|m| m.id).collect::<Vec<_>>(), vec![1, 4]);
        assert_eq!(buckets.tv[0].title, "Heat Wave");
        assert_eq!(buckets.people[0].kind, MediaKind::Person);
        assert_eq!(buckets.visible_count(SearchScope::Movies), 2);
        assert_eq!(buckets.visible_count(SearchScope::People), 1);
        assert_eq!(buckets.visible_count(SearchScope::All), 4);
    }

    #[tokio::test]
    async fn failed_search_shows_nothing() {
        let catalog = FakeCatalog::default().failing(
            "/search/multi?query=heat",
            crate::error::ApiError::RateLimit,
        );
        let buckets = fetch_search(Arc::new(catalog), String::from("heat")).await;
        assert!(buckets.is_empty());
    }
}
