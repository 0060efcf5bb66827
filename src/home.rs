use std::sync::Arc;

use iced::widget::Column;
use iced::{Element, Length, Padding};
use tracing::debug;

use crate::carousel::CarouselId;
use crate::error::ApiError;
use crate::media::{MediaSummary, Message};
use crate::page::{or_empty, Generation, LoadGuard, PageState};
use crate::tmdb::{CatalogApi, TmdbMediaResult, TmdbPage};
use crate::Cinescope;

/// The three rows on the landing page.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HomeFeed {
    pub trending: Vec<MediaSummary>,
    pub popular: Vec<MediaSummary>,
    pub free_to_watch: Vec<MediaSummary>,
}

impl HomeFeed {
    pub fn all(&self) -> impl Iterator<Item = &MediaSummary> {
        self.trending
            .iter()
            .chain(&self.popular)
            .chain(&self.free_to_watch)
    }
}

#[derive(Debug, Default)]
pub struct HomeController {
    guard: LoadGuard,
    state: PageState<HomeFeed>,
}

impl HomeController {
    pub fn state(&self) -> &PageState<HomeFeed> {
        &self.state
    }

    pub fn begin(&mut self) -> Generation {
        self.state = PageState::Loading;
        self.guard.begin()
    }

    pub fn apply(&mut self, generation: Generation, feed: HomeFeed) -> bool {
        if !self.guard.accept(generation) {
            debug!("dropping stale home feed");
            return false;
        }
        self.state = PageState::Ready(feed);
        true
    }
}

fn summaries(
    result: Result<TmdbPage<TmdbMediaResult>, ApiError>,
    section: &str,
) -> Vec<MediaSummary> {
    or_empty(result.map(|page| page.results), section)
        .into_iter()
        .map(MediaSummary::from)
        .collect()
}

pub async fn fetch_home(catalog: Arc<dyn CatalogApi>) -> HomeFeed {
    let (trending, popular, free) = tokio::join!(
        catalog.trending_today(),
        catalog.popular_movies(),
        catalog.free_to_watch()
    );
    HomeFeed {
        trending: summaries(trending, "trending"),
        popular: summaries(popular, "popular movies"),
        free_to_watch: summaries(free, "free to watch"),
    }
}

impl Cinescope {
    pub fn view_home_page<'a>(&'a self, home: &'a HomeController) -> Element<'a, Message> {
        let Some(feed) = home.state().ready() else {
            return self.view_loading("Loading...");
        };

        let rows = [
            (CarouselId::Trending, "Trending Today", &feed.trending),
            (CarouselId::Popular, "Popular Movies", &feed.popular),
            (CarouselId::FreeToWatch, "Free to Watch", &feed.free_to_watch),
        ];

        let carousels: Vec<Element<Message>> = rows
            .into_iter()
            .map(|(id, title, items)| {
                let cards = items.iter().map(|item| self.view_media_card(item)).collect();
                self.view_carousel(id, title, cards)
            })
            .collect();

        Column::with_children(carousels)
            .spacing(40)
            .padding(Padding::new(32.0).left(48.0).right(48.0).bottom(48.0))
            .width(Length::Fill)
            .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tmdb::fake::FakeCatalog;
    use serde_json::json;

    #[tokio::test]
    async fn feed_loads_all_three_rows() {
        let catalog = FakeCatalog::default()
            .with(
                "/trending/all/day",
                json!({ "results": [
                    { "id": 1, "title": "Dune", "media_type": "movie" },
                    { "id": 2, "name": "Shogun", "media_type": "tv" }
                ]}),
            )
            .with("/movie/popular", json!({ "results": [{ "id": 3, "title": "Heat" }] }))
            .with("/discover/movie", json!({ "results": [{ "id": 4, "title": "Nosferatu" }] }));

        let catalog = Arc::new(catalog);
        let feed = fetch_home(catalog.clone()).await;
        assert_eq!(catalog.call_count(), 3);
        assert_eq!(feed.trending.len(), 2);
        assert_eq!(feed.popular[0].title, "Heat");
        assert_eq!(feed.free_to_watch[0].id, 4);
        assert_eq!(feed.all().count(), 4);
    }

    #[tokio::test]
    async fn failed_row_is_empty_and_others_survive() {
        let catalog = FakeCatalog::default()
            .failing("/trending/all/day", ApiError::Status(503))
            .with("/movie/popular", json!({ "results": [{ "id": 3, "title": "Heat" }] }))
            .with("/discover/movie", json!({ "results": [] }));

        let feed = fetch_home(Arc::new(catalog)).await;
        assert!(feed.trending.is_empty());
        assert_eq!(feed.popular.len(), 1);
        assert!(feed.free_to_watch.is_empty());
    }

    #[test]
    fn only_the_latest_load_settles() {
        let mut home = HomeController::default();
        let stale = home.begin();
        let fresh = home.begin();
        assert!(!home.apply(stale, HomeFeed::default()));
        assert!(home.state().is_loading());
        assert!(home.apply(fresh, HomeFeed::default()));
        assert_eq!(home.state().ready(), Some(&HomeFeed::default()));
    }
}
