use std::sync::Arc;

use iced::widget::{button, column, container, row, text, Row, Space};
use iced::{Border, Color, Element, Length, Padding, Shadow};
use tracing::{debug, info};

use crate::carousel::CarouselId;
use crate::error::ApiError;
use crate::media::{
    MediaDetail, MediaId, Message, PersonSummary, ACCENT_GOLD, BACKGROUND, TEXT_MUTED,
    TEXT_PRIMARY,
};
use crate::normalize::{format_runtime, rating_label, season_label};
use crate::page::{or_empty, Generation, LoadGuard, PageState};
use crate::rating::{Rating, RatingDialog, RatingMessage, RatingOutcome};
use crate::tmdb::{backdrop_url, image_url, CatalogApi, ImageSize};
use crate::Cinescope;

pub const CAST_LIMIT: usize = 20;

const ICON_FILM: char = '\u{F3A9}';
const ICON_STAR_FILL: char = '\u{F586}';
const ICON_CALENDAR: char = '\u{F1E8}';
const ICON_CLOCK: char = '\u{F293}';
const ICON_TV: char = '\u{F5ED}';

const POSTER_WIDTH: f32 = 260.0;
const POSTER_HEIGHT: f32 = 390.0;
const BACKDROP_HEIGHT: f32 = 480.0;

fn icon(icon_char: char) -> iced::widget::Text<'static> {
    text(icon_char.to_string()).font(iced::Font {
        family: iced::font::Family::Name("bootstrap-icons"),
        ..Default::default()
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailKind {
    Movie,
    Tv,
}

impl DetailKind {
    fn noun(&self) -> &'static str {
        match self {
            DetailKind::Movie => "Movie",
            DetailKind::Tv => "TV show",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetailPage {
    pub detail: MediaDetail,
    pub cast: Vec<PersonSummary>,
}

impl DetailPage {
    pub fn image_urls(&self) -> Vec<String> {
        let summary = &self.detail.summary;
        let mut urls = vec![
            image_url(summary.poster_path.as_deref().unwrap_or_default(), ImageSize::W500),
            backdrop_url(summary.backdrop_path.as_deref().unwrap_or_default()),
        ];
        urls.retain(|url| !crate::tmdb::is_placeholder(url));
        urls.extend(crate::cards::person_image_urls(&self.cast));
        urls
    }
}

/// Movie or TV detail page. The committed rating and the open dialog belong
/// to the current visit and are dropped on every navigation, even back to the
/// same title.
#[derive(Debug)]
pub struct DetailController {
    kind: DetailKind,
    id: MediaId,
    guard: LoadGuard,
    state: PageState<DetailPage>,
    user_rating: Option<Rating>,
    rating_dialog: Option<RatingDialog>,
}

impl DetailController {
    pub fn new(kind: DetailKind) -> Self {
        Self {
            kind,
            id: 0,
            guard: LoadGuard::default(),
            state: PageState::Loading,
            user_rating: None,
            rating_dialog: None,
        }
    }

    pub fn kind(&self) -> DetailKind {
        self.kind
    }

    pub fn id(&self) -> MediaId {
        self.id
    }

    pub fn state(&self) -> &PageState<DetailPage> {
        &self.state
    }

    pub fn user_rating(&self) -> Option<Rating> {
        self.user_rating
    }

    pub fn rating_dialog(&self) -> Option<&RatingDialog> {
        self.rating_dialog.as_ref()
    }

    pub fn begin(&mut self, id: MediaId) -> Generation {
        self.id = id;
        self.user_rating = None;
        self.rating_dialog = None;
        self.state = PageState::Loading;
        self.guard.begin()
    }

    pub fn apply(&mut self, generation: Generation, result: Result<DetailPage, ApiError>) -> bool {
        if !self.guard.accept(generation) {
            debug!(id = self.id, "dropping stale detail result");
            return false;
        }
        self.state = PageState::settle(result, self.kind.noun());
        true
    }

    pub fn open_rating_dialog(&mut self) {
        if let Some(page) = self.state.ready() {
            self.rating_dialog = Some(RatingDialog::new(
                page.detail.summary.title.clone(),
                self.user_rating,
            ));
        }
    }

    /// Feeds the open dialog. Any outcome closes it; a confirmed rating is kept.
    pub fn update_rating(&mut self, message: RatingMessage) -> Option<Rating> {
        let outcome = self.rating_dialog.as_mut()?.update(message)?;
        self.rating_dialog = None;
        match outcome {
            RatingOutcome::Confirmed(rating) => {
                info!(id = self.id, rating = rating.value(), "rated {}", self.kind.noun());
                self.user_rating = Some(rating);
                Some(rating)
            }
            RatingOutcome::Cancelled => None,
        }
    }
}

pub async fn fetch_detail(
    catalog: Arc<dyn CatalogApi>,
    kind: DetailKind,
    id: MediaId,
) -> Result<DetailPage, ApiError> {
    if id == 0 {
        return Err(ApiError::NotFound);
    }

    let (detail, credits) = match kind {
        DetailKind::Movie => {
            let (detail, credits) =
                tokio::join!(catalog.movie_details(id), catalog.movie_credits(id));
            (detail.map(MediaDetail::from), credits)
        }
        DetailKind::Tv => {
            let (detail, credits) = tokio::join!(catalog.tv_details(id), catalog.tv_credits(id));
            (detail.map(MediaDetail::from), credits)
        }
    };

    let detail = detail?;
    if detail.summary.id == 0 {
        return Err(ApiError::NotFound);
    }

    let cast = or_empty(credits.map(|c| c.cast), "cast")
        .into_iter()
        .take(CAST_LIMIT)
        .map(PersonSummary::from)
        .collect();

    Ok(DetailPage { detail, cast })
}

fn chip<'a>(label: String, highlight: bool) -> Element<'a, Message> {
    container(text(label).size(12).color(if highlight {
        Color::BLACK
    } else {
        TEXT_PRIMARY
    }))
    .padding(Padding::new(4.0).left(10.0).right(10.0))
    .style(move |_theme| container::Style {
        background: Some(iced::Background::Color(if highlight {
            ACCENT_GOLD
        } else {
            Color::from_rgba(1.0, 1.0, 1.0, 0.12)
        })),
        border: Border {
            radius: 12.0.into(),
            ..Default::default()
        },
        ..Default::default()
    })
    .into()
}

fn fact<'a>(icon_char: char, label: String) -> Element<'a, Message> {
    row![
        icon(icon_char).size(14).color(TEXT_MUTED),
        text(label).size(14).color(TEXT_MUTED)
    ]
    .spacing(6)
    .align_y(iced::Alignment::Center)
    .into()
}

impl Cinescope {
    pub fn view_detail_page<'a>(&'a self, detail: &'a DetailController) -> Element<'a, Message> {
        let page = match detail.state() {
            PageState::Loading => return self.view_loading("Loading..."),
            PageState::NotFound => {
                return self.view_not_found(&format!("{} not found", detail.kind().noun()))
            }
            PageState::Ready(page) => page,
        };

        column![
            self.view_detail_hero(detail, page),
            container(self.view_carousel(
                CarouselId::Cast,
                "Cast",
                page.cast
                    .iter()
                    .map(|person| self.view_person_card(person))
                    .collect(),
            ))
            .padding(Padding::new(32.0).left(48.0).right(48.0)),
        ]
        .spacing(16)
        .width(Length::Fill)
        .into()
    }

    fn view_detail_hero<'a>(
        &'a self,
        detail: &'a DetailController,
        page: &'a DetailPage,
    ) -> Element<'a, Message> {
        let info = &page.detail;
        let summary = &info.summary;

        let poster = container(self.view_image(
            &image_url(summary.poster_path.as_deref().unwrap_or_default(), ImageSize::W500),
            POSTER_WIDTH,
            POSTER_HEIGHT,
            ICON_FILM,
        ))
        .style(|_theme| container::Style {
            border: Border {
                radius: 8.0.into(),
                ..Default::default()
            },
            shadow: Shadow {
                color: Color::from_rgba(0.0, 0.0, 0.0, 0.6),
                offset: iced::Vector::new(0.0, 8.0),
                blur_radius: 24.0,
            },
            ..Default::default()
        });

        let title = text(summary.title.clone())
            .size(40)
            .color(TEXT_PRIMARY)
            .font(iced::Font {
                weight: iced::font::Weight::Bold,
                ..Default::default()
            });

        let mut facts: Vec<Element<Message>> = vec![row![
            icon(ICON_STAR_FILL).size(16).color(ACCENT_GOLD),
            text(rating_label(summary.vote_average))
                .size(16)
                .color(TEXT_PRIMARY)
        ]
        .spacing(6)
        .align_y(iced::Alignment::Center)
        .into()];

        if let Some(year) = summary.year() {
            let span = match detail.kind() {
                DetailKind::Tv if info.is_ongoing() => format!("{} - Present", year),
                _ => year.to_string(),
            };
            facts.push(fact(ICON_CALENDAR, span));
        }
        match detail.kind() {
            DetailKind::Movie => {
                if let Some(minutes) = info.runtime.filter(|m| *m > 0) {
                    facts.push(fact(ICON_CLOCK, format_runtime(minutes)));
                }
            }
            DetailKind::Tv => {
                if let Some(seasons) = info.number_of_seasons {
                    facts.push(fact(ICON_TV, season_label(seasons)));
                }
            }
        }

        let mut chips: Vec<Element<Message>> = info
            .genres
            .iter()
            .map(|genre| chip(genre.name.clone(), false))
            .collect();
        if detail.kind() == DetailKind::Tv {
            if let Some(status) = &info.status {
                chips.push(chip(status.clone(), true));
            }
        }

        let tagline: Element<Message> = match &info.tagline {
            Some(tagline) => text(format!("\"{}\"", tagline))
                .size(16)
                .color(TEXT_MUTED)
                .font(iced::Font {
                    style: iced::font::Style::Italic,
                    ..Default::default()
                })
                .into(),
            None => Space::new().height(0).into(),
        };

        let rate_label = match detail.kind() {
            DetailKind::Movie => "Rate Movie",
            DetailKind::Tv => "Rate Show",
        };
        let rate_button = button(text(rate_label).size(15).color(TEXT_PRIMARY))
            .padding(Padding::new(12.0).left(28.0).right(28.0))
            .style(|_theme, status| {
                let alpha = if matches!(status, button::Status::Hovered) {
                    0.25
                } else {
                    0.12
                };
                button::Style {
                    background: Some(iced::Background::Color(Color::from_rgba(
                        1.0, 1.0, 1.0, alpha,
                    ))),
                    text_color: TEXT_PRIMARY,
                    border: Border {
                        color: Color::from_rgba(1.0, 1.0, 1.0, 0.4),
                        width: 1.0,
                        radius: 6.0.into(),
                    },
                    shadow: Shadow::default(),
                    snap: false,
                }
            })
            .on_press(Message::OpenRatingDialog);

        let your_rating: Element<Message> = match detail.user_rating() {
            Some(rating) => row![
                icon(ICON_STAR_FILL).size(14).color(ACCENT_GOLD),
                text(format!("You rated this {}/10", rating.value()))
                    .size(14)
                    .color(ACCENT_GOLD)
            ]
            .spacing(6)
            .align_y(iced::Alignment::Center)
            .into(),
            None => Space::new().height(0).into(),
        };

        let details = column![
            title,
            tagline,
            Row::with_children(facts).spacing(20),
            Row::with_children(chips).spacing(8),
            text(summary.overview.clone())
                .size(16)
                .color(TEXT_PRIMARY)
                .width(Length::Fixed(720.0)),
            rate_button,
            your_rating,
        ]
        .spacing(16);

        let foreground = container(
            row![poster, details]
                .spacing(40)
                .align_y(iced::Alignment::End),
        )
        .width(Length::Fill)
        .height(Length::Fixed(BACKDROP_HEIGHT))
        .padding(Padding::new(48.0))
        .align_y(iced::alignment::Vertical::Bottom)
        .style(|_theme| container::Style {
            background: Some(iced::Background::Gradient(iced::Gradient::Linear(
                iced::gradient::Linear::new(std::f32::consts::PI)
                    .add_stop(0.0, Color::from_rgba(0.039, 0.039, 0.059, 0.3))
                    .add_stop(1.0, BACKGROUND),
            ))),
            ..Default::default()
        });

        let backdrop_link = backdrop_url(summary.backdrop_path.as_deref().unwrap_or_default());
        let backdrop: Element<Message> = match self.image_store.get(&backdrop_link) {
            Some(handle) => iced::widget::image(handle.clone())
                .width(Length::Fill)
                .height(Length::Fixed(BACKDROP_HEIGHT))
                .content_fit(iced::ContentFit::Cover)
                .into(),
            None => Space::new()
                .width(Length::Fill)
                .height(Length::Fixed(BACKDROP_HEIGHT))
                .into(),
        };

        iced::widget::stack![backdrop, foreground]
            .width(Length::Fill)
            .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tmdb::fake::FakeCatalog;
    use serde_json::json;

    fn catalog() -> FakeCatalog {
        let cast: Vec<serde_json::Value> = (0..30)
            .map(|i| {
                json!({
                    "id": 1000 + i,
                    "name": format!("Actor {}", i),
                    "character": format!("Role {}", i)
                })
            })
            .collect();

        FakeCatalog::default()
            .with(
                "/movie/550",
                json!({
                    "id": 550,
                    "title": "Fight Club",
                    "release_date": "1999-10-15",
                    "runtime": 139,
                    "vote_average": 8.4,
                    "genres": [{ "id": 18, "name": "Drama" }]
                }),
            )
            .with("/movie/550/credits", json!({ "cast": cast }))
            .with("/movie/680", json!({ "id": 680, "title": "Pulp Fiction" }))
            .with(
                "/tv/1399",
                json!({
                    "id": 1399,
                    "name": "Game of Thrones",
                    "first_air_date": "2011-04-17",
                    "number_of_seasons": 8,
                    "status": "Ended"
                }),
            )
            .failing("/tv/1399/credits", ApiError::Network(String::from("reset")))
    }

    fn page(id: MediaId, title: &str) -> DetailPage {
        let raw: crate::tmdb::TmdbMovieDetails =
            serde_json::from_value(json!({ "id": id, "title": title })).expect("details");
        DetailPage {
            detail: MediaDetail::from(raw),
            cast: Vec::new(),
        }
    }

    fn star(n: u8) -> Rating {
        Rating::new(n).expect("valid rating")
    }

    #[tokio::test]
    async fn movie_page_joins_details_and_truncated_cast() {
        let page = fetch_detail(Arc::new(catalog()), DetailKind::Movie, 550)
            .await
            .expect("page");
        assert_eq!(page.detail.summary.title, "Fight Club");
        assert_eq!(page.detail.runtime, Some(139));
        assert_eq!(page.cast.len(), CAST_LIMIT);
        assert_eq!(page.cast[0].name, "Actor 0");
    }

    #[tokio::test]
    async fn failed_credits_leave_cast_empty() {
        let page = fetch_detail(Arc::new(catalog()), DetailKind::Tv, 1399)
            .await
            .expect("page");
        assert_eq!(page.detail.summary.title, "Game of Thrones");
        assert!(page.cast.is_empty());
        assert!(!page.detail.is_ongoing());
    }

    #[tokio::test]
    async fn missing_details_are_not_found() {
        let missing = fetch_detail(Arc::new(catalog()), DetailKind::Movie, 999).await;
        assert_eq!(missing, Err(ApiError::NotFound));

        let zero = fetch_detail(Arc::new(catalog()), DetailKind::Tv, 0).await;
        assert_eq!(zero, Err(ApiError::NotFound));
    }

    #[tokio::test]
    async fn details_with_zero_id_are_not_found() {
        let catalog = FakeCatalog::default().with("/movie/7", json!({ "title": "Ghost" }));
        let result = fetch_detail(Arc::new(catalog), DetailKind::Movie, 7).await;
        assert_eq!(result, Err(ApiError::NotFound));
    }

    #[tokio::test]
    async fn id_zero_never_reaches_the_catalog() {
        let catalog = Arc::new(FakeCatalog::default());
        let result = fetch_detail(catalog.clone(), DetailKind::Tv, 0).await;
        assert_eq!(result, Err(ApiError::NotFound));
        assert_eq!(catalog.call_count(), 0);
    }

    #[tokio::test]
    async fn late_result_for_previous_title_is_ignored() {
        let catalog: Arc<dyn CatalogApi> = Arc::new(catalog());
        let mut controller = DetailController::new(DetailKind::Movie);

        let for_a = controller.begin(550);
        let for_b = controller.begin(680);

        let result_b = fetch_detail(catalog.clone(), DetailKind::Movie, 680).await;
        let result_a = fetch_detail(catalog, DetailKind::Movie, 550).await;

        assert!(controller.apply(for_b, result_b));
        assert!(!controller.apply(for_a, result_a));

        let shown = controller.state().ready().expect("ready");
        assert_eq!(shown.detail.summary.title, "Pulp Fiction");
        assert_eq!(controller.id(), 680);
    }

    #[test]
    fn failed_details_settle_as_not_found() {
        let mut controller = DetailController::new(DetailKind::Tv);
        let generation = controller.begin(5);
        assert!(controller.apply(generation, Err(ApiError::Status(500))));
        assert_eq!(controller.state(), &PageState::NotFound);
    }

    #[test]
    fn confirmed_rating_lasts_until_the_next_navigation() {
        let mut controller = DetailController::new(DetailKind::Movie);
        let generation = controller.begin(550);
        controller.apply(generation, Ok(page(550, "Fight Club")));

        controller.open_rating_dialog();
        controller.update_rating(RatingMessage::Select(star(9)));
        assert!(controller.rating_dialog().is_some());
        assert_eq!(controller.update_rating(RatingMessage::Confirm), Some(star(9)));
        assert!(controller.rating_dialog().is_none());
        assert_eq!(controller.user_rating(), Some(star(9)));

        controller.open_rating_dialog();
        assert_eq!(
            controller.rating_dialog().and_then(|d| d.selected()),
            Some(star(9))
        );

        controller.begin(680);
        assert_eq!(controller.user_rating(), None);
        assert!(controller.rating_dialog().is_none());
    }

    #[test]
    fn revisiting_the_same_title_discards_its_rating() {
        let mut controller = DetailController::new(DetailKind::Movie);
        let generation = controller.begin(550);
        controller.apply(generation, Ok(page(550, "Fight Club")));
        controller.open_rating_dialog();
        controller.update_rating(RatingMessage::Select(star(6)));
        controller.update_rating(RatingMessage::Confirm);
        assert_eq!(controller.user_rating(), Some(star(6)));

        controller.begin(550);
        assert_eq!(controller.user_rating(), None);
    }

    #[test]
    fn cancelling_keeps_the_previous_rating() {
        let mut controller = DetailController::new(DetailKind::Movie);
        let generation = controller.begin(550);
        controller.apply(generation, Ok(page(550, "Fight Club")));

        controller.open_rating_dialog();
        controller.update_rating(RatingMessage::Select(star(3)));
        assert_eq!(controller.update_rating(RatingMessage::Cancel), None);
        assert_eq!(controller.user_rating(), None);
        assert!(controller.rating_dialog().is_none());
    }

    #[test]
    fn dialog_needs_a_loaded_title() {
        let mut controller = DetailController::new(DetailKind::Movie);
        controller.begin(550);
        controller.open_rating_dialog();
        assert!(controller.rating_dialog().is_none());
    }

    #[test]
    fn image_urls_skip_missing_art() {
        let page = page(550, "Fight Club");
        assert!(page.image_urls().is_empty());
    }
}
