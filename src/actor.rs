use std::sync::Arc;

use iced::widget::{column, container, row, text, Column, Space};
use iced::{Border, Color, Element, Length, Padding, Shadow};
use tracing::debug;

use crate::carousel::CarouselId;
use crate::error::ApiError;
use crate::media::{MediaId, MediaSummary, Message, PersonDetail, TEXT_MUTED, TEXT_PRIMARY};
use crate::normalize::{biography_paragraphs, format_birthday, known_for};
use crate::page::{or_empty, Generation, LoadGuard, PageState};
use crate::tmdb::{image_url, CatalogApi, ImageSize};
use crate::Cinescope;

const ICON_PERSON: char = '\u{F4E1}';
const ICON_BRIEFCASE: char = '\u{F1CC}';
const ICON_CALENDAR: char = '\u{F1E8}';

const PORTRAIT_WIDTH: f32 = 300.0;
const PORTRAIT_HEIGHT: f32 = 450.0;

fn icon(icon_char: char) -> iced::widget::Text<'static> {
    text(icon_char.to_string()).font(iced::Font {
        family: iced::font::Family::Name("bootstrap-icons"),
        ..Default::default()
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActorPage {
    pub person: PersonDetail,
    pub known_for: Vec<MediaSummary>,
}

impl ActorPage {
    pub fn portrait_url(&self) -> String {
        image_url(
            self.person.profile_path.as_deref().unwrap_or_default(),
            ImageSize::W500,
        )
    }

    pub fn image_urls(&self) -> Vec<String> {
        let mut urls = vec![self.portrait_url()];
        urls.retain(|url| !crate::tmdb::is_placeholder(url));
        urls.extend(crate::cards::media_image_urls(&self.known_for));
        urls
    }
}

#[derive(Debug, Default)]
pub struct ActorController {
    id: MediaId,
    guard: LoadGuard,
    state: PageState<ActorPage>,
}

impl ActorController {
    pub fn state(&self) -> &PageState<ActorPage> {
        &self.state
    }

    pub fn begin(&mut self, id: MediaId) -> Generation {
        self.id = id;
        self.state = PageState::Loading;
        self.guard.begin()
    }

    pub fn apply(&mut self, generation: Generation, result: Result<ActorPage, ApiError>) -> bool {
        if !self.guard.accept(generation) {
            debug!(id = self.id, "dropping stale person result");
            return false;
        }
        self.state = PageState::settle(result, "Person");
        true
    }
}

pub async fn fetch_actor(catalog: Arc<dyn CatalogApi>, id: MediaId) -> Result<ActorPage, ApiError> {
    if id == 0 {
        return Err(ApiError::NotFound);
    }

    let (person, credits) = tokio::join!(catalog.person_details(id), catalog.person_credits(id));

    let person = PersonDetail::from(person?);
    if person.id == 0 {
        return Err(ApiError::NotFound);
    }

    let credits = or_empty(credits.map(|c| c.cast), "known-for credits")
        .into_iter()
        .map(MediaSummary::from)
        .collect();

    Ok(ActorPage {
        person,
        known_for: known_for(credits),
    })
}

impl Cinescope {
    pub fn view_actor_page<'a>(&'a self, actor: &'a ActorController) -> Element<'a, Message> {
        let page = match actor.state() {
            PageState::Loading => return self.view_loading("Loading..."),
            PageState::NotFound => return self.view_not_found("Person not found"),
            PageState::Ready(page) => page,
        };
        let person = &page.person;

        let portrait = container(self.view_image(
            &page.portrait_url(),
            PORTRAIT_WIDTH,
            PORTRAIT_HEIGHT,
            ICON_PERSON,
        ))
        .style(|_theme| container::Style {
            border: Border {
                radius: 8.0.into(),
                ..Default::default()
            },
            shadow: Shadow {
                color: Color::from_rgba(0.0, 0.0, 0.0, 0.5),
                offset: iced::Vector::new(0.0, 8.0),
                blur_radius: 20.0,
            },
            ..Default::default()
        });

        let name = text(person.name.clone())
            .size(40)
            .color(TEXT_PRIMARY)
            .font(iced::Font {
                weight: iced::font::Weight::Bold,
                ..Default::default()
            });

        let mut facts: Vec<Element<Message>> = Vec::new();
        if let Some(department) = &person.known_for_department {
            facts.push(
                row![
                    icon(ICON_BRIEFCASE).size(14).color(TEXT_MUTED),
                    text(department.clone()).size(15).color(TEXT_MUTED)
                ]
                .spacing(8)
                .align_y(iced::Alignment::Center)
                .into(),
            );
        }
        if let Some(born) = person.birthday.as_deref().and_then(format_birthday) {
            let line = match &person.place_of_birth {
                Some(place) => format!("{} in {}", born, place),
                None => born,
            };
            facts.push(
                row![
                    icon(ICON_CALENDAR).size(14).color(TEXT_MUTED),
                    text(line).size(15).color(TEXT_MUTED)
                ]
                .spacing(8)
                .align_y(iced::Alignment::Center)
                .into(),
            );
        }

        let biography: Element<Message> = {
            let paragraphs = biography_paragraphs(&person.biography);
            if paragraphs.is_empty() {
                Space::new().height(0).into()
            } else {
                let body: Vec<Element<Message>> = paragraphs
                    .into_iter()
                    .map(|p| text(p.to_string()).size(15).color(TEXT_PRIMARY).into())
                    .collect();
                column![
                    self.view_section_header("Biography"),
                    Column::with_children(body).spacing(12),
                ]
                .spacing(12)
                .width(Length::Fixed(760.0))
                .into()
            }
        };

        let info = column![name, Column::with_children(facts).spacing(8), biography].spacing(20);

        let hero = row![portrait, info]
            .spacing(48)
            .padding(Padding::new(48.0));

        let known_for: Element<Message> = if page.known_for.is_empty() {
            Space::new().height(0).into()
        } else {
            container(self.view_carousel(
                CarouselId::KnownFor,
                "Known For",
                page.known_for
                    .iter()
                    .map(|item| self.view_media_card(item))
                    .collect(),
            ))
            .padding(Padding::new(0.0).left(48.0).right(48.0).bottom(48.0))
            .into()
        };

        column![hero, known_for].width(Length::Fill).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tmdb::fake::FakeCatalog;
    use serde_json::json;

    fn catalog() -> FakeCatalog {
        FakeCatalog::default()
            .with(
                "/person/287",
                json!({
                    "id": 287,
                    "name": "Brad Pitt",
                    "biography": "First paragraph.\n\nSecond paragraph.",
                    "birthday": "1963-12-18",
                    "place_of_birth": "Shawnee, Oklahoma, USA",
                    "known_for_department": "Acting"
                }),
            )
            .with(
                "/person/287/combined_credits",
                json!({
                    "cast": [
                        { "id": 1, "title": "Troy", "media_type": "movie", "vote_average": 6.9 },
                        { "id": 2, "title": "Fight Club", "media_type": "movie", "vote_average": 8.4 },
                        { "id": 3, "name": "Friends", "media_type": "tv", "vote_average": 8.4 },
                        { "id": 4, "title": "Cool World", "media_type": "movie", "vote_average": 4.1 }
                    ],
                    "crew": [
                        { "id": 5, "title": "Produced Thing", "media_type": "movie", "vote_average": 9.9 }
                    ]
                }),
            )
            .with("/person/31", json!({ "id": 31, "name": "Tom Hanks" }))
            .failing("/person/31/combined_credits", ApiError::Status(502))
    }

    #[tokio::test]
    async fn known_for_is_cast_sorted_by_rating() {
        let page = fetch_actor(Arc::new(catalog()), 287).await.expect("page");
        assert_eq!(page.person.name, "Brad Pitt");
        let order: Vec<MediaId> = page.known_for.iter().map(|m| m.id).collect();
        assert_eq!(order, vec![2, 3, 1, 4]);
        assert_eq!(page.known_for[1].kind, crate::media::MediaKind::Tv);
    }

    #[tokio::test]
    async fn failed_credits_leave_known_for_empty() {
        let page = fetch_actor(Arc::new(catalog()), 31).await.expect("page");
        assert_eq!(page.person.name, "Tom Hanks");
        assert!(page.known_for.is_empty());
    }

    #[tokio::test]
    async fn unknown_person_is_not_found() {
        let result = fetch_actor(Arc::new(catalog()), 1).await;
        assert_eq!(result, Err(ApiError::NotFound));
    }

    #[test]
    fn stale_person_result_is_dropped() {
        let mut actor = ActorController::default();
        let first = actor.begin(287);
        let second = actor.begin(31);
        assert!(!actor.apply(first, Err(ApiError::NotFound)));
        assert!(actor.state().is_loading());
        assert!(actor.apply(second, Err(ApiError::NotFound)));
        assert_eq!(actor.state(), &PageState::NotFound);
    }
}
