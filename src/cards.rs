use iced::widget::{column, container, row, text, Space};
use iced::{Border, Color, Element, Length, Padding, Shadow};

use crate::media::{
    MediaSummary, Message, PersonSummary, ACCENT_GOLD, SURFACE, TEXT_MUTED, TEXT_PRIMARY,
};
use crate::normalize::rating_label;
use crate::tmdb::{image_url, ImageSize};
use crate::Cinescope;

const ICON_FILM: char = '\u{F3A9}';
const ICON_PERSON: char = '\u{F4E1}';
const ICON_STAR_FILL: char = '\u{F586}';

pub const CARD_WIDTH: f32 = 150.0;
pub const CARD_HEIGHT: f32 = 225.0;
const PERSON_WIDTH: f32 = 130.0;
const PERSON_HEIGHT: f32 = 180.0;

fn icon(icon_char: char) -> iced::widget::Text<'static> {
    text(icon_char.to_string()).font(iced::Font {
        family: iced::font::Family::Name("bootstrap-icons"),
        ..Default::default()
    })
}

pub fn poster_url(item: &MediaSummary) -> String {
    image_url(item.image_path().unwrap_or_default(), ImageSize::W500)
}

pub fn profile_url(profile_path: Option<&str>) -> String {
    image_url(profile_path.unwrap_or_default(), ImageSize::W185)
}

fn badge<'a>(label: Element<'a, Message>, background: Color) -> Element<'a, Message> {
    container(label)
        .padding(Padding::new(2.0).left(6.0).right(6.0))
        .style(move |_theme| container::Style {
            background: Some(iced::Background::Color(background)),
            border: Border {
                radius: 4.0.into(),
                ..Default::default()
            },
            ..Default::default()
        })
        .into()
}

impl Cinescope {
    pub fn view_media_card<'a>(&'a self, item: &MediaSummary) -> Element<'a, Message> {
        let poster = self.view_image(&poster_url(item), CARD_WIDTH, CARD_HEIGHT, ICON_FILM);

        let kind_badge = badge(
            text(item.kind.to_string()).size(10).color(TEXT_PRIMARY).into(),
            Color::from_rgba(0.0, 0.0, 0.0, 0.7),
        );
        let rating_badge: Element<Message> = if item.vote_average > 0.0 {
            badge(
                row![
                    icon(ICON_STAR_FILL).size(10).color(ACCENT_GOLD),
                    text(rating_label(item.vote_average))
                        .size(11)
                        .color(TEXT_PRIMARY),
                ]
                .spacing(3)
                .align_y(iced::Alignment::Center)
                .into(),
                Color::from_rgba(0.0, 0.0, 0.0, 0.7),
            )
        } else {
            Space::new().width(0).height(0).into()
        };

        let badges = container(
            row![kind_badge, Space::new().width(Length::Fill), rating_badge]
                .align_y(iced::Alignment::Center),
        )
        .width(Length::Fixed(CARD_WIDTH))
        .padding(6);

        let framed = container(iced::widget::stack![poster, badges])
            .width(Length::Fixed(CARD_WIDTH))
            .height(Length::Fixed(CARD_HEIGHT))
            .style(|_theme| container::Style {
                background: Some(iced::Background::Color(SURFACE)),
                border: Border {
                    color: Color::TRANSPARENT,
                    width: 0.0,
                    radius: 8.0.into(),
                },
                shadow: Shadow {
                    color: Color::from_rgba(0.0, 0.0, 0.0, 0.3),
                    offset: iced::Vector::new(0.0, 4.0),
                    blur_radius: 8.0,
                },
                ..Default::default()
            });

        let year = item
            .year()
            .map(|y| y.to_string())
            .unwrap_or_default();
        let caption = column![
            text(item.title.clone()).size(14).color(TEXT_PRIMARY),
            text(year).size(12).color(TEXT_MUTED),
        ]
        .spacing(2)
        .width(Length::Fixed(CARD_WIDTH));

        iced::widget::mouse_area(column![framed, caption].spacing(8))
            .on_press(Message::Navigate(item.route()))
            .interaction(iced::mouse::Interaction::Pointer)
            .into()
    }

    pub fn view_person_card<'a>(&'a self, person: &PersonSummary) -> Element<'a, Message> {
        let portrait = container(self.view_image(
            &profile_url(person.profile_path.as_deref()),
            PERSON_WIDTH,
            PERSON_HEIGHT,
            ICON_PERSON,
        ))
        .style(|_theme| container::Style {
            background: Some(iced::Background::Color(SURFACE)),
            border: Border {
                radius: 8.0.into(),
                ..Default::default()
            },
            ..Default::default()
        });

        let role = person
            .role
            .as_ref()
            .map(|r| r.label().to_string())
            .unwrap_or_default();
        let caption = column![
            text(person.name.clone()).size(14).color(TEXT_PRIMARY),
            text(role).size(12).color(TEXT_MUTED),
        ]
        .spacing(2)
        .width(Length::Fixed(PERSON_WIDTH));

        iced::widget::mouse_area(column![portrait, caption].spacing(8))
            .on_press(Message::Navigate(crate::route::Route::Actor(person.id)))
            .interaction(iced::mouse::Interaction::Pointer)
            .into()
    }

    /// A downloaded image, or a flat tile with `fallback` until it arrives.
    pub fn view_image<'a>(
        &'a self,
        url: &str,
        width: f32,
        height: f32,
        fallback: char,
    ) -> Element<'a, Message> {
        match self.image_store.get(url) {
            Some(handle) => iced::widget::image(handle.clone())
                .width(Length::Fixed(width))
                .height(Length::Fixed(height))
                .content_fit(iced::ContentFit::Cover)
                .into(),
            None => container(icon(fallback).size(40).color(TEXT_MUTED))
                .width(Length::Fixed(width))
                .height(Length::Fixed(height))
                .center_x(Length::Fixed(width))
                .center_y(Length::Fixed(height))
                .style(|_theme| container::Style {
                    background: Some(iced::Background::Color(SURFACE)),
                    ..Default::default()
                })
                .into(),
        }
    }
}

/// Image URLs a list of hits renders, skipping placeholders.
pub fn media_image_urls<'a>(items: impl IntoIterator<Item = &'a MediaSummary>) -> Vec<String> {
    items
        .into_iter()
        .map(poster_url)
        .filter(|url| !crate::tmdb::is_placeholder(url))
        .collect()
}

pub fn person_image_urls<'a>(people: impl IntoIterator<Item = &'a PersonSummary>) -> Vec<String> {
    people
        .into_iter()
        .map(|p| profile_url(p.profile_path.as_deref()))
        .filter(|url| !crate::tmdb::is_placeholder(url))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::MediaKind;

    fn hit(kind: MediaKind, poster: Option<&str>, profile: Option<&str>) -> MediaSummary {
        MediaSummary {
            id: 1,
            title: String::from("Alien"),
            poster_path: poster.map(String::from),
            backdrop_path: None,
            profile_path: profile.map(String::from),
            release_date: None,
            vote_average: 0.0,
            overview: String::new(),
            kind,
            genre_ids: Vec::new(),
        }
    }

    #[test]
    fn poster_url_uses_profile_for_people() {
        assert_eq!(
            poster_url(&hit(MediaKind::Person, Some("/p.jpg"), Some("/face.jpg"))),
            "https://image.tmdb.org/t/p/w500/face.jpg"
        );
        assert_eq!(
            poster_url(&hit(MediaKind::Movie, None, None)),
            crate::tmdb::PLACEHOLDER_IMAGE
        );
    }

    #[test]
    fn placeholders_are_never_fetched() {
        let items = [
            hit(MediaKind::Movie, Some("/a.jpg"), None),
            hit(MediaKind::Tv, None, None),
        ];
        assert_eq!(
            media_image_urls(&items),
            vec![String::from("https://image.tmdb.org/t/p/w500/a.jpg")]
        );

        let people = [PersonSummary {
            id: 2,
            name: String::from("Sigourney Weaver"),
            profile_path: None,
            role: None,
        }];
        assert!(person_image_urls(&people).is_empty());
    }
}
