use std::sync::Arc;

use iced::widget::{button, column, container, row, text, Space};
use iced::{Border, Color, Element, Length, Padding, Shadow};
use tracing::{debug, warn};

use crate::carousel::CarouselId;
use crate::error::ApiError;
use crate::media::{MediaSummary, Message, ACCENT_GOLD, SURFACE, TEXT_MUTED, TEXT_PRIMARY};
use crate::page::{Generation, LoadGuard};
use crate::session::UserProfile;
use crate::tmdb::CatalogApi;
use crate::Cinescope;

pub const RECOMMENDATION_LIMIT: usize = 20;

const ICON_PERSON_CIRCLE: char = '\u{F4D7}';
const ICON_STAR: char = '\u{F588}';

fn icon(icon_char: char) -> iced::widget::Text<'static> {
    text(icon_char.to_string()).font(iced::Font {
        family: iced::font::Family::Name("bootstrap-icons"),
        ..Default::default()
    })
}

/// Recommendations for the signed-in user. A failed refresh keeps whatever
/// list was already on screen.
#[derive(Debug, Default)]
pub struct ProfileController {
    guard: LoadGuard,
    recommendations: Vec<MediaSummary>,
}

impl ProfileController {
    pub fn recommendations(&self) -> &[MediaSummary] {
        &self.recommendations
    }

    pub fn is_loading(&self) -> bool {
        self.guard.in_flight()
    }

    pub fn begin(&mut self) -> Generation {
        self.guard.begin()
    }

    pub fn apply(
        &mut self,
        generation: Generation,
        result: Result<Vec<MediaSummary>, ApiError>,
    ) -> bool {
        if !self.guard.accept(generation) {
            debug!("dropping stale recommendations");
            return false;
        }
        match result {
            Ok(list) => self.recommendations = list,
            Err(error) => warn!(%error, "recommendations refresh failed, keeping previous list"),
        }
        true
    }
}

pub async fn fetch_recommendations(
    catalog: Arc<dyn CatalogApi>,
) -> Result<Vec<MediaSummary>, ApiError> {
    let page = catalog.trending_today().await?;
    Ok(page
        .results
        .into_iter()
        .take(RECOMMENDATION_LIMIT)
        .map(MediaSummary::from)
        .collect())
}

fn panel<'a>(body: impl Into<Element<'a, Message>>) -> Element<'a, Message> {
    container(body)
        .width(Length::Fill)
        .padding(24)
        .style(|_theme| container::Style {
            background: Some(iced::Background::Color(SURFACE)),
            border: Border {
                color: Color::from_rgba(1.0, 1.0, 1.0, 0.08),
                width: 1.0,
                radius: 12.0.into(),
            },
            shadow: Shadow {
                color: Color::from_rgba(0.0, 0.0, 0.0, 0.3),
                offset: iced::Vector::new(0.0, 4.0),
                blur_radius: 12.0,
            },
            ..Default::default()
        })
        .into()
}

fn card<'a>(title: &str, body: Element<'a, Message>) -> Element<'a, Message> {
    panel(
        column![
            text(title.to_string())
                .size(18)
                .color(TEXT_PRIMARY)
                .font(iced::Font {
                    weight: iced::font::Weight::Bold,
                    ..Default::default()
                }),
            body
        ]
        .spacing(16),
    )
}

fn pill<'a>(label: String) -> Element<'a, Message> {
    container(text(label).size(12).color(TEXT_PRIMARY))
        .padding(Padding::new(4.0).left(10.0).right(10.0))
        .style(|_theme| container::Style {
            background: Some(iced::Background::Color(Color::from_rgba(
                1.0, 1.0, 1.0, 0.12,
            ))),
            border: Border {
                radius: 12.0.into(),
                ..Default::default()
            },
            ..Default::default()
        })
        .into()
}

fn stat_row<'a>(label: &str, value: String) -> Element<'a, Message> {
    row![
        text(label.to_string()).size(14).color(TEXT_MUTED),
        Space::new().width(Length::Fill),
        text(value).size(14).color(TEXT_PRIMARY),
    ]
    .align_y(iced::Alignment::Center)
    .into()
}

impl Cinescope {
    pub fn view_profile_page<'a>(&'a self, profile: &'a ProfileController) -> Element<'a, Message> {
        let Some(user) = self.session.profile() else {
            return self.view_not_found("Sign in to see your profile");
        };

        let ratings = card(
            "Your Ratings",
            column![
                icon(ICON_STAR).size(32).color(TEXT_MUTED),
                text(
                    "Start rating movies and TV shows to build your profile and get better recommendations!"
                )
                .size(14)
                .color(TEXT_MUTED),
            ]
            .spacing(12)
            .align_x(iced::Alignment::Center)
            .width(Length::Fill)
            .into(),
        );

        let recommendations: Element<Message> = if profile.recommendations().is_empty() {
            Space::new().height(0).into()
        } else {
            card(
                "Recommended for You",
                self.view_carousel(
                    CarouselId::Recommendations,
                    "",
                    profile
                        .recommendations()
                        .iter()
                        .map(|item| self.view_media_card(item))
                        .collect(),
                ),
            )
        };

        let stats = card(
            "Your Stats",
            column![
                stat_row("Total Ratings", user.total_ratings.to_string()),
                stat_row("Average Rating", String::from("N/A")),
                stat_row("Favorite Genre", String::from("Unknown")),
            ]
            .spacing(12)
            .into(),
        );

        let main = column![ratings, recommendations]
            .spacing(24)
            .width(Length::FillPortion(2));
        let sidebar = column![stats].width(Length::FillPortion(1));

        column![
            self.view_profile_header(user, profile.is_loading()),
            row![main, sidebar].spacing(24),
        ]
        .spacing(24)
        .padding(Padding::new(32.0).left(48.0).right(48.0).bottom(48.0))
        .width(Length::Fill)
        .into()
    }

    fn view_profile_header<'a>(
        &'a self,
        user: &'a UserProfile,
        loading: bool,
    ) -> Element<'a, Message> {
        let avatar = container(icon(ICON_PERSON_CIRCLE).size(64).color(ACCENT_GOLD))
            .width(Length::Fixed(96.0))
            .height(Length::Fixed(96.0))
            .center_x(Length::Fixed(96.0))
            .center_y(Length::Fixed(96.0));

        let details = column![
            text(user.name.clone())
                .size(32)
                .color(TEXT_PRIMARY)
                .font(iced::Font {
                    weight: iced::font::Weight::Bold,
                    ..Default::default()
                }),
            text(user.email.clone()).size(14).color(TEXT_MUTED),
            row![
                pill(format!("{} Ratings", user.total_ratings)),
                pill(format!("Member since {}", user.member_since)),
            ]
            .spacing(8),
        ]
        .spacing(8);

        let label = if loading {
            "Loading..."
        } else {
            "Get Recommendations"
        };
        let refresh = button(text(label).size(14).color(Color::BLACK))
            .padding(Padding::new(10.0).left(20.0).right(20.0))
            .style(|_theme, status| {
                let background = match status {
                    button::Status::Disabled => Color::from_rgba(0.961, 0.773, 0.094, 0.4),
                    button::Status::Hovered => Color::from_rgb(1.0, 0.84, 0.2),
                    _ => ACCENT_GOLD,
                };
                button::Style {
                    background: Some(iced::Background::Color(background)),
                    text_color: Color::BLACK,
                    border: Border {
                        radius: 6.0.into(),
                        ..Default::default()
                    },
                    shadow: Shadow::default(),
                    snap: false,
                }
            })
            .on_press_maybe((!loading).then_some(Message::RefreshRecommendations));

        panel(
            row![avatar, details, Space::new().width(Length::Fill), refresh]
                .spacing(24)
                .align_y(iced::Alignment::Center),
        )
    }
}
