use iced::widget::{button, column, container, row, text, Row, Space};
use iced::{Border, Color, Element, Length, Padding, Shadow};

use crate::media::{ACCENT_GOLD, SURFACE, TEXT_MUTED, TEXT_PRIMARY};

const ICON_STAR: char = '\u{F588}';
const ICON_STAR_FILL: char = '\u{F586}';
const DIALOG_WIDTH: f32 = 460.0;

fn icon(icon_char: char) -> iced::widget::Text<'static> {
    text(icon_char.to_string()).font(iced::Font {
        family: iced::font::Family::Name("bootstrap-icons"),
        ..Default::default()
    })
}

/// A user score between 1 and 10.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 10;

    pub fn new(value: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&value).then_some(Self(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn all() -> impl Iterator<Item = Rating> {
        (Self::MIN..=Self::MAX).map(Rating)
    }

    pub fn label(self) -> &'static str {
        match self.0 {
            1..=3 => "Poor",
            4..=6 => "Average",
            7..=8 => "Good",
            _ => "Excellent",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingPhase {
    Idle,
    Hovering(Rating),
    Selected(Rating),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingMessage {
    Hover(Rating),
    Unhover,
    Select(Rating),
    Confirm,
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingOutcome {
    Confirmed(Rating),
    Cancelled,
}

/// Star picker for one title. Hover state dies with the dialog.
#[derive(Debug, Clone, PartialEq)]
pub struct RatingDialog {
    title: String,
    selected: Option<Rating>,
    hover: Option<Rating>,
}

impl RatingDialog {
    pub fn new(title: impl Into<String>, current: Option<Rating>) -> Self {
        Self {
            title: title.into(),
            selected: current,
            hover: None,
        }
    }

    pub fn phase(&self) -> RatingPhase {
        match (self.hover, self.selected) {
            (Some(hovered), _) => RatingPhase::Hovering(hovered),
            (None, Some(selected)) => RatingPhase::Selected(selected),
            (None, None) => RatingPhase::Idle,
        }
    }

    /// The hover preview if any, otherwise the selection.
    pub fn displayed(&self) -> Option<Rating> {
        self.hover.or(self.selected)
    }

    pub fn selected(&self) -> Option<Rating> {
        self.selected
    }

    pub fn update(&mut self, message: RatingMessage) -> Option<RatingOutcome> {
        match message {
            RatingMessage::Hover(rating) => {
                self.hover = Some(rating);
                None
            }
            RatingMessage::Unhover => {
                self.hover = None;
                None
            }
            RatingMessage::Select(rating) => {
                self.selected = Some(rating);
                None
            }
            RatingMessage::Confirm => self.selected.map(RatingOutcome::Confirmed),
            RatingMessage::Cancel => Some(RatingOutcome::Cancelled),
        }
    }

    pub fn view(&self) -> Element<'_, RatingMessage> {
        let heading = text(format!("Rate \"{}\"", self.title))
            .size(20)
            .color(TEXT_PRIMARY)
            .font(iced::Font {
                weight: iced::font::Weight::Bold,
                ..Default::default()
            });

        let displayed = self.displayed();
        let stars: Vec<Element<RatingMessage>> = Rating::all()
            .map(|star| {
                let lit = displayed.is_some_and(|d| star <= d);
                let glyph = if lit {
                    icon(ICON_STAR_FILL).size(24).color(ACCENT_GOLD)
                } else {
                    icon(ICON_STAR).size(24).color(TEXT_MUTED)
                };
                iced::widget::mouse_area(glyph)
                    .on_enter(RatingMessage::Hover(star))
                    .on_exit(RatingMessage::Unhover)
                    .on_press(RatingMessage::Select(star))
                    .into()
            })
            .collect();

        let score = match displayed {
            Some(rating) => format!("{}/10", rating.value()),
            None => String::from("?/10"),
        };
        let caption = displayed.map_or("Select a rating", Rating::label);
        let score_color = match self.phase() {
            RatingPhase::Selected(_) => ACCENT_GOLD,
            RatingPhase::Hovering(_) => Color::from_rgba(0.961, 0.773, 0.094, 0.7),
            RatingPhase::Idle => TEXT_MUTED,
        };

        let cancel = button(text("Cancel").size(14).color(TEXT_PRIMARY))
            .padding(Padding::new(10.0).left(24.0).right(24.0))
            .style(|_theme, status| {
                let alpha = if matches!(status, button::Status::Hovered) {
                    0.2
                } else {
                    0.1
                };
                button::Style {
                    background: Some(iced::Background::Color(Color::from_rgba(
                        1.0, 1.0, 1.0, alpha,
                    ))),
                    text_color: TEXT_PRIMARY,
                    border: Border {
                        color: Color::from_rgba(1.0, 1.0, 1.0, 0.2),
                        width: 1.0,
                        radius: 6.0.into(),
                    },
                    shadow: Shadow::default(),
                    snap: false,
                }
            })
            .on_press(RatingMessage::Cancel);

        let confirm = button(text("Rate").size(14).color(Color::BLACK))
            .padding(Padding::new(10.0).left(24.0).right(24.0))
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
            .on_press_maybe(self.selected.map(|_| RatingMessage::Confirm));

        let body = column![
            heading,
            Row::with_children(stars).spacing(6),
            text(score).size(28).color(score_color),
            text(caption).size(13).color(TEXT_MUTED),
            row![cancel, Space::new().width(Length::Fill), confirm].width(Length::Fill),
        ]
        .spacing(18)
        .align_x(iced::Alignment::Center)
        .padding(Padding::new(28.0));

        let dialog = container(body)
            .width(Length::Fixed(DIALOG_WIDTH))
            .style(|_theme| container::Style {
                background: Some(iced::Background::Color(SURFACE)),
                border: Border {
                    color: Color::from_rgba(1.0, 1.0, 1.0, 0.1),
                    width: 1.0,
                    radius: 12.0.into(),
                },
                shadow: Shadow {
                    color: Color::from_rgba(0.0, 0.0, 0.0, 0.6),
                    offset: iced::Vector::new(0.0, 8.0),
                    blur_radius: 24.0,
                },
                ..Default::default()
            });

        let backdrop = iced::widget::mouse_area(
            container(Space::new().width(Length::Fill).height(Length::Fill))
                .width(Length::Fill)
                .height(Length::Fill)
                .style(|_theme| container::Style {
                    background: Some(iced::Background::Color(Color::from_rgba(
                        0.0, 0.0, 0.0, 0.75,
                    ))),
                    ..Default::default()
                }),
        )
        .on_press(RatingMessage::Cancel);

        let centered = container(iced::widget::mouse_area(dialog))
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x(Length::Fill)
            .center_y(Length::Fill);

        iced::widget::stack![backdrop, centered]
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn star(n: u8) -> Rating {
        Rating::new(n).expect("valid rating")
    }

    #[test]
    fn ratings_are_limited_to_one_through_ten() {
        assert!(Rating::new(0).is_none());
        assert!(Rating::new(11).is_none());
        assert_eq!(Rating::all().count(), 10);
        assert_eq!(star(3).label(), "Poor");
        assert_eq!(star(6).label(), "Average");
        assert_eq!(star(8).label(), "Good");
        assert_eq!(star(10).label(), "Excellent");
    }

    #[test]
    fn selecting_a_star_displays_it() {
        let mut dialog = RatingDialog::new("Heat", None);
        assert_eq!(dialog.phase(), RatingPhase::Idle);
        assert_eq!(dialog.update(RatingMessage::Select(star(7))), None);
        assert_eq!(dialog.displayed(), Some(star(7)));
        assert_eq!(dialog.phase(), RatingPhase::Selected(star(7)));
    }

    #[test]
    fn hover_previews_without_changing_selection() {
        let mut dialog = RatingDialog::new("Heat", None);
        dialog.update(RatingMessage::Select(star(4)));
        dialog.update(RatingMessage::Hover(star(9)));
        assert_eq!(dialog.phase(), RatingPhase::Hovering(star(9)));
        assert_eq!(dialog.displayed(), Some(star(9)));
        dialog.update(RatingMessage::Unhover);
        assert_eq!(dialog.displayed(), Some(star(4)));
    }

    #[test]
    fn cancel_after_select_emits_no_rating() {
        let mut dialog = RatingDialog::new("Heat", None);
        dialog.update(RatingMessage::Select(star(5)));
        assert_eq!(
            dialog.update(RatingMessage::Cancel),
            Some(RatingOutcome::Cancelled)
        );
    }

    #[test]
    fn confirm_emits_selected_rating() {
        let mut dialog = RatingDialog::new("Heat", None);
        assert_eq!(dialog.update(RatingMessage::Confirm), None);
        dialog.update(RatingMessage::Hover(star(2)));
        dialog.update(RatingMessage::Select(star(8)));
        assert_eq!(
            dialog.update(RatingMessage::Confirm),
            Some(RatingOutcome::Confirmed(star(8)))
        );
    }

    #[test]
    fn opens_with_previous_rating() {
        let dialog = RatingDialog::new("Heat", Some(star(6)));
        assert_eq!(dialog.selected(), Some(star(6)));
    }
}
