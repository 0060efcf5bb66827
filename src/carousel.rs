use std::collections::HashMap;

use iced::widget::{button, container, row, scrollable, text, Row, Space};
use iced::{Border, Color, Element, Length, Shadow};

use crate::media::{Message, ScrollDirection, TEXT_PRIMARY};
use crate::Cinescope;

const ICON_CHEVRON_LEFT: char = '\u{F284}';
const ICON_CHEVRON_RIGHT: char = '\u{F285}';

/// Horizontal distance one arrow click moves a row.
pub const SCROLL_STEP: f32 = 400.0;
const EASING: f32 = 0.15;

fn icon(icon_char: char) -> iced::widget::Text<'static> {
    text(icon_char.to_string()).font(iced::Font {
        family: iced::font::Family::Name("bootstrap-icons"),
        ..Default::default()
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CarouselId {
    Trending,
    Popular,
    FreeToWatch,
    Cast,
    KnownFor,
    Recommendations,
}

impl CarouselId {
    fn key(&self) -> &'static str {
        match self {
            CarouselId::Trending => "trending-carousel",
            CarouselId::Popular => "popular-carousel",
            CarouselId::FreeToWatch => "free-carousel",
            CarouselId::Cast => "cast-carousel",
            CarouselId::KnownFor => "known-for-carousel",
            CarouselId::Recommendations => "recommendations-carousel",
        }
    }

    pub fn widget_id(&self) -> iced::widget::Id {
        iced::widget::Id::new(self.key())
    }
}

/// Scroll position of one row. The row never counts its items; it only knows
/// how far the content can move, as last reported by the scrollable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CarouselState {
    offset: f32,
    target: f32,
    max_offset: Option<f32>,
    animating: bool,
}

impl Default for CarouselState {
    fn default() -> Self {
        Self {
            offset: 0.0,
            target: 0.0,
            max_offset: None,
            animating: false,
        }
    }
}

impl CarouselState {
    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn is_animating(&self) -> bool {
        self.animating
    }

    fn clamp(&self, value: f32) -> f32 {
        let upper = self.max_offset.unwrap_or(f32::MAX);
        value.clamp(0.0, upper.max(0.0))
    }

    pub fn page(&mut self, direction: ScrollDirection) {
        let shifted = match direction {
            ScrollDirection::Left => self.target - SCROLL_STEP,
            ScrollDirection::Right => self.target + SCROLL_STEP,
        };
        self.target = self.clamp(shifted);
        self.animating = true;
    }

    /// Records what the scrollable reports after a user scroll or a redraw.
    pub fn viewport_changed(&mut self, offset: f32, max_offset: f32) {
        self.max_offset = Some(max_offset.max(0.0));
        self.offset = self.clamp(offset);
        self.target = if self.animating {
            self.clamp(self.target)
        } else {
            self.offset
        };
    }

    /// Moves one easing step toward the target. Returns false once it has arrived.
    pub fn step(&mut self) -> bool {
        let diff = self.target - self.offset;
        if diff.abs() < 1.0 {
            self.offset = self.target;
            self.animating = false;
            return false;
        }
        self.offset += diff * EASING;
        true
    }
}

#[derive(Debug, Clone, Default)]
pub struct Carousels {
    rows: HashMap<CarouselId, CarouselState>,
}

impl Carousels {
    pub fn get_mut(&mut self, id: CarouselId) -> &mut CarouselState {
        self.rows.entry(id).or_default()
    }

    pub fn reset(&mut self) {
        self.rows.clear();
    }
}

impl Cinescope {
    pub fn view_carousel<'a>(
        &'a self,
        id: CarouselId,
        title: &str,
        cards: Vec<Element<'a, Message>>,
    ) -> Element<'a, Message> {
        let heading = text(title.to_string())
            .size(24)
            .color(TEXT_PRIMARY)
            .font(iced::Font {
                weight: iced::font::Weight::Bold,
                ..Default::default()
            });

        let header = row![
            heading,
            Space::new().width(Length::Fill),
            view_arrow(id, ScrollDirection::Left),
            view_arrow(id, ScrollDirection::Right),
        ]
        .spacing(8)
        .align_y(iced::Alignment::Center);

        let cards_row = Row::with_children(cards)
            .spacing(16)
            .align_y(iced::Alignment::Start);

        let strip = scrollable(cards_row)
            .id(id.widget_id())
            .on_scroll(move |viewport| {
                let max_offset = viewport.content_bounds().width - viewport.bounds().width;
                Message::CarouselScrolled(id, viewport.absolute_offset().x, max_offset)
            })
            .direction(scrollable::Direction::Horizontal(
                scrollable::Scrollbar::new().width(4).scroller_width(4),
            ))
            .width(Length::Fill);

        iced::widget::column![header, strip]
            .spacing(16)
            .width(Length::Fill)
            .into()
    }
}

fn view_arrow(id: CarouselId, direction: ScrollDirection) -> Element<'static, Message> {
    let icon_char = match direction {
        ScrollDirection::Left => ICON_CHEVRON_LEFT,
        ScrollDirection::Right => ICON_CHEVRON_RIGHT,
    };

    button(
        container(icon(icon_char).size(16).color(TEXT_PRIMARY))
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x(Length::Fill)
            .center_y(Length::Fill),
    )
    .width(Length::Fixed(36.0))
    .height(Length::Fixed(32.0))
    .padding(0)
    .style(|_theme, status| {
        let alpha = match status {
            button::Status::Hovered => 0.2,
            _ => 0.08,
        };
        button::Style {
            background: Some(iced::Background::Color(Color::from_rgba(
                1.0, 1.0, 1.0, alpha,
            ))),
            text_color: TEXT_PRIMARY,
            border: Border {
                color: Color::from_rgba(1.0, 1.0, 1.0, 0.25),
                width: 1.0,
                radius: 6.0.into(),
            },
            shadow: Shadow::default(),
            snap: false,
        }
    })
    .on_press(Message::ScrollCarousel(id, direction))
    .into()
}
