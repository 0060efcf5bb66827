use iced::widget::{
    button, column, container, pick_list, row, scrollable, text, text_input, Row, Space,
};
use iced::{Border, Color, Element, Length, Padding, Shadow};

use crate::media::{Message, ACCENT_GOLD, SURFACE, TEXT_MUTED, TEXT_PRIMARY};
use crate::route::Route;
use crate::search::SearchScope;
use crate::{ActivePage, Cinescope};

const ICON_FILM: char = '\u{F3A9}';
const ICON_HOUSE: char = '\u{F425}';
const ICON_PERSON_FILL: char = '\u{F4DA}';
const ICON_SEARCH: char = '\u{F52A}';

pub const MAIN_SCROLL_ID: &str = "main-scroll";
const NAV_HEIGHT: f32 = 72.0;

fn icon(icon_char: char) -> iced::widget::Text<'static> {
    text(icon_char.to_string()).font(iced::Font {
        family: iced::font::Family::Name("bootstrap-icons"),
        ..Default::default()
    })
}

fn ghost_button<'a>(label: Element<'a, Message>, on_press: Message) -> Element<'a, Message> {
    button(label)
        .padding(Padding::new(8.0).left(14.0).right(14.0))
        .style(|_theme, status| {
            let background = match status {
                button::Status::Hovered => Color::from_rgba(1.0, 1.0, 1.0, 0.1),
                _ => Color::TRANSPARENT,
            };
            button::Style {
                background: Some(iced::Background::Color(background)),
                text_color: TEXT_PRIMARY,
                border: Border {
                    radius: 6.0.into(),
                    ..Default::default()
                },
                shadow: Shadow::default(),
                snap: false,
            }
        })
        .on_press(on_press)
        .into()
}

fn accent_button<'a>(label: &'a str, on_press: Message) -> Element<'a, Message> {
    button(text(label).size(14).color(Color::BLACK))
        .padding(Padding::new(8.0).left(16.0).right(16.0))
        .style(|_theme, status| {
            let background = match status {
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
        .on_press(on_press)
        .into()
}

pub fn hidden_vertical_scrollbar_style(
    _theme: &iced::Theme,
    _status: scrollable::Status,
) -> scrollable::Style {
    let hidden_rail = scrollable::Rail {
        background: None,
        border: Border::default(),
        scroller: scrollable::Scroller {
            background: iced::Background::Color(Color::TRANSPARENT),
            border: Border::default(),
        },
    };
    scrollable::Style {
        container: container::Style::default(),
        vertical_rail: hidden_rail.clone(),
        horizontal_rail: hidden_rail,
        gap: None,
        auto_scroll: scrollable::AutoScroll {
            background: iced::Background::Color(Color::TRANSPARENT),
            border: Border::default(),
            shadow: Shadow::default(),
            icon: Color::TRANSPARENT,
        },
    }
}

fn skeleton_style(radius: f32) -> impl Fn(&iced::Theme) -> container::Style {
    move |_theme| container::Style {
        background: Some(iced::Background::Color(SURFACE)),
        border: Border {
            radius: radius.into(),
            ..Default::default()
        },
        ..Default::default()
    }
}

impl Cinescope {
    pub fn view_nav_bar(&self) -> Element<'_, Message> {
        let logo = button(
            row![
                icon(ICON_FILM).size(22).color(ACCENT_GOLD),
                text("CINESCOPE")
                    .size(22)
                    .color(ACCENT_GOLD)
                    .font(iced::Font {
                        weight: iced::font::Weight::Bold,
                        ..Default::default()
                    }),
            ]
            .spacing(10)
            .align_y(iced::Alignment::Center),
        )
        .padding(0)
        .style(|_theme, _status| button::Style {
            background: None,
            text_color: ACCENT_GOLD,
            border: Border::default(),
            shadow: Shadow::default(),
            snap: false,
        })
        .on_press(Message::Navigate(Route::Home));

        let home_link = ghost_button(
            row![
                icon(ICON_HOUSE).size(14).color(TEXT_MUTED),
                text("Home").size(14).color(TEXT_PRIMARY)
            ]
            .spacing(6)
            .align_y(iced::Alignment::Center)
            .into(),
            Message::Navigate(Route::Home),
        );

        let nav = row![
            logo,
            home_link,
            Space::new().width(Length::Fill),
            self.view_search_bar(),
            self.view_session_buttons(),
        ]
        .spacing(24)
        .padding(Padding::new(12.0).left(48.0).right(48.0))
        .align_y(iced::Alignment::Center);

        container(nav)
            .width(Length::Fill)
            .height(Length::Fixed(NAV_HEIGHT))
            .center_y(Length::Fixed(NAV_HEIGHT))
            .style(|_theme| container::Style {
                background: Some(iced::Background::Color(Color::from_rgba(
                    0.039, 0.039, 0.059, 0.95,
                ))),
                border: Border {
                    color: Color::from_rgba(1.0, 1.0, 1.0, 0.06),
                    width: 1.0,
                    radius: 0.0.into(),
                },
                ..Default::default()
            })
            .into()
    }

    pub fn view_search_bar(&self) -> Element<'_, Message> {
        let search_icon = icon(ICON_SEARCH).size(14).color(TEXT_MUTED);

        let search_input = text_input("Search movies, TV shows, people...", &self.search_input)
            .on_input(Message::SearchInputChanged)
            .on_submit(Message::SearchSubmit)
            .padding(8)
            .width(Length::Fixed(260.0))
            .style(|_theme, _status| text_input::Style {
                background: iced::Background::Color(Color::TRANSPARENT),
                border: Border::default(),
                icon: TEXT_MUTED,
                placeholder: TEXT_MUTED,
                value: TEXT_PRIMARY,
                selection: ACCENT_GOLD,
            });

        let scope_picker = pick_list(
            &SearchScope::ALL[..],
            Some(self.search_scope),
            Message::SearchScopeChanged,
        )
        .text_size(13)
        .padding(Padding::new(6.0).left(10.0).right(10.0))
        .style(|_, _| pick_list::Style {
            text_color: TEXT_PRIMARY,
            placeholder_color: TEXT_MUTED,
            handle_color: TEXT_PRIMARY,
            background: iced::Background::Color(Color::from_rgba(1.0, 1.0, 1.0, 0.1)),
            border: Border {
                color: Color::from_rgba(1.0, 1.0, 1.0, 0.2),
                width: 1.0,
                radius: 4.0.into(),
            },
        });

        let search_content = row![search_icon, search_input, scope_picker]
            .spacing(8)
            .align_y(iced::Alignment::Center);

        container(search_content)
            .padding(Padding::new(4.0).left(12.0).right(6.0))
            .style(|_theme| container::Style {
                background: Some(iced::Background::Color(Color::from_rgba(
                    0.0, 0.0, 0.0, 0.7,
                ))),
                border: Border {
                    color: Color::from_rgba(1.0, 1.0, 1.0, 0.2),
                    width: 1.0,
                    radius: 24.0.into(),
                },
                ..Default::default()
            })
            .into()
    }

    fn view_session_buttons(&self) -> Element<'_, Message> {
        match self.session.profile() {
            Some(profile) => row![
                ghost_button(
                    row![
                        icon(ICON_PERSON_FILL).size(14).color(ACCENT_GOLD),
                        text(profile.name.clone()).size(14).color(TEXT_PRIMARY)
                    ]
                    .spacing(6)
                    .align_y(iced::Alignment::Center)
                    .into(),
                    Message::Navigate(Route::Profile),
                ),
                ghost_button(
                    text("Sign Out").size(14).color(TEXT_MUTED).into(),
                    Message::SignOut
                ),
            ]
            .spacing(8)
            .align_y(iced::Alignment::Center)
            .into(),
            None => row![
                ghost_button(
                    text("Login").size(14).color(TEXT_PRIMARY).into(),
                    Message::Navigate(Route::Login)
                ),
                accent_button("Sign Up", Message::Navigate(Route::Signup)),
            ]
            .spacing(8)
            .align_y(iced::Alignment::Center)
            .into(),
        }
    }

    pub fn view_section_header<'a>(&'a self, title: &str) -> Element<'a, Message> {
        text(title.to_string())
            .size(24)
            .color(TEXT_PRIMARY)
            .font(iced::Font {
                weight: iced::font::Weight::Bold,
                ..Default::default()
            })
            .into()
    }

    pub fn view_loading<'a>(&'a self, label: &str) -> Element<'a, Message> {
        let skeleton_cards: Vec<Element<Message>> = (0..6)
            .map(|_| {
                container(Space::new().width(150.0).height(225.0))
                    .style(skeleton_style(8.0))
                    .into()
            })
            .collect();

        column![
            text(label.to_string()).size(16).color(TEXT_MUTED),
            container(Space::new().width(220.0).height(24.0)).style(skeleton_style(4.0)),
            Row::with_children(skeleton_cards).spacing(16),
        ]
        .spacing(24)
        .padding(Padding::new(32.0).left(48.0).right(48.0))
        .width(Length::Fill)
        .into()
    }

    pub fn view_not_found<'a>(&'a self, message: &str) -> Element<'a, Message> {
        let home_button = button(text("Return to Home").size(16).color(Color::BLACK))
            .padding(Padding::new(12.0).left(24.0).right(24.0))
            .style(|_theme, _status| button::Style {
                background: Some(iced::Background::Color(ACCENT_GOLD)),
                text_color: Color::BLACK,
                border: Border {
                    color: Color::TRANSPARENT,
                    width: 0.0,
                    radius: 4.0.into(),
                },
                shadow: Shadow::default(),
                snap: false,
            })
            .on_press(Message::Navigate(Route::Home));

        container(
            column![
                icon(ICON_FILM).size(64).color(ACCENT_GOLD),
                text(message.to_string()).size(28).color(TEXT_PRIMARY),
                text("This page seems to have vanished into the void...")
                    .size(16)
                    .color(TEXT_MUTED),
                home_button,
            ]
            .spacing(16)
            .align_x(iced::Alignment::Center),
        )
        .width(Length::Fill)
        .padding(Padding::new(96.0))
        .center_x(Length::Fill)
        .into()
    }

    pub fn view_main_content(&self) -> Element<'_, Message> {
        let page: Element<Message> = match &self.page {
            ActivePage::Home(home) => self.view_home_page(home),
            ActivePage::Detail(detail) => self.view_detail_page(detail),
            ActivePage::Actor(actor) => self.view_actor_page(actor),
            ActivePage::Search(search) => self.view_search_page(search),
            ActivePage::Profile(profile) => self.view_profile_page(profile),
            ActivePage::Login(form) => self.view_login_page(form),
            ActivePage::NotFound(_) => self.view_not_found("404 - Page not found"),
        };

        let body = scrollable(
            column![Space::new().height(NAV_HEIGHT), page].width(Length::Fill),
        )
        .id(iced::widget::Id::new(MAIN_SCROLL_ID))
        .direction(scrollable::Direction::Vertical(
            scrollable::Scrollbar::new().width(0).scroller_width(0),
        ))
        .width(Length::Fill)
        .height(Length::Fill)
        .style(hidden_vertical_scrollbar_style);

        let mut layers = iced::widget::stack![body, self.view_nav_bar()]
            .width(Length::Fill)
            .height(Length::Fill);

        if let ActivePage::Detail(detail) = &self.page {
            if let Some(dialog) = detail.rating_dialog() {
                layers = layers.push(dialog.view().map(Message::Rating));
            }
        }

        layers.into()
    }
}
