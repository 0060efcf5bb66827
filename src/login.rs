use std::time::Duration;

use iced::widget::{button, column, container, row, text, text_input, Space};
use iced::{Alignment, Border, Color, Element, Length, Padding, Shadow};

use crate::media::{Message, ACCENT_GOLD, SURFACE, TEXT_MUTED, TEXT_PRIMARY};
use crate::route::Route;
use crate::Cinescope;

/// How long the simulated sign-in takes.
pub const LOGIN_DELAY: Duration = Duration::from_secs(1);

const ICON_EYE: char = '\u{F341}';
const ICON_EYE_SLASH: char = '\u{F340}';
const ICON_FILM: char = '\u{F3A9}';

fn icon(icon_char: char) -> iced::widget::Text<'static> {
    text(icon_char.to_string()).font(iced::Font {
        family: iced::font::Family::Name("bootstrap-icons"),
        ..Default::default()
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Login,
    Signup,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoginMessage {
    EmailChanged(String),
    PasswordChanged(String),
    NameChanged(String),
    TogglePasswordVisibility,
    Submit,
}

/// What a submitted form hands to the session. The password never leaves the form.
#[derive(Debug, Clone, PartialEq)]
pub struct Credentials {
    pub email: String,
    pub name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct LoginForm {
    mode: AuthMode,
    email: String,
    password: String,
    name: String,
    show_password: bool,
    submitting: bool,
    error: Option<String>,
}

impl LoginForm {
    pub fn new(mode: AuthMode) -> Self {
        Self {
            mode,
            email: String::new(),
            password: String::new(),
            name: String::new(),
            show_password: false,
            submitting: false,
            error: None,
        }
    }

    pub fn mode(&self) -> AuthMode {
        self.mode
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Returns credentials once a submit passes validation. Further submits are
    /// ignored until the form is replaced.
    pub fn update(&mut self, message: LoginMessage) -> Option<Credentials> {
        match message {
            LoginMessage::EmailChanged(email) => {
                self.email = email;
                self.error = None;
                None
            }
            LoginMessage::PasswordChanged(password) => {
                self.password = password;
                self.error = None;
                None
            }
            LoginMessage::NameChanged(name) => {
                self.name = name;
                None
            }
            LoginMessage::TogglePasswordVisibility => {
                self.show_password = !self.show_password;
                None
            }
            LoginMessage::Submit => {
                if self.submitting {
                    return None;
                }
                if self.email.trim().is_empty() || self.password.is_empty() {
                    self.error = Some(String::from("Email and password are required"));
                    return None;
                }
                self.submitting = true;
                let name = match self.mode {
                    AuthMode::Signup => Some(self.name.trim().to_string()).filter(|n| !n.is_empty()),
                    AuthMode::Login => None,
                };
                Some(Credentials {
                    email: self.email.trim().to_string(),
                    name,
                })
            }
        }
    }
}

/// Stands in for an authentication round trip.
pub async fn simulate_sign_in(credentials: Credentials) -> Credentials {
    tokio::time::sleep(LOGIN_DELAY).await;
    credentials
}

fn field_label<'a>(caption: &'static str) -> Element<'a, Message> {
    text(caption).size(14).color(TEXT_PRIMARY).into()
}

impl Cinescope {
    pub fn view_login_page<'a>(&'a self, form: &'a LoginForm) -> Element<'a, Message> {
        let (heading, submit_label, busy_label) = match form.mode() {
            AuthMode::Login => ("Welcome Back", "Sign In", "Signing In..."),
            AuthMode::Signup => ("Create Account", "Sign Up", "Creating Account..."),
        };

        let logo = row![
            icon(ICON_FILM).size(32).color(ACCENT_GOLD),
            text("CINESCOPE")
                .size(32)
                .color(ACCENT_GOLD)
                .font(iced::Font {
                    weight: iced::font::Weight::Bold,
                    ..Default::default()
                }),
        ]
        .spacing(12)
        .align_y(Alignment::Center);

        let title = text(heading).size(24).color(TEXT_PRIMARY);

        let spacer = || Space::new().height(16);
        let small_spacer = || Space::new().height(6);

        let email_input = text_input("Enter your email", &form.email)
            .on_input(|v| Message::Login(LoginMessage::EmailChanged(v)))
            .on_submit(Message::Login(LoginMessage::Submit))
            .padding(12)
            .size(14)
            .width(Length::Fill);

        let password_input = text_input("Enter your password", &form.password)
            .on_input(|v| Message::Login(LoginMessage::PasswordChanged(v)))
            .on_submit(Message::Login(LoginMessage::Submit))
            .secure(!form.show_password)
            .padding(12)
            .size(14)
            .width(Length::Fill);

        let eye = if form.show_password {
            ICON_EYE_SLASH
        } else {
            ICON_EYE
        };
        let toggle = button(icon(eye).size(16).color(TEXT_MUTED))
            .padding(10)
            .style(|_theme, _status| button::Style {
                background: None,
                text_color: TEXT_MUTED,
                border: Border::default(),
                shadow: Shadow::default(),
                snap: false,
            })
            .on_press(Message::Login(LoginMessage::TogglePasswordVisibility));

        let mut fields = column![field_label("Email"), small_spacer(), email_input, spacer()];
        if form.mode() == AuthMode::Signup {
            fields = fields.push(field_label("Name"));
            fields = fields.push(small_spacer());
            fields = fields.push(
                text_input("How should we call you?", &form.name)
                    .on_input(|v| Message::Login(LoginMessage::NameChanged(v)))
                    .on_submit(Message::Login(LoginMessage::Submit))
                    .padding(12)
                    .size(14)
                    .width(Length::Fill),
            );
            fields = fields.push(spacer());
        }
        fields = fields
            .push(field_label("Password"))
            .push(small_spacer())
            .push(
                row![password_input, toggle]
                    .spacing(4)
                    .align_y(Alignment::Center),
            );

        let error_text = match form.error() {
            Some(err) => text(err.to_string())
                .size(13)
                .color(Color::from_rgb(0.9, 0.3, 0.3)),
            None => text("").size(13),
        };

        let submit = button(
            container(
                text(if form.is_submitting() {
                    busy_label
                } else {
                    submit_label
                })
                .size(16)
                .color(Color::BLACK),
            )
            .center_x(Length::Fill),
        )
        .width(Length::Fill)
        .padding([12, 32])
        .style(|_theme, status| {
            let bg = match status {
                button::Status::Disabled => Color::from_rgba(0.961, 0.773, 0.094, 0.4),
                button::Status::Hovered => Color::from_rgb(1.0, 0.84, 0.2),
                _ => ACCENT_GOLD,
            };
            button::Style {
                background: Some(iced::Background::Color(bg)),
                text_color: Color::BLACK,
                border: Border::default().rounded(4),
                ..Default::default()
            }
        })
        .on_press_maybe((!form.is_submitting()).then_some(Message::Login(LoginMessage::Submit)));

        let (switch_prompt, switch_label, switch_route) = match form.mode() {
            AuthMode::Login => ("Don't have an account?", "Sign up", Route::Signup),
            AuthMode::Signup => ("Already have an account?", "Sign in", Route::Login),
        };
        let switch = row![
            text(switch_prompt).size(13).color(TEXT_MUTED),
            button(text(switch_label).size(13).color(ACCENT_GOLD))
                .padding(0)
                .style(|_theme, _status| button::Style {
                    background: None,
                    text_color: ACCENT_GOLD,
                    border: Border::default(),
                    shadow: Shadow::default(),
                    snap: false,
                })
                .on_press(Message::Navigate(switch_route)),
        ]
        .spacing(6)
        .align_y(Alignment::Center);

        let card = container(
            column![
                title,
                spacer(),
                fields,
                small_spacer(),
                error_text,
                small_spacer(),
                submit,
                spacer(),
                switch,
            ]
            .align_x(Alignment::Start),
        )
        .width(Length::Fixed(400.0))
        .padding(Padding::new(32.0))
        .style(|_theme| container::Style {
            background: Some(iced::Background::Color(SURFACE)),
            border: Border {
                color: Color::from_rgba(1.0, 1.0, 1.0, 0.08),
                width: 1.0,
                radius: 12.0.into(),
            },
            ..Default::default()
        });

        let demo_note = text("Demo mode: any email and password will sign you in")
            .size(12)
            .color(TEXT_MUTED);

        container(
            column![logo, card, demo_note]
                .spacing(24)
                .align_x(Alignment::Center),
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

    fn filled(mode: AuthMode) -> LoginForm {
        let mut form = LoginForm::new(mode);
        form.update(LoginMessage::EmailChanged(String::from(" jane@example.com ")));
        form.update(LoginMessage::PasswordChanged(String::from("hunter2")));
        form
    }

    #[test]
    fn empty_fields_show_an_error() {
        let mut form = LoginForm::new(AuthMode::Login);
        assert_eq!(form.update(LoginMessage::Submit), None);
        assert!(form.error().is_some());
        assert!(!form.is_submitting());

        form.update(LoginMessage::EmailChanged(String::from("a@b.c")));
        assert!(form.error().is_none());
    }

    #[test]
    fn valid_submit_yields_credentials_once() {
        let mut form = filled(AuthMode::Login);
        assert_eq!(
            form.update(LoginMessage::Submit),
            Some(Credentials {
                email: String::from("jane@example.com"),
                name: None,
            })
        );
        assert!(form.is_submitting());
        assert_eq!(form.update(LoginMessage::Submit), None);
    }

    #[test]
    fn sign_up_passes_the_display_name() {
        let mut form = filled(AuthMode::Signup);
        form.update(LoginMessage::NameChanged(String::from("Jane")));
        let credentials = form.update(LoginMessage::Submit).expect("credentials");
        assert_eq!(credentials.name.as_deref(), Some("Jane"));

        let mut unnamed = filled(AuthMode::Signup);
        let credentials = unnamed.update(LoginMessage::Submit).expect("credentials");
        assert_eq!(credentials.name, None);
    }

    #[test]
    fn password_visibility_toggles() {
        let mut form = LoginForm::new(AuthMode::Login);
        assert!(!form.show_password);
        form.update(LoginMessage::TogglePasswordVisibility);
        assert!(form.show_password);
    }

    #[tokio::test(start_paused = true)]
    async fn simulated_sign_in_takes_the_login_delay() {
        let started = tokio::time::Instant::now();
        let credentials = Credentials {
            email: String::from("a@b.c"),
            name: None,
        };
        let signed_in = simulate_sign_in(credentials.clone()).await;
        assert_eq!(signed_in, credentials);
        assert!(started.elapsed() >= LOGIN_DELAY);
    }
}
