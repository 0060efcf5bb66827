mod actor;
mod cards;
mod carousel;
mod components;
mod detail;
mod error;
mod handlers;
mod home;
mod login;
mod media;
mod normalize;
mod page;
mod profile;
mod rating;
mod route;
mod search;
mod session;
mod settings;
mod tmdb;

use std::sync::Arc;

use iced::widget::container;
use iced::{Element, Font, Length, Size, Task, Theme};
use tracing::info;
use tracing_subscriber::EnvFilter;

use actor::ActorController;
use carousel::Carousels;
use detail::DetailController;
use home::HomeController;
use login::LoginForm;
use media::{ImageStore, Message, BACKGROUND};
use profile::ProfileController;
use route::Route;
use search::{SearchController, SearchScope};
use session::Session;
use settings::{AppSettings, SetupPage};
use tmdb::{CatalogApi, TmdbClient};

/// The page currently mounted. Each variant owns its controller, so leaving a
/// page drops its state and any result still in flight for it.
#[derive(Debug)]
pub enum ActivePage {
    Home(HomeController),
    Detail(DetailController),
    Actor(ActorController),
    Search(SearchController),
    Profile(ProfileController),
    Login(LoginForm),
    NotFound(String),
}

impl Default for ActivePage {
    fn default() -> Self {
        ActivePage::Home(HomeController::default())
    }
}

#[derive(Default)]
pub struct Cinescope {
    pub setup_page: Option<SetupPage>,
    pub catalog: Option<Arc<dyn CatalogApi>>,
    pub session: Session,
    pub route: Route,
    pub page: ActivePage,
    pub search_input: String,
    pub search_scope: SearchScope,
    pub image_store: ImageStore,
    pub carousels: Carousels,
}

impl Cinescope {
    fn new() -> (Self, Task<Message>) {
        let start = std::env::args()
            .nth(1)
            .map(|path| Route::parse(&path))
            .unwrap_or_default();

        let Some(settings) = AppSettings::load() else {
            info!("no TMDB API key configured, showing setup");
            return (
                Self {
                    setup_page: Some(SetupPage::default()),
                    route: start,
                    ..Default::default()
                },
                Task::none(),
            );
        };

        let mut app = Self {
            route: start,
            ..Default::default()
        };
        let task = app.initialize_with_settings(settings);
        (app, task)
    }

    fn initialize_with_settings(&mut self, settings: AppSettings) -> Task<Message> {
        info!(language = %settings.language, "catalog ready");
        let client: Arc<dyn CatalogApi> = Arc::new(TmdbClient::from_settings(&settings));
        self.catalog = Some(client);
        self.setup_page = None;
        let start = self.route.clone();
        handlers::navigate(self, start)
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        if let Message::Setup(setup_msg) = message {
            if let Some(ref mut setup) = self.setup_page {
                if let Some(settings) = setup.update(setup_msg) {
                    return self.initialize_with_settings(settings);
                }
            }
            return Task::none();
        }
        handlers::handle_message(self, message)
    }

    fn view(&self) -> Element<'_, Message> {
        if let Some(ref setup) = self.setup_page {
            return setup.view().map(Message::Setup);
        }

        container(self.view_main_content())
            .width(Length::Fill)
            .height(Length::Fill)
            .style(|_theme| container::Style {
                background: Some(iced::Background::Color(BACKGROUND)),
                ..Default::default()
            })
            .into()
    }

    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,wgpu=warn,iced=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

fn main() -> iced::Result {
    init_tracing();

    iced::application(Cinescope::new, Cinescope::update, Cinescope::view)
        .title("Cinescope")
        .theme(Cinescope::theme)
        .window_size(Size::new(1280.0, 720.0))
        .font(iced_fonts::BOOTSTRAP_FONT_BYTES)
        .default_font(Font::DEFAULT)
        .run()
}
