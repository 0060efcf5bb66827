use std::collections::{HashMap, HashSet};
use std::fmt;

use iced::widget::image::Handle;
use iced::Color;
use serde::Deserialize;

use crate::actor::ActorPage;
use crate::carousel::CarouselId;
use crate::detail::DetailPage;
use crate::error::ApiError;
use crate::home::HomeFeed;
use crate::login::{Credentials, LoginMessage};
use crate::page::Generation;
use crate::rating::RatingMessage;
use crate::route::Route;
use crate::search::{SearchBuckets, SearchScope};
use crate::settings::SetupMessage;

pub const BACKGROUND: Color = Color::from_rgb(0.039, 0.039, 0.059);
pub const SURFACE: Color = Color::from_rgb(0.094, 0.094, 0.122);
pub const ACCENT_GOLD: Color = Color::from_rgb(0.961, 0.773, 0.094);
pub const TEXT_PRIMARY: Color = Color::from_rgb(1.0, 1.0, 1.0);
pub const TEXT_MUTED: Color = Color::from_rgb(0.651, 0.651, 0.702);

pub type MediaId = u64;

/// Discriminator fixed once at normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Movie,
    Tv,
    Person,
}

impl MediaKind {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "movie" => Some(MediaKind::Movie),
            "tv" => Some(MediaKind::Tv),
            "person" => Some(MediaKind::Person),
            _ => None,
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            MediaKind::Movie => "movie",
            MediaKind::Tv => "tv",
            MediaKind::Person => "person",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag().to_uppercase())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Genre {
    pub id: u64,
    pub name: String,
}

/// One movie, series or person hit as rendered on a card.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaSummary {
    pub id: MediaId,
    pub title: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub profile_path: Option<String>,
    pub release_date: Option<String>,
    pub vote_average: f32,
    pub overview: String,
    pub kind: MediaKind,
    pub genre_ids: Vec<u64>,
}

impl MediaSummary {
    pub fn year(&self) -> Option<i32> {
        crate::normalize::display_year(self.release_date.as_deref(), None)
    }

    /// Where a click on this record leads.
    pub fn route(&self) -> Route {
        match self.kind {
            MediaKind::Movie => Route::Movie(self.id),
            MediaKind::Tv => Route::Tv(self.id),
            MediaKind::Person => Route::Actor(self.id),
        }
    }

    pub fn image_path(&self) -> Option<&str> {
        match self.kind {
            MediaKind::Person => self.profile_path.as_deref(),
            MediaKind::Movie | MediaKind::Tv => self.poster_path.as_deref(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PersonRole {
    Character(String),
    Department(String),
}

impl PersonRole {
    pub fn label(&self) -> &str {
        match self {
            PersonRole::Character(name) | PersonRole::Department(name) => name,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PersonSummary {
    pub id: MediaId,
    pub name: String,
    pub profile_path: Option<String>,
    pub role: Option<PersonRole>,
}

impl From<&MediaSummary> for PersonSummary {
    fn from(hit: &MediaSummary) -> Self {
        Self {
            id: hit.id,
            name: hit.title.clone(),
            profile_path: hit.profile_path.clone(),
            role: Some(PersonRole::Department(String::from("Acting"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MediaDetail {
    pub summary: MediaSummary,
    pub runtime: Option<u32>,
    pub number_of_seasons: Option<u32>,
    pub number_of_episodes: Option<u32>,
    pub last_air_date: Option<String>,
    pub genres: Vec<Genre>,
    pub status: Option<String>,
    pub tagline: Option<String>,
}

impl MediaDetail {
    pub fn is_ongoing(&self) -> bool {
        self.status.as_deref() != Some("Ended")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PersonDetail {
    pub id: MediaId,
    pub name: String,
    pub biography: String,
    pub profile_path: Option<String>,
    pub birthday: Option<String>,
    pub place_of_birth: Option<String>,
    pub known_for_department: Option<String>,
}

/// Decoded image handles for the posters currently on screen.
#[derive(Debug, Clone, Default)]
pub struct ImageStore {
    handles: HashMap<String, Handle>,
    pending: HashSet<String>,
}

impl ImageStore {
    pub fn get(&self, url: &str) -> Option<&Handle> {
        self.handles.get(url)
    }

    pub fn insert(&mut self, url: String, handle: Handle) {
        self.pending.remove(&url);
        self.handles.insert(url, handle);
    }

    pub fn fail(&mut self, url: &str) {
        self.pending.remove(url);
    }

    pub fn needs_fetch(&self, url: &str) -> bool {
        !self.handles.contains_key(url) && !self.pending.contains(url)
    }

    pub fn mark_pending(&mut self, url: String) {
        self.pending.insert(url);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    Left,
    Right,
}

#[derive(Debug, Clone)]
pub enum Message {
    Setup(SetupMessage),
    Navigate(Route),
    SearchInputChanged(String),
    SearchScopeChanged(SearchScope),
    SearchSubmit,
    SignOut,
    HomeLoaded(Generation, HomeFeed),
    DetailLoaded(Generation, Result<DetailPage, ApiError>),
    ActorLoaded(Generation, Result<ActorPage, ApiError>),
    SearchLoaded(Generation, SearchBuckets),
    RefreshRecommendations,
    RecommendationsLoaded(Generation, Result<Vec<MediaSummary>, ApiError>),
    OpenRatingDialog,
    Rating(RatingMessage),
    Login(LoginMessage),
    LoginCompleted(Credentials),
    LoadImage(String),
    ImageLoaded(String, Result<Handle, String>),
    ScrollCarousel(CarouselId, ScrollDirection),
    CarouselScrolled(CarouselId, f32, f32),
    AnimateCarousel(CarouselId),
}
