use std::time::Duration;

use iced::widget::scrollable::AbsoluteOffset;
use iced::Task;
use tracing::{debug, info, warn};

use crate::actor::{fetch_actor, ActorController, ActorPage};
use crate::carousel::CarouselId;
use crate::cards::media_image_urls;
use crate::components::MAIN_SCROLL_ID;
use crate::detail::{fetch_detail, DetailController, DetailKind, DetailPage};
use crate::error::ApiError;
use crate::home::{fetch_home, HomeController, HomeFeed};
use crate::login::{simulate_sign_in, AuthMode, Credentials, LoginForm, LoginMessage};
use crate::media::{MediaId, MediaSummary, Message, ScrollDirection};
use crate::page::Generation;
use crate::profile::{fetch_recommendations, ProfileController};
use crate::rating::RatingMessage;
use crate::route::Route;
use crate::search::{fetch_search, SearchBuckets, SearchController, SearchQuery, SearchScope};
use crate::tmdb::fetch_image_bytes;
use crate::{ActivePage, Cinescope};

const FRAME: Duration = Duration::from_millis(16);

pub fn handle_message(app: &mut Cinescope, message: Message) -> Task<Message> {
    match message {
        Message::Setup(_) => Task::none(),
        Message::Navigate(route) => navigate(app, route),
        Message::SearchInputChanged(input) => {
            app.search_input = input;
            Task::none()
        }
        Message::SearchScopeChanged(scope) => handle_search_scope_changed(app, scope),
        Message::SearchSubmit => handle_search_submit(app),
        Message::SignOut => handle_sign_out(app),
        Message::HomeLoaded(generation, feed) => handle_home_loaded(app, generation, feed),
        Message::DetailLoaded(generation, result) => handle_detail_loaded(app, generation, result),
        Message::ActorLoaded(generation, result) => handle_actor_loaded(app, generation, result),
        Message::SearchLoaded(generation, buckets) => {
            handle_search_loaded(app, generation, buckets)
        }
        Message::RefreshRecommendations => handle_refresh_recommendations(app),
        Message::RecommendationsLoaded(generation, result) => {
            handle_recommendations_loaded(app, generation, result)
        }
        Message::OpenRatingDialog => {
            if let ActivePage::Detail(detail) = &mut app.page {
                detail.open_rating_dialog();
            }
            Task::none()
        }
        Message::Rating(rating_msg) => handle_rating(app, rating_msg),
        Message::Login(login_msg) => handle_login(app, login_msg),
        Message::LoginCompleted(credentials) => handle_login_completed(app, credentials),
        Message::LoadImage(url) => handle_load_image(app, url),
        Message::ImageLoaded(url, result) => {
            match result {
                Ok(handle) => app.image_store.insert(url, handle),
                Err(error) => {
                    debug!(%url, %error, "image failed to load");
                    app.image_store.fail(&url);
                }
            }
            Task::none()
        }
        Message::ScrollCarousel(id, direction) => handle_scroll_carousel(app, id, direction),
        Message::CarouselScrolled(id, offset, max_offset) => {
            app.carousels.get_mut(id).viewport_changed(offset, max_offset);
            Task::none()
        }
        Message::AnimateCarousel(id) => handle_animate_carousel(app, id),
    }
}

/// Mounts the page for `route` and starts its load. Every call begins a fresh
/// generation, so results for whatever was shown before are discarded.
pub fn navigate(app: &mut Cinescope, route: Route) -> Task<Message> {
    let route = route.guard(&app.session);
    info!(path = %route.path(), "navigate");

    app.route = route.clone();
    app.carousels.reset();

    let load = match route {
        Route::Home => open_home(app),
        Route::Movie(id) => open_detail(app, DetailKind::Movie, id),
        Route::Tv(id) => open_detail(app, DetailKind::Tv, id),
        Route::Actor(id) => open_actor(app, id),
        Route::Search(query) => open_search(app, query),
        Route::Profile => open_profile(app),
        Route::Login => {
            app.page = ActivePage::Login(LoginForm::new(AuthMode::Login));
            Task::none()
        }
        Route::Signup => {
            app.page = ActivePage::Login(LoginForm::new(AuthMode::Signup));
            Task::none()
        }
        Route::NotFound(path) => {
            warn!(%path, "no page for path");
            app.page = ActivePage::NotFound(path);
            Task::none()
        }
    };

    let to_top = iced::widget::operation::scroll_to(
        iced::widget::Id::new(MAIN_SCROLL_ID),
        AbsoluteOffset { x: 0.0, y: 0.0 },
    );
    Task::batch([to_top, load])
}

fn open_home(app: &mut Cinescope) -> Task<Message> {
    let mut home = HomeController::default();
    let generation = home.begin();
    app.page = ActivePage::Home(home);

    let Some(catalog) = app.catalog.clone() else {
        return Task::none();
    };
    Task::perform(fetch_home(catalog), move |feed| {
        Message::HomeLoaded(generation, feed)
    })
}

fn open_detail(app: &mut Cinescope, kind: DetailKind, id: MediaId) -> Task<Message> {
    if !matches!(&app.page, ActivePage::Detail(detail) if detail.kind() == kind) {
        app.page = ActivePage::Detail(DetailController::new(kind));
    }
    let ActivePage::Detail(detail) = &mut app.page else {
        return Task::none();
    };
    let generation = detail.begin(id);

    let Some(catalog) = app.catalog.clone() else {
        return Task::none();
    };
    debug!(id, ?kind, "loading detail");
    Task::perform(fetch_detail(catalog, kind, id), move |result| {
        Message::DetailLoaded(generation, result)
    })
}

fn open_actor(app: &mut Cinescope, id: MediaId) -> Task<Message> {
    let mut actor = ActorController::default();
    let generation = actor.begin(id);
    app.page = ActivePage::Actor(actor);

    let Some(catalog) = app.catalog.clone() else {
        return Task::none();
    };
    debug!(id, "loading person");
    Task::perform(fetch_actor(catalog, id), move |result| {
        Message::ActorLoaded(generation, result)
    })
}

fn open_search(app: &mut Cinescope, query: SearchQuery) -> Task<Message> {
    app.search_input = query.text.clone();
    app.search_scope = query.scope;

    let text = query.text.clone();
    let mut search = SearchController::default();
    let generation = search.begin(query);
    app.page = ActivePage::Search(search);

    let (Some(generation), Some(catalog)) = (generation, app.catalog.clone()) else {
        return Task::none();
    };
    debug!(query = %text, "searching");
    Task::perform(fetch_search(catalog, text), move |buckets| {
        Message::SearchLoaded(generation, buckets)
    })
}

fn open_profile(app: &mut Cinescope) -> Task<Message> {
    app.page = ActivePage::Profile(ProfileController::default());
    handle_refresh_recommendations(app)
}

fn load_images(urls: Vec<String>) -> Task<Message> {
    Task::batch(
        urls.into_iter()
            .map(|url| Task::done(Message::LoadImage(url))),
    )
}

fn handle_home_loaded(app: &mut Cinescope, generation: Generation, feed: HomeFeed) -> Task<Message> {
    let ActivePage::Home(home) = &mut app.page else {
        debug!("home feed arrived after leaving home");
        return Task::none();
    };
    let urls = media_image_urls(feed.all());
    if !home.apply(generation, feed) {
        return Task::none();
    }
    load_images(urls)
}

fn handle_detail_loaded(
    app: &mut Cinescope,
    generation: Generation,
    result: Result<DetailPage, ApiError>,
) -> Task<Message> {
    let ActivePage::Detail(detail) = &mut app.page else {
        debug!("detail result arrived after leaving the page");
        return Task::none();
    };
    let urls = result
        .as_ref()
        .map(DetailPage::image_urls)
        .unwrap_or_default();
    if !detail.apply(generation, result) {
        return Task::none();
    }
    load_images(urls)
}

fn handle_actor_loaded(
    app: &mut Cinescope,
    generation: Generation,
    result: Result<ActorPage, ApiError>,
) -> Task<Message> {
    let ActivePage::Actor(actor) = &mut app.page else {
        debug!("person result arrived after leaving the page");
        return Task::none();
    };
    let urls = result
        .as_ref()
        .map(ActorPage::image_urls)
        .unwrap_or_default();
    if !actor.apply(generation, result) {
        return Task::none();
    }
    load_images(urls)
}

fn handle_search_loaded(
    app: &mut Cinescope,
    generation: Generation,
    buckets: SearchBuckets,
) -> Task<Message> {
    let ActivePage::Search(search) = &mut app.page else {
        debug!("search results arrived after leaving search");
        return Task::none();
    };
    let urls = buckets.image_urls();
    if !search.apply(generation, buckets) {
        return Task::none();
    }
    load_images(urls)
}

fn handle_search_scope_changed(app: &mut Cinescope, scope: SearchScope) -> Task<Message> {
    app.search_scope = scope;
    let ActivePage::Search(search) = &app.page else {
        return Task::none();
    };
    if search.query().scope == scope {
        return Task::none();
    }
    let query = SearchQuery {
        text: search.query().text.clone(),
        scope,
    };
    navigate(app, Route::Search(query))
}

fn handle_search_submit(app: &mut Cinescope) -> Task<Message> {
    let text = app.search_input.trim().to_string();
    if text.is_empty() {
        return Task::none();
    }
    let query = SearchQuery {
        text,
        scope: app.search_scope,
    };
    navigate(app, Route::Search(query))
}

fn handle_sign_out(app: &mut Cinescope) -> Task<Message> {
    app.session.sign_out();
    if app.route == Route::Profile {
        return navigate(app, Route::Home);
    }
    Task::none()
}

fn handle_refresh_recommendations(app: &mut Cinescope) -> Task<Message> {
    let ActivePage::Profile(profile) = &mut app.page else {
        return Task::none();
    };
    let Some(catalog) = app.catalog.clone() else {
        return Task::none();
    };
    let generation = profile.begin();
    debug!("loading recommendations");
    Task::perform(fetch_recommendations(catalog), move |result| {
        Message::RecommendationsLoaded(generation, result)
    })
}

fn handle_recommendations_loaded(
    app: &mut Cinescope,
    generation: Generation,
    result: Result<Vec<MediaSummary>, ApiError>,
) -> Task<Message> {
    let ActivePage::Profile(profile) = &mut app.page else {
        debug!("recommendations arrived after leaving the profile");
        return Task::none();
    };
    let urls = result
        .as_ref()
        .map(|list| media_image_urls(list))
        .unwrap_or_default();
    if !profile.apply(generation, result) {
        return Task::none();
    }
    load_images(urls)
}

fn handle_rating(app: &mut Cinescope, message: RatingMessage) -> Task<Message> {
    if let ActivePage::Detail(detail) = &mut app.page {
        detail.update_rating(message);
    }
    Task::none()
}

fn handle_login(app: &mut Cinescope, message: LoginMessage) -> Task<Message> {
    let ActivePage::Login(form) = &mut app.page else {
        return Task::none();
    };
    match form.update(message) {
        Some(credentials) => {
            debug!(email = %credentials.email, "signing in");
            Task::perform(simulate_sign_in(credentials), Message::LoginCompleted)
        }
        None => Task::none(),
    }
}

fn handle_login_completed(app: &mut Cinescope, credentials: Credentials) -> Task<Message> {
    if !matches!(&app.page, ActivePage::Login(form) if form.is_submitting()) {
        debug!("sign-in finished after leaving the form");
        return Task::none();
    }
    app.session.sign_in(&credentials);
    navigate(app, Route::Home)
}

fn handle_load_image(app: &mut Cinescope, url: String) -> Task<Message> {
    if !app.image_store.needs_fetch(&url) {
        return Task::none();
    }
    app.image_store.mark_pending(url.clone());

    Task::perform(
        async move {
            let bytes = fetch_image_bytes(url.clone()).await;
            (url, bytes)
        },
        |(url, result)| {
            Message::ImageLoaded(
                url,
                result.map(iced::widget::image::Handle::from_bytes),
            )
        },
    )
}

fn handle_scroll_carousel(
    app: &mut Cinescope,
    id: CarouselId,
    direction: ScrollDirection,
) -> Task<Message> {
    let row = app.carousels.get_mut(id);
    let already_moving = row.is_animating();
    row.page(direction);
    if already_moving {
        return Task::none();
    }
    Task::done(Message::AnimateCarousel(id))
}

fn handle_animate_carousel(app: &mut Cinescope, id: CarouselId) -> Task<Message> {
    let row = app.carousels.get_mut(id);
    let moving = row.step();
    let scroll = iced::widget::operation::scroll_to(
        id.widget_id(),
        AbsoluteOffset {
            x: row.offset(),
            y: 0.0,
        },
    );
    if !moving {
        return scroll;
    }
    Task::batch([
        scroll,
        Task::perform(async { tokio::time::sleep(FRAME).await }, move |_| {
            Message::AnimateCarousel(id)
        }),
    ])
}
