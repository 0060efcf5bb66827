use crate::media::MediaId;
use crate::search::{SearchQuery, SearchScope};
use crate::session::Session;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Route {
    #[default]
    Home,
    Movie(MediaId),
    Tv(MediaId),
    Actor(MediaId),
    Search(SearchQuery),
    Login,
    Signup,
    Profile,
    NotFound(String),
}

impl Route {
    /// Parses an app path such as `/movie/550` or `/search?q=heat&type=movie`.
    pub fn parse(path: &str) -> Self {
        let (path_part, query) = match path.split_once('?') {
            Some((p, q)) => (p, Some(q)),
            None => (path, None),
        };
        let segments: Vec<&str> = path_part.split('/').filter(|s| !s.is_empty()).collect();

        let route = match segments.as_slice() {
            [] => Some(Route::Home),
            ["movie", id] => id.parse().ok().map(Route::Movie),
            ["tv", id] => id.parse().ok().map(Route::Tv),
            ["actor", id] => id.parse().ok().map(Route::Actor),
            ["search"] => Some(Route::Search(parse_search_query(query.unwrap_or_default()))),
            ["login"] => Some(Route::Login),
            ["signup"] => Some(Route::Signup),
            ["profile"] => Some(Route::Profile),
            _ => None,
        };
        route.unwrap_or_else(|| Route::NotFound(path.to_string()))
    }

    /// Pages that need a signed-in user send everyone else to the login form.
    pub fn guard(self, session: &Session) -> Self {
        match self {
            Route::Profile if !session.is_authenticated() => Route::Login,
            other => other,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Home => String::from("/"),
            Route::Movie(id) => format!("/movie/{}", id),
            Route::Tv(id) => format!("/tv/{}", id),
            Route::Actor(id) => format!("/actor/{}", id),
            Route::Search(query) => format!(
                "/search?q={}&type={}",
                urlencoding::encode(&query.text),
                query.scope.as_param()
            ),
            Route::Login => String::from("/login"),
            Route::Signup => String::from("/signup"),
            Route::Profile => String::from("/profile"),
            Route::NotFound(path) => path.clone(),
        }
    }
}

fn parse_search_query(query: &str) -> SearchQuery {
    let mut text = String::new();
    let mut scope = SearchScope::All;
    for pair in query.split('&') {
        let Some((key, value)) = pair.split_once('=') else {
            continue;
        };
        let value = value.replace('+', " ");
        let value = urlencoding::decode(&value)
            .map(|v| v.into_owned())
            .unwrap_or(value);
        match key {
            "q" => text = value,
            "type" => scope = SearchScope::from_param(&value),
            _ => {}
        }
    }
    SearchQuery { text, scope }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::login::Credentials;

    #[test]
    fn parses_known_paths() {
        assert_eq!(Route::parse("/"), Route::Home);
        assert_eq!(Route::parse(""), Route::Home);
        assert_eq!(Route::parse("/movie/550"), Route::Movie(550));
        assert_eq!(Route::parse("/tv/1399/"), Route::Tv(1399));
        assert_eq!(Route::parse("/actor/287"), Route::Actor(287));
        assert_eq!(Route::parse("/login"), Route::Login);
        assert_eq!(Route::parse("/signup"), Route::Signup);
        assert_eq!(Route::parse("/profile"), Route::Profile);
    }

    #[test]
    fn search_path_decodes_query_and_scope() {
        assert_eq!(
            Route::parse("/search?q=the+dark%20knight&type=movie"),
            Route::Search(SearchQuery {
                text: String::from("the dark knight"),
                scope: SearchScope::Movies,
            })
        );
        assert_eq!(
            Route::parse("/search"),
            Route::Search(SearchQuery::default())
        );
    }

    #[test]
    fn unknown_paths_and_bad_ids_are_not_found() {
        assert_eq!(
            Route::parse("/movie/abc"),
            Route::NotFound(String::from("/movie/abc"))
        );
        assert_eq!(
            Route::parse("/collections/10"),
            Route::NotFound(String::from("/collections/10"))
        );
    }

    #[test]
    fn paths_parse_back_to_the_same_route() {
        let search = Route::Search(SearchQuery {
            text: String::from("tom & jerry"),
            scope: SearchScope::Tv,
        });
        assert_eq!(Route::parse(&search.path()), search);
        assert_eq!(Route::parse(&Route::Actor(5).path()), Route::Actor(5));
    }

    #[test]
    fn profile_requires_sign_in() {
        let mut session = Session::default();
        assert_eq!(Route::Profile.guard(&session), Route::Login);
        assert_eq!(Route::Movie(1).guard(&session), Route::Movie(1));

        session.sign_in(&Credentials {
            email: String::from("a@b.c"),
            name: None,
        });
        assert_eq!(Route::Profile.guard(&session), Route::Profile);
    }
}
