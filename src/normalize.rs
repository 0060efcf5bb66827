//! Maps provider payloads onto the display records in [`crate::media`].
//!
//! Titles, years and media kinds are resolved here once so that views and
//! controllers never look at raw field presence again.

use std::cmp::Ordering;

use chrono::{Datelike, NaiveDate};

use crate::media::{
    MediaDetail, MediaKind, MediaSummary, PersonDetail, PersonRole, PersonSummary,
};
use crate::search::SearchBuckets;
use crate::tmdb::{
    TmdbCastCredit, TmdbMediaResult, TmdbMovieDetails, TmdbPersonDetails, TmdbTvDetails,
};

pub const UNKNOWN_TITLE: &str = "Unknown Title";
pub const KNOWN_FOR_LIMIT: usize = 20;

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

pub fn display_title(title: Option<String>, name: Option<String>) -> String {
    non_empty(title)
        .or_else(|| non_empty(name))
        .unwrap_or_else(|| String::from(UNKNOWN_TITLE))
}

fn parse_date(date: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}

/// Year of the release date, falling back to the first air date.
pub fn display_year(release_date: Option<&str>, first_air_date: Option<&str>) -> Option<i32> {
    [release_date, first_air_date]
        .into_iter()
        .flatten()
        .find(|d| !d.is_empty())
        .and_then(|d| {
            parse_date(d)
                .map(|date| date.year())
                .or_else(|| d.get(..4)?.parse().ok())
        })
}

/// An explicit tag wins; otherwise a title field means movie and anything else is TV.
pub fn infer_kind(media_type: Option<&str>, has_title: bool) -> MediaKind {
    match media_type.and_then(MediaKind::from_tag) {
        Some(kind) => kind,
        None if has_title => MediaKind::Movie,
        None => MediaKind::Tv,
    }
}

impl From<TmdbMediaResult> for MediaSummary {
    fn from(result: TmdbMediaResult) -> Self {
        let kind = infer_kind(result.media_type.as_deref(), result.title.is_some());
        let release_date = non_empty(result.release_date).or(non_empty(result.first_air_date));
        Self {
            id: result.id,
            title: display_title(result.title, result.name),
            poster_path: non_empty(result.poster_path),
            backdrop_path: non_empty(result.backdrop_path),
            profile_path: non_empty(result.profile_path),
            release_date,
            vote_average: result.vote_average.unwrap_or_default(),
            overview: result.overview.unwrap_or_default(),
            kind,
            genre_ids: result.genre_ids,
        }
    }
}

impl From<TmdbCastCredit> for PersonSummary {
    fn from(credit: TmdbCastCredit) -> Self {
        let role = non_empty(credit.character)
            .map(PersonRole::Character)
            .or_else(|| non_empty(credit.known_for_department).map(PersonRole::Department));
        Self {
            id: credit.id,
            name: credit.name.unwrap_or_default(),
            profile_path: non_empty(credit.profile_path),
            role,
        }
    }
}

impl From<TmdbMovieDetails> for MediaDetail {
    fn from(movie: TmdbMovieDetails) -> Self {
        Self {
            summary: MediaSummary {
                id: movie.id,
                title: display_title(movie.title, None),
                poster_path: non_empty(movie.poster_path),
                backdrop_path: non_empty(movie.backdrop_path),
                profile_path: None,
                release_date: non_empty(movie.release_date),
                vote_average: movie.vote_average.unwrap_or_default(),
                overview: movie.overview.unwrap_or_default(),
                kind: MediaKind::Movie,
                genre_ids: movie.genres.iter().map(|g| g.id).collect(),
            },
            runtime: movie.runtime,
            number_of_seasons: None,
            number_of_episodes: None,
            last_air_date: None,
            genres: movie.genres,
            status: non_empty(movie.status),
            tagline: non_empty(movie.tagline),
        }
    }
}

impl From<TmdbTvDetails> for MediaDetail {
    fn from(show: TmdbTvDetails) -> Self {
        Self {
            summary: MediaSummary {
                id: show.id,
                title: display_title(None, show.name),
                poster_path: non_empty(show.poster_path),
                backdrop_path: non_empty(show.backdrop_path),
                profile_path: None,
                release_date: non_empty(show.first_air_date),
                vote_average: show.vote_average.unwrap_or_default(),
                overview: show.overview.unwrap_or_default(),
                kind: MediaKind::Tv,
                genre_ids: show.genres.iter().map(|g| g.id).collect(),
            },
            runtime: None,
            number_of_seasons: show.number_of_seasons,
            number_of_episodes: show.number_of_episodes,
            last_air_date: non_empty(show.last_air_date),
            genres: show.genres,
            status: non_empty(show.status),
            tagline: non_empty(show.tagline),
        }
    }
}

impl From<TmdbPersonDetails> for PersonDetail {
    fn from(person: TmdbPersonDetails) -> Self {
        Self {
            id: person.id,
            name: person.name.unwrap_or_default(),
            biography: person.biography.unwrap_or_default(),
            profile_path: non_empty(person.profile_path),
            birthday: non_empty(person.birthday),
            place_of_birth: non_empty(person.place_of_birth),
            known_for_department: non_empty(person.known_for_department),
        }
    }
}

/// Highest-rated credits first, ties kept in credit order, at most [`KNOWN_FOR_LIMIT`].
pub fn known_for(mut credits: Vec<MediaSummary>) -> Vec<MediaSummary> {
    credits.sort_by(|a, b| {
        b.vote_average
            .partial_cmp(&a.vote_average)
            .unwrap_or(Ordering::Equal)
    });
    credits.truncate(KNOWN_FOR_LIMIT);
    credits
}

pub fn partition_by_kind(results: Vec<MediaSummary>) -> SearchBuckets {
    let mut buckets = SearchBuckets::default();
    for item in results {
        match item.kind {
            MediaKind::Movie => buckets.movies.push(item),
            MediaKind::Tv => buckets.tv.push(item),
            MediaKind::Person => buckets.people.push(item),
        }
    }
    buckets
}

pub fn format_runtime(minutes: u32) -> String {
    format!("{}h {}m", minutes / 60, minutes % 60)
}

pub fn format_birthday(date: &str) -> Option<String> {
    parse_date(date).map(|d| d.format("%B %-d, %Y").to_string())
}

pub fn biography_paragraphs(biography: &str) -> Vec<&str> {
    biography
        .split('\n')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect()
}

pub fn season_label(count: u32) -> String {
    if count == 1 {
        String::from("1 Season")
    } else {
        format!("{} Seasons", count)
    }
}

pub fn rating_label(vote_average: f32) -> String {
    format!("{:.1}", vote_average)
}
