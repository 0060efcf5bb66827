use std::sync::atomic::{AtomicU64, Ordering};

use tracing::warn;

use crate::error::ApiError;

static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

/// Identifies one load. Unique for the life of the process, so a result can
/// never be mistaken for a newer load even across remounted controllers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Generation(u64);

impl Generation {
    fn next() -> Self {
        Self(NEXT_GENERATION.fetch_add(1, Ordering::Relaxed))
    }
}

/// Rejects results from loads that have been superseded.
#[derive(Debug, Default)]
pub struct LoadGuard {
    current: Option<Generation>,
}

impl LoadGuard {
    pub fn begin(&mut self) -> Generation {
        let generation = Generation::next();
        self.current = Some(generation);
        generation
    }

    pub fn is_current(&self, generation: Generation) -> bool {
        self.current == Some(generation)
    }

    /// True exactly once, for the latest load.
    pub fn accept(&mut self, generation: Generation) -> bool {
        if self.is_current(generation) {
            self.current = None;
            true
        } else {
            false
        }
    }

    pub fn in_flight(&self) -> bool {
        self.current.is_some()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PageState<T> {
    Loading,
    Ready(T),
    NotFound,
}

impl<T> Default for PageState<T> {
    fn default() -> Self {
        PageState::Loading
    }
}

impl<T> PageState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, PageState::Loading)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            PageState::Ready(data) => Some(data),
            _ => None,
        }
    }

    /// Primary fetches settle into `Ready` or, on any failure, `NotFound`.
    pub fn settle(result: Result<T, ApiError>, what: &str) -> Self {
        match result {
            Ok(data) => PageState::Ready(data),
            Err(error) => {
                warn!(%error, network = error.is_network(), "{} unavailable", what);
                PageState::NotFound
            }
        }
    }
}

/// Secondary sections degrade to empty instead of failing the page.
pub fn or_empty<T: Default>(result: Result<T, ApiError>, section: &str) -> T {
    result.unwrap_or_else(|error| {
        warn!(%error, "{} failed to load, showing it empty", section);
        T::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_latest_generation_is_accepted_once() {
        let mut guard = LoadGuard::default();
        let first = guard.begin();
        let second = guard.begin();
        assert_ne!(first, second);
        assert!(!guard.accept(first));
        assert!(guard.in_flight());
        assert!(guard.accept(second));
        assert!(!guard.accept(second));
        assert!(!guard.in_flight());
    }

    #[test]
    fn generations_are_unique_across_guards() {
        let mut a = LoadGuard::default();
        let mut b = LoadGuard::default();
        let from_a = a.begin();
        let from_b = b.begin();
        assert!(!b.is_current(from_a));
        assert!(!a.is_current(from_b));
    }

    #[test]
    fn settle_maps_errors_to_not_found() {
        let ready: PageState<u32> = PageState::settle(Ok(3), "thing");
        assert_eq!(ready.ready(), Some(&3));
        let missing: PageState<u32> = PageState::settle(Err(ApiError::Status(500)), "thing");
        assert_eq!(missing, PageState::NotFound);
        assert!(PageState::<u32>::default().is_loading());
    }

    #[test]
    fn failed_sections_become_empty() {
        let cast: Vec<u32> = or_empty(Err(ApiError::Network(String::from("reset"))), "cast");
        assert!(cast.is_empty());
        assert_eq!(or_empty(Ok(vec![1, 2]), "cast"), vec![1, 2]);
    }
}
