//! Launch location adapter.
//!
//! Desktop magic links come back to the application as a deep-link
//! activation URL. The adapter captures that URL once at startup and
//! lets the application rewrite it, mirroring a browser's
//! replace-without-history behavior.

use std::sync::{Mutex, PoisonError};

use sesame_application::Location;
use url::Url;

/// The visible location, seeded from the activation argument.
#[derive(Debug, Default)]
pub struct LaunchLocation {
    url: Mutex<Option<Url>>,
}

impl LaunchLocation {
    /// Creates a location from an already-parsed URL.
    #[must_use]
    pub const fn new(url: Option<Url>) -> Self {
        Self {
            url: Mutex::new(url),
        }
    }

    /// Captures the activation URL from the process arguments, taking
    /// the first argument that parses as a URL.
    pub fn from_args(args: impl IntoIterator<Item = String>) -> Self {
        let url = args
            .into_iter()
            .find_map(|arg| Url::parse(&arg).ok());
        Self::new(url)
    }
}

impl Location for LaunchLocation {
    fn current(&self) -> Option<Url> {
        self.url
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn replace(&self, url: Url) {
        *self.url.lock().unwrap_or_else(PoisonError::into_inner) = Some(url);
    }
}
