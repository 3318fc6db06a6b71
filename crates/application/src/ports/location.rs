//! Location port.
//!
//! The navigable location is captured once at startup and read through
//! this port; after a magic-link callback is processed, the callback
//! parameters are removed from the visible address without keeping the
//! old one around.

use sesame_domain::CallbackParams;
use url::Url;

/// The visible location of the application.
pub trait Location: Send + Sync {
    /// The location captured at startup, if the application was
    /// activated with one.
    fn current(&self) -> Option<Url>;

    /// Replaces the visible location, discarding the previous value.
    fn replace(&self, url: Url);

    /// Removes any magic-link callback parameters from the visible
    /// location, leaving unrelated parameters in place.
    fn clear_callback(&self) {
        if let Some(url) = self.current() {
            self.replace(CallbackParams::stripped(&url));
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct FakeLocation {
        url: Mutex<Option<Url>>,
    }

    impl Location for FakeLocation {
        fn current(&self) -> Option<Url> {
            self.url.lock().unwrap().clone()
        }

        fn replace(&self, url: Url) {
            *self.url.lock().unwrap() = Some(url);
        }
    }

    #[test]
    fn test_clear_callback_strips_params() {
        let location = FakeLocation {
            url: Mutex::new(Some(
                Url::parse("sesame://auth/callback?token_hash=abc&type=email").unwrap(),
            )),
        };

        location.clear_callback();

        let current = location.current().unwrap();
        assert_eq!(current.query(), None);
    }

    #[test]
    fn test_clear_callback_without_location_is_noop() {
        let location = FakeLocation {
            url: Mutex::new(None),
        };
        location.clear_callback();
        assert!(location.current().is_none());
    }
}
