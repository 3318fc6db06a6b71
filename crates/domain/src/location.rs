//! Magic-link callback parameters.
//!
//! The launch location is captured once at startup; the callback
//! parameters are read from it exactly once and stripped from the
//! visible address after processing.

use url::Url;

use crate::auth::OtpKind;

/// Query parameter carrying the hashed verification token.
const TOKEN_HASH_PARAM: &str = "token_hash";

/// Query parameter carrying the OTP kind.
const TYPE_PARAM: &str = "type";

/// The verification parameters of a magic-link callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackParams {
    /// The hashed one-time token to verify.
    pub token_hash: String,
    /// The OTP kind, `Email` when the `type` parameter is absent.
    pub kind: OtpKind,
}

impl CallbackParams {
    /// Extracts callback parameters from a location, if present.
    ///
    /// Returns `None` when the location carries no `token_hash`, which
    /// means the screen must not enter the verifying view.
    #[must_use]
    pub fn from_url(url: &Url) -> Option<Self> {
        let mut token_hash = None;
        let mut kind = None;
        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                TOKEN_HASH_PARAM if !value.is_empty() => {
                    token_hash = Some(value.into_owned());
                }
                TYPE_PARAM => kind = Some(value.into_owned()),
                _ => {}
            }
        }

        token_hash.map(|token_hash| Self {
            token_hash,
            kind: OtpKind::from_query(kind.as_deref()),
        })
    }

    /// Returns `url` with the callback parameters removed, leaving any
    /// unrelated query parameters in place.
    #[must_use]
    pub fn stripped(url: &Url) -> Url {
        let remaining: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(key, _)| key != TOKEN_HASH_PARAM && key != TYPE_PARAM)
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();

        let mut cleaned = url.clone();
        if remaining.is_empty() {
            cleaned.set_query(None);
        } else {
            cleaned
                .query_pairs_mut()
                .clear()
                .extend_pairs(remaining)
                .finish();
        }
        cleaned
    }
}
