use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use quiz_core::codec::{decode, encode};
use quiz_core::model::Quiz;
use quiz_core::time::Clock;
use quiz_core::RepairedQuiz;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// The one defined error state of link resolution.
///
/// Distinct from a repaired placeholder quiz: a missing `data` parameter
/// means "render a no-link-data message", while a garbage token still
/// resolves to a playable placeholder.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ShareLinkError {
    #[error("no quiz data supplied in the link")]
    MissingData,
}

//
// ─── SERVICE ───────────────────────────────────────────────────────────────────
//

/// Glues the quiz codec to a base URL.
///
/// The teacher-facing flow calls [`ShareLinkService::create_link`]; the
/// student-facing flow hands the `data` query value to
/// [`ShareLinkService::resolve`]. Neither path panics.
pub struct ShareLinkService {
    base_url: Url,
    clock: Clock,
}

impl ShareLinkService {
    /// Create a service producing links under `base_url`, using real time.
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            clock: Clock::default(),
        }
    }

    /// Override the clock (usually for deterministic testing).
    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// A shareable link carrying the whole quiz in its `data` parameter.
    #[must_use]
    pub fn create_link(&self, quiz: &Quiz) -> Url {
        let mut link = self.base_url.clone();
        link.query_pairs_mut().append_pair("data", &encode(quiz));
        link
    }

    /// Resolve the `data` query value into a guaranteed-valid quiz.
    ///
    /// # Errors
    ///
    /// Returns [`ShareLinkError::MissingData`] when the parameter is absent
    /// or blank. Any other token, however corrupt, decodes to a repaired
    /// quiz.
    pub fn resolve(&self, token: Option<&str>) -> Result<RepairedQuiz, ShareLinkError> {
        let Some(token) = token.filter(|t| !t.trim().is_empty()) else {
            return Err(ShareLinkError::MissingData);
        };

        let resolved = decode(token, self.clock.now());
        if resolved.is_placeholder() {
            warn!(
                token_len = token.len(),
                "share token could not be decoded; serving placeholder quiz"
            );
        } else {
            debug!(quiz_id = %resolved.quiz.id, "resolved shared quiz");
        }
        Ok(resolved)
    }

    /// Extract and resolve the `data` parameter from a full share URL.
    ///
    /// # Errors
    ///
    /// Returns [`ShareLinkError::MissingData`] when the URL has no `data`
    /// pair.
    pub fn resolve_url(&self, url: &Url) -> Result<RepairedQuiz, ShareLinkError> {
        let token = url
            .query_pairs()
            .find(|(key, _)| key == "data")
            .map(|(_, value)| value.into_owned());
        self.resolve(token.as_deref())
    }
}
