//! Intents and the initial-intent filter.

/// A user-originated event describing a desired action
///
/// Intents carry only the parameters needed to build their action. The
/// mapping to an action is pure and lives with the intent type so that the
/// UI and business logic stay decoupled.
pub trait Intent {
    /// The action type this intent maps to
    type Action;

    /// Translate this intent into its action
    fn into_action(self) -> Self::Action;

    /// Whether this is the screen's initial-load intent
    ///
    /// Initial intents are admitted at most once per pipeline, so a UI that
    /// re-attaches (e.g. after a rotation) does not reissue the first load.
    fn is_initial(&self) -> bool {
        false
    }
}

/// Admits the first initial intent and every other intent
///
/// Owned by the single task that consumes the intent stream, so the check
/// needs no synchronisation.
///
/// # Example
///
/// ```
/// use countries_mvi_core::intent::{Intent, IntentFilter};
///
/// enum ListIntent { Initial, Refresh }
///
/// impl Intent for ListIntent {
///     type Action = ();
///     fn into_action(self) {}
///     fn is_initial(&self) -> bool { matches!(self, Self::Initial) }
/// }
///
/// let mut filter = IntentFilter::new();
/// assert!(filter.admit(&ListIntent::Initial));
/// assert!(!filter.admit(&ListIntent::Initial));
/// assert!(filter.admit(&ListIntent::Refresh));
/// assert!(filter.admit(&ListIntent::Refresh));
/// ```
#[derive(Debug, Clone, Default)]
pub struct IntentFilter {
    initial_seen: bool,
}

impl IntentFilter {
    /// Create a filter that has not seen an initial intent yet
    #[must_use]
    pub const fn new() -> Self {
        Self {
            initial_seen: false,
        }
    }

    /// Decide whether `intent` passes the filter
    pub fn admit<I: Intent>(&mut self, intent: &I) -> bool {
        if !intent.is_initial() {
            return true;
        }
        !std::mem::replace(&mut self.initial_seen, true)
    }

    #[cfg(test)]
    const fn initial_seen(&self) -> bool {
        self.initial_seen
    }
}
