//! Reactions to completed asynchronous form submissions.

use crate::dom;
use crate::flash::FlashBoard;
use crate::form::FormSession;
use crate::modal::{ModalKind, Modals};
use serde::Deserialize;
use std::time::Duration;

/// Pause between a successful recipe save and leaving the form.
pub const NAVIGATE_DELAY: Duration = Duration::from_millis(1_500);

/// A partial-page request finished.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestCompleted {
    /// Id of the element the response was swapped into.
    pub target_id: String,
    pub successful: bool,
}

impl RequestCompleted {
    pub fn new(target_id: impl Into<String>, successful: bool) -> Self {
        Self {
            target_id: target_id.into(),
            successful,
        }
    }
}

/// Something the page must do in response to an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    ReloadPage,
    NavigateAfter { path: String, delay: Duration },
}

/// The browser side of an [`Effect`].
pub trait PageHost {
    fn reload(&self);
    fn navigate(&self, path: &str);
}

impl Effect {
    pub async fn apply<H: PageHost + ?Sized>(&self, host: &H) {
        match self {
            Effect::ReloadPage => host.reload(),
            Effect::NavigateAfter { path, delay } => {
                tokio::time::sleep(*delay).await;
                host.navigate(path);
            }
        }
    }
}

/// Client-side state of one page.
#[derive(Debug, Default)]
pub struct PageState {
    pub modals: Modals,
    pub form: FormSession,
    pub flash: FlashBoard,
}

impl PageState {
    pub fn new() -> Self {
        Self::default()
    }

    /// A page that renders the recipe form.
    pub fn with_recipe_form() -> Self {
        Self {
            form: FormSession::with_initial_rows(),
            ..Self::default()
        }
    }

    pub fn on_click(&mut self, target_id: &str) {
        if let Some(kind) = self.modals.handle_click(target_id) {
            tracing::debug!(?kind, "modal dismissed by backdrop click");
        }
    }

    /// A successful auth submission closes its modal and reloads the page.
    /// A successful recipe submission navigates back to the list.
    pub fn after_request(&mut self, event: &RequestCompleted) -> Option<Effect> {
        if !event.successful {
            tracing::debug!(target_id = %event.target_id, "request failed, no effect");
            return None;
        }

        if let Some(kind) = ModalKind::from_element_id(&event.target_id) {
            self.modals.close(kind);
            return Some(Effect::ReloadPage);
        }

        if event.target_id == dom::FORM_MESSAGE {
            return Some(Effect::NavigateAfter {
                path: dom::RECIPES_PATH.to_string(),
                delay: NAVIGATE_DELAY,
            });
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tokio::time::Instant;

    #[derive(Default)]
    struct RecordingHost {
        reloads: Mutex<usize>,
        navigations: Mutex<Vec<String>>,
    }

    impl PageHost for RecordingHost {
        fn reload(&self) {
            *self.reloads.lock().unwrap() += 1;
        }

        fn navigate(&self, path: &str) {
            self.navigations.lock().unwrap().push(path.to_string());
        }
    }

    #[test]
    fn auth_success_closes_modal_and_reloads() {
        let mut page = PageState::new();
        page.modals.open(ModalKind::Login);

        let effect = page.after_request(&RequestCompleted::new("loginModal", true));

        assert_eq!(effect, Some(Effect::ReloadPage));
        assert!(!page.modals.is_visible(ModalKind::Login));
    }

    #[test]
    fn failed_auth_keeps_modal_open() {
        let mut page = PageState::new();
        page.modals.open(ModalKind::Register);

        assert_eq!(page.after_request(&RequestCompleted::new("registerModal", false)), None);
        assert!(page.modals.is_visible(ModalKind::Register));
    }

    #[test]
    fn unrelated_target_has_no_effect() {
        let mut page = PageState::with_recipe_form();
        assert_eq!(page.after_request(&RequestCompleted::new("recipe-list", true)), None);
    }

    #[test]
    fn backdrop_click_through_page() {
        let mut page = PageState::new();
        page.modals.open(ModalKind::Login);
        page.on_click("loginModal");
        assert!(!page.modals.is_visible(ModalKind::Login));
    }

    #[test]
    fn event_detail_deserializes() {
        let event: RequestCompleted =
            serde_json::from_str(r#"{"targetId": "form-message", "successful": true}"#).unwrap();
        assert_eq!(event, RequestCompleted::new("form-message", true));
    }

    #[tokio::test(start_paused = true)]
    async fn recipe_saved_navigates_after_delay() {
        let mut page = PageState::with_recipe_form();
        let host = RecordingHost::default();

        let effect = page
            .after_request(&RequestCompleted::new("form-message", true))
            .unwrap();
        let start = Instant::now();
        effect.apply(&host).await;
        let elapsed = start.elapsed();

        assert!(elapsed >= Duration::from_millis(1_000));
        assert!(elapsed <= Duration::from_millis(2_000));
        assert_eq!(*host.navigations.lock().unwrap(), vec!["/recipes".to_string()]);
        assert_eq!(*host.reloads.lock().unwrap(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn reload_is_immediate() {
        let host = RecordingHost::default();
        let start = Instant::now();
        Effect::ReloadPage.apply(&host).await;

        assert_eq!(start.elapsed(), Duration::ZERO);
        assert_eq!(*host.reloads.lock().unwrap(), 1);
    }
}
