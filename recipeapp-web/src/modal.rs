//! Login and register modal visibility.

use crate::dom;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModalKind {
    Login,
    Register,
}

impl ModalKind {
    pub const ALL: &'static [ModalKind] = &[ModalKind::Login, ModalKind::Register];

    /// Id of the modal's backdrop element.
    pub fn element_id(&self) -> &'static str {
        match self {
            ModalKind::Login => dom::LOGIN_MODAL,
            ModalKind::Register => dom::REGISTER_MODAL,
        }
    }

    pub fn from_element_id(id: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|kind| kind.element_id() == id)
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    #[default]
    Hidden,
    Visible,
}

impl Visibility {
    /// Class toggled onto the backdrop element for this state.
    pub fn class(&self) -> &'static str {
        match self {
            Visibility::Hidden => "hidden",
            Visibility::Visible => "flex",
        }
    }
}

/// The two independent auth modals. Both start hidden.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Modals {
    login: Visibility,
    register: Visibility,
}

impl Modals {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visibility(&self, kind: ModalKind) -> Visibility {
        match kind {
            ModalKind::Login => self.login,
            ModalKind::Register => self.register,
        }
    }

    pub fn is_visible(&self, kind: ModalKind) -> bool {
        self.visibility(kind) == Visibility::Visible
    }

    pub fn open(&mut self, kind: ModalKind) {
        self.set(kind, Visibility::Visible);
    }

    pub fn close(&mut self, kind: ModalKind) {
        self.set(kind, Visibility::Hidden);
    }

    /// A click landed on `target_id`. Clicking a modal's backdrop (outside
    /// its dialog) closes that modal. Returns the modal that closed.
    pub fn handle_click(&mut self, target_id: &str) -> Option<ModalKind> {
        let kind = ModalKind::from_element_id(target_id)?;
        if !self.is_visible(kind) {
            return None;
        }
        self.close(kind);
        Some(kind)
    }

    fn set(&mut self, kind: ModalKind, visibility: Visibility) {
        match kind {
            ModalKind::Login => self.login = visibility,
            ModalKind::Register => self.register = visibility,
        }
    }
}
