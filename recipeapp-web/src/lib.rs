//! State behind the server-rendered recipe pages.
//!
//! The browser glue (modals, dynamic form rows, flash messages, reactions to
//! completed requests) is modelled here as plain state machines so it can be
//! driven and tested without a DOM. A host applies the resulting [`Effect`]s.

pub mod dom;
pub mod events;
pub mod flash;
pub mod form;
pub mod modal;
pub mod validation;

pub use events::{Effect, PageHost, PageState, RequestCompleted};
pub use flash::{Flash, FlashBoard, FlashKind, FLASH_TTL};
pub use form::{FormSession, IngredientRow, InstructionRow};
pub use modal::{ModalKind, Modals, Visibility};
pub use validation::{validate_form, validate_servings, validate_tag_color, FormData};
