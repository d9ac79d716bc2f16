//! Element ids and classes the page markup must provide.

pub const LOGIN_MODAL: &str = "loginModal";
pub const REGISTER_MODAL: &str = "registerModal";
pub const INGREDIENTS_LIST: &str = "ingredients-list";
pub const INSTRUCTIONS_LIST: &str = "instructions-list";
pub const FORM_MESSAGE: &str = "form-message";

pub const INGREDIENT_ITEM_CLASS: &str = "ingredient-item";
pub const INSTRUCTION_ITEM_CLASS: &str = "instruction-item";

/// Where a successful recipe submission lands.
pub const RECIPES_PATH: &str = "/recipes";
