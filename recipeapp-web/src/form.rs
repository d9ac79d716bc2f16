//! Dynamic ingredient and instruction rows of the recipe form.
//!
//! Every row gets an index that is only used to name its form fields. Indices
//! come from per-session counters and are never handed out twice.

use crate::dom;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngredientRow {
    index: usize,
}

impl IngredientRow {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn name_field(&self) -> String {
        format!("ingredients[{}].name", self.index)
    }

    pub fn quantity_field(&self) -> String {
        format!("ingredients[{}].quantity", self.index)
    }

    pub fn unit_field(&self) -> String {
        format!("ingredients[{}].unit", self.index)
    }

    pub fn class(&self) -> &'static str {
        dom::INGREDIENT_ITEM_CLASS
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstructionRow {
    index: usize,
    /// 1-based position shown to the user.
    number: usize,
}

impl InstructionRow {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn number(&self) -> usize {
        self.number
    }

    pub fn label(&self) -> String {
        format!("{}.", self.number)
    }

    pub fn placeholder(&self) -> String {
        format!("Step {}", self.number)
    }

    pub fn field_name(&self) -> String {
        format!("instructions[{}]", self.index)
    }

    pub fn class(&self) -> &'static str {
        dom::INSTRUCTION_ITEM_CLASS
    }
}

/// Rows of one recipe form being edited.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FormSession {
    ingredients: Vec<IngredientRow>,
    instructions: Vec<InstructionRow>,
    next_ingredient_index: usize,
    next_instruction_index: usize,
    /// Rows the user has seen numbered; resynced to the row count on removal.
    instruction_count: usize,
}

impl FormSession {
    /// An empty form.
    pub fn new() -> Self {
        Self::default()
    }

    /// The form as first rendered by the server: one ingredient row and one
    /// instruction row, both at index 0.
    pub fn with_initial_rows() -> Self {
        let mut session = Self::new();
        session.add_ingredient();
        session.add_instruction();
        session
    }

    pub fn ingredients(&self) -> &[IngredientRow] {
        &self.ingredients
    }

    pub fn instructions(&self) -> &[InstructionRow] {
        &self.instructions
    }

    pub fn add_ingredient(&mut self) -> &IngredientRow {
        let index = self.next_ingredient_index;
        self.next_ingredient_index += 1;
        self.ingredients.push(IngredientRow { index });
        tracing::trace!(index, "ingredient row added");
        &self.ingredients[self.ingredients.len() - 1]
    }

    /// Remove the ingredient row with `index`. Other rows keep their indices.
    pub fn remove_ingredient(&mut self, index: usize) -> bool {
        let before = self.ingredients.len();
        self.ingredients.retain(|row| row.index != index);
        before != self.ingredients.len()
    }

    pub fn add_instruction(&mut self) -> &InstructionRow {
        let index = self.next_instruction_index;
        self.next_instruction_index += 1;
        self.instruction_count += 1;
        self.instructions.push(InstructionRow {
            index,
            number: self.instruction_count,
        });
        tracing::trace!(index, number = self.instruction_count, "instruction row added");
        &self.instructions[self.instructions.len() - 1]
    }

    /// Remove the instruction row with `index` and renumber the rest by position.
    pub fn remove_instruction(&mut self, index: usize) -> bool {
        let before = self.instructions.len();
        self.instructions.retain(|row| row.index != index);
        if before == self.instructions.len() {
            return false;
        }

        for (position, row) in self.instructions.iter_mut().enumerate() {
            row.number = position + 1;
        }
        self.instruction_count = self.instructions.len();
        true
    }
}
