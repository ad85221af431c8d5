use crate::ast::{Expression, Statement};

/// Cursed-speech counter limit. Crossing it mid-run is fatal until a
/// `Cough_Syrup` reset.
pub const CURSE_THRESHOLD: u32 = 100;

/// Per-node cursed-speech costs, charged as nodes execute or evaluate.
///
/// The exact magnitudes are a language-tuning knob rather than a fixed
/// contract, so they live in a table the embedder can replace via
/// `Interpreter::with_costs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CostTable {
    pub assign: u32,
    pub function_def: u32,
    pub return_stmt: u32,
    pub conditional: u32,
    pub for_loop: u32,
    pub while_loop: u32,
    pub var_ref: u32,
    pub literal: u32,
}

impl Default for CostTable {
    fn default() -> Self {
        Self {
            assign: 1,
            function_def: 1,
            return_stmt: 1,
            conditional: 1,
            for_loop: 1,
            while_loop: 1,
            var_ref: 1,
            literal: 1,
        }
    }
}

impl CostTable {
    /// A table that charges nothing, useful for embedding without the budget
    /// mechanic.
    pub fn free() -> Self {
        Self {
            assign: 0,
            function_def: 0,
            return_stmt: 0,
            conditional: 0,
            for_loop: 0,
            while_loop: 0,
            var_ref: 0,
            literal: 0,
        }
    }

    pub fn statement(&self, statement: &Statement) -> u32 {
        match statement {
            Statement::Assign { .. } => self.assign,
            Statement::FunctionDef { .. } => self.function_def,
            Statement::Return(_) => self.return_stmt,
            Statement::If { .. } => self.conditional,
            Statement::For { .. } => self.for_loop,
            Statement::While { .. } => self.while_loop,
            Statement::ResetBudget | Statement::Expr(_) => 0,
        }
    }

    pub fn expression(&self, expression: &Expression) -> u32 {
        match expression {
            Expression::Identifier(_) => self.var_ref,
            Expression::Number(_) | Expression::Boolean(_) | Expression::Str(_) => self.literal,
            Expression::Get { .. }
            | Expression::UnaryOp { .. }
            | Expression::BinaryOp { .. }
            | Expression::Call { .. } => 0,
        }
    }
}
