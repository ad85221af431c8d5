use thiserror::Error;

/// Typed errors produced while executing a program.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RuntimeError {
    #[error("Undefined variable '{name}'")]
    UndefinedVariable { name: String },
    #[error("Unsupported operands for '{op}': {left} and {right}")]
    InvalidOperands {
        op: &'static str,
        left: String,
        right: String,
    },
    #[error("Unsupported operand for unary '{op}': {type_name}")]
    InvalidUnaryOperand {
        op: &'static str,
        type_name: String,
    },
    #[error("Division by zero")]
    DivisionByZero,
    #[error("Modulo by zero")]
    ModuloByZero,
    #[error("Cannot access property '{key}' on type {type_name}")]
    PropertyAccess { type_name: String, key: String },
    #[error("Object of type {type_name} is not callable")]
    NotCallable { type_name: String },
    #[error("Function '{name}' expected {expected} arguments, got {found}")]
    FunctionArityMismatch {
        name: String,
        expected: usize,
        found: usize,
    },
    #[error("Error calling function '{name}': {cause}")]
    FunctionCall {
        name: String,
        cause: Box<RuntimeError>,
    },
    #[error("Return outside of function")]
    ReturnOutsideFunction,
    #[error("Throat irritation from excessive cursed speech usage! ({count}/{threshold})")]
    CursedSpeechOverload { count: u32, threshold: u32 },
}

impl RuntimeError {
    /// Advisory text shown by the CLI alongside the error message.
    pub fn suggestion(&self) -> Option<String> {
        match self {
            RuntimeError::UndefinedVariable { name } => Some(format!(
                "Make sure '{name}' is defined before use. Use 'Tuna {name} Tuna <value>' to define it"
            )),
            RuntimeError::InvalidOperands { .. } => Some(
                "Valid operators include: +, -, *, /, %, ==, !=, <, >, <=, >=, and, or"
                    .to_string(),
            ),
            RuntimeError::DivisionByZero | RuntimeError::ModuloByZero => {
                Some("Check that the divisor is not zero before dividing".to_string())
            }
            RuntimeError::FunctionCall { .. } => Some(
                "Check function name, parameters, and that the function is defined".to_string(),
            ),
            RuntimeError::CursedSpeechOverload { .. } => Some(
                "Use 'Cough_Syrup' to reset the cursed speech counter and soothe the throat"
                    .to_string(),
            ),
            _ => None,
        }
    }
}
