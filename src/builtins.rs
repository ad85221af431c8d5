use crate::interpreter::{Environment, Value};

/// Host routines injected into the starting environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinFunction {
    Print,
}

impl BuiltinFunction {
    pub fn name(self) -> &'static str {
        match self {
            Self::Print => "print",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "print" => Some(Self::Print),
            _ => None,
        }
    }
}

/// The environment a program starts with. The engine itself never builds
/// one; the caller hands this (or its own variant) to `Interpreter::new`.
pub fn initial_environment() -> Environment {
    let mut environment = Environment::new();
    environment.define(
        BuiltinFunction::Print.name(),
        Value::Builtin(BuiltinFunction::Print),
    );
    environment
}
