use crate::ast::{Expression, Program, Statement};
use crate::builtins::BuiltinFunction;

mod budget;
mod env;
mod error;
mod value;

pub use budget::{CostTable, CURSE_THRESHOLD};
pub use env::Environment;
pub use error::RuntimeError;
pub use value::{FunctionValue, Value};

/// Control-flow marker for statement execution. Return unwinding travels as
/// an explicit outcome, never as host unwinding.
enum ExecResult {
    Continue,
    Return(Value),
}

/// Tree-walking evaluator with copy-down / merge-up scoping and the
/// cursed-speech budget.
///
/// Execution pipeline:
/// run -> exec_statement (top-level, budget check after each)
/// -> eval_expression -> eval_call -> exec_statement (function body).
pub struct Interpreter {
    costs: CostTable,
    threshold: u32,
    env: Environment,
    output: Vec<String>,
    cursed: u32,
}

impl Interpreter {
    pub fn new(env: Environment) -> Self {
        Self::with_costs(env, CostTable::default(), CURSE_THRESHOLD)
    }

    pub fn with_costs(env: Environment, costs: CostTable, threshold: u32) -> Self {
        Self {
            costs,
            threshold,
            env,
            output: Vec::new(),
            cursed: 0,
        }
    }

    /// Execute the program's statements in order against the held
    /// environment. The environment survives the call either way, so an
    /// interactive session can keep feeding programs in.
    pub fn run(&mut self, program: &Program) -> Result<(), RuntimeError> {
        let mut env = std::mem::take(&mut self.env);
        let result = self.run_top_level(&program.statements, &mut env);
        self.env = env;
        result
    }

    /// Bindings currently in force.
    pub fn environment(&self) -> &Environment {
        &self.env
    }

    /// Current cursed-speech counter value.
    pub fn cursed_count(&self) -> u32 {
        self.cursed
    }

    /// Drain the lines produced by the output builtin so far.
    pub fn take_output(&mut self) -> Vec<String> {
        std::mem::take(&mut self.output)
    }

    fn run_top_level(
        &mut self,
        statements: &[Statement],
        env: &mut Environment,
    ) -> Result<(), RuntimeError> {
        for statement in statements {
            match self.exec_statement(statement, env)? {
                ExecResult::Continue => {}
                ExecResult::Return(_) => return Err(RuntimeError::ReturnOutsideFunction),
            }
            // The threshold is consulted only here, once per top-level
            // statement; nested blocks and calls accumulate unchecked.
            if self.cursed > self.threshold {
                return Err(RuntimeError::CursedSpeechOverload {
                    count: self.cursed,
                    threshold: self.threshold,
                });
            }
        }
        Ok(())
    }

    fn exec_statement(
        &mut self,
        statement: &Statement,
        env: &mut Environment,
    ) -> Result<ExecResult, RuntimeError> {
        self.cursed = self.cursed.saturating_add(self.costs.statement(statement));
        match statement {
            Statement::Assign { name, value } => {
                let value = self.eval_expression(value, env)?;
                env.define(name.clone(), value);
                Ok(ExecResult::Continue)
            }
            Statement::FunctionDef { name, params, body } => {
                env.define(
                    name.clone(),
                    Value::Function(FunctionValue {
                        name: name.clone(),
                        params: params.clone(),
                        body: body.clone(),
                    }),
                );
                Ok(ExecResult::Continue)
            }
            Statement::Return(value) => {
                let value = self.eval_expression(value, env)?;
                Ok(ExecResult::Return(value))
            }
            Statement::If {
                condition,
                then_body,
                else_body,
            } => {
                let condition = self.eval_expression(condition, env)?;
                if condition.is_truthy() {
                    self.exec_block(then_body, env)
                } else if let Some(else_body) = else_body {
                    self.exec_block(else_body, env)
                } else {
                    Ok(ExecResult::Continue)
                }
            }
            Statement::While { condition, body } => {
                loop {
                    if !self.eval_expression(condition, env)?.is_truthy() {
                        break;
                    }
                    if let ExecResult::Return(value) = self.exec_block(body, env)? {
                        return Ok(ExecResult::Return(value));
                    }
                }
                Ok(ExecResult::Continue)
            }
            Statement::For {
                init,
                condition,
                step,
                body,
            } => {
                if let ExecResult::Return(value) = self.exec_statement(init, env)? {
                    return Ok(ExecResult::Return(value));
                }
                loop {
                    if !self.eval_expression(condition, env)?.is_truthy() {
                        break;
                    }
                    if let ExecResult::Return(value) = self.exec_block(body, env)? {
                        return Ok(ExecResult::Return(value));
                    }
                    if let ExecResult::Return(value) = self.exec_statement(step, env)? {
                        return Ok(ExecResult::Return(value));
                    }
                }
                Ok(ExecResult::Continue)
            }
            Statement::ResetBudget => {
                self.cursed = 0;
                Ok(ExecResult::Continue)
            }
            Statement::Expr(expression) => {
                self.eval_expression(expression, env)?;
                Ok(ExecResult::Continue)
            }
        }
    }

    /// Run a nested block on a snapshot of the enclosing environment. On
    /// normal completion the snapshot is merged back wholesale, so block
    /// bindings escape upward; on return-unwind only the cursed counter
    /// (threaded through `self`) survives.
    fn exec_block(
        &mut self,
        body: &[Statement],
        env: &mut Environment,
    ) -> Result<ExecResult, RuntimeError> {
        let mut inner = env.snapshot();
        for statement in body {
            match self.exec_statement(statement, &mut inner)? {
                ExecResult::Continue => {}
                ExecResult::Return(value) => return Ok(ExecResult::Return(value)),
            }
        }
        env.merge(inner);
        Ok(ExecResult::Continue)
    }

    fn eval_expression(
        &mut self,
        expression: &Expression,
        env: &Environment,
    ) -> Result<Value, RuntimeError> {
        self.cursed = self
            .cursed
            .saturating_add(self.costs.expression(expression));
        match expression {
            Expression::Number(value) => Ok(Value::Number(*value)),
            Expression::Boolean(value) => Ok(Value::Boolean(*value)),
            Expression::Str(value) => Ok(Value::Str(value.clone())),
            Expression::Identifier(name) => {
                env.lookup(name)
                    .cloned()
                    .ok_or_else(|| RuntimeError::UndefinedVariable { name: name.clone() })
            }
            Expression::Get { object, key } => {
                let object = self.eval_expression(object, env)?;
                let key = self.eval_expression(key, env)?;
                // None of the host value kinds is a container, so every
                // lookup fails; the error carries the context instead of a
                // raw miss.
                Err(RuntimeError::PropertyAccess {
                    type_name: object.type_name().to_string(),
                    key: key.to_output(),
                })
            }
            Expression::UnaryOp { op, operand } => {
                let operand = self.eval_expression(operand, env)?;
                Value::unary(*op, &operand)
            }
            Expression::BinaryOp { left, op, right } => {
                // Both operands are evaluated before the operator applies,
                // so `and`/`or` never short-circuit.
                let left = self.eval_expression(left, env)?;
                let right = self.eval_expression(right, env)?;
                Value::binary(*op, &left, &right)
            }
            Expression::Call { callee, args } => self.eval_call(callee, args, env),
        }
    }

    fn eval_call(
        &mut self,
        callee: &Expression,
        args: &[Expression],
        env: &Environment,
    ) -> Result<Value, RuntimeError> {
        let callee_value = self.eval_expression(callee, env)?;
        let mut evaluated = Vec::with_capacity(args.len());
        for arg in args {
            evaluated.push(self.eval_expression(arg, env)?);
        }
        match callee_value {
            Value::Builtin(builtin) => {
                self.call_builtin(builtin, evaluated);
                Ok(Value::None)
            }
            Value::Function(function) => {
                let name = function.name.clone();
                self.call_function(&function, evaluated, env)
                    .map_err(|cause| RuntimeError::FunctionCall {
                        name,
                        cause: Box::new(cause),
                    })
            }
            other => Err(RuntimeError::NotCallable {
                type_name: other.type_name().to_string(),
            }),
        }
    }

    fn call_builtin(&mut self, builtin: BuiltinFunction, args: Vec<Value>) {
        match builtin {
            BuiltinFunction::Print => {
                let rendered = args.iter().map(Value::to_output).collect::<Vec<_>>();
                self.output.push(rendered.join(" "));
            }
        }
    }

    /// Invoke a user function on a call-time snapshot of the caller's
    /// environment overlaid with the parameter bindings. The call's bindings
    /// die with the snapshot; the cursed counter carries on through `self`.
    fn call_function(
        &mut self,
        function: &FunctionValue,
        args: Vec<Value>,
        env: &Environment,
    ) -> Result<Value, RuntimeError> {
        if args.len() != function.params.len() {
            return Err(RuntimeError::FunctionArityMismatch {
                name: function.name.clone(),
                expected: function.params.len(),
                found: args.len(),
            });
        }
        let mut call_env = env.snapshot();
        for (param, value) in function.params.iter().zip(args) {
            call_env.define(param.clone(), value);
        }
        for statement in &function.body {
            match self.exec_statement(statement, &mut call_env)? {
                ExecResult::Continue => {}
                ExecResult::Return(value) => return Ok(value),
            }
        }
        Ok(Value::None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtins::initial_environment;
    use crate::lexer::tokenize;
    use crate::parser::parse_tokens;
    use indoc::indoc;

    fn parse(source: &str) -> Program {
        parse_tokens(tokenize(source).expect("tokenize failed")).expect("parse failed")
    }

    fn run_source(source: &str) -> (Interpreter, Result<(), RuntimeError>) {
        let mut interpreter = Interpreter::new(initial_environment());
        let result = interpreter.run(&parse(source));
        (interpreter, result)
    }

    fn number(interpreter: &Interpreter, name: &str) -> f64 {
        match interpreter.environment().lookup(name) {
            Some(Value::Number(value)) => *value,
            other => panic!("expected number binding for '{name}', got {other:?}"),
        }
    }

    #[test]
    fn evaluates_flat_precedence_left_to_right() {
        let (interpreter, result) = run_source("Tuna x Tuna 1 + 2 * 3");
        result.expect("run failed");
        assert_eq!(number(&interpreter, "x"), 9.0);
    }

    #[test]
    fn collects_print_output() {
        let (mut interpreter, result) = run_source(indoc! {"
            Tuna greeting Tuna 'hello' + ' ' + 'world'
            print(greeting, Salmon)
        "});
        result.expect("run failed");
        assert_eq!(interpreter.take_output(), vec!["hello world Salmon"]);
    }

    #[test]
    fn division_by_zero_is_fatal() {
        let (_, result) = run_source("Tuna x Tuna 1 / 0");
        assert_eq!(result, Err(RuntimeError::DivisionByZero));
    }

    #[test]
    fn undefined_variable_names_the_identifier() {
        let (_, result) = run_source("Tuna x Tuna ghost + 1");
        assert_eq!(
            result,
            Err(RuntimeError::UndefinedVariable {
                name: "ghost".to_string()
            })
        );
    }

    #[test]
    fn logical_operators_do_not_short_circuit() {
        // `missing` sits on the right of `and` behind a false left operand;
        // it is still evaluated and still fails.
        let (_, result) = run_source("Tuna x Tuna Bonito_Flakes and missing");
        assert_eq!(
            result,
            Err(RuntimeError::UndefinedVariable {
                name: "missing".to_string()
            })
        );
    }

    #[test]
    fn closures_see_the_environment_snapshot_taken_at_call_time() {
        let (interpreter, result) = run_source(indoc! {"
            Tuna x Tuna 1
            Tuna_Mayo f Tuna Tuna {
                Return x
            }
            Tuna x Tuna 2
            Tuna y Tuna f()
        "});
        result.expect("run failed");
        assert_eq!(number(&interpreter, "y"), 2.0);
    }

    #[test]
    fn function_call_bindings_do_not_leak() {
        let (interpreter, result) = run_source(indoc! {"
            Tuna_Mayo f Tuna a Tuna {
                Tuna hidden Tuna 99
                Return a
            }
            Tuna x Tuna f(1)
        "});
        result.expect("run failed");
        assert_eq!(number(&interpreter, "x"), 1.0);
        assert_eq!(interpreter.environment().lookup("hidden"), None);
        assert_eq!(interpreter.environment().lookup("a"), None);
    }

    #[test]
    fn block_bindings_escape_into_the_enclosing_scope() {
        let (interpreter, result) = run_source(indoc! {"
            Mustard_Leaf Tuna Salmon Tuna {
                Tuna y Tuna 3
            }
            Tuna z Tuna y + 1
        "});
        result.expect("run failed");
        assert_eq!(number(&interpreter, "y"), 3.0);
        assert_eq!(number(&interpreter, "z"), 4.0);
    }

    #[test]
    fn for_loop_runs_init_condition_body_step() {
        let (interpreter, result) = run_source(indoc! {"
            Tuna sum Tuna 0
            Twist Tuna Tuna i Tuna 0 Tuna i < 3 Tuna Tuna i Tuna i + 1 Tuna {
                Tuna sum Tuna sum + i
            }
        "});
        result.expect("run failed");
        assert_eq!(number(&interpreter, "sum"), 3.0);
        // The loop variable escapes; blocks are not scopes.
        assert_eq!(number(&interpreter, "i"), 3.0);
    }

    #[test]
    fn while_loop_runs_until_condition_is_false() {
        let (interpreter, result) = run_source(indoc! {"
            Tuna n Tuna 0
            Plummet Tuna n < 5 Tuna {
                Tuna n Tuna n + 1
            }
        "});
        result.expect("run failed");
        assert_eq!(number(&interpreter, "n"), 5.0);
    }

    #[test]
    fn return_unwinds_out_of_nested_blocks() {
        let (interpreter, result) = run_source(indoc! {"
            Tuna_Mayo find Tuna limit Tuna {
                Tuna n Tuna 0
                Plummet Tuna Salmon Tuna {
                    Mustard_Leaf Tuna n == limit Tuna {
                        Return n
                    }
                    Tuna n Tuna n + 1
                }
            }
            Tuna got Tuna find(4)
        "});
        result.expect("run failed");
        assert_eq!(number(&interpreter, "got"), 4.0);
    }

    #[test]
    fn return_at_top_level_is_an_error() {
        let (_, result) = run_source("Return 1");
        assert_eq!(result, Err(RuntimeError::ReturnOutsideFunction));
    }

    #[test]
    fn errors_on_wrong_arity() {
        let (_, result) = run_source(indoc! {"
            Tuna_Mayo f Tuna a b Tuna {
                Return a
            }
            f(1)
        "});
        assert_eq!(
            result,
            Err(RuntimeError::FunctionCall {
                name: "f".to_string(),
                cause: Box::new(RuntimeError::FunctionArityMismatch {
                    name: "f".to_string(),
                    expected: 2,
                    found: 1,
                }),
            })
        );
    }

    #[test]
    fn failures_inside_a_call_are_wrapped_with_the_callee_name() {
        let (_, result) = run_source(indoc! {"
            Tuna_Mayo f Tuna Tuna {
                Return 1 / 0
            }
            f()
        "});
        assert_eq!(
            result,
            Err(RuntimeError::FunctionCall {
                name: "f".to_string(),
                cause: Box::new(RuntimeError::DivisionByZero),
            })
        );
    }

    #[test]
    fn errors_on_calling_a_non_callable_value() {
        let (_, result) = run_source(indoc! {"
            Tuna x Tuna 5
            x()
        "});
        assert_eq!(
            result,
            Err(RuntimeError::NotCallable {
                type_name: "number".to_string()
            })
        );
    }

    #[test]
    fn property_access_fails_with_object_and_key_context() {
        let (_, result) = run_source(indoc! {"
            Tuna s Tuna 'abc'
            Tuna n Tuna s.length
        "});
        assert_eq!(
            result,
            Err(RuntimeError::PropertyAccess {
                type_name: "string".to_string(),
                key: "length".to_string(),
            })
        );
    }

    #[test]
    fn budget_overload_triggers_on_the_statement_crossing_the_threshold() {
        let mut costs = CostTable::free();
        costs.assign = 1;
        let assigns = "Tuna x Tuna 1\n".repeat(101);
        let program = parse(&assigns);

        let mut interpreter =
            Interpreter::with_costs(initial_environment(), costs, CURSE_THRESHOLD);
        assert_eq!(
            interpreter.run(&program),
            Err(RuntimeError::CursedSpeechOverload {
                count: 101,
                threshold: 100,
            })
        );

        // One statement fewer sits exactly at the threshold and passes.
        let program = parse(&"Tuna x Tuna 1\n".repeat(100));
        let mut interpreter =
            Interpreter::with_costs(initial_environment(), costs, CURSE_THRESHOLD);
        interpreter.run(&program).expect("run failed");
        assert_eq!(interpreter.cursed_count(), 100);
    }

    #[test]
    fn reset_statement_zeroes_the_counter_and_saves_the_run() {
        let mut costs = CostTable::free();
        costs.assign = 1;
        let mut source = "Tuna x Tuna 1\n".repeat(60);
        source.push_str("Cough_Syrup\n");
        source.push_str(&"Tuna x Tuna 1\n".repeat(60));

        let mut interpreter =
            Interpreter::with_costs(initial_environment(), costs, CURSE_THRESHOLD);
        interpreter.run(&parse(&source)).expect("run failed");
        assert_eq!(interpreter.cursed_count(), 60);
    }

    #[test]
    fn threshold_is_checked_only_between_top_level_statements() {
        let mut costs = CostTable::free();
        costs.assign = 1;
        let source = indoc! {"
            Tuna i Tuna 0
            Plummet Tuna i < 3 Tuna {
                Tuna i Tuna i + 1
            }
        "};

        // Threshold 2 is crossed inside the loop, but the loop still runs to
        // completion before the check fires.
        let mut interpreter = Interpreter::with_costs(initial_environment(), costs, 2);
        assert_eq!(
            interpreter.run(&parse(source)),
            Err(RuntimeError::CursedSpeechOverload {
                count: 4,
                threshold: 2,
            })
        );
        assert_eq!(number(&interpreter, "i"), 3.0);
    }

    #[test]
    fn counter_accumulates_across_runs_until_reset() {
        let mut costs = CostTable::free();
        costs.assign = 1;
        let mut interpreter = Interpreter::with_costs(initial_environment(), costs, 100);

        interpreter.run(&parse("Tuna x Tuna 1")).expect("run failed");
        interpreter.run(&parse("Tuna x Tuna 2")).expect("run failed");
        assert_eq!(interpreter.cursed_count(), 2);

        interpreter.run(&parse("Cough_Syrup")).expect("run failed");
        assert_eq!(interpreter.cursed_count(), 0);
    }

    #[test]
    fn rerunning_a_program_on_fresh_state_is_deterministic() {
        let source = indoc! {"
            Tuna total Tuna 0
            Twist Tuna Tuna i Tuna 0 Tuna i < 4 Tuna Tuna i Tuna i + 1 Tuna {
                Tuna total Tuna total + i
            }
            print(total)
        "};
        let (mut first, first_result) = run_source(source);
        let (mut second, second_result) = run_source(source);
        first_result.expect("first run failed");
        second_result.expect("second run failed");
        assert_eq!(first.take_output(), second.take_output());
        assert_eq!(first.environment(), second.environment());
        assert_eq!(first.cursed_count(), second.cursed_count());
    }
}
