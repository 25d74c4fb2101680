//! Tree-walking evaluation.
//!
//! Statements execute against an [`Environment`]; each one yields a
//! [`Signal`] saying whether a `return` is unwinding. Expression
//! evaluation is strict and left-to-right — both operands of `|` and `&`
//! are always evaluated. Output goes to an injected sink so the driver
//! can hand in stdout and tests a buffer.

use std::io::Write;

use crate::ast::{Block, Call, Chain, Comparison, Expr, FunctionDef, Program, Stmt};
use crate::env::{Environment, VarLookup};
use crate::error::{Error, ExecutionError, ExecutionErrorKind};
use crate::intern::{Interner, Symbol};
use crate::source::Position;
use crate::token::{Token, TokenType, TokenValue};
use crate::values::{TimeUnit, Value};

/// Whether a `return` is propagating out of enclosing bodies.
pub enum Signal {
    Normal,
    Return(Value),
}

pub struct Interpreter<'a, 'i, W: Write> {
    env: Environment<'a>,
    interner: &'i Interner,
    out: W,
}

impl<'a, 'i, W: Write> Interpreter<'a, 'i, W> {
    pub fn new(interner: &'i Interner, out: W) -> Self {
        Interpreter {
            env: Environment::new(),
            interner,
            out,
        }
    }

    /// Executes the program. The first propagating `return` becomes the
    /// program's value; a program that runs off the end yields nothing.
    pub fn run(&mut self, program: &Program<'a>) -> Result<Option<Value>, Error> {
        for stmt in program.statements {
            if let Signal::Return(value) = self.execute(stmt)? {
                return Ok(Some(value));
            }
        }
        Ok(None)
    }

    pub fn into_output(self) -> W {
        self.out
    }

    fn execute(&mut self, stmt: &'a Stmt<'a>) -> Result<Signal, Error> {
        match stmt {
            Stmt::FunctionDef(def) => {
                self.env.declare_fun(def.name.symbol(), def);
                Ok(Signal::Normal)
            }
            Stmt::VariableDef { name, init } => {
                self.env.declare_var(name.symbol());
                if let Some(init) = init {
                    let value = self.evaluate(init)?;
                    self.assign(name, value)?;
                }
                Ok(Signal::Normal)
            }
            Stmt::Assignment { name, value } => {
                let value = self.evaluate(value)?;
                self.assign(name, value)?;
                Ok(Signal::Normal)
            }
            Stmt::Call(expr) => {
                self.evaluate(expr)?;
                Ok(Signal::Normal)
            }
            Stmt::If {
                cond,
                body,
                else_body,
            } => {
                if self.evaluate(cond)?.truthy() {
                    self.run_scoped_block(body)
                } else if let Some(else_body) = else_body {
                    self.run_scoped_block(else_body)
                } else {
                    Ok(Signal::Normal)
                }
            }
            Stmt::From {
                start,
                end,
                unit,
                iterator,
                body,
                ..
            } => {
                self.env.push_scope();
                let result = self.from_loop(start, end, *unit, iterator, body);
                self.env.pop_scope();
                result
            }
            Stmt::Print { expr } => {
                let value = self.evaluate(expr)?;
                writeln!(self.out, "{value}").map_err(Error::Output)?;
                Ok(Signal::Normal)
            }
            Stmt::Return { expr, .. } => {
                let value = match expr {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::Int(0),
                };
                Ok(Signal::Return(value))
            }
        }
    }

    /// Runs a body in a fresh scope that is popped again on every exit.
    fn run_scoped_block(&mut self, block: Block<'a>) -> Result<Signal, Error> {
        self.env.push_scope();
        let result = self.run_block(block);
        self.env.pop_scope();
        result
    }

    fn run_block(&mut self, block: Block<'a>) -> Result<Signal, Error> {
        for stmt in block {
            if let Signal::Return(value) = self.execute(stmt)? {
                return Ok(Signal::Return(value));
            }
        }
        Ok(Signal::Normal)
    }

    /// The range loop: start and end evaluate once, the step is one unit,
    /// and every iteration binds the iterator in its own scope. Stepping
    /// or comparison failures carry the start expression's position.
    fn from_loop(
        &mut self,
        start: &'a Expr<'a>,
        end: &'a Expr<'a>,
        unit: TimeUnit,
        iterator: &'a Token,
        body: Block<'a>,
    ) -> Result<Signal, Error> {
        let pos = start.token().pos();
        let mut current = self.evaluate(start)?;
        let end_value = self.evaluate(end)?;
        let step = Value::Timedelta(unit.step());
        loop {
            let within = current
                .precedes(&end_value)
                .map_err(|e| self.error(pos, e.into()))?
                || current.equals(&end_value);
            if !within {
                break;
            }

            self.env.push_scope();
            let sym = iterator.symbol();
            self.env.declare_var(sym);
            self.env.assign_var(sym, current.clone());
            let signal = self.run_block(body);
            self.env.pop_scope();
            if let Signal::Return(value) = signal? {
                return Ok(Signal::Return(value));
            }

            current = current.add(&step).map_err(|e| self.error(pos, e.into()))?;
        }
        Ok(Signal::Normal)
    }

    fn evaluate(&mut self, expr: &'a Expr<'a>) -> Result<Value, Error> {
        match expr {
            Expr::Literal(token) => Ok(literal_value(token)),
            Expr::Variable(token) => self.read_variable(token),
            Expr::Call(call) => self.call_function(call),
            Expr::Or(chain)
            | Expr::And(chain)
            | Expr::Math(chain)
            | Expr::Multiplicative(chain) => self.evaluate_chain(chain),
            Expr::Equality(cmp) | Expr::Relational(cmp) => self.evaluate_comparison(cmp),
            Expr::LogicNegation { operand, .. } => {
                let value = self.evaluate(operand)?;
                Ok(Value::Int(i64::from(!value.truthy())))
            }
            Expr::MathNegation { op, operand } => {
                let value = self.evaluate(operand)?;
                value.negate().map_err(|e| self.error(op.pos(), e.into()))
            }
            Expr::TimeInfo {
                operand,
                unit,
                unit_token,
            } => {
                let value = self.evaluate(operand)?;
                value
                    .time_info(*unit)
                    .map(Value::Int)
                    .map_err(|e| self.error(unit_token.pos(), e.into()))
            }
        }
    }

    fn evaluate_chain(&mut self, chain: &'a Chain<'a>) -> Result<Value, Error> {
        let mut value = self.evaluate(chain.first)?;
        for (op, operand) in chain.rest {
            let rhs = self.evaluate(operand)?;
            value = self.apply_binary(op, &value, &rhs)?;
        }
        Ok(value)
    }

    fn evaluate_comparison(&mut self, cmp: &'a Comparison<'a>) -> Result<Value, Error> {
        let lhs = self.evaluate(cmp.left)?;
        let rhs = self.evaluate(cmp.right)?;
        self.apply_binary(&cmp.op, &lhs, &rhs)
    }

    /// Dispatches one binary operator into the value algebra. Logic and
    /// comparison operators yield `1`/`0` integers.
    fn apply_binary(&self, op: &Token, lhs: &Value, rhs: &Value) -> Result<Value, Error> {
        let result = match op.kind() {
            TokenType::Plus => lhs.add(rhs),
            TokenType::Minus => lhs.sub(rhs),
            TokenType::Multiplication => lhs.mul(rhs),
            TokenType::Division => lhs.div(rhs),
            TokenType::LogicalOr => Ok(Value::Int(i64::from(lhs.truthy() || rhs.truthy()))),
            TokenType::LogicalAnd => Ok(Value::Int(i64::from(lhs.truthy() && rhs.truthy()))),
            TokenType::Equals => Ok(Value::Int(i64::from(lhs.equals(rhs)))),
            TokenType::NotEquals => Ok(Value::Int(i64::from(!lhs.equals(rhs)))),
            TokenType::Less => lhs.precedes(rhs).map(|b| Value::Int(i64::from(b))),
            TokenType::Greater => rhs.precedes(lhs).map(|b| Value::Int(i64::from(b))),
            TokenType::LessOrEqual => lhs
                .precedes(rhs)
                .map(|b| Value::Int(i64::from(b || lhs.equals(rhs)))),
            TokenType::GreaterOrEqual => rhs
                .precedes(lhs)
                .map(|b| Value::Int(i64::from(b || lhs.equals(rhs)))),
            other => unreachable!("not a binary operator: {other}"),
        };
        result.map_err(|e| self.error(op.pos(), e.into()))
    }

    fn read_variable(&self, token: &Token) -> Result<Value, Error> {
        let sym = token.symbol();
        match self.env.read_var(sym) {
            VarLookup::Value(value) => Ok(value.clone()),
            VarLookup::Uninitialized => Err(self.error(
                token.pos(),
                ExecutionErrorKind::UninitializedVariable(self.name_of(sym)),
            )),
            VarLookup::Undeclared => Err(self.error(
                token.pos(),
                ExecutionErrorKind::UndeclaredVariable(self.name_of(sym)),
            )),
        }
    }

    /// Calls a user function: arguments evaluate in the caller's
    /// environment, then a fresh scope receives the parameters. A body
    /// that does not return yields `0`.
    fn call_function(&mut self, call: &'a Call<'a>) -> Result<Value, Error> {
        let sym = call.name.symbol();
        let Some(def) = self.env.lookup_fun(sym) else {
            return Err(self.error(
                call.name.pos(),
                ExecutionErrorKind::UndeclaredFunction(self.name_of(sym)),
            ));
        };
        if def.params.len() != call.args.len() {
            return Err(self.error(
                call.name.pos(),
                ExecutionErrorKind::ArityMismatch {
                    name: self.name_of(sym),
                    expected: def.params.len(),
                    got: call.args.len(),
                },
            ));
        }

        let mut args = Vec::with_capacity(call.args.len());
        for arg in call.args {
            args.push(self.evaluate(arg)?);
        }

        self.env.push_scope();
        let result = self.bind_and_run(def, args);
        self.env.pop_scope();
        match result? {
            Signal::Return(value) => Ok(value),
            Signal::Normal => Ok(Value::Int(0)),
        }
    }

    fn bind_and_run(&mut self, def: &'a FunctionDef<'a>, args: Vec<Value>) -> Result<Signal, Error> {
        for (param, value) in def.params.iter().zip(args) {
            let sym = param.symbol();
            self.env.declare_var(sym);
            self.env.assign_var(sym, value);
        }
        self.run_block(def.body)
    }

    fn assign(&mut self, name: &Token, value: Value) -> Result<(), Error> {
        let sym = name.symbol();
        if !self.env.assign_var(sym, value) {
            return Err(self.error(
                name.pos(),
                ExecutionErrorKind::UndeclaredVariable(self.name_of(sym)),
            ));
        }
        Ok(())
    }

    fn name_of(&self, sym: Symbol) -> String {
        self.interner.resolve(sym).to_string()
    }

    fn error(&self, pos: Position, kind: ExecutionErrorKind) -> Error {
        ExecutionError::new(pos, kind).into()
    }
}

fn literal_value(token: &Token) -> Value {
    match token.value() {
        TokenValue::Number(n) => Value::Int(*n),
        TokenValue::String(s) => Value::Str(s.clone()),
        TokenValue::Date(d) => Value::Date(*d),
        TokenValue::Time(t) => Value::Time(*t),
        TokenValue::DateTime(dt) => Value::DateTime(*dt),
        TokenValue::Timedelta(td) => Value::Timedelta(*td),
        TokenValue::Identifier(_) | TokenValue::None => {
            unreachable!("literal nodes carry literal tokens")
        }
    }
}
