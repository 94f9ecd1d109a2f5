// brewin-core -- a tree-walking evaluator for the Brewin teaching language
// Copyright (C) 2026  The brewin-core Authors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! The tree-walking evaluator: statement execution, expression evaluation,
//! thunk forcing, and the function-call protocol, all built around a single
//! [`ScopeStack`] that grows and shrinks as blocks are entered and left.

use std::rc::Rc;

use log::{debug, trace, warn};

use crate::ast::{BinOp, Expr, FuncDef, Spanned, Stmt};
use crate::env::{self, ScopeStack, ThunkRef};
use crate::error::{HostError, InterpError, InterpResult, Unwind};
use crate::host::Host;
use crate::ops::{self, OpOutcome};
use crate::registry::FunctionRegistry;
use crate::value::Value;

pub struct Interpreter<'h> {
    registry: FunctionRegistry,
    host: &'h mut dyn Host,
}

impl<'h> Interpreter<'h> {
    pub fn new(registry: FunctionRegistry, host: &'h mut dyn Host) -> Self {
        Self { registry, host }
    }

    pub fn host_mut(&mut self) -> &mut dyn Host {
        self.host
    }

    /// Call `func` with already-built argument thunks and return the
    /// forced result of running its body (`nil` if it falls off the end
    /// without an explicit `return`).
    pub fn call_function(&mut self, func: &Rc<FuncDef>, args: Vec<ThunkRef>) -> InterpResult<Value> {
        if args.len() != func.params.len() {
            return Err(HostError::name(format!(
                "\"{}\" expects {} argument(s), got {}",
                func.name,
                func.params.len(),
                args.len()
            ))
            .into());
        }

        trace!("call {}({} args)", func.name, args.len());
        let mut frame = ScopeStack::new();
        for (param, arg) in func.params.iter().zip(args) {
            frame.define(param.clone(), arg);
        }

        match self.exec_block(&func.body, &mut frame) {
            Ok(()) => Ok(Value::Nil),
            Err(InterpError::Unwind(Unwind::Return(thunk))) => self.force(&thunk),
            Err(other) => Err(other),
        }
    }

    fn exec_block(&mut self, stmts: &[Spanned<Stmt>], stack: &mut ScopeStack) -> InterpResult<()> {
        for stmt in stmts {
            self.exec_stmt(stmt, stack)?;
        }
        Ok(())
    }

    fn exec_stmt(&mut self, stmt: &Spanned<Stmt>, stack: &mut ScopeStack) -> InterpResult<()> {
        match &stmt.node {
            Stmt::VarDef { name } => {
                if stack.defined_in_innermost(name) {
                    return Err(HostError::at(
                        crate::error::ErrorKind::NameError,
                        stmt.span,
                        format!("\"{}\" already declared in this block", name),
                    )
                    .into());
                }
                stack.define(name.clone(), env::uninitialized());
                Ok(())
            }
            Stmt::Assign { name, value } => {
                let thunk = env::unevaluated(value.clone(), stack.clone());
                if !stack.assign(name, thunk) {
                    return Err(HostError::at(
                        crate::error::ErrorKind::NameError,
                        stmt.span,
                        format!("assignment to undeclared variable \"{}\"", name),
                    )
                    .into());
                }
                Ok(())
            }
            Stmt::Call(expr) => {
                self.eval_expr(expr, stack)?;
                Ok(())
            }
            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                let cond = self.eval_bool(condition, stack)?;
                stack.push();
                let result = if cond {
                    self.exec_block(then_branch, stack)
                } else if let Some(else_branch) = else_branch {
                    self.exec_block(else_branch, stack)
                } else {
                    Ok(())
                };
                stack.pop();
                result
            }
            Stmt::For {
                init,
                condition,
                update,
                body,
            } => {
                stack.push();
                let result = self.exec_for(init, condition, update, body, stack);
                stack.pop();
                result
            }
            Stmt::Return(value) => {
                let result = match value {
                    Some(expr) => self.eval_expr(expr, stack)?,
                    None => Value::Nil,
                };
                Err(InterpError::returning(env::evaluated(result)))
            }
            Stmt::Raise(expr) => {
                let tag = self.eval_expr(expr, stack)?;
                let tag = tag.as_str().ok_or_else(|| {
                    HostError::at(
                        crate::error::ErrorKind::TypeError,
                        expr.span,
                        "raise requires a string exception type",
                    )
                })?;
                Err(InterpError::raising(tag))
            }
            Stmt::Try { body, catchers } => self.exec_try(body, catchers, stack),
        }
    }

    fn exec_for(
        &mut self,
        init: &Spanned<Stmt>,
        condition: &Spanned<Expr>,
        update: &Spanned<Stmt>,
        body: &[Spanned<Stmt>],
        stack: &mut ScopeStack,
    ) -> InterpResult<()> {
        self.exec_stmt(init, stack)?;
        loop {
            if !self.eval_bool(condition, stack)? {
                return Ok(());
            }
            stack.push();
            let result = self.exec_block(body, stack);
            stack.pop();
            result?;
            self.exec_stmt(update, stack)?;
        }
    }

    fn exec_try(
        &mut self,
        body: &[Spanned<Stmt>],
        catchers: &[crate::ast::Catcher],
        stack: &mut ScopeStack,
    ) -> InterpResult<()> {
        stack.push();
        let result = self.exec_block(body, stack);
        stack.pop();

        match result {
            Err(InterpError::Unwind(Unwind::Raise(tag))) => {
                for catcher in catchers {
                    if catcher.exception_type.as_str() == &*tag {
                        debug!("caught exception \"{}\"", tag);
                        stack.push();
                        let handled = self.exec_block(&catcher.body, stack);
                        stack.pop();
                        return handled;
                    }
                }
                warn!("exception \"{}\" matched no catch clause, re-raising", tag);
                Err(InterpError::Unwind(Unwind::Raise(tag)))
            }
            other => other,
        }
    }

    fn eval_bool(&mut self, expr: &Spanned<Expr>, stack: &ScopeStack) -> InterpResult<bool> {
        let value = self.eval_expr(expr, stack)?;
        value.as_bool().ok_or_else(|| {
            HostError::at(
                crate::error::ErrorKind::TypeError,
                expr.span,
                format!("expected bool, got {}", value.type_name()),
            )
            .into()
        })
    }

    pub fn eval_expr(&mut self, expr: &Spanned<Expr>, stack: &ScopeStack) -> InterpResult<Value> {
        match &expr.node {
            Expr::Int(v) => Ok(Value::Int(*v)),
            Expr::Str(v) => Ok(Value::str(v.clone())),
            Expr::Bool(v) => Ok(Value::Bool(*v)),
            Expr::Nil => Ok(Value::Nil),
            Expr::Var(name) => {
                let thunk = stack.lookup(name).ok_or_else(|| {
                    HostError::at(
                        crate::error::ErrorKind::NameError,
                        expr.span,
                        format!("undefined variable \"{}\"", name),
                    )
                })?;
                self.force(&thunk)
            }
            Expr::Call { name, args } => self.eval_call(expr.span, name, args, stack),
            Expr::Unary(op, operand) => {
                let value = self.eval_expr(operand, stack)?;
                ops::eval_unary(*op, &value).map_err(Into::into)
            }
            Expr::Binary(op, lhs, rhs) => self.eval_binary(*op, lhs, rhs, stack),
        }
    }

    fn eval_binary(
        &mut self,
        op: BinOp,
        lhs: &Spanned<Expr>,
        rhs: &Spanned<Expr>,
        stack: &ScopeStack,
    ) -> InterpResult<Value> {
        // Short-circuit logical operators never evaluate the right operand
        // unless it can affect the result.
        match op {
            BinOp::And => {
                if !self.eval_bool(lhs, stack)? {
                    return Ok(Value::Bool(false));
                }
                return Ok(Value::Bool(self.eval_bool(rhs, stack)?));
            }
            BinOp::Or => {
                if self.eval_bool(lhs, stack)? {
                    return Ok(Value::Bool(true));
                }
                return Ok(Value::Bool(self.eval_bool(rhs, stack)?));
            }
            _ => {}
        }

        let lhs_val = self.eval_expr(lhs, stack)?;
        let rhs_val = self.eval_expr(rhs, stack)?;
        match ops::eval_binary(op, &lhs_val, &rhs_val)? {
            OpOutcome::Value(v) => Ok(v),
            OpOutcome::Raise(tag) => Err(InterpError::raising(tag)),
        }
    }

    fn eval_call(
        &mut self,
        span: crate::span::Span,
        name: &str,
        args: &[Spanned<Expr>],
        stack: &ScopeStack,
    ) -> InterpResult<Value> {
        if let Some(value) = crate::builtins::dispatch(self, name, args, stack, span)? {
            return Ok(value);
        }

        let func = self.registry.lookup(name, args.len())?;
        let thunks: Vec<ThunkRef> = args
            .iter()
            .map(|arg| env::unevaluated(arg.clone(), stack.clone()))
            .collect();
        self.call_function(&func, thunks)
    }

    /// Force a thunk to a value, memoizing the result in place so every
    /// holder of this `ThunkRef` observes the same forced value afterward.
    pub fn force(&mut self, thunk: &ThunkRef) -> InterpResult<Value> {
        let pending = {
            let inner = thunk.borrow();
            match &*inner {
                env::Thunk::Evaluated(v) => return Ok(v.clone()),
                env::Thunk::Uninitialized => None,
                env::Thunk::Unevaluated(expr, captured) => Some((expr.clone(), captured.clone())),
            }
        };
        match pending {
            None => Err(HostError::new(
                crate::error::ErrorKind::NameError,
                "variable used before being assigned a value",
            )
            .into()),
            Some((expr, captured)) => {
                let value = self.eval_expr(&expr, &captured)?;
                *thunk.borrow_mut() = env::Thunk::Evaluated(value.clone());
                Ok(value)
            }
        }
    }
}
