// brewin-core -- a tree-walking evaluator for the Brewin teaching language
// Copyright (C) 2026  The brewin-core Authors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! Error model: the fatal `HostError` kinds a program can trigger, plus the
//! `Unwind` carrier used for the two non-local control transfers (`return`
//! and `raise`/`try`) that are *not* errors.

use std::fmt;
use std::rc::Rc;

use snafu::Snafu;

use crate::env::ThunkRef;
use crate::span::Span;

/// The three host error kinds a Brewin program can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NameError,
    TypeError,
    FaultError,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::NameError => write!(f, "NAME_ERROR"),
            ErrorKind::TypeError => write!(f, "TYPE_ERROR"),
            ErrorKind::FaultError => write!(f, "FAULT_ERROR"),
        }
    }
}

/// A fatal host error: unknown identifier, arity mismatch, type mismatch,
/// redeclaration, or an uncaught exception escaping `main`.
///
/// A host callback that "terminates the run" on one of these conditions is
/// expressed in Rust as simply returning this as an `Err`.
#[derive(Debug, Snafu, Clone, PartialEq)]
#[snafu(display("{}: {}", kind, message))]
pub struct HostError {
    pub kind: ErrorKind,
    pub message: String,
    pub span: Option<Span>,
}

impl HostError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            span: None,
        }
    }

    pub fn at(kind: ErrorKind, span: Span, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            span: Some(span),
        }
    }

    pub fn name(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NameError, message)
    }

    pub fn type_error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TypeError, message)
    }

    pub fn fault(tag: &str) -> Self {
        Self::new(
            ErrorKind::FaultError,
            format!("uncaught exception of type \"{}\"", tag),
        )
    }
}

/// The two non-local control transfers the evaluator performs. Neither is an
/// error: `Return` is caught by the nearest function-call frame, `Raise` by
/// the nearest matching `try`/`catch`, or — failing that — converted into a
/// `HostError::fault` at the driver boundary.
#[derive(Debug, Clone)]
pub enum Unwind {
    Return(ThunkRef),
    Raise(Rc<str>),
}

/// Every fallible evaluator operation returns one of: a plain value, a
/// non-local control transfer in flight, or a fatal host error.
#[derive(Debug, Clone)]
pub enum InterpError {
    Unwind(Unwind),
    Host(HostError),
}

impl From<HostError> for InterpError {
    fn from(e: HostError) -> Self {
        InterpError::Host(e)
    }
}

pub type InterpResult<T> = Result<T, InterpError>;

impl InterpError {
    pub fn returning(thunk: ThunkRef) -> Self {
        InterpError::Unwind(Unwind::Return(thunk))
    }

    pub fn raising(tag: impl Into<Rc<str>>) -> Self {
        InterpError::Unwind(Unwind::Raise(tag.into()))
    }
}
