// brewin-core -- a tree-walking evaluator for the Brewin teaching language
// Copyright (C) 2026  The brewin-core Authors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! Top-level entry points: turn a `Program` (or source text, via a supplied
//! parser) into a completed run against a `Host`.

use log::info;

use crate::ast::Program;
use crate::error::{ErrorKind, HostError, InterpError, Unwind};
use crate::host::{Host, Parser};
use crate::interp::Interpreter;
use crate::registry::FunctionRegistry;

const ENTRY_POINT: &str = "main";

/// Runs `program`'s zero-argument `main` function against `host`.
///
/// Returns `Ok(())` on a normal (or `return`-terminated) completion of
/// `main`. An exception that escapes every `try`/`catch` in the program is
/// reported as a `FaultError`, matching the source language's behavior of
/// treating an unhandled user exception as fatal.
pub fn run(program: &Program, host: &mut dyn Host) -> Result<(), HostError> {
    let registry = FunctionRegistry::from_program(program);
    let main = registry.lookup(ENTRY_POINT, 0)?;

    info!("running program with {} function(s)", program.functions.len());
    let mut interp = Interpreter::new(registry, host);
    match interp.call_function(&main, vec![]) {
        Ok(_) => Ok(()),
        Err(InterpError::Host(err)) => Err(err),
        Err(InterpError::Unwind(Unwind::Raise(tag))) => Err(HostError::fault(&tag)),
        Err(InterpError::Unwind(Unwind::Return(_))) => {
            // A `return` at the top of `main` is a normal completion, not
            // an error; `call_function` already resolves it to a value.
            unreachable!("call_function resolves Return before returning")
        }
    }
}

/// Parses `source` with `parser` and runs the resulting program.
pub fn run_source(source: &str, parser: &dyn Parser, host: &mut dyn Host) -> Result<(), HostError> {
    let program = parser.parse(source).map_err(|e| {
        HostError::new(ErrorKind::FaultError, format!("parse error: {}", e))
    })?;
    run(&program, host)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::ast::build::*;
    use crate::host::ScriptedHost;

    #[test]
    fn runs_main_and_reports_fault_on_uncaught_raise() {
        let program = Program {
            functions: vec![func("main", vec![], vec![raise_stmt(string("boom"))])],
        };
        let mut host = ScriptedHost::default();
        let err = run(&program, &mut host).unwrap_err();
        assert_eq!(err.kind, ErrorKind::FaultError);
    }

    #[test]
    fn missing_main_is_a_name_error() {
        let program = Program { functions: vec![] };
        let mut host = ScriptedHost::default();
        let err = run(&program, &mut host).unwrap_err();
        assert_eq!(err.kind, ErrorKind::NameError);
    }

    #[test]
    fn normal_completion_prints_and_returns_ok() {
        let program = Program {
            functions: vec![func(
                "main",
                vec![],
                vec![call_stmt("print", vec![string("hello")])],
            )],
        };
        let mut host = ScriptedHost::default();
        run(&program, &mut host).unwrap();
        assert_eq!(host.output_lines, vec!["hello".to_string()]);
    }
}
