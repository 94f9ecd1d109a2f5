//! The handful of functions that are not ordinary user definitions:
//! `print`, `inputi`, `inputs`. These are resolved before the user function
//! registry, so a program cannot shadow them by declaring its own overload.

use crate::ast::{Expr, Spanned};
use crate::env::ScopeStack;
use crate::error::{HostError, InterpError, InterpResult};
use crate::interp::Interpreter;
use crate::span::Span;
use crate::value::Value;

const MAX_INPUT_ARGS: usize = 1;

/// Returns `Ok(Some(value))` if `name` is a builtin and was handled,
/// `Ok(None)` if `name` is not a builtin (the caller should fall back to
/// the user function registry), or `Err` on a builtin-specific failure.
pub fn dispatch(
    interp: &mut Interpreter<'_>,
    name: &str,
    args: &[Spanned<Expr>],
    stack: &ScopeStack,
    span: Span,
) -> InterpResult<Option<Value>> {
    match name {
        "print" => Ok(Some(print(interp, args, stack)?)),
        "inputi" => Ok(Some(inputi(interp, args, stack, span)?)),
        "inputs" => Ok(Some(inputs(interp, args, stack, span)?)),
        _ => Ok(None),
    }
}

/// Concatenates the string form of every argument and writes one line to
/// the host. Always returns `nil`.
fn print(interp: &mut Interpreter<'_>, args: &[Spanned<Expr>], stack: &ScopeStack) -> InterpResult<Value> {
    let mut line = String::new();
    for arg in args {
        let value = interp.eval_expr(arg, stack)?;
        line.push_str(&value.to_string());
    }
    interp.host_mut().output(&line);
    Ok(Value::Nil)
}

/// Reads one line of input, optionally printing a prompt first, and parses
/// it as an integer. More than one argument is a fault, as is input that
/// does not parse as an integer.
fn inputi(
    interp: &mut Interpreter<'_>,
    args: &[Spanned<Expr>],
    stack: &ScopeStack,
    span: Span,
) -> InterpResult<Value> {
    let line = input_with_optional_prompt(interp, args, stack, span)?;
    line.trim().parse::<i64>().map(Value::Int).map_err(|_| {
        InterpError::from(HostError::at(
            crate::error::ErrorKind::TypeError,
            span,
            format!("inputi could not parse \"{}\" as an integer", line),
        ))
    })
}

/// Reads one line of input, optionally printing a prompt first, and returns
/// it verbatim as a string. More than one argument is a fault.
fn inputs(
    interp: &mut Interpreter<'_>,
    args: &[Spanned<Expr>],
    stack: &ScopeStack,
    span: Span,
) -> InterpResult<Value> {
    let line = input_with_optional_prompt(interp, args, stack, span)?;
    Ok(Value::str(line))
}

fn input_with_optional_prompt(
    interp: &mut Interpreter<'_>,
    args: &[Spanned<Expr>],
    stack: &ScopeStack,
    span: Span,
) -> InterpResult<String> {
    if args.len() > MAX_INPUT_ARGS {
        return Err(HostError::at(
            crate::error::ErrorKind::NameError,
            span,
            format!(
                "input functions take at most {} argument(s), got {}",
                MAX_INPUT_ARGS,
                args.len()
            ),
        )
        .into());
    }
    if let Some(prompt) = args.first() {
        let value = interp.eval_expr(prompt, stack)?;
        interp.host_mut().output(&value.to_string());
    }
    interp.host_mut().get_input().map_err(|e| {
        InterpError::from(HostError::at(
            crate::error::ErrorKind::FaultError,
            span,
            format!("failed to read input: {}", e),
        ))
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::ast::build::*;
    use crate::host::ScriptedHost;
    use crate::registry::FunctionRegistry;

    fn interp_with<'h>(host: &'h mut ScriptedHost) -> Interpreter<'h> {
        Interpreter::new(FunctionRegistry::from_program(&crate::ast::Program { functions: vec![] }), host)
    }

    #[test]
    fn print_concatenates_arguments() {
        let mut host = ScriptedHost::default();
        {
            let mut interp = interp_with(&mut host);
            let stack = ScopeStack::new();
            print(&mut interp, &[string("x = "), int(5)], &stack).unwrap();
        }
        assert_eq!(host.output_lines, vec!["x = 5".to_string()]);
    }

    #[test]
    fn inputi_parses_integer_after_prompt() {
        let mut host = ScriptedHost::with_input(vec!["42"]);
        let value = {
            let mut interp = interp_with(&mut host);
            let stack = ScopeStack::new();
            inputi(&mut interp, &[string("gimme: ")], &stack, Span::none()).unwrap()
        };
        assert_eq!(value, Value::Int(42));
        assert_eq!(host.output_lines, vec!["gimme: ".to_string()]);
    }

    #[test]
    fn inputi_rejects_non_integer_input() {
        let mut host = ScriptedHost::with_input(vec!["not a number"]);
        let mut interp = interp_with(&mut host);
        let stack = ScopeStack::new();
        let err = inputi(&mut interp, &[], &stack, Span::none()).unwrap_err();
        match err {
            InterpError::Host(e) => assert_eq!(e.kind, crate::error::ErrorKind::TypeError),
            _ => panic!("expected a host error"),
        }
    }

    #[test]
    fn inputs_returns_raw_line() {
        let mut host = ScriptedHost::with_input(vec!["hello world"]);
        let value = {
            let mut interp = interp_with(&mut host);
            let stack = ScopeStack::new();
            inputs(&mut interp, &[], &stack, Span::none()).unwrap()
        };
        assert_eq!(value, Value::str("hello world"));
    }

    #[test]
    fn too_many_input_arguments_is_rejected() {
        let mut host = ScriptedHost::default();
        let mut interp = interp_with(&mut host);
        let stack = ScopeStack::new();
        let err = inputi(&mut interp, &[string("a"), string("b")], &stack, Span::none()).unwrap_err();
        match err {
            InterpError::Host(e) => assert_eq!(e.kind, crate::error::ErrorKind::NameError),
            _ => panic!("expected a host error"),
        }
    }
}
