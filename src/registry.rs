//! Function lookup by name *and* arity: this language allows overloading a
//! name with multiple definitions as long as their parameter counts differ.

use std::collections::HashMap;
use std::rc::Rc;

use crate::ast::{FuncDef, Program};
use crate::error::HostError;

#[derive(Debug, Default)]
pub struct FunctionRegistry {
    by_name: HashMap<String, Vec<Rc<FuncDef>>>,
}

impl FunctionRegistry {
    pub fn from_program(program: &Program) -> Self {
        let mut by_name: HashMap<String, Vec<Rc<FuncDef>>> = HashMap::new();
        for func in &program.functions {
            by_name.entry(func.name.clone()).or_default().push(func.clone());
        }
        Self { by_name }
    }

    /// Find the overload of `name` taking exactly `arity` arguments.
    pub fn lookup(&self, name: &str, arity: usize) -> Result<Rc<FuncDef>, HostError> {
        let overloads = self
            .by_name
            .get(name)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| HostError::name(format!("undefined function \"{}\"", name)))?;

        overloads
            .iter()
            .find(|f| f.params.len() == arity)
            .cloned()
            .ok_or_else(|| {
                HostError::name(format!(
                    "no overload of \"{}\" takes {} argument(s)",
                    name, arity
                ))
            })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::ast::build::func;

    #[test]
    fn resolves_overload_by_arity() {
        let program = Program {
            functions: vec![
                func("f", vec![], vec![]),
                func("f", vec!["a"], vec![]),
                func("f", vec!["a", "b"], vec![]),
            ],
        };
        let registry = FunctionRegistry::from_program(&program);
        assert_eq!(registry.lookup("f", 0).unwrap().params.len(), 0);
        assert_eq!(registry.lookup("f", 1).unwrap().params.len(), 1);
        assert_eq!(registry.lookup("f", 2).unwrap().params.len(), 2);
        assert!(registry.lookup("f", 3).is_err());
    }

    #[test]
    fn unknown_name_is_a_name_error() {
        let registry = FunctionRegistry::from_program(&Program { functions: vec![] });
        let err = registry.lookup("nope", 0).unwrap_err();
        assert_eq!(err.kind, crate::error::ErrorKind::NameError);
    }
}
