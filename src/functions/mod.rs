//! Builtin scalar functions
//!
//! Function calls dispatch by name (case-insensitively) to this registry.
//! Aggregates are not functions in this sense; they are AST nodes handled
//! by the SELECT executor.

use crate::error::{Error, Result};
use crate::types::Value;
use std::collections::HashMap;
use std::sync::LazyLock;

mod abs;
mod coalesce;
mod concat;
mod ifnull;
mod len;
mod lower;
mod replace;
mod round;
mod substr;
mod trim;
mod upper;

/// Metadata about a function's name and arity.
#[derive(Debug, Clone)]
pub struct FunctionSignature {
    pub name: &'static str,
    pub min_args: usize,
    /// None for variadic functions.
    pub max_args: Option<usize>,
}

/// A builtin scalar function.
pub trait Function: Send + Sync {
    fn signature(&self) -> &FunctionSignature;

    /// Executes the function over already-evaluated arguments.
    fn execute(&self, args: &[Value]) -> Result<Value>;
}

pub struct FunctionRegistry {
    functions: HashMap<&'static str, Box<dyn Function>>,
}

impl FunctionRegistry {
    fn new() -> Self {
        let mut registry = FunctionRegistry {
            functions: HashMap::new(),
        };

        // String functions
        upper::register(&mut registry);
        lower::register(&mut registry);
        len::register(&mut registry);
        concat::register(&mut registry);
        substr::register(&mut registry);
        trim::register(&mut registry);
        replace::register(&mut registry);

        // Math functions
        abs::register(&mut registry);
        round::register(&mut registry);

        // Null handling
        coalesce::register(&mut registry);
        ifnull::register(&mut registry);

        registry
    }

    fn register(&mut self, function: Box<dyn Function>) {
        self.functions.insert(function.signature().name, function);
    }
}

static REGISTRY: LazyLock<FunctionRegistry> = LazyLock::new(FunctionRegistry::new);

/// Looks up a function by name, case-insensitively.
pub fn get_function(name: &str) -> Option<&'static dyn Function> {
    REGISTRY
        .functions
        .get(name.to_uppercase().as_str())
        .map(|f| f.as_ref())
}

/// Executes a function over evaluated arguments, validating arity.
pub fn execute_function(name: &str, args: &[Value]) -> Result<Value> {
    let Some(function) = get_function(name) else {
        return Err(Error::unpositioned(format!("Unknown function: {}", name)));
    };
    let signature = function.signature();
    if args.len() < signature.min_args
        || signature.max_args.is_some_and(|max| args.len() > max)
    {
        let arity = match signature.max_args {
            Some(max) if max == signature.min_args => format!("exactly {}", max),
            Some(max) => format!("{} to {}", signature.min_args, max),
            None => format!("at least {}", signature.min_args),
        };
        return Err(Error::unpositioned(format!(
            "{} takes {} argument(s), got {}",
            signature.name,
            arity,
            args.len()
        )));
    }
    function.execute(args)
}
