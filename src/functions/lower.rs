//! LOWER: converts a string to lowercase

use super::{Function, FunctionRegistry, FunctionSignature};
use crate::error::{Error, Result};
use crate::types::Value;

struct LowerFunction;

impl Function for LowerFunction {
    fn signature(&self) -> &FunctionSignature {
        static SIGNATURE: FunctionSignature = FunctionSignature {
            name: "LOWER",
            min_args: 1,
            max_args: Some(1),
        };
        &SIGNATURE
    }

    fn execute(&self, args: &[Value]) -> Result<Value> {
        match &args[0] {
            Value::Varchar(s) => Ok(Value::Varchar(s.to_lowercase())),
            Value::Null => Ok(Value::Null),
            other => Err(Error::unpositioned(format!(
                "LOWER expects a string, got {}",
                other.type_name()
            ))),
        }
    }
}

pub fn register(registry: &mut FunctionRegistry) {
    registry.register(Box::new(LowerFunction));
}
