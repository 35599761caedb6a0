//! TRIM: strips leading and trailing whitespace

use super::{Function, FunctionRegistry, FunctionSignature};
use crate::error::{Error, Result};
use crate::types::Value;

struct TrimFunction;

impl Function for TrimFunction {
    fn signature(&self) -> &FunctionSignature {
        static SIGNATURE: FunctionSignature = FunctionSignature {
            name: "TRIM",
            min_args: 1,
            max_args: Some(1),
        };
        &SIGNATURE
    }

    fn execute(&self, args: &[Value]) -> Result<Value> {
        match &args[0] {
            Value::Varchar(s) => Ok(Value::Varchar(s.trim().to_string())),
            Value::Null => Ok(Value::Null),
            other => Err(Error::unpositioned(format!(
                "TRIM expects a string, got {}",
                other.type_name()
            ))),
        }
    }
}

pub fn register(registry: &mut FunctionRegistry) {
    registry.register(Box::new(TrimFunction));
}
