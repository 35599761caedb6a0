//! LEN: string length in characters

use super::{Function, FunctionRegistry, FunctionSignature};
use crate::error::{Error, Result};
use crate::types::Value;

struct LenFunction;

impl Function for LenFunction {
    fn signature(&self) -> &FunctionSignature {
        static SIGNATURE: FunctionSignature = FunctionSignature {
            name: "LEN",
            min_args: 1,
            max_args: Some(1),
        };
        &SIGNATURE
    }

    fn execute(&self, args: &[Value]) -> Result<Value> {
        match &args[0] {
            Value::Varchar(s) => Ok(Value::Int(s.chars().count() as i64)),
            Value::Null => Ok(Value::Null),
            other => Err(Error::unpositioned(format!(
                "LEN expects a string, got {}",
                other.type_name()
            ))),
        }
    }
}

pub fn register(registry: &mut FunctionRegistry) {
    registry.register(Box::new(LenFunction));
}
