//! ROUND: rounds to the nearest integer, keeping the numeric type

use super::{Function, FunctionRegistry, FunctionSignature};
use crate::error::{Error, Result};
use crate::types::Value;

struct RoundFunction;

impl Function for RoundFunction {
    fn signature(&self) -> &FunctionSignature {
        static SIGNATURE: FunctionSignature = FunctionSignature {
            name: "ROUND",
            min_args: 1,
            max_args: Some(1),
        };
        &SIGNATURE
    }

    fn execute(&self, args: &[Value]) -> Result<Value> {
        match &args[0] {
            Value::Int(i) => Ok(Value::Int(*i)),
            Value::Float(f) => Ok(Value::Float(f.round())),
            Value::Null => Ok(Value::Null),
            other => Err(Error::unpositioned(format!(
                "ROUND expects a number, got {}",
                other.type_name()
            ))),
        }
    }
}

pub fn register(registry: &mut FunctionRegistry) {
    registry.register(Box::new(RoundFunction));
}
