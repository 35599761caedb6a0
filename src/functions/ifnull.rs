//! IFNULL: the first argument unless it is Null, then the second

use super::{Function, FunctionRegistry, FunctionSignature};
use crate::error::Result;
use crate::types::Value;

struct IfNullFunction;

impl Function for IfNullFunction {
    fn signature(&self) -> &FunctionSignature {
        static SIGNATURE: FunctionSignature = FunctionSignature {
            name: "IFNULL",
            min_args: 2,
            max_args: Some(2),
        };
        &SIGNATURE
    }

    fn execute(&self, args: &[Value]) -> Result<Value> {
        if args[0].is_null() {
            return Ok(args[1].clone());
        }
        Ok(args[0].clone())
    }
}

pub fn register(registry: &mut FunctionRegistry) {
    registry.register(Box::new(IfNullFunction));
}
