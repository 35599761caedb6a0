//! COALESCE: the first non-null argument

use super::{Function, FunctionRegistry, FunctionSignature};
use crate::error::Result;
use crate::types::Value;

struct CoalesceFunction;

impl Function for CoalesceFunction {
    fn signature(&self) -> &FunctionSignature {
        static SIGNATURE: FunctionSignature = FunctionSignature {
            name: "COALESCE",
            min_args: 1,
            max_args: None,
        };
        &SIGNATURE
    }

    fn execute(&self, args: &[Value]) -> Result<Value> {
        for arg in args {
            if !arg.is_null() {
                return Ok(arg.clone());
            }
        }
        Ok(Value::Null)
    }
}

pub fn register(registry: &mut FunctionRegistry) {
    registry.register(Box::new(CoalesceFunction));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_non_null_wins() {
        let f = CoalesceFunction;
        assert_eq!(
            f.execute(&[Value::Null, Value::Int(2), Value::Int(3)]).unwrap(),
            Value::Int(2)
        );
        assert_eq!(f.execute(&[Value::Null, Value::Null]).unwrap(), Value::Null);
    }
}
