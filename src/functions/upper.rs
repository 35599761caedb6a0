//! UPPER: converts a string to uppercase

use super::{Function, FunctionRegistry, FunctionSignature};
use crate::error::{Error, Result};
use crate::types::Value;

struct UpperFunction;

impl Function for UpperFunction {
    fn signature(&self) -> &FunctionSignature {
        static SIGNATURE: FunctionSignature = FunctionSignature {
            name: "UPPER",
            min_args: 1,
            max_args: Some(1),
        };
        &SIGNATURE
    }

    fn execute(&self, args: &[Value]) -> Result<Value> {
        match &args[0] {
            Value::Varchar(s) => Ok(Value::Varchar(s.to_uppercase())),
            Value::Null => Ok(Value::Null),
            other => Err(Error::unpositioned(format!(
                "UPPER expects a string, got {}",
                other.type_name()
            ))),
        }
    }
}

pub fn register(registry: &mut FunctionRegistry) {
    registry.register(Box::new(UpperFunction));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uppercases() {
        let f = UpperFunction;
        assert_eq!(
            f.execute(&[Value::Varchar("hello".into())]).unwrap(),
            Value::Varchar("HELLO".into())
        );
        assert_eq!(f.execute(&[Value::Null]).unwrap(), Value::Null);
        assert!(f.execute(&[Value::Int(1)]).is_err());
    }
}
