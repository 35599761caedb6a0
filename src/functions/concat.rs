//! CONCAT: concatenates the textual forms of its arguments; Null if any
//! argument is Null

use super::{Function, FunctionRegistry, FunctionSignature};
use crate::error::Result;
use crate::types::Value;

struct ConcatFunction;

impl Function for ConcatFunction {
    fn signature(&self) -> &FunctionSignature {
        static SIGNATURE: FunctionSignature = FunctionSignature {
            name: "CONCAT",
            min_args: 1,
            max_args: None,
        };
        &SIGNATURE
    }

    fn execute(&self, args: &[Value]) -> Result<Value> {
        let mut out = String::new();
        for arg in args {
            if arg.is_null() {
                return Ok(Value::Null);
            }
            out.push_str(&arg.to_text()?);
        }
        Ok(Value::Varchar(out))
    }
}

pub fn register(registry: &mut FunctionRegistry) {
    registry.register(Box::new(ConcatFunction));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn concatenates_mixed_types() {
        let f = ConcatFunction;
        assert_eq!(
            f.execute(&[Value::Varchar("a".into()), Value::Int(1)]).unwrap(),
            Value::Varchar("a1".into())
        );
        assert_eq!(
            f.execute(&[Value::Varchar("a".into()), Value::Null]).unwrap(),
            Value::Null
        );
    }
}
