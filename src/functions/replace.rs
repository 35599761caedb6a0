//! REPLACE: replaces every occurrence of a substring

use super::{Function, FunctionRegistry, FunctionSignature};
use crate::error::{Error, Result};
use crate::types::Value;

struct ReplaceFunction;

impl Function for ReplaceFunction {
    fn signature(&self) -> &FunctionSignature {
        static SIGNATURE: FunctionSignature = FunctionSignature {
            name: "REPLACE",
            min_args: 3,
            max_args: Some(3),
        };
        &SIGNATURE
    }

    fn execute(&self, args: &[Value]) -> Result<Value> {
        if args.iter().any(Value::is_null) {
            return Ok(Value::Null);
        }
        let (Value::Varchar(s), Value::Varchar(from), Value::Varchar(to)) =
            (&args[0], &args[1], &args[2])
        else {
            return Err(Error::unpositioned("REPLACE expects three strings"));
        };
        Ok(Value::Varchar(s.replace(from.as_str(), to)))
    }
}

pub fn register(registry: &mut FunctionRegistry) {
    registry.register(Box::new(ReplaceFunction));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_all_occurrences() {
        let f = ReplaceFunction;
        assert_eq!(
            f.execute(&[
                Value::Varchar("a-b-c".into()),
                Value::Varchar("-".into()),
                Value::Varchar("+".into()),
            ])
            .unwrap(),
            Value::Varchar("a+b+c".into())
        );
    }
}
