//! SUBSTR: substring with a 1-based start and optional length

use super::{Function, FunctionRegistry, FunctionSignature};
use crate::error::{Error, Result};
use crate::types::Value;

struct SubstrFunction;

impl Function for SubstrFunction {
    fn signature(&self) -> &FunctionSignature {
        static SIGNATURE: FunctionSignature = FunctionSignature {
            name: "SUBSTR",
            min_args: 2,
            max_args: Some(3),
        };
        &SIGNATURE
    }

    fn execute(&self, args: &[Value]) -> Result<Value> {
        let Value::Varchar(s) = &args[0] else {
            if args[0].is_null() {
                return Ok(Value::Null);
            }
            return Err(Error::unpositioned(format!(
                "SUBSTR expects a string, got {}",
                args[0].type_name()
            )));
        };
        let chars: Vec<char> = s.chars().collect();
        let start = (args[1].to_int()?.max(1) as usize - 1).min(chars.len());
        let end = match args.get(2) {
            Some(length) => (start + length.to_int()?.max(0) as usize).min(chars.len()),
            None => chars.len(),
        };
        Ok(Value::Varchar(chars[start..end].iter().collect()))
    }
}

pub fn register(registry: &mut FunctionRegistry) {
    registry.register(Box::new(SubstrFunction));
}
