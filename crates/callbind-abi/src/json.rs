//! JSON ABI descriptions of parameters and functions

use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::types::{ParamType, TupleField};

/// A parameter as it appears in a JSON ABI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbiParam {
    /// Parameter name, may be empty
    #[serde(default)]
    pub name: String,
    /// Type string; tuples are written `tuple`, `tuple[]`, `tuple[2]`
    #[serde(rename = "type")]
    pub kind: String,
    /// Tuple components
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<AbiParam>,
}

impl AbiParam {
    /// Describe a parameter of the given type
    pub fn new(name: impl Into<String>, kind: &ParamType) -> Self {
        let components = kind
            .components()
            .map(|fields| {
                fields
                    .iter()
                    .map(|f| AbiParam::new(f.name.clone(), &f.kind))
                    .collect()
            })
            .unwrap_or_default();
        Self {
            name: name.into(),
            kind: kind.type_name(),
            components,
        }
    }

    /// Parse the described type back
    pub fn param_type(&self) -> Result<ParamType, TypeError> {
        let (base, suffixes) = split_array_suffixes(&self.kind)?;
        let mut kind = if base == "tuple" {
            let fields = self
                .components
                .iter()
                .map(|c| Ok(TupleField::new(c.name.clone(), c.param_type()?)))
                .collect::<Result<Vec<_>, TypeError>>()?;
            ParamType::Tuple(fields)
        } else {
            parse_type(base)?
        };
        for size in suffixes {
            kind = match size {
                Some(size) => ParamType::FixedArray(Box::new(kind), size),
                None => ParamType::Array(Box::new(kind)),
            };
        }
        Ok(kind)
    }
}

/// A function entry of a JSON ABI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionFragment {
    /// Always `function`
    #[serde(rename = "type")]
    pub kind: String,
    /// Method name
    pub name: String,
    /// Inputs in order
    pub inputs: Vec<AbiParam>,
    /// Outputs in order
    pub outputs: Vec<AbiParam>,
    /// Mutability, `nonpayable` unless known otherwise
    pub state_mutability: String,
}

impl FunctionFragment {
    /// Describe a method with unnamed inputs and an optional output.
    ///
    /// A tuple output is listed as its components, matching how such
    /// methods return their values.
    pub fn new(name: &str, inputs: &[ParamType], output: Option<&ParamType>) -> Self {
        let inputs = inputs
            .iter()
            .enumerate()
            .map(|(idx, kind)| AbiParam::new(format!("arg{idx}"), kind))
            .collect();
        let outputs = match output {
            Some(ParamType::Tuple(fields)) => fields
                .iter()
                .map(|f| AbiParam::new(f.name.clone(), &f.kind))
                .collect(),
            Some(kind) => vec![AbiParam::new("", kind)],
            None => Vec::new(),
        };
        Self {
            kind: "function".to_string(),
            name: name.to_string(),
            inputs,
            outputs,
            state_mutability: "nonpayable".to_string(),
        }
    }

    /// Render as JSON
    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}

/// Split `uint256[2][]` into `uint256` and the array dimensions, innermost
/// first. `None` is a dynamic dimension.
fn split_array_suffixes(s: &str) -> Result<(&str, Vec<Option<usize>>), TypeError> {
    let mut rest = s.trim();
    let mut suffixes = Vec::new();
    while let Some(stripped) = rest.strip_suffix(']') {
        let open = stripped
            .rfind('[')
            .ok_or_else(|| TypeError::Unsupported(s.to_string()))?;
        let size = &stripped[open + 1..];
        suffixes.push(if size.is_empty() {
            None
        } else {
            Some(size.parse().map_err(|_| TypeError::Unsupported(s.to_string()))?)
        });
        rest = &stripped[..open];
    }
    suffixes.reverse();
    Ok((rest, suffixes))
}

/// Parse an elementary type string (e.g., "uint256", "address", "bytes32")
pub fn parse_type(s: &str) -> Result<ParamType, TypeError> {
    let s = s.trim();

    match s {
        "address" => return Ok(ParamType::Address),
        "bool" => return Ok(ParamType::Bool),
        "string" => return Ok(ParamType::String),
        "bytes" => return Ok(ParamType::Bytes),
        _ => {}
    }

    // uint<N>
    if let Some(rest) = s.strip_prefix("uint") {
        return Ok(ParamType::Uint(parse_width(rest, s)?));
    }

    // int<N>
    if let Some(rest) = s.strip_prefix("int") {
        return Ok(ParamType::Int(parse_width(rest, s)?));
    }

    // bytes<N>
    if let Some(rest) = s.strip_prefix("bytes") {
        let size: usize = rest
            .parse()
            .map_err(|_| TypeError::Unsupported(s.to_string()))?;
        if !(1..=32).contains(&size) {
            return Err(TypeError::ByteArrayLength(size));
        }
        return Ok(ParamType::FixedBytes(size));
    }

    Err(TypeError::Unsupported(s.to_string()))
}

fn parse_width(rest: &str, s: &str) -> Result<usize, TypeError> {
    if rest.is_empty() {
        return Ok(256);
    }
    let bits: usize = rest
        .parse()
        .map_err(|_| TypeError::Unsupported(s.to_string()))?;
    if bits == 0 || bits > 256 || bits % 8 != 0 {
        return Err(TypeError::InvalidIntegerWidth(bits));
    }
    Ok(bits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn pair() -> ParamType {
        ParamType::Tuple(vec![
            TupleField::new("a", ParamType::Uint(128)),
            TupleField::new("b", ParamType::Int(128)),
        ])
    }

    #[test]
    fn test_parse_elementary() {
        assert_eq!(parse_type("address").unwrap(), ParamType::Address);
        assert_eq!(parse_type("uint").unwrap(), ParamType::Uint(256));
        assert_eq!(parse_type("int64").unwrap(), ParamType::Int(64));
        assert_eq!(parse_type("bytes32").unwrap(), ParamType::FixedBytes(32));
        assert!(parse_type("bytes33").is_err());
        assert!(parse_type("uint7").is_err());
        assert!(parse_type("mapping").is_err());
    }

    #[test]
    fn test_tuple_array_param_json() {
        let kind = ParamType::FixedArray(Box::new(pair()), 3);
        let param = AbiParam::new("items", &kind);
        assert_eq!(
            serde_json::to_value(&param).unwrap(),
            json!({
                "name": "items",
                "type": "tuple[3]",
                "components": [
                    {"name": "a", "type": "uint128"},
                    {"name": "b", "type": "int128"}
                ]
            })
        );
        assert_eq!(param.param_type().unwrap(), kind);
    }

    #[test]
    fn test_nested_array_suffixes() {
        let param = AbiParam {
            name: String::new(),
            kind: "uint8[2][]".to_string(),
            components: vec![],
        };
        assert_eq!(
            param.param_type().unwrap(),
            ParamType::Array(Box::new(ParamType::FixedArray(
                Box::new(ParamType::Uint(8)),
                2
            )))
        );
    }

    #[test]
    fn test_function_fragment() {
        let output = ParamType::Tuple(vec![
            TupleField::new("gameType", ParamType::Uint(32)),
            TupleField::new("rootClaim", ParamType::FixedBytes(32)),
        ]);
        let fragment = FunctionFragment::new("gameData", &[], Some(&output));
        let value = fragment.to_json().unwrap();
        assert_eq!(value["type"], "function");
        assert_eq!(value["stateMutability"], "nonpayable");
        assert_eq!(value["outputs"][1]["name"], "rootClaim");
        assert_eq!(value["inputs"], json!([]));

        let parsed: FunctionFragment = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, fragment);
    }
}
