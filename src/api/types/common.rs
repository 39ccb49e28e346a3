use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const JSONRPC_VERSION: &str = "2.0";

#[derive(Debug, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub method: String,

    #[serde(default)]
    pub params: Value,
    #[serde(default)]
    pub id: Option<Value>,
}

impl JsonRpcRequest {
    pub fn has_valid_version(&self) -> bool {
        self.jsonrpc == JSONRPC_VERSION
    }

    /// Takes the params out of the request. Absent params read as `{}` so
    /// methods without arguments still deserialize.
    pub fn take_params(&mut self) -> Value {
        match self.params.take() {
            Value::Null => Value::Object(Map::new()),
            params => params,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct JsonRpcResponse<T: Serialize> {
    pub jsonrpc: &'static str,
    pub result: T,
    pub id: Option<Value>,
}

impl<T: Serialize> JsonRpcResponse<T> {
    pub fn new(result: T, id: Option<Value>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            result,
            id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_params_become_empty_object() {
        let mut request: JsonRpcRequest =
            serde_json::from_value(json!({ "jsonrpc": "2.0", "method": "ui.load" })).unwrap();

        assert!(request.has_valid_version());
        assert_eq!(request.take_params(), json!({}));
        assert_eq!(request.id, None);
    }
}
