use serde_json::Value;
use tabled::Table;

use crate::{
    tools::{self, ParamSpec, ToolSpec},
    types::ToolTableRow,
};

pub fn list_tools(as_json: bool) {
    if as_json {
        let schemas: Vec<Value> = tools::all().iter().map(ToolSpec::describe).collect();
        println!("{:#}", Value::Array(schemas));
        return;
    }

    let table_rows: Vec<ToolTableRow> = tools::all()
        .iter()
        .map(|tool| ToolTableRow {
            name: tool.name.to_string(),
            parameters: tool
                .params
                .iter()
                .map(describe_param)
                .collect::<Vec<_>>()
                .join(", "),
            endpoint: format!("GET {}", tool.endpoint),
        })
        .collect();

    let table = Table::new(table_rows);
    println!("{}", table);
}

// required params are starred, optional ones show their default
fn describe_param(param: &ParamSpec) -> String {
    match (param.required, param.default) {
        (true, _) => format!("{}*", param.name),
        (false, Some(default)) => format!("{}={}", param.name, default),
        (false, None) => param.name.to_string(),
    }
}
