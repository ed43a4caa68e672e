//! Text form of application paths, parsed with PEST.
//!
//! The grammar (`path.pest`) accepts exactly what `Display for AppPath` prints, with
//! case-insensitive keywords and `0x` hex numbers also allowed. Logical fields must
//! appear in wire order.

use crate::path::{AppPath, LogicalField, LogicalPath, SymbolicPath};
use crate::symbol::Symbol;
use pest::Parser;
use pest_derive::Parser as PestParser;
use std::str::FromStr;

#[derive(PestParser)]
#[grammar = "path.pest"]
struct PathParser;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("path syntax: {0}")]
pub struct PathSyntaxError(pub String);

fn syntax(msg: impl Into<String>) -> PathSyntaxError {
    PathSyntaxError(msg.into())
}

/// Parse a text path such as `Class:4 Instance:1` or `Tag:Motor[2] ConnPt:1`.
pub fn parse_app_path(source: &str) -> Result<AppPath, PathSyntaxError> {
    let pairs = PathParser::parse(Rule::app_path, source).map_err(|e| syntax(e.to_string()))?;
    let app = pairs.into_iter().next().ok_or_else(|| syntax("empty parse"))?;
    for inner in app.into_inner() {
        match inner.as_rule() {
            Rule::symbolic_path => return build_symbolic(inner).map(AppPath::Symbolic),
            Rule::logical_path => return build_logical(inner).map(AppPath::Logical),
            _ => {}
        }
    }
    Err(syntax("no path"))
}

fn parse_number(text: &str) -> Result<u32, PathSyntaxError> {
    let parsed = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => text.parse::<u32>(),
    };
    parsed.map_err(|e| syntax(format!("number {}: {}", text, e)))
}

fn item_number(pair: pest::iterators::Pair<Rule>) -> Result<u32, PathSyntaxError> {
    let number = pair
        .into_inner()
        .find(|p| p.as_rule() == Rule::number)
        .ok_or_else(|| syntax("missing number"))?;
    parse_number(number.as_str())
}

fn build_logical(pair: pest::iterators::Pair<Rule>) -> Result<LogicalPath, PathSyntaxError> {
    let mut path = LogicalPath::new();
    for item in pair.into_inner() {
        let field = match item.as_rule() {
            Rule::class_item => LogicalField::Class,
            Rule::instance_item => LogicalField::Instance,
            Rule::attribute_item => LogicalField::Attribute,
            Rule::conn_pt_item => LogicalField::ConnPt,
            other => return Err(syntax(format!("unexpected {:?}", other))),
        };
        path.set(field, item_number(item)?);
    }
    Ok(path)
}

fn build_symbolic(pair: pest::iterators::Pair<Rule>) -> Result<SymbolicPath, PathSyntaxError> {
    let mut inner = pair.into_inner();
    let name = inner
        .find(|p| p.as_rule() == Rule::tag_name)
        .ok_or_else(|| syntax("missing tag name"))?;
    let tag = Symbol::new(name.as_str()).map_err(|e| syntax(e.to_string()))?;
    let mut path = SymbolicPath::new(tag);
    for part in inner {
        match part.as_rule() {
            Rule::member => {
                let value = item_number(part)?;
                path.push_member(value).map_err(|e| syntax(e.to_string()))?;
            }
            Rule::conn_pt_item => path.set_conn_pt(Some(item_number(part)?)),
            other => return Err(syntax(format!("unexpected {:?}", other))),
        }
    }
    Ok(path)
}

impl FromStr for AppPath {
    type Err = PathSyntaxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_app_path(s)
    }
}
