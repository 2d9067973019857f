//! Pest grammar parser for session scripts

use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;

use super::ast::{Script, ShowTarget, Statement};
use crate::error::{DockError, Result};

#[derive(Parser)]
#[grammar = "../grammar/session.pest"]
pub struct SessionParser;

/// Parse a whole script
pub fn parse_script(input: &str) -> Result<Script> {
    let pairs = SessionParser::parse(Rule::script, input)
        .map_err(|e| DockError::ParseError(e.to_string()))?;

    let pair = pairs
        .into_iter()
        .next()
        .ok_or_else(|| DockError::ParseError("Empty script".to_string()))?;

    let mut statements = Vec::new();
    for inner in pair.into_inner() {
        if inner.as_rule() == Rule::statement {
            statements.push(parse_statement(inner)?);
        }
    }

    Ok(Script { statements })
}

/// Parse a single statement, e.g. one line typed at a prompt
pub fn parse_statement_line(input: &str) -> Result<Statement> {
    let mut script = parse_script(input)?;
    match script.statements.len() {
        1 => Ok(script.statements.remove(0)),
        0 => Err(DockError::ParseError("Expected a statement".to_string())),
        n => Err(DockError::ParseError(format!("Expected one statement, found {}", n))),
    }
}

fn parse_statement(pair: Pair<Rule>) -> Result<Statement> {
    let inner = first(pair, "statement")?;
    let rule = inner.as_rule();
    let mut parts = inner.into_inner();

    match rule {
        Rule::start_stmt => Ok(Statement::Start(ident(&mut parts)?)),
        Rule::stop_stmt => Ok(Statement::Stop(ident(&mut parts)?)),
        Rule::submit_stmt => Ok(Statement::Submit(ident(&mut parts)?)),
        Rule::input_stmt => Ok(Statement::Input {
            id: ident(&mut parts)?,
            text: string(&mut parts)?,
        }),
        Rule::exec_stmt => Ok(Statement::Exec {
            id: ident(&mut parts)?,
            command: string(&mut parts)?,
        }),
        Rule::send_stmt => {
            let from = ident(&mut parts)?;
            let to = ident(&mut parts)?;
            let kind = next(&mut parts, "message kind")?
                .as_str()
                .parse()
                .map_err(DockError::ParseError)?;
            let content = string(&mut parts)?;
            Ok(Statement::Send { from, to, kind, content })
        }
        Rule::wait_stmt => match parts.next() {
            Some(n) => Ok(Statement::Wait(Some(number(n)?))),
            None => Ok(Statement::Wait(None)),
        },
        Rule::show_stmt => {
            let target = next(&mut parts, "show target")?;
            match target.as_rule() {
                Rule::show_containers => Ok(Statement::Show(ShowTarget::Containers)),
                Rule::show_messages => Ok(Statement::Show(ShowTarget::Messages)),
                Rule::show_log => {
                    let mut inner = target.into_inner();
                    Ok(Statement::Show(ShowTarget::Log(ident(&mut inner)?)))
                }
                other => Err(unexpected(other)),
            }
        }
        Rule::expect_stmt => {
            let expectation = next(&mut parts, "expectation")?;
            match expectation.as_rule() {
                Rule::expect_status => {
                    let mut inner = expectation.into_inner();
                    let id = ident(&mut inner)?;
                    let status = next(&mut inner, "status")?
                        .as_str()
                        .parse()
                        .map_err(DockError::ParseError)?;
                    Ok(Statement::ExpectStatus { id, status })
                }
                Rule::expect_messages => {
                    let mut inner = expectation.into_inner();
                    let count = number(next(&mut inner, "message count")?)?;
                    let count = usize::try_from(count)
                        .map_err(|e| DockError::ParseError(e.to_string()))?;
                    Ok(Statement::ExpectMessages(count))
                }
                other => Err(unexpected(other)),
            }
        }
        other => Err(unexpected(other)),
    }
}

fn first<'i>(pair: Pair<'i, Rule>, what: &str) -> Result<Pair<'i, Rule>> {
    pair.into_inner()
        .next()
        .ok_or_else(|| DockError::ParseError(format!("Expected {} content", what)))
}

fn next<'i>(parts: &mut pest::iterators::Pairs<'i, Rule>, what: &str) -> Result<Pair<'i, Rule>> {
    parts
        .next()
        .ok_or_else(|| DockError::ParseError(format!("Expected {}", what)))
}

fn ident(parts: &mut pest::iterators::Pairs<Rule>) -> Result<String> {
    Ok(next(parts, "container id")?.as_str().to_string())
}

fn string(parts: &mut pest::iterators::Pairs<Rule>) -> Result<String> {
    let pair = next(parts, "quoted string")?;
    let raw = pair
        .into_inner()
        .next()
        .map(|p| p.as_str())
        .unwrap_or_default();
    Ok(unescape(raw))
}

fn number(pair: Pair<Rule>) -> Result<u64> {
    pair.as_str()
        .parse()
        .map_err(|e: std::num::ParseIntError| DockError::ParseError(e.to_string()))
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

fn unexpected(rule: Rule) -> DockError {
    DockError::ParseError(format!("Unexpected rule: {:?}", rule))
}
