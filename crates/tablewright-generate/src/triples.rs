//! Row-level triple templates.
//!
//! Classes may declare extra statements in a small Turtle subset. Each
//! statement is asserted once per row, with `<>` standing for the row itself
//! and `<#frag>` for a node hanging off it:
//!
//! ```text
//! <> schema:amount <#amount> .
//! <#amount> a schema:MonetaryAmount ; schema:currency <https://example.org/EUR> .
//! ```
//!
//! Supported: IRI references, prefixed names using the schema's prefixes,
//! `a`, `;` and `,` abbreviations, `#` comments. Objects must be IRIs;
//! literals are rejected because table-schema columns cannot express them.

use std::collections::{BTreeMap, BTreeSet};

use tablewright_core::{ColumnDefinition, Error, Result, expand_curie, resolve_reference};

const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
const ROW_PLACEHOLDER: &str = "IdentifierForThisRow";

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct Triple {
    subject: String,
    predicate: String,
    object: String,
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Iri(String),
    Prefixed(String),
    A,
    Semicolon,
    Comma,
    Dot,
}

/// Compile a template into virtual columns, sorted by subject, predicate
/// and object. Statements about a node other than the row carry an
/// `aboutUrl`.
pub fn virtual_columns_for_template(
    template: &str,
    prefixes: &BTreeMap<String, String>,
    identifier_namespace: &str,
    row_template: &str,
) -> Result<Vec<ColumnDefinition>> {
    let base = format!("{identifier_namespace}{ROW_PLACEHOLDER}");
    let tokens = tokenize(template)?;
    let triples = parse_statements(&tokens, prefixes, &base)?;

    let substitute = |value: &str| value.replace(&base, row_template);

    Ok(triples
        .into_iter()
        .map(|triple| {
            let about_url = (triple.subject != base).then(|| substitute(&triple.subject));
            ColumnDefinition::virtual_triple(
                about_url,
                substitute(&triple.predicate),
                substitute(&triple.object),
            )
        })
        .collect())
}

fn template_error(message: impl std::fmt::Display) -> Error {
    Error::integrity(format!("malformed virtual triple template: {message}"))
}

fn tokenize(text: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = text.chars().peekable();

    while let Some(&ch) = chars.peek() {
        match ch {
            c if c.is_whitespace() => {
                chars.next();
            }
            '#' => {
                for c in chars.by_ref() {
                    if c == '\n' {
                        break;
                    }
                }
            }
            '<' => {
                chars.next();
                let mut iri = String::new();
                loop {
                    match chars.next() {
                        Some('>') => break,
                        Some(c) if c.is_whitespace() => {
                            return Err(template_error(format!("whitespace inside <{iri}")));
                        }
                        Some(c) => iri.push(c),
                        None => return Err(template_error(format!("unterminated IRI <{iri}"))),
                    }
                }
                tokens.push(Token::Iri(iri));
            }
            ';' => {
                chars.next();
                tokens.push(Token::Semicolon);
            }
            ',' => {
                chars.next();
                tokens.push(Token::Comma);
            }
            '.' => {
                chars.next();
                tokens.push(Token::Dot);
            }
            '"' | '\'' => {
                return Err(Error::integrity(
                    "literal objects are not supported in virtual triple templates; \
                     objects must be URI references",
                ));
            }
            '[' | ']' | '(' | ')' | '_' => {
                return Err(template_error(format!(
                    "blank nodes and collections are not supported (found '{ch}')"
                )));
            }
            '@' => {
                return Err(template_error(
                    "directives are not supported; schema prefixes are pre-bound",
                ));
            }
            _ => {
                let mut word = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_whitespace() || matches!(c, ';' | ',' | '<' | '"' | '#') {
                        break;
                    }
                    if c == '.' {
                        // A dot ends the word unless more name characters follow.
                        let mut lookahead = chars.clone();
                        lookahead.next();
                        if !lookahead.peek().is_some_and(|next| is_name_char(*next)) {
                            break;
                        }
                    }
                    word.push(c);
                    chars.next();
                }
                tokens.push(classify_word(word)?);
            }
        }
    }

    Ok(tokens)
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '-' | ':' | '.' | '/' | '%')
}

fn classify_word(word: String) -> Result<Token> {
    if word == "a" {
        return Ok(Token::A);
    }
    if word == "true" || word == "false" || word.starts_with(|c: char| c.is_ascii_digit() || c == '-' || c == '+') {
        return Err(Error::integrity(format!(
            "literal object '{word}' is not supported in virtual triple templates; \
             objects must be URI references"
        )));
    }
    if word.contains(':') {
        return Ok(Token::Prefixed(word));
    }
    Err(template_error(format!("unexpected token '{word}'")))
}

fn parse_statements(
    tokens: &[Token],
    prefixes: &BTreeMap<String, String>,
    base: &str,
) -> Result<BTreeSet<Triple>> {
    let mut triples = BTreeSet::new();
    let mut pos = 0;

    let term = |token: &Token| -> Result<String> {
        match token {
            Token::Iri(reference) => Ok(resolve_reference(base, reference)),
            Token::Prefixed(name) => expand_curie(name, prefixes),
            other => Err(template_error(format!("expected a URI, found {other:?}"))),
        }
    };

    while pos < tokens.len() {
        let subject = term(&tokens[pos])?;
        pos += 1;

        'predicates: loop {
            let predicate = match tokens.get(pos) {
                Some(Token::A) => RDF_TYPE.to_string(),
                Some(token) => term(token)?,
                None => return Err(template_error("statement ends after its subject")),
            };
            pos += 1;

            loop {
                let object = match tokens.get(pos) {
                    Some(Token::A) => {
                        return Err(template_error("'a' is only valid as a predicate"));
                    }
                    Some(token) => term(token)?,
                    None => return Err(template_error("statement ends before its object")),
                };
                pos += 1;
                triples.insert(Triple {
                    subject: subject.clone(),
                    predicate: predicate.clone(),
                    object,
                });

                match tokens.get(pos) {
                    Some(Token::Comma) => pos += 1,
                    Some(Token::Semicolon) => {
                        pos += 1;
                        // A trailing ';' before '.' is allowed.
                        if matches!(tokens.get(pos), Some(Token::Dot)) {
                            pos += 1;
                            break 'predicates;
                        }
                        continue 'predicates;
                    }
                    Some(Token::Dot) => {
                        pos += 1;
                        break 'predicates;
                    }
                    Some(other) => {
                        return Err(template_error(format!("expected ',', ';' or '.', found {other:?}")));
                    }
                    None => return Err(template_error("missing '.' at end of statement")),
                }
            }
        }
    }

    Ok(triples)
}
