//! Type expression syntax
//!
//! Front ends describe field types, bounds and supertypes as strings such as
//! `int`, `T`, `String[]` or `java.util.Map<K, ? extends V>`. This module
//! parses them into an unresolved [`TypeExpr`]; name resolution happens in the
//! builder, which knows the surrounding declarations.
//!
//! Grammar:
//!
//! ```text
//! type     := name args? "[]"*
//! name     := ident ("." ident)*
//! args     := "<" arg ("," arg)* ">"
//! arg      := "?" (("extends" | "super") type)? | type
//! ```

use crate::error::ModelError;
use logos::Logos;
use std::fmt;

/// Bound direction of a wildcard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundKind {
    /// `? extends T`
    Extends,
    /// `? super T`
    Super,
}

/// Unresolved type expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpr {
    /// Dotted name with optional type arguments
    Named {
        /// Name as written (simple or qualified)
        name: String,
        /// Type arguments
        args: Vec<TypeExpr>,
    },
    /// Array of an element type
    Array(Box<TypeExpr>),
    /// Wildcard type argument
    Wildcard(Option<(BoundKind, Box<TypeExpr>)>),
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeExpr::Named { name, args } => {
                write!(f, "{name}")?;
                if !args.is_empty() {
                    write!(f, "<")?;
                    for (i, arg) in args.iter().enumerate() {
                        if i > 0 {
                            write!(f, ",")?;
                        }
                        write!(f, "{arg}")?;
                    }
                    write!(f, ">")?;
                }
                Ok(())
            }
            TypeExpr::Array(element) => write!(f, "{element}[]"),
            TypeExpr::Wildcard(None) => write!(f, "?"),
            TypeExpr::Wildcard(Some((BoundKind::Extends, bound))) => write!(f, "? extends {bound}"),
            TypeExpr::Wildcard(Some((BoundKind::Super, bound))) => write!(f, "? super {bound}"),
        }
    }
}

/// Lexical tokens of a type expression
#[derive(Logos, Debug, Clone, PartialEq, Eq)]
#[logos(skip r"\s+")]
enum Token {
    #[regex(r"[\p{L}_$][\p{L}\p{N}_$]*", |lex| lex.slice().to_string())]
    Ident(String),

    #[token(".")]
    Dot,

    #[token(",")]
    Comma,

    #[token("<")]
    Less,

    #[token(">")]
    Greater,

    #[token("?")]
    Question,

    #[token("[]")]
    Brackets,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Ident(name) => write!(f, "'{name}'"),
            Token::Dot => write!(f, "'.'"),
            Token::Comma => write!(f, "','"),
            Token::Less => write!(f, "'<'"),
            Token::Greater => write!(f, "'>'"),
            Token::Question => write!(f, "'?'"),
            Token::Brackets => write!(f, "'[]'"),
        }
    }
}

fn tokenize(input: &str) -> Result<Vec<Token>, String> {
    let mut lexer = Token::lexer(input);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        match result {
            Ok(token) => tokens.push(token),
            Err(()) => {
                let start = lexer.span().start;
                let c = input[start..].chars().next().unwrap_or('\0');
                return Err(format!("unexpected character '{c}' at offset {start}"));
            }
        }
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn bump(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        token
    }

    fn eat(&mut self, expected: &Token) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: Token) -> Result<(), String> {
        match self.bump() {
            Some(ref token) if *token == expected => Ok(()),
            Some(token) => Err(format!("expected {expected}, found {token}")),
            None => Err(format!("expected {expected}, found end of input")),
        }
    }

    fn ident(&mut self) -> Result<String, String> {
        match self.bump() {
            Some(Token::Ident(name)) => Ok(name),
            Some(token) => Err(format!("expected identifier, found {token}")),
            None => Err("expected identifier, found end of input".to_string()),
        }
    }

    fn parse_type(&mut self) -> Result<TypeExpr, String> {
        let mut name = self.ident()?;
        while self.eat(&Token::Dot) {
            name.push('.');
            name.push_str(&self.ident()?);
        }

        let mut args = Vec::new();
        if self.eat(&Token::Less) {
            loop {
                args.push(self.parse_arg()?);
                if !self.eat(&Token::Comma) {
                    break;
                }
            }
            self.expect(Token::Greater)?;
        }

        let mut ty = TypeExpr::Named { name, args };
        while self.eat(&Token::Brackets) {
            ty = TypeExpr::Array(Box::new(ty));
        }
        Ok(ty)
    }

    fn parse_arg(&mut self) -> Result<TypeExpr, String> {
        if !self.eat(&Token::Question) {
            return self.parse_type();
        }

        let kind = match self.peek() {
            Some(Token::Ident(word)) if word == "extends" => BoundKind::Extends,
            Some(Token::Ident(word)) if word == "super" => BoundKind::Super,
            _ => return Ok(TypeExpr::Wildcard(None)),
        };
        self.pos += 1;
        let bound = self.parse_type()?;
        Ok(TypeExpr::Wildcard(Some((kind, Box::new(bound)))))
    }
}

/// Parse a type expression
pub fn parse(input: &str) -> Result<TypeExpr, ModelError> {
    let syntax_error = |message: String| ModelError::TypeSyntax {
        expr: input.to_string(),
        message,
    };

    let tokens = tokenize(input).map_err(syntax_error)?;
    if tokens.is_empty() {
        return Err(syntax_error("empty type expression".to_string()));
    }

    let mut parser = Parser { tokens, pos: 0 };
    let ty = parser.parse_type().map_err(syntax_error)?;
    if let Some(token) = parser.peek() {
        return Err(syntax_error(format!("unexpected trailing {token}")));
    }
    Ok(ty)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str, args: Vec<TypeExpr>) -> TypeExpr {
        TypeExpr::Named {
            name: name.to_string(),
            args,
        }
    }

    #[test]
    fn test_parse_simple_and_qualified() {
        assert_eq!(parse("int").unwrap(), named("int", vec![]));
        assert_eq!(
            parse("java.lang.String").unwrap(),
            named("java.lang.String", vec![])
        );
    }

    #[test]
    fn test_parse_generic_with_wildcards() {
        let ty = parse("java.util.Map<K, ? extends java.util.List<V>>").unwrap();
        let expected = named(
            "java.util.Map",
            vec![
                named("K", vec![]),
                TypeExpr::Wildcard(Some((
                    BoundKind::Extends,
                    Box::new(named("java.util.List", vec![named("V", vec![])])),
                ))),
            ],
        );
        assert_eq!(ty, expected);
        assert_eq!(ty.to_string(), "java.util.Map<K,? extends java.util.List<V>>");
    }

    #[test]
    fn test_parse_arrays() {
        let ty = parse("String[][]").unwrap();
        assert_eq!(
            ty,
            TypeExpr::Array(Box::new(TypeExpr::Array(Box::new(named("String", vec![])))))
        );
    }

    #[test]
    fn test_top_level_wildcard_is_rejected() {
        assert!(matches!(parse("?"), Err(ModelError::TypeSyntax { .. })));
    }

    #[test]
    fn test_whitespace_and_unicode_identifiers() {
        assert!(parse("java.util.List<T>[ ]").is_err());
        assert_eq!(
            parse("java.util.List < \u{00e9}t\u{00e9} >[]").unwrap(),
            TypeExpr::Array(Box::new(named(
                "java.util.List",
                vec![named("\u{00e9}t\u{00e9}", vec![])]
            )))
        );
    }

    #[test]
    fn test_lexer_error_reports_offset() {
        match parse("List<int#>") {
            Err(ModelError::TypeSyntax { expr, message }) => {
                assert_eq!(expr, "List<int#>");
                assert_eq!(message, "unexpected character '#' at offset 8");
            }
            other => panic!("expected syntax error, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_expressions() {
        for bad in ["", "List<", "List<>", "Map<K,,V>", "a.", "int[", "int)", "List<String> x"] {
            assert!(parse(bad).is_err(), "expected '{bad}' to be rejected");
        }
    }
}
