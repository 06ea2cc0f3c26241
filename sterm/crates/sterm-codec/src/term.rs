//! Textual terms: a minimal term algebra with a parser and printer.
//!
//! ```text
//! term  := int | list | appl
//! int   := '-'? [0-9]+
//! list  := '[' (term (',' term)*)? ']'
//! appl  := name ('(' term (',' term)* ')')?
//! name  := [A-Za-z_@] [A-Za-z0-9_'@-]*  |  '"' char* '"'
//! ```
//!
//! Whitespace between tokens is ignored. Quoted names accept the escapes
//! `\"`, `\\`, `\n` and `\t`. Terms nest at most [`MAX_DEPTH`] levels.

use std::fmt;

use sterm_sym::{AFun, SymbolTable};

use crate::error::ParseError;

/// Deepest nesting of applications and lists the parser accepts
pub const MAX_DEPTH: usize = 512;

/// A term whose function symbols are interned in a [`SymbolTable`]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Term {
    /// Function application; `args.len()` equals the symbol's arity
    Appl { fun: AFun, args: Vec<Term> },
    Int(i64),
    List(Vec<Term>),
}

impl Term {
    /// Build an application
    ///
    /// # Panics
    ///
    /// Panics if the number of arguments differs from the symbol's arity.
    pub fn appl(fun: AFun, args: Vec<Term>) -> Self {
        assert_eq!(
            fun.arity() as usize,
            args.len(),
            "symbol {} applied to {} arguments",
            fun,
            args.len()
        );
        Term::Appl { fun, args }
    }

    /// Build a constant, interning `name` with arity 0
    ///
    /// Names outside the unquoted name syntax are interned as quoted.
    pub fn constant(symbols: &SymbolTable, name: &str) -> Self {
        Term::Appl {
            fun: symbols.intern(name, 0, !is_plain_name(name)),
            args: Vec::new(),
        }
    }

    /// The head symbol of an application
    pub fn fun(&self) -> Option<&AFun> {
        match self {
            Term::Appl { fun, .. } => Some(fun),
            _ => None,
        }
    }

    /// Arguments of an application or elements of a list
    pub fn args(&self) -> &[Term] {
        match self {
            Term::Appl { args, .. } | Term::List(args) => args,
            Term::Int(_) => &[],
        }
    }

    /// Number of nodes in the term
    pub fn size(&self) -> usize {
        1 + self.args().iter().map(Term::size).sum::<usize>()
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Int(n) => write!(f, "{}", n),
            Term::List(elems) => {
                f.write_str("[")?;
                write_seq(f, elems)?;
                f.write_str("]")
            }
            Term::Appl { fun, args } => {
                let name = fun.name();
                if fun.is_quoted() || !is_plain_name(&name) {
                    write_quoted(f, &name)?;
                } else {
                    f.write_str(&name)?;
                }
                if !args.is_empty() {
                    f.write_str("(")?;
                    write_seq(f, args)?;
                    f.write_str(")")?;
                }
                Ok(())
            }
        }
    }
}

fn write_seq(f: &mut fmt::Formatter<'_>, terms: &[Term]) -> fmt::Result {
    for (i, term) in terms.iter().enumerate() {
        if i > 0 {
            f.write_str(",")?;
        }
        write!(f, "{}", term)?;
    }
    Ok(())
}

fn write_quoted(f: &mut fmt::Formatter<'_>, name: &str) -> fmt::Result {
    f.write_str("\"")?;
    for c in name.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\t' => f.write_str("\\t")?,
            c => write!(f, "{}", c)?,
        }
    }
    f.write_str("\"")
}

/// Parse `text` into a term, interning every function symbol in `symbols`
pub fn parse_term(symbols: &SymbolTable, text: &str) -> Result<Term, ParseError> {
    let mut parser = Parser::new(symbols, text);
    let term = parser.term()?;
    parser.skip_whitespace();
    if let Some(c) = parser.peek() {
        return Err(parser.error(format!("unexpected {:?} after term", char::from(c))));
    }
    Ok(term)
}

/// Recursive-descent parser over the bytes of a term
struct Parser<'a> {
    symbols: &'a SymbolTable,
    source: &'a str,
    position: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(symbols: &'a SymbolTable, source: &'a str) -> Self {
        Self {
            symbols,
            source,
            position: 0,
            depth: 0,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.source.as_bytes().get(self.position).copied()
    }

    fn bump(&mut self) {
        self.position += 1;
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError::new(self.position, message)
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_ascii_whitespace()) {
            self.bump();
        }
    }

    fn expect(&mut self, expected: u8) -> Result<(), ParseError> {
        self.skip_whitespace();
        match self.peek() {
            Some(c) if c == expected => {
                self.bump();
                Ok(())
            }
            Some(c) => Err(self.error(format!(
                "expected '{}', found {:?}",
                char::from(expected),
                char::from(c)
            ))),
            None => Err(self.error(format!("expected '{}', found end of input", char::from(expected)))),
        }
    }

    fn term(&mut self) -> Result<Term, ParseError> {
        if self.depth == MAX_DEPTH {
            return Err(self.error(format!("terms nested deeper than {}", MAX_DEPTH)));
        }
        self.depth += 1;
        let term = self.node();
        self.depth -= 1;
        term
    }

    fn node(&mut self) -> Result<Term, ParseError> {
        self.skip_whitespace();
        match self.peek() {
            None => Err(self.error("expected term, found end of input")),
            Some(b'[') => self.list(),
            Some(c) if c == b'-' || c.is_ascii_digit() => self.int(),
            Some(c) if c == b'"' || is_name_start(c) => self.appl(),
            Some(c) => Err(self.error(format!("unexpected {:?}", char::from(c)))),
        }
    }

    fn int(&mut self) -> Result<Term, ParseError> {
        let start = self.position;
        if self.peek() == Some(b'-') {
            self.bump();
        }
        let digits = self.position;
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.bump();
        }
        if self.position == digits {
            return Err(self.error("expected digit after '-'"));
        }

        self.source[start..self.position]
            .parse()
            .map(Term::Int)
            .map_err(|_| ParseError::new(start, "integer out of range"))
    }

    fn list(&mut self) -> Result<Term, ParseError> {
        self.expect(b'[')?;
        self.skip_whitespace();
        if self.peek() == Some(b']') {
            self.bump();
            return Ok(Term::List(Vec::new()));
        }
        let elems = self.seq(b']')?;
        Ok(Term::List(elems))
    }

    fn appl(&mut self) -> Result<Term, ParseError> {
        let (name, quoted) = if self.peek() == Some(b'"') {
            (self.quoted_name()?, true)
        } else {
            (self.name().to_string(), false)
        };

        self.skip_whitespace();
        let args = if self.peek() == Some(b'(') {
            self.bump();
            self.seq(b')')?
        } else {
            Vec::new()
        };

        let fun = self.symbols.intern(&name, args.len() as u32, quoted);
        Ok(Term::Appl { fun, args })
    }

    /// Comma-separated terms up to and including `close`
    fn seq(&mut self, close: u8) -> Result<Vec<Term>, ParseError> {
        let mut terms = vec![self.term()?];
        loop {
            self.skip_whitespace();
            match self.peek() {
                Some(b',') => {
                    self.bump();
                    terms.push(self.term()?);
                }
                Some(c) if c == close => {
                    self.bump();
                    return Ok(terms);
                }
                _ => return Err(self.error(format!("expected ',' or '{}'", char::from(close)))),
            }
        }
    }

    fn name(&mut self) -> &'a str {
        let start = self.position;
        self.bump();
        while matches!(self.peek(), Some(c) if is_name_continue(c)) {
            self.bump();
        }
        &self.source[start..self.position]
    }

    fn quoted_name(&mut self) -> Result<String, ParseError> {
        let start = self.position;
        self.bump();
        let mut name = String::new();
        loop {
            let rest = &self.source[self.position..];
            let Some(c) = rest.chars().next() else {
                return Err(ParseError::new(start, "unterminated quoted name"));
            };
            self.position += c.len_utf8();
            match c {
                '"' => return Ok(name),
                '\\' => {
                    let escaped = match self.peek() {
                        Some(b'"') => '"',
                        Some(b'\\') => '\\',
                        Some(b'n') => '\n',
                        Some(b't') => '\t',
                        _ => return Err(self.error("invalid escape sequence")),
                    };
                    self.bump();
                    name.push(escaped);
                }
                c => name.push(c),
            }
        }
    }
}

fn is_plain_name(name: &str) -> bool {
    match name.as_bytes().split_first() {
        Some((&first, rest)) => is_name_start(first) && rest.iter().all(|&c| is_name_continue(c)),
        None => false,
    }
}

fn is_name_start(c: u8) -> bool {
    c.is_ascii_alphabetic() || c == b'_' || c == b'@'
}

fn is_name_continue(c: u8) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, b'_' | b'-' | b'\'' | b'@')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(symbols: &SymbolTable, text: &str) -> Term {
        parse_term(symbols, text).unwrap()
    }

    #[test]
    fn test_application_interns_symbols() {
        let symbols = SymbolTable::new();
        let term = parse(&symbols, "cons(a, cons(b, nil))");

        let fun = term.fun().unwrap();
        assert_eq!(&*fun.name(), "cons");
        assert_eq!(fun.arity(), 2);
        assert!(!fun.is_quoted());
        // cons/2, a/0, b/0, nil/0
        assert_eq!(symbols.len(), 4);
        assert_eq!(fun.reference_count(), 2);
        assert_eq!(term.size(), 5);
    }

    #[test]
    fn test_canonical_print() {
        let symbols = SymbolTable::new();
        let term = parse(&symbols, " f ( [1, -2 ,[]] , \"a b\" ( x ) ) ");
        assert_eq!(term.to_string(), "f([1,-2,[]],\"a b\"(x))");
    }

    #[test]
    fn test_quoted_escapes() {
        let symbols = SymbolTable::new();
        let term = parse(&symbols, r#""say \"hi\"\n""#);
        assert_eq!(&*term.fun().unwrap().name(), "say \"hi\"\n");
        assert!(term.fun().unwrap().is_quoted());
        assert_eq!(term.to_string(), r#""say \"hi\"\n""#);
    }

    #[test]
    fn test_quoted_and_unquoted_are_distinct() {
        let symbols = SymbolTable::new();
        let plain = parse(&symbols, "a");
        let quoted = parse(&symbols, "\"a\"");
        assert_ne!(plain, quoted);
        assert_eq!(symbols.len(), 2);
    }

    #[test]
    fn test_same_text_same_term() {
        let symbols = SymbolTable::new();
        assert_eq!(parse(&symbols, "g(x,[1])"), parse(&symbols, "g( x , [ 1 ] )"));
    }

    #[test]
    fn test_name_characters() {
        let symbols = SymbolTable::new();
        let term = parse(&symbols, "@x_1-a'");
        assert_eq!(&*term.fun().unwrap().name(), "@x_1-a'");
    }

    #[test]
    fn test_errors() {
        let symbols = SymbolTable::new();
        let cases = [
            ("", 0),
            ("f(a", 3),
            ("f(a,)", 4),
            ("[1 2]", 3),
            ("f(a) b", 5),
            ("-", 1),
            ("\"open", 0),
            ("\"bad\\q\"", 5),
            ("99999999999999999999", 0),
            ("f()", 2),
        ];
        for (text, position) in cases {
            let err = parse_term(&symbols, text).unwrap_err();
            assert_eq!(err.position, position, "{:?}: {}", text, err);
        }
    }

    #[test]
    fn test_dropping_term_frees_symbols() {
        let symbols = SymbolTable::new();
        let term = parse(&symbols, "h(k,k)");
        assert_eq!(symbols.len(), 2);
        drop(term);
        assert!(symbols.is_empty());
    }

    #[test]
    #[should_panic(expected = "applied to 1 arguments")]
    fn test_appl_checks_arity() {
        let symbols = SymbolTable::new();
        let f = symbols.intern("f", 2, false);
        Term::appl(f, vec![Term::Int(1)]);
    }

    #[test]
    fn test_constant_with_spaces_prints_quoted() {
        let symbols = SymbolTable::new();
        let term = Term::constant(&symbols, "a b");
        assert!(term.fun().unwrap().is_quoted());
        assert_eq!(term.to_string(), "\"a b\"");
        assert_eq!(parse(&symbols, &term.to_string()), term);

        let plain = Term::constant(&symbols, "nil");
        assert!(!plain.fun().unwrap().is_quoted());
        assert_eq!(plain.to_string(), "nil");
    }

    #[test]
    fn test_unquoted_symbol_outside_name_syntax_prints_quoted() {
        let symbols = SymbolTable::new();
        let term = Term::appl(symbols.intern("1x", 1, false), vec![Term::Int(2)]);
        assert_eq!(term.to_string(), "\"1x\"(2)");
    }

    #[test]
    fn test_nesting_limit() {
        let symbols = SymbolTable::new();
        let deepest = format!("{}{}", "[".repeat(MAX_DEPTH), "]".repeat(MAX_DEPTH));
        assert_eq!(parse(&symbols, &deepest).size(), MAX_DEPTH);

        let too_deep = "[".repeat(MAX_DEPTH + 100);
        let err = parse_term(&symbols, &too_deep).unwrap_err();
        assert_eq!(err.position, MAX_DEPTH);
        assert!(err.message.contains("nested"));

        let applications = format!("{}a{}", "f(".repeat(MAX_DEPTH), ")".repeat(MAX_DEPTH));
        assert!(parse_term(&symbols, &applications).is_err());
        assert!(symbols.is_empty());
    }
}
