use crate::ast::{
    BinaryOp, ElementDecl, ElementKind, Expr, FuncName, GridDecl, Lattice, LetDecl, Param,
    ParticleDecl,
};
use crate::diagnostics::Span;
use thiserror::Error;

/// Parse error with optional span information
#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("{message}")]
    SyntaxError {
        message: String,
        span: Option<Span>,
    },
}

impl ParseError {
    pub fn new(message: impl Into<String>, span: Option<Span>) -> Self {
        Self::SyntaxError {
            message: message.into(),
            span,
        }
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            Self::SyntaxError { span, .. } => *span,
        }
    }
}

/// Byte span of every source line, including its newline
struct LineIndex {
    spans: Vec<Span>,
}

impl LineIndex {
    fn new(source: &str) -> Self {
        let mut spans = Vec::new();
        let mut start = 0;
        for line in source.split_inclusive('\n') {
            spans.push(Span::new(start, start + line.len()));
            start += line.len();
        }
        Self { spans }
    }

    fn span(&self, line: usize) -> Option<Span> {
        self.spans.get(line).copied()
    }
}

/// Parse a lattice description from source text
pub fn parse_lattice(source: &str) -> Result<Lattice, ParseError> {
    let index = LineIndex::new(source);
    let mut lattice = Lattice::default();

    for (i, raw) in source.lines().enumerate() {
        let line = strip_comment(raw).trim();
        if line.is_empty() {
            continue;
        }
        let span = index.span(i);
        let keyword = line.split_whitespace().next().unwrap_or("");

        if keyword == "let" {
            lattice.lets.push(parse_let(line, span)?);
        } else if keyword == "grid" {
            if lattice.grid.is_some() {
                return Err(ParseError::new("Duplicate 'grid' declaration", span));
            }
            let rest = &line[keyword.len()..];
            lattice.grid = Some(GridDecl {
                params: parse_params(rest, span)?,
                span,
            });
        } else if keyword == "particle" {
            let rest = &line[keyword.len()..];
            lattice.particles.push(ParticleDecl {
                params: parse_params(rest, span)?,
                span,
            });
        } else if let Some(kind) = ElementKind::from_keyword(keyword) {
            lattice.elements.push(parse_element(kind, line, span)?);
        } else {
            return Err(ParseError::new(
                format!("Unexpected token: {}", keyword),
                span,
            ));
        }
    }

    Ok(lattice)
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    }
}

/// Parse a let binding: `let name = expr`
fn parse_let(line: &str, span: Option<Span>) -> Result<LetDecl, ParseError> {
    let rest = line
        .strip_prefix("let ")
        .ok_or_else(|| ParseError::new("Expected 'let' keyword", span))?;

    let eq_pos = rest.find('=').ok_or_else(|| {
        ParseError::new(format!("Expected '=' in let binding: {}", line), span)
    })?;

    let name = rest[..eq_pos].trim();
    if !is_valid_identifier(name) {
        return Err(ParseError::new(
            format!("Invalid variable name '{}'", name),
            span,
        ));
    }

    let expr = parse_expr(&rest[eq_pos + 1..], span)?;
    Ok(LetDecl {
        name: name.to_string(),
        expr,
        span,
    })
}

/// Parse an element declaration: `<kind> <name> key = expr ...`
fn parse_element(kind: ElementKind, line: &str, span: Option<Span>) -> Result<ElementDecl, ParseError> {
    let rest = line[kind.keyword().len()..].trim_start();
    let name = rest.split_whitespace().next().ok_or_else(|| {
        ParseError::new(format!("Expected element name after '{}'", kind.keyword()), span)
    })?;
    if name.contains('=') {
        return Err(ParseError::new(
            format!("Expected element name after '{}', found '{}'", kind.keyword(), name),
            span,
        ));
    }

    let params = parse_params(&rest[name.len()..], span)?;
    Ok(ElementDecl {
        kind,
        name: name.to_string(),
        params,
        span,
    })
}

/// Parse `key = expr key = expr ...`.
///
/// A key is any identifier directly followed by a standalone `=`; the value
/// runs until the next key.
fn parse_params(rest: &str, span: Option<Span>) -> Result<Vec<Param>, ParseError> {
    let tokens: Vec<&str> = rest.split_whitespace().collect();
    let is_key = |i: usize| {
        i + 1 < tokens.len() && tokens[i + 1] == "=" && is_valid_identifier(tokens[i])
    };

    let mut params = Vec::new();
    let mut i = 0;
    while i < tokens.len() {
        if !is_key(i) {
            return Err(ParseError::new(
                format!("Expected 'key = value', found '{}'", tokens[i]),
                span,
            ));
        }
        let key = tokens[i];
        let value_start = i + 2;
        let mut value_end = value_start;
        while value_end < tokens.len() && !is_key(value_end) {
            value_end += 1;
        }
        if value_end == value_start {
            return Err(ParseError::new(
                format!("Missing value for parameter '{}'", key),
                span,
            ));
        }
        let value_str = tokens[value_start..value_end].join(" ");
        params.push(Param {
            key: key.to_string(),
            value: parse_expr(&value_str, span)?,
        });
        i = value_end;
    }

    Ok(params)
}

// ============================================================================
// Expressions
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Ident(String),
    Op(char),
    LParen,
    RParen,
    Comma,
}

/// Parse an expression
///
/// Grammar, loosest first:
/// `sum := product (('+' | '-') product)*`,
/// `product := unary (('*' | '/') unary)*`,
/// `unary := ('-' | '+') unary | primary`,
/// `primary := number | ident | ident '(' args ')' | '(' sum ')'`.
pub fn parse_expr(s: &str, span: Option<Span>) -> Result<Expr, ParseError> {
    let tokens = tokenize(s, span)?;
    if tokens.is_empty() {
        return Err(ParseError::new("Empty expression", span));
    }
    let mut parser = ExprParser {
        tokens,
        pos: 0,
        span,
        source: s.trim(),
    };
    let expr = parser.sum()?;
    if let Some(token) = parser.peek() {
        return Err(parser.error(format!("Unexpected {:?} in expression", token)));
    }
    Ok(expr)
}

fn tokenize(s: &str, span: Option<Span>) -> Result<Vec<Token>, ParseError> {
    let chars: Vec<char> = s.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let ch = chars[i];
        match ch {
            c if c.is_whitespace() => i += 1,
            '+' | '-' | '*' | '/' => {
                tokens.push(Token::Op(ch));
                i += 1;
            }
            '(' => {
                tokens.push(Token::LParen);
                i += 1;
            }
            ')' => {
                tokens.push(Token::RParen);
                i += 1;
            }
            ',' => {
                tokens.push(Token::Comma);
                i += 1;
            }
            c if c.is_ascii_digit() || c == '.' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    i += 1;
                }
                // Exponent, only when digits follow: `6E-5`, `1e3`
                if i < chars.len() && (chars[i] == 'e' || chars[i] == 'E') {
                    let mut j = i + 1;
                    if j < chars.len() && (chars[j] == '+' || chars[j] == '-') {
                        j += 1;
                    }
                    if j < chars.len() && chars[j].is_ascii_digit() {
                        i = j;
                        while i < chars.len() && chars[i].is_ascii_digit() {
                            i += 1;
                        }
                    }
                }
                let text: String = chars[start..i].iter().collect();
                let value = text.parse::<f64>().map_err(|_| {
                    ParseError::new(format!("Invalid number '{}'", text), span)
                })?;
                tokens.push(Token::Number(value));
            }
            c if c.is_alphabetic() || c == '_' => {
                let start = i;
                while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                tokens.push(Token::Ident(chars[start..i].iter().collect()));
            }
            other => {
                return Err(ParseError::new(
                    format!("Unexpected character '{}' in expression", other),
                    span,
                ));
            }
        }
    }

    Ok(tokens)
}

struct ExprParser<'s> {
    tokens: Vec<Token>,
    pos: usize,
    span: Option<Span>,
    source: &'s str,
}

impl ExprParser<'_> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<Token> {
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

    fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError::new(format!("{}: {}", message.into(), self.source), self.span)
    }

    fn sum(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.product()?;
        loop {
            let op = match self.peek() {
                Some(Token::Op('+')) => BinaryOp::Add,
                Some(Token::Op('-')) => BinaryOp::Sub,
                _ => return Ok(left),
            };
            self.pos += 1;
            let right = self.product()?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
    }

    fn product(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.unary()?;
        loop {
            let op = match self.peek() {
                Some(Token::Op('*')) => BinaryOp::Mul,
                Some(Token::Op('/')) => BinaryOp::Div,
                _ => return Ok(left),
            };
            self.pos += 1;
            let right = self.unary()?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
    }

    fn unary(&mut self) -> Result<Expr, ParseError> {
        if self.eat(&Token::Op('-')) {
            return Ok(Expr::UnaryMinus(Box::new(self.unary()?)));
        }
        if self.eat(&Token::Op('+')) {
            return self.unary();
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<Expr, ParseError> {
        match self.advance() {
            Some(Token::Number(value)) => Ok(Expr::Literal(value)),
            Some(Token::Ident(name)) => {
                if self.eat(&Token::LParen) {
                    self.call(&name)
                } else {
                    Ok(Expr::Var(name))
                }
            }
            Some(Token::LParen) => {
                let inner = self.sum()?;
                if !self.eat(&Token::RParen) {
                    return Err(self.error("Unbalanced parentheses"));
                }
                Ok(inner)
            }
            Some(token) => Err(self.error(format!("Unexpected {:?} in expression", token))),
            None => Err(self.error("Missing operand")),
        }
    }

    /// Arguments of a builtin call; the opening parenthesis is consumed.
    fn call(&mut self, name: &str) -> Result<Expr, ParseError> {
        let func = match name {
            "sin" => FuncName::Sin,
            "cos" => FuncName::Cos,
            "sqrt" => FuncName::Sqrt,
            "clamp" => FuncName::Clamp,
            _ => return Err(ParseError::new(format!("Unknown function '{}'", name), self.span)),
        };

        let mut args = Vec::new();
        if !self.eat(&Token::RParen) {
            loop {
                args.push(self.sum()?);
                if self.eat(&Token::Comma) {
                    continue;
                }
                if self.eat(&Token::RParen) {
                    break;
                }
                return Err(self.error("Unbalanced parentheses"));
            }
        }

        Ok(Expr::Call { func, args })
    }
}

/// Check if a string is a valid identifier
fn is_valid_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    let Some(first) = chars.next() else {
        return false;
    };

    // First char must be letter or underscore
    if !first.is_alphabetic() && first != '_' {
        return false;
    }

    // Rest must be alphanumeric or underscore
    chars.all(|c| c.is_alphanumeric() || c == '_')
}
