//! Recursive-descent parser for example fragments.
//!
//! Works directly on the source string: JSX text and attribute strings are
//! context sensitive, so there is no separate token stream.

use super::ast::{
    ArrayItem, BinaryOp, ClassDecl, Expr, Fragment, JsxAttr, JsxChild, JsxElement, ObjectProp,
    TagName, TemplatePart, UnaryOp,
};
use crate::error::CompileError;

type PResult<T> = Result<T, CompileError>;

/// Parse a code fragment (already unwrapped from its fence).
pub fn parse_fragment(source: &str) -> PResult<Fragment> {
    parse_fragment_with_end(source).map(|(fragment, _)| fragment)
}

/// Parse a code fragment, also returning the offset just past its last
/// token (before any trailing `;` or comments).
pub(crate) fn parse_fragment_with_end(source: &str) -> PResult<(Fragment, usize)> {
    let mut parser = Parser::new(source);
    parser.skip_trivia();

    if parser.peek_keyword("class") {
        let start = parser.pos;
        let class = parser.parse_class()?;
        let end = start + class.source.len();
        return Ok((Fragment::Class(class), end));
    }

    let expr = parser.parse_expression()?;
    let end = parser.token_end();
    parser.skip_trivia();
    parser.eat(";");
    parser.skip_trivia();
    if !parser.at_end() {
        return Err(parser.error("unexpected input after expression"));
    }
    Ok((Fragment::Expression(expr), end))
}

/// Parse the JSX element starting at `offset`, returning it with the offset
/// just past it.
pub(crate) fn parse_jsx_at(source: &str, offset: usize) -> PResult<(JsxElement, usize)> {
    let mut parser = Parser::new(source);
    parser.pos = offset;
    let element = parser.parse_jsx_element()?;
    Ok((element, parser.pos))
}

pub(crate) fn is_id_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

pub(crate) fn is_id_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

fn is_jsx_name_char(c: char) -> bool {
    is_id_continue(c) || c == '-' || c == ':'
}

struct Parser<'src> {
    src: &'src str,
    pos: usize,
    /// Span of the most recent run of skipped trivia
    trivia: (usize, usize),
}

impl<'src> Parser<'src> {
    fn new(src: &'src str) -> Self {
        Self {
            src,
            pos: 0,
            trivia: (0, 0),
        }
    }

    // ------------------------------------------------------------------
    // Cursor helpers
    // ------------------------------------------------------------------

    fn rest(&self) -> &'src str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn starts_with(&self, s: &str) -> bool {
        self.rest().starts_with(s)
    }

    fn eat(&mut self, s: &str) -> bool {
        if self.starts_with(s) {
            self.pos += s.len();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, s: &str) -> PResult<()> {
        self.skip_trivia();
        if self.eat(s) {
            Ok(())
        } else {
            Err(self.error(&format!("expected '{}'", s)))
        }
    }

    fn peek_keyword(&self, keyword: &str) -> bool {
        self.starts_with(keyword)
            && !self.rest()[keyword.len()..]
                .chars()
                .next()
                .is_some_and(is_id_continue)
    }

    fn eat_keyword(&mut self, keyword: &str) -> bool {
        if self.peek_keyword(keyword) {
            self.pos += keyword.len();
            true
        } else {
            false
        }
    }

    fn error(&self, message: &str) -> CompileError {
        CompileError::Syntax {
            offset: self.pos,
            message: message.to_string(),
        }
    }

    fn unsupported(&self, construct: &str) -> CompileError {
        CompileError::Unsupported {
            offset: self.pos,
            construct: construct.to_string(),
        }
    }

    /// Skip whitespace, `// line` and `/* block */` comments
    fn skip_trivia(&mut self) {
        let entry = self.pos;
        loop {
            let before = self.pos;
            while self.peek().is_some_and(char::is_whitespace) {
                self.bump();
            }
            if self.starts_with("//") {
                while self.peek().is_some_and(|c| c != '\n') {
                    self.bump();
                }
            } else if self.starts_with("/*") {
                match self.rest()[2..].find("*/") {
                    Some(end) => self.pos += end + 4,
                    None => self.pos = self.src.len(),
                }
            }
            if self.pos == before {
                break;
            }
        }
        if self.pos != entry {
            self.trivia = (entry, self.pos);
        }
    }

    /// End of the last consumed token, ignoring trivia skipped after it
    fn token_end(&self) -> usize {
        let (start, end) = self.trivia;
        if end == self.pos && start != end {
            start
        } else {
            self.pos
        }
    }

    fn parse_ident(&mut self) -> Option<String> {
        if !self.peek().is_some_and(is_id_start) {
            return None;
        }
        let start = self.pos;
        while self.peek().is_some_and(is_id_continue) {
            self.bump();
        }
        Some(self.src[start..self.pos].to_string())
    }

    // ------------------------------------------------------------------
    // Opaque regions (function bodies, class bodies)
    // ------------------------------------------------------------------

    /// Skip a bracketed region starting at an opening bracket.
    fn skip_balanced(&mut self) -> PResult<()> {
        let start = self.pos;
        let mut depth = 0usize;
        while let Some(c) = self.peek() {
            match c {
                '(' | '[' | '{' => {
                    depth += 1;
                    self.bump();
                }
                ')' | ']' | '}' => {
                    self.bump();
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return Ok(());
                    }
                }
                '\'' | '"' => self.skip_quoted(c),
                '`' => self.skip_template_source()?,
                '/' if self.starts_with("//") || self.starts_with("/*") => self.skip_trivia(),
                _ => {
                    self.bump();
                }
            }
        }
        Err(CompileError::Syntax {
            offset: start,
            message: "unbalanced brackets".to_string(),
        })
    }

    /// Skip a quoted string. A quote with no closing partner on the same line
    /// is JSX text (an apostrophe) and is skipped on its own.
    fn skip_quoted(&mut self, quote: char) {
        let mut chars = self.rest().char_indices().skip(1);
        while let Some((i, c)) = chars.next() {
            match c {
                '\\' => {
                    chars.next();
                }
                '\n' => break,
                c if c == quote => {
                    self.pos += i + c.len_utf8();
                    return;
                }
                _ => {}
            }
        }
        self.bump();
    }

    fn skip_template_source(&mut self) -> PResult<()> {
        let start = self.pos;
        self.bump();
        while let Some(c) = self.peek() {
            match c {
                '\\' => {
                    self.bump();
                    self.bump();
                }
                '`' => {
                    self.bump();
                    return Ok(());
                }
                '$' if self.peek_nth(1) == Some('{') => {
                    self.bump();
                    self.skip_balanced()?;
                }
                _ => {
                    self.bump();
                }
            }
        }
        Err(CompileError::Syntax {
            offset: start,
            message: "unterminated template literal".to_string(),
        })
    }

    /// Skip an expression whose grammar is outside the supported subset,
    /// stopping at a delimiter at bracket depth zero.
    fn skip_to_delimiter(&mut self) -> PResult<()> {
        while let Some(c) = self.peek() {
            match c {
                ',' | ')' | ']' | '}' | ';' => return Ok(()),
                '(' | '[' | '{' => self.skip_balanced()?,
                '\'' | '"' => self.skip_quoted(c),
                '`' => self.skip_template_source()?,
                _ => {
                    self.bump();
                }
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Class declarations
    // ------------------------------------------------------------------

    fn parse_class(&mut self) -> PResult<ClassDecl> {
        let start = self.pos;
        self.eat_keyword("class");
        self.skip_trivia();
        let name = self
            .parse_ident()
            .ok_or_else(|| self.error("expected class name"))?;

        self.skip_trivia();
        if !self.eat_keyword("extends") {
            return Err(self.unsupported("class declaration without a base class"));
        }

        self.skip_trivia();
        let mut base = vec![self
            .parse_ident()
            .ok_or_else(|| self.error("expected base class"))?];
        loop {
            self.skip_trivia();
            if !self.eat(".") {
                break;
            }
            self.skip_trivia();
            base.push(
                self.parse_ident()
                    .ok_or_else(|| self.error("expected base class member"))?,
            );
        }

        if self.peek() != Some('{') {
            return Err(self.error("expected class body"));
        }
        let body_start = self.pos;
        self.skip_balanced()?;
        let body = self.src[body_start..self.pos].to_string();
        let source = self.src[start..self.pos].to_string();

        self.skip_trivia();
        self.eat(";");
        self.skip_trivia();
        if !self.at_end() {
            return Err(self.unsupported("statements after the class declaration"));
        }

        Ok(ClassDecl {
            name,
            base,
            body,
            source,
        })
    }

    // ------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------

    fn parse_expression(&mut self) -> PResult<Expr> {
        let test = self.parse_binary(1)?;
        self.skip_trivia();
        if self.starts_with("?") && !self.starts_with("??") && !self.starts_with("?.") {
            self.bump();
            let consequent = self.parse_expression()?;
            self.expect(":")?;
            let alternate = self.parse_expression()?;
            return Ok(Expr::Conditional {
                test: Box::new(test),
                consequent: Box::new(consequent),
                alternate: Box::new(alternate),
            });
        }
        Ok(test)
    }

    fn peek_binary_op(&self) -> Option<(&'static str, BinaryOp)> {
        BinaryOp::TOKENS
            .iter()
            .copied()
            .find(|(token, _)| self.starts_with(token))
            .filter(|(token, _)| {
                // `=>`, `**` and compound assignments are not binary operators here
                let next = self.rest()[token.len()..].chars().next();
                !matches!(next, Some('=') if !token.ends_with('='))
                    && !(*token == "*" && next == Some('*'))
            })
    }

    fn parse_binary(&mut self, min_precedence: u8) -> PResult<Expr> {
        let mut left = self.parse_unary()?;
        loop {
            self.skip_trivia();
            let Some((token, op)) = self.peek_binary_op() else {
                break;
            };
            let precedence = op.precedence();
            if precedence < min_precedence {
                break;
            }
            self.pos += token.len();
            let right = self.parse_binary(precedence + 1)?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> PResult<Expr> {
        self.skip_trivia();
        let op = if self.starts_with("!") && !self.starts_with("!=") {
            self.bump();
            Some(UnaryOp::Not)
        } else if self.starts_with("-") && !self.starts_with("--") {
            self.bump();
            Some(UnaryOp::Neg)
        } else if self.starts_with("+") && !self.starts_with("++") {
            self.bump();
            Some(UnaryOp::Plus)
        } else if self.eat_keyword("typeof") {
            Some(UnaryOp::TypeOf)
        } else {
            None
        };

        if let Some(op) = op {
            let operand = self.parse_unary()?;
            return Ok(Expr::Unary {
                op,
                operand: Box::new(operand),
            });
        }

        if self.eat_keyword("new") {
            self.skip_trivia();
            let callee = self.parse_member_chain()?;
            self.skip_trivia();
            let args = if self.peek() == Some('(') {
                self.parse_arguments()?
            } else {
                Vec::new()
            };
            let constructed = Expr::Call {
                callee: Box::new(callee),
                args,
                construct: true,
            };
            return self.parse_postfix(constructed);
        }

        let primary = self.parse_primary()?;
        self.parse_postfix(primary)
    }

    /// Primary expression followed by `.name` / `[index]` accessors only
    fn parse_member_chain(&mut self) -> PResult<Expr> {
        let mut expr = self.parse_primary()?;
        loop {
            self.skip_trivia();
            if self.starts_with(".") && !self.starts_with("...") {
                self.bump();
                self.skip_trivia();
                let property = self
                    .parse_ident()
                    .ok_or_else(|| self.error("expected property name"))?;
                expr = Expr::Member {
                    object: Box::new(expr),
                    property,
                    optional: false,
                };
            } else {
                break;
            }
        }
        Ok(expr)
    }

    fn parse_postfix(&mut self, mut expr: Expr) -> PResult<Expr> {
        loop {
            self.skip_trivia();
            if self.starts_with("?.") {
                self.pos += 2;
                self.skip_trivia();
                match self.peek() {
                    Some('(') => {
                        let args = self.parse_arguments()?;
                        expr = Expr::Call {
                            callee: Box::new(expr),
                            args,
                            construct: false,
                        };
                    }
                    Some('[') => {
                        expr = self.parse_index(expr)?;
                    }
                    _ => {
                        let property = self
                            .parse_ident()
                            .ok_or_else(|| self.error("expected property name"))?;
                        expr = Expr::Member {
                            object: Box::new(expr),
                            property,
                            optional: true,
                        };
                    }
                }
            } else if self.starts_with(".") && !self.starts_with("...") {
                self.bump();
                self.skip_trivia();
                let property = self
                    .parse_ident()
                    .ok_or_else(|| self.error("expected property name"))?;
                expr = Expr::Member {
                    object: Box::new(expr),
                    property,
                    optional: false,
                };
            } else if self.peek() == Some('[') {
                expr = self.parse_index(expr)?;
            } else if self.peek() == Some('(') {
                let args = self.parse_arguments()?;
                expr = Expr::Call {
                    callee: Box::new(expr),
                    args,
                    construct: false,
                };
            } else {
                break;
            }
        }
        Ok(expr)
    }

    fn parse_index(&mut self, object: Expr) -> PResult<Expr> {
        self.bump();
        let index = self.parse_expression()?;
        self.expect("]")?;
        Ok(Expr::Index {
            object: Box::new(object),
            index: Box::new(index),
        })
    }

    fn parse_arguments(&mut self) -> PResult<Vec<ArrayItem>> {
        self.bump();
        let mut args = Vec::new();
        loop {
            self.skip_trivia();
            if self.eat(")") {
                break;
            }
            if self.eat("...") {
                args.push(ArrayItem::Spread(self.parse_expression()?));
            } else {
                args.push(ArrayItem::Item(self.parse_expression()?));
            }
            self.skip_trivia();
            if self.eat(",") {
                continue;
            }
            self.expect(")")?;
            break;
        }
        Ok(args)
    }

    fn parse_primary(&mut self) -> PResult<Expr> {
        self.skip_trivia();
        let Some(c) = self.peek() else {
            return Err(self.error("unexpected end of input"));
        };

        match c {
            '<' => self.parse_jsx_element().map(Expr::Element),
            '(' => {
                if self.is_arrow_params() {
                    let start = self.pos;
                    self.skip_balanced()?;
                    self.finish_arrow(start)
                } else {
                    self.bump();
                    let expr = self.parse_expression()?;
                    self.expect(")")?;
                    Ok(expr)
                }
            }
            '\'' | '"' => self.parse_string_literal(c).map(Expr::String),
            '`' => self.parse_template(),
            '[' => self.parse_array(),
            '{' => self.parse_object(),
            c if c.is_ascii_digit() || (c == '.' && self.peek_nth(1).is_some_and(|n| n.is_ascii_digit())) => {
                self.parse_number()
            }
            c if is_id_start(c) => self.parse_identifier_expression(),
            other => Err(self.error(&format!("unexpected character '{}'", other))),
        }
    }

    fn parse_identifier_expression(&mut self) -> PResult<Expr> {
        let start = self.pos;
        let Some(name) = self.parse_ident() else {
            return Err(self.error("expected identifier"));
        };

        match name.as_str() {
            "true" => return Ok(Expr::Bool(true)),
            "false" => return Ok(Expr::Bool(false)),
            "null" => return Ok(Expr::Null),
            "undefined" => return Ok(Expr::Undefined),
            "this" => return Ok(Expr::This),
            "function" => {
                self.pos = start;
                return self.parse_function_keyword(start);
            }
            "async" => {
                self.skip_trivia();
                if self.peek_keyword("function") {
                    return self.parse_function_keyword(start);
                }
                if self.peek() == Some('(') {
                    self.skip_balanced()?;
                    return self.finish_arrow(start);
                }
                if self.parse_ident().is_some() {
                    return self.finish_arrow(start);
                }
                self.pos = start + name.len();
            }
            "class" => return Err(self.unsupported("class expression")),
            _ => {}
        }

        // `value => ...`
        let after_name = self.pos;
        self.skip_trivia();
        if self.starts_with("=>") {
            return self.finish_arrow(start);
        }
        self.pos = after_name;
        Ok(Expr::Ident(name))
    }

    /// Check whether the parenthesized region at the cursor is followed by `=>`
    fn is_arrow_params(&mut self) -> bool {
        let saved = self.pos;
        let is_arrow = self.skip_balanced().is_ok() && {
            self.skip_trivia();
            self.starts_with("=>")
        };
        self.pos = saved;
        is_arrow
    }

    /// Cursor is past the parameter list; consume `=> body`
    fn finish_arrow(&mut self, start: usize) -> PResult<Expr> {
        self.expect("=>")?;
        self.skip_trivia();
        if self.peek() == Some('{') {
            self.skip_balanced()?;
        } else {
            let body_start = self.pos;
            if self.parse_expression().is_err() {
                self.pos = body_start;
                self.skip_to_delimiter()?;
            }
        }
        Ok(Expr::Function(self.src[start..self.pos].trim().to_string()))
    }

    fn parse_function_keyword(&mut self, start: usize) -> PResult<Expr> {
        self.eat_keyword("function");
        self.skip_trivia();
        self.eat("*");
        self.skip_trivia();
        self.parse_ident();
        self.skip_trivia();
        if self.peek() != Some('(') {
            return Err(self.error("expected parameter list"));
        }
        self.skip_balanced()?;
        self.skip_trivia();
        if self.peek() != Some('{') {
            return Err(self.error("expected function body"));
        }
        self.skip_balanced()?;
        Ok(Expr::Function(self.src[start..self.pos].to_string()))
    }

    fn parse_escape(&mut self, out: &mut String) -> PResult<()> {
        let Some(c) = self.bump() else {
            return Err(self.error("unterminated escape sequence"));
        };
        match c {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'b' => out.push('\u{8}'),
            'f' => out.push('\u{c}'),
            'v' => out.push('\u{b}'),
            '0' => out.push('\0'),
            '\n' => {}
            'x' => {
                let hex: String = (0..2).filter_map(|_| self.bump()).collect();
                out.push(decode_code_point(&hex, 16).ok_or_else(|| self.error("invalid \\x escape"))?);
            }
            'u' => {
                let hex: String = if self.eat("{") {
                    let mut digits = String::new();
                    while let Some(d) = self.bump() {
                        if d == '}' {
                            break;
                        }
                        digits.push(d);
                    }
                    digits
                } else {
                    (0..4).filter_map(|_| self.bump()).collect()
                };
                out.push(decode_code_point(&hex, 16).ok_or_else(|| self.error("invalid \\u escape"))?);
            }
            other => out.push(other),
        }
        Ok(())
    }

    fn parse_string_literal(&mut self, quote: char) -> PResult<String> {
        self.bump();
        let mut value = String::new();
        loop {
            match self.bump() {
                None | Some('\n') => return Err(self.error("unterminated string literal")),
                Some('\\') => self.parse_escape(&mut value)?,
                Some(c) if c == quote => return Ok(value),
                Some(c) => value.push(c),
            }
        }
    }

    fn parse_template(&mut self) -> PResult<Expr> {
        self.bump();
        let mut parts = Vec::new();
        let mut buf = String::new();
        loop {
            if self.starts_with("${") {
                self.pos += 2;
                if !buf.is_empty() {
                    parts.push(TemplatePart::Str(std::mem::take(&mut buf)));
                }
                let expr = self.parse_expression()?;
                self.expect("}")?;
                parts.push(TemplatePart::Expr(expr));
                continue;
            }
            match self.bump() {
                None => return Err(self.error("unterminated template literal")),
                Some('\\') => self.parse_escape(&mut buf)?,
                Some('`') => break,
                Some(c) => buf.push(c),
            }
        }
        if !buf.is_empty() {
            parts.push(TemplatePart::Str(buf));
        }
        Ok(Expr::Template(parts))
    }

    fn parse_number(&mut self) -> PResult<Expr> {
        let start = self.pos;
        if self.starts_with("0x") || self.starts_with("0X") {
            self.pos += 2;
            while self.peek().is_some_and(|c| c.is_ascii_hexdigit() || c == '_') {
                self.bump();
            }
            let digits = self.src[start + 2..self.pos].replace('_', "");
            return i64::from_str_radix(&digits, 16)
                .map(|n| Expr::Number(n as f64))
                .map_err(|_| self.error("invalid hex literal"));
        }

        while let Some(c) = self.peek() {
            if c.is_ascii_digit() || c == '.' || c == '_' {
                self.bump();
            } else if c == 'e' || c == 'E' {
                self.bump();
                if matches!(self.peek(), Some('+') | Some('-')) {
                    self.bump();
                }
            } else {
                break;
            }
        }
        let literal = self.src[start..self.pos].replace('_', "");
        literal
            .parse::<f64>()
            .map(Expr::Number)
            .map_err(|_| CompileError::Syntax {
                offset: start,
                message: format!("invalid number '{}'", literal),
            })
    }

    fn parse_array(&mut self) -> PResult<Expr> {
        self.bump();
        let mut items = Vec::new();
        loop {
            self.skip_trivia();
            if self.eat("]") {
                break;
            }
            if self.eat(",") {
                items.push(ArrayItem::Item(Expr::Undefined));
                continue;
            }
            if self.eat("...") {
                items.push(ArrayItem::Spread(self.parse_expression()?));
            } else {
                items.push(ArrayItem::Item(self.parse_expression()?));
            }
            self.skip_trivia();
            if self.eat(",") {
                continue;
            }
            self.expect("]")?;
            break;
        }
        Ok(Expr::Array(items))
    }

    fn parse_object(&mut self) -> PResult<Expr> {
        self.bump();
        let mut props = Vec::new();
        loop {
            self.skip_trivia();
            if self.eat("}") {
                break;
            }
            if self.eat("...") {
                props.push(ObjectProp::Spread(self.parse_expression()?));
            } else {
                let key_start = self.pos;
                let (key, is_ident) = match self.peek() {
                    Some(q @ ('\'' | '"')) => (self.parse_string_literal(q)?, false),
                    Some(c) if c.is_ascii_digit() => match self.parse_number()? {
                        Expr::Number(n) => (crate::render::format_number(n), false),
                        _ => return Err(self.error("invalid property key")),
                    },
                    Some('[') => return Err(self.unsupported("computed property key")),
                    _ => (
                        self.parse_ident()
                            .ok_or_else(|| self.error("expected property key"))?,
                        true,
                    ),
                };

                self.skip_trivia();
                if self.eat(":") {
                    props.push(ObjectProp::KeyValue(key, self.parse_expression()?));
                } else if self.peek() == Some('(') {
                    // method shorthand: `onAction() { ... }`
                    self.skip_balanced()?;
                    self.skip_trivia();
                    if self.peek() != Some('{') {
                        return Err(self.error("expected method body"));
                    }
                    self.skip_balanced()?;
                    let source = self.src[key_start..self.pos].to_string();
                    props.push(ObjectProp::KeyValue(key, Expr::Function(source)));
                } else if is_ident {
                    props.push(ObjectProp::Shorthand(key));
                } else {
                    return Err(self.error("expected ':' after property key"));
                }
            }
            self.skip_trivia();
            if self.eat(",") {
                continue;
            }
            self.expect("}")?;
            break;
        }
        Ok(Expr::Object(props))
    }

    // ------------------------------------------------------------------
    // JSX
    // ------------------------------------------------------------------

    fn parse_jsx_name(&mut self) -> Option<String> {
        if !self.peek().is_some_and(is_id_start) {
            return None;
        }
        let start = self.pos;
        while self.peek().is_some_and(is_jsx_name_char) {
            self.bump();
        }
        Some(self.src[start..self.pos].to_string())
    }

    fn parse_tag_name(&mut self) -> PResult<TagName> {
        let first = self
            .parse_jsx_name()
            .ok_or_else(|| self.error("expected tag name"))?;
        let mut segments = vec![first];
        while self.eat(".") {
            segments.push(
                self.parse_ident()
                    .ok_or_else(|| self.error("expected member tag name"))?,
            );
        }
        Ok(TagName { segments })
    }

    fn parse_jsx_element(&mut self) -> PResult<JsxElement> {
        self.bump();
        self.skip_trivia();

        if self.eat(">") {
            let children = self.parse_jsx_children(None)?;
            return Ok(JsxElement {
                name: None,
                attributes: Vec::new(),
                children,
            });
        }

        let name = self.parse_tag_name()?;
        let mut attributes = Vec::new();

        loop {
            self.skip_trivia();
            if self.eat("/>") {
                return Ok(JsxElement {
                    name: Some(name),
                    attributes,
                    children: Vec::new(),
                });
            }
            if self.eat(">") {
                break;
            }
            if self.eat("{") {
                self.skip_trivia();
                if !self.eat("...") {
                    return Err(self.error("expected spread attribute"));
                }
                let expr = self.parse_expression()?;
                self.expect("}")?;
                attributes.push(JsxAttr::Spread(expr));
                continue;
            }

            let attr_name = self
                .parse_jsx_name()
                .ok_or_else(|| self.error(&format!("expected attribute or end of <{}>", name)))?;
            self.skip_trivia();
            let value = if self.eat("=") {
                self.skip_trivia();
                Some(match self.peek() {
                    Some(q @ ('"' | '\'')) => Expr::String(self.parse_jsx_attr_string(q)?),
                    Some('{') => {
                        self.bump();
                        let expr = self.parse_expression()?;
                        self.expect("}")?;
                        expr
                    }
                    Some('<') => Expr::Element(self.parse_jsx_element()?),
                    _ => return Err(self.error("expected attribute value")),
                })
            } else {
                None
            };
            attributes.push(JsxAttr::Named {
                name: attr_name,
                value,
            });
        }

        let children = self.parse_jsx_children(Some(&name))?;
        Ok(JsxElement {
            name: Some(name),
            attributes,
            children,
        })
    }

    fn parse_jsx_attr_string(&mut self, quote: char) -> PResult<String> {
        self.bump();
        let Some(end) = self.rest().find(quote) else {
            return Err(self.error("unterminated attribute string"));
        };
        let raw = &self.rest()[..end];
        self.pos += end + quote.len_utf8();
        Ok(decode_entities(raw))
    }

    fn parse_jsx_children(&mut self, name: Option<&TagName>) -> PResult<Vec<JsxChild>> {
        let mut children = Vec::new();
        loop {
            if self.at_end() {
                let open = name.map(|n| n.to_string()).unwrap_or_default();
                return Err(self.error(&format!("unclosed <{}>", open)));
            }

            if self.eat("</") {
                self.skip_trivia();
                match name {
                    None => {}
                    Some(open) => {
                        let close = self.parse_tag_name()?;
                        if &close != open {
                            return Err(self.error(&format!(
                                "expected </{}> but found </{}>",
                                open, close
                            )));
                        }
                    }
                }
                self.expect(">")?;
                return Ok(children);
            }

            match self.peek() {
                Some('<') => children.push(JsxChild::Element(self.parse_jsx_element()?)),
                Some('{') => {
                    self.bump();
                    self.skip_trivia();
                    if self.eat("}") {
                        continue;
                    }
                    let expr = self.parse_expression()?;
                    self.expect("}")?;
                    children.push(JsxChild::Expr(expr));
                }
                _ => {
                    let end = self
                        .rest()
                        .find(['<', '{'])
                        .unwrap_or(self.rest().len());
                    let raw = &self.rest()[..end];
                    self.pos += end;
                    if let Some(text) = clean_jsx_text(&decode_entities(raw)) {
                        children.push(JsxChild::Text(text));
                    }
                }
            }
        }
    }
}

/// Collapse JSX text whitespace the way the JSX transform does: lines are
/// trimmed at their inner edges, blank lines dropped, and the remaining lines
/// joined with single spaces.
pub(crate) fn clean_jsx_text(text: &str) -> Option<String> {
    let lines: Vec<String> = text
        .split('\n')
        .map(|l| l.trim_end_matches('\r').replace('\t', " "))
        .collect();
    let last_non_empty = lines.iter().rposition(|l| l.chars().any(|c| c != ' '));

    let mut out = String::new();
    let last_index = lines.len().saturating_sub(1);
    for (i, line) in lines.iter().enumerate() {
        let mut trimmed: &str = line;
        if i != 0 {
            trimmed = trimmed.trim_start_matches(' ');
        }
        if i != last_index {
            trimmed = trimmed.trim_end_matches(' ');
        }
        if !trimmed.is_empty() {
            out.push_str(trimmed);
            if Some(i) != last_non_empty {
                out.push(' ');
            }
        }
    }

    if out.is_empty() {
        None
    } else {
        Some(out)
    }
}

fn decode_code_point(digits: &str, radix: u32) -> Option<char> {
    u32::from_str_radix(digits, radix).ok().and_then(char::from_u32)
}

/// Decode the HTML entities JSX text and attribute strings support
pub(crate) fn decode_entities(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let candidate = &rest[amp..];
        let decoded = candidate.find(';').filter(|&end| end <= 10).and_then(|end| {
            let entity = &candidate[1..end];
            let c = match entity {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                "nbsp" => Some('\u{a0}'),
                "hellip" => Some('…'),
                "mdash" => Some('—'),
                "ndash" => Some('–'),
                "rsquo" => Some('’'),
                "lsquo" => Some('‘'),
                _ => entity
                    .strip_prefix("#x")
                    .or_else(|| entity.strip_prefix("#X"))
                    .and_then(|hex| decode_code_point(hex, 16))
                    .or_else(|| entity.strip_prefix('#').and_then(|dec| decode_code_point(dec, 10))),
            };
            c.map(|c| (c, end))
        });
        match decoded {
            Some((c, end)) => {
                out.push(c);
                rest = &candidate[end + 1..];
            }
            None => {
                out.push('&');
                rest = &candidate[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expr(source: &str) -> Expr {
        match parse_fragment(source).unwrap() {
            Fragment::Expression(e) => e,
            Fragment::Class(c) => panic!("expected expression, got class {}", c.name),
        }
    }

    fn element(source: &str) -> JsxElement {
        match expr(source) {
            Expr::Element(el) => el,
            other => panic!("expected element, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_simple_element_with_text() {
        let el = element("<Button>Hi</Button>");
        assert_eq!(el.name.unwrap().to_string(), "Button");
        assert!(el.attributes.is_empty());
        assert_eq!(el.children, vec![JsxChild::Text("Hi".into())]);
    }

    #[test]
    fn test_parse_attributes_of_every_kind() {
        let el = element(
            r#"<Banner title="Order archived" status={'info'} onDismiss={() => {}} primary {...rest} icon=<Icon /> />"#,
        );
        assert_eq!(el.attributes.len(), 6);
        assert_eq!(
            el.attributes[0],
            JsxAttr::Named {
                name: "title".into(),
                value: Some(Expr::String("Order archived".into()))
            }
        );
        assert_eq!(
            el.attributes[2],
            JsxAttr::Named {
                name: "onDismiss".into(),
                value: Some(Expr::Function("() => {}".into()))
            }
        );
        assert_eq!(
            el.attributes[3],
            JsxAttr::Named {
                name: "primary".into(),
                value: None
            }
        );
        assert_eq!(el.attributes[4], JsxAttr::Spread(Expr::Ident("rest".into())));
        assert!(matches!(
            &el.attributes[5],
            JsxAttr::Named { value: Some(Expr::Element(_)), .. }
        ));
    }

    #[test]
    fn test_parse_member_tag_and_matching_close() {
        let el = element("<Card.Section title=\"Items\"><p>One</p></Card.Section>");
        let name = el.name.unwrap();
        assert_eq!(name.segments, vec!["Card", "Section"]);
        assert!(!name.is_intrinsic());
        assert!(matches!(el.children[0], JsxChild::Element(_)));
    }

    #[test]
    fn test_mismatched_closing_tag_is_error() {
        let err = parse_fragment("<Card><p>x</div></Card>").unwrap_err();
        assert!(matches!(err, CompileError::Syntax { ref message, .. } if message.contains("</p>")));
    }

    #[test]
    fn test_fragment_shorthand() {
        let el = element("<>\n  <A />\n  <B />\n</>");
        assert!(el.name.is_none());
        assert_eq!(el.children.len(), 2);
    }

    #[test]
    fn test_multiline_text_collapses_whitespace() {
        let el = element("<p>\n  Use badges to\n  indicate status.\n</p>");
        assert_eq!(
            el.children,
            vec![JsxChild::Text("Use badges to indicate status.".into())]
        );
    }

    #[test]
    fn test_text_keeps_inline_spaces_next_to_expressions() {
        let el = element("<p>Hello {name}!</p>");
        assert_eq!(
            el.children,
            vec![
                JsxChild::Text("Hello ".into()),
                JsxChild::Expr(Expr::Ident("name".into())),
                JsxChild::Text("!".into()),
            ]
        );
    }

    #[test]
    fn test_comment_containers_are_dropped() {
        let el = element("<div>{/* nothing here */}<span /></div>");
        assert_eq!(el.children.len(), 1);
    }

    #[test]
    fn test_entities_are_decoded() {
        let el = element("<p>Fish &amp; chips&nbsp;&#33;</p>");
        assert_eq!(
            el.children,
            vec![JsxChild::Text("Fish & chips\u{a0}!".into())]
        );
    }

    #[test]
    fn test_apostrophes_in_text_inside_arrow_body() {
        let el = element(
            "<List renderItem={(item) => {\n  return <p>Don't panic</p>;\n}} />",
        );
        assert!(matches!(
            &el.attributes[0],
            JsxAttr::Named { value: Some(Expr::Function(src)), .. } if src.contains("Don't")
        ));
    }

    #[test]
    fn test_expression_operators() {
        let e = expr("a && !b ? 'x' : count + 1");
        let Expr::Conditional { test, alternate, .. } = e else {
            panic!("expected conditional");
        };
        assert!(matches!(*test, Expr::Binary { op: BinaryOp::And, .. }));
        assert!(matches!(*alternate, Expr::Binary { op: BinaryOp::Add, .. }));
    }

    #[test]
    fn test_object_and_array_literals() {
        let e = expr("{content: 'Save', url, ...extra, 'data-id': 3, onAction() { save(); }}");
        let Expr::Object(props) = e else {
            panic!("expected object");
        };
        assert_eq!(props.len(), 5);
        assert_eq!(props[1], ObjectProp::Shorthand("url".into()));
        assert_eq!(props[3], ObjectProp::KeyValue("data-id".into(), Expr::Number(3.0)));
        assert!(matches!(&props[4], ObjectProp::KeyValue(k, Expr::Function(_)) if k == "onAction"));

        let e = expr("[1, , ...more]");
        assert_eq!(
            e,
            Expr::Array(vec![
                ArrayItem::Item(Expr::Number(1.0)),
                ArrayItem::Item(Expr::Undefined),
                ArrayItem::Spread(Expr::Ident("more".into())),
            ])
        );
    }

    #[test]
    fn test_template_literal_parts() {
        let e = expr("`Total: ${count} items`");
        assert_eq!(
            e,
            Expr::Template(vec![
                TemplatePart::Str("Total: ".into()),
                TemplatePart::Expr(Expr::Ident("count".into())),
                TemplatePart::Str(" items".into()),
            ])
        );
    }

    #[test]
    fn test_arrow_with_expression_body_outside_subset() {
        let el = element("<Button onClick={() => count++}>Add</Button>");
        assert!(matches!(
            &el.attributes[0],
            JsxAttr::Named { value: Some(Expr::Function(src)), .. } if src == "() => count++"
        ));
    }

    #[test]
    fn test_trailing_semicolon_and_parentheses() {
        let el = element("(\n  <Badge>New</Badge>\n);");
        assert_eq!(el.name.unwrap().root(), "Badge");
    }

    #[test]
    fn test_trailing_statement_is_error() {
        assert!(parse_fragment("<A />; foo").is_err());
    }

    #[test]
    fn test_parse_class_declaration() {
        let source = "class ModalExample extends React.Component {\n  state = {active: false};\n  render() {\n    return <Modal open={this.state.active} />;\n  }\n}";
        let Fragment::Class(class) = parse_fragment(source).unwrap() else {
            panic!("expected class");
        };
        assert_eq!(class.name, "ModalExample");
        assert_eq!(class.base, vec!["React", "Component"]);
        assert!(class.body.starts_with('{') && class.body.ends_with('}'));
        assert_eq!(class.source, source);
    }

    #[test]
    fn test_class_without_base_is_unsupported() {
        let err = parse_fragment("class Foo { }").unwrap_err();
        assert!(matches!(err, CompileError::Unsupported { .. }));
    }

    #[test]
    fn test_unclosed_element_is_error() {
        let err = parse_fragment("<Card><p>text</p>").unwrap_err();
        assert!(matches!(err, CompileError::Syntax { ref message, .. } if message.contains("unclosed")));
    }

    #[test]
    fn test_fragment_end_excludes_trailing_semicolon_and_comments() {
        let source = "<Badge>New</Badge>; // status badge\n/* trailing */";
        let (_, end) = parse_fragment_with_end(source).unwrap();
        assert_eq!(&source[..end], "<Badge>New</Badge>");

        let source = "items.length > 0 ? <List items={items} /> : null /* empty */";
        let (_, end) = parse_fragment_with_end(source).unwrap();
        assert_eq!(&source[..end], "items.length > 0 ? <List items={items} /> : null");
    }

    #[test]
    fn test_fragment_end_of_class_stops_at_closing_brace() {
        let source = "class Foo extends Base {\n}; // done";
        let (_, end) = parse_fragment_with_end(source).unwrap();
        assert_eq!(&source[..end], "class Foo extends Base {\n}");
    }

    #[test]
    fn test_clean_jsx_text_whitespace_only_is_dropped() {
        assert_eq!(clean_jsx_text("\n    \n  "), None);
        assert_eq!(clean_jsx_text("  a  "), Some("  a  ".into()));
    }
}
