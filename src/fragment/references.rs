//! References made from source the parser keeps opaque.
//!
//! Function and class bodies hold statements, which the expression parser
//! does not model. They are scanned token by token instead: an identifier is
//! a reference unless it is a property name, a keyword, a well-known global
//! or declared inside the scanned source. JSX in expression position is
//! parsed with the fragment parser so its text never reads as identifiers.

use std::collections::HashSet;

use super::analysis::element_identifiers;
use super::parser::{is_id_continue, is_id_start, parse_jsx_at};

const KEYWORDS: &[&str] = &[
    "async", "await", "break", "case", "catch", "class", "const", "continue", "debugger",
    "default", "delete", "do", "else", "export", "extends", "false", "finally", "for",
    "function", "get", "if", "import", "in", "instanceof", "let", "new", "null", "of", "return",
    "set", "static", "super", "switch", "this", "throw", "true", "try", "typeof", "var", "void",
    "while", "with", "yield",
];

/// Host globals an example may use without the scope providing them
const GLOBALS: &[&str] = &[
    "Array", "Boolean", "Date", "Error", "Infinity", "JSON", "Map", "Math", "NaN", "Number",
    "Object", "Promise", "RegExp", "Set", "String", "Symbol", "alert", "arguments",
    "clearInterval", "clearTimeout", "console", "decodeURIComponent", "document",
    "encodeURIComponent", "fetch", "globalThis", "isNaN", "localStorage", "location",
    "navigator", "parseFloat", "parseInt", "setInterval", "setTimeout", "undefined", "window",
];

/// Multi-character punctuators, longest first
const PUNCTUATORS: &[&str] = &[
    "===", "!==", "...", "=>", "?.", "==", "!=", "<=", ">=", "&&", "||", "??", "++", "--", "+=",
    "-=", "*=", "/=",
];

/// Keywords after which `<` starts JSX rather than a comparison
const EXPRESSION_KEYWORDS: &[&str] = &[
    "return", "yield", "default", "else", "case", "await", "in", "of", "typeof", "void", "do",
];

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Ident(String),
    Punct(String),
    Literal,
    /// A parsed JSX element, reduced to its free identifiers
    Jsx(Vec<String>),
}

impl Token {
    fn is_punct(&self, p: &str) -> bool {
        matches!(self, Token::Punct(q) if q == p)
    }
}

struct Scanner<'src> {
    src: &'src str,
    pos: usize,
    tokens: Vec<Token>,
}

impl<'src> Scanner<'src> {
    fn rest(&self) -> &'src str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn push_punct(&mut self, punct: &str) {
        self.tokens.push(Token::Punct(punct.to_string()));
    }

    /// Tokenize until the end of input, or until an unmatched `}` when
    /// scanning a template interpolation.
    fn scan(&mut self, in_interpolation: bool) {
        let mut depth = 0usize;
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.bump();
                continue;
            }
            if self.rest().starts_with("//") {
                let len = self.rest().find('\n').unwrap_or(self.rest().len());
                self.pos += len;
                continue;
            }
            if self.rest().starts_with("/*") {
                match self.rest()[2..].find("*/") {
                    Some(end) => self.pos += end + 4,
                    None => self.pos = self.src.len(),
                }
                continue;
            }

            match c {
                '\'' | '"' => {
                    self.skip_string(c);
                    self.tokens.push(Token::Literal);
                }
                '`' => self.scan_template(),
                '<' if self.jsx_allowed() => self.scan_jsx(),
                c if is_id_start(c) => {
                    let start = self.pos;
                    while self.peek().is_some_and(is_id_continue) {
                        self.bump();
                    }
                    self.tokens.push(Token::Ident(self.src[start..self.pos].to_string()));
                }
                c if c.is_ascii_digit() => {
                    while self.peek().is_some_and(|c| c.is_alphanumeric() || c == '.' || c == '_') {
                        self.bump();
                    }
                    self.tokens.push(Token::Literal);
                }
                '{' => {
                    depth += 1;
                    self.bump();
                    self.push_punct("{");
                }
                '}' => {
                    self.bump();
                    if in_interpolation && depth == 0 {
                        return;
                    }
                    depth = depth.saturating_sub(1);
                    self.push_punct("}");
                }
                _ => {
                    let punct = PUNCTUATORS
                        .iter()
                        .find(|p| self.rest().starts_with(**p))
                        .map(|p| p.to_string())
                        .unwrap_or_else(|| c.to_string());
                    self.pos += punct.len();
                    self.tokens.push(Token::Punct(punct));
                }
            }
        }
    }

    /// A quote without a closing partner on its line is a lone apostrophe
    fn skip_string(&mut self, quote: char) {
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

    /// Interpolations are emitted as parenthesized groups
    fn scan_template(&mut self) {
        self.bump();
        while let Some(c) = self.peek() {
            match c {
                '\\' => {
                    self.bump();
                    self.bump();
                }
                '`' => {
                    self.bump();
                    break;
                }
                '$' if self.rest().starts_with("${") => {
                    self.pos += 2;
                    self.push_punct("(");
                    self.scan(true);
                    self.push_punct(")");
                }
                _ => {
                    self.bump();
                }
            }
        }
        self.tokens.push(Token::Literal);
    }

    fn jsx_allowed(&self) -> bool {
        let next = self.rest()[1..].chars().next();
        if !next.is_some_and(|c| is_id_start(c) || c == '>') {
            return false;
        }
        match self.tokens.last() {
            None => true,
            Some(Token::Punct(p)) => matches!(
                p.as_str(),
                "(" | "[" | "{" | "," | ";" | "=" | "=>" | "?" | ":" | "&&" | "||" | "??" | "!"
            ),
            Some(Token::Ident(word)) => EXPRESSION_KEYWORDS.contains(&word.as_str()),
            _ => false,
        }
    }

    fn scan_jsx(&mut self) {
        match parse_jsx_at(self.src, self.pos) {
            Ok((element, end)) => {
                self.tokens.push(Token::Jsx(element_identifiers(&element)));
                self.pos = end;
            }
            Err(_) => {
                self.bump();
                self.push_punct("<");
            }
        }
    }
}

fn tokenize(source: &str) -> Vec<Token> {
    let mut scanner = Scanner {
        src: source,
        pos: 0,
        tokens: Vec::new(),
    };
    scanner.scan(false);
    scanner.tokens
}

fn is_keyword(word: &str) -> bool {
    KEYWORDS.contains(&word)
}

/// Index of the bracket closing the one at `open`
fn group_end(tokens: &[Token], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, token) in tokens.iter().enumerate().skip(open) {
        if let Token::Punct(p) = token {
            match p.as_str() {
                "(" | "[" | "{" => depth += 1,
                ")" | "]" | "}" => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return Some(i);
                    }
                }
                _ => {}
            }
        }
    }
    None
}

/// Every identifier inside the group opening at `open`
fn declare_group(tokens: &[Token], open: usize, names: &mut HashSet<String>) {
    let Some(close) = group_end(tokens, open) else {
        return;
    };
    for token in &tokens[open..close] {
        if let Token::Ident(name) = token {
            if !is_keyword(name) {
                names.insert(name.clone());
            }
        }
    }
}

fn is_group_open(token: Option<&Token>) -> bool {
    matches!(token, Some(Token::Punct(p)) if p == "(" || p == "[" || p == "{")
}

/// Whether the group opening at `open` is followed by `next`
fn group_followed_by(tokens: &[Token], open: usize, next: &str) -> bool {
    group_end(tokens, open)
        .and_then(|close| tokens.get(close + 1))
        .is_some_and(|t| t.is_punct(next))
}

/// Names declared anywhere in the scanned source: variables, functions,
/// classes and parameters. Scoping is not tracked.
fn declared_names(tokens: &[Token]) -> HashSet<String> {
    let mut names = HashSet::new();
    for (i, token) in tokens.iter().enumerate() {
        match token {
            Token::Ident(word) if matches!(word.as_str(), "const" | "let" | "var") => {
                match tokens.get(i + 1) {
                    Some(Token::Ident(name)) => {
                        names.insert(name.clone());
                    }
                    next if is_group_open(next) => declare_group(tokens, i + 1, &mut names),
                    _ => {}
                }
            }
            Token::Ident(word) if word == "function" || word == "class" => {
                let mut next = i + 1;
                if let Some(Token::Ident(name)) = tokens.get(next) {
                    if !is_keyword(name) {
                        names.insert(name.clone());
                    }
                    next += 1;
                }
                if word == "function" && tokens.get(next).is_some_and(|t| t.is_punct("(")) {
                    declare_group(tokens, next, &mut names);
                }
            }
            Token::Ident(word) if word == "catch" => {
                if tokens.get(i + 1).is_some_and(|t| t.is_punct("(")) {
                    declare_group(tokens, i + 1, &mut names);
                }
            }
            Token::Ident(name) => {
                if tokens.get(i + 1).is_some_and(|t| t.is_punct("=>")) {
                    names.insert(name.clone());
                } else if !is_keyword(name)
                    && tokens.get(i + 1).is_some_and(|t| t.is_punct("("))
                    && group_followed_by(tokens, i + 1, "{")
                {
                    // method parameters
                    declare_group(tokens, i + 1, &mut names);
                }
            }
            Token::Punct(p) if p == "(" && group_followed_by(tokens, i, "=>") => {
                declare_group(tokens, i, &mut names);
            }
            _ => {}
        }
    }
    names
}

fn is_reference(tokens: &[Token], index: usize, name: &str) -> bool {
    if is_keyword(name) || GLOBALS.contains(&name) {
        return false;
    }
    let prev = index.checked_sub(1).and_then(|i| tokens.get(i));
    let next = tokens.get(index + 1);

    if prev.is_some_and(|t| t.is_punct(".") || t.is_punct("?.")) {
        return false;
    }
    // assignment targets and class fields
    if next.is_some_and(|t| t.is_punct("=")) {
        return false;
    }
    // object keys
    if next.is_some_and(|t| t.is_punct(":")) && prev.is_some_and(|t| t.is_punct("{") || t.is_punct(",")) {
        return false;
    }
    // method names
    if next.is_some_and(|t| t.is_punct("(")) && group_followed_by(tokens, index + 1, "{") {
        return false;
    }
    true
}

/// Names `source` (a function or class body) expects from the enclosing
/// scope, in first-appearance order
pub(crate) fn opaque_references(source: &str) -> Vec<String> {
    let tokens = tokenize(source);
    let locals = declared_names(&tokens);

    let mut references: Vec<String> = Vec::new();
    let mut add = |name: &str| {
        if !locals.contains(name) && !references.iter().any(|r| r == name) {
            references.push(name.to_string());
        }
    };
    for (i, token) in tokens.iter().enumerate() {
        match token {
            Token::Ident(name) if is_reference(&tokens, i, name) => add(name),
            Token::Jsx(names) => names.iter().for_each(|name| add(name)),
            _ => {}
        }
    }
    references
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arrow_parameters_are_local() {
        assert_eq!(
            opaque_references("(item) => <Avatar name={item.name} />"),
            vec!["Avatar"]
        );
        assert_eq!(opaque_references("value => setValue(value)"), vec!["setValue"]);
    }

    #[test]
    fn test_block_body_declarations_are_local() {
        let source = "() => {\n  const {items, total} = data;\n  let count = items.length;\n  return <Summary count={count} total={total} />;\n}";
        assert_eq!(opaque_references(source), vec!["data", "Summary"]);
    }

    #[test]
    fn test_properties_keys_and_globals_are_skipped() {
        let source = "() => console.log({content: label, url}, Math.max(a.b, 1))";
        assert_eq!(opaque_references(source), vec!["label", "url", "a"]);
    }

    #[test]
    fn test_class_body_members_and_member_roots() {
        let source = "{\n  state = {selected: []};\n\n  handleSelection = (selected) => {\n    this.setState({selected});\n  };\n\n  render() {\n    const all = ResourceList.SELECT_ALL_ITEMS;\n    return (\n      <Card>\n        <ResourceList items={all} onSelectionChange={this.handleSelection} />\n      </Card>\n    );\n  }\n}";
        assert_eq!(opaque_references(source), vec!["ResourceList", "Card"]);
    }

    #[test]
    fn test_jsx_text_is_not_scanned() {
        assert_eq!(
            opaque_references("() => <p>Don't panic, Ford</p>"),
            Vec::<String>::new()
        );
    }

    #[test]
    fn test_template_interpolations_and_comparisons() {
        let source = "(n) => n < limit ? `${n} of ${total}` : fallback // note: ignored";
        assert_eq!(opaque_references(source), vec!["limit", "total", "fallback"]);
    }

    #[test]
    fn test_function_keyword_and_catch() {
        let source = "function handle(event) {\n  try {\n    submit(event);\n  } catch (error) {\n    report(error);\n  }\n}";
        assert_eq!(opaque_references(source), vec!["submit", "report"]);
    }
}
