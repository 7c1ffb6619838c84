//! Tolerant parser for definition modules
//!
//! The parser scans top-level statements looking for exported `const`
//! declarations and parses their initializers into [`Expr`] trees. It is
//! deliberately forgiving: statements it does not understand are skipped,
//! and expression constructs outside the closed literal grammar are folded
//! into [`Expr::Unsupported`] by consuming balanced delimiters. A malformed
//! file therefore never aborts a build - it just yields nothing to extract.

use super::ast::{Expr, Module, ObjectEntry, PropertyKey, Statement};
use super::lexer::{tokenize, Token};

/// Parses a definition source file into a module
pub fn parse_module(source: &str) -> Module {
    let mut parser = Parser {
        tokens: tokenize(source),
        pos: 0,
    };
    parser.parse_module()
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn parse_module(&mut self) -> Module {
        let mut statements = Vec::new();

        while self.pos < self.tokens.len() {
            if self.at_ident("export") && self.at_ident_at(1, "const") {
                statements.push(self.parse_export_const());
            } else {
                self.skip_statement();
                statements.push(Statement::Other);
            }
        }

        Module { statements }
    }

    /// Parses `export const <name>[: <annotation>] = <expr>;`
    fn parse_export_const(&mut self) -> Statement {
        self.bump(); // export
        self.bump(); // const

        let name = match self.peek() {
            Some(Token::Ident(n)) => {
                let n = n.clone();
                self.bump();
                n
            }
            _ => {
                self.skip_statement();
                return Statement::Other;
            }
        };

        let annotation = if self.at_punct(':') {
            self.bump();
            self.capture_annotation()
        } else {
            String::new()
        };

        if !self.at_punct('=') {
            self.skip_statement();
            return Statement::Other;
        }
        self.bump(); // =

        let init = self.parse_expr();
        self.skip_to_statement_end();

        Statement::ExportConst {
            name,
            annotation,
            init,
        }
    }

    /// Captures annotation tokens up to the `=` initializer marker,
    /// tracking bracket depth so generics and object types pass through
    fn capture_annotation(&mut self) -> String {
        let mut depth: i32 = 0;
        let mut parts = Vec::new();

        while let Some(token) = self.peek() {
            match token {
                Token::Punct('=') if depth == 0 => break,
                Token::Punct('{' | '[' | '(' | '<') => depth += 1,
                Token::Punct('}' | ']' | ')' | '>') => depth -= 1,
                _ => {}
            }
            parts.push(token.text());
            self.bump();
        }

        parts.join(" ")
    }

    /// Skips a statement we are not extracting from. Stops after a
    /// top-level `;`, after a balanced top-level `{...}` block, or just
    /// before the next `export` so a missing semicolon cannot swallow the
    /// declaration we actually want.
    fn skip_statement(&mut self) {
        let mut depth: i32 = 0;
        let mut opened_block = false;
        let mut consumed = false;

        while let Some(token) = self.peek() {
            if consumed && depth == 0 && (opened_block || self.at_ident("export")) {
                return;
            }
            match token {
                Token::Punct('{') => {
                    if depth == 0 {
                        opened_block = true;
                    }
                    depth += 1;
                }
                Token::Punct('[' | '(') => depth += 1,
                Token::Punct('}' | ']' | ')') => depth -= 1,
                Token::Punct(';') if depth <= 0 => {
                    self.bump();
                    return;
                }
                _ => {}
            }
            self.bump();
            consumed = true;
        }
    }

    /// Consumes trailing tokens of a declaration up to and including `;`
    fn skip_to_statement_end(&mut self) {
        let mut depth: i32 = 0;

        while let Some(token) = self.peek() {
            match token {
                Token::Punct(';') if depth == 0 => {
                    self.bump();
                    return;
                }
                Token::Ident(word) if depth == 0 && word == "export" => return,
                Token::Punct('{' | '[' | '(') => depth += 1,
                Token::Punct('}' | ']' | ')') => depth -= 1,
                _ => {}
            }
            self.bump();
        }
    }

    fn parse_expr(&mut self) -> Expr {
        let mut expr = self.parse_primary();

        loop {
            match self.peek() {
                // Member access: `Foo.bar`
                Some(Token::Punct('.')) => {
                    self.bump();
                    if matches!(self.peek(), Some(Token::Ident(_))) {
                        self.bump();
                    }
                    expr = Expr::Unsupported("member");
                }
                // Call: `fn(...)` - consume balanced arguments
                Some(Token::Punct('(')) => {
                    self.skip_balanced('(', ')');
                    expr = Expr::Unsupported("call");
                }
                // Index: `x[...]`
                Some(Token::Punct('[')) => {
                    self.skip_balanced('[', ']');
                    expr = Expr::Unsupported("member");
                }
                // Arrow function body
                Some(Token::Arrow) => {
                    self.bump();
                    if self.at_punct('{') {
                        self.skip_balanced('{', '}');
                    } else {
                        let _ = self.parse_expr();
                    }
                    expr = Expr::Unsupported("arrow");
                }
                // Ternary: keep `:` consumption here so object parsing
                // stays in sync on commas
                Some(Token::Punct('?')) => {
                    self.bump();
                    let _ = self.parse_expr();
                    if self.at_punct(':') {
                        self.bump();
                        let _ = self.parse_expr();
                    }
                    expr = Expr::Unsupported("conditional");
                }
                // Binary operators
                Some(Token::Punct(c)) if is_binary_op(*c) => {
                    while matches!(self.peek(), Some(Token::Punct(c)) if is_binary_op(*c) || *c == '=')
                    {
                        self.bump();
                    }
                    let _ = self.parse_expr();
                    expr = Expr::Unsupported("binary");
                }
                // `as const` / `as SomeType` assertions do not change the value
                Some(Token::Ident(word)) if word == "as" => {
                    self.bump();
                    if matches!(self.peek(), Some(Token::Ident(_))) {
                        self.bump();
                    }
                    if self.at_punct('<') {
                        self.skip_balanced('<', '>');
                    }
                }
                _ => break,
            }
        }

        expr
    }

    fn parse_primary(&mut self) -> Expr {
        match self.peek().cloned() {
            Some(Token::Str(s)) => {
                self.bump();
                Expr::Str(s)
            }
            Some(Token::Num(n)) => {
                self.bump();
                Expr::Num(n)
            }
            Some(Token::Template { text, has_spans }) => {
                self.bump();
                Expr::Template { text, has_spans }
            }
            Some(Token::Ident(word)) => {
                self.bump();
                match word.as_str() {
                    "true" => Expr::Bool(true),
                    "false" => Expr::Bool(false),
                    "null" => Expr::Null,
                    _ => Expr::Unsupported("identifier"),
                }
            }
            Some(Token::Punct('(')) => self.parse_paren_or_arrow(),
            Some(Token::Punct('[')) => self.parse_array(),
            Some(Token::Punct('{')) => self.parse_object(),
            Some(Token::Punct('-' | '+' | '!' | '~')) => {
                self.bump();
                let _ = self.parse_expr();
                Expr::Unsupported("unary")
            }
            Some(Token::Spread) => {
                self.bump();
                let _ = self.parse_expr();
                Expr::Unsupported("spread")
            }
            Some(_) => {
                self.bump();
                Expr::Unsupported("expression")
            }
            None => Expr::Unsupported("expression"),
        }
    }

    /// `(expr)` unwraps; `(...) => ...` is an arrow parameter list
    fn parse_paren_or_arrow(&mut self) -> Expr {
        let close = self.find_matching(self.pos, '(', ')');

        if let Some(close_idx) = close {
            if matches!(self.tokens.get(close_idx + 1), Some(Token::Arrow)) {
                self.pos = close_idx + 2;
                if self.at_punct('{') {
                    self.skip_balanced('{', '}');
                } else {
                    let _ = self.parse_expr();
                }
                return Expr::Unsupported("arrow");
            }
        }

        self.bump(); // (
        let inner = self.parse_expr();

        if self.at_punct(')') {
            self.bump();
            Expr::Paren(Box::new(inner))
        } else {
            // Residual tokens inside the parentheses: not a plain
            // parenthesized literal, give up on the whole group
            if let Some(close_idx) = close {
                self.pos = close_idx + 1;
            }
            Expr::Unsupported("expression")
        }
    }

    fn parse_array(&mut self) -> Expr {
        self.bump(); // [
        let mut elements = Vec::new();

        loop {
            if self.at_punct(']') {
                self.bump();
                break;
            }
            if self.peek().is_none() {
                break;
            }

            if matches!(self.peek(), Some(Token::Spread)) {
                self.bump();
                let _ = self.parse_expr();
                elements.push(Expr::Unsupported("spread"));
            } else {
                elements.push(self.parse_expr());
            }

            if self.at_punct(',') {
                self.bump();
            } else if !self.at_punct(']') {
                // Garbage between element and separator: demote the
                // element and resync on the next comma or close bracket
                if let Some(last) = elements.last_mut() {
                    *last = Expr::Unsupported("expression");
                }
                self.resync_list(']');
            }
        }

        Expr::Array(elements)
    }

    fn parse_object(&mut self) -> Expr {
        self.bump(); // {
        let mut entries = Vec::new();

        loop {
            if self.at_punct('}') {
                self.bump();
                break;
            }
            if self.peek().is_none() {
                break;
            }

            entries.push(self.parse_object_entry());

            if self.at_punct(',') {
                self.bump();
            } else if !self.at_punct('}') {
                if let Some(last) = entries.last_mut() {
                    *last = ObjectEntry::Unsupported;
                }
                self.resync_list('}');
            }
        }

        Expr::Object(entries)
    }

    fn parse_object_entry(&mut self) -> ObjectEntry {
        // Spread entry
        if matches!(self.peek(), Some(Token::Spread)) {
            self.bump();
            let _ = self.parse_expr();
            return ObjectEntry::Unsupported;
        }

        // Computed key: `[expr]: value`
        if self.at_punct('[') {
            self.skip_balanced('[', ']');
            if self.at_punct(':') {
                self.bump();
                let _ = self.parse_expr();
            }
            return ObjectEntry::Unsupported;
        }

        let key = match self.peek().cloned() {
            Some(Token::Ident(name)) => {
                self.bump();
                PropertyKey::Ident(name)
            }
            Some(Token::Str(s)) => {
                self.bump();
                PropertyKey::Str(s)
            }
            Some(Token::Num(n)) => {
                self.bump();
                PropertyKey::Num(n)
            }
            _ => {
                self.resync_list('}');
                return ObjectEntry::Unsupported;
            }
        };

        if !self.at_punct(':') {
            // Shorthand property or method - not part of the grammar
            self.resync_list('}');
            return ObjectEntry::Unsupported;
        }
        self.bump(); // :

        let value = self.parse_expr();
        ObjectEntry::Property { key, value }
    }

    /// Skips forward to the next `,` or `close` at the current nesting level
    fn resync_list(&mut self, close: char) {
        let mut depth: i32 = 0;

        while let Some(token) = self.peek() {
            match token {
                Token::Punct(',') if depth == 0 => return,
                Token::Punct(c) if depth == 0 && *c == close => return,
                Token::Punct('{' | '[' | '(') => depth += 1,
                Token::Punct('}' | ']' | ')') => {
                    if depth == 0 {
                        return;
                    }
                    depth -= 1;
                }
                _ => {}
            }
            self.bump();
        }
    }

    /// Consumes a balanced delimiter group starting at the current token
    fn skip_balanced(&mut self, open: char, close: char) {
        if !self.at_punct(open) {
            return;
        }
        self.bump();
        let mut depth = 1;

        while let Some(token) = self.peek() {
            match token {
                Token::Punct(c) if *c == open => depth += 1,
                Token::Punct(c) if *c == close => {
                    depth -= 1;
                    if depth == 0 {
                        self.bump();
                        return;
                    }
                }
                _ => {}
            }
            self.bump();
        }
    }

    /// Returns the index of the token closing the group opened at `start`
    fn find_matching(&self, start: usize, open: char, close: char) -> Option<usize> {
        let mut depth = 0;

        for (i, token) in self.tokens.iter().enumerate().skip(start) {
            match token {
                Token::Punct(c) if *c == open => depth += 1,
                Token::Punct(c) if *c == close => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(i);
                    }
                }
                _ => {}
            }
        }

        None
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn bump(&mut self) {
        self.pos += 1;
    }

    fn at_punct(&self, c: char) -> bool {
        matches!(self.peek(), Some(Token::Punct(p)) if *p == c)
    }

    fn at_ident(&self, word: &str) -> bool {
        matches!(self.peek(), Some(Token::Ident(w)) if w == word)
    }

    fn at_ident_at(&self, offset: usize, word: &str) -> bool {
        matches!(self.tokens.get(self.pos + offset), Some(Token::Ident(w)) if w == word)
    }
}

fn is_binary_op(c: char) -> bool {
    matches!(c, '+' | '-' | '*' | '/' | '%' | '&' | '|' | '^' | '<' | '>')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first_export(module: &Module) -> (&str, &str, &Expr) {
        for statement in &module.statements {
            if let Statement::ExportConst {
                name,
                annotation,
                init,
            } = statement
            {
                return (name, annotation, init);
            }
        }
        panic!("no exported const in module");
    }

    #[test]
    fn parses_exported_object() {
        let module = parse_module(
            "export const definition: DocumentDefinition = { id: 'nda', states: 'all' };",
        );
        let (name, annotation, init) = first_export(&module);

        assert_eq!(name, "definition");
        assert!(annotation.contains("DocumentDefinition"));
        match init {
            Expr::Object(entries) => assert_eq!(entries.len(), 2),
            other => panic!("expected object, got {:?}", other),
        }
    }

    #[test]
    fn skips_imports_and_interfaces() {
        let module = parse_module(
            "import { DocumentDefinition } from '../types';\n\
             interface Local { x: number }\n\
             export const definition: DocumentDefinition = { id: 'a' };",
        );
        let (name, _, _) = first_export(&module);
        assert_eq!(name, "definition");
    }

    #[test]
    fn annotation_captured_with_generics() {
        let module = parse_module("export const d: Readonly<DocumentDefinition> = { id: 'x' };");
        let (_, annotation, _) = first_export(&module);
        assert!(annotation.contains("DocumentDefinition"));
    }

    #[test]
    fn untyped_export_has_empty_annotation() {
        let module = parse_module("export const d = { id: 'x' };");
        let (_, annotation, _) = first_export(&module);
        assert_eq!(annotation, "");
    }

    #[test]
    fn call_becomes_unsupported() {
        let module = parse_module("export const d: T = makeDefinition({ id: 'x' });");
        let (_, _, init) = first_export(&module);
        assert_eq!(init, &Expr::Unsupported("call"));
    }

    #[test]
    fn arrow_value_becomes_unsupported() {
        let module = parse_module("export const d: T = { load: () => import('./x'), id: 'y' };");
        let (_, _, init) = first_export(&module);

        let Expr::Object(entries) = init else {
            panic!("expected object")
        };
        assert_eq!(entries.len(), 2);
        assert!(matches!(
            &entries[0],
            ObjectEntry::Property {
                value: Expr::Unsupported("arrow"),
                ..
            }
        ));
        assert!(matches!(
            &entries[1],
            ObjectEntry::Property {
                value: Expr::Str(s),
                ..
            } if s == "y"
        ));
    }

    #[test]
    fn spread_entries_are_unsupported() {
        let module = parse_module("export const d: T = { ...base, id: 'x' };");
        let (_, _, init) = first_export(&module);

        let Expr::Object(entries) = init else {
            panic!("expected object")
        };
        assert_eq!(entries[0], ObjectEntry::Unsupported);
        assert!(matches!(&entries[1], ObjectEntry::Property { .. }));
    }

    #[test]
    fn array_with_spread_keeps_siblings() {
        let module = parse_module("export const d: T = ['a', ...rest, 'b'];");
        let (_, _, init) = first_export(&module);

        let Expr::Array(elements) = init else {
            panic!("expected array")
        };
        assert_eq!(elements.len(), 3);
        assert_eq!(elements[0], Expr::Str("a".into()));
        assert_eq!(elements[1], Expr::Unsupported("spread"));
        assert_eq!(elements[2], Expr::Str("b".into()));
    }

    #[test]
    fn parenthesized_literal_unwraps() {
        let module = parse_module("export const d: T = ('hello');");
        let (_, _, init) = first_export(&module);
        assert_eq!(init, &Expr::Paren(Box::new(Expr::Str("hello".into()))));
    }

    #[test]
    fn multiple_exports_all_captured() {
        let module = parse_module(
            "export const a: T = 1;\nexport const b: U = 2;",
        );
        let exports: Vec<_> = module
            .statements
            .iter()
            .filter(|s| matches!(s, Statement::ExportConst { .. }))
            .collect();
        assert_eq!(exports.len(), 2);
    }

    #[test]
    fn as_const_assertion_preserves_value() {
        let module = parse_module("export const d: T = { id: 'x' } as const;");
        let (_, _, init) = first_export(&module);
        assert!(matches!(init, Expr::Object(_)));
    }

    #[test]
    fn ternary_resyncs_on_comma() {
        let module = parse_module("export const d: T = { a: x ? 1 : 2, id: 'y' };");
        let (_, _, init) = first_export(&module);

        let Expr::Object(entries) = init else {
            panic!("expected object")
        };
        assert_eq!(entries.len(), 2);
        assert!(matches!(
            &entries[1],
            ObjectEntry::Property {
                value: Expr::Str(s),
                ..
            } if s == "y"
        ));
    }

    #[test]
    fn garbage_file_yields_no_exports() {
        let module = parse_module("]]]} random((( tokens");
        assert!(module
            .statements
            .iter()
            .all(|s| matches!(s, Statement::Other)));
    }
}
