//! Parser for the top-level structure of Go source files.
//!
//! Only the declaration skeleton is parsed precisely: package clause,
//! imports, and `func`/`type`/`var`/`const` declarations with their names
//! and spans. Declaration interiors are scanned with bracket-depth tracking
//! and every identifier or selector encountered is recorded as a use-site.
//! The scan over-approximates (labels and composite-literal keys are
//! recorded too); resolution decides later which sites denote symbols.

use crate::model::Position;
use crate::syntax::ast::{
    Decl, FuncDecl, GenDecl, GenKeyword, Ident, ImportSpec, NodeIds, SelectorExpr, SourceFile,
    Span, Spec, TypeSpec, UseExpr, ValueSpec,
};
use crate::syntax::lexer::Lexer;
use crate::syntax::token::{Token, TokenType};
use crate::syntax::SyntaxError;

pub struct Parser<'ids> {
    tokens: Vec<Token>,
    pos: usize,
    ids: &'ids mut NodeIds,
    errors: Vec<SyntaxError>,
}

impl<'ids> Parser<'ids> {
    /// Parse one source file. Errors are collected; the returned tree holds
    /// whatever could be recovered.
    pub fn parse_file(source: &str, ids: &'ids mut NodeIds) -> (SourceFile, Vec<SyntaxError>) {
        let (tokens, lex_errors) = Lexer::new(source).tokenize();
        let mut parser = Parser {
            tokens,
            pos: 0,
            ids,
            errors: lex_errors,
        };
        let file = parser.file();
        (file, parser.errors)
    }

    fn file(&mut self) -> SourceFile {
        self.skip_semis();

        let package = self.package_clause();
        self.skip_semis();

        let mut imports = Vec::new();
        while self.check(TokenType::KwImport) {
            self.import_decl(&mut imports);
            self.skip_semis();
        }

        let mut decls = Vec::new();
        while !self.check(TokenType::Eof) {
            match self.current().ty {
                TokenType::KwFunc => {
                    if let Some(decl) = self.func_decl() {
                        decls.push(Decl::Func(decl));
                    }
                }
                TokenType::KwType => decls.push(Decl::Gen(self.gen_decl(GenKeyword::Type))),
                TokenType::KwVar => decls.push(Decl::Gen(self.gen_decl(GenKeyword::Var))),
                TokenType::KwConst => decls.push(Decl::Gen(self.gen_decl(GenKeyword::Const))),
                _ => {
                    self.error_here("expected top-level declaration");
                    self.advance();
                    self.recover_to_top_level();
                }
            }
            self.skip_semis();
        }

        SourceFile {
            package,
            imports,
            decls,
        }
    }

    fn package_clause(&mut self) -> String {
        if !self.eat(TokenType::KwPackage) {
            self.error_here("expected package clause");
            return String::new();
        }
        match self.expect(TokenType::Ident, "expected package name") {
            Some(tok) => {
                self.eat(TokenType::Semi);
                tok.lexeme
            }
            None => String::new(),
        }
    }

    fn import_decl(&mut self, imports: &mut Vec<ImportSpec>) {
        self.advance(); // import
        if self.eat(TokenType::LParen) {
            loop {
                self.skip_semis();
                if self.eat(TokenType::RParen) {
                    break;
                }
                if self.check(TokenType::Eof) {
                    self.error_here("unterminated import group");
                    break;
                }
                self.import_spec(imports);
            }
        } else {
            self.import_spec(imports);
        }
    }

    fn import_spec(&mut self, imports: &mut Vec<ImportSpec>) {
        let alias = match self.current().ty {
            TokenType::Ident => {
                let name = self.advance().lexeme;
                Some(name)
            }
            TokenType::Dot => {
                self.advance();
                Some(".".into())
            }
            _ => None,
        };
        match self.current().ty {
            TokenType::StringLit => {
                let raw = self.advance().lexeme;
                imports.push(ImportSpec {
                    alias,
                    path: unquote(&raw),
                });
                self.eat(TokenType::Semi);
            }
            _ => {
                self.error_here("expected import path");
                self.advance();
            }
        }
    }

    fn func_decl(&mut self) -> Option<FuncDecl> {
        let start = self.current().start;
        self.advance(); // func

        let mut uses = Vec::new();
        let has_receiver = self.check(TokenType::LParen);
        if has_receiver {
            self.scan_balanced(&mut uses);
        }

        let name = match self.expect(TokenType::Ident, "expected function name") {
            Some(tok) => self.ident_node(&tok),
            None => {
                self.recover_to_top_level();
                return None;
            }
        };

        if self.check(TokenType::LBracket) {
            self.scan_balanced(&mut uses);
        }
        if self.check(TokenType::LParen) {
            self.scan_balanced(&mut uses);
        } else {
            self.error_here("expected parameter list");
        }

        self.scan_func_tail(&mut uses);

        Some(FuncDecl {
            name,
            has_receiver,
            span: Span {
                start,
                end: self.prev_end(),
            },
            uses,
        })
    }

    /// Scan results and body of a function declaration. The body is the
    /// first depth-0 `{` not directly preceded by `struct` or `interface`
    /// (those open a type literal in the result position).
    fn scan_func_tail(&mut self, uses: &mut Vec<UseExpr>) {
        let mut prev = TokenType::RParen;
        loop {
            match self.current().ty {
                TokenType::Semi => {
                    self.advance();
                    return;
                }
                TokenType::Eof => return,
                TokenType::LBrace => {
                    if prev == TokenType::KwStruct || prev == TokenType::KwInterface {
                        prev = TokenType::RBrace;
                        self.scan_balanced(uses);
                    } else {
                        self.scan_balanced(uses);
                        return;
                    }
                }
                TokenType::LParen | TokenType::LBracket => {
                    prev = TokenType::RParen;
                    self.scan_balanced(uses);
                }
                TokenType::Ident => {
                    prev = TokenType::Ident;
                    self.consume_use(uses);
                }
                other => {
                    prev = other;
                    self.advance();
                }
            }
        }
    }

    fn gen_decl(&mut self, keyword: GenKeyword) -> GenDecl {
        let start = self.current().start;
        self.advance(); // type/var/const

        let mut uses = Vec::new();
        let mut specs = Vec::new();

        if self.eat(TokenType::LParen) {
            loop {
                self.skip_semis();
                if self.eat(TokenType::RParen) {
                    break;
                }
                if self.check(TokenType::Eof) {
                    self.error_here("unterminated declaration group");
                    break;
                }
                self.spec(keyword, true, &mut specs, &mut uses);
            }
        } else {
            self.spec(keyword, false, &mut specs, &mut uses);
        }

        GenDecl {
            keyword,
            specs,
            span: Span {
                start,
                end: self.prev_end(),
            },
            uses,
        }
    }

    fn spec(
        &mut self,
        keyword: GenKeyword,
        grouped: bool,
        specs: &mut Vec<Spec>,
        uses: &mut Vec<UseExpr>,
    ) {
        match keyword {
            GenKeyword::Type => self.type_spec(grouped, specs, uses),
            GenKeyword::Var | GenKeyword::Const => self.value_spec(grouped, specs, uses),
        }
    }

    fn type_spec(&mut self, grouped: bool, specs: &mut Vec<Spec>, uses: &mut Vec<UseExpr>) {
        let name = match self.expect(TokenType::Ident, "expected type name") {
            Some(tok) => self.ident_node(&tok),
            None => {
                self.recover_spec(grouped);
                return;
            }
        };
        let start = name.span.start;
        self.scan_spec_tail(grouped, uses);
        specs.push(Spec::Type(TypeSpec {
            name,
            span: Span {
                start,
                end: self.prev_end(),
            },
        }));
    }

    fn value_spec(&mut self, grouped: bool, specs: &mut Vec<Spec>, uses: &mut Vec<UseExpr>) {
        let mut names = Vec::new();
        loop {
            match self.expect(TokenType::Ident, "expected identifier in declaration") {
                Some(tok) => names.push(self.ident_node(&tok)),
                None => {
                    self.recover_spec(grouped);
                    return;
                }
            }
            if !self.eat(TokenType::Comma) {
                break;
            }
        }

        // A bare name list (constant continuation inside a group) ends here;
        // anything else is a type and/or initializer to scan.
        if self.eat(TokenType::Semi) || (grouped && self.check(TokenType::RParen)) {
            specs.push(Spec::Value(ValueSpec { names }));
            return;
        }

        self.scan_spec_tail(grouped, uses);
        specs.push(Spec::Value(ValueSpec { names }));
    }

    /// Scan the remainder of a spec up to a depth-0 terminator: an inserted
    /// or explicit semicolon, or the closing parenthesis of the enclosing
    /// group (left unconsumed).
    fn scan_spec_tail(&mut self, grouped: bool, uses: &mut Vec<UseExpr>) {
        loop {
            match self.current().ty {
                TokenType::Semi => {
                    self.advance();
                    return;
                }
                TokenType::Eof => return,
                TokenType::RParen if grouped => return,
                TokenType::LParen | TokenType::LBracket | TokenType::LBrace => {
                    self.scan_balanced(uses);
                }
                TokenType::Ident => self.consume_use(uses),
                _ => {
                    self.advance();
                }
            }
        }
    }

    /// Consume a balanced bracket group, recording use-sites inside it.
    /// The current token must be the opener.
    fn scan_balanced(&mut self, uses: &mut Vec<UseExpr>) {
        self.advance();
        let mut depth = 1usize;
        loop {
            match self.current().ty {
                TokenType::Eof => {
                    self.error_here("unexpected end of file");
                    return;
                }
                TokenType::LParen | TokenType::LBracket | TokenType::LBrace => {
                    depth += 1;
                    self.advance();
                }
                TokenType::RParen | TokenType::RBracket | TokenType::RBrace => {
                    depth -= 1;
                    self.advance();
                    if depth == 0 {
                        return;
                    }
                }
                TokenType::Ident => self.consume_use(uses),
                _ => {
                    self.advance();
                }
            }
        }
    }

    /// Record the use-site starting at the current identifier. A selector
    /// chain records one selector per link, re-anchoring the base each time
    /// (`a.b.c` yields `(a, b)` and `(b, c)`), so no link of the chain is
    /// ever dropped.
    fn consume_use(&mut self, uses: &mut Vec<UseExpr>) {
        let base = self.advance();
        if !(self.check(TokenType::Dot) && self.peek(1).ty == TokenType::Ident) {
            uses.push(UseExpr::Ident(self.ident_node(&base)));
            return;
        }
        let mut prev = base;
        while self.check(TokenType::Dot) && self.peek(1).ty == TokenType::Ident {
            self.advance(); // dot
            let sel = self.advance();
            uses.push(UseExpr::Selector(SelectorExpr {
                base: self.ident_node(&prev),
                sel: self.ident_node(&sel),
            }));
            prev = sel;
        }
    }

    fn recover_spec(&mut self, grouped: bool) {
        loop {
            match self.current().ty {
                TokenType::Semi => {
                    self.advance();
                    return;
                }
                TokenType::RParen if grouped => return,
                TokenType::Eof => return,
                _ => {
                    self.advance();
                }
            }
        }
    }

    fn recover_to_top_level(&mut self) {
        while !matches!(
            self.current().ty,
            TokenType::KwFunc
                | TokenType::KwType
                | TokenType::KwVar
                | TokenType::KwConst
                | TokenType::Eof
        ) {
            self.advance();
        }
    }

    fn ident_node(&mut self, tok: &Token) -> Ident {
        Ident {
            id: self.ids.next(),
            name: tok.lexeme.clone(),
            span: Span {
                start: tok.start,
                end: tok.end,
            },
        }
    }

    fn current(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn peek(&self, ahead: usize) -> &Token {
        let idx = (self.pos + ahead).min(self.tokens.len() - 1);
        &self.tokens[idx]
    }

    fn check(&self, ty: TokenType) -> bool {
        self.current().ty == ty
    }

    fn advance(&mut self) -> Token {
        let tok = self.tokens[self.pos].clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    fn eat(&mut self, ty: TokenType) -> bool {
        if self.check(ty) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, ty: TokenType, message: &str) -> Option<Token> {
        if self.check(ty) {
            Some(self.advance())
        } else {
            self.error_here(message);
            None
        }
    }

    fn skip_semis(&mut self) {
        while self.check(TokenType::Semi) {
            self.advance();
        }
    }

    fn error_here(&mut self, message: &str) {
        let position = self.current().start;
        self.errors.push(SyntaxError {
            message: message.into(),
            position,
        });
    }

    fn prev_end(&self) -> Position {
        if self.pos == 0 {
            Position::default()
        } else {
            self.tokens[self.pos - 1].end
        }
    }
}

/// Strip the quotes from an import path literal.
fn unquote(raw: &str) -> String {
    raw.trim_matches(|c| c == '"' || c == '`').to_string()
}
