use crate::model::Position;

/// Token categories produced by the lexer.
///
/// Only the tokens that shape top-level structure get their own variant;
/// the remaining operators collapse into `Op`, which is all the use-site
/// scanner needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenType {
    Ident,

    // Literals
    IntLit,
    FloatLit,
    ImagLit,
    RuneLit,
    StringLit,

    // Keywords
    KwBreak,
    KwCase,
    KwChan,
    KwConst,
    KwContinue,
    KwDefault,
    KwDefer,
    KwElse,
    KwFallthrough,
    KwFor,
    KwFunc,
    KwGo,
    KwGoto,
    KwIf,
    KwImport,
    KwInterface,
    KwMap,
    KwPackage,
    KwRange,
    KwReturn,
    KwSelect,
    KwStruct,
    KwSwitch,
    KwType,
    KwVar,

    // Structure
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Comma,
    Semi,
    Dot,
    Assign,

    /// Any other operator (`+`, `:=`, `<-`, `&&`, ...).
    Op,

    Eof,
}

impl TokenType {
    pub fn keyword(ident: &str) -> Option<TokenType> {
        Some(match ident {
            "break" => TokenType::KwBreak,
            "case" => TokenType::KwCase,
            "chan" => TokenType::KwChan,
            "const" => TokenType::KwConst,
            "continue" => TokenType::KwContinue,
            "default" => TokenType::KwDefault,
            "defer" => TokenType::KwDefer,
            "else" => TokenType::KwElse,
            "fallthrough" => TokenType::KwFallthrough,
            "for" => TokenType::KwFor,
            "func" => TokenType::KwFunc,
            "go" => TokenType::KwGo,
            "goto" => TokenType::KwGoto,
            "if" => TokenType::KwIf,
            "import" => TokenType::KwImport,
            "interface" => TokenType::KwInterface,
            "map" => TokenType::KwMap,
            "package" => TokenType::KwPackage,
            "range" => TokenType::KwRange,
            "return" => TokenType::KwReturn,
            "select" => TokenType::KwSelect,
            "struct" => TokenType::KwStruct,
            "switch" => TokenType::KwSwitch,
            "type" => TokenType::KwType,
            "var" => TokenType::KwVar,
            _ => return None,
        })
    }

    /// Whether a newline after this token triggers automatic semicolon
    /// insertion (the `++`/`--` operators are handled by lexeme).
    pub fn terminates_statement(&self) -> bool {
        matches!(
            self,
            TokenType::Ident
                | TokenType::IntLit
                | TokenType::FloatLit
                | TokenType::ImagLit
                | TokenType::RuneLit
                | TokenType::StringLit
                | TokenType::KwBreak
                | TokenType::KwContinue
                | TokenType::KwFallthrough
                | TokenType::KwReturn
                | TokenType::RParen
                | TokenType::RBracket
                | TokenType::RBrace
        )
    }
}

/// A lexed token with its source text and byte-column span.
#[derive(Debug, Clone)]
pub struct Token {
    pub ty: TokenType,
    pub lexeme: String,
    pub start: Position,
    pub end: Position,
}

impl Token {
    pub fn new(ty: TokenType, lexeme: impl Into<String>, start: Position, end: Position) -> Self {
        Self {
            ty,
            lexeme: lexeme.into(),
            start,
            end,
        }
    }
}
