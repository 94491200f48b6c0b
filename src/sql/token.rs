//! SQL Tokens - the atomic units of SQL output.
//!
//! Tokens are dialect-agnostic representations that serialize
//! to dialect-specific strings.

use super::dialect::{Dialect, SqlDialect};

/// SQL Token - every element the renderer emits.
///
/// Adding a new variant here will cause compile errors everywhere
/// it needs to be handled (exhaustive matching).
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // === Keywords ===
    Select,
    From,
    Where,
    And,
    Or,
    Not,
    As,
    On,
    In,
    Is,
    Null,
    Distinct,
    Exists,
    If,

    // === DDL Keywords ===
    Create,
    Alter,
    Drop,
    Table,
    Column,
    Primary,
    Key,
    Unique,
    Cascade,
    Add,
    Set,
    Data,
    Type,
    Iceberg,
    With,
    Tag,

    // === DML Keywords ===
    Insert,
    Into,
    Values,
    Update,
    Delete,
    Merge,
    Using,
    When,
    Matched,
    Then,
    Copy,

    // === Punctuation ===
    Comma,
    Dot,
    Star,
    LParen,
    RParen,

    // === Operators ===
    Eq,
    Ne,
    Lt,
    Gt,
    Lte,
    Gte,
    Plus,
    Minus,

    // === Whitespace ===
    Space,

    // === Dynamic Content ===
    /// Quoted identifier (table, column, statistic alias)
    Ident(String),
    /// Identifier emitted without quoting (table aliases, unqualified bookkeeping tables)
    BareIdent(String),
    /// Integer literal
    LitInt(i64),
    /// Float literal
    LitFloat(f64),
    /// String literal
    LitString(String),
    /// Boolean literal
    LitBool(bool),

    // === Function Names ===
    /// Function name, remapped per dialect and rendered in upper case
    FunctionName(String),

    // === Escape Hatch ===
    /// Raw SQL passed directly to output without escaping.
    ///
    /// Only for fixed, trusted fragments such as `METADATA$FILENAME`
    /// or `$1`. Values coming from configuration go through
    /// `LitString` / `Ident`.
    Raw(String),
}

impl Token {
    /// Serialize this token to a string for the given dialect.
    pub fn serialize(&self, dialect: Dialect) -> String {
        match self {
            // Keywords
            Token::Select => "SELECT".into(),
            Token::From => "FROM".into(),
            Token::Where => "WHERE".into(),
            Token::And => "AND".into(),
            Token::Or => "OR".into(),
            Token::Not => "NOT".into(),
            Token::As => "as".into(),
            Token::On => "ON".into(),
            Token::In => "IN".into(),
            Token::Is => "IS".into(),
            Token::Null => "NULL".into(),
            Token::Distinct => "DISTINCT".into(),
            Token::Exists => "EXISTS".into(),
            Token::If => "IF".into(),

            // DDL keywords
            Token::Create => "CREATE".into(),
            Token::Alter => "ALTER".into(),
            Token::Drop => "DROP".into(),
            Token::Table => "TABLE".into(),
            Token::Column => "COLUMN".into(),
            Token::Primary => "PRIMARY".into(),
            Token::Key => "KEY".into(),
            Token::Unique => "UNIQUE".into(),
            Token::Cascade => "CASCADE".into(),
            Token::Add => "ADD".into(),
            Token::Set => "SET".into(),
            Token::Data => "DATA".into(),
            Token::Type => "TYPE".into(),
            Token::Iceberg => "ICEBERG".into(),
            Token::With => "WITH".into(),
            Token::Tag => "TAG".into(),

            // DML keywords
            Token::Insert => "INSERT".into(),
            Token::Into => "INTO".into(),
            Token::Values => "VALUES".into(),
            Token::Update => "UPDATE".into(),
            Token::Delete => "DELETE".into(),
            Token::Merge => "MERGE".into(),
            Token::Using => "USING".into(),
            Token::When => "WHEN".into(),
            Token::Matched => "MATCHED".into(),
            Token::Then => "THEN".into(),
            Token::Copy => "COPY".into(),

            // Punctuation
            Token::Comma => ",".into(),
            Token::Dot => ".".into(),
            Token::Star => "*".into(),
            Token::LParen => "(".into(),
            Token::RParen => ")".into(),

            // Operators
            Token::Eq => "=".into(),
            Token::Ne => "<>".into(),
            Token::Lt => "<".into(),
            Token::Gt => ">".into(),
            Token::Lte => "<=".into(),
            Token::Gte => ">=".into(),
            Token::Plus => "+".into(),
            Token::Minus => "-".into(),

            // Whitespace
            Token::Space => " ".into(),

            // Dynamic - dialect-specific formatting
            Token::Ident(name) => dialect.quote_identifier(name),
            Token::BareIdent(name) => name.clone(),
            Token::LitInt(n) => n.to_string(),
            Token::LitFloat(f) => {
                // Non-finite values are rejected before tokenization
                let mut buffer = ryu::Buffer::new();
                buffer.format(*f).to_string()
            }
            Token::LitString(s) => dialect.quote_string(s),
            Token::LitBool(b) => dialect.format_bool(*b).into(),

            // Function names with dialect-specific remapping
            Token::FunctionName(name) => match dialect.remap_function(name) {
                Some(remapped) => remapped.to_uppercase(),
                None => name.to_uppercase(),
            },

            // Escape hatch
            Token::Raw(s) => s.clone(),
        }
    }
}

/// A stream of tokens that can be serialized to SQL.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenStream {
    tokens: Vec<Token>,
}

impl TokenStream {
    /// Create an empty token stream.
    pub fn new() -> Self {
        Self { tokens: vec![] }
    }

    /// Push a single token.
    pub fn push(&mut self, token: Token) -> &mut Self {
        self.tokens.push(token);
        self
    }

    /// Extend with multiple tokens.
    pub fn extend(&mut self, tokens: impl IntoIterator<Item = Token>) -> &mut Self {
        self.tokens.extend(tokens);
        self
    }

    /// Append another token stream.
    pub fn append(&mut self, other: &TokenStream) -> &mut Self {
        self.tokens.extend(other.tokens.iter().cloned());
        self
    }

    /// Append streams separated by `separator`.
    pub fn join(&mut self, parts: &[TokenStream], separator: &[Token]) -> &mut Self {
        for (i, part) in parts.iter().enumerate() {
            if i > 0 {
                self.extend(separator.iter().cloned());
            }
            self.append(part);
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Serialize all tokens to a SQL string.
    pub fn serialize(&self, dialect: Dialect) -> String {
        self.tokens.iter().map(|t| t.serialize(dialect)).collect()
    }

    // Convenience methods for common tokens
    pub fn space(&mut self) -> &mut Self {
        self.push(Token::Space)
    }
    pub fn comma(&mut self) -> &mut Self {
        self.push(Token::Comma)
    }
    pub fn lparen(&mut self) -> &mut Self {
        self.push(Token::LParen)
    }
    pub fn rparen(&mut self) -> &mut Self {
        self.push(Token::RParen)
    }
    /// Push `token` followed by a space.
    pub fn keyword(&mut self, token: Token) -> &mut Self {
        self.push(token).space()
    }
    /// Wrap a stream in parentheses.
    pub fn parenthesized(&mut self, inner: &TokenStream) -> &mut Self {
        self.lparen().append(inner).rparen()
    }
}
