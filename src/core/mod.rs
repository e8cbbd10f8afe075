use std::error;
use std::fmt;
use std::rc::Rc;
use std::result;

mod interpreter;
mod parser;
mod scanner;
mod symbol_table;

pub type Binding = symbol_table::Binding;
pub type Interpreter = interpreter::Interpreter;
pub type Parser = parser::Parser;
pub type Result<T> = result::Result<T, TinyError>;
pub type Scanner = scanner::Scanner;
pub type SymbolTable = symbol_table::SymbolTable;

#[derive(Debug, PartialEq)]
pub enum TinyError {
    /// The scanner hit input no token pattern matches. Carries a snippet of
    /// roughly the first ten offending characters so the caller can point at
    /// the spot.
    Unscannable(String),
    /// An '(' open parenthesis token was parsed, but no ')' close parenthesis
    /// token was found.
    UnclosedParenthesis(usize),
    /// A declaration or a `let ... in ... end` block is missing its
    /// terminating semicolon.
    MissingSemicolon(usize),
    /// The lookahead does not match the token the grammar requires here. The
    /// first element describes what was expected, the second is what the
    /// scanner actually produced.
    UnexpectedToken(String, Token),
    /// A factor was required but the lookahead can't begin one.
    ExpectedExpression(Token),
    /// A name was used before any declaration of it was parsed. Forward
    /// references land here too: a declaration only sees names declared
    /// earlier in the run.
    UndefinedIdentifier(String),
    /// A number lexeme scanned cleanly but does not fit the runtime
    /// representation. Carries the offending lexeme.
    NumberOutOfRange(String),
    /// Integer arithmetic left the representable range.
    IntegerOverflow,
    /// The right-hand side of a division evaluated to zero.
    DivisionByZero,
}

impl fmt::Display for TinyError {
    fn fmt(&self, f: &mut fmt::Formatter) -> result::Result<(), fmt::Error> {
        match self {
            Self::Unscannable(snippet) => write!(f, "error: invalid token at: {}", snippet),
            Self::UnclosedParenthesis(line) => write!(f, "error: {}: unclosed parenthesis", line),
            Self::MissingSemicolon(line) => write!(f, "error: {}: missing semicolon", line),
            Self::UnexpectedToken(expected, found) => write!(
                f,
                "error: {}: unexpected token '{}', expected {}",
                found.line, found.lexeme, expected
            ),
            Self::ExpectedExpression(found) => write!(
                f,
                "error: {}: expected expression, found '{}'",
                found.line, found.lexeme
            ),
            Self::UndefinedIdentifier(name) => {
                write!(f, "error: undefined identifier '{}'", name)
            }
            Self::NumberOutOfRange(lexeme) => {
                write!(f, "error: number out of range: {}", lexeme)
            }
            Self::IntegerOverflow => write!(f, "error: integer overflow"),
            Self::DivisionByZero => write!(f, "error: division by zero"),
        }
    }
}

impl error::Error for TinyError {}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenType {
    // Single-character tokens
    LeftParen,
    RightParen,
    Plus,
    Minus,
    Star,
    Slash,
    Colon,
    Semicolon,
    Assign,

    // One or two character tokens
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    EqualEqual,
    NotEqual,

    // Literals
    Identifier,
    Number,

    // Keywords
    Let,
    In,
    End,
    If,
    Then,
    Else,
    Int,
    Real,

    Eof,
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter) -> result::Result<(), fmt::Error> {
        let token = match self {
            Self::LeftParen => "(",
            Self::RightParen => ")",
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Star => "*",
            Self::Slash => "/",
            Self::Colon => ":",
            Self::Semicolon => ";",
            Self::Assign => "=",
            Self::Less => "<",
            Self::LessEqual => "<=",
            Self::Greater => ">",
            Self::GreaterEqual => ">=",
            Self::EqualEqual => "==",
            Self::NotEqual => "<>",
            Self::Identifier => "identifier",
            Self::Number => "number",
            Self::Let => "let",
            Self::In => "in",
            Self::End => "end",
            Self::If => "if",
            Self::Then => "then",
            Self::Else => "else",
            Self::Int => "int",
            Self::Real => "real",
            Self::Eof => "eof",
        };

        write!(f, "{}", token)
    }
}

impl TokenType {
    /// Resolves a scanned word to a keyword, falling back to a generic
    /// identifier. The scanner calls this *after* the whole word has been
    /// consumed, so `int` is a keyword while `integer` stays an identifier.
    #[must_use]
    pub fn keyword_from_str(word: &str) -> TokenType {
        match word {
            "let" => TokenType::Let,
            "in" => TokenType::In,
            "end" => TokenType::End,
            "if" => TokenType::If,
            "then" => TokenType::Then,
            "else" => TokenType::Else,
            "int" => TokenType::Int,
            "real" => TokenType::Real,
            _ => TokenType::Identifier,
        }
    }
}

#[derive(Eq, Hash, Clone, Debug, PartialEq)]
pub struct Token {
    token_type: TokenType,
    lexeme: Rc<str>,
    line: usize,
}

impl Token {
    #[must_use]
    pub fn new(token_type: TokenType, lexeme: String, line: usize) -> Self {
        Token {
            token_type,
            lexeme: Rc::from(lexeme),
            line,
        }
    }
}

/// The two primitive types a tiny program can declare.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Type {
    Int,
    Real,
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter) -> result::Result<(), fmt::Error> {
        match self {
            Self::Int => write!(f, "int"),
            Self::Real => write!(f, "real"),
        }
    }
}

/// A computed number.
///
/// Arithmetic between two integers stays integral, with one exception:
/// division is always real division, so `7 / 2` is `3.5` and only an
/// explicit `int(...)` cast brings it back to `3`. Mixing an integer with a
/// real promotes the integer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Value {
    Int(i64),
    Real(f64),
}

impl Value {
    /// Converts a number lexeme, picking the representation by the presence
    /// of a decimal point. A lexeme the representation cannot hold (an
    /// integer beyond the `i64` range) is a conversion error, not a lexical
    /// one: the scanner accepted it.
    pub fn from_lexeme(lexeme: &str) -> Result<Self> {
        if lexeme.contains('.') {
            lexeme
                .parse()
                .map(Value::Real)
                .map_err(|_| TinyError::NumberOutOfRange(lexeme.to_owned()))
        } else {
            lexeme
                .parse()
                .map(Value::Int)
                .map_err(|_| TinyError::NumberOutOfRange(lexeme.to_owned()))
        }
    }

    fn as_f64(self) -> f64 {
        match self {
            Self::Int(n) => n as f64,
            Self::Real(n) => n,
        }
    }

    /// Integer arithmetic is checked: a result outside the `i64` range is
    /// `IntegerOverflow`, never a wrap.
    pub fn add(self, other: Value) -> Result<Value> {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => a
                .checked_add(b)
                .map(Self::Int)
                .ok_or(TinyError::IntegerOverflow),
            (a, b) => Ok(Self::Real(a.as_f64() + b.as_f64())),
        }
    }

    pub fn sub(self, other: Value) -> Result<Value> {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => a
                .checked_sub(b)
                .map(Self::Int)
                .ok_or(TinyError::IntegerOverflow),
            (a, b) => Ok(Self::Real(a.as_f64() - b.as_f64())),
        }
    }

    pub fn mul(self, other: Value) -> Result<Value> {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => a
                .checked_mul(b)
                .map(Self::Int)
                .ok_or(TinyError::IntegerOverflow),
            (a, b) => Ok(Self::Real(a.as_f64() * b.as_f64())),
        }
    }

    /// Real division. A zero divisor of either representation is an error,
    /// not an infinity.
    pub fn div(self, other: Value) -> Result<Value> {
        if other.as_f64() == 0.0 {
            return Err(TinyError::DivisionByZero);
        }

        Ok(Self::Real(self.as_f64() / other.as_f64()))
    }

    /// An explicit `int(...)` or `real(...)` cast. `int` truncates toward
    /// zero; `real` widens.
    #[must_use]
    pub fn cast(self, target: Type) -> Value {
        match target {
            Type::Int => Self::Int(self.as_f64() as i64),
            Type::Real => Self::Real(self.as_f64()),
        }
    }

    /// Applies the arithmetic operator carried by `operator` to `self` and
    /// `other`.
    pub fn apply(self, operator: &Token, other: Value) -> Result<Value> {
        match operator.token_type {
            TokenType::Plus => self.add(other),
            TokenType::Minus => self.sub(other),
            TokenType::Star => self.mul(other),
            TokenType::Slash => self.div(other),
            _ => Err(TinyError::UnexpectedToken(
                "arithmetic operator".to_owned(),
                operator.clone(),
            )),
        }
    }

    /// Applies the comparison operator carried by `operator`. Mixed operands
    /// compare by numeric value, integers widening to real.
    pub fn compare(self, operator: &Token, other: Value) -> Result<bool> {
        let (a, b) = (self.as_f64(), other.as_f64());
        match operator.token_type {
            TokenType::Less => Ok(a < b),
            TokenType::LessEqual => Ok(a <= b),
            TokenType::Greater => Ok(a > b),
            TokenType::GreaterEqual => Ok(a >= b),
            TokenType::EqualEqual => Ok(a == b),
            TokenType::NotEqual => Ok(a != b),
            _ => Err(TinyError::UnexpectedToken(
                "comparison operator".to_owned(),
                operator.clone(),
            )),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> result::Result<(), fmt::Error> {
        match *self {
            Self::Int(n) => write!(f, "{}", n),
            Self::Real(n) if n.fract() == 0.0 => write!(f, "{:.1}", n),
            Self::Real(n) => write!(f, "{}", n),
        }
    }
}

/// An expression in tree-building mode. Leaves are literals or identifier
/// references; interior nodes own their children exclusively and are never
/// mutated after construction.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Binary(Box<Expr>, Token, Box<Expr>),
    Literal(Value),
    Variable(Token),
    Cast(Token, Box<Expr>),
    If(Condition, Box<Expr>, Box<Expr>),
}

/// A comparison between exactly two factors. The grammar restricts `if`
/// conditions to this shape; full expressions are not comparable.
#[derive(Clone, Debug, PartialEq)]
pub struct Condition {
    left: Box<Expr>,
    operator: Token,
    right: Box<Expr>,
}

/// One declaration out of a block's `decl_list`.
#[derive(Clone, Debug, PartialEq)]
pub struct Decl {
    name: Token,
    declared_type: Type,
    init: Expr,
}

/// One `let ... in ... end` block as a syntax tree: its declarations in
/// source order and its body expression.
#[derive(Clone, Debug, PartialEq)]
pub struct Block {
    decls: Vec<Decl>,
    body: Expr,
}

/// Event reported to an optional parser tracer at grammar-rule entry and
/// exit. Tracing replaces inline debug printing; with no tracer installed
/// the parser produces no output of its own.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TraceEvent {
    Enter(&'static str),
    Exit(&'static str),
}
