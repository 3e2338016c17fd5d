//! Error types for encoding, configuration, rasterization and markup reading

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

use crate::matrix::EcLevel;
use crate::parser::lexer::Token;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

/// Errors raised by the QR matrix encoder
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EncodingError {
    #[error("cannot encode empty content")]
    EmptyContent,

    #[error("content exceeds the capacity of a QR symbol at error-correction level {level}")]
    DataTooLong { level: EcLevel },

    #[error("content cannot be encoded: {0}")]
    Unsupported(String),
}

/// A style or matrix parameter outside its documented domain
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{field} = {value} is outside [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("invalid {field} color '{value}' (expected #rgb or #rrggbb)")]
    InvalidColor { field: &'static str, value: String },

    #[error("draw width must be a positive finite number, got {0}")]
    InvalidDrawWidth(f64),

    #[error("invalid matrix: {0}")]
    InvalidMatrix(String),

    #[error(
        "carved-out area {fraction:.3} exceeds the {capacity:.2} correction capacity of level {level}"
    )]
    CapacityExceeded {
        fraction: f64,
        capacity: f64,
        level: EcLevel,
    },

    #[error("unknown preset '{0}'")]
    UnknownPreset(String),

    #[error("failed to read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse style TOML: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Vector-to-pixel conversion failures
#[derive(Error, Debug)]
pub enum RasterError {
    #[error("vector markup could not be decoded as an image: {0}")]
    Decode(String),

    #[error("cannot allocate a {width}x{height} pixel buffer")]
    Allocation { width: u32, height: u32 },

    #[error("PNG encoding failed: {0}")]
    Encode(String),

    #[error("rasterizer thread panicked")]
    Join,
}

/// Errors produced while reading emitted markup back into a scene
#[derive(Error, Debug)]
pub enum MarkupError {
    #[error("Markup error at {span:?}: {message}")]
    Syntax {
        span: Span,
        message: String,
        expected: Vec<String>,
    },

    #[error("unexpected markup structure: {0}")]
    Structure(String),
}

impl MarkupError {
    pub fn structure(message: impl Into<String>) -> Self {
        Self::Structure(message.into())
    }

    /// Format the error with source context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        match self {
            MarkupError::Syntax {
                span,
                message,
                expected,
            } => {
                let expected_str = if expected.is_empty() {
                    String::new()
                } else {
                    format!("\nExpected: {}", expected.join(", "))
                };

                let mut buf = Vec::new();
                let written = Report::build(ReportKind::Error, filename, span.start)
                    .with_message(message)
                    .with_label(
                        Label::new((filename, span.clone()))
                            .with_message(format!("{}{}", message, expected_str))
                            .with_color(Color::Red),
                    )
                    .finish()
                    .write((filename, Source::from(source)), &mut buf);
                match written {
                    Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
                    Err(_) => self.to_string(),
                }
            }
            MarkupError::Structure(_) => self.to_string(),
        }
    }
}

impl<'a> From<chumsky::error::Rich<'a, Token>> for MarkupError {
    fn from(err: chumsky::error::Rich<'a, Token>) -> Self {
        use chumsky::error::RichReason;

        let message = match err.reason() {
            RichReason::ExpectedFound { found, .. } => match found {
                Some(tok) => format!("Unexpected {}", format_token(tok)),
                None => "Unexpected end of input".to_string(),
            },
            RichReason::Custom(msg) => msg.to_string(),
        };

        let expected: Vec<String> = err
            .expected()
            .filter_map(|e| match e {
                chumsky::error::RichPattern::Token(tok) => Some(format_token(tok)),
                chumsky::error::RichPattern::Label(label) => Some(label.to_string()),
                chumsky::error::RichPattern::EndOfInput => Some("end of input".to_string()),
                chumsky::error::RichPattern::Identifier(s) => Some(format!("name '{}'", s)),
                chumsky::error::RichPattern::Any => Some("any token".to_string()),
                chumsky::error::RichPattern::SomethingElse => None,
            })
            .collect();

        // Input cut off mid-token can yield a reversed span
        let range = err.span().into_range();
        MarkupError::Syntax {
            span: range.start.min(range.end)..range.start.max(range.end),
            message,
            expected,
        }
    }
}

/// Format a token for human-readable error messages
fn format_token(tok: &Token) -> String {
    match tok {
        Token::Name(s) => format!("name '{}'", s),
        Token::Quoted(s) => format!("value \"{}\"", s),
        Token::Open => "'<'".to_string(),
        Token::OpenEnd => "'</'".to_string(),
        Token::Close => "'>'".to_string(),
        Token::SelfClose => "'/>'".to_string(),
        Token::Equals => "'='".to_string(),
        _ => format!("{:?}", tok),
    }
}
