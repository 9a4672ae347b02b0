// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
//! Extracts struct declarations from WGSL source.
//!
//! This is not a WGSL parser.  It recognizes a restricted grammar, `struct NAME { name: type, ... }`
//! with attributes and nested generics, and skips everything else.  Comments are dropped by the
//! lexer, so a commented-out struct is never seen.
//!
//! # Example
//!
//! ```
//! use slots_and_strides::layout::struct_parser::{parse_structs, FieldType, ArrayLength};
//!
//! let source = "
//!     // struct Ignored { a: f32 }
//!     struct Particle {
//!         position: vec2f,
//!         @align(4) life: f32,
//!     }
//!     struct Particles { items: array<Particle, 4> }
//!     @fragment fn main() -> @location(0) vec4f { return vec4f(1.0); }
//! ";
//! let structs = parse_structs(source).unwrap();
//! assert_eq!(structs.len(), 2);
//! assert_eq!(structs[0].name, "Particle");
//! assert_eq!(structs[1].fields[0].r#type.to_string(), "array<Particle,4>");
//! ```

use crate::error::Error;
use std::fmt::Display;
use std::iter::Peekable;
use std::str::CharIndices;

/// The type of a struct field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldType {
    /// A primitive or struct name, normalized without whitespace (`vec2<f32>`, `Particle`).
    Named(String),
    /// `array<element, length>` or `array<element>`.
    Array {
        element: Box<FieldType>,
        length: ArrayLength,
    },
}

/// The length of an array type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ArrayLength {
    /// An integer literal.
    Fixed(u32),
    /// A named constant, resolved against the pipeline's constants at layout time.
    Constant(String),
    /// No length; sized when the buffer is bound.  Only legal as a struct's last field.
    Runtime,
}

impl FieldType {
    /// Parses a standalone type expression, such as the type of a storage declaration.
    ///
    /// ```
    /// use slots_and_strides::layout::struct_parser::{FieldType, ArrayLength};
    /// let t = FieldType::parse("array< Particle, 4u >").unwrap();
    /// assert_eq!(t.to_string(), "array<Particle,4>");
    /// assert!(matches!(FieldType::parse("array<f32>").unwrap(), FieldType::Array { length: ArrayLength::Runtime, .. }));
    /// ```
    pub fn parse(text: &str) -> Result<FieldType, Error> {
        let mut parser = Parser::new(text);
        let parsed = parser.parse_type(text)?;
        match parser.next() {
            None => Ok(parsed),
            Some(token) => Err(Error::Parse {
                owner: text.to_string(),
                message: format!("unexpected {token} after type"),
            }),
        }
    }

    /// Whether this is a runtime-sized array.
    pub fn is_runtime_array(&self) -> bool {
        matches!(
            self,
            FieldType::Array {
                length: ArrayLength::Runtime,
                ..
            }
        )
    }
}

impl Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldType::Named(name) => f.write_str(name),
            FieldType::Array { element, length } => match length {
                ArrayLength::Fixed(n) => write!(f, "array<{element},{n}>"),
                ArrayLength::Constant(c) => write!(f, "array<{element},{c}>"),
                ArrayLength::Runtime => write!(f, "array<{element}>"),
            },
        }
    }
}

/// One `name: type` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructField {
    pub name: String,
    pub r#type: FieldType,
}

/// A struct as written in the source, before any layout is computed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructDefinition {
    pub name: String,
    /// Declaration order; this order determines byte offsets.
    pub fields: Vec<StructField>,
    /// Each distinct field type once, in order of first appearance.
    pub unique_field_types: Vec<FieldType>,
}

impl StructDefinition {
    pub(crate) fn new(name: String, fields: Vec<StructField>) -> Self {
        let mut unique_field_types: Vec<FieldType> = Vec::new();
        for field in &fields {
            if !unique_field_types.contains(&field.r#type) {
                unique_field_types.push(field.r#type.clone());
            }
        }
        StructDefinition {
            name,
            fields,
            unique_field_types,
        }
    }
}

/// Extracts every struct declared in `source`, in source order.
pub fn parse_structs(source: &str) -> Result<Vec<StructDefinition>, Error> {
    let mut parser = Parser::new(source);
    let mut structs = Vec::new();
    while let Some(token) = parser.next() {
        if token != Token::Ident("struct") {
            continue;
        }
        //`struct` must be followed by a name and a body; anything else is not a declaration
        let Some(Token::Ident(name)) = parser.peek() else {
            continue;
        };
        parser.next();
        if parser.peek() != Some(Token::Punct('{')) {
            continue;
        }
        parser.next();
        structs.push(parser.parse_body(name)?);
    }
    Ok(structs)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token<'a> {
    Ident(&'a str),
    Number(&'a str),
    Punct(char),
}

impl Display for Token<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Ident(s) | Token::Number(s) => write!(f, "`{s}`"),
            Token::Punct(c) => write!(f, "`{c}`"),
        }
    }
}

struct Lexer<'a> {
    source: &'a str,
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> Lexer<'a> {
    fn new(source: &'a str) -> Self {
        Lexer {
            source,
            chars: source.char_indices().peekable(),
        }
    }

    fn skip_line_comment(&mut self) {
        for (_, c) in self.chars.by_ref() {
            if c == '\n' {
                break;
            }
        }
    }

    //block comments nest in WGSL
    fn skip_block_comment(&mut self) {
        let mut depth = 1;
        while let Some((_, c)) = self.chars.next() {
            match c {
                '/' if self.chars.next_if(|(_, n)| *n == '*').is_some() => depth += 1,
                '*' if self.chars.next_if(|(_, n)| *n == '/').is_some() => {
                    depth -= 1;
                    if depth == 0 {
                        return;
                    }
                }
                _ => {}
            }
        }
    }

    fn take_while(&mut self, start: usize, pred: impl Fn(char) -> bool) -> &'a str {
        let mut end = start;
        while let Some((i, c)) = self.chars.next_if(|(_, c)| pred(*c)) {
            end = i + c.len_utf8();
        }
        &self.source[start..end]
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        loop {
            let (start, c) = self.chars.next()?;
            if c.is_whitespace() {
                continue;
            }
            if c == '/' {
                match self.chars.peek() {
                    Some((_, '/')) => {
                        self.skip_line_comment();
                        continue;
                    }
                    Some((_, '*')) => {
                        self.chars.next();
                        self.skip_block_comment();
                        continue;
                    }
                    _ => return Some(Token::Punct('/')),
                }
            }
            if c.is_alphabetic() || c == '_' {
                let end = start + c.len_utf8();
                let rest = self.take_while(end, |c| c.is_alphanumeric() || c == '_');
                let len = c.len_utf8() + rest.len();
                return Some(Token::Ident(&self.source[start..start + len]));
            }
            if c.is_ascii_digit() {
                let rest = self.take_while(start + 1, |c| c.is_ascii_alphanumeric() || c == '.');
                return Some(Token::Number(&self.source[start..start + 1 + rest.len()]));
            }
            return Some(Token::Punct(c));
        }
    }
}

struct Parser<'a> {
    tokens: Peekable<Lexer<'a>>,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str) -> Self {
        Parser {
            tokens: Lexer::new(source).peekable(),
        }
    }

    fn next(&mut self) -> Option<Token<'a>> {
        self.tokens.next()
    }

    fn peek(&mut self) -> Option<Token<'a>> {
        self.tokens.peek().copied()
    }

    fn expect(&mut self, owner: &str, expected: char) -> Result<(), Error> {
        match self.next() {
            Some(Token::Punct(c)) if c == expected => Ok(()),
            other => Err(unexpected(owner, other, &format!("`{expected}`"))),
        }
    }

    /// `@name` or `@name(...)`
    fn skip_attribute(&mut self, owner: &str) -> Result<(), Error> {
        match self.next() {
            Some(Token::Ident(_)) => {}
            other => return Err(unexpected(owner, other, "attribute name")),
        }
        if self.peek() == Some(Token::Punct('(')) {
            let mut depth = 0;
            loop {
                match self.next() {
                    Some(Token::Punct('(')) => depth += 1,
                    Some(Token::Punct(')')) => {
                        depth -= 1;
                        if depth == 0 {
                            break;
                        }
                    }
                    Some(_) => {}
                    None => return Err(unexpected(owner, None, "`)`")),
                }
            }
        }
        Ok(())
    }

    /// Parses fields up to and including the closing brace.
    fn parse_body(&mut self, name: &str) -> Result<StructDefinition, Error> {
        let mut fields = Vec::new();
        loop {
            match self.next() {
                Some(Token::Punct('}')) => break,
                Some(Token::Punct('@')) => self.skip_attribute(name)?,
                Some(Token::Ident(field)) => {
                    self.expect(name, ':')?;
                    let r#type = self.parse_type(name)?;
                    fields.push(StructField {
                        name: field.to_string(),
                        r#type,
                    });
                    match self.peek() {
                        Some(Token::Punct(',' | ';')) => {
                            self.next();
                        }
                        Some(Token::Punct('}')) => {}
                        other => return Err(unexpected(name, other, "`,` or `}`")),
                    }
                }
                other => return Err(unexpected(name, other, "field name")),
            }
        }
        Ok(StructDefinition::new(name.to_string(), fields))
    }

    fn parse_type(&mut self, owner: &str) -> Result<FieldType, Error> {
        let name = match self.next() {
            Some(Token::Ident(name)) => name,
            other => return Err(unexpected(owner, other, "type name")),
        };
        if self.peek() != Some(Token::Punct('<')) {
            return Ok(FieldType::Named(name.to_string()));
        }
        self.next();
        if name == "array" {
            let element = self.parse_type(owner)?;
            let length = if self.peek() == Some(Token::Punct(',')) {
                self.next();
                match self.next() {
                    Some(Token::Number(n)) => ArrayLength::Fixed(parse_length(owner, n)?),
                    Some(Token::Ident(c)) => ArrayLength::Constant(c.to_string()),
                    other => return Err(unexpected(owner, other, "array length")),
                }
            } else {
                ArrayLength::Runtime
            };
            self.expect(owner, '>')?;
            return Ok(FieldType::Array {
                element: Box::new(element),
                length,
            });
        }
        //other generics (vec2<f32>, atomic<u32>, ...) are kept as normalized text
        let mut text = format!("{name}<");
        loop {
            match self.peek() {
                Some(Token::Number(n)) => {
                    self.next();
                    text.push_str(n);
                }
                _ => text.push_str(&self.parse_type(owner)?.to_string()),
            }
            match self.next() {
                Some(Token::Punct(',')) => text.push(','),
                Some(Token::Punct('>')) => break,
                other => return Err(unexpected(owner, other, "`,` or `>`")),
            }
        }
        text.push('>');
        Ok(FieldType::Named(text))
    }
}

fn parse_length(owner: &str, literal: &str) -> Result<u32, Error> {
    let digits = literal.trim_end_matches(['u', 'i']);
    let parsed = match digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => digits.parse::<u32>(),
    };
    parsed.map_err(|_| Error::Parse {
        owner: owner.to_string(),
        message: format!("invalid array length `{literal}`"),
    })
}

fn unexpected(owner: &str, found: Option<Token<'_>>, expected: &str) -> Error {
    let found = match found {
        Some(token) => token.to_string(),
        None => "end of input".to_string(),
    };
    Error::Parse {
        owner: owner.to_string(),
        message: format!("expected {expected}, found {found}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(s: &str) -> FieldType {
        FieldType::Named(s.to_string())
    }

    #[test]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
    fn fields_in_order() {
        let structs = parse_structs(
            "struct Light { color: vec3f, intensity: f32, transform: mat4x4<f32> }",
        )
        .unwrap();
        assert_eq!(structs.len(), 1);
        let light = &structs[0];
        assert_eq!(light.name, "Light");
        let names: Vec<_> = light.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["color", "intensity", "transform"]);
        assert_eq!(light.fields[2].r#type, named("mat4x4<f32>"));
    }

    #[test]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
    fn comments_are_not_structure() {
        let source = "
            /* struct Hidden { a: f32 } /* nested */ still hidden */
            // struct AlsoHidden { b: f32 }
            struct Visible {
                a: f32, // trailing } brace in a comment
                /* b: vec4f, */
                c: u32;
            }
        ";
        let structs = parse_structs(source).unwrap();
        assert_eq!(structs.len(), 1);
        assert_eq!(structs[0].name, "Visible");
        assert_eq!(structs[0].fields.len(), 2);
        assert_eq!(structs[0].fields[1].name, "c");
    }

    #[test]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
    fn attributes_and_surrounding_code() {
        let source = "
            @group(0) @binding(0) var<uniform> u: f32;
            struct VertexOut {
                @builtin(position) position: vec4<f32>,
                @location(0) @interpolate(flat) id: u32,
            }
            fn my_struct_helper() -> f32 { return 1.0; }
        ";
        let structs = parse_structs(source).unwrap();
        assert_eq!(structs.len(), 1);
        assert_eq!(structs[0].fields[0].r#type, named("vec4<f32>"));
        assert_eq!(structs[0].fields[1].name, "id");
    }

    #[test]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
    fn arrays() {
        let structs = parse_structs(
            "struct S { a: array<f32, 4>, b: array<array<vec2f,2u>,COUNT>, c: array<Particle> }",
        )
        .unwrap();
        let s = &structs[0];
        assert_eq!(
            s.fields[0].r#type,
            FieldType::Array {
                element: Box::new(named("f32")),
                length: ArrayLength::Fixed(4)
            }
        );
        assert_eq!(s.fields[1].r#type.to_string(), "array<array<vec2f,2>,COUNT>");
        assert!(s.fields[2].r#type.is_runtime_array());
    }

    #[test]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
    fn unique_types() {
        let structs = parse_structs("struct S { a: f32, b: vec2f, c: f32 }").unwrap();
        assert_eq!(
            structs[0].unique_field_types,
            vec![named("f32"), named("vec2f")]
        );
    }

    #[test]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
    fn empty_struct() {
        let structs = parse_structs("struct Empty {}").unwrap();
        assert!(structs[0].fields.is_empty());
    }

    #[test]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
    fn malformed() {
        let err = parse_structs("struct Broken { a f32 }").unwrap_err();
        assert!(matches!(err, Error::Parse { ref owner, .. } if owner == "Broken"));
        let err = parse_structs("struct Unterminated { a: f32,").unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }
}
