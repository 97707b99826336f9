// Literal parsing functions for the runjs parser
// Handles boolean, number, string and template literals

use super::{JsParser, Rule};
use crate::ast::*;
use crate::error::*;

impl JsParser {
    /// Parse a boolean literal from a Pest pair
    pub(super) fn parse_boolean(pair: pest::iterators::Pair<Rule>) -> bool {
        pair.into_inner().next().unwrap().as_rule() == Rule::kw_true
    }

    /// Parse a number literal from a Pest pair
    pub(super) fn parse_number(pair: pest::iterators::Pair<Rule>) -> ParseResult<f64> {
        let span = Self::span_from_pair(&pair);
        let inner = pair.into_inner().next().unwrap();
        let text = inner.as_str();

        match inner.as_rule() {
            Rule::hex_number => {
                // Hex literals may exceed u64, so accumulate as f64
                let digits = &text[2..]; // Remove "0x" prefix
                digits.chars().try_fold(0f64, |acc, digit| {
                    digit
                        .to_digit(16)
                        .map(|value| acc * 16.0 + value as f64)
                        .ok_or_else(|| ParseError::invalid_number(span, text))
                })
            }
            _ => text
                .parse::<f64>()
                .map_err(|_| ParseError::invalid_number(span, text)),
        }
    }

    /// Parse a string literal from a Pest pair
    pub(super) fn parse_string(pair: pest::iterators::Pair<Rule>) -> ParseResult<String> {
        let inner = pair.into_inner().next().unwrap();
        let span = Self::span_from_pair(&inner);
        unescape(inner.as_str(), span.start)
    }

    /// Parse a template literal into cooked text segments and interpolations
    pub(super) fn parse_template(
        pair: pest::iterators::Pair<Rule>,
    ) -> ParseResult<TemplateLiteral> {
        let mut quasis = Vec::new();
        let mut expressions = Vec::new();
        let mut current = String::new();

        for part in pair.into_inner() {
            match part.as_rule() {
                Rule::template_chars => {
                    let start = part.as_span().start();
                    current.push_str(&unescape(part.as_str(), start)?);
                }
                Rule::template_substitution => {
                    quasis.push(std::mem::take(&mut current));
                    let expression = part.into_inner().next().unwrap();
                    expressions.push(Self::parse_expression_from_pair(expression)?);
                }
                rule => unreachable!("Unexpected template part: {:?}", rule),
            }
        }
        quasis.push(current);

        Ok(TemplateLiteral {
            quasis,
            expressions,
        })
    }
}

/// Resolve escape sequences in the raw text of a string or template chunk.
/// `offset` is the position of `raw` in the source, used for error spans.
fn unescape(raw: &str, offset: usize) -> ParseResult<String> {
    let mut result = String::with_capacity(raw.len());
    let mut chars = raw.char_indices().peekable();

    while let Some((index, c)) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }

        let invalid = |end: usize| {
            ParseError::invalid_string_escape(
                Span::new(offset + index, offset + end),
                &raw[index..end.min(raw.len())],
            )
        };

        let Some((_, escaped)) = chars.next() else {
            return Err(invalid(raw.len()));
        };

        match escaped {
            'n' => result.push('\n'),
            't' => result.push('\t'),
            'r' => result.push('\r'),
            'b' => result.push('\u{0008}'),
            'f' => result.push('\u{000C}'),
            'v' => result.push('\u{000B}'),
            '0' => result.push('\0'),
            // Line continuation
            '\n' | '\u{2028}' | '\u{2029}' => {}
            '\r' => {
                if let Some((_, '\n')) = chars.peek() {
                    chars.next();
                }
            }
            'x' => {
                let digits = take_hex(&mut chars, 2);
                let code = parse_hex(&digits).ok_or_else(|| invalid(index + 2 + digits.len()))?;
                result.push(char::from_u32(code).ok_or_else(|| invalid(index + 4))?);
            }
            'u' => {
                let code = if let Some((_, '{')) = chars.peek() {
                    chars.next();
                    let mut digits = String::new();
                    loop {
                        match chars.next() {
                            Some((_, '}')) => break,
                            Some((_, digit)) if digit.is_ascii_hexdigit() => digits.push(digit),
                            Some((end, _)) => return Err(invalid(end + 1)),
                            None => return Err(invalid(raw.len())),
                        }
                    }
                    parse_hex(&digits).ok_or_else(|| invalid(index + 3 + digits.len()))?
                } else {
                    let digits = take_hex(&mut chars, 4);
                    parse_hex(&digits)
                        .filter(|_| digits.len() == 4)
                        .ok_or_else(|| invalid(index + 2 + digits.len()))?
                };

                result.push(decode_code_unit(code, &mut chars));
            }
            other => result.push(other),
        }
    }

    Ok(result)
}

fn take_hex(chars: &mut std::iter::Peekable<std::str::CharIndices>, count: usize) -> String {
    let mut digits = String::new();
    while digits.len() < count {
        match chars.peek() {
            Some((_, digit)) if digit.is_ascii_hexdigit() => {
                digits.push(*digit);
                chars.next();
            }
            _ => break,
        }
    }
    digits
}

fn parse_hex(digits: &str) -> Option<u32> {
    if digits.is_empty() {
        return None;
    }
    u32::from_str_radix(digits, 16).ok()
}

/// Combine UTF-16 surrogate pairs written as two `\uXXXX` escapes.
/// Unpaired surrogates become U+FFFD.
fn decode_code_unit(code: u32, chars: &mut std::iter::Peekable<std::str::CharIndices>) -> char {
    if (0xD800..0xDC00).contains(&code) {
        let mut lookahead = chars.clone();
        if let (Some((_, '\\')), Some((_, 'u'))) = (lookahead.next(), lookahead.next()) {
            let digits = take_hex(&mut lookahead, 4);
            if let Some(low) = parse_hex(&digits).filter(|_| digits.len() == 4) {
                if (0xDC00..0xE000).contains(&low) {
                    *chars = lookahead;
                    let combined = 0x10000 + ((code - 0xD800) << 10) + (low - 0xDC00);
                    return char::from_u32(combined).unwrap_or(char::REPLACEMENT_CHARACTER);
                }
            }
        }
    }
    char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER)
}
