//! Quasi-numeric field evaluation
//!
//! EXIF stores many numeric tags as rationals (`1/125`, `-2/3`). These are
//! turned into numbers with a small arithmetic evaluator that accepts only
//! numeric literals, unary signs and `+ - * /`. Anything else is missing.

use crate::constants::{EVALUATED_FIELDS, HORIZONTAL_ORIENTATIONS, columns, tags};
use crate::dataset::Dataset;
use crate::models::Cell;
use std::iter::Peekable;
use std::str::Chars;
use tracing::debug;

/// Result of evaluating an expression
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Numeric {
    Integer(i64),
    Float(f64),
}

impl Numeric {
    fn as_f64(self) -> f64 {
        match self {
            Numeric::Integer(i) => i as f64,
            Numeric::Float(f) => f,
        }
    }
}

impl From<Numeric> for Cell {
    fn from(value: Numeric) -> Self {
        match value {
            Numeric::Integer(i) => Cell::Integer(i),
            Numeric::Float(f) => Cell::Number(f),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Number(Numeric),
    Op(char),
}

/// Evaluate `number (op number)*` with the usual precedence.
///
/// Integer literals combined with `+ - *` stay integers; a decimal literal or
/// a division produces a float. Returns `None` for malformed input, division
/// by zero, or a non-finite result.
pub fn evaluate_expression(input: &str) -> Option<Numeric> {
    let tokens = tokenize(input)?;
    let mut parser = Parser { tokens, pos: 0 };
    let value = parser.expression()?;
    if parser.pos != parser.tokens.len() {
        return None;
    }
    match value {
        Numeric::Float(f) if !f.is_finite() => None,
        v => Some(v),
    }
}

fn tokenize(input: &str) -> Option<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '+' | '-' | '*' | '/' => {
                chars.next();
                tokens.push(Token::Op(c));
            }
            c if c.is_ascii_digit() || c == '.' => {
                tokens.push(Token::Number(read_number(&mut chars)?));
            }
            _ => return None,
        }
    }

    Some(tokens)
}

fn read_number(chars: &mut Peekable<Chars<'_>>) -> Option<Numeric> {
    let mut literal = String::new();
    let mut is_float = false;

    while let Some(&c) = chars.peek() {
        match c {
            '0'..='9' => literal.push(c),
            '.' if !is_float => {
                is_float = true;
                literal.push(c);
            }
            _ => break,
        }
        chars.next();
    }

    if !literal.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }

    if let Some(&e) = chars.peek().filter(|c| matches!(c, 'e' | 'E')) {
        literal.push(e);
        chars.next();
        if let Some(&sign) = chars.peek().filter(|c| matches!(c, '+' | '-')) {
            literal.push(sign);
            chars.next();
        }
        let digits_before = literal.len();
        while let Some(&d) = chars.peek().filter(|d| d.is_ascii_digit()) {
            literal.push(d);
            chars.next();
        }
        if literal.len() == digits_before {
            return None;
        }
        is_float = true;
    }

    if is_float {
        literal.parse().ok().map(Numeric::Float)
    } else {
        match literal.parse::<i64>() {
            Ok(i) => Some(Numeric::Integer(i)),
            Err(_) => literal.parse().ok().map(Numeric::Float),
        }
    }
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek_op(&self) -> Option<char> {
        match self.tokens.get(self.pos) {
            Some(Token::Op(op)) => Some(*op),
            _ => None,
        }
    }

    fn expression(&mut self) -> Option<Numeric> {
        let mut acc = self.term()?;
        while let Some(op @ ('+' | '-')) = self.peek_op() {
            self.pos += 1;
            let rhs = self.term()?;
            acc = apply(acc, op, rhs)?;
        }
        Some(acc)
    }

    fn term(&mut self) -> Option<Numeric> {
        let mut acc = self.unary()?;
        while let Some(op @ ('*' | '/')) = self.peek_op() {
            self.pos += 1;
            let rhs = self.unary()?;
            acc = apply(acc, op, rhs)?;
        }
        Some(acc)
    }

    fn unary(&mut self) -> Option<Numeric> {
        let mut negate = false;
        while let Some(op @ ('+' | '-')) = self.peek_op() {
            self.pos += 1;
            if op == '-' {
                negate = !negate;
            }
        }

        let value = match self.tokens.get(self.pos) {
            Some(Token::Number(n)) => *n,
            _ => return None,
        };
        self.pos += 1;

        if !negate {
            return Some(value);
        }
        Some(match value {
            Numeric::Integer(i) => i
                .checked_neg()
                .map_or(Numeric::Float(-(i as f64)), Numeric::Integer),
            Numeric::Float(f) => Numeric::Float(-f),
        })
    }
}

fn apply(lhs: Numeric, op: char, rhs: Numeric) -> Option<Numeric> {
    if op == '/' {
        let divisor = rhs.as_f64();
        if divisor == 0.0 {
            return None;
        }
        return Some(Numeric::Float(lhs.as_f64() / divisor));
    }

    if let (Numeric::Integer(a), Numeric::Integer(b)) = (lhs, rhs) {
        let exact = match op {
            '+' => a.checked_add(b),
            '-' => a.checked_sub(b),
            _ => a.checked_mul(b),
        };
        if let Some(v) = exact {
            return Some(Numeric::Integer(v));
        }
    }

    let (a, b) = (lhs.as_f64(), rhs.as_f64());
    Some(Numeric::Float(match op {
        '+' => a + b,
        '-' => a - b,
        _ => a * b,
    }))
}

/// Evaluate one cell; numeric cells pass through
fn evaluate_cell(cell: &Cell) -> Cell {
    match cell {
        Cell::Text(s) => evaluate_expression(s).map_or(Cell::Null, Cell::from),
        Cell::Integer(_) | Cell::Number(_) => cell.clone(),
        Cell::Null | Cell::Timestamp(_) => Cell::Null,
    }
}

/// Evaluate every quasi-numeric field present in the dataset.
///
/// Exposure time and exposure bias get companion `...N` columns; the other
/// fields are rewritten in place. Columns that already hold only numbers are
/// left as they are. Returns the number of non-null cells that could not be
/// evaluated.
pub fn evaluate_fields(dataset: &mut Dataset) -> usize {
    let mut rejected = 0;

    for &(field, target) in EVALUATED_FIELDS {
        let Some(cells) = dataset.column(field) else {
            debug!("Skipping evaluation of absent column {}", field);
            continue;
        };

        let cells: Vec<Cell> = cells.cloned().collect();
        let already_numeric = cells.iter().all(|c| c.is_null() || c.is_numeric());

        let evaluated: Vec<Cell> = if already_numeric {
            cells
        } else {
            cells
                .iter()
                .map(|cell| {
                    let value = evaluate_cell(cell);
                    if value.is_null() && !cell.is_null() {
                        debug!("Column {}: {:?} is not arithmetic, set to null", field, cell);
                        rejected += 1;
                    }
                    value
                })
                .collect()
        };

        dataset.set_column(target.unwrap_or(field), evaluated);
    }

    rejected
}

/// Add the `Horizontal` column: 1 for un-rotated orientation codes, else 0
pub fn derive_horizontal(dataset: &mut Dataset) {
    let flags = (0..dataset.len())
        .map(|row| match dataset.cell(row, tags::ORIENTATION) {
            Cell::Text(code) if HORIZONTAL_ORIENTATIONS.contains(&code.as_str()) => {
                Cell::Integer(1)
            }
            _ => Cell::Integer(0),
        })
        .collect();

    dataset.set_column(columns::HORIZONTAL, flags);
}
