//! Content stream walking.
//!
//! Replays the text and graphics state operators of one page and reports
//! every shown run of text together with its rendered glyph height.

use super::backend::{Operand, Operation};

/// A run of text produced by one text-showing operator.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRun {
    /// Decoded text, possibly whitespace-only
    pub text: String,
    /// Glyph height in user-space units
    pub height: f32,
}

/// Kerning (thousandths of an em) beyond which a TJ gap reads as a word space.
const TJ_SPACE_THRESHOLD: f32 = 200.0;

/// Font size used until the stream sets one with `Tf`.
const DEFAULT_FONT_SIZE: f32 = 12.0;

/// 2D affine transform `[a b c d e f]` in PDF row-vector convention.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Matrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Matrix {
    const IDENTITY: Matrix = Matrix {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    fn from_operands(op: &Operation) -> Option<Matrix> {
        Some(Matrix {
            a: op.num(0)?,
            b: op.num(1)?,
            c: op.num(2)?,
            d: op.num(3)?,
            e: op.num(4)?,
            f: op.num(5)?,
        })
    }

    fn translation(tx: f32, ty: f32) -> Matrix {
        Matrix {
            e: tx,
            f: ty,
            ..Matrix::IDENTITY
        }
    }

    /// `self × other`
    fn multiply(&self, other: &Matrix) -> Matrix {
        Matrix {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    /// Length of the transformed unit vertical.
    fn vertical_scale(&self) -> f32 {
        (self.c * self.c + self.d * self.d).sqrt()
    }
}

/// Text state that survives across BT/ET pairs.
#[derive(Debug, Clone)]
struct TextState {
    font: Vec<u8>,
    font_size: f32,
    leading: f32,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            font: Vec::new(),
            font_size: DEFAULT_FONT_SIZE,
            leading: 0.0,
        }
    }
}

/// Walks a page's operations, tracking the matrices that scale glyphs.
struct RunWalker<'a, D> {
    decode: &'a D,
    ctm: Matrix,
    saved: Vec<(Matrix, TextState)>,
    text_matrix: Matrix,
    line_matrix: Matrix,
    state: TextState,
    in_text: bool,
    runs: Vec<RawRun>,
}

impl<'a, D> RunWalker<'a, D>
where
    D: Fn(&[u8], &[u8]) -> String,
{
    fn new(decode: &'a D) -> Self {
        Self {
            decode,
            ctm: Matrix::IDENTITY,
            saved: Vec::new(),
            text_matrix: Matrix::IDENTITY,
            line_matrix: Matrix::IDENTITY,
            state: TextState::default(),
            in_text: false,
            runs: Vec::new(),
        }
    }

    fn apply(&mut self, op: &Operation) {
        match op.op.as_str() {
            "q" => self.saved.push((self.ctm, self.state.clone())),
            "Q" => {
                if let Some((ctm, state)) = self.saved.pop() {
                    self.ctm = ctm;
                    self.state = state;
                }
            }
            "cm" => {
                if let Some(m) = Matrix::from_operands(op) {
                    self.ctm = m.multiply(&self.ctm);
                }
            }
            "BT" => {
                self.in_text = true;
                self.text_matrix = Matrix::IDENTITY;
                self.line_matrix = Matrix::IDENTITY;
            }
            "ET" => self.in_text = false,
            "Tf" => {
                if let Some(Operand::Name(name)) = op.args.first() {
                    self.state.font = name.clone();
                }
                self.state.font_size = op.num(1).unwrap_or(DEFAULT_FONT_SIZE);
            }
            "TL" => self.state.leading = op.num(0).unwrap_or(0.0),
            "Td" => self.move_line(op.num(0), op.num(1)),
            "TD" => {
                if let Some(ty) = op.num(1) {
                    self.state.leading = -ty;
                }
                self.move_line(op.num(0), op.num(1));
            }
            "Tm" => {
                if let Some(m) = Matrix::from_operands(op) {
                    self.text_matrix = m;
                    self.line_matrix = m;
                }
            }
            "T*" => self.next_line(),
            "Tj" => {
                if let Some(Operand::Text(bytes)) = op.args.first() {
                    let text = self.decode_bytes(bytes);
                    self.emit(text);
                }
            }
            "TJ" => {
                if let Some(Operand::List(items)) = op.args.first() {
                    let text = self.decode_array(items);
                    self.emit(text);
                }
            }
            "'" => {
                self.next_line();
                if let Some(Operand::Text(bytes)) = op.args.first() {
                    let text = self.decode_bytes(bytes);
                    self.emit(text);
                }
            }
            "\"" => {
                self.next_line();
                if let Some(Operand::Text(bytes)) = op.args.get(2) {
                    let text = self.decode_bytes(bytes);
                    self.emit(text);
                }
            }
            _ => {}
        }
    }

    fn move_line(&mut self, tx: Option<f32>, ty: Option<f32>) {
        if let (Some(tx), Some(ty)) = (tx, ty) {
            self.line_matrix = Matrix::translation(tx, ty).multiply(&self.line_matrix);
            self.text_matrix = self.line_matrix;
        }
    }

    fn next_line(&mut self) {
        let leading = self.state.leading;
        self.move_line(Some(0.0), Some(-leading));
    }

    fn decode_bytes(&self, bytes: &[u8]) -> String {
        (self.decode)(&self.state.font, bytes)
    }

    /// TJ: strings interleaved with kerning adjustments.
    fn decode_array(&self, items: &[Operand]) -> String {
        let mut combined = String::new();
        for item in items {
            match item {
                Operand::Text(bytes) => combined.push_str(&self.decode_bytes(bytes)),
                Operand::Int(_) | Operand::Real(_) => {
                    let adjustment = -item.as_f32().unwrap_or(0.0);
                    if adjustment > TJ_SPACE_THRESHOLD && needs_word_space(&combined) {
                        combined.push(' ');
                    }
                }
                _ => {}
            }
        }
        combined
    }

    fn emit(&mut self, text: String) {
        if !self.in_text || text.is_empty() {
            return;
        }
        let rendering = self.text_matrix.multiply(&self.ctm);
        self.runs.push(RawRun {
            text,
            height: self.state.font_size.abs() * rendering.vertical_scale(),
        });
    }
}

fn needs_word_space(text: &str) -> bool {
    match text.chars().last() {
        Some(c) => !c.is_whitespace() && c != '\u{00A0}' && !is_spaceless_script_char(c),
        None => false,
    }
}

/// Characters from scripts that don't separate words with spaces.
///
/// Chinese and Japanese don't use spaces between words; Korean does.
fn is_spaceless_script_char(c: char) -> bool {
    let code = c as u32;

    // CJK Unified Ideographs
    (0x4E00..=0x9FFF).contains(&code)
    // Extension A
    || (0x3400..=0x4DBF).contains(&code)
    // Extensions B-F
    || (0x20000..=0x2EBEF).contains(&code)
    // Hiragana, Katakana
    || (0x3040..=0x30FF).contains(&code)
    // CJK Symbols and Punctuation
    || (0x3000..=0x303F).contains(&code)
}

/// Replay `ops` and return every shown text run in stream order.
///
/// `decode` turns (font resource name, string bytes) into text.
pub fn extract_runs<D>(ops: &[Operation], decode: &D) -> Vec<RawRun>
where
    D: Fn(&[u8], &[u8]) -> String,
{
    let mut walker = RunWalker::new(decode);
    for op in ops {
        walker.apply(op);
    }
    walker.runs
}
