//! A reader for the Erlang term syntax found in `.app` and `.rel` files:
//! atoms, strings, binaries of a string, integers (decimal, radix and
//! character literals), floats, lists, tuples and maps, each top-level term
//! terminated by a dot.
use std::fmt;
use std::num::IntErrorKind;

#[derive(Debug, Clone, PartialEq)]
pub enum Term {
    Atom(String),
    Str(String),
    Binary(String),
    Int(i64),
    /// An integer outside the `i64` range, as written in the source.
    BigInt(String),
    Float(f64),
    List(Vec<Term>),
    Tuple(Vec<Term>),
    Map(Vec<(Term, Term)>),
}

impl Term {
    pub fn atom(s: impl Into<String>) -> Self {
        Term::Atom(s.into())
    }

    pub fn string(s: impl Into<String>) -> Self {
        Term::Str(s.into())
    }

    pub fn as_atom(&self) -> Option<&str> {
        match self {
            Term::Atom(a) => Some(a),
            _ => None,
        }
    }

    /// The text of a string or binary term.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Term::Str(s) | Term::Binary(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Term]> {
        match self {
            Term::List(items) => Some(items),
            _ => None,
        }
    }

    /// Looks up `key` in a property list of `{Key, Value}` tuples. The first
    /// matching entry wins; entries of any other shape are skipped.
    pub fn proplist_get<'a>(props: &'a [Term], key: &str) -> Option<&'a Term> {
        props.iter().find_map(|prop| match prop {
            Term::Tuple(pair) if pair.len() == 2 && pair[0].as_atom() == Some(key) => {
                Some(&pair[1])
            }
            _ => None,
        })
    }
}

fn atom_needs_quotes(a: &str) -> bool {
    let mut chars = a.chars();
    match chars.next() {
        Some(c) if c.is_ascii_lowercase() => {
            !chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '@')
        }
        _ => true,
    }
}

fn write_escaped(f: &mut fmt::Formatter<'_>, s: &str, quote: char) -> fmt::Result {
    for c in s.chars() {
        match c {
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\t' => f.write_str("\\t")?,
            c if c == quote => write!(f, "\\{c}")?,
            c => write!(f, "{c}")?,
        }
    }
    Ok(())
}

fn write_seq(f: &mut fmt::Formatter<'_>, items: &[Term]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(",")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Atom(a) if atom_needs_quotes(a) => {
                f.write_str("'")?;
                write_escaped(f, a, '\'')?;
                f.write_str("'")
            }
            Term::Atom(a) => f.write_str(a),
            Term::Str(s) => {
                f.write_str("\"")?;
                write_escaped(f, s, '"')?;
                f.write_str("\"")
            }
            Term::Binary(s) => {
                f.write_str("<<\"")?;
                write_escaped(f, s, '"')?;
                f.write_str("\">>")
            }
            Term::Int(n) => write!(f, "{n}"),
            Term::BigInt(text) => f.write_str(text),
            Term::Float(x) => write!(f, "{x:?}"),
            Term::List(items) => {
                f.write_str("[")?;
                write_seq(f, items)?;
                f.write_str("]")
            }
            Term::Tuple(items) => {
                f.write_str("{")?;
                write_seq(f, items)?;
                f.write_str("}")
            }
            Term::Map(entries) => {
                f.write_str("#{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{key}=>{value}")?;
                }
                f.write_str("}")
            }
        }
    }
}

/// Reads every dot-terminated term in `source`, like `file:consult/1`.
pub fn consult(source: &str) -> Result<Vec<Term>, String> {
    let mut reader = Reader::new(source);
    let mut terms = Vec::new();
    loop {
        reader.skip_whitespace_and_comments();
        if reader.at_end() {
            return Ok(terms);
        }
        let term = reader.read_term()?;
        reader.skip_whitespace_and_comments();
        reader.expect(b'.')?;
        terms.push(term);
    }
}

struct Reader<'src> {
    text: &'src str,
    source: &'src [u8],
    pos: usize,
    line: usize,
}

impl<'src> Reader<'src> {
    fn new(source: &'src str) -> Self {
        Self {
            text: source,
            source: source.as_bytes(),
            pos: 0,
            line: 1,
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.source.len()
    }

    fn peek(&self) -> Option<u8> {
        self.source.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.source.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let ch = self.peek()?;
        self.pos += 1;
        if ch == b'\n' {
            self.line += 1;
        }
        Some(ch)
    }

    fn error(&self, msg: impl fmt::Display) -> String {
        format!("line {}: {msg}", self.line)
    }

    fn skip_whitespace_and_comments(&mut self) {
        while let Some(ch) = self.peek() {
            if ch.is_ascii_whitespace() {
                self.bump();
            } else if ch == b'%' {
                while let Some(c) = self.peek() {
                    if c == b'\n' {
                        break;
                    }
                    self.bump();
                }
            } else {
                break;
            }
        }
    }

    fn expect(&mut self, want: u8) -> Result<(), String> {
        match self.bump() {
            Some(ch) if ch == want => Ok(()),
            Some(ch) => Err(self.error(format!(
                "expected '{}', found '{}'",
                want as char, ch as char
            ))),
            None => Err(self.error(format!("expected '{}', found end of input", want as char))),
        }
    }

    fn read_term(&mut self) -> Result<Term, String> {
        self.skip_whitespace_and_comments();
        match self.peek() {
            None => Err(self.error("unexpected end of input")),
            Some(b'[') => self.read_seq(b']').map(Term::List),
            Some(b'{') => self.read_seq(b'}').map(Term::Tuple),
            Some(b'#') => self.read_map(),
            Some(b'"') => self.read_string().map(Term::Str),
            Some(b'\'') => self.read_quoted(b'\'').map(Term::Atom),
            Some(b'<') => self.read_binary(),
            Some(b'$') => self.read_char().map(|c| Term::Int(i64::from(u32::from(c)))),
            Some(ch) if ch.is_ascii_lowercase() => Ok(self.read_bare_atom()),
            Some(ch) if ch.is_ascii_digit() || ch == b'-' => self.read_number(),
            Some(ch) => Err(self.error(format!("unexpected character '{}'", ch as char))),
        }
    }

    fn read_seq(&mut self, close: u8) -> Result<Vec<Term>, String> {
        self.bump();
        let mut items = Vec::new();
        self.skip_whitespace_and_comments();
        if self.peek() == Some(close) {
            self.bump();
            return Ok(items);
        }
        loop {
            items.push(self.read_term()?);
            self.skip_whitespace_and_comments();
            match self.bump() {
                Some(b',') => continue,
                Some(ch) if ch == close => return Ok(items),
                Some(ch) => {
                    return Err(self.error(format!(
                        "expected ',' or '{}', found '{}'",
                        close as char, ch as char
                    )))
                }
                None => return Err(self.error("unterminated list or tuple")),
            }
        }
    }

    /// `#{Key => Value, ...}`
    fn read_map(&mut self) -> Result<Term, String> {
        self.expect(b'#')?;
        self.expect(b'{')?;
        let mut entries = Vec::new();
        self.skip_whitespace_and_comments();
        if self.peek() == Some(b'}') {
            self.bump();
            return Ok(Term::Map(entries));
        }
        loop {
            let key = self.read_term()?;
            self.skip_whitespace_and_comments();
            self.expect(b'=')?;
            self.expect(b'>')?;
            let value = self.read_term()?;
            entries.push((key, value));
            self.skip_whitespace_and_comments();
            match self.bump() {
                Some(b',') => continue,
                Some(b'}') => return Ok(Term::Map(entries)),
                Some(ch) => {
                    return Err(self.error(format!("expected ',' or '}}', found '{}'", ch as char)))
                }
                None => return Err(self.error("unterminated map")),
            }
        }
    }

    fn read_bare_atom(&mut self) -> Term {
        let start = self.pos;
        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() || ch == b'_' || ch == b'@' {
                self.bump();
            } else {
                break;
            }
        }
        Term::Atom(String::from_utf8_lossy(&self.source[start..self.pos]).into_owned())
    }

    /// A string literal, joined with any string literals directly after it.
    fn read_string(&mut self) -> Result<String, String> {
        let mut text = self.read_quoted(b'"')?;
        loop {
            self.skip_whitespace_and_comments();
            if self.peek() != Some(b'"') {
                return Ok(text);
            }
            text.push_str(&self.read_quoted(b'"')?);
        }
    }

    fn read_quoted(&mut self, quote: u8) -> Result<String, String> {
        self.bump();
        let mut buf = Vec::new();
        loop {
            match self.bump() {
                None => return Err(self.error("unterminated quoted text")),
                Some(ch) if ch == quote => break,
                Some(b'\\') => buf.push(self.read_escape()?),
                Some(ch) => buf.push(ch),
            }
        }
        String::from_utf8(buf).map_err(|e| self.error(e))
    }

    /// The character after a backslash.
    fn read_escape(&mut self) -> Result<u8, String> {
        match self.bump() {
            Some(b'n') => Ok(b'\n'),
            Some(b't') => Ok(b'\t'),
            Some(b'r') => Ok(b'\r'),
            Some(b's') => Ok(b' '),
            Some(b'b') => Ok(0x08),
            Some(b'f') => Ok(0x0c),
            Some(b'v') => Ok(0x0b),
            Some(b'e') => Ok(0x1b),
            Some(b'd') => Ok(0x7f),
            Some(other) => Ok(other),
            None => Err(self.error("unterminated escape")),
        }
    }

    /// `$c` or `$\n`, read as the character's code point.
    fn read_char(&mut self) -> Result<char, String> {
        self.expect(b'$')?;
        if self.peek() == Some(b'\\') {
            self.bump();
            return self.read_escape().map(char::from);
        }
        let ch = self
            .text
            .get(self.pos..)
            .and_then(|rest| rest.chars().next())
            .ok_or_else(|| self.error("unterminated character literal"))?;
        for _ in 0..ch.len_utf8() {
            self.bump();
        }
        Ok(ch)
    }

    fn read_binary(&mut self) -> Result<Term, String> {
        self.expect(b'<')?;
        self.expect(b'<')?;
        self.skip_whitespace_and_comments();
        let text = if self.peek() == Some(b'"') {
            self.read_string()?
        } else {
            String::new()
        };
        self.skip_whitespace_and_comments();
        self.expect(b'>')?;
        self.expect(b'>')?;
        Ok(Term::Binary(text))
    }

    /// Integers (`42`, `1_000`, `16#FF`) and floats (`0.5`, `1.5e3`).
    fn read_number(&mut self) -> Result<Term, String> {
        let negative = self.peek() == Some(b'-');
        if negative {
            self.bump();
        }
        let digits = self.read_digits(|c| c.is_ascii_digit());
        if digits.is_empty() {
            return Err(self.error("expected digits after '-'"));
        }

        if self.peek() == Some(b'#') {
            self.bump();
            let radix = digits
                .parse::<u32>()
                .ok()
                .filter(|r| (2..=36).contains(r))
                .ok_or_else(|| self.error(format!("bad radix '{digits}'")))?;
            let value = self.read_digits(|c| c.is_ascii_alphanumeric());
            if value.is_empty() {
                return Err(self.error(format!("expected digits after '{radix}#'")));
            }
            return self.integer(&value, radix, negative);
        }

        // A dot only continues the number when a digit follows; otherwise it
        // terminates the form.
        let is_float =
            self.peek() == Some(b'.') && self.peek_at(1).is_some_and(|c| c.is_ascii_digit());
        if !is_float {
            return self.integer(&digits, 10, negative);
        }

        self.bump();
        let mut text = format!("{digits}.{}", self.read_digits(|c| c.is_ascii_digit()));
        if matches!(self.peek(), Some(b'e' | b'E')) {
            self.bump();
            text.push('e');
            if let Some(sign @ (b'+' | b'-')) = self.peek() {
                self.bump();
                text.push(char::from(sign));
            }
            let exponent = self.read_digits(|c| c.is_ascii_digit());
            if exponent.is_empty() {
                return Err(self.error(format!("bad float exponent in '{text}'")));
            }
            text.push_str(&exponent);
        }
        let value = text
            .parse::<f64>()
            .map_err(|e| self.error(format!("bad float '{text}': {e}")))?;
        Ok(Term::Float(if negative { -value } else { value }))
    }

    /// A run of digits accepted by `accept`. Single underscores between
    /// digits are separators and are dropped.
    fn read_digits(&mut self, accept: impl Fn(u8) -> bool) -> String {
        let mut digits = String::new();
        while let Some(ch) = self.peek() {
            if accept(ch) {
                digits.push(char::from(ch));
                self.bump();
            } else if ch == b'_' && !digits.is_empty() && self.peek_at(1).is_some_and(&accept) {
                self.bump();
            } else {
                break;
            }
        }
        digits
    }

    /// Integers that overflow `i64` are kept as their source text.
    fn integer(&self, digits: &str, radix: u32, negative: bool) -> Result<Term, String> {
        let sign = if negative { "-" } else { "" };
        match i64::from_str_radix(&format!("{sign}{digits}"), radix) {
            Ok(n) => Ok(Term::Int(n)),
            Err(e) if matches!(e.kind(), IntErrorKind::PosOverflow | IntErrorKind::NegOverflow) => {
                Ok(Term::BigInt(if radix == 10 {
                    format!("{sign}{digits}")
                } else {
                    format!("{sign}{radix}#{digits}")
                }))
            }
            Err(e) => Err(self.error(format!("bad integer '{digits}' in base {radix}: {e}"))),
        }
    }
}
