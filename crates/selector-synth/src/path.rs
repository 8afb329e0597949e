//! Structural view of a selector expression
//!
//! A light tokenizer that splits an expression into compound segments joined
//! by combinators. It understands the subset of selector syntax the
//! generator emits plus ordinary hand-written selectors; selector lists and
//! anything it cannot read yield `None`.

use std::fmt::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    Child,
    Descendant,
    Adjacent,
    Sibling,
}

impl Combinator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Combinator::Child => " > ",
            Combinator::Descendant => " ",
            Combinator::Adjacent => " + ",
            Combinator::Sibling => " ~ ",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttrPredicate {
    pub name: String,
    pub value: Option<String>,
}

/// One compound selector plus its relation to the segment on its left.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Segment {
    pub combinator: Option<Combinator>,
    pub tag: Option<String>,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub attributes: Vec<AttrPredicate>,
    pub pseudos: Vec<String>,
}

const POSITIONAL_PSEUDOS: [&str; 9] = [
    "nth-child",
    "nth-last-child",
    "nth-of-type",
    "nth-last-of-type",
    "first-child",
    "last-child",
    "first-of-type",
    "last-of-type",
    "only-child",
];

impl Segment {
    fn is_empty(&self) -> bool {
        self.tag.is_none()
            && self.id.is_none()
            && self.classes.is_empty()
            && self.attributes.is_empty()
            && self.pseudos.is_empty()
    }

    pub fn is_tag_only(&self) -> bool {
        self.tag.is_some()
            && self.id.is_none()
            && self.classes.is_empty()
            && self.attributes.is_empty()
            && self.pseudos.is_empty()
    }

    /// Carries an id, class or attribute predicate.
    pub fn is_anchored(&self) -> bool {
        self.id.is_some() || !self.classes.is_empty() || !self.attributes.is_empty()
    }

    pub fn is_positional(&self) -> bool {
        self.pseudos.iter().any(|pseudo| {
            let name = pseudo.split('(').next().unwrap_or_default();
            POSITIONAL_PSEUDOS.contains(&name)
        })
    }

    fn shape(&self, out: &mut String) {
        if let Some(combinator) = self.combinator {
            out.push_str(combinator.as_str());
        }
        if let Some(tag) = &self.tag {
            out.push_str(tag);
        }
        if self.id.is_some() {
            out.push_str("#ID");
        }
        for _ in &self.classes {
            out.push_str(".CLS");
        }
        for attr in &self.attributes {
            match attr.value {
                Some(_) => {
                    let _ = write!(out, "[{}=VAL]", attr.name);
                }
                None => {
                    let _ = write!(out, "[{}]", attr.name);
                }
            }
        }
        for pseudo in &self.pseudos {
            let name = pseudo.split('(').next().unwrap_or_default();
            if POSITIONAL_PSEUDOS.contains(&name) {
                out.push_str(":NTH");
            } else {
                let _ = write!(out, ":{}", pseudo);
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectorPath {
    pub segments: Vec<Segment>,
}

impl SelectorPath {
    pub fn parse(expression: &str) -> Option<Self> {
        Parser::new(expression).parse()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn is_bare_tag(&self) -> bool {
        self.segments.len() == 1 && self.segments[0].is_tag_only()
    }

    /// Exactly `tag > tag` with nothing else.
    pub fn is_bare_tag_pair(&self) -> bool {
        self.segments.len() == 2
            && self.segments.iter().all(Segment::is_tag_only)
            && self.segments[1].combinator == Some(Combinator::Child)
    }

    /// A single `#id` segment with no tag or other predicates.
    pub fn is_bare_id(&self) -> bool {
        self.segments.len() == 1 && {
            let seg = &self.segments[0];
            seg.id.is_some()
                && seg.tag.is_none()
                && seg.classes.is_empty()
                && seg.attributes.is_empty()
                && seg.pseudos.is_empty()
        }
    }

    pub fn has_id(&self) -> bool {
        self.segments.iter().any(|seg| seg.id.is_some())
    }

    pub fn has_class(&self) -> bool {
        self.segments.iter().any(|seg| !seg.classes.is_empty())
    }

    pub fn has_positional(&self) -> bool {
        self.segments.iter().any(Segment::is_positional)
    }

    pub fn combinator_count(&self) -> usize {
        self.segments.len().saturating_sub(1)
    }

    pub fn attributes(&self) -> impl Iterator<Item = &AttrPredicate> {
        self.segments.iter().flat_map(|seg| seg.attributes.iter())
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.segments
            .iter()
            .flat_map(|seg| seg.classes.iter().map(String::as_str))
    }

    /// Concrete identifiers: ids, classes and attribute values.
    pub fn identifier_tokens(&self) -> Vec<&str> {
        let mut tokens = Vec::new();
        for seg in &self.segments {
            if let Some(id) = &seg.id {
                tokens.push(id.as_str());
            }
            tokens.extend(seg.classes.iter().map(String::as_str));
            tokens.extend(seg.attributes.iter().filter_map(|a| a.value.as_deref()));
        }
        tokens
    }

    /// Fraction of segments anchored by an id, class or attribute.
    pub fn anchored_ratio(&self) -> f64 {
        if self.segments.is_empty() {
            return 0.0;
        }
        let anchored = self.segments.iter().filter(|s| s.is_anchored()).count();
        anchored as f64 / self.segments.len() as f64
    }

    /// Every segment carries a class.
    pub fn is_class_chain(&self) -> bool {
        !self.segments.is_empty() && self.segments.iter().all(|s| !s.classes.is_empty())
    }

    pub fn shape_key(&self) -> ShapeKey {
        let mut out = String::new();
        for seg in &self.segments {
            seg.shape(&mut out);
        }
        ShapeKey(out)
    }
}

/// Expression with concrete identifiers replaced by placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShapeKey(pub String);

impl ShapeKey {
    pub fn of(expression: &str) -> Option<Self> {
        SelectorPath::parse(expression).map(|path| path.shape_key())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
}

impl Parser {
    fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn parse(mut self) -> Option<SelectorPath> {
        let mut segments = Vec::new();
        let mut current = Segment::default();
        let mut pending: Option<Combinator> = None;

        while let Some(ch) = self.peek() {
            match ch {
                c if c.is_whitespace() => {
                    self.pos += 1;
                    if !current.is_empty() {
                        segments.push(std::mem::take(&mut current));
                        pending = Some(Combinator::Descendant);
                    }
                }
                '>' | '+' | '~' => {
                    self.pos += 1;
                    if !current.is_empty() {
                        segments.push(std::mem::take(&mut current));
                    }
                    if segments.is_empty() {
                        return None;
                    }
                    pending = Some(match ch {
                        '>' => Combinator::Child,
                        '+' => Combinator::Adjacent,
                        _ => Combinator::Sibling,
                    });
                }
                ',' => return None,
                _ => {
                    if current.is_empty() && !segments.is_empty() {
                        current.combinator = Some(pending.take()?);
                    }
                    pending = None;
                    self.compound_part(&mut current)?;
                }
            }
        }

        if pending.is_some() && current.is_empty() {
            // trailing descendant whitespace is fine, a dangling `>` is not
            if pending != Some(Combinator::Descendant) {
                return None;
            }
        }
        if !current.is_empty() {
            segments.push(current);
        }
        if segments.is_empty() {
            return None;
        }
        Some(SelectorPath { segments })
    }

    fn compound_part(&mut self, seg: &mut Segment) -> Option<()> {
        let ch = self.peek()?;
        match ch {
            '#' => {
                self.pos += 1;
                seg.id = Some(self.ident()?);
            }
            '.' => {
                self.pos += 1;
                seg.classes.push(self.ident()?);
            }
            '[' => {
                self.pos += 1;
                seg.attributes.push(self.attribute()?);
            }
            ':' => {
                self.pos += 1;
                if self.peek() == Some(':') {
                    self.pos += 1;
                }
                let mut pseudo = self.ident()?;
                if self.peek() == Some('(') {
                    pseudo.push_str(&self.parenthesized()?);
                }
                seg.pseudos.push(pseudo);
            }
            '*' => {
                self.pos += 1;
                if seg.tag.is_some() {
                    return None;
                }
                seg.tag = Some("*".to_string());
            }
            _ => {
                if seg.tag.is_some() || !seg.is_empty() {
                    return None;
                }
                seg.tag = Some(self.ident()?.to_ascii_lowercase());
            }
        }
        Some(())
    }

    fn ident(&mut self) -> Option<String> {
        let mut out = String::new();
        while let Some(ch) = self.peek() {
            if ch == '\\' {
                self.pos += 1;
                out.push(self.escape()?);
            } else if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' || (ch as u32) >= 0x80
            {
                out.push(ch);
                self.pos += 1;
            } else {
                break;
            }
        }
        if out.is_empty() {
            None
        } else {
            Some(out)
        }
    }

    /// Reads the character(s) after a backslash.
    fn escape(&mut self) -> Option<char> {
        let mut hex = String::new();
        while let Some(ch) = self.peek() {
            if ch.is_ascii_hexdigit() && hex.len() < 6 {
                hex.push(ch);
                self.pos += 1;
            } else {
                break;
            }
        }
        if hex.is_empty() {
            let ch = self.peek()?;
            self.pos += 1;
            return Some(ch);
        }
        if self.peek().map_or(false, |c| c == ' ') {
            self.pos += 1;
        }
        let code = u32::from_str_radix(&hex, 16).ok()?;
        Some(char::from_u32(code).unwrap_or('\u{fffd}'))
    }

    fn attribute(&mut self) -> Option<AttrPredicate> {
        self.skip_ws();
        let name = self.ident()?.to_ascii_lowercase();
        self.skip_ws();
        match self.peek()? {
            ']' => {
                self.pos += 1;
                Some(AttrPredicate { name, value: None })
            }
            _ => {
                // operator: =, ~=, |=, ^=, $=, *=
                let op = self.peek()?;
                if op != '=' {
                    self.pos += 1;
                    if self.peek()? != '=' {
                        return None;
                    }
                }
                self.pos += 1;
                self.skip_ws();
                let value = match self.peek()? {
                    quote @ ('"' | '\'') => {
                        self.pos += 1;
                        self.quoted(quote)?
                    }
                    _ => self.ident()?,
                };
                self.skip_ws();
                // case-sensitivity flag
                if matches!(self.peek(), Some('i' | 's' | 'I' | 'S')) {
                    self.pos += 1;
                    self.skip_ws();
                }
                if self.peek()? != ']' {
                    return None;
                }
                self.pos += 1;
                Some(AttrPredicate {
                    name,
                    value: Some(value),
                })
            }
        }
    }

    fn quoted(&mut self, quote: char) -> Option<String> {
        let mut out = String::new();
        loop {
            let ch = self.peek()?;
            self.pos += 1;
            match ch {
                '\\' => out.push(self.escape()?),
                c if c == quote => return Some(out),
                c => out.push(c),
            }
        }
    }

    fn parenthesized(&mut self) -> Option<String> {
        let mut depth = 0usize;
        let mut out = String::new();
        loop {
            let ch = self.peek()?;
            self.pos += 1;
            out.push(ch);
            match ch {
                '(' => depth += 1,
                ')' => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(out);
                    }
                }
                _ => {}
            }
        }
    }

    fn skip_ws(&mut self) {
        while self.peek().map_or(false, char::is_whitespace) {
            self.pos += 1;
        }
    }
}
