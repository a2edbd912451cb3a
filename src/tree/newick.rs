use crate::error::{Error, Result};

/// One clade of a Newick tree as read from the source text, before the
/// walk assigns identifiers and depths.
#[derive(Debug, Default, Clone)]
pub struct Clade {
    pub name: Option<String>,
    pub branch_length: Option<f64>,
    /// Raw `[...]` comments attached to this clade, in encounter order.
    pub comments: Vec<String>,
    pub children: Vec<Clade>,
}

/// Parse a Newick string into its root clade.
///
/// The grammar accepted here covers BEAST MCC output: nested parentheses,
/// quoted (`'...'`, with `''` escaping) or bare labels, `:length` suffixes,
/// and `[&...]` comments before or after the label and the branch length.
pub fn parse(text: &str) -> Result<Clade> {
    let mut parser = Parser {
        chars: text.chars().collect(),
        pos: 0,
    };
    parser.skip_whitespace();
    if parser.peek().is_none() {
        return Err(Error::Parse("empty tree string".to_string()));
    }
    let clade = parser.parse_clade()?;
    parser.skip_whitespace();
    if parser.peek() == Some(';') {
        parser.pos += 1;
    }
    Ok(clade)
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn skip_whitespace(&mut self) {
        while self.peek().map_or(false, char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn parse_clade(&mut self) -> Result<Clade> {
        let mut clade = Clade::default();
        self.skip_whitespace();

        if self.peek() == Some('(') {
            self.pos += 1;
            loop {
                let child = self.parse_clade()?;
                clade.children.push(child);
                self.skip_whitespace();
                match self.peek() {
                    Some(',') => {
                        self.pos += 1;
                    }
                    Some(')') => {
                        self.pos += 1;
                        break;
                    }
                    _ => {
                        return Err(Error::Parse(
                            "unbalanced parentheses in tree statement".to_string(),
                        ))
                    }
                }
            }
        }

        self.collect_comments(&mut clade)?;
        self.skip_whitespace();
        match self.peek() {
            Some('\'') => clade.name = Some(self.read_quoted_label()?),
            Some(c) if is_label_char(c) => clade.name = Some(self.read_bare_label()),
            _ => {}
        }
        self.collect_comments(&mut clade)?;

        self.skip_whitespace();
        if self.peek() == Some(':') {
            self.pos += 1;
            self.collect_comments(&mut clade)?;
            self.skip_whitespace();
            clade.branch_length = Some(self.read_branch_length()?);
            self.collect_comments(&mut clade)?;
        }

        Ok(clade)
    }

    fn collect_comments(&mut self, clade: &mut Clade) -> Result<()> {
        loop {
            self.skip_whitespace();
            if self.peek() != Some('[') {
                return Ok(());
            }
            self.pos += 1;
            let start = self.pos;
            while self.peek().map_or(false, |c| c != ']') {
                self.pos += 1;
            }
            if self.peek().is_none() {
                return Err(Error::Parse("unterminated comment in tree statement".to_string()));
            }
            let inner: String = self.chars[start..self.pos].iter().collect();
            self.pos += 1;
            clade.comments.push(format!("[{}]", inner));
        }
    }

    fn read_quoted_label(&mut self) -> Result<String> {
        self.pos += 1;
        let mut label = String::new();
        loop {
            match self.peek() {
                None => {
                    return Err(Error::Parse(
                        "unterminated quoted label in tree statement".to_string(),
                    ))
                }
                Some('\'') => {
                    self.pos += 1;
                    if self.peek() == Some('\'') {
                        label.push('\'');
                        self.pos += 1;
                    } else {
                        break;
                    }
                }
                Some(c) => {
                    label.push(c);
                    self.pos += 1;
                }
            }
        }
        Ok(label)
    }

    fn read_bare_label(&mut self) -> String {
        let start = self.pos;
        while self.peek().map_or(false, is_label_char) {
            self.pos += 1;
        }
        self.chars[start..self.pos].iter().collect()
    }

    fn read_branch_length(&mut self) -> Result<f64> {
        let start = self.pos;
        while self
            .peek()
            .map_or(false, |c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'))
        {
            self.pos += 1;
        }
        let token: String = self.chars[start..self.pos].iter().collect();
        token
            .parse::<f64>()
            .map_err(|_| Error::Parse(format!("invalid branch length `{}`", token)))
    }
}

fn is_label_char(c: char) -> bool {
    !c.is_whitespace() && !matches!(c, '(' | ')' | ',' | ';' | ':' | '[' | ']' | '\'')
}
