use crate::error::TemplateError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Text(String),
    Field(String),
    Call { name: String, args: Vec<Vec<Node>> },
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
}

pub fn parse(source: &str) -> Result<Vec<Node>, TemplateError> {
    let mut parser = Parser {
        chars: source.chars().collect(),
        pos: 0,
    };
    parser.sequence(false)
}

fn is_ident(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

impl Parser {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn ident(&mut self) -> String {
        let start = self.pos;
        while self.peek().is_some_and(is_ident) {
            self.pos += 1;
        }
        self.chars[start..self.pos].iter().collect()
    }

    /// Nodes up to the end of input, or up to `,`/`}` inside an argument list.
    fn sequence(&mut self, in_args: bool) -> Result<Vec<Node>, TemplateError> {
        let mut nodes = Vec::new();
        let mut text = String::new();

        while let Some(c) = self.peek() {
            if in_args && (c == ',' || c == '}') {
                break;
            }
            self.pos += 1;
            match c {
                '$' => match self.dollar() {
                    Ok(node) => {
                        if !text.is_empty() {
                            nodes.push(Node::Text(std::mem::take(&mut text)));
                        }
                        nodes.push(node);
                    }
                    Err(literal) => text.push_str(&literal),
                },
                '%' => match self.call()? {
                    Some(node) => {
                        if !text.is_empty() {
                            nodes.push(Node::Text(std::mem::take(&mut text)));
                        }
                        nodes.push(node);
                    }
                    None => text.push('%'),
                },
                c => text.push(c),
            }
        }

        if !text.is_empty() {
            nodes.push(Node::Text(text));
        }
        Ok(nodes)
    }

    /// After `$`: a field node, or the literal text to emit.
    fn dollar(&mut self) -> Result<Node, String> {
        match self.peek() {
            Some(c @ ('$' | '%' | ',' | '}')) => {
                self.pos += 1;
                Err(c.to_string())
            }
            Some('{') => {
                let start = self.pos;
                self.pos += 1;
                let name = self.ident();
                if !name.is_empty() && self.peek() == Some('}') {
                    self.pos += 1;
                    Ok(Node::Field(name))
                } else {
                    self.pos = start;
                    Err("$".to_string())
                }
            }
            Some(c) if is_ident(c) => Ok(Node::Field(self.ident())),
            _ => Err("$".to_string()),
        }
    }

    /// After `%`: a call, or `None` when this is a plain percent sign.
    fn call(&mut self) -> Result<Option<Node>, TemplateError> {
        let start = self.pos;
        let name = self.ident();
        if name.is_empty() || self.peek() != Some('{') {
            self.pos = start;
            return Ok(None);
        }
        self.pos += 1;

        let mut args = Vec::new();
        loop {
            args.push(self.sequence(true)?);
            match self.peek() {
                Some(',') => self.pos += 1,
                Some('}') => {
                    self.pos += 1;
                    return Ok(Some(Node::Call { name, args }));
                }
                _ => return Err(TemplateError::Unterminated(name, start - 1)),
            }
        }
    }
}
