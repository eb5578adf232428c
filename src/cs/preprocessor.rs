//! Evaluation of `#if` / `#elif` conditions against a set of defined symbols

/// Evaluate a preprocessor condition such as `DEBUG && !UNITY_EDITOR`
///
/// Unknown tokens make the condition false rather than failing the parse.
pub fn evaluate_condition(condition: &str, defines: &[String]) -> bool {
    let tokens = tokenize(condition);
    let mut evaluator = ConditionEvaluator {
        tokens: &tokens,
        pos: 0,
        defines,
    };
    evaluator.or_expression()
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Symbol(String),
    Not,
    And,
    Or,
    Equal,
    NotEqual,
    Open,
    Close,
}

fn tokenize(text: &str) -> Vec<Token> {
    let chars: Vec<char> = text.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        let next = chars.get(i + 1).copied();
        match c {
            c if c.is_whitespace() => i += 1,
            '/' if next == Some('/') => break,
            '!' if next == Some('=') => {
                tokens.push(Token::NotEqual);
                i += 2;
            }
            '!' => {
                tokens.push(Token::Not);
                i += 1;
            }
            '&' if next == Some('&') => {
                tokens.push(Token::And);
                i += 2;
            }
            '|' if next == Some('|') => {
                tokens.push(Token::Or);
                i += 2;
            }
            '=' if next == Some('=') => {
                tokens.push(Token::Equal);
                i += 2;
            }
            '(' => {
                tokens.push(Token::Open);
                i += 1;
            }
            ')' => {
                tokens.push(Token::Close);
                i += 1;
            }
            c if c.is_alphanumeric() || c == '_' => {
                let start = i;
                while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                tokens.push(Token::Symbol(chars[start..i].iter().collect()));
            }
            _ => i += 1,
        }
    }
    tokens
}

struct ConditionEvaluator<'a> {
    tokens: &'a [Token],
    pos: usize,
    defines: &'a [String],
}

impl ConditionEvaluator<'_> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn or_expression(&mut self) -> bool {
        let mut value = self.and_expression();
        while self.peek() == Some(&Token::Or) {
            self.pos += 1;
            let rhs = self.and_expression();
            value = value || rhs;
        }
        value
    }

    fn and_expression(&mut self) -> bool {
        let mut value = self.equality_expression();
        while self.peek() == Some(&Token::And) {
            self.pos += 1;
            let rhs = self.equality_expression();
            value = value && rhs;
        }
        value
    }

    fn equality_expression(&mut self) -> bool {
        let mut value = self.unary_expression();
        loop {
            match self.peek() {
                Some(Token::Equal) => {
                    self.pos += 1;
                    let rhs = self.unary_expression();
                    value = value == rhs;
                }
                Some(Token::NotEqual) => {
                    self.pos += 1;
                    let rhs = self.unary_expression();
                    value = value != rhs;
                }
                _ => return value,
            }
        }
    }

    fn unary_expression(&mut self) -> bool {
        match self.peek() {
            Some(Token::Not) => {
                self.pos += 1;
                !self.unary_expression()
            }
            Some(Token::Open) => {
                self.pos += 1;
                let value = self.or_expression();
                if self.peek() == Some(&Token::Close) {
                    self.pos += 1;
                }
                value
            }
            Some(Token::Symbol(name)) => {
                let value = match name.as_str() {
                    "true" => true,
                    "false" => false,
                    _ => self.defines.iter().any(|d| d == name),
                };
                self.pos += 1;
                value
            }
            _ => {
                self.pos += 1;
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defines(symbols: &[&str]) -> Vec<String> {
        symbols.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_single_symbols() {
        let defined = defines(&["DEBUG"]);
        assert!(evaluate_condition("DEBUG", &defined));
        assert!(!evaluate_condition("RELEASE", &defined));
        assert!(evaluate_condition("true", &defined));
        assert!(!evaluate_condition("false", &defined));
    }

    #[test]
    fn test_operators_and_precedence() {
        let defined = defines(&["A", "B"]);
        assert!(evaluate_condition("A && B", &defined));
        assert!(!evaluate_condition("A && !B", &defined));
        assert!(evaluate_condition("C || A && B", &defined));
        assert!(!evaluate_condition("(C || A) && D", &defined));
        assert!(evaluate_condition("A == B", &defined));
        assert!(evaluate_condition("A != C", &defined));
        assert!(evaluate_condition("!(C)", &defined));
    }

    #[test]
    fn test_trailing_comment_is_ignored() {
        let defined = defines(&["UNITY_EDITOR"]);
        assert!(evaluate_condition("UNITY_EDITOR // editor only", &defined));
    }
}
