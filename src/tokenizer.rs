use std::collections::VecDeque;

use tracing::debug;

use crate::types::{AbstractToken, Block};

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum TokenKind {
    /// Identifier or keyword.
    Word,
    /// String literal, quotes included.
    Str,
    Comment,
    /// Punctuation or operator run.
    Symbol,
    /// Whitespace run containing at least one line break.
    Newline,
    Indent,
    Dedent,
}

#[derive(Clone, Debug)]
pub struct RawToken<'a> {
    /// Text of the token.
    pub text: &'a str,
    /// Index of the start of the token in the original text.
    pub start: usize,
    pub kind: TokenKind,
}

/// Best-effort lexical scanner. A structural fault (unterminated string
/// literal) stops iteration at the fault point instead of failing; whatever
/// was scanned before the fault is still usable.
#[derive(Debug)]
pub struct Scanner<'a> {
    source: &'a str,
    position: usize,
    next_tokens: VecDeque<RawToken<'a>>,
    prev_indentation: usize,
    faulted: bool,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Scanner<'a> {
        Scanner {
            source,
            position: 0,
            next_tokens: VecDeque::new(),
            prev_indentation: 0,
            faulted: false,
        }
    }
}

#[derive(PartialEq, Debug)]
enum CharType {
    WhiteSpace,
    Word,
    BlockChar,
    Other,
}

fn char_type(c: char) -> CharType {
    if c.is_whitespace() {
        CharType::WhiteSpace
    } else if c.is_alphanumeric() || c == '_' {
        CharType::Word
    } else if c == '(' || c == ')' || c == '[' || c == ']' || c == '{' || c == '}' {
        CharType::BlockChar
    } else {
        CharType::Other
    }
}

/// Length of the string literal starting `rest`, quotes included. Handles
/// single- and triple-quoted forms and backslash escapes. `None` means the
/// literal never terminates.
fn string_literal_len(rest: &str, quote: u8) -> Option<usize> {
    let bytes = rest.as_bytes();
    let triple = bytes.len() >= 3 && bytes[1] == quote && bytes[2] == quote;
    let delimiter_len = if triple { 3 } else { 1 };
    let mut i = delimiter_len;
    while i < bytes.len() {
        if bytes[i] == b'\\' {
            i += 2;
        } else if bytes[i] == b'\n' && !triple {
            return None;
        } else if bytes[i] == quote {
            if !triple {
                return Some(i + 1);
            }
            if i + 2 < bytes.len() && bytes[i + 1] == quote && bytes[i + 2] == quote {
                return Some(i + 3);
            }
            i += 1;
        } else {
            i += 1;
        }
    }
    None
}

impl<'a> Iterator for Scanner<'a> {
    type Item = RawToken<'a>;
    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(t) = self.next_tokens.pop_front() {
                return Some(t);
            }
            if self.faulted {
                return None;
            }
            let rest_of_text = self.source.split_at(self.position).1;
            let first = rest_of_text.chars().next()?;
            let start = self.position;

            if first == '#' {
                let len = rest_of_text.find('\n').unwrap_or(rest_of_text.len());
                self.position += len;
                return Some(RawToken {
                    text: &rest_of_text[..len],
                    start,
                    kind: TokenKind::Comment,
                });
            }

            if first == '\'' || first == '"' {
                match string_literal_len(rest_of_text, first as u8) {
                    Some(len) => {
                        self.position += len;
                        return Some(RawToken {
                            text: &rest_of_text[..len],
                            start,
                            kind: TokenKind::Str,
                        });
                    }
                    None => {
                        debug!(position = start, "unterminated string literal, stopping scan");
                        self.faulted = true;
                        return None;
                    }
                }
            }

            let c_type = char_type(first);
            let len = if c_type == CharType::BlockChar {
                first.len_utf8()
            } else {
                rest_of_text
                    .chars()
                    .take_while(|x| char_type(*x) == c_type && *x != '#' && *x != '\'' && *x != '"')
                    .map(|x| x.len_utf8())
                    .sum::<usize>()
            };
            self.position += len;
            let text = &rest_of_text[..len];

            if c_type == CharType::WhiteSpace {
                if !text.contains('\n') {
                    continue;
                }
                let current_indentation = text.split('\n').last().unwrap_or("").len();
                if current_indentation != self.prev_indentation {
                    self.next_tokens.push_back(RawToken {
                        text: "",
                        start: self.position,
                        kind: if current_indentation < self.prev_indentation {
                            TokenKind::Dedent
                        } else {
                            TokenKind::Indent
                        },
                    });
                    self.prev_indentation = current_indentation;
                }
                return Some(RawToken {
                    text,
                    start,
                    kind: TokenKind::Newline,
                });
            }

            return Some(RawToken {
                text,
                start,
                kind: match c_type {
                    CharType::Word => TokenKind::Word,
                    CharType::BlockChar | CharType::Other => TokenKind::Symbol,
                    CharType::WhiteSpace => unreachable!(),
                },
            });
        }
    }
}

/// Construct signaled by a boundary keyword, if any.
fn keyword_construct(word: &str) -> Option<AbstractToken> {
    match word {
        "import" | "from" => Some(AbstractToken::ImportStatement),
        "def" => Some(AbstractToken::FunctionDef),
        "class" => Some(AbstractToken::ClassDef),
        "for" | "while" => Some(AbstractToken::Loop),
        "if" | "elif" | "else" => Some(AbstractToken::Conditional),
        _ => None,
    }
}

fn flush(blocks: &mut Vec<Block>, lexemes: &mut Vec<&str>, tag: &mut AbstractToken) {
    if !lexemes.is_empty() {
        blocks.push(Block {
            text: lexemes.join(" "),
            construct: *tag,
        });
        lexemes.clear();
    }
    *tag = AbstractToken::GeneralToken;
}

/// Scan `source` into an ordered sequence of construct-tagged blocks.
///
/// A new block opens at each boundary keyword and at each string literal;
/// newline, indent and dedent markers flush the open block without opening a
/// tagged one; comments are dropped. Line endings are normalized and the text
/// trimmed before scanning. Lexing faults degrade to the blocks accumulated
/// so far.
pub fn tokenize(source: &str) -> Vec<Block> {
    let normalized = source.replace("\r\n", "\n");
    let normalized = normalized.trim();
    let mut blocks = Vec::new();
    let mut lexemes: Vec<&str> = Vec::new();
    let mut tag = AbstractToken::GeneralToken;
    for token in Scanner::new(normalized) {
        match token.kind {
            TokenKind::Comment => {}
            TokenKind::Newline | TokenKind::Indent | TokenKind::Dedent => {
                flush(&mut blocks, &mut lexemes, &mut tag);
            }
            TokenKind::Word => {
                if let Some(construct) = keyword_construct(token.text) {
                    flush(&mut blocks, &mut lexemes, &mut tag);
                    tag = construct;
                }
                lexemes.push(token.text);
            }
            TokenKind::Str => {
                flush(&mut blocks, &mut lexemes, &mut tag);
                tag = AbstractToken::Docstring;
                lexemes.push(token.text);
            }
            TokenKind::Symbol => lexemes.push(token.text),
        }
    }
    flush(&mut blocks, &mut lexemes, &mut tag);
    blocks
}

/// Collapse each block to its category label. Total and order-preserving;
/// every block maps to exactly one label.
pub fn abstract_blocks(blocks: &[Block]) -> Vec<AbstractToken> {
    blocks.iter().map(|block| block.construct).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constructs(source: &str) -> Vec<AbstractToken> {
        abstract_blocks(&tokenize(source))
    }

    #[test]
    fn function_def_then_body() {
        let blocks = tokenize("def foo():\n    pass\n");
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].construct, AbstractToken::FunctionDef);
        assert_eq!(blocks[0].text, "def foo ( ) :");
        assert_eq!(blocks[1].construct, AbstractToken::GeneralToken);
        assert_eq!(blocks[1].text, "pass");
    }

    #[test]
    fn import_and_from_both_tag_imports() {
        // `from sys import path` carries a second boundary keyword mid-line,
        // so it segments into two import blocks of its own.
        let blocks = tokenize("import os\nfrom sys import path\n");
        assert_eq!(
            abstract_blocks(&blocks),
            vec![AbstractToken::ImportStatement; 3]
        );
        assert_eq!(blocks[0].text, "import os");
        assert_eq!(blocks[1].text, "from sys");
        assert_eq!(blocks[2].text, "import path");
    }

    #[test]
    fn loop_and_conditional_keywords() {
        assert_eq!(
            constructs("for i in xs:\n    x = 1\nwhile True:\n    break\n"),
            vec![
                AbstractToken::Loop,
                AbstractToken::GeneralToken,
                AbstractToken::Loop,
                AbstractToken::GeneralToken,
            ]
        );
        assert_eq!(
            constructs("if a:\n    pass\nelif b:\n    pass\nelse:\n    pass\n"),
            vec![
                AbstractToken::Conditional,
                AbstractToken::GeneralToken,
                AbstractToken::Conditional,
                AbstractToken::GeneralToken,
                AbstractToken::Conditional,
                AbstractToken::GeneralToken,
            ]
        );
    }

    #[test]
    fn class_header_is_tagged() {
        let blocks = tokenize("class Foo(Bar):\n    x = 1\n");
        assert_eq!(blocks[0].construct, AbstractToken::ClassDef);
        assert_eq!(blocks[1].construct, AbstractToken::GeneralToken);
    }

    #[test]
    fn keyword_mid_line_starts_a_new_block() {
        // A boundary keyword flushes whatever was open before it.
        let blocks = tokenize("x = 1 if y else 2\n");
        let tags: Vec<_> = blocks.iter().map(|b| b.construct).collect();
        assert_eq!(
            tags,
            vec![
                AbstractToken::GeneralToken,
                AbstractToken::Conditional,
                AbstractToken::Conditional,
            ]
        );
        assert_eq!(blocks[0].text, "x = 1");
    }

    #[test]
    fn comments_never_reach_a_block() {
        assert_eq!(
            constructs("# leading comment\nx = 1  # trailing\n"),
            vec![AbstractToken::GeneralToken]
        );
        assert!(tokenize("# only comments\n# here\n").is_empty());
    }

    #[test]
    fn string_literal_opens_a_docstring_block() {
        let blocks = tokenize("def f():\n    \"\"\"Summary line.\"\"\"\n    return 1\n");
        assert_eq!(
            abstract_blocks(&blocks),
            vec![
                AbstractToken::FunctionDef,
                AbstractToken::Docstring,
                AbstractToken::GeneralToken,
            ]
        );
        assert_eq!(blocks[1].text, "\"\"\"Summary line.\"\"\"");
    }

    #[test]
    fn single_quoted_string_is_a_docstring_block_too() {
        assert_eq!(
            constructs("x = 'hello'\n"),
            vec![AbstractToken::GeneralToken, AbstractToken::Docstring]
        );
    }

    #[test]
    fn unterminated_string_degrades_to_partial_blocks() {
        let blocks = tokenize("import os\nx = 'oops\ny = 2\n");
        assert_eq!(
            abstract_blocks(&blocks),
            vec![AbstractToken::ImportStatement, AbstractToken::GeneralToken]
        );
        assert_eq!(blocks[1].text, "x =");
    }

    #[test]
    fn crlf_input_is_normalized() {
        assert_eq!(
            constructs("import os\r\nx = 1\r\n"),
            vec![AbstractToken::ImportStatement, AbstractToken::GeneralToken]
        );
    }

    #[test]
    fn no_block_is_ever_empty() {
        for source in ["", "\n\n\n", "   \n\t\n", "# c\n\n# d\n"] {
            assert!(tokenize(source).iter().all(|b| !b.text.is_empty()));
            assert!(tokenize(source).is_empty(), "source {:?}", source);
        }
    }

    #[test]
    fn abstraction_preserves_length_and_order() {
        let blocks = tokenize("import os\ndef f():\n    return 1\n");
        let tokens = abstract_blocks(&blocks);
        assert_eq!(tokens.len(), blocks.len());
        assert_eq!(tokens[0], AbstractToken::ImportStatement);
        assert_eq!(tokens[1], AbstractToken::FunctionDef);
    }
}
