//! gclient entries files
//!
//! `gclient sync` leaves a `.gclient_entries` file in the checkout root that
//! maps every checked-out directory to the repository it came from:
//!
//! ```text
//! entries = {
//!   'src': 'https://chromium.googlesource.com/chromium/src.git',
//!   'src/buildtools': 'https://chromium.googlesource.com/chromium/buildtools.git@5b3c...',
//!   'src/third_party/foo': None,
//! }
//! ```
//!
//! The file is Python, but only this one literal dictionary is understood:
//! quoted keys mapped to quoted strings or `None`. Nothing is evaluated.

use std::fs;
use std::path::PathBuf;

use log::{debug, info};
use regex::Regex;

use super::RepositorySource;
use crate::defaults::RESERVED_ENTRY;
use crate::error::{Error, Result};
use crate::reference::RepositoryReference;

/// One `destination: source` pair of the entries mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub destination: String,
    /// `None` for entries without a repository.
    pub source: Option<String>,
}

/// Repositories listed in a gclient entries file.
pub struct EntriesFileSource {
    path: PathBuf,
}

impl EntriesFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RepositorySource for EntriesFileSource {
    fn resolve(&self) -> Result<Vec<String>> {
        let text = fs::read_to_string(&self.path).map_err(|e| Error::EntriesParse {
            message: format!("cannot read {}: {}", self.path.display(), e),
            hint: Some("pass the `.gclient_entries` file from a gclient checkout".to_string()),
        })?;

        let mut urls = Vec::new();
        for entry in parse(&text)? {
            if entry.destination == RESERVED_ENTRY {
                info!("Ignoring entry '{}' (primary checkout)", entry.destination);
                println!("ignored: {}", entry.destination);
                continue;
            }
            match entry.source {
                Some(source) => urls.push(RepositoryReference::parse(&source).url().to_string()),
                None => debug!("Entry '{}' has no repository", entry.destination),
            }
        }
        Ok(urls)
    }
}

/// Parse the `entries` mapping, keeping first-seen order and letting later
/// duplicates overwrite earlier values.
pub fn parse(text: &str) -> Result<Vec<Entry>> {
    let start = Regex::new(r"(?m)^\s*entries\s*=\s*\{")?;
    let found = start.find(text).ok_or_else(|| Error::EntriesParse {
        message: "no `entries = {...}` mapping found".to_string(),
        hint: None,
    })?;

    let tokens = tokenize(&text[found.end()..])?;
    let mut entries: Vec<Entry> = Vec::new();
    let mut iter = tokens.into_iter();

    loop {
        let destination = match iter.next() {
            Some(Token::Close) => break,
            Some(Token::Str(key)) => key,
            Some(other) => return Err(unexpected(&other, "a quoted key")),
            None => return Err(unterminated()),
        };
        match iter.next() {
            Some(Token::Colon) => {}
            Some(other) => return Err(unexpected(&other, "':'")),
            None => return Err(unterminated()),
        }
        let source = match iter.next() {
            Some(Token::Str(value)) => Some(value),
            Some(Token::None) => None,
            Some(other) => return Err(unexpected(&other, "a quoted URL or None")),
            None => return Err(unterminated()),
        };
        match iter.next() {
            Some(Token::Comma) => {}
            Some(Token::Close) => {
                insert(&mut entries, destination, source);
                break;
            }
            Some(other) => return Err(unexpected(&other, "',' or '}'")),
            None => return Err(unterminated()),
        }
        insert(&mut entries, destination, source);
    }

    Ok(entries)
}

fn insert(entries: &mut Vec<Entry>, destination: String, source: Option<String>) {
    match entries.iter_mut().find(|e| e.destination == destination) {
        Some(existing) => existing.source = source,
        None => entries.push(Entry {
            destination,
            source,
        }),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Str(String),
    None,
    Colon,
    Comma,
    Close,
    Other(String),
}

/// Tokenize the dictionary body up to and including its closing brace.
fn tokenize(body: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = body.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            c if c.is_whitespace() => {}
            '#' => {
                for c in chars.by_ref() {
                    if c == '\n' {
                        break;
                    }
                }
            }
            ':' => tokens.push(Token::Colon),
            ',' => tokens.push(Token::Comma),
            '}' => {
                tokens.push(Token::Close);
                return Ok(tokens);
            }
            '\'' | '"' => tokens.push(Token::Str(read_string(&mut chars, c)?)),
            c if c.is_alphanumeric() || c == '_' => {
                let mut word = c.to_string();
                while let Some(&next) = chars.peek() {
                    if next.is_alphanumeric() || next == '_' {
                        word.push(next);
                        chars.next();
                    } else {
                        break;
                    }
                }
                match chars.peek() {
                    // string prefixes such as u'...' or r"..."
                    Some(&quote) if (quote == '\'' || quote == '"') && word.len() <= 2 => {
                        chars.next();
                        tokens.push(Token::Str(read_string(&mut chars, quote)?));
                    }
                    _ if word == "None" => tokens.push(Token::None),
                    _ => tokens.push(Token::Other(word)),
                }
            }
            other => tokens.push(Token::Other(other.to_string())),
        }
    }

    Err(unterminated())
}

fn read_string(chars: &mut std::iter::Peekable<std::str::Chars<'_>>, quote: char) -> Result<String> {
    let mut value = String::new();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some('n') => value.push('\n'),
                Some('t') => value.push('\t'),
                Some(escaped) => value.push(escaped),
                None => break,
            },
            c if c == quote => return Ok(value),
            '\n' => break,
            c => value.push(c),
        }
    }
    Err(Error::EntriesParse {
        message: format!("unterminated string starting with {:?}", value),
        hint: None,
    })
}

fn unexpected(token: &Token, expected: &str) -> Error {
    let found = match token {
        Token::Str(s) => format!("string {:?}", s),
        Token::None => "None".to_string(),
        Token::Colon => "':'".to_string(),
        Token::Comma => "','".to_string(),
        Token::Close => "'}'".to_string(),
        Token::Other(s) => format!("{:?}", s),
    };
    Error::EntriesParse {
        message: format!("expected {}, found {}", expected, found),
        hint: Some("only literal strings and None are supported as values".to_string()),
    }
}

fn unterminated() -> Error {
    Error::EntriesParse {
        message: "`entries` mapping is not closed".to_string(),
        hint: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const ENTRIES: &str = r#"
entries = {
  'src': 'https://chromium.googlesource.com/chromium/src.git',
  'src/buildtools': 'https://chromium.googlesource.com/chromium/buildtools.git@5b3c36ab',
  # third party
  "src/third_party/angle": "https://chromium.googlesource.com/angle/angle.git",
  'src/third_party/unused': None,
}
"#;

    #[test]
    fn test_parse_entries() {
        let entries = parse(ENTRIES).unwrap();
        assert_eq!(entries.len(), 4);
        assert_eq!(entries[0].destination, "src");
        assert_eq!(
            entries[1].source.as_deref(),
            Some("https://chromium.googlesource.com/chromium/buildtools.git@5b3c36ab")
        );
        assert_eq!(entries[2].destination, "src/third_party/angle");
        assert_eq!(entries[3].source, None);
    }

    #[test]
    fn test_parse_without_trailing_comma() {
        let entries = parse("entries = {'a': 'https://h/a.git'}").unwrap();
        assert_eq!(
            entries,
            vec![Entry {
                destination: "a".to_string(),
                source: Some("https://h/a.git".to_string()),
            }]
        );
    }

    #[test]
    fn test_parse_empty_mapping() {
        assert!(parse("entries = {\n}\n").unwrap().is_empty());
    }

    #[test]
    fn test_parse_string_prefixes_and_escapes() {
        let entries = parse(r#"entries = { u'a\'b': u"https://h/x.git" }"#).unwrap();
        assert_eq!(entries[0].destination, "a'b");
        assert_eq!(entries[0].source.as_deref(), Some("https://h/x.git"));
    }

    #[test]
    fn test_parse_duplicate_key_last_wins() {
        let entries = parse("entries = {'a': 'https://h/1.git', 'b': None, 'a': 'https://h/2.git'}").unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].destination, "a");
        assert_eq!(entries[0].source.as_deref(), Some("https://h/2.git"));
    }

    #[test]
    fn test_parse_ignores_surrounding_code() {
        let text = "solutions = [{'name': 'src'}]\nentries = {'a': 'https://h/a.git'}\n";
        assert_eq!(parse(text).unwrap().len(), 1);
    }

    #[test]
    fn test_parse_rejects_expressions() {
        let result = parse("entries = {'a': __import__('os').system('rm -rf /')}");
        assert!(matches!(result, Err(Error::EntriesParse { .. })));
    }

    #[test]
    fn test_parse_missing_mapping() {
        let result = parse("solutions = []");
        assert!(matches!(result, Err(Error::EntriesParse { .. })));
    }

    #[test]
    fn test_parse_unterminated() {
        assert!(parse("entries = {'a': 'https://h/a.git',").is_err());
        assert!(parse("entries = {'a: 'https://h/a.git'}").is_err());
    }

    #[test]
    fn test_resolve_skips_src_and_none_and_strips_revisions() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(".gclient_entries");
        fs::write(&path, ENTRIES).unwrap();

        let urls = EntriesFileSource::new(&path).resolve().unwrap();

        assert_eq!(
            urls,
            vec![
                "https://chromium.googlesource.com/chromium/buildtools.git",
                "https://chromium.googlesource.com/angle/angle.git",
            ]
        );
    }

    #[test]
    fn test_resolve_missing_file() {
        let temp = TempDir::new().unwrap();
        let source = EntriesFileSource::new(temp.path().join("nope"));
        let err = source.resolve().unwrap_err();
        assert!(err.to_string().contains("cannot read"));
    }
}
