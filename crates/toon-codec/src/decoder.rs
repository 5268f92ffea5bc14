//! TOON text → JSON value.

use serde_json::{Map, Number, Value};

use crate::error::{ToonError, ToonResult};
use crate::folding::{expandable_segments, insert_path, merge_entry};
use crate::options::{DecodeOptions, Delimiter, PathExpansion, MAX_DEPTH};
use crate::syntax::{find_unquoted, is_json_number, parse_quoted, split_delimited};

/// Decode TOON text into a JSON value.
pub fn decode(input: &str, options: &DecodeOptions) -> ToonResult<Value> {
    options.validate()?;
    let lines = scan_lines(input, options)?;
    let mut parser = Parser {
        lines,
        pos: 0,
        expanded: 0,
        strict: options.strict,
        expand_paths: options.expand_paths,
    };
    parser.parse_document()
}

/// A non-blank line with its indentation resolved to a depth.
#[derive(Debug, Clone, Copy)]
struct Line<'a> {
    number: usize,
    depth: usize,
    content: &'a str,
}

fn scan_lines<'a>(input: &'a str, options: &DecodeOptions) -> ToonResult<Vec<Line<'a>>> {
    let mut lines = Vec::new();

    for (i, raw) in input.lines().enumerate() {
        let number = i + 1;
        if raw.trim().is_empty() {
            continue;
        }

        let body = raw.trim_start_matches([' ', '\t']);
        let leading = &raw[..raw.len() - body.len()];
        if options.strict && leading.contains('\t') {
            return Err(ToonError::TabIndentation { line: number });
        }

        let width: usize = leading
            .chars()
            .map(|c| if c == '\t' { options.indent } else { 1 })
            .sum();
        if options.strict && width % options.indent != 0 {
            return Err(ToonError::InvalidIndentation {
                line: number,
                indent: options.indent,
            });
        }

        let depth = width / options.indent;
        check_nesting(depth, number)?;

        lines.push(Line {
            number,
            depth,
            content: body.trim_end_matches(' '),
        });
    }

    Ok(lines)
}

fn check_nesting(depth: usize, line: usize) -> ToonResult<()> {
    if depth > MAX_DEPTH {
        return Err(ToonError::NestingTooDeep {
            line,
            max: MAX_DEPTH,
        });
    }
    Ok(())
}

/// `[N<delim>]{fields}` parsed from a key line.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Header {
    len: usize,
    delimiter: Delimiter,
    fields: Option<Vec<Field>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Field {
    name: String,
    quoted: bool,
}

/// `key[header]: rest` split into its parts. `key` is empty for keyless array headers.
#[derive(Debug)]
struct KeyLine<'a> {
    key: String,
    quoted: bool,
    header: Option<Header>,
    rest: &'a str,
}

/// Parse a `key: value` line. Returns `None` when there is no unquoted colon at all.
fn parse_key_line(content: &str, line: usize) -> ToonResult<Option<KeyLine<'_>>> {
    let (key, quoted, after) = if content.starts_with('"') {
        let (key, after) = parse_quoted(content, line)?;
        (key, true, after.trim_start())
    } else {
        let Some(colon) = find_unquoted(content, ':') else {
            return Ok(None);
        };
        let bracket = content[..colon].find('[');
        let end = bracket.unwrap_or(colon);
        let key = content[..end].trim();
        if key.is_empty() && bracket.is_none() {
            return Err(ToonError::MissingKey { line });
        }
        (key.to_string(), false, &content[end..])
    };

    let (header, after) = if after.starts_with('[') {
        let (header, after) = parse_header(after, line)?;
        (Some(header), after)
    } else {
        (None, after)
    };

    let Some(rest) = after.strip_prefix(':') else {
        return Err(ToonError::InvalidLine {
            line,
            content: content.to_string(),
        });
    };

    Ok(Some(KeyLine {
        key,
        quoted,
        header,
        rest: rest.trim(),
    }))
}

fn parse_header(s: &str, line: usize) -> ToonResult<(Header, &str)> {
    let invalid = |reason: &str| ToonError::InvalidArrayHeader {
        line,
        reason: reason.to_string(),
    };

    let close = s.find(']').ok_or_else(|| invalid("missing `]`"))?;
    let inner = &s[1..close];
    let (digits, delimiter) = match inner.chars().last() {
        Some(c) if !c.is_ascii_digit() => {
            let delimiter = Delimiter::from_header_symbol(c)
                .ok_or_else(|| invalid(&format!("unknown delimiter `{c}`")))?;
            (&inner[..inner.len() - c.len_utf8()], delimiter)
        }
        _ => (inner, Delimiter::Comma),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid("length must be a non-negative integer"));
    }
    let len = digits
        .parse::<usize>()
        .map_err(|_| invalid("length is too large"))?;

    let mut rest = &s[close + 1..];
    let fields = if rest.starts_with('{') {
        let end = find_unquoted(rest, '}').ok_or_else(|| invalid("missing `}`"))?;
        let names = split_delimited(&rest[1..end], delimiter.as_char())
            .into_iter()
            .map(|name| parse_field_name(name, line))
            .collect::<ToonResult<Vec<_>>>()?;
        rest = &rest[end + 1..];
        Some(names)
    } else {
        None
    };

    Ok((
        Header {
            len,
            delimiter,
            fields,
        },
        rest,
    ))
}

fn parse_field_name(name: &str, line: usize) -> ToonResult<Field> {
    if name.starts_with('"') {
        let (parsed, rest) = parse_quoted(name, line)?;
        if !rest.trim().is_empty() {
            return Err(ToonError::TrailingCharacters {
                line,
                rest: rest.to_string(),
            });
        }
        return Ok(Field {
            name: parsed,
            quoted: true,
        });
    }
    if name.is_empty() {
        return Err(ToonError::InvalidArrayHeader {
            line,
            reason: "empty field name".to_string(),
        });
    }
    Ok(Field {
        name: name.to_string(),
        quoted: false,
    })
}

fn parse_primitive(token: &str, line: usize) -> ToonResult<Value> {
    let token = token.trim();

    if token.starts_with('"') {
        let (s, rest) = parse_quoted(token, line)?;
        if !rest.trim().is_empty() {
            return Err(ToonError::TrailingCharacters {
                line,
                rest: rest.to_string(),
            });
        }
        return Ok(Value::String(s));
    }

    match token {
        "true" => return Ok(Value::Bool(true)),
        "false" => return Ok(Value::Bool(false)),
        "null" => return Ok(Value::Null),
        _ => {}
    }

    if is_json_number(token) {
        if let Some(n) = parse_number(token) {
            return Ok(Value::Number(n));
        }
    }

    Ok(Value::String(token.to_string()))
}

fn parse_number(token: &str) -> Option<Number> {
    let integral = !token.contains(['.', 'e', 'E']);
    if integral {
        if let Ok(i) = token.parse::<i64>() {
            return Some(Number::from(i));
        }
        if let Ok(u) = token.parse::<u64>() {
            return Some(Number::from(u));
        }
    }
    let f = token.parse::<f64>().ok()?;
    if f == 0.0 {
        return Some(Number::from(0));
    }
    Number::from_f64(f)
}

/// Tabular rows have no unquoted colon, or a delimiter before the first one.
fn is_row(content: &str, delimiter: char) -> bool {
    match (find_unquoted(content, ':'), find_unquoted(content, delimiter)) {
        (None, _) => true,
        (Some(colon), Some(delim)) => delim < colon,
        (Some(_), None) => false,
    }
}

struct Parser<'a> {
    lines: Vec<Line<'a>>,
    pos: usize,
    /// Extra levels added by the expanded dotted keys of the fields being parsed.
    expanded: usize,
    strict: bool,
    expand_paths: PathExpansion,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<Line<'a>> {
        self.lines.get(self.pos).copied()
    }

    /// Levels a key adds beyond its own once path expansion splits it.
    fn key_nesting(&self, key: &str, quoted: bool) -> usize {
        if quoted || self.expand_paths == PathExpansion::Off {
            return 0;
        }
        expandable_segments(key).map_or(0, |segments| segments.len() - 1)
    }

    /// Parse a field's value with its key's expansion counted against [`MAX_DEPTH`].
    fn nested_value(
        &mut self,
        key_line: &KeyLine<'_>,
        number: usize,
        depth: usize,
        child_depth: usize,
    ) -> ToonResult<Value> {
        let extra = self.key_nesting(&key_line.key, key_line.quoted);
        check_nesting(depth + self.expanded + extra, number)?;
        self.expanded += extra;
        let value = self.field_value(key_line, number, child_depth);
        self.expanded -= extra;
        value
    }

    fn parse_document(&mut self) -> ToonResult<Value> {
        let Some(first) = self.peek() else {
            return Ok(Value::Object(Map::new()));
        };
        if self.strict && first.depth != 0 {
            return Err(ToonError::UnexpectedIndentation { line: first.number });
        }

        let value = self.parse_root(first)?;

        if let Some(extra) = self.peek() {
            return Err(ToonError::InvalidLine {
                line: extra.number,
                content: extra.content.to_string(),
            });
        }
        Ok(value)
    }

    fn parse_root(&mut self, first: Line<'a>) -> ToonResult<Value> {
        if first.content.starts_with('[') {
            if let Some(key_line) = parse_key_line(first.content, first.number)? {
                if let (true, Some(header)) = (key_line.key.is_empty(), &key_line.header) {
                    self.pos += 1;
                    return self.array_body(header, key_line.rest, first.depth + 1, first.number);
                }
            }
        }

        if self.lines.len() == 1 && find_unquoted(first.content, ':').is_none() {
            self.pos += 1;
            return parse_primitive(first.content, first.number);
        }

        let mut map = Map::new();
        self.parse_object_into(&mut map, first.depth)?;
        Ok(Value::Object(map))
    }

    /// Read `key: value` lines at `depth` until a shallower line.
    fn parse_object_into(&mut self, map: &mut Map<String, Value>, depth: usize) -> ToonResult<()> {
        while let Some(line) = self.peek() {
            if line.depth < depth {
                break;
            }
            if line.depth > depth {
                if self.strict {
                    return Err(ToonError::UnexpectedIndentation { line: line.number });
                }
                tracing::debug!(line = line.number, "skipping over-indented line");
                self.pos += 1;
                continue;
            }

            let key_line = parse_key_line(line.content, line.number)?.ok_or_else(|| {
                ToonError::InvalidLine {
                    line: line.number,
                    content: line.content.to_string(),
                }
            })?;
            self.pos += 1;

            let value = self.nested_value(&key_line, line.number, depth, depth + 1)?;
            self.insert(map, key_line.key, key_line.quoted, value, line.number)?;
        }
        Ok(())
    }

    fn field_value(
        &mut self,
        key_line: &KeyLine<'_>,
        number: usize,
        child_depth: usize,
    ) -> ToonResult<Value> {
        if let Some(header) = &key_line.header {
            return self.array_body(header, key_line.rest, child_depth, number);
        }

        if key_line.rest.is_empty() {
            let mut map = Map::new();
            if self.peek().is_some_and(|next| next.depth >= child_depth) {
                self.parse_object_into(&mut map, child_depth)?;
            }
            return Ok(Value::Object(map));
        }

        parse_primitive(key_line.rest, number)
    }

    fn array_body(
        &mut self,
        header: &Header,
        rest: &str,
        child_depth: usize,
        number: usize,
    ) -> ToonResult<Value> {
        if !rest.is_empty() {
            if header.fields.is_some() {
                return Err(ToonError::InvalidArrayHeader {
                    line: number,
                    reason: "tabular header cannot carry inline values".to_string(),
                });
            }
            let values = split_delimited(rest, header.delimiter.as_char())
                .into_iter()
                .map(|token| parse_primitive(token, number))
                .collect::<ToonResult<Vec<_>>>()?;
            self.check_length(header.len, values.len(), number)?;
            return Ok(Value::Array(values));
        }

        if let Some(fields) = &header.fields {
            return self.table_rows(fields, header, child_depth, number);
        }

        if header.len == 0 {
            return Ok(Value::Array(Vec::new()));
        }

        self.list_items(header, child_depth, number)
    }

    fn table_rows(
        &mut self,
        fields: &[Field],
        header: &Header,
        depth: usize,
        number: usize,
    ) -> ToonResult<Value> {
        let delimiter = header.delimiter.as_char();
        let widest = fields
            .iter()
            .map(|field| self.key_nesting(&field.name, field.quoted))
            .max()
            .unwrap_or(0);
        check_nesting(depth + self.expanded + widest, number)?;
        let mut rows = Vec::new();

        while let Some(line) = self.peek() {
            if line.depth != depth || !is_row(line.content, delimiter) {
                break;
            }
            self.pos += 1;

            let cells = split_delimited(line.content, delimiter);
            if self.strict && cells.len() != fields.len() {
                return Err(ToonError::RowWidthMismatch {
                    line: line.number,
                    expected: fields.len(),
                    found: cells.len(),
                });
            }

            let mut row = Map::with_capacity(fields.len());
            for (i, field) in fields.iter().enumerate() {
                let value = match cells.get(i) {
                    Some(cell) => parse_primitive(cell, line.number)?,
                    None => Value::Null,
                };
                self.insert(&mut row, field.name.clone(), field.quoted, value, line.number)?;
            }
            rows.push(Value::Object(row));
        }

        self.check_length(header.len, rows.len(), number)?;
        Ok(Value::Array(rows))
    }

    fn list_items(&mut self, header: &Header, depth: usize, number: usize) -> ToonResult<Value> {
        let mut items = Vec::new();

        while let Some(line) = self.peek() {
            if line.depth != depth {
                break;
            }
            let body = if line.content == "-" {
                ""
            } else if let Some(body) = line.content.strip_prefix("- ") {
                body.trim_start_matches(' ')
            } else {
                break;
            };
            self.pos += 1;
            items.push(self.list_item(body, line.number, depth)?);
        }

        self.check_length(header.len, items.len(), number)?;
        Ok(Value::Array(items))
    }

    /// One `- ...` entry. Object items keep their first field on the hyphen line; that
    /// field's nested content sits two levels deeper, the other fields one level deeper.
    fn list_item(&mut self, body: &'a str, number: usize, depth: usize) -> ToonResult<Value> {
        if body.is_empty() {
            return Ok(Value::Object(Map::new()));
        }

        if body.starts_with('[') {
            if let Some(key_line) = parse_key_line(body, number)? {
                if let (true, Some(header)) = (key_line.key.is_empty(), &key_line.header) {
                    return self.array_body(header, key_line.rest, depth + 1, number);
                }
            }
        }

        if find_unquoted(body, ':').is_none() {
            return parse_primitive(body, number);
        }

        let key_line = parse_key_line(body, number)?.ok_or_else(|| ToonError::InvalidLine {
            line: number,
            content: body.to_string(),
        })?;
        let first = self.nested_value(&key_line, number, depth, depth + 2)?;

        let mut map = Map::new();
        self.insert(&mut map, key_line.key, key_line.quoted, first, number)?;
        self.parse_object_into(&mut map, depth + 1)?;
        Ok(Value::Object(map))
    }

    fn insert(
        &self,
        map: &mut Map<String, Value>,
        key: String,
        quoted: bool,
        value: Value,
        line: usize,
    ) -> ToonResult<()> {
        if self.expand_paths == PathExpansion::Off {
            map.insert(key, value);
            return Ok(());
        }

        let merged = match expandable_segments(&key).filter(|_| !quoted) {
            Some(segments) => insert_path(map, &segments, value, self.strict),
            None => merge_entry(map, &key, value, self.strict),
        };
        merged.map_err(|_| ToonError::PathConflict { line, path: key })
    }

    fn check_length(&self, expected: usize, found: usize, line: usize) -> ToonResult<()> {
        if self.strict && expected != found {
            return Err(ToonError::ArrayLengthMismatch {
                line,
                expected,
                found,
            });
        }
        Ok(())
    }
}
