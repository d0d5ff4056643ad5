use chrono::NaiveDate;

use crate::error::TemplateError;
use crate::meta::FieldMap;

const DEFAULT_SHORTEN: usize = 32;
const DEFAULT_DUP_CHARS: &str = "-_.";

pub fn call(name: &str, args: &[String], fields: &FieldMap) -> Result<String, TemplateError> {
    let arity = |min: usize, max: usize| -> Result<(), TemplateError> {
        if args.len() < min || args.len() > max {
            Err(bad(name, format!("expected {min} to {max} arguments, got {}", args.len())))
        } else {
            Ok(())
        }
    };
    let arg = |i: usize| args.get(i).map(String::as_str).unwrap_or_default();

    match name {
        "lower" => {
            arity(1, 1)?;
            Ok(arg(0).to_lowercase())
        }
        "upper" => {
            arity(1, 1)?;
            Ok(arg(0).to_uppercase())
        }
        "title" => {
            arity(1, 1)?;
            Ok(title_case(arg(0)))
        }
        "initial" => {
            arity(1, 1)?;
            Ok(arg(0)
                .trim()
                .chars()
                .next()
                .map(|c| c.to_lowercase().collect())
                .unwrap_or_default())
        }
        "left" => {
            arity(2, 2)?;
            let n = number(name, arg(1))?;
            Ok(arg(0).chars().take(n).collect())
        }
        "right" => {
            arity(2, 2)?;
            let n = number(name, arg(1))?;
            let len = arg(0).chars().count();
            Ok(arg(0).chars().skip(len.saturating_sub(n)).collect())
        }
        "shorten" => {
            arity(1, 2)?;
            let max = if args.len() > 1 {
                number(name, arg(1))?
            } else {
                DEFAULT_SHORTEN
            };
            Ok(shorten(arg(0), max))
        }
        "if" => {
            arity(2, 3)?;
            Ok(if truthy(arg(0)) { arg(1) } else { arg(2) }.to_string())
        }
        "ifdef" | "ifdefnotempty" => {
            arity(1, 3)?;
            let defined = fields.get(arg(0).trim()).is_some_and(|v| !v.is_empty());
            Ok(if defined { arg(1) } else { arg(2) }.to_string())
        }
        "ifdefempty" => {
            arity(1, 3)?;
            let empty = fields.get(arg(0).trim()).is_none_or(|v| v.is_empty());
            Ok(if empty { arg(1) } else { arg(2) }.to_string())
        }
        "delchars" => {
            arity(2, 2)?;
            Ok(arg(0).chars().filter(|c| !arg(1).contains(*c)).collect())
        }
        "replchars" => {
            arity(3, 3)?;
            let mut out = String::new();
            for c in arg(0).chars() {
                if arg(1).contains(c) {
                    out.push_str(arg(2));
                } else {
                    out.push(c);
                }
            }
            Ok(out)
        }
        "deldupchars" => {
            arity(1, 2)?;
            let set = if args.len() > 1 { arg(1) } else { DEFAULT_DUP_CHARS };
            Ok(dedup_chars(arg(0), set))
        }
        "asciify" => {
            arity(1, 1)?;
            Ok(any_ascii::any_ascii(arg(0)))
        }
        "time" => {
            arity(2, 3)?;
            let current = if args.len() > 2 { arg(2) } else { "%Y-%m-%d" };
            Ok(match NaiveDate::parse_from_str(arg(0).trim(), current) {
                Ok(date) => date.format(arg(1)).to_string(),
                Err(_) => arg(0).to_string(),
            })
        }
        "first" => {
            arity(1, 5)?;
            let count = if args.len() > 1 { number(name, arg(1))? } else { 1 };
            let skip = if args.len() > 2 { number(name, arg(2))? } else { 0 };
            let sep = if args.len() > 3 { arg(3) } else { "; " };
            let join = if args.len() > 4 { arg(4) } else { "; " };
            Ok(arg(0)
                .split(sep)
                .map(str::trim)
                .skip(skip)
                .take(count)
                .collect::<Vec<_>>()
                .join(join))
        }
        "num" => {
            arity(1, 2)?;
            let width = if args.len() > 1 { number(name, arg(1))? } else { 2 };
            let n = number(name, arg(0))?;
            Ok(format!("{n:0width$}"))
        }
        other => Err(TemplateError::UnknownFunction(other.to_string())),
    }
}

fn bad(name: &str, message: String) -> TemplateError {
    TemplateError::BadArguments {
        name: name.to_string(),
        message,
    }
}

fn number(name: &str, value: &str) -> Result<usize, TemplateError> {
    value
        .trim()
        .parse()
        .map_err(|_| bad(name, format!("'{value}' is not a number")))
}

fn truthy(value: &str) -> bool {
    let v = value.trim();
    !(v.is_empty() || v == "0" || v.eq_ignore_ascii_case("false"))
}

fn title_case(value: &str) -> String {
    value
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Cut at the last word boundary within `max` characters.
pub fn shorten(value: &str, max: usize) -> String {
    let value = value.trim();
    if value.chars().count() <= max {
        return value.to_string();
    }
    let cut: String = value.chars().take(max).collect();
    let next_is_boundary = value.chars().nth(max).is_some_and(char::is_whitespace);
    if next_is_boundary {
        return cut.trim_end().to_string();
    }
    match cut.rfind(' ') {
        Some(i) if i > 0 => cut[..i].trim_end().to_string(),
        _ => cut,
    }
}

fn dedup_chars(value: &str, set: &str) -> String {
    let mut out = String::new();
    let mut last: Option<char> = None;
    for c in value.chars() {
        if last == Some(c) && set.contains(c) {
            continue;
        }
        out.push(c);
        last = Some(c);
    }
    out
}
