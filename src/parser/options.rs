//! Decoded query string pairs to [`QueryOption`]s.

use rustc_hash::FxHashSet;
use tracing::trace;

use super::errors::{ErrorCode, ParseContext, SyntaxError};
use super::grammar;
use super::run;
use crate::base::constants::{
    COUNT, EXPAND, FILTER, FORMAT, ID, ORDERBY, SELECT, SKIP, SKIPTOKEN, SYSTEM_QUERY_OPTIONS, TOP,
};
use crate::config::ParserConfig;
use crate::error::Error;
use crate::syntax::{Format, QueryOption};

/// Parse query string pairs in order.
///
/// System options may appear once each; unknown `$`-prefixed names are
/// rejected, other names pass through as [`QueryOption::Custom`].
pub fn parse_query_options(
    pairs: &[(String, String)],
    config: &ParserConfig,
) -> Result<Vec<QueryOption>, Error> {
    let mut seen = FxHashSet::default();
    let mut options = Vec::with_capacity(pairs.len());

    for (name, value) in pairs {
        let Some(system) = system_option(name, config) else {
            if name.starts_with('$') {
                return Err(SyntaxError::for_input(
                    ErrorCode::E0501,
                    format!("unknown system query option '{name}'"),
                    name,
                )
                .into());
            }
            options.push(QueryOption::Custom {
                name: name.clone(),
                value: value.clone(),
            });
            continue;
        };

        if !seen.insert(system) {
            return Err(SyntaxError::for_input(
                ErrorCode::E0502,
                format!("'{system}' given more than once"),
                name,
            )
            .into());
        }
        trace!(option = system, value = %value, "parsing query option");
        options.push(parse_system_option(system, value, config)?);
    }
    Ok(options)
}

/// Canonical name of a system option, honoring the case and `$`-prefix rules.
fn system_option(name: &str, config: &ParserConfig) -> Option<&'static str> {
    let find = |written: &str| {
        SYSTEM_QUERY_OPTIONS
            .iter()
            .copied()
            .find(|option| config.option_name_eq(written, option))
    };
    if name.starts_with('$') {
        find(name)
    } else if config.optional_dollar_prefix {
        find(&format!("${name}"))
    } else {
        None
    }
}

fn parse_system_option(name: &'static str, value: &str, config: &ParserConfig) -> Result<QueryOption, Error> {
    if value.is_empty() {
        return Err(SyntaxError::for_input(ErrorCode::E0503, format!("{name} requires a value"), value).into());
    }
    let option = match name {
        FILTER => QueryOption::Filter(
            run(value, config, grammar::parse_expression).map_err(|e| e.in_context(ParseContext::Filter))?,
        ),
        EXPAND => QueryOption::Expand(
            run(value, config, grammar::parse_expand_items).map_err(|e| e.in_context(ParseContext::Expand))?,
        ),
        SELECT => QueryOption::Select(
            run(value, config, grammar::parse_select_items).map_err(|e| e.in_context(ParseContext::Select))?,
        ),
        ORDERBY => QueryOption::OrderBy(
            run(value, config, grammar::parse_orderby_items).map_err(|e| e.in_context(ParseContext::OrderBy))?,
        ),
        TOP => QueryOption::Top(parse_non_negative(name, value)?),
        SKIP => QueryOption::Skip(parse_non_negative(name, value)?),
        COUNT => QueryOption::Count(match value {
            "true" => true,
            "false" => false,
            _ => {
                return Err(SyntaxError::for_input(
                    ErrorCode::E0503,
                    format!("$count expects true or false, found '{value}'"),
                    value,
                )
                .into());
            }
        }),
        FORMAT => QueryOption::Format(parse_format(value, config)?),
        ID => QueryOption::Id(value.to_string()),
        SKIPTOKEN => QueryOption::SkipToken(value.to_string()),
        other => {
            return Err(SyntaxError::for_input(
                ErrorCode::E0501,
                format!("unsupported system query option '{other}'"),
                value,
            )
            .into());
        }
    };
    Ok(option)
}

fn parse_non_negative(name: &str, value: &str) -> Result<u64, SyntaxError> {
    value.parse::<u64>().map_err(|_| {
        SyntaxError::for_input(
            ErrorCode::E0503,
            format!("{name} expects a non-negative integer, found '{value}'"),
            value,
        )
    })
}

/// Match a `$format` value against the supported formats.
///
/// Parameters after `;` are ignored for matching and kept in the result.
pub fn parse_format(value: &str, config: &ParserConfig) -> Result<Format, Error> {
    let (base, parameters) = match value.split_once(';') {
        Some((base, parameters)) => (base.trim(), Some(parameters.trim().to_string())),
        None => (value.trim(), None),
    };
    let format = config.find_format(base).ok_or_else(|| Error::UnsupportedFormat {
        requested: value.to_string(),
        supported: config.format_aliases(),
    })?;
    Ok(Format {
        requested: value.to_string(),
        media_type: format.media_type.clone(),
        parameters,
    })
}
