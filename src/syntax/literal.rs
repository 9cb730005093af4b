//! Literal Model: typed literal values and their URL spelling.
//!
//! Every literal parses from its URL form and formats back to it; for
//! canonical input `format(parse(x)) == x`. Numbers are decimals, never
//! floats, so comparisons in a filter keep the precision the client sent;
//! the non-finite doubles `INF`, `-INF` and `NaN` get a variant of their own.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, SecondsFormat};
use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use crate::base::{Name, is_qualified_name};
use crate::edm::PrimitiveKind;

/// Errors produced while parsing a literal token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LiteralFormatError {
    #[error("invalid number literal '{0}'")]
    Number(String),

    #[error("literal '{text}' is out of range for {kind}")]
    OutOfRange { text: String, kind: PrimitiveKind },

    #[error("malformed string literal {0}")]
    String(String),

    #[error("invalid boolean literal '{0}'")]
    Boolean(String),

    #[error("invalid date literal '{0}'")]
    Date(String),

    #[error("invalid time-of-day literal '{0}'")]
    TimeOfDay(String),

    #[error("invalid date-time-offset literal '{0}'")]
    DateTimeOffset(String),

    #[error("invalid duration literal '{0}'")]
    Duration(String),

    #[error("invalid guid literal '{0}'")]
    Guid(String),

    #[error("invalid enum literal '{0}'")]
    Enum(String),

    #[error("invalid spatial literal '{0}'")]
    Geo(String),

    #[error("literals of type {0} are not supported")]
    UnsupportedKind(PrimitiveKind),
}

/// A typed literal value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Literal {
    Null,
    Boolean(bool),
    Number(Decimal),
    NonFinite(NonFinite),
    String(String),
    Date(NaiveDate),
    TimeOfDay(NaiveTime),
    DateTimeOffset(DateTime<FixedOffset>),
    Duration(Duration),
    Guid(Uuid),
    Enum(EnumLiteral),
    Geo(GeoLiteral),
}

impl Literal {
    /// Parse `raw` as a literal of the expected primitive kind.
    ///
    /// `null` is accepted for every kind.
    pub fn parse(raw: &str, kind: PrimitiveKind) -> Result<Self, LiteralFormatError> {
        if raw == "null" {
            return Ok(Self::Null);
        }
        if matches!(kind, PrimitiveKind::Double | PrimitiveKind::Single) {
            if let Some(value) = NonFinite::parse(raw) {
                return Ok(Self::NonFinite(value));
            }
        }
        match kind {
            PrimitiveKind::String => parse_string(raw).map(Self::String),
            PrimitiveKind::Boolean => parse_boolean(raw).map(Self::Boolean),
            PrimitiveKind::Date => parse_date(raw).map(Self::Date),
            PrimitiveKind::TimeOfDay => parse_time_of_day(raw).map(Self::TimeOfDay),
            PrimitiveKind::DateTimeOffset => parse_date_time_offset(raw).map(Self::DateTimeOffset),
            PrimitiveKind::Duration => {
                let body = raw.strip_prefix("duration").unwrap_or(raw);
                let text = parse_string(body).map_err(|_| LiteralFormatError::Duration(raw.into()))?;
                text.parse().map(Self::Duration)
            }
            PrimitiveKind::Guid => parse_guid(raw).map(Self::Guid),
            kind if kind.is_numeric() => {
                let value = parse_number(raw)?;
                check_numeric_range(raw, value, kind)?;
                Ok(Self::Number(value))
            }
            kind if kind.is_spatial() => {
                let geo = GeoLiteral::parse(raw)?;
                if geo.primitive_kind() == kind {
                    Ok(Self::Geo(geo))
                } else {
                    Err(LiteralFormatError::Geo(raw.into()))
                }
            }
            kind => Err(LiteralFormatError::UnsupportedKind(kind)),
        }
    }

    /// The primitive type a literal denotes on its own.
    ///
    /// `None` for `null` (fits anything) and enum members (typed by their enum).
    pub fn primitive_kind(&self) -> Option<PrimitiveKind> {
        Some(match self {
            Self::Null | Self::Enum(_) => return None,
            Self::Boolean(_) => PrimitiveKind::Boolean,
            Self::Number(n) => number_kind(*n),
            Self::NonFinite(_) => PrimitiveKind::Double,
            Self::String(_) => PrimitiveKind::String,
            Self::Date(_) => PrimitiveKind::Date,
            Self::TimeOfDay(_) => PrimitiveKind::TimeOfDay,
            Self::DateTimeOffset(_) => PrimitiveKind::DateTimeOffset,
            Self::Duration(_) => PrimitiveKind::Duration,
            Self::Guid(_) => PrimitiveKind::Guid,
            Self::Geo(geo) => geo.primitive_kind(),
        })
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::NonFinite(v) => write!(f, "{v}"),
            Self::String(s) => write!(f, "'{}'", s.replace('\'', "''")),
            Self::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Self::TimeOfDay(t) => write!(f, "{}", t.format("%H:%M:%S%.f")),
            Self::DateTimeOffset(dt) => {
                f.write_str(&dt.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
            Self::Duration(d) => write!(f, "duration'{d}'"),
            Self::Guid(g) => write!(f, "{g}"),
            Self::Enum(e) => write!(f, "{e}"),
            Self::Geo(g) => write!(f, "{g}"),
        }
    }
}

/// Floating-point values a decimal cannot hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NonFinite {
    Infinity,
    NegativeInfinity,
    NaN,
}

impl NonFinite {
    /// `INF`, `-INF` or `NaN`, case-sensitive.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "INF" => Some(Self::Infinity),
            "-INF" => Some(Self::NegativeInfinity),
            "NaN" => Some(Self::NaN),
            _ => None,
        }
    }

    pub fn as_f64(self) -> f64 {
        match self {
            Self::Infinity => f64::INFINITY,
            Self::NegativeInfinity => f64::NEG_INFINITY,
            Self::NaN => f64::NAN,
        }
    }
}

impl fmt::Display for NonFinite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Infinity => "INF",
            Self::NegativeInfinity => "-INF",
            Self::NaN => "NaN",
        })
    }
}

/// Smallest primitive kind holding `value`.
fn number_kind(value: Decimal) -> PrimitiveKind {
    if !value.fract().is_zero() || value.scale() > 0 {
        return PrimitiveKind::Decimal;
    }
    if i32::try_from(value).is_ok() {
        PrimitiveKind::Int32
    } else if i64::try_from(value).is_ok() {
        PrimitiveKind::Int64
    } else {
        PrimitiveKind::Decimal
    }
}

fn check_numeric_range(raw: &str, value: Decimal, kind: PrimitiveKind) -> Result<(), LiteralFormatError> {
    let out_of_range = || LiteralFormatError::OutOfRange {
        text: raw.into(),
        kind,
    };
    if !kind.is_integral() {
        return Ok(());
    }
    if !value.fract().is_zero() {
        return Err(out_of_range());
    }
    let fits = match kind {
        PrimitiveKind::Byte => u8::try_from(value).is_ok(),
        PrimitiveKind::SByte => i8::try_from(value).is_ok(),
        PrimitiveKind::Int16 => i16::try_from(value).is_ok(),
        PrimitiveKind::Int32 => i32::try_from(value).is_ok(),
        _ => i64::try_from(value).is_ok(),
    };
    if fits { Ok(()) } else { Err(out_of_range()) }
}

/// Parse a signed decimal number, with optional exponent.
pub fn parse_number(raw: &str) -> Result<Decimal, LiteralFormatError> {
    let err = || LiteralFormatError::Number(raw.into());
    let digits = raw.strip_prefix(['-', '+']).unwrap_or(raw);
    if digits.is_empty() || !digits.starts_with(|c: char| c.is_ascii_digit()) {
        return Err(err());
    }
    if raw.contains(['e', 'E']) {
        Decimal::from_scientific(raw).map_err(|_| err())
    } else {
        Decimal::from_str_exact(raw).map_err(|_| err())
    }
}

/// Parse a single-quoted string where `''` escapes an embedded quote.
pub fn parse_string(raw: &str) -> Result<String, LiteralFormatError> {
    let err = || LiteralFormatError::String(raw.into());
    let body = raw
        .strip_prefix('\'')
        .and_then(|rest| rest.strip_suffix('\''))
        .filter(|_| raw.len() >= 2)
        .ok_or_else(err)?;

    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c == '\'' {
            // A lone quote would have terminated the literal.
            if chars.next() != Some('\'') {
                return Err(err());
            }
        }
        out.push(c);
    }
    Ok(out)
}

pub fn parse_boolean(raw: &str) -> Result<bool, LiteralFormatError> {
    if raw.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if raw.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(LiteralFormatError::Boolean(raw.into()))
    }
}

pub fn parse_date(raw: &str) -> Result<NaiveDate, LiteralFormatError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| LiteralFormatError::Date(raw.into()))
}

pub fn parse_time_of_day(raw: &str) -> Result<NaiveTime, LiteralFormatError> {
    NaiveTime::parse_from_str(raw, "%H:%M:%S%.f")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .map_err(|_| LiteralFormatError::TimeOfDay(raw.into()))
}

/// Parse an RFC 3339 timestamp; seconds may be omitted.
pub fn parse_date_time_offset(raw: &str) -> Result<DateTime<FixedOffset>, LiteralFormatError> {
    DateTime::parse_from_rfc3339(raw)
        .or_else(|_| {
            let normalized = match raw.strip_suffix(['Z', 'z']) {
                Some(rest) => format!("{rest}+00:00"),
                None => raw.to_string(),
            };
            DateTime::parse_from_str(&normalized, "%Y-%m-%dT%H:%M%:z")
        })
        .map_err(|_| LiteralFormatError::DateTimeOffset(raw.into()))
}

pub fn parse_guid(raw: &str) -> Result<Uuid, LiteralFormatError> {
    // Only the hyphenated 8-4-4-4-12 form is a URL literal.
    if raw.len() != 36 {
        return Err(LiteralFormatError::Guid(raw.into()));
    }
    Uuid::parse_str(raw).map_err(|_| LiteralFormatError::Guid(raw.into()))
}

/// An ISO 8601 duration, keeping the components exactly as written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Duration {
    pub negative: bool,
    pub years: Option<u64>,
    pub months: Option<u64>,
    pub days: Option<u64>,
    pub hours: Option<u64>,
    pub minutes: Option<u64>,
    pub seconds: Option<Decimal>,
}

impl Duration {
    /// Total length in seconds, when the duration has no calendar components.
    ///
    /// `None` as well when the total does not fit a `u64` count of seconds.
    pub fn total_seconds(&self) -> Option<Decimal> {
        if self.years.is_some() || self.months.is_some() {
            return None;
        }
        let whole = [(self.days, 86_400), (self.hours, 3_600), (self.minutes, 60)]
            .into_iter()
            .try_fold(0u64, |acc, (part, unit)| {
                part.unwrap_or(0).checked_mul(unit)?.checked_add(acc)
            })?;
        let total = Decimal::from(whole).checked_add(self.seconds.unwrap_or_default())?;
        Some(if self.negative { -total } else { total })
    }
}

impl FromStr for Duration {
    type Err = LiteralFormatError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let err = || LiteralFormatError::Duration(text.into());
        let (negative, rest) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text),
        };
        let rest = rest.strip_prefix('P').ok_or_else(err)?;
        let (date_part, time_part) = match rest.split_once('T') {
            Some((date, time)) if !time.is_empty() => (date, Some(time)),
            Some(_) => return Err(err()),
            None => (rest, None),
        };

        let mut duration = Duration {
            negative,
            ..Duration::default()
        };
        let mut any = false;

        // Date designators, in order.
        let mut order = 0;
        for (number, designator) in components(date_part).ok_or_else(err)? {
            let slot = match designator {
                'Y' if order < 1 => &mut duration.years,
                'M' if order < 2 => &mut duration.months,
                'D' if order < 3 => &mut duration.days,
                _ => return Err(err()),
            };
            order = match designator {
                'Y' => 1,
                'M' => 2,
                _ => 3,
            };
            *slot = Some(number.parse().map_err(|_| err())?);
            any = true;
        }

        if let Some(time_part) = time_part {
            let mut order = 0;
            for (number, designator) in components(time_part).ok_or_else(err)? {
                match designator {
                    'H' if order < 1 => duration.hours = Some(number.parse().map_err(|_| err())?),
                    'M' if order < 2 => duration.minutes = Some(number.parse().map_err(|_| err())?),
                    'S' if order < 3 => {
                        duration.seconds = Some(Decimal::from_str_exact(number).map_err(|_| err())?)
                    }
                    _ => return Err(err()),
                }
                order = match designator {
                    'H' => 1,
                    'M' => 2,
                    _ => 3,
                };
                any = true;
            }
        }

        if any { Ok(duration) } else { Err(err()) }
    }
}

/// Split `1Y2M3D` into `[("1", 'Y'), ("2", 'M'), ("3", 'D')]`.
fn components(text: &str) -> Option<Vec<(&str, char)>> {
    let mut out = Vec::new();
    let mut start = 0;
    for (idx, c) in text.char_indices() {
        if c.is_ascii_digit() || c == '.' {
            continue;
        }
        let number = &text[start..idx];
        if number.is_empty() {
            return None;
        }
        out.push((number, c));
        start = idx + c.len_utf8();
    }
    if start != text.len() {
        return None;
    }
    Some(out)
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negative {
            f.write_str("-")?;
        }
        f.write_str("P")?;
        for (value, designator) in [(self.years, 'Y'), (self.months, 'M'), (self.days, 'D')] {
            if let Some(value) = value {
                write!(f, "{value}{designator}")?;
            }
        }
        if self.hours.is_some() || self.minutes.is_some() || self.seconds.is_some() {
            f.write_str("T")?;
            if let Some(h) = self.hours {
                write!(f, "{h}H")?;
            }
            if let Some(m) = self.minutes {
                write!(f, "{m}M")?;
            }
            if let Some(s) = self.seconds {
                write!(f, "{s}S")?;
            }
        }
        Ok(())
    }
}

/// `Namespace.EnumType'Member'`; flags enums list several members.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnumLiteral {
    pub type_name: Name,
    pub members: Vec<Name>,
}

impl EnumLiteral {
    pub fn parse(raw: &str) -> Result<Self, LiteralFormatError> {
        let err = || LiteralFormatError::Enum(raw.into());
        let quote = raw.find('\'').ok_or_else(err)?;
        let (type_name, quoted) = raw.split_at(quote);
        if !type_name.contains('.') || !is_qualified_name(type_name) {
            return Err(err());
        }
        let body = parse_string(quoted).map_err(|_| err())?;
        let members = body
            .split(',')
            .map(|m| m.trim())
            .map(|m| if m.is_empty() { Err(err()) } else { Ok(Name::new(m)) })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            type_name: Name::new(type_name),
            members,
        })
    }
}

impl fmt::Display for EnumLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}'{}'", self.type_name, self.members.join(","))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeoSpace {
    Geography,
    Geometry,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeoShape {
    Point,
    LineString,
    Polygon,
}

impl GeoShape {
    fn keyword(&self) -> &'static str {
        match self {
            Self::Point => "POINT",
            Self::LineString => "LINESTRING",
            Self::Polygon => "POLYGON",
        }
    }
}

/// `geography'SRID=4326;POINT(-122.1 47.6)'` and friends.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GeoLiteral {
    pub space: GeoSpace,
    pub srid: Option<u32>,
    pub shape: GeoShape,
    /// Coordinate text inside the outermost parentheses, as written.
    pub coordinates: String,
}

impl GeoLiteral {
    pub fn parse(raw: &str) -> Result<Self, LiteralFormatError> {
        let err = || LiteralFormatError::Geo(raw.into());
        let quote = raw.find('\'').ok_or_else(err)?;
        let (prefix, quoted) = raw.split_at(quote);
        let space = if prefix.eq_ignore_ascii_case("geography") {
            GeoSpace::Geography
        } else if prefix.eq_ignore_ascii_case("geometry") {
            GeoSpace::Geometry
        } else {
            return Err(err());
        };
        let body = parse_string(quoted).map_err(|_| err())?;

        let (srid, wkt) = match body.split_once(';') {
            Some((srid, wkt)) => {
                let value = srid
                    .trim()
                    .strip_prefix("SRID=")
                    .and_then(|v| v.parse().ok())
                    .ok_or_else(err)?;
                (Some(value), wkt.trim())
            }
            None => (None, body.trim()),
        };

        let open = wkt.find('(').ok_or_else(err)?;
        let keyword = wkt[..open].trim();
        let shape = [GeoShape::Point, GeoShape::LineString, GeoShape::Polygon]
            .into_iter()
            .find(|s| keyword.eq_ignore_ascii_case(s.keyword()))
            .ok_or_else(err)?;
        let coordinates = wkt[open..]
            .strip_prefix('(')
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(err)?;

        let valid = match shape {
            GeoShape::Point => point(coordinates),
            GeoShape::LineString => ring(coordinates, 2),
            GeoShape::Polygon => polygon(coordinates),
        };
        if !valid {
            return Err(err());
        }

        Ok(Self {
            space,
            srid,
            shape,
            coordinates: coordinates.trim().to_string(),
        })
    }

    pub fn primitive_kind(&self) -> PrimitiveKind {
        match (self.space, self.shape) {
            (GeoSpace::Geography, GeoShape::Point) => PrimitiveKind::GeographyPoint,
            (GeoSpace::Geography, GeoShape::LineString) => PrimitiveKind::GeographyLineString,
            (GeoSpace::Geography, GeoShape::Polygon) => PrimitiveKind::GeographyPolygon,
            (GeoSpace::Geometry, GeoShape::Point) => PrimitiveKind::GeometryPoint,
            (GeoSpace::Geometry, GeoShape::LineString) => PrimitiveKind::GeometryLineString,
            (GeoSpace::Geometry, GeoShape::Polygon) => PrimitiveKind::GeometryPolygon,
        }
    }
}

fn point(text: &str) -> bool {
    let coords: Vec<_> = text.split_whitespace().collect();
    (2..=4).contains(&coords.len()) && coords.iter().all(|c| c.parse::<f64>().is_ok())
}

fn ring(text: &str, min_points: usize) -> bool {
    let points: Vec<_> = text.split(',').collect();
    points.len() >= min_points && points.iter().all(|p| point(p))
}

fn polygon(text: &str) -> bool {
    let text = text.trim();
    let Some(inner) = text.strip_prefix('(').and_then(|t| t.strip_suffix(')')) else {
        return false;
    };
    inner
        .split("),")
        .map(|r| r.trim().trim_start_matches('(').trim_end_matches(')'))
        .all(|r| ring(r, 4))
}

impl fmt::Display for GeoLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match self.space {
            GeoSpace::Geography => "geography",
            GeoSpace::Geometry => "geometry",
        };
        write!(f, "{prefix}'")?;
        if let Some(srid) = self.srid {
            write!(f, "SRID={srid};")?;
        }
        write!(f, "{}({})'", self.shape.keyword(), self.coordinates)
    }
}
