use anyhow::{Error, Result};
use pest::Parser;
use pest::iterators::Pair;
use pest_derive::Parser;
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display, Formatter};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Unit {
    Ohm,
    Farad,
    Henry,
    Volt,
    Ampere,
}

impl Unit {
    pub fn symbol(&self) -> &'static str {
        match self {
            Unit::Ohm => "Ω",
            Unit::Farad => "F",
            Unit::Henry => "H",
            Unit::Volt => "V",
            Unit::Ampere => "A",
        }
    }
}

#[derive(Clone, Copy, PartialEq)]
pub struct Quantity {
    pub value: f64,
    pub unit: Unit,
}

const SPICE_SCALES: [(f64, &str); 10] = [
    (1e12, "T"),
    (1e9, "G"),
    (1e6, "Meg"),
    (1e3, "k"),
    (1.0, ""),
    (1e-3, "m"),
    (1e-6, "u"),
    (1e-9, "n"),
    (1e-12, "p"),
    (1e-15, "f"),
];

impl Quantity {
    pub fn new(value: f64, unit: Unit) -> Self {
        Self { value, unit }
    }

    /// Value in SPICE engineering notation, without unit: 10k, 100n, 4.7u, 1Meg.
    pub fn to_spice(&self) -> String {
        if self.value == 0.0 {
            return "0".to_string();
        }
        let magnitude = self.value.abs();
        let (scale, suffix) = SPICE_SCALES
            .iter()
            .copied()
            .find(|(scale, _)| magnitude >= scale * (1.0 - 1e-9))
            .unwrap_or(SPICE_SCALES[SPICE_SCALES.len() - 1]);
        let mut digits = format!("{:.6}", self.value / scale);
        if digits.contains('.') {
            let trimmed = digits.trim_end_matches('0').trim_end_matches('.').len();
            digits.truncate(trimmed);
        }
        format!("{digits}{suffix}")
    }
}

impl Debug for Quantity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.to_spice(), self.unit.symbol())
    }
}

impl Display for Quantity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum ValueParseWarning {
    RedundantSpace,
    SmallR,
    BigRInsteadOfOhmSymbol,
}

#[derive(Parser)]
#[grammar = "grammar/passive_value.pest"]
struct PassiveValueParser;

/// Parses a component value such as `4k7`, `10 kΩ`, `2.2nF` or `-12V`.
///
/// The unit symbol is optional, but when present it has to match `expected`.
pub fn parse_value(value: &str, expected: Unit) -> Result<(Quantity, Option<ValueParseWarning>)> {
    let mut pairs = match PassiveValueParser::parse(Rule::value, value) {
        Ok(pairs) => pairs,
        Err(e) => return Err(Error::msg(format!("{e}"))),
    };
    let Some(value) = pairs.next() else {
        return Err(Error::msg("Empty value"));
    };
    let mut negative = false;
    let mut number = None;
    for pair in value.into_inner() {
        match pair.as_rule() {
            Rule::sign => negative = pair.as_str() == "-",
            Rule::letter_delimited | Rule::dot_delimited | Rule::not_delimited => {
                number = Some(parse_number(pair)?);
            }
            _ => {}
        }
    }
    let Some(number) = number else {
        return Err(Error::msg("Invalid rule"));
    };

    if let Some(unit) = number.unit {
        if unit != expected {
            return Err(Error::msg(format!(
                "Expected a value in {}, found {}",
                expected.symbol(),
                unit.symbol()
            )));
        }
    }

    let text = format!(
        "{}.{}e{}",
        number.integer,
        number.fractional.unwrap_or("0"),
        number.exponent
    );
    let mut v: f64 = text.parse()?;
    if !v.is_finite() {
        return Err(Error::msg("Value out of range"));
    }
    if negative {
        v = -v;
    }
    Ok((Quantity::new(v, expected), number.warning))
}

struct Number<'a> {
    integer: &'a str,
    fractional: Option<&'a str>,
    exponent: i32,
    unit: Option<Unit>,
    warning: Option<ValueParseWarning>,
}

impl Number<'_> {
    fn shift(&mut self, exponent: i32) -> Result<()> {
        self.exponent = self
            .exponent
            .checked_add(exponent)
            .ok_or_else(|| Error::msg("Exponent out of range"))?;
        Ok(())
    }
}

fn parse_number(pair: Pair<'_, Rule>) -> Result<Number<'_>> {
    let mut number = Number {
        integer: "0",
        fractional: None,
        exponent: 0,
        unit: None,
        warning: None,
    };
    for p in pair.into_inner() {
        match p.as_rule() {
            Rule::integer => number.integer = p.as_str(),
            Rule::fractional => number.fractional = Some(p.as_str()),
            Rule::exponent => {
                for e in p.into_inner() {
                    number.shift(e.as_str().parse::<i32>()?)?;
                }
            }
            Rule::delimiter => {
                let Some(d) = p.into_inner().next() else {
                    return Err(Error::msg("Invalid rule"));
                };
                match d.as_rule() {
                    Rule::prefix => number.shift(parse_prefix(d)?)?,
                    Rule::r => {
                        if d.as_str() == "r" {
                            number.warning = Some(ValueParseWarning::SmallR);
                        }
                        number.unit = Some(Unit::Ohm);
                    }
                    _ => return Err(Error::msg("Invalid rule")),
                }
            }
            Rule::unit => {
                let (unit, w) = parse_unit(p, false)?;
                number.unit = Some(unit);
                if w.is_some() {
                    number.warning = w;
                }
            }
            Rule::suffix => {
                let mut after_prefix = false;
                for s in p.into_inner() {
                    match s.as_rule() {
                        Rule::space => {
                            if s.as_str().len() > 1 {
                                number.warning = Some(ValueParseWarning::RedundantSpace);
                            }
                        }
                        Rule::prefix => {
                            number.shift(parse_prefix(s)?)?;
                            after_prefix = true;
                        }
                        Rule::unit => {
                            let (unit, w) = parse_unit(s, after_prefix)?;
                            number.unit = Some(unit);
                            if w.is_some() {
                                number.warning = w;
                            }
                        }
                        _ => {}
                    }
                }
            }
            _ => {}
        }
    }
    Ok(number)
}

fn parse_prefix(pair: Pair<'_, Rule>) -> Result<i32> {
    let Some(prefix) = pair.into_inner().next() else {
        return Err(Error::msg("Invalid rule"));
    };
    match prefix.as_rule() {
        Rule::femto => Ok(-15),
        Rule::pico => Ok(-12),
        Rule::nano => Ok(-9),
        Rule::micro => Ok(-6),
        Rule::milli => Ok(-3),
        Rule::kilo => Ok(3),
        Rule::mega => Ok(6),
        Rule::giga => Ok(9),
        Rule::tera => Ok(12),
        _ => Err(Error::msg("Invalid rule")),
    }
}

fn parse_unit(
    pair: Pair<'_, Rule>,
    after_prefix: bool,
) -> Result<(Unit, Option<ValueParseWarning>)> {
    let Some(unit) = pair.into_inner().next() else {
        return Err(Error::msg("Invalid rule"));
    };
    match unit.as_rule() {
        Rule::ohm => match unit.as_str() {
            "r" => Ok((Unit::Ohm, Some(ValueParseWarning::SmallR))),
            "R" if after_prefix => Ok((
                Unit::Ohm,
                Some(ValueParseWarning::BigRInsteadOfOhmSymbol),
            )),
            _ => Ok((Unit::Ohm, None)),
        },
        Rule::farad => Ok((Unit::Farad, None)),
        Rule::henry => Ok((Unit::Henry, None)),
        Rule::volt => Ok((Unit::Volt, None)),
        Rule::ampere => Ok((Unit::Ampere, None)),
        _ => Err(Error::msg("Invalid rule")),
    }
}
