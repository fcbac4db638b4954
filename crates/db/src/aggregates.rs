//! Exact decimal aggregates registered on every connection.
//!
//! SQLite's builtin `SUM`/`AVG` go through `REAL`, which would round monetary
//! amounts. `decimal_sum` and `decimal_avg` fold the stored decimal text with
//! `rust_decimal` inside the query engine, so grouped cost queries stay
//! set-based and exact.

use std::str::FromStr;

use rust_decimal::Decimal;
use rusqlite::functions::{Aggregate, Context, FunctionFlags};
use rusqlite::types::ValueRef;
use rusqlite::{Connection, Error};

pub(crate) const DECIMAL_SUM: &str = "decimal_sum";
pub(crate) const DECIMAL_AVG: &str = "decimal_avg";

pub(crate) fn register(conn: &Connection) -> rusqlite::Result<()> {
    let flags = FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC;
    conn.create_aggregate_function(DECIMAL_SUM, 1, flags, DecimalSum)?;
    conn.create_aggregate_function(DECIMAL_AVG, 1, flags, DecimalAvg)?;
    Ok(())
}

struct DecimalSum;

impl Aggregate<Option<Decimal>, Option<String>> for DecimalSum {
    fn init(&self, _: &mut Context<'_>) -> rusqlite::Result<Option<Decimal>> {
        Ok(None)
    }

    fn step(&self, ctx: &mut Context<'_>, acc: &mut Option<Decimal>) -> rusqlite::Result<()> {
        let Some(value) = decimal_arg(ctx)? else {
            return Ok(());
        };
        let sum = match *acc {
            Some(current) => current.checked_add(value).ok_or_else(overflow)?,
            None => value,
        };
        *acc = Some(sum);
        Ok(())
    }

    fn finalize(
        &self,
        _: &mut Context<'_>,
        acc: Option<Option<Decimal>>,
    ) -> rusqlite::Result<Option<String>> {
        Ok(acc.flatten().map(|sum| sum.to_string()))
    }
}

#[derive(Default)]
struct Mean {
    sum: Decimal,
    count: u64,
}

struct DecimalAvg;

impl Aggregate<Mean, Option<String>> for DecimalAvg {
    fn init(&self, _: &mut Context<'_>) -> rusqlite::Result<Mean> {
        Ok(Mean::default())
    }

    fn step(&self, ctx: &mut Context<'_>, acc: &mut Mean) -> rusqlite::Result<()> {
        let Some(value) = decimal_arg(ctx)? else {
            return Ok(());
        };
        acc.sum = acc.sum.checked_add(value).ok_or_else(overflow)?;
        acc.count += 1;
        Ok(())
    }

    fn finalize(&self, _: &mut Context<'_>, acc: Option<Mean>) -> rusqlite::Result<Option<String>> {
        let Some(mean) = acc.filter(|mean| mean.count > 0) else {
            return Ok(None);
        };
        let value = mean
            .sum
            .checked_div(Decimal::from(mean.count))
            .ok_or_else(overflow)?;
        Ok(Some(value.to_string()))
    }
}

fn decimal_arg(ctx: &Context<'_>) -> rusqlite::Result<Option<Decimal>> {
    match ctx.get_raw(0) {
        ValueRef::Null => Ok(None),
        ValueRef::Integer(value) => Ok(Some(Decimal::from(value))),
        ValueRef::Real(value) => Decimal::try_from(value)
            .map(Some)
            .map_err(|err| Error::UserFunctionError(Box::new(err))),
        ValueRef::Text(bytes) => {
            let text = std::str::from_utf8(bytes)
                .map_err(|err| Error::UserFunctionError(Box::new(err)))?;
            parse_decimal(text.trim())
                .map(Some)
                .map_err(|err| Error::UserFunctionError(Box::new(err)))
        }
        ValueRef::Blob(_) => Err(Error::UserFunctionError(
            "decimal aggregate does not accept blobs".into(),
        )),
    }
}

/// Parses stored amount text, accepting plain and scientific notation.
pub(crate) fn parse_decimal(text: &str) -> std::result::Result<Decimal, rust_decimal::Error> {
    Decimal::from_str_exact(text)
        .or_else(|_| Decimal::from_str(text))
        .or_else(|_| Decimal::from_scientific(text))
}

fn overflow() -> Error {
    Error::UserFunctionError("decimal aggregate overflow".into())
}
