use super::connection::{Connection, Connector};
use crate::config::RunConfig;
use crate::core::{CqlError, Row, Value};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use scylla::client::execution_profile::ExecutionProfile;
use scylla::client::session::Session;
use scylla::client::session_builder::SessionBuilder;
use scylla::value::{CqlDate, CqlDecimal, CqlTime, CqlTimestamp, CqlValue, CqlVarint, Row as CqlRow};
use std::time::Duration;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Days from 0001-01-01 (CE) to 1970-01-01.
const UNIX_EPOCH_DAYS_FROM_CE: i64 = 719_163;
/// CQL `date` values are unsigned days with the epoch at 2^31.
const CQL_DATE_EPOCH: i64 = 1 << 31;
const NANOS_PER_SECOND: i64 = 1_000_000_000;

/// Connects to a Cassandra/ScyllaDB node over the CQL native protocol.
#[derive(Debug, Clone)]
pub struct ScyllaConnector {
    node: String,
    username: String,
    password: String,
    timeout: Duration,
}

impl ScyllaConnector {
    pub fn new(config: &RunConfig) -> Self {
        Self {
            node: format!("{}:{}", config.host, config.port),
            username: config.username.clone(),
            password: config.password.clone(),
            timeout: config.timeout,
        }
    }

    pub fn node(&self) -> &str {
        &self.node
    }
}

#[async_trait]
impl Connector for ScyllaConnector {
    type Connection = ScyllaConnection;

    async fn connect(&self) -> Result<ScyllaConnection, CqlError> {
        info!(node = %self.node, user = %self.username, "connecting to cluster");

        let profile = ExecutionProfile::builder()
            .request_timeout(Some(self.timeout))
            .build()
            .into_handle();

        let session = SessionBuilder::new()
            .known_node(&self.node)
            .user(self.username.as_str(), self.password.as_str())
            .connection_timeout(self.timeout)
            .default_execution_profile_handle(profile)
            .build()
            .await
            .map_err(|e| CqlError::Connection(e.to_string()))?;

        Ok(ScyllaConnection { session })
    }
}

/// Owns the driver session; dropping it closes every underlying connection.
pub struct ScyllaConnection {
    session: Session,
}

#[async_trait]
impl Connection for ScyllaConnection {
    async fn bind_keyspace(&mut self, keyspace: &str) -> Result<(), CqlError> {
        debug!(keyspace, "binding session to keyspace");
        self.session
            .use_keyspace(keyspace, false)
            .await
            .map_err(|e| CqlError::Connection(format!("cannot use keyspace '{keyspace}': {e}")))
    }

    async fn execute_query(&mut self, statement: &str) -> Result<Vec<Row>, CqlError> {
        let result = self
            .session
            .query_unpaged(statement, ())
            .await
            .map_err(|e| CqlError::Execution(e.to_string()))?;
        let rows_result = result
            .into_rows_result()
            .map_err(|e| CqlError::Execution(e.to_string()))?;

        let names: Vec<String> = rows_result
            .column_specs()
            .iter()
            .map(|spec| spec.name().to_string())
            .collect();

        let mut rows = Vec::new();
        for row in rows_result
            .rows::<CqlRow>()
            .map_err(|e| CqlError::Execution(e.to_string()))?
        {
            let row = row.map_err(|e| CqlError::Execution(e.to_string()))?;
            let values = row
                .columns
                .into_iter()
                .map(|column| column.map_or(Value::Null, convert_value))
                .collect::<Vec<_>>();
            rows.push(names.iter().cloned().zip(values).collect());
        }

        debug!(rows = rows.len(), "query returned");
        Ok(rows)
    }

    async fn execute_command(&mut self, statement: &str) -> Result<(), CqlError> {
        self.session
            .query_unpaged(statement, ())
            .await
            .map(|_| ())
            .map_err(|e| CqlError::Execution(e.to_string()))
    }
}

/// Converts a driver value into the client's own value model.
pub fn convert_value(value: CqlValue) -> Value {
    match value {
        CqlValue::Ascii(s) | CqlValue::Text(s) => Value::Text(s),
        CqlValue::Boolean(b) => Value::Boolean(b),
        CqlValue::Blob(b) => Value::Blob(b),
        CqlValue::Counter(c) => Value::Integer(c.0),
        CqlValue::Decimal(d) => convert_decimal(&d),
        CqlValue::Varint(v) => convert_varint(&v),
        CqlValue::Double(d) => Value::Double(d),
        CqlValue::Float(f) => Value::Double(f64::from(f)),
        CqlValue::TinyInt(i) => Value::Integer(i64::from(i)),
        CqlValue::SmallInt(i) => Value::Integer(i64::from(i)),
        CqlValue::Int(i) => Value::Integer(i64::from(i)),
        CqlValue::BigInt(i) => Value::Integer(i),
        CqlValue::Empty => Value::Null,
        CqlValue::Uuid(u) => Value::Uuid(u),
        CqlValue::Timeuuid(u) => Value::Uuid(Uuid::from(u)),
        CqlValue::Inet(ip) => Value::Inet(ip),
        CqlValue::Timestamp(CqlTimestamp(millis)) => convert_timestamp(millis),
        CqlValue::Date(CqlDate(days)) => convert_date(days),
        CqlValue::Time(CqlTime(nanos)) => convert_time(nanos),
        CqlValue::Duration(d) => Value::Duration {
            months: d.months,
            days: d.days,
            nanoseconds: d.nanoseconds,
        },
        CqlValue::List(items) | CqlValue::Set(items) | CqlValue::Vector(items) => {
            Value::List(items.into_iter().map(convert_value).collect())
        }
        CqlValue::Map(entries) => Value::Map(
            entries
                .into_iter()
                .map(|(k, v)| (convert_value(k), convert_value(v)))
                .collect(),
        ),
        CqlValue::Tuple(items) => Value::Tuple(
            items
                .into_iter()
                .map(|item| item.map_or(Value::Null, convert_value))
                .collect(),
        ),
        CqlValue::UserDefinedType { fields, .. } => Value::Udt(
            fields
                .into_iter()
                .map(|(name, v)| (name, v.map_or(Value::Null, convert_value)))
                .collect(),
        ),
        other => Value::Text(format!("{other:?}")),
    }
}

fn convert_timestamp(millis: i64) -> Value {
    DateTime::from_timestamp_millis(millis).map_or_else(
        || {
            warn!(millis, "timestamp outside the calendar range, printing raw value");
            Value::Integer(millis)
        },
        Value::Timestamp,
    )
}

fn convert_date(raw: u32) -> Value {
    let days = i64::from(raw) - CQL_DATE_EPOCH;
    i32::try_from(days + UNIX_EPOCH_DAYS_FROM_CE)
        .ok()
        .and_then(NaiveDate::from_num_days_from_ce_opt)
        .map_or_else(
            || {
                warn!(days, "date outside the calendar range, printing raw value");
                Value::Integer(days)
            },
            Value::Date,
        )
}

fn convert_time(nanos: i64) -> Value {
    let secs = u32::try_from(nanos.div_euclid(NANOS_PER_SECOND)).ok();
    let frac = u32::try_from(nanos.rem_euclid(NANOS_PER_SECOND)).ok();
    secs.zip(frac)
        .and_then(|(secs, frac)| NaiveTime::from_num_seconds_from_midnight_opt(secs, frac))
        .map_or_else(
            || {
                warn!(nanos, "time of day out of range, printing raw value");
                Value::Integer(nanos)
            },
            Value::Time,
        )
}

fn convert_varint(varint: &CqlVarint) -> Value {
    let bytes = varint.as_signed_bytes_be_slice();
    signed_be_to_i128(bytes).map_or_else(
        || Value::BigNumber(signed_be_to_decimal_string(bytes)),
        Value::Varint,
    )
}

fn convert_decimal(decimal: &CqlDecimal) -> Value {
    let (bytes, scale) = decimal.as_signed_be_bytes_slice_and_exponent();
    signed_be_to_i128(bytes)
        .and_then(|unscaled| decimal_from_parts(unscaled, scale))
        .map_or_else(
            || Value::BigNumber(decimal_text(&signed_be_to_decimal_string(bytes), scale)),
            Value::Decimal,
        )
}

/// Builds `unscaled * 10^-scale`; a negative scale multiplies the mantissa.
fn decimal_from_parts(unscaled: i128, scale: i32) -> Option<Decimal> {
    if scale >= 0 {
        Decimal::try_from_i128_with_scale(unscaled, u32::try_from(scale).ok()?).ok()
    } else {
        let factor = 10_i128.checked_pow(scale.unsigned_abs())?;
        Decimal::try_from_i128_with_scale(unscaled.checked_mul(factor)?, 0).ok()
    }
}

/// Two's-complement big-endian bytes to `i128`; `None` if wider than 16 bytes.
fn signed_be_to_i128(bytes: &[u8]) -> Option<i128> {
    if bytes.len() > 16 {
        return None;
    }
    let fill = if bytes.first().is_some_and(|b| b & 0x80 != 0) { 0xff } else { 0x00 };
    let mut buf = [fill; 16];
    buf[16 - bytes.len()..].copy_from_slice(bytes);
    Some(i128::from_be_bytes(buf))
}

/// Two's-complement big-endian bytes of any width to base-10 text.
fn signed_be_to_decimal_string(bytes: &[u8]) -> String {
    let negative = bytes.first().is_some_and(|b| b & 0x80 != 0);
    let mut magnitude = bytes.to_vec();
    if negative {
        for b in &mut magnitude {
            *b = !*b;
        }
        for b in magnitude.iter_mut().rev() {
            let (sum, carry) = b.overflowing_add(1);
            *b = sum;
            if !carry {
                break;
            }
        }
    }

    let mut digits = Vec::new();
    while magnitude.iter().any(|&b| b != 0) {
        let mut rem = 0_u32;
        for b in &mut magnitude {
            let acc = (rem << 8) | u32::from(*b);
            *b = u8::try_from(acc / 10).unwrap_or(u8::MAX);
            rem = acc % 10;
        }
        digits.push(char::from_digit(rem, 10).unwrap_or('0'));
    }
    if digits.is_empty() {
        digits.push('0');
    }
    if negative {
        digits.push('-');
    }
    digits.iter().rev().collect()
}

/// Renders `unscaled * 10^-scale` the way Cassandra prints decimals:
/// plain notation unless the exponent is very small or the scale negative.
fn decimal_text(unscaled: &str, scale: i32) -> String {
    let (sign, digits) = unscaled.strip_prefix('-').map_or(("", unscaled), |d| ("-", d));
    let len = i64::try_from(digits.len()).unwrap_or(i64::MAX);
    let adjusted = len - 1 - i64::from(scale);

    match usize::try_from(scale) {
        Ok(0) if adjusted >= -6 => format!("{sign}{digits}"),
        Ok(scale) if adjusted >= -6 => {
            if digits.len() > scale {
                let (int, frac) = digits.split_at(digits.len() - scale);
                format!("{sign}{int}.{frac}")
            } else {
                format!("{sign}0.{}{digits}", "0".repeat(scale - digits.len()))
            }
        }
        _ => {
            let (first, rest) = digits.split_at(1);
            let point = if rest.is_empty() { "" } else { "." };
            format!("{sign}{first}{point}{rest}E{adjusted:+}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{OutputFormat, render_rows};
    use std::net::{IpAddr, Ipv4Addr};

    #[test]
    fn test_signed_be_to_i128() {
        assert_eq!(signed_be_to_i128(&[]), Some(0));
        assert_eq!(signed_be_to_i128(&[0x01, 0x00]), Some(256));
        assert_eq!(signed_be_to_i128(&[0xff]), Some(-1));
        assert_eq!(signed_be_to_i128(&[0xff, 0x00]), Some(-256));
        assert_eq!(signed_be_to_i128(&[0u8; 17]), None);
    }

    #[test]
    fn test_signed_be_to_decimal_string() {
        assert_eq!(signed_be_to_decimal_string(&[]), "0");
        assert_eq!(signed_be_to_decimal_string(&[0x01, 0x00]), "256");
        assert_eq!(signed_be_to_decimal_string(&[0xff]), "-1");
        assert_eq!(signed_be_to_decimal_string(&[0x80]), "-128");
    }

    #[test]
    fn test_decimal_from_parts() {
        assert_eq!(decimal_from_parts(12345, 2).unwrap().to_string(), "123.45");
        assert_eq!(decimal_from_parts(-5, 1).unwrap().to_string(), "-0.5");
        assert_eq!(decimal_from_parts(3, -2).unwrap().to_string(), "300");
        assert!(decimal_from_parts(1, 40).is_none());
    }

    #[test]
    fn test_decimal_text() {
        assert_eq!(decimal_text("12345", 2), "123.45");
        assert_eq!(decimal_text("-5", 3), "-0.005");
        assert_eq!(decimal_text("7", 0), "7");
        assert_eq!(decimal_text("1", 30), "1E-30");
        assert_eq!(decimal_text("-12", 40), "-1.2E-39");
        assert_eq!(decimal_text("3", -2), "3E+2");
    }

    #[test]
    fn test_convert_dates_and_times() {
        let epoch = u32::try_from(CQL_DATE_EPOCH).unwrap();
        assert_eq!(convert_date(epoch).to_string(), "1970-01-01");
        assert_eq!(convert_date(epoch + 1).to_string(), "1970-01-02");
        assert_eq!(convert_date(epoch - 1).to_string(), "1969-12-31");
        assert_eq!(convert_time(3_661 * NANOS_PER_SECOND).to_string(), "01:01:01");
        assert_eq!(convert_timestamp(0).to_string(), "1970-01-01T00:00:00.000Z");
    }

    #[test]
    fn test_out_of_range_dates_and_times_keep_raw_value() {
        assert_eq!(convert_timestamp(i64::MAX), Value::Integer(i64::MAX));
        assert_eq!(convert_date(u32::MAX), Value::Integer(i64::from(i32::MAX)));
        assert_eq!(convert_time(-1), Value::Integer(-1));
        assert_eq!(
            convert_time(86_400 * NANOS_PER_SECOND),
            Value::Integer(86_400 * NANOS_PER_SECOND)
        );
    }

    #[test]
    fn test_convert_scalars() {
        assert_eq!(convert_value(CqlValue::Int(7)), Value::Integer(7));
        assert_eq!(convert_value(CqlValue::Text("a".into())), Value::from("a"));
        assert_eq!(convert_value(CqlValue::Empty), Value::Null);
        assert_eq!(
            convert_value(CqlValue::Inet(IpAddr::V4(Ipv4Addr::LOCALHOST))),
            Value::Inet(IpAddr::V4(Ipv4Addr::LOCALHOST))
        );
    }

    #[test]
    fn test_convert_collections() {
        let map = CqlValue::Map(vec![(CqlValue::Text("k".into()), CqlValue::BigInt(1))]);
        assert_eq!(
            convert_value(map),
            Value::Map(vec![(Value::from("k"), Value::Integer(1))])
        );

        let tuple = CqlValue::Tuple(vec![Some(CqlValue::Boolean(true)), None]);
        assert_eq!(
            convert_value(tuple),
            Value::Tuple(vec![Value::Boolean(true), Value::Null])
        );
    }

    #[test]
    fn test_convert_vector() {
        let vector = CqlValue::Vector(vec![CqlValue::Float(0.5), CqlValue::Float(1.0)]);
        assert_eq!(
            convert_value(vector),
            Value::List(vec![Value::Double(0.5), Value::Double(1.0)])
        );
    }

    #[test]
    fn test_wide_numbers_fall_back_to_exact_text() {
        let tiny = CqlDecimal::from_signed_be_bytes_slice_and_exponent(&[1], 30);
        assert_eq!(
            convert_value(CqlValue::Decimal(tiny)),
            Value::BigNumber("1E-30".to_string())
        );

        let mut wide = vec![0x01];
        wide.extend([0x00; 16]);
        let huge = CqlVarint::from_signed_bytes_be_slice(&wide);
        assert_eq!(
            convert_value(CqlValue::Varint(huge)),
            Value::BigNumber("340282366920938463463374607431768211456".to_string())
        );

        let mut wide_negative = vec![0xff];
        wide_negative.extend([0x00; 16]);
        let negative = CqlVarint::from_signed_bytes_be_slice(&wide_negative);
        assert_eq!(
            convert_value(CqlValue::Varint(negative)),
            Value::BigNumber("-340282366920938463463374607431768211456".to_string())
        );
    }

    #[test]
    fn test_wide_numbers_render_in_every_format() {
        let mut wide = vec![0x01];
        wide.extend([0x00; 16]);
        let decimal = CqlDecimal::from_signed_be_bytes_slice_and_exponent(&[1], 30);
        let huge = CqlVarint::from_signed_bytes_be_slice(&wide);
        let row = Row::new()
            .with("big", convert_value(CqlValue::Varint(huge)))
            .with("tiny", convert_value(CqlValue::Decimal(decimal)));
        let rows = vec![row];

        let json = render_rows(&rows, OutputFormat::Json).unwrap();
        assert!(json.contains("\"big\": \"340282366920938463463374607431768211456\""));
        assert!(json.contains("\"tiny\": \"1E-30\""));

        let table = render_rows(&rows, OutputFormat::Table).unwrap();
        assert!(table.contains("340282366920938463463374607431768211456"));
        assert!(table.contains("1E-30"));
    }
}
