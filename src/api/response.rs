use crate::api::Error;
use crate::model::MeterValues;
use serde::Deserialize;
use serde_json::{Map, Value};

const ENERGY: &str = "energy";
const ENERGY_OUT: &str = "energyOut";
const POWER: &str = "power";

/* One element of the reading list; anything besides `values` is ignored */
#[derive(Deserialize)]
pub struct Reading {
    pub values: Map<String, Value>,
}

/// Look up `key` in `values` and convert it. An absent key is `Ok(None)`, a present key that
/// does not convert is an error.
fn field<T>(
    values: &Map<String, Value>,
    key: &str,
    convert: fn(&Value) -> Option<T>,
) -> Result<Option<T>, Error> {
    values
        .get(key)
        .map(|value| {
            convert(value).ok_or_else(|| Error::InvalidField(key.to_owned(), value.to_string()))
        })
        .transpose()
}

fn as_i32(value: &Value) -> Option<i32> {
    value
        .as_i64()
        .and_then(|v| num::ToPrimitive::to_i32(&v))
}

impl Reading {
    pub fn meter_values(&self) -> Result<MeterValues, Error> {
        Ok(MeterValues {
            energy: field(&self.values, ENERGY, Value::as_i64)?,
            energy_out: field(&self.values, ENERGY_OUT, Value::as_i64)?,
            power: field(&self.values, POWER, as_i32)?,
        })
    }
}

/// Parse a reading list and extract the values of its last element.
///
/// Returns `Ok(None)` for an empty list. Elements before the last one are never inspected, the
/// API appends the newest reading.
pub fn parse(body: &str) -> Result<Option<MeterValues>, Error> {
    let mut readings = serde_json::from_str::<Vec<Value>>(body)
        .map_err(|e| Error::InvalidResponse(e.to_string()))?;

    match readings.pop() {
        None => Ok(None),
        Some(latest) => serde_json::from_value::<Reading>(latest)
            .map_err(|e| Error::InvalidResponse(e.to_string()))?
            .meter_values()
            .map(Some),
    }
}
